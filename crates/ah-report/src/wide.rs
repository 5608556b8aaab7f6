//! 종목 × 거래일 wide 테이블.
//!
//! 행은 종목명, 열은 거래일입니다. long format 관측치를 지표별로 pivot하고,
//! 모니터링 리포트에서는 기존 테이블 뒤에 새 거래일 열을 이어 붙입니다.

use ah_core::{format_trade_date, PriceObservation};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{ReportError, Result};
use crate::sheet::{Cell, SheetTable};

/// 행 라벨 열의 헤더.
pub const LABEL_HEADER: &str = "stock_name";

/// wide 테이블로 펼치는 지표.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// AH 프리미엄
    Premium,
    /// A주 종가
    APrice,
    /// H주 종가
    HPrice,
    /// 환율
    FxRate,
}

impl Metric {
    /// 모니터링 리포트의 시트 순서.
    pub const ALL: [Metric; 4] = [
        Metric::Premium,
        Metric::APrice,
        Metric::HPrice,
        Metric::FxRate,
    ];

    /// 시트 이름.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Metric::Premium => "溢价率",
            Metric::APrice => "A股收盘价",
            Metric::HPrice => "H股收盘价",
            Metric::FxRate => "汇率",
        }
    }

    /// 관측치에서 지표 값을 꺼냅니다.
    pub fn value(&self, row: &PriceObservation) -> Option<Decimal> {
        match self {
            Metric::Premium => row.premium,
            Metric::APrice => Some(row.a_price),
            Metric::HPrice => Some(row.h_price),
            Metric::FxRate => Some(row.fx_rate),
        }
    }
}

/// 종목 × 거래일 테이블.
///
/// `cells[row][column]`, 값이 없으면 `None`.
/// 증분 병합 결과에는 같은 날짜 열이 두 번 나올 수 있습니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    rows: Vec<String>,
    columns: Vec<NaiveDate>,
    cells: Vec<Vec<Option<Decimal>>>,
}

impl WideTable {
    /// 행/열/셀로 테이블을 만듭니다. 셀 모양이 맞지 않으면 `None`.
    pub fn new(
        rows: Vec<String>,
        columns: Vec<NaiveDate>,
        cells: Vec<Vec<Option<Decimal>>>,
    ) -> Option<Self> {
        if cells.len() != rows.len() || cells.iter().any(|r| r.len() != columns.len()) {
            return None;
        }
        Some(Self {
            rows,
            columns,
            cells,
        })
    }

    /// long format 관측치를 pivot합니다.
    ///
    /// 행은 종목명 오름차순, 열은 거래일 오름차순입니다.
    /// 같은 (종목명, 거래일)이 여러 번 나오면 처음 값을 사용합니다.
    pub fn pivot(observations: &[PriceObservation], metric: Metric) -> Self {
        let mut values: BTreeMap<(&str, NaiveDate), Option<Decimal>> = BTreeMap::new();
        let mut rows = BTreeSet::new();
        let mut columns = BTreeSet::new();

        for row in observations {
            rows.insert(row.stock_name.as_str());
            columns.insert(row.date);
            values
                .entry((row.stock_name.as_str(), row.date))
                .or_insert_with(|| metric.value(row));
        }

        let columns: Vec<NaiveDate> = columns.into_iter().collect();
        let cells = rows
            .iter()
            .map(|name| {
                columns
                    .iter()
                    .map(|date| values.get(&(*name, *date)).copied().flatten())
                    .collect()
            })
            .collect();

        Self {
            rows: rows.into_iter().map(str::to_string).collect(),
            columns,
            cells,
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[NaiveDate] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    /// 마지막 열의 날짜.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.columns.last().copied()
    }

    /// (종목명, 거래일) 값. 같은 날짜 열이 여럿이면 앞의 열.
    pub fn get(&self, row: &str, date: NaiveDate) -> Option<Decimal> {
        let r = self.rows.iter().position(|name| name == row)?;
        let c = self.columns.iter().position(|d| *d == date)?;
        self.cells[r][c]
    }

    /// 기존 테이블 뒤에 새 테이블의 열을 붙입니다.
    ///
    /// 기존 행이 종목명 순이면 새 종목을 포함해 다시 종목명 순으로 정렬하고,
    /// 아니면 기존 순서를 유지한 채 새 종목을 뒤에 추가합니다.
    /// 한쪽에만 있는 행의 다른 쪽 셀은 비어 있습니다.
    pub fn merge(&self, newer: &WideTable) -> WideTable {
        let mut rows = self.rows.clone();
        for name in &newer.rows {
            if !rows.contains(name) {
                rows.push(name.clone());
            }
        }
        if is_sorted(&self.rows) {
            rows.sort();
        }

        let old_index: HashMap<&str, usize> = index_of(&self.rows);
        let new_index: HashMap<&str, usize> = index_of(&newer.rows);

        let cells = rows
            .iter()
            .map(|name| {
                let mut row = match old_index.get(name.as_str()) {
                    Some(&i) => self.cells[i].clone(),
                    None => vec![None; self.columns.len()],
                };
                match new_index.get(name.as_str()) {
                    Some(&i) => row.extend_from_slice(&newer.cells[i]),
                    None => row.extend(std::iter::repeat(None).take(newer.columns.len())),
                }
                row
            })
            .collect();

        let mut columns = self.columns.clone();
        columns.extend_from_slice(&newer.columns);

        WideTable {
            rows,
            columns,
            cells,
        }
    }

    /// 시트로 변환합니다. 첫 열은 `stock_name`, 날짜 헤더는 `YYYY-MM-DD`.
    pub fn to_sheet(&self, name: &str) -> SheetTable {
        let headers = std::iter::once(LABEL_HEADER.to_string())
            .chain(self.columns.iter().map(|d| format_trade_date(*d)))
            .collect();

        let mut sheet = SheetTable::new(name, headers);
        for (label, values) in self.rows.iter().zip(&self.cells) {
            let row = std::iter::once(Cell::text(label.clone()))
                .chain(values.iter().map(|v| Cell::decimal(*v)))
                .collect();
            sheet.push_row(row);
        }
        sheet
    }

    /// 시트에서 테이블을 읽습니다.
    ///
    /// 첫 열은 행 라벨이고 나머지 헤더는 날짜여야 합니다.
    /// 라벨이 빈 행은 건너뜁니다.
    pub fn from_sheet(sheet: &SheetTable) -> Result<Self> {
        if sheet.headers.is_empty() {
            return Err(ReportError::invalid(&sheet.name, "헤더가 없습니다"));
        }

        let columns = sheet.headers[1..]
            .iter()
            .map(|header| {
                Cell::text(header.clone()).as_date().ok_or_else(|| {
                    ReportError::invalid(&sheet.name, format!("날짜 헤더가 아닙니다: {}", header))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut rows = Vec::new();
        let mut cells = Vec::new();
        for row in &sheet.rows {
            let Some(label) = row.first().and_then(Cell::as_text) else {
                continue;
            };
            let values = (0..columns.len())
                .map(|c| row.get(c + 1).and_then(Cell::as_decimal))
                .collect();
            rows.push(label);
            cells.push(values);
        }

        Ok(Self {
            rows,
            columns,
            cells,
        })
    }
}

fn is_sorted(labels: &[String]) -> bool {
    labels.windows(2).all(|pair| pair[0] <= pair[1])
}

fn index_of(labels: &[String]) -> HashMap<&str, usize> {
    let mut index = HashMap::new();
    for (i, label) in labels.iter().enumerate() {
        index.entry(label.as_str()).or_insert(i);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn observation(d: u32, name: &str, premium: Option<Decimal>) -> PriceObservation {
        PriceObservation {
            date: day(d),
            stock_name: name.to_string(),
            a_code: format!("{}.SH", name),
            h_code: format!("{}.HK", name),
            a_price: dec!(10),
            h_price: dec!(9),
            fx_rate: dec!(0.9),
            premium,
        }
    }

    #[test]
    fn test_pivot_sorted_and_first_wins() {
        let rows = vec![
            observation(3, "B", Some(dec!(0.3))),
            observation(2, "A", Some(dec!(0.1))),
            observation(2, "A", Some(dec!(0.9))),
            observation(3, "A", None),
        ];

        let table = WideTable::pivot(&rows, Metric::Premium);
        assert_eq!(table.rows(), &["A".to_string(), "B".to_string()]);
        assert_eq!(table.columns(), &[day(2), day(3)]);
        assert_eq!(table.get("A", day(2)), Some(dec!(0.1)));
        assert_eq!(table.get("A", day(3)), None);
        assert_eq!(table.get("B", day(2)), None);

        // 프리미엄이 null이어도 다른 지표에는 값이 있습니다
        let prices = WideTable::pivot(&rows, Metric::APrice);
        assert_eq!(prices.get("A", day(3)), Some(dec!(10)));
        assert_eq!(prices.rows(), table.rows());
        assert_eq!(prices.columns(), table.columns());
    }

    #[test]
    fn test_pivot_empty() {
        let table = WideTable::pivot(&[], Metric::FxRate);
        assert!(table.is_empty());
        assert_eq!(table.last_date(), None);
    }

    #[test]
    fn test_merge_appends_columns_and_new_stocks() {
        let old = WideTable::pivot(
            &[observation(2, "B", Some(dec!(0.2))), observation(2, "C", Some(dec!(0.3)))],
            Metric::Premium,
        );
        let new = WideTable::pivot(
            &[observation(3, "A", Some(dec!(0.1))), observation(3, "C", Some(dec!(0.4)))],
            Metric::Premium,
        );

        let merged = old.merge(&new);
        assert_eq!(
            merged.rows(),
            &["A".to_string(), "B".to_string(), "C".to_string()]
        );
        assert_eq!(merged.columns(), &[day(2), day(3)]);
        assert_eq!(merged.get("C", day(2)), Some(dec!(0.3)));
        assert_eq!(merged.get("C", day(3)), Some(dec!(0.4)));
        assert_eq!(merged.get("A", day(2)), None);
        assert_eq!(merged.get("B", day(3)), None);
        assert_eq!(merged.last_date(), Some(day(3)));
    }

    #[test]
    fn test_merge_keeps_unsorted_saved_order() {
        let old = WideTable::new(
            vec!["C".to_string(), "B".to_string()],
            vec![day(2)],
            vec![vec![Some(dec!(0.3))], vec![Some(dec!(0.2))]],
        )
        .unwrap();
        let new = WideTable::pivot(&[observation(3, "A", Some(dec!(0.1)))], Metric::Premium);

        let merged = old.merge(&new);
        assert_eq!(
            merged.rows(),
            &["C".to_string(), "B".to_string(), "A".to_string()]
        );
        assert_eq!(merged.get("A", day(3)), Some(dec!(0.1)));
        assert_eq!(merged.get("C", day(2)), Some(dec!(0.3)));
    }

    #[test]
    fn test_split_merge_with_late_new_stock_matches_full_pivot() {
        let rows = vec![
            observation(2, "B", Some(dec!(0.2))),
            observation(3, "A", Some(dec!(0.1))),
            observation(3, "B", None),
        ];
        let merged = WideTable::pivot(&rows[..1], Metric::Premium)
            .merge(&WideTable::pivot(&rows[1..], Metric::Premium));
        assert_eq!(merged, WideTable::pivot(&rows, Metric::Premium));
    }

    #[test]
    fn test_sheet_round_trip() {
        let table = WideTable::pivot(
            &[observation(2, "A", Some(dec!(0.25))), observation(3, "B", None)],
            Metric::Premium,
        );
        let sheet = table.to_sheet("溢价率");
        assert_eq!(sheet.headers, vec!["stock_name", "2024-01-02", "2024-01-03"]);

        let loaded = WideTable::from_sheet(&sheet).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_from_sheet_rejects_non_date_header() {
        let sheet = SheetTable::new("溢价率", vec!["stock_name".into(), "close".into()]);
        assert!(matches!(
            WideTable::from_sheet(&sheet),
            Err(ReportError::InvalidSheet { .. })
        ));
    }

    fn arb_observations() -> impl Strategy<Value = Vec<PriceObservation>> {
        prop::collection::vec(
            (1u32..20, 0usize..4, prop::option::of(-500i64..500)),
            0..40,
        )
        .prop_map(|items| {
            items
                .into_iter()
                .map(|(d, name, premium)| {
                    observation(
                        d,
                        ["甲", "乙", "丙", "丁"][name],
                        premium.map(|p| Decimal::new(p, 3)),
                    )
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_pivot_is_deterministic_over_unique_rows(rows in arb_observations()) {
            // 중복이 없으면 입력 순서와 무관
            let mut seen = std::collections::HashSet::new();
            let unique: Vec<_> = rows
                .into_iter()
                .filter(|r| seen.insert((r.stock_name.clone(), r.date)))
                .collect();
            let mut reversed = unique.clone();
            reversed.reverse();

            prop_assert_eq!(
                WideTable::pivot(&unique, Metric::Premium),
                WideTable::pivot(&reversed, Metric::Premium)
            );
        }

        #[test]
        fn prop_merge_keeps_all_cells(old in arb_observations(), new in arb_observations()) {
            let a = WideTable::pivot(&old, Metric::Premium);
            let b = WideTable::pivot(&new, Metric::Premium);
            let merged = a.merge(&b);

            prop_assert_eq!(merged.columns().len(), a.columns().len() + b.columns().len());
            for name in a.rows().iter().chain(b.rows()) {
                prop_assert!(merged.rows().contains(name));
            }
            for (r, name) in a.rows().iter().enumerate() {
                for (c, _) in a.columns().iter().enumerate() {
                    let merged_row = merged.rows().iter().position(|n| n == name).unwrap();
                    prop_assert_eq!(merged.cells[merged_row][c], a.cells[r][c]);
                }
            }
        }

        #[test]
        fn prop_split_merge_matches_full_pivot(rows in arb_observations(), split in 1u32..21) {
            let mut seen = std::collections::HashSet::new();
            let unique: Vec<_> = rows
                .into_iter()
                .filter(|r| seen.insert((r.stock_name.clone(), r.date)))
                .collect();
            // [1, split) 구간과 [split, 20) 구간
            let (earlier, later): (Vec<_>, Vec<_>) =
                unique.iter().cloned().partition(|r| r.date < day(split));

            for metric in Metric::ALL {
                let merged = WideTable::pivot(&earlier, metric)
                    .merge(&WideTable::pivot(&later, metric));
                prop_assert_eq!(merged, WideTable::pivot(&unique, metric));
            }
        }

        #[test]
        fn prop_merge_with_empty_is_identity(rows in arb_observations()) {
            let table = WideTable::pivot(&rows, Metric::Premium);
            prop_assert_eq!(table.merge(&WideTable::default()), table.clone());
        }
    }
}
