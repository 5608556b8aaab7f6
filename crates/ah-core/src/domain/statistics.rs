//! 종목별 프리미엄 통계 집계.
//!
//! long format 관측치를 (종목명, A주 코드, H주 코드)로 묶어
//! 평균, 중앙값, 최소/최대, 5%/95% 분위수, 표본 표준편차를 계산합니다.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::observation::PriceObservation;
use crate::types::Ratio;

/// 종목 하나의 프리미엄 통계 요약.
///
/// 프리미엄이 하나도 없는 종목은 모든 통계가 `None`입니다.
/// 표준편차는 값이 2개 이상일 때만 계산됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    pub stock_name: String,
    pub a_code: String,
    pub h_code: String,
    /// 평균
    pub premium_mean: Option<Ratio>,
    /// 중앙값 (50% 분위수)
    pub premium_median: Option<Ratio>,
    /// 최소값
    pub premium_min: Option<Ratio>,
    /// 최대값
    pub premium_max: Option<Ratio>,
    /// 5% 분위수
    pub premium_p5: Option<Ratio>,
    /// 95% 분위수
    pub premium_p95: Option<Ratio>,
    /// 표본 표준편차 (n-1)
    pub premium_std: Option<Ratio>,
}

impl StatSummary {
    /// 프리미엄 값 목록으로 통계를 계산합니다.
    pub fn from_premiums(
        stock_name: impl Into<String>,
        a_code: impl Into<String>,
        h_code: impl Into<String>,
        premiums: &[Ratio],
    ) -> Self {
        let mut sorted = premiums.to_vec();
        sorted.sort();

        Self {
            stock_name: stock_name.into(),
            a_code: a_code.into(),
            h_code: h_code.into(),
            premium_mean: mean(&sorted),
            premium_median: percentile(&sorted, dec!(0.5)),
            premium_min: sorted.first().copied(),
            premium_max: sorted.last().copied(),
            premium_p5: percentile(&sorted, dec!(0.05)),
            premium_p95: percentile(&sorted, dec!(0.95)),
            premium_std: sample_std_dev(&sorted),
        }
    }
}

/// 관측치를 종목별로 묶어 통계를 계산합니다.
///
/// 결과는 (종목명, A주 코드, H주 코드) 오름차순입니다.
/// 프리미엄이 `None`인 행은 통계에서 제외되지만 종목 자체는 결과에 남습니다.
/// 입력이 비어 있으면 빈 결과를 반환합니다.
pub fn summarize_premiums(observations: &[PriceObservation]) -> Vec<StatSummary> {
    let mut groups: BTreeMap<(&str, &str, &str), Vec<Ratio>> = BTreeMap::new();

    for row in observations {
        let values = groups
            .entry((
                row.stock_name.as_str(),
                row.a_code.as_str(),
                row.h_code.as_str(),
            ))
            .or_default();
        if let Some(premium) = row.premium {
            values.push(premium);
        }
    }

    groups
        .into_iter()
        .map(|((name, a_code, h_code), values)| {
            StatSummary::from_premiums(name, a_code, h_code, &values)
        })
        .collect()
}

/// 산술 평균.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().copied().sum::<Decimal>() / Decimal::from(values.len()))
}

/// 선형 보간 분위수.
///
/// `sorted`는 오름차순이어야 하며, `q`는 0~1 범위입니다.
/// 위치 = (n - 1) × q 이고, 양쪽 이웃 값을 선형 보간합니다.
pub fn percentile(sorted: &[Decimal], q: Decimal) -> Option<Decimal> {
    if sorted.is_empty() {
        return None;
    }

    let q = q.clamp(Decimal::ZERO, Decimal::ONE);
    let position = Decimal::from(sorted.len() - 1) * q;
    let lower = position.floor();
    let fraction = position - lower;

    let lower_idx = lower.to_usize()?;
    let upper_idx = (lower_idx + 1).min(sorted.len() - 1);

    let low = sorted[lower_idx];
    let high = sorted[upper_idx];
    Some(low + (high - low) * fraction)
}

/// 표본 표준편차 (분모 n-1).
pub fn sample_std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }

    let avg = mean(values)?;
    let n = Decimal::from(values.len());

    // 분산: Σ(x - mean)² / (n-1)
    let variance = values
        .iter()
        .map(|v| (*v - avg) * (*v - avg))
        .sum::<Decimal>()
        / (n - Decimal::ONE);

    Some(decimal_sqrt(variance))
}

/// Decimal 제곱근 (뉴턴-랩슨).
///
/// 10^-16 정밀도 또는 최대 100회 반복에서 멈춥니다.
pub fn decimal_sqrt(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut guess = if value > Decimal::ONE {
        value / Decimal::TWO
    } else {
        Decimal::ONE
    };
    let precision = Decimal::new(1, 16);

    for _ in 0..100 {
        let next_guess = (guess + value / guess) / Decimal::TWO;
        if (next_guess - guess).abs() < precision {
            return next_guess;
        }
        guess = next_guess;
    }

    guess
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn observation(day: u32, name: &str, premium: Option<Decimal>) -> PriceObservation {
        PriceObservation {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            stock_name: name.to_string(),
            a_code: format!("{}.SH", name),
            h_code: format!("{}.HK", name),
            a_price: dec!(10),
            h_price: dec!(10),
            fx_rate: dec!(0.9),
            premium,
        }
    }

    fn assert_close(actual: Option<Decimal>, expected: Decimal) {
        let actual = actual.expect("값이 있어야 합니다");
        assert!(
            (actual - expected).abs() < dec!(0.000000001),
            "actual={} expected={}",
            actual,
            expected
        );
    }

    #[test]
    fn test_summary_example() {
        let premiums = [dec!(0.1), dec!(0.2), dec!(0.3), dec!(0.4), dec!(0.5)];
        let rows: Vec<_> = premiums
            .iter()
            .enumerate()
            .map(|(i, p)| observation(i as u32 + 2, "X", Some(*p)))
            .collect();

        let stats = summarize_premiums(&rows);
        assert_eq!(stats.len(), 1);
        let s = &stats[0];

        assert_eq!(s.premium_mean, Some(dec!(0.3)));
        assert_eq!(s.premium_median, Some(dec!(0.3)));
        assert_eq!(s.premium_min, Some(dec!(0.1)));
        assert_eq!(s.premium_max, Some(dec!(0.5)));
        assert_eq!(s.premium_p5, Some(dec!(0.12)));
        assert_eq!(s.premium_p95, Some(dec!(0.48)));
        assert_close(s.premium_std, dec!(0.158113883008));
    }

    #[test]
    fn test_empty_input_yields_empty_result() {
        assert!(summarize_premiums(&[]).is_empty());
    }

    #[test]
    fn test_groups_sorted_by_key_and_nulls_skipped() {
        let rows = vec![
            observation(2, "B", Some(dec!(0.2))),
            observation(2, "A", Some(dec!(-0.1))),
            observation(3, "B", None),
            observation(3, "A", Some(dec!(0.1))),
            observation(4, "C", None),
        ];

        let stats = summarize_premiums(&rows);
        let names: Vec<_> = stats.iter().map(|s| s.stock_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        assert_eq!(stats[0].premium_mean, Some(dec!(0)));
        // B: null 행 제외 → 값 1개, 표준편차 없음
        assert_eq!(stats[1].premium_mean, Some(dec!(0.2)));
        assert_eq!(stats[1].premium_std, None);
        // C: 프리미엄이 전부 null
        assert_eq!(stats[2].premium_mean, None);
        assert_eq!(stats[2].premium_p95, None);
    }

    #[test]
    fn test_percentile_even_count() {
        let sorted = [dec!(1), dec!(2), dec!(3), dec!(4)];
        assert_eq!(percentile(&sorted, dec!(0.5)), Some(dec!(2.5)));
        assert_eq!(percentile(&sorted, dec!(0)), Some(dec!(1)));
        assert_eq!(percentile(&sorted, dec!(1)), Some(dec!(4)));
    }

    #[test]
    fn test_percentile_single_value() {
        assert_eq!(percentile(&[dec!(0.7)], dec!(0.05)), Some(dec!(0.7)));
    }

    #[test]
    fn test_decimal_sqrt() {
        assert!((decimal_sqrt(dec!(4)) - dec!(2)).abs() < dec!(0.0000001));
        assert!((decimal_sqrt(dec!(2)) - dec!(1.41421356)).abs() < dec!(0.000001));
        assert!((decimal_sqrt(dec!(0.0001)) - dec!(0.01)).abs() < dec!(0.0000001));
        assert_eq!(decimal_sqrt(dec!(-1)), dec!(0));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn percentiles_are_ordered_within_range(
                raw in proptest::collection::vec(-5000i64..5000, 1..40)
            ) {
                let premiums: Vec<Decimal> = raw.iter().map(|v| Decimal::new(*v, 3)).collect();
                let stats = StatSummary::from_premiums("A", "A.SH", "A.HK", &premiums);

                let min = stats.premium_min.unwrap();
                let max = stats.premium_max.unwrap();
                let p5 = stats.premium_p5.unwrap();
                let median = stats.premium_median.unwrap();
                let p95 = stats.premium_p95.unwrap();

                prop_assert!(min <= p5);
                prop_assert!(p5 <= median);
                prop_assert!(median <= p95);
                prop_assert!(p95 <= max);
                prop_assert_eq!(stats.premium_std.is_some(), premiums.len() >= 2);
            }
        }
    }
}
