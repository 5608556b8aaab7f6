//! 후강퉁 대상 AH 종목 풀.

use serde::{Deserialize, Serialize};

/// 종목 풀 항목 (H주 코드 ↔ A주 코드 ↔ 종목명).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPoolEntry {
    /// H주 코드 (예: 0939.HK)
    pub h_code: String,
    /// 대응하는 A주 코드 (예: 601939.SH)
    pub a_code: String,
    /// 종목명
    pub name: String,
}

impl StockPoolEntry {
    pub fn new(
        h_code: impl Into<String>,
        a_code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            h_code: h_code.into(),
            a_code: a_code.into(),
            name: name.into(),
        }
    }
}

/// 한 번의 실행에서 사용하는 종목 풀.
///
/// 모든 항목은 A주 코드를 가지고 있으며, 비어 있는 풀은 "실행 중단" 신호입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPool {
    entries: Vec<StockPoolEntry>,
}

impl StockPool {
    pub fn new(entries: Vec<StockPoolEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[StockPoolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 풀 순서대로 A주 코드 목록.
    pub fn a_codes(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.a_code.clone()).collect()
    }

    /// 풀 순서대로 H주 코드 목록.
    pub fn h_codes(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.h_code.clone()).collect()
    }

    /// A주 코드에 매핑된 모든 항목 (동일 A주에 여러 H주가 매핑될 수 있음).
    pub fn entries_for_a_code<'a>(
        &'a self,
        a_code: &'a str,
    ) -> impl Iterator<Item = &'a StockPoolEntry> + 'a {
        self.entries.iter().filter(move |e| e.a_code == a_code)
    }
}

impl FromIterator<StockPoolEntry> for StockPool {
    fn from_iter<I: IntoIterator<Item = StockPoolEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
