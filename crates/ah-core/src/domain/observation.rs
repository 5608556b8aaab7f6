//! 일별 가격 관측치 (long format 한 행).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calculations::ah_premium;
use crate::types::{FxRate, Price, Ratio};

/// (종목, 거래일) 당 한 행의 관측치.
///
/// A주/H주 종가와 환율은 모두 존재합니다 (결측 행은 생성 단계에서 제외).
/// 프리미엄은 A주 종가가 0이면 `None`입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// 거래일
    pub date: NaiveDate,
    /// 종목명
    pub stock_name: String,
    /// A주 코드
    pub a_code: String,
    /// H주 코드
    pub h_code: String,
    /// A주 종가 (CNY)
    pub a_price: Price,
    /// H주 종가 (HKD)
    pub h_price: Price,
    /// 환율
    pub fx_rate: FxRate,
    /// AH 프리미엄
    pub premium: Option<Ratio>,
}

impl PriceObservation {
    /// 세 값이 모두 있을 때만 관측치를 만들고 프리미엄을 계산합니다.
    pub fn resolve(
        date: NaiveDate,
        stock_name: impl Into<String>,
        a_code: impl Into<String>,
        h_code: impl Into<String>,
        a_price: Option<Price>,
        h_price: Option<Price>,
        fx_rate: Option<FxRate>,
    ) -> Option<Self> {
        let premium = ah_premium(a_price, h_price, fx_rate);
        Some(Self {
            date,
            stock_name: stock_name.into(),
            a_code: a_code.into(),
            h_code: h_code.into(),
            a_price: a_price?,
            h_price: h_price?,
            fx_rate: fx_rate?,
            premium,
        })
    }
}

/// (거래일, 종목명) 순으로 안정 정렬합니다.
pub fn sort_observations(observations: &mut [PriceObservation]) {
    observations.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.stock_name.cmp(&b.stock_name))
    });
}
