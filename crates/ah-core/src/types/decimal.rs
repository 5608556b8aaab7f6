//! 가격/환율/프리미엄 계산을 위한 Decimal 유틸리티.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// 종가 타입 (A주는 CNY, H주는 HKD).
pub type Price = Decimal;

/// 환율 타입 (1 HKD 당 CNY).
pub type FxRate = Decimal;

/// 비율 타입 (0.01 = 1%).
pub type Ratio = Decimal;

/// Decimal 변환을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 퍼센트 문자열로 변환합니다 (예: "33.33%").
    fn to_percentage_string(&self) -> String;

    /// 스프레드시트 셀 기록용 f64로 변환합니다.
    fn to_cell_value(&self) -> f64;
}

impl DecimalExt for Decimal {
    fn to_percentage_string(&self) -> String {
        let pct = *self * Decimal::from(100);
        format!("{:.2}%", pct)
    }

    fn to_cell_value(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

/// 외부에서 받은 f64 값을 Decimal로 변환합니다.
///
/// NaN/무한대는 결측치로 취급합니다.
pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if value.is_finite() {
        Decimal::from_f64(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_percentage_string() {
        assert_eq!(dec!(0.0525).to_percentage_string(), "5.25%");
        assert_eq!(dec!(-0.1).to_percentage_string(), "-10.00%");
    }

    #[test]
    fn test_decimal_from_f64_rejects_nan() {
        assert_eq!(decimal_from_f64(f64::NAN), None);
        assert_eq!(decimal_from_f64(f64::INFINITY), None);
        assert_eq!(decimal_from_f64(1.5), Some(dec!(1.5)));
    }
}
