//! AH 프리미엄 계산.

use rust_decimal::Decimal;

use crate::types::{FxRate, Price, Ratio};

/// AH 프리미엄을 계산합니다.
///
/// `premium = H주 종가 / 환율 / A주 종가 - 1`
///
/// A주 종가가 없거나 0이면 다른 값과 무관하게 `None`입니다.
/// H주 종가나 환율이 없을 때, 환율이 0일 때도 `None`입니다.
///
/// # Examples
///
/// ```
/// use ah_core::ah_premium;
/// use rust_decimal_macros::dec;
///
/// let premium = ah_premium(Some(dec!(100)), Some(dec!(120)), Some(dec!(0.9))).unwrap();
/// assert!((premium - dec!(0.3333333333)).abs() < dec!(0.0000001));
/// assert_eq!(ah_premium(Some(dec!(0)), Some(dec!(120)), Some(dec!(0.9))), None);
/// ```
pub fn ah_premium(
    a_price: Option<Price>,
    h_price: Option<Price>,
    fx_rate: Option<FxRate>,
) -> Option<Ratio> {
    let a_price = a_price.filter(|p| !p.is_zero())?;
    let h_in_cny = h_price?.checked_div(fx_rate?)?;
    Some(h_in_cny.checked_div(a_price)? - Decimal::ONE)
}
