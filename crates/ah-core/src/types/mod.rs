//! 시스템 전반에서 사용되는 공통 타입.

mod decimal;
mod trade_date;

pub use decimal::*;
pub use trade_date::*;
