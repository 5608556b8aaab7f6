//! AH 프리미엄 계산을 위한 도메인 모델.

mod calculations;
mod observation;
mod statistics;
mod stock_pool;

pub use calculations::*;
pub use observation::*;
pub use statistics::*;
pub use stock_pool::*;
