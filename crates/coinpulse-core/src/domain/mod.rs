//! 시그널 엔진을 위한 도메인 모델.

mod candle;
mod cycle;
mod transfer;
mod window;

pub use candle::*;
pub use cycle::*;
pub use transfer::*;
pub use window::*;
