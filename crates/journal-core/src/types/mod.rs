//! 매매일지 전반에서 사용되는 공통 타입.

mod numeric;
mod time;

pub use numeric::*;
pub use time::*;
