//! 매매일지 도메인 모델.

mod entry;
mod settings;

pub use entry::*;
pub use settings::*;
