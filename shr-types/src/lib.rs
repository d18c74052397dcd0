//! Общие типы формата SHR: заголовок файла, заголовок свипа, ошибки.

pub mod amplitude;
pub mod error;
pub mod field;
pub mod header;
pub mod sweep;

pub use amplitude::*;
pub use error::*;
pub use field::*;
pub use header::*;
pub use sweep::*;
