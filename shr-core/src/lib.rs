//! Библиотека разбора формата SHR
//!
//! Чтение записей свипов анализатора спектра: заголовок файла, заголовки
//! свипов, матрица выборок и производные метаданные (окно записи, ось
//! частот).
//!
//! # Быстрый старт
//!
//! ```no_run
//! use shr_core::ShrFile;
//!
//! let shr = ShrFile::open("recording.shr")?;
//! println!("{} sweeps x {} bins", shr.header.sweep_count, shr.header.sweep_length);
//!
//! if shr.has_sweeps() {
//!     let window = shr.acquisition_window()?;
//!     println!("interval: {} ms", window.sweep_interval_ms);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod binary;
pub mod codec;
pub mod derived;
pub mod format;
pub mod serialization;

pub use binary::*;
pub use codec::*;
pub use derived::*;
pub use format::*;
pub use serialization::*;
pub use shr_types::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
