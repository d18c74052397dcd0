pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod fits;
pub mod metrics;
pub mod tabular;

pub use batch::*;
pub use config::*;
pub use convert::*;
pub use error::*;
pub use metrics::*;
