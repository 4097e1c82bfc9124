pub mod config;
mod entry;
mod error;
mod sample;
mod series;

pub use entry::*;
pub use error::*;
pub use sample::*;
pub use series::*;
