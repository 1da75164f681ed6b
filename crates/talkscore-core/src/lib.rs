#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod text;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use types::{Category, CategoryCounts, CategoryScores, ClassificationMethod};
