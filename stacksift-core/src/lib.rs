//! stacksift library exports

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod guided;
pub mod insights;
pub mod search;

pub use error::{Result, StacksiftError};
