//! Type definitions for orderdash

mod error;
mod order;
mod views;

pub use error::*;
pub use order::*;
pub use views::*;
