mod client;
mod error;
mod row;
mod types;

pub use client::*;
pub use error::*;
pub use row::*;
pub use types::*;
