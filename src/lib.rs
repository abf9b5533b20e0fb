pub mod calendar;
pub mod config;
pub mod error;
pub mod grid;
pub mod holidays;
pub mod range;
pub mod render;
pub mod session;
pub mod symbols;

pub use error::{Error, ErrorKind, Result};
