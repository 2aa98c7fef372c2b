#![deny(warnings)]
#![deny(rust_2018_idioms)]

pub mod error;

mod grid;

pub use error::*;
pub use grid::*;
