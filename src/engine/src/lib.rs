#![deny(warnings)]
#![deny(rust_2018_idioms)]

mod engine;

pub mod error;
pub mod settings;
pub mod startup;

pub use engine::*;
pub use error::*;
