#![deny(warnings)]
#![deny(rust_2018_idioms)]

mod quality;
mod statistics;
mod validator;

pub use quality::*;
pub use statistics::*;
pub use validator::*;
