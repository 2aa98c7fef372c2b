#![deny(warnings)]
#![deny(rust_2018_idioms)]

mod cache;
mod domain;
mod error;
mod geodesy;
mod hash;
mod mean;

#[cfg(feature = "test")]
mod test_helper;

pub use cache::*;
pub use domain::*;
pub use error::*;
pub use geodesy::*;
pub use hash::*;
pub use mean::*;

#[cfg(feature = "test")]
pub use test_helper::*;
