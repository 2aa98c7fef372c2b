#![deny(warnings)]
#![deny(rust_2018_idioms)]

pub mod error;

mod clusterer;
mod generator;
mod route;
mod sampler;
mod stage;
mod temporal;

pub use clusterer::*;
pub use error::*;
pub use generator::*;
pub use route::*;
pub use sampler::*;
pub use stage::*;
pub use temporal::*;
