mod config;
mod density;
mod distribution;
mod identity;
mod quality;
mod reference;
mod report;
mod season;
mod vessel;

pub use config::*;
pub use density::*;
pub use distribution::*;
pub use identity::*;
pub use quality::*;
pub use reference::*;
pub use report::*;
pub use season::*;
pub use vessel::*;
