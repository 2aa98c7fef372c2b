use maritime_core::ConfigurationError;
use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Invalid density grid configuration"))]
    Configuration {
        #[snafu(implicit)]
        location: Location,
        source: ConfigurationError,
    },
}
