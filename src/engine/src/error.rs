use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to load settings"))]
    Settings {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: config::ConfigError,
    },
    #[snafu(display("Synthetic generation failed"))]
    Generation {
        #[snafu(implicit)]
        location: Location,
        source: synthesis::Error,
    },
    #[snafu(display("Density grid could not be built"))]
    Density {
        #[snafu(implicit)]
        location: Location,
        source: density::Error,
    },
    #[snafu(display("Analysis task did not complete"))]
    Join {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: tokio::task::JoinError,
    },
    #[snafu(display("Failed to serialize output"))]
    Serialize {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: serde_json::Error,
    },
}
