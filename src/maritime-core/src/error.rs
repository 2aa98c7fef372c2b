use crate::VesselType;
use chrono::{DateTime, Utc};
use snafu::{Location, Snafu};

/// Raised synchronously before any sampling begins.
#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum ConfigurationError {
    #[snafu(display(
        "Invalid bounding box, north '{north}', south '{south}', east '{east}', west '{west}'"
    ))]
    InvalidBoundingBox {
        #[snafu(implicit)]
        location: Location,
        north: f64,
        south: f64,
        east: f64,
        west: f64,
    },
    #[snafu(display("Vessel count target must be positive, got '{value}'"))]
    NonPositiveVesselCount {
        #[snafu(implicit)]
        location: Location,
        value: u32,
    },
    #[snafu(display("Temporal range is empty or inverted, start '{start}', end '{end}'"))]
    InvalidTemporalRange {
        #[snafu(implicit)]
        location: Location,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[snafu(display("Invalid H3 resolution '{value}'"))]
    InvalidResolution {
        #[snafu(implicit)]
        location: Location,
        value: u8,
        #[snafu(source)]
        error: h3o::error::InvalidResolution,
    },
}

/// Missing reference entries. Never returned from a public operation, callers log these and
/// continue with the documented fallback.
#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum ReferenceDataError {
    #[snafu(display("No reference entry for vessel type '{vessel_type}'"))]
    UnknownVesselType {
        #[snafu(implicit)]
        location: Location,
        vessel_type: VesselType,
    },
    #[snafu(display("Destination '{destination}' does not resolve to a known port"))]
    UnresolvableDestination {
        #[snafu(implicit)]
        location: Location,
        destination: String,
    },
}

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum IdentityError {
    #[snafu(display("Failed to parse numeric identity '{value}'"))]
    ParseNumber {
        #[snafu(implicit)]
        location: Location,
        value: String,
        #[snafu(source)]
        error: std::num::ParseIntError,
    },
    #[snafu(display("Call sign was empty"))]
    EmptyCallSign {
        #[snafu(implicit)]
        location: Location,
    },
}
