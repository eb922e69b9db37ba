use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlmanacError {
    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] ureq::Error),

    #[error("Invalid configuration file: {0}")]
    InvalidConfig(#[from] toml::de::Error),

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid start instant: {0}")]
    InvalidStartTime(String),

    #[error("Invalid observer location: {0}")]
    InvalidLocation(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Data file not found at: {0}")]
    DataFileNotFound(String),

    #[error("Base dir creation error for the data cache: {0}")]
    UnableToCreateBaseDir(String),

    #[error("Error during the nom parsing: {0}")]
    NomParsingError(String),

    #[error("Unsupported DAF binary format: {0}")]
    UnsupportedBinaryFormat(String),

    #[error("Invalid SPK data type: {0}")]
    InvalidSpkDataType(i32),

    #[error("Body {0} is not available in the ephemeris")]
    EphemerisBodyNotFound(i32),

    #[error("Epoch {et} (ET seconds) is outside the ephemeris coverage of body {body}")]
    EpochOutOfRange { body: i32, et: f64 },

    #[error("Unknown planet name: {0}")]
    UnknownPlanet(String),

    #[error("Star HIP {0} not found in the catalog")]
    StarNotFound(u32),

    #[error("Minor planet {0} not found in the orbital elements catalog")]
    MinorPlanetNotFound(String),

    #[error("Catalog parsing error at line {line}: {reason}")]
    CatalogParse { line: usize, reason: String },

    #[error("Kepler equation did not converge (M = {mean_anomaly}, e = {eccentricity})")]
    KeplerNoConvergence {
        mean_anomaly: f64,
        eccentricity: f64,
    },

    #[error("Only elliptic orbits are supported (e = {0})")]
    UnsupportedEccentricity(f64),

    #[error("No altitude maximum found for {0} inside the window")]
    NoAltitudeMaximum(String),
}

impl PartialEq for AlmanacError {
    fn eq(&self, other: &Self) -> bool {
        use AlmanacError::*;
        match (self, other) {
            // not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,
            (UreqHttpError(_), UreqHttpError(_)) => true,
            (InvalidConfig(_), InvalidConfig(_)) => true,

            (InvalidTimezone(a), InvalidTimezone(b)) => a == b,
            (InvalidStartTime(a), InvalidStartTime(b)) => a == b,
            (InvalidLocation(a), InvalidLocation(b)) => a == b,
            (InvalidSetting(a), InvalidSetting(b)) => a == b,
            (DataFileNotFound(a), DataFileNotFound(b)) => a == b,
            (UnableToCreateBaseDir(a), UnableToCreateBaseDir(b)) => a == b,
            (NomParsingError(a), NomParsingError(b)) => a == b,
            (UnsupportedBinaryFormat(a), UnsupportedBinaryFormat(b)) => a == b,
            (InvalidSpkDataType(a), InvalidSpkDataType(b)) => a == b,
            (EphemerisBodyNotFound(a), EphemerisBodyNotFound(b)) => a == b,
            (
                EpochOutOfRange { body: a, et: x },
                EpochOutOfRange { body: b, et: y },
            ) => a == b && x == y,
            (UnknownPlanet(a), UnknownPlanet(b)) => a == b,
            (StarNotFound(a), StarNotFound(b)) => a == b,
            (MinorPlanetNotFound(a), MinorPlanetNotFound(b)) => a == b,
            (
                CatalogParse { line: a, reason: x },
                CatalogParse { line: b, reason: y },
            ) => a == b && x == y,
            (
                KeplerNoConvergence {
                    mean_anomaly: a,
                    eccentricity: x,
                },
                KeplerNoConvergence {
                    mean_anomaly: b,
                    eccentricity: y,
                },
            ) => a == b && x == y,
            (UnsupportedEccentricity(a), UnsupportedEccentricity(b)) => a == b,
            (NoAltitudeMaximum(a), NoAltitudeMaximum(b)) => a == b,

            _ => false,
        }
    }
}

impl<E: std::fmt::Debug> From<nom::Err<E>> for AlmanacError {
    fn from(err: nom::Err<E>) -> Self {
        AlmanacError::NomParsingError(format!("{err:?}"))
    }
}
