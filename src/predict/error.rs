use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("TLE directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid TLE format in {file}: {message}")]
    InvalidTle { file: String, message: String },
    #[error("Propagation error for {satellite}: {message}")]
    Propagation { satellite: String, message: String },
    #[error("Ephemeris for {satellite} returned {actual} samples, expected {expected}")]
    SeriesLength {
        satellite: String,
        expected: usize,
        actual: usize,
    },
    #[error("No satellites loaded")]
    NoSatellites,
}
