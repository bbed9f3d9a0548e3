mod error;
mod ground_station;
mod oracle;
mod propagation;
mod tle_loader;
mod types;

pub use error::PredictError;
pub use ground_station::GroundStation;
pub use oracle::{EphemerisOracle, Sgp4Oracle};
pub use tle_loader::{TleEntry, TleLoader};
pub use types::SubPoint;
