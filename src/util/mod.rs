pub mod coord;
pub mod error;

pub use coord::{Coordinate, normalize, normalize_lat, normalize_lon};
pub use error::GridHashError;
