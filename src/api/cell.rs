use crate::api::hash_type::{CellHasher, GeoHashType};
use crate::core::bounds::CellBounds;
use crate::core::constants::{PADDING_CHAR, SEPARATOR, ZOOM_SHIFT};
use crate::util::coord::Coordinate;
use crate::util::error::GridHashError;
use geo_types::{Point, Polygon};
use serde::Serialize;

/// A single grid cell identified by its hash.
///
/// # Example
///
/// ```
/// use gridhash_rs::{GeoHashType, GridCell};
///
/// # fn main() -> Result<(), gridhash_rs::GridHashError> {
/// let cell = GridCell::from_wgs84(&(13.405, 52.52), GeoHashType::Maptile, 10)?;
/// assert_eq!(cell.key, "10/550/335");
///
/// let restored = GridCell::from_hash(cell.hash, GeoHashType::Maptile)?;
/// assert_eq!(cell, restored);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    /// Integer cell key, usable as an aggregation bucket key
    pub hash: u64,
    /// Readable form of the hash ("zoom/x/y" or a plus code)
    pub key: String,
    /// Scheme the hash was produced with
    pub hash_type: GeoHashType,
    /// Zoom level or code length
    pub precision: i32,
    /// Extent of the cell in WGS84 degrees
    pub bounds: CellBounds,
}

impl GridCell {
    /// Create the cell containing a WGS84 (lon/lat) coordinate
    pub fn from_wgs84(
        coord: &impl Coordinate,
        hash_type: GeoHashType,
        precision: i32,
    ) -> Result<Self, GridHashError> {
        let hash = hash_type.encode(coord.lon(), coord.lat(), precision)?;
        Self::from_hash(hash, hash_type)
    }

    /// Create a cell from a previously computed hash
    pub fn from_hash(hash: u64, hash_type: GeoHashType) -> Result<Self, GridHashError> {
        let key = hash_type.decode_to_key(hash)?;
        let bounds = hash_type.decode_to_bounds(hash)?;
        let precision = match hash_type {
            GeoHashType::Maptile => (hash >> ZOOM_SHIFT) as i32,
            GeoHashType::Pluscode => key
                .chars()
                .filter(|&c| c != SEPARATOR && c != PADDING_CHAR)
                .count() as i32,
        };

        Ok(Self {
            hash,
            key,
            hash_type,
            precision,
            bounds,
        })
    }

    pub fn center(&self) -> Point<f64> {
        self.bounds.center()
    }

    /// Converts this cell to a rectangular polygon in lon/lat.
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.bounds.to_polygon()
    }
}
