//! Slippy-map tile hash.
//!
//! Points are projected to Web-Mercator tiles the same way online map tile
//! services address them. A hash packs the zoom level into bits 56..52 and the
//! Morton-interleaved tile indices (x in even bits, y in odd bits) into bits
//! 51..0.

use crate::core::bounds::CellBounds;
use crate::core::constants::{MAX_ZOOM, TILE_MASK, ZOOM_SHIFT};
use crate::core::morton::{deinterleave, interleave};
use crate::util::coord::normalize;
use crate::util::error::GridHashError;
use std::f64::consts::PI;
use std::fmt;

/// A map tile addressed by zoom level and x/y indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile {
    pub zoom: u32,
    pub x: u32,
    pub y: u32,
}

impl Tile {
    pub fn new(zoom: u32, x: u32, y: u32) -> Self {
        Self { zoom, x, y }
    }

    /// The four tiles covering this one at the next zoom level.
    pub fn children(&self) -> [Tile; 4] {
        let (zoom, x, y) = (self.zoom + 1, self.x * 2, self.y * 2);
        [
            Tile::new(zoom, x, y),
            Tile::new(zoom, x + 1, y),
            Tile::new(zoom, x, y + 1),
            Tile::new(zoom, x + 1, y + 1),
        ]
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

fn check_zoom(zoom: i32) -> Result<u32, GridHashError> {
    if !(0..=MAX_ZOOM).contains(&zoom) {
        return Err(GridHashError::InvalidZoom(zoom));
    }
    Ok(zoom as u32)
}

fn clamp_index(value: f64, tiles: u64) -> u32 {
    // f64 -> i64 saturates, so infinities land on the clamp bounds
    (value.floor() as i64).clamp(0, tiles as i64 - 1) as u32
}

/// Converts a longitude/latitude to a hash combining zoom, x and y of the tile.
///
/// Points on the antimeridian, at the poles or beyond the Mercator limits are
/// saturated to the nearest edge tile.
///
/// # Example
/// ```
/// use gridhash_rs::core::tile;
///
/// # fn main() -> Result<(), gridhash_rs::GridHashError> {
/// let hash = tile::encode(13.405, 52.52, 10)?;
/// assert_eq!(tile::decode_to_key(hash)?, "10/550/335");
/// # Ok(())
/// # }
/// ```
pub fn encode(lon: f64, lat: f64, zoom: i32) -> Result<u64, GridHashError> {
    let zoom = check_zoom(zoom)?;
    let (lon, lat) = normalize(&(lon, lat))?;

    let tiles = 1u64 << zoom;
    let n = tiles as f64;

    let x = clamp_index((lon + 180.0) / 360.0 * n, tiles);

    // ln(tan + sec) as asinh(tan): the sum cancels out near the south pole
    let lat_rad = lat.to_radians();
    let y = clamp_index((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n, tiles);

    Ok(pack(zoom, x, y))
}

/// Packs explicit tile indices into a hash.
pub fn encode_tile(tile: Tile) -> Result<u64, GridHashError> {
    let zoom = check_zoom(tile.zoom as i32)?;
    let tiles = 1u64 << zoom;
    if tile.x as u64 >= tiles || tile.y as u64 >= tiles {
        return Err(GridHashError::InvalidHashTile {
            zoom,
            x: tile.x as u64,
            y: tile.y as u64,
        });
    }
    Ok(pack(zoom, tile.x, tile.y))
}

fn pack(zoom: u32, x: u32, y: u32) -> u64 {
    interleave(x, y) | ((zoom as u64) << ZOOM_SHIFT)
}

/// Unpacks a hash into its tile, rejecting hashes this codec never produces.
pub fn decode_tile(hash: u64) -> Result<Tile, GridHashError> {
    let zoom = hash >> ZOOM_SHIFT;
    if zoom > MAX_ZOOM as u64 {
        return Err(GridHashError::InvalidHashZoom(hash));
    }
    let zoom = zoom as u32;

    let tiles = 1u64 << zoom;
    let value = hash & TILE_MASK;
    let x = deinterleave(value);
    let y = deinterleave(value >> 1);
    if x as u64 >= tiles || y as u64 >= tiles {
        return Err(GridHashError::InvalidHashTile {
            zoom,
            x: x as u64,
            y: y as u64,
        });
    }

    Ok(Tile::new(zoom, x, y))
}

/// Formats a hash as `"zoom/x/y"`.
pub fn decode_to_key(hash: u64) -> Result<String, GridHashError> {
    Ok(decode_tile(hash)?.to_string())
}

fn tile_to_lon(x: u32, tiles: f64) -> f64 {
    x as f64 / tiles * 360.0 - 180.0
}

fn tile_to_lat(y: u32, tiles: f64) -> f64 {
    let n = PI - (2.0 * PI * y as f64) / tiles;
    n.sinh().atan().to_degrees()
}

/// Bounding rectangle of the tile a hash refers to.
pub fn decode_to_bounds(hash: u64) -> Result<CellBounds, GridHashError> {
    let tile = decode_tile(hash)?;
    Ok(tile_bounds(&tile))
}

pub(crate) fn tile_bounds(tile: &Tile) -> CellBounds {
    let tiles = 2f64.powi(tile.zoom as i32);

    // y grows southward: y is the north edge, y + 1 the south edge
    CellBounds::new(
        tile_to_lat(tile.y + 1, tiles),
        tile_to_lat(tile.y, tiles),
        tile_to_lon(tile.x, tiles),
        tile_to_lon(tile.x + 1, tiles),
    )
}

/// Validates a user supplied zoom precision.
pub fn validate_precision(precision: i32) -> Result<(), GridHashError> {
    if !(0..=MAX_ZOOM).contains(&precision) {
        return Err(GridHashError::InvalidPrecision {
            hash_type: "maptile",
            precision,
            expected: "Must be between 0 and 26.",
        });
    }
    Ok(())
}
