//! # gridhash-rs
//!
//! Hashes geo points into grid cells, either Web-Mercator map tiles or plus
//! codes, as a single `u64` that can be used as a grouping key. Every hash
//! decodes back into a readable key and the bounding box of its cell.
//!
//! There are currently three main entry points.
//!
//! ### 1. `GeoHashType` - Hashing a Point
//!
//! ```
//! use gridhash_rs::{CellHasher, GeoHashType};
//!
//! # fn main() -> Result<(), gridhash_rs::GridHashError> {
//! let hash = GeoHashType::Maptile.encode(13.405, 52.52, 10)?;
//! assert_eq!(GeoHashType::Maptile.decode_to_key(hash)?, "10/550/335");
//!
//! let hash = GeoHashType::Pluscode.encode(2.775, 20.375, 6)?;
//! assert_eq!(GeoHashType::Pluscode.decode_to_key(hash)?, "7FG49Q00+");
//! let bounds = GeoHashType::Pluscode.decode_to_bounds(hash)?;
//! assert!(bounds.contains_point(2.775, 20.375));
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `GeoGridConfig` - Counting Points per Cell
//!
//! ```
//! use gridhash_rs::{GeoGridConfig, GeoHashType};
//!
//! # fn main() -> Result<(), gridhash_rs::GridHashError> {
//! let config = GeoGridConfig::from_json(r#"{"type": "maptile", "precision": 8, "size": 3}"#)?;
//! let aggregator = config.build(1)?;
//!
//! let points = [(-0.12, 51.5), (-0.1201, 51.5001), (2.35, 48.85)];
//! let buckets = aggregator.collect(&points)?;
//! assert_eq!(buckets[0].doc_count, 2);
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `CsvToCells` - CSV File Conversion
//!
//! ```no_run
//! use gridhash_rs::{CsvCellConfig, CsvToCells, GeoHashType, GeometryFormat};
//!
//! let config = CsvCellConfig::new("geometry", GeoHashType::Pluscode, 10)
//!     .exclude(vec!["Geo Point".into()])
//!     .with_cell_geometry(GeometryFormat::Wkt);
//!
//! "input.csv".to_cell_csv("output.csv", &config).unwrap();
//! ```
//!

pub mod api;
pub mod core;
pub mod util;

pub use api::{
    CellHasher, CoordinateSource, CsvCellConfig, CsvToCells, GeoGridAggregator, GeoGridBucket,
    GeoGridConfig, GeoHashType, GeometryFormat, GridCell, MaptileHasher, PluscodeHasher,
    cell_values, csv_to_cell_csv, suggest_shard_size,
};
pub use core::{
    CellBounds, LocationCodeProvider, MAX_CODE_LENGTH, MAX_ZOOM, MIN_CODE_LENGTH,
    OpenLocationCode, Tile,
};
pub use util::{Coordinate, GridHashError};

pub use geo_types;
