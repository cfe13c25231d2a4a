pub mod cell;
pub mod cell_csv;
pub mod geo_grid;
pub mod hash_type;

pub use cell::GridCell;
pub use cell_csv::{
    CoordinateSource, CsvCellConfig, CsvToCells, GeometryFormat, csv_to_cell_csv,
};
pub use geo_grid::{
    GeoGridAggregator, GeoGridBucket, GeoGridConfig, cell_values, suggest_shard_size,
};
pub use hash_type::{CellHasher, GeoHashType, MaptileHasher, PluscodeHasher};
