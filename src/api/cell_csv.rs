use crate::api::cell::GridCell;
use crate::api::hash_type::{CellHasher, GeoHashType};
use crate::util::error::GridHashError;
use geo::Centroid;
use geo_types::{Geometry, Point};
use geojson::GeoJson;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use wkt::Wkt;

/// For the type of geometry source in the file
enum SourceIndices {
    Geometry(usize),
    Coordinates { lon_idx: usize, lat_idx: usize },
}

/// Output format for cell polygon geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryFormat {
    /// Well-Known Text format (e.g., "POLYGON((...))")
    Wkt,
    /// GeoJSON format
    GeoJson,
}

/// Specifies how to extract location data from CSV rows.
#[derive(Debug, Clone)]
pub enum CoordinateSource {
    /// A single column containing WKT or GeoJSON geometry
    GeometryColumn(String),
    /// Separate longitude and latitude columns
    CoordinateColumns { lon_column: String, lat_column: String },
}

/// Configuration for tagging CSV rows with grid cells.
#[derive(Debug, Clone)]
pub struct CsvCellConfig {
    pub source: CoordinateSource,
    pub exclude_columns: Vec<String>,
    pub hash_type: GeoHashType,
    pub precision: i32,
    pub include_cell_geometry: Option<GeometryFormat>,
}

impl CsvCellConfig {
    /// Create config for a CSV with a geometry column (WKT or GeoJSON).
    ///
    /// # Example
    /// ```
    /// use gridhash_rs::{CsvCellConfig, GeoHashType};
    ///
    /// let config = CsvCellConfig::new("geometry", GeoHashType::Maptile, 12);
    /// ```
    pub fn new(geometry_column: impl Into<String>, hash_type: GeoHashType, precision: i32) -> Self {
        Self {
            source: CoordinateSource::GeometryColumn(geometry_column.into()),
            exclude_columns: Vec::new(),
            hash_type,
            precision,
            include_cell_geometry: None,
        }
    }

    /// Create config for a CSV with separate longitude/latitude columns.
    ///
    /// # Example
    /// ```
    /// use gridhash_rs::{CsvCellConfig, GeoHashType};
    ///
    /// let config = CsvCellConfig::from_coords("Longitude", "Latitude", GeoHashType::Pluscode, 10);
    /// ```
    pub fn from_coords(
        lon_column: impl Into<String>,
        lat_column: impl Into<String>,
        hash_type: GeoHashType,
        precision: i32,
    ) -> Self {
        Self {
            source: CoordinateSource::CoordinateColumns {
                lon_column: lon_column.into(),
                lat_column: lat_column.into(),
            },
            exclude_columns: Vec::new(),
            hash_type,
            precision,
            include_cell_geometry: None,
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    /// Include cell polygon geometry in output.
    pub fn with_cell_geometry(mut self, format: GeometryFormat) -> Self {
        self.include_cell_geometry = Some(format);
        self
    }
}

pub trait CsvToCells {
    fn to_cell_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvCellConfig,
    ) -> Result<(), GridHashError>;
}

impl<P: AsRef<Path>> CsvToCells for P {
    fn to_cell_csv(
        &self,
        output_path: impl AsRef<Path>,
        config: &CsvCellConfig,
    ) -> Result<(), GridHashError> {
        csv_to_cell_csv(self, output_path, config)
    }
}

fn parse_geometry(s: &str) -> Result<Geometry<f64>, GridHashError> {
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        parse_geojson(trimmed)
    } else {
        parse_wkt(trimmed)
    }
}

fn parse_geojson(s: &str) -> Result<Geometry<f64>, GridHashError> {
    let geojson: GeoJson = s
        .parse()
        .map_err(|e: geojson::Error| GridHashError::GeometryParseError(e.to_string()))?;

    match geojson {
        GeoJson::Geometry(geom) => {
            Geometry::try_from(geom).map_err(|e| GridHashError::GeometryParseError(e.to_string()))
        }
        GeoJson::Feature(feat) => feat
            .geometry
            .ok_or_else(|| GridHashError::GeometryParseError("Feature has no geometry".to_string()))
            .and_then(|g| {
                Geometry::try_from(g).map_err(|e| GridHashError::GeometryParseError(e.to_string()))
            }),
        GeoJson::FeatureCollection(_) => Err(GridHashError::GeometryParseError(
            "FeatureCollection not supported, use individual geometries".to_string(),
        )),
    }
}

fn parse_wkt(s: &str) -> Result<Geometry<f64>, GridHashError> {
    let wkt: Wkt<f64> =
        Wkt::from_str(s).map_err(|e| GridHashError::GeometryParseError(e.to_string()))?;

    wkt.try_into().map_err(|_| {
        GridHashError::GeometryParseError("Failed to convert WKT to geometry".to_string())
    })
}

fn polygon_to_wkt(polygon: &geo_types::Polygon<f64>) -> String {
    use wkt::ToWkt;
    polygon.wkt_string()
}

fn polygon_to_geojson(polygon: &geo_types::Polygon<f64>) -> String {
    let geom = geojson::Geometry::from(polygon);
    geom.to_string()
}

/// Points standing in for a geometry: points as-is, everything else by centroid.
fn geometry_points(geom: Geometry<f64>) -> Result<Vec<Point<f64>>, GridHashError> {
    match geom {
        Geometry::Point(pt) => Ok(vec![pt]),
        Geometry::MultiPoint(mp) => Ok(mp.0),
        Geometry::LineString(line) => Ok(line.centroid().into_iter().collect()),
        Geometry::MultiLineString(mls) => Ok(mls.centroid().into_iter().collect()),
        Geometry::Polygon(poly) => Ok(poly.centroid().into_iter().collect()),
        Geometry::MultiPolygon(mp) => Ok(mp.0.iter().filter_map(|p| p.centroid()).collect()),
        Geometry::GeometryCollection(gc) => {
            let mut points = Vec::new();
            for g in gc.0 {
                points.extend(geometry_points(g)?);
            }
            Ok(points)
        }
        _ => Err(GridHashError::GeometryParseError(
            "Unsupported geometry type".to_string(),
        )),
    }
}

fn parse_coordinate(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, GridHashError> {
    let value = record
        .get(idx)
        .ok_or_else(|| GridHashError::CsvError(format!("Missing {} column at index {}", name, idx)))?
        .trim();
    value
        .parse()
        .map_err(|_| GridHashError::CsvError(format!("Invalid {}: '{}'", name, value)))
}

/// Converts a CSV file with geometry or coordinate columns to a CSV file with cell hashes.
///
/// Each distinct cell a row touches produces one output row, led by `cell_hash`,
/// `cell_key` and (optionally) `cell_geometry`. Streams output to minimize memory
/// usage for large files.
///
/// # Example with coordinate columns
///
/// ```no_run
/// use gridhash_rs::{csv_to_cell_csv, CsvCellConfig, GeoHashType, GeometryFormat};
///
/// let config = CsvCellConfig::from_coords("Longitude", "Latitude", GeoHashType::Maptile, 14)
///     .with_cell_geometry(GeometryFormat::Wkt);
///
/// csv_to_cell_csv("bus_stops.csv", "output.csv", &config).unwrap();
/// ```
pub fn csv_to_cell_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &CsvCellConfig,
) -> Result<(), GridHashError> {
    config.hash_type.validate_precision(config.precision)?;

    let file = File::open(csv_path).map_err(|e| GridHashError::CsvError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| GridHashError::CsvError(e.to_string()))?
        .clone();

    // Determine which columns to exclude based on source type
    let (source_indices, mut exclude_indices) = match &config.source {
        CoordinateSource::GeometryColumn(col) => {
            let idx = headers.iter().position(|h| h == col).ok_or_else(|| {
                GridHashError::CsvError(format!("Geometry column '{}' not found", col))
            })?;
            (SourceIndices::Geometry(idx), HashSet::from([idx]))
        }
        CoordinateSource::CoordinateColumns {
            lon_column,
            lat_column,
        } => {
            let lon_idx = headers.iter().position(|h| h == lon_column).ok_or_else(|| {
                GridHashError::CsvError(format!("Longitude column '{}' not found", lon_column))
            })?;
            let lat_idx = headers.iter().position(|h| h == lat_column).ok_or_else(|| {
                GridHashError::CsvError(format!("Latitude column '{}' not found", lat_column))
            })?;
            (
                SourceIndices::Coordinates { lon_idx, lat_idx },
                HashSet::from([lon_idx, lat_idx]),
            )
        }
    };

    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name) {
            exclude_indices.insert(idx);
        }
    }

    let out_file = File::create(output_path).map_err(|e| GridHashError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec!["cell_hash", "cell_key"];
    if config.include_cell_geometry.is_some() {
        header_row.push("cell_geometry");
    }
    for (i, h) in headers.iter().enumerate() {
        if !exclude_indices.contains(&i) {
            header_row.push(h);
        }
    }
    writer
        .write_record(&header_row)
        .map_err(|e| GridHashError::CsvError(e.to_string()))?;

    let mut rows_read = 0usize;
    let mut rows_written = 0usize;
    for result in reader.records() {
        let record = result.map_err(|e| GridHashError::CsvError(e.to_string()))?;
        rows_read += 1;

        let points = match &source_indices {
            SourceIndices::Geometry(idx) => {
                let geom_str = record.get(*idx).ok_or_else(|| {
                    GridHashError::CsvError(format!("Missing geometry column at index {}", idx))
                })?;
                geometry_points(parse_geometry(geom_str)?)?
            }
            SourceIndices::Coordinates { lon_idx, lat_idx } => {
                let lon = parse_coordinate(&record, *lon_idx, "longitude")?;
                let lat = parse_coordinate(&record, *lat_idx, "latitude")?;
                vec![Point::new(lon, lat)]
            }
        };

        let mut seen: HashSet<u64> = HashSet::with_capacity(points.len());
        for pt in points {
            let hash = config.hash_type.encode(pt.x(), pt.y(), config.precision)?;
            if !seen.insert(hash) {
                continue;
            }
            let cell = GridCell::from_hash(hash, config.hash_type)?;

            let mut row: Vec<String> = vec![cell.hash.to_string(), cell.key.clone()];

            if let Some(format) = config.include_cell_geometry {
                let polygon = cell.to_polygon();
                let geom_str = match format {
                    GeometryFormat::Wkt => polygon_to_wkt(&polygon),
                    GeometryFormat::GeoJson => polygon_to_geojson(&polygon),
                };
                row.push(geom_str);
            }

            for (i, field) in record.iter().enumerate() {
                if !exclude_indices.contains(&i) {
                    row.push(field.to_string());
                }
            }
            writer
                .write_record(&row)
                .map_err(|e| GridHashError::CsvError(e.to_string()))?;
            rows_written += 1;
        }
    }

    writer
        .flush()
        .map_err(|e| GridHashError::CsvError(e.to_string()))?;

    log::debug!(
        "Tagged {} rows into {} {} cell rows at precision {}",
        rows_read,
        rows_written,
        config.hash_type,
        config.precision
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_input(lines: &[&str]) -> Result<(tempfile::TempDir, std::path::PathBuf), GridHashError> {
        let dir = tempdir().map_err(|e| GridHashError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("input.csv");
        let mut file = File::create(&csv_path).map_err(|e| GridHashError::IoError(e.to_string()))?;
        for line in lines {
            writeln!(file, "{}", line).map_err(|e| GridHashError::IoError(e.to_string()))?;
        }
        Ok((dir, csv_path))
    }

    fn read_output(path: &Path) -> Result<Vec<csv::StringRecord>, GridHashError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| GridHashError::CsvError(e.to_string()))?;
        let mut rows = vec![reader.headers().map_err(|e| GridHashError::CsvError(e.to_string()))?.clone()];
        for record in reader.records() {
            rows.push(record.map_err(|e| GridHashError::CsvError(e.to_string()))?);
        }
        Ok(rows)
    }

    #[test]
    fn test_parse_geojson_point() -> Result<(), GridHashError> {
        let json = r#"{"type":"Point","coordinates":[-0.1,51.5]}"#;
        let points = geometry_points(parse_geometry(json)?)?;
        assert_eq!(points.len(), 1);
        assert!((points[0].x() - (-0.1)).abs() < 0.001);
        assert!((points[0].y() - 51.5).abs() < 0.001);
        Ok(())
    }

    #[test]
    fn test_parse_wkt_multipoint() -> Result<(), GridHashError> {
        let points = geometry_points(parse_geometry("MULTIPOINT((-0.1 51.5),(2.35 48.85))")?)?;
        assert_eq!(points.len(), 2);
        Ok(())
    }

    #[test]
    fn test_polygon_uses_centroid() -> Result<(), GridHashError> {
        let points = geometry_points(parse_geometry("POLYGON((0 0, 2 0, 2 2, 0 2, 0 0))")?)?;
        assert_eq!(points, vec![Point::new(1.0, 1.0)]);
        Ok(())
    }

    #[test]
    fn test_invalid_geometry() {
        assert!(parse_geometry("NOT A GEOMETRY").is_err());
        assert!(parse_geometry(r#"{"type":"FeatureCollection","features":[]}"#).is_err());
    }

    #[test]
    fn test_csv_from_coords() -> Result<(), GridHashError> {
        let (dir, csv_path) = write_input(&[
            "ID,Longitude,Latitude,Description",
            "1,13.405,52.52,Berlin",
            "2,-2.58302,51.44827,Bristol Temple Meads",
        ])?;
        let output_path = dir.path().join("output.csv");

        let config = CsvCellConfig::from_coords("Longitude", "Latitude", GeoHashType::Maptile, 10);
        csv_to_cell_csv(&csv_path, &output_path, &config)?;

        let rows = read_output(&output_path)?;
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0].iter().collect::<Vec<_>>(),
            vec!["cell_hash", "cell_key", "ID", "Description"]
        );
        assert_eq!(&rows[1][1], "10/550/335");
        assert_eq!(&rows[1][3], "Berlin");
        let hash: u64 = rows[1][0].parse().map_err(|_| GridHashError::CsvError("hash".into()))?;
        assert_eq!(hash, GeoHashType::Maptile.encode(13.405, 52.52, 10)?);
        Ok(())
    }

    #[test]
    fn test_csv_geometry_column_with_cell_geometry() -> Result<(), GridHashError> {
        let (dir, csv_path) = write_input(&[
            "ASSET_ID,TYPE,geometry",
            "CDT123,Pipe,\"POINT(-0.12 51.5)\"",
            "CDT124,Valve,\"{\"\"type\"\":\"\"Point\"\",\"\"coordinates\"\":[-0.1,51.5]}\"",
        ])?;
        let output_path = dir.path().join("output.csv");

        let config = CsvCellConfig::new("geometry", GeoHashType::Pluscode, 10)
            .exclude(vec!["TYPE".into()])
            .with_cell_geometry(GeometryFormat::Wkt);
        csv_path.to_cell_csv(&output_path, &config)?;

        let rows = read_output(&output_path)?;
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0].iter().collect::<Vec<_>>(),
            vec!["cell_hash", "cell_key", "cell_geometry", "ASSET_ID"]
        );
        assert_eq!(&rows[1][1], "9C3XGV2J+22");
        assert!(rows[1][2].starts_with("POLYGON"));
        Ok(())
    }

    #[test]
    fn test_csv_multipoint_in_one_cell_written_once() -> Result<(), GridHashError> {
        let (dir, csv_path) = write_input(&[
            "id,geometry",
            "1,\"MULTIPOINT((8.1 47.1),(8.2 47.2),(-0.12 51.5))\"",
        ])?;
        let output_path = dir.path().join("output.csv");

        let config = CsvCellConfig::new("geometry", GeoHashType::Pluscode, 4)
            .with_cell_geometry(GeometryFormat::GeoJson);
        csv_to_cell_csv(&csv_path, &output_path, &config)?;

        let rows = read_output(&output_path)?;
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[1][1], "8FVC0000+");
        assert_eq!(&rows[2][1], "9C3X0000+");
        assert!(rows[1][2].contains("Polygon"));
        Ok(())
    }

    #[test]
    fn test_csv_missing_column() -> Result<(), GridHashError> {
        let (dir, csv_path) = write_input(&["a,b", "1,2"])?;
        let output_path = dir.path().join("output.csv");

        let config = CsvCellConfig::from_coords("lon", "lat", GeoHashType::Maptile, 3);
        let result = csv_to_cell_csv(&csv_path, &output_path, &config);
        assert!(matches!(result, Err(GridHashError::CsvError(_))));
        Ok(())
    }

    #[test]
    fn test_csv_invalid_precision_fails_before_reading() {
        let config = CsvCellConfig::from_coords("lon", "lat", GeoHashType::Pluscode, 7);
        let result = csv_to_cell_csv("does-not-exist.csv", "out.csv", &config);
        assert!(matches!(result, Err(GridHashError::InvalidPrecision { .. })));
    }

    #[test]
    fn test_csv_bad_coordinate() -> Result<(), GridHashError> {
        let (dir, csv_path) = write_input(&["lon,lat", "abc,51.5"])?;
        let output_path = dir.path().join("output.csv");

        let config = CsvCellConfig::from_coords("lon", "lat", GeoHashType::Maptile, 3);
        let result = csv_to_cell_csv(&csv_path, &output_path, &config);
        assert!(matches!(result, Err(GridHashError::CsvError(_))));
        Ok(())
    }
}
