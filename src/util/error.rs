use thiserror::Error;

/// Error type for gridhash-rs operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridHashError {
    /// The zoom level passed to the tile encoder is outside 0-26.
    #[error("Invalid zoom level: {0}. Must be between 0 and 26")]
    InvalidZoom(i32),
    /// The precision is not valid for the selected hash type.
    #[error("Invalid {hash_type} aggregation precision of {precision}. {expected}")]
    InvalidPrecision {
        hash_type: &'static str,
        precision: i32,
        expected: &'static str,
    },
    /// The zoom field of a tile hash is outside 0-26.
    #[error("Invalid tile hash {0:#x}: zoom field out of range")]
    InvalidHashZoom(u64),
    /// The x/y indices of a tile hash do not fit the encoded zoom.
    #[error("Invalid tile hash: tile {x}/{y} out of range for zoom {zoom}")]
    InvalidHashTile { zoom: u32, x: u64, y: u64 },
    /// A plus code hash unpacks to a code of impossible length.
    #[error("Invalid plus code hash {hash}: unpacks to {digits} digits")]
    InvalidHash { hash: u64, digits: usize },
    /// A plus code hash of zero carries no digits.
    #[error("Empty plus code hash")]
    EmptyHash,
    /// A character outside the plus code alphabet was found while packing.
    #[error("Character '{0}' is not a valid plus code")]
    InvalidCharacter(char),
    /// A location code string could not be decoded.
    #[error("Invalid location code: {0}")]
    InvalidCode(String),
    /// Longitude or latitude is not a finite number.
    #[error("Invalid coordinate: ({lon}, {lat})")]
    InvalidCoordinate { lon: f64, lat: f64 },
    /// Grid aggregation settings are inconsistent.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    /// The hash type name is not recognised.
    #[error("Unknown hash type: {0}")]
    UnknownHashType(String),
    /// File I/O or serialization error.
    #[error("IO error: {0}")]
    IoError(String),
    /// CSV parsing or reading error.
    #[error("CSV error: {0}")]
    CsvError(String),
    /// Failed to parse geometry from string (GeoJSON or WKT).
    #[error("Geometry parse error: {0}")]
    GeometryParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = GridHashError::InvalidCharacter('A');
        assert_eq!(err.to_string(), "Character 'A' is not a valid plus code");

        let err = GridHashError::InvalidPrecision {
            hash_type: "maptile",
            precision: 27,
            expected: "Must be between 0 and 26.",
        };
        assert_eq!(
            err.to_string(),
            "Invalid maptile aggregation precision of 27. Must be between 0 and 26."
        );
    }
}
