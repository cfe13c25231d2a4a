use crate::core::bounds::CellBounds;
use crate::core::olc::{LocationCodeProvider, OpenLocationCode};
use crate::core::{pluscode, tile};
use crate::util::error::GridHashError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The operations every cell hashing scheme provides.
///
/// Implementations are stateless and can be shared freely across threads.
pub trait CellHasher: Send + Sync {
    /// Hashes a longitude/latitude into the cell of the given precision.
    fn encode(&self, lon: f64, lat: f64, precision: i32) -> Result<u64, GridHashError>;
    /// Human readable identifier of the cell a hash refers to.
    fn decode_to_key(&self, hash: u64) -> Result<String, GridHashError>;
    /// Geographic extent of the cell a hash refers to.
    fn decode_to_bounds(&self, hash: u64) -> Result<CellBounds, GridHashError>;
    /// Checks that a precision is usable with this scheme.
    fn validate_precision(&self, precision: i32) -> Result<(), GridHashError>;
}

/// Web-Mercator map tile hashing, precision is the zoom level.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaptileHasher;

impl CellHasher for MaptileHasher {
    fn encode(&self, lon: f64, lat: f64, precision: i32) -> Result<u64, GridHashError> {
        tile::encode(lon, lat, precision)
    }

    fn decode_to_key(&self, hash: u64) -> Result<String, GridHashError> {
        tile::decode_to_key(hash)
    }

    fn decode_to_bounds(&self, hash: u64) -> Result<CellBounds, GridHashError> {
        tile::decode_to_bounds(hash)
    }

    fn validate_precision(&self, precision: i32) -> Result<(), GridHashError> {
        tile::validate_precision(precision)
    }
}

/// Plus code hashing, precision is the code length.
#[derive(Debug, Clone, Copy, Default)]
pub struct PluscodeHasher<P = OpenLocationCode> {
    provider: P,
}

impl<P: LocationCodeProvider> PluscodeHasher<P> {
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: LocationCodeProvider> CellHasher for PluscodeHasher<P> {
    fn encode(&self, lon: f64, lat: f64, precision: i32) -> Result<u64, GridHashError> {
        pluscode::encode_with(&self.provider, lon, lat, precision)
    }

    fn decode_to_key(&self, hash: u64) -> Result<String, GridHashError> {
        pluscode::decode_to_key(hash)
    }

    fn decode_to_bounds(&self, hash: u64) -> Result<CellBounds, GridHashError> {
        pluscode::decode_to_bounds_with(&self.provider, hash)
    }

    fn validate_precision(&self, precision: i32) -> Result<(), GridHashError> {
        pluscode::validate_precision(precision)
    }
}

/// Selects which cell hashing scheme a grid uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoHashType {
    /// Slippy-map tiles (zoom 0-26)
    #[default]
    Maptile,
    /// Plus codes (length 4-14)
    Pluscode,
}

impl GeoHashType {
    pub const ALL: [GeoHashType; 2] = [GeoHashType::Maptile, GeoHashType::Pluscode];

    pub fn name(&self) -> &'static str {
        match self {
            GeoHashType::Maptile => "maptile",
            GeoHashType::Pluscode => "pluscode",
        }
    }
}

impl CellHasher for GeoHashType {
    fn encode(&self, lon: f64, lat: f64, precision: i32) -> Result<u64, GridHashError> {
        match self {
            GeoHashType::Maptile => tile::encode(lon, lat, precision),
            GeoHashType::Pluscode => pluscode::encode(lon, lat, precision),
        }
    }

    fn decode_to_key(&self, hash: u64) -> Result<String, GridHashError> {
        match self {
            GeoHashType::Maptile => tile::decode_to_key(hash),
            GeoHashType::Pluscode => pluscode::decode_to_key(hash),
        }
    }

    fn decode_to_bounds(&self, hash: u64) -> Result<CellBounds, GridHashError> {
        match self {
            GeoHashType::Maptile => tile::decode_to_bounds(hash),
            GeoHashType::Pluscode => pluscode::decode_to_bounds(hash),
        }
    }

    fn validate_precision(&self, precision: i32) -> Result<(), GridHashError> {
        match self {
            GeoHashType::Maptile => tile::validate_precision(precision),
            GeoHashType::Pluscode => pluscode::validate_precision(precision),
        }
    }
}

impl fmt::Display for GeoHashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeoHashType {
    type Err = GridHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeoHashType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| GridHashError::UnknownHashType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() -> Result<(), GridHashError> {
        assert_eq!("maptile".parse::<GeoHashType>()?, GeoHashType::Maptile);
        assert_eq!("pluscode".parse::<GeoHashType>()?, GeoHashType::Pluscode);
        assert_eq!(
            "geohash".parse::<GeoHashType>(),
            Err(GridHashError::UnknownHashType("geohash".to_string()))
        );
        Ok(())
    }

    #[test]
    fn test_display_matches_serde() -> Result<(), serde_json::Error> {
        for hash_type in GeoHashType::ALL {
            let json = serde_json::to_string(&hash_type)?;
            assert_eq!(json, format!("\"{}\"", hash_type));
        }
        Ok(())
    }

    #[test]
    fn test_dispatch_matches_codecs() -> Result<(), GridHashError> {
        let (lon, lat) = (-2.248, 53.481);

        let hash = GeoHashType::Maptile.encode(lon, lat, 12)?;
        assert_eq!(hash, tile::encode(lon, lat, 12)?);
        assert_eq!(GeoHashType::Maptile.decode_to_key(hash)?, tile::decode_to_key(hash)?);

        let hash = GeoHashType::Pluscode.encode(lon, lat, 10)?;
        assert_eq!(hash, pluscode::encode(lon, lat, 10)?);
        assert_eq!(
            GeoHashType::Pluscode.decode_to_bounds(hash)?,
            pluscode::decode_to_bounds(hash)?
        );
        Ok(())
    }

    #[test]
    fn test_validate_precision_per_type() {
        assert!(GeoHashType::Maptile.validate_precision(5).is_ok());
        assert!(GeoHashType::Pluscode.validate_precision(5).is_err());
        assert!(GeoHashType::Maptile.validate_precision(27).is_err());
        assert!(GeoHashType::Pluscode.validate_precision(14).is_ok());
    }

    #[test]
    fn test_hashers_as_trait_objects() -> Result<(), GridHashError> {
        let hashers: Vec<Box<dyn CellHasher>> = vec![
            Box::new(MaptileHasher),
            Box::new(PluscodeHasher::with_provider(OpenLocationCode)),
        ];
        for hasher in &hashers {
            let hash = hasher.encode(8.0000625, 47.0000625, 8)?;
            let bounds = hasher.decode_to_bounds(hash)?;
            assert!(bounds.contains_point(8.0000625, 47.0000625));
            assert!(!hasher.decode_to_key(hash)?.is_empty());
        }
        Ok(())
    }
}
