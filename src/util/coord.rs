use crate::util::error::GridHashError;
use geo_types::Point;

/// A longitude/latitude pair in WGS84 degrees.
pub trait Coordinate {
    fn lon(&self) -> f64;
    fn lat(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn lon(&self) -> f64 { self.0 }
    fn lat(&self) -> f64 { self.1 }
}

impl Coordinate for Point<f64> {
    fn lon(&self) -> f64 { self.x() }
    fn lat(&self) -> f64 { self.y() }
}

/// Wraps a longitude into `[-180, 180)`.
pub fn normalize_lon(lon: f64) -> f64 {
    if (-180.0..180.0).contains(&lon) {
        // -0.0 becomes 0.0
        return lon + 0.0;
    }
    let mut wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped >= 180.0 {
        wrapped -= 360.0;
    }
    wrapped + 0.0
}

/// Clamps a latitude into `[-90, 90]`.
pub fn normalize_lat(lat: f64) -> f64 {
    lat.clamp(-90.0, 90.0) + 0.0
}

/// Normalizes both axes, rejecting NaN and infinite input.
pub fn normalize<C: Coordinate>(coord: &C) -> Result<(f64, f64), GridHashError> {
    let (lon, lat) = (coord.lon(), coord.lat());
    if !lon.is_finite() || !lat.is_finite() {
        log::warn!("Rejecting point with non-finite coordinates ({}, {})", lon, lat);
        return Err(GridHashError::InvalidCoordinate { lon, lat });
    }
    Ok((normalize_lon(lon), normalize_lat(lat)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lon_in_range_untouched() {
        assert_eq!(normalize_lon(0.0), 0.0);
        assert_eq!(normalize_lon(-180.0), -180.0);
        assert_eq!(normalize_lon(179.5), 179.5);
    }

    #[test]
    fn test_normalize_lon_wraps() {
        assert_eq!(normalize_lon(180.0), -180.0);
        assert_eq!(normalize_lon(190.0), -170.0);
        assert_eq!(normalize_lon(-190.0), 170.0);
        assert_eq!(normalize_lon(540.0), -180.0);
        assert!((normalize_lon(725.5) - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_lon_negative_zero() {
        assert!(normalize_lon(-0.0).is_sign_positive());
    }

    #[test]
    fn test_normalize_lat_clamps() {
        assert_eq!(normalize_lat(95.0), 90.0);
        assert_eq!(normalize_lat(-100.0), -90.0);
        assert_eq!(normalize_lat(45.0), 45.0);
    }

    #[test]
    fn test_normalize_rejects_non_finite() {
        let result = normalize(&(f64::NAN, 10.0));
        assert!(matches!(result, Err(GridHashError::InvalidCoordinate { .. })));

        let result = normalize(&(10.0, f64::INFINITY));
        assert!(result.is_err());
    }

    #[test]
    fn test_coordinate_trait_tuple_and_point() -> Result<(), GridHashError> {
        let from_tuple = normalize(&(200.0, 12.0))?;
        let from_point = normalize(&Point::new(200.0, 12.0))?;

        assert_eq!(from_tuple, from_point);
        assert_eq!(from_tuple, (-160.0, 12.0));
        Ok(())
    }
}
