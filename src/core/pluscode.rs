//! Plus code hash.
//!
//! A plus code is converted into a base-21 number over the Open Location Code
//! alphabet extended with '0'. Plus codes use base 20 but are padded with '0'
//! when the precision is low; the extra symbol keeps that padding, so the code
//! length survives the round trip through a `u64`.

use crate::core::bounds::CellBounds;
use crate::core::constants::{
    CODE_PRECISION_NORMAL, MAX_CODE_LENGTH, MIN_CODE_LENGTH, PLUSCODE_ALPHABET, PLUSCODE_RADIX,
    SEPARATOR, SEPARATOR_POSITION,
};
use crate::core::olc::{LocationCodeProvider, OpenLocationCode};
use crate::util::coord::normalize;
use crate::util::error::GridHashError;

const NO_DIGIT: i8 = -1;

// ASCII -> alphabet index, -1 for characters outside the alphabet
const ALPHABET_LOOKUP: [i8; 128] = build_lookup();

const fn build_lookup() -> [i8; 128] {
    let mut table = [NO_DIGIT; 128];
    let mut i = 0;
    while i < PLUSCODE_ALPHABET.len() {
        table[PLUSCODE_ALPHABET[i] as usize] = i as i8;
        i += 1;
    }
    table
}

fn digit(ch: char) -> Option<u64> {
    if !ch.is_ascii() {
        return None;
    }
    match ALPHABET_LOOKUP[ch as usize] {
        NO_DIGIT => None,
        d => Some(d as u64),
    }
}

/// Plus code of the given length for a longitude/latitude, using the bundled
/// Open Location Code implementation.
pub fn to_pluscode(lon: f64, lat: f64, code_length: i32) -> Result<String, GridHashError> {
    validate_precision(code_length)?;
    let (lon, lat) = normalize(&(lon, lat))?;
    OpenLocationCode.encode(lat, lon, code_length as usize)
}

/// Converts a longitude/latitude to a plus code hash of the given code length.
///
/// # Example
/// ```
/// use gridhash_rs::core::pluscode;
///
/// # fn main() -> Result<(), gridhash_rs::GridHashError> {
/// let hash = pluscode::encode(2.775, 20.375, 6)?;
/// assert_eq!(pluscode::decode_to_key(hash)?, "7FG49Q00+");
/// # Ok(())
/// # }
/// ```
pub fn encode(lon: f64, lat: f64, code_length: i32) -> Result<u64, GridHashError> {
    encode_with(&OpenLocationCode, lon, lat, code_length)
}

/// Same as [`encode`], with codes produced by `provider`.
pub fn encode_with<P: LocationCodeProvider + ?Sized>(
    provider: &P,
    lon: f64,
    lat: f64,
    code_length: i32,
) -> Result<u64, GridHashError> {
    validate_precision(code_length)?;
    let (lon, lat) = normalize(&(lon, lat))?;
    let code = provider.encode(lat, lon, code_length as usize)?;
    pack_code(&code)
}

/// Packs a plus code into a base-21 number, most significant digit first.
///
/// The separator is skipped; any other character outside the alphabet is an error.
pub fn pack_code(code: &str) -> Result<u64, GridHashError> {
    let mut result = 0u64;
    let mut digits = 0;
    for ch in code.chars() {
        if ch == SEPARATOR {
            continue;
        }
        let value = digit(ch).ok_or(GridHashError::InvalidCharacter(ch))?;
        digits += 1;
        if digits > MAX_CODE_LENGTH {
            return Err(GridHashError::InvalidCode(format!(
                "{code}: longer than {MAX_CODE_LENGTH} digits"
            )));
        }
        result = result * PLUSCODE_RADIX + value;
    }
    Ok(result)
}

/// Decodes a plus code hash back into its code, separator included.
pub fn decode_to_key(hash: u64) -> Result<String, GridHashError> {
    if hash == 0 {
        return Err(GridHashError::EmptyHash);
    }

    let mut chars = Vec::with_capacity(MAX_CODE_LENGTH as usize + 1);
    let mut rest = hash;
    while rest > 0 {
        let value = rest % PLUSCODE_RADIX;
        chars.push(PLUSCODE_ALPHABET[value as usize] as char);
        rest /= PLUSCODE_RADIX;
    }

    let digits = chars.len();
    if digits < SEPARATOR_POSITION || digits > MAX_CODE_LENGTH as usize {
        return Err(GridHashError::InvalidHash { hash, digits });
    }

    chars.reverse();
    chars.insert(SEPARATOR_POSITION, SEPARATOR);
    Ok(chars.into_iter().collect())
}

/// Bounding rectangle of the plus code cell a hash refers to.
pub fn decode_to_bounds(hash: u64) -> Result<CellBounds, GridHashError> {
    decode_to_bounds_with(&OpenLocationCode, hash)
}

/// Same as [`decode_to_bounds`], with codes decoded by `provider`.
pub fn decode_to_bounds_with<P: LocationCodeProvider + ?Sized>(
    provider: &P,
    hash: u64,
) -> Result<CellBounds, GridHashError> {
    let code = decode_to_key(hash)?;
    provider.decode(&code)
}

/// Validates a user supplied code length precision.
pub fn validate_precision(precision: i32) -> Result<(), GridHashError> {
    if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&precision)
        || (precision < CODE_PRECISION_NORMAL && precision % 2 == 1)
    {
        return Err(GridHashError::InvalidPrecision {
            hash_type: "pluscode",
            precision,
            expected: "Must be between 4 and 14, and must be even if less than 8.",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_lookup() {
        assert_eq!(digit('0'), Some(0));
        assert_eq!(digit('2'), Some(1));
        assert_eq!(digit('X'), Some(20));
        assert_eq!(digit('+'), None);
        assert_eq!(digit('A'), None);
        assert_eq!(digit('x'), None);
        assert_eq!(digit('é'), None);
    }

    #[test]
    fn test_pack_known_codes() -> Result<(), GridHashError> {
        assert_eq!(pack_code("8FVC0000+")?, 13_540_545_144);
        assert_eq!(pack_code("8FVC2222+22")?, 5_971_384_696_810);
        assert_eq!(pack_code("7FG49Q00+")?, 11_709_782_154);
        Ok(())
    }

    #[test]
    fn test_pack_rejects_foreign_characters() {
        assert_eq!(pack_code("8FVC2A22+22"), Err(GridHashError::InvalidCharacter('A')));
        assert_eq!(pack_code("8fvc2222+22"), Err(GridHashError::InvalidCharacter('f')));
    }

    #[test]
    fn test_pack_rejects_overlong_codes() {
        assert!(matches!(
            pack_code("8FVC2222+22GCCCC"),
            Err(GridHashError::InvalidCode(_))
        ));
    }

    #[test]
    fn test_max_length_fits_signed_range() -> Result<(), GridHashError> {
        let hash = pack_code("XXXXXXXX+XXXXXX")?;
        assert_eq!(hash, 21u64.pow(14) - 1);
        assert!(hash < i64::MAX as u64);
        assert_eq!(decode_to_key(hash)?, "XXXXXXXX+XXXXXX");
        Ok(())
    }

    #[test]
    fn test_encode_and_key() -> Result<(), GridHashError> {
        let hash = encode(8.0000625, 47.0000625, 4)?;
        assert_eq!(hash, 13_540_545_144);
        assert_eq!(decode_to_key(hash)?, "8FVC0000+");

        let hash = encode(8.0000625, 47.0000625, 11)?;
        assert_eq!(decode_to_key(hash)?, "8FVC2222+22G");
        Ok(())
    }

    #[test]
    fn test_key_keeps_code_length() -> Result<(), GridHashError> {
        let points = [(8.524997, 47.365590), (151.2093, -33.8688), (-74.006, 40.7128), (-180.0, -90.0)];
        for (lon, lat) in points {
            for len in [4, 6, 8, 10, 11, 12, 13, 14] {
                let code = to_pluscode(lon, lat, len)?;
                let key = decode_to_key(encode(lon, lat, len)?)?;
                assert_eq!(key, code);
                assert_eq!(key.len(), code.len());
                assert_eq!(key.find(SEPARATOR), Some(SEPARATOR_POSITION));
            }
        }
        Ok(())
    }

    #[test]
    fn test_bounds_contain_point() -> Result<(), GridHashError> {
        let hash = encode(-0.12, 51.5, 10)?;
        let bounds = decode_to_bounds(hash)?;
        assert!(bounds.contains_point(-0.12, 51.5));
        assert!(bounds.max_lat - bounds.min_lat < 0.0002);

        let coarse = decode_to_bounds(encode(-0.12, 51.5, 4)?)?;
        assert!(coarse.contains(&bounds));
        Ok(())
    }

    #[test]
    fn test_empty_hash() {
        assert_eq!(decode_to_key(0), Err(GridHashError::EmptyHash));
        assert_eq!(decode_to_bounds(0), Err(GridHashError::EmptyHash));
    }

    #[test]
    fn test_short_and_long_hashes_rejected() {
        assert!(matches!(
            decode_to_key(20),
            Err(GridHashError::InvalidHash { hash: 20, digits: 1 })
        ));
        assert!(matches!(
            decode_to_key(u64::MAX),
            Err(GridHashError::InvalidHash { digits: 15, .. })
        ));
    }

    #[test]
    fn test_encode_validates_precision() {
        assert!(matches!(
            encode(0.0, 0.0, 5),
            Err(GridHashError::InvalidPrecision { precision: 5, .. })
        ));
        assert!(encode(0.0, 0.0, 15).is_err());
    }

    #[test]
    fn test_validate_precision() {
        for p in [4, 6, 8, 9, 10, 11, 12, 13, 14] {
            assert!(validate_precision(p).is_ok(), "{p} should be valid");
        }
        for p in [-1, 0, 2, 3, 5, 7, 15] {
            assert!(validate_precision(p).is_err(), "{p} should be invalid");
        }
    }

    struct FixedCode(&'static str);

    impl LocationCodeProvider for FixedCode {
        fn encode(&self, _lat: f64, _lon: f64, _len: usize) -> Result<String, GridHashError> {
            Ok(self.0.to_string())
        }

        fn decode(&self, _code: &str) -> Result<CellBounds, GridHashError> {
            Ok(CellBounds::new(1.0, 2.0, 3.0, 4.0))
        }
    }

    #[test]
    fn test_custom_provider() -> Result<(), GridHashError> {
        let provider = FixedCode("22222222+");
        let hash = encode_with(&provider, 10.0, 10.0, 8)?;
        assert_eq!(decode_to_key(hash)?, "22222222+");
        assert_eq!(
            decode_to_bounds_with(&provider, hash)?,
            CellBounds::new(1.0, 2.0, 3.0, 4.0)
        );

        let bad = FixedCode("2222A222+");
        assert_eq!(
            encode_with(&bad, 10.0, 10.0, 8),
            Err(GridHashError::InvalidCharacter('A'))
        );
        Ok(())
    }
}
