//! Open Location Code encoding and decoding.
//!
//! The plus code hash only needs two things from a location code library: turn
//! a point into a code, and turn a code back into the area it covers. That
//! contract is [`LocationCodeProvider`]; [`OpenLocationCode`] implements it
//! with the published algorithm.

use crate::core::bounds::CellBounds;
use crate::core::constants::{PADDING_CHAR, SEPARATOR, SEPARATOR_POSITION};
use crate::util::error::GridHashError;

const CODE_ALPHABET: &[u8; 20] = b"23456789CFGHJMPQRVWX";
const ENCODING_BASE: i64 = 20;
const LATITUDE_MAX: f64 = 90.0;
const LONGITUDE_MAX: f64 = 180.0;
const MAX_DIGIT_COUNT: usize = 15;
const PAIR_CODE_LENGTH: usize = 10;
const GRID_CODE_LENGTH: usize = 5;
const GRID_COLUMNS: i64 = 4;
const GRID_ROWS: i64 = 5;

// Integer resolution of the finest grid digit per degree.
const LAT_INTEGER_MULTIPLIER: i64 = 8000 * 3125;
const LNG_INTEGER_MULTIPLIER: i64 = 8000 * 1024;
// Place value of the most significant pair digit.
const LAT_MSP_VALUE: i64 = LAT_INTEGER_MULTIPLIER * ENCODING_BASE * ENCODING_BASE;
const LNG_MSP_VALUE: i64 = LNG_INTEGER_MULTIPLIER * ENCODING_BASE * ENCODING_BASE;

/// Something that converts points to location codes and back.
pub trait LocationCodeProvider: Send + Sync {
    /// Encodes a point as a code with `code_length` significant digits.
    fn encode(&self, lat: f64, lon: f64, code_length: usize) -> Result<String, GridHashError>;

    /// Decodes a full code into the area it covers.
    fn decode(&self, code: &str) -> Result<CellBounds, GridHashError>;
}

/// The published Open Location Code ("plus code") algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenLocationCode;

fn alphabet_index(ch: u8) -> Option<i64> {
    CODE_ALPHABET.iter().position(|&c| c == ch).map(|i| i as i64)
}

fn clip_latitude(lat: f64) -> f64 {
    lat.clamp(-LATITUDE_MAX, LATITUDE_MAX)
}

fn normalize_longitude(mut lon: f64) -> f64 {
    while lon < -LONGITUDE_MAX {
        lon += 360.0;
    }
    while lon >= LONGITUDE_MAX {
        lon -= 360.0;
    }
    lon
}

/// Height in degrees of a cell with the given code length.
fn latitude_precision(code_length: usize) -> f64 {
    if code_length <= PAIR_CODE_LENGTH {
        (ENCODING_BASE as f64).powi(2 - (code_length / 2) as i32)
    } else {
        (ENCODING_BASE as f64).powi(-3) / (GRID_ROWS as f64).powi((code_length - PAIR_CODE_LENGTH) as i32)
    }
}

fn to_integer(degrees: f64, multiplier: i64) -> i64 {
    // rounding at 1e-6 absorbs representation error before truncating
    ((degrees * multiplier as f64 * 1e6).round() / 1e6).floor() as i64
}

impl OpenLocationCode {
    pub fn new() -> Self {
        Self
    }

    /// True if `code` is a well formed full (not shortened) code.
    pub fn is_full(code: &str) -> bool {
        Self::check(code).is_ok()
    }

    fn check(code: &str) -> Result<(), GridHashError> {
        let invalid = |reason: &str| Err(GridHashError::InvalidCode(format!("{code}: {reason}")));
        let bytes = code.as_bytes();
        if bytes.len() < 2 {
            return invalid("too short");
        }

        let separator = match code.find(SEPARATOR) {
            Some(pos) => pos,
            None => return invalid("missing separator"),
        };
        if code.rfind(SEPARATOR) != Some(separator) {
            return invalid("more than one separator");
        }
        if separator != SEPARATOR_POSITION {
            return invalid("not a full code");
        }

        // first latitude digit is capped at 180 degrees, first longitude digit at 360
        match (alphabet_index(bytes[0]), alphabet_index(bytes[1])) {
            (Some(lat), Some(lng)) if lat < 9 && lng < 18 => {}
            _ => return invalid("first pair out of range"),
        }

        let padding = PADDING_CHAR as u8;
        let mut padding_started = false;
        for (i, &ch) in bytes[..separator].iter().enumerate() {
            if ch == padding {
                if !padding_started {
                    if i % 2 != 0 {
                        return invalid("padding must start on an even position");
                    }
                    padding_started = true;
                }
            } else if padding_started || alphabet_index(ch).is_none() {
                return invalid("unexpected character before separator");
            }
        }

        let tail = &bytes[separator + 1..];
        if !tail.is_empty() {
            if padding_started {
                return invalid("padded codes end at the separator");
            }
            if tail.len() == 1 {
                return invalid("single digit after separator");
            }
            if tail.iter().any(|&ch| alphabet_index(ch).is_none()) {
                return invalid("unexpected character after separator");
            }
        }

        Ok(())
    }
}

impl LocationCodeProvider for OpenLocationCode {
    fn encode(&self, lat: f64, lon: f64, code_length: usize) -> Result<String, GridHashError> {
        let code_length = code_length.min(MAX_DIGIT_COUNT);
        if code_length < 2 || (code_length < PAIR_CODE_LENGTH && code_length % 2 == 1) {
            return Err(GridHashError::InvalidCode(format!(
                "unsupported code length {code_length}"
            )));
        }

        let mut lat = clip_latitude(lat);
        let lon = normalize_longitude(lon);
        // the north pole belongs to the cell below it
        if lat == LATITUDE_MAX {
            lat -= 0.9 * latitude_precision(code_length);
        }

        let mut lat_val = to_integer(lat + LATITUDE_MAX, LAT_INTEGER_MULTIPLIER);
        let mut lng_val = to_integer(lon + LONGITUDE_MAX, LNG_INTEGER_MULTIPLIER);

        // digits are produced least significant first
        let mut reversed: Vec<u8> = Vec::with_capacity(MAX_DIGIT_COUNT + 1);
        if code_length > PAIR_CODE_LENGTH {
            for _ in 0..GRID_CODE_LENGTH {
                let lat_digit = lat_val % GRID_ROWS;
                let lng_digit = lng_val % GRID_COLUMNS;
                reversed.push(CODE_ALPHABET[(lat_digit * GRID_COLUMNS + lng_digit) as usize]);
                lat_val /= GRID_ROWS;
                lng_val /= GRID_COLUMNS;
            }
        } else {
            lat_val /= GRID_ROWS.pow(GRID_CODE_LENGTH as u32);
            lng_val /= GRID_COLUMNS.pow(GRID_CODE_LENGTH as u32);
        }

        for i in 0..PAIR_CODE_LENGTH / 2 {
            reversed.push(CODE_ALPHABET[(lng_val % ENCODING_BASE) as usize]);
            reversed.push(CODE_ALPHABET[(lat_val % ENCODING_BASE) as usize]);
            lat_val /= ENCODING_BASE;
            lng_val /= ENCODING_BASE;
            if i == 0 {
                reversed.push(SEPARATOR as u8);
            }
        }

        let mut code: Vec<u8> = reversed.into_iter().rev().collect();
        if code_length < SEPARATOR_POSITION {
            for ch in &mut code[code_length..SEPARATOR_POSITION] {
                *ch = PADDING_CHAR as u8;
            }
        }
        code.truncate((SEPARATOR_POSITION + 1).max(code_length + 1));

        String::from_utf8(code).map_err(|e| GridHashError::InvalidCode(e.to_string()))
    }

    fn decode(&self, code: &str) -> Result<CellBounds, GridHashError> {
        let code = code.to_ascii_uppercase();
        Self::check(&code)?;

        let digits: Vec<i64> = code
            .bytes()
            .filter_map(alphabet_index)
            .take(MAX_DIGIT_COUNT)
            .collect();

        let mut lat_val = -(LATITUDE_MAX as i64) * LAT_INTEGER_MULTIPLIER;
        let mut lng_val = -(LONGITUDE_MAX as i64) * LNG_INTEGER_MULTIPLIER;
        let mut lat_place = LAT_MSP_VALUE;
        let mut lng_place = LNG_MSP_VALUE;

        for pair in digits.chunks(2).take(PAIR_CODE_LENGTH / 2) {
            lat_place /= ENCODING_BASE;
            lng_place /= ENCODING_BASE;
            lat_val += pair[0] * lat_place;
            if let Some(lng_digit) = pair.get(1) {
                lng_val += lng_digit * lng_place;
            }
        }

        for &digit in digits.iter().skip(PAIR_CODE_LENGTH) {
            lat_place /= GRID_ROWS;
            lng_place /= GRID_COLUMNS;
            lat_val += (digit / GRID_COLUMNS) * lat_place;
            lng_val += (digit % GRID_COLUMNS) * lng_place;
        }

        let lat_mul = LAT_INTEGER_MULTIPLIER as f64;
        let lng_mul = LNG_INTEGER_MULTIPLIER as f64;
        Ok(CellBounds::new(
            lat_val as f64 / lat_mul,
            (lat_val + lat_place) as f64 / lat_mul,
            lng_val as f64 / lng_mul,
            (lng_val + lng_place) as f64 / lng_mul,
        ))
    }
}
