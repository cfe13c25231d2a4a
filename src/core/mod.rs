pub mod bounds;
pub mod constants;
pub mod morton;
pub mod olc;
pub mod pluscode;
pub mod tile;

pub use bounds::CellBounds;
pub use constants::{MAX_CODE_LENGTH, MAX_ZOOM, MIN_CODE_LENGTH, PLUSCODE_ALPHABET};
pub use olc::{LocationCodeProvider, OpenLocationCode};
pub use tile::Tile;
