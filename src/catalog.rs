//! Album data: the catalog file keyed by slug, and directory scanning.
//!
//! A session is always built from one resolved [`Album`]; where it came from
//! (catalog entry or scanned directory) does not matter past this module.

mod load;
mod model;
mod scan;

pub use load::Catalog;
pub use model::{Album, Track};
pub use scan::scan_album;
