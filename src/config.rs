//! Settings: schema types plus the layered loader (defaults, optional
//! `config.toml`, `ALBUMDECK__*` environment overrides).

mod load;
mod schema;

pub use schema::*;
