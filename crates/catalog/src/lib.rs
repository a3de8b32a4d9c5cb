pub mod overrides;
pub mod slot;
pub mod source;

pub use overrides::*;
pub use slot::*;
pub use source::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    NotFound(String),
    Io(String),
    Parse(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NotFound(location) => write!(f, "catalog not found: {location}"),
            CatalogError::Io(msg) => write!(f, "catalog read error: {msg}"),
            CatalogError::Parse(msg) => write!(f, "catalog parse error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Content identity of a catalog payload.
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}
