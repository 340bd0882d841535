//! Error types shared by the portal crates

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Unknown color name: {0}")]
    UnknownName(String),
    #[error("Malformed hex color: {0}")]
    MalformedHex(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown property: {0}")]
    UnknownProperty(String),
    #[error("Property {property} expects a boolean, got {value:?}")]
    InvalidBoolean { property: String, value: String },
    #[error("Property {property} has invalid value {value:?}")]
    InvalidValue { property: String, value: String },
    #[error("Invalid color: {0}")]
    Color(#[from] ColorError),
}

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Unsupported manifest extension: {0}")]
    UnsupportedExtension(String),
}

/// Failure reported by a host capability (document or scene)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Document is not available")]
    NoDocument,
    #[error("DOM operation failed: {0}")]
    Dom(String),
}
