use std::path::PathBuf;

/// Fatal errors: any of these aborts the import before a single block is
/// placed.
#[derive(Debug, thiserror::Error)]
pub enum SchematicError {
    #[error("Unsupported file: {0}")]
    Format(String),
    #[error("Malformed schematic: {0}")]
    Decode(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quartz_nbt::io::NbtIoError> for SchematicError {
    fn from(e: quartz_nbt::io::NbtIoError) -> Self {
        SchematicError::Decode(e.to_string())
    }
}

/// A block texture that could not be produced. Recovered per cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("Texture '{name}' not found at {}", path.display())]
    NotFound { name: String, path: PathBuf },
    #[error("Texture '{name}' could not be read: {reason}")]
    Unreadable { name: String, reason: String },
}

impl AssetError {
    pub fn texture_name(&self) -> &str {
        match self {
            AssetError::NotFound { name, .. } | AssetError::Unreadable { name, .. } => name,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("Invalid import options: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SchematicError>;
