use crate::document::SchematicDocument;
use crate::error::{Result, SchematicError};
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

pub trait SchematicImporter: Send + Sync {
    fn name(&self) -> String;
    /// Lower-case file extensions this importer accepts, without the dot.
    fn extensions(&self) -> Vec<String>;
    fn detect(&self, data: &[u8]) -> bool;
    fn read(&self, data: &[u8]) -> Result<SchematicDocument>;
}

pub struct FormatManager {
    importers: Vec<Box<dyn SchematicImporter>>,
}

impl Default for FormatManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatManager {
    pub fn new() -> Self {
        Self {
            importers: Vec::new(),
        }
    }

    pub fn register_importer<I: SchematicImporter + 'static>(&mut self, importer: I) {
        self.importers.push(Box::new(importer));
    }

    pub fn detect_format(&self, data: &[u8]) -> Option<String> {
        for importer in &self.importers {
            if importer.detect(data) {
                return Some(importer.name());
            }
        }
        None
    }

    pub fn read(&self, data: &[u8]) -> Result<SchematicDocument> {
        for importer in &self.importers {
            if importer.detect(data) {
                return importer.read(data);
            }
        }
        Err(SchematicError::Format(
            "Unknown or unsupported schematic format".to_string(),
        ))
    }

    /// Picks the importer by file extension (case-insensitive) and only then
    /// reads the file. Unknown extensions fail without touching the disk.
    pub fn read_path(&self, path: &Path) -> Result<SchematicDocument> {
        let importer = self.importer_for_path(path).ok_or_else(|| {
            SchematicError::Format(format!(
                "{} is not a supported schematic file",
                path.display()
            ))
        })?;
        let data = std::fs::read(path)?;
        importer.read(&data)
    }

    pub fn importer_for_path(&self, path: &Path) -> Option<&dyn SchematicImporter> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        self.importers
            .iter()
            .find(|i| i.extensions().contains(&extension))
            .map(|i| i.as_ref())
    }

    pub fn list_importers(&self) -> Vec<String> {
        self.importers.iter().map(|i| i.name()).collect()
    }
}

pub static MANAGER: OnceLock<Arc<Mutex<FormatManager>>> = OnceLock::new();

pub fn get_manager() -> Arc<Mutex<FormatManager>> {
    MANAGER
        .get_or_init(|| {
            let mut manager = FormatManager::new();
            manager.register_importer(crate::formats::schematic::SchematicFormat);
            Arc::new(Mutex::new(manager))
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_importer_for_path_is_case_insensitive() {
        let manager = get_manager();
        let manager = manager.lock().unwrap();
        assert!(manager
            .importer_for_path(&PathBuf::from("castle.SCHEMATIC"))
            .is_some());
        assert!(manager
            .importer_for_path(&PathBuf::from("dir/castle.Schematic"))
            .is_some());
        assert!(manager
            .importer_for_path(&PathBuf::from("castle.litematic"))
            .is_none());
        assert!(manager.importer_for_path(&PathBuf::from("castle")).is_none());
    }

    #[test]
    fn test_read_path_rejects_extension_before_reading() {
        let manager = get_manager();
        let manager = manager.lock().unwrap();
        // The file does not exist; a Format error proves it was never opened.
        let err = manager
            .read_path(&PathBuf::from("/nonexistent/world.nbt"))
            .unwrap_err();
        assert!(matches!(err, SchematicError::Format(_)));
    }

    #[test]
    fn test_read_rejects_unknown_bytes() {
        let manager = get_manager();
        let manager = manager.lock().unwrap();
        assert_eq!(manager.detect_format(b"not a schematic"), None);
        assert!(matches!(
            manager.read(b"not a schematic"),
            Err(SchematicError::Format(_))
        ));
    }
}
