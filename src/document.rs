use crate::error::{Result, SchematicError};

/// A decoded classic (MCEdit) schematic: dimensions plus the two parallel
/// per-cell byte arrays.
///
/// Cells are stored x-fastest, then z (length), then y (height), which is
/// the layout [`crate::coords`] expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchematicDocument {
    width: u32,
    height: u32,
    length: u32,
    blocks: Vec<u8>,
    data: Vec<u8>,
    materials: Option<String>,
}

impl SchematicDocument {
    /// Builds a document, enforcing
    /// `blocks.len() == data.len() == width * height * length`.
    pub fn new(width: u32, height: u32, length: u32, blocks: Vec<u8>, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || length == 0 {
            return Err(SchematicError::Decode(format!(
                "dimensions must be positive, got {}x{}x{}",
                width, height, length
            )));
        }
        let volume = width as usize * height as usize * length as usize;
        if blocks.len() != volume {
            return Err(SchematicError::Decode(format!(
                "Blocks has {} entries, expected {} ({}x{}x{})",
                blocks.len(),
                volume,
                width,
                height,
                length
            )));
        }
        if data.len() != volume {
            return Err(SchematicError::Decode(format!(
                "Data has {} entries, expected {}",
                data.len(),
                volume
            )));
        }

        Ok(Self {
            width,
            height,
            length,
            blocks,
            data,
            materials: None,
        })
    }

    pub fn with_materials(mut self, materials: impl Into<String>) -> Self {
        self.materials = Some(materials.into());
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn dimensions(&self) -> (u32, u32, u32) {
        (self.width, self.height, self.length)
    }

    pub fn volume(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> &[u8] {
        &self.blocks
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The `Materials` tag, usually `"Alpha"` for classic exports.
    pub fn materials(&self) -> Option<&str> {
        self.materials.as_deref()
    }

    /// `(block id, metadata)` at a flat index.
    pub fn cell(&self, index: usize) -> Option<(u8, u8)> {
        Some((*self.blocks.get(index)?, *self.data.get(index)?))
    }

    /// Iterates `(index, block id, metadata)` over every non-air cell.
    pub fn non_air_cells(&self) -> impl Iterator<Item = (usize, u8, u8)> + '_ {
        self.blocks
            .iter()
            .zip(self.data.iter())
            .enumerate()
            .filter(|(_, (&id, _))| id != 0)
            .map(|(index, (&id, &meta))| (index, id, meta))
    }

    pub fn non_air_count(&self) -> usize {
        self.blocks.iter().filter(|&&id| id != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_rejects_mismatched_blocks() {
        let err = SchematicDocument::new(2, 1, 2, vec![1, 0, 0], vec![0; 4]).unwrap_err();
        assert!(matches!(err, SchematicError::Decode(_)));
    }

    #[test]
    fn test_document_rejects_mismatched_data() {
        let err = SchematicDocument::new(2, 1, 2, vec![0; 4], vec![0; 5]).unwrap_err();
        assert!(matches!(err, SchematicError::Decode(_)));
    }

    #[test]
    fn test_document_rejects_zero_dimension() {
        assert!(SchematicDocument::new(0, 1, 1, vec![], vec![]).is_err());
    }

    #[test]
    fn test_non_air_cells() {
        let doc = SchematicDocument::new(2, 1, 2, vec![1, 0, 0, 20], vec![3, 0, 0, 7]).unwrap();
        let cells: Vec<_> = doc.non_air_cells().collect();
        assert_eq!(cells, vec![(0, 1, 3), (3, 20, 7)]);
        assert_eq!(doc.non_air_count(), 2);
        assert_eq!(doc.cell(3), Some((20, 7)));
        assert_eq!(doc.cell(4), None);
    }
}
