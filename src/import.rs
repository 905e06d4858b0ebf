//! Turns a decoded schematic into scene objects.

use crate::assets::AssetSource;
use crate::config::ImportOptions;
use crate::coords::{CoordinateMapper, Position};
use crate::document::SchematicDocument;
use crate::error::{AssetError, Result};
use crate::formats::schematic::{decode_path, from_schematic};
use crate::geometry::GeometryBuilder;
use crate::material::{MaterialBuilder, MaterialStats};
use crate::registry::BlockRegistry;
use crate::scene::{MaterialHandle, ObjectHandle, Scene, SceneSettings};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedBlock {
    pub object: ObjectHandle,
    pub position: Position,
    pub block_id: u8,
    pub metadata: u8,
    pub material: MaterialHandle,
}

/// A cell that was skipped because its texture could not be loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct CellError {
    pub index: usize,
    pub position: Position,
    pub block_id: u8,
    pub error: AssetError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub placed: Vec<PlacedBlock>,
    pub errors: Vec<CellError>,
    /// Non-air cells whose id has no registry entry.
    pub unknown_cells: usize,
    /// Air cells.
    pub empty_cells: usize,
    /// Material builder counters; cumulative over the importer's lifetime.
    pub materials: MaterialStats,
}

impl ImportReport {
    pub fn object_count(&self) -> usize {
        self.placed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct Importer {
    registry: BlockRegistry,
    geometry: GeometryBuilder,
    materials: MaterialBuilder,
    settings: SceneSettings,
}

impl Default for Importer {
    fn default() -> Self {
        Self::new()
    }
}

impl Importer {
    /// Classic block table and default options.
    pub fn new() -> Self {
        Self::with_registry(BlockRegistry::default())
    }

    pub fn with_registry(registry: BlockRegistry) -> Self {
        Importer {
            registry,
            geometry: GeometryBuilder::default(),
            materials: MaterialBuilder::new(),
            settings: SceneSettings::default(),
        }
    }

    pub fn from_options(registry: BlockRegistry, options: &ImportOptions) -> Self {
        Importer {
            registry,
            geometry: GeometryBuilder::new(options.geometry),
            materials: MaterialBuilder::new(),
            settings: options.scene.clone(),
        }
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BlockRegistry {
        &mut self.registry
    }

    pub fn material_builder(&self) -> &MaterialBuilder {
        &self.materials
    }

    /// Places one object per known non-air cell, in index order.
    ///
    /// A cell whose texture cannot be loaded gets no object; the failure is
    /// recorded and the remaining cells are still imported.
    pub fn run(
        &mut self,
        scene: &mut dyn Scene,
        assets: &dyn AssetSource,
        document: &SchematicDocument,
    ) -> ImportReport {
        let start = Instant::now();
        let mapper = CoordinateMapper::for_document(document);
        let mut report = ImportReport {
            empty_cells: document.volume() - document.non_air_count(),
            ..ImportReport::default()
        };

        scene.apply_settings(&self.settings);

        for (index, block_id, metadata) in document.non_air_cells() {
            let Some(definition) = self.registry.lookup(block_id) else {
                report.unknown_cells += 1;
                continue;
            };
            let position = mapper.position(index);

            let material = match self.materials.get_or_build(scene, assets, definition) {
                Ok(material) => material,
                Err(error) => {
                    warn!(index, %position, block_id, %error, "skipping block");
                    report.errors.push(CellError {
                        index,
                        position,
                        block_id,
                        error,
                    });
                    continue;
                }
            };

            let object = self
                .geometry
                .build(scene, definition.strategy, position, block_id, metadata);
            scene.assign_material(object, material);

            report.placed.push(PlacedBlock {
                object,
                position,
                block_id,
                metadata,
                material,
            });
        }

        report.materials = self.materials.stats();

        let (width, height, length) = document.dimensions();
        info!(
            width,
            height,
            length,
            placed = report.placed.len(),
            errors = report.errors.len(),
            unknown = report.unknown_cells,
            materials_built = report.materials.built,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "schematic imported"
        );

        report
    }

    /// Reads `path` and imports it. Fails before touching the scene if the
    /// file is not a readable schematic.
    pub fn import_path(
        &mut self,
        scene: &mut dyn Scene,
        assets: &dyn AssetSource,
        path: &Path,
    ) -> Result<ImportReport> {
        let document = decode_path(path)?;
        Ok(self.run(scene, assets, &document))
    }

    pub fn import_bytes(
        &mut self,
        scene: &mut dyn Scene,
        assets: &dyn AssetSource,
        data: &[u8],
    ) -> Result<ImportReport> {
        let document = from_schematic(data)?;
        Ok(self.run(scene, assets, &document))
    }
}
