use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// How a block type is turned into geometry and shading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Full-size cube, box-projected texture.
    Opaque,
    /// Slightly shrunk cube, texture alpha cuts holes through a transparent shader.
    Transparent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDefinition {
    pub id: u8,
    /// Unique per definition; materials and textures are cached under it.
    pub internal_name: SmolStr,
    /// Texture file stem under the texture directory, e.g. `planks_oak`.
    pub texture: SmolStr,
    pub strategy: Strategy,
}

impl BlockDefinition {
    pub fn new(
        id: u8,
        internal_name: impl Into<SmolStr>,
        texture: impl Into<SmolStr>,
        strategy: Strategy,
    ) -> Self {
        Self {
            id,
            internal_name: internal_name.into(),
            texture: texture.into(),
            strategy,
        }
    }

    pub fn opaque(id: u8, internal_name: impl Into<SmolStr>, texture: impl Into<SmolStr>) -> Self {
        Self::new(id, internal_name, texture, Strategy::Opaque)
    }

    pub fn transparent(
        id: u8,
        internal_name: impl Into<SmolStr>,
        texture: impl Into<SmolStr>,
    ) -> Self {
        Self::new(id, internal_name, texture, Strategy::Transparent)
    }
}

impl fmt::Display for BlockDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.internal_name, self.id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Block id 0 is air and cannot be registered")]
    AirId,
    #[error("Internal name '{name}' is already used by block id {existing}")]
    DuplicateName { name: SmolStr, existing: u8 },
    #[error("Invalid block table: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct BlockTable {
    blocks: Vec<BlockDefinition>,
}

/// Single-texture classic blocks, `(id, internal name, texture, strategy)`.
const CLASSIC_BLOCKS: &[(u8, &str, &str, Strategy)] = &[
    (1, "stone", "stone", Strategy::Opaque),
    (3, "dirt", "dirt", Strategy::Opaque),
    (4, "cobblestone", "cobblestone", Strategy::Opaque),
    (5, "planks", "planks_oak", Strategy::Opaque),
    (7, "bedrock", "bedrock", Strategy::Opaque),
    (12, "sand", "sand", Strategy::Opaque),
    (13, "gravel", "gravel", Strategy::Opaque),
    (14, "gold_ore", "gold_ore", Strategy::Opaque),
    (15, "iron_ore", "iron_ore", Strategy::Opaque),
    (16, "coal_ore", "coal_ore", Strategy::Opaque),
    (18, "leaves", "leaves_oak", Strategy::Transparent),
    (19, "sponge", "sponge", Strategy::Opaque),
    (20, "glass", "glass", Strategy::Transparent),
    (21, "lapis_ore", "lapis_ore", Strategy::Opaque),
    (22, "lapis_block", "lapis_block", Strategy::Opaque),
    (35, "wool", "wool_colored_white", Strategy::Opaque),
    (41, "gold_block", "gold_block", Strategy::Opaque),
    (42, "iron_block", "iron_block", Strategy::Opaque),
    (45, "brick", "brick", Strategy::Opaque),
    (48, "mossy_cobblestone", "cobblestone_mossy", Strategy::Opaque),
    (49, "obsidian", "obsidian", Strategy::Opaque),
    (52, "mob_spawner", "mob_spawner", Strategy::Transparent),
    (56, "diamond_ore", "diamond_ore", Strategy::Opaque),
    (57, "diamond_block", "diamond_block", Strategy::Opaque),
    (73, "redstone_ore", "redstone_ore", Strategy::Opaque),
    (79, "ice", "ice", Strategy::Transparent),
    (80, "snow", "snow", Strategy::Opaque),
    (82, "clay", "clay", Strategy::Opaque),
    (87, "netherrack", "netherrack", Strategy::Opaque),
    (88, "soul_sand", "soul_sand", Strategy::Opaque),
    (89, "glowstone", "glowstone", Strategy::Opaque),
    (98, "stonebrick", "stonebrick", Strategy::Opaque),
    (112, "nether_brick", "nether_brick", Strategy::Opaque),
    (121, "end_stone", "end_stone", Strategy::Opaque),
    (129, "emerald_ore", "emerald_ore", Strategy::Opaque),
    (133, "emerald_block", "emerald_block", Strategy::Opaque),
    (152, "redstone_block", "redstone_block", Strategy::Opaque),
    (165, "slime", "slime", Strategy::Transparent),
    (172, "hardened_clay", "hardened_clay", Strategy::Opaque),
    (173, "coal_block", "coal_block", Strategy::Opaque),
];

/// Block id → definition. Index 0 (air) is always empty.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    slots: Vec<Option<BlockDefinition>>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for &(id, name, texture, strategy) in CLASSIC_BLOCKS {
            registry.slots[id as usize] = Some(BlockDefinition::new(id, name, texture, strategy));
        }
        registry
    }
}

impl BlockRegistry {
    pub fn empty() -> Self {
        Self {
            slots: vec![None; u8::MAX as usize + 1],
        }
    }

    /// Parses `{"blocks": [{"id": 1, "internal_name": "stone", "texture": "stone",
    /// "strategy": "opaque"}, ...]}` into a fresh registry.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let mut registry = Self::empty();
        registry.extend_from_json(json)?;
        Ok(registry)
    }

    /// Adds (or replaces) every entry of a JSON block table. Returns how many
    /// entries were registered.
    pub fn extend_from_json(&mut self, json: &str) -> Result<usize, RegistryError> {
        let table: BlockTable = serde_json::from_str(json)?;
        let count = table.blocks.len();
        for definition in table.blocks {
            self.register(definition)?;
        }
        Ok(count)
    }

    /// Registers a definition, replacing whatever was registered under the
    /// same id. Returns the replaced definition.
    pub fn register(
        &mut self,
        definition: BlockDefinition,
    ) -> Result<Option<BlockDefinition>, RegistryError> {
        if definition.id == 0 {
            return Err(RegistryError::AirId);
        }
        if let Some(existing) = self
            .iter()
            .find(|d| d.internal_name == definition.internal_name && d.id != definition.id)
        {
            return Err(RegistryError::DuplicateName {
                name: definition.internal_name.clone(),
                existing: existing.id,
            });
        }

        let slot = &mut self.slots[definition.id as usize];
        Ok(slot.replace(definition))
    }

    pub fn lookup(&self, id: u8) -> Option<&BlockDefinition> {
        self.slots[id as usize].as_ref()
    }

    pub fn contains(&self, id: u8) -> bool {
        self.lookup(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
