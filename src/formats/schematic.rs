//! Reader for the classic MCEdit `.schematic` format.
//!
//! The file is a gzip-compressed NBT compound with the dimensions stored as
//! `Width`, `Height` and `Length` shorts and two byte arrays, `Blocks` and
//! `Data`, of `Width * Height * Length` entries each.

use crate::document::SchematicDocument;
use crate::error::{Result, SchematicError};
use crate::formats::manager::SchematicImporter;
use flate2::read::GzDecoder;
use quartz_nbt::io::Flavor;
use quartz_nbt::{NbtCompound, NbtTag};
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub const EXTENSION: &str = "schematic";

pub struct SchematicFormat;

impl SchematicImporter for SchematicFormat {
    fn name(&self) -> String {
        "schematic".to_string()
    }

    fn extensions(&self) -> Vec<String> {
        vec![EXTENSION.to_string()]
    }

    fn detect(&self, data: &[u8]) -> bool {
        is_schematic(data)
    }

    fn read(&self, data: &[u8]) -> Result<SchematicDocument> {
        from_schematic(data)
    }
}

/// True when the bytes decompress to an NBT root that looks like a classic
/// schematic. Only the markers are checked; missing or malformed tags are
/// reported by [`from_schematic`] as decode errors.
pub fn is_schematic(data: &[u8]) -> bool {
    if !has_gzip_magic(data) {
        return false;
    }
    let mut gz = GzDecoder::new(data);
    let (root, _) = match quartz_nbt::io::read_nbt(&mut gz, Flavor::Uncompressed) {
        Ok(result) => result,
        Err(_) => return false,
    };

    ["Blocks", "Width"]
        .iter()
        .any(|tag| root.inner().get(*tag).is_some())
}

pub fn has_gzip_magic(data: &[u8]) -> bool {
    data.len() >= GZIP_MAGIC.len() && data[..GZIP_MAGIC.len()] == GZIP_MAGIC
}

pub fn has_schematic_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case(EXTENSION))
}

/// Reads a `.schematic` file from disk. The extension is checked before the
/// file is opened.
pub fn decode_path(path: &Path) -> Result<SchematicDocument> {
    if !has_schematic_extension(path) {
        return Err(SchematicError::Format(format!(
            "{} is not a *.schematic file",
            path.display()
        )));
    }
    let data = std::fs::read(path)?;
    from_schematic(&data)
}

pub fn from_schematic(data: &[u8]) -> Result<SchematicDocument> {
    if !has_gzip_magic(data) {
        return Err(SchematicError::Format(
            "missing gzip signature, not a compressed schematic".to_string(),
        ));
    }

    // Stream-decompress directly into the NBT parser
    let reader = std::io::BufReader::with_capacity(1 << 16, data);
    let mut gz = GzDecoder::new(reader);
    let (root, _) = quartz_nbt::io::read_nbt(&mut gz, Flavor::Uncompressed)?;

    parse_root(&root)
}

fn parse_root(root: &NbtCompound) -> Result<SchematicDocument> {
    let width = read_dimension(root, "Width")?;
    let height = read_dimension(root, "Height")?;
    let length = read_dimension(root, "Length")?;

    let blocks = read_byte_array(root, "Blocks")?;
    let data = read_byte_array(root, "Data")?;

    let document = SchematicDocument::new(width, height, length, blocks, data)?;

    Ok(match root.inner().get("Materials") {
        Some(NbtTag::String(materials)) => document.with_materials(materials.clone()),
        _ => document,
    })
}

fn read_dimension(root: &NbtCompound, name: &str) -> Result<u32> {
    let value = match root.inner().get(name) {
        Some(NbtTag::Short(v)) => *v as i64,
        Some(NbtTag::Int(v)) => *v as i64,
        Some(NbtTag::Byte(v)) => *v as i64,
        Some(_) => {
            return Err(SchematicError::Decode(format!(
                "{} is not an integer tag",
                name
            )))
        }
        None => return Err(SchematicError::Decode(format!("missing {} tag", name))),
    };

    if value <= 0 {
        return Err(SchematicError::Decode(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(value as u32)
}

fn read_byte_array(root: &NbtCompound, name: &str) -> Result<Vec<u8>> {
    match root.inner().get(name) {
        Some(NbtTag::ByteArray(bytes)) => Ok(bytes.iter().map(|&b| b as u8).collect()),
        Some(_) => Err(SchematicError::Decode(format!(
            "{} is not a byte array",
            name
        ))),
        None => Err(SchematicError::Decode(format!("missing {} tag", name))),
    }
}
