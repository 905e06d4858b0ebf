#![allow(dead_code)]

use quartz_nbt::io::Flavor;
use quartz_nbt::{NbtCompound, NbtTag};
use schematic_importer::{MemoryAssets, TextureImage};
use std::path::PathBuf;

pub fn schematic_root(width: i16, height: i16, length: i16, blocks: &[u8], data: &[u8]) -> NbtCompound {
    let mut root = NbtCompound::new();
    root.insert("Width", NbtTag::Short(width));
    root.insert("Height", NbtTag::Short(height));
    root.insert("Length", NbtTag::Short(length));
    root.insert("Materials", NbtTag::String("Alpha".to_string()));
    root.insert(
        "Blocks",
        NbtTag::ByteArray(blocks.iter().map(|&b| b as i8).collect()),
    );
    root.insert(
        "Data",
        NbtTag::ByteArray(data.iter().map(|&b| b as i8).collect()),
    );
    root
}

pub fn gzip_nbt(root: &NbtCompound) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    quartz_nbt::io::write_nbt(&mut encoder, Some("Schematic"), root, Flavor::Uncompressed).unwrap();
    encoder.finish().unwrap()
}

pub fn schematic_bytes(width: i16, height: i16, length: i16, blocks: &[u8]) -> Vec<u8> {
    let data = vec![0u8; blocks.len()];
    gzip_nbt(&schematic_root(width, height, length, blocks, &data))
}

/// Scratch directory unique to this test process and `tag`.
pub fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "schematic-importer-it-{}-{}",
        std::process::id(),
        tag
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn textures(names: &[&str]) -> MemoryAssets {
    let mut assets = MemoryAssets::new();
    for name in names {
        assets.insert(*name, TextureImage::solid(16, [100, 100, 100, 255]));
    }
    assets
}
