mod common;

use common::{gzip_nbt, schematic_bytes, schematic_root, scratch_dir};
use quartz_nbt::NbtTag;
use schematic_importer::formats::manager::get_manager;
use schematic_importer::{decode_path, from_schematic, SchematicError};
use std::path::Path;

#[test]
fn test_decode_path_reads_file() {
    let dir = scratch_dir("decode-ok");
    let path = dir.join("house.schematic");
    std::fs::write(&path, schematic_bytes(2, 1, 2, &[1, 0, 0, 1])).unwrap();

    let doc = decode_path(&path).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(doc.dimensions(), (2, 1, 2));
    assert_eq!(doc.non_air_count(), 2);
}

#[test]
fn test_extension_is_case_insensitive() {
    let dir = scratch_dir("decode-case");
    let path = dir.join("HOUSE.SCHEMATIC");
    std::fs::write(&path, schematic_bytes(1, 1, 1, &[4])).unwrap();

    let doc = decode_path(&path);
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(doc.unwrap().blocks(), &[4]);
}

#[test]
fn test_wrong_extension_fails_before_reading() {
    // The file does not exist; a Format error proves it was never opened.
    let err = decode_path(Path::new("/nonexistent/house.nbt")).unwrap_err();
    assert!(matches!(err, SchematicError::Format(_)));

    let err = decode_path(Path::new("/nonexistent/house.schematic")).unwrap_err();
    assert!(matches!(err, SchematicError::Io(_)));
}

#[test]
fn test_array_length_mismatch_is_decode_error() {
    let root = schematic_root(2, 2, 2, &[1; 7], &[0; 8]);
    let err = from_schematic(&gzip_nbt(&root)).unwrap_err();
    assert!(matches!(err, SchematicError::Decode(_)));
}

#[test]
fn test_wrong_tag_type_is_decode_error() {
    let mut root = schematic_root(1, 1, 1, &[1], &[0]);
    root.insert("Blocks", NbtTag::String("stone".to_string()));
    let err = from_schematic(&gzip_nbt(&root)).unwrap_err();
    assert!(matches!(err, SchematicError::Decode(_)));
}

#[test]
fn test_truncated_file_is_decode_error() {
    let bytes = schematic_bytes(4, 4, 4, &[1; 64]);
    let err = from_schematic(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err, SchematicError::Decode(_)));
}

#[test]
fn test_manager_detects_schematic() {
    let bytes = schematic_bytes(1, 1, 1, &[1]);
    let manager = get_manager();
    let manager = manager.lock().unwrap();

    assert_eq!(manager.detect_format(&bytes), Some("schematic".to_string()));
    assert_eq!(manager.read(&bytes).unwrap().volume(), 1);
    assert_eq!(manager.detect_format(b"plain text"), None);
}

#[test]
fn test_manager_reports_missing_tag_as_decode_error() {
    let mut root = quartz_nbt::NbtCompound::new();
    root.insert("Width", NbtTag::Short(2));
    root.insert("Height", NbtTag::Short(1));
    root.insert("Blocks", NbtTag::ByteArray(vec![1, 0, 0, 1]));
    root.insert("Data", NbtTag::ByteArray(vec![0; 4]));
    let bytes = gzip_nbt(&root);

    let manager = get_manager();
    let manager = manager.lock().unwrap();

    assert_eq!(manager.detect_format(&bytes), Some("schematic".to_string()));
    match manager.read(&bytes).unwrap_err() {
        SchematicError::Decode(msg) => assert!(msg.contains("Length")),
        other => panic!("expected Decode, got {:?}", other),
    }
}

#[test]
fn test_manager_ignores_unrelated_nbt() {
    let mut root = quartz_nbt::NbtCompound::new();
    root.insert("DataVersion", NbtTag::Int(3465));
    let bytes = gzip_nbt(&root);

    let manager = get_manager();
    let manager = manager.lock().unwrap();

    assert_eq!(manager.detect_format(&bytes), None);
    assert!(matches!(
        manager.read(&bytes).unwrap_err(),
        SchematicError::Format(_)
    ));
}
