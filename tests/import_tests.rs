mod common;

use common::{schematic_bytes, scratch_dir, textures};
use schematic_importer::{
    AssetError, BlockRegistry, ImportOptions, Importer, MemoryAssets, MemoryScene, Position,
    Scene, SchematicDocument, SchematicError, Strategy,
};

#[test]
fn test_two_stone_blocks_share_one_material() {
    let mut scene = MemoryScene::new();
    let assets = textures(&["stone"]);
    let mut importer = Importer::new();

    let report = importer
        .import_bytes(&mut scene, &assets, &schematic_bytes(2, 1, 2, &[1, 0, 0, 1]))
        .unwrap();

    assert!(report.is_clean());
    let positions: Vec<_> = report.placed.iter().map(|p| p.position).collect();
    assert_eq!(positions, vec![Position::new(-1, 0, 0), Position::new(0, -1, 0)]);

    assert_eq!(scene.objects().len(), 2);
    assert_eq!(scene.material_count(), 1);
    assert_eq!(scene.texture_count(), 1);
    assert_eq!(assets.load_count(), 1);
    assert_eq!(scene.calls().build_shader_graph, 1);

    let stone = scene.material_by_name("stone").unwrap();
    for object in scene.objects() {
        assert_eq!(object.materials, vec![stone]);
        assert_eq!(object.tag.block_id, 1);
    }
    assert_eq!(scene.objects()[0].placement.location, [-0.5, 0.5, 0.5]);
}

#[test]
fn test_all_air_places_nothing() {
    let mut scene = MemoryScene::new();
    let report = Importer::new()
        .import_bytes(&mut scene, &MemoryAssets::new(), &schematic_bytes(2, 2, 2, &[0; 8]))
        .unwrap();

    assert_eq!(report.object_count(), 0);
    assert!(report.errors.is_empty());
    assert_eq!(report.empty_cells, 8);
    assert_eq!(scene.calls().create_mesh, 0);
}

#[test]
fn test_unknown_block_is_skipped() {
    let mut scene = MemoryScene::new();
    let assets = textures(&["stone"]);
    let report = Importer::new()
        .import_bytes(&mut scene, &assets, &schematic_bytes(3, 1, 1, &[1, 255, 1]))
        .unwrap();

    assert_eq!(report.object_count(), 2);
    assert_eq!(report.unknown_cells, 1);
    assert!(report.is_clean());
}

#[test]
fn test_missing_texture_only_affects_its_cells() {
    let mut scene = MemoryScene::new();
    // 20 is glass, whose texture is absent
    let assets = textures(&["stone"]);
    let report = Importer::new()
        .import_bytes(&mut scene, &assets, &schematic_bytes(2, 2, 1, &[1, 20, 20, 1]))
        .unwrap();

    assert_eq!(report.object_count(), 2);
    assert_eq!(report.errors.len(), 2);
    assert_eq!(
        report.errors.iter().map(|e| e.index).collect::<Vec<_>>(),
        vec![1, 2]
    );
    for failure in &report.errors {
        assert_eq!(failure.block_id, 20);
        assert!(matches!(failure.error, AssetError::NotFound { .. }));
    }
    assert!(scene.objects().iter().all(|o| o.tag.block_id == 1));
    // stone loaded once, glass tried once
    assert_eq!(assets.load_count(), 2);
    assert!(scene.material_by_name("glass").is_none());
}

#[test]
fn test_transparent_blocks_are_shrunk() {
    let mut scene = MemoryScene::new();
    let assets = textures(&["stone", "glass"]);
    let report = Importer::new()
        .import_bytes(&mut scene, &assets, &schematic_bytes(2, 1, 1, &[1, 20]))
        .unwrap();

    let stone = scene.object(report.placed[0].object).unwrap();
    let glass = scene.object(report.placed[1].object).unwrap();
    assert_eq!(stone.placement.scale, [1.0; 3]);
    assert!(glass.placement.scale[0] < 1.0);

    let glass_graph = scene
        .material(report.placed[1].material)
        .and_then(|m| m.graph.as_ref())
        .unwrap();
    assert!(glass_graph.find("UV Map").is_some());
}

#[test]
fn test_materials_survive_across_runs() {
    let mut scene = MemoryScene::new();
    let assets = textures(&["stone"]);
    let document = SchematicDocument::new(1, 1, 1, vec![1], vec![0]).unwrap();
    let mut importer = Importer::new();

    importer.run(&mut scene, &assets, &document);
    let report = importer.run(&mut scene, &assets, &document);

    assert_eq!(scene.objects().len(), 2);
    assert_eq!(scene.calls().build_shader_graph, 1);
    assert_eq!(assets.load_count(), 1);
    assert_eq!(report.materials.built, 1);
    assert_eq!(report.materials.reused, 1);
}

#[test]
fn test_custom_registry_and_options() {
    let registry = BlockRegistry::from_json(
        r#"{ "blocks": [{ "id": 7, "internal_name": "crystal", "texture": "crystal", "strategy": "transparent" }] }"#,
    )
    .unwrap();
    assert_eq!(registry.lookup(7).unwrap().strategy, Strategy::Transparent);

    let options = ImportOptions::from_json(
        r#"{ "geometry": { "transparent_scale": 0.5 }, "scene": { "fps": 30 } }"#,
    )
    .unwrap();
    let mut scene = MemoryScene::new();
    let assets = textures(&["crystal"]);
    let document = SchematicDocument::new(2, 1, 1, vec![7, 1], vec![0, 0]).unwrap();

    let report = Importer::from_options(registry, &options).run(&mut scene, &assets, &document);

    assert_eq!(report.object_count(), 1);
    assert_eq!(report.unknown_cells, 1);
    assert_eq!(scene.objects()[0].placement.scale, [0.5; 3]);
    assert_eq!(scene.settings().unwrap().fps, 30);
}

#[test]
fn test_import_path_from_project_directory() {
    let dir = scratch_dir("import-path");
    let textures_dir = dir.join("textures/blocks");
    std::fs::create_dir_all(&textures_dir).unwrap();
    image::RgbaImage::from_pixel(16, 16, image::Rgba([90, 90, 90, 255]))
        .save(textures_dir.join("stone.png"))
        .unwrap();
    let file = dir.join("tower.schematic");
    std::fs::write(&file, schematic_bytes(1, 3, 1, &[1, 1, 1])).unwrap();

    let options = ImportOptions::default().with_project_root(&dir);
    let mut scene = MemoryScene::new();
    let report = Importer::new().import_path(&mut scene, &options.assets(), &file);
    std::fs::remove_dir_all(&dir).ok();

    let report = report.unwrap();
    assert!(report.is_clean());
    let heights: Vec<_> = report.placed.iter().map(|p| p.position.z).collect();
    assert_eq!(heights, vec![0, 1, 2]);

    let texture = scene.texture_by_name("stone").unwrap();
    assert_eq!(scene.texture(texture).unwrap().image.as_ref().unwrap().width, 16);
}

#[test]
fn test_aborted_import_leaves_scene_untouched() {
    let mut scene = MemoryScene::new();
    let err = Importer::new()
        .import_bytes(&mut scene, &MemoryAssets::new(), &[0x1f, 0x8b, 0x08, 0x00])
        .unwrap_err();

    assert!(matches!(err, SchematicError::Decode(_)));
    assert_eq!(scene.calls().apply_settings, 0);
    assert!(scene.objects().is_empty());
}

#[test]
fn test_scene_materials_are_reused_without_assets() {
    let mut scene = MemoryScene::new();
    let (stone, _) = scene.create_or_get_material("stone");
    let assets = MemoryAssets::new();

    let report = Importer::new()
        .import_bytes(&mut scene, &assets, &schematic_bytes(2, 1, 1, &[1, 1]))
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.object_count(), 2);
    assert!(report.placed.iter().all(|p| p.material == stone));
    assert_eq!(assets.load_count(), 0);
    assert_eq!(scene.material_count(), 1);
}
