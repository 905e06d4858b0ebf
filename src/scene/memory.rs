use super::{
    MaterialHandle, MeshHandle, ObjectHandle, ObjectTag, Placement, Scene, SceneSettings,
    TextureHandle,
};
use crate::assets::TextureImage;
use crate::geometry::make_normals_consistent;
use crate::shader::ShaderGraph;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 4]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub mesh: MeshHandle,
    pub placement: Placement,
    pub tag: ObjectTag,
    pub materials: Vec<MaterialHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialData {
    pub name: String,
    pub graph: Option<ShaderGraph>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub name: String,
    pub image: Option<TextureImage>,
}

/// How often each [`Scene`] entry point was called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub create_mesh: usize,
    pub place_object: usize,
    pub create_or_get_material: usize,
    pub create_or_get_texture: usize,
    pub set_texture_image: usize,
    pub build_shader_graph: usize,
    pub assign_material: usize,
    pub recompute_normals: usize,
    pub apply_settings: usize,
}

/// Headless [`Scene`] that keeps everything in vectors.
#[derive(Debug, Default)]
pub struct MemoryScene {
    meshes: Vec<MeshData>,
    objects: Vec<SceneObject>,
    materials: Vec<MaterialData>,
    material_index: FxHashMap<String, MaterialHandle>,
    textures: Vec<TextureData>,
    texture_index: FxHashMap<String, TextureHandle>,
    settings: Option<SceneSettings>,
    calls: CallCounts,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> CallCounts {
        self.calls
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, handle: ObjectHandle) -> Option<&SceneObject> {
        self.objects.get(handle.0 as usize)
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshData> {
        self.meshes.get(handle.0 as usize)
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&MaterialData> {
        self.materials.get(handle.0 as usize)
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureData> {
        self.textures.get(handle.0 as usize)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn settings(&self) -> Option<&SceneSettings> {
        self.settings.as_ref()
    }
}

impl Scene for MemoryScene {
    fn create_mesh(&mut self, vertices: &[[f32; 3]], faces: &[[u32; 4]]) -> MeshHandle {
        self.calls.create_mesh += 1;
        self.meshes.push(MeshData {
            vertices: vertices.to_vec(),
            faces: faces.to_vec(),
        });
        MeshHandle(self.meshes.len() as u32 - 1)
    }

    fn place_object(
        &mut self,
        mesh: MeshHandle,
        placement: Placement,
        tag: ObjectTag,
    ) -> ObjectHandle {
        self.calls.place_object += 1;
        self.objects.push(SceneObject {
            mesh,
            placement,
            tag,
            materials: Vec::new(),
        });
        ObjectHandle(self.objects.len() as u32 - 1)
    }

    fn material_by_name(&self, name: &str) -> Option<MaterialHandle> {
        self.material_index.get(name).copied()
    }

    fn texture_by_name(&self, name: &str) -> Option<TextureHandle> {
        self.texture_index.get(name).copied()
    }

    fn create_or_get_material(&mut self, name: &str) -> (MaterialHandle, bool) {
        self.calls.create_or_get_material += 1;
        if let Some(&handle) = self.material_index.get(name) {
            return (handle, true);
        }
        let handle = MaterialHandle(self.materials.len() as u32);
        self.materials.push(MaterialData {
            name: name.to_string(),
            graph: None,
        });
        self.material_index.insert(name.to_string(), handle);
        (handle, false)
    }

    fn create_or_get_texture(&mut self, name: &str) -> (TextureHandle, bool) {
        self.calls.create_or_get_texture += 1;
        if let Some(&handle) = self.texture_index.get(name) {
            return (handle, true);
        }
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(TextureData {
            name: name.to_string(),
            image: None,
        });
        self.texture_index.insert(name.to_string(), handle);
        (handle, false)
    }

    fn set_texture_image(&mut self, texture: TextureHandle, image: TextureImage) {
        self.calls.set_texture_image += 1;
        if let Some(data) = self.textures.get_mut(texture.0 as usize) {
            data.image = Some(image);
        }
    }

    fn build_shader_graph(&mut self, material: MaterialHandle, graph: ShaderGraph) {
        self.calls.build_shader_graph += 1;
        if let Some(data) = self.materials.get_mut(material.0 as usize) {
            data.graph = Some(graph);
        }
    }

    fn assign_material(&mut self, object: ObjectHandle, material: MaterialHandle) {
        self.calls.assign_material += 1;
        if let Some(obj) = self.objects.get_mut(object.0 as usize) {
            obj.materials.push(material);
        }
    }

    fn recompute_normals(&mut self, object: ObjectHandle) {
        self.calls.recompute_normals += 1;
        let Some(mesh) = self.objects.get(object.0 as usize).map(|o| o.mesh) else {
            return;
        };
        if let Some(data) = self.meshes.get_mut(mesh.0 as usize) {
            data.faces = make_normals_consistent(&data.vertices, &data.faces);
        }
    }

    fn apply_settings(&mut self, settings: &SceneSettings) {
        self.calls.apply_settings += 1;
        self.settings = Some(settings.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_or_get_material_reports_existing() {
        let mut scene = MemoryScene::new();
        let (first, existed) = scene.create_or_get_material("stone");
        assert!(!existed);
        let (second, existed) = scene.create_or_get_material("stone");
        assert!(existed);
        assert_eq!(first, second);
        assert_eq!(scene.material_count(), 1);
        assert_eq!(scene.calls().create_or_get_material, 2);
    }

    #[test]
    fn test_textures_are_keyed_by_name() {
        let mut scene = MemoryScene::new();
        let (stone, _) = scene.create_or_get_texture("stone");
        let (glass, _) = scene.create_or_get_texture("glass");
        assert_ne!(stone, glass);
        assert_eq!(scene.texture_by_name("glass"), Some(glass));
        assert!(scene.texture(stone).unwrap().image.is_none());
    }

    #[test]
    fn test_assign_material_to_object() {
        let mut scene = MemoryScene::new();
        let mesh = scene.create_mesh(&[[0.0; 3]; 4], &[[0, 1, 2, 3]]);
        let object = scene.place_object(
            mesh,
            Placement::at([1.5, 0.5, 0.5]),
            ObjectTag {
                block_id: 1,
                metadata: 2,
            },
        );
        let (material, _) = scene.create_or_get_material("stone");
        scene.assign_material(object, material);

        let placed = scene.object(object).unwrap();
        assert_eq!(placed.materials, vec![material]);
        assert_eq!(placed.tag.metadata, 2);
    }
}
