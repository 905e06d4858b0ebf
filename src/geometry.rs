use crate::coords::Position;
use crate::registry::Strategy;
use crate::scene::{ObjectHandle, ObjectTag, Placement, Scene};
use serde::{Deserialize, Serialize};

/// Unit cube centred on its origin.
pub const CUBE_VERTICES: [[f32; 3]; 8] = [
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
    [-0.5, 0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [-0.5, 0.5, 0.5],
    [0.5, 0.5, 0.5],
];

/// Quads of the cube. Winding is not consistent here; the scene fixes it in
/// `recompute_normals`.
pub const CUBE_FACES: [[u32; 4]; 6] = [
    [0, 1, 3, 2],
    [4, 5, 7, 6],
    [0, 1, 5, 4],
    [0, 2, 6, 4],
    [2, 3, 7, 6],
    [1, 3, 7, 5],
];

/// Uniform scale of transparent cubes. Two coincident transparent faces of
/// neighbouring blocks flicker in the renderer; pulling each cube in by
/// 1e-4 separates them.
pub const DEFAULT_TRANSPARENT_SCALE: f32 = 0.999_899_98;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryOptions {
    #[serde(default = "default_transparent_scale")]
    pub transparent_scale: f32,
}

fn default_transparent_scale() -> f32 {
    DEFAULT_TRANSPARENT_SCALE
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            transparent_scale: DEFAULT_TRANSPARENT_SCALE,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GeometryBuilder {
    options: GeometryOptions,
}

impl GeometryBuilder {
    pub fn new(options: GeometryOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GeometryOptions {
        &self.options
    }

    pub fn placement(&self, strategy: Strategy, position: Position) -> Placement {
        let placement = Placement::at(position.center());
        match strategy {
            Strategy::Opaque => placement,
            Strategy::Transparent => placement.with_uniform_scale(self.options.transparent_scale),
        }
    }

    /// Creates the cube, places it at the cell centre and links it into the
    /// scene tagged with the block it came from.
    pub fn build(
        &self,
        scene: &mut dyn Scene,
        strategy: Strategy,
        position: Position,
        block_id: u8,
        metadata: u8,
    ) -> ObjectHandle {
        let mesh = scene.create_mesh(&CUBE_VERTICES, &CUBE_FACES);
        let object = scene.place_object(
            mesh,
            self.placement(strategy, position),
            ObjectTag { block_id, metadata },
        );
        scene.recompute_normals(object);
        object
    }
}

/// Newell normal of a polygon; not normalised.
///
/// # Panics
///
/// If an index of `face` is out of range for `vertices`.
pub fn face_normal(vertices: &[[f32; 3]], face: &[u32; 4]) -> [f32; 3] {
    let mut n = [0.0f32; 3];
    for i in 0..face.len() {
        let a = vertices[face[i] as usize];
        let b = vertices[face[(i + 1) % face.len()] as usize];
        n[0] += (a[1] - b[1]) * (a[2] + b[2]);
        n[1] += (a[2] - b[2]) * (a[0] + b[0]);
        n[2] += (a[0] - b[0]) * (a[1] + b[1]);
    }
    n
}

/// Reorders each quad so its normal points away from the mesh centroid.
///
/// Only meaningful for convex closed meshes, which is all the importer
/// builds. Faces whose vertices are not in edge order are first brought
/// into a proper cycle around their centre. Faces referencing a vertex that
/// does not exist are returned unchanged.
pub fn make_normals_consistent(vertices: &[[f32; 3]], faces: &[[u32; 4]]) -> Vec<[u32; 4]> {
    let mesh_center = centroid(vertices.iter());

    faces
        .iter()
        .map(|face| {
            if face.iter().any(|&i| i as usize >= vertices.len()) {
                return *face;
            }
            let mut face = order_around_center(vertices, face);
            let n = face_normal(vertices, &face);
            let center = centroid(face.iter().map(|&i| &vertices[i as usize]));
            let outward = sub(center, mesh_center);
            if dot(n, outward) < 0.0 {
                face.reverse();
            }
            face
        })
        .collect()
}

fn order_around_center(vertices: &[[f32; 3]], face: &[u32; 4]) -> [u32; 4] {
    let center = centroid(face.iter().map(|&i| &vertices[i as usize]));
    let n = face_normal(vertices, face);
    // Non-planar ordering (crossed quad) shows up as a degenerate normal.
    let axis = if length(n) > 1e-6 {
        n
    } else {
        let a = sub(vertices[face[1] as usize], vertices[face[0] as usize]);
        let b = sub(vertices[face[2] as usize], vertices[face[0] as usize]);
        let c = sub(vertices[face[3] as usize], vertices[face[0] as usize]);
        let candidates = [cross(a, b), cross(a, c), cross(b, c)];
        candidates
            .into_iter()
            .max_by(|x, y| length(*x).total_cmp(&length(*y)))
            .unwrap_or([0.0, 0.0, 1.0])
    };

    let u = sub(vertices[face[0] as usize], center);
    let v = cross(axis, u);
    let mut ordered = *face;
    ordered.sort_by(|&a, &b| {
        let pa = sub(vertices[a as usize], center);
        let pb = sub(vertices[b as usize], center);
        let ang_a = dot(pa, v).atan2(dot(pa, u));
        let ang_b = dot(pb, v).atan2(dot(pb, u));
        ang_a.total_cmp(&ang_b)
    });
    ordered
}

fn centroid<'a>(points: impl Iterator<Item = &'a [f32; 3]>) -> [f32; 3] {
    let mut sum = [0.0f32; 3];
    let mut count = 0.0f32;
    for p in points {
        sum[0] += p[0];
        sum[1] += p[1];
        sum[2] += p[2];
        count += 1.0;
    }
    if count == 0.0 {
        return sum;
    }
    [sum[0] / count, sum[1] / count, sum[2] / count]
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn length(a: [f32; 3]) -> f32 {
    dot(a, a).sqrt()
}
