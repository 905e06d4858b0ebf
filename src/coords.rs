//! Flat schematic index to scene position.
//!
//! Schematic cells run x-fastest, then along the length axis, then up the
//! height axis. The scene is Z-up: the schematic's length axis lands on the
//! scene's Y and its height on the scene's Z. The horizontal footprint is
//! centred on the origin:
//!
//! ```text
//! x = (i mod W) - floor(W / 2)
//! y = L - floor((i mod (W * L)) / W) - ceil(L / 2) - 1
//! z = floor(i / (W * L))
//! ```
//!
//! The width axis uses `floor` while the length axis uses `ceil` plus an
//! extra `-1`. Existing scenes were lined up against exactly this offset, so
//! it is kept as is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer cell position in scene space. A cell spans `[p, p + 1)` on every
/// axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Centre of the cell, where the block's cube is placed.
    pub fn center(&self) -> [f32; 3] {
        [
            self.x as f32 + 0.5,
            self.y as f32 + 0.5,
            self.z as f32 + 0.5,
        ]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Maps flat indices of one schematic to scene positions and back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateMapper {
    width: i64,
    height: i64,
    length: i64,
}

impl CoordinateMapper {
    pub fn new(width: u32, height: u32, length: u32) -> Self {
        Self {
            width: width as i64,
            height: height as i64,
            length: length as i64,
        }
    }

    pub fn for_document(document: &crate::SchematicDocument) -> Self {
        let (w, h, l) = document.dimensions();
        Self::new(w, h, l)
    }

    pub fn volume(&self) -> usize {
        (self.width * self.height * self.length) as usize
    }

    pub fn position(&self, index: usize) -> Position {
        index_to_position(index, self.width, self.length)
    }

    /// Inverse of [`Self::position`]. `None` outside the mapped cuboid.
    pub fn index(&self, position: Position) -> Option<usize> {
        let (w, l) = (self.width, self.length);
        let column = position.x as i64 + w / 2;
        let row = l - position.y as i64 - ceil_half(l) - 1;
        let layer = position.z as i64;

        if !(0..w).contains(&column) || !(0..l).contains(&row) || !(0..self.height).contains(&layer)
        {
            return None;
        }
        Some((layer * w * l + row * w + column) as usize)
    }

    /// Inclusive `(min, max)` corners of every position this mapper produces.
    pub fn bounds(&self) -> (Position, Position) {
        let (w, h, l) = (self.width, self.height, self.length);
        let min = Position::new(
            (-(w / 2)) as i32,
            (-ceil_half(l)) as i32,
            0,
        );
        let max = Position::new(
            (w - 1 - w / 2) as i32,
            (l - ceil_half(l) - 1) as i32,
            (h - 1) as i32,
        );
        (min, max)
    }
}

pub fn index_to_position(index: usize, width: i64, length: i64) -> Position {
    let i = index as i64;
    let layer_area = width * length;

    let x = i % width - width / 2;
    let y = length - (i % layer_area) / width - ceil_half(length) - 1;
    let z = i / layer_area;

    Position::new(x as i32, y as i32, z as i32)
}

fn ceil_half(n: i64) -> i64 {
    (n + 1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_two_by_two_footprint() {
        let mapper = CoordinateMapper::new(2, 1, 2);
        assert_eq!(mapper.position(0), Position::new(-1, 0, 0));
        assert_eq!(mapper.position(1), Position::new(0, 0, 0));
        assert_eq!(mapper.position(2), Position::new(-1, -1, 0));
        assert_eq!(mapper.position(3), Position::new(0, -1, 0));
    }

    #[test]
    fn test_height_is_scene_z() {
        let mapper = CoordinateMapper::new(3, 4, 5);
        assert_eq!(mapper.position(0).z, 0);
        assert_eq!(mapper.position(15).z, 1);
        assert_eq!(mapper.position(59).z, 3);
    }

    #[test]
    fn test_odd_length_offset() {
        // L = 3: rows 0, 1, 2 land on y = 0, -1, -2.
        let mapper = CoordinateMapper::new(1, 1, 3);
        let ys: Vec<i32> = (0..3).map(|i| mapper.position(i).y).collect();
        assert_eq!(ys, vec![0, -1, -2]);
        assert_eq!(mapper.bounds().0.y, -2);
    }

    #[test]
    fn test_bijection_and_inverse() {
        for &(w, h, l) in &[(1, 1, 1), (2, 1, 2), (3, 2, 5), (4, 3, 1), (7, 2, 6)] {
            let mapper = CoordinateMapper::new(w, h, l);
            let (min, max) = mapper.bounds();
            let mut seen = HashSet::new();

            for i in 0..mapper.volume() {
                let p = mapper.position(i);
                assert!(seen.insert(p), "duplicate position {} for {}x{}x{}", p, w, h, l);
                assert!(p.x >= min.x && p.x <= max.x);
                assert!(p.y >= min.y && p.y <= max.y);
                assert!(p.z >= min.z && p.z <= max.z);
                assert_eq!(mapper.index(p), Some(i));
            }

            let cuboid = ((max.x - min.x + 1) * (max.y - min.y + 1) * (max.z - min.z + 1)) as usize;
            assert_eq!(seen.len(), cuboid);
        }
    }

    #[test]
    fn test_index_outside_cuboid() {
        let mapper = CoordinateMapper::new(2, 1, 2);
        assert_eq!(mapper.index(Position::new(1, 0, 0)), None);
        assert_eq!(mapper.index(Position::new(0, 0, 1)), None);
        assert_eq!(mapper.index(Position::new(0, 0, -1)), None);
    }

    #[test]
    fn test_center() {
        assert_eq!(Position::new(-1, 0, 2).center(), [-0.5, 0.5, 2.5]);
    }
}
