use glam::{Vec3, vec3};

use crate::renderer::SceneVertex;

/// The eight corners of the unit cube, ±1 on every axis.
pub const CORNERS: [Vec3; 8] = [
    vec3(1.0, -1.0, -1.0),
    vec3(1.0, 1.0, -1.0),
    vec3(-1.0, 1.0, -1.0),
    vec3(-1.0, -1.0, -1.0),
    vec3(1.0, -1.0, 1.0),
    vec3(1.0, 1.0, 1.0),
    vec3(-1.0, -1.0, 1.0),
    vec3(-1.0, 1.0, 1.0),
];

/// Six quad faces, each four corner indices plus a fixed color.
pub const FACES: [([usize; 4], Vec3); 6] = [
    ([0, 1, 2, 3], vec3(1.0, 0.0, 0.0)),
    ([3, 2, 7, 6], vec3(0.0, 1.0, 0.0)),
    ([6, 7, 5, 4], vec3(0.0, 0.0, 1.0)),
    ([4, 5, 1, 0], vec3(1.0, 1.0, 0.0)),
    ([1, 5, 7, 2], vec3(0.0, 1.0, 1.0)),
    ([4, 0, 3, 6], vec3(1.0, 0.0, 1.0)),
];

/// Twelve edges for the black wireframe drawn over the faces.
pub const EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [0, 3],
    [0, 4],
    [2, 1],
    [2, 3],
    [2, 7],
    [6, 3],
    [6, 4],
    [6, 7],
    [5, 1],
    [5, 4],
    [5, 7],
];

pub const EDGE_COLOR: Vec3 = Vec3::ZERO;

/// Four vertices per face, colored per face.
pub fn face_vertices() -> Vec<SceneVertex> {
    FACES
        .iter()
        .flat_map(|&(corners, color)| {
            corners.into_iter().map(move |corner| SceneVertex {
                position: CORNERS[corner],
                color,
            })
        })
        .collect()
}

/// Two triangles per face, indexing into [`face_vertices`].
pub fn face_indices() -> Vec<u16> {
    (0..FACES.len() as u16)
        .flat_map(|face| [0, 1, 2, 2, 3, 0].map(|i| face * 4 + i))
        .collect()
}

pub fn edge_vertices() -> Vec<SceneVertex> {
    CORNERS
        .into_iter()
        .map(|position| SceneVertex {
            position,
            color: EDGE_COLOR,
        })
        .collect()
}

/// Line-list indices into [`edge_vertices`].
pub fn edge_indices() -> Vec<u16> {
    EDGES
        .into_iter()
        .flatten()
        .map(|corner| corner as u16)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_sit_on_the_unit_cube() {
        for corner in CORNERS {
            for axis in corner.to_array() {
                assert_eq!(axis.abs(), 1.0);
            }
        }
    }

    #[test]
    fn face_mesh_has_expected_shape() {
        assert_eq!(face_vertices().len(), 24);

        let indices = face_indices();
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < 24));
    }

    #[test]
    fn faces_have_six_distinct_colors() {
        let mut colors: Vec<_> = FACES.iter().map(|&(_, c)| c.to_array()).collect();
        colors.dedup();
        assert_eq!(colors.len(), 6);
    }

    #[test]
    fn every_corner_appears_in_exactly_three_faces() {
        for corner in 0..CORNERS.len() {
            let uses = FACES
                .iter()
                .flat_map(|(corners, _)| corners)
                .filter(|&&c| c == corner)
                .count();
            assert_eq!(uses, 3, "corner {corner}");
        }
    }

    #[test]
    fn edge_list_covers_every_corner() {
        let indices = edge_indices();
        assert_eq!(indices.len(), 24);

        for corner in 0..CORNERS.len() as u16 {
            assert!(indices.contains(&corner));
        }
    }

    #[test]
    fn edges_span_exactly_one_axis() {
        for [a, b] in EDGES {
            let delta = CORNERS[a] - CORNERS[b];
            let moved = delta.to_array().iter().filter(|d| **d != 0.0).count();
            assert_eq!(moved, 1, "edge {a}-{b}");
        }
    }
}
