use std::f64::consts::PI;

use nalgebra_glm as glm;

use crate::picture::{ColorField, LookupMode};
use crate::renderer::vertex::GlobeVertex;

/// Latitude and longitude in degrees of a unit surface normal.
pub fn normal_to_lat_lon(normal: &glm::DVec3) -> (f64, f64) {
    let lat = normal.y.clamp(-1.0, 1.0).asin();
    let mut lon = -(normal.x / lat.cos()).clamp(-1.0, 1.0).acos();
    if normal.z < 0.0 {
        lon = -lon;
    }
    (lat.to_degrees(), lon.to_degrees())
}

/// Flat-colored UV sphere, one color per triangle.
pub struct GlobeMesh {
    pub vertices: Vec<GlobeVertex>,
}

impl GlobeMesh {
    pub fn build(
        field: &ColorField,
        mode: LookupMode,
        radius: f64,
        width_segments: u32,
        height_segments: u32,
    ) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut grid: Vec<Vec<glm::DVec3>> = Vec::with_capacity(height_segments as usize + 1);
        for iy in 0..=height_segments {
            let theta = iy as f64 / height_segments as f64 * PI;
            let row = (0..=width_segments)
                .map(|ix| {
                    let phi = ix as f64 / width_segments as f64 * 2.0 * PI;
                    glm::vec3(
                        -phi.cos() * theta.sin(),
                        theta.cos(),
                        phi.sin() * theta.sin(),
                    )
                })
                .collect();
            grid.push(row);
        }

        let mut vertices = Vec::new();
        let mut push_face = |corners: [glm::DVec3; 3]| {
            let normal = glm::normalize(&(corners[0] + corners[1] + corners[2]));
            let (lat, lon) = normal_to_lat_lon(&normal);
            let color = GlobeVertex::color_from_packed(field.color_at_with(mode, lat, lon));
            for corner in corners {
                vertices.push(GlobeVertex::new(&(corner * radius), &corner, color));
            }
        };

        let (iy_last, ix_count) = (height_segments as usize - 1, width_segments as usize);
        for iy in 0..height_segments as usize {
            for ix in 0..ix_count {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];
                // The pole rows collapse to a single point, so only one triangle survives.
                if iy != 0 {
                    push_face([a, b, d]);
                }
                if iy != iy_last {
                    push_face([b, c, d]);
                }
            }
        }

        Self { vertices }
    }

    pub fn face_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn normals_map_to_coordinates() {
        assert!(close(normal_to_lat_lon(&glm::vec3(0.0, 1.0, 0.0)), (90.0, -90.0)));
        assert!(close(normal_to_lat_lon(&glm::vec3(1.0, 0.0, 0.0)), (0.0, 0.0)));
        assert!(close(normal_to_lat_lon(&glm::vec3(-1.0, 0.0, 0.0)), (0.0, -180.0)));
        assert!(close(normal_to_lat_lon(&glm::vec3(0.0, 0.0, 1.0)), (0.0, -90.0)));
        assert!(close(normal_to_lat_lon(&glm::vec3(0.0, 0.0, -1.0)), (0.0, 90.0)));
    }

    #[test]
    fn face_count_skips_pole_triangles() {
        let field = ColorField::parse("0,0,1,1,1\n").unwrap();
        let mesh = GlobeMesh::build(&field, LookupMode::Nearest, 100.0, 8, 4);
        // Two triangles per quad, minus one per quad in each pole row.
        assert_eq!(mesh.face_count(), 8 * 4 * 2 - 2 * 8);
    }

    fn same_color(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-6)
    }

    #[test]
    fn hemispheres_take_their_colors() {
        let field = ColorField::parse("60,0,1,0,0\n-60,0,0,0,1\n").unwrap();
        let mesh = GlobeMesh::build(&field, LookupMode::Nearest, 1.0, 16, 8);

        for vertex in &mesh.vertices {
            let y = vertex.position[1];
            if y > 0.9 {
                assert!(same_color(vertex.color, [1.0, 0.0, 0.0]));
            } else if y < -0.9 {
                assert!(same_color(vertex.color, [0.0, 0.0, 1.0]));
            }
        }
    }

    #[test]
    fn vertices_lie_on_the_sphere() {
        let field = ColorField::parse("0,0,1,1,1\n").unwrap();
        let mesh = GlobeMesh::build(&field, LookupMode::Legacy, 100.0, 12, 6);
        for vertex in &mesh.vertices {
            let p = glm::vec3(vertex.position[0], vertex.position[1], vertex.position[2]);
            assert!((glm::length(&p) - 100.0).abs() < 1e-3);
        }
    }
}
