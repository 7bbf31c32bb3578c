/// Triangulated card surface with normalised texture coordinates
use nalgebra::{Point2, Point3, Vector3};

use crate::error::{CardError, Result};
use crate::geometry::{Mesh, Triangle, Vertex};
use crate::outline::RoundedOutline;

/// Extents below this are treated as degenerate.
const MIN_EXTENT: f32 = 1e-6;

/// Planar mesh in the z = 0 plane, facing +z.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub positions: Vec<Point3<f32>>,
    /// One per position, each component in [0, 1].
    pub uvs: Vec<Point2<f32>>,
    /// Counter-clockwise triangles indexing `positions`.
    pub indices: Vec<[u32; 3]>,
}

impl Surface {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Axis-aligned bounds of the positions as `(min, max)`.
    pub fn bounding_box(&self) -> (Point3<f32>, Point3<f32>) {
        bounds(&self.positions)
    }

    /// Expand into an unindexed triangle list for rasterisation.
    pub fn to_mesh(&self) -> Mesh {
        let normal = Vector3::z();
        let mut mesh = Mesh::with_capacity(self.indices.len());
        for tri in &self.indices {
            let [a, b, c] = tri.map(|i| {
                let i = i as usize;
                Vertex {
                    position: self.positions[i],
                    normal,
                    uv: self.uvs[i],
                }
            });
            mesh.add_triangle(Triangle::new(a, b, c));
        }
        mesh
    }
}

/// Flatten, triangulate and texture-map an outline.
///
/// Texture coordinates are rescaled from the mesh's own bounding box so the
/// tessellated surface spans exactly [0, 1] on both axes.
pub fn build_surface(outline: &RoundedOutline, curve_segments: u32) -> Result<Surface> {
    let polygon = outline.flatten(curve_segments);
    let degenerate = || CardError::InvalidDimension {
        width: outline.width,
        height: outline.height,
    };
    if polygon.len() < 3 {
        return Err(degenerate());
    }

    let positions: Vec<Point3<f32>> = polygon.iter().map(|p| Point3::new(p.x, p.y, 0.0)).collect();
    let (min, max) = bounds(&positions);
    let size = max - min;
    if !(size.x > MIN_EXTENT && size.y > MIN_EXTENT) {
        return Err(CardError::InvalidDimension {
            width: size.x,
            height: size.y,
        });
    }

    let indices = triangulate(&polygon);
    if indices.is_empty() {
        return Err(degenerate());
    }

    let uvs = positions
        .iter()
        .map(|p| Point2::new((p.x - min.x) / size.x, (p.y - min.y) / size.y))
        .collect();

    tracing::trace!(
        vertices = positions.len(),
        triangles = indices.len(),
        "built card surface"
    );

    Ok(Surface {
        positions,
        uvs,
        indices,
    })
}

fn bounds(points: &[Point3<f32>]) -> (Point3<f32>, Point3<f32>) {
    let mut min = Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
    let mut max = Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
    for p in points {
        min = min.inf(p);
        max = max.sup(p);
    }
    (min, max)
}

/// Ear-clipping triangulation of a simple polygon. Output triangles are
/// counter-clockwise whatever the input winding.
fn triangulate(polygon: &[Point2<f32>]) -> Vec<[u32; 3]> {
    let n = polygon.len();
    if n < 3 {
        return Vec::new();
    }

    let mut remaining: Vec<usize> = (0..n).collect();
    if signed_area(polygon) < 0.0 {
        remaining.reverse();
    }

    let mut triangles = Vec::with_capacity(n - 2);
    while remaining.len() > 3 {
        let m = remaining.len();
        let ear = (0..m).find(|&i| {
            let prev = remaining[(i + m - 1) % m];
            let next = remaining[(i + 1) % m];
            is_ear(polygon, &remaining, prev, remaining[i], next)
        });

        match ear {
            Some(i) => {
                let prev = remaining[(i + m - 1) % m];
                let next = remaining[(i + 1) % m];
                triangles.push([prev as u32, remaining[i] as u32, next as u32]);
                remaining.remove(i);
            }
            // Only collinear runs remain; fan what is left.
            None => break,
        }
    }

    for i in 1..remaining.len().saturating_sub(1) {
        let [a, b, c] = [remaining[0], remaining[i], remaining[i + 1]];
        if cross(polygon[a], polygon[b], polygon[c]) > 0.0 {
            triangles.push([a as u32, b as u32, c as u32]);
        }
    }

    triangles
}

fn is_ear(polygon: &[Point2<f32>], remaining: &[usize], prev: usize, curr: usize, next: usize) -> bool {
    let (a, b, c) = (polygon[prev], polygon[curr], polygon[next]);
    if cross(a, b, c) <= 0.0 {
        return false;
    }
    !remaining
        .iter()
        .filter(|&&j| j != prev && j != curr && j != next)
        .any(|&j| strictly_inside(polygon[j], a, b, c))
}

fn cross(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn strictly_inside(p: Point2<f32>, a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> bool {
    cross(a, b, p) > 0.0 && cross(b, c, p) > 0.0 && cross(c, a, p) > 0.0
}

fn signed_area(polygon: &[Point2<f32>]) -> f32 {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let (p, q) = (polygon[i], polygon[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum::<f32>()
        / 2.0
}
