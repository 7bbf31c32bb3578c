/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use std::io::Write;
use card3d_core::{Camera, Mesh, Triangle};

use crate::texture::Texture;

/// Faces lit below this brightness are drawn in a dimmer colour.
const SHADE_THRESHOLD: f32 = 0.55;

/// ASCII renderer that converts textured meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    /// Whether any card cell was drawn at `(x, y)` in the last frame.
    pub fn covers(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.depth_buffer[y * self.width + x].is_finite()
    }

    pub fn glyph(&self, x: usize, y: usize) -> Option<char> {
        self.covers(x, y).then(|| self.char_buffer[y * self.width + x])
    }

    /// Draw the triangles of `mesh` that face the camera.
    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        texture: &dyn Texture,
    ) {
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, model_matrix, camera, texture);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        texture: &dyn Texture,
    ) {
        // Project vertices to screen space
        let mut screen = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen.iter_mut().zip(&triangle.vertices) {
            match camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(point) => *slot = point,
                None => return, // Triangle is clipped
            }
        }

        // Counter-clockwise faces appear clockwise once y points down.
        let area = (screen[1].0 - screen[0].0) * (screen[2].1 - screen[0].1)
            - (screen[2].0 - screen[0].0) * (screen[1].1 - screen[0].1);
        if area >= 0.0 {
            return;
        }

        let normal = model_matrix
            .transform_vector(&triangle.calculate_normal())
            .normalize();
        let light_dir = Vector3::new(0.3, 0.4, 1.0).normalize();
        let brightness = normal.dot(&light_dir).max(0.0);

        let uvs = triangle.vertices.map(|v| (v.uv.x, v.uv.y));
        self.rasterize_triangle(&screen, &uvs, brightness, texture);
    }

    fn rasterize_triangle(
        &mut self,
        coords: &[(f32, f32, f32); 3],
        uvs: &[(f32, f32); 3],
        brightness: f32,
        texture: &dyn Texture,
    ) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth >= self.depth_buffer[idx] {
                    continue;
                }

                let u = w0 * uvs[0].0 + w1 * uvs[1].0 + w2 * uvs[2].0;
                let v = w0 * uvs[0].1 + w1 * uvs[1].1 + w2 * uvs[2].1;
                let (character, color) = texture.sample(u.clamp(0.0, 1.0), v.clamp(0.0, 1.0));

                self.depth_buffer[idx] = depth;
                self.char_buffer[idx] = character;
                self.color_buffer[idx] = if brightness < SHADE_THRESHOLD {
                    dim(color)
                } else {
                    color
                };
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn dim(color: Color) -> Color {
    match color {
        Color::Yellow => Color::DarkYellow,
        Color::Cyan => Color::DarkCyan,
        Color::Red => Color::DarkRed,
        Color::White => Color::Grey,
        Color::Grey => Color::DarkGrey,
        other => other,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{BackTexture, FrontTexture};
    use card3d_core::{build_outline, build_surface, Transform};

    fn card_mesh() -> Mesh {
        let outline = build_outline(2.0, 88.0 / 63.0).unwrap();
        build_surface(&outline, 6).unwrap().to_mesh()
    }

    fn render(flip: f32) -> AsciiRenderer {
        let mesh = card_mesh();
        let camera = Camera::new(80.0, 48.0);
        let mut renderer = AsciiRenderer::new(80, 24);
        let (front, back) = Transform::face_matrices(&Default::default(), 1.0, flip);
        renderer.render_mesh(&mesh, &front, &camera, &FrontTexture::new("card01"));
        renderer.render_mesh(&mesh, &back, &camera, &BackTexture);
        renderer
    }

    #[test]
    fn test_barycentric_centroid() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (3.0, 0.0), (0.0, 3.0), (1.0, 1.0)).unwrap();
        assert!((w0 - 1.0 / 3.0).abs() < 1e-5);
        assert!((w1 - 1.0 / 3.0).abs() < 1e-5);
        assert!((w2 - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_front_face_visible_when_not_flipped() {
        let renderer = render(0.0);
        assert!(renderer.covers(40, 12));
        assert!(!renderer.covers(0, 0));
        // The face label sits across the middle row.
        let middle: String = (0..80).filter_map(|x| renderer.glyph(x, 12)).collect();
        assert!(middle.contains('c'), "middle row was {middle:?}");
    }

    #[test]
    fn test_orbiting_behind_shows_back() {
        let mesh = card_mesh();
        let mut camera = Camera::new(80.0, 48.0);
        camera.orbit(std::f32::consts::PI);
        let mut renderer = AsciiRenderer::new(80, 24);
        let (front, back) = Transform::face_matrices(&Default::default(), 1.0, 0.0);
        renderer.render_mesh(&mesh, &front, &camera, &FrontTexture::new("card01"));
        renderer.render_mesh(&mesh, &back, &camera, &BackTexture);
        let glyph = renderer.glyph(40, 8).unwrap();
        assert!(glyph == '%' || glyph == '+');
    }

    #[test]
    fn test_back_face_visible_half_way() {
        let renderer = render(std::f32::consts::PI);
        let glyph = renderer.glyph(40, 8).unwrap();
        assert!(glyph == '%' || glyph == '+');
    }
}
