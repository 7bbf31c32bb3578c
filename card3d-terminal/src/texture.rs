/// Character "textures" sampled by UV when rasterising the card
use crossterm::style::Color;

/// Anything that maps a texture coordinate to a glyph.
pub trait Texture {
    fn sample(&self, u: f32, v: f32) -> (char, Color);
}

const BORDER_U: f32 = 0.05;
const BORDER_V: f32 = 0.035;

fn on_border(u: f32, v: f32) -> bool {
    u < BORDER_U || u > 1.0 - BORDER_U || v < BORDER_V || v > 1.0 - BORDER_V
}

/// Card front: a frame with the face name written across the middle.
pub struct FrontTexture {
    label: Vec<char>,
}

impl FrontTexture {
    pub fn new(face: &str) -> Self {
        Self {
            label: face_label(face).chars().collect(),
        }
    }

    /// Relabel for a newly selected face.
    pub fn set_face(&mut self, face: &str) {
        self.label.clear();
        self.label.extend(face_label(face).chars());
    }
}

impl Texture for FrontTexture {
    fn sample(&self, u: f32, v: f32) -> (char, Color) {
        if on_border(u, v) {
            return ('#', Color::Yellow);
        }
        if (0.44..0.56).contains(&v) && (0.15..0.85).contains(&u) && !self.label.is_empty() {
            let t = (u - 0.15) / 0.7;
            let index = ((t * self.label.len() as f32) as usize).min(self.label.len() - 1);
            return (self.label[index], Color::White);
        }
        if v > 0.62 && v < 0.9 {
            ('~', Color::Cyan)
        } else {
            ('.', Color::DarkCyan)
        }
    }
}

/// Card back: a diamond lattice.
pub struct BackTexture;

impl Texture for BackTexture {
    fn sample(&self, u: f32, v: f32) -> (char, Color) {
        if on_border(u, v) {
            return ('#', Color::Yellow);
        }
        let cell = (u * 8.0).floor() as i32 + (v * 11.0).floor() as i32;
        if cell % 2 == 0 {
            ('%', Color::Red)
        } else {
            ('+', Color::DarkRed)
        }
    }
}

/// Short display name for a face identifier such as `/front/card03.jpg`.
pub fn face_label(face: &str) -> &str {
    let name = face.rsplit('/').next().unwrap_or(face);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_label() {
        assert_eq!(face_label("/front/card03.jpg"), "card03");
        assert_eq!(face_label("ace"), "ace");
        assert_eq!(face_label(".hidden"), ".hidden");
    }

    #[test]
    fn test_front_shows_label_in_middle() {
        let tex = FrontTexture::new("AB");
        assert_eq!(tex.sample(0.2, 0.5).0, 'A');
        assert_eq!(tex.sample(0.8, 0.5).0, 'B');
        assert_eq!(tex.sample(0.0, 0.5).0, '#');
    }

    #[test]
    fn test_set_face_relabels() {
        let mut tex = FrontTexture::new("/front/AB.jpg");
        tex.set_face("/front/XY.jpg");
        assert_eq!(tex.sample(0.2, 0.5).0, 'X');
        assert_eq!(tex.sample(0.8, 0.5).0, 'Y');
    }

    #[test]
    fn test_back_border() {
        assert_eq!(BackTexture.sample(0.5, 0.99).0, '#');
    }
}
