/// Card3D Web - WASM bindings for the interactive card
///
/// The browser owns rendering (three.js or raw WebGL). This crate owns the
/// card: geometry buffers, pointer/button handling and per-frame animation.
/// Call `tick` once per `requestAnimationFrame` and read back the pose.

use card3d_core::{Camera, CardConfig, CardEvent, CardWidget};
use wasm_bindgen::prelude::*;

fn to_js(err: card3d_core::CardError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebCard {
    widget: CardWidget,
    camera: Camera,
    last_face_change: Option<String>,
}

#[wasm_bindgen]
impl WebCard {
    /// Create a card for a viewport `viewport_width` CSS pixels wide.
    #[wasm_bindgen(constructor)]
    pub fn new(viewport_width: f32, faces: Vec<String>, seed: u32) -> Result<WebCard, JsValue> {
        let widget = CardWidget::new(CardConfig::default(), faces, viewport_width, u64::from(seed))
            .map_err(to_js)?;
        Ok(WebCard {
            widget,
            camera: Camera::default(),
            last_face_change: None,
        })
    }

    /// Like the constructor, with tuning overrides in `key = value` form.
    pub fn with_config(
        config: &str,
        viewport_width: f32,
        faces: Vec<String>,
        seed: u32,
    ) -> Result<WebCard, JsValue> {
        let config = CardConfig::parse(config).map_err(to_js)?;
        let widget = CardWidget::new(config, faces, viewport_width, u64::from(seed)).map_err(to_js)?;
        Ok(WebCard {
            widget,
            camera: Camera::default(),
            last_face_change: None,
        })
    }

    pub fn pointer_enter(&mut self) {
        self.widget.controller_mut().pointer_enter();
    }

    pub fn pointer_leave(&mut self) {
        self.widget.controller_mut().pointer_leave();
    }

    pub fn pointer_down(&mut self) {
        self.widget.controller_mut().pointer_down();
    }

    pub fn pointer_up(&mut self) {
        self.widget.controller_mut().pointer_up();
    }

    /// Pointer in normalised device coordinates, y up.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.widget.controller_mut().set_pointer(x, y);
    }

    /// Returns false when a flip is already running.
    pub fn request_flip(&mut self) -> bool {
        self.widget.controller_mut().request_flip()
    }

    pub fn request_face_change(&mut self) -> Result<(), JsValue> {
        self.widget.controller_mut().request_face_change().map_err(to_js)
    }

    /// Returns true when the mesh buffers changed and must be re-uploaded.
    pub fn resize(&mut self, viewport_width: f32) -> Result<bool, JsValue> {
        self.widget.resize(viewport_width).map_err(to_js)
    }

    /// `resize` using `window.innerWidth`.
    pub fn resize_to_window(&mut self) -> Result<bool, JsValue> {
        let width = viewport_width()?;
        self.resize(width)
    }

    /// Advance one frame of `dt` seconds. Returns true if a flip completed.
    pub fn tick(&mut self, dt: f32) -> bool {
        let mut completed = false;
        for event in self.widget.update(dt) {
            match event {
                CardEvent::FlipCompleted => completed = true,
                CardEvent::FaceChanged { current, .. } => self.last_face_change = Some(current),
            }
        }
        completed
    }

    /// Face chosen by the most recent completed face change, once.
    pub fn take_face_change(&mut self) -> Option<String> {
        self.last_face_change.take()
    }

    pub fn current_face(&self) -> String {
        self.widget.controller().current_face().to_string()
    }

    pub fn tilt_x(&self) -> f32 {
        self.widget.controller().orientation().tilt_x
    }

    pub fn tilt_y(&self) -> f32 {
        self.widget.controller().orientation().tilt_y
    }

    pub fn flip_angle(&self) -> f32 {
        self.widget.controller().flip_angle()
    }

    pub fn scale(&self) -> f32 {
        self.widget.controller().scale()
    }

    pub fn is_flipping(&self) -> bool {
        self.widget.controller().is_flipping()
    }

    pub fn card_width(&self) -> f32 {
        self.widget.dimensions().width
    }

    pub fn card_height(&self) -> f32 {
        self.widget.dimensions().height
    }

    /// Vertex positions as `x, y, z` triples.
    pub fn positions(&self) -> Vec<f32> {
        self.widget
            .surface()
            .positions
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }

    /// Texture coordinates as `u, v` pairs.
    pub fn uvs(&self) -> Vec<f32> {
        self.widget
            .surface()
            .uvs
            .iter()
            .flat_map(|uv| [uv.x, uv.y])
            .collect()
    }

    pub fn indices(&self) -> Vec<u32> {
        self.widget.surface().indices.iter().flatten().copied().collect()
    }

    /// Orbit the camera horizontally around the card by `delta` radians.
    /// Distance and height stay fixed.
    pub fn orbit(&mut self, delta: f32) {
        self.camera.orbit(delta);
    }

    pub fn camera_azimuth(&self) -> f32 {
        self.camera.azimuth()
    }

    /// Camera position as `x, y, z`.
    pub fn camera_position(&self) -> Vec<f32> {
        let p = self.camera.position;
        vec![p.x, p.y, p.z]
    }

    /// Column-major 4x4 view matrix for the orbiting camera.
    pub fn view_matrix(&self) -> Vec<f32> {
        self.camera.view_matrix().as_slice().to_vec()
    }

    /// Column-major 4x4 transform of the front (`back == false`) or back face.
    pub fn face_matrix(&self, back: bool) -> Vec<f32> {
        let (front, back_matrix) = self.widget.face_matrices();
        let matrix = if back { back_matrix } else { front };
        matrix.as_slice().to_vec()
    }
}

/// Current `window.innerWidth` in CSS pixels.
pub fn viewport_width() -> Result<f32, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let width = window
        .inner_width()?
        .as_f64()
        .ok_or_else(|| JsValue::from_str("innerWidth is not a number"))?;
    Ok(width as f32)
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    Ok(())
}
