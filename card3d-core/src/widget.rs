/// A card with its geometry kept in step with the viewport
use nalgebra::Matrix4;

use crate::config::CardConfig;
use crate::controller::{CardController, CardEvent};
use crate::dimensions::CardDimensions;
use crate::error::Result;
use crate::outline::RoundedOutline;
use crate::surface::{build_surface, Surface};
use crate::transform::Transform;

/// Everything a renderer needs for one card: the controller plus the outline
/// and surface built for the current card size.
pub struct CardWidget {
    config: CardConfig,
    dimensions: CardDimensions,
    outline: RoundedOutline,
    surface: Surface,
    controller: CardController,
}

impl CardWidget {
    pub fn new(config: CardConfig, faces: Vec<String>, viewport_width: f32, seed: u64) -> Result<Self> {
        config.validate()?;
        let controller = CardController::new(&config, faces, seed)?;
        let dimensions = CardDimensions::for_viewport(viewport_width, &config)?;
        let (outline, surface) = build_geometry(dimensions, &config)?;
        Ok(Self {
            config,
            dimensions,
            outline,
            surface,
            controller,
        })
    }

    /// React to a viewport width change. Geometry is rebuilt only when the
    /// card size actually changes; returns whether it did.
    pub fn resize(&mut self, viewport_width: f32) -> Result<bool> {
        let dimensions = CardDimensions::for_viewport(viewport_width, &self.config)?;
        if dimensions == self.dimensions {
            return Ok(false);
        }
        let (outline, surface) = build_geometry(dimensions, &self.config)?;
        tracing::debug!(
            viewport_width,
            width = dimensions.width,
            height = dimensions.height,
            "card geometry rebuilt"
        );
        self.dimensions = dimensions;
        self.outline = outline;
        self.surface = surface;
        Ok(true)
    }

    pub fn update(&mut self, dt: f32) -> Vec<CardEvent> {
        self.controller.update(dt)
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn dimensions(&self) -> CardDimensions {
        self.dimensions
    }

    pub fn outline(&self) -> &RoundedOutline {
        &self.outline
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn controller(&self) -> &CardController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut CardController {
        &mut self.controller
    }

    /// Card body transform (tilt and hover scale, no flip).
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Transform::model_matrix(&self.controller.orientation(), self.controller.scale())
    }

    /// `(front, back)` transforms including the flip.
    pub fn face_matrices(&self) -> (Matrix4<f32>, Matrix4<f32>) {
        Transform::face_matrices(
            &self.controller.orientation(),
            self.controller.scale(),
            self.controller.flip_angle(),
        )
    }
}

fn build_geometry(dimensions: CardDimensions, config: &CardConfig) -> Result<(RoundedOutline, Surface)> {
    let outline = RoundedOutline::new(dimensions, config.corner_ratio)?;
    let surface = build_surface(&outline, config.curve_segments)?;
    Ok((outline, surface))
}
