/// Interaction and animation state for a single card
///
/// Commands (pointer and button events) only record state. All motion
/// happens in [`CardController::update`], which the host calls once per
/// rendered frame and which reports completions as [`CardEvent`]s.
use std::f32::consts::TAU;

use nalgebra::Point2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::catalog::FaceCatalog;
use crate::config::CardConfig;
use crate::error::{CardError, Result};
use crate::spring::Spring;
use crate::transform::Orientation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationRequest {
    #[default]
    None,
    Flip,
}

/// Hover, touch and flip flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionState {
    pub pointer_over: bool,
    pub pointer_down: bool,
    pub requested_animation: AnimationRequest,
    pub flip_in_progress: bool,
}

impl InteractionState {
    pub fn effective_hover(&self) -> bool {
        self.pointer_over || self.pointer_down
    }

    pub fn tilt_enabled(&self) -> bool {
        self.effective_hover() && !self.flip_in_progress
    }
}

/// Something that finished during a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardEvent {
    /// The flip spring settled on a full turn. Fires once per accepted flip.
    FlipCompleted,
    /// A pending face change was applied after its flip.
    FaceChanged { previous: String, current: String },
}

pub struct CardController {
    tilt_max_angle: f32,
    smoothing: f32,
    hover_scale: f32,
    interaction: InteractionState,
    pointer: Point2<f32>,
    orientation: Orientation,
    flip: Spring,
    scale: Spring,
    catalog: FaceCatalog,
    pending_face_swap: bool,
    rng: SmallRng,
}

impl CardController {
    /// Create a controller showing a random face from `faces`.
    pub fn new(config: &CardConfig, faces: Vec<String>, seed: u64) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let catalog = FaceCatalog::new(faces, &mut rng)?;
        Ok(Self::with_parts(config, catalog, rng))
    }

    pub fn with_catalog(config: &CardConfig, catalog: FaceCatalog, seed: u64) -> Self {
        Self::with_parts(config, catalog, SmallRng::seed_from_u64(seed))
    }

    fn with_parts(config: &CardConfig, catalog: FaceCatalog, rng: SmallRng) -> Self {
        Self {
            tilt_max_angle: config.tilt_max_angle,
            smoothing: config.smoothing,
            hover_scale: config.hover_scale,
            interaction: InteractionState::default(),
            pointer: Point2::origin(),
            orientation: Orientation::zero(),
            flip: Spring::new(0.0, config.flip_spring).with_rest_policy(config.rest),
            scale: Spring::new(1.0, config.scale_spring).with_rest_policy(config.rest),
            catalog,
            pending_face_swap: false,
            rng,
        }
    }

    pub fn pointer_enter(&mut self) {
        self.interaction.pointer_over = true;
    }

    /// Ignored while a flip is running.
    pub fn pointer_leave(&mut self) {
        if !self.interaction.flip_in_progress {
            self.interaction.pointer_over = false;
        }
    }

    pub fn pointer_down(&mut self) {
        self.interaction.pointer_down = true;
    }

    pub fn pointer_up(&mut self) {
        self.interaction.pointer_down = false;
        self.interaction.pointer_over = false;
    }

    /// Latest pointer position in normalised device coordinates, y up.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        let sanitize = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        self.pointer = Point2::new(sanitize(x), sanitize(y));
    }

    /// Start a flip. Returns false (and changes nothing) if one is running.
    pub fn request_flip(&mut self) -> bool {
        if self.interaction.flip_in_progress {
            tracing::trace!("flip already in progress, request ignored");
            return false;
        }
        self.interaction.requested_animation = AnimationRequest::Flip;
        self.interaction.flip_in_progress = true;
        // The card turns from a frontal pose.
        self.orientation = Orientation::zero();
        tracing::debug!("flip started");
        true
    }

    /// Flip the card and show a different face once the flip settles.
    pub fn request_face_change(&mut self) -> Result<()> {
        if !self.catalog.can_change() {
            return Err(CardError::EmptyCatalog {
                len: self.catalog.len(),
            });
        }
        self.pending_face_swap = true;
        self.request_flip();
        Ok(())
    }

    /// Advance one display frame that lasted `dt` seconds.
    pub fn update(&mut self, dt: f32) -> Vec<CardEvent> {
        let mut events = Vec::new();

        let target = if self.interaction.tilt_enabled() {
            Orientation::new(
                -self.pointer.y * self.tilt_max_angle,
                self.pointer.x * self.tilt_max_angle,
            )
        } else {
            Orientation::zero()
        };
        self.orientation.lerp_toward(target, self.smoothing);

        let flip_target = if self.interaction.flip_in_progress { TAU } else { 0.0 };
        self.flip.set_target(flip_target);
        let settled = self.flip.step(dt);
        if settled && self.interaction.flip_in_progress {
            self.finish_flip(&mut events);
        }

        let scale_target = if self.interaction.effective_hover() {
            self.hover_scale
        } else {
            1.0
        };
        self.scale.set_target(scale_target);
        self.scale.step(dt);

        events
    }

    fn finish_flip(&mut self, events: &mut Vec<CardEvent>) {
        self.interaction.flip_in_progress = false;
        self.interaction.requested_animation = AnimationRequest::None;
        // The angle stays at 2π; later frames spring it back to 0.
        tracing::debug!("flip completed");
        events.push(CardEvent::FlipCompleted);

        if self.pending_face_swap {
            self.pending_face_swap = false;
            let previous = self.catalog.current().to_string();
            match self.catalog.pick_different(&mut self.rng) {
                Ok(current) => {
                    let current = current.to_string();
                    tracing::debug!(%previous, %current, "face changed");
                    events.push(CardEvent::FaceChanged { previous, current });
                }
                Err(err) => tracing::warn!(%err, "face change dropped"),
            }
        }
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Rotation about the vertical axis from the flip, in [0, 2π]. Rises to
    /// 2π during a flip and springs back to 0 once it has completed.
    pub fn flip_angle(&self) -> f32 {
        self.flip.value()
    }

    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    pub fn pointer(&self) -> Point2<f32> {
        self.pointer
    }

    pub fn catalog(&self) -> &FaceCatalog {
        &self.catalog
    }

    pub fn current_face(&self) -> &str {
        self.catalog.current()
    }

    pub fn is_flipping(&self) -> bool {
        self.interaction.flip_in_progress
    }

    pub fn effective_hover(&self) -> bool {
        self.interaction.effective_hover()
    }

    pub fn tilt_enabled(&self) -> bool {
        self.interaction.tilt_enabled()
    }

    pub fn pending_face_swap(&self) -> bool {
        self.pending_face_swap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const FRAME: f32 = 1.0 / 60.0;

    fn controller(faces: &[&str]) -> CardController {
        let faces = faces.iter().map(|s| s.to_string()).collect();
        let catalog = FaceCatalog::with_current(faces, "A").unwrap();
        CardController::with_catalog(&CardConfig::default(), catalog, 11)
    }

    /// Run frames until a flip completes, returning every event seen.
    fn run_until_settled(card: &mut CardController) -> Vec<CardEvent> {
        let mut events = Vec::new();
        for _ in 0..600 {
            events.extend(card.update(FRAME));
            if !card.is_flipping() {
                break;
            }
        }
        events
    }

    #[test]
    fn test_first_frame_of_hover_tilt() {
        let mut card = controller(&["A", "B"]);
        card.set_pointer(0.5, -0.5);
        assert!(!card.tilt_enabled());
        card.pointer_enter();
        assert!(card.tilt_enabled());

        card.update(FRAME);
        let expected = 0.2 * PI / 16.0;
        let o = card.orientation();
        assert!((o.tilt_x - expected).abs() < 1e-6);
        assert!((o.tilt_y - expected).abs() < 1e-6);
    }

    #[test]
    fn test_tilt_decays_after_leave() {
        let mut card = controller(&["A", "B"]);
        card.set_pointer(1.0, 1.0);
        card.pointer_enter();
        for _ in 0..120 {
            card.update(FRAME);
        }
        let initial = card.orientation().magnitude();
        assert!((initial - (2.0f32).sqrt() * PI / 8.0).abs() < 1e-3);

        card.pointer_leave();
        let epsilon = 1e-3f32;
        let frames = ((epsilon / initial).ln() / 0.8f32.ln()).ceil() as usize;
        for _ in 0..frames {
            card.update(FRAME);
        }
        assert!(card.orientation().magnitude() <= epsilon * 1.001);
    }

    #[test]
    fn test_flip_resets_tilt_and_ignores_pointer() {
        let mut card = controller(&["A", "B"]);
        card.set_pointer(0.8, 0.3);
        card.pointer_enter();
        for _ in 0..10 {
            card.update(FRAME);
        }
        assert!(card.orientation().magnitude() > 0.0);

        assert!(card.request_flip());
        assert_eq!(card.orientation(), Orientation::zero());
        assert!(!card.tilt_enabled());
        for _ in 0..5 {
            card.update(FRAME);
            assert_eq!(card.orientation(), Orientation::zero());
        }
    }

    #[test]
    fn test_second_flip_request_is_ignored() {
        let mut card = controller(&["A", "B"]);
        assert!(card.request_flip());
        for _ in 0..10 {
            card.update(FRAME);
        }
        let angle = card.flip_angle();
        assert!(angle > 0.0);

        assert!(!card.request_flip());
        assert!(card.is_flipping());
        assert_eq!(card.flip_angle(), angle);

        let completions = run_until_settled(&mut card)
            .into_iter()
            .filter(|e| *e == CardEvent::FlipCompleted)
            .count();
        assert_eq!(completions, 1);

        for _ in 0..120 {
            assert!(card.update(FRAME).is_empty());
        }
    }

    #[test]
    fn test_flip_completes_only_after_full_turn() {
        let mut card = controller(&["A", "B"]);
        card.request_flip();

        let mut last_angle = 0.0;
        let mut completed = false;
        for _ in 0..600 {
            let events = card.update(FRAME);
            if events.contains(&CardEvent::FlipCompleted) {
                completed = true;
                break;
            }
            assert!(card.is_flipping());
            assert!(card.flip_angle() < TAU);
            last_angle = card.flip_angle();
        }
        assert!(completed);
        assert!(last_angle > TAU - 0.01);
        assert_eq!(card.flip_angle(), TAU);
        assert_eq!(card.interaction().requested_animation, AnimationRequest::None);
    }

    #[test]
    fn test_flip_unwinds_to_zero_without_second_completion() {
        let mut card = controller(&["A", "B"]);
        card.request_flip();
        run_until_settled(&mut card);
        assert_eq!(card.flip_angle(), TAU);

        let mut previous = card.flip_angle();
        for _ in 0..5 {
            assert!(card.update(FRAME).is_empty());
            assert!(card.flip_angle() < previous);
            previous = card.flip_angle();
        }

        for _ in 0..600 {
            assert!(card.update(FRAME).is_empty());
        }
        assert_eq!(card.flip_angle(), 0.0);
        assert!(!card.is_flipping());
    }

    #[test]
    fn test_tilt_returns_during_unwind() {
        let mut card = controller(&["A", "B"]);
        card.set_pointer(0.5, 0.5);
        card.pointer_enter();
        card.request_flip();
        run_until_settled(&mut card);
        assert!(card.tilt_enabled());

        card.update(FRAME);
        assert!(card.flip_angle() > 0.0);
        assert!(card.orientation().magnitude() > 0.0);
    }

    #[test]
    fn test_face_change_picks_another_face() {
        for seed in 0..20 {
            let faces = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
            let catalog = FaceCatalog::with_current(faces, "A").unwrap();
            let mut card = CardController::with_catalog(&CardConfig::default(), catalog, seed);

            card.request_face_change().unwrap();
            assert!(card.pending_face_swap());
            card.update(FRAME);
            assert_eq!(card.current_face(), "A");

            let events = run_until_settled(&mut card);
            assert!(!card.pending_face_swap());
            assert_ne!(card.current_face(), "A");
            assert!(["B", "C"].contains(&card.current_face()));
            assert_eq!(events.len(), 2);
            assert_eq!(events[0], CardEvent::FlipCompleted);
            assert_eq!(
                events[1],
                CardEvent::FaceChanged {
                    previous: "A".into(),
                    current: card.current_face().into(),
                }
            );
        }
    }

    #[test]
    fn test_face_change_during_flip_applies_at_its_end() {
        let mut card = controller(&["A", "B"]);
        card.request_flip();
        card.update(FRAME);
        card.request_face_change().unwrap();
        run_until_settled(&mut card);
        assert_eq!(card.current_face(), "B");
    }

    #[test]
    fn test_face_change_needs_two_faces() {
        let mut card = controller(&["A"]);
        assert_eq!(
            card.request_face_change(),
            Err(CardError::EmptyCatalog { len: 1 })
        );
        assert!(!card.is_flipping());
        assert!(!card.pending_face_swap());
    }

    #[test]
    fn test_pointer_leave_ignored_while_flipping() {
        let mut card = controller(&["A", "B"]);
        card.pointer_enter();
        card.request_flip();
        card.pointer_leave();
        assert!(card.interaction().pointer_over);

        card.pointer_up();
        assert!(!card.effective_hover());
    }

    #[test]
    fn test_hover_scale() {
        let mut card = controller(&["A", "B"]);
        card.pointer_down();
        for _ in 0..300 {
            card.update(FRAME);
        }
        assert!((card.scale() - 1.2).abs() < 1e-3);

        card.pointer_up();
        for _ in 0..300 {
            card.update(FRAME);
        }
        assert!((card.scale() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_pointer_is_clamped() {
        let mut card = controller(&["A", "B"]);
        card.set_pointer(3.0, f32::NAN);
        assert_eq!(card.pointer(), Point2::new(1.0, 0.0));
    }
}
