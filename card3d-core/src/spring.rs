/// Damped spring used for flip and hover-scale animation
///
/// The spring is a mass/tension/friction oscillator integrated with
/// semi-implicit Euler in fixed 1 ms sub-steps. The caller's frame delta only
/// decides how many sub-steps run, so the motion does not depend on the
/// display refresh rate.

/// Sub-step size in seconds.
const STEP: f32 = 0.001;

/// Longest frame delta honoured in one call. Longer gaps (a backgrounded tab,
/// a debugger pause) are treated as this long.
const MAX_FRAME: f32 = 0.064;

/// Physical parameters of a spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub mass: f32,
    pub tension: f32,
    pub friction: f32,
}

impl SpringConfig {
    /// Tuning for the full-turn flip.
    pub const FLIP: Self = Self::new(1.0, 180.0, 30.0);

    /// Tuning for the hover scale-up.
    pub const SCALE: Self = Self::new(1.0, 170.0, 26.0);

    pub const fn new(mass: f32, tension: f32, friction: f32) -> Self {
        Self {
            mass,
            tension,
            friction,
        }
    }

    /// Damping ratio; above 1 the spring never overshoots.
    pub fn damping_ratio(&self) -> f32 {
        self.friction / (2.0 * (self.tension * self.mass).sqrt())
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::SCALE
    }
}

/// Thresholds deciding when a spring counts as settled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestPolicy {
    /// Maximum distance from the target.
    pub epsilon: f32,
    /// Maximum absolute velocity.
    pub velocity: f32,
}

impl Default for RestPolicy {
    fn default() -> Self {
        Self {
            epsilon: 0.001,
            velocity: 0.01,
        }
    }
}

/// A single animated scalar.
#[derive(Debug, Clone)]
pub struct Spring {
    value: f32,
    velocity: f32,
    target: f32,
    config: SpringConfig,
    rest: RestPolicy,
}

impl Spring {
    /// Create a spring resting at `value`.
    pub fn new(value: f32, config: SpringConfig) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
            config,
            rest: RestPolicy::default(),
        }
    }

    pub fn with_rest_policy(mut self, rest: RestPolicy) -> Self {
        self.rest = rest;
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn is_at_rest(&self) -> bool {
        (self.value - self.target).abs() < self.rest.epsilon
            && self.velocity.abs() < self.rest.velocity
    }

    /// Advance by `dt` seconds. Returns true once the spring is at rest, in
    /// which case the value has been snapped exactly onto the target.
    pub fn step(&mut self, dt: f32) -> bool {
        if self.is_at_rest() {
            self.value = self.target;
            self.velocity = 0.0;
            return true;
        }

        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME) } else { 0.0 };
        let steps = (dt / STEP).ceil() as u32;
        let h = if steps == 0 { 0.0 } else { dt / steps as f32 };

        for _ in 0..steps {
            let displacement = self.value - self.target;
            let force = -self.config.tension * displacement - self.config.friction * self.velocity;
            self.velocity += force / self.config.mass * h;
            self.value += self.velocity * h;
        }

        if self.is_at_rest() {
            self.value = self.target;
            self.velocity = 0.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn test_spring_at_rest_stays_put() {
        let mut spring = Spring::new(1.0, SpringConfig::SCALE);
        assert!(spring.step(FRAME));
        assert_eq!(spring.value(), 1.0);
    }

    #[test]
    fn test_flip_spring_is_overdamped() {
        assert!(SpringConfig::FLIP.damping_ratio() > 1.0);
    }

    #[test]
    fn test_overdamped_spring_converges_monotonically() {
        let target = std::f32::consts::TAU;
        let mut spring = Spring::new(0.0, SpringConfig::FLIP);
        spring.set_target(target);

        let mut previous = spring.value();
        let mut settled = false;
        for _ in 0..600 {
            settled = spring.step(FRAME);
            assert!(spring.value() >= previous - 1e-5);
            assert!(spring.value() <= target + 1e-4);
            previous = spring.value();
            if settled {
                break;
            }
        }
        assert!(settled);
        assert_eq!(spring.value(), target);
    }

    #[test]
    fn test_scale_spring_settles() {
        let mut spring = Spring::new(1.0, SpringConfig::SCALE);
        spring.set_target(1.2);
        let frames = (0..600).position(|_| spring.step(FRAME));
        assert!(frames.is_some());
        assert!((spring.value() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_huge_frame_delta_is_clamped() {
        let mut a = Spring::new(0.0, SpringConfig::FLIP);
        let mut b = a.clone();
        a.set_target(1.0);
        b.set_target(1.0);
        a.step(10.0);
        b.step(MAX_FRAME);
        assert!((a.value() - b.value()).abs() < 1e-6);
    }
}
