/// Card size selection
use crate::config::CardConfig;
use crate::error::{CardError, Result};

/// Physical card size in scene units. Height is always `width * aspect_ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardDimensions {
    pub width: f32,
    pub height: f32,
}

impl CardDimensions {
    pub fn new(width: f32, aspect_ratio: f32) -> Result<Self> {
        let height = width * aspect_ratio;
        if !width.is_finite() || width <= 0.0 || !height.is_finite() || height <= 0.0 {
            return Err(CardError::InvalidDimension { width, height });
        }
        Ok(Self { width, height })
    }

    /// Pick the mobile or desktop card width for a viewport `viewport_width`
    /// pixels wide.
    pub fn for_viewport(viewport_width: f32, config: &CardConfig) -> Result<Self> {
        let width = if is_mobile(viewport_width, config) {
            config.mobile_width
        } else {
            config.desktop_width
        };
        Self::new(width, config.aspect_ratio)
    }

    pub fn shorter_side(&self) -> f32 {
        self.width.min(self.height)
    }
}

pub fn is_mobile(viewport_width: f32, config: &CardConfig) -> bool {
    viewport_width < config.mobile_breakpoint
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_card_height() {
        let dims = CardDimensions::new(2.0, 88.0 / 63.0).unwrap();
        assert!((dims.height - 2.7937).abs() < 1e-4);
    }

    #[test]
    fn test_breakpoint_selects_width() {
        let config = CardConfig::default();
        assert_eq!(CardDimensions::for_viewport(767.0, &config).unwrap().width, 1.5);
        assert_eq!(CardDimensions::for_viewport(768.0, &config).unwrap().width, 2.0);
        assert_eq!(CardDimensions::for_viewport(1920.0, &config).unwrap().width, 2.0);
    }

    #[test]
    fn test_rejects_non_positive_width() {
        assert!(matches!(
            CardDimensions::new(0.0, 1.0),
            Err(CardError::InvalidDimension { .. })
        ));
        assert!(CardDimensions::new(-1.0, 1.0).is_err());
        assert!(CardDimensions::new(f32::NAN, 1.0).is_err());
        assert!(CardDimensions::new(1.0, 0.0).is_err());
    }
}
