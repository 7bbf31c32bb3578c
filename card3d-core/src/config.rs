/// Tunable constants for card layout and animation
///
/// Defaults reproduce the reference tuning. Overrides come from a small
/// line-oriented text format:
///
/// ```text
/// # comments run to end of line
/// aspect_ratio = 88 / 63
/// flip_spring.tension = 200
/// ```
use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::{all_consuming, opt},
    number::complete::float,
    sequence::{delimited, preceded, terminated},
    IResult,
};

use crate::error::{CardError, Result};
use crate::spring::{RestPolicy, SpringConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct CardConfig {
    /// Viewport widths strictly below this use the mobile card width.
    pub mobile_breakpoint: f32,
    pub mobile_width: f32,
    pub desktop_width: f32,
    /// Height divided by width.
    pub aspect_ratio: f32,
    /// Corner radius as a fraction of card width.
    pub corner_ratio: f32,
    /// Samples per quadratic corner when flattening the outline.
    pub curve_segments: u32,
    /// Tilt at the edge of the viewport, in radians.
    pub tilt_max_angle: f32,
    /// Per-frame exponential smoothing factor for tilt.
    pub smoothing: f32,
    pub hover_scale: f32,
    pub flip_spring: SpringConfig,
    pub scale_spring: SpringConfig,
    pub rest: RestPolicy,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
            mobile_width: 1.5,
            desktop_width: 2.0,
            aspect_ratio: 88.0 / 63.0,
            corner_ratio: 0.05,
            curve_segments: 12,
            tilt_max_angle: std::f32::consts::PI / 8.0,
            smoothing: 0.2,
            hover_scale: 1.2,
            flip_spring: SpringConfig::FLIP,
            scale_spring: SpringConfig::SCALE,
            rest: RestPolicy::default(),
        }
    }
}

impl CardConfig {
    /// Parse overrides on top of the defaults, then validate the result.
    pub fn parse(text: &str) -> Result<Self> {
        let mut config = Self::default();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }

            let (_, (key, value)) = all_consuming(entry)(content).map_err(|_| CardError::Config {
                line,
                message: format!("expected `key = value`, got {content:?}"),
            })?;

            config
                .set(key, value)
                .map_err(|message| CardError::Config { line, message })?;
        }

        config.validate()?;
        Ok(config)
    }

    fn set(&mut self, key: &str, value: f32) -> std::result::Result<(), String> {
        match key {
            "mobile_breakpoint" => self.mobile_breakpoint = value,
            "mobile_width" => self.mobile_width = value,
            "desktop_width" => self.desktop_width = value,
            "aspect_ratio" => self.aspect_ratio = value,
            "corner_ratio" => self.corner_ratio = value,
            "curve_segments" => {
                if value < 1.0 || value.fract() != 0.0 {
                    return Err(format!("curve_segments must be a positive integer, got {value}"));
                }
                self.curve_segments = value as u32;
            }
            "tilt_max_angle" => self.tilt_max_angle = value,
            "smoothing" => self.smoothing = value,
            "hover_scale" => self.hover_scale = value,
            "flip_spring.mass" => self.flip_spring.mass = value,
            "flip_spring.tension" => self.flip_spring.tension = value,
            "flip_spring.friction" => self.flip_spring.friction = value,
            "scale_spring.mass" => self.scale_spring.mass = value,
            "scale_spring.tension" => self.scale_spring.tension = value,
            "scale_spring.friction" => self.scale_spring.friction = value,
            "rest.epsilon" => self.rest.epsilon = value,
            "rest.velocity" => self.rest.velocity = value,
            _ => return Err(format!("unknown key `{key}`")),
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("mobile_breakpoint", self.mobile_breakpoint),
            ("mobile_width", self.mobile_width),
            ("desktop_width", self.desktop_width),
            ("aspect_ratio", self.aspect_ratio),
            ("hover_scale", self.hover_scale),
            ("flip_spring.mass", self.flip_spring.mass),
            ("flip_spring.tension", self.flip_spring.tension),
            ("scale_spring.mass", self.scale_spring.mass),
            ("scale_spring.tension", self.scale_spring.tension),
            ("rest.epsilon", self.rest.epsilon),
            ("rest.velocity", self.rest.velocity),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CardError::InvalidConfig { key, value });
            }
        }

        let non_negative = [
            ("tilt_max_angle", self.tilt_max_angle),
            ("flip_spring.friction", self.flip_spring.friction),
            ("scale_spring.friction", self.scale_spring.friction),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CardError::InvalidConfig { key, value });
            }
        }

        if !(self.corner_ratio > 0.0 && self.corner_ratio <= 0.5) {
            return Err(CardError::InvalidConfig {
                key: "corner_ratio",
                value: self.corner_ratio,
            });
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(CardError::InvalidConfig {
                key: "smoothing",
                value: self.smoothing,
            });
        }
        Ok(())
    }
}

fn entry(input: &str) -> IResult<&str, (&str, f32)> {
    let (input, key) = take_while1(is_key_char)(input)?;
    let (input, _) = delimited(space0, char('='), space0)(input)?;
    let (input, value) = terminated(ratio, space0)(input)?;
    Ok((input, (key, value)))
}

/// A number, optionally written as a fraction such as `88 / 63`.
fn ratio(input: &str) -> IResult<&str, f32> {
    let (input, numerator) = float(input)?;
    let (input, denominator) = opt(preceded(delimited(space0, char('/'), space0), float))(input)?;
    Ok((input, denominator.map_or(numerator, |d| numerator / d)))
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.curve_segments, 12);
        assert!((config.aspect_ratio - 88.0 / 63.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_overrides() {
        let text = "
            # wider cards
            desktop_width = 2.5
            aspect_ratio = 7 / 5   # poker
            flip_spring.tension = 200
            curve_segments=4
        ";
        let config = CardConfig::parse(text).unwrap();
        assert_eq!(config.desktop_width, 2.5);
        assert!((config.aspect_ratio - 1.4).abs() < 1e-6);
        assert_eq!(config.flip_spring.tension, 200.0);
        assert_eq!(config.flip_spring.friction, 30.0);
        assert_eq!(config.curve_segments, 4);
        assert_eq!(config.mobile_width, 1.5);
    }

    #[test]
    fn test_parse_reports_line_of_syntax_error() {
        let err = CardConfig::parse("smoothing = 0.3\nthis is not valid\n").unwrap_err();
        assert!(matches!(err, CardError::Config { line: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_unknown_key() {
        let err = CardConfig::parse("tilt = 1").unwrap_err();
        match err {
            CardError::Config { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("tilt"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_fractional_segments() {
        assert!(CardConfig::parse("curve_segments = 2.5").is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        assert!(matches!(
            CardConfig::parse("smoothing = 1.5"),
            Err(CardError::InvalidConfig { key: "smoothing", .. })
        ));
        assert!(matches!(
            CardConfig::parse("desktop_width = 0"),
            Err(CardError::InvalidConfig { key: "desktop_width", .. })
        ));
        assert!(matches!(
            CardConfig::parse("aspect_ratio = 1 / 0"),
            Err(CardError::InvalidConfig { key: "aspect_ratio", .. })
        ));
    }
}
