/// Rounded-rectangle card silhouette
use nalgebra::Point2;

use crate::dimensions::CardDimensions;
use crate::error::{CardError, Result};

/// Corner radius as a fraction of card width.
pub const DEFAULT_CORNER_RATIO: f32 = 0.05;

/// Consecutive flattened points closer than this are merged.
const MERGE_DISTANCE: f32 = 1e-6;

/// One piece of a path. Each segment starts where the previous one ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line { to: Point2<f32> },
    Quadratic { control: Point2<f32>, to: Point2<f32> },
}

impl PathSegment {
    pub fn end(&self) -> Point2<f32> {
        match *self {
            PathSegment::Line { to } | PathSegment::Quadratic { to, .. } => to,
        }
    }
}

/// Closed outline of a card centred on the origin, y pointing up.
///
/// The path starts on the bottom edge, inset by the corner radius, and runs
/// counter-clockwise: bottom edge, bottom-right corner, right edge and so on,
/// finishing with the bottom-left corner back at `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedOutline {
    pub start: Point2<f32>,
    pub segments: Vec<PathSegment>,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
}

impl RoundedOutline {
    pub fn new(dimensions: CardDimensions, corner_ratio: f32) -> Result<Self> {
        let CardDimensions { width: w, height: h } = dimensions;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(CardError::InvalidDimension { width: w, height: h });
        }
        if !corner_ratio.is_finite() || corner_ratio < 0.0 {
            return Err(CardError::InvalidConfig {
                key: "corner_ratio",
                value: corner_ratio,
            });
        }

        let r = (corner_ratio * w).min(dimensions.shorter_side() / 2.0);
        let x = -w / 2.0;
        let y = -h / 2.0;

        let start = Point2::new(x + r, y);
        let segments = vec![
            PathSegment::Line {
                to: Point2::new(x + w - r, y),
            },
            PathSegment::Quadratic {
                control: Point2::new(x + w, y),
                to: Point2::new(x + w, y + r),
            },
            PathSegment::Line {
                to: Point2::new(x + w, y + h - r),
            },
            PathSegment::Quadratic {
                control: Point2::new(x + w, y + h),
                to: Point2::new(x + w - r, y + h),
            },
            PathSegment::Line {
                to: Point2::new(x + r, y + h),
            },
            PathSegment::Quadratic {
                control: Point2::new(x, y + h),
                to: Point2::new(x, y + h - r),
            },
            PathSegment::Line {
                to: Point2::new(x, y + r),
            },
            PathSegment::Quadratic {
                control: Point2::new(x, y),
                to: start,
            },
        ];

        Ok(Self {
            start,
            segments,
            width: w,
            height: h,
            corner_radius: r,
        })
    }

    pub fn end_point(&self) -> Point2<f32> {
        self.segments.last().map_or(self.start, PathSegment::end)
    }

    pub fn is_closed(&self, tolerance: f32) -> bool {
        (self.end_point() - self.start).norm() <= tolerance
    }

    /// Sample the path into a polygon. Each quadratic contributes
    /// `curve_segments` points; duplicates and the closing point are dropped.
    pub fn flatten(&self, curve_segments: u32) -> Vec<Point2<f32>> {
        let divisions = curve_segments.max(1);
        let mut points = vec![self.start];
        let mut cursor = self.start;

        for segment in &self.segments {
            match *segment {
                PathSegment::Line { to } => push_point(&mut points, to),
                PathSegment::Quadratic { control, to } => {
                    for i in 1..=divisions {
                        let t = i as f32 / divisions as f32;
                        push_point(&mut points, quadratic_point(cursor, control, to, t));
                    }
                }
            }
            cursor = segment.end();
        }

        if points.len() > 1 {
            if let Some(last) = points.last() {
                if (last - points[0]).norm() <= MERGE_DISTANCE {
                    points.pop();
                }
            }
        }
        points
    }
}

/// Outline for a card `width` wide with the default corner ratio.
pub fn build_outline(width: f32, aspect_ratio: f32) -> Result<RoundedOutline> {
    RoundedOutline::new(CardDimensions::new(width, aspect_ratio)?, DEFAULT_CORNER_RATIO)
}

fn push_point(points: &mut Vec<Point2<f32>>, point: Point2<f32>) {
    match points.last() {
        Some(last) if (last - point).norm() <= MERGE_DISTANCE => {}
        _ => points.push(point),
    }
}

fn quadratic_point(p0: Point2<f32>, control: Point2<f32>, p1: Point2<f32>, t: f32) -> Point2<f32> {
    let k = 1.0 - t;
    Point2::from(p0.coords * (k * k) + control.coords * (2.0 * k * t) + p1.coords * (t * t))
}
