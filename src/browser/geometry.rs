//! Element geometry derived from the box model.
//!
//! The box model reports each box as a quad of eight numbers, corner points
//! clockwise from the top-left: `[x1, y1, x2, y2, x3, y3, x4, y4]`.
//! A [`BoundingBox`] reads `left = x1`, `top = y1`, `right = x2`,
//! `bottom = y4` from the content quad.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::protocol::{BoxModel, Viewport};

// ============================================================================
// Point
// ============================================================================

/// Viewport coordinate in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

// ============================================================================
// BoundingBox
// ============================================================================

/// Axis-aligned box of an element's content area.
///
/// Compared with exact equality; no tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Top edge.
    pub top: f64,
    /// Left edge.
    pub left: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl BoundingBox {
    /// Reads the box from the content quad of a box model.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the quad has fewer than eight values.
    pub fn from_model(model: &BoxModel) -> Result<Self> {
        let quad = &model.content;
        if quad.len() < 8 {
            return Err(Error::malformed(format!(
                "content quad has {} values, expected 8",
                quad.len()
            )));
        }

        let (left, top) = (quad[0], quad[1]);
        Ok(Self {
            top,
            left,
            width: quad[2] - left,
            height: quad[7] - top,
        })
    }

    /// Center of the box.
    ///
    /// Clicking the center avoids edge pixels claimed by overlapping siblings.
    #[inline]
    #[must_use]
    pub fn click_point(&self) -> Point {
        Point {
            x: self.left + self.width / 2.0,
            y: self.top + self.height / 2.0,
        }
    }

    /// Capture region covering the box at device scale 1.
    #[inline]
    #[must_use]
    pub fn clip(&self) -> Viewport {
        Viewport {
            x: self.left,
            y: self.top,
            width: self.width,
            height: self.height,
            scale: 1.0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn model(content: Vec<f64>) -> BoxModel {
        BoxModel {
            content,
            ..BoxModel::default()
        }
    }

    #[test]
    fn test_from_model_reads_content_quad() {
        let b = BoundingBox::from_model(&model(vec![
            20.0, 10.0, 120.0, 10.0, 120.0, 60.0, 20.0, 60.0,
        ]))
        .expect("box");
        assert_eq!(
            b,
            BoundingBox {
                top: 10.0,
                left: 20.0,
                width: 100.0,
                height: 50.0
            }
        );
    }

    #[test]
    fn test_click_point_is_center() {
        let b = BoundingBox {
            top: 10.0,
            left: 20.0,
            width: 100.0,
            height: 50.0,
        };
        assert_eq!(b.click_point(), Point { x: 70.0, y: 35.0 });
    }

    #[test]
    fn test_short_quad_is_rejected() {
        let err = BoundingBox::from_model(&model(vec![0.0; 4])).unwrap_err();
        assert!(err.is_protocol_error());
    }

    #[test]
    fn test_clip_uses_unit_scale() {
        let b = BoundingBox {
            top: 1.0,
            left: 2.0,
            width: 3.0,
            height: 4.0,
        };
        let clip = b.clip();
        assert_eq!((clip.x, clip.y, clip.width, clip.height), (2.0, 1.0, 3.0, 4.0));
        assert_eq!(clip.scale, 1.0);
    }

    proptest! {
        #[test]
        fn prop_rectangle_quad_round_trips(
            left in -5000.0f64..5000.0,
            top in -5000.0f64..5000.0,
            width in 0.0f64..5000.0,
            height in 0.0f64..5000.0,
        ) {
            let (right, bottom) = (left + width, top + height);
            let b = BoundingBox::from_model(&model(vec![
                left, top, right, top, right, bottom, left, bottom,
            ])).expect("box");

            prop_assert_eq!(b.left, left);
            prop_assert_eq!(b.top, top);
            prop_assert!((b.width - width).abs() < 1e-6);
            prop_assert!((b.height - height).abs() < 1e-6);
        }

        #[test]
        fn prop_click_point_inside_box(
            left in -5000.0f64..5000.0,
            top in -5000.0f64..5000.0,
            width in 0.0f64..5000.0,
            height in 0.0f64..5000.0,
        ) {
            let b = BoundingBox { top, left, width, height };
            let p = b.click_point();
            prop_assert!(p.x >= left && p.x <= left + width);
            prop_assert!(p.y >= top && p.y <= top + height);
        }
    }
}
