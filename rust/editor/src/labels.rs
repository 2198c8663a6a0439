// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live length/angle labels
//!
//! Text extents are estimated from the font size, so label layout is
//! deterministic and independent of any rendering backend.

use floorcraft_core::{pixels_to_length, BoundingBox, Point2D};

use crate::config::EditorConfig;

/// Vertical step applied when a label collides with another
pub const LABEL_NUDGE: f64 = 20.0;
/// Upper bound on nudges for a single label
pub const MAX_NUDGES: usize = 100;

const CHAR_WIDTH_RATIO: f64 = 0.6;

/// Approximate `(width, height)` of `text` rendered at `font_size`
pub fn measure_text(text: &str, font_size: f64) -> (f64, f64) {
    (text.chars().count() as f64 * font_size * CHAR_WIDTH_RATIO, font_size)
}

/// Font sizes used for labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub font_size: f64,
    pub angle_font_size: f64,
}

impl From<&EditorConfig> for LabelStyle {
    fn from(config: &EditorConfig) -> Self {
        Self {
            font_size: config.label_font_size,
            angle_font_size: config.angle_font_size,
        }
    }
}

/// A positioned piece of text; `position` is its top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub text: String,
    pub position: Point2D,
    pub font_size: f64,
}

impl TextBox {
    pub fn new(text: String, position: Point2D, font_size: f64) -> Self {
        Self {
            text,
            position,
            font_size,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        let (w, h) = measure_text(&self.text, self.font_size);
        BoundingBox::from_origin_size(self.position, w, h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Centred above the midpoint, for near-horizontal segments
    Above,
    /// Right of the midpoint, for near-vertical segments
    Beside,
}

/// Length text plus an optional angle text for one shape
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementLabel {
    pub length: TextBox,
    pub angle: Option<TextBox>,
    pub placement: Placement,
}

impl MeasurementLabel {
    /// Lay out the label for a segment drawn at `pixels_per_unit`.
    pub fn build(start: Point2D, end: Point2D, pixels_per_unit: f64, style: LabelStyle) -> Self {
        let metres = pixels_to_length(start.distance_to(&end), pixels_per_unit);
        let text = format!("{:.2}m", metres);
        let (w, h) = measure_text(&text, style.font_size);

        let angle = start.angle_to(&end);
        let magnitude = angle.abs();
        let mid = start.midpoint(&end);

        let placement = if magnitude < 45.0 || magnitude > 135.0 {
            Placement::Above
        } else {
            Placement::Beside
        };
        let position = match placement {
            Placement::Above => Point2D::new(mid.x - w / 2.0, mid.y - 20.0),
            Placement::Beside => Point2D::new(mid.x + 10.0, mid.y - h / 2.0),
        };

        let angle = (magnitude > 5.0 && magnitude < 175.0).then(|| {
            TextBox::new(
                format!("{:.1}°", magnitude),
                end.translate(10.0, 10.0),
                style.angle_font_size,
            )
        });

        Self {
            length: TextBox::new(text, position, style.font_size),
            angle,
            placement,
        }
    }

    /// Bounds of the length text
    pub fn bounds(&self) -> BoundingBox {
        self.length.bounds()
    }

    /// Bounds of every text box in the label, length first
    pub fn boxes(&self) -> impl Iterator<Item = BoundingBox> + '_ {
        std::iter::once(self.length.bounds()).chain(self.angle.iter().map(TextBox::bounds))
    }

    /// Move the length text, then the angle text, up until each clears
    /// `others`. The angle text also clears this label's own length text.
    ///
    /// Returns the number of nudges applied, at most [`MAX_NUDGES`] per text.
    pub fn resolve_overlap(&mut self, others: &[BoundingBox]) -> usize {
        let mut nudges = nudge_clear(&mut self.length, others);
        if self.angle.is_some() {
            let mut blockers = others.to_vec();
            blockers.push(self.length.bounds());
            if let Some(angle) = self.angle.as_mut() {
                nudges += nudge_clear(angle, &blockers);
            }
        }
        nudges
    }
}

fn nudge_clear(text: &mut TextBox, others: &[BoundingBox]) -> usize {
    let mut nudges = 0;
    while nudges < MAX_NUDGES && others.iter().any(|b| b.intersects(&text.bounds())) {
        text.position.y -= LABEL_NUDGE;
        nudges += 1;
    }
    nudges
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn style() -> LabelStyle {
        LabelStyle::from(&EditorConfig::default())
    }

    #[test]
    fn test_horizontal_label_sits_above_without_angle() {
        let label = MeasurementLabel::build(
            Point2D::new(0.0, 100.0),
            Point2D::new(90.0, 100.0),
            30.0,
            style(),
        );
        assert_eq!(label.length.text, "3.00m");
        assert_eq!(label.placement, Placement::Above);
        assert!(label.angle.is_none());

        let (w, _) = measure_text("3.00m", 14.0);
        assert_relative_eq!(label.length.position.x, 45.0 - w / 2.0);
        assert_relative_eq!(label.length.position.y, 80.0);
    }

    #[test]
    fn test_vertical_label_sits_beside_with_angle() {
        let label = MeasurementLabel::build(
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 60.0),
            30.0,
            style(),
        );
        assert_eq!(label.length.text, "2.00m");
        assert_eq!(label.placement, Placement::Beside);
        let angle = label.angle.expect("vertical segment shows its angle");
        assert_eq!(angle.text, "90.0°");
        assert!(angle.position.approx_eq(&Point2D::new(10.0, 70.0), 1e-9));
        assert_relative_eq!(label.length.position.x, 10.0);
        assert_relative_eq!(label.length.position.y, 30.0 - 7.0);
    }

    #[test]
    fn test_near_axis_angles_are_hidden() {
        let origin = Point2D::ORIGIN;
        for degrees in [3.0, 177.0, -178.0] {
            let label =
                MeasurementLabel::build(origin, origin.polar_offset(100.0, degrees), 30.0, style());
            assert!(label.angle.is_none(), "{degrees}");
        }
        let label = MeasurementLabel::build(origin, origin.polar_offset(100.0, -60.0), 30.0, style());
        assert_eq!(label.angle.map(|a| a.text).as_deref(), Some("60.0°"));
    }

    #[test]
    fn test_overlap_nudges_upward() {
        let mut label = MeasurementLabel::build(
            Point2D::new(0.0, 100.0),
            Point2D::new(90.0, 100.0),
            30.0,
            style(),
        );
        let blocker = label.bounds();
        let nudges = label.resolve_overlap(&[blocker]);
        assert_eq!(nudges, 1);
        assert!(!label.bounds().intersects(&blocker));
        assert_relative_eq!(label.length.position.y, 60.0);
    }

    #[test]
    fn test_overlap_is_bounded() {
        let mut label = MeasurementLabel::build(
            Point2D::new(0.0, 0.0),
            Point2D::new(90.0, 0.0),
            30.0,
            style(),
        );
        let wall = BoundingBox::new(-1e6, 1e6, -1e6, 1e6);
        assert_eq!(label.resolve_overlap(&[wall]), MAX_NUDGES);
    }

    #[test]
    fn test_angle_text_is_nudged_clear() {
        let mut label = MeasurementLabel::build(
            Point2D::new(100.0, 100.0),
            Point2D::new(200.0, 200.0),
            30.0,
            style(),
        );
        let blocker = label.angle.as_ref().unwrap().bounds();
        let length_before = label.length.position;

        let nudges = label.resolve_overlap(&[blocker]);
        assert!(nudges >= 1);
        assert_eq!(label.length.position, length_before);
        let angle = label.angle.as_ref().unwrap();
        assert!(!angle.bounds().intersects(&blocker));
        assert!(!angle.bounds().intersects(&label.length.bounds()));
        assert_eq!(label.boxes().count(), 2);
    }
}
