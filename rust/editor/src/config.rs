// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Editor and auto-layout settings

use std::time::Duration;

/// Per-session editor settings. All distances are canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Initial scale: canvas pixels per real-world metre
    pub pixels_per_unit: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Maximum number of undo entries kept
    pub history_depth: usize,
    pub handle_radius: f64,
    /// Offset of each window line from the segment centreline
    pub window_half_thickness: f64,
    /// Maximum distance from a shape's outline that still counts as a click on it
    pub pick_tolerance: f64,
    /// Draws this short or shorter are discarded on pointer-up
    pub min_commit_length: f64,
    pub label_font_size: f64,
    pub angle_font_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            pixels_per_unit: 30.0,
            canvas_width: 800.0,
            canvas_height: 600.0,
            history_depth: 50,
            handle_radius: 5.0,
            window_half_thickness: 5.0,
            pick_tolerance: 5.0,
            min_commit_length: 1.0,
            label_font_size: 14.0,
            angle_font_size: 6.0,
        }
    }
}

impl EditorConfig {
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }
}

/// Auto-layout settings
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Scale used while resolving anchors, before the viewport fit
    pub pixels_per_unit: f64,
    /// Fraction of the canvas the resolved plan should span
    pub target_fraction: f64,
    /// Fraction of the canvas left between the origin and the plan
    pub offset_fraction: f64,
    /// Pause before each replayed segment
    pub step_delay: Duration,
    /// Safety margin applied by the post-replay size check
    pub fit_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pixels_per_unit: 100.0,
            target_fraction: 0.25,
            offset_fraction: 0.15,
            step_delay: Duration::from_millis(500),
            fit_margin: 0.9,
        }
    }
}

impl LayoutConfig {
    /// Same settings with no pause between replayed segments
    pub fn immediate() -> Self {
        Self {
            step_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}
