// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Converter configuration loaded from environment variables.

use crate::types::BuildingParams;
use std::str::FromStr;

/// Settings for the `plan-to-3d` converter.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Synthesis parameters.
    pub params: BuildingParams,
    /// Width of the canvas plans are laid out on, in pixels.
    pub canvas_width: f64,
    /// Height of the canvas plans are laid out on, in pixels.
    pub canvas_height: f64,
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = BuildingParams::default();
        Self {
            params: BuildingParams {
                wall_height: env_or("FLOORCRAFT_WALL_HEIGHT", defaults.wall_height),
                wall_thickness: env_or("FLOORCRAFT_WALL_THICKNESS", defaults.wall_thickness),
                door_height: env_or("FLOORCRAFT_DOOR_HEIGHT", defaults.door_height),
                window_height: env_or("FLOORCRAFT_WINDOW_HEIGHT", defaults.window_height),
                roof_visible: std::env::var("FLOORCRAFT_ROOF")
                    .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off" | "no"))
                    .unwrap_or(defaults.roof_visible),
                wall_color: env_or("FLOORCRAFT_WALL_COLOR", defaults.wall_color),
                door_color: env_or("FLOORCRAFT_DOOR_COLOR", defaults.door_color),
                window_color: env_or("FLOORCRAFT_WINDOW_COLOR", defaults.window_color),
                roof_color: env_or("FLOORCRAFT_ROOF_COLOR", defaults.roof_color),
                ..defaults
            },
            canvas_width: env_or("FLOORCRAFT_CANVAS_WIDTH", 800.0),
            canvas_height: env_or("FLOORCRAFT_CANVAS_HEIGHT", 600.0),
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %value, "ignoring unparseable environment value");
            default
        }),
        Err(_) => default,
    }
}
