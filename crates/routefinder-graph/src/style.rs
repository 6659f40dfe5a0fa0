//! Connection Style System
//!
//! Resting palettes per transport mode, the shortest-path palette, and the
//! stroke widths used for both.

use routefinder_core::{Color, ColorProfile, TransportMode};
use serde::{Deserialize, Serialize};

// ============================================================================
// Color Constants
// ============================================================================

// Bus connections (orange tones)
pub const COLOR_BUS: Color = Color::rgb(0xED, 0x89, 0x36);
pub const COLOR_BUS_HIGHLIGHT: Color = Color::rgb(0xDD, 0x6B, 0x20);

// Plane connections (green tones)
pub const COLOR_PLANE: Color = Color::rgb(0x38, 0xA1, 0x69);
pub const COLOR_PLANE_HIGHLIGHT: Color = Color::rgb(0x2F, 0x85, 0x5A);

// Shortest path (red tones)
pub const COLOR_PATH: Color = Color::rgb(0xE5, 0x3E, 0x3E);
pub const COLOR_PATH_HIGHLIGHT: Color = Color::rgb(0xC5, 0x30, 0x30);

pub const DEFAULT_EDGE_WIDTH: f32 = 2.0;
pub const HIGHLIGHT_EDGE_WIDTH: f32 = 5.0;

pub const BUS_PROFILE: ColorProfile =
    ColorProfile::new(COLOR_BUS, COLOR_BUS_HIGHLIGHT, COLOR_BUS_HIGHLIGHT);
pub const PLANE_PROFILE: ColorProfile =
    ColorProfile::new(COLOR_PLANE, COLOR_PLANE_HIGHLIGHT, COLOR_PLANE_HIGHLIGHT);
pub const PATH_PROFILE: ColorProfile =
    ColorProfile::new(COLOR_PATH, COLOR_PATH_HIGHLIGHT, COLOR_PATH_HIGHLIGHT);

/// Palette and widths the store applies to connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub bus: ColorProfile,
    pub plane: ColorProfile,
    pub path_highlight: ColorProfile,
    pub default_width: f32,
    pub highlight_width: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            bus: BUS_PROFILE,
            plane: PLANE_PROFILE,
            path_highlight: PATH_PROFILE,
            default_width: DEFAULT_EDGE_WIDTH,
            highlight_width: HIGHLIGHT_EDGE_WIDTH,
        }
    }
}

impl StyleConfig {
    pub fn profile_for(&self, mode: TransportMode) -> ColorProfile {
        match mode {
            TransportMode::Bus => self.bus,
            TransportMode::Plane => self.plane,
        }
    }

    pub fn is_path_style(&self, color: &ColorProfile, width: f32) -> bool {
        *color == self.path_highlight && width == self.highlight_width
    }
}
