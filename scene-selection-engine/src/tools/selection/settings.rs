use std::path::Path;

use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::render_layers::{SELECTION_LAYER_NAME, layer_index};
use constants::selection::{DRAG_THRESHOLD_PX, TAP_TOLERANCE_PX};
use serde::{Deserialize, Serialize};

use super::error::SelectionError;

/// Tunables for the selection tool, optionally loaded from JSON.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Radius (logical px) within which a repeated tap cycles overlapping hits.
    pub tap_tolerance: f32,
    /// Press travel (logical px) beyond which a press is treated as a drag.
    /// `None` accepts any travel.
    pub drag_threshold: Option<f32>,
    /// Name of the render layer the selected entity is moved to.
    pub highlight_layer: String,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            tap_tolerance: TAP_TOLERANCE_PX,
            drag_threshold: Some(DRAG_THRESHOLD_PX),
            highlight_layer: SELECTION_LAYER_NAME.to_string(),
        }
    }
}

impl SelectionSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SelectionError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SelectionError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), SelectionError> {
        if !self.tap_tolerance.is_finite() || self.tap_tolerance < 0.0 {
            return Err(SelectionError::InvalidSettings(format!(
                "tap_tolerance must be a non-negative number, got {}",
                self.tap_tolerance
            )));
        }
        if let Some(threshold) = self.drag_threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(SelectionError::InvalidSettings(format!(
                    "drag_threshold must be a non-negative number, got {threshold}"
                )));
            }
        }
        Ok(())
    }

    /// Resolve the configured highlight layer name to its render layers.
    pub fn resolve_highlight_layer(&self) -> Result<RenderLayers, SelectionError> {
        layer_index(&self.highlight_layer)
            .map(RenderLayers::layer)
            .ok_or_else(|| SelectionError::UnknownLayer(self.highlight_layer.clone()))
    }
}
