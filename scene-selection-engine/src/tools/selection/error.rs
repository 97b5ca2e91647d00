use bevy::render::camera::ViewportConversionError;
use thiserror::Error;

/// Failures the selection tool absorbs at its system boundaries.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("active main camera not found")]
    NoActiveCamera,

    #[error("no spatial picker registered in project state")]
    NoSpatialPicker,

    #[error("could not cast a ray through the tapped screen point: {0:?}")]
    ViewportRay(ViewportConversionError),

    #[error("unknown render layer name: {0:?}")]
    UnknownLayer(String),

    #[error("invalid selection settings: {0}")]
    InvalidSettings(String),

    #[error("failed to read selection settings: {0}")]
    SettingsIo(#[from] std::io::Error),

    #[error("failed to parse selection settings: {0}")]
    SettingsParse(#[from] serde_json::Error),
}
