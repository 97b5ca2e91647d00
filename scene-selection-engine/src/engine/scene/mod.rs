//! Demo scene content for the native and web viewer.
//!
//! Spawns selectable composite objects, lighting and the camera rig, plus a
//! small native toolbar for switching tools without a frontend.

/// Composite selectable objects, ground, lighting and cameras.
pub mod demo_scene;

/// Native-only tool and details-panel buttons.
pub mod toolbar;
