//! Core application setup.
//!
//! Handles plugin initialisation and window configuration for both native and
//! WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the viewer store, selection tool, RPC layer and
/// demo scene.
pub mod app_setup;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
