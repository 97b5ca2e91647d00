//! Viewport camera for scene navigation and picking.
//!
//! Provides orbit camera controls with keyboard/mouse input handling and the
//! `MainCamera` marker that selection rays are cast from.

/// Main-camera marker and the lazily resolved active-camera cache.
pub mod main_camera;

/// Viewport camera resource and controller system for scene navigation.
pub mod viewport_camera;
