//! Engine plumbing around the selection tool: cameras, app setup and the
//! demo scene.

pub mod camera;
pub mod core;
pub mod scene;
