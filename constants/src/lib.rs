//! Constants shared between the viewer engine and its tooling.

pub mod render_layers;
pub mod selection;
