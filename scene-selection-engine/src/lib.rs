//! Tap-to-select object selection for a Bevy 3D scene viewer.
//!
//! The selection tool lives in [`tools::selection`]. The [`store`] and [`rpc`]
//! modules host the application state it reads and the frontend that drives
//! it; [`engine`] wires everything into a runnable viewer.

pub mod engine;
pub mod rpc;
pub mod store;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_utils;
