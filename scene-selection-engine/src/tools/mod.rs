//! Interactive viewer tools.
//!
//! ## Tool Manager Architecture
//!
//! Tool activation lives in the viewer store as `ToolState`:
//! - Only one tool can be active at a time
//! - Tools are activated via keyboard shortcuts or toolbar (native) or RPC events (WASM)
//! - The store notifies subscribers and the frontend after every change
//!
//! ### Tool Activation Flow
//!
//! ```text
//! Keyboard/Toolbar/RPC Input
//!   └─> ToolSelectionEvent / ClearToolEvent
//!       └─> handle_tool_selection_events()
//!           └─> ViewerAction::SetActiveTool / ClearActiveTool
//!               └─> UiStateChanged observers (selection bridge, RPC notification)
//! ```
//!
//! ## Available Tools
//!
//! ### Select Tool (`ToolType::Select`)
//! - **Activation**: `S` key (native) or `tool_selection` RPC with `"select"`
//! - **Purpose**: Tap objects in the scene to select them
//! - **Workflow**:
//!   1. Tap (press and release without dragging) on an object
//!   2. Nearest hit becomes the selection
//!   3. Tapping again in place cycles through everything under the pointer
//!   4. With the details panel open (`I` key) or a metadata filter active,
//!      the selected object renders on the highlight layer
//!
//! ### Orbit Tool (`ToolType::Orbit`)
//! - **Activation**: `O` key (native) or `tool_selection` RPC with `"orbit"`
//! - **Purpose**: Camera-only mode; taps never select
//!
//! `Escape` clears the active tool.

/// Tap selection, overlap cycling and selection highlighting.
pub mod selection;

/// Tool activation state, selection events and keyboard shortcuts.
pub mod tool_manager;
