//! JSON-RPC 2.0 communication layer for the embedding web frontend.
//!
//! Implements bidirectional messaging between the viewer and its parent page
//! via iframe postMessage, supporting both request-response and notification
//! patterns.
//!
//! ## Message Flow
//!
//! ```text
//! Frontend (Parent Window)  <──postMessage──>  Viewer (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Process request
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! Requests never touch store state directly. Handlers collect
//! `ToolSelectionEvent`, `ClearToolEvent` and `ViewerAction` values in
//! `RpcEffects`, which are written as events after the batch is handled.
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//!
//! ## Methods
//!
//! ### Tool Management
//! - `tool_selection {tool}`: Activate `select` or `orbit`
//! - `clear_tool`: Deactivate current tool
//!
//! ### Dialogs
//! - `open_dialog {dialog}`: Open `details_panel`, `filter_panel` or `settings`
//! - `close_dialog`: Close the open sub-dialog
//!
//! ### Selection
//! - `set_highlight_filter {filter_key?, group_key?}`: Apply or clear (null) the metadata filter
//! - `clear_selection`: Dispatch an empty selection
//! - `get_selection`: Current hit list, cursor and selected object metadata
//!
//! ## Notifications
//!
//! - `tool_state_changed`: After every application state change
//! - `selection_changed`: After the store's selection changes

/// JSON-RPC 2.0 request handling, frontend notifications and WASM message listener.
pub mod web_rpc;
