use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::store::actions::{ViewerAction, ViewerStore};
use crate::store::state::DialogType;

/// Enumeration of available tools in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Select,
    Orbit,
}

impl ToolType {
    /// Convert string identifier to tool type for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "select" | "selection" => Some(Self::Select),
            "orbit" => Some(Self::Orbit),
            _ => None,
        }
    }

    /// Convert tool type to string identifier for frontend communication.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Orbit => "orbit",
        }
    }
}

/// Exclusive tool activation state, held inside the viewer store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolState {
    /// Currently selected tool, if any.
    active_tool: Option<ToolType>,
}

impl ToolState {
    /// Activate specified tool. Returns false when it was already active.
    pub fn activate_tool(&mut self, tool_type: ToolType) -> bool {
        if self.active_tool == Some(tool_type) {
            return false;
        }
        self.active_tool = Some(tool_type);
        info!("Tool manager activated: {}", tool_type.as_str());
        true
    }

    /// Deactivate currently active tool.
    pub fn deactivate_current_tool(&mut self) -> Option<ToolType> {
        let previous = self.active_tool.take();
        if let Some(tool) = previous {
            info!("Tool manager deactivated: {}", tool.as_str());
        }
        previous
    }

    /// Get currently active tool type.
    pub fn active_tool(&self) -> Option<ToolType> {
        self.active_tool
    }

    /// Check if specific tool is currently active.
    pub fn is_tool_active(&self, tool_type: ToolType) -> bool {
        self.active_tool == Some(tool_type)
    }
}

/// Event fired when tool selection changes via RPC, toolbar or keyboard shortcuts.
#[derive(Event, Debug, Clone, Copy)]
pub struct ToolSelectionEvent {
    pub tool_type: ToolType,
    pub source: ToolSelectionSource,
}

/// Event fired to deactivate whichever tool is active.
#[derive(Event, Debug, Clone, Copy)]
pub struct ClearToolEvent {
    pub source: ToolSelectionSource,
}

/// Source of tool selection for debugging and conditional logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSelectionSource {
    Rpc,
    Keyboard,
    Toolbar,
}

/// Forward tool selection events to the viewer store.
pub fn handle_tool_selection_events(
    mut selections: EventReader<ToolSelectionEvent>,
    mut clears: EventReader<ClearToolEvent>,
    mut actions: EventWriter<ViewerAction>,
) {
    for event in selections.read() {
        info!("{} tool requested via {:?}", event.tool_type.as_str(), event.source);
        actions.write(ViewerAction::SetActiveTool(event.tool_type));
    }
    for event in clears.read() {
        info!("Tool cleared via {:?}", event.source);
        actions.write(ViewerAction::ClearActiveTool);
    }
}

/// System handling keyboard shortcuts for tool selection (native builds only).
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_tool_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    store: Res<ViewerStore>,
    mut tool_events: EventWriter<ToolSelectionEvent>,
    mut clear_events: EventWriter<ClearToolEvent>,
    mut actions: EventWriter<ViewerAction>,
) {
    if keyboard.just_pressed(KeyCode::KeyS) {
        tool_events.write(ToolSelectionEvent {
            tool_type: ToolType::Select,
            source: ToolSelectionSource::Keyboard,
        });
    }

    if keyboard.just_pressed(KeyCode::KeyO) {
        tool_events.write(ToolSelectionEvent {
            tool_type: ToolType::Orbit,
            source: ToolSelectionSource::Keyboard,
        });
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        clear_events.write(ClearToolEvent {
            source: ToolSelectionSource::Keyboard,
        });
    }

    // Details panel toggle.
    if keyboard.just_pressed(KeyCode::KeyI) {
        if store.ui().active_sub_dialog == DialogType::DetailsPanel {
            actions.write(ViewerAction::CloseSubDialog);
        } else {
            actions.write(ViewerAction::OpenSubDialog(DialogType::DetailsPanel));
        }
    }
}

/// Placeholder system for WASM builds where keyboard shortcuts are disabled.
#[cfg(target_arch = "wasm32")]
pub fn handle_tool_keyboard_shortcuts() {
    // Tools controlled via RPC only.
}
