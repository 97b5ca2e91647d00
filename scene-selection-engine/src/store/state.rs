use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tools::selection::info::SelectionInfo;
use crate::tools::selection::picking::PickerKind;
use crate::tools::tool_manager::ToolState;

/// Sub-dialog shown next to the viewport. Only one can be open at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogType {
    #[default]
    None,
    DetailsPanel,
    FilterPanel,
    Settings,
}

impl DialogType {
    /// Convert string identifier to dialog type for RPC compatibility.
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(Self::None),
            "details_panel" | "details" => Some(Self::DetailsPanel),
            "filter_panel" | "filter" => Some(Self::FilterPanel),
            "settings" => Some(Self::Settings),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::DetailsPanel => "details_panel",
            Self::FilterPanel => "filter_panel",
            Self::Settings => "settings",
        }
    }
}

/// Metadata filter the user applied. Compared by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightFilterState {
    pub filter_key: Option<String>,
    pub group_key: Option<String>,
}

impl HighlightFilterState {
    pub fn is_active(&self) -> bool {
        let present = |key: &Option<String>| key.as_deref().is_some_and(|k| !k.is_empty());
        present(&self.filter_key) || present(&self.group_key)
    }
}

/// Application (UI) state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiStateData {
    pub tool_state: ToolState,
    pub active_sub_dialog: DialogType,
}

/// Project state: what is loaded and what is selected in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectStateData {
    pub spatial_picker: Option<PickerKind>,
    pub highlight_filter: HighlightFilterState,
    pub selection_info: SelectionInfo,
}

/// Triggered with a full snapshot whenever application state changes.
#[derive(Event, Debug, Clone)]
pub struct UiStateChanged(pub UiStateData);

/// Triggered with a full snapshot whenever project state changes.
#[derive(Event, Debug, Clone)]
pub struct ProjectStateChanged(pub ProjectStateData);
