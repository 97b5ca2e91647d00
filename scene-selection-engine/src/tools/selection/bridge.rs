use bevy::prelude::*;

use super::gesture::GestureRecognizer;
use super::highlight::SyncHighlight;
use super::info::SelectionInfo;
use super::picking::PickerKind;
use crate::store::state::{DialogType, HighlightFilterState, ProjectStateChanged, UiStateChanged};
use crate::tools::tool_manager::ToolType;

/// Local mirror of the store fields the selection tool reads.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct StateBridge {
    pub select_mode: bool,
    pub details_panel_open: bool,
    pub highlight_filter: HighlightFilterState,
    pub spatial_picker: Option<PickerKind>,
    pub selection_info: SelectionInfo,
}

impl StateBridge {
    pub fn metadata_filter_active(&self) -> bool {
        self.highlight_filter.is_active()
    }

    /// Whether the selected entity should be drawn on the highlight layer.
    pub fn should_display_selection(&self) -> bool {
        self.metadata_filter_active() || self.details_panel_open
    }
}

/// Observer entities registered by `subscribe_state_bridge`.
#[derive(Resource, Debug, Default)]
pub struct StateBridgeSubscriptions {
    observers: Vec<Entity>,
}

impl StateBridgeSubscriptions {
    pub fn is_subscribed(&self) -> bool {
        !self.observers.is_empty()
    }
}

pub fn on_ui_state_changed(
    trigger: Trigger<UiStateChanged>,
    mut bridge: ResMut<StateBridge>,
    mut recognizer: ResMut<GestureRecognizer>,
    mut commands: Commands,
) {
    let UiStateChanged(state) = trigger.event();
    let select_mode = state.tool_state.is_tool_active(ToolType::Select);
    let details_panel_open = state.active_sub_dialog == DialogType::DetailsPanel;

    if bridge.select_mode != select_mode {
        if !select_mode {
            // In-flight press is dropped, not completed later.
            recognizer.reset();
        }
        info!(
            "[selection] Select mode {}",
            if select_mode { "enabled" } else { "disabled" }
        );
        bridge.select_mode = select_mode;
    }

    if bridge.details_panel_open != details_panel_open {
        bridge.details_panel_open = details_panel_open;
        commands.queue(SyncHighlight::Refresh {
            visible: bridge.should_display_selection(),
        });
    }
}

pub fn on_project_state_changed(
    trigger: Trigger<ProjectStateChanged>,
    mut bridge: ResMut<StateBridge>,
    mut commands: Commands,
) {
    let ProjectStateChanged(state) = trigger.event();
    bridge.spatial_picker = state.spatial_picker;

    let filter_changed = bridge.highlight_filter != state.highlight_filter;
    if filter_changed {
        bridge.highlight_filter = state.highlight_filter.clone();
    }

    if bridge.selection_info != state.selection_info {
        bridge.selection_info = state.selection_info.clone();
        debug!(
            "[selection] Adopted selection of {} entities, cursor {}",
            bridge.selection_info.selected_entities().len(),
            bridge.selection_info.current_index()
        );
        commands.queue(SyncHighlight::Retarget {
            selected: bridge.selection_info.current_selected(),
            visible: bridge.should_display_selection(),
        });
    } else if filter_changed {
        commands.queue(SyncHighlight::Refresh {
            visible: bridge.should_display_selection(),
        });
    }
}

/// Register the bridge's store observers. Does nothing when already subscribed.
pub fn subscribe_state_bridge(
    mut commands: Commands,
    mut subscriptions: ResMut<StateBridgeSubscriptions>,
) {
    if subscriptions.is_subscribed() {
        return;
    }
    subscriptions.observers = vec![
        commands.spawn(Observer::new(on_ui_state_changed)).id(),
        commands.spawn(Observer::new(on_project_state_changed)).id(),
    ];
    info!("[selection] State bridge subscribed");
}

/// Remove the observers, drop any in-flight press and revert the highlight.
pub fn unsubscribe_state_bridge(
    mut commands: Commands,
    mut subscriptions: ResMut<StateBridgeSubscriptions>,
    mut recognizer: ResMut<GestureRecognizer>,
    mut bridge: ResMut<StateBridge>,
) {
    if !subscriptions.is_subscribed() {
        return;
    }
    for observer in subscriptions.observers.drain(..) {
        commands.entity(observer).try_despawn();
    }
    recognizer.reset();
    *bridge = StateBridge::default();
    commands.queue(SyncHighlight::Clear);
    info!("[selection] State bridge unsubscribed");
}

/// Run condition for the per-frame gesture poll.
pub fn selection_mode_active(bridge: Res<StateBridge>) -> bool {
    bridge.select_mode
}
