use bevy::prelude::*;

use super::state::{
    DialogType, HighlightFilterState, ProjectStateChanged, ProjectStateData, UiStateChanged,
    UiStateData,
};
use crate::tools::selection::info::SelectionInfo;
use crate::tools::selection::picking::PickerKind;
use crate::tools::tool_manager::ToolType;

/// Intents accepted by the viewer store. Writing one of these is the only
/// way to change store state.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum ViewerAction {
    SetActiveTool(ToolType),
    ClearActiveTool,
    OpenSubDialog(DialogType),
    CloseSubDialog,
    SetHighlightFilter(HighlightFilterState),
    SetSpatialPicker(Option<PickerKind>),
    SelectObjects(SelectionInfo),
}

/// Which half of the store an action touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreChange {
    pub ui: bool,
    pub project: bool,
}

/// Authoritative application and project state.
#[derive(Resource, Debug, Default)]
pub struct ViewerStore {
    ui: UiStateData,
    project: ProjectStateData,
}

impl ViewerStore {
    pub fn ui(&self) -> &UiStateData {
        &self.ui
    }

    pub fn project(&self) -> &ProjectStateData {
        &self.project
    }

    /// Apply one action. Actions that leave state as it was report no change.
    pub fn reduce(&mut self, action: ViewerAction) -> StoreChange {
        match action {
            ViewerAction::SetActiveTool(tool) => StoreChange {
                ui: self.ui.tool_state.activate_tool(tool),
                ..default()
            },
            ViewerAction::ClearActiveTool => StoreChange {
                ui: self.ui.tool_state.deactivate_current_tool().is_some(),
                ..default()
            },
            ViewerAction::OpenSubDialog(dialog) => StoreChange {
                ui: replace_if_changed(&mut self.ui.active_sub_dialog, dialog),
                ..default()
            },
            ViewerAction::CloseSubDialog => StoreChange {
                ui: replace_if_changed(&mut self.ui.active_sub_dialog, DialogType::None),
                ..default()
            },
            ViewerAction::SetHighlightFilter(filter) => StoreChange {
                project: replace_if_changed(&mut self.project.highlight_filter, filter),
                ..default()
            },
            ViewerAction::SetSpatialPicker(picker) => StoreChange {
                project: replace_if_changed(&mut self.project.spatial_picker, picker),
                ..default()
            },
            ViewerAction::SelectObjects(info) => StoreChange {
                project: replace_if_changed(&mut self.project.selection_info, info),
                ..default()
            },
        }
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Reduce queued actions in order, notifying subscribers after each change.
pub fn apply_viewer_actions(
    mut actions: EventReader<ViewerAction>,
    mut store: ResMut<ViewerStore>,
    mut commands: Commands,
) {
    for action in actions.read() {
        let change = store.reduce(action.clone());
        if change.ui {
            commands.trigger(UiStateChanged(store.ui.clone()));
        }
        if change.project {
            commands.trigger(ProjectStateChanged(store.project.clone()));
        }
    }
}

/// Give subscribers registered during startup the initial snapshots.
pub fn publish_initial_state(store: Res<ViewerStore>, mut commands: Commands) {
    commands.trigger(UiStateChanged(store.ui.clone()));
    commands.trigger(ProjectStateChanged(store.project.clone()));
}
