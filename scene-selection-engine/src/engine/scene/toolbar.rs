use bevy::prelude::*;

use crate::store::actions::{ViewerAction, ViewerStore};
use crate::store::state::DialogType;
use crate::tools::tool_manager::{ToolSelectionEvent, ToolSelectionSource, ToolType};

const IDLE_COLOR: Color = Color::srgba(0.1, 0.1, 0.12, 0.85);
const ACTIVE_COLOR: Color = Color::srgba(0.2, 0.45, 0.8, 0.95);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarButton {
    Tool(ToolType),
    DetailsPanel,
}

impl ToolbarButton {
    fn label(&self) -> &'static str {
        match self {
            Self::Tool(ToolType::Select) => "Select (S)",
            Self::Tool(ToolType::Orbit) => "Orbit (O)",
            Self::DetailsPanel => "Details (I)",
        }
    }

    fn is_active(&self, store: &ViewerStore) -> bool {
        match self {
            Self::Tool(tool) => store.ui().tool_state.is_tool_active(*tool),
            Self::DetailsPanel => store.ui().active_sub_dialog == DialogType::DetailsPanel,
        }
    }
}

pub fn spawn_toolbar(mut commands: Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            column_gap: Val::Px(8.0),
            ..default()
        })
        .with_children(|parent| {
            for button in [
                ToolbarButton::Tool(ToolType::Select),
                ToolbarButton::Tool(ToolType::Orbit),
                ToolbarButton::DetailsPanel,
            ] {
                parent
                    .spawn((
                        Button,
                        Node {
                            padding: UiRect::axes(Val::Px(10.0), Val::Px(6.0)),
                            ..default()
                        },
                        BackgroundColor(IDLE_COLOR),
                        button,
                    ))
                    .with_children(|label| {
                        label.spawn((
                            Text::new(button.label()),
                            TextFont {
                                font_size: 14.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });
            }
        });
}

pub fn handle_toolbar_buttons(
    buttons: Query<(&Interaction, &ToolbarButton), Changed<Interaction>>,
    store: Res<ViewerStore>,
    mut tool_events: EventWriter<ToolSelectionEvent>,
    mut actions: EventWriter<ViewerAction>,
) {
    for (interaction, button) in &buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match button {
            ToolbarButton::Tool(tool_type) => {
                tool_events.write(ToolSelectionEvent {
                    tool_type: *tool_type,
                    source: ToolSelectionSource::Toolbar,
                });
            }
            ToolbarButton::DetailsPanel if button.is_active(&store) => {
                actions.write(ViewerAction::CloseSubDialog);
            }
            ToolbarButton::DetailsPanel => {
                actions.write(ViewerAction::OpenSubDialog(DialogType::DetailsPanel));
            }
        }
    }
}

pub fn update_toolbar_colors(
    store: Res<ViewerStore>,
    mut buttons: Query<(&ToolbarButton, &mut BackgroundColor)>,
) {
    if !store.is_changed() {
        return;
    }
    for (button, mut background) in &mut buttons {
        background.0 = if button.is_active(&store) {
            ACTIVE_COLOR
        } else {
            IDLE_COLOR
        };
    }
}
