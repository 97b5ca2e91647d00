//! Tap-to-select for scene objects.
//!
//! Turns pointer and touch input into selection intents for the viewer store,
//! cycles through overlapping objects on repeated taps, and moves the
//! selected object onto a dedicated render layer while it should stand out.
//!
//! ## Architecture
//!
//! ```text
//! Touches / ButtonInput<MouseButton> / HoverMap
//!   └─> poll_selection_gestures()         [SelectionSystems::Gesture, select mode only]
//!       └─> TapEvent
//!           └─> handle_selection_taps()   [SelectionSystems::Tap]
//!               ├─> repeat tap in place: advance cursor
//!               ├─> tap elsewhere: camera ray -> SpatialPicker -> fresh list
//!               └─> ViewerAction::SelectObjects
//!                   └─> store -> ProjectStateChanged
//!                       └─> on_project_state_changed()
//!                           └─> SyncHighlight command -> HighlightSynchronizer
//! ```
//!
//! ## Gestures
//!
//! A press starts when a single touch begins or the left mouse button goes
//! down, unless `bevy::picking` reports a UI node under that pointer. It
//! becomes a tap when the same pointer is released within `drag_threshold`
//! of where it started. Cancelled touches, drags and releases outside the
//! window produce nothing. Only one press is tracked at a time.
//!
//! ## Cycling
//!
//! A tap within `tap_tolerance` of the previous tap keeps the previous hit
//! list and advances its cursor, wrapping at the end. Any other tap casts a
//! ray from the `MainCamera` through the tap and replaces the list with the
//! hits, nearest first. The selection is never changed directly: the result
//! is dispatched to the store and mirrored back through `StateBridge`.
//!
//! ## Highlighting
//!
//! The highlighted entity is the nearest ancestor of the current hit that
//! carries `SelectableMetadata`. It renders on the highlight layer while the
//! details panel is open or a metadata filter is active. Layers of the whole
//! subtree are captured on entry and restored on exit.
//!
//! ## Configuration
//!
//! `SelectionSettings` (`tap_tolerance`, `drag_threshold`, `highlight_layer`)
//! can be loaded from JSON. The highlight layer name is resolved once when
//! the plugin is built.

/// State bridge mirroring store notifications into the selection tool.
pub mod bridge;

/// Errors absorbed at the selection systems' boundaries.
pub mod error;

/// Press/release tracking that yields taps.
pub mod gesture;

/// Highlight layer swap and selectable-ancestor lookup.
pub mod highlight;

/// Ordered selection list with its cycle cursor.
pub mod info;

/// Spatial pickers returning nearest-first hits along a ray.
pub mod picking;

/// Ray/oriented-box intersection used by the bounds picker.
pub mod ray;

/// Selection tunables and their JSON loading.
pub mod settings;

/// Tap interpretation: cycle in place or pick anew.
pub mod tap;

use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use constants::render_layers::{SELECTION_LAYER, get_layer_name};

use crate::engine::camera::main_camera::ActiveCameraCache;
use crate::store::StoreSystems;
use bridge::{
    StateBridge, StateBridgeSubscriptions, selection_mode_active, subscribe_state_bridge,
    unsubscribe_state_bridge,
};
use gesture::{GestureRecognizer, TapEvent, poll_selection_gestures};
use highlight::HighlightSynchronizer;
use settings::SelectionSettings;
use tap::{TapTracker, handle_selection_taps};

/// Ordering of the selection tool's per-frame work.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectionSystems {
    Gesture,
    Tap,
}

#[derive(Default)]
pub struct SelectionToolPlugin {
    pub settings: SelectionSettings,
}

impl Plugin for SelectionToolPlugin {
    fn build(&self, app: &mut App) {
        let highlight_layers = self
            .settings
            .resolve_highlight_layer()
            .unwrap_or_else(|err| {
                error!(
                    "[selection] {err}, highlighting on layer {:?}",
                    get_layer_name(SELECTION_LAYER)
                );
                RenderLayers::layer(SELECTION_LAYER)
            });

        app.insert_resource(self.settings.clone())
            .insert_resource(HighlightSynchronizer::new(highlight_layers))
            .init_resource::<GestureRecognizer>()
            .init_resource::<TapTracker>()
            .init_resource::<ActiveCameraCache>()
            .init_resource::<StateBridge>()
            .init_resource::<StateBridgeSubscriptions>()
            .add_event::<TapEvent>()
            .configure_sets(
                Update,
                (SelectionSystems::Gesture, SelectionSystems::Tap)
                    .chain()
                    .before(StoreSystems),
            )
            .add_systems(Startup, subscribe_state_bridge)
            .add_systems(
                Update,
                (
                    poll_selection_gestures
                        .in_set(SelectionSystems::Gesture)
                        .run_if(selection_mode_active),
                    handle_selection_taps.in_set(SelectionSystems::Tap),
                ),
            )
            .add_systems(Last, unsubscribe_state_bridge.run_if(on_event::<AppExit>));
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;
    use bevy::input::touch::TouchPhase;

    use super::*;
    use crate::engine::camera::main_camera::MainCamera;
    use crate::store::actions::ViewerAction;
    use crate::store::state::{DialogType, HighlightFilterState};
    use crate::test_utils::TestApp;
    use crate::tools::selection::info::SelectionInfo;
    use crate::tools::selection::picking::PickerKind;
    use crate::tools::tool_manager::ToolType;

    fn select(app: &mut TestApp, entities: Vec<Entity>) {
        app.dispatch(ViewerAction::SelectObjects(SelectionInfo::from_pick(entities)));
    }

    fn category_filter() -> HighlightFilterState {
        HighlightFilterState {
            filter_key: Some("category".into()),
            group_key: None,
        }
    }

    #[test]
    fn details_panel_highlights_selected_subtree() {
        let mut app = TestApp::new();
        let chain = app.spawn_selectable("Bench", 2);
        let leaf = chain[2];

        app.dispatch(ViewerAction::OpenSubDialog(DialogType::DetailsPanel));
        select(&mut app, vec![leaf]);

        for entity in &chain {
            assert_eq!(app.layers(*entity), Some(app.highlight_layers()));
        }
        assert_eq!(app.resource::<HighlightSynchronizer>().target(), Some(chain[0]));
    }

    #[test]
    fn closing_details_panel_restores_original_layers() {
        let mut app = TestApp::new();
        let chain = app.spawn_selectable("Lamp", 1);
        app.world_mut()
            .entity_mut(chain[1])
            .insert(RenderLayers::layer(2));

        app.dispatch(ViewerAction::OpenSubDialog(DialogType::DetailsPanel));
        select(&mut app, vec![chain[1]]);
        assert_eq!(app.layers(chain[1]), Some(app.highlight_layers()));

        app.dispatch(ViewerAction::CloseSubDialog);
        assert_eq!(app.layers(chain[0]), None);
        assert_eq!(app.layers(chain[1]), Some(RenderLayers::layer(2)));
    }

    #[test]
    fn metadata_filter_toggles_highlight_with_panel_closed() {
        let mut app = TestApp::new();
        let chain = app.spawn_selectable("Crate", 0);
        select(&mut app, vec![chain[0]]);
        assert_eq!(app.layers(chain[0]), None);

        app.dispatch(ViewerAction::SetHighlightFilter(category_filter()));
        assert_eq!(app.layers(chain[0]), Some(app.highlight_layers()));

        app.dispatch(ViewerAction::SetHighlightFilter(HighlightFilterState::default()));
        assert_eq!(app.layers(chain[0]), None);
    }

    #[test]
    fn new_selection_restores_previous_before_highlighting() {
        let mut app = TestApp::new();
        let a = app.spawn_selectable("A", 0)[0];
        let b = app.spawn_selectable("B", 1);

        app.dispatch(ViewerAction::SetHighlightFilter(category_filter()));
        select(&mut app, vec![a]);
        assert_eq!(app.layers(a), Some(app.highlight_layers()));

        select(&mut app, vec![b[1], a]);
        assert_eq!(app.layers(a), None);
        assert_eq!(app.layers(b[0]), Some(app.highlight_layers()));
        assert_eq!(app.layers(b[1]), Some(app.highlight_layers()));
    }

    #[test]
    fn pick_without_selectable_ancestor_highlights_nothing() {
        let mut app = TestApp::new();
        let loose = app.world_mut().spawn_empty().id();
        let child = app.world_mut().spawn(ChildOf(loose)).id();

        app.dispatch(ViewerAction::OpenSubDialog(DialogType::DetailsPanel));
        select(&mut app, vec![child]);

        assert_eq!(app.layers(loose), None);
        assert_eq!(app.layers(child), None);
        assert_eq!(app.resource::<HighlightSynchronizer>().target(), None);
    }

    #[test]
    fn disabling_select_mode_discards_in_flight_press() {
        let mut app = TestApp::new();
        app.dispatch(ViewerAction::SetActiveTool(ToolType::Select));
        assert!(app.bridge().select_mode);

        app.touch(TouchPhase::Started, 1, Vec2::new(100.0, 100.0));
        assert!(app.resource::<GestureRecognizer>().is_pressed());

        app.dispatch(ViewerAction::SetActiveTool(ToolType::Orbit));
        assert!(!app.resource::<GestureRecognizer>().is_pressed());

        app.dispatch(ViewerAction::SetActiveTool(ToolType::Select));
        app.touch(TouchPhase::Ended, 1, Vec2::new(100.0, 100.0));
        assert_eq!(app.resource::<TapTracker>().previous_screen_point(), None);
        assert!(app.store().project().selection_info.is_empty());
    }

    #[test]
    fn tap_without_camera_records_position_only() {
        let mut app = TestApp::new();
        app.dispatch(ViewerAction::SetSpatialPicker(Some(PickerKind::Bounds)));
        app.dispatch(ViewerAction::SetActiveTool(ToolType::Select));

        app.tap(4, Vec2::new(40.0, 60.0));

        assert_eq!(
            app.resource::<TapTracker>().previous_screen_point(),
            Some(Vec2::new(40.0, 60.0))
        );
        assert!(!app.resource::<GestureRecognizer>().is_pressed());
        assert!(app.store().project().selection_info.is_empty());
    }

    #[test]
    fn tap_without_spatial_picker_dispatches_nothing() {
        let mut app = TestApp::new();
        let bench = app.spawn_selectable("Bench", 0)[0];
        app.world_mut()
            .spawn((Camera::default(), GlobalTransform::default(), MainCamera));
        app.dispatch(ViewerAction::SetActiveTool(ToolType::Select));
        select(&mut app, vec![bench]);
        assert_eq!(app.bridge().spatial_picker, None);

        app.tap(9, Vec2::new(320.0, 240.0));

        let dispatched = app
            .resource::<Events<ViewerAction>>()
            .iter_current_update_events()
            .filter(|action| matches!(action, ViewerAction::SelectObjects(_)))
            .count();
        assert_eq!(dispatched, 0);
        assert_eq!(
            app.store().project().selection_info,
            SelectionInfo::from_pick(vec![bench])
        );
        assert_eq!(
            app.resource::<TapTracker>().previous_screen_point(),
            Some(Vec2::new(320.0, 240.0))
        );
    }

    #[test]
    fn repeated_tap_cycles_through_store() {
        let mut app = TestApp::new();
        let a = app.spawn_selectable("A", 0)[0];
        let b = app.spawn_selectable("B", 0)[0];
        let c = app.spawn_selectable("C", 0)[0];
        app.dispatch(ViewerAction::SetActiveTool(ToolType::Select));
        app.dispatch(ViewerAction::OpenSubDialog(DialogType::DetailsPanel));
        select(&mut app, vec![a, b, c]);
        app.world_mut()
            .resource_mut::<TapTracker>()
            .record(Vec2::new(100.0, 100.0));

        app.tap(1, Vec2::new(102.0, 103.0));
        assert_eq!(app.store().project().selection_info.current_index(), 1);
        assert_eq!(app.bridge().selection_info.current_selected(), Some(b));
        assert_eq!(app.layers(a), None);
        assert_eq!(app.layers(b), Some(app.highlight_layers()));

        app.tap(2, Vec2::new(101.0, 101.0));
        app.tap(3, Vec2::new(100.0, 100.0));
        assert_eq!(app.store().project().selection_info.current_index(), 0);
        assert_eq!(app.layers(a), Some(app.highlight_layers()));
        assert_eq!(app.layers(b), None);
    }

    #[test]
    fn drag_is_not_a_tap() {
        let mut app = TestApp::new();
        app.dispatch(ViewerAction::SetActiveTool(ToolType::Select));
        app.touch(TouchPhase::Started, 1, Vec2::new(10.0, 10.0));
        app.touch(TouchPhase::Ended, 1, Vec2::new(80.0, 10.0));
        assert_eq!(app.resource::<TapTracker>().previous_screen_point(), None);
    }

    #[test]
    fn unsubscribe_reverts_highlight_and_stops_listening() {
        let mut app = TestApp::new();
        let chain = app.spawn_selectable("Bench", 1);
        app.dispatch(ViewerAction::OpenSubDialog(DialogType::DetailsPanel));
        select(&mut app, vec![chain[1]]);
        assert_eq!(app.layers(chain[1]), Some(app.highlight_layers()));

        app.world_mut()
            .run_system_once(bridge::unsubscribe_state_bridge)
            .expect("unsubscribe runs");
        app.update();

        assert_eq!(app.layers(chain[0]), None);
        assert_eq!(app.layers(chain[1]), None);
        assert!(!app.resource::<StateBridgeSubscriptions>().is_subscribed());

        app.dispatch(ViewerAction::SetActiveTool(ToolType::Select));
        assert!(!app.bridge().select_mode);
    }

    #[test]
    fn unknown_highlight_layer_falls_back_to_selection_layer() {
        let app = TestApp::with_settings(SelectionSettings {
            highlight_layer: "Glow".to_string(),
            ..default()
        });
        assert_eq!(app.highlight_layers(), RenderLayers::layer(SELECTION_LAYER));
    }
}
