use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;

use crate::engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use crate::engine::core::window_config::create_window_config;
use crate::engine::scene::demo_scene::spawn_demo_scene;
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::scene::toolbar::{handle_toolbar_buttons, spawn_toolbar, update_toolbar_colors};
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::store::{StoreSystems, ViewerStorePlugin};
use crate::tools::selection::SelectionToolPlugin;
use crate::tools::selection::settings::SelectionSettings;
use crate::tools::tool_manager::{
    ClearToolEvent, ToolSelectionEvent, handle_tool_keyboard_shortcuts,
    handle_tool_selection_events,
};

pub fn create_app(settings: SelectionSettings) -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(ViewerStorePlugin)
        .add_plugins(SelectionToolPlugin { settings })
        .add_plugins(WebRpcPlugin)
        .init_resource::<ViewportCamera>()
        .add_event::<ToolSelectionEvent>()
        .add_event::<ClearToolEvent>();

    app.add_systems(Startup, spawn_demo_scene);

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, spawn_toolbar)
            .add_systems(Update, (handle_toolbar_buttons, update_toolbar_colors));
    }

    app.add_systems(
        Update,
        (
            camera_controller,
            (handle_tool_keyboard_shortcuts, handle_tool_selection_events)
                .chain()
                .before(StoreSystems),
        ),
    );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
