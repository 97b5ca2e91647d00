//! Test utilities for headless Bevy integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that uses
//! `MinimalPlugins` plus the viewer store and selection tool, without a
//! rendering or windowing backend.

use bevy::ecs::system::RunSystemOnce;
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::render::view::RenderLayers;

use crate::store::ViewerStorePlugin;
use crate::store::actions::{ViewerAction, ViewerStore};
use crate::tools::selection::SelectionToolPlugin;
use crate::tools::selection::bridge::StateBridge;
use crate::tools::selection::highlight::{HighlightSynchronizer, SelectableMetadata};
use crate::tools::selection::settings::SelectionSettings;

/// A headless Bevy app wrapper for testing.
pub(crate) struct TestApp {
    pub app: App,
}

impl TestApp {
    /// Create a new test app with default selection settings.
    pub fn new() -> Self {
        Self::with_settings(SelectionSettings::default())
    }

    pub fn with_settings(settings: SelectionSettings) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::input::InputPlugin);
        app.add_plugins(AssetPlugin::default());
        // Mesh ray casting reads mesh assets even when nothing is spawned.
        app.init_asset::<Mesh>();
        app.add_plugins(ViewerStorePlugin);
        app.add_plugins(SelectionToolPlugin { settings });
        // Run one update so startup subscribes the bridge and publishes state.
        app.update();
        Self { app }
    }

    /// Run a single frame update.
    pub fn update(&mut self) {
        self.app.update();
    }

    /// Write a store action and run the frame that reduces it.
    pub fn dispatch(&mut self, action: ViewerAction) {
        self.write_event(action);
        self.update();
    }

    /// Feed one touch phase to the input plugin and run a frame.
    pub fn touch(&mut self, phase: TouchPhase, id: u64, position: Vec2) {
        let window = Entity::PLACEHOLDER;
        self.write_event(TouchInput {
            phase,
            position,
            window,
            force: None,
            id,
        });
        self.update();
    }

    /// Full single-touch tap: press in one frame, release in the next.
    pub fn tap(&mut self, id: u64, position: Vec2) {
        self.touch(TouchPhase::Started, id, position);
        self.touch(TouchPhase::Ended, id, position);
    }

    fn write_event<E: Event + Clone>(&mut self, event: E) {
        self.world_mut()
            .run_system_once(move |mut writer: EventWriter<E>| {
                writer.write(event.clone());
            })
            .expect("event writer system runs");
    }

    /// Spawn a selectable root with a chain of `depth` plain descendants.
    /// Returns the root followed by the descendants, outermost first.
    pub fn spawn_selectable(&mut self, name: &str, depth: usize) -> Vec<Entity> {
        let root = self
            .world_mut()
            .spawn(SelectableMetadata {
                name: name.to_string(),
                category: "Test".to_string(),
            })
            .id();
        let mut chain = vec![root];
        for _ in 0..depth {
            let parent = chain[chain.len() - 1];
            chain.push(self.world_mut().spawn(ChildOf(parent)).id());
        }
        chain
    }

    pub fn layers(&self, entity: Entity) -> Option<RenderLayers> {
        self.world().get::<RenderLayers>(entity).cloned()
    }

    pub fn highlight_layers(&self) -> RenderLayers {
        self.world()
            .resource::<HighlightSynchronizer>()
            .highlight_layers()
            .clone()
    }

    pub fn store(&self) -> &ViewerStore {
        self.world().resource::<ViewerStore>()
    }

    pub fn bridge(&self) -> &StateBridge {
        self.world().resource::<StateBridge>()
    }

    pub fn resource<R: Resource>(&self) -> &R {
        self.world().resource::<R>()
    }

    /// Get a reference to the World.
    pub fn world(&self) -> &World {
        self.app.world()
    }

    /// Get a mutable reference to the World.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
