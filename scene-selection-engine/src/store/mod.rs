//! Reference viewer store holding application and project state.
//!
//! The store is the single owner of the authoritative tool, dialog, filter and
//! selection state. Everything else changes it by writing `ViewerAction`
//! events and learns about changes through observer triggers.
//!
//! ## Data Flow
//!
//! ```text
//! ViewerAction (EventWriter)
//!   └─> apply_viewer_actions()      [StoreSystems]
//!       ├─> ViewerStore::reduce()
//!       ├─> trigger UiStateChanged      (tool / dialog changed)
//!       └─> trigger ProjectStateChanged (picker / filter / selection changed)
//! ```
//!
//! Notifications carry a full cloned snapshot, so subscribers never borrow
//! store internals. Actions that do not change state trigger nothing.

/// `ViewerAction` intents, the reducer and the dispatch systems.
pub mod actions;

/// Application and project state snapshots plus their change notifications.
pub mod state;

use bevy::prelude::*;

use actions::{ViewerAction, ViewerStore, apply_viewer_actions, publish_initial_state};

/// Systems that reduce queued viewer actions.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreSystems;

pub struct ViewerStorePlugin;

impl Plugin for ViewerStorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewerStore>()
            .add_event::<ViewerAction>()
            .add_systems(PostStartup, publish_initial_state)
            .add_systems(Update, apply_viewer_actions.in_set(StoreSystems));
    }
}
