use bevy::ecs::system::{Command, SystemParam};
use bevy::prelude::*;
use bevy::render::view::RenderLayers;
use serde::{Deserialize, Serialize};

/// Marks an entity as a unit of selection. Picks on its descendants resolve to it.
#[derive(Component, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectableMetadata {
    pub name: String,
    pub category: String,
}

/// Read-only hierarchy lookup for resolving a hit to its selectable owner.
pub trait SelectableLookup {
    fn parent(&self, entity: Entity) -> Option<Entity>;
    fn is_selectable(&self, entity: Entity) -> bool;
}

/// Scene-graph access the highlight synchronizer needs.
pub trait SceneAccess: SelectableLookup {
    /// `root` followed by every live descendant. Empty when `root` is gone.
    fn descendants(&self, root: Entity) -> Vec<Entity>;
    /// `None` means the entity renders on the default layer.
    fn render_layers(&self, entity: Entity) -> Option<RenderLayers>;
    fn set_render_layers(&mut self, entity: Entity, layers: Option<RenderLayers>);
}

impl SelectableLookup for World {
    fn parent(&self, entity: Entity) -> Option<Entity> {
        self.get::<ChildOf>(entity).map(ChildOf::parent)
    }

    fn is_selectable(&self, entity: Entity) -> bool {
        self.get::<SelectableMetadata>(entity).is_some()
    }
}

impl SceneAccess for World {
    fn descendants(&self, root: Entity) -> Vec<Entity> {
        let mut subtree = Vec::new();
        let mut stack = vec![root];
        while let Some(entity) = stack.pop() {
            let Ok(entity_ref) = self.get_entity(entity) else {
                continue;
            };
            subtree.push(entity);
            if let Some(children) = entity_ref.get::<Children>() {
                stack.extend(children.iter().rev());
            }
        }
        subtree
    }

    fn render_layers(&self, entity: Entity) -> Option<RenderLayers> {
        self.get::<RenderLayers>(entity).cloned()
    }

    fn set_render_layers(&mut self, entity: Entity, layers: Option<RenderLayers>) {
        let Ok(mut entity_mut) = self.get_entity_mut(entity) else {
            return;
        };
        match layers {
            Some(layers) => {
                entity_mut.insert(layers);
            }
            None => {
                entity_mut.remove::<RenderLayers>();
            }
        }
    }
}

/// Selectable lookup for regular systems.
#[derive(SystemParam)]
pub struct SelectableQuery<'w, 's> {
    metadata: Query<'w, 's, &'static SelectableMetadata>,
    parents: Query<'w, 's, &'static ChildOf>,
}

impl SelectableQuery<'_, '_> {
    /// Selectable owner of `entity` together with its metadata.
    pub fn describe(&self, entity: Entity) -> Option<(Entity, &SelectableMetadata)> {
        let owner = find_selectable_ancestor(self, entity)?;
        self.metadata.get(owner).ok().map(|metadata| (owner, metadata))
    }
}

impl SelectableLookup for SelectableQuery<'_, '_> {
    fn parent(&self, entity: Entity) -> Option<Entity> {
        self.parents.get(entity).ok().map(ChildOf::parent)
    }

    fn is_selectable(&self, entity: Entity) -> bool {
        self.metadata.contains(entity)
    }
}

/// Nearest entity at or above `entity` carrying `SelectableMetadata`.
pub fn find_selectable_ancestor(scene: &impl SelectableLookup, entity: Entity) -> Option<Entity> {
    std::iter::successors(Some(entity), |current| scene.parent(*current))
        .find(|candidate| scene.is_selectable(*candidate))
}

/// Keeps at most one selectable subtree on the highlight layer.
///
/// The subtree's own layers are captured when it enters the highlighted state
/// and written back when it leaves, so restoring never depends on what the
/// highlight layer happens to be.
#[derive(Resource, Debug)]
pub struct HighlightSynchronizer {
    highlight_layers: RenderLayers,
    target: Option<Entity>,
    original_layers: Vec<(Entity, Option<RenderLayers>)>,
    highlighted: bool,
}

impl HighlightSynchronizer {
    pub fn new(highlight_layers: RenderLayers) -> Self {
        Self {
            highlight_layers,
            target: None,
            original_layers: Vec::new(),
            highlighted: false,
        }
    }

    pub fn highlight_layers(&self) -> &RenderLayers {
        &self.highlight_layers
    }

    /// Selectable root that follows the current selection.
    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// Follow a new selected entity. A different selectable root first
    /// returns the old one to normal.
    pub fn set_target(&mut self, scene: &mut impl SceneAccess, selected: Option<Entity>) {
        let target = selected.and_then(|entity| find_selectable_ancestor(scene, entity));
        if target == self.target {
            return;
        }
        self.restore(scene);
        self.target = target;
    }

    /// Bring the target's layers in line with `visible`. Repeating a call
    /// with the same inputs writes nothing.
    pub fn apply_visibility(&mut self, scene: &mut impl SceneAccess, visible: bool) {
        match (self.target, visible, self.highlighted) {
            (Some(target), true, false) => self.highlight(scene, target),
            (_, false, true) => self.restore(scene),
            _ => {}
        }
    }

    /// Restore any highlight and forget the target.
    pub fn clear(&mut self, scene: &mut impl SceneAccess) {
        self.restore(scene);
        self.target = None;
    }

    fn highlight(&mut self, scene: &mut impl SceneAccess, target: Entity) {
        self.original_layers = scene
            .descendants(target)
            .into_iter()
            .map(|entity| (entity, scene.render_layers(entity)))
            .collect();
        for (entity, _) in &self.original_layers {
            scene.set_render_layers(*entity, Some(self.highlight_layers.clone()));
        }
        self.highlighted = true;
    }

    fn restore(&mut self, scene: &mut impl SceneAccess) {
        if !self.highlighted {
            return;
        }
        for (entity, layers) in self.original_layers.drain(..) {
            scene.set_render_layers(entity, layers);
        }
        self.highlighted = false;
    }
}

/// Highlight work queued from observers and applied against the live world.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncHighlight {
    /// Selection changed.
    Retarget { selected: Option<Entity>, visible: bool },
    /// Filter or details panel changed.
    Refresh { visible: bool },
    Clear,
}

impl Command for SyncHighlight {
    fn apply(self, world: &mut World) {
        if !world.contains_resource::<HighlightSynchronizer>() {
            return;
        }
        world.resource_scope(|world, mut sync: Mut<HighlightSynchronizer>| match self {
            SyncHighlight::Retarget { selected, visible } => {
                sync.set_target(world, selected);
                sync.apply_visibility(world, visible);
            }
            SyncHighlight::Refresh { visible } => sync.apply_visibility(world, visible),
            SyncHighlight::Clear => sync.clear(world),
        });
    }
}
