use bevy::picking::mesh_picking::ray_cast::MeshRayCast;
use bevy::prelude::*;

use super::bridge::StateBridge;
use super::error::SelectionError;
use super::gesture::{GestureRecognizer, TapEvent};
use super::info::SelectionInfo;
use super::picking::{BoundsPicker, MeshPicker, PickBoundsQuery, PickResult, PickerKind, SpatialPicker};
use super::settings::SelectionSettings;
use crate::engine::camera::main_camera::{ActiveCameraCache, MainCameraQuery};
use crate::store::actions::ViewerAction;

/// Remembers where the previous tap landed.
#[derive(Resource, Debug, Default)]
pub struct TapTracker {
    previous_screen_point: Option<Vec2>,
}

/// What a tap means given the previous one.
#[derive(Debug, Clone, PartialEq)]
pub enum TapDecision {
    /// Repeated tap in place: keep the entity list and advance the cursor.
    Cycle(SelectionInfo),
    /// Tap elsewhere: cast a fresh pick.
    Pick,
}

impl TapTracker {
    pub fn previous_screen_point(&self) -> Option<Vec2> {
        self.previous_screen_point
    }

    pub fn decide(&self, screen_point: Vec2, tolerance: f32, previous: &SelectionInfo) -> TapDecision {
        match self.previous_screen_point {
            Some(last) if screen_point.distance(last) <= tolerance => {
                TapDecision::Cycle(previous.cycled())
            }
            _ => TapDecision::Pick,
        }
    }

    pub fn record(&mut self, screen_point: Vec2) {
        self.previous_screen_point = Some(screen_point);
    }
}

/// Turn a tap into the next selection. `pick` is only invoked when the tap
/// is not a repeat of the previous one; the tap position is recorded either way.
pub fn resolve_tap(
    tracker: &mut TapTracker,
    screen_point: Vec2,
    tolerance: f32,
    previous: &SelectionInfo,
    pick: impl FnOnce(Vec2) -> Result<Vec<Entity>, SelectionError>,
) -> Result<SelectionInfo, SelectionError> {
    let decision = tracker.decide(screen_point, tolerance, previous);
    tracker.record(screen_point);

    match decision {
        TapDecision::Cycle(info) => Ok(info),
        TapDecision::Pick => pick(screen_point).map(SelectionInfo::from_pick),
    }
}

/// Resolve queued taps into `SelectObjects` intents for the viewer store.
pub fn handle_selection_taps(
    mut taps: EventReader<TapEvent>,
    mut tracker: ResMut<TapTracker>,
    mut recognizer: ResMut<GestureRecognizer>,
    mut camera_cache: ResMut<ActiveCameraCache>,
    settings: Res<SelectionSettings>,
    bridge: Res<StateBridge>,
    cameras: MainCameraQuery,
    mut mesh_ray_cast: MeshRayCast,
    bounds: PickBoundsQuery,
    mut hits: Local<Vec<PickResult>>,
    mut actions: EventWriter<ViewerAction>,
) {
    for tap in taps.read() {
        let outcome = resolve_tap(
            &mut tracker,
            tap.screen_position,
            settings.tap_tolerance,
            &bridge.selection_info,
            |point| {
                let (camera, camera_xf) = camera_cache.resolve(&cameras)?;
                let picker = bridge.spatial_picker.ok_or(SelectionError::NoSpatialPicker)?;
                let ray = camera
                    .viewport_to_world(camera_xf, point)
                    .map_err(SelectionError::ViewportRay)?;

                match picker {
                    PickerKind::Mesh => MeshPicker::new(&mut mesh_ray_cast).pick(ray, &mut hits),
                    PickerKind::Bounds => BoundsPicker::new(&bounds).pick(ray, &mut hits),
                }
                // Copy out so later picks cannot alter a dispatched selection.
                Ok(hits.iter().map(|hit| hit.entity).collect())
            },
        );

        match outcome {
            Ok(info) => {
                debug!(
                    "Tap at {} selects {} entities, cursor {}",
                    tap.screen_position,
                    info.selected_entities().len(),
                    info.current_index()
                );
                actions.write(ViewerAction::SelectObjects(info));
            }
            Err(SelectionError::NoActiveCamera) => {
                error!("[selection] {}", SelectionError::NoActiveCamera);
                recognizer.reset();
            }
            Err(err) => {
                warn!("[selection] Tap dropped: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;
    use crate::tools::selection::picking::PickBounds;

    fn entities(n: u32) -> Vec<Entity> {
        (10..10 + n).map(Entity::from_raw).collect()
    }

    fn no_pick(_: Vec2) -> Result<Vec<Entity>, SelectionError> {
        panic!("pick must not run for a repeated tap");
    }

    #[test]
    fn first_tap_always_picks() {
        let mut tracker = TapTracker::default();
        let picked = entities(2);
        let info = resolve_tap(&mut tracker, Vec2::new(100.0, 100.0), 5.0, &SelectionInfo::default(), |_| {
            Ok(picked.clone())
        })
        .unwrap();
        assert_eq!(info, SelectionInfo::from_pick(picked));
        assert_eq!(tracker.previous_screen_point(), Some(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn repeated_tap_within_tolerance_cycles_without_picking() {
        let mut tracker = TapTracker::default();
        tracker.record(Vec2::new(100.0, 100.0));
        let previous = SelectionInfo::from_pick(entities(3));

        // |(102,103) - (100,100)| ≈ 3.6
        let info = resolve_tap(&mut tracker, Vec2::new(102.0, 103.0), 5.0, &previous, no_pick).unwrap();
        assert_eq!(info.selected_entities(), previous.selected_entities());
        assert_eq!(info.current_index(), 1);
        assert_eq!(tracker.previous_screen_point(), Some(Vec2::new(102.0, 103.0)));
    }

    #[test]
    fn cursor_wraps_after_last_hit() {
        let mut tracker = TapTracker::default();
        let mut info = SelectionInfo::from_pick(entities(3));
        tracker.record(Vec2::ZERO);
        for expected in [1, 2, 0, 1] {
            info = resolve_tap(&mut tracker, Vec2::ZERO, 5.0, &info, no_pick).unwrap();
            assert_eq!(info.current_index(), expected);
        }
    }

    #[test]
    fn repeated_tap_on_empty_selection_keeps_index_zero() {
        let mut tracker = TapTracker::default();
        tracker.record(Vec2::ZERO);
        let info = resolve_tap(&mut tracker, Vec2::ONE, 5.0, &SelectionInfo::default(), no_pick).unwrap();
        assert!(info.is_empty());
        assert_eq!(info.current_index(), 0);
    }

    #[test]
    fn tap_beyond_tolerance_replaces_selection() {
        let mut tracker = TapTracker::default();
        tracker.record(Vec2::new(100.0, 100.0));
        let previous = SelectionInfo::with_index(entities(3), 2);
        let fresh = vec![Entity::from_raw(77)];

        let mut picked_at = None;
        let info = resolve_tap(&mut tracker, Vec2::new(200.0, 100.0), 5.0, &previous, |point| {
            picked_at = Some(point);
            Ok(fresh.clone())
        })
        .unwrap();

        assert_eq!(picked_at, Some(Vec2::new(200.0, 100.0)));
        assert_eq!(info, SelectionInfo::from_pick(fresh));
        assert_eq!(info.current_index(), 0);
    }

    #[test]
    fn tap_exactly_on_tolerance_cycles() {
        let mut tracker = TapTracker::default();
        tracker.record(Vec2::ZERO);
        let previous = SelectionInfo::from_pick(entities(2));
        let info = resolve_tap(&mut tracker, Vec2::new(3.0, 4.0), 5.0, &previous, no_pick).unwrap();
        assert_eq!(info.current_index(), 1);
    }

    #[test]
    fn failed_pick_still_records_position() {
        let mut tracker = TapTracker::default();
        let result = resolve_tap(&mut tracker, Vec2::new(40.0, 40.0), 5.0, &SelectionInfo::default(), |_| {
            Err(SelectionError::NoActiveCamera)
        });
        assert!(matches!(result, Err(SelectionError::NoActiveCamera)));
        assert_eq!(tracker.previous_screen_point(), Some(Vec2::new(40.0, 40.0)));
    }

    #[test]
    fn fresh_pick_is_not_altered_by_later_picks() {
        fn spawn_box(world: &mut World, x: f32, z: f32) -> Entity {
            world
                .spawn((
                    GlobalTransform::from(Transform::from_xyz(x, 0.0, z)),
                    PickBounds(Vec3::ONE),
                ))
                .id()
        }

        let mut world = World::new();
        let far = spawn_box(&mut world, 0.0, 20.0);
        let near = spawn_box(&mut world, 0.0, 5.0);
        let aside = spawn_box(&mut world, 50.0, 8.0);

        let (first, second, buffered) = world
            .run_system_once(|bounds: PickBoundsQuery, mut hits: Local<Vec<PickResult>>| {
                let mut tracker = TapTracker::default();
                // Screen x maps to a ray along +Z.
                let mut pick_through = |point: Vec2| -> Result<Vec<Entity>, SelectionError> {
                    let ray = Ray3d::new(Vec3::new(point.x, 0.0, 0.0), Dir3::Z);
                    BoundsPicker::new(&bounds).pick(ray, &mut hits);
                    Ok(hits.iter().map(|hit| hit.entity).collect())
                };

                let first = resolve_tap(
                    &mut tracker,
                    Vec2::ZERO,
                    5.0,
                    &SelectionInfo::default(),
                    &mut pick_through,
                )
                .unwrap();
                let second = resolve_tap(
                    &mut tracker,
                    Vec2::new(50.0, 0.0),
                    5.0,
                    &first,
                    &mut pick_through,
                )
                .unwrap();
                let buffered: Vec<Entity> = hits.iter().map(|hit| hit.entity).collect();
                (first, second, buffered)
            })
            .expect("pick system runs");

        assert_eq!(first, SelectionInfo::from_pick(vec![near, far]));
        assert_eq!(first.current_index(), 0);
        assert_eq!(second, SelectionInfo::from_pick(vec![aside]));
        assert_eq!(buffered, vec![aside]);
    }
}
