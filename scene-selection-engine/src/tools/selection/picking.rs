use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::ray::ray_hits_obb;

/// One ray hit, as handed back by a spatial picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    pub entity: Entity,
    pub point: Vec3,
    pub distance: f32,
}

/// Ray query against the scene.
pub trait SpatialPicker {
    /// Replace the contents of `results` with every hit along `ray`, nearest first.
    fn pick(&mut self, ray: Ray3d, results: &mut Vec<PickResult>);
}

/// Which picker the project has registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickerKind {
    /// Triangle-accurate picking against `Mesh3d` geometry.
    Mesh,
    /// Oriented bounding boxes from `PickBounds` components.
    Bounds,
}

impl PickerKind {
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mesh" => Some(Self::Mesh),
            "bounds" => Some(Self::Bounds),
            _ => None,
        }
    }
}

/// Full extents of the box the bounds picker tests against, in local space.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PickBounds(pub Vec3);

pub type PickBoundsQuery<'w, 's> =
    Query<'w, 's, (Entity, &'static GlobalTransform, &'static PickBounds)>;

pub struct MeshPicker<'a, 'w, 's> {
    ray_cast: &'a mut MeshRayCast<'w, 's>,
}

impl<'a, 'w, 's> MeshPicker<'a, 'w, 's> {
    pub fn new(ray_cast: &'a mut MeshRayCast<'w, 's>) -> Self {
        Self { ray_cast }
    }
}

impl SpatialPicker for MeshPicker<'_, '_, '_> {
    fn pick(&mut self, ray: Ray3d, results: &mut Vec<PickResult>) {
        let never_exit = |_: Entity| false;
        let settings = MeshRayCastSettings::default()
            .with_visibility(RayCastVisibility::Visible)
            .with_early_exit_test(&never_exit);

        results.clear();
        results.extend(
            self.ray_cast
                .cast_ray(ray, &settings)
                .iter()
                .map(|(entity, hit)| PickResult {
                    entity: *entity,
                    point: hit.point,
                    distance: hit.distance,
                }),
        );
        sort_nearest_first(results);
    }
}

pub struct BoundsPicker<'a, 'w, 's> {
    bounds: &'a PickBoundsQuery<'w, 's>,
}

impl<'a, 'w, 's> BoundsPicker<'a, 'w, 's> {
    pub fn new(bounds: &'a PickBoundsQuery<'w, 's>) -> Self {
        Self { bounds }
    }
}

impl SpatialPicker for BoundsPicker<'_, '_, '_> {
    fn pick(&mut self, ray: Ray3d, results: &mut Vec<PickResult>) {
        results.clear();
        for (entity, xf, PickBounds(size)) in self.bounds.iter() {
            if let Some(distance) = ray_hits_obb(ray, xf, *size) {
                results.push(PickResult {
                    entity,
                    point: ray.get_point(distance),
                    distance,
                });
            }
        }
        sort_nearest_first(results);
    }
}

pub fn sort_nearest_first(results: &mut [PickResult]) {
    results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(index: u32, distance: f32) -> PickResult {
        PickResult {
            entity: Entity::from_raw(index),
            point: Vec3::Z * distance,
            distance,
        }
    }

    #[test]
    fn results_are_ordered_nearest_first() {
        let mut results = vec![hit(1, 7.0), hit(2, 0.5), hit(3, 3.0)];
        sort_nearest_first(&mut results);
        let order: Vec<_> = results.iter().map(|r| r.entity.index()).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn picker_kind_parses_case_insensitively() {
        assert_eq!(PickerKind::from_string("Mesh"), Some(PickerKind::Mesh));
        assert_eq!(PickerKind::from_string("bounds"), Some(PickerKind::Bounds));
        assert_eq!(PickerKind::from_string("voxels"), None);
    }

    #[test]
    fn bounds_picker_orders_overlapping_boxes() {
        let mut world = World::new();
        let far = world
            .spawn((
                GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 20.0)),
                PickBounds(Vec3::ONE),
            ))
            .id();
        let near = world
            .spawn((
                GlobalTransform::from(Transform::from_xyz(0.0, 0.0, 5.0)),
                PickBounds(Vec3::ONE),
            ))
            .id();
        world.spawn((
            GlobalTransform::from(Transform::from_xyz(9.0, 0.0, 5.0)),
            PickBounds(Vec3::ONE),
        ));

        let ray = Ray3d::new(Vec3::ZERO, Dir3::Z);
        let system_id = world.register_system(move |bounds: PickBoundsQuery| {
            let mut results = vec![hit(99, 0.0)];
            BoundsPicker::new(&bounds).pick(ray, &mut results);
            results
        });
        let results = world.run_system(system_id).expect("pick system runs");

        let entities: Vec<_> = results.iter().map(|r| r.entity).collect();
        assert_eq!(entities, vec![near, far]);
        assert!((results[0].distance - 4.5).abs() < 1e-4);
    }
}
