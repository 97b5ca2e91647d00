use bevy::prelude::*;

/// Distance along `ray` to the box of full extents `size` placed at `xf`.
pub fn ray_hits_obb(ray: Ray3d, xf: &GlobalTransform, size: Vec3) -> Option<f32> {
    let inv = xf.compute_matrix().inverse();
    let o_local = inv.transform_point3(ray.origin);
    let d_local = inv.transform_vector3(ray.direction.as_vec3());
    let he = size * 0.5;
    // Scale in the transform stretches the local direction; convert back to world distance.
    let t_local = ray_aabb_hit_t(o_local, d_local, -he, he)?;
    let hit_world = xf.transform_point(o_local + d_local * t_local);
    Some(hit_world.distance(ray.origin))
}

/// Slab-method ray/AABB intersection. Returns the entry distance, or the exit
/// distance when the origin is inside the box.
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray_origin[axis];
        let direction = ray_direction[axis];
        if direction == 0.0 {
            // Parallel to this slab: miss unless the origin lies between the planes.
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / direction;
        let (mut t0, mut t1) = ((min[axis] - origin) * inv, (max[axis] - origin) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}
