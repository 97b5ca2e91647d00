use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::math::EulerRot;
use bevy::prelude::*;

use super::main_camera::MainCamera;

const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 200.0;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl ViewportCamera {
    pub fn new(focus_point: Vec3, distance: f32) -> Self {
        Self {
            focus_point,
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            ..default()
        }
    }

    pub fn view_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Camera transform orbiting `focus_point` at `distance`.
    pub fn orbit_transform(&self) -> Transform {
        let rotation = self.view_rotation();
        Transform {
            translation: self.focus_point + rotation * Vec3::Z * self.distance,
            rotation,
            ..default()
        }
    }

    pub fn rotate(&mut self, mouse_delta: Vec2) {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        self.yaw += -mouse_delta.x * yaw_sens;
        self.pitch = (self.pitch - mouse_delta.y * pitch_sens).clamp(-1.55, 1.55);
    }

    pub fn zoom(&mut self, scroll: f32) {
        let dolly_speed = (self.distance * 0.1).clamp(0.2, 20.0);
        self.distance = (self.distance - scroll * dolly_speed).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            focus_point: Vec3::ZERO,
            distance: 12.0,
            pitch: -0.6,
            yaw: 0.0,
        }
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    // Right drag looks around; left button is reserved for selection taps.
    if mouse_button.pressed(MouseButton::Right) && mouse_motion.delta != Vec2::ZERO {
        viewport_camera.rotate(mouse_motion.delta);
    }

    let scroll = match mouse_scroll.unit {
        MouseScrollUnit::Line => mouse_scroll.delta.y,
        MouseScrollUnit::Pixel => mouse_scroll.delta.y * 0.05,
    };
    if scroll.abs() > f32::EPSILON {
        viewport_camera.zoom(scroll);
    }

    let mut move_input = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) { move_input.z -= 1.0; }
    if keyboard.pressed(KeyCode::KeyD) { move_input.x += 1.0; }
    if keyboard.pressed(KeyCode::KeyA) { move_input.x -= 1.0; }
    if keyboard.pressed(KeyCode::KeyE) { move_input.y += 1.0; }
    if keyboard.pressed(KeyCode::KeyQ) { move_input.y -= 1.0; }

    if move_input != Vec3::ZERO {
        let yaw_only = Quat::from_rotation_y(viewport_camera.yaw);
        let forward = yaw_only * Vec3::Z;
        let right = yaw_only * Vec3::X;

        let mut speed = (viewport_camera.distance * 0.8).clamp(1.0, 50.0);
        if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) { speed *= 3.5; }

        let world_delta = right * move_input.x + Vec3::Y * move_input.y + forward * move_input.z;
        viewport_camera.focus_point += world_delta.normalize() * speed * time.delta_secs();
    }

    let target = viewport_camera.orbit_transform();
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target.rotation, lerp_speed);
}
