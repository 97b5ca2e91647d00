use bevy::input::touch::Touches;
use bevy::picking::hover::HoverMap;
use bevy::picking::pointer::PointerId;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::settings::SelectionSettings;

/// A completed press/release at a screen position (logical px).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct TapEvent {
    pub screen_position: Vec2,
}

/// Raw pointer state sampled once per frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerFrame {
    /// Touch that began this frame while being the only active touch.
    pub single_touch_began: Option<(u64, Vec2)>,
    pub touches_ended: Vec<(u64, Vec2)>,
    pub touches_canceled: Vec<u64>,
    /// Touches still held after this frame's releases.
    pub touches_held: usize,
    pub mouse_pressed: bool,
    pub mouse_released: bool,
    pub cursor_position: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActivePress {
    pointer: PointerId,
    origin: Vec2,
}

/// Turns pointer frames into taps, tracking a single press at a time.
#[derive(Resource, Debug, Default)]
pub struct GestureRecognizer {
    press: Option<ActivePress>,
}

impl GestureRecognizer {
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    /// Drop any in-flight press without producing a tap.
    pub fn reset(&mut self) {
        self.press = None;
    }

    /// Advance by one frame. Returns the tap position when the tracked press
    /// is released this frame.
    pub fn update(
        &mut self,
        frame: &PointerFrame,
        drag_threshold: Option<f32>,
        absorbed: impl Fn(PointerId) -> bool,
    ) -> Option<Vec2> {
        if self.press.is_none() {
            self.press = Self::begin(frame, &absorbed);
        }
        let press = self.press?;

        let release = match press.pointer {
            PointerId::Touch(id) => {
                if frame.touches_canceled.contains(&id) {
                    self.press = None;
                    return None;
                }
                let position = frame
                    .touches_ended
                    .iter()
                    .find(|(touch, _)| *touch == id)
                    .map(|(_, position)| *position)?;
                // Lifting one finger of a multi-touch gesture is not a tap.
                if frame.touches_held > 0 {
                    self.press = None;
                    return None;
                }
                position
            }
            _ => {
                if !frame.mouse_released {
                    return None;
                }
                match frame.cursor_position {
                    Some(position) => position,
                    None => {
                        self.press = None;
                        return None;
                    }
                }
            }
        };
        self.press = None;

        if let Some(threshold) = drag_threshold {
            let travel = release.distance(press.origin);
            if travel > threshold {
                debug!("Press released as drag after {travel:.1}px");
                return None;
            }
        }
        Some(release)
    }

    fn begin(frame: &PointerFrame, absorbed: &impl Fn(PointerId) -> bool) -> Option<ActivePress> {
        let (pointer, origin) = if let Some((id, position)) = frame.single_touch_began {
            (PointerId::Touch(id), position)
        } else if frame.mouse_pressed {
            (PointerId::Mouse, frame.cursor_position?)
        } else {
            return None;
        };

        if absorbed(pointer) {
            return None;
        }
        Some(ActivePress { pointer, origin })
    }
}

/// Sample touches, mouse and cursor into a `PointerFrame`.
pub fn sample_pointer_frame(
    touches: &Touches,
    mouse_buttons: &ButtonInput<MouseButton>,
    cursor_position: Option<Vec2>,
) -> PointerFrame {
    let single_touch_began = if touches.iter().count() == 1 {
        touches
            .iter_just_pressed()
            .next()
            .map(|touch| (touch.id(), touch.position()))
    } else {
        None
    };

    PointerFrame {
        single_touch_began,
        touches_ended: touches
            .iter_just_released()
            .map(|touch| (touch.id(), touch.position()))
            .collect(),
        touches_canceled: touches.iter_just_canceled().map(|touch| touch.id()).collect(),
        touches_held: touches.iter().count(),
        mouse_pressed: mouse_buttons.just_pressed(MouseButton::Left),
        mouse_released: mouse_buttons.just_released(MouseButton::Left),
        cursor_position,
    }
}

/// Poll pointer input and emit `TapEvent`s for presses that were not taken by UI.
pub fn poll_selection_gestures(
    mut recognizer: ResMut<GestureRecognizer>,
    settings: Res<SelectionSettings>,
    touches: Res<Touches>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    hover_map: Option<Res<HoverMap>>,
    ui_nodes: Query<(), With<Node>>,
    mut taps: EventWriter<TapEvent>,
) {
    let cursor_position = windows.single().ok().and_then(Window::cursor_position);
    let frame = sample_pointer_frame(&touches, &mouse_buttons, cursor_position);

    let absorbed = |pointer: PointerId| {
        hover_map
            .as_ref()
            .and_then(|map| map.get(&pointer))
            .is_some_and(|hovered| hovered.keys().any(|entity| ui_nodes.contains(*entity)))
    };

    if let Some(screen_position) = recognizer.update(&frame, settings.drag_threshold, absorbed) {
        taps.write(TapEvent { screen_position });
    }
}
