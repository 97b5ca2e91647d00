/// Screen distance (logical px) within which a second tap cycles the current pick.
pub const TAP_TOLERANCE_PX: f32 = 5.0;

/// Press-to-release travel (logical px) beyond which a press counts as a drag.
pub const DRAG_THRESHOLD_PX: f32 = 12.0;

/// Relative path of the optional selection settings file (native builds).
pub const SELECTION_SETTINGS_PATH: &str = "config/selection_settings.json";
