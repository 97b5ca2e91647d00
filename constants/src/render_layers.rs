/// Layer every entity renders on unless told otherwise.
pub const DEFAULT_LAYER: usize = 0;

/// Render layer reserved for the highlighted selection.
pub const SELECTION_LAYER: usize = 5;

/// Name the selection layer is registered under.
pub const SELECTION_LAYER_NAME: &str = "Selection";

pub struct LayerInfo {
    pub index: usize,
    pub name: &'static str,
}

pub const LAYER_MAP: &[LayerInfo] = &[
    LayerInfo {
        index: DEFAULT_LAYER,
        name: "Default",
    },
    LayerInfo {
        index: SELECTION_LAYER,
        name: SELECTION_LAYER_NAME,
    },
];

/// Look up a render layer index by its registered name.
pub fn layer_index(name: &str) -> Option<usize> {
    LAYER_MAP.iter().find(|l| l.name == name).map(|l| l.index)
}

pub fn get_layer_name(index: usize) -> String {
    LAYER_MAP
        .iter()
        .find(|l| l.index == index)
        .map_or("unnamed", |l| l.name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_layer_resolves_by_name() {
        assert_eq!(layer_index(SELECTION_LAYER_NAME), Some(SELECTION_LAYER));
        assert_eq!(get_layer_name(SELECTION_LAYER), SELECTION_LAYER_NAME);
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        assert_eq!(layer_index("selection"), None);
        assert_eq!(get_layer_name(31), "unnamed");
    }

    #[test]
    fn only_default_and_selection_layers_are_named() {
        let names: Vec<_> = LAYER_MAP.iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Default", SELECTION_LAYER_NAME]);
        assert_eq!(layer_index("Default"), Some(DEFAULT_LAYER));
        assert_eq!(layer_index("Water"), None);
    }
}
