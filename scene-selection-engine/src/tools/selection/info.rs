use bevy::prelude::*;

/// Ordered pick result plus the cursor of the entity currently shown as selected.
///
/// Entities are kept nearest-first, in the order the spatial picker returned
/// them. The cursor is always a valid index while the list is non-empty and
/// zero otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionInfo {
    selected_entities: Vec<Entity>,
    current_index: usize,
}

impl SelectionInfo {
    /// Fresh selection from a pick, cursor on the nearest hit.
    pub fn from_pick(selected_entities: Vec<Entity>) -> Self {
        Self {
            selected_entities,
            current_index: 0,
        }
    }

    /// Selection with an explicit cursor, clamped into range.
    pub fn with_index(selected_entities: Vec<Entity>, current_index: usize) -> Self {
        let current_index = if selected_entities.is_empty() {
            0
        } else {
            current_index.min(selected_entities.len() - 1)
        };
        Self {
            selected_entities,
            current_index,
        }
    }

    pub fn selected_entities(&self) -> &[Entity] {
        &self.selected_entities
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_empty(&self) -> bool {
        self.selected_entities.is_empty()
    }

    /// Entity under the cursor, if anything is selected.
    pub fn current_selected(&self) -> Option<Entity> {
        self.selected_entities.get(self.current_index).copied()
    }

    /// Same entity list with the cursor advanced by one, wrapping at the end.
    pub fn cycled(&self) -> Self {
        let current_index = match self.selected_entities.len() {
            0 => 0,
            len => (self.current_index + 1) % len,
        };
        Self {
            selected_entities: self.selected_entities.clone(),
            current_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(n: u32) -> Vec<Entity> {
        (1..=n).map(Entity::from_raw).collect()
    }

    #[test]
    fn cycling_wraps_for_any_length() {
        for len in 1..6 {
            let mut info = SelectionInfo::from_pick(entities(len));
            for step in 1..=(len as usize * 2) {
                info = info.cycled();
                assert_eq!(info.current_index(), step % len as usize);
                assert_eq!(info.selected_entities().len(), len as usize);
            }
        }
    }

    #[test]
    fn cycling_empty_selection_stays_at_zero() {
        let info = SelectionInfo::default().cycled().cycled();
        assert_eq!(info.current_index(), 0);
        assert_eq!(info.current_selected(), None);
    }

    #[test]
    fn current_selected_follows_cursor() {
        let list = entities(3);
        let info = SelectionInfo::from_pick(list.clone()).cycled();
        assert_eq!(info.current_selected(), Some(list[1]));
    }

    #[test]
    fn explicit_index_is_clamped() {
        assert_eq!(SelectionInfo::with_index(entities(2), 9).current_index(), 1);
        assert_eq!(SelectionInfo::with_index(Vec::new(), 3).current_index(), 0);
    }

    #[test]
    fn equality_includes_cursor() {
        let info = SelectionInfo::from_pick(entities(2));
        assert_ne!(info, info.cycled());
        assert_eq!(info, info.cycled().cycled());
    }
}
