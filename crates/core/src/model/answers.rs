use std::collections::BTreeMap;

use crate::model::ids::OptionId;

/// Per-question selections for one attempt, keyed by 0-based question position.
///
/// An absent entry means "no selection yet". The sheet itself does not know
/// the question set; callers check option membership before selecting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    selections: BTreeMap<usize, OptionId>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection, returning the one it replaced.
    pub fn select(&mut self, index: usize, option_id: OptionId) -> Option<OptionId> {
        self.selections.insert(index, option_id)
    }

    /// Remove the selection at `index`, returning it if present.
    pub fn clear(&mut self, index: usize) -> Option<OptionId> {
        self.selections.remove(&index)
    }

    pub fn clear_all(&mut self) {
        self.selections.clear();
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&OptionId> {
        self.selections.get(&index)
    }

    #[must_use]
    pub fn is_answered(&self, index: usize) -> bool {
        self.selections.contains_key(&index)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selections.len()
    }

    /// True when every position in `0..total` has a selection.
    #[must_use]
    pub fn covers(&self, total: usize) -> bool {
        total > 0 && (0..total).all(|i| self.selections.contains_key(&i))
    }

    /// Selections in ascending position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &OptionId)> {
        self.selections.iter().map(|(i, id)| (*i, id))
    }
}
