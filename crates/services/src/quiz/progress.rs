/// Which percentage a progress query reports.
///
/// The two are shown on different screens and are not interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressKind {
    /// Position of the current question (`current + 1` of `total`).
    Position,
    /// Share of questions that have a selection.
    Completion,
}

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub answered_count: usize,
    pub total_count: usize,
    pub percentage: u32,
}

/// One square of the question-navigator grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorCell {
    pub index: usize,
    pub is_answered: bool,
    pub is_current: bool,
}

/// `round(100 * part / total)` with halves rounded up; 0 when `total` is 0.
pub(crate) fn rounded_percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total) as u64;
    let total = total as u64;
    let pct = (200 * part + total) / (2 * total);
    u32::try_from(pct).unwrap_or(100)
}
