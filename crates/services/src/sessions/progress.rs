/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub score: u32,
    pub is_complete: bool,
}

impl SessionProgress {
    /// 1-based position of the question being asked, if any remain.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        (!self.is_complete).then_some(self.answered + 1)
    }
}
