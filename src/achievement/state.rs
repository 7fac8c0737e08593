use super::request::AchievementId;

/// The single slot tracking which achievement is on screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PresentationState {
    /// Timestamp of the most recently accepted request.
    pub last_accepted_timestamp: i64,
    /// The achievement currently mounted or mid-exit, if any.
    pub active_achievement: Option<AchievementId>,
}

impl PresentationState {
    /// Record an accepted achievement as the active one.
    pub fn accept(&mut self, id: AchievementId) {
        self.last_accepted_timestamp = id.timestamp();
        self.active_achievement = Some(id);
    }

    /// Clear the slot, but only if it still belongs to `id`.
    ///
    /// Returns whether the slot was cleared.
    pub fn release(&mut self, id: AchievementId) -> bool {
        if self.active_achievement == Some(id) {
            self.active_achievement = None;
            true
        } else {
            false
        }
    }

    pub fn is_idle(&self) -> bool {
        self.active_achievement.is_none()
    }
}
