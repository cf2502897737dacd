use super::post::{GameStatus, Post};

/// The dashboard shows a backlog alert from this many unplayed games on.
pub(crate) const BACKLOG_WARNING_THRESHOLD: u64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct LibraryStats {
    pub(crate) total: u64,
    pub(crate) unplayed: u64,
    pub(crate) playing: u64,
    pub(crate) completed: u64,
    pub(crate) perfect: u64,
    pub(crate) total_play_minutes: u64,
}

impl LibraryStats {
    pub(crate) fn from_posts<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Self {
        posts.into_iter().fold(Self::default(), |mut stats, post| {
            stats.record(post.status, post.play_time);
            stats
        })
    }

    fn record(&mut self, status: GameStatus, play_time: i32) {
        self.total += 1;
        match status {
            GameStatus::Unplayed => self.unplayed += 1,
            GameStatus::Playing => self.playing += 1,
            GameStatus::Completed => self.completed += 1,
            GameStatus::Perfect => self.perfect += 1,
        }
        self.total_play_minutes += u64::try_from(play_time).unwrap_or(0);
    }

    pub(crate) fn cleared(&self) -> u64 {
        self.completed + self.perfect
    }

    /// Share of cleared games in whole percent, rounded half up.
    pub(crate) fn clear_rate(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        (self.cleared() * 100 + self.total / 2) / self.total
    }

    pub(crate) fn total_play_hours(&self) -> u64 {
        self.total_play_minutes / 60
    }

    pub(crate) fn backlog_warning(&self) -> bool {
        self.unplayed >= BACKLOG_WARNING_THRESHOLD
    }
}
