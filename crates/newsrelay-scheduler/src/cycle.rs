use newsrelay_core::PostId;

/// Where a cycle currently is. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Selecting,
    Composing,
    Publishing,
    Recording,
}

impl std::fmt::Display for CycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CycleState::Idle => "idle",
            CycleState::Selecting => "selecting",
            CycleState::Composing => "composing",
            CycleState::Publishing => "publishing",
            CycleState::Recording => "recording",
        };
        f.write_str(name)
    }
}

/// Stage at which a failed cycle stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    Selecting,
    Composing,
    Publishing,
}

impl std::fmt::Display for CycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CycleStage::Selecting => "selecting",
            CycleStage::Composing => "composing",
            CycleStage::Publishing => "publishing",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The last post is more recent than the minimum spacing.
    MinInterval { remaining: chrono::Duration },
    ShuttingDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing was attempted and nothing was persisted.
    Skipped(SkipReason),
    /// Both lookback windows were empty. Not counted as an attempt.
    NoArticles,
    Posted { url: String, post_id: PostId },
    Failed { stage: CycleStage, reason: String },
}

impl CycleOutcome {
    /// Whether this outcome counts toward `total_attempts`.
    #[must_use]
    pub fn is_attempt(&self) -> bool {
        matches!(self, CycleOutcome::Posted { .. } | CycleOutcome::Failed { .. })
    }
}
