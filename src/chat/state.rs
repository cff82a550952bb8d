/// Lifecycle of one prompt submission.
///
/// Text: `Idle -> Submitting -> StreamingText -> Settled`.
/// Image: `Idle -> Submitting -> Settled`.
/// Any non-idle state can move to `Failed`, which is followed by `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    StreamingText,
    Settled,
    Failed,
}

impl SubmissionState {
    /// Whether a submission is in flight.
    pub fn is_active(&self) -> bool {
        matches!(self, SubmissionState::Submitting | SubmissionState::StreamingText)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting => "submitting",
            SubmissionState::StreamingText => "streaming",
            SubmissionState::Settled => "settled",
            SubmissionState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
