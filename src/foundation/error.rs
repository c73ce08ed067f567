/// Crate-wide result alias.
pub type MixlineResult<T> = Result<T, MixlineError>;

/// Error taxonomy for the compositor core.
///
/// Every failure crosses the mix/plan/compose boundary as one of these typed
/// variants; nothing is retried internally and nothing panics past the
/// boundary.
#[derive(thiserror::Error, Debug)]
pub enum MixlineError {
    /// Bad arguments or model state (range violations, zero rates).
    #[error("validation error: {0}")]
    Validation(String),

    /// Corrupt or unsupported media; the operation aborted with no partial
    /// buffer produced.
    #[error("decode error: {0}")]
    Decode(String),

    /// Clips handed to the mixer disagree on PCM format. The mix aborts;
    /// the previously published buffer stays last-known-good.
    #[error(
        "format mismatch: expected {expected_sample_rate} Hz / {expected_channels} ch, \
         got {got_sample_rate} Hz / {got_channels} ch"
    )]
    FormatMismatch {
        /// Sample rate of the first clip in the mix set.
        expected_sample_rate: u32,
        /// Channel count of the first clip in the mix set.
        expected_channels: u16,
        /// Sample rate of the offending clip.
        got_sample_rate: u32,
        /// Channel count of the offending clip.
        got_channels: u16,
    },

    /// Video planning was attempted with no video clips on the timeline.
    #[error("empty timeline: video planning requires at least one clip")]
    EmptyTimeline,

    /// Propagated verbatim from the render execution capability.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error with context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MixlineError {
    /// Build a [`MixlineError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MixlineError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`MixlineError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}
