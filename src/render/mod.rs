//! Render execution capability and its `ffmpeg` implementation.

/// Graph execution through the system `ffmpeg`.
pub mod executor;
