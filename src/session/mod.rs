//! Session-oriented compositor API and the shared playback clock.

/// The compositor session: snapshot reads, remix policy, plan/compose entry.
pub mod compositor;
/// The explicit master playback clock.
pub mod transport;
