use crate::foundation::error::{MixlineError, MixlineResult};

/// The master playback clock, passed by reference to every component that
/// needs the current timeline time.
///
/// Single-writer contract: only the main transport control calls
/// [`Transport::seek`], and only the active media element's time-update
/// callback calls [`Transport::on_media_time`]. Everything else reads.
/// Keeping the clock an explicit value rules out the hidden global cell
/// that multiple UI surfaces used to race on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transport {
    current_secs: f64,
    duration_secs: f64,
}

impl Transport {
    /// Create a clock at time zero for a timeline of `duration_secs`.
    pub fn new(duration_secs: f64) -> MixlineResult<Self> {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(MixlineError::validation(
                "transport duration must be finite and >= 0",
            ));
        }
        Ok(Self {
            current_secs: 0.0,
            duration_secs,
        })
    }

    /// Current playback position in seconds.
    pub fn current_secs(&self) -> f64 {
        self.current_secs
    }

    /// Timeline duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Jump the clock (transport control writer). Returns the applied,
    /// clamped position.
    pub fn seek(&mut self, t: f64) -> f64 {
        self.write_clamped(t)
    }

    /// Follow the active media element (time-update writer). Returns the
    /// applied, clamped position.
    pub fn on_media_time(&mut self, t: f64) -> f64 {
        self.write_clamped(t)
    }

    /// Adopt a new timeline duration, clamping the position into it.
    pub fn set_duration(&mut self, duration_secs: f64) -> MixlineResult<()> {
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(MixlineError::validation(
                "transport duration must be finite and >= 0",
            ));
        }
        self.duration_secs = duration_secs;
        self.current_secs = self.current_secs.min(duration_secs);
        Ok(())
    }

    fn write_clamped(&mut self, t: f64) -> f64 {
        self.current_secs = if t.is_finite() {
            t.clamp(0.0, self.duration_secs)
        } else {
            0.0
        };
        self.current_secs
    }
}
