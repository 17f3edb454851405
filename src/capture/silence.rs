/// Outcome of feeding one energy sample to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SilenceVerdict {
    /// Sound at or above the threshold; any pending silence run was cancelled.
    Sound,
    /// Below the threshold, but the run has not reached the timeout yet.
    Quiet,
    /// The contiguous silence run just reached the timeout.
    Elapsed,
}

/// Contiguous-run silence detector.
///
/// A run is armed on the first below-threshold sample and expires once
/// `silence_timeout_ms` worth of further ticks pass without a single sample
/// at or above the threshold. Any sound resets the run to nothing; this is
/// a contiguous-run detector, not a cumulative counter, so mid-sentence
/// pauses shorter than the timeout never trigger a stop.
pub struct SilenceDetector {
    threshold: f32,
    timeout_ticks: u64,
    run_ticks: Option<u64>,
}

impl SilenceDetector {
    pub fn new(threshold: f32, timeout_ms: u64, tick_interval_ms: u64) -> Self {
        let tick = tick_interval_ms.max(1);
        Self {
            threshold,
            timeout_ticks: timeout_ms.div_ceil(tick),
            run_ticks: None,
        }
    }

    /// Feed the energy sample for one tick.
    pub fn observe(&mut self, sample: f32) -> SilenceVerdict {
        if sample >= self.threshold {
            self.run_ticks = None;
            return SilenceVerdict::Sound;
        }

        // Ticks elapsed since the run was armed; the arming tick counts zero.
        let run = match self.run_ticks {
            None => 0,
            Some(prev) => prev + 1,
        };
        self.run_ticks = Some(run);

        if run >= self.timeout_ticks {
            SilenceVerdict::Elapsed
        } else {
            SilenceVerdict::Quiet
        }
    }

    pub fn silence_run_active(&self) -> bool {
        self.run_ticks.is_some()
    }

    pub fn reset(&mut self) {
        self.run_ticks = None;
    }
}
