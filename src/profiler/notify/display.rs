use tracing::info;

use crate::profiler::intensity::IntensityImage;

/// Accepts one preview frame per iteration.
pub trait PreviewSink {
    fn show(&mut self, frame: &IntensityImage);
}

/// Headless preview: logs frame statistics every `every` frames. `0` keeps it silent.
#[derive(Debug, Clone)]
pub struct StatsDisplay {
    every: u64,
    seen: u64,
}

impl StatsDisplay {
    pub fn new(every: u64) -> Self {
        Self { every, seen: 0 }
    }

    pub fn frames_seen(&self) -> u64 {
        self.seen
    }
}

impl PreviewSink for StatsDisplay {
    fn show(&mut self, frame: &IntensityImage) {
        self.seen += 1;
        if self.every == 0 || self.seen % self.every != 0 {
            return;
        }
        let stats = frame.stats();
        info!(
            frame = self.seen,
            min = stats.min,
            max = stats.max,
            mean = stats.mean,
            peak_x = stats.peak.0,
            peak_y = stats.peak.1,
            "Preview"
        );
    }
}
