use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::trace;

/// A transient highlight pulse played on a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightEffect {
    pub duration: Duration,
}

/// Display-layer seam for playing highlight effects.
///
/// `stop` ends whatever is running on the marker and leaves nothing behind;
/// `start` begins a new effect. The highlighter always calls them as a pair so
/// effects are restarted, never queued.
pub trait EffectSink {
    fn stop(&mut self, marker: &str);
    fn start(&mut self, marker: &str, effect: HighlightEffect);
}

#[derive(Debug, Clone, Copy)]
struct Running {
    started: Instant,
    effect: HighlightEffect,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectStats {
    pub starts: usize,
    pub stops: usize,
}

/// Keeps at most one in-flight effect per marker.
#[derive(Debug, Default)]
pub struct EffectTimeline {
    running: HashMap<String, Running>,
    stats: HashMap<String, EffectStats>,
}

impl EffectTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_at(&mut self, marker: &str, effect: HighlightEffect, now: Instant) {
        self.running.insert(
            marker.to_string(),
            Running {
                started: now,
                effect,
            },
        );
        self.stats.entry(marker.to_string()).or_default().starts += 1;
        trace!(marker, duration_ms = effect.duration.as_millis() as u64, "effect started");
    }

    pub fn is_active(&self, marker: &str, now: Instant) -> bool {
        self.running
            .get(marker)
            .is_some_and(|r| now.saturating_duration_since(r.started) < r.effect.duration)
    }

    /// Time left on the marker's effect, if one is still playing.
    pub fn remaining(&self, marker: &str, now: Instant) -> Option<Duration> {
        let running = self.running.get(marker)?;
        running
            .effect
            .duration
            .checked_sub(now.saturating_duration_since(running.started))
            .filter(|d| !d.is_zero())
    }

    /// Drops finished effects and returns the markers they belonged to.
    pub fn expire(&mut self, now: Instant) -> Vec<String> {
        let finished: Vec<String> = self
            .running
            .iter()
            .filter(|(_, r)| now.saturating_duration_since(r.started) >= r.effect.duration)
            .map(|(m, _)| m.clone())
            .collect();
        for marker in &finished {
            self.running.remove(marker);
        }
        finished
    }

    pub fn active_count(&self) -> usize {
        self.running.len()
    }

    pub fn stats(&self, marker: &str) -> EffectStats {
        self.stats.get(marker).copied().unwrap_or_default()
    }
}

impl EffectSink for EffectTimeline {
    fn stop(&mut self, marker: &str) {
        if self.running.remove(marker).is_some() {
            trace!(marker, "effect cancelled");
        }
        self.stats.entry(marker.to_string()).or_default().stops += 1;
    }

    fn start(&mut self, marker: &str, effect: HighlightEffect) {
        self.start_at(marker, effect, Instant::now());
    }
}
