use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::models::audio_models::AudioQuantum;

/// Routing between the live input, the quantum processor, the monitor tap
/// and the platform destination, plus the monitor gain.
///
/// ```text
/// source ─┬─> processor
///         └─> monitor(gain) ──> destination
/// ```
///
/// The processor only forwards input to the encoder while the source is
/// connected to it.
///
/// All fields are atomics so the audio thread can read them lock-free.
#[derive(Debug)]
pub struct AudioGraph {
    source_to_processor: AtomicBool,
    source_to_monitor: AtomicBool,
    monitor_to_destination: AtomicBool,
    monitor_gain: AtomicU32,
}

impl AudioGraph {
    pub fn new(monitor_gain: f32) -> Self {
        Self {
            source_to_processor: AtomicBool::new(false),
            source_to_monitor: AtomicBool::new(false),
            monitor_to_destination: AtomicBool::new(false),
            monitor_gain: AtomicU32::new(monitor_gain.to_bits()),
        }
    }

    /// Feed the live input into the processor and the monitor tap.
    pub fn connect_source(&self) {
        self.source_to_processor.store(true, Ordering::Release);
        self.source_to_monitor.store(true, Ordering::Release);
    }

    /// Route the monitor to the destination.
    pub fn connect_outputs(&self) {
        self.monitor_to_destination.store(true, Ordering::Release);
    }

    pub fn disconnect_all(&self) {
        self.source_to_processor.store(false, Ordering::Release);
        self.source_to_monitor.store(false, Ordering::Release);
        self.monitor_to_destination.store(false, Ordering::Release);
    }

    /// Whether input currently reaches the quantum processor.
    pub fn is_source_connected(&self) -> bool {
        self.source_to_processor.load(Ordering::Acquire)
    }

    /// Whether input currently reaches the destination through the monitor.
    pub fn is_monitor_routed(&self) -> bool {
        self.source_to_monitor.load(Ordering::Acquire) && self.monitor_to_destination.load(Ordering::Acquire)
    }

    pub fn monitor_gain(&self) -> f32 {
        f32::from_bits(self.monitor_gain.load(Ordering::Relaxed))
    }

    pub fn set_monitor_gain(&self, gain: f32) {
        self.monitor_gain.store(gain.to_bits(), Ordering::Relaxed);
    }

    /// Render the monitor tap: `gain * input` while routed, silence otherwise.
    pub fn render_monitor(&self, input: &AudioQuantum, output: &mut AudioQuantum) {
        if !self.is_monitor_routed() {
            output.fill(0.0);
            return;
        }

        let gain = self.monitor_gain();
        let channels = input.number_of_channels().min(output.number_of_channels());
        for ch in 0..channels {
            for (out, &sample) in output.channel_mut(ch).iter_mut().zip(input.channel(ch)) {
                *out = sample * gain;
            }
        }
        for ch in channels..output.number_of_channels() {
            output.channel_mut(ch).fill(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn gain_round_trips_through_atomic() {
        let graph = AudioGraph::new(0.25);
        assert_relative_eq!(graph.monitor_gain(), 0.25);
        graph.set_monitor_gain(1.5);
        assert_relative_eq!(graph.monitor_gain(), 1.5);
    }

    #[test]
    fn monitor_silent_until_fully_routed() {
        let graph = AudioGraph::new(1.0);
        let input = AudioQuantum::from_channels(vec![vec![0.5, -0.5]]);
        let mut output = AudioQuantum::from_channels(vec![vec![9.0, 9.0]]);

        graph.render_monitor(&input, &mut output);
        assert_eq!(output.channel(0), &[0.0, 0.0]);

        graph.connect_source();
        assert!(!graph.is_monitor_routed());
        graph.connect_outputs();
        assert!(graph.is_monitor_routed());

        graph.render_monitor(&input, &mut output);
        assert_eq!(output.channel(0), &[0.5, -0.5]);
    }

    #[test]
    fn monitor_applies_gain_immediately() {
        let graph = AudioGraph::new(0.0);
        graph.connect_source();
        graph.connect_outputs();
        let input = AudioQuantum::from_channels(vec![vec![0.8, 0.4]]);
        let mut output = AudioQuantum::silent(1, 2);

        graph.render_monitor(&input, &mut output);
        assert_eq!(output.channel(0), &[0.0, 0.0]);

        graph.set_monitor_gain(0.5);
        graph.render_monitor(&input, &mut output);
        assert_relative_eq!(output.channel(0)[0], 0.4);
        assert_relative_eq!(output.channel(0)[1], 0.2);
    }

    #[test]
    fn disconnect_all_clears_routes() {
        let graph = AudioGraph::new(1.0);
        graph.connect_source();
        graph.connect_outputs();
        graph.disconnect_all();
        assert!(!graph.is_source_connected());
        assert!(!graph.is_monitor_routed());
    }
}
