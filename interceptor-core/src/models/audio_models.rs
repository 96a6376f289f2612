/// One buffer per channel, each holding the same number of samples.
///
/// This is the unit that crosses a link: `encode` payloads and decoded
/// render units are both channel buffers.
pub type ChannelBuffers = Vec<Vec<f32>>;

/// An encoded data unit produced by the encoder worker.
pub type EncodedPacket = Vec<u8>;

/// A fixed-size block of planar audio handed to or produced by one
/// real-time callback.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioQuantum {
    channels: ChannelBuffers,
}

impl AudioQuantum {
    /// A silent quantum of `number_of_channels` × `length` samples.
    pub fn silent(number_of_channels: usize, length: usize) -> Self {
        Self {
            channels: vec![vec![0.0; length]; number_of_channels],
        }
    }

    /// Wrap existing channel buffers. All channels must share one length.
    pub fn from_channels(channels: ChannelBuffers) -> Self {
        assert!(
            is_uniform(&channels),
            "all channels of a quantum must have the same length"
        );
        Self { channels }
    }

    pub fn number_of_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    /// Copy `source` into channel `index`, truncating to the quantum length.
    pub fn copy_to_channel(&mut self, source: &[f32], index: usize) {
        let dest = &mut self.channels[index];
        let n = dest.len().min(source.len());
        dest[..n].copy_from_slice(&source[..n]);
    }

    pub fn fill(&mut self, value: f32) {
        for channel in &mut self.channels {
            channel.fill(value);
        }
    }

    /// Owned copy of every channel, for handing across a link.
    pub fn to_channel_buffers(&self) -> ChannelBuffers {
        self.channels.clone()
    }
}

/// Whether every channel has the same length.
pub fn is_uniform(channels: &[Vec<f32>]) -> bool {
    channels.windows(2).all(|w| w[0].len() == w[1].len())
}

/// Counters for debugging an interceptor instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterceptorDiagnostics {
    pub quanta_processed: u64,
    pub encode_messages_sent: u64,
    pub packets_received: u64,
    pub decode_messages_sent: u64,
    pub units_received: u64,
    pub units_rendered: u64,
    pub idle_quanta: u64,
    pub units_dropped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_quantum_shape() {
        let q = AudioQuantum::silent(2, 8);
        assert_eq!(q.number_of_channels(), 2);
        assert_eq!(q.len(), 8);
        assert!(q.channel(1).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn copy_to_channel_truncates() {
        let mut q = AudioQuantum::silent(1, 3);
        q.copy_to_channel(&[1.0, 2.0, 3.0, 4.0], 0);
        assert_eq!(q.channel(0), &[1.0, 2.0, 3.0]);

        q.copy_to_channel(&[9.0], 0);
        assert_eq!(q.channel(0), &[9.0, 2.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn ragged_channels_are_rejected() {
        AudioQuantum::from_channels(vec![vec![0.0; 4], vec![0.0; 3]]);
    }

    #[test]
    fn empty_quantum() {
        let q = AudioQuantum::from_channels(Vec::new());
        assert!(q.is_empty());
        assert_eq!(q.number_of_channels(), 0);
    }
}
