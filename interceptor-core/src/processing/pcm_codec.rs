//! Reference 16-bit PCM worker pair.
//!
//! Speaks the same link protocol a real codec would, which makes it useful
//! as a default, for loopback testing, and for consumers that just want
//! raw audio out of the interceptor.

use crate::link::port::ReplyPort;
use crate::models::audio_models::{ChannelBuffers, EncodedPacket};
use crate::models::config::{DecoderInit, InterceptorConfig, DEFAULT_DECODER_PATH, DEFAULT_ENCODER_PATH};
use crate::models::error::InterceptorError;
use crate::processing::wav_format::{self, WavFormat, PCM_BIT_DEPTH};
use crate::traits::worker::{DecoderMessage, DecoderWorker, EncoderMessage, EncoderWorker, WorkerFactory};

/// Resolves the built-in `pcm-encoder` / `pcm-decoder` worker names.
#[derive(Debug, Clone, Copy, Default)]
pub struct PcmWorkerFactory;

impl WorkerFactory for PcmWorkerFactory {
    fn create_encoder(&self, path: &str) -> Result<Box<dyn EncoderWorker>, InterceptorError> {
        if path != DEFAULT_ENCODER_PATH {
            return Err(InterceptorError::WorkerUnavailable(format!("unknown encoder worker: {}", path)));
        }
        Ok(Box::new(PcmEncoder::default()))
    }

    fn create_decoder(&self, path: &str) -> Result<Box<dyn DecoderWorker>, InterceptorError> {
        if path != DEFAULT_DECODER_PATH {
            return Err(InterceptorError::WorkerUnavailable(format!("unknown decoder worker: {}", path)));
        }
        Ok(Box::new(PcmDecoder::default()))
    }
}

/// Encodes each quantum into one interleaved 16-bit little-endian packet at
/// the encoder sample rate.
#[derive(Debug, Default)]
pub struct PcmEncoder {
    config: Option<Box<InterceptorConfig>>,
    header_sent: bool,
}

impl EncoderWorker for PcmEncoder {
    fn on_message(&mut self, message: EncoderMessage, port: &ReplyPort<EncodedPacket>) {
        match message {
            EncoderMessage::Init(config) => {
                self.config = Some(config);
                self.header_sent = false;
            }
            EncoderMessage::Encode(buffers) => {
                let Some(config) = self.config.as_ref() else {
                    port.fail(InterceptorError::WorkerFailed("encode before init".into()));
                    return;
                };

                if !config.raw_packet && !self.header_sent {
                    let format = WavFormat {
                        sample_rate: config.encoder_sample_rate,
                        channels: buffers.len() as u16,
                        bit_depth: PCM_BIT_DEPTH,
                    };
                    port.post(wav_format::generate_wav_header(format, 0).to_vec());
                    self.header_sent = true;
                }

                let resampled: ChannelBuffers = buffers
                    .iter()
                    .map(|ch| resample_linear(ch, config.original_sample_rate, config.encoder_sample_rate))
                    .collect();
                port.post(encode_pcm16(&resampled));
            }
            EncoderMessage::Done => port.end(),
        }
    }
}

/// Decodes interleaved 16-bit little-endian PCM into render units of exactly
/// `buffer_length` samples per channel.
#[derive(Debug, Default)]
pub struct PcmDecoder {
    init: Option<DecoderInit>,
    input_channels: usize,
    input_rate: u32,
    /// Bytes of an incomplete frame carried over to the next payload.
    remainder: Vec<u8>,
    /// Decoded samples not yet emitted, one buffer per output channel.
    pending: ChannelBuffers,
}

impl PcmDecoder {
    fn decode(&mut self, init: DecoderInit, data: Vec<u8>, port: &ReplyPort<ChannelBuffers>) {
        let mut payload = &data[..];
        if !init.raw_packet {
            if let Some(format) = wav_format::parse_wav_header(payload) {
                // A new stream: bytes left over from the previous one are stale.
                self.input_channels = format.channels as usize;
                self.input_rate = format.sample_rate;
                self.remainder.clear();
                payload = &payload[wav_format::WAV_HEADER_SIZE..];
            }
        }

        let mut bytes = std::mem::take(&mut self.remainder);
        bytes.extend_from_slice(payload);

        let frame_bytes = self.input_channels * 2;
        let usable = bytes.len() / frame_bytes * frame_bytes;
        self.remainder = bytes[usable..].to_vec();

        let planar = decode_pcm16(&bytes[..usable], self.input_channels);
        for (out_ch, pending) in self.pending.iter_mut().enumerate() {
            let source = &planar[out_ch.min(self.input_channels - 1)];
            pending.extend(resample_linear(source, self.input_rate, init.output_buffer_sample_rate));
        }

        while self.pending[0].len() >= init.buffer_length {
            let unit: ChannelBuffers = self
                .pending
                .iter_mut()
                .map(|ch| ch.drain(..init.buffer_length).collect())
                .collect();
            port.post(unit);
        }
    }
}

impl DecoderWorker for PcmDecoder {
    fn on_message(&mut self, message: DecoderMessage, port: &ReplyPort<ChannelBuffers>) {
        match message {
            DecoderMessage::Init(init) => {
                self.input_channels = init.number_of_channels;
                self.input_rate = init.decoder_sample_rate;
                self.remainder.clear();
                self.pending = vec![Vec::new(); init.number_of_channels];
                self.init = Some(init);
            }
            DecoderMessage::Decode(data) => match self.init {
                Some(init) => self.decode(init, data, port),
                None => port.fail(InterceptorError::WorkerFailed("decode before init".into())),
            },
        }
    }
}

/// Interleave planar f32 channels into 16-bit little-endian PCM.
///
/// Clamps out-of-range values. Channels shorter than the longest are padded
/// with silence.
pub fn encode_pcm16(channels: &[Vec<f32>]) -> Vec<u8> {
    let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
    let mut data = Vec::with_capacity(frames * channels.len() * 2);
    for i in 0..frames {
        for channel in channels {
            let sample = channel.get(i).copied().unwrap_or(0.0).clamp(-1.0, 1.0);
            let value = (sample * i16::MAX as f32) as i16;
            data.extend_from_slice(&value.to_le_bytes());
        }
    }
    data
}

/// Split interleaved 16-bit little-endian PCM into planar f32 channels.
///
/// Trailing bytes that do not form a whole frame are ignored.
pub fn decode_pcm16(bytes: &[u8], channels: usize) -> ChannelBuffers {
    let frame_bytes = channels * 2;
    let frames = if frame_bytes == 0 { 0 } else { bytes.len() / frame_bytes };
    let mut planar = vec![Vec::with_capacity(frames); channels];
    for frame in bytes.chunks_exact(frame_bytes.max(1)).take(frames) {
        for (ch, sample) in frame.chunks_exact(2).enumerate() {
            let value = i16::from_le_bytes([sample[0], sample[1]]);
            planar[ch].push(value as f32 / i16::MAX as f32);
        }
    }
    planar
}

/// Linear interpolation resampling of one channel.
///
/// Returns the input unchanged if the rates match.
pub fn resample_linear(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate || samples.is_empty() || source_rate == 0 {
        return samples.to_vec();
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let output_count = (samples.len() as f64 * ratio) as usize;

    let mut output = vec![0.0f32; output_count];
    for (i, sample) in output.iter_mut().enumerate() {
        let source_index = i as f64 / ratio;
        let index = source_index as usize;
        let fraction = (source_index - index as f64) as f32;

        if index + 1 < samples.len() {
            *sample = samples[index] * (1.0 - fraction) + samples[index + 1] * fraction;
        } else if index < samples.len() {
            *sample = samples[index];
        }
    }
    output
}
