use serde::{Deserialize, Serialize};

use super::error::InterceptorError;

pub const DEFAULT_BUFFER_LENGTH: usize = 4096;
pub const DEFAULT_MONITOR_GAIN: f32 = 0.0;
pub const DEFAULT_NUMBER_OF_CHANNELS: usize = 1;
pub const DEFAULT_ENCODER_SAMPLE_RATE: u32 = 48000;
pub const DEFAULT_ENCODER_PATH: &str = "pcm-encoder";
pub const DEFAULT_DECODER_PATH: &str = "pcm-decoder";
pub const DEFAULT_MAX_BUFFERS_PER_PAGE: u32 = 40;
/// Opus `OPUS_APPLICATION_AUDIO`.
pub const DEFAULT_ENCODER_APPLICATION: u32 = 2049;
/// Encoder frame size in milliseconds.
pub const DEFAULT_ENCODER_FRAME_SIZE: u32 = 20;
pub const DEFAULT_RESAMPLE_QUALITY: u8 = 3;

/// Platform capture constraints requested for the live input stream.
///
/// All processing is disabled by default so the interceptor sees the raw
/// microphone signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamConstraints {
    pub echo_cancellation: bool,
    pub auto_gain_control: bool,
    pub noise_suppression: bool,
    pub highpass_filter: bool,
}

/// Constraint object handed to the platform when acquiring a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaConstraints {
    pub audio: StreamConstraints,
}

/// User-supplied options. Anything left `None` falls back to its default
/// when resolved into an [`InterceptorConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterceptorOptions {
    pub buffer_length: Option<usize>,
    pub monitor_gain: Option<f32>,
    pub number_of_channels: Option<usize>,
    pub encoder_sample_rate: Option<u32>,
    pub encoder_path: Option<String>,
    pub decoder_path: Option<String>,
    pub raw_packet: Option<bool>,
    pub leave_stream_open: Option<bool>,
    pub max_buffers_per_page: Option<u32>,
    pub encoder_application: Option<u32>,
    pub encoder_frame_size: Option<u32>,
    pub resample_quality: Option<u8>,
    pub stream_options: Option<StreamConstraints>,
    /// Cap on queued decoded units; `None` keeps the queue unbounded.
    pub max_render_queue: Option<usize>,
}

impl InterceptorOptions {
    /// Parse options from a JSON object using the camelCase option names.
    pub fn from_json(json: &str) -> Result<Self, InterceptorError> {
        serde_json::from_str(json)
            .map_err(|e| InterceptorError::ConfigurationFailed(format!("invalid options: {}", e)))
    }
}

/// Resolved, immutable interceptor configuration.
///
/// Built once per instance from [`InterceptorOptions`] and the platform's
/// sample rate, then shared read-only. This is also the snapshot sent to the
/// encoder worker with its `init` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterceptorConfig {
    /// Samples per channel in one audio quantum.
    pub buffer_length: usize,
    pub monitor_gain: f32,
    pub number_of_channels: usize,
    /// Sample rate of the platform audio context.
    pub original_sample_rate: u32,
    pub encoder_sample_rate: u32,
    pub encoder_path: String,
    pub decoder_path: String,
    /// Always set: encoded pages are yielded as soon as they are ready.
    pub stream_pages: bool,
    pub raw_packet: bool,
    pub leave_stream_open: bool,
    /// Forwarded to the encoder worker untouched.
    pub max_buffers_per_page: u32,
    pub encoder_application: u32,
    pub encoder_frame_size: u32,
    pub resample_quality: u8,
    pub stream_options: StreamConstraints,
    pub max_render_queue: Option<usize>,
}

impl InterceptorConfig {
    /// Merge `options` with the documented defaults.
    pub fn resolve(options: InterceptorOptions, original_sample_rate: u32) -> Self {
        Self {
            buffer_length: options.buffer_length.unwrap_or(DEFAULT_BUFFER_LENGTH),
            monitor_gain: options.monitor_gain.unwrap_or(DEFAULT_MONITOR_GAIN),
            number_of_channels: options.number_of_channels.unwrap_or(DEFAULT_NUMBER_OF_CHANNELS),
            original_sample_rate,
            encoder_sample_rate: options.encoder_sample_rate.unwrap_or(DEFAULT_ENCODER_SAMPLE_RATE),
            encoder_path: options.encoder_path.unwrap_or_else(|| DEFAULT_ENCODER_PATH.into()),
            decoder_path: options.decoder_path.unwrap_or_else(|| DEFAULT_DECODER_PATH.into()),
            stream_pages: true,
            raw_packet: options.raw_packet.unwrap_or(false),
            leave_stream_open: options.leave_stream_open.unwrap_or(false),
            max_buffers_per_page: options.max_buffers_per_page.unwrap_or(DEFAULT_MAX_BUFFERS_PER_PAGE),
            encoder_application: options.encoder_application.unwrap_or(DEFAULT_ENCODER_APPLICATION),
            encoder_frame_size: options.encoder_frame_size.unwrap_or(DEFAULT_ENCODER_FRAME_SIZE),
            resample_quality: options.resample_quality.unwrap_or(DEFAULT_RESAMPLE_QUALITY),
            stream_options: options.stream_options.unwrap_or_default(),
            max_render_queue: options.max_render_queue,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.buffer_length == 0 {
            return Err("buffer length must be positive".into());
        }
        if self.number_of_channels == 0 {
            return Err("channel count must be positive".into());
        }
        if self.original_sample_rate == 0 {
            return Err("platform sample rate must be positive".into());
        }
        if self.encoder_sample_rate == 0 {
            return Err("encoder sample rate must be positive".into());
        }
        if self.max_buffers_per_page == 0 {
            return Err("max buffers per page must be positive".into());
        }
        if !self.monitor_gain.is_finite() {
            return Err(format!("invalid monitor gain: {}", self.monitor_gain));
        }
        if self.max_render_queue == Some(0) {
            return Err("render queue cap must be positive".into());
        }
        Ok(())
    }

    /// Constraints passed to the platform on stream acquisition.
    pub fn media_constraints(&self) -> MediaConstraints {
        MediaConstraints {
            audio: self.stream_options,
        }
    }

    /// The subset of the configuration the decoder worker needs.
    pub fn decoder_init(&self) -> DecoderInit {
        DecoderInit {
            buffer_length: self.buffer_length,
            number_of_channels: self.number_of_channels,
            decoder_sample_rate: self.encoder_sample_rate,
            output_buffer_sample_rate: self.original_sample_rate,
            raw_packet: self.raw_packet,
        }
    }
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self::resolve(InterceptorOptions::default(), DEFAULT_ENCODER_SAMPLE_RATE)
    }
}

/// Decoder `init` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoderInit {
    pub buffer_length: usize,
    pub number_of_channels: usize,
    /// Rate of the compressed data fed in through `feed_data`.
    pub decoder_sample_rate: u32,
    /// Rate of the PCM units delivered back for playback.
    pub output_buffer_sample_rate: u32,
    pub raw_packet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = InterceptorConfig::resolve(InterceptorOptions::default(), 44100);
        assert_eq!(config.buffer_length, 4096);
        assert_eq!(config.monitor_gain, 0.0);
        assert_eq!(config.number_of_channels, 1);
        assert_eq!(config.original_sample_rate, 44100);
        assert_eq!(config.encoder_sample_rate, 48000);
        assert!(config.stream_pages);
        assert!(!config.raw_packet);
        assert!(!config.leave_stream_open);
        assert_eq!(config.max_buffers_per_page, 40);
        assert_eq!(config.encoder_application, 2049);
        assert_eq!(config.encoder_frame_size, 20);
        assert_eq!(config.resample_quality, 3);
        assert_eq!(config.stream_options, StreamConstraints::default());
        assert!(!config.stream_options.echo_cancellation);
        assert_eq!(config.max_render_queue, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn options_override_defaults() {
        let options = InterceptorOptions {
            buffer_length: Some(1024),
            number_of_channels: Some(2),
            leave_stream_open: Some(true),
            ..Default::default()
        };
        let config = InterceptorConfig::resolve(options, 48000);
        assert_eq!(config.buffer_length, 1024);
        assert_eq!(config.number_of_channels, 2);
        assert!(config.leave_stream_open);
        assert_eq!(config.encoder_sample_rate, 48000);
    }

    #[test]
    fn parses_camel_case_json() {
        let options = InterceptorOptions::from_json(
            r#"{"bufferLength": 2048, "encoderSampleRate": 16000, "rawPacket": true,
                "streamOptions": {"echoCancellation": true}}"#,
        )
        .unwrap();
        assert_eq!(options.buffer_length, Some(2048));
        assert_eq!(options.encoder_sample_rate, Some(16000));
        assert_eq!(options.raw_packet, Some(true));
        let constraints = options.stream_options.unwrap();
        assert!(constraints.echo_cancellation);
        assert!(!constraints.noise_suppression);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = InterceptorOptions::from_json("{\"bufferLength\": \"big\"}").unwrap_err();
        assert!(matches!(err, InterceptorError::ConfigurationFailed(_)));
    }

    #[test]
    fn validate_rejects_degenerate_values() {
        let mut config = InterceptorConfig::default();
        config.buffer_length = 0;
        assert!(config.validate().is_err());

        let mut config = InterceptorConfig::default();
        config.number_of_channels = 0;
        assert!(config.validate().is_err());

        let config = InterceptorConfig::resolve(InterceptorOptions::default(), 0);
        assert!(config.validate().is_err());

        let mut config = InterceptorConfig::default();
        config.max_render_queue = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn decoder_init_carries_rates() {
        let options = InterceptorOptions {
            encoder_sample_rate: Some(24000),
            raw_packet: Some(true),
            ..Default::default()
        };
        let init = InterceptorConfig::resolve(options, 44100).decoder_init();
        assert_eq!(init.decoder_sample_rate, 24000);
        assert_eq!(init.output_buffer_sample_rate, 44100);
        assert_eq!(init.buffer_length, 4096);
        assert!(init.raw_packet);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let json = serde_json::to_value(InterceptorConfig::default()).unwrap();
        assert_eq!(json["bufferLength"], 4096);
        assert_eq!(json["streamPages"], true);
        assert_eq!(json["maxBuffersPerPage"], 40);
    }
}
