//! # interceptor-core
//!
//! Real-time audio stream interceptor.
//!
//! Taps a live input stream quantum by quantum, forwards each quantum to an
//! encoder worker, and plays back decoded audio fed in from outside through
//! a render queue. Capture and playback each run their own small state
//! machine, and everything observable is reported as an event.
//!
//! Platforms plug in through `StreamProvider`; codecs plug in through
//! `WorkerFactory`. A 16-bit PCM worker pair ships as the default codec.
//!
//! ## Architecture
//!
//! ```text
//! interceptor-core (this crate)
//! ├── traits/       ← StreamProvider, LiveStream, EventListener, EncoderWorker, DecoderWorker, WorkerFactory
//! ├── models/       ← InterceptorError, CaptureState, RenderState, InterceptorConfig, InterceptorEvent, etc.
//! ├── processing/   ← RenderQueue, AudioGraph, PCM codec, WAV header
//! ├── link/         ← EncodeLink, DecodeLink, ReplyPort
//! └── session/      ← StreamInterceptor, QuantumProcessor, EventTarget
//! ```

pub mod link;
pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use link::port::{ReplyPort, WorkerReply};
pub use models::audio_models::{AudioQuantum, ChannelBuffers, EncodedPacket, InterceptorDiagnostics};
pub use models::config::{InterceptorConfig, InterceptorOptions, MediaConstraints, StreamConstraints};
pub use models::error::InterceptorError;
pub use models::event::{EventKind, InterceptorEvent};
pub use models::state::{CaptureState, RenderState};
pub use processing::graph::AudioGraph;
pub use processing::pcm_codec::PcmWorkerFactory;
pub use processing::render_queue::RenderQueue;
pub use session::event_target::ListenerId;
pub use session::interceptor::StreamInterceptor;
pub use session::processor::QuantumProcessor;
pub use traits::event_listener::EventListener;
pub use traits::stream_provider::{LiveStream, StreamProvider};
pub use traits::worker::{DecoderMessage, DecoderWorker, EncoderMessage, EncoderWorker, WorkerFactory};
