use std::sync::Arc;

use uuid::Uuid;

use crate::link::decode_link::DecodeLink;
use crate::link::encode_link::EncodeLink;
use crate::models::audio_models::{AudioQuantum, InterceptorDiagnostics};
use crate::models::config::{InterceptorConfig, InterceptorOptions};
use crate::models::error::InterceptorError;
use crate::models::event::{EventKind, InterceptorEvent};
use crate::models::state::{CaptureState, RenderState};
use crate::session::event_target::ListenerId;
use crate::session::processor::{reply_handler, Counters, QuantumProcessor, Shared};
use crate::traits::event_listener::EventListener;
use crate::traits::stream_provider::StreamProvider;
use crate::traits::worker::WorkerFactory;

/// Sits between a live input stream and a pair of codec workers.
///
/// Generic over the platform (`StreamProvider`) and the codec backend
/// (`WorkerFactory`). Data flow:
/// ```text
/// [live input] → [QuantumProcessor] ──encode──> [EncodeLink] → dataAvailable
///                       ↑
///                 [RenderQueue] <──decoded units── [DecodeLink] <── feed_data
/// ```
///
/// Control methods never fail: transitions that are not valid from the
/// current state are ignored, and failures are reported as events.
pub struct StreamInterceptor<P: StreamProvider, W: WorkerFactory> {
    id: Uuid,
    provider: P,
    workers: W,
    shared: Arc<Shared>,
    decode_link: DecodeLink,
}

impl<P: StreamProvider, W: WorkerFactory> StreamInterceptor<P, W> {
    /// Whether `provider` offers everything the interceptor needs.
    pub fn is_recording_supported(provider: &P) -> bool {
        provider.is_supported()
    }

    /// Build an interceptor and spawn its decoder link.
    ///
    /// Fails without creating anything if the platform is unsupported, the
    /// options do not resolve to a valid configuration, or the decoder
    /// worker cannot be created.
    pub fn new(provider: P, workers: W, options: InterceptorOptions) -> Result<Self, InterceptorError> {
        if !Self::is_recording_supported(&provider) {
            return Err(InterceptorError::Unsupported);
        }

        let config = InterceptorConfig::resolve(options, provider.sample_rate());
        config.validate().map_err(InterceptorError::ConfigurationFailed)?;

        let shared = Arc::new(Shared::new(config));
        let decoder = workers.create_decoder(&shared.config.decoder_path)?;
        let decode_link = DecodeLink::spawn(
            decoder,
            shared.config.decoder_init(),
            reply_handler(&shared, Shared::on_decoder_reply),
        )?;

        let id = Uuid::new_v4();
        log::info!(
            "interceptor {} created: {} ch x {} samples @ {} Hz",
            id,
            shared.config.number_of_channels,
            shared.config.buffer_length,
            shared.config.original_sample_rate
        );

        Ok(Self {
            id,
            provider,
            workers,
            shared,
            decode_link,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &InterceptorConfig {
        &self.shared.config
    }

    pub fn capture_state(&self) -> CaptureState {
        self.shared.capture.lock().state
    }

    pub fn render_state(&self) -> RenderState {
        self.shared.render.lock().state
    }

    pub fn render_queue_len(&self) -> usize {
        self.shared.render.lock().queue.len()
    }

    pub fn idle_counter(&self) -> u64 {
        self.shared.render.lock().idle_counter
    }

    pub fn has_stream(&self) -> bool {
        self.shared.capture.lock().stream.is_some()
    }

    pub fn monitor_gain(&self) -> f32 {
        self.shared.graph.monitor_gain()
    }

    pub fn diagnostics(&self) -> InterceptorDiagnostics {
        self.shared.counters.snapshot()
    }

    // --- Events ---

    pub fn add_event_listener<L>(&self, kind: EventKind, listener: L) -> ListenerId
    where
        L: EventListener + 'static,
    {
        self.shared.events.add(kind, Arc::new(listener))
    }

    pub fn remove_event_listener(&self, kind: EventKind, id: ListenerId) -> bool {
        self.shared.events.remove(kind, id)
    }

    fn emit(&self, event: InterceptorEvent) {
        self.shared.events.dispatch(&event);
    }

    // --- Real-time surface ---

    /// Handle for the platform audio callback.
    pub fn quantum_processor(&self) -> QuantumProcessor {
        QuantumProcessor::new(Arc::clone(&self.shared))
    }

    /// Process one quantum on the calling thread. See [`QuantumProcessor::process`].
    pub fn process_quantum(&self, input: &AudioQuantum, output: &mut AudioQuantum) {
        self.quantum_processor().process(input, output);
    }

    /// Render the monitor tap. See [`QuantumProcessor::process_monitor`].
    pub fn process_monitor(&self, input: &AudioQuantum, monitor_out: &mut AudioQuantum) {
        self.shared.graph.render_monitor(input, monitor_out);
    }

    // --- Stream ---

    /// Acquire the live input stream, or reuse the one already held.
    ///
    /// Emits `streamReady` on success and `streamError` on failure.
    pub fn init_stream(&self) {
        if self.has_stream() {
            self.emit(InterceptorEvent::StreamReady);
            return;
        }

        match self.provider.acquire(&self.shared.config.media_constraints()) {
            Ok(mut stream) => {
                let stream_id = stream.id();
                {
                    let mut capture = self.shared.capture.lock();
                    if capture.stream.is_some() {
                        // Lost a race with a concurrent init_stream.
                        stream.release();
                    } else {
                        capture.stream = Some(stream);
                    }
                }
                self.shared.graph.connect_source();
                log::info!("interceptor {}: stream {} ready", self.id, stream_id);
                self.emit(InterceptorEvent::StreamReady);
            }
            Err(error) => {
                log::warn!("interceptor {}: stream acquisition failed: {}", self.id, error);
                self.emit(InterceptorEvent::StreamError(error));
            }
        }
    }

    /// Stop and forget the live stream. Capture state is left as is.
    pub fn clear_stream(&self) {
        let stream = self.shared.capture.lock().stream.take();
        if let Some(mut stream) = stream {
            log::info!("interceptor {}: releasing stream {}", self.id, stream.id());
            stream.release();
        }
    }

    // --- Capture state machine ---

    /// `inactive → recording`. Needs a live stream; otherwise a no-op.
    pub fn start(&self) {
        {
            let capture = self.shared.capture.lock();
            if capture.state.start().is_none() || capture.stream.is_none() {
                log::debug!("interceptor {}: start ignored in {} state", self.id, capture.state.as_str());
                return;
            }
        }

        let link = self
            .workers
            .create_encoder(&self.shared.config.encoder_path)
            .and_then(|worker| {
                EncodeLink::spawn(
                    worker,
                    &self.shared.config,
                    reply_handler(&self.shared, Shared::on_encoder_reply),
                )
            });
        let link = match link {
            Ok(link) => link,
            Err(error) => {
                log::error!("interceptor {}: cannot start encoder: {}", self.id, error);
                self.emit(InterceptorEvent::WorkerError(error));
                return;
            }
        };

        {
            let mut capture = self.shared.capture.lock();
            let Some(next) = capture.state.start() else {
                // A concurrent start won; `link` is dropped unused.
                return;
            };
            if capture.stream.is_none() {
                return;
            }
            capture.encode_link = Some(link);
            capture.first_quantum_consumed = false;
            capture.state = next;
        }

        self.shared.graph.connect_source();
        self.shared.graph.connect_outputs();
        log::info!("interceptor {}: capture started", self.id);
        self.emit(InterceptorEvent::Start);
    }

    /// `recording → paused`.
    pub fn pause(&self) {
        if self.transition_capture(CaptureState::pause) {
            log::info!("interceptor {}: capture paused", self.id);
            self.emit(InterceptorEvent::Pause);
        }
    }

    /// `paused → recording`.
    pub fn resume(&self) {
        if self.transition_capture(CaptureState::resume) {
            log::info!("interceptor {}: capture resumed", self.id);
            self.emit(InterceptorEvent::Resume);
        }
    }

    /// Any active state `→ inactive`.
    ///
    /// Disconnects the graph, releases the stream unless configured to leave
    /// it open, and tells the encoder to finish. The `stop` event follows
    /// once the encoder has flushed its output.
    pub fn stop(&self) {
        let (link, stream) = {
            let mut capture = self.shared.capture.lock();
            let Some(next) = capture.state.stop() else {
                return;
            };
            capture.state = next;
            let stream = if self.shared.config.leave_stream_open {
                None
            } else {
                capture.stream.take()
            };
            (capture.encode_link.take(), stream)
        };

        self.shared.graph.disconnect_all();
        if let Some(mut stream) = stream {
            stream.release();
        }
        if let Some(link) = link {
            if let Err(error) = link.done() {
                log::warn!("interceptor {}: encoder already gone: {}", self.id, error);
            }
        }
        log::info!("interceptor {}: capture stopped", self.id);
    }

    fn transition_capture(&self, transition: fn(CaptureState) -> Option<CaptureState>) -> bool {
        let mut capture = self.shared.capture.lock();
        match transition(capture.state) {
            Some(next) => {
                capture.state = next;
                true
            }
            None => false,
        }
    }

    // --- Render state machine ---

    /// `running → paused`. Queued audio is kept.
    pub fn render_pause(&self) {
        if self.transition_render(RenderState::pause) {
            log::info!("interceptor {}: render paused", self.id);
            self.emit(InterceptorEvent::RenderPause);
        }
    }

    /// `paused → running`.
    pub fn render_resume(&self) {
        if self.transition_render(RenderState::resume) {
            log::info!("interceptor {}: render resumed", self.id);
            self.emit(InterceptorEvent::RenderResume);
        }
    }

    fn transition_render(&self, transition: fn(RenderState) -> Option<RenderState>) -> bool {
        let mut render = self.shared.render.lock();
        match transition(render.state) {
            Some(next) => {
                render.state = next;
                true
            }
            None => false,
        }
    }

    /// Drop all queued audio and emit `rfforward`.
    pub fn render_fast_forward(&self) {
        let _ordered = self.shared.render_events.lock();
        let dropped = self.shared.render.lock().queue.flush();
        log::debug!("interceptor {}: skipped {} queued units", self.id, dropped);
        self.emit(InterceptorEvent::RenderFastForward);
    }

    /// Zero the idle counter and emit `ridle` with 0.
    pub fn reset_idle_counter(&self) {
        let _ordered = self.shared.render_events.lock();
        self.shared.render.lock().idle_counter = 0;
        self.emit(InterceptorEvent::RenderIdle(0));
    }

    // --- Monitor / playback input ---

    /// Non-finite gains are ignored.
    pub fn set_monitor_gain(&self, gain: f32) {
        if !gain.is_finite() {
            log::warn!("interceptor {}: ignoring monitor gain {}", self.id, gain);
            return;
        }
        self.shared.graph.set_monitor_gain(gain);
    }

    /// Push compressed data to the decoder for eventual playback.
    pub fn feed_data(&self, data: Vec<u8>) {
        match self.decode_link.decode(data) {
            Ok(()) => Counters::bump(&self.shared.counters.decode_messages_sent),
            Err(error) => {
                log::error!("interceptor {}: decoder unavailable: {}", self.id, error);
                self.emit(InterceptorEvent::WorkerError(error));
            }
        }
    }
}

impl<P: StreamProvider, W: WorkerFactory> Drop for StreamInterceptor<P, W> {
    fn drop(&mut self) {
        self.stop();
        self.clear_stream();
    }
}
