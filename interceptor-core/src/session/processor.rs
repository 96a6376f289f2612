use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};

use crate::link::encode_link::EncodeLink;
use crate::link::port::WorkerReply;
use crate::models::audio_models::{AudioQuantum, ChannelBuffers, EncodedPacket, InterceptorDiagnostics};
use crate::models::config::InterceptorConfig;
use crate::models::event::InterceptorEvent;
use crate::models::state::{CaptureState, RenderState};
use crate::processing::graph::AudioGraph;
use crate::processing::render_queue::{Enqueued, RenderQueue};
use crate::session::event_target::EventTarget;
use crate::traits::stream_provider::LiveStream;

/// Capture-side state, guarded by one lock.
pub(crate) struct CaptureCore {
    pub state: CaptureState,
    pub stream: Option<Box<dyn LiveStream>>,
    pub encode_link: Option<EncodeLink>,
    /// Cleared by `start()`; the next quantum sets it instead of encoding.
    pub first_quantum_consumed: bool,
}

/// Render-side state, guarded by one lock.
pub(crate) struct RenderCore {
    pub state: RenderState,
    pub queue: RenderQueue,
    pub idle_counter: u64,
}

impl RenderCore {
    /// Fill `output` from the queue head, or count an idle quantum.
    fn render_into(&mut self, output: &mut AudioQuantum) -> InterceptorEvent {
        if self.state.is_running() {
            if let Some(unit) = self.queue.dequeue() {
                debug_assert_eq!(unit.len(), output.number_of_channels());
                for (index, channel) in unit.iter().enumerate().take(output.number_of_channels()) {
                    output.copy_to_channel(channel, index);
                }
                return InterceptorEvent::RenderQueueUpdate(self.queue.len());
            }
        }

        self.idle_counter += 1;
        InterceptorEvent::RenderIdle(self.idle_counter)
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub quanta_processed: AtomicU64,
    pub encode_messages_sent: AtomicU64,
    pub packets_received: AtomicU64,
    pub decode_messages_sent: AtomicU64,
    pub units_received: AtomicU64,
    pub units_rendered: AtomicU64,
    pub idle_quanta: AtomicU64,
    pub units_dropped: AtomicU64,
}

impl Counters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> InterceptorDiagnostics {
        InterceptorDiagnostics {
            quanta_processed: self.quanta_processed.load(Ordering::Relaxed),
            encode_messages_sent: self.encode_messages_sent.load(Ordering::Relaxed),
            packets_received: self.packets_received.load(Ordering::Relaxed),
            decode_messages_sent: self.decode_messages_sent.load(Ordering::Relaxed),
            units_received: self.units_received.load(Ordering::Relaxed),
            units_rendered: self.units_rendered.load(Ordering::Relaxed),
            idle_quanta: self.idle_quanta.load(Ordering::Relaxed),
            units_dropped: self.units_dropped.load(Ordering::Relaxed),
        }
    }
}

/// State shared between the control surface, the audio thread and the
/// link inbound threads.
pub(crate) struct Shared {
    pub config: InterceptorConfig,
    pub capture: Mutex<CaptureCore>,
    pub render: Mutex<RenderCore>,
    /// Held from a render-queue or idle-counter change until its event has
    /// been dispatched, so listeners see those events in mutation order.
    /// Reentrant so a listener may call back into the render controls.
    pub render_events: ReentrantMutex<()>,
    pub graph: AudioGraph,
    pub events: EventTarget,
    pub counters: Counters,
}

impl Shared {
    pub fn new(config: InterceptorConfig) -> Self {
        let queue = RenderQueue::new(config.number_of_channels, config.buffer_length, config.max_render_queue);
        Self {
            capture: Mutex::new(CaptureCore {
                state: CaptureState::Inactive,
                stream: None,
                encode_link: None,
                first_quantum_consumed: true,
            }),
            render: Mutex::new(RenderCore {
                state: RenderState::Running,
                queue,
                idle_counter: 0,
            }),
            render_events: ReentrantMutex::new(()),
            graph: AudioGraph::new(config.monitor_gain),
            events: EventTarget::new(),
            counters: Counters::default(),
            config,
        }
    }

    /// Handle one reply from the encoder worker.
    pub fn on_encoder_reply(&self, reply: WorkerReply<EncodedPacket>) {
        match reply {
            WorkerReply::Data(packet) => {
                Counters::bump(&self.counters.packets_received);
                self.events.dispatch(&InterceptorEvent::DataAvailable(packet));
            }
            WorkerReply::End => {
                log::debug!("encoder output stream ended");
                self.events.dispatch(&InterceptorEvent::Stop);
            }
            WorkerReply::Failed(error) => {
                log::error!("encoder worker failed: {}", error);
                self.events.dispatch(&InterceptorEvent::WorkerError(error));
            }
        }
    }

    /// Handle one reply from the decoder worker.
    pub fn on_decoder_reply(&self, reply: WorkerReply<ChannelBuffers>) {
        match reply {
            WorkerReply::Data(unit) => {
                Counters::bump(&self.counters.units_received);
                let _ordered = self.render_events.lock();
                let (outcome, len) = {
                    let mut render = self.render.lock();
                    let outcome = render.queue.enqueue(unit);
                    (outcome, render.queue.len())
                };
                match outcome {
                    Enqueued::Appended => {}
                    Enqueued::Evicted => {
                        Counters::bump(&self.counters.units_dropped);
                        log::warn!("render queue full, dropped oldest unit");
                    }
                    Enqueued::Rejected => {
                        Counters::bump(&self.counters.units_dropped);
                        log::warn!(
                            "dropping decoded unit with wrong shape (expected {} x {})",
                            self.config.number_of_channels,
                            self.config.buffer_length
                        );
                        return;
                    }
                }
                self.events.dispatch(&InterceptorEvent::RenderQueueUpdate(len));
            }
            WorkerReply::End => log::debug!("decoder signalled end of decode"),
            WorkerReply::Failed(error) => {
                log::error!("decoder worker failed: {}", error);
                self.events.dispatch(&InterceptorEvent::WorkerError(error));
            }
        }
    }
}

/// Reply handler for a link, holding only a weak reference so a running
/// link never keeps the interceptor alive.
pub(crate) fn reply_handler<T>(
    shared: &Arc<Shared>,
    handle: fn(&Shared, WorkerReply<T>),
) -> impl FnMut(WorkerReply<T>) + Send + 'static
where
    T: Send + 'static,
{
    let weak: Weak<Shared> = Arc::downgrade(shared);
    move |reply| {
        if let Some(shared) = weak.upgrade() {
            handle(&shared, reply);
        }
    }
}

/// Real-time entry point, handed to the platform's audio callback.
///
/// Cheap to clone and safe to call from the audio thread. Work per call is
/// two short lock sections, one non-blocking channel send and a copy of one
/// quantum, plus waiting out any decode-side event dispatch in progress.
#[derive(Clone)]
pub struct QuantumProcessor {
    shared: Arc<Shared>,
}

impl QuantumProcessor {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Process one quantum: forward `input` to the encoder while recording,
    /// then fill `output` from the render queue or count an idle quantum.
    ///
    /// `output` is left untouched on idle quanta.
    pub fn process(&self, input: &AudioQuantum, output: &mut AudioQuantum) {
        let shared = &*self.shared;
        debug_assert_eq!(input.number_of_channels(), shared.config.number_of_channels);
        debug_assert_eq!(output.number_of_channels(), shared.config.number_of_channels);
        Counters::bump(&shared.counters.quanta_processed);

        {
            let mut capture = shared.capture.lock();
            if !capture.first_quantum_consumed {
                // The first buffer after start can hold stale samples.
                capture.first_quantum_consumed = true;
            } else if capture.state.is_recording() && shared.graph.is_source_connected() {
                if let Some(link) = capture.encode_link.as_ref() {
                    match link.encode(input.to_channel_buffers()) {
                        Ok(()) => Counters::bump(&shared.counters.encode_messages_sent),
                        Err(e) => log::trace!("encode dropped: {}", e),
                    }
                }
            }
        }

        let _ordered = shared.render_events.lock();
        let event = shared.render.lock().render_into(output);
        match event {
            InterceptorEvent::RenderIdle(_) => Counters::bump(&shared.counters.idle_quanta),
            _ => Counters::bump(&shared.counters.units_rendered),
        }
        shared.events.dispatch(&event);
    }

    /// Render the monitor tap for this quantum into `monitor_out`.
    pub fn process_monitor(&self, input: &AudioQuantum, monitor_out: &mut AudioQuantum) {
        self.shared.graph.render_monitor(input, monitor_out);
    }

    /// Quantum length in samples per channel.
    pub fn buffer_length(&self) -> usize {
        self.shared.config.buffer_length
    }

    pub fn number_of_channels(&self) -> usize {
        self.shared.config.number_of_channels
    }
}
