//! Message-passing links to the encoder and decoder workers.
//!
//! Each link owns two threads: the worker thread, which consumes commands
//! in order, and an inbound thread, which hands worker replies to the
//! interceptor. Nothing but owned messages crosses either channel.

pub mod decode_link;
pub mod encode_link;
pub mod port;

use std::thread;

use crossbeam_channel::{unbounded, Sender};

use crate::models::error::InterceptorError;
use port::{ReplyPort, WorkerReply};

/// Spawn the worker and inbound threads of a link and return the command
/// sender. Both threads exit once the sender is dropped and the worker has
/// drained its queue.
pub(crate) fn spawn_link<C, T, R, H>(
    name: &str,
    mut run: R,
    mut on_reply: H,
) -> Result<Sender<C>, InterceptorError>
where
    C: Send + 'static,
    T: Send + 'static,
    R: FnMut(C, &ReplyPort<T>) + Send + 'static,
    H: FnMut(WorkerReply<T>) + Send + 'static,
{
    let (command_tx, command_rx) = unbounded::<C>();
    let (port, reply_rx) = ReplyPort::channel();

    thread::Builder::new()
        .name(format!("{}-inbound", name))
        .spawn(move || {
            for reply in reply_rx {
                on_reply(reply);
            }
        })
        .map_err(|e| InterceptorError::WorkerUnavailable(format!("failed to spawn {} inbound thread: {}", name, e)))?;

    let worker_name = name.to_string();
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            for command in command_rx {
                run(command, &port);
            }
            log::debug!("{} worker exited", worker_name);
        })
        .map_err(|e| InterceptorError::WorkerUnavailable(format!("failed to spawn {} thread: {}", name, e)))?;

    Ok(command_tx)
}
