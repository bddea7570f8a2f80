use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::debug;

use super::{ChatMessage, Responder, Transcript};

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Blank input; nothing was recorded.
    Ignored,
    Accepted(ChatMessage),
}

struct Shared {
    transcript: Transcript,
    generation: u64,
    pending: usize,
}

impl Shared {
    /// Appends a reply unless the transcript was reset after it was queued.
    fn deliver(&mut self, generation: u64, reply: ChatMessage) -> bool {
        if self.generation != generation {
            return false;
        }
        self.transcript.push(reply);
        self.pending = self.pending.saturating_sub(1);
        true
    }
}

/// A question waiting for its reply.
struct Queued {
    text: String,
    generation: u64,
    due: Instant,
}

struct Worker {
    queue: mpsc::UnboundedSender<Queued>,
    handle: JoinHandle<()>,
}

/// A chat transcript plus the task that answers it.
///
/// Each reply is due one typing delay after its question was submitted, so
/// a burst of questions is answered one delay later, in submission order.
/// `reset` aborts the worker and bumps the generation; replies queued under
/// an older generation are dropped.
///
/// Lock order is `worker` then `shared`.
pub struct ChatSession {
    shared: Arc<Mutex<Shared>>,
    worker: Mutex<Option<Worker>>,
    responder: Responder,
    typing_delay: Duration,
    events: broadcast::Sender<ChatMessage>,
}

impl ChatSession {
    pub fn new(responder: Responder, typing_delay: Duration) -> Self {
        let (events, _) = broadcast::channel(128);
        Self {
            shared: Arc::new(Mutex::new(Shared {
                transcript: Transcript::new(),
                generation: 0,
                pending: 0,
            })),
            worker: Mutex::new(None),
            responder,
            typing_delay,
            events,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn submit(&self, text: &str) -> Submission {
        let text = text.trim();
        if text.is_empty() {
            return Submission::Ignored;
        }

        let mut worker = self.worker.lock().expect("chat worker lock poisoned");
        let message = ChatMessage::user(text);
        let queued = {
            let mut shared = self.shared.lock().expect("chat lock poisoned");
            shared.transcript.push(message.clone());
            shared.pending += 1;
            Queued {
                text: text.to_string(),
                generation: shared.generation,
                due: Instant::now() + self.typing_delay,
            }
        };
        let _ = self.events.send(message.clone());

        let queue = &worker.get_or_insert_with(|| self.spawn_worker()).queue;
        if let Err(mpsc::error::SendError(queued)) = queue.send(queued) {
            debug!("chat worker gone, respawning");
            let fresh = self.spawn_worker();
            let _ = fresh.queue.send(queued);
            *worker = Some(fresh);
        }

        Submission::Accepted(message)
    }

    pub fn reset(&self) {
        let mut worker = self.worker.lock().expect("chat worker lock poisoned");
        if let Some(worker) = worker.take() {
            worker.handle.abort();
        }
        let mut shared = self.shared.lock().expect("chat lock poisoned");
        shared.transcript.reset();
        shared.generation += 1;
        shared.pending = 0;
        debug!(generation = shared.generation, "chat transcript reset");
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.shared
            .lock()
            .expect("chat lock poisoned")
            .transcript
            .messages()
            .to_vec()
    }

    /// Replies still waiting out the typing delay.
    pub fn pending(&self) -> usize {
        self.shared.lock().expect("chat lock poisoned").pending
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.events.subscribe()
    }

    fn spawn_worker(&self) -> Worker {
        let (queue, mut inbox) = mpsc::unbounded_channel::<Queued>();
        let shared = self.shared.clone();
        let events = self.events.clone();
        let responder = self.responder;

        let handle = tokio::spawn(async move {
            while let Some(queued) = inbox.recv().await {
                sleep_until(queued.due).await;
                let reply = ChatMessage::bot(responder.respond(&queued.text));
                let delivered = shared
                    .lock()
                    .expect("chat lock poisoned")
                    .deliver(queued.generation, reply.clone());
                if delivered {
                    let _ = events.send(reply);
                } else {
                    debug!(generation = queued.generation, "dropping reply from before reset");
                }
            }
        });

        Worker { queue, handle }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        if let Ok(Some(worker)) = self.worker.get_mut().map(Option::take) {
            worker.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_at(generation: u64, pending: usize) -> Shared {
        Shared {
            transcript: Transcript::new(),
            generation,
            pending,
        }
    }

    #[test]
    fn reply_from_before_reset_is_discarded() {
        let mut shared = shared_at(1, 0);
        assert!(!shared.deliver(0, ChatMessage::bot("stale")));
        assert_eq!(shared.transcript.len(), 1);
        assert_eq!(shared.pending, 0);
    }

    #[test]
    fn current_reply_is_appended() {
        let mut shared = shared_at(3, 2);
        assert!(shared.deliver(3, ChatMessage::bot("fresh")));
        assert_eq!(shared.transcript.len(), 2);
        assert_eq!(shared.pending, 1);
    }
}
