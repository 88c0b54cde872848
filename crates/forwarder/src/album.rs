use std::{
    collections::{hash_map::Entry, HashMap},
    mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::task::JoinHandle;

use common::{
    types::{GroupKey, InboundMessage},
    LogError,
};

use crate::Forwarder;

/// Collects album messages and publishes each album after a quiet period
///
/// Every new message of an album restarts its timer, so an album is flushed
/// once when no messages came for it during the debounce time.
pub struct AlbumAggregator {
    inner: Arc<Inner>,
}

struct Inner {
    forwarder: Arc<Forwarder>,
    debounce: Duration,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    next_generation: u64,
    groups: HashMap<GroupKey, AlbumGroup>,
}

struct AlbumGroup {
    /// In arrival order
    messages: Vec<InboundMessage>,
    /// Generation of the latest scheduled flush, older timers do nothing
    generation: u64,
    timer: JoinHandle<()>,
}

impl AlbumAggregator {
    pub fn new(forwarder: Arc<Forwarder>, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                forwarder,
                debounce,
                state: Mutex::default(),
            }),
        }
    }

    /// Add message to its album and restart the album's timer
    ///
    /// Messages without group id are ignored.
    pub fn enqueue(&self, msg: InboundMessage) {
        let Some(key) = msg.group_key() else {
            log::error!("message {} without group id passed to albums", msg.message_id);
            return;
        };

        let mut state = self.inner.lock();
        state.next_generation += 1;
        let generation = state.next_generation;
        let timer = self.schedule_flush(key.clone(), generation);

        match state.groups.entry(key) {
            Entry::Occupied(mut e) => {
                let group = e.get_mut();
                group.messages.push(msg);
                group.generation = generation;
                mem::replace(&mut group.timer, timer).abort();
                log::debug!("album {} got {} messages", e.key(), e.get().messages.len());
            }
            Entry::Vacant(e) => {
                log::debug!("new album {}", e.key());
                e.insert(AlbumGroup {
                    messages: vec![msg],
                    generation,
                    timer,
                });
            }
        }
    }

    /// Count of albums waiting for flush
    pub fn pending_groups(&self) -> usize {
        self.inner.lock().groups.len()
    }

    fn schedule_flush(&self, key: GroupKey, generation: u64) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            let Some(messages) = inner.take_if_current(&key, generation) else {
                return;
            };

            log::debug!("flushing album {key} with {} messages", messages.len());
            if let Some(outcome) = inner
                .forwarder
                .process_album(&messages)
                .await
                .log_error_msg_with(|| format!("failed to publish album {key}"))
            {
                log::debug!("album {key} flushed: {outcome:?}");
            }
        })
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
    /// Remove group if no messages came after this flush was scheduled
    fn take_if_current(&self, key: &GroupKey, generation: u64) -> Option<Vec<InboundMessage>> {
        let mut state = self.lock();
        match state.groups.get(key) {
            Some(group) if group.generation == generation => {
                state.groups.remove(key).map(|g| g.messages)
            }
            _ => None,
        }
    }
}
