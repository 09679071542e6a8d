//! In-memory result cache with per-key single-flight.
//!
//! Every key owns a slot guarded by its own mutex. A slot is either idle, has
//! one producer in flight whose outcome all concurrent callers share, or holds
//! a value that stays fresh for its time-to-live. Failures are shared with the
//! callers that were waiting on them but never stored.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::errors::Result;

type Flight<V> = Shared<BoxFuture<'static, Result<V>>>;
type SlotRef<V> = Arc<Mutex<Slot<V>>>;

enum Slot<V> {
    Idle,
    InFlight(Flight<V>),
    Fresh(Entry<V>),
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
}

impl<V> Entry<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) <= self.ttl
    }
}

pub struct Cache<V> {
    slots: Mutex<HashMap<String, SlotRef<V>>>,
}

impl<V> Default for Cache<V> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the fresh value stored under `key`, or runs `producer` and
    /// stores its value for `ttl`.
    ///
    /// Callers arriving while a producer for the same key is running wait for
    /// it instead of starting their own.
    pub async fn get_or_set<F, Fut>(&self, key: &str, ttl: Duration, producer: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let slot = self.slot(key).await;

        let flight = {
            let mut state = slot.lock().await;

            match &*state {
                Slot::Fresh(entry) if entry.is_fresh(Instant::now()) => {
                    debug!(key, "Cache hit");
                    return Ok(entry.value.clone());
                }
                Slot::InFlight(flight) => {
                    debug!(key, "Waiting for in-flight request");
                    flight.clone()
                }
                _ => {
                    debug!(key, "Cache miss");
                    let flight = Self::launch(Arc::clone(&slot), ttl, producer());
                    *state = Slot::InFlight(flight.clone());
                    flight
                }
            }
        };

        flight.await
    }

    /// Drops whatever is stored under `key`
    pub async fn invalidate(&self, key: &str) -> bool {
        self.slots.lock().await.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.slots.lock().await.clear()
    }

    /// Removes expired and idle slots nobody is using, returns how many went
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut slots = self.slots.lock().await;
        let before = slots.len();

        slots.retain(|_, slot| {
            if Arc::strong_count(slot) > 1 {
                return true;
            }

            match slot.try_lock() {
                Ok(state) => match &*state {
                    Slot::Fresh(entry) => entry.is_fresh(now),
                    Slot::InFlight(_) => true,
                    Slot::Idle => false,
                },
                Err(_) => true,
            }
        });

        before - slots.len()
    }

    /// Number of keys holding a fresh value
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let slots = self.slots.lock().await;

        let mut count = 0;
        for slot in slots.values() {
            if let Slot::Fresh(entry) = &*slot.lock().await
                && entry.is_fresh(now)
            {
                count += 1;
            }
        }

        count
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn slot(&self, key: &str) -> SlotRef<V> {
        let mut slots = self.slots.lock().await;
        let slot = slots
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Slot::Idle)));

        Arc::clone(slot)
    }

    /// Wraps the producer so that whichever caller drives it to completion
    /// also settles the slot.
    fn launch<Fut>(slot: SlotRef<V>, ttl: Duration, producer: Fut) -> Flight<V>
    where
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        async move {
            let result = producer.await;

            let mut state = slot.lock().await;
            *state = match &result {
                Ok(value) => Slot::Fresh(Entry {
                    value: value.clone(),
                    stored_at: Instant::now(),
                    ttl,
                }),
                Err(_) => Slot::Idle,
            };

            result
        }
        .boxed()
        .shared()
    }
}
