use std::{
    collections::{HashMap, VecDeque},
    sync::{Mutex, PoisonError},
    time::Duration,
};

use tokio::time::Instant;

pub const MOBILE_NOTICE_DISMISSED: &str = "mobile-notification-dismissed";

pub const SESSION_FLAG_TTL: Duration = Duration::from_secs(12 * 60 * 60);
pub const MAX_SESSION_FLAGS: usize = 10_000;

type FlagKey = (String, String);

#[derive(Debug, Default)]
struct FlagTable {
    set_at: HashMap<FlagKey, Instant>,
    // Same entries as `set_at`, oldest first.
    order: VecDeque<(FlagKey, Instant)>,
}

impl FlagTable {
    fn expire(&mut self, now: Instant, ttl: Duration) {
        while self
            .order
            .front()
            .is_some_and(|(_, at)| now.duration_since(*at) >= ttl)
        {
            self.pop_oldest();
        }
    }

    fn pop_oldest(&mut self) {
        if let Some((key, _)) = self.order.pop_front() {
            self.set_at.remove(&key);
        }
    }
}

/// Per-browser-session flags, in memory only. Entries expire after `ttl`
/// and the oldest are evicted once `capacity` is reached.
#[derive(Debug)]
pub struct SessionFlags {
    ttl: Duration,
    capacity: usize,
    table: Mutex<FlagTable>,
}

impl Default for SessionFlags {
    fn default() -> Self {
        Self::with_limits(SESSION_FLAG_TTL, MAX_SESSION_FLAGS)
    }
}

impl SessionFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            table: Mutex::new(FlagTable::default()),
        }
    }

    /// Setting a flag that is already live keeps its original expiry.
    pub fn set(&self, session_id: &str, flag: &str) {
        let now = Instant::now();
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.expire(now, self.ttl);

        let key = (session_id.to_owned(), flag.to_owned());
        if table.set_at.contains_key(&key) {
            return;
        }
        while table.set_at.len() >= self.capacity {
            table.pop_oldest();
        }
        table.set_at.insert(key.clone(), now);
        table.order.push_back((key, now));
    }

    pub fn is_set(&self, session_id: &str, flag: &str) -> bool {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.expire(Instant::now(), self.ttl);
        table
            .set_at
            .contains_key(&(session_id.to_owned(), flag.to_owned()))
    }

    pub fn len(&self) -> usize {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.expire(Instant::now(), self.ttl);
        table.set_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
