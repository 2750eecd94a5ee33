use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Generation counter plus liveness flag.
///
/// Every new request supersedes the previous ones; a response is applied
/// only while its ticket is the latest and the owning view is still open.
/// Clones share state, so a worker thread can check a ticket before handing
/// its result back.
#[derive(Debug, Clone)]
pub struct RequestGuard {
    generation: Arc<AtomicU64>,
    alive: Arc<AtomicBool>,
}

impl Default for RequestGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestGuard {
    pub fn new() -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn issue(&self) -> FetchTicket {
        FetchTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.is_alive() && self.generation.load(Ordering::SeqCst) == ticket.0
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Invalidates every outstanding ticket.
    pub fn close(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
