//! Crypto context lifecycle.
//!
//! The k256 backend needs no global precomputation, but callers still pair
//! `start` and `stop` around elliptic-curve work. The context counts
//! outstanding starts so that concurrent callers can share it: the first
//! `start` brings it up, the matching last `stop` tears it down, and
//! surplus `stop` calls are no-ops.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Reference-counted crypto context.
#[derive(Debug, Default)]
pub struct EccContext {
    refs: AtomicUsize,
}

static GLOBAL: EccContext = EccContext::new();

impl EccContext {
    /// Create a stopped context.
    pub const fn new() -> Self {
        EccContext { refs: AtomicUsize::new(0) }
    }

    /// The process-wide context.
    pub fn global() -> &'static EccContext {
        &GLOBAL
    }

    /// Take one reference.
    ///
    /// # Returns
    /// `true` if this call brought the context up.
    pub fn start(&self) -> bool {
        let first = self.refs.fetch_add(1, Ordering::AcqRel) == 0;
        if first {
            log::debug!("crypto context started");
        }
        first
    }

    /// Release one reference; a stop with no outstanding start does nothing.
    ///
    /// # Returns
    /// `true` if this call tore the context down.
    pub fn stop(&self) -> bool {
        let last = self
            .refs
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .map(|prev| prev == 1)
            .unwrap_or(false);
        if last {
            log::debug!("crypto context stopped");
        }
        last
    }

    /// `true` while at least one start is outstanding.
    pub fn is_started(&self) -> bool {
        self.refs.load(Ordering::Acquire) > 0
    }

    /// Start the context and stop it again when the guard is dropped.
    pub fn session(&self) -> EccSession<'_> {
        self.start();
        EccSession { ctx: self }
    }
}

/// Guard returned by [`EccContext::session`].
#[derive(Debug)]
pub struct EccSession<'a> {
    ctx: &'a EccContext,
}

impl Drop for EccSession<'_> {
    fn drop(&mut self) {
        self.ctx.stop();
    }
}
