//! Load lifecycle shared by every controller.
//!
//! Each independent data source owns one [`LoadSlot`]. Triggering a load bumps
//! the slot's generation; a result is applied only if it carries the current
//! generation, so a slow, superseded request can never overwrite a newer one.

use futures::future::BoxFuture;
use std::future::Future;

use crate::error::Result;

/// Lifecycle of one asynchronous data source
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

impl<T> ViewState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, ViewState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ViewState::Loaded(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Loading => "loading",
            ViewState::Loaded(_) => "loaded",
            ViewState::Failed(_) => "failed",
        }
    }
}

/// Generation token handed out when a load is triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A [`ViewState`] plus the generation of the load it is waiting for
#[derive(Debug, Clone)]
pub struct LoadSlot<T> {
    state: ViewState<T>,
    generation: u64,
}

impl<T> Default for LoadSlot<T> {
    fn default() -> Self {
        Self {
            state: ViewState::Idle,
            generation: 0,
        }
    }
}

impl<T> LoadSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Enter `Loading`, dropping any previous data or error
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = ViewState::Loading;
        LoadTicket {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply an outcome if `ticket` is still current. Returns whether it was applied.
    pub fn settle(&mut self, ticket: LoadTicket, outcome: std::result::Result<T, String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = match outcome {
            Ok(data) => ViewState::Loaded(data),
            Err(msg) => ViewState::Failed(msg),
        };
        true
    }
}

/// A triggered load whose result has not been applied yet.
///
/// The future owns everything it needs, so it can be awaited, spawned, or
/// raced while the controller keeps accepting new triggers.
pub struct PendingLoad<T> {
    ticket: LoadTicket,
    future: BoxFuture<'static, Result<T>>,
}

impl<T> PendingLoad<T> {
    pub fn new<F>(ticket: LoadTicket, future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            ticket,
            future: Box::pin(future),
        }
    }

    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    pub async fn resolve(self) -> Settled<T> {
        Settled {
            ticket: self.ticket,
            result: self.future.await,
        }
    }
}

/// Outcome of a [`PendingLoad`], ready to hand back to its controller
#[derive(Debug)]
pub struct Settled<T> {
    pub ticket: LoadTicket,
    pub result: Result<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_starts_idle() {
        let slot: LoadSlot<u32> = LoadSlot::new();
        assert!(slot.state().is_idle());
        assert_eq!(slot.state().label(), "idle");
    }

    #[test]
    fn test_begin_clears_previous_value() {
        let mut slot = LoadSlot::new();
        let t1 = slot.begin();
        assert!(slot.settle(t1, Ok(7)));
        assert_eq!(slot.state().data(), Some(&7));

        slot.begin();
        assert!(slot.state().is_loading());
        assert_eq!(slot.state().data(), None);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut slot = LoadSlot::new();
        let first = slot.begin();
        let second = slot.begin();

        assert!(slot.settle(second, Ok("fresh")));
        assert!(!slot.settle(first, Ok("stale")));
        assert_eq!(slot.state(), &ViewState::Loaded("fresh"));
    }

    #[test]
    fn test_stale_failure_does_not_clobber_loading() {
        let mut slot: LoadSlot<u8> = LoadSlot::new();
        let first = slot.begin();
        let _second = slot.begin();

        assert!(!slot.settle(first, Err("boom".to_string())));
        assert!(slot.state().is_loading());
    }

    #[test]
    fn test_failed_state_is_reentrant() {
        let mut slot: LoadSlot<u8> = LoadSlot::new();
        let t = slot.begin();
        slot.settle(t, Err("nope".to_string()));
        assert_eq!(slot.state().error(), Some("nope"));

        let t = slot.begin();
        assert!(slot.settle(t, Ok(1)));
        assert!(slot.state().is_loaded());
    }

    #[tokio::test]
    async fn test_pending_load_carries_ticket() {
        let mut slot: LoadSlot<u8> = LoadSlot::new();
        let ticket = slot.begin();
        let pending = PendingLoad::new(ticket, async { Ok(5) });
        assert_eq!(pending.ticket(), ticket);

        let settled = pending.resolve().await;
        assert_eq!(settled.ticket.generation(), 1);
        assert_eq!(settled.result.unwrap(), 5);
    }

    #[test]
    fn test_pending_load_waits_for_reply() {
        let (tx, rx) = tokio::sync::oneshot::channel::<u8>();
        let pending = PendingLoad::new(LoadTicket { generation: 3 }, async move {
            rx.await
                .map_err(|_| crate::error::PickwiseError::Internal("reply dropped".into()))
        });

        let mut task = tokio_test::task::spawn(pending.resolve());
        tokio_test::assert_pending!(task.poll());

        tx.send(9).unwrap();
        assert!(task.is_woken());
        let settled = tokio_test::assert_ready!(task.poll());
        assert_eq!(settled.ticket.generation(), 3);
        assert_eq!(settled.result.unwrap(), 9);
    }
}
