// cartkeep/src/context.rs

//! Defines `CallContext`, the deadline/cancellation carrier threaded through every
//! store and catalog call.
//!
//! Network calls are the only suspension points in this crate. Each one is raced
//! against the caller's deadline and cancel signal through [`CallContext::run`],
//! so an expired request stops retrying instead of burning the whole OCC budget.

use crate::error::{CancelReason, CartError, CartResult};
use std::future::{pending, Future};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

#[derive(Debug, Clone, Default)]
pub struct CallContext {
  deadline: Option<Instant>,
  cancel_rx: Option<watch::Receiver<bool>>,
}

/// Requests cancellation of every `CallContext` cloned from the one it was created with.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
  pub fn cancel(&self) {
    // send only fails when every receiver is gone, in which case nobody is listening.
    let _ = self.0.send(true);
  }
}

impl CallContext {
  /// A context with no deadline that can never be cancelled.
  pub fn background() -> Self {
    Self::default()
  }

  pub fn with_timeout(timeout: Duration) -> Self {
    Self::with_deadline(Instant::now() + timeout)
  }

  pub fn with_deadline(deadline: Instant) -> Self {
    Self {
      deadline: Some(deadline),
      cancel_rx: None,
    }
  }

  /// Attaches a cancel signal to this context, keeping its deadline.
  pub fn cancellable(self) -> (Self, CancelHandle) {
    let (tx, rx) = watch::channel(false);
    let ctx = Self {
      deadline: self.deadline,
      cancel_rx: Some(rx),
    };
    (ctx, CancelHandle(tx))
  }

  /// Fails with `Cancelled` if the deadline passed or cancellation was requested.
  pub fn check(&self) -> CartResult<()> {
    if let Some(rx) = &self.cancel_rx {
      if *rx.borrow() {
        return Err(CartError::Cancelled(CancelReason::Requested));
      }
    }
    if let Some(deadline) = self.deadline {
      if Instant::now() >= deadline {
        return Err(CartError::Cancelled(CancelReason::DeadlineExceeded));
      }
    }
    Ok(())
  }

  /// Drives `fut` until it completes, the deadline elapses, or cancellation is
  /// requested. On the latter two the in-flight future is dropped.
  pub async fn run<F, T>(&self, fut: F) -> CartResult<T>
  where
    F: Future<Output = CartResult<T>>,
  {
    self.check()?;

    let deadline = self.deadline;
    let expired = async move {
      match deadline {
        Some(at) => sleep_until(at).await,
        None => pending::<()>().await,
      }
    };

    let cancel_rx = self.cancel_rx.clone();
    let cancelled = async move {
      let Some(mut rx) = cancel_rx else {
        return pending::<()>().await;
      };
      loop {
        if *rx.borrow_and_update() {
          return;
        }
        if rx.changed().await.is_err() {
          // Handle dropped without cancelling: this context can no longer be cancelled.
          return pending::<()>().await;
        }
      }
    };

    tokio::select! {
      res = fut => res,
      _ = expired => Err(CartError::Cancelled(CancelReason::DeadlineExceeded)),
      _ = cancelled => Err(CartError::Cancelled(CancelReason::Requested)),
    }
  }
}
