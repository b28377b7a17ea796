//! Guard dispatch.
//!
//! A guard is a read-only business check attached to a transition. It
//! inspects the entity payload carried with the event and either
//! authorizes the transition (`Ok`) or vetoes it with a business error
//! (`Err`). Guards must not mutate the entity or external state; any
//! mutation belongs to the caller, after the transition has been accepted.

use crate::error::GuardError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// A guard callback over the entity payload `C`.
///
/// Reference-counted so one guard can serve several transitions (a cancel
/// rule typically applies from every non-terminal state).
pub type Guard<C> = Arc<dyn Fn(&C) -> Result<(), GuardError> + Send + Sync>;

/// Wraps a plain closure into a [`Guard`].
pub fn guard<C, F>(f: F) -> Guard<C>
where
    F: Fn(&C) -> Result<(), GuardError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Rejection produced when a guard panics instead of returning.
#[derive(Debug, thiserror::Error)]
#[error("guard panicked: {reason}")]
pub struct GuardPanicked {
    pub reason: String,
}

/// Runs a guard against the payload.
///
/// A panicking guard is treated as a rejection: the unwind is caught and
/// surfaced as [`GuardPanicked`], so the machine's state is never left
/// mutated by a misbehaving check.
pub(crate) fn dispatch<C>(guard: &Guard<C>, payload: &C) -> Result<(), GuardError> {
    match catch_unwind(AssertUnwindSafe(|| guard(payload))) {
        Ok(result) => result,
        Err(panic) => {
            let reason = panic_message(panic.as_ref());
            tracing::warn!(reason = %reason, "guard panicked");
            Err(GuardPanicked { reason }.into())
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Order {
        paid: bool,
    }

    #[test]
    fn test_dispatch_authorizes() {
        let g: Guard<Order> = guard(|_| Ok(()));
        assert!(dispatch(&g, &Order { paid: true }).is_ok());
    }

    #[test]
    fn test_dispatch_vetoes() {
        let g: Guard<Order> = guard(|order: &Order| {
            if order.paid {
                Ok(())
            } else {
                Err("order is not paid".into())
            }
        });

        let err = dispatch(&g, &Order { paid: false }).unwrap_err();
        assert_eq!(err.to_string(), "order is not paid");
        assert!(dispatch(&g, &Order { paid: true }).is_ok());
    }

    #[test]
    fn test_panicking_guard_becomes_rejection() {
        let g: Guard<Order> = guard(|_| panic!("boom"));

        let err = dispatch(&g, &Order { paid: true }).unwrap_err();
        let panicked = err.downcast_ref::<GuardPanicked>().unwrap();
        assert_eq!(panicked.reason, "boom");
    }
}
