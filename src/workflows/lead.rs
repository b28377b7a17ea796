//! Lead lifecycle workflow.
//!
//! ```text
//! OPENED ──CONTACT──► CONTACTED ──CONVERT──► CONVERTED
//!    │                    │                  ▲       │
//!    │                NOT_CONVERT        CONVERT NOT_CONVERT
//!    │                    ▼                  │       ▼
//!    │                    └────────────► UNCONVERTED
//!    │
//!    └──CANCEL──► CANCELED   (CANCEL from every non-terminal state)
//! ```
//!
//! A lead must be contacted before it can convert: `OPENED -> CONVERTED`
//! and `OPENED -> UNCONVERTED` are deliberately absent. `CONVERTED` and
//! `UNCONVERTED` toggle freely into each other. `CANCELED` is terminal.

use crate::error::Error;
use crate::guard::Guard;
use crate::table::TransitionTable;
use serde::{Deserialize, Serialize};

/// Lifecycle states of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadState {
    Opened,
    Contacted,
    Converted,
    Unconverted,
    Canceled,
}

/// Events that drive the lead lifecycle.
///
/// `Open` is part of the vocabulary but triggers no registered
/// transition: a lead is born `OPENED`, so sending `OPEN` from any state
/// is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadEvent {
    Open,
    Contact,
    Convert,
    NotConvert,
    Cancel,
}

/// Builds the lead transition table.
///
/// `on_cancel` is the guard slot shared by every `CANCEL` transition
/// (e.g. "may not cancel a lead with an active proposal"); `C` is the
/// caller's lead representation, passed through to the guard on each
/// send.
pub fn table<C>(
    on_cancel: Option<Guard<C>>,
) -> Result<TransitionTable<LeadState, LeadEvent, C>, Error<LeadState, LeadEvent>> {
    use LeadEvent::*;
    use LeadState::*;

    let mut b = TransitionTable::builder("lead", Opened);
    b.register(Opened, Contact, Contacted)?;
    b.register(Contacted, Convert, Converted)?;
    b.register(Contacted, NotConvert, Unconverted)?;
    b.register(Converted, NotConvert, Unconverted)?;
    b.register(Unconverted, Convert, Converted)?;

    for from in [Opened, Contacted, Converted, Unconverted] {
        match &on_cancel {
            Some(g) => b.register_guarded(from, Cancel, Canceled, g.clone())?,
            None => b.register(from, Cancel, Canceled)?,
        };
    }

    Ok(b.build())
}
