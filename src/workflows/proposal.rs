//! Proposal lifecycle workflow.
//!
//! Mirrors the lead shape: a linear opening phase, a pair of mutually
//! convertible outcome states (`ACCEPTED` / `DECLINED`), and a terminal
//! `CANCELED` reachable from every non-terminal state through one shared
//! guard slot.

use crate::error::Error;
use crate::guard::Guard;
use crate::table::TransitionTable;
use serde::{Deserialize, Serialize};

/// Lifecycle states of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalState {
    Opened,
    Sent,
    Accepted,
    Declined,
    Canceled,
}

/// Events that drive the proposal lifecycle.
///
/// As with leads, `Open` names the birth of the entity and triggers no
/// registered transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalEvent {
    Open,
    Send,
    Accept,
    Decline,
    Cancel,
}

/// Builds the proposal transition table.
///
/// `on_cancel` is shared by every `CANCEL` transition; `C` is the
/// caller's proposal representation.
pub fn table<C>(
    on_cancel: Option<Guard<C>>,
) -> Result<TransitionTable<ProposalState, ProposalEvent, C>, Error<ProposalState, ProposalEvent>>
{
    use ProposalEvent::*;
    use ProposalState::*;

    let mut b = TransitionTable::builder("proposal", Opened);
    b.register(Opened, Send, Sent)?;
    b.register(Sent, Accept, Accepted)?;
    b.register(Sent, Decline, Declined)?;
    b.register(Declined, Accept, Accepted)?;
    b.register(Accepted, Decline, Declined)?;

    for from in [Opened, Sent, Accepted, Declined] {
        match &on_cancel {
            Some(g) => b.register_guarded(from, Cancel, Canceled, g.clone())?,
            None => b.register(from, Cancel, Canceled)?,
        };
    }

    Ok(b.build())
}
