//! All-or-nothing execution of a public call.
//!
//! A call mutates two things: the shop's own state and the collaborator
//! world. Both are checkpointed before the call body runs; if the body
//! fails, both are reverted before the error is returned. No failed call
//! leaves a trace in stock, prices, journal, or external balances.
//!
//! Checkpoints are marks, not copies: implementors record what a call
//! changes and undo only that, so a call costs the same on a fresh shop and
//! on one with a long history.

use consign_types::Result;

/// State whose changes can be rolled back to a checkpoint.
///
/// Checkpoints nest: each one is closed by exactly one `commit` or
/// `revert_to`, innermost first.
pub trait Revertible {
    type Checkpoint;

    /// Start recording changes.
    fn checkpoint(&mut self) -> Self::Checkpoint;

    /// Keep the changes made since `checkpoint`.
    fn commit(&mut self, checkpoint: Self::Checkpoint);

    /// Undo the changes made since `checkpoint`.
    fn revert_to(&mut self, checkpoint: Self::Checkpoint);
}

/// Run `op` against `state` and `host`; on error, undo both.
pub fn atomically<S, H, T, F>(state: &mut S, host: &mut H, op: F) -> Result<T>
where
    S: Revertible,
    H: Revertible,
    F: FnOnce(&mut S, &mut H) -> Result<T>,
{
    let state_checkpoint = state.checkpoint();
    let host_checkpoint = host.checkpoint();
    match op(state, host) {
        Ok(value) => {
            state.commit(state_checkpoint);
            host.commit(host_checkpoint);
            Ok(value)
        }
        Err(err) => {
            state.revert_to(state_checkpoint);
            host.revert_to(host_checkpoint);
            Err(err)
        }
    }
}
