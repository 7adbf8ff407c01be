//! Per-operation execution context.

use agora_store::KvStore;
use agora_types::BlockHeight;

/// The state and block height an operation runs against.
///
/// Every message handler and the end-block driver receive a `Context`
/// explicitly; nothing in the governance core reads ambient global state.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub store: &'a dyn KvStore,
    pub height: BlockHeight,
}

impl<'a> Context<'a> {
    pub fn new(store: &'a dyn KvStore, height: BlockHeight) -> Self {
        Self { store, height }
    }

    /// The same height over a different store (typically a cache layered on this one).
    pub fn with_store<'b>(&self, store: &'b dyn KvStore) -> Context<'b> {
        Context {
            store,
            height: self.height,
        }
    }
}
