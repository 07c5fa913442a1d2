//! The "advance" capability consumed by the poll engine

use async_trait::async_trait;
use std::sync::Arc;

/// Something that can wait until a chain has produced more blocks
///
/// The poll engine calls this between attempts. Implementations block until
/// at least `blocks` new blocks exist; they are shared read-only between
/// concurrently running pollers.
#[async_trait]
pub trait BlockWaiter: Send + Sync {
    type Error: Send;

    async fn wait_blocks(&self, blocks: u64) -> Result<(), Self::Error>;
}

#[async_trait]
impl<T: BlockWaiter + ?Sized> BlockWaiter for Arc<T> {
    type Error = T::Error;

    async fn wait_blocks(&self, blocks: u64) -> Result<(), Self::Error> {
        (**self).wait_blocks(blocks).await
    }
}

