//! The packing strategy capability and checks shared by every strategy.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::binner::Binner;
use crate::engine::Strategy;
use crate::error::{PackError, PackResult};
use crate::space::Space;

/// A packing strategy driving a [`Binner`].
///
/// A packer owns its binner and processes items one at a time; it is not
/// meant to be shared between tasks without external synchronization.
pub trait Packer<B: Binner>: Send {
    /// Which strategy this packer implements.
    fn strategy(&self) -> Strategy;

    /// Assign `item` to a bin and place it there.
    ///
    /// Returns the bin that received the item. On error the item has not
    /// been placed anywhere.
    fn add_item(
        &mut self,
        cancel: &CancellationToken,
        item: &B::Item,
    ) -> impl Future<Output = PackResult<B::Bin, B::Error>> + Send;

    /// Close every bin the packer still holds open, in creation order.
    ///
    /// Later items open fresh bins.
    fn flush(&mut self);

    /// Bins currently accepting items, oldest first.
    fn open_bins(&self) -> Vec<B::Bin>;

    fn binner(&self) -> &B;

    fn into_binner(self) -> B
    where
        Self: Sized;
}

/// Size `item` and decide whether the packer may proceed with it.
///
/// Oversized items are rejected before anything else so no bin is touched.
/// A cancelled token stops the packer before it opens bins or delegates.
pub(crate) fn admit<B: Binner>(
    binner: &B,
    strategy: Strategy,
    cancel: &CancellationToken,
    item: &B::Item,
) -> PackResult<Space, B::Error> {
    let size = binner.item_size(item);
    let bin_size = binner.bin_size();

    if size > bin_size {
        warn!(%strategy, %size, %bin_size, "rejecting item larger than a bin");
        return Err(PackError::ItemTooLarge { size, bin_size });
    }

    if cancelled(strategy, cancel) {
        return Err(PackError::Cancelled);
    }
    Ok(size)
}

pub(crate) fn cancelled(strategy: Strategy, cancel: &CancellationToken) -> bool {
    let cancelled = cancel.is_cancelled();
    if cancelled {
        warn!(%strategy, "packing cancelled");
    }
    cancelled
}

/// Delegate placement of `item` into `bin` to the binner.
///
/// The binner's error is returned unwrapped.
pub(crate) async fn place<B: Binner>(
    binner: &mut B,
    strategy: Strategy,
    cancel: &CancellationToken,
    item: &B::Item,
    bin: &B::Bin,
    size: Space,
) -> PackResult<(), B::Error> {
    match binner.add_item(cancel, item, bin).await {
        Ok(()) => {
            debug!(
                %strategy,
                %size,
                ?bin,
                remaining = %binner.space_available(bin),
                "placed item"
            );
            Ok(())
        }
        Err(e) => {
            warn!(%strategy, %size, ?bin, error = %e, "binner failed to place item");
            Err(PackError::Placement(e))
        }
    }
}
