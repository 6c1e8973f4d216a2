//! The capacity contract implemented by callers.
//!
//! A `Binner` owns every bin: it knows what a bin is, how big items are, and
//! how to actually put an item into a bin (write it to storage, append it to
//! a batch, ...). Packers only decide *which* bin an item goes to.

use std::fmt::Debug;
use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::space::Space;

/// Bin lifecycle and sizing operations consumed by a [`Packer`](crate::Packer).
///
/// A bin is open from `new_bin` until `close_bin`. Packers call `close_bin`
/// at most once per bin and never place into a bin after closing it.
pub trait Binner: Send {
    /// Opaque unit of work being packed.
    type Item: Sync;
    /// Opaque handle to a bin.
    type Bin: Clone + Debug + Send + Sync;
    /// Contract-specific failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Capacity of every newly created bin. Constant for the binner's lifetime.
    fn bin_size(&self) -> Space;

    /// Size of `item`. Must be deterministic and side-effect free.
    fn item_size(&self, item: &Self::Item) -> Space;

    /// Allocate a new, open, empty bin.
    fn new_bin(&mut self) -> impl Future<Output = Result<Self::Bin, Self::Error>> + Send;

    /// Remaining capacity of an open bin, reflecting every successful `add_item`.
    fn space_available(&self, bin: &Self::Bin) -> Space;

    /// Place `item` into `bin`.
    ///
    /// Implementations performing blocking work must observe `cancel`. On
    /// error the item is considered not placed and `space_available` for the
    /// bin must be unchanged.
    fn add_item(
        &mut self,
        cancel: &CancellationToken,
        item: &Self::Item,
        bin: &Self::Bin,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Mark `bin` closed. No further items are placed into it.
    fn close_bin(&mut self, bin: &Self::Bin);
}
