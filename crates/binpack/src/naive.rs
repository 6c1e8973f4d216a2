//! Naive packing — one active bin, no backfill.
//!
//! Items go into the active bin until one does not fit. The active bin is
//! then closed and replaced by a fresh one, so bins fill and close strictly
//! in creation order at O(1) cost per item.

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::binner::Binner;
use crate::engine::Strategy;
use crate::error::{PackError, PackResult};
use crate::packer::{Packer, admit, cancelled, place};

/// Packer that fills one active bin at a time and never backfills.
pub struct NaivePacker<B: Binner> {
    binner: B,
    /// The active bin, or the last one if it has been closed.
    bin: B::Bin,
    /// Set once `bin` is closed and no replacement could be opened yet.
    closed: bool,
}

impl<B: Binner> NaivePacker<B> {
    /// Bind a packer to `binner`, opening its first bin.
    ///
    /// Calls `new_bin` exactly once. Returns the packer and that bin.
    pub async fn new(mut binner: B) -> PackResult<(Self, B::Bin), B::Error> {
        let bin = binner.new_bin().await.map_err(PackError::NewBin)?;
        info!(strategy = %Strategy::Naive, ?bin, bin_size = %binner.bin_size(), "opened first bin");

        let packer = Self {
            binner,
            bin: bin.clone(),
            closed: false,
        };
        Ok((packer, bin))
    }

    /// The bin currently receiving items, if any is open.
    pub fn active_bin(&self) -> Option<&B::Bin> {
        (!self.closed).then_some(&self.bin)
    }

    /// Close the active bin (unless already closed) and open its replacement.
    ///
    /// If allocation fails the packer is left holding the closed bin; the
    /// next `add_item` retries the allocation without closing anything.
    async fn replace_bin(&mut self) -> PackResult<(), B::Error> {
        self.close_active();

        let bin = self.binner.new_bin().await.map_err(|e| {
            warn!(strategy = %Strategy::Naive, error = %e, "failed to create new bin");
            PackError::NewBin(e)
        })?;
        info!(strategy = %Strategy::Naive, ?bin, "opened bin");

        self.bin = bin;
        self.closed = false;
        Ok(())
    }

    fn close_active(&mut self) {
        if self.closed {
            return;
        }
        self.binner.close_bin(&self.bin);
        self.closed = true;
        info!(strategy = %Strategy::Naive, bin = ?self.bin, "closed bin");
    }
}

impl<B: Binner> Packer<B> for NaivePacker<B> {
    fn strategy(&self) -> Strategy {
        Strategy::Naive
    }

    async fn add_item(
        &mut self,
        cancel: &CancellationToken,
        item: &B::Item,
    ) -> PackResult<B::Bin, B::Error> {
        let size = admit(&self.binner, Strategy::Naive, cancel, item)?;

        if self.closed || !self.binner.space_available(&self.bin).fits(size) {
            self.replace_bin().await?;
            if cancelled(Strategy::Naive, cancel) {
                return Err(PackError::Cancelled);
            }
        }

        place(&mut self.binner, Strategy::Naive, cancel, item, &self.bin, size).await?;
        Ok(self.bin.clone())
    }

    fn flush(&mut self) {
        self.close_active();
    }

    fn open_bins(&self) -> Vec<B::Bin> {
        self.active_bin().cloned().into_iter().collect()
    }

    fn binner(&self) -> &B {
        &self.binner
    }

    fn into_binner(self) -> B {
        self.binner
    }
}
