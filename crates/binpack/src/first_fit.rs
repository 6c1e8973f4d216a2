//! First-Fit packing — every open bin is a candidate.
//!
//! Each item goes into the earliest-created open bin with enough remaining
//! space. A new bin is opened only when none fits. Bins stay open until the
//! packer is flushed, trading an O(open bins) scan per item for denser
//! packing than [`NaivePacker`](crate::NaivePacker).

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::binner::Binner;
use crate::engine::Strategy;
use crate::error::{PackError, PackResult};
use crate::packer::{Packer, admit, cancelled, place};
use crate::space::Space;

/// An open bin and its last-known remaining space.
#[derive(Debug, Clone)]
struct OpenBin<T> {
    bin: T,
    remaining: Space,
}

/// Packer that places each item into the earliest open bin with room.
pub struct FirstFitPacker<B: Binner> {
    binner: B,
    /// Open bins in creation order.
    open: Vec<OpenBin<B::Bin>>,
}

impl<B: Binner> FirstFitPacker<B> {
    /// Bind a packer to `binner`, opening its first bin.
    ///
    /// Calls `new_bin` exactly once. Returns the packer and that bin.
    pub async fn new(mut binner: B) -> PackResult<(Self, B::Bin), B::Error> {
        let bin = binner.new_bin().await.map_err(PackError::NewBin)?;
        info!(strategy = %Strategy::FirstFit, ?bin, bin_size = %binner.bin_size(), "opened first bin");

        let mut packer = Self {
            binner,
            open: Vec::new(),
        };
        packer.track(bin.clone());
        Ok((packer, bin))
    }

    /// Cached remaining space of every open bin, oldest first.
    pub fn remaining(&self) -> Vec<(B::Bin, Space)> {
        self.open
            .iter()
            .map(|slot| (slot.bin.clone(), slot.remaining))
            .collect()
    }

    fn track(&mut self, bin: B::Bin) -> usize {
        let remaining = self.binner.space_available(&bin);
        self.open.push(OpenBin { bin, remaining });
        self.open.len() - 1
    }

    /// Index of the first open bin that can take `size`, opening one if needed.
    async fn select(&mut self, size: Space) -> PackResult<usize, B::Error> {
        if let Some(index) = self.open.iter().position(|slot| slot.remaining.fits(size)) {
            return Ok(index);
        }

        let bin = self.binner.new_bin().await.map_err(|e| {
            warn!(strategy = %Strategy::FirstFit, error = %e, "failed to create new bin");
            PackError::NewBin(e)
        })?;
        info!(strategy = %Strategy::FirstFit, ?bin, open = self.open.len() + 1, "opened bin");
        Ok(self.track(bin))
    }
}

impl<B: Binner> Packer<B> for FirstFitPacker<B> {
    fn strategy(&self) -> Strategy {
        Strategy::FirstFit
    }

    async fn add_item(
        &mut self,
        cancel: &CancellationToken,
        item: &B::Item,
    ) -> PackResult<B::Bin, B::Error> {
        let size = admit(&self.binner, Strategy::FirstFit, cancel, item)?;

        let opened_before = self.open.len();
        let index = self.select(size).await?;
        if index >= opened_before && cancelled(Strategy::FirstFit, cancel) {
            return Err(PackError::Cancelled);
        }

        let slot = &mut self.open[index];
        place(&mut self.binner, Strategy::FirstFit, cancel, item, &slot.bin, size).await?;
        slot.remaining = slot.remaining.saturating_sub(size);
        debug!(strategy = %Strategy::FirstFit, index, remaining = %slot.remaining, "updated cached space");

        Ok(slot.bin.clone())
    }

    fn flush(&mut self) {
        let count = self.open.len();
        for slot in self.open.drain(..) {
            self.binner.close_bin(&slot.bin);
        }
        if count > 0 {
            info!(strategy = %Strategy::FirstFit, closed = count, "flushed open bins");
        }
    }

    fn open_bins(&self) -> Vec<B::Bin> {
        self.open.iter().map(|slot| slot.bin.clone()).collect()
    }

    fn binner(&self) -> &B {
        &self.binner
    }

    fn into_binner(self) -> B {
        self.binner
    }
}
