//! In-memory capacity contract.
//!
//! `MemoryBinner` keeps every bin and its items in a `Vec`. It backs the
//! simulator CLI and is a convenient binner for tests. An optional bin limit
//! models exhaustion of the backing resource, and an optional write latency
//! models slow placement I/O that honours cancellation.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::binner::Binner;
use crate::space::Space;

/// Handle to a bin owned by a [`MemoryBinner`]; the index is the creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BinId(pub usize);

impl fmt::Display for BinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bin-{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryBinnerError {
    #[error("bin limit reached: {0} bins")]
    BinLimit(usize),

    #[error("unknown bin: {0}")]
    UnknownBin(BinId),

    #[error("bin is closed: {0}")]
    BinClosed(BinId),

    #[error("{bin} has {available} free, item needs {size}")]
    Overflow {
        bin: BinId,
        size: Space,
        available: Space,
    },

    #[error("placement cancelled")]
    Cancelled,
}

/// Contents of a single in-memory bin.
#[derive(Debug, Clone)]
pub struct MemoryBin<T> {
    items: Vec<T>,
    used: Space,
    closed: bool,
}

impl<T> MemoryBin<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            used: Space::ZERO,
            closed: false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn used(&self) -> Space {
        self.used
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// In-memory [`Binner`] that stores placed items per bin.
pub struct MemoryBinner<T> {
    bin_size: Space,
    sizer: fn(&T) -> Space,
    bins: Vec<MemoryBin<T>>,
    max_bins: Option<usize>,
    write_latency: Option<Duration>,
}

impl MemoryBinner<Space> {
    /// A binner whose items are their own sizes.
    pub fn new(bin_size: Space) -> Self {
        Self::with_sizer(bin_size, |size| *size)
    }
}

impl<T> MemoryBinner<T> {
    /// A binner measuring items with `sizer`.
    pub fn with_sizer(bin_size: Space, sizer: fn(&T) -> Space) -> Self {
        Self {
            bin_size,
            sizer,
            bins: Vec::new(),
            max_bins: None,
            write_latency: None,
        }
    }

    /// Fail `new_bin` once `max` bins exist.
    pub fn with_max_bins(mut self, max: usize) -> Self {
        self.max_bins = Some(max);
        self
    }

    /// Delay every placement by `latency`, abandoning it if cancelled meanwhile.
    pub fn with_write_latency(mut self, latency: Duration) -> Self {
        self.write_latency = Some(latency);
        self
    }

    pub fn bins(&self) -> &[MemoryBin<T>] {
        &self.bins
    }

    pub fn bin(&self, id: BinId) -> Option<&MemoryBin<T>> {
        self.bins.get(id.0)
    }

    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    pub fn closed_count(&self) -> usize {
        self.bins.iter().filter(|bin| bin.closed).count()
    }

    pub fn item_count(&self) -> usize {
        self.bins.iter().map(|bin| bin.items.len()).sum()
    }

    async fn wait_for_write(&self, cancel: &CancellationToken) -> Result<(), MemoryBinnerError> {
        match self.write_latency {
            Some(latency) => tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(MemoryBinnerError::Cancelled),
                _ = tokio::time::sleep(latency) => Ok(()),
            },
            None if cancel.is_cancelled() => Err(MemoryBinnerError::Cancelled),
            None => Ok(()),
        }
    }
}

impl<T> Binner for MemoryBinner<T>
where
    T: Clone + Send + Sync,
{
    type Item = T;
    type Bin = BinId;
    type Error = MemoryBinnerError;

    fn bin_size(&self) -> Space {
        self.bin_size
    }

    fn item_size(&self, item: &T) -> Space {
        (self.sizer)(item)
    }

    async fn new_bin(&mut self) -> Result<BinId, MemoryBinnerError> {
        if let Some(max) = self.max_bins {
            if self.bins.len() >= max {
                return Err(MemoryBinnerError::BinLimit(max));
            }
        }
        self.bins.push(MemoryBin::new());
        Ok(BinId(self.bins.len() - 1))
    }

    fn space_available(&self, bin: &BinId) -> Space {
        self.bin(*bin)
            .map(|b| self.bin_size.saturating_sub(b.used))
            .unwrap_or(Space::ZERO)
    }

    async fn add_item(
        &mut self,
        cancel: &CancellationToken,
        item: &T,
        bin: &BinId,
    ) -> Result<(), MemoryBinnerError> {
        self.wait_for_write(cancel).await?;

        let size = (self.sizer)(item);
        let bin_size = self.bin_size;
        let slot = self
            .bins
            .get_mut(bin.0)
            .ok_or(MemoryBinnerError::UnknownBin(*bin))?;
        if slot.closed {
            return Err(MemoryBinnerError::BinClosed(*bin));
        }
        let available = bin_size.saturating_sub(slot.used);
        if !available.fits(size) {
            return Err(MemoryBinnerError::Overflow {
                bin: *bin,
                size,
                available,
            });
        }

        slot.items.push(item.clone());
        slot.used += size;
        debug!(%bin, %size, used = %slot.used, "stored item");
        Ok(())
    }

    fn close_bin(&mut self, bin: &BinId) {
        if let Some(slot) = self.bins.get_mut(bin.0) {
            slot.closed = true;
        }
    }
}
