//! Utilization report for a finished packing run.

use serde::{Deserialize, Serialize};

use crate::binner::Binner;
use crate::memory::{BinId, MemoryBinner};
use crate::space::Space;

/// Usage of a single bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinUsage {
    pub bin: BinId,
    pub items: usize,
    pub used: Space,
    pub free: Space,
    pub closed: bool,
}

/// Aggregate packing statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingSummary {
    pub bin_size: Space,
    pub bins_opened: usize,
    pub bins_closed: usize,
    pub items_placed: usize,
    pub used: Space,
    pub capacity: Space,
    /// `used / capacity`, 0.0 when no bins exist.
    pub utilization: f64,
    pub bins: Vec<BinUsage>,
}

impl PackingSummary {
    pub fn from_binner<T>(binner: &MemoryBinner<T>) -> Self
    where
        T: Clone + Send + Sync,
    {
        let bin_size = binner.bin_size();
        let bins: Vec<BinUsage> = binner
            .bins()
            .iter()
            .enumerate()
            .map(|(index, bin)| BinUsage {
                bin: BinId(index),
                items: bin.items().len(),
                used: bin.used(),
                free: bin_size.saturating_sub(bin.used()),
                closed: bin.is_closed(),
            })
            .collect();

        let used: Space = bins.iter().map(|b| b.used).sum();
        let capacity = Space::new(bin_size.get().saturating_mul(bins.len() as u64));
        let utilization = if capacity.is_zero() {
            0.0
        } else {
            used.get() as f64 / capacity.get() as f64
        };

        Self {
            bin_size,
            bins_opened: bins.len(),
            bins_closed: bins.iter().filter(|b| b.closed).count(),
            items_placed: bins.iter().map(|b| b.items).sum(),
            used,
            capacity,
            utilization,
            bins,
        }
    }

    /// Render as human-readable text, one line per bin.
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{} bins (size {}), {} items, {}/{} used ({:.1}%)\n",
            self.bins_opened,
            self.bin_size,
            self.items_placed,
            self.used,
            self.capacity,
            self.utilization * 100.0,
        );
        for usage in &self.bins {
            out.push_str(&format!(
                "  {}: {} items, {} used, {} free{}\n",
                usage.bin,
                usage.items,
                usage.used,
                usage.free,
                if usage.closed { " (closed)" } else { "" },
            ));
        }
        out
    }
}
