//! binpack — bin-packing allocation engine.
//!
//! Assigns a stream of sized items to bins, opening bins as needed, under a
//! pluggable packing strategy. The engine is domain-agnostic: callers
//! describe what a bin is through the [`Binner`] capacity contract, and the
//! engine only ever sees abstract [`Space`] sizes.
//!
//! # Components
//!
//! - **`binner`** — the capacity contract callers implement
//! - **`naive`** — single active bin, closed on overflow, no backfill
//! - **`first_fit`** — earliest open bin with room, bins kept open until flush
//! - **`engine`** — strategy selection and `new_packer`
//! - **`memory`** — in-memory binner for simulation and tests
//! - **`summary`** — utilization report over a memory binner
//! - **`config`** — `binpack.toml` parsing
//!
//! # Architecture
//!
//! ```text
//! caller ──► new_packer(strategy, binner) ──► (AnyPacker, first bin)
//!   │
//!   └─► packer.add_item(cancel, item)
//!         ├── binner.item_size / bin_size    (reject oversized)
//!         ├── binner.space_available         (pick a bin)
//!         ├── binner.close_bin / new_bin     (rotate or grow)
//!         └── binner.add_item(cancel, ..)    (caller's side effect)
//! ```
//!
//! A packer processes items sequentially and suspends only inside the
//! binner's `new_bin` and `add_item`. Cancellation is observed through a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) passed to
//! every placement.

pub mod binner;
pub mod config;
pub mod engine;
pub mod error;
pub mod first_fit;
pub mod memory;
pub mod naive;
pub mod packer;
pub mod space;
pub mod summary;

pub use binner::Binner;
pub use config::PackConfig;
pub use engine::{AnyPacker, Strategy, new_packer};
pub use error::{PackError, PackErrorKind, PackResult};
pub use first_fit::FirstFitPacker;
pub use memory::{BinId, MemoryBin, MemoryBinner, MemoryBinnerError};
pub use naive::NaivePacker;
pub use packer::Packer;
pub use space::Space;
pub use summary::{BinUsage, PackingSummary};
