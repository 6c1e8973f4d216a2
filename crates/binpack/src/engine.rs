//! Strategy selection and packer construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::binner::Binner;
use crate::error::PackResult;
use crate::first_fit::FirstFitPacker;
use crate::naive::NaivePacker;
use crate::packer::Packer;

/// Packing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Single active bin, closed as soon as an item does not fit.
    #[default]
    Naive,
    /// Earliest open bin with room; bins stay open until flushed.
    FirstFit,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Naive, Strategy::FirstFit];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Naive => "naive",
            Strategy::FirstFit => "first-fit",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "naive" => Ok(Strategy::Naive),
            "first-fit" | "firstfit" | "first_fit" => Ok(Strategy::FirstFit),
            other => Err(format!(
                "unknown packing strategy '{other}' (expected one of: naive, first-fit)"
            )),
        }
    }
}

/// A packer of any [`Strategy`], chosen at runtime.
pub enum AnyPacker<B: Binner> {
    Naive(NaivePacker<B>),
    FirstFit(FirstFitPacker<B>),
}

impl<B: Binner> Packer<B> for AnyPacker<B> {
    fn strategy(&self) -> Strategy {
        match self {
            AnyPacker::Naive(_) => Strategy::Naive,
            AnyPacker::FirstFit(_) => Strategy::FirstFit,
        }
    }

    async fn add_item(
        &mut self,
        cancel: &CancellationToken,
        item: &B::Item,
    ) -> PackResult<B::Bin, B::Error> {
        match self {
            AnyPacker::Naive(packer) => packer.add_item(cancel, item).await,
            AnyPacker::FirstFit(packer) => packer.add_item(cancel, item).await,
        }
    }

    fn flush(&mut self) {
        match self {
            AnyPacker::Naive(packer) => packer.flush(),
            AnyPacker::FirstFit(packer) => packer.flush(),
        }
    }

    fn open_bins(&self) -> Vec<B::Bin> {
        match self {
            AnyPacker::Naive(packer) => packer.open_bins(),
            AnyPacker::FirstFit(packer) => packer.open_bins(),
        }
    }

    fn binner(&self) -> &B {
        match self {
            AnyPacker::Naive(packer) => packer.binner(),
            AnyPacker::FirstFit(packer) => packer.binner(),
        }
    }

    fn into_binner(self) -> B {
        match self {
            AnyPacker::Naive(packer) => packer.into_binner(),
            AnyPacker::FirstFit(packer) => packer.into_binner(),
        }
    }
}

/// Build a packer of the requested strategy over `binner`.
///
/// Opens exactly one bin and returns it alongside the packer. A failure to
/// open it is reported as [`PackError::Init`](crate::PackError::Init) and no
/// packer is returned.
pub async fn new_packer<B: Binner>(
    strategy: Strategy,
    binner: B,
) -> PackResult<(AnyPacker<B>, B::Bin), B::Error> {
    let built = match strategy {
        Strategy::Naive => NaivePacker::new(binner)
            .await
            .map(|(packer, bin)| (AnyPacker::Naive(packer), bin)),
        Strategy::FirstFit => FirstFitPacker::new(binner)
            .await
            .map(|(packer, bin)| (AnyPacker::FirstFit(packer), bin)),
    };

    match built {
        Ok((packer, bin)) => {
            info!(%strategy, ?bin, "packer initialized");
            Ok((packer, bin))
        }
        Err(e) => {
            warn!(%strategy, error = %e, "failed to initialize packer");
            Err(e.into_init())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PackError;
    use crate::memory::{BinId, MemoryBinner, MemoryBinnerError};
    use crate::space::Space;

    #[test]
    fn strategy_parses_and_displays() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
        }
        assert_eq!("First_Fit".parse::<Strategy>(), Ok(Strategy::FirstFit));
        assert!("best-fit".parse::<Strategy>().is_err());
    }

    #[test]
    fn strategy_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Strategy::FirstFit).unwrap();
        assert_eq!(json, "\"first-fit\"");
    }

    #[tokio::test]
    async fn builds_each_strategy() {
        for strategy in Strategy::ALL {
            let (packer, bin) = new_packer(strategy, MemoryBinner::new(Space::new(10)))
                .await
                .unwrap();
            assert_eq!(packer.strategy(), strategy);
            assert_eq!(bin, BinId(0));
            assert_eq!(packer.open_bins(), vec![BinId(0)]);
            assert_eq!(packer.binner().bin_count(), 1);
        }
    }

    #[tokio::test]
    async fn init_failure_is_wrapped() {
        for strategy in Strategy::ALL {
            let binner = MemoryBinner::new(Space::new(10)).with_max_bins(0);
            let err = match new_packer(strategy, binner).await {
                Ok(_) => panic!("expected init failure"),
                Err(e) => e,
            };
            assert_eq!(err.to_string(), "failed to initialize packer");
            assert!(matches!(err, PackError::Init(MemoryBinnerError::BinLimit(0))));
        }
    }

    #[tokio::test]
    async fn dispatches_to_chosen_strategy() {
        let cancel = CancellationToken::new();
        let mut bins = Vec::new();
        for strategy in Strategy::ALL {
            let (mut packer, _) = new_packer(strategy, MemoryBinner::new(Space::new(10)))
                .await
                .unwrap();
            let mut assigned = Vec::new();
            for size in [7, 4, 3] {
                assigned.push(packer.add_item(&cancel, &Space::new(size)).await.unwrap());
            }
            bins.push(assigned);
        }
        assert_eq!(bins[0], vec![BinId(0), BinId(1), BinId(1)]);
        assert_eq!(bins[1], vec![BinId(0), BinId(1), BinId(0)]);
    }
}
