//! `binpack-sim simulate` — run item sizes through a packing strategy.
//!
//! Items are packed into an in-memory binner one by one. Per-item failures
//! (oversized items, bin exhaustion) are reported and the run continues;
//! cancellation by the deadline stops it. The packer is flushed at the end
//! so every bin is reported closed.

use std::path::Path;
use std::time::Duration;

use anyhow::{Result, anyhow};
use binpack::{
    BinId, MemoryBinnerError, PackConfig, PackError, Packer, PackingSummary, Space, Strategy,
    new_packer,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Command-line inputs; any `Some` overrides the config file.
#[derive(Debug, Default)]
pub struct SimulateArgs {
    pub config: Option<String>,
    pub strategy: Option<String>,
    pub bin_size: Option<u64>,
    pub max_bins: Option<usize>,
    pub write_latency_ms: Option<u64>,
    pub deadline_ms: Option<u64>,
    pub sizes: Vec<u64>,
}

#[derive(Debug, Serialize)]
pub struct Placement {
    pub index: usize,
    pub size: Space,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<BinId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub strategy: Strategy,
    pub cancelled: bool,
    pub placements: Vec<Placement>,
    pub summary: PackingSummary,
}

impl SimulationReport {
    pub fn to_text(&self) -> String {
        let mut out = format!("strategy: {}\n", self.strategy);
        for p in &self.placements {
            match (&p.bin, &p.error) {
                (Some(bin), _) => out.push_str(&format!("item {} size {} -> {}\n", p.index, p.size, bin)),
                (None, Some(e)) => out.push_str(&format!("item {} size {} failed: {}\n", p.index, p.size, e)),
                (None, None) => out.push_str(&format!("item {} size {} skipped\n", p.index, p.size)),
            }
        }
        if self.cancelled {
            out.push_str("run cancelled\n");
        }
        out.push_str(&self.summary.to_text());
        out
    }
}

/// Run the `simulate` command.
pub async fn simulate(args: &SimulateArgs, format: &str) -> Result<()> {
    let config = resolve_config(args)?;
    let deadline = args.deadline_ms.map(Duration::from_millis);
    let report = run(&config, deadline).await?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", report.to_text()),
    }
    Ok(())
}

/// Merge the config file (if any) with command-line overrides.
pub fn resolve_config(args: &SimulateArgs) -> Result<PackConfig> {
    let mut config = match &args.config {
        Some(path) => PackConfig::from_file(Path::new(path))?,
        None => PackConfig::scaffold(Strategy::default(), 10),
    };
    if args.config.is_none() {
        config.items.sizes.clear();
    }

    if let Some(strategy) = &args.strategy {
        config.packer.strategy = strategy.parse().map_err(|e: String| anyhow!(e))?;
    }
    if let Some(size) = args.bin_size {
        config.bins.size = size;
    }
    if args.max_bins.is_some() {
        config.bins.max_bins = args.max_bins;
    }
    if args.write_latency_ms.is_some() {
        config.bins.write_latency_ms = args.write_latency_ms;
    }
    if !args.sizes.is_empty() {
        config.items.sizes = args.sizes.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Pack every configured item, cancelling the run once `deadline` elapses.
pub async fn run(config: &PackConfig, deadline: Option<Duration>) -> Result<SimulationReport> {
    let strategy = config.packer.strategy;
    let (mut packer, _) = new_packer(strategy, config.memory_binner()).await?;

    let cancel = CancellationToken::new();
    let timer = deadline.map(|d| {
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(d).await;
            token.cancel();
        })
    });

    let mut placements = Vec::new();
    let mut cancelled = false;
    for (index, size) in config.item_sizes().into_iter().enumerate() {
        if cancelled {
            placements.push(Placement { index, size, bin: None, error: None });
            continue;
        }
        match packer.add_item(&cancel, &size).await {
            Ok(bin) => placements.push(Placement { index, size, bin: Some(bin), error: None }),
            Err(e) => {
                cancelled = is_cancellation(&e);
                if !cancelled {
                    warn!(index, %size, error = %e, "item not placed");
                }
                placements.push(Placement {
                    index,
                    size,
                    bin: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    if let Some(timer) = timer {
        timer.abort();
    }
    packer.flush();

    let summary = PackingSummary::from_binner(packer.binner());
    info!(
        %strategy,
        bins = summary.bins_opened,
        items = summary.items_placed,
        utilization = summary.utilization,
        "simulation finished"
    );

    Ok(SimulationReport {
        strategy,
        cancelled,
        placements,
        summary,
    })
}

fn is_cancellation(err: &PackError<MemoryBinnerError>) -> bool {
    err.is_cancelled() || matches!(err.binner_error(), Some(MemoryBinnerError::Cancelled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn args(strategy: &str, sizes: &[u64]) -> SimulateArgs {
        SimulateArgs {
            strategy: Some(strategy.to_string()),
            bin_size: Some(10),
            sizes: sizes.to_vec(),
            ..SimulateArgs::default()
        }
    }

    fn bins(report: &SimulationReport) -> Vec<Option<usize>> {
        report.placements.iter().map(|p| p.bin.map(|b| b.0)).collect()
    }

    #[tokio::test]
    async fn test_first_fit_backfills() {
        let config = resolve_config(&args("first-fit", &[7, 4, 3])).unwrap();
        let report = run(&config, None).await.unwrap();

        assert_eq!(bins(&report), vec![Some(0), Some(1), Some(0)]);
        assert_eq!(report.summary.bins_opened, 2);
        assert_eq!(report.summary.bins_closed, 2);
        assert!(!report.cancelled);
    }

    #[tokio::test]
    async fn test_naive_rotates() {
        let config = resolve_config(&args("naive", &[7, 4, 3])).unwrap();
        let report = run(&config, None).await.unwrap();
        assert_eq!(bins(&report), vec![Some(0), Some(1), Some(1)]);
    }

    #[tokio::test]
    async fn test_oversized_item_reported_and_run_continues() {
        let config = resolve_config(&args("naive", &[3, 11, 4])).unwrap();
        let report = run(&config, None).await.unwrap();

        assert_eq!(bins(&report), vec![Some(0), None, Some(0)]);
        let error = report.placements[1].error.as_deref().unwrap();
        assert!(error.contains("item too large"));
        assert!(report.to_text().contains("item 1 size 11 failed"));
    }

    #[tokio::test]
    async fn test_bin_limit_reported() {
        let mut a = args("naive", &[8, 8]);
        a.max_bins = Some(1);
        let config = resolve_config(&a).unwrap();
        let report = run(&config, None).await.unwrap();

        assert_eq!(bins(&report), vec![Some(0), None]);
        assert_eq!(report.placements[1].error.as_deref(), Some("failed to create new bin"));
    }

    #[tokio::test]
    async fn test_deadline_cancels_remaining_items() {
        let mut a = args("first-fit", &[1, 1, 1]);
        a.write_latency_ms = Some(60_000);
        let config = resolve_config(&a).unwrap();
        let report = run(&config, Some(Duration::from_millis(20))).await.unwrap();

        assert!(report.cancelled);
        assert_eq!(bins(&report), vec![None, None, None]);
        assert!(report.placements[0].error.is_some());
        assert!(report.placements[1].error.is_none());
        assert_eq!(report.summary.items_placed, 0);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binpack.toml");
        fs::write(
            &path,
            "[packer]\nstrategy = \"naive\"\n\n[bins]\nsize = 8\n\n[items]\nsizes = [1, 2, 3]\n",
        )
        .unwrap();

        let a = SimulateArgs {
            config: Some(path.to_str().unwrap().to_string()),
            strategy: Some("first-fit".to_string()),
            ..SimulateArgs::default()
        };
        let config = resolve_config(&a).unwrap();
        assert_eq!(config.packer.strategy, Strategy::FirstFit);
        assert_eq!(config.bins.size, 8);
        assert_eq!(config.items.sizes, vec![1, 2, 3]);
    }

    #[test]
    fn test_rejects_unknown_strategy() {
        let err = resolve_config(&args("worst-fit", &[1])).unwrap_err();
        assert!(err.to_string().contains("unknown packing strategy"));
    }

    #[tokio::test]
    async fn test_report_serializes() {
        let config = resolve_config(&args("naive", &[4, 11])).unwrap();
        let report = run(&config, None).await.unwrap();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["strategy"], "naive");
        assert_eq!(json["placements"][0]["bin"], 0);
        assert!(json["placements"][1].get("bin").is_none());
        assert_eq!(json["summary"]["items_placed"], 1);
    }
}
