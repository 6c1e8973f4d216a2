//! binpack.toml run configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::engine::Strategy;
use crate::memory::MemoryBinner;
use crate::space::Space;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackConfig {
    #[serde(default)]
    pub packer: PackerConfig,
    pub bins: BinsConfig,
    #[serde(default)]
    pub items: ItemsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackerConfig {
    #[serde(default)]
    pub strategy: Strategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinsConfig {
    pub size: u64,
    pub max_bins: Option<usize>,
    pub write_latency_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsConfig {
    #[serde(default)]
    pub sizes: Vec<u64>,
}

impl PackConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: PackConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bins.size == 0 {
            bail!("bins.size must be greater than zero");
        }
        if self.bins.max_bins == Some(0) {
            bail!("bins.max_bins must be greater than zero when set");
        }
        Ok(())
    }

    pub fn bin_size(&self) -> Space {
        Space::new(self.bins.size)
    }

    pub fn item_sizes(&self) -> Vec<Space> {
        self.items.sizes.iter().copied().map(Space::new).collect()
    }

    /// An in-memory binner honouring the `[bins]` section.
    pub fn memory_binner(&self) -> MemoryBinner<Space> {
        let mut binner = MemoryBinner::new(self.bin_size());
        if let Some(max) = self.bins.max_bins {
            binner = binner.with_max_bins(max);
        }
        if let Some(ms) = self.bins.write_latency_ms {
            binner = binner.with_write_latency(Duration::from_millis(ms));
        }
        binner
    }

    /// Scaffold a config for the given strategy and bin size.
    pub fn scaffold(strategy: Strategy, bin_size: u64) -> Self {
        PackConfig {
            packer: PackerConfig { strategy },
            bins: BinsConfig {
                size: bin_size,
                max_bins: None,
                write_latency_ms: None,
            },
            items: ItemsConfig {
                sizes: vec![7, 3, 4],
            },
        }
    }
}
