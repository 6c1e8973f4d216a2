use std::path::Path;

use anyhow::{Result, anyhow, bail};
use binpack::{PackConfig, Strategy};

pub fn init(path: &str, strategy: &str, bin_size: u64, force: bool) -> Result<()> {
    let output = Path::new(path);
    if output.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", output.display());
    }

    let strategy: Strategy = strategy.parse().map_err(|e: String| anyhow!(e))?;
    let config = PackConfig::scaffold(strategy, bin_size);
    config.validate()?;

    std::fs::write(output, config.to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}
