use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "binpack-sim",
    about = "binpack — bin-packing strategy simulator",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack a list of item sizes and report the bin assignment.
    ///
    /// Settings come from the config file when given; flags override it.
    Simulate {
        /// Path to a binpack.toml
        #[arg(short, long)]
        config: Option<String>,
        /// Packing strategy: naive or first-fit
        #[arg(short, long)]
        strategy: Option<String>,
        /// Capacity of every bin
        #[arg(short, long)]
        bin_size: Option<u64>,
        /// Fail bin allocation after this many bins
        #[arg(long)]
        max_bins: Option<usize>,
        /// Simulated latency of every placement, in milliseconds
        #[arg(long)]
        write_latency_ms: Option<u64>,
        /// Cancel the run after this many milliseconds
        #[arg(long)]
        deadline_ms: Option<u64>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Item sizes, in arrival order
        sizes: Vec<u64>,
    },
    /// Write a binpack.toml scaffold
    Init {
        #[arg(short, long, default_value = "binpack.toml")]
        path: String,
        #[arg(short, long, default_value = "naive")]
        strategy: String,
        #[arg(short, long, default_value_t = 10)]
        bin_size: u64,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("binpack=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config,
            strategy,
            bin_size,
            max_bins,
            write_latency_ms,
            deadline_ms,
            format,
            sizes,
        } => {
            let args = commands::simulate::SimulateArgs {
                config,
                strategy,
                bin_size,
                max_bins,
                write_latency_ms,
                deadline_ms,
                sizes,
            };
            commands::simulate::simulate(&args, &format).await
        }
        Commands::Init {
            path,
            strategy,
            bin_size,
            force,
        } => commands::init::init(&path, &strategy, bin_size, force),
    }
}
