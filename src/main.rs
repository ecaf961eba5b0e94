use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use evolattice_core::{init_logging, AppConfig, SweepError};
use evolattice_data::StopReason;
use evolattice_lib::app::{
    default_report_path, execute_run, execute_sweep, format_matrix, write_sweep_outputs,
    RunOverrides, ShutdownManager, SweepOverrides,
};
use std::path::PathBuf;

/// Evolattice: spatial evolutionary games on a ring or torus.
#[derive(Parser, Debug)]
#[command(name = "evolattice")]
#[command(author, version, about = "Simulates spatial evolutionary games", long_about = None)]
struct Cli {
    /// Custom config file path
    #[arg(short, long, global = true, default_value = "evolattice.toml")]
    config: PathBuf,

    /// Number of worker threads for sweeps
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Trace a phase diagram over the diagonal payoff entries.
    Sweep(SweepArgs),

    /// Run the [lattice] configuration once and print the final proportions.
    Run(RunArgs),

    /// Print the default configuration as TOML.
    Config,
}

#[derive(Args, Debug)]
struct SweepArgs {
    /// Fixed payoff[0][1] coefficient a12, centre of the row range
    #[arg(long, allow_negative_numbers = true)]
    a12: Option<f64>,

    /// Fixed payoff[1][0] coefficient a21, centre of the column range
    #[arg(long, allow_negative_numbers = true)]
    a21: Option<f64>,

    /// Each range spans centre +/- half-width
    #[arg(long)]
    half_width: Option<f64>,

    /// Points per axis (odd)
    #[arg(short, long)]
    resolution: Option<usize>,

    /// Simulated time limit per cell
    #[arg(short, long)]
    stop_time: Option<f64>,

    /// Update rule, 0-7
    #[arg(short, long)]
    update_rule: Option<u8>,

    /// Side of each cell's torus
    #[arg(long)]
    lattice_size: Option<usize>,

    /// Base random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Hard ceiling on elementary steps per cell
    #[arg(long)]
    max_steps: Option<u64>,

    /// Report path (JSON; gzip when it ends in .gz)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the matrix as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl SweepArgs {
    fn overrides(&self) -> SweepOverrides {
        SweepOverrides {
            a12: self.a12,
            a21: self.a21,
            half_width: self.half_width,
            resolution: self.resolution,
            stop_time: self.stop_time,
            update_rule: self.update_rule,
            lattice_size: self.lattice_size,
            max_steps: self.max_steps,
            seed: self.seed,
        }
    }
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Override random seed (default: use configured seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated time limit; negative runs until absorption
    #[arg(short, long, allow_negative_numbers = true)]
    stop_time: Option<f64>,

    /// Hard ceiling on elementary steps
    #[arg(long)]
    max_steps: Option<u64>,

    /// Resume from a saved grid snapshot
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Save the final grid snapshot here
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

impl RunArgs {
    fn overrides(&self) -> RunOverrides {
        RunOverrides {
            seed: self.seed,
            stop_time: self.stop_time,
            max_steps: self.max_steps,
        }
    }
}

fn is_cancelled(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<SweepError>(), Some(SweepError::Cancelled))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let mut shutdown = ShutdownManager::new();
    shutdown.listen_for_ctrl_c();

    match cli.command {
        Commands::Config => {
            print!("{}", AppConfig::default().to_toml()?);
        }
        Commands::Sweep(args) => {
            let mut config = AppConfig::load_or_default(&cli.config)?;
            args.overrides().apply(&mut config.sweep);
            let cancel = shutdown.flag();
            let outcome = tokio::task::spawn_blocking(move || execute_sweep(config, &cancel)).await?;
            match outcome {
                Ok(report) => {
                    println!("{}", format_matrix(&report.result));
                    let json = args.output.clone().unwrap_or_else(default_report_path);
                    write_sweep_outputs(&report, Some(&json), args.csv.as_deref())?;
                    println!("Report saved to {}", json.display());
                    if let Some(csv) = &args.csv {
                        println!("Matrix saved to {}", csv.display());
                    }
                }
                Err(e) if is_cancelled(&e) => {
                    eprintln!("Sweep cancelled.");
                    shutdown.set_exit_code(130);
                }
                Err(e) => return Err(e),
            }
        }
        Commands::Run(args) => {
            let mut config = AppConfig::load_or_default(&cli.config)?;
            args.overrides().apply(&mut config);
            let cancel = shutdown.flag();
            let resume = args.resume.clone();
            let (outcome, grid) = tokio::task::spawn_blocking(move || {
                execute_run(&config, resume.as_deref(), &cancel)
            })
            .await??;

            println!(
                "Stopped ({:?}) after {} steps, t = {:.4}",
                outcome.reason, outcome.steps, outcome.time
            );
            for (strategy, p) in outcome.proportions.iter().enumerate() {
                println!("  strategy {strategy}: {p:.4}");
            }
            if let Some(path) = &args.snapshot {
                evolattice_io::save_snapshot(&grid, path)?;
                println!("Snapshot saved to {}", path.display());
            }
            if outcome.reason == StopReason::Cancelled {
                shutdown.set_exit_code(130);
            }
        }
    }

    if shutdown.exit_code() != 0 {
        std::process::exit(shutdown.exit_code());
    }
    Ok(())
}
