use anyhow::Context;
use clap::Parser;
use evolattice_core::sweep::run_sweep;
use evolattice_data::SweepConfig;
use evolattice_io::SweepReport;

#[derive(Parser, Debug)]
#[command(author, version, about = "Checks a saved sweep report", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "output/sweep.json")]
    input: String,

    /// Re-run the sweep from the recorded seed and compare the matrices.
    #[arg(short, long)]
    rerun: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Verifying sweep report {}...", args.input);
    let report = SweepReport::load(&args.input)
        .with_context(|| format!("failed to read {}", args.input))?;

    println!("Run ID: {}", report.run_id);
    println!("Created: {}", report.created_at);
    println!("Fingerprint: {}", report.fingerprint);

    if let Err(e) = report.check() {
        println!("\n❌ VERIFICATION FAILED!");
        println!("{e}");
        std::process::exit(1);
    }

    if args.rerun {
        let config = rerun_config(&report);
        println!(
            "Re-running {}x{} sweep with seed {}...",
            config.resolution, config.resolution, report.base_seed
        );
        let rerun = run_sweep(&config)?;
        if rerun.proportions != report.result.proportions {
            println!("\n❌ VERIFICATION FAILED!");
            println!("Re-run produced a different phase diagram.");
            std::process::exit(1);
        }
    }

    println!("\n✅ VERIFICATION SUCCESSFUL!");
    Ok(())
}

/// The sweep exactly as it ran, pinned to the recorded base seed.
fn rerun_config(report: &SweepReport) -> SweepConfig {
    SweepConfig {
        seed: Some(report.base_seed),
        ..report.config.sweep.clone()
    }
}
