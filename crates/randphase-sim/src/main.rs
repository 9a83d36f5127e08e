use clap::Parser;
use randphase_sim::cli::Cli;
use randphase_sim::config::load_config;
use randphase_sim::logging::init_tracing;
use randphase_sim::{default_output_base_dir, run};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut cfg = load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut cfg);

    let output = cli.output.clone().unwrap_or_else(default_output_base_dir);
    let summary = run(&cfg, &output)?;

    println!("{}", summary.report);
    println!();
    println!("Run directory: {}", summary.outputs.output_dir.display());
    println!("Moments: {}", summary.outputs.moments_path.display());
    println!("Summary: {}", summary.outputs.summary_path.display());

    Ok(())
}
