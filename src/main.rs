use anyhow::Result;
use clap::Parser;
use stardisk_core::metrics::init_logging;
use stardisk_lib::app::App;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Seed for the random stream (overrides the config)
    #[arg(short, long)]
    seed: Option<u64>,

    /// End time of the run (overrides the config)
    #[arg(long)]
    t_end: Option<f64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = App::load_config(&args.config);
    if let Some(seed) = args.seed {
        config.run.seed = Some(seed);
    }
    if let Some(t_end) = args.t_end {
        config.run.t_end = t_end;
    }

    let mut app = App::new(config)?;
    let report = app.run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Model fingerprint:     {}", report.fingerprint);
    if let Some(seed) = report.seed {
        println!("Seed:                  {seed}");
    }
    println!(
        "Ticks:                 {}{}",
        report.ticks,
        if report.paused { " (paused)" } else { "" }
    );
    println!("Cells:                 {}", report.total_cells);
    println!("History records:       {}", report.history_len);
    println!(
        "Star formation rate:   {:.2} per tick",
        report.mean_star_formation_rate
    );
    println!("Active cells at end:   {}", report.final_active_cells);
    println!(
        "Clusters:              {} ({} cells, mean size {:.2}, largest {})",
        report.clusters.cluster_count,
        report.clusters.clustered_cells,
        report.clusters.mean_cluster_size,
        report.clusters.largest_cluster
    );
    println!("Bonds:                 {}", report.clusters.total_bonds);
    Ok(())
}
