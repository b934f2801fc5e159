//! Run the pipeline over several graph sizes and compare each verdict with the
//! explicit model.
//!
//! Run with:
//! ```bash
//! cargo run --example sweep -- --sizes 8,16,32,64 --offsets 3,8
//! ```

use std::time::Instant;

use clap::Parser;
use color_eyre::Result;
use even_reach::config::{EdgeRule, GraphConfig};
use even_reach::pipeline::Pipeline;

#[derive(Parser)]
#[command(author, version, about = "Even-step reachability over several graph sizes")]
struct Cli {
    /// Graph sizes to analyze
    #[arg(long, value_delimiter = ',', default_values_t = [8, 16, 32])]
    sizes: Vec<u32>,

    /// Edge offsets: i -> i + k (mod N)
    #[arg(long, value_delimiter = ',', default_values_t = [3, 8])]
    offsets: Vec<u32>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Warn,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let cli = Cli::parse();

    println!(
        "{:>6} {:>8} {:>8} {:>10} {:>14} {:>10} {:>10}",
        "N", "edges", "iters", "pairs", "verdict", "explicit", "time"
    );
    for &size in &cli.sizes {
        let config = GraphConfig::for_size(size).with_edges(EdgeRule::Offsets(cli.offsets.clone()));

        let start = Instant::now();
        let pipeline = Pipeline::new(config)?;
        let analysis = pipeline.analyze()?;
        let elapsed = start.elapsed();
        let cross = pipeline.cross_check(&analysis)?;

        println!(
            "{:>6} {:>8} {:>8} {:>10} {:>14} {:>10} {:>10.2?}",
            size,
            analysis.base.count(pipeline.bdd(), pipeline.encoding()),
            analysis.closure.iterations(),
            analysis.closure.relation().count(pipeline.bdd(), pipeline.encoding()),
            analysis.verdict().to_string(),
            cross.explicit.to_string(),
            elapsed
        );
    }

    Ok(())
}
