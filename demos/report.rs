//! Report for the reference graph: 32 nodes, edges `i -> i+3` and `i -> i+8`
//! (mod 32), PRIME as sources and EVEN as targets.
//!
//! Run with:
//! ```bash
//! cargo run --example report -- --verbose
//! ```

use clap::Parser;
use color_eyre::eyre::bail;
use color_eyre::Result;
use even_reach::bdd::BddConfig;
use even_reach::config::GraphConfig;
use even_reach::domain::Family;
use even_reach::harness::Harness;
use even_reach::pipeline::Pipeline;

#[derive(Parser)]
#[command(author, version, about = "Even-step reachability report using BDDs")]
struct Cli {
    /// Show debug logs
    #[arg(short, long)]
    verbose: bool,

    /// BDD storage size in bits
    #[arg(long, value_name = "INT", default_value_t = 16)]
    storage_bits: usize,

    /// BDD cache size in bits
    #[arg(long, value_name = "INT", default_value_t = 16)]
    cache_bits: usize,

    /// Bound on fixpoint iterations (defaults to the number of nodes)
    #[arg(long, value_name = "INT")]
    max_iterations: Option<usize>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    simplelog::TermLogger::init(
        if cli.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut config = GraphConfig::default().with_bdd_config(
        BddConfig::default()
            .with_storage_bits(cli.storage_bits)
            .with_cache_bits(cli.cache_bits),
    );
    if let Some(limit) = cli.max_iterations {
        config = config.with_max_iterations(limit);
    }

    let pipeline = Pipeline::new(config)?;
    let analysis = pipeline.analyze()?;
    let prime = pipeline.source_set(Family::Row)?;
    let even = pipeline.target_set(Family::Column)?;

    let mut harness = Harness::new(pipeline.bdd(), pipeline.encoding());
    harness.pair("RR", analysis.base, 27, 3, true)?;
    harness.pair("RR", analysis.base, 16, 20, false)?;
    harness.pair("RR2", analysis.closure.two_step(), 27, 6, true)?;
    harness.pair("RR2", analysis.closure.two_step(), 27, 9, false)?;
    harness.member("EVEN", even, 14, true)?;
    harness.member("EVEN", even, 13, false)?;
    harness.member("PRIME", prime, 7, true)?;
    harness.member("PRIME", prime, 2, false)?;
    for check in harness.checks() {
        println!("{}", check);
    }

    println!(
        "RR2star has {} satisfying assignments ({} iterations)",
        analysis.closure.relation().count(pipeline.bdd(), pipeline.encoding()),
        analysis.closure.iterations()
    );
    println!("statement is a {}", analysis.verdict());

    let cross = pipeline.cross_check(&analysis)?;
    println!(
        "explicit model: {} (closure {})",
        cross.explicit,
        if cross.closure_agrees { "agrees" } else { "differs" }
    );
    println!("bdd = {:?}", pipeline.bdd());

    if !harness.all_passed() || !cross.agrees() {
        bail!("{} check(s) failed", harness.failures().count() + !cross.agrees() as usize);
    }
    Ok(())
}
