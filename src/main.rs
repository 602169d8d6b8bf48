//! Easy21 trainer
//! On-policy Monte Carlo Control with decaying epsilon-greedy exploration

use anyhow::Context;
use clap::Parser;
use easy21::config::{DEFAULT_EPISODES, DEFAULT_N0};
use easy21::{evaluate, report, Config, Trainer};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "easy21", about = "Learn Easy21 action values with Monte Carlo Control")]
struct Args {
    /// Training episodes
    #[arg(long, default_value_t = DEFAULT_EPISODES)]
    episodes: usize,
    /// Exploration constant N0
    #[arg(long, default_value_t = DEFAULT_N0)]
    n0: f64,
    /// Return discount
    #[arg(long, default_value_t = 1.0)]
    discount: f64,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Greedy games played after training, 0 to skip
    #[arg(long, default_value_t = 100_000)]
    eval_games: usize,
    /// Only list states visited at least this often
    #[arg(long, default_value_t = 2)]
    min_visits: u64,
    /// Also write the markdown report here
    #[arg(long)]
    output: Option<PathBuf>,
    /// Debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn log(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    simplelog::TermLogger::init(level, config, simplelog::TerminalMode::Mixed, simplelog::ColorChoice::Auto)
        .context("initialize logger")
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log(args.verbose)?;

    println!("============================================================");
    println!("Easy21 Monte Carlo Control");
    println!("============================================================");
    println!();

    let config = Config {
        n0: args.n0,
        discount: args.discount,
        seed: args.seed,
        ..Config::default()
    };
    let mut trainer = Trainer::new(config)?;
    let training = trainer.train(args.episodes)?.clone();

    let outcomes = if args.eval_games > 0 {
        let seed = args.seed.unwrap_or_else(|| fastrand::u64(..));
        log::info!("evaluating greedy policy over {} games", args.eval_games);
        Some(evaluate(trainer.store(), trainer.config(), args.eval_games, seed)?)
    } else {
        None
    };

    println!("{}", report::value_listing(trainer.store(), args.min_visits));
    let tables = report::strategy_table(trainer.store());
    println!("{}", tables);
    let summary = report::summary(&training, outcomes.as_ref());
    println!("{}", summary);

    if let Some(path) = args.output {
        let mut file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
        writeln!(file, "# Easy21 Strategy\n")?;
        write!(file, "{}", tables)?;
        writeln!(file)?;
        write!(file, "{}", summary)?;
        log::info!("report saved to {}", path.display());
    }
    Ok(())
}
