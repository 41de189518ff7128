use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::path::PathBuf;

use lane_autopilot::benchmark::{resolve_strategies, run_benchmark, BenchmarkConfig, Objective};
use lane_autopilot::seed::{seed_file, seed_list, Seed};
use lane_autopilot::session::{run_session, SessionConfig};
use lane_autopilot::strategy::describe_strategies;
use lane_autopilot::telemetry::read_log;

#[derive(Parser, Debug)]
#[command(name = "lane-autopilot")]
#[command(about = "Lane-decision lab: deterministic highway sessions, telemetry logs, benchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available decision strategies
    ListStrategies,
    /// Run a single session and write telemetry logs
    Run {
        #[arg(long, default_value = "heuristic")]
        strategy: String,
        /// Optional strategy driving the player entity
        #[arg(long)]
        player_strategy: Option<String>,
        /// Decimal or 0x-prefixed hex
        #[arg(long, default_value = "1")]
        seed: Seed,
        /// Decision ticks; one tick is 0.1 s of session time
        #[arg(long, default_value_t = 3_000)]
        max_ticks: u32,
        /// Telemetry directory (pass --no-telemetry to disable)
        #[arg(long, default_value = "telemetry")]
        log_dir: PathBuf,
        #[arg(long, default_value_t = false)]
        no_telemetry: bool,
    },
    /// Run a multi-seed benchmark across one or more strategies
    Benchmark {
        /// Comma-separated strategy ids; defaults to both heuristics
        #[arg(long)]
        strategies: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_file: Option<PathBuf>,
        #[arg(long)]
        seed_start: Option<Seed>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long, default_value_t = 3_000)]
        max_ticks: u32,
        #[arg(long, value_enum, default_value_t = CliObjective::Points)]
        objective: CliObjective,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Parse and summarize an existing telemetry log
    InspectLog {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliObjective {
    Points,
    Survival,
    Hybrid,
}

impl From<CliObjective> for Objective {
    fn from(value: CliObjective) -> Self {
        match value {
            CliObjective::Points => Objective::Points,
            CliObjective::Survival => Objective::Survival,
            CliObjective::Hybrid => Objective::Hybrid,
        }
    }
}

fn main() -> Result<()> {
    let Cli { command } = Cli::parse();

    match command {
        Commands::ListStrategies => {
            for (id, description) in describe_strategies() {
                println!("{id:24} {description}");
            }
        }
        Commands::Run {
            strategy,
            player_strategy,
            seed,
            max_ticks,
            log_dir,
            no_telemetry,
        } => {
            let mut config = SessionConfig::new(strategy, seed, max_ticks);
            config.player_strategy = player_strategy;
            config.log_dir = if no_telemetry { None } else { Some(log_dir) };

            let metrics = run_session(&config)?;
            println!("strategy={}", metrics.strategy_id);
            println!("seed={}", metrics.seed);
            println!("ticks={}", metrics.ticks);
            println!("elapsed_s={:.1}", metrics.elapsed_s);
            println!("collision={}", metrics.collision);
            println!("final_lane={}", metrics.final_lane);
            println!("points={}", metrics.points);
            println!("run_time_s={}", metrics.run_time_s);
            println!("overtakes={}", metrics.overtakes);
            println!(
                "moves={} left={} right={} stays={}",
                metrics.moves_left + metrics.moves_right,
                metrics.moves_left,
                metrics.moves_right,
                metrics.stays
            );
            println!("time_in_left_s={}", metrics.time_in_left_s);
            println!("time_in_others_s={}", metrics.time_in_others_s);
            println!("time_in_offroad_s={}", metrics.time_in_offroad_s);
            println!("clamped_moves={}", metrics.clamped_moves);
            println!("rejected_moves={}", metrics.rejected_moves);
            println!("unclassified_decisions={}", metrics.unclassified_decisions);
            if let Some(dir) = &config.log_dir {
                println!("log_dir={}", dir.display());
            }
        }
        Commands::Benchmark {
            strategies,
            seeds,
            seed_file,
            seed_start,
            seed_count,
            max_ticks,
            objective,
            out_dir,
            jobs,
        } => {
            let strategies = resolve_strategies(strategies.as_deref())?;
            let seeds = resolve_seeds(seeds.as_deref(), seed_file.as_deref(), seed_start, seed_count)?;
            let out_dir = out_dir.unwrap_or_else(|| PathBuf::from("benchmarks/latest"));

            let report = run_benchmark(BenchmarkConfig {
                strategies,
                seeds,
                max_ticks,
                objective: objective.into(),
                out_dir: out_dir.clone(),
                jobs,
            })?;

            println!("objective={}", report.objective.as_str());
            println!("runs={}", report.run_count);
            for (idx, entry) in report.rankings.iter().enumerate() {
                println!(
                    "rank{:02} strategy={} avg_points={:.2} survival_rate={:.2} objective={:.2}",
                    idx + 1,
                    entry.strategy,
                    entry.avg_points,
                    entry.survival_rate,
                    entry.objective_value
                );
            }
            println!("out_dir={}", out_dir.display());
        }
        Commands::InspectLog { input } => {
            let records = read_log(&input)?;
            if records.is_empty() {
                return Err(anyhow!("{} contains no records", input.display()));
            }

            let mut lanes: BTreeMap<u8, usize> = BTreeMap::new();
            let mut left = 0usize;
            let mut right = 0usize;
            let mut stay = 0usize;
            for record in &records {
                *lanes.entry(record.current_lane.encoded()).or_default() += 1;
                let delta = record.target_lane.value() - record.current_lane.value();
                match delta {
                    -1 => left += 1,
                    1 => right += 1,
                    _ => stay += 1,
                }
            }

            println!("records={}", records.len());
            println!("moves_left={left}");
            println!("moves_right={right}");
            println!("stays={stay}");
            for (lane, count) in lanes {
                println!("lane{lane}_records={count}");
            }
        }
    }

    Ok(())
}

fn resolve_seeds(
    seeds: Option<&str>,
    from_file: Option<&std::path::Path>,
    seed_start: Option<Seed>,
    seed_count: u32,
) -> Result<Vec<Seed>> {
    if let Some(raw) = seeds {
        return seed_list(raw);
    }
    if let Some(path) = from_file {
        return seed_file(path);
    }
    if seed_count == 0 {
        return Err(anyhow!("--seed-count must be >= 1"));
    }
    Ok(seed_start.unwrap_or_else(|| Seed::from(1)).range(seed_count))
}
