//! Multi-seed benchmark: every (strategy, seed) pair runs as an independent
//! session, fanned out over a rayon pool, then aggregated into per-strategy
//! rankings with CSV and JSON artifacts.

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::seed::Seed;
use crate::session::{run_session, SessionConfig, SessionMetrics};
use crate::strategy::create_strategy;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Points,
    Survival,
    Hybrid,
}

impl Objective {
    pub fn run_value(self, metrics: &SessionMetrics) -> f64 {
        match self {
            Self::Points => {
                metrics.points as f64 + if metrics.collision { 0.0 } else { 25.0 }
            }
            Self::Survival => {
                metrics.ticks as f64 + metrics.points as f64 * 0.1
            }
            Self::Hybrid => {
                metrics.points as f64 * 0.6
                    + metrics.ticks as f64 * 0.3
                    + metrics.overtakes as f64 * 0.5
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Survival => "survival",
            Self::Hybrid => "hybrid",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchmarkConfig {
    pub strategies: Vec<String>,
    pub seeds: Vec<Seed>,
    pub max_ticks: u32,
    pub objective: Objective,
    pub out_dir: PathBuf,
    pub jobs: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub strategy: String,
    pub seed: Seed,
    pub ticks: u32,
    pub points: i64,
    pub collision: bool,
    pub overtakes: u64,
    pub moves: u64,
    pub clamped_moves: u64,
    pub unclassified_decisions: u64,
    pub objective_value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StrategyAggregate {
    pub strategy: String,
    pub runs: usize,
    pub avg_points: f64,
    pub max_points: i64,
    pub avg_ticks: f64,
    pub survival_rate: f64,
    pub avg_overtakes: f64,
    pub avg_moves: f64,
    pub objective_value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub generated_unix_s: u64,
    pub objective: Objective,
    pub max_ticks: u32,
    pub jobs: Option<usize>,
    pub strategies: Vec<String>,
    pub seeds: Vec<Seed>,
    pub run_count: usize,
    pub rankings: Vec<StrategyAggregate>,
    pub runs: Vec<RunRecord>,
}

pub fn resolve_strategies(input: Option<&str>) -> Result<Vec<String>> {
    match input {
        None => Ok(vec!["heuristic".to_string(), "heuristic-lanes".to_string()]),
        Some(raw) => {
            let strategies: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            if strategies.is_empty() {
                return Err(anyhow!("--strategies resolved to empty list"));
            }
            Ok(strategies)
        }
    }
}

pub fn run_benchmark(config: BenchmarkConfig) -> Result<BenchmarkReport> {
    if config.seeds.is_empty() {
        return Err(anyhow!("benchmark requires at least one seed"));
    }
    if config.strategies.is_empty() {
        return Err(anyhow!("benchmark requires at least one strategy"));
    }
    if let Some(0) = config.jobs {
        return Err(anyhow!("benchmark --jobs must be >= 1 when provided"));
    }
    // Resolve every strategy up front so a bad id or a missing training log
    // fails before any session runs.
    for id in &config.strategies {
        create_strategy(id).with_context(|| format!("cannot benchmark strategy '{id}'"))?;
    }
    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("failed creating {}", config.out_dir.display()))?;

    let jobs: Vec<(String, Seed)> = config
        .strategies
        .iter()
        .flat_map(|s| config.seeds.iter().map(move |seed| (s.clone(), *seed)))
        .collect();

    let run_one = |(strategy, seed): &(String, Seed)| -> Result<SessionMetrics> {
        let mut session = SessionConfig::new(strategy.clone(), *seed, config.max_ticks);
        session.log_dir = None;
        run_session(&session)
            .with_context(|| format!("benchmark run failed for strategy={strategy} seed={seed}"))
    };

    let results: Vec<Result<SessionMetrics>> = if let Some(jobs_n) = config.jobs {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs_n)
            .build()
            .context("failed to build rayon threadpool")?;
        pool.install(|| jobs.par_iter().map(run_one).collect())
    } else {
        jobs.par_iter().map(run_one).collect()
    };

    let mut metrics = Vec::with_capacity(results.len());
    for result in results {
        metrics.push(result?);
    }

    let mut runs: Vec<RunRecord> = metrics
        .iter()
        .map(|m| RunRecord {
            strategy: m.strategy_id.clone(),
            seed: m.seed,
            ticks: m.ticks,
            points: m.points,
            collision: m.collision,
            overtakes: m.overtakes,
            moves: m.moves_left + m.moves_right,
            clamped_moves: m.clamped_moves,
            unclassified_decisions: m.unclassified_decisions,
            objective_value: config.objective.run_value(m),
        })
        .collect();
    runs.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| b.points.cmp(&a.points))
            .then_with(|| b.ticks.cmp(&a.ticks))
    });

    let mut grouped: HashMap<&str, Vec<&RunRecord>> = HashMap::new();
    for run in &runs {
        grouped.entry(run.strategy.as_str()).or_default().push(run);
    }

    let mut rankings = Vec::new();
    for (strategy, group) in grouped {
        let n = group.len() as f64;
        rankings.push(StrategyAggregate {
            strategy: strategy.to_string(),
            runs: group.len(),
            avg_points: group.iter().map(|r| r.points as f64).sum::<f64>() / n,
            max_points: group.iter().map(|r| r.points).max().unwrap_or_default(),
            avg_ticks: group.iter().map(|r| r.ticks as f64).sum::<f64>() / n,
            survival_rate: group.iter().filter(|r| !r.collision).count() as f64 / n,
            avg_overtakes: group.iter().map(|r| r.overtakes as f64).sum::<f64>() / n,
            avg_moves: group.iter().map(|r| r.moves as f64).sum::<f64>() / n,
            objective_value: group.iter().map(|r| r.objective_value).sum::<f64>() / n,
        });
    }
    rankings.sort_by(|a, b| {
        b.objective_value
            .total_cmp(&a.objective_value)
            .then_with(|| b.avg_points.total_cmp(&a.avg_points))
    });

    write_runs_csv(&config.out_dir.join("runs.csv"), &runs)?;
    write_rankings_csv(&config.out_dir.join("rankings.csv"), &rankings)?;

    let report = BenchmarkReport {
        generated_unix_s: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        objective: config.objective,
        max_ticks: config.max_ticks,
        jobs: config.jobs,
        strategies: config.strategies,
        seeds: config.seeds,
        run_count: runs.len(),
        rankings,
        runs,
    };

    let report_path = config.out_dir.join("summary.json");
    fs::write(
        &report_path,
        serde_json::to_vec_pretty(&report).context("failed to serialize summary json")?,
    )
    .with_context(|| format!("failed writing {}", report_path.display()))?;

    Ok(report)
}

fn write_runs_csv(path: &Path, rows: &[RunRecord]) -> Result<()> {
    let mut csv = String::from(
        "strategy,seed,ticks,points,collision,overtakes,moves,clamped_moves,unclassified_decisions,objective_value\n",
    );
    for row in rows {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            row.strategy,
            row.seed,
            row.ticks,
            row.points,
            row.collision,
            row.overtakes,
            row.moves,
            row.clamped_moves,
            row.unclassified_decisions,
            row.objective_value
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}

fn write_rankings_csv(path: &Path, rows: &[StrategyAggregate]) -> Result<()> {
    let mut csv = String::from(
        "rank,strategy,runs,avg_points,max_points,avg_ticks,survival_rate,avg_overtakes,avg_moves,objective_value\n",
    );
    for (idx, row) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{:.2},{},{:.2},{:.4},{:.2},{:.2},{:.4}\n",
            idx + 1,
            row.strategy,
            row.runs,
            row.avg_points,
            row.max_points,
            row.avg_ticks,
            row.survival_rate,
            row.avg_overtakes,
            row.avg_moves,
            row.objective_value
        ));
    }
    fs::write(path, csv).with_context(|| format!("failed writing {}", path.display()))
}
