//! Compare strategies for every JSON plan document in a directory
//!
//! Outputs one summary row per plan for side-by-side review

use anyhow::{Context, Result};
use clap::Parser;
use debt_planner::{load_plan_input, StrategyComparator, StrategyComparison};
use log::warn;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "compare_batch", about = "Snowball vs avalanche across a directory of plan documents")]
struct Cli {
    #[arg(help = "Directory containing *.json plan documents")]
    dir: PathBuf,

    #[arg(long, default_value = "strategy_comparison.csv")]
    output: PathBuf,
}

/// Outcome of one plan document
struct BatchRow {
    plan: String,
    debts: usize,
    outcome: Result<StrategyComparison, String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = Instant::now();
    let mut paths: Vec<PathBuf> = fs::read_dir(&cli.dir)
        .with_context(|| format!("unable to read {}", cli.dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    println!("Found {} plan documents in {}", paths.len(), cli.dir.display());

    let rows: Vec<BatchRow> = paths
        .par_iter()
        .map(|path| {
            let plan = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            match load_plan_input(path) {
                Ok(input) => BatchRow {
                    plan,
                    debts: input.debts.len(),
                    outcome: StrategyComparator::new(input.budget.clone())
                        .compare(&input.debts, &input.extra_payments)
                        .map_err(|e| e.to_string()),
                },
                Err(e) => BatchRow { plan, debts: 0, outcome: Err(e.to_string()) },
            }
        })
        .collect();

    println!("Comparisons complete in {:?}", start.elapsed());

    let mut file = BufWriter::new(
        File::create(&cli.output).with_context(|| format!("unable to create {}", cli.output.display()))?,
    );
    writeln!(file, "Plan,Debts,BaselineMonths,BaselineInterest,SnowballMonths,SnowballInterest,SnowballInterestSaved,SnowballMonthsSaved,AvalancheMonths,AvalancheInterest,AvalancheInterestSaved,AvalancheMonthsSaved,BestStrategy,NonAmortizable,Error")?;

    let mut failures = 0;
    for row in &rows {
        match &row.outcome {
            Ok(c) => {
                let non_amortizable = c.baseline.metrics.non_amortizable
                    || c.snowball.metrics.non_amortizable
                    || c.avalanche.metrics.non_amortizable;
                writeln!(file, "{},{},{},{:.2},{},{:.2},{:.2},{},{},{:.2},{:.2},{},{},{},",
                    row.plan,
                    row.debts,
                    c.baseline.metrics.months,
                    c.baseline.metrics.total_interest,
                    c.snowball.metrics.months,
                    c.snowball.metrics.total_interest,
                    c.snowball_savings.interest_saved,
                    c.snowball_savings.months_saved,
                    c.avalanche.metrics.months,
                    c.avalanche.metrics.total_interest,
                    c.avalanche_savings.interest_saved,
                    c.avalanche_savings.months_saved,
                    c.best_strategy().as_str(),
                    non_amortizable,
                )?;
            }
            Err(message) => {
                failures += 1;
                warn!("plan {} failed: {}", row.plan, message);
                writeln!(file, "{},{},,,,,,,,,,,,,\"{}\"", row.plan, row.debts, message.replace('"', "'"))?;
            }
        }
    }
    file.flush()?;

    println!("Output written to {}", cli.output.display());
    println!("\nBatch Summary:");
    println!("  Plans: {}", rows.len());
    println!("  Failed: {}", failures);
    if let Some(best) = rows
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok().map(|c| (r, c)))
        .max_by(|(_, a), (_, b)| {
            a.avalanche_savings
                .interest_saved
                .total_cmp(&b.avalanche_savings.interest_saved)
        })
    {
        println!("  Largest avalanche saving: {} (${:.2})", best.0.plan, best.1.avalanche_savings.interest_saved);
    }
    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
