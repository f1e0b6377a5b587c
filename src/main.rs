//! Debt Planner CLI
//!
//! Command-line interface for schedules, strategy plans and comparisons

use anyhow::{anyhow, bail, Context, Result};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand, ValueEnum};
use debt_planner::debt::{load_debts, load_extra_payments};
use debt_planner::{
    AmortizationEngine, Debt, Metrics, MonthIndex, PlanInput, PlanResult, SimulationConfig, SimulationResult,
    Strategy, StrategyComparator, StrategySavings,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "debt_planner",
    version,
    about = "Amortization schedules and snowball/avalanche repayment plans"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Amortization schedule for a single debt
    Simulate {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, help = "Debt to simulate; defaults to the only debt in the input")]
        debt_id: Option<String>,

        #[command(flatten)]
        quote: QuoteArgs,

        #[arg(long, help = "Write the full schedule to this CSV file")]
        output: Option<PathBuf>,
    },
    /// Multi-debt plan under one strategy
    Plan {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, help = "Write the full plan ledger to this CSV file")]
        output: Option<PathBuf>,
    },
    /// Baseline, snowball and avalanche side by side
    Compare {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, help = "Write the three plan summaries to this CSV file")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    #[arg(long, help = "JSON plan document with debts, budget and extra_payments")]
    plan: Option<PathBuf>,

    #[arg(long, conflicts_with = "plan", help = "CSV file of debts")]
    debts: Option<PathBuf>,

    #[arg(long, conflicts_with = "plan", help = "CSV file of extra payments")]
    extras: Option<PathBuf>,

    #[arg(long, help = "Monthly extra budget; overrides the plan document")]
    monthly_extra: Option<f64>,

    #[arg(long, value_enum, help = "Repayment strategy; overrides the plan document")]
    strategy: Option<StrategyArg>,

    #[arg(long, help = "First month the monthly extra applies, e.g. 2025-03")]
    extra_start: Option<String>,

    #[arg(long, help = "Decimal places for money (0-4)")]
    precision: Option<u32>,
}

/// Inline debt for quick quotes when no input file is given
#[derive(Args, Debug)]
struct QuoteArgs {
    #[arg(long)]
    principal: Option<f64>,

    #[arg(long, help = "Annual rate as a decimal, e.g. 0.199")]
    rate: Option<f64>,

    #[arg(long)]
    term: Option<u32>,

    #[arg(long)]
    min_payment: Option<f64>,

    #[arg(long, help = "First installment month; defaults to the current month")]
    start_month: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    Snowball,
    Avalanche,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Snowball => Strategy::Snowball,
            StrategyArg::Avalanche => Strategy::Avalanche,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Simulate { input, debt_id, quote, output } => run_simulate(&input, debt_id, &quote, output),
        Command::Plan { input, output } => run_plan(&input, output),
        Command::Compare { input, output } => run_compare(&input, output),
    }
}

/// Assemble the plan input from a JSON document or CSV files plus CLI overrides
fn load_input(args: &InputArgs) -> Result<PlanInput> {
    let mut input = if let Some(path) = &args.plan {
        debt_planner::load_plan_input(path).map_err(|e| anyhow!("failed to load {}: {}", path.display(), e))?
    } else if let Some(path) = &args.debts {
        let debts = load_debts(path).map_err(|e| anyhow!("failed to load {}: {}", path.display(), e))?;
        let extras = match &args.extras {
            Some(path) => {
                load_extra_payments(path).map_err(|e| anyhow!("failed to load {}: {}", path.display(), e))?
            }
            None => Vec::new(),
        };
        PlanInput::new(debts, Default::default(), extras)
    } else {
        PlanInput::default()
    };

    if let Some(extra) = args.monthly_extra {
        input.budget.monthly_extra = extra;
    }
    if let Some(strategy) = args.strategy {
        input.budget.strategy = strategy.into();
    }
    if let Some(token) = &args.extra_start {
        input.budget.extra_start_month = Some(MonthIndex::parse(token)?);
    }
    if let Some(precision) = args.precision {
        input.budget.precision = precision;
    }
    input.budget.validate()?;
    Ok(input)
}

fn current_month() -> Result<MonthIndex> {
    let today = chrono::Local::now().date_naive();
    Ok(MonthIndex::new(today.year(), today.month())?)
}

fn quote_debt(quote: &QuoteArgs) -> Result<Option<Debt>> {
    let Some(principal) = quote.principal else {
        return Ok(None);
    };
    let start_month = match &quote.start_month {
        Some(token) => MonthIndex::parse(token)?,
        None => current_month()?,
    };
    let rate = quote.rate.unwrap_or(0.0);

    let mut debt = match (quote.term, quote.min_payment) {
        (Some(term), _) => Debt::with_term("quote", principal, rate, start_month, term),
        (None, Some(min)) => Debt::with_min_payment("quote", principal, rate, start_month, min),
        (None, None) => bail!("a quote needs --term or --min-payment"),
    };
    debt.min_payment = quote.min_payment;
    Ok(Some(debt))
}

fn run_simulate(args: &InputArgs, debt_id: Option<String>, quote: &QuoteArgs, output: Option<PathBuf>) -> Result<()> {
    let input = load_input(args)?;

    let (debt, extras) = if let Some(debt) = quote_debt(quote)? {
        (debt, Vec::new())
    } else {
        let debt = match debt_id.as_deref() {
            Some(id) => input.debt(id).cloned().with_context(|| format!("no debt with id {}", id))?,
            None if input.debts.len() == 1 => input.debts[0].clone(),
            None => bail!("input has {} debts; pick one with --debt-id", input.debts.len()),
        };
        let extras = input.extras_for(&debt.id);
        (debt, extras)
    };

    let engine = AmortizationEngine::new(SimulationConfig { precision: input.budget.precision });
    let result = engine.simulate(&debt, &extras)?;

    println!("Debt: {} ({})", debt.name, debt.id);
    println!("  Principal: ${:.2}", debt.principal);
    println!("  Annual Rate: {:.4}%", debt.annual_rate * 100.0);
    println!("  Start Month: {}", debt.start_month);
    println!("  Monthly Payment: ${:.2}", result.monthly_payment);
    println!();

    print_schedule(&result, 24);
    print_metrics("Summary", &result.metrics);

    if let Some(path) = output {
        write_schedule_csv(&path, &result)?;
        println!("\nFull schedule written to: {}", path.display());
    }
    Ok(())
}

fn run_plan(args: &InputArgs, output: Option<PathBuf>) -> Result<()> {
    let input = load_input(args)?;
    if input.debts.is_empty() {
        bail!("no debts to plan; pass --plan or --debts");
    }

    let comparator = StrategyComparator::new(input.budget.clone());
    let result = comparator.run(input.budget.strategy, &input.debts, &input.extra_payments)?;

    println!(
        "{} plan for {} debts, monthly extra ${:.2}\n",
        result.strategy.as_str(),
        input.debts.len(),
        input.budget.monthly_extra
    );
    print_debt_summaries(&result);
    print_metrics("Plan Summary", &result.metrics);

    if let Some(path) = output {
        write_plan_csv(&path, &result)?;
        println!("\nFull plan written to: {}", path.display());
    }
    Ok(())
}

fn run_compare(args: &InputArgs, output: Option<PathBuf>) -> Result<()> {
    let input = load_input(args)?;
    if input.debts.is_empty() {
        bail!("no debts to compare; pass --plan or --debts");
    }

    let comparison = StrategyComparator::new(input.budget.clone()).compare(&input.debts, &input.extra_payments)?;

    println!("{:<10} {:>8} {:>10} {:>14} {:>14} {:>14} {:>12}",
        "Run", "Months", "Payoff", "Interest", "Fees", "Total Paid", "Int Saved");
    println!("{}", "-".repeat(88));
    let none = StrategySavings { interest_saved: 0.0, months_saved: 0 };
    for (label, plan, savings) in [
        ("baseline", &comparison.baseline, &none),
        ("snowball", &comparison.snowball, &comparison.snowball_savings),
        ("avalanche", &comparison.avalanche, &comparison.avalanche_savings),
    ] {
        let m = &plan.metrics;
        println!("{:<10} {:>8} {:>10} {:>14.2} {:>14.2} {:>14.2} {:>12.2}",
            label,
            m.months,
            payoff_label(m),
            m.total_interest,
            m.total_fees,
            m.total_paid,
            savings.interest_saved,
        );
    }

    let best = comparison.best_strategy();
    let savings = comparison.savings(best);
    println!("\nBest strategy: {} (saves ${:.2} interest, {} months)",
        best.as_str(), savings.interest_saved, savings.months_saved);

    if let Some(path) = output {
        let mut file = BufWriter::new(File::create(&path).with_context(|| format!("unable to create {}", path.display()))?);
        writeln!(file, "Run,Months,PayoffMonth,NonAmortizable,TotalInterest,TotalFees,TotalPaid,InterestSaved,MonthsSaved")?;
        for (label, plan, savings) in [
            ("baseline", &comparison.baseline, &none),
            ("snowball", &comparison.snowball, &comparison.snowball_savings),
            ("avalanche", &comparison.avalanche, &comparison.avalanche_savings),
        ] {
            let m = &plan.metrics;
            writeln!(file, "{},{},{},{},{:.2},{:.2},{:.2},{:.2},{}",
                label,
                m.months,
                m.payoff_month.map(|p| p.to_string()).unwrap_or_default(),
                m.non_amortizable,
                m.total_interest,
                m.total_fees,
                m.total_paid,
                savings.interest_saved,
                savings.months_saved,
            )?;
        }
        file.flush()?;
        println!("\nComparison written to: {}", path.display());
    }
    Ok(())
}

fn payoff_label(metrics: &Metrics) -> String {
    match metrics.payoff_month {
        Some(month) => month.to_string(),
        None if metrics.non_amortizable => "stalled".to_string(),
        None => "capped".to_string(),
    }
}

fn print_schedule(result: &SimulationResult, limit: usize) {
    println!("{:>5} {:>8} {:>14} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Inst", "Month", "Start Bal", "Payment", "Extra", "Interest", "Principal", "End Bal");
    println!("{}", "-".repeat(96));

    for row in result.entries.iter().take(limit) {
        println!("{:>5} {:>8} {:>14.2} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
            row.installment,
            row.month.to_string(),
            row.starting_balance,
            row.regular_payment,
            row.extra_payment,
            row.interest,
            row.principal,
            row.ending_balance,
        );
    }

    if result.entries.len() > limit {
        println!("... ({} more months)", result.entries.len() - limit);
    }
}

fn print_debt_summaries(result: &PlanResult) {
    println!("{:<16} {:>8} {:>10} {:>14} {:>14} {:>14}",
        "Debt", "Months", "Payoff", "Interest", "Fees", "Total Paid");
    println!("{}", "-".repeat(82));
    for debt in &result.debts {
        println!("{:<16} {:>8} {:>10} {:>14.2} {:>14.2} {:>14.2}",
            debt.debt_id,
            debt.months_active,
            debt.payoff_month.map(|m| m.to_string()).unwrap_or_else(|| "-".to_string()),
            debt.total_interest,
            debt.total_fees,
            debt.total_paid,
        );
    }
}

fn print_metrics(title: &str, metrics: &Metrics) {
    println!("\n{}:", title);
    println!("  Total Months: {}", metrics.months);
    println!("  Payoff Month: {}", payoff_label(metrics));
    println!("  Total Interest: ${:.2}", metrics.total_interest);
    println!("  Total Fees: ${:.2}", metrics.total_fees);
    println!("  Total Paid: ${:.2}", metrics.total_paid);
    if metrics.non_amortizable {
        println!("  WARNING: payments do not cover interest and fees");
    }
}

fn write_schedule_csv(path: &Path, result: &SimulationResult) -> Result<()> {
    let mut file = BufWriter::new(File::create(path).with_context(|| format!("unable to create {}", path.display()))?);

    writeln!(file, "Installment,Month,StartingBalance,RegularPayment,ExtraPayment,TotalPayment,Interest,Fees,Principal,EndingBalance")?;
    for row in &result.entries {
        writeln!(file, "{},{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
            row.installment,
            row.month,
            row.starting_balance,
            row.regular_payment,
            row.extra_payment,
            row.total_payment,
            row.interest,
            row.fees,
            row.principal,
            row.ending_balance,
        )?;
    }
    file.flush()?;
    Ok(())
}

fn write_plan_csv(path: &Path, result: &PlanResult) -> Result<()> {
    let mut file = BufWriter::new(File::create(path).with_context(|| format!("unable to create {}", path.display()))?);

    writeln!(file, "Month,Target,AvailableExtra,UnusedExtra,DebtId,Installment,StartingBalance,RegularPayment,ScheduledExtra,StrategyExtra,TotalPayment,Interest,Fees,Principal,EndingBalance")?;
    for month in &result.months {
        for p in &month.payments {
            writeln!(file, "{},{},{:.4},{:.4},{},{},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
                month.month,
                month.target_debt_id.as_deref().unwrap_or(""),
                month.available_extra,
                month.unused_extra,
                p.debt_id,
                p.installment,
                p.starting_balance,
                p.regular_payment,
                p.scheduled_extra,
                p.strategy_extra,
                p.total_payment,
                p.interest,
                p.fees,
                p.principal,
                p.ending_balance,
            )?;
        }
    }
    file.flush()?;
    Ok(())
}
