mod input;
mod logging;
mod model;
mod pipeline;
mod report;

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::input::{ExperimentRun, InputError, extract_identifiers, index_identifiers, load_truth};
use crate::model::RewardSource;
use crate::pipeline::stage1_collect::{CollectError, run_stage1};
use crate::pipeline::stage2_reconcile::run_stage2;
use crate::pipeline::stage3_aggregate::{AggregateError, run_stage3};
use crate::report::json::render_record_json;
use crate::report::text::format_reward_row;
use crate::report::{RecordMeta, ReportError, ReportRecord};

#[derive(Parser, Debug)]
#[command(
    name = "kira-acqreport",
    version,
    about = "Aggregate acquisition rewards across replicate runs"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect rewards from runs and print the aggregated report.
    Run(RunArgs),
    /// Print a previously saved report record.
    Show(ShowArgs),
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Fraction of the library acquired at initialization.
    #[arg(long)]
    split: f64,
    #[arg(long)]
    model: String,
    #[arg(long)]
    metric: String,
    /// Top-level run directories (each holding a `data` directory).
    #[arg(
        short = 'e',
        long = "experiments",
        visible_alias = "expts",
        num_args = 1..,
        required = true
    )]
    experiments: Vec<PathBuf>,
    /// Library file the runs acquired from.
    #[arg(short = 'l', long)]
    library: PathBuf,
    /// CSV file with the true scores.
    #[arg(long = "true-csv")]
    true_csv: PathBuf,
    #[arg(long, default_value_t = 0)]
    smiles_col: usize,
    #[arg(long, default_value_t = 1)]
    score_col: usize,
    /// Input files have no header row.
    #[arg(long)]
    no_title_line: bool,
    /// Higher scores are better.
    #[arg(long)]
    maximize: bool,
    /// Number of top true scores the rewards are measured against.
    #[arg(short = 'N')]
    top_n: usize,
    /// Save the record; without a value a name is derived from the metadata.
    #[arg(short = 'o', long, num_args = 0..=1)]
    output: Option<Option<PathBuf>>,
}

#[derive(Args, Debug, Clone)]
struct ShowArgs {
    record: PathBuf,
    #[arg(long)]
    json: bool,
    /// Print a single table: AVG, SCORES or SMILES.
    #[arg(long)]
    reward: Option<String>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("{0}")]
    Input(#[from] InputError),
    #[error("{0}")]
    Collect(#[from] CollectError),
    #[error("{0}")]
    Aggregate(#[from] AggregateError),
    #[error("{0}")]
    Report(#[from] ReportError),
    #[error("invalid argument: {0}")]
    Argument(String),
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(err) = dispatch(cli.command) {
        crate::error!("{err}");
        std::process::exit(1);
    }
}

fn dispatch(command: Command) -> Result<(), AppError> {
    match command {
        Command::Run(args) => run(&args),
        Command::Show(args) => show(&args),
    }
}

fn run(args: &RunArgs) -> Result<(), AppError> {
    validate_run_args(args)?;
    let title_line = !args.no_title_line;

    let ids = extract_identifiers(&args.library, args.smiles_col, title_line)?;
    let id_index = index_identifiers(&ids);
    crate::info!("library: {} identifiers", ids.len());

    let truth = load_truth(
        &args.true_csv,
        args.smiles_col,
        args.score_col,
        title_line,
        args.maximize,
    )?;
    crate::info!("ground truth: {} scored identifiers", truth.scores.len());
    let true_top_k = truth.top_k(args.top_n);
    if true_top_k.len() < args.top_n {
        crate::warn!(
            "ground truth has only {} scored identifiers; using all of them as the top-{}",
            true_top_k.len(),
            args.top_n
        );
    }

    let sources = load_sources(&args.experiments, &id_index)?;
    let collected = run_stage1(&sources, &true_top_k, args.maximize)?;
    let reconciled = run_stage2(collected);
    match reconciled.truncated_to {
        Some(len) => crate::info!(
            "aggregating {} runs ({} incomplete) over {} iterations",
            reconciled.tensor.reps(),
            reconciled.incomplete.len(),
            len
        ),
        None => crate::info!(
            "aggregating {} runs over {} iterations",
            reconciled.tensor.reps(),
            reconciled.num_acquired.len()
        ),
    }
    if !reconciled.mismatched.is_empty() {
        crate::warn!(
            "reporting the checkpoints of the last run; {} of {} runs differ",
            reconciled.mismatched.len(),
            reconciled.tensor.reps()
        );
    }
    let stats = run_stage3(&reconciled.tensor)?;

    let meta = RecordMeta {
        split: args.split,
        model: args.model.clone(),
        metric: args.metric.clone(),
        top_n: args.top_n,
    };
    let record = ReportRecord::new(meta, reconciled.num_acquired, stats)?;

    println!("{record}");
    if let Some(output) = &args.output {
        let path = record.persist(output.as_deref())?;
        println!("Saved dataset to {}", path.display());
    }
    Ok(())
}

fn show(args: &ShowArgs) -> Result<(), AppError> {
    let record = ReportRecord::load(&args.record)?;
    if let Some(name) = &args.reward {
        let stats = record.get_reward(name)?;
        println!("{}", format_reward_row(stats, 2));
    } else if args.json {
        println!("{}", render_record_json(&record)?);
    } else {
        println!("{record}");
    }
    Ok(())
}

fn validate_run_args(args: &RunArgs) -> Result<(), AppError> {
    if !(0.0..=1.0).contains(&args.split) {
        return Err(AppError::Argument(format!(
            "--split must be a fraction in [0, 1], got {}",
            args.split
        )));
    }
    if args.top_n == 0 {
        return Err(AppError::Argument("-N must be at least 1".to_string()));
    }
    Ok(())
}

fn load_sources(
    dirs: &[PathBuf],
    id_index: &HashMap<String, usize>,
) -> Result<Vec<Box<dyn RewardSource>>, InputError> {
    let mut sources: Vec<Box<dyn RewardSource>> = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let run = ExperimentRun::load(dir, id_index)?;
        sources.push(Box::new(run));
    }
    Ok(sources)
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
