//! regsweep command line interface
//!
//! Runs the regularization sweep over a CSV dataset, fits single models and
//! prints saved sweep reports.

use clap::{Args, Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info, warn};
use regsweep::api::Pipeline;
use regsweep::core::{Result, SweepError};
use regsweep::persistence::{RunSettings, SweepReport};
use regsweep::plot::{
    plot_decision_boundary, render_sweep_figure, render_weight_chart, BoundaryTarget,
};
use regsweep::utils::validation::{check_label_balance, class_counts, class_proportions};
use regsweep::{
    stratified_split, Dataset, ExperimentConfig, LabelEncoding, RangeMap, RegularizationSweep,
    TabularDataset,
};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "regsweep")]
#[command(about = "Compare logistic regression fits across regularization strengths")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit one model per C candidate and plot boundaries and weights
    Sweep(SweepArgs),
    /// Fit a single model and report its test metrics
    Fit(FitArgs),
    /// Summarize the dataset, its feature ranges and the split
    Inspect(ExperimentArgs),
    /// Print a saved sweep report
    Report(ReportArgs),
}

/// Options shared by every command that loads the dataset
#[derive(Args, Clone)]
struct ExperimentArgs {
    /// JSON experiment config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// CSV data file
    #[arg(long)]
    data: Option<PathBuf>,

    /// Seed for the stratified split
    #[arg(long)]
    seed: Option<u64>,

    /// Fraction of rows held out for testing
    #[arg(long)]
    test_fraction: Option<f64>,
}

#[derive(Args)]
struct SweepArgs {
    #[command(flatten)]
    experiment: ExperimentArgs,

    /// Comma-separated C candidates
    #[arg(long, value_delimiter = ',')]
    candidates: Option<Vec<f64>>,

    /// Grid step of the decision surface
    #[arg(long)]
    step: Option<f64>,

    /// Directory the figures are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// How predicted classes map to region colours
    #[arg(long)]
    label_encoding: Option<CliLabelEncoding>,

    /// Skip rendering the figures
    #[arg(long)]
    no_plots: bool,

    /// Save a JSON report of the sweep
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args)]
struct FitArgs {
    #[command(flatten)]
    experiment: ExperimentArgs,

    /// Inverse regularization strength C
    #[arg(short = 'C', long, default_value = "1.0")]
    c: f64,

    /// Write the decision boundary of the fitted model to this SVG file
    #[arg(long)]
    plot: Option<PathBuf>,
}

#[derive(Args)]
struct ReportArgs {
    /// Report file
    report: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CliLabelEncoding {
    /// Colour by the fixed class index
    #[value(name = "fixed")]
    Fixed,
    /// Colour by the order of the classes present in each panel
    #[value(name = "per-call")]
    PerCall,
}

impl From<CliLabelEncoding> for LabelEncoding {
    fn from(cli_encoding: CliLabelEncoding) -> Self {
        match cli_encoding {
            CliLabelEncoding::Fixed => LabelEncoding::Fixed,
            CliLabelEncoding::PerCall => LabelEncoding::PerCall,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Sweep(args) => sweep_command(args),
        Commands::Fit(args) => fit_command(args),
        Commands::Inspect(args) => inspect_command(args),
        Commands::Report(args) => report_command(args),
    };

    if let Err(e) = result {
        error!("Error: {e}");
        process::exit(1);
    }
}

/// Config file (or defaults) with command line overrides applied
fn resolve_config(args: &ExperimentArgs) -> Result<ExperimentConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from: {path:?}");
            ExperimentConfig::from_file(path)?
        }
        None => ExperimentConfig::default(),
    };
    if let Some(data) = &args.data {
        config.dataset = data.clone();
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(test_fraction) = args.test_fraction {
        config.test_fraction = test_fraction;
    }
    Ok(config)
}

fn load_dataset(config: &ExperimentConfig) -> Result<TabularDataset> {
    info!("Loading dataset from: {:?}", config.dataset);
    let dataset = TabularDataset::from_path(&config.dataset, &config.load_options())?;
    info!(
        "Loaded {} samples with {} features",
        dataset.len(),
        dataset.n_features()
    );
    Ok(dataset)
}

fn sweep_command(args: SweepArgs) -> Result<()> {
    let mut config = resolve_config(&args.experiment)?;
    if let Some(candidates) = args.candidates {
        config.candidates = candidates;
    }
    if let Some(step) = args.step {
        config.plot_step = step;
    }
    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(encoding) = args.label_encoding {
        config.label_encoding = encoding.into();
    }
    config.validate()?;

    let dataset = load_dataset(&config)?;
    let (train, test) = stratified_split(&dataset, config.test_fraction, config.seed)?;
    let ranges = RangeMap::from_dataset(&dataset, config.range_margin)?;
    info!("Split: {} train / {} test", train.len(), test.len());

    let sweep = RegularizationSweep::new(config.candidates.clone(), config.solver.clone())?;
    let outcome = sweep.run(
        &train,
        &test,
        &ranges,
        config.plot_step,
        config.label_encoding,
    )?;
    let table = outcome.weight_table()?;

    println!("=== Weights per C ===");
    print!("{table}");
    println!();
    for fit in outcome.fits() {
        println!(
            "{:<10} train accuracy: {:.2}%  test accuracy: {:.2}%",
            fit.label,
            fit.train_accuracy * 100.0,
            fit.test_accuracy * 100.0
        );
    }

    if args.no_plots {
        info!("Skipping figures");
    } else {
        fs::create_dir_all(&config.output_dir)?;
        let boundaries = config.output_dir.join("decision_boundaries.svg");
        render_sweep_figure(&boundaries, &outcome, &test, dataset.classes(), &ranges)?;
        render_weight_chart(&config.output_dir.join("weights.svg"), &table)?;
        println!("\nFigures saved to: {:?}", config.output_dir);
    }

    if let Some(path) = args.report {
        let settings = RunSettings {
            dataset: config.dataset.display().to_string(),
            classes: dataset.classes().names().to_vec(),
            seed: config.seed,
            test_fraction: config.test_fraction,
            step: config.plot_step,
            encoding: config.label_encoding,
            n_train: train.len(),
            n_test: test.len(),
        };
        SweepReport::from_outcome(&outcome, settings).save_to_file(&path)?;
        info!("Report saved to: {path:?}");
    }

    Ok(())
}

fn fit_command(args: FitArgs) -> Result<()> {
    let config = resolve_config(&args.experiment)?;
    config.validate()?;

    let dataset = load_dataset(&config)?;
    let (train, test) = stratified_split(&dataset, config.test_fraction, config.seed)?;

    let pipeline = Pipeline::with_config(config.solver.clone()).with_c(args.c);
    let model = pipeline.fit(&train)?;
    let info = model.info();
    let metrics = model.evaluate_detailed(&test);

    println!("=== Logistic Regression (C = {}) ===", args.c);
    println!("Newton iterations: {}", info.iterations);
    println!("Objective:         {:.6}", info.objective_value);
    println!("Intercept:         {:.6}", info.intercept);
    println!("Coefficients (standardized features):");
    for (name, weight) in &info.coefficients {
        println!("  {name}: {weight:.6}");
    }

    println!(
        "\nTest Results ({} samples, positive class {}):",
        test.len(),
        metrics.positive_class(dataset.classes())
    );
    println!("  Train accuracy:  {:.2}%", model.evaluate(&train) * 100.0);
    println!("  Test accuracy:   {:.2}%", metrics.accuracy() * 100.0);
    println!("  True Positives:  {}", metrics.true_positives);
    println!("  True Negatives:  {}", metrics.true_negatives);
    println!("  False Positives: {}", metrics.false_positives);
    println!("  False Negatives: {}", metrics.false_negatives);
    println!("  Precision:       {:.4}", metrics.precision());
    println!("  Recall:          {:.4}", metrics.recall());
    println!("  F1 Score:        {:.4}", metrics.f1_score());
    println!("  Specificity:     {:.4}", metrics.specificity());

    if let Some(path) = args.plot {
        let ranges = RangeMap::from_dataset(&dataset, config.range_margin)?;
        plot_decision_boundary(
            &model,
            &ranges,
            config.plot_step,
            config.label_encoding,
            BoundaryTarget::NewFigure(&path),
        )?;
        println!("\nDecision boundary saved to: {path:?}");
    }

    Ok(())
}

fn inspect_command(args: ExperimentArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    config.validate()?;

    let dataset = load_dataset(&config)?;
    let classes = dataset.classes();
    let ranges = RangeMap::from_dataset(&dataset, config.range_margin)?;
    let (train, test) = stratified_split(&dataset, config.test_fraction, config.seed)?;

    println!("=== Dataset ===");
    println!("File: {:?}", config.dataset);
    println!("Samples: {}", dataset.len());
    let counts = class_counts(&dataset, classes.len());
    let proportions = class_proportions(&dataset, classes.len());
    for ((name, count), share) in classes.names().iter().zip(&counts).zip(&proportions) {
        println!("  {name}: {count} ({:.1}%)", share * 100.0);
    }
    let (_, _, ratio) = check_label_balance(&dataset);
    println!("  {} per {}: {ratio:.3}", classes.name(1), classes.name(0));

    println!("\nFeature ranges (margin {}):", config.range_margin);
    for (name, range) in ranges.iter() {
        println!("  {name}: [{:.2}, {:.2}]", range.min, range.max);
    }

    println!(
        "\nSplit (test fraction {}, seed {}):",
        config.test_fraction, config.seed
    );
    for (label, part) in [("train", &train), ("test", &test)] {
        let counts = class_counts(part, classes.len());
        let per_class: Vec<String> = classes
            .names()
            .iter()
            .zip(&counts)
            .map(|(name, count)| format!("{name}={count}"))
            .collect();
        println!("  {label}: {} ({})", part.len(), per_class.join(", "));
    }

    if counts.iter().any(|&n| n < 10) {
        warn!("Some classes have fewer than 10 rows; boundaries will be noisy");
    }

    Ok(())
}

fn report_command(args: ReportArgs) -> Result<()> {
    info!("Loading report from: {:?}", args.report);
    let report = SweepReport::load_from_file(&args.report)?;
    if report.candidates.is_empty() {
        return Err(SweepError::InvalidDataset(
            "Report contains no candidates".to_string(),
        ));
    }
    report.print_summary();
    Ok(())
}
