use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use devis_cli::config::{EstimateOverrides, FileConfig};
use devis_cli::display::Breakdown;
use devis_cli::{logging, output};
use devis_cli::state::EstimatorState;
use devis_core::{DeliveryFormat, QuoteEngine, ServiceType, Urgency};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Cost estimator for training material: slides, programs and evaluations.
///
/// Prices the selected options, prints the breakdown and optionally writes
/// the two-page quote document.
#[derive(Debug, Parser)]
#[command(name = "devis", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML file with `[estimate]` and `[branding]` tables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `devis_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Print the quote as JSON instead of the text breakdown.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the quote breakdown.
    Quote {
        #[command(flatten)]
        estimate: EstimateArgs,
    },

    /// Print the breakdown and write the quote document.
    Pdf {
        #[command(flatten)]
        estimate: EstimateArgs,

        /// Directory the document is written to.
        #[arg(long, short, default_value = ".")]
        output: PathBuf,
    },
}

impl Command {
    fn estimate(&self) -> &EstimateArgs {
        match self {
            Self::Quote { estimate } | Self::Pdf { estimate, .. } => estimate,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct EstimateArgs {
    /// program-creation, slide-creation, evaluation-creation or full-service.
    #[arg(long)]
    service: Option<ServiceType>,

    /// Hours of course content (5 slides per hour).
    #[arg(long)]
    hours: Option<u32>,

    /// Number of modules the hours are split into.
    #[arg(long)]
    split: Option<u32>,

    /// Number of program modules.
    #[arg(long)]
    modules: Option<u32>,

    /// Number of evaluations.
    #[arg(long)]
    evaluations: Option<u32>,

    /// Yearly content update (+20%).
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    annual_update: Option<bool>,

    /// ppt, pdf or both.
    #[arg(long)]
    format: Option<DeliveryFormat>,

    /// standard, express or urgent.
    #[arg(long)]
    urgency: Option<Urgency>,

    /// Pay in monthly installments instead of upfront.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    installments: Option<bool>,

    /// Installment duration in months (2 to 24).
    #[arg(long)]
    months: Option<u32>,
}

impl From<EstimateArgs> for EstimateOverrides {
    fn from(args: EstimateArgs) -> Self {
        Self {
            service: args.service,
            course_hours: args.hours,
            module_split_count: args.split,
            module_count: args.modules,
            evaluation_count: args.evaluations,
            annual_update: args.annual_update,
            delivery_format: args.format,
            urgency: args.urgency,
            installment_payment: args.installments,
            installment_months: args.months,
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    logging::init_default_logging();
    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => FileConfig::default(),
    };

    let mut state = EstimatorState::new(QuoteEngine::default())?;
    file_config
        .estimate
        .merge(cli.command.estimate().clone().into())
        .apply(&mut state)?;
    info!(
        mutations = state.revision(),
        total_excluding_tax = %state.quote().total_excluding_tax,
        "quote computed"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(state.quote())?);
    } else {
        println!("{}", Breakdown::new(state.quote(), state.config()));
    }

    match &cli.command {
        Command::Quote { .. } => Ok(ExitCode::SUCCESS),
        Command::Pdf { output: dir, .. } => {
            let date = Local::now().date_naive();
            let saved = output::save_document(&state, &file_config.branding, dir, date);
            Ok(output::report(saved))
        }
    }
}
