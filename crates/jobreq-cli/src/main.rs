//! JobReq CLI - Command-line interface
//!
//! Usage:
//!   jobreq analyze -t "<job description>"
//!   jobreq analyze -f job.txt -o result.json
//!   jobreq batch <dir> --ext txt,md --summary
//!   jobreq batch --csv jobs.csv --id-column id -o results.csv --format csv
//!   jobreq config check

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};

use jobreq_batch::{BatchProcessor, DEFAULT_EXTENSIONS, DEFAULT_TEXT_COLUMN};
use jobreq_core::{AppConfig, LoggingConfig, NerBackend};
use jobreq_extractor::RequirementsExtractor;

mod display;

#[derive(Parser)]
#[command(name = "jobreq")]
#[command(about = "Extract requirements from job descriptions")]
#[command(version)]
struct Cli {
    /// TOML configuration file (JOBREQ_* variables override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides shared by the analysis commands
#[derive(clap::Args)]
struct ModelArgs {
    /// Hosted model to use for entity recognition
    #[arg(long)]
    model: Option<String>,

    /// Minimum confidence threshold for entities
    #[arg(long)]
    confidence: Option<f64>,

    /// Entity recognition backend (inference, dictionary, disabled)
    #[arg(long)]
    backend: Option<NerBackend>,
}

impl ModelArgs {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(model) = &self.model {
            config.ner.model_id = model.clone();
        }
        if let Some(confidence) = self.confidence {
            config.ner.confidence_threshold = confidence;
        }
        if let Some(backend) = self.backend {
            config.ner.backend = backend;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one job description
    Analyze {
        /// Job description text to analyze
        #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,

        /// File containing the job description (.txt, .md, .docx)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Save the result as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also print the raw JSON result
        #[arg(short, long)]
        verbose: bool,

        #[command(flatten)]
        model: ModelArgs,
    },
    /// Analyze every matching file in a directory, or every row of a CSV file
    Batch {
        /// Directory containing job descriptions
        #[arg(required_unless_present = "csv", conflicts_with = "csv")]
        directory: Option<PathBuf>,

        /// CSV file with one job description per row
        #[arg(long)]
        csv: Option<PathBuf>,

        /// CSV column holding the job description
        #[arg(long, default_value = DEFAULT_TEXT_COLUMN)]
        text_column: String,

        /// CSV column identifying each row
        #[arg(long)]
        id_column: Option<String>,

        /// Save the records
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Format of the saved records
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// File extensions to process
        #[arg(long = "ext", value_delimiter = ',')]
        extensions: Vec<String>,

        /// Process files in parallel
        #[arg(long)]
        parallel: bool,

        /// Print the summary report
        #[arg(long)]
        summary: bool,

        #[command(flatten)]
        model: ModelArgs,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Array of full analysis records
    Json,
    /// One flat row of metrics and category counts per record
    Csv,
}

/// What a batch run reads
enum BatchInput {
    Directory {
        path: PathBuf,
        extensions: Vec<String>,
    },
    Csv {
        path: PathBuf,
        text_column: String,
        id_column: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate the effective configuration and compile the pattern table
    Check,
    /// Print the effective configuration as TOML
    Show,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;

    init_tracing(&config.logging);

    match cli.command {
        Commands::Analyze {
            text,
            file,
            output,
            verbose,
            model,
        } => {
            model.apply(&mut config);
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => jobreq_reader::read_document(&path)
                    .with_context(|| format!("Error reading file {}", path.display()))?
                    .text,
                (None, None) => bail!("Must provide either text (-t) or file (-f)"),
            };
            analyze(&config, &text, output.as_deref(), verbose)?;
        }
        Commands::Batch {
            directory,
            csv,
            text_column,
            id_column,
            output,
            format,
            extensions,
            parallel,
            summary,
            model,
        } => {
            model.apply(&mut config);
            let input = match (csv, directory) {
                (Some(path), _) => BatchInput::Csv {
                    path,
                    text_column,
                    id_column,
                },
                (None, Some(path)) => BatchInput::Directory { path, extensions },
                (None, None) => bail!("Must provide a directory or --csv"),
            };
            let output = output.map(|path| (path, format));
            batch(&config, input, output, parallel, summary)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Check => {
                let extractor = RequirementsExtractor::new(&config, None)?;
                println!("Configuration OK");
                println!("  Backend:    {:?}", config.ner.effective_backend());
                println!("  Model:      {}", config.ner.model_id);
                println!("  Confidence: {}", config.ner.confidence_threshold);
                println!("  Patterns:   {}", extractor.pattern_count());
            }
            ConfigAction::Show => {
                let mut shown = config.clone();
                if shown.ner.api_token.is_some() {
                    shown.ner.api_token = Some("<redacted>".to_string());
                }
                println!("{}", toml::to_string_pretty(&shown)?);
            }
        },
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("jobreq={0},jobreq_extractor={0},jobreq_batch={0}", logging.level).into()
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn analyze(
    config: &AppConfig,
    text: &str,
    output: Option<&Path>,
    verbose: bool,
) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        bail!("Empty job description");
    }
    config.extraction.check_length(text)?;

    let extractor = RequirementsExtractor::from_config(config)?;
    println!(
        "Using recognizer: {}",
        extractor.recognizer_name().unwrap_or("none")
    );
    println!("Confidence threshold: {}", extractor.confidence_threshold());

    let analysis = extractor.extract_requirements(text)?;
    print!("{}", display::render_analysis(&analysis));

    if verbose {
        println!("\nDETAILED ANALYSIS:");
        println!("{}", analysis.to_json_pretty()?);
    }

    if let Some(path) = output {
        std::fs::write(path, analysis.to_json_pretty()?)
            .with_context(|| format!("Error saving results to {}", path.display()))?;
        println!("\nResults saved to {}", path.display());
    }

    println!("\nAnalysis complete!");
    Ok(())
}

fn batch(
    config: &AppConfig,
    input: BatchInput,
    output: Option<(PathBuf, OutputFormat)>,
    parallel: bool,
    summary: bool,
) -> anyhow::Result<()> {
    let extractor = Arc::new(RequirementsExtractor::from_config(config)?);
    let mut processor =
        BatchProcessor::new(extractor, config.extraction.clone()).with_parallel(parallel);

    let items = match &input {
        BatchInput::Directory { path, extensions } => {
            let extensions: Vec<&str> = if extensions.is_empty() {
                DEFAULT_EXTENSIONS.to_vec()
            } else {
                extensions.iter().map(String::as_str).collect()
            };

            tracing::info!("Processing {} ({})", path.display(), extensions.join(", "));
            processor.process_directory(path, &extensions)?
        }
        BatchInput::Csv {
            path,
            text_column,
            id_column,
        } => {
            tracing::info!("Processing {} (column '{}')", path.display(), text_column);
            processor.process_csv(path, text_column, id_column.as_deref())?
        }
    };

    let unit = match input {
        BatchInput::Directory { .. } => "files",
        BatchInput::Csv { .. } => "rows",
    };
    let failed = items.iter().filter(|item| !item.is_success()).count();
    println!("Processed {} {} ({} failed)", items.len(), unit, failed);

    if let Some((path, format)) = output {
        match format {
            OutputFormat::Json => processor.save_results(&path)?,
            OutputFormat::Csv => processor.save_results_csv(&path)?,
        }
        println!("Results saved to {}", path.display());
    }

    if summary {
        match processor.summary_report() {
            Some(report) => print!("\n{}", report.report()),
            None => println!("Nothing was processed; nothing to summarize"),
        }
    }

    Ok(())
}
