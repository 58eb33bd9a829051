use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use efta_locator::app::{App, LookupResult, OpenResult, ProgressEvent, ProgressSink};
use efta_locator::domain::Direction;
use efta_locator::error::LocatorError;
use efta_locator::output::{JsonOutput, OutputMode};
use efta_locator::probe::HttpLoader;
use efta_locator::registry::RegistryLoader;
use efta_locator::tui::Tui;
use efta_locator::urls::SearchProvider;

#[derive(Parser)]
#[command(name = "efta-locate")]
#[command(about = "Locate documents in the DOJ Epstein files disclosure by EFTA id")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    /// Path to a registry JSON file overriding the built-in dataset table.
    #[arg(long, global = true)]
    registry: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Classify a document id against the dataset ranges")]
    Lookup(IdArgs),
    #[command(about = "Construct the direct file URL for a document id")]
    Url(UrlArgs),
    #[command(about = "Open a document: probe candidate extensions until one loads")]
    Open(IdArgs),
    #[command(about = "Next document id after the given one, skipping gaps")]
    Next(IdArgs),
    #[command(about = "Previous document id before the given one, skipping gaps")]
    Prev(IdArgs),
    #[command(about = "List the dataset ranges and tabulated gaps")]
    Datasets(DatasetsArgs),
    #[command(about = "Construct an external full-text search URL")]
    Search(SearchArgs),
}

#[derive(Args)]
struct IdArgs {
    /// Document id, bare (1234) or EFTA form (EFTA00001234).
    id: String,
}

#[derive(Args)]
struct UrlArgs {
    id: String,

    #[arg(long, default_value = "pdf")]
    ext: String,
}

#[derive(Args)]
struct DatasetsArgs {
    /// Show a single dataset instead of all of them.
    #[arg(long)]
    dataset: Option<u32>,
}

#[derive(Args)]
struct SearchArgs {
    query: String,

    #[arg(long, value_enum, default_value_t = SearchProvider::SiteSearch)]
    provider: SearchProvider,
}

struct TextSink;

impl ProgressSink for TextSink {
    fn event(&self, event: ProgressEvent) {
        eprintln!("  {}", event.message);
    }
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(locator) = report.downcast_ref::<LocatorError>() {
            return ExitCode::from(map_exit_code(locator));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &LocatorError) -> u8 {
    match error {
        LocatorError::InvalidDocumentId(_)
        | LocatorError::DocumentNotFound(_)
        | LocatorError::UnknownDataset(_)
        | LocatorError::RegistryRead(_)
        | LocatorError::RegistryParse(_)
        | LocatorError::RegistryInvalid(_) => 2,
        LocatorError::ProbeClient(_) => 3,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let registry = RegistryLoader::resolve(cli.registry.as_deref())?;
    // Plain `?` keeps the concrete LocatorError downcastable in main's
    // exit-code mapping; into_diagnostic would box it away.
    let loader = HttpLoader::new()?;
    let app = App::new(registry, loader);

    match cli.command {
        Some(Commands::Lookup(args)) => {
            let result = app.lookup(&args.id);
            match output_mode {
                OutputMode::NonInteractive => JsonOutput::print_lookup(&result).into_diagnostic()?,
                OutputMode::Interactive => print_lookup(&result),
            }
        }
        Some(Commands::Url(args)) => {
            let result = app.locate_url(&args.id, &args.ext)?;
            match output_mode {
                OutputMode::NonInteractive => JsonOutput::print_url(&result).into_diagnostic()?,
                OutputMode::Interactive => match (&result.url, &result.dataset_page_url) {
                    (Some(url), Some(page)) => {
                        println!("{url}");
                        println!("dataset page: {page}");
                    }
                    _ => println!("{} is not in any released dataset", result.document_id),
                },
            }
        }
        Some(Commands::Open(args)) => {
            let result = match output_mode {
                OutputMode::NonInteractive => {
                    let result = app.open(&args.id, &JsonOutput)?;
                    JsonOutput::print_open(&result).into_diagnostic()?;
                    result
                }
                OutputMode::Interactive => {
                    let result = app.open(&args.id, &TextSink)?;
                    print_open(&result);
                    result
                }
            };
            if !result.loaded {
                // Distinct from "not found": the folder resolved but no
                // candidate extension produced a loadable resource.
                return Err(miette::Report::msg(format!(
                    "{} did not load under any candidate extension",
                    result.document_id
                )));
            }
        }
        Some(Commands::Next(args)) => {
            let result = app.navigate(&args.id, Direction::Forward)?;
            match output_mode {
                OutputMode::NonInteractive => {
                    JsonOutput::print_navigate(&result).into_diagnostic()?
                }
                OutputMode::Interactive => print_navigate(result.to.as_deref(), "forward"),
            }
        }
        Some(Commands::Prev(args)) => {
            let result = app.navigate(&args.id, Direction::Backward)?;
            match output_mode {
                OutputMode::NonInteractive => {
                    JsonOutput::print_navigate(&result).into_diagnostic()?
                }
                OutputMode::Interactive => print_navigate(result.to.as_deref(), "backward"),
            }
        }
        Some(Commands::Datasets(args)) => {
            let result = app.datasets(args.dataset)?;
            match output_mode {
                OutputMode::NonInteractive => {
                    JsonOutput::print_datasets(&result).into_diagnostic()?
                }
                OutputMode::Interactive => {
                    for dataset in &result.datasets {
                        println!(
                            "{}  {} - {}  ({} files, {})",
                            dataset.name,
                            dataset.first_id,
                            dataset.last_id,
                            dataset.file_count,
                            dataset.size_label
                        );
                    }
                    for gap in &result.gaps {
                        println!(
                            "gap        {} - {}  (try datasets {:?})",
                            gap.first_id, gap.last_id, gap.candidates
                        );
                    }
                }
            }
        }
        Some(Commands::Search(args)) => {
            let result = app.search(args.provider, &args.query);
            match output_mode {
                OutputMode::NonInteractive => JsonOutput::print_search(&result).into_diagnostic()?,
                OutputMode::Interactive => println!("{}", result.url),
            }
        }
        None => {
            let mut tui = Tui::new();
            tui.run(app)?;
        }
    }

    Ok(())
}

fn print_lookup(result: &LookupResult) {
    println!("{}", result.message);
    if let Some(dataset) = &result.dataset {
        println!("dataset page: {}", dataset.external_url);
    }
    if let Some(candidates) = &result.gap_candidates {
        println!("worth trying, in order: datasets {candidates:?}");
    }
}

fn print_open(result: &OpenResult) {
    for attempt in &result.attempts {
        let mark = if attempt.loaded { "ok" } else { "timeout" };
        println!("  .{:<5} {:>7}  {}", attempt.extension, mark, attempt.url);
    }
    if result.loaded {
        if let Some(url) = &result.url {
            println!("{url}");
        }
    }
}

fn print_navigate(to: Option<&str>, direction: &str) {
    match to {
        Some(id) => println!("{id}"),
        None => println!("no further document in the {direction} direction"),
    }
}
