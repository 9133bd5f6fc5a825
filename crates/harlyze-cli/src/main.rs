use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use harlyze_cli::{OutputFormat, commands};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "harlyze")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A CLI tool for measuring page performance from HTTP Archive (HAR) files",
    long_about = "Harlyze reads HAR captures and reports per-page timings, asset load times \
                  and sizes, and aggregates those metrics across repeated test runs."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(
        short,
        long,
        global = true,
        value_enum,
        default_value = "pretty",
        env = "HARLYZE_FORMAT"
    )]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Report performance metrics for every page in a HAR file
    Pages {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of slowest requests to list per page
        #[arg(long, default_value_t = 5)]
        top: usize,
    },

    /// List the entries of one page that match every given criterion
    Filter {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page id ("unknown" selects entries without a page)
        #[arg(short, long)]
        page: String,

        /// Filter by request method (GET, POST, .*ST)
        #[arg(long)]
        method: Option<String>,

        /// Filter by response MIME type (image.*, .*javascript)
        #[arg(long)]
        content_type: Option<String>,

        /// Filter by status code (200, 3.*)
        #[arg(long)]
        status: Option<String>,

        /// Filter by response HTTP version
        #[arg(long)]
        http_version: Option<String>,

        /// Only keep entries that took at least this many milliseconds
        #[arg(long, value_name = "MS")]
        min_time: Option<f64>,

        /// Compare values exactly instead of as regular expressions
        #[arg(long)]
        exact: bool,
    },

    /// Aggregate page metrics across several recordings of the same page
    Aggregate {
        /// Paths to the HAR files, one per run
        #[arg(value_name = "FILE", required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Only aggregate pages with this id
        #[arg(short, long)]
        page: Option<String>,

        /// Decimal places kept in means and deviations
        #[arg(long, default_value_t = 0, env = "HARLYZE_PRECISION")]
        precision: u32,
    },

    /// Generate shell completion scripts
    #[command(long_about = "Generate shell completion scripts for harlyze.

SUPPORTED SHELLS:
  bash, zsh, fish, powershell, elvish

INSTALLATION:
  bash:  harlyze completion --shell bash >> ~/.bashrc
  zsh:   harlyze completion --shell zsh > ~/.zfunc/_harlyze
         (add `fpath+=~/.zfunc` to ~/.zshrc)
  fish:  harlyze completion --shell fish > ~/.config/fish/completions/harlyze.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match cli.command {
        Commands::Pages { file, top } => commands::pages::execute(&file, top, cli.format),
        Commands::Filter {
            file,
            page,
            method,
            content_type,
            status,
            http_version,
            min_time,
            exact,
        } => {
            let criteria = commands::filter::build_criteria(
                method,
                content_type,
                status,
                http_version,
                min_time,
                exact,
            );
            commands::filter::execute(&file, &page, &criteria, cli.format)
        }
        Commands::Aggregate {
            files,
            page,
            precision,
        } => commands::aggregate::execute(&files, page, precision, cli.format),
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command())
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("harlyze=debug,harlyze_cli=debug,harlyze_core=debug")
    } else {
        EnvFilter::new("harlyze=info,harlyze_cli=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
