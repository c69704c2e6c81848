use anyhow::Result;
use clap::Parser;
use rolas_etl::Config;
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "rolas", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/rolas/rolas.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Catalog the MP3 files of a music directory
    ///
    /// Recursively walks the directory and, for each audio file:
    ///
    /// - Reads embedded tags (title, artist, album, year, genre, track number)
    /// - Fills absent values: "Unknown" for title, artist and genre, the
    ///   containing directory's name for the album, the current year, track 1
    /// - Adds the performer and album if not yet known, then the track
    ///
    /// Files already in the catalog (same path) are skipped, so mining the
    /// same directory again only picks up new files. Files whose tags cannot
    /// be read are reported and skipped.
    Mine {
        /// Path to the music directory (default: configured music_dir)
        path: Option<PathBuf>,
    },
    /// Search the catalog with a filter expression
    ///
    /// The expression is a comma-separated list of key:value pairs:
    ///
    ///   p:<performer>  a:<album>  c:<title>  g:<genre>  y:<year>
    ///
    /// All pairs must match; year is exact, the rest are case-insensitive
    /// substrings. Without any recognized key the whole expression is
    /// searched in title, performer, album, genre, year and track.
    ///
    /// Example: rolas search "p:Beatles, y:1969"
    Search {
        /// The filter expression (empty lists every track)
        expression: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every cataloged track
    List {
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show catalog statistics
    Status,
    /// Inspect and edit the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Create the config file with defaults
    Init,
    /// Print an example config file
    Example,
    /// Set a value in the config file
    Set {
        /// database_path or music_dir
        key: String,
        value: String,
    },
}

fn init_logging(config: &Config) {
    if let Err(e) = twyg::setup(config.logging.clone()) {
        eprintln!("Failed to set up logging: {e}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_with_overrides(cli.db)?;
    init_logging(&config);
    log::debug!("Using database {}", config.database_path.display());

    match cli.command {
        Commands::Mine { path } => {
            let music_dir = path.unwrap_or_else(|| config.music_dir.clone());
            commands::run_mine(&config, music_dir).await?;
        }
        Commands::Search { expression, json } => {
            commands::run_search(&config.database_path, &expression, json)?;
        }
        Commands::List { json } => {
            commands::run_list(&config.database_path, json)?;
        }
        Commands::Status => {
            commands::show_status(&config.database_path)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Path => commands::config::show_path(),
            ConfigAction::Init => commands::config::init_config()?,
            ConfigAction::Example => commands::config::show_example(),
            ConfigAction::Set { key, value } => commands::config::set_config(&key, &value)?,
        },
    }

    Ok(())
}
