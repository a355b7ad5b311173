/// Tilawa - command-line recitation player
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tilawa_cli::{commands, AppConfig, AppContext};
use tilawa_core::ReciterId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tilawa")]
#[command(about = "Browse, download and play recitations", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./tilawa.toml when present)
    #[arg(short, long, global = true, env = "TILAWA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List chapters
    Chapters {
        /// Filter by number, Arabic name, transliteration or translation
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List reciters
    Reciters,
    /// Show the playlist a selection resolves to
    Playlist {
        reciter: String,
        chapter: u16,
    },
    /// Manage offline recordings
    Downloads {
        #[command(subcommand)]
        action: DownloadAction,
    },
    /// Start the interactive player
    Play {
        /// Reciter to start with
        #[arg(requires = "chapter")]
        reciter: Option<String>,
        /// Chapter to start with
        chapter: Option<u16>,
    },
}

#[derive(Subcommand)]
enum DownloadAction {
    /// List downloads grouped by reciter
    List,
    /// Save a chapter for offline playback
    Add {
        reciter: String,
        chapter: u16,
        /// Import a local file instead of downloading
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Delete a saved chapter
    Delete {
        reciter: String,
        chapter: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tilawa=info,tilawa_cli=info,tilawa_playback=info,tilawa_storage=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    config.validate()?;
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Chapters { search } => {
            commands::catalog::list_chapters(&ctx.catalog, search.as_deref());
        }
        Commands::Reciters => {
            commands::catalog::list_reciters(&ctx.catalog);
        }
        Commands::Playlist { reciter, chapter } => {
            commands::playlist::show(&ctx, &ReciterId::new(reciter), chapter).await?;
        }
        Commands::Downloads { action } => match action {
            DownloadAction::List => commands::downloads::list(&ctx).await?,
            DownloadAction::Add {
                reciter,
                chapter,
                file,
            } => {
                commands::downloads::add(&ctx, &ReciterId::new(reciter), chapter, file.as_deref())
                    .await?;
            }
            DownloadAction::Delete { reciter, chapter } => {
                commands::downloads::delete(&ctx, &ReciterId::new(reciter), chapter).await?;
            }
        },
        Commands::Play { reciter, chapter } => {
            let initial = reciter.zip(chapter).map(|(r, c)| (ReciterId::new(r), c));
            commands::play::run(&ctx, initial).await?;
        }
    }

    Ok(())
}
