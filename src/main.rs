//! documind CLI entry point

use clap::{Parser, Subcommand};
use documind::{
    backend::HttpBackend,
    commands::{
        cmd_ask, cmd_chat, cmd_init, cmd_list_documents, cmd_remove_document, cmd_status,
        cmd_upload, print_ask, print_documents, print_init, print_remove, print_status,
        print_upload,
    },
    config::Config,
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "documind")]
#[command(version, about = "Chat with your documents from the command line", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize documind configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Upload a document (.pdf or .txt)
    Upload {
        /// Path to the document
        file: PathBuf,
    },

    /// List uploaded documents
    Documents,

    /// Remove a document and its index data
    Remove {
        /// Document id (use 'documind documents' to list)
        id: i64,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Ask a one-shot question
    Ask {
        /// The question
        question: String,

        /// Restrict the answer to one document id
        #[arg(short, long)]
        doc: Option<i64>,
    },

    /// Start an interactive chat session
    Chat,

    /// Show backend status
    Status,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Handle init command specially (doesn't need an existing config)
    if let Commands::Init { force } = cli.command {
        let base_dir = cli.config.map(|path| {
            if path.extension().map_or(false, |ext| ext == "toml") {
                path.parent()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("."))
            } else {
                path
            }
        });
        let config = cmd_init(base_dir, force).await?;
        print_init(&config);
        return Ok(());
    }

    // Load configuration and build the backend client
    let config = load_config(cli.config.as_deref())?;
    let backend = HttpBackend::new(&config)?;

    match cli.command {
        Commands::Init { .. } => unreachable!(),

        Commands::Upload { file } => {
            let outcome = cmd_upload(&backend, &file).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_upload(&outcome);
            }
        }

        Commands::Documents => {
            let documents = cmd_list_documents(&backend).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&documents)?);
            } else {
                print_documents(&documents);
            }
        }

        Commands::Remove { id, yes } => {
            if !yes {
                eprintln!("⚠️  This will delete the document and its index data!");
                eprintln!("Run with --yes to confirm.");
                std::process::exit(1);
            }

            let removed = cmd_remove_document(&backend, id).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&removed)?);
            } else {
                print_remove(&removed);
            }
        }

        Commands::Ask { question, doc } => {
            let outcome = cmd_ask(&backend, &question, doc).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_ask(&outcome);
            }
        }

        Commands::Chat => {
            cmd_chat(&config, Box::new(backend)).await?;
        }

        Commands::Status => {
            let status = cmd_status(&config, &backend).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_from(None)?,
    };
    Ok(config)
}
