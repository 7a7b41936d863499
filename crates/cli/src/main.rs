use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sorter_cli::protocol::{Request, Response};
use sorter_cli::{api, server};
use sorter_core::config;
use sorter_core::models::MoveRequest;
use sorter_core::Sorter;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries protocol output; logs go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;
    let sorter = Arc::new(Sorter::from_config(cfg));

    match cli.command {
        Commands::Serve => {
            let stdin = BufReader::new(tokio::io::stdin());
            server::serve(sorter, stdin, tokio::io::stdout()).await
        }
        Commands::Preview { path, out, high } => run_preview(&sorter, path, out, high).await,
        command => {
            let resp = api::handle(&sorter, command.into_request()).await;
            print_response(&resp)
        }
    }
}

#[derive(Parser)]
#[command(name = "pdf-sorter")]
#[command(about = "Preview PDFs and sort them into folders", long_about = None)]
struct Cli {
    /// Path to config file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve JSON-lines requests on stdin/stdout
    Serve,
    /// List the PDFs in a folder
    Scan {
        folder: PathBuf,
    },
    /// Print the page count of a PDF
    Pages {
        path: PathBuf,
    },
    /// Render the first page to a JPEG file
    Preview {
        path: PathBuf,
        /// Output file
        #[arg(short, long)]
        out: PathBuf,
        /// Full-resolution color render instead of the low-res grayscale one
        #[arg(long, default_value_t = false)]
        high: bool,
    },
    /// Check a destination folder, creating it if needed
    ValidateFolder {
        path: PathBuf,
    },
    /// Move a PDF into a folder, optionally keeping only its first pages
    Move {
        source: PathBuf,
        destination_folder: PathBuf,
        /// Keep only this many leading pages (requires --backup)
        #[arg(long, default_value_t = 0)]
        keep: i64,
        /// Folder that receives a full copy before splitting
        #[arg(long)]
        backup: Option<PathBuf>,
    },
    /// Reverse a move using the paths it reported
    Undo {
        sorted_path: PathBuf,
        /// Folder the document originally lived in
        #[arg(long)]
        original_folder: PathBuf,
        /// Backup copy reported by the move
        #[arg(long)]
        backup: Option<PathBuf>,
    },
    /// Open the native folder picker and print the choice
    PickFolder,
}

impl Commands {
    fn into_request(self) -> Request {
        match self {
            Commands::Scan { folder } => Request::ScanDirectory { path: folder },
            Commands::Pages { path } => Request::PageCount { path },
            Commands::ValidateFolder { path } => Request::ValidateFolder { path },
            Commands::Move {
                source,
                destination_folder,
                keep,
                backup,
            } => Request::MovePdf(MoveRequest {
                source,
                destination_folder,
                pages_to_keep: keep,
                backup_folder: backup,
            }),
            Commands::Undo {
                sorted_path,
                original_folder,
                backup,
            } => Request::Undo {
                sorted_path,
                backup_path: backup,
                original_folder,
            },
            Commands::PickFolder => Request::PickFolder,
            Commands::Serve | Commands::Preview { .. } => {
                unreachable!("handled before request dispatch")
            }
        }
    }
}

fn print_response(resp: &Response) -> Result<()> {
    if let Some(body) = &resp.body {
        println!("{}", serde_json::to_string_pretty(body)?);
    }
    if let Some(err) = &resp.error {
        eprintln!("error ({}): {}", err.kind, err.message);
    }
    if !resp.is_success() {
        bail!("request failed with status {}", resp.status);
    }
    Ok(())
}

async fn run_preview(sorter: &Sorter, path: PathBuf, out: PathBuf, high: bool) -> Result<()> {
    let jpeg = if high {
        sorter.preview_image(&path).await?
    } else {
        use base64::Engine;
        let encoded = sorter.preview(&path).await?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .context("decode cached preview")?
    };
    tokio::fs::write(&out, &jpeg)
        .await
        .with_context(|| format!("write {}", out.display()))?;
    println!("{}", out.display());
    Ok(())
}
