//! Jotter CLI — command-line client for the Jotter note service.
//!
//! Set JOTTER_API_URL to point at the service. `jotter login` stores the
//! bearer token at JOTTER_TOKEN_FILE (default `~/.jotter/token`).

use anyhow::Context;
use clap::{Parser, Subcommand};
use jotter_api_client::ApiClient;
use jotter_cli::init_tracing;
use jotter_core::models::NoteDraft;
use jotter_core::ClientConfig;
use jotter_storage::{HttpObjectTransport, UploadFile, UploadOptions, Uploader};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "jotter", about = "Jotter note service CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the bearer token
    Login {
        /// Account name; the password is prompted
        account: String,
    },
    /// Log out and discard the stored token
    Logout,
    /// Upload a media file to object storage
    Upload {
        /// Path to the file to upload
        file: std::path::PathBuf,
    },
    /// Note operations
    Note {
        #[command(subcommand)]
        sub: NoteCommands,
    },
}

#[derive(Subcommand)]
enum NoteCommands {
    /// List notes, paginated
    List {
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "20")]
        page_size: u32,
    },
    /// Get a single note
    Get { id: i64 },
    /// Create a note
    Add {
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        cover_url: Option<String>,
        /// May be repeated
        #[arg(long = "image-url")]
        image_urls: Vec<String>,
    },
    /// Update a note's title and/or content
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note
    Delete { id: i64 },
    /// Like a note
    Like { id: i64 },
    /// Collect (bookmark) a note
    Collect { id: i64 },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env().context("Invalid configuration")?;
    let client = ApiClient::from_config(&config)?
        .with_unauthorized_hook(|| eprintln!("Session expired. Run `jotter login` again."));

    let cli = Cli::parse();

    match cli.command {
        Commands::Login { account } => {
            let password = read_password()?;
            client.login(&account, &password).await?;
            eprintln!("Logged in.");
        }
        Commands::Logout => {
            client.logout().await?;
            eprintln!("Logged out.");
        }
        Commands::Upload { file } => {
            let file = UploadFile::from_path(&file)
                .await
                .with_context(|| format!("Failed to read file: {}", file.display()))?;
            let uploader = Uploader::new(client.clone(), HttpObjectTransport::new()?);
            let options = UploadOptions::default().with_progress(|progress| {
                tracing::info!(
                    loaded = progress.loaded,
                    total = progress.total,
                    percent = progress.percent,
                    "upload progress"
                );
            });
            let outcome = uploader.upload(file, options).await?;
            print_json(&outcome)?;
        }
        Commands::Note { sub } => match sub {
            NoteCommands::List { page, page_size } => {
                print_json(&client.list_notes(page, page_size).await?)?;
            }
            NoteCommands::Get { id } => {
                print_json(&client.get_note(id).await?)?;
            }
            NoteCommands::Add {
                title,
                content,
                cover_url,
                image_urls,
            } => {
                let draft = NoteDraft {
                    title,
                    content,
                    cover_url,
                    image_urls,
                };
                let id = client.create_note(&draft).await?;
                print_json(&serde_json::json!({ "id": id }))?;
            }
            NoteCommands::Update { id, title, content } => {
                let mut patch = serde_json::Map::new();
                if let Some(title) = title {
                    patch.insert("title".to_string(), title.into());
                }
                if let Some(content) = content {
                    patch.insert("content".to_string(), content.into());
                }
                if patch.is_empty() {
                    anyhow::bail!("Nothing to update: pass --title and/or --content");
                }
                client.update_note(id, &patch.into()).await?;
                eprintln!("Updated.");
            }
            NoteCommands::Delete { id } => {
                client.delete_note(id).await?;
                eprintln!("Deleted.");
            }
            NoteCommands::Like { id } => {
                client.like_note(id).await?;
                eprintln!("Liked.");
            }
            NoteCommands::Collect { id } => {
                client.collect_note(id).await?;
                eprintln!("Collected.");
            }
        },
    }

    Ok(())
}
