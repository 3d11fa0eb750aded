//! Bookmarks command implementation
//!
//! Each invocation is one bookmark session. Without `--subject` the session
//! is anonymous and works on the local store file; with a subject the first
//! call merges the anonymous bookmarks into PostgreSQL.

use crate::adapters::registry::RegistryClient;
use crate::adapters::store::{
    create_durable_store, create_local_store, DurableStore, MemoryDurableStore,
};
use crate::cli::exit_code_for;
use crate::config::{load_config, TourmarkConfig};
use crate::core::bookmarks::{resolve_bookmarks, BookmarkSession, SessionState};
use crate::domain::{Bookmark, Identity, PoiId, Result, TourmarkError};
use clap::{Args, Subcommand};
use std::sync::Arc;

/// Bookmarks subcommands
#[derive(Subcommand, Debug)]
pub enum BookmarksCommand {
    /// Add or remove a bookmark
    Toggle(ToggleArgs),

    /// Show whether a place is bookmarked
    Status(StatusArgs),

    /// List bookmarks
    List(ListArgs),

    /// Delete several bookmarks at once
    Delete(DeleteArgs),
}

/// Identity of the caller
#[derive(Args, Debug)]
pub struct IdentityArgs {
    /// Identity-provider subject; omit for an anonymous session
    #[arg(long, env = "TOURMARK_SUBJECT")]
    pub subject: Option<String>,
}

impl IdentityArgs {
    pub fn identity(&self) -> Identity {
        Identity::from_subject(self.subject.as_deref())
    }
}

/// Arguments for `bookmarks toggle`
#[derive(Args, Debug)]
pub struct ToggleArgs {
    /// Point of interest id
    pub id: String,

    #[command(flatten)]
    pub identity: IdentityArgs,
}

/// Arguments for `bookmarks status`
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Point of interest id
    pub id: String,

    #[command(flatten)]
    pub identity: IdentityArgs,
}

/// Arguments for `bookmarks list`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Look up each bookmark in the registry
    #[arg(long)]
    pub resolve: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub identity: IdentityArgs,
}

/// Arguments for `bookmarks delete`
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Point of interest ids
    #[arg(required = true)]
    pub ids: Vec<String>,

    #[command(flatten)]
    pub identity: IdentityArgs,
}

impl BookmarksCommand {
    /// Execute the bookmarks command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let identity = self.identity_args().identity();
        let session = match open_session(&config, &identity).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to open bookmark store");
                println!("   Error: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let code = match self.run(&config, &session, &identity).await {
            Ok(code) => code,
            Err(e) => {
                crate::log_error_with_context!(&e, "Bookmark command failed");
                println!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        Ok(report_merge(&session).await.max(code))
    }

    fn identity_args(&self) -> &IdentityArgs {
        match self {
            BookmarksCommand::Toggle(args) => &args.identity,
            BookmarksCommand::Status(args) => &args.identity,
            BookmarksCommand::List(args) => &args.identity,
            BookmarksCommand::Delete(args) => &args.identity,
        }
    }

    async fn run(
        &self,
        config: &TourmarkConfig,
        session: &BookmarkSession,
        identity: &Identity,
    ) -> Result<i32> {
        match self {
            BookmarksCommand::Toggle(args) => {
                let id = parse_id(&args.id)?;
                let outcome = session.toggle(identity, &id).await?;
                if outcome.bookmarked {
                    println!("⭐ Bookmarked {id}");
                } else {
                    println!("☆ Removed bookmark {id}");
                }
                Ok(0)
            }
            BookmarksCommand::Status(args) => {
                let id = parse_id(&args.id)?;
                if session.is_bookmarked(identity, &id).await? {
                    println!("⭐ {id} is bookmarked");
                } else {
                    println!("☆ {id} is not bookmarked");
                }
                Ok(0)
            }
            BookmarksCommand::List(args) => {
                let bookmarks = session.list_mine(identity).await?;
                if args.resolve {
                    let client = RegistryClient::new(config.registry.clone())?;
                    let resolved = resolve_bookmarks(bookmarks, &client).await?;
                    if args.json {
                        println!("{}", serde_json::to_string_pretty(&resolved)?);
                        return Ok(0);
                    }
                    for entry in &resolved {
                        let title = entry
                            .place
                            .as_ref()
                            .map(|p| p.title.as_str())
                            .unwrap_or("(not found in registry)");
                        println!("{:<12} {}", entry.bookmark.poi_id.as_str(), title);
                    }
                    if resolved.is_empty() {
                        println!("No bookmarks.");
                    }
                } else if args.json {
                    println!("{}", serde_json::to_string_pretty(&bookmarks)?);
                } else {
                    print_bookmarks(&bookmarks);
                }
                Ok(0)
            }
            BookmarksCommand::Delete(args) => {
                let ids = args
                    .ids
                    .iter()
                    .map(|raw| parse_id(raw))
                    .collect::<Result<Vec<_>>>()?;
                let deleted = session.delete_many(identity, &ids).await?;
                println!("🗑️  Deleted {deleted} of {} bookmark(s)", ids.len());
                Ok(0)
            }
        }
    }
}

/// Builds a session over the configured stores
///
/// Anonymous sessions never touch the durable store, so PostgreSQL is only
/// connected when a subject is given.
async fn open_session(config: &TourmarkConfig, identity: &Identity) -> Result<BookmarkSession> {
    let local = create_local_store(config);
    let durable: Arc<dyn DurableStore + Send + Sync> = if identity.is_established() {
        create_durable_store(config).await?
    } else {
        Arc::new(MemoryDurableStore::new())
    };
    Ok(BookmarkSession::new(durable, local, &config.bookmarks))
}

/// Prints the merge outcome, returning 1 if some ids did not make it
async fn report_merge(session: &BookmarkSession) -> i32 {
    let SessionState::Authenticated { merge, .. } = session.state().await else {
        return 0;
    };
    if merge.succeeded() > 0 {
        println!(
            "🔄 Merged anonymous bookmarks: {} new, {} already present",
            merge.merged, merge.already_present
        );
    }
    if merge.is_complete() {
        return 0;
    }
    println!("⚠️  {} bookmark(s) could not be merged:", merge.failed.len());
    for id in &merge.failed {
        println!("  - {id}");
    }
    1 // Partial success
}

fn parse_id(raw: &str) -> Result<PoiId> {
    PoiId::new(raw).map_err(TourmarkError::InvalidInput)
}

fn print_bookmarks(bookmarks: &[Bookmark]) {
    if bookmarks.is_empty() {
        println!("No bookmarks.");
        return;
    }
    for bookmark in bookmarks {
        match bookmark.created_at {
            Some(at) => println!(
                "{:<12} {}",
                bookmark.poi_id.as_str(),
                at.format("%Y-%m-%d %H:%M:%S")
            ),
            None => println!("{}", bookmark.poi_id.as_str()),
        }
    }
}
