use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledger_bot::cli::{handle_category_command, handle_report_command, run_chat, CategoryCommands};
use ledger_bot::config::{LedgerPaths, Settings};
use ledger_bot::conversation::{ConversationEngine, Sender};
use ledger_bot::dispatch::Dispatcher;
use ledger_bot::models::DEFAULT_TAXONOMY;
use ledger_bot::services::TaxonomyService;
use ledger_bot::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "ledger-bot",
    version,
    about = "Conversational expense and income ledger",
    long_about = "ledger-bot records expenses and income through a short chat \
                  dialogue, keeps a two-level category taxonomy, and produces \
                  monthly summaries. Data lives in two CSV tables."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Talk to the bot on stdin/stdout
    Chat {
        /// Chat user id
        #[arg(long, default_value_t = 0)]
        user_id: i64,
        /// Name recorded as the author of transactions
        #[arg(long, env = "USER", default_value = "local")]
        name: String,
    },

    /// Print the report for one month
    Report {
        /// Month as YYYY-MM
        month: String,
    },

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Create the data directory, settings and default categories
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledger_bot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let storage = Arc::new(Storage::open(&paths)?);

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing ledger-bot at: {}", paths.base_dir().display());
            let outcome = initialize_storage(&storage)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            if outcome.taxonomy_seeded {
                println!();
                println!("Default categories have been created:");
                for (category, subcategories) in DEFAULT_TAXONOMY {
                    println!("  - {} ({})", category, subcategories.join(", "));
                }
            }
            println!();
            println!("Run 'ledger-bot category list' to see all categories.");
        }
        Some(Commands::Config) => {
            println!("ledger-bot Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Initialized:      {}", paths.is_initialized());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Categories table: {}", paths.categories_file().display());
            println!("Ledger table:     {}", paths.ledger_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:       {}", settings.currency_symbol);
            println!("  Enforce unique names:  {}", settings.enforce_unique_names);
            println!("  Allowed users:         {:?}", settings.allowed_users);
            println!("  Spam keywords:         {}", settings.spam_keywords.len());
        }
        Some(Commands::Chat { user_id, name }) => {
            let taxonomy = open_taxonomy(&storage, &settings)?;
            let engine = ConversationEngine::new(storage, taxonomy)
                .with_currency(settings.currency_symbol.clone());
            let dispatcher = Dispatcher::from_settings(engine, &settings);
            let sender = Sender::new(user_id, name);

            info!(user = %sender.id, "Chat session started");
            run_chat(&dispatcher, &sender, io::stdin().lock(), &mut io::stdout())?;
        }
        Some(Commands::Report { month }) => {
            initialize_storage(&storage)?;
            handle_report_command(&storage, &month, &settings.currency_symbol)?;
        }
        Some(Commands::Category(cmd)) => {
            let taxonomy = open_taxonomy(&storage, &settings)?;
            handle_category_command(&taxonomy, cmd)?;
        }
        None => {
            println!("ledger-bot - Conversational expense and income ledger");
            println!();
            println!("Run 'ledger-bot --help' for usage information.");
            println!("Run 'ledger-bot chat' to start a conversation.");
        }
    }

    Ok(())
}

/// Seed the tables if needed and build the taxonomy service over them
fn open_taxonomy(storage: &Arc<Storage>, settings: &Settings) -> Result<Arc<TaxonomyService>> {
    initialize_storage(storage)?;
    Ok(Arc::new(TaxonomyService::new(
        Arc::clone(storage),
        settings.enforce_unique_names,
    )))
}
