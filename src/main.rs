use anyhow::Result;
use clap::{Parser, Subcommand};

use minex::cli::{
    handle_encrypt_command, handle_expense_command, handle_filter_command, handle_sort_command,
    unlock_key, EncryptCommands, ExpenseCommands, FilterCommands, SortKey,
};
use minex::config::{init_logging, MinexPaths, Settings};
use minex::storage::Storage;

#[derive(Parser)]
#[command(
    name = "minex",
    version,
    about = "Minimal personal expense tracker",
    long_about = "minex records expenses and income with labels and notes, and \
                  shows them filtered by date, labels and amount sign together \
                  with a running sum. Data can be encrypted at rest."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Expense(ExpenseCommands),

    /// Change or show the sort order
    Sort {
        /// Sort key
        #[arg(value_enum)]
        by: Option<SortKey>,
        /// Reverse the order
        #[arg(long, conflicts_with = "normal")]
        reversed: bool,
        /// Do not reverse the order
        #[arg(long)]
        normal: bool,
    },

    /// Filter management commands
    #[command(subcommand)]
    Filter(FilterCommands),

    /// Encryption management commands
    #[command(subcommand)]
    Encrypt(EncryptCommands),

    /// Show or change configuration
    Config {
        /// Currency symbol shown after amounts
        #[arg(long)]
        currency: Option<String>,
        /// Log level (off, error, warn, info, debug, trace)
        #[arg(long)]
        log_level: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = MinexPaths::new()?;
    paths.ensure_directories()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let _logger = match init_logging(&settings.log_level, &paths.log_dir()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("minex - minimal expense tracker");
            println!();
            println!("Run 'minex --help' for usage information.");
            return Ok(());
        }
    };

    match command {
        Commands::Config {
            currency,
            log_level,
        } => handle_config(&paths, &mut settings, currency, log_level)?,
        Commands::Expense(cmd) => {
            let storage = open_storage(&paths, &settings)?;
            handle_expense_command(&storage, &settings.currency_symbol, cmd)?;
        }
        Commands::Sort {
            by,
            reversed,
            normal,
        } => {
            let storage = open_storage(&paths, &settings)?;
            handle_sort_command(&storage, by, reversed, normal)?;
        }
        Commands::Filter(cmd) => {
            let storage = open_storage(&paths, &settings)?;
            handle_filter_command(&storage, cmd)?;
        }
        Commands::Encrypt(cmd) => {
            let storage = open_storage(&paths, &settings)?;
            handle_encrypt_command(&paths, &mut settings, &storage, cmd)?;
        }
    }

    Ok(())
}

/// Open the store, asking for the passphrase when it is encrypted
fn open_storage(paths: &MinexPaths, settings: &Settings) -> Result<Storage> {
    let key = if settings.is_encryption_enabled() {
        Some(unlock_key(settings)?)
    } else {
        None
    };
    Ok(Storage::open(paths, key)?)
}

fn handle_config(
    paths: &MinexPaths,
    settings: &mut Settings,
    currency: Option<String>,
    log_level: Option<String>,
) -> Result<()> {
    let changed = currency.is_some() || log_level.is_some();
    if let Some(currency) = currency {
        settings.currency_symbol = currency;
    }
    if let Some(level) = log_level {
        settings.log_level = level;
    }
    if changed {
        settings.save(paths)?;
    }

    println!("minex Configuration");
    println!("===================");
    println!("Base directory:  {}", paths.base_dir().display());
    println!("Expense store:   {}", paths.expenses_file().display());
    println!("Log directory:   {}", paths.log_dir().display());
    println!();
    println!("Settings:");
    println!("  Currency symbol:    {}", settings.currency_symbol);
    println!("  Log level:          {}", settings.log_level);
    println!("  Encryption enabled: {}", settings.is_encryption_enabled());

    Ok(())
}
