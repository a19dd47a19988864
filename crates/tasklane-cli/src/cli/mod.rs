//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tasklane_core::config;
use tasklane_core::logging;
use tasklane_core::platform::Platform;
use tasklane_core::tasks::Category;

mod commands;

#[derive(Parser)]
#[command(name = "tasklane")]
#[command(version)]
#[command(about = "Personal task list with accounts, in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding accounts, session and tasks (overrides config)
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage the account and session
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },
    /// Manage the signed-in user's tasks
    Tasks {
        #[command(subcommand)]
        command: TaskCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

/// Email and password, shared by register and login.
#[derive(clap::Args)]
struct CredentialArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "TASKLANE_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(clap::Subcommand)]
enum AccountCommands {
    /// Create an account and sign in
    Register(CredentialArgs),
    /// Sign in with email and password
    Login(CredentialArgs),
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Send a password reset email
    ResetPassword {
        #[arg(long)]
        email: String,
    },
}

#[derive(clap::Subcommand)]
enum TaskCommands {
    /// List tasks in creation order
    List,
    /// Add a task
    Add {
        /// Task text
        #[arg(value_name = "TEXT")]
        text: String,
        /// work, study or personal (default from config)
        #[arg(long)]
        category: Option<Category>,
    },
    /// Mark a task completed, or pending again
    Toggle {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Remove a task
    #[command(alias = "remove")]
    Rm {
        #[arg(value_name = "ID")]
        id: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, data_dir } = cli;

    if let Some(Commands::Config { command }) = &command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        };
    }

    let mut config = config::Config::load().context("load config")?;
    if data_dir.is_some() {
        config.data_dir = data_dir;
    }
    let _log_guard = logging::init_file_logging(&config).context("init logging")?;

    let data_dir = config.data_dir();
    let platform = Platform::open_local(&data_dir)
        .with_context(|| format!("open data directory {}", data_dir.display()))?;

    // default to the interactive app
    let Some(command) = command else {
        return commands::tui::run(&config, platform).await;
    };

    match command {
        // handled before the platform is opened
        Commands::Config { .. } => Ok(()),
        Commands::Account { command } => match command {
            AccountCommands::Register(args) => {
                commands::account::register(&platform, &args.email, &args.password).await
            }
            AccountCommands::Login(args) => {
                commands::account::login(&platform, &args.email, &args.password).await
            }
            AccountCommands::Logout => commands::account::logout(&platform).await,
            AccountCommands::Whoami => commands::account::whoami(&platform),
            AccountCommands::ResetPassword { email } => {
                commands::account::reset_password(&platform, &email).await
            }
        },
        Commands::Tasks { command } => match command {
            TaskCommands::List => commands::tasks::list(&platform).await,
            TaskCommands::Add { text, category } => {
                let category = category.unwrap_or(config.ui.default_category);
                commands::tasks::add(&platform, &text, category).await
            }
            TaskCommands::Toggle { id } => commands::tasks::toggle(&platform, &id).await,
            TaskCommands::Rm { id } => commands::tasks::remove(&platform, &id).await,
        },
    }
}
