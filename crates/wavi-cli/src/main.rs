use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use wavi_core::Config;

mod commands;
mod common;

#[derive(Parser)]
#[command(name = "wavi-cli", version, about = "WAVI habit tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login, logout and account recovery
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Create an account
    Signup {
        #[command(subcommand)]
        action: commands::signup::SignupAction,
    },
    /// Show today's habits
    Today {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Keep today's list open and report expiries as they happen
    Watch,
    /// Habit management
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Record the outcome of a habit for today
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Describe a habit in your own words and let WAVI draft it
    Chat,
    /// Daily summary and server-generated reports
    Report {
        #[command(subcommand)]
        action: commands::report::ReportAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    common::init_logging(&config);

    let result = match cli.command {
        Commands::Auth { action } => commands::auth::run(action, &config),
        Commands::Signup { action } => commands::signup::run(action, &config),
        Commands::Today { json } => commands::today::run(json, &config),
        Commands::Watch => commands::today::watch(&config),
        Commands::Habit { action } => commands::habit::run(action, &config),
        Commands::Log { action } => commands::log::run(action, &config),
        Commands::Chat => commands::chat::run(&config),
        Commands::Report { action } => commands::report::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "wavi-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
