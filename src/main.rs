mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use commands::consultas::ConsultaArgs;
use commands::turnos::TurnoArgs;

#[derive(Parser)]
#[command(name = "turnero")]
#[command(about = "Book salon appointments and keep client consultation notes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage appointments (turnos)
    Turnos {
        #[command(subcommand)]
        action: TurnoAction,
    },
    /// Manage client consultation notes (consultas)
    Consultas {
        #[command(subcommand)]
        action: ConsultaAction,
    },
    /// Show the active configuration
    Config,
}

#[derive(Subcommand)]
enum TurnoAction {
    /// List today's and upcoming appointments
    List {
        /// today, all-upcoming or specific-date (defaults to today, or specific-date with --date)
        #[arg(short, long)]
        scope: Option<String>,

        /// Day to show for specific-date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,

        /// Only clients whose name contains this text
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Book a new appointment (prompts for anything not given)
    New {
        #[command(flatten)]
        fields: TurnoArgs,
    },
    /// Change an existing appointment
    Edit {
        id: String,

        #[command(flatten)]
        fields: TurnoArgs,
    },
    /// Delete an appointment
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ConsultaAction {
    /// List consultation notes
    List {
        /// Only clients whose name contains this text
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Record a new consultation note (prompts for anything not given)
    New {
        #[command(flatten)]
        fields: ConsultaArgs,
    },
    /// Change an existing consultation note
    Edit {
        id: String,

        #[command(flatten)]
        fields: ConsultaArgs,
    },
    /// Delete a consultation note
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{}", format!("Error: {e:#}").red());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Turnos { action } => {
            let store = commands::open_store()?;
            match action {
                TurnoAction::List { scope, date, name } => {
                    commands::turnos::list(&store, scope.as_deref(), date.as_deref(), name).await
                }
                TurnoAction::New { fields } => commands::turnos::new(&store, fields).await,
                TurnoAction::Edit { id, fields } => {
                    commands::turnos::edit(&store, &id, fields).await
                }
                TurnoAction::Delete { id, force } => {
                    commands::delete::<turnero_core::record::Turno>(&store, &id, force).await
                }
            }
        }
        Commands::Consultas { action } => {
            let store = commands::open_store()?;
            match action {
                ConsultaAction::List { name } => commands::consultas::list(&store, name).await,
                ConsultaAction::New { fields } => commands::consultas::new(&store, fields).await,
                ConsultaAction::Edit { id, fields } => {
                    commands::consultas::edit(&store, &id, fields).await
                }
                ConsultaAction::Delete { id, force } => {
                    commands::delete::<turnero_core::record::Consulta>(&store, &id, force).await
                }
            }
        }
        Commands::Config => commands::config::run(),
    }
}
