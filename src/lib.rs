mod adapter;
mod application;
mod domain;
mod infrastructure;

use clap::Parser;

use adapter::cli::{commands, Cli, CliState, Commands, DynPrescriptionRepository};
use infrastructure::config::{self, UserSettings};
use infrastructure::logging;
use infrastructure::persistence;

/// Wire repositories and services over one SQLite connection.
fn init_state(db_path: &std::path::Path, settings: UserSettings) -> anyhow::Result<CliState> {
    let db = persistence::sqlite::init_database(db_path)?;

    use persistence::sqlite::SqlitePrescriptionRepository;

    let prescription_repo: DynPrescriptionRepository =
        Box::new(SqlitePrescriptionRepository::new(db.clone()));
    let lexicon_repo: DynPrescriptionRepository =
        Box::new(SqlitePrescriptionRepository::new(db.clone()));
    let export_repo: DynPrescriptionRepository =
        Box::new(SqlitePrescriptionRepository::new(db.clone()));
    let receipt_repo: DynPrescriptionRepository = Box::new(SqlitePrescriptionRepository::new(db));

    Ok(CliState::new(
        prescription_repo,
        lexicon_repo,
        export_repo,
        receipt_repo,
        settings,
    ))
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // File logging only in release builds
    logging::setup(cli.verbose, !cfg!(debug_assertions));

    config::init();

    match cli.command {
        // Settings and printer commands work without touching the database
        Commands::Printers => commands::printers(),
        Commands::Config { action } => commands::config(action),
        command => {
            let settings = config::settings().clone();
            let db_path = cli
                .db
                .unwrap_or_else(|| settings.effective_database_path());
            let state = init_state(&db_path, settings)?;

            match command {
                Commands::Add(args) => commands::add(&state, args),
                Commands::List { pattern, limit } => commands::list(&state, pattern, limit),
                Commands::Show { id, receipt } => commands::show(&state, &id, receipt),
                Commands::Delete { id, yes } => commands::delete(&state, &id, yes),
                Commands::Print {
                    id,
                    printer,
                    no_dispatch,
                } => commands::print(&state, &id, printer, no_dispatch),
                Commands::Export { path, format } => commands::export(&state, &path, &format),
                Commands::Suggest {
                    filter,
                    category,
                    limit,
                } => commands::suggest(&state, &category, filter, limit),
                // Handled above
                Commands::Printers | Commands::Config { .. } => Ok(()),
            }
        }
    }
}
