//! Command-line front end for the knockout tournament engine.
//!
//! Every subcommand except `demo` works against PostgreSQL. `demo` plays a
//! throwaway tournament in memory.

mod commands;

use std::sync::Arc;

use anyhow::Error;
use knockout::{
    AccountManager, Database, DatabaseConfig, MemoryStore, Store, TournamentManager,
};
use log::info;
use pico_args::Arguments;
use serde_json::json;

use commands::{Command, parse_command};

const HELP: &str = "\
Run single-elimination tournaments and rank their players

USAGE:
  knockout [OPTIONS] <COMMAND>

COMMANDS:
  create-account     NAME              Register an account
  create-tournament  NAME              Create a tournament in draft
  join               TID AID           Register account AID in tournament TID
  run                TID               Play tournament TID to completion
  show               TID               Print a tournament with its participants and matches
  leaderboard        [--limit N]       Accounts by total points  [default: 50]
  demo               [--players N]     Play an in-memory tournament  [default: 8]

OPTIONS:
  --db-url     URL         Database connection string  [default: env DATABASE_URL]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  DATABASE_URL             PostgreSQL connection string
  DB_MAX_CONNECTIONS       Maximum pool size
  RUST_LOG                 Log filter (e.g., info, knockout=debug)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let db_url: Option<String> = pargs.opt_value_from_str("--db-url")?;
    let command = parse_command(&mut pargs)?;

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {remaining:?}");
    }

    env_logger::builder().format_target(false).init();

    let database = if command.needs_database() {
        let config = DatabaseConfig::from_env_with_url(db_url)?;
        let db = Database::new(&config).await?;
        db.health_check().await?;
        Some(db)
    } else {
        None
    };

    let store: Arc<dyn Store> = match &database {
        Some(db) => Arc::new(db.store()),
        None => Arc::new(MemoryStore::new()),
    };
    let accounts = AccountManager::new(Arc::clone(&store));
    let tournaments = TournamentManager::new(store);

    let output = execute(command, &accounts, &tournaments).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    if let Some(db) = database {
        db.close().await;
    }
    Ok(())
}

async fn execute(
    command: Command,
    accounts: &AccountManager,
    tournaments: &TournamentManager,
) -> Result<serde_json::Value, Error> {
    let value = match command {
        Command::CreateAccount { name } => json!(accounts.create_account(&name).await?),
        Command::CreateTournament { name } => {
            json!(tournaments.create_tournament(&name).await?)
        }
        Command::Join {
            tournament_id,
            account_id,
        } => json!(
            tournaments
                .join_tournament(tournament_id, account_id)
                .await?
        ),
        Command::Run { tournament_id } => json!(tournaments.run_tournament(tournament_id).await?),
        Command::Show { tournament_id } => json!({
            "tournament": tournaments.get_tournament(tournament_id).await?,
            "participants": tournaments.list_participants(tournament_id).await?,
            "matches": tournaments.list_matches(tournament_id).await?,
        }),
        Command::Leaderboard { limit } => json!(accounts.leaderboard(limit).await?),
        Command::Demo { players } => demo(players, accounts, tournaments).await?,
    };
    Ok(value)
}

async fn demo(
    players: u32,
    accounts: &AccountManager,
    tournaments: &TournamentManager,
) -> Result<serde_json::Value, Error> {
    let tournament = tournaments.create_tournament("demo").await?;
    for i in 1..=players {
        let account = accounts.create_account(&format!("player-{i}")).await?;
        tournaments.join_tournament(tournament.id, account.id).await?;
    }
    info!("Demo field of {players} registered in {}", tournament.id);

    let summary = tournaments.run_tournament(tournament.id).await?;
    Ok(json!({
        "summary": summary,
        "matches": tournaments.list_matches(tournament.id).await?,
        "leaderboard": accounts.leaderboard(players).await?,
    }))
}
