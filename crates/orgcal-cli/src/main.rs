use clap::Parser;
use dialoguer::Confirm;
use owo_colors::{OwoColorize, Style};
use orgcal_core::db;
use orgcal_core::error::CoreError;
use orgcal_core::repository::SqliteRepository;
use orgcal_core::series::SeriesMutator;
use tracing_subscriber::EnvFilter;
use util::find_live_event;

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("ORGCAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    tracing::debug!(?config, "loaded configuration");

    // Preview never touches the database.
    if let cli::Commands::Preview(command) = cli.command {
        if let Err(e) = commands::preview::preview_series(command, &config.recurrence) {
            handle_error(e);
            std::process::exit(1);
        }
        return;
    }

    let db_pool = match db::establish_connection(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    let repository = SqliteRepository::new(db_pool);
    let mutator = SeriesMutator::with_limits(repository, config.recurrence.clone());

    let result = match cli.command {
        cli::Commands::Preview(_) => Ok(()),
        cli::Commands::Create(command) => commands::create::create_series(&mutator, command).await,
        cli::Commands::List(command) => commands::list::list_events(mutator.store(), command).await,
        cli::Commands::Edit(command) => commands::edit::edit_series(&mutator, command).await,
        cli::Commands::Delete(command) => {
            let event = match find_live_event(mutator.store(), command.id).await {
                Ok(event) => event,
                Err(e) => {
                    handle_error(e);
                    std::process::exit(1);
                }
            };

            if !command.force {
                let confirmation = Confirm::new()
                    .with_prompt(commands::delete::confirmation_prompt(&event, command.scope))
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if !confirmation {
                    println!("Deletion cancelled.");
                    return;
                }
            }
            commands::delete::delete_events(&mutator, &event, command.scope).await
        }
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.chain().find_map(|e| e.downcast_ref::<CoreError>()) {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::NotInSeries(id) => {
                eprintln!(
                    "{} Event {} is not part of a series",
                    "Error:".style(error_style),
                    id.to_string().yellow()
                );
            }
            CoreError::EmptyExpansion => {
                eprintln!(
                    "{} The recurrence rule produced no events; check the caps in your configuration",
                    "Error:".style(error_style)
                );
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
}
