//! ISA-95 CLI: the `isa95` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    match cli.command {
        Commands::Levels { json } => commands::levels::run(json),

        Commands::Types { kind, json } => commands::types::run(kind, json),

        Commands::CheckSubtype {
            candidate,
            base,
            json,
        } => commands::check_subtype::run(candidate, base, json),

        Commands::Attach {
            category,
            browse_name,
            data_type,
            type_definition,
            value,
            modelling_rule,
            parent_type,
            subtype_policy,
            field_collision,
            json,
        } => commands::attach::run(commands::attach::Args {
            config,
            category,
            browse_name,
            data_type,
            type_definition,
            value,
            modelling_rule,
            parent_type,
            subtype_policy,
            field_collision,
            json,
        }),
    }
}
