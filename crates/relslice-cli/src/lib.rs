mod subcommands;

use clap::{ArgMatches, Command};
use relslice_core::Settings;

pub use subcommands::*;

pub fn get_subcommands() -> Vec<Command> {
    vec![
        print_schema::cli(),
        clone_schema::cli(),
        clear_schema::cli(),
        clone_data::cli(),
        clear_data::cli(),
    ]
}

pub async fn exec_subcommand(settings: Settings, cmd: &str, args: &ArgMatches) -> Result<(), anyhow::Error> {
    match cmd {
        "print-schema" => print_schema::exec(settings, args).await,
        "clone-schema" => clone_schema::exec(settings, args).await,
        "clear-schema" => clear_schema::exec(settings, args).await,
        "clone-data" => clone_data::exec(settings, args).await,
        "clear-data" => clear_data::exec(settings, args).await,
        unknown => Err(anyhow::anyhow!("Invalid subcommand: {}", unknown)),
    }
}
