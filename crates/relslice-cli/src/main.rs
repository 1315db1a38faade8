use clap::Command;
use relslice_cli::{exec_subcommand, get_subcommands};
use relslice_core::Settings;

#[tokio::main]
async fn main() {
    let settings = Settings::load();
    let _logging_guard = relslice_core::init_tracing(&settings);

    let matches = get_command().get_matches();
    let (cmd, subcommand_args) = matches.subcommand().expect("subcommand_required is set");

    if let Err(error) = exec_subcommand(settings, cmd, subcommand_args).await {
        tracing::error!(error = format!("{error:#}"), "{cmd} failed");
        std::process::exit(1);
    }
}

fn get_command() -> Command {
    Command::new("relslice")
        .about("Traverse a Postgres foreign-key graph from seed rows and copy the reachable subset into another database")
        .args_conflicts_with_subcommands(true)
        .subcommand_required(true)
        .subcommands(get_subcommands())
        .help_expected(true)
}
