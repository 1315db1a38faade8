use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches};
use relslice_core::Settings;

pub fn cli() -> clap::Command {
    clap::Command::new("print-schema")
        .about("Reflect a database's schema and render it as a PlantUML diagram")
        .arg(Arg::new("db").long("db").required(true).help("Connection string of the database to reflect"))
        .arg(
            Arg::new("table")
                .long("table")
                .action(ArgAction::Append)
                .help("Restrict the diagram to this table and everything reachable from it (repeatable)"),
        )
        .arg(Arg::new("output").long("output").help("File to write the diagram to, instead of stdout"))
}

pub async fn exec(settings: Settings, args: &ArgMatches) -> anyhow::Result<()> {
    let db = args.get_one::<String>("db").expect("--db is required");
    let tables: Vec<String> = args.get_many::<String>("table").map(|v| v.cloned().collect()).unwrap_or_default();
    let output = args.get_one::<String>("output").map(PathBuf::from);

    relslice_core::print_schema(db, &settings.source_schema, &tables, output.as_deref()).await?;
    Ok(())
}
