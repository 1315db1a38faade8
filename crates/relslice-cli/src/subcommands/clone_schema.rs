use clap::{Arg, ArgMatches};
use relslice_core::Settings;

pub fn cli() -> clap::Command {
    clap::Command::new("clone-schema")
        .about("Recreate a source database's bare schema shape on a target database")
        .arg(Arg::new("source-db").long("source-db").required(true))
        .arg(Arg::new("target-db").long("target-db").required(true))
}

pub async fn exec(settings: Settings, args: &ArgMatches) -> anyhow::Result<()> {
    let source_db = args.get_one::<String>("source-db").expect("--source-db is required");
    let target_db = args.get_one::<String>("target-db").expect("--target-db is required");

    relslice_core::clone_schema_command(source_db, target_db, &settings.source_schema).await?;
    Ok(())
}
