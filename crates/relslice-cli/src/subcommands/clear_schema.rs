use clap::{Arg, ArgMatches};
use relslice_core::Settings;

pub fn cli() -> clap::Command {
    clap::Command::new("clear-schema")
        .about("Drop and recreate a schema on a database, leaving it empty")
        .arg(Arg::new("db").long("db").required(true))
        .arg(Arg::new("schema").long("schema").default_value("public"))
}

pub async fn exec(_settings: Settings, args: &ArgMatches) -> anyhow::Result<()> {
    let db = args.get_one::<String>("db").expect("--db is required");
    let schema = args.get_one::<String>("schema").expect("has a default value");

    relslice_core::clear_schema(db, schema).await?;
    Ok(())
}
