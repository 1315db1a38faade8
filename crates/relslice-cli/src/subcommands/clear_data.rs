use clap::{Arg, ArgMatches};
use relslice_core::Settings;

pub fn cli() -> clap::Command {
    clap::Command::new("clear-data")
        .about("Delete every row of every table on a database, children before parents")
        .arg(Arg::new("db").long("db").required(true))
}

pub async fn exec(settings: Settings, args: &ArgMatches) -> anyhow::Result<()> {
    let db = args.get_one::<String>("db").expect("--db is required");

    relslice_core::clear_data(db, &settings.source_schema).await?;
    Ok(())
}
