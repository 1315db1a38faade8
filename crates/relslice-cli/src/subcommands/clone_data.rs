use clap::{Arg, ArgMatches};
use relslice_core::{Settings, WalkerKind, WriterKind};

pub fn cli() -> clap::Command {
    clap::Command::new("clone-data")
        .about("Traverse the foreign-key graph from a rule file's source rows and copy the reachable subset into the target database")
        .arg(Arg::new("source-db").long("source-db").required(true))
        .arg(Arg::new("target-db").long("target-db").required(true))
        .arg(Arg::new("rule-path").long("rule-path").required(true))
        .arg(
            Arg::new("walker")
                .long("walker")
                .default_value("data_walker_sync")
                .help("table_walker | data_walker_sync | data_walker_async"),
        )
        .arg(
            Arg::new("writer")
                .long("writer")
                .default_value("single_data_via_FDW_sync")
                .help("to_file | single_data_via_FDW_sync | batch_of_data_via_FDW_sync | via_FDW_async"),
        )
}

pub async fn exec(mut settings: Settings, args: &ArgMatches) -> anyhow::Result<()> {
    let source_db = args.get_one::<String>("source-db").expect("--source-db is required");
    let target_db = args.get_one::<String>("target-db").expect("--target-db is required");
    let rule_path = args.get_one::<String>("rule-path").expect("--rule-path is required");

    let walker: WalkerKind = args
        .get_one::<String>("walker")
        .expect("has a default value")
        .parse()
        .map_err(|error: String| anyhow::anyhow!(error))?;
    let writer: WriterKind = args
        .get_one::<String>("writer")
        .expect("has a default value")
        .parse()
        .map_err(|error: String| anyhow::anyhow!(error))?;

    settings.override_source_dsn(source_db)?;
    settings.override_target_dsn(target_db)?;

    relslice_core::clone_data(&settings, rule_path, walker, writer).await?;
    Ok(())
}
