use std::sync::Arc;

use tracing::info;

use relslice_db::{
    begin_pool, commit_pool, rollback_pool, ConnectionPool, DatabaseSession, Dsn, IsolationLevel,
};
use relslice_fdw::{build_tableoid_map, connect_as_fdw, drop_fdw, FdwConfig};
use relslice_rules::{RuleSet, SourceRules};
use relslice_schema::{reflect_catalog, resolve_rules, Catalog};
use relslice_traversal::{ConcurrentDataGraphWalker, DataGraphWalker, TableGraphWalker};
use relslice_writers::{BatchEdgeFdwWriter, ConcurrentSingleRowFdwWriter, DataWriter, FileWriter, SingleRowFdwWriter};

use crate::compatibility::{is_compatible, WalkerKind, WriterKind};
use crate::config::Settings;
use crate::error::CoreError;
use crate::session::connect_one;

/// Runs one `clone-data` transfer: loads the rule file, reflects the source catalog,
/// checks the requested walker/writer pair is a valid combination, then wires up the
/// connections each needs and drives the walk to completion.
///
/// Mirrors `DataManager.start_cloning_data`'s sequencing: compatibility is checked
/// before any database connection beyond catalog reflection is opened, so a bad
/// `--walker`/`--writer` pair fails immediately instead of partway through a transfer.
pub async fn clone_data(settings: &Settings, rule_path: &str, walker: WalkerKind, writer: WriterKind) -> Result<(), CoreError> {
    if !is_compatible(walker, writer) {
        return Err(CoreError::IncompatibleWalkerWriter {
            walker: walker.to_string(),
            writer: writer.to_string(),
        });
    }

    let rule_set = RuleSet::load(rule_path)?;

    let reflect_client = connect_one(&settings.source_database_dsn()).await?;
    let catalog = reflect_catalog(&reflect_client, &[settings.source_schema.clone()]).await?;
    drop(reflect_client);

    for table_name in rule_set.source_rules.tables() {
        catalog.table_by_name(table_name)?;
    }

    let resolved = resolve_rules(&rule_set, &catalog)?;
    let catalog = Arc::new(catalog);

    let source_pool_size = match walker {
        WalkerKind::TableWalker | WalkerKind::DataWalkerSync => 1,
        WalkerKind::DataWalkerAsync => settings.connection_pool_size,
    };
    let source_pool = ConnectionPool::connect(&settings.source_database_dsn(), source_pool_size).await?;
    begin_pool(&source_pool, IsolationLevel::RepeatableRead, true).await?;

    let outcome = run_walk(settings, &catalog, &resolved, &rule_set.source_rules, &source_pool, walker, writer).await;

    match &outcome {
        Ok(()) => {
            commit_pool(&source_pool).await?;
            info!(%walker, %writer, "clone-data run committed");
        }
        Err(_) => {
            rollback_pool(&source_pool).await?;
        }
    }
    outcome
}

async fn run_walk(
    settings: &Settings,
    catalog: &Arc<Catalog>,
    resolved: &relslice_schema::ResolvedRules,
    source_rules: &SourceRules,
    source_pool: &ConnectionPool,
    walker: WalkerKind,
    writer: WriterKind,
) -> Result<(), CoreError> {
    match writer {
        WriterKind::ToFile => {
            let file_writer = FileWriter;
            run_with_walker(catalog, resolved, source_rules, source_pool, walker, &file_writer).await
        }
        WriterKind::BatchOfDataViaFdwSync => {
            let fdw_config = build_fdw_config(settings)?;
            bootstrap_fdw_bridge(settings, &fdw_config).await?;
            let target_pool = ConnectionPool::connect(&settings.target_database_dsn(), 1).await?;
            begin_pool(&target_pool, IsolationLevel::ReadCommitted, false).await?;

            let target = DatabaseSession::acquire(&target_pool).await;
            let batch_writer = BatchEdgeFdwWriter::new(target, Arc::clone(catalog), settings.target_schema.clone(), settings.remote_schema.clone());
            let result = run_with_walker(catalog, resolved, source_rules, source_pool, walker, &batch_writer).await;
            batch_writer.into_session().release().await;

            finish_target(&target_pool, &fdw_config, settings, result).await
        }
        WriterKind::SingleDataViaFdwSync => {
            let fdw_config = build_fdw_config(settings)?;
            bootstrap_fdw_bridge(settings, &fdw_config).await?;
            let target_pool = ConnectionPool::connect(&settings.target_database_dsn(), 1).await?;
            begin_pool(&target_pool, IsolationLevel::ReadCommitted, false).await?;

            let target = DatabaseSession::acquire(&target_pool).await;
            let tableoid_map = {
                let source = DatabaseSession::acquire(source_pool).await;
                let map = build_tableoid_map(&source, &target, &settings.source_schema).await?;
                source.release().await;
                map
            };
            let single_writer = SingleRowFdwWriter::new(target, Arc::clone(catalog), tableoid_map, settings.target_schema.clone(), settings.remote_schema.clone());
            let result = run_with_walker(catalog, resolved, source_rules, source_pool, walker, &single_writer).await;
            single_writer.into_session().release().await;

            finish_target(&target_pool, &fdw_config, settings, result).await
        }
        WriterKind::ViaFdwAsync => {
            let fdw_config = build_fdw_config(settings)?;
            bootstrap_fdw_bridge(settings, &fdw_config).await?;
            let target_pool = Arc::new(ConnectionPool::connect(&settings.target_database_dsn(), settings.connection_pool_size).await?);
            begin_pool(&target_pool, IsolationLevel::ReadCommitted, false).await?;

            let tableoid_map = {
                let target = DatabaseSession::acquire(&target_pool).await;
                let source = DatabaseSession::acquire(source_pool).await;
                let map = build_tableoid_map(&source, &target, &settings.source_schema).await?;
                source.release().await;
                target.release().await;
                map
            };
            let concurrent_writer = ConcurrentSingleRowFdwWriter::new(
                Arc::clone(&target_pool),
                Arc::clone(catalog),
                tableoid_map,
                settings.target_schema.clone(),
                settings.remote_schema.clone(),
            );
            let walk_result = run_with_walker(catalog, resolved, source_rules, source_pool, walker, &concurrent_writer).await;
            let result = match walk_result {
                Ok(()) => concurrent_writer.finish().await.map_err(CoreError::from),
                Err(error) => {
                    let _ = concurrent_writer.finish().await;
                    Err(error)
                }
            };

            finish_target(&target_pool, &fdw_config, settings, result).await
        }
    }
}

async fn run_with_walker(
    catalog: &Arc<Catalog>,
    resolved: &relslice_schema::ResolvedRules,
    source_rules: &SourceRules,
    source_pool: &ConnectionPool,
    walker: WalkerKind,
    writer: &dyn DataWriter,
) -> Result<(), CoreError> {
    match walker {
        WalkerKind::TableWalker => {
            let table_walker = TableGraphWalker::new(catalog, &resolved.table_graph_rules, source_rules);
            table_walker.run(writer).await.map_err(CoreError::from)
        }
        WalkerKind::DataWalkerSync => {
            let source = DatabaseSession::acquire(source_pool).await;
            let data_walker = DataGraphWalker::new(source, catalog, &resolved.table_graph_rules, &resolved.data_graph_rules, source_rules);
            data_walker.run(writer).await.map_err(CoreError::from)
        }
        WalkerKind::DataWalkerAsync => {
            let concurrent_walker = ConcurrentDataGraphWalker::new(source_pool, catalog, &resolved.table_graph_rules, &resolved.data_graph_rules, source_rules);
            concurrent_walker.run(writer).await.map_err(CoreError::from)
        }
    }
}

/// Commits or rolls back the target pool's shared write transaction, then always tears
/// down the FDW bridge (on its own short-lived connection, outside that transaction) so
/// a failed run never leaves `postgres_fdw` server/schema objects behind.
async fn finish_target(
    target_pool: &ConnectionPool,
    fdw_config: &FdwConfig,
    settings: &Settings,
    result: Result<(), CoreError>,
) -> Result<(), CoreError> {
    let commit_result = match &result {
        Ok(()) => commit_pool(target_pool).await,
        Err(_) => rollback_pool(target_pool).await,
    };

    let teardown_result = teardown_fdw_bridge(settings, fdw_config).await;

    result?;
    commit_result?;
    teardown_result?;
    Ok(())
}

fn build_fdw_config(settings: &Settings) -> Result<FdwConfig, CoreError> {
    let remote = Dsn::parse(&settings.source_database_dsn())?;
    let config = FdwConfig {
        local_user: settings.target_database_user.clone(),
        remote,
        source_schema: settings.source_schema.clone(),
        remote_schema: settings.remote_schema.clone(),
        target_schema: settings.target_schema.clone(),
    }
    .with_remote_overrides(settings.override_remote_host.clone(), settings.override_remote_port.clone());
    Ok(config)
}

/// `CREATE EXTENSION`/`CREATE SERVER`/`IMPORT FOREIGN SCHEMA` run on their own
/// autocommitted connection, outside the target pool's write transaction: the bridge
/// must be visible to every pooled connection once the walk starts, which a DDL
/// statement still inside an uncommitted transaction on a single connection wouldn't be.
async fn bootstrap_fdw_bridge(settings: &Settings, fdw_config: &FdwConfig) -> Result<(), CoreError> {
    let pool = ConnectionPool::connect(&settings.target_database_dsn(), 1).await?;
    let session = DatabaseSession::acquire(&pool).await;
    connect_as_fdw(&session, fdw_config).await?;
    session.release().await;
    Ok(())
}

async fn teardown_fdw_bridge(settings: &Settings, fdw_config: &FdwConfig) -> Result<(), CoreError> {
    let pool = ConnectionPool::connect(&settings.target_database_dsn(), 1).await?;
    let session = DatabaseSession::acquire(&pool).await;
    drop_fdw(&session, fdw_config).await?;
    session.release().await;
    Ok(())
}
