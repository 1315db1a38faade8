use std::path::Path;

use relslice_graph::TableId;
use relslice_schema::{clone_schema, delete_all_data, recreate_schema, reflect_catalog, render_plantuml};

use crate::error::CoreError;
use crate::session::connect_one;

/// Reflects `schema` on `dsn`'s database and renders it as a PlantUML class diagram. If
/// `tables` is non-empty, the diagram is restricted to those tables and everything
/// reachable from them, rather than the whole schema — useful on databases too large to
/// render in full. Writes to `output` if given, otherwise prints to stdout.
pub async fn print_schema(dsn: &str, schema: &str, tables: &[String], output: Option<&Path>) -> Result<(), CoreError> {
    let client = connect_one(dsn).await?;
    let catalog = reflect_catalog(&client, &[schema.to_string()]).await?;
    let graph = relslice_schema::build_table_graph_from_tables(&catalog);

    let graph = if tables.is_empty() {
        graph
    } else {
        let ids: Vec<TableId> = tables.iter().map(|name| catalog.table_by_name(name).map(|t| t.id)).collect::<Result<_, _>>()?;
        let (restricted, _) = graph.subgraph_reachable_from(ids);
        restricted
    };

    let rendered = render_plantuml(&graph, &catalog);
    match output {
        Some(path) => std::fs::write(path, rendered).map_err(|source| CoreError::Io {
            path: path.display().to_string(),
            source,
        })?,
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Reflects the source database's schema and recreates its bare shape — extensions,
/// user types, sequences and table shells — on the target database.
pub async fn clone_schema_command(source_dsn: &str, target_dsn: &str, schema: &str) -> Result<(), CoreError> {
    let source = connect_one(source_dsn).await?;
    let catalog = reflect_catalog(&source, &[schema.to_string()]).await?;
    let target = connect_one(target_dsn).await?;
    clone_schema(&source, &target, &catalog).await?;
    Ok(())
}

/// Drops and recreates `schema` on `dsn`'s database, leaving it empty.
pub async fn clear_schema(dsn: &str, schema: &str) -> Result<(), CoreError> {
    let client = connect_one(dsn).await?;
    recreate_schema(&client, schema).await?;
    Ok(())
}

/// Deletes every row of every table in `schema` on `dsn`'s database, children before
/// parents, without touching the schema's DDL.
pub async fn clear_data(dsn: &str, schema: &str) -> Result<(), CoreError> {
    let client = connect_one(dsn).await?;
    let catalog = reflect_catalog(&client, &[schema.to_string()]).await?;
    delete_all_data(&client, &catalog).await?;
    Ok(())
}
