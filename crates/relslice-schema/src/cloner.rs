use tokio_postgres::Client;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::SchemaError;

const USER_TYPES_QUERY: &str = r#"
    SELECT n.nspname AS schema_name,
           t.typname AS type_name,
           t.typtype,
           CASE WHEN t.typtype = 'd' THEN pg_catalog.format_type(t.typbasetype, NULL) ELSE NULL END AS data_type,
           CASE WHEN t.typtype = 'e' THEN string_agg(quote_literal(e.enumlabel), ', ' ORDER BY e.enumsortorder) ELSE NULL END AS enum_labels
    FROM pg_type t
    LEFT JOIN pg_namespace n ON n.oid = t.typnamespace
    LEFT JOIN pg_enum e ON t.oid = e.enumtypid
    WHERE n.nspname NOT IN ('pg_catalog', 'information_schema')
      AND t.typtype IN ('d', 'e')
    GROUP BY n.nspname, t.typname, t.typtype, t.typbasetype
"#;

const EXTENSIONS_QUERY: &str = "SELECT extname FROM pg_extension";

const SEQUENCES_QUERY: &str = r#"
    SELECT sequencename, start_value, min_value, max_value, increment_by, last_value
    FROM pg_sequences
"#;

const SEQUENCE_OWNERSHIP_QUERY: &str = r#"
    SELECT s.relname, t.relname, a.attname
    FROM pg_class s
    JOIN pg_depend d ON d.objid = s.oid AND d.classid = 'pg_class'::regclass AND d.refclassid = 'pg_class'::regclass
    JOIN pg_class t ON t.oid = d.refobjid
    JOIN pg_attribute a ON a.attrelid = t.oid AND a.attnum = d.refobjsubid
    WHERE s.relkind = 'S' AND d.deptype = 'a'
"#;

#[derive(Debug, Clone)]
struct Sequence {
    name: String,
    start_value: i64,
    min_value: i64,
    max_value: i64,
    increment_by: i64,
    last_value: Option<i64>,
    owning_table: Option<String>,
    owning_column: Option<String>,
}

/// Recreates the bare shape of a source database's schema on a target database:
/// extensions, domains/enums, sequences, and bare table DDL (columns and primary keys
/// only — no other constraints, indexes or non-identity sequence defaults). Mirrors the
/// original schema manager's clone pipeline, minus constraint cloning (foreign keys are
/// re-established implicitly by `postgres_fdw` traversal rather than enforced on the
/// target, and unique/check constraints were never actually wired up by the original
/// either).
pub async fn clone_schema(source: &Client, target: &Client, catalog: &Catalog) -> Result<(), SchemaError> {
    clone_extensions(source, target).await?;
    clone_user_types(source, target).await?;
    clone_sequences(source, target).await?;
    clone_table_shells(target, catalog).await?;
    Ok(())
}

pub async fn clone_extensions(source: &Client, target: &Client) -> Result<(), SchemaError> {
    for row in source.query(EXTENSIONS_QUERY, &[]).await? {
        let extension: String = row.get(0);
        debug!(%extension, "cloning extension");
        target
            .execute(&format!("CREATE EXTENSION IF NOT EXISTS \"{extension}\""), &[])
            .await?;
    }
    Ok(())
}

pub async fn clone_user_types(source: &Client, target: &Client) -> Result<(), SchemaError> {
    for row in source.query(USER_TYPES_QUERY, &[]).await? {
        let schema_name: String = row.get(0);
        let type_name: String = row.get(1);
        let type_kind: String = row.get(2);
        let data_type: Option<String> = row.get(3);
        let enum_labels: Option<String> = row.get(4);

        match type_kind.as_str() {
            "d" => {
                let data_type = data_type.ok_or_else(|| SchemaError::UnsupportedTypeKind {
                    name: type_name.clone(),
                    kind: type_kind.clone(),
                })?;
                target
                    .execute(
                        &format!("CREATE DOMAIN {schema_name}.{type_name} AS {data_type}"),
                        &[],
                    )
                    .await?;
            }
            "e" => {
                if let Some(enum_labels) = enum_labels {
                    target
                        .execute(
                            &format!("CREATE TYPE {schema_name}.{type_name} AS ENUM ({enum_labels})"),
                            &[],
                        )
                        .await?;
                }
            }
            other => {
                return Err(SchemaError::UnsupportedTypeKind {
                    name: type_name,
                    kind: other.to_string(),
                })
            }
        }
    }
    Ok(())
}

pub async fn clone_sequences(source: &Client, target: &Client) -> Result<(), SchemaError> {
    let mut sequences = Vec::new();
    for row in source.query(SEQUENCES_QUERY, &[]).await? {
        sequences.push(Sequence {
            name: row.get(0),
            start_value: row.get(1),
            min_value: row.get(2),
            max_value: row.get(3),
            increment_by: row.get(4),
            last_value: row.get(5),
            owning_table: None,
            owning_column: None,
        });
    }

    for row in source.query(SEQUENCE_OWNERSHIP_QUERY, &[]).await? {
        let sequence_name: String = row.get(0);
        if let Some(sequence) = sequences.iter_mut().find(|s| s.name == sequence_name) {
            sequence.owning_table = Some(row.get(1));
            sequence.owning_column = Some(row.get(2));
        }
    }

    for sequence in &sequences {
        let owned_by = match (&sequence.owning_table, &sequence.owning_column) {
            (Some(table), Some(column)) => format!("{table}.{column}"),
            _ => "NONE".to_string(),
        };
        target
            .execute(
                &format!(
                    "CREATE SEQUENCE IF NOT EXISTS {name} INCREMENT BY {inc} \
                     MINVALUE {min} MAXVALUE {max} START WITH {start} OWNED BY {owned_by}",
                    name = sequence.name,
                    inc = sequence.increment_by,
                    min = sequence.min_value,
                    max = sequence.max_value,
                    start = sequence.start_value,
                ),
                &[],
            )
            .await?;
        if let Some(last_value) = sequence.last_value {
            target
                .execute(
                    &format!("SELECT setval('{}', {last_value})", sequence.name),
                    &[],
                )
                .await?;
        }
    }
    Ok(())
}

/// Creates each reflected table with just its columns and primary key; foreign keys and
/// any other constraints are intentionally left off the target.
pub async fn clone_table_shells(target: &Client, catalog: &Catalog) -> Result<(), SchemaError> {
    for table in catalog.tables() {
        let mut column_defs: Vec<String> = table
            .columns
            .iter()
            .map(|column| {
                let nullability = if column.not_null { " NOT NULL" } else { "" };
                format!("\"{}\" {}{}", column.name, column.data_type, nullability)
            })
            .collect();

        if !table.primary_key.is_empty() {
            let pk_columns = table
                .primary_key
                .iter()
                .map(|c| format!("\"{c}\""))
                .collect::<Vec<_>>()
                .join(", ");
            column_defs.push(format!("PRIMARY KEY ({pk_columns})"));
        }

        let create_table = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
            table.name,
            column_defs.join(", ")
        );
        target.execute(&create_table, &[]).await?;
    }
    Ok(())
}

pub async fn recreate_schema(client: &Client, schema: &str) -> Result<(), SchemaError> {
    client
        .execute(&format!("DROP SCHEMA IF EXISTS \"{schema}\" CASCADE"), &[])
        .await?;
    client.execute(&format!("CREATE SCHEMA \"{schema}\""), &[]).await?;
    Ok(())
}

/// Deletes every row of every table in `catalog`, children before parents, grounded on
/// `DataManager.delete_data`'s `reversed(db_metadata.sorted_tables)`: a table's rows can
/// only be deleted once nothing still holds a foreign key into it.
pub async fn delete_all_data(client: &Client, catalog: &Catalog) -> Result<(), SchemaError> {
    for table in deletion_order(catalog) {
        debug!(%table, "clearing table");
        client.execute(&format!("DELETE FROM \"{table}\""), &[]).await?;
    }
    Ok(())
}

/// Parent-first creation order, reversed: a Kahn's-algorithm topological sort of the
/// "referenced before referencing" dependency graph, so that by the time a table is
/// processed, every table with a foreign key into it has already been processed.
fn deletion_order(catalog: &Catalog) -> Vec<String> {
    use std::collections::{HashMap, VecDeque};

    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = catalog.tables().map(|t| (t.name.as_str(), 0)).collect();

    for table in catalog.tables() {
        for fk in &table.foreign_keys {
            if fk.referred_table == table.name || !in_degree.contains_key(fk.referred_table.as_str()) {
                continue;
            }
            dependents.entry(fk.referred_table.as_str()).or_default().push(table.name.as_str());
            *in_degree.get_mut(table.name.as_str()).unwrap() += 1;
        }
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, &degree)| degree == 0)
        .map(|(&name, _)| name)
        .collect();
    let mut creation_order = Vec::with_capacity(in_degree.len());

    while let Some(table) = queue.pop_front() {
        creation_order.push(table.to_string());
        if let Some(children) = dependents.get(table) {
            for &child in children {
                let degree = in_degree.get_mut(child).unwrap();
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(child);
                }
            }
        }
    }

    // Any table left out (a dependency cycle) is appended in catalog order rather than
    // dropped, so `delete_all_data` still clears every table even under a schema this
    // sort can't fully order.
    for table in catalog.tables() {
        if !creation_order.iter().any(|t| t == &table.name) {
            creation_order.push(table.name.clone());
        }
    }

    creation_order.reverse();
    creation_order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table_schema::ForeignKeyConstraint;

    fn catalog_with_fk_chain() -> Catalog {
        let mut catalog = Catalog::new();
        let users = catalog.intern("users");
        let orders = catalog.intern("orders");
        let line_items = catalog.intern("line_items");

        catalog.table_mut(users).primary_key = vec!["id".to_string()];
        catalog.table_mut(orders).primary_key = vec!["id".to_string()];
        catalog.table_mut(line_items).primary_key = vec!["id".to_string()];

        catalog.table_mut(orders).foreign_keys.push(ForeignKeyConstraint {
            name: "orders_user_id_fkey".to_string(),
            columns: vec!["user_id".to_string()],
            referred_table: "users".to_string(),
            referred_columns: vec!["id".to_string()],
        });
        catalog.table_mut(line_items).foreign_keys.push(ForeignKeyConstraint {
            name: "line_items_order_id_fkey".to_string(),
            columns: vec!["order_id".to_string()],
            referred_table: "orders".to_string(),
            referred_columns: vec!["id".to_string()],
        });

        catalog
    }

    #[test]
    fn deletion_order_deletes_children_before_their_parents() {
        let catalog = catalog_with_fk_chain();
        let order = deletion_order(&catalog);

        let users_pos = order.iter().position(|t| t == "users").unwrap();
        let orders_pos = order.iter().position(|t| t == "orders").unwrap();
        let line_items_pos = order.iter().position(|t| t == "line_items").unwrap();

        assert!(line_items_pos < orders_pos, "line_items must be deleted before orders");
        assert!(orders_pos < users_pos, "orders must be deleted before users");
    }

    #[test]
    fn deletion_order_includes_every_table_even_with_a_cycle() {
        let mut catalog = Catalog::new();
        let a = catalog.intern("a");
        let b = catalog.intern("b");
        catalog.table_mut(a).foreign_keys.push(ForeignKeyConstraint {
            name: "a_b_fkey".to_string(),
            columns: vec!["b_id".to_string()],
            referred_table: "b".to_string(),
            referred_columns: vec!["id".to_string()],
        });
        catalog.table_mut(b).foreign_keys.push(ForeignKeyConstraint {
            name: "b_a_fkey".to_string(),
            columns: vec!["a_id".to_string()],
            referred_table: "a".to_string(),
            referred_columns: vec!["id".to_string()],
        });

        let order = deletion_order(&catalog);
        assert!(order.contains(&"a".to_string()));
        assert!(order.contains(&"b".to_string()));
        assert_eq!(order.len(), 2);
    }
}
