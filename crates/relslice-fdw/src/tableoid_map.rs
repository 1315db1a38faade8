use std::collections::HashMap;

use relslice_db::DatabaseSession;

use crate::error::FdwError;

const SOURCE_TABLEOID_QUERY: &str = r#"
    SELECT c.relname, c.oid
    FROM pg_class c
    JOIN pg_namespace n ON c.relnamespace = n.oid
    WHERE c.relkind = 'r' AND n.nspname = $1
"#;

const TARGET_FOREIGN_TABLE_QUERY: &str = "SELECT ftoptions, ftrelid FROM pg_foreign_table";

/// Maps a relation's `tableoid` as observed on the source database to the `tableoid` a
/// query against its imported foreign table reports locally on the target — the two
/// numbers name the same table but are never equal, since each database assigns its own
/// oids. Every node discovered on the source side has to be translated through this map
/// before it can be addressed in a `WHERE tableoid = ...` filter against the remote
/// schema.
pub async fn build_tableoid_map(
    source: &DatabaseSession<'_>,
    target: &DatabaseSession<'_>,
    source_schema: &str,
) -> Result<HashMap<u32, u32>, FdwError> {
    let source_rows = source.query(SOURCE_TABLEOID_QUERY, &[&source_schema]).await?;
    let mut source_name_to_oid: HashMap<String, u32> = HashMap::new();
    for row in &source_rows {
        let name: String = row.get(0);
        let oid: u32 = row.get(1);
        source_name_to_oid.insert(name, oid);
    }

    let target_rows = target.query(TARGET_FOREIGN_TABLE_QUERY, &[]).await?;
    let mut target_name_to_oid: HashMap<String, u32> = HashMap::new();
    for row in &target_rows {
        let options: Vec<String> = row.get(0);
        let ftrelid: u32 = row.get(1);
        let table_name = options
            .iter()
            .find_map(|option| option.strip_prefix("table_name="))
            .ok_or_else(|| FdwError::MalformedForeignTableOptions {
                table: options.join(","),
            })?;
        target_name_to_oid.insert(table_name.to_string(), ftrelid);
    }

    let mut map = HashMap::with_capacity(source_name_to_oid.len());
    for (name, source_oid) in source_name_to_oid {
        if let Some(&target_oid) = target_name_to_oid.get(&name) {
            map.insert(source_oid, target_oid);
        }
    }
    Ok(map)
}

/// Looks up the target-local `tableoid` for a row observed with `source_tableoid`.
pub fn remote_tableoid_for(map: &HashMap<u32, u32>, source_tableoid: u32) -> Result<u32, FdwError> {
    map.get(&source_tableoid)
        .copied()
        .ok_or(FdwError::MissingTableoidMapping(source_tableoid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_tableoid_for_looks_up_the_mapped_value() {
        let mut map = HashMap::new();
        map.insert(16401, 98765);
        assert_eq!(remote_tableoid_for(&map, 16401).unwrap(), 98765);
    }

    #[test]
    fn remote_tableoid_for_errors_on_an_unmapped_source_oid() {
        let map = HashMap::new();
        let err = remote_tableoid_for(&map, 1).unwrap_err();
        assert!(matches!(err, FdwError::MissingTableoidMapping(1)));
    }
}
