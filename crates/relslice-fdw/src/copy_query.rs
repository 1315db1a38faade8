use relslice_schema::TableSchema;

/// Builds the `INSERT ... SELECT ... ON CONFLICT DO UPDATE` that copies rows from a
/// table's imported foreign table into its counterpart on the target, upserting so a
/// row already copied by an earlier hop is refreshed rather than duplicated. A table
/// with no primary key has no `ON CONFLICT` target and falls back to a plain insert.
pub fn build_copy_query(
    table: &TableSchema,
    target_schema: &str,
    remote_schema: &str,
    condition: Option<&str>,
) -> String {
    let columns = table
        .columns
        .iter()
        .map(|c| format!("\"{}\"", c.name))
        .collect::<Vec<_>>()
        .join(",");
    let excluded_columns = table
        .columns
        .iter()
        .map(|c| format!("EXCLUDED.\"{}\"", c.name))
        .collect::<Vec<_>>()
        .join(",");
    let primary_key = table
        .primary_key
        .iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(",");
    let where_clause = condition.map(|c| format!(" WHERE {c}")).unwrap_or_default();

    // A table with no primary key has nothing for `ON CONFLICT` to target; fall back to
    // a plain insert rather than emitting the invalid `ON CONFLICT () DO UPDATE`. Such a
    // table also has no row-level upsert idempotence: a re-run can duplicate it.
    let on_conflict = if table.primary_key.is_empty() {
        String::new()
    } else {
        format!(" ON CONFLICT ({primary_key}) DO UPDATE SET ({columns}) = ({excluded_columns})")
    };

    format!(
        "INSERT INTO \"{target_schema}\".\"{table_name}\" \
         SELECT * FROM \"{remote_schema}\".\"{table_name}\"{where_clause}{on_conflict}",
        table_name = table.name,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use relslice_graph::TableId;
    use relslice_schema::ColumnSchema;

    fn orders_table() -> TableSchema {
        TableSchema {
            id: TableId::from_index(0),
            name: "orders".to_string(),
            oid: 16401,
            columns: vec![
                ColumnSchema {
                    name: "id".to_string(),
                    data_type: "bigint".to_string(),
                    not_null: true,
                    is_identity: true,
                },
                ColumnSchema {
                    name: "user_id".to_string(),
                    data_type: "bigint".to_string(),
                    not_null: true,
                    is_identity: false,
                },
            ],
            primary_key: vec!["id".to_string()],
            foreign_keys: Vec::new(),
        }
    }

    #[test]
    fn builds_an_upsert_copy_with_a_condition() {
        let sql = build_copy_query(&orders_table(), "public", "remote", Some("ctid = '(0,1)'"));
        assert!(sql.starts_with("INSERT INTO \"public\".\"orders\""));
        assert!(sql.contains("FROM \"remote\".\"orders\" WHERE ctid = '(0,1)'"));
        assert!(sql.contains("ON CONFLICT (\"id\") DO UPDATE SET (\"id\",\"user_id\") = (EXCLUDED.\"id\",EXCLUDED.\"user_id\")"));
    }

    #[test]
    fn builds_an_unconditional_copy_when_no_condition_is_given() {
        let sql = build_copy_query(&orders_table(), "public", "remote", None);
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn omits_on_conflict_for_a_table_with_no_primary_key() {
        let mut table = orders_table();
        table.primary_key = Vec::new();
        let sql = build_copy_query(&table, "public", "remote", None);
        assert!(!sql.contains("ON CONFLICT"));
        assert!(sql.trim_end().ends_with("FROM \"remote\".\"orders\""));
    }
}
