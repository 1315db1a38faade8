use tokio_postgres::Client;

use crate::catalog::Catalog;
use crate::error::SchemaError;
use crate::table_schema::ForeignKeyConstraint;

const TABLES_QUERY: &str = r#"
    SELECT c.oid, c.relname
    FROM pg_class c
    JOIN pg_namespace n ON n.oid = c.relnamespace
    WHERE c.relkind IN ('r', 'p') AND n.nspname = ANY($1)
    ORDER BY c.relname
"#;

const COLUMNS_QUERY: &str = r#"
    SELECT c.relname, a.attname, pg_catalog.format_type(a.atttypid, a.atttypmod),
           a.attnotnull, a.attidentity <> ''
    FROM pg_attribute a
    JOIN pg_class c ON c.oid = a.attrelid
    JOIN pg_namespace n ON n.oid = c.relnamespace
    WHERE a.attnum > 0 AND NOT a.attisdropped
      AND c.relkind IN ('r', 'p') AND n.nspname = ANY($1)
    ORDER BY c.relname, a.attnum
"#;

const PRIMARY_KEYS_QUERY: &str = r#"
    SELECT cl.relname, array_agg(attr.attname ORDER BY k.ord)
    FROM pg_constraint con
    JOIN pg_class cl ON cl.oid = con.conrelid
    JOIN pg_namespace n ON n.oid = cl.relnamespace
    CROSS JOIN LATERAL unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord)
    JOIN pg_attribute attr ON attr.attrelid = con.conrelid AND attr.attnum = k.attnum
    WHERE con.contype = 'p' AND n.nspname = ANY($1)
    GROUP BY cl.relname
"#;

const FOREIGN_KEYS_QUERY: &str = r#"
    SELECT con.conname, cl.relname, fcl.relname,
           array_agg(local_attr.attname ORDER BY k.ord),
           array_agg(foreign_attr.attname ORDER BY k.ord)
    FROM pg_constraint con
    JOIN pg_class cl ON cl.oid = con.conrelid
    JOIN pg_namespace n ON n.oid = cl.relnamespace
    JOIN pg_class fcl ON fcl.oid = con.confrelid
    CROSS JOIN LATERAL unnest(con.conkey, con.confkey) WITH ORDINALITY AS k(local_attnum, foreign_attnum, ord)
    JOIN pg_attribute local_attr ON local_attr.attrelid = con.conrelid AND local_attr.attnum = k.local_attnum
    JOIN pg_attribute foreign_attr ON foreign_attr.attrelid = con.confrelid AND foreign_attr.attnum = k.foreign_attnum
    WHERE con.contype = 'f' AND n.nspname = ANY($1)
    GROUP BY con.conname, cl.relname, fcl.relname
"#;

/// Reflects every ordinary and partitioned table visible in `schemas` into a `Catalog`:
/// tables, columns, primary keys and foreign keys, using the same `pg_class`/
/// `pg_attribute`/`pg_constraint` catalogs the original schema manager walked through an
/// ORM's reflection layer.
pub async fn reflect_catalog(client: &Client, schemas: &[String]) -> Result<Catalog, SchemaError> {
    let mut catalog = Catalog::new();

    let table_rows = client.query(TABLES_QUERY, &[&schemas]).await?;
    for row in &table_rows {
        let oid: u32 = row.get::<_, u32>(0);
        let name: String = row.get(1);
        let id = catalog.intern(name);
        catalog.table_mut(id).oid = oid;
    }

    let column_rows = client.query(COLUMNS_QUERY, &[&schemas]).await?;
    for row in &column_rows {
        let table_name: String = row.get(0);
        let Some(id) = catalog.table_id(&table_name) else {
            continue;
        };
        let column = crate::table_schema::ColumnSchema {
            name: row.get(1),
            data_type: row.get(2),
            not_null: row.get(3),
            is_identity: row.get(4),
        };
        catalog.table_mut(id).columns.push(column);
    }

    let pk_rows = client.query(PRIMARY_KEYS_QUERY, &[&schemas]).await?;
    for row in &pk_rows {
        let table_name: String = row.get(0);
        let Some(id) = catalog.table_id(&table_name) else {
            continue;
        };
        catalog.table_mut(id).primary_key = row.get(1);
    }

    let fk_rows = client.query(FOREIGN_KEYS_QUERY, &[&schemas]).await?;
    for row in &fk_rows {
        let name: String = row.get(0);
        let table_name: String = row.get(1);
        let referred_table: String = row.get(2);
        let Some(id) = catalog.table_id(&table_name) else {
            continue;
        };
        let fk = ForeignKeyConstraint {
            name,
            columns: row.get(3),
            referred_table,
            referred_columns: row.get(4),
        };
        catalog.table_mut(id).foreign_keys.push(fk);
    }

    Ok(catalog)
}
