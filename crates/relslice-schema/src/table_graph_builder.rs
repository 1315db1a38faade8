use relslice_graph::{RelationEdge, RelationGraph};

use crate::catalog::Catalog;

/// Builds the full relation graph from every foreign key in `catalog`.
///
/// For each foreign key, an edge is always added from the referencing table to the
/// referenced table (so a walk can follow the FK forward). When the FK's local columns
/// are exactly the table's primary key (a one-to-one relation), a second edge is added
/// in the opposite direction too, since either side can then be used to discover the
/// other — mirrors the original `build_table_graph_from_tables`.
pub fn build_table_graph_from_tables(catalog: &Catalog) -> RelationGraph {
    let mut graph = RelationGraph::new();

    for table in catalog.tables() {
        for fk in &table.foreign_keys {
            let Some(referred_id) = catalog.table_id(&fk.referred_table) else {
                continue;
            };

            if table.is_one_to_one(fk) {
                graph.add_edge(RelationEdge::new(
                    referred_id,
                    table.id,
                    fk.referred_columns.clone(),
                    fk.columns.clone(),
                ));
            }

            graph.add_edge(RelationEdge::new(
                table.id,
                referred_id,
                fk.columns.clone(),
                fk.referred_columns.clone(),
            ));
        }
    }

    graph
}
