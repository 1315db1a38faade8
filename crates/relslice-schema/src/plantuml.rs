use relslice_graph::RelationGraph;

use crate::catalog::Catalog;

/// Renders a graph as a PlantUML class diagram: one `class` per table, one arrow per
/// edge labeled with the columns it joins on.
pub fn render_plantuml(graph: &RelationGraph, catalog: &Catalog) -> String {
    let mut out = String::from("@startuml\n");
    for table in graph.nodes() {
        out.push_str(&format!("class {}\n", catalog.table_name(table)));
    }
    for edge in graph.edges() {
        out.push_str(&format!(
            "{} \"{}\" --> \"{}\" {}\n",
            catalog.table_name(edge.source_table),
            edge.source_key.join(","),
            edge.target_key.join(","),
            catalog.table_name(edge.target_table),
        ));
    }
    out.push_str("@enduml\n");
    out
}
