//! Shortest path on a tiny road graph, with Dijkstra and with A*.
use roadmatch::prelude::*;
use roadmatch::GreatCircleHeuristic;
use std::collections::HashMap;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let coordinates: HashMap<&str, Coordinate> = [
        ("depot", Coordinate::new(48.137, 11.575)),
        ("bridge", Coordinate::new(48.140, 11.590)),
        ("ring", Coordinate::new(48.150, 11.560)),
        ("customer", Coordinate::new(48.145, 11.600)),
    ]
    .into_iter()
    .collect();

    // Edge weights are road lengths in metres.
    let mut graph = AdjacencyGraph::new();
    for (a, b, detour) in [("depot", "bridge", 1.1), ("bridge", "customer", 1.2), ("depot", "ring", 1.3), ("ring", "customer", 1.05)] {
        let metres = coordinates[a].haversine(&coordinates[b]) * detour;
        if let Err(e) = graph.add_two_way_edge(a, b, metres) {
            eprintln!("bad edge: {e}");
            return;
        }
    }

    match shortest_path(&graph, "depot", "customer", ZeroHeuristic) {
        Ok(path) => println!("Dijkstra: {:?} ({:.0} m)", path.nodes, path.cost),
        Err(e) => println!("Dijkstra: {e}"),
    }

    let astar = PathSearch::new(&graph)
        .with_queue(QueueKind::Binary)
        .with_heuristic(GreatCircleHeuristic::new(&coordinates));
    match astar.run("depot", "customer") {
        Ok(path) => println!("A*:       {:?} ({:.0} m)", path.nodes, path.cost),
        Err(e) => println!("A*:       {e}"),
    }
}
