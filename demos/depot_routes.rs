//! Match delivery stops to road nodes, then route from the depot to each
//! stop in parallel. Settings come from a JSON config.
//!
//! ```bash
//! RUST_LOG=roadmatch=debug cargo run --example depot_routes
//! ```
use roadmatch::prelude::*;
use roadmatch::Config;

const CONFIG: &str = r#"{
    "matching": { "max_distance_m": 250.0, "threads": 2 },
    "search": { "queue": "fibonacci", "threads": 4, "timeout_ms": 500 }
}"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match Config::from_json(CONFIG) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    // A ladder of 2 x 6 intersections roughly 100 m apart.
    let node = |row: u32, col: u32| row * 100 + col;
    let mut nodes = Vec::new();
    for row in 0..2 {
        for col in 0..6 {
            nodes.push((node(row, col), Coordinate::new(45.0 + f64::from(row) * 0.0009, 7.0 + f64::from(col) * 0.0013)));
        }
    }
    let mut graph = AdjacencyGraph::new();
    for &(a, ca) in &nodes {
        for &(b, cb) in &nodes {
            let adjacent = (a / 100 == b / 100 && b % 100 == a % 100 + 1) || (b == a + 100);
            if adjacent && graph.add_two_way_edge(a, b, ca.haversine(&cb)).is_err() {
                eprintln!("bad edge {a} - {b}");
                return;
            }
        }
    }

    let matcher = match MapMatcher::from_points(nodes, config.matching.clone()) {
        Ok(matcher) => matcher,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    let depot = Coordinate::new(45.0001, 7.0001);
    let stops = [
        Coordinate::new(45.0008, 7.0052),
        Coordinate::new(44.9999, 7.0066),
        Coordinate::new(45.0100, 7.0100),
    ];

    let Some(depot) = matcher.match_location(depot) else {
        eprintln!("depot is off the map");
        return;
    };
    let matched = match matcher.match_locations(&stops, config.matching.threads) {
        Ok(matched) => matched,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    let mut targets = Vec::new();
    for (stop, m) in stops.iter().zip(&matched) {
        match m {
            Some(m) => {
                println!("stop {stop} -> node {} ({:.0} m away)", m.id, m.metres);
                targets.push(m.id);
            }
            None => println!("stop {stop} -> no road within range"),
        }
    }

    let search = PathSearch::new(&graph).with_config(&config.search);
    match search.run_many(depot.id, &targets, config.search.threads) {
        Ok(results) => {
            for (target, result) in targets.iter().zip(results) {
                match result {
                    Ok(path) => println!("depot {} -> {target}: {:?}, {:.0} m", depot.id, path.nodes, path.cost),
                    Err(e) => println!("depot {} -> {target}: {e}", depot.id),
                }
            }
        }
        Err(e) => eprintln!("{e}"),
    }
}
