#[cfg(test)]
mod integration_tests {
    use std::collections::HashMap;

    use crate::{
        AdjacencyGraph, Config, Coordinate, GreatCircleHeuristic, MapMatcher, PathSearch, QueueKind, ZeroHeuristic,
    };

    /// A 5x5 street grid around a city block, ~111 m between intersections.
    /// Streets are two-way except the one-way row at latitude index 2.
    fn city() -> (HashMap<u32, Coordinate>, AdjacencyGraph<u32>) {
        let step = 0.001;
        let id = |r: u32, c: u32| r * 10 + c;
        let mut coords = HashMap::new();
        for r in 0..5 {
            for c in 0..5 {
                let _ = coords.insert(id(r, c), Coordinate::new(50.0 + f64::from(r) * step, f64::from(c) * step));
            }
        }
        let mut graph = AdjacencyGraph::new();
        for r in 0..5 {
            for c in 0..5 {
                let here = coords[&id(r, c)];
                if c + 1 < 5 {
                    let length = here.haversine(&coords[&id(r, c + 1)]);
                    if r == 2 {
                        graph.add_edge(id(r, c), id(r, c + 1), length).unwrap();
                    } else {
                        graph.add_two_way_edge(id(r, c), id(r, c + 1), length).unwrap();
                    }
                }
                if r + 1 < 5 {
                    let length = here.haversine(&coords[&id(r + 1, c)]);
                    graph.add_two_way_edge(id(r, c), id(r + 1, c), length).unwrap();
                }
            }
        }
        (coords, graph)
    }

    #[test]
    fn test_match_then_route_from_depot() {
        let config = Config::from_json(r#"{ "matching": { "max_distance_m": 100.0 }, "search": { "threads": 3 } }"#)
            .unwrap();
        let (coords, graph) = city();
        let matcher = MapMatcher::from_points(coords.iter().map(|(&k, &v)| (k, v)), config.matching.clone()).unwrap();

        // GPS fixes a few metres off the intersections, plus one far away.
        let depot_fix = Coordinate::new(50.000_05, 0.000_04);
        let stops = [
            Coordinate::new(50.004_02, 0.003_97),
            Coordinate::new(50.002_03, 0.000_02),
            Coordinate::new(50.000_01, 0.004_05),
            Coordinate::new(51.0, 1.0),
        ];

        let depot = matcher.match_location(depot_fix).unwrap();
        assert_eq!(depot.id, 0, "depot snaps to the south-west corner");
        let matched = matcher.match_locations(&stops, 2).unwrap();
        let ids: Vec<_> = matched.iter().map(|m| m.map(|m| m.id)).collect();
        assert_eq!(ids, vec![Some(44), Some(20), Some(4), None], "far fix is rejected by max_distance_m");

        let targets: Vec<u32> = ids.into_iter().flatten().collect();
        let dijkstra = PathSearch::new(&graph).with_config(&config.search);
        // Edge weights are haversine lengths, so the great-circle heuristic
        // is consistent and A* must agree with Dijkstra.
        let astar = PathSearch::new(&graph)
            .with_queue(QueueKind::Binary)
            .with_heuristic(GreatCircleHeuristic::new(&coords));

        let pool = rayon::ThreadPoolBuilder::new().num_threads(config.search.threads).build().unwrap();
        let plain = dijkstra.run_many_in(&pool, depot.id, &targets);
        let guided = astar.run_many(depot.id, &targets, 0).unwrap();
        for ((target, a), b) in targets.iter().zip(&plain).zip(&guided) {
            let (a, b) = (a.as_ref().unwrap(), b.as_ref().unwrap());
            assert_eq!(a.start(), Some(depot.id), "paths start at the depot");
            assert_eq!(a.target(), Some(*target), "paths end at their target");
            assert!((a.cost - b.cost).abs() < 1e-6, "to {target}: {} vs {}", a.cost, b.cost);
        }

        // Manhattan distance in blocks.
        assert_eq!(plain[0].as_ref().unwrap().hops(), 8, "corner to corner");
        assert_eq!(plain[1].as_ref().unwrap().hops(), 2, "two blocks north");
        assert_eq!(plain[2].as_ref().unwrap().hops(), 4, "four blocks east");

        let again = matcher.match_locations_in(&pool, &stops);
        assert_eq!(again, matched, "shared pool gives the same matches");
    }

    #[test]
    fn test_one_way_street_forces_detour() {
        let (coords, graph) = city();
        // Westbound along row 2 is forbidden, so 24 -> 20 must leave the row.
        let direct = coords[&24].haversine(&coords[&20]);
        let path = PathSearch::new(&graph).run(24, 20).unwrap();
        assert!(path.cost > direct * 1.2, "{} vs {}", path.cost, direct);
        assert!(path.nodes.iter().any(|&n| n / 10 != 2), "detour leaves row 2");

        let east = PathSearch::new(&graph).run(20, 24).unwrap();
        assert_eq!(east.nodes, vec![20, 21, 22, 23, 24], "eastbound follows the one-way row");
        assert!((east.cost - direct).abs() < 1.0, "eastbound cost is the row length");

        let same = crate::shortest_path(&graph, 33, 33, ZeroHeuristic).unwrap();
        assert_eq!(same.nodes, vec![33], "same node is a single-node path");
    }
}
