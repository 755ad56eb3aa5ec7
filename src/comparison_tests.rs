//! Comparison tests between the indexed/heap-driven implementations and
//! brute-force reference answers

#[cfg(test)]
mod tests {
    use crate::{
        Aabb, AdjacencyGraph, BinaryFrontier, Coordinate, FibonacciHeap, Frontier, PathSearch, QueueKind, Quadtree,
        SearchError,
    };
    use rand::{Rng, SeedableRng};

    /// Helper returning the smallest planar distance from `query` to any point
    fn brute_force_nearest(points: &[(usize, Coordinate)], query: &Coordinate) -> f64 {
        points.iter().map(|(_, c)| query.euclidean(c)).fold(f64::INFINITY, f64::min)
    }

    fn assert_exact(tree: &Quadtree<usize>, points: &[(usize, Coordinate)], query: Coordinate) {
        let expected = brute_force_nearest(points, &query);
        let hit = tree.nearest(query).expect("index is not empty");
        assert_eq!(
            hit.distance, expected,
            "query {query}: index returned {:?} at {}, brute force {expected}",
            hit.point.id, hit.distance
        );
        assert_eq!(
            query.euclidean(&hit.point.coordinate),
            hit.distance,
            "reported distance belongs to the returned point"
        );
    }

    #[test]
    fn test_random_points_match_brute_force() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for &n in &[1_usize, 2, 7, 64, 500] {
            let points: Vec<_> = (0..n)
                .map(|i| (i, Coordinate::new(rng.random_range(-90.0..90.0), rng.random_range(-180.0..180.0))))
                .collect();
            let tree = Quadtree::from_points(points.iter().copied()).unwrap();
            assert_eq!(tree.len(), n, "every point is indexed");
            for _ in 0..200 {
                let q = Coordinate::new(rng.random_range(-100.0..100.0), rng.random_range(-200.0..200.0));
                assert_exact(&tree, &points, q);
            }
        }
    }

    #[test]
    fn test_dense_cluster_matches_brute_force() {
        // Many points inside a tiny area of a large index: deep subdivision.
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let bounds = Aabb::new(Coordinate::new(40.0, -75.0), Coordinate::new(41.0, -73.0));
        let points: Vec<_> = (0..300)
            .map(|i| {
                (
                    i,
                    Coordinate::new(40.7 + rng.random_range(0.0..1e-4), -74.0 + rng.random_range(0.0..1e-4)),
                )
            })
            .collect();
        let tree = Quadtree::build(bounds, points.iter().copied()).unwrap();
        assert!(tree.stats().depth > 8, "cluster forces deep subdivision");
        for _ in 0..300 {
            let q = Coordinate::new(40.7 + rng.random_range(-1e-4..2e-4), -74.0 + rng.random_range(-1e-4..2e-4));
            assert_exact(&tree, &points, q);
        }
    }

    #[test]
    fn test_grid_points_on_split_lines() {
        // An 8x8 lattice aligned with the quadrant boundaries of [0, 8]^2:
        // many points sit exactly on center lines at every level.
        let bounds = Aabb::new(Coordinate::new(0.0, 0.0), Coordinate::new(8.0, 8.0));
        let mut points = Vec::new();
        for i in 0..=8 {
            for j in 0..=8 {
                points.push((points.len(), Coordinate::new(f64::from(i), f64::from(j))));
            }
        }
        let tree = Quadtree::build(bounds, points.iter().copied()).unwrap();
        assert_eq!(tree.len(), 81, "9x9 lattice points");

        for &(id, c) in &points {
            let hit = tree.nearest(c).unwrap();
            assert_eq!(hit.point.id, id, "lattice point {c} should match itself");
            assert_eq!(hit.distance, 0.0, "exact hit on {c}");
        }

        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        for _ in 0..500 {
            // Queries snapped to a quarter grid land on split lines too.
            let q = Coordinate::new(
                f64::from(rng.random_range(-4..=36)) / 4.0,
                f64::from(rng.random_range(-4..=36)) / 4.0,
            );
            assert_exact(&tree, &points, q);
        }
    }

    #[test]
    fn test_duplicates_match_brute_force() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let sites: Vec<_> = (0..20)
            .map(|_| Coordinate::new(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)))
            .collect();
        // Every site appears several times.
        let points: Vec<_> = (0..200).map(|i| (i, sites[rng.random_range(0..sites.len())])).collect();
        let tree = Quadtree::from_points(points.iter().copied()).unwrap();
        assert_eq!(tree.len(), 200, "duplicates are kept");

        for _ in 0..200 {
            let q = Coordinate::new(rng.random_range(-0.2..1.2), rng.random_range(-0.2..1.2));
            assert_exact(&tree, &points, q);
        }
        // A query on a shared site returns the first id inserted there.
        for site in &sites {
            let first = points.iter().find(|(_, c)| c == site).map(|(i, _)| *i);
            if first.is_some() {
                assert_eq!(tree.nearest_neighbor(*site), first, "site {site} resolves to its first id");
            }
        }
    }

    // ============================================================================
    // QUEUE COMPARISON
    // ============================================================================

    #[test]
    fn test_fibonacci_and_binary_agree() {
        // Costs are `level * 10_000 + key`, so they are unique and both queues
        // must extract exactly the same sequence.
        let mut rng = rand::rngs::StdRng::seed_from_u64(99);
        let mut fib = FibonacciHeap::new();
        let mut bin = BinaryFrontier::new();
        let mut live: Vec<(u32, u32)> = Vec::new();
        let mut next_key = 0_u32;
        let mut extracted = Vec::new();
        let cost = |level: u32, key: u32| f64::from(level) * 10_000.0 + f64::from(key);

        for _ in 0..5_000 {
            match rng.random_range(0..10) {
                0..=4 => {
                    let level = rng.random_range(0..1_000);
                    fib.insert(next_key, cost(level, next_key)).unwrap();
                    bin.insert(next_key, cost(level, next_key)).unwrap();
                    live.push((next_key, level));
                    next_key += 1;
                }
                5..=6 if !live.is_empty() => {
                    let slot = rng.random_range(0..live.len());
                    let (key, level) = live[slot];
                    if level > 0 {
                        let lower = rng.random_range(0..level);
                        fib.decrease_key(key, cost(lower, key)).unwrap();
                        bin.decrease_key(key, cost(lower, key)).unwrap();
                        live[slot].1 = lower;
                    }
                }
                _ => {
                    let a = fib.extract_min();
                    assert_eq!(a, bin.extract_min(), "both queues extract the same entry");
                    if let Some((key, c)) = a {
                        live.retain(|&(k, _)| k != key);
                        extracted.push(c);
                    }
                }
            }
            assert_eq!(fib.len(), bin.len(), "queue sizes agree");
            assert_eq!(fib.len(), live.len(), "queue size matches the model");
        }
        while let Some(entry) = fib.extract_min() {
            assert_eq!(Some(entry), bin.extract_min(), "drain order agrees");
        }
        assert!(bin.is_empty(), "binary frontier drained together with the heap");
        assert!(!extracted.is_empty(), "the run exercised extraction");
    }

    // ============================================================================
    // SEARCH COMPARISON
    // ============================================================================

    /// Minimum cost over all simple paths, by exhaustive DFS.
    fn brute_force_cost(n: usize, edges: &[(usize, usize, f64)], start: usize, target: usize) -> Option<f64> {
        fn dfs(
            node: usize,
            target: usize,
            edges: &[(usize, usize, f64)],
            visited: &mut Vec<bool>,
            cost: f64,
            best: &mut Option<f64>,
        ) {
            if node == target {
                if best.is_none_or(|b| cost < b) {
                    *best = Some(cost);
                }
                return;
            }
            for &(from, to, w) in edges {
                if from == node && !visited[to] {
                    visited[to] = true;
                    dfs(to, target, edges, visited, cost + w, best);
                    visited[to] = false;
                }
            }
        }
        let mut visited = vec![false; n];
        visited[start] = true;
        let mut best = None;
        dfs(start, target, edges, &mut visited, 0.0, &mut best);
        best
    }

    #[test]
    fn test_search_matches_brute_force_on_small_graphs() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(2024);
        for _ in 0..200 {
            let n = rng.random_range(2..=8);
            let mut edges = Vec::new();
            for from in 0..n {
                for to in 0..n {
                    if rng.random_range(0..3) == 0 {
                        // Integer weights keep sums exact.
                        edges.push((from, to, f64::from(rng.random_range(0..20))));
                    }
                }
            }
            let mut g = AdjacencyGraph::from_edges(edges.iter().copied()).unwrap();
            for v in 0..n {
                g.add_node(v);
            }

            for start in 0..n {
                for target in 0..n {
                    let expected = brute_force_cost(n, &edges, start, target);
                    for queue in [QueueKind::Fibonacci, QueueKind::Binary] {
                        match (PathSearch::new(&g).with_queue(queue).run(start, target), expected) {
                            (Ok(path), Some(cost)) => {
                                assert_eq!(path.cost, cost, "{start}->{target} via {queue:?}");
                                assert_eq!(path.nodes.first(), Some(&start), "path starts at {start}");
                                assert_eq!(path.nodes.last(), Some(&target), "path ends at {target}");
                                // The returned node sequence must realise the cost.
                                let walked: f64 = path
                                    .nodes
                                    .windows(2)
                                    .map(|w| {
                                        edges
                                            .iter()
                                            .filter(|e| e.0 == w[0] && e.1 == w[1])
                                            .map(|e| e.2)
                                            .fold(f64::INFINITY, f64::min)
                                    })
                                    .sum();
                                assert_eq!(walked, cost, "{start}->{target}: nodes {:?} realise the cost", path.nodes);
                            }
                            (Err(SearchError::NotFound { .. }), None) => {}
                            (got, want) => panic!("{start}->{target} via {queue:?}: got {got:?}, want {want:?}"),
                        }
                    }
                }
            }
        }
    }
}
