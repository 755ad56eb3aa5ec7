//! Find the nearest road node to a GPS fix.
use roadmatch::prelude::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let tree = match Quadtree::from_points([
        (101, Coordinate::new(52.5200, 13.4050)),
        (102, Coordinate::new(52.5163, 13.3777)),
        (103, Coordinate::new(52.5076, 13.3904)),
    ]) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("build failed: {e}");
            return;
        }
    };

    let fix = Coordinate::new(52.5150, 13.3800);
    if let Some(hit) = tree.nearest(fix) {
        println!(
            "Nearest node to {}: {} at {} ({:.1} m)",
            fix,
            hit.point.id,
            hit.point.coordinate,
            fix.haversine(&hit.point.coordinate)
        );
    }
}
