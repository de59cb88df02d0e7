//! Full pipeline over the demo data set.
//!
//! Run: cargo test --test end_to_end

use std::collections::HashMap;
use std::time::SystemTime;

use rand::rngs::StdRng;
use rand::SeedableRng;

use waste_routing::assignment::assign_routes;
use waste_routing::cluster::extract_clusters;
use waste_routing::demo::{demo_bins, demo_trucks};
use waste_routing::distance::build_graph;
use waste_routing::index::BinIndex;
use waste_routing::models::{high_priority_ids, BinId, OptimizationHistory, Route};
use waste_routing::mst::{compute_mst, kruskal};
use waste_routing::planner::RoutePlanner;
use waste_routing::prediction::{advance_simulation, predict_fill_levels};
use waste_routing::sequencing::sequence_cluster;

#[test]
fn test_demo_stage_by_stage() {
    let bins = demo_bins();
    let trucks = demo_trucks();

    let graph = build_graph(&bins).expect("unique ids");
    assert_eq!(graph.len(), 10);
    assert_eq!(graph.edges().len(), 45);

    let mst = compute_mst(&graph);
    assert_eq!(mst.len(), 9);

    let (_, mut uf) = kruskal(&graph);
    let root = uf.find(0);
    assert!((0..graph.len()).all(|i| uf.find(i) == root));
    assert_eq!(uf.num_sets(), 1);

    let high = high_priority_ids(&bins);
    assert_eq!(high, vec![1, 3, 6, 9]);

    let clusters = extract_clusters(&bins, &mst);
    let mut clustered: Vec<BinId> = clusters
        .iter()
        .flat_map(|c| c.bin_ids().to_vec())
        .collect();
    clustered.sort_unstable();
    assert_eq!(clustered, (1..=10).collect::<Vec<_>>());

    let sequenced = clusters
        .iter()
        .map(|c| sequence_cluster(c, &graph))
        .collect::<Result<Vec<_>, _>>()
        .expect("members known");
    for (cluster, seq) in clusters.iter().zip(&sequenced) {
        assert_eq!(seq.order.first().copied(), cluster.anchor());
        assert!(seq.optimal);
    }

    let assignment = assign_routes(&sequenced, &trucks, &high, &graph).expect("valid fleet");
    assert!(assignment.is_complete());
    assert_every_bin_once(&assignment.routes);

    for truck in &trucks {
        let load: f64 = assignment
            .routes_for(truck.id())
            .map(Route::total_waste_collected)
            .sum();
        assert!(load <= truck.capacity() + 1e-9, "truck {} over capacity", truck.id());
    }
}

#[test]
fn test_demo_planner_matches_stages() {
    let bins = demo_bins();
    let trucks = demo_trucks();
    let outcome = RoutePlanner::default().plan(&bins, &trucks).expect("valid");

    assert_eq!(outcome.mst.len(), 9);
    assert_eq!(outcome.high_priority, vec![1, 3, 6, 9]);
    assert_every_bin_once(outcome.routes());

    let capacities: HashMap<u32, f64> =
        trucks.iter().map(|t| (t.id(), t.capacity())).collect();
    for route in outcome.routes() {
        assert!(route.total_waste_collected() <= capacities[&route.truck_id()] + 1e-9);
        let replay = outcome.graph.path_distance(route.bin_sequence()).expect("known ids");
        assert!((replay - route.total_distance()).abs() < 1e-9);
    }

    let summary = outcome.summary();
    let left = outcome.assignment.uncollected_kg();
    assert!((summary.total_waste + left - 622.0).abs() < 1e-9);
    assert!(summary.total_waste <= 700.0 + 1e-9);
    assert!(summary.efficiency > 0.0);
}

#[test]
fn test_demo_is_deterministic() {
    let planner = RoutePlanner::default();
    let at = SystemTime::UNIX_EPOCH;
    let a = planner.plan_at(&demo_bins(), &demo_trucks(), at).expect("valid");
    let b = planner.plan_at(&demo_bins(), &demo_trucks(), at).expect("valid");
    assert_eq!(a.mst, b.mst);
    assert_eq!(a.clusters, b.clusters);
    assert_eq!(a.routes(), b.routes());
    assert_eq!(a.record, b.record);
}

#[test]
fn test_demo_predictions() {
    let predicted = predict_fill_levels(&demo_bins());
    assert_eq!(predicted.len(), 10);
    assert!(predicted.values().all(|p| (0.0..=100.0).contains(p)));
    // 95 + 1.5 * 24 is clipped.
    assert_eq!(predicted[&6], 100.0);
    assert!((predicted[&7] - 56.0).abs() < 1e-9);
}

#[test]
fn test_demo_index() {
    let index = BinIndex::from_bins(&demo_bins());
    assert_eq!(index.len(), 10);
    assert_eq!(index.search(&9).map(|b| b.fill_level()), Some(82));
    let ids: Vec<BinId> = index.get_all().iter().map(|b| b.id()).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    let mid: Vec<BinId> = index.range(4..=6).map(|(k, _)| *k).collect();
    assert_eq!(mid, vec![4, 5, 6]);
}

#[test]
fn test_simulation_then_replan() {
    let planner = RoutePlanner::default();
    let trucks = demo_trucks();
    let mut bins = demo_bins();
    let mut history = OptimizationHistory::new();
    let mut rng = StdRng::seed_from_u64(2024);

    let first = planner.plan_into(&bins, &trucks, &mut history).expect("valid");
    let mut previous = first.routes().to_vec();

    for _ in 0..20 {
        let step = advance_simulation(&bins, &mut rng);
        bins = step.bins;
        if step.requires_replan {
            let outcome = planner.plan_into(&bins, &trucks, &mut history).expect("valid");
            assert!(outcome.compare_with(&previous).is_some());
            previous = outcome.routes().to_vec();
        }
    }

    assert!(!history.is_empty());
    assert!(bins.iter().all(|b| b.fill_level() <= 100));
    let best = history.best_distance().expect("non-empty history");
    assert!(history.records().iter().all(|r| r.total_distance() >= best));
}

fn assert_every_bin_once(routes: &[Route]) {
    let mut ids: Vec<BinId> = routes
        .iter()
        .flat_map(|r| r.bin_sequence().to_vec())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>(), "each bin exactly once");
}
