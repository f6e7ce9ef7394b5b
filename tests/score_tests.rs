//! Unit tests for the hard/soft score and the evaluator.

use leafroute::geo::Coordinate;
use leafroute::problem::{CollectionPoint, Depot, Problem, Vehicle};
use leafroute::score::{Evaluator, Score};
use leafroute::solution::{Solution, Stop};

const USE_PENALTY: i64 = 100;

/// The reference scenario: two vehicles (100 kg, 80 kg) and three points
/// (40, 30, 50 kg) at distinct coordinates, depot at the origin.
fn create_scenario_problem() -> Problem {
    let depot = Depot::new(Coordinate::new(0.0, 0.0));
    let points = vec![
        CollectionPoint::new(1, Coordinate::new(0.1, 0.0), 40.0),
        CollectionPoint::new(2, Coordinate::new(0.2, 0.0), 30.0),
        CollectionPoint::new(3, Coordinate::new(0.0, 0.3), 50.0),
    ];
    let vehicles = vec![Vehicle::new(1, 100.0), Vehicle::new(2, 80.0)];

    Problem::new(vehicles, points, depot).unwrap()
}

#[test]
fn test_score_ordering_is_lexicographic() {
    // Hard strictly dominates soft.
    assert!(Score::new(0, 100) < Score::new(1, 0));
    assert!(Score::new(1, 0) < Score::new(1, 5));
    assert!(Score::new(-1, 900) < Score::new(0, 0));
    assert_eq!(Score::new(2, 3), Score::new(2, 3));
    assert!(Score::new(0, 0).is_feasible());
    assert!(!Score::new(1, 0).is_feasible());
}

#[test]
fn test_all_unrouted_scores_one_hard_per_point() {
    let problem = create_scenario_problem();
    let mut solution = Solution::new(&problem);
    let evaluator = Evaluator::new(USE_PENALTY);

    let score = evaluator.full_evaluate(&problem, &mut solution);

    assert_eq!(score, Score::new(3, 0));
}

#[test]
fn test_overloaded_vehicle_scores_overflow() {
    let problem = create_scenario_problem();
    let mut solution = Solution::new(&problem);
    let evaluator = Evaluator::new(USE_PENALTY);

    // All three points on the 80 kg vehicle: load 120, overflow 40.
    solution.insert_after(0, Stop::Depot(1));
    solution.insert_after(1, Stop::Visit(0));
    solution.insert_after(2, Stop::Visit(1));

    let score = evaluator.full_evaluate(&problem, &mut solution);

    assert!(score.hard >= 40, "got {}", score);
    assert_eq!(score.hard, 40);
}

#[test]
fn test_feasible_split_scores_zero_hard() {
    let problem = create_scenario_problem();
    let mut solution = Solution::new(&problem);
    let evaluator = Evaluator::new(USE_PENALTY);

    // 40 + 50 = 90 on the 100 kg vehicle, 30 on the 80 kg vehicle.
    solution.insert_after(0, Stop::Depot(0));
    solution.insert_after(2, Stop::Visit(0));
    solution.insert_after(1, Stop::Depot(1));

    let score = evaluator.full_evaluate(&problem, &mut solution);

    assert_eq!(score.hard, 0);
}

#[test]
fn test_soft_score_sums_chain_edges_and_usage() {
    let problem = create_scenario_problem();
    let mut solution = Solution::new(&problem);
    let evaluator = Evaluator::new(USE_PENALTY);

    // depot -> p0 -> p1 on vehicle 0; vehicle 1 idle.
    solution.insert_after(0, Stop::Depot(0));
    solution.insert_after(1, Stop::Visit(0));
    solution.insert_after(2, Stop::Visit(1));

    let score = evaluator.full_evaluate(&problem, &mut solution);

    let distance = problem.depot_distance_m(0)
        + problem.point_distance_m(0, 1)
        + problem.point_distance_m(1, 2);
    assert_eq!(score.soft, distance + USE_PENALTY);

    // Spreading over both vehicles charges the penalty twice.
    solution.remove(2);
    solution.insert_after(2, Stop::Depot(1));
    let spread = evaluator.evaluate(&problem, &mut solution);
    let distance = problem.depot_distance_m(0)
        + problem.point_distance_m(0, 1)
        + problem.depot_distance_m(2);
    assert_eq!(spread.soft, distance + 2 * USE_PENALTY);
}

#[test]
fn test_incremental_matches_full_evaluation() {
    let problem = create_scenario_problem();
    let mut solution = Solution::new(&problem);
    let evaluator = Evaluator::new(USE_PENALTY);
    evaluator.full_evaluate(&problem, &mut solution);

    let script: Vec<(usize, Stop)> = vec![
        (0, Stop::Depot(0)),
        (1, Stop::Visit(0)),
        (2, Stop::Depot(1)),
    ];
    for (idx, anchor) in script {
        solution.insert_after(idx, anchor);
        let incremental = evaluator.evaluate(&problem, &mut solution);

        let mut fresh = solution.clone();
        let full = evaluator.full_evaluate(&problem, &mut fresh);
        assert_eq!(incremental, full);
    }

    solution.remove(1);
    let incremental = evaluator.evaluate(&problem, &mut solution);
    let mut fresh = solution.clone();
    assert_eq!(incremental, evaluator.full_evaluate(&problem, &mut fresh));
}

#[test]
fn test_insertion_delta_matches_recompute() {
    let problem = create_scenario_problem();
    let mut solution = Solution::new(&problem);
    let evaluator = Evaluator::new(USE_PENALTY);

    solution.insert_after(0, Stop::Depot(0));
    solution.insert_after(1, Stop::Visit(0));
    evaluator.full_evaluate(&problem, &mut solution);

    for anchor in [Stop::Depot(0), Stop::Visit(0), Stop::Visit(1)] {
        let predicted = evaluator.insertion_delta_m(&problem, &solution, 2, anchor);

        let mut applied = solution.clone();
        let before = applied.distance_m(0);
        applied.insert_after(2, anchor);
        applied.recompute_vehicle(&problem, 0);
        assert_eq!(predicted, applied.distance_m(0) - before, "anchor {:?}", anchor);
    }
}

#[test]
fn test_removal_delta_matches_recompute() {
    let problem = create_scenario_problem();
    let mut solution = Solution::new(&problem);
    let evaluator = Evaluator::new(USE_PENALTY);

    solution.insert_after(0, Stop::Depot(0));
    solution.insert_after(1, Stop::Visit(0));
    solution.insert_after(2, Stop::Visit(1));
    evaluator.full_evaluate(&problem, &mut solution);

    for idx in [0, 1, 2] {
        let predicted = evaluator.removal_delta_m(&problem, &solution, idx);

        let mut applied = solution.clone();
        let before = applied.distance_m(0);
        applied.remove(idx);
        applied.recompute_vehicle(&problem, 0);
        assert_eq!(predicted, applied.distance_m(0) - before, "removing {}", idx);
    }
}
