//! Unit tests for the chained solution representation.

use leafroute::geo::Coordinate;
use leafroute::problem::{CollectionPoint, Depot, Problem, Vehicle};
use leafroute::solution::{Solution, Stop};

/// Two vehicles and four points on a short stretch of coastline.
fn create_test_problem() -> Problem {
    let depot = Depot::new(Coordinate::new(10.0, 76.0));
    let points = vec![
        CollectionPoint::new(101, Coordinate::new(10.1, 76.0), 10.0),
        CollectionPoint::new(102, Coordinate::new(10.2, 76.0), 20.0),
        CollectionPoint::new(103, Coordinate::new(10.3, 76.0), 30.0),
        CollectionPoint::new(104, Coordinate::new(10.4, 76.0), 40.0),
    ];
    let vehicles = vec![Vehicle::new(1, 100.0), Vehicle::new(2, 100.0)];

    Problem::new(vehicles, points, depot).unwrap()
}

#[test]
fn test_new_solution_is_all_unrouted() {
    let problem = create_test_problem();
    let solution = Solution::new(&problem);

    assert_eq!(solution.unassigned_count(), 4);
    for idx in 0..solution.assignment_count() {
        assert!(solution.assignment(idx).vehicle.is_none());
        assert!(solution.assignment(idx).previous.is_none());
    }
    assert_eq!(solution.head(0), None);
    assert_eq!(solution.tail(1), None);
}

#[test]
fn test_insert_builds_chain_links() {
    let problem = create_test_problem();
    let mut solution = Solution::new(&problem);

    solution.insert_after(0, Stop::Depot(0));
    solution.insert_after(1, Stop::Visit(0));
    solution.insert_after(2, Stop::Depot(0));

    // Chain is now depot -> 2 -> 0 -> 1.
    assert_eq!(solution.chain(0), vec![2, 0, 1]);
    assert_eq!(solution.head(0), Some(2));
    assert_eq!(solution.tail(0), Some(1));
    assert_eq!(solution.assignment(0).previous, Some(Stop::Visit(2)));
    assert_eq!(solution.assignment(2).previous, Some(Stop::Depot(0)));
    assert_eq!(solution.unassigned_count(), 1);
}

#[test]
fn test_remove_relinks_neighbors() {
    let problem = create_test_problem();
    let mut solution = Solution::new(&problem);

    solution.insert_after(0, Stop::Depot(0));
    solution.insert_after(1, Stop::Visit(0));
    solution.insert_after(2, Stop::Visit(1));

    let prev = solution.remove(1);

    assert_eq!(prev, Stop::Visit(0));
    assert_eq!(solution.chain(0), vec![0, 2]);
    assert_eq!(solution.assignment(2).previous, Some(Stop::Visit(0)));
    assert!(solution.assignment(1).vehicle.is_none());
    assert_eq!(solution.unassigned_count(), 2);

    // Removing the tail pulls the tail pointer back.
    solution.remove(2);
    assert_eq!(solution.tail(0), Some(0));

    // Removing the last visit empties the chain entirely.
    solution.remove(0);
    assert_eq!(solution.head(0), None);
    assert_eq!(solution.tail(0), None);
    assert_eq!(solution.unassigned_count(), 4);
}

#[test]
fn test_walk_to_vehicle_terminates() {
    let problem = create_test_problem();
    let mut solution = Solution::new(&problem);

    solution.insert_after(0, Stop::Depot(1));
    solution.insert_after(1, Stop::Visit(0));
    solution.insert_after(2, Stop::Visit(1));
    solution.insert_after(3, Stop::Visit(2));

    // Every routed assignment walks back to its vehicle within the
    // assignment-count step bound.
    for idx in 0..4 {
        assert_eq!(solution.walk_to_vehicle(idx), Some(1));
    }

    solution.remove(3);
    assert_eq!(solution.walk_to_vehicle(3), None);
}

#[test]
fn test_relink_chain_reorders() {
    let problem = create_test_problem();
    let mut solution = Solution::new(&problem);

    solution.insert_after(0, Stop::Depot(0));
    solution.insert_after(1, Stop::Visit(0));
    solution.insert_after(2, Stop::Visit(1));

    solution.relink_chain(0, &[2, 0, 1]);

    assert_eq!(solution.chain(0), vec![2, 0, 1]);
    assert_eq!(solution.assignment(2).previous, Some(Stop::Depot(0)));
    assert_eq!(solution.tail(0), Some(1));
    for idx in [0, 1, 2] {
        assert_eq!(solution.walk_to_vehicle(idx), Some(0));
    }
}

#[test]
fn test_recompute_vehicle_caches() {
    let problem = create_test_problem();
    let mut solution = Solution::new(&problem);

    solution.insert_after(0, Stop::Depot(0));
    solution.insert_after(1, Stop::Visit(0));

    solution.recompute_vehicle(&problem, 0);

    assert_eq!(solution.load_kg(0), 30.0);
    let expected = problem.depot_distance_m(0) + problem.point_distance_m(0, 1);
    assert_eq!(solution.distance_m(0), expected);
    assert!(!solution.is_dirty(0));
}

#[test]
fn test_snapshot_reports_routes_and_unassigned() {
    let problem = create_test_problem();
    let mut solution = Solution::new(&problem);

    solution.insert_after(1, Stop::Depot(0));
    solution.insert_after(3, Stop::Visit(1));
    solution.insert_after(0, Stop::Depot(1));

    let snapshot = solution.to_snapshot(&problem);

    assert_eq!(snapshot.routes[0].vehicle_id, 1);
    assert_eq!(snapshot.routes[0].stops, vec![102, 104]);
    assert_eq!(snapshot.routes[1].stops, vec![101]);
    assert_eq!(snapshot.unassigned, vec![103]);
}
