//! Unit tests for problem construction and validation.

use leafroute::geo::Coordinate;
use leafroute::problem::{CollectionPoint, Depot, Problem, ProblemError, Vehicle};

fn depot() -> Depot {
    Depot::new(Coordinate::new(10.0, 76.0))
}

fn point(id: u64, lat: f64, lon: f64, demand: f64) -> CollectionPoint {
    CollectionPoint::new(id, Coordinate::new(lat, lon), demand)
}

#[test]
fn test_empty_fleet_is_rejected() {
    let result = Problem::new(vec![], vec![point(1, 10.1, 76.1, 5.0)], depot());
    assert!(matches!(result, Err(ProblemError::EmptyFleet)));
}

#[test]
fn test_empty_point_set_is_rejected() {
    let result = Problem::new(vec![Vehicle::new(1, 100.0)], vec![], depot());
    assert!(matches!(result, Err(ProblemError::NoCollectionPoints)));
}

#[test]
fn test_out_of_range_coordinates_are_rejected() {
    let result = Problem::new(
        vec![Vehicle::new(1, 100.0)],
        vec![point(7, 91.0, 76.1, 5.0)],
        depot(),
    );
    assert!(matches!(
        result,
        Err(ProblemError::InvalidCoordinate { id: 7, .. })
    ));

    let result = Problem::new(
        vec![Vehicle::new(1, 100.0)],
        vec![point(8, 10.1, -181.0, 5.0)],
        depot(),
    );
    assert!(matches!(
        result,
        Err(ProblemError::InvalidCoordinate { id: 8, .. })
    ));
}

#[test]
fn test_negative_demand_is_rejected() {
    let result = Problem::new(
        vec![Vehicle::new(1, 100.0)],
        vec![point(3, 10.1, 76.1, -1.0)],
        depot(),
    );
    assert!(matches!(result, Err(ProblemError::InvalidDemand { id: 3, .. })));
}

#[test]
fn test_distance_matrix_agrees_with_geo() {
    let p1 = point(1, 10.1, 76.1, 5.0);
    let p2 = point(2, 10.4, 76.3, 5.0);
    let d = depot();

    let expected_depot_p1 = leafroute::geo::distance_m(d.location, p1.location);
    let expected_p1_p2 = leafroute::geo::distance_m(p1.location, p2.location);

    let problem = Problem::new(vec![Vehicle::new(1, 100.0)], vec![p1, p2], d).unwrap();

    assert_eq!(problem.depot_distance_m(0), expected_depot_p1);
    assert_eq!(problem.point_distance_m(0, 1), expected_p1_p2);
    assert_eq!(problem.point_distance_m(0, 1), problem.point_distance_m(1, 0));
    assert_eq!(problem.point_distance_m(0, 0), 0);
}

#[test]
fn test_degenerate_solve_fails_fast() {
    let problem = Problem::new(
        vec![Vehicle::new(1, 100.0)],
        vec![point(1, 10.1, 76.1, 5.0)],
        depot(),
    )
    .unwrap();

    let mut degenerate = problem.clone();
    degenerate.vehicles.clear();

    let solver = leafroute::Solver::new(leafroute::SolverConfig::new());
    assert!(matches!(
        solver.solve(&degenerate),
        Err(leafroute::SolverError::InvalidProblem(_))
    ));
}
