//! Problem definition and data structures for the collection routing solver.

use crate::geo::{self, Coordinate};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// A capacity-bounded vehicle in the fleet.
///
/// Immutable for the duration of a solve. `current_load_kg` is carried
/// through from the fleet snapshot for reporting; scoring only ever uses
/// the demand chained onto the vehicle during the solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: u64,
    pub capacity_kg: f64,
    #[serde(default)]
    pub current_load_kg: f64,
}

impl Vehicle {
    pub fn new(id: u64, capacity_kg: f64) -> Self {
        Vehicle {
            id,
            capacity_kg,
            current_load_kg: 0.0,
        }
    }
}

/// A collection point to be visited exactly once.
///
/// The readiness flag and availability window come from the source data and
/// are carried through to the caller unchanged; the evaluated constraint set
/// does not enforce them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionPoint {
    pub id: u64,
    pub location: Coordinate,
    pub demand_kg: f64,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub available_from: Option<jiff::Timestamp>,
    #[serde(default)]
    pub available_until: Option<jiff::Timestamp>,
}

impl CollectionPoint {
    pub fn new(id: u64, location: Coordinate, demand_kg: f64) -> Self {
        CollectionPoint {
            id,
            location,
            demand_kg,
            ready: true,
            available_from: None,
            available_until: None,
        }
    }
}

/// The single depot every route starts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Depot {
    pub location: Coordinate,
}

impl Depot {
    pub fn new(location: Coordinate) -> Self {
        Depot { location }
    }
}

/// Rejections raised at problem-construction time, before any search runs.
#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("problem has no vehicles")]
    EmptyFleet,
    #[error("problem has no collection points")]
    NoCollectionPoints,
    #[error("{entity} {id} has coordinates outside [-90,90]/[-180,180]: ({lat}, {lon})")]
    InvalidCoordinate {
        entity: &'static str,
        id: u64,
        lat: f64,
        lon: f64,
    },
    #[error("collection point {id} has non-finite or negative demand: {demand}")]
    InvalidDemand { id: u64, demand: f64 },
    #[error("failed to read problem snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse problem snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An immutable routing problem instance.
///
/// Construction validates the snapshot and precomputes the pairwise
/// haversine distance matrix over the depot and all points. Location index 0
/// is the depot; point `p` sits at location index `p + 1`.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    pub vehicles: Vec<Vehicle>,
    pub points: Vec<CollectionPoint>,
    pub depot: Depot,
    #[serde(skip)]
    distance_matrix_m: Vec<i64>,
    #[serde(skip)]
    n_locations: usize,
}

impl Problem {
    pub fn new(
        vehicles: Vec<Vehicle>,
        points: Vec<CollectionPoint>,
        depot: Depot,
    ) -> Result<Self, ProblemError> {
        if vehicles.is_empty() {
            return Err(ProblemError::EmptyFleet);
        }
        if points.is_empty() {
            return Err(ProblemError::NoCollectionPoints);
        }
        if !depot.location.is_valid() {
            return Err(ProblemError::InvalidCoordinate {
                entity: "depot",
                id: 0,
                lat: depot.location.lat,
                lon: depot.location.lon,
            });
        }
        for point in &points {
            if !point.location.is_valid() {
                return Err(ProblemError::InvalidCoordinate {
                    entity: "collection point",
                    id: point.id,
                    lat: point.location.lat,
                    lon: point.location.lon,
                });
            }
            if !point.demand_kg.is_finite() || point.demand_kg < 0.0 {
                return Err(ProblemError::InvalidDemand {
                    id: point.id,
                    demand: point.demand_kg,
                });
            }
        }

        let mut problem = Problem {
            vehicles,
            points,
            depot,
            distance_matrix_m: Vec::new(),
            n_locations: 0,
        };
        problem.compute_distance_matrix();
        Ok(problem)
    }

    /// Load a problem snapshot from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProblemError> {
        let file = File::open(path)?;
        let raw: ProblemSnapshot = serde_json::from_reader(BufReader::new(file))?;
        Problem::new(raw.vehicles, raw.points, raw.depot)
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Location of a chain stop: the depot or a point.
    fn location(&self, loc_idx: usize) -> Coordinate {
        if loc_idx == 0 {
            self.depot.location
        } else {
            self.points[loc_idx - 1].location
        }
    }

    /// Distance in meters between two location indices (0 = depot).
    pub fn location_distance_m(&self, from: usize, to: usize) -> i64 {
        self.distance_matrix_m[from * self.n_locations + to]
    }

    /// Distance in meters between two points.
    pub fn point_distance_m(&self, from_point: usize, to_point: usize) -> i64 {
        self.location_distance_m(from_point + 1, to_point + 1)
    }

    /// Distance in meters between the depot and a point.
    pub fn depot_distance_m(&self, point: usize) -> i64 {
        self.location_distance_m(0, point + 1)
    }

    pub fn demand_kg(&self, point: usize) -> f64 {
        self.points[point].demand_kg
    }

    fn compute_distance_matrix(&mut self) {
        let n = self.points.len() + 1;
        self.n_locations = n;
        self.distance_matrix_m = vec![0; n * n];

        for i in 0..n {
            for j in 0..n {
                if i != j {
                    self.distance_matrix_m[i * n + j] =
                        geo::distance_m(self.location(i), self.location(j));
                }
            }
        }
    }
}

/// Wire shape of a problem snapshot, without the derived matrix.
#[derive(Deserialize)]
struct ProblemSnapshot {
    vehicles: Vec<Vehicle>,
    points: Vec<CollectionPoint>,
    depot: Depot,
}
