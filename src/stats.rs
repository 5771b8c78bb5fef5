/**
 * Statistics and persistence.
 *
 * Per-passenger trip records and per-episode summaries are appended to CSV
 * files (grounded in the `csv` crate usage in the example control-sim
 * package), and the learned Q-table is checkpointed to disk with `bincode`
 * (grounded in the example teng package's checkpoint format) so that
 * training can resume across process restarts.
 */

/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::Path;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::SimError;
use crate::model::{Action, Direction, Passenger};
use crate::qlearning::State;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Serialize)]
pub struct PassengerRecord {
    pub episode: u32,
    pub passenger_id: u64,
    pub origin_floor: u8,
    pub destination_floor: u8,
    pub arrival_time: f64,
    pub wait_time: f64,
    pub ride_time: f64,
    pub system_time: f64,
}

impl PassengerRecord {
    pub fn from_passenger(episode: u32, passenger: &Passenger) -> Option<Self> {
        Some(PassengerRecord {
            episode,
            passenger_id: passenger.id,
            origin_floor: passenger.origin_floor,
            destination_floor: passenger.destination_floor,
            arrival_time: passenger.arrival_time,
            wait_time: passenger.wait_time()?,
            ride_time: passenger.ride_time()?,
            system_time: passenger.system_time()?,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct EpisodeRecord {
    pub episode: u32,
    pub is_training: bool,
    pub total_cost: f64,
    pub mean_wait_time: f64,
    pub passengers_served: u64,
    pub temperature: f64,
    pub alpha: f64,
}

/// A hashable, serde-friendly stand-in for `(State, Action)` Q-table keys;
/// `HashMap` keys round-trip through a `Vec` since `bincode` cannot
/// serialize a map keyed by a tuple of enums directly into a stable schema.
#[derive(Debug, Serialize, Deserialize)]
struct QTableRecord {
    floor: u8,
    direction_up: bool,
    hall_up_above: bool,
    hall_down_above: bool,
    hall_up_below: bool,
    hall_down_below: bool,
    num_car_calls_current_direction: u8,
    action_stop: bool,
    value: f64,
}

/***************************************/
/*             Public API              */
/***************************************/
pub struct PassengerStatsWriter {
    writer: csv::Writer<File>,
}

impl PassengerStatsWriter {
    pub fn create_or_append(path: &Path) -> Result<Self, SimError> {
        let write_header = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        Ok(PassengerStatsWriter { writer })
    }

    pub fn record(&mut self, record: &PassengerRecord) -> Result<(), SimError> {
        self.writer.serialize(record)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SimError> {
        self.writer.flush()?;
        Ok(())
    }
}

pub struct EpisodeStatsWriter {
    writer: csv::Writer<File>,
}

impl EpisodeStatsWriter {
    pub fn create_or_append(path: &Path) -> Result<Self, SimError> {
        let write_header = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        Ok(EpisodeStatsWriter { writer })
    }

    pub fn record(&mut self, record: &EpisodeRecord) -> Result<(), SimError> {
        self.writer.serialize(record)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SimError> {
        self.writer.flush()?;
        Ok(())
    }
}

pub fn save_q_table(path: &Path, table: &HashMap<(State, Action), f64>) -> Result<(), SimError> {
    let records: Vec<QTableRecord> = table
        .iter()
        .map(|(&(state, action), &value)| QTableRecord {
            floor: state.floor,
            direction_up: state.direction == Direction::Up,
            hall_up_above: state.hall_up_above,
            hall_down_above: state.hall_down_above,
            hall_up_below: state.hall_up_below,
            hall_down_below: state.hall_down_below,
            num_car_calls_current_direction: state.num_car_calls_current_direction,
            action_stop: action == Action::Stop,
            value,
        })
        .collect();
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, &records)?;
    Ok(())
}

pub fn load_q_table(path: &Path) -> Result<HashMap<(State, Action), f64>, SimError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let records: Vec<QTableRecord> = bincode::deserialize_from(reader)?;
    Ok(records
        .into_iter()
        .map(|record| {
            let state = State {
                hall_up_above: record.hall_up_above,
                hall_down_above: record.hall_down_above,
                hall_up_below: record.hall_up_below,
                hall_down_below: record.hall_down_below,
                num_car_calls_current_direction: record.num_car_calls_current_direction,
                floor: record.floor,
                direction: if record.direction_up {
                    Direction::Up
                } else {
                    Direction::Down
                },
            };
            let action = if record.action_stop {
                Action::Stop
            } else {
                Action::Continue
            };
            ((state, action), record.value)
        })
        .collect())
}

/***************************************/
/*              Test API               */
/***************************************/
#[cfg(test)]
mod stats_tests {
    use super::*;

    #[test]
    fn test_passenger_record_from_passenger_requires_completed_trip() {
        // Arrange
        let mut p = Passenger::new(0, 4, 0, Direction::Down, 0.0);

        // Act
        let before_boarding = PassengerRecord::from_passenger(0, &p);
        p.board(10.0);
        p.exit(20.0);
        let after_trip = PassengerRecord::from_passenger(0, &p);

        // Assert
        assert!(before_boarding.is_none());
        assert!(after_trip.is_some());
        assert!((after_trip.unwrap().wait_time - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_q_table_round_trips_through_bincode() {
        // Arrange
        let dir = std::env::temp_dir();
        let path = dir.join("elevator_sim_test_qtable.bin");
        let mut table = HashMap::new();
        let state = State {
            hall_up_above: true,
            hall_down_above: false,
            hall_up_below: false,
            hall_down_below: true,
            num_car_calls_current_direction: 2,
            floor: 2,
            direction: Direction::Up,
        };
        table.insert((state, Action::Stop), 3.25);

        // Act
        save_q_table(&path, &table).unwrap();
        let loaded = load_q_table(&path).unwrap();

        // Assert
        assert_eq!(loaded.get(&(state, Action::Stop)), Some(&3.25));
        let _ = std::fs::remove_file(&path);
    }
}
