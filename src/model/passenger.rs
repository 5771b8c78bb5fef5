/**
 * A passenger waiting for, or riding in, an elevator.
 *
 * Mirrors `environment.py`'s `Passenger` class, but carries the origin and
 * destination floors as plain indices rather than references back into the
 * environment (see `SPEC_FULL.md`, "Index-based references").
 */
use crate::model::Direction;

#[derive(Debug, Clone)]
pub struct Passenger {
    pub id: u64,
    pub origin_floor: u8,
    pub destination_floor: u8,
    pub direction: Direction,
    /// Simulated time at which the passenger arrived at `origin_floor`.
    pub arrival_time: f64,
    /// Simulated time at which the passenger boarded an elevator, if any.
    pub board_time: Option<f64>,
    /// Simulated time at which the passenger reached `destination_floor`.
    pub exit_time: Option<f64>,
}

impl Passenger {
    pub fn new(
        id: u64,
        origin_floor: u8,
        destination_floor: u8,
        direction: Direction,
        arrival_time: f64,
    ) -> Self {
        Passenger {
            id,
            origin_floor,
            destination_floor,
            direction,
            arrival_time,
            board_time: None,
            exit_time: None,
        }
    }

    pub fn board(&mut self, time: f64) {
        self.board_time = Some(time);
    }

    pub fn exit(&mut self, time: f64) {
        self.exit_time = Some(time);
    }

    /// Seconds spent waiting at the origin floor before boarding.
    pub fn wait_time(&self) -> Option<f64> {
        self.board_time.map(|board| board - self.arrival_time)
    }

    /// Seconds spent riding the elevator, from boarding to exit.
    pub fn ride_time(&self) -> Option<f64> {
        match (self.board_time, self.exit_time) {
            (Some(board), Some(exit)) => Some(exit - board),
            _ => None,
        }
    }

    /// Total time from arrival at the origin floor to arrival at the
    /// destination floor.
    pub fn system_time(&self) -> Option<f64> {
        self.exit_time.map(|exit| exit - self.arrival_time)
    }

    /// Time spent waiting as of `current_time`: `current_time - arrival`
    /// while still WAITING, frozen at `board - arrival` once BOARDED (see
    /// the Passenger invariant that `waiting_time(t)` only advances while
    /// the passenger is waiting).
    pub fn waiting_time(&self, current_time: f64) -> f64 {
        match self.board_time {
            Some(board) => board - self.arrival_time,
            None => (current_time - self.arrival_time).max(0.0),
        }
    }

    /// Time spent riding as of `current_time`: `current_time - board` while
    /// BOARDED, frozen at `exit - board` once the passenger has exited, and
    /// zero before boarding.
    pub fn riding_time(&self, current_time: f64) -> f64 {
        match self.board_time {
            Some(board) => match self.exit_time {
                Some(exit) => exit - board,
                None => (current_time - board).max(0.0),
            },
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod passenger_tests {
    use super::*;

    #[test]
    fn test_wait_time_is_none_before_boarding() {
        // Arrange
        let p = Passenger::new(0, 3, 0, Direction::Down, 10.0);

        // Act
        let wait = p.wait_time();

        // Assert
        assert!(wait.is_none());
    }

    #[test]
    fn test_wait_and_ride_and_system_time_after_full_trip() {
        // Arrange
        let mut p = Passenger::new(1, 4, 0, Direction::Down, 10.0);

        // Act
        p.board(25.0);
        p.exit(40.0);

        // Assert
        assert!((p.wait_time().unwrap() - 15.0).abs() < 1e-9);
        assert!((p.ride_time().unwrap() - 15.0).abs() < 1e-9);
        assert!((p.system_time().unwrap() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_waiting_time_grows_with_current_time_before_boarding() {
        // Arrange
        let p = Passenger::new(2, 3, 0, Direction::Down, 10.0);

        // Act & Assert
        assert_eq!(p.waiting_time(10.0), 0.0);
        assert_eq!(p.waiting_time(25.0), 15.0);
    }

    #[test]
    fn test_waiting_time_freezes_once_boarded() {
        // Arrange
        let mut p = Passenger::new(3, 3, 0, Direction::Down, 10.0);
        p.board(25.0);

        // Act & Assert
        assert_eq!(p.waiting_time(25.0), 15.0);
        assert_eq!(p.waiting_time(100.0), 15.0);
    }

    #[test]
    fn test_riding_time_is_zero_before_boarding_and_grows_after() {
        // Arrange
        let mut p = Passenger::new(4, 3, 0, Direction::Down, 10.0);

        // Act & Assert
        assert_eq!(p.riding_time(15.0), 0.0);
        p.board(20.0);
        assert_eq!(p.riding_time(30.0), 10.0);
    }

    #[test]
    fn test_riding_time_freezes_once_exited() {
        // Arrange
        let mut p = Passenger::new(5, 3, 0, Direction::Down, 10.0);
        p.board(20.0);
        p.exit(35.0);

        // Act & Assert
        assert_eq!(p.riding_time(35.0), 15.0);
        assert_eq!(p.riding_time(100.0), 15.0);
    }
}
