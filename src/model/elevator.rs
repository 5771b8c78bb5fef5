/**
 * Elevator car state machine.
 *
 * Phases mirror `environment.py`'s `ElevatorState`: a car sits `Idle` at a
 * floor, `Boarding` while passengers transfer, `DoneBoarding` once transfers
 * finish but before a new direction has been chosen, then `Accelerating`
 * away from the floor, cruising at `FullSpeed`, and decelerating into the
 * next stop along one of two distinct profiles depending on which phase the
 * stop decision was made in: `AccelDecelerating` (decided to stop before
 * ever reaching full speed) or `FullSpeedDecelerating` (decided to stop
 * while cruising). `Action` is the controller's binary decision at each
 * decision point (see `SPEC_FULL.md` §4.4): continue past the approaching
 * floor, or commit to stopping there.
 */
use crate::model::{Direction, Passenger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Boarding,
    DoneBoarding,
    Accelerating,
    FullSpeed,
    AccelDecelerating,
    FullSpeedDecelerating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Continue,
    Stop,
}

#[derive(Debug, Clone)]
pub struct Elevator {
    pub id: u8,
    pub phase: Phase,
    /// Floor the car last departed from, or currently sits at when idle.
    pub floor_from: u8,
    /// Floor the car is currently approaching or, once idle, sitting at.
    pub floor_to: u8,
    pub direction: Option<Direction>,
    /// Seconds elapsed in the current phase.
    pub phase_elapsed: f64,
    pub passengers: Vec<Passenger>,
    /// Floors requested by riders already aboard (cab calls).
    pub cab_calls: Vec<u8>,
    pub capacity: usize,
    /// Set once the accelerating-phase decision point has been crossed for
    /// the current leg, so it fires exactly once (`SPEC_FULL.md` §4.3).
    pub accelerating_decision_made: bool,
    /// Set once the full-speed-phase decision point has been crossed for
    /// the current leg.
    pub full_speed_decision_made: bool,
}

impl Elevator {
    pub fn new(id: u8, start_floor: u8, capacity: usize) -> Self {
        Elevator {
            id,
            phase: Phase::Idle,
            floor_from: start_floor,
            floor_to: start_floor,
            direction: None,
            phase_elapsed: 0.0,
            passengers: Vec::new(),
            cab_calls: Vec::new(),
            capacity,
            accelerating_decision_made: false,
            full_speed_decision_made: false,
        }
    }

    pub fn current_floor(&self) -> u8 {
        self.floor_from
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    pub fn is_moving(&self) -> bool {
        matches!(
            self.phase,
            Phase::Accelerating
                | Phase::FullSpeed
                | Phase::AccelDecelerating
                | Phase::FullSpeedDecelerating
        )
    }

    pub fn is_decelerating(&self) -> bool {
        matches!(self.phase, Phase::AccelDecelerating | Phase::FullSpeedDecelerating)
    }

    pub fn occupancy(&self) -> usize {
        self.passengers.len()
    }

    pub fn capacity_remaining(&self) -> usize {
        self.capacity.saturating_sub(self.occupancy())
    }

    pub fn is_full(&self) -> bool {
        self.capacity_remaining() == 0
    }

    /// Begin moving away from `floor_from` in `direction`, targeting the
    /// very next floor (the elevator only ever commits one floor ahead;
    /// whether it goes further is decided fresh at the next decision point).
    pub fn depart(&mut self, direction: Direction) {
        self.direction = Some(direction);
        self.floor_to = next_floor(self.floor_from, direction);
        self.phase = Phase::Accelerating;
        self.phase_elapsed = 0.0;
        self.accelerating_decision_made = false;
        self.full_speed_decision_made = false;
    }

    /// Having passed a decision point with `Action::Continue`, advance one
    /// floor and resume at full speed, re-arming the next decision point.
    pub fn continue_past(&mut self) {
        let direction = self.direction.expect("elevator must be moving to continue");
        self.floor_from = self.floor_to;
        self.floor_to = next_floor(self.floor_from, direction);
        self.phase = Phase::FullSpeed;
        self.phase_elapsed = 0.0;
        self.full_speed_decision_made = false;
    }

    /// Commit to stopping at `floor_to`, decelerating along the profile
    /// matching the phase the decision was made in.
    pub fn commit_to_stop(&mut self) {
        self.phase = match self.phase {
            Phase::Accelerating => Phase::AccelDecelerating,
            _ => Phase::FullSpeedDecelerating,
        };
        self.phase_elapsed = 0.0;
    }

    /// Whether the decision point for the current phase has already fired,
    /// so the motion integrator must not schedule a second `DecisionPoint`
    /// event before the elevator leaves this phase.
    pub fn decision_already_made(&self) -> bool {
        match self.phase {
            Phase::Accelerating => self.accelerating_decision_made,
            Phase::FullSpeed => self.full_speed_decision_made,
            _ => true,
        }
    }

    /// Mark the decision point for the current phase as fired.
    pub fn mark_decision_made(&mut self) {
        match self.phase {
            Phase::Accelerating => self.accelerating_decision_made = true,
            Phase::FullSpeed => self.full_speed_decision_made = true,
            _ => {}
        }
    }

    pub fn transition_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.phase_elapsed = 0.0;
    }

    /// The car has finished decelerating and arrived at `floor_to`.
    pub fn arrive(&mut self) {
        self.floor_from = self.floor_to;
        self.direction = None;
        self.phase = Phase::Idle;
        self.phase_elapsed = 0.0;
    }

    pub fn board(&mut self, passenger: Passenger) {
        self.cab_calls.push(passenger.destination_floor);
        self.passengers.push(passenger);
    }

    /// Remove and return every passenger whose destination is `floor`.
    pub fn alight(&mut self, floor: u8) -> Vec<Passenger> {
        let (leaving, staying): (Vec<_>, Vec<_>) = self
            .passengers
            .drain(..)
            .partition(|p| p.destination_floor == floor);
        self.passengers = staying;
        self.cab_calls.retain(|&f| f != floor);
        leaving
    }

    pub fn has_cab_call(&self, floor: u8) -> bool {
        self.cab_calls.contains(&floor)
    }
}

fn next_floor(from: u8, direction: Direction) -> u8 {
    match direction {
        Direction::Up => from + 1,
        Direction::Down => from.saturating_sub(1),
    }
}

#[cfg(test)]
mod elevator_tests {
    use super::*;

    #[test]
    fn test_new_elevator_starts_idle_and_empty() {
        // Arrange & Act
        let e = Elevator::new(0, 0, 20);

        // Assert
        assert!(e.is_idle());
        assert_eq!(e.occupancy(), 0);
        assert_eq!(e.capacity_remaining(), 20);
    }

    #[test]
    fn test_depart_targets_the_very_next_floor_not_a_distant_target() {
        // Arrange
        let mut e = Elevator::new(0, 2, 20);

        // Act
        e.depart(Direction::Up);

        // Assert
        assert_eq!(e.phase, Phase::Accelerating);
        assert_eq!(e.direction, Some(Direction::Up));
        assert_eq!(e.floor_to, 3);
    }

    #[test]
    fn test_continue_past_advances_floor_from_and_rearms_floor_to() {
        // Arrange
        let mut e = Elevator::new(0, 2, 20);
        e.depart(Direction::Up);

        // Act
        e.continue_past();

        // Assert
        assert_eq!(e.floor_from, 3);
        assert_eq!(e.floor_to, 4);
        assert_eq!(e.phase, Phase::FullSpeed);
    }

    #[test]
    fn test_commit_to_stop_does_not_change_floor_to() {
        // Arrange
        let mut e = Elevator::new(0, 2, 20);
        e.depart(Direction::Up);

        // Act
        e.commit_to_stop();

        // Assert
        assert_eq!(e.floor_to, 3);
        assert_eq!(e.phase, Phase::AccelDecelerating);
    }

    #[test]
    fn test_commit_to_stop_from_full_speed_uses_full_speed_decel_profile() {
        // Arrange
        let mut e = Elevator::new(0, 2, 20);
        e.depart(Direction::Up);
        e.continue_past();

        // Act
        e.commit_to_stop();

        // Assert
        assert_eq!(e.phase, Phase::FullSpeedDecelerating);
    }

    #[test]
    fn test_arrive_lands_on_floor_to_and_clears_direction() {
        // Arrange
        let mut e = Elevator::new(0, 2, 20);
        e.depart(Direction::Up);
        e.commit_to_stop();

        // Act
        e.arrive();

        // Assert
        assert_eq!(e.floor_from, 3);
        assert_eq!(e.direction, None);
        assert_eq!(e.phase, Phase::Idle);
    }

    #[test]
    fn test_alight_only_removes_matching_destination() {
        // Arrange
        let mut e = Elevator::new(0, 0, 20);
        e.board(Passenger::new(0, 0, 3, Direction::Up, 0.0));
        e.board(Passenger::new(1, 0, 5, Direction::Up, 0.0));

        // Act
        let left = e.alight(3);

        // Assert
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, 0);
        assert_eq!(e.occupancy(), 1);
        assert!(!e.has_cab_call(3));
        assert!(e.has_cab_call(5));
    }

    #[test]
    fn test_is_full_once_capacity_reached() {
        // Arrange
        let mut e = Elevator::new(0, 0, 3);

        // Act
        for i in 0..3 {
            e.board(Passenger::new(i as u64, 0, 5, Direction::Up, 0.0));
        }

        // Assert
        assert!(e.is_full());
    }
}
