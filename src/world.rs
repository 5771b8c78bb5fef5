/**
 * Simulation world state.
 *
 * Owns every floor and elevator, the event queue, the traffic profile, and
 * the seeded RNG, and exposes the operations the scheduler drives: passenger
 * arrivals, decision-point state extraction, and SMDP cost accumulation.
 * Ported from `environment.py`'s `Environment` class, generalized per
 * `SPEC_FULL.md` §9 to carry no back-pointers: elevators and passengers
 * refer to floors by index, never by reference.
 */

/***************************************/
/*           Local modules             */
/***************************************/
use crate::constants::{COST_SCALE_FACTOR, DONE_BOARDING_EPS, PASSENGER_TRANSFER_SPACING};
use crate::controller::DecisionContext;
use crate::event::{Event, EventQueue};
use crate::model::{
    decision_distance, distance_traveled_since_decision, Action, Direction, Elevator, Floor,
    Passenger, Phase,
};
use crate::qlearning::State;
use crate::rng::SimRng;
use crate::traffic::TrafficProfile;

/***************************************/
/*       Public data structures        */
/***************************************/
pub struct World {
    pub floors: Vec<Floor>,
    pub elevators: Vec<Elevator>,
    pub traffic: TrafficProfile,
    pub events: EventQueue,
    pub rng: SimRng,
    pub time: f64,
    capacity: usize,
    next_passenger_id: u64,
    completed: Vec<Passenger>,
}

/***************************************/
/*             Public API              */
/***************************************/
impl World {
    pub fn new(
        num_floors: u8,
        num_elevators: u8,
        capacity: usize,
        traffic: TrafficProfile,
        seed: u64,
    ) -> Self {
        let mut world = World {
            floors: (0..num_floors).map(Floor::new).collect(),
            elevators: (0..num_elevators)
                .map(|id| Elevator::new(id, 0, capacity))
                .collect(),
            traffic,
            events: EventQueue::new(),
            rng: SimRng::seeded(seed),
            time: 0.0,
            capacity,
            next_passenger_id: 0,
            completed: Vec::new(),
        };
        world.schedule_next_arrival();
        world
    }

    /// Reset to the episode's initial state, replaying deterministically
    /// from the same seed.
    pub fn reset(&mut self) {
        let num_floors = self.floors.len() as u8;
        let num_elevators = self.elevators.len() as u8;
        self.floors = (0..num_floors).map(Floor::new).collect();
        self.elevators = (0..num_elevators)
            .map(|id| Elevator::new(id, 0, self.capacity))
            .collect();
        self.events.clear();
        self.rng.reset();
        self.time = 0.0;
        self.next_passenger_id = 0;
        self.completed.clear();
        self.schedule_next_arrival();
    }

    pub fn num_floors(&self) -> u8 {
        self.floors.len() as u8
    }

    pub fn schedule_next_arrival(&mut self) {
        let rate = self.traffic.total_rate(self.time, self.num_floors());
        let interarrival = if rate > 0.0 {
            self.rng.exponential(rate)
        } else {
            f64::INFINITY
        };
        let floor = self.traffic.sample_origin_floor(&mut self.rng, self.num_floors());
        self.events
            .schedule(self.time + interarrival, Event::PassengerArrival { floor });
    }

    /// Materialize a new arrival on `floor` and schedule the next one.
    pub fn spawn_arrival(&mut self, floor: u8) {
        let (destination, direction) =
            self.traffic.sample_destination(&mut self.rng, floor, self.num_floors());
        let passenger = Passenger::new(self.next_passenger_id, floor, destination, direction, self.time);
        self.next_passenger_id += 1;
        self.floors[floor as usize].enqueue(passenger);
        self.schedule_next_arrival();
    }

    /// Legal actions at an elevator's current decision point, i.e. the set
    /// of actions `World::decision_context` would hand a controller, before
    /// the two forced-singleton rules of `SPEC_FULL.md` §4.3 narrow it:
    ///
    /// - a boarded passenger's cab call targets the approaching floor, or
    ///   the approaching floor is the ground or top floor ⇒ `(Stop,)`;
    /// - otherwise, if nobody is waiting at the approaching floor in either
    ///   direction, or the car is already full ⇒ `(Continue,)`;
    /// - otherwise both actions are legal and the decision is learnable.
    ///
    /// The car-call rule is checked before the full/nobody-waiting rule, so
    /// a boarded passenger always gets off even if the car happens to be
    /// full at that instant (it cannot get fuller by someone getting off).
    pub fn legal_actions(&self, elevator_id: u8) -> Vec<Action> {
        let elevator = &self.elevators[elevator_id as usize];
        let stop_target = elevator.floor_to;
        let top_floor = self.num_floors() - 1;

        if stop_target == 0 || stop_target == top_floor {
            return vec![Action::Stop];
        }
        if elevator.has_cab_call(stop_target) {
            return vec![Action::Stop];
        }
        let nobody_waiting = !self.floors[stop_target as usize].has_call(Direction::Up)
            && !self.floors[stop_target as usize].has_call(Direction::Down);
        if nobody_waiting || elevator.is_full() {
            return vec![Action::Continue];
        }
        vec![Action::Stop, Action::Continue]
    }

    /// Extract the `LearningState` tuple key for `elevator_id`'s current
    /// decision point, relative to the floor it is approaching.
    pub fn extract_state(&self, elevator_id: u8) -> State {
        let elevator = &self.elevators[elevator_id as usize];
        let direction = elevator.direction.unwrap_or(Direction::Down);
        let stop_target = elevator.floor_to;

        State {
            hall_up_above: self.any_call_in(stop_target + 1..self.num_floors(), Direction::Up),
            hall_down_above: self.any_call_in(stop_target + 1..self.num_floors(), Direction::Down),
            hall_up_below: self.any_call_in(0..stop_target, Direction::Up),
            hall_down_below: self.any_call_in(0..stop_target, Direction::Down),
            num_car_calls_current_direction: self.car_calls_ahead(elevator, direction),
            floor: stop_target,
            direction,
        }
    }

    /// Build the full decision-point context a controller consults: the
    /// learned state and legal actions, plus the car-call/hall-call flags
    /// at the approaching floor that a heuristic controller (but not the
    /// Q-table) is allowed to see.
    pub fn decision_context(&self, elevator_id: u8) -> DecisionContext {
        let elevator = &self.elevators[elevator_id as usize];
        let direction = elevator.direction.unwrap_or(Direction::Down);
        let stop_target = elevator.floor_to;
        DecisionContext {
            state: self.extract_state(elevator_id),
            legal: self.legal_actions(elevator_id),
            car_call_here: elevator.has_cab_call(stop_target),
            hall_call_here: self.floors[stop_target as usize].has_call(direction),
        }
    }

    fn any_call_in(&self, floors: std::ops::Range<u8>, direction: Direction) -> bool {
        floors.map(|f| &self.floors[f as usize]).any(|floor| floor.has_call(direction))
    }

    /// Number of boarded passengers whose cab call lies ahead of
    /// `elevator`'s current floor in `direction` (the spec's `car_calls()`,
    /// counted rather than enumerated).
    fn car_calls_ahead(&self, elevator: &Elevator, direction: Direction) -> u8 {
        let from = elevator.floor_from;
        let count = match direction {
            Direction::Up => elevator.cab_calls.iter().filter(|&&f| f > from).count(),
            Direction::Down => elevator.cab_calls.iter().filter(|&&f| f < from).count(),
        };
        count as u8
    }

    /// Distance an elevator has covered since its last decision point, used
    /// to detect when the next decision point is reached.
    pub fn distance_since_decision(&self, elevator_id: u8) -> f64 {
        let elevator = &self.elevators[elevator_id as usize];
        distance_traveled_since_decision(elevator.phase, elevator.phase_elapsed)
    }

    pub fn decision_distance_for(&self, elevator_id: u8) -> f64 {
        decision_distance(self.elevators[elevator_id as usize].phase)
    }

    /// Current system-wide SMDP cost rate: the sum of squared waiting times
    /// of every passenger still waiting for an elevator, scaled by
    /// `COST_SCALE_FACTOR` (`SPEC_FULL.md` §4.7). Riding passengers
    /// contribute nothing once boarded — only wait time is penalized.
    /// Integrating this rate with the scheduler's fixed `TIME_STEP` is a
    /// rectangle-rule approximation of the spec's exact closed-form
    /// per-passenger discounted integral; see `DESIGN.md`.
    pub fn cost_rate(&self) -> f64 {
        let sum_squared_wait: f64 = self
            .floors
            .iter()
            .flat_map(|floor| {
                floor
                    .queue(Direction::Up)
                    .iter()
                    .chain(floor.queue(Direction::Down).iter())
            })
            .map(|passenger| passenger.waiting_time(self.time).powi(2))
            .sum();
        sum_squared_wait * COST_SCALE_FACTOR
    }

    /// Schedule the passenger-transfer sequence for an elevator that has
    /// just arrived and opened its doors at `floor`.
    pub fn begin_boarding(&mut self, elevator_id: u8) {
        let elevator = &mut self.elevators[elevator_id as usize];
        elevator.transition_phase(Phase::Boarding);
        let direction = elevator.direction;
        self.events.schedule(
            self.time,
            Event::PassengerTransfer {
                elevator: elevator_id,
                boarding_direction: direction.or(Some(Direction::Down)),
            },
        );
    }

    /// Process one passenger-transfer tick: alight everyone bound for this
    /// floor, then board one waiting passenger in `boarding_direction`
    /// (if any remain and capacity allows), and schedule either the next
    /// transfer tick or `BoardingComplete`.
    pub fn process_transfer(&mut self, elevator_id: u8, boarding_direction: Option<Direction>) {
        let floor_level = self.elevators[elevator_id as usize].floor_from;
        let alighted = self.elevators[elevator_id as usize].alight(floor_level);
        for mut passenger in alighted {
            passenger.exit(self.time);
            // Completed trips are handed to statistics by the scheduler,
            // which owns the writers; the world only mutates car/floor state.
            self.completed.push(passenger);
        }

        let boarded_one = if let Some(direction) = boarding_direction {
            let elevator = &mut self.elevators[elevator_id as usize];
            if elevator.is_full() {
                false
            } else {
                let floor = &mut self.floors[floor_level as usize];
                let mut taken = floor.take_boarding(direction, 1);
                if let Some(mut passenger) = taken.pop() {
                    passenger.board(self.time);
                    elevator.board(passenger);
                    true
                } else {
                    false
                }
            }
        } else {
            false
        };

        if boarded_one {
            self.events.schedule(
                self.time + PASSENGER_TRANSFER_SPACING,
                Event::PassengerTransfer {
                    elevator: elevator_id,
                    boarding_direction,
                },
            );
        } else {
            self.events.schedule(
                self.time + DONE_BOARDING_EPS,
                Event::BoardingComplete { elevator: elevator_id },
            );
        }
    }

    /// Passengers that have completed their trip since the last drain.
    pub fn drain_completed(&mut self) -> Vec<Passenger> {
        std::mem::take(&mut self.completed)
    }
}

#[cfg(test)]
mod world_tests {
    use super::*;
    use crate::traffic::TrafficProfile;

    fn test_world() -> World {
        World::new(6, 1, 20, TrafficProfile::down_peak(0.1), 42)
    }

    #[test]
    fn test_new_world_schedules_an_initial_arrival() {
        // Arrange & Act
        let world = test_world();

        // Assert
        assert!(!world.events.is_empty());
    }

    #[test]
    fn test_legal_actions_always_allow_stop_at_a_boundary_floor() {
        // Arrange
        let mut world = test_world();
        world.elevators[0].floor_from = world.num_floors() - 2;
        world.elevators[0].depart(Direction::Up);

        // Act
        let legal = world.legal_actions(0);

        // Assert
        assert_eq!(legal, vec![Action::Stop]);
    }

    #[test]
    fn test_legal_actions_forces_stop_when_car_call_targets_approaching_floor() {
        // Arrange
        let mut world = test_world();
        world.elevators[0].depart(Direction::Up);
        let target = world.elevators[0].floor_to;
        world.elevators[0].cab_calls.push(target);

        // Act
        let legal = world.legal_actions(0);

        // Assert
        assert_eq!(legal, vec![Action::Stop]);
    }

    #[test]
    fn test_legal_actions_forces_continue_when_full_and_no_car_call() {
        // Arrange
        let mut world = test_world();
        for i in 0..20 {
            world.elevators[0].board(Passenger::new(i, 0, 5, Direction::Up, 0.0));
        }
        world.elevators[0].depart(Direction::Up);
        world.floors[world.elevators[0].floor_to as usize]
            .enqueue(Passenger::new(999, world.elevators[0].floor_to, 5, Direction::Up, 0.0));

        // Act
        let legal = world.legal_actions(0);

        // Assert
        assert_eq!(legal, vec![Action::Continue]);
    }

    #[test]
    fn test_legal_actions_forces_continue_when_nobody_waiting() {
        // Arrange
        let mut world = test_world();
        world.elevators[0].depart(Direction::Up);

        // Act
        let legal = world.legal_actions(0);

        // Assert
        assert_eq!(legal, vec![Action::Continue]);
    }

    #[test]
    fn test_legal_actions_offers_both_when_waiting_and_not_full() {
        // Arrange
        let mut world = test_world();
        world.elevators[0].depart(Direction::Up);
        let target = world.elevators[0].floor_to;
        world.floors[target as usize].enqueue(Passenger::new(0, target, 5, Direction::Up, 0.0));

        // Act
        let legal = world.legal_actions(0);

        // Assert
        assert_eq!(legal.len(), 2);
        assert!(legal.contains(&Action::Stop));
        assert!(legal.contains(&Action::Continue));
    }

    #[test]
    fn test_cost_rate_counts_only_waiting_passengers_squared() {
        // Arrange
        let mut world = test_world();
        world.spawn_arrival(2);
        world.time = 10.0;

        // Act
        let cost = world.cost_rate();

        // Assert
        assert!(cost > 0.0);
    }

    #[test]
    fn test_cost_rate_ignores_boarded_passengers() {
        // Arrange
        let mut world = test_world();
        world.elevators[0].board(Passenger::new(0, 0, 5, Direction::Up, 0.0));

        // Act
        let cost = world.cost_rate();

        // Assert
        assert_eq!(cost, 0.0);
    }
}
