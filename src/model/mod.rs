//! Physical and logical entities the simulation manipulates: passengers,
//! floors, elevators, and the elevator's accel/decel motion profile.

mod elevator;
mod floor;
mod motion;
mod passenger;

pub use elevator::{Action, Elevator, Phase};
pub use floor::Floor;
pub use motion::{
    decision_distance, distance_decelerated, distance_traveled_since_decision,
    travel_time_between_floors,
};
pub use passenger::Passenger;

/// Direction of travel or of a hall call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}
