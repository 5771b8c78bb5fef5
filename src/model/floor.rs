/**
 * A building floor: its two hall-call buttons and the passengers currently
 * waiting under each.
 */
use crate::model::{Direction, Passenger};

#[derive(Debug, Clone, Default)]
pub struct Floor {
    pub level: u8,
    up_queue: Vec<Passenger>,
    down_queue: Vec<Passenger>,
}

impl Floor {
    pub fn new(level: u8) -> Self {
        Floor {
            level,
            up_queue: Vec::new(),
            down_queue: Vec::new(),
        }
    }

    fn queue_mut(&mut self, direction: Direction) -> &mut Vec<Passenger> {
        match direction {
            Direction::Up => &mut self.up_queue,
            Direction::Down => &mut self.down_queue,
        }
    }

    pub fn queue(&self, direction: Direction) -> &[Passenger] {
        match direction {
            Direction::Up => &self.up_queue,
            Direction::Down => &self.down_queue,
        }
    }

    pub fn enqueue(&mut self, passenger: Passenger) {
        let direction = passenger.direction;
        self.queue_mut(direction).push(passenger);
    }

    pub fn has_call(&self, direction: Direction) -> bool {
        !self.queue(direction).is_empty()
    }

    /// Remove and return up to `capacity` waiting passengers in FIFO order.
    pub fn take_boarding(&mut self, direction: Direction, capacity: usize) -> Vec<Passenger> {
        let queue = self.queue_mut(direction);
        let take = capacity.min(queue.len());
        queue.drain(0..take).collect()
    }

    pub fn waiting_count(&self, direction: Direction) -> usize {
        self.queue(direction).len()
    }
}

#[cfg(test)]
mod floor_tests {
    use super::*;

    #[test]
    fn test_enqueue_routes_by_passenger_direction() {
        // Arrange
        let mut floor = Floor::new(2);
        let up = Passenger::new(0, 2, 5, Direction::Up, 0.0);
        let down = Passenger::new(1, 2, 0, Direction::Down, 0.0);

        // Act
        floor.enqueue(up);
        floor.enqueue(down);

        // Assert
        assert_eq!(floor.waiting_count(Direction::Up), 1);
        assert_eq!(floor.waiting_count(Direction::Down), 1);
    }

    #[test]
    fn test_take_boarding_respects_capacity_and_fifo_order() {
        // Arrange
        let mut floor = Floor::new(0);
        for i in 0..5 {
            floor.enqueue(Passenger::new(i, 0, 5, Direction::Up, i as f64));
        }

        // Act
        let boarded = floor.take_boarding(Direction::Up, 3);

        // Assert
        assert_eq!(boarded.len(), 3);
        assert_eq!(boarded[0].id, 0);
        assert_eq!(boarded[2].id, 2);
        assert_eq!(floor.waiting_count(Direction::Up), 2);
    }

    #[test]
    fn test_has_call_reflects_queue_state() {
        // Arrange
        let mut floor = Floor::new(1);

        // Act & Assert
        assert!(!floor.has_call(Direction::Down));
        floor.enqueue(Passenger::new(0, 1, 0, Direction::Down, 0.0));
        assert!(floor.has_call(Direction::Down));
    }
}
