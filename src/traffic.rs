/**
 * Passenger arrival traffic profiles.
 *
 * A closed enum rather than a trait object (see `SPEC_FULL.md` §9,
 * "closed sum-type dispatch"): the simulator ships exactly one profile
 * today, down-peak, but the dispatch shape leaves room for more without
 * introducing `dyn` indirection on the scheduler's hot path.
 */
use crate::constants::{DOWNPEAK_RATES, MINUTES_PER_TIME_INTERVAL, SECONDS_PER_MINUTE};
use crate::model::Direction;
use crate::rng::SimRng;

#[derive(Debug, Clone)]
pub enum TrafficProfile {
    DownPeak(DownPeakProfile),
}

impl TrafficProfile {
    pub fn down_peak(interfloor: f64) -> Self {
        TrafficProfile::DownPeak(DownPeakProfile { interfloor })
    }

    /// Building-wide mean arrival rate (passengers/second) at `sim_time`.
    pub fn total_rate(&self, sim_time: f64, num_floors: u8) -> f64 {
        match self {
            TrafficProfile::DownPeak(profile) => profile.total_rate(sim_time, num_floors),
        }
    }

    /// Draw the floor a new arrival appears on. Never the ground floor:
    /// under down-peak traffic every passenger departs from an upper floor.
    pub fn sample_origin_floor(&self, rng: &mut SimRng, num_floors: u8) -> u8 {
        match self {
            TrafficProfile::DownPeak(_) => 1 + rng.uniform_index((num_floors - 1) as usize) as u8,
        }
    }

    /// Draw a destination floor and travel direction for a passenger
    /// departing `origin_floor`.
    pub fn sample_destination(
        &self,
        rng: &mut SimRng,
        origin_floor: u8,
        num_floors: u8,
    ) -> (u8, Direction) {
        match self {
            TrafficProfile::DownPeak(profile) => {
                profile.sample_destination(rng, origin_floor, num_floors)
            }
        }
    }
}

/// Standard elevator down-peak traffic profile: the great majority of
/// passengers travel from an upper floor down to the lobby, with a small
/// `interfloor` fraction instead traveling between two upper floors.
#[derive(Debug, Clone)]
pub struct DownPeakProfile {
    pub interfloor: f64,
}

impl DownPeakProfile {
    /// Mean arrivals per floor per second at `sim_time`, read off the
    /// piecewise-constant 5-minute interval table and held fixed past the
    /// last interval. The table entries are rates per minute *of the
    /// 5-minute interval itself* (passengers/floor over that interval),
    /// so converting to passengers/floor/second divides by
    /// `MINUTES_PER_TIME_INTERVAL`, not by `SECONDS_PER_MINUTE`.
    pub fn rate_per_floor(&self, sim_time: f64) -> f64 {
        let minutes = sim_time / SECONDS_PER_MINUTE;
        let interval = (minutes / MINUTES_PER_TIME_INTERVAL) as usize;
        let interval = interval.min(DOWNPEAK_RATES.len() - 1);
        DOWNPEAK_RATES[interval] / MINUTES_PER_TIME_INTERVAL
    }

    pub fn total_rate(&self, sim_time: f64, num_floors: u8) -> f64 {
        self.rate_per_floor(sim_time) * (num_floors as f64 - 1.0)
    }

    pub fn sample_destination(
        &self,
        rng: &mut SimRng,
        origin_floor: u8,
        num_floors: u8,
    ) -> (u8, Direction) {
        if num_floors > 2 && rng.uniform01() < self.interfloor {
            loop {
                let candidate = 1 + rng.uniform_index((num_floors - 1) as usize) as u8;
                if candidate != origin_floor {
                    let direction = if candidate > origin_floor {
                        Direction::Up
                    } else {
                        Direction::Down
                    };
                    return (candidate, direction);
                }
            }
        }
        (0, Direction::Down)
    }
}

#[cfg(test)]
mod traffic_tests {
    use super::*;

    #[test]
    fn test_rate_per_floor_uses_first_interval_at_time_zero() {
        // Arrange
        let profile = DownPeakProfile { interfloor: 0.0 };

        // Act
        let rate = profile.rate_per_floor(0.0);

        // Assert
        assert!((rate - DOWNPEAK_RATES[0] / MINUTES_PER_TIME_INTERVAL).abs() < 1e-12);
    }

    #[test]
    fn test_rate_per_floor_holds_last_interval_past_table_end() {
        // Arrange
        let profile = DownPeakProfile { interfloor: 0.0 };
        let far_future = 10_000.0;

        // Act
        let rate = profile.rate_per_floor(far_future);

        // Assert
        let last = *DOWNPEAK_RATES.last().unwrap() / MINUTES_PER_TIME_INTERVAL;
        assert!((rate - last).abs() < 1e-12);
    }

    #[test]
    fn test_rate_per_floor_matches_worked_example_at_minute_22() {
        // Arrange: minute 22 falls in interval 4 (minutes 20-25), rate 4.5.
        let profile = DownPeakProfile { interfloor: 0.0 };

        // Act
        let rate = profile.rate_per_floor(22.0 * SECONDS_PER_MINUTE);

        // Assert
        assert!((rate - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_sample_origin_floor_never_returns_ground_floor() {
        // Arrange
        let traffic = TrafficProfile::down_peak(0.0);
        let mut rng = SimRng::seeded(7);

        // Act & Assert
        for _ in 0..200 {
            let floor = traffic.sample_origin_floor(&mut rng, 10);
            assert_ne!(floor, 0);
        }
    }

    #[test]
    fn test_sample_destination_with_zero_interfloor_always_goes_to_lobby() {
        // Arrange
        let profile = DownPeakProfile { interfloor: 0.0 };
        let mut rng = SimRng::seeded(3);

        // Act
        let (dest, direction) = profile.sample_destination(&mut rng, 5, 10);

        // Assert
        assert_eq!(dest, 0);
        assert_eq!(direction, Direction::Down);
    }

    #[test]
    fn test_sample_destination_interfloor_never_targets_origin_floor() {
        // Arrange
        let profile = DownPeakProfile { interfloor: 1.0 };
        let mut rng = SimRng::seeded(11);

        // Act & Assert
        for _ in 0..100 {
            let (dest, _) = profile.sample_destination(&mut rng, 4, 10);
            assert_ne!(dest, 4);
        }
    }
}
