/**
 * Elevator accel/decel kinematics.
 *
 * Ported from `environment.py`'s `ElevatorMotion` helpers: a sinusoidal
 * velocity ramp to `MAX_SPEED` over `ACCEL_TIME` seconds, the two decision
 * distances at which a moving elevator's controller is asked whether to
 * stop at the approaching floor, and the two distinct deceleration
 * profiles a car follows once it commits to stopping, depending on
 * whether it was still accelerating or already at full speed (see
 * `SPEC_FULL.md` §4.1/§4.3).
 */
use crate::constants::{
    ACCEL_CONST, ACCEL_DECEL, ACCEL_DECISION_DIST, ACCEL_TIME, FLOOR_HEIGHT,
    FULL_SPEED_DECISION_DIST, MAX_SPEED,
};
use crate::model::Phase;

/// Instantaneous speed during the acceleration ramp at time `t`: a half
/// cosine ramp from `0` to `MAX_SPEED` over `[0, ACCEL_TIME]`.
pub fn accel_speed(t: f64) -> f64 {
    let t = t.clamp(0.0, ACCEL_TIME);
    (MAX_SPEED / 2.0) * (1.0 - (ACCEL_CONST * t).cos())
}

/// Distance covered during the acceleration ramp up to time `t`, the
/// integral of `accel_speed`.
pub fn accel_distance(t: f64) -> f64 {
    let t = t.clamp(0.0, ACCEL_TIME);
    (MAX_SPEED / 2.0) * t - (MAX_SPEED / (2.0 * ACCEL_CONST)) * (ACCEL_CONST * t).sin()
}

/// Total distance covered by the acceleration ramp.
pub fn accel_distance_total() -> f64 {
    accel_distance(ACCEL_TIME)
}

/// Distance covered while decelerating from full speed to rest, `t` seconds
/// into the stop: the acceleration ramp run in reverse.
pub fn full_speed_decel_distance(t: f64) -> f64 {
    let t = t.clamp(0.0, ACCEL_TIME);
    accel_distance_total() - accel_distance(ACCEL_TIME - t)
}

/// Distance covered `t` seconds into the unique deceleration that brings a
/// car which decided to stop while still accelerating to rest exactly one
/// half floor past the decision point, per the `ACCEL_DECEL` coefficients.
pub fn accel_decel_distance(t: f64) -> f64 {
    let t = t.clamp(0.0, ACCEL_TIME);
    let (c0, c1, c2, c3) = ACCEL_DECEL;
    c0 * t + c1 * t.powi(2) + c2 * t.powi(3) + c3 * t.powi(4)
}

/// Distance, measured from the decision point, at which the controller must
/// decide whether to stop, depending on the elevator's current phase.
pub fn decision_distance(phase: Phase) -> f64 {
    match phase {
        Phase::Accelerating => ACCEL_DECISION_DIST,
        Phase::FullSpeed => FULL_SPEED_DECISION_DIST,
        Phase::AccelDecelerating
        | Phase::FullSpeedDecelerating
        | Phase::Idle
        | Phase::Boarding
        | Phase::DoneBoarding => 0.0,
    }
}

/// Distance an elevator has traveled since it last crossed a decision point,
/// given the elapsed time in the current phase.
pub fn distance_traveled_since_decision(phase: Phase, elapsed: f64) -> f64 {
    match phase {
        Phase::Accelerating => accel_distance(elapsed),
        Phase::FullSpeed => MAX_SPEED * elapsed,
        Phase::AccelDecelerating
        | Phase::FullSpeedDecelerating
        | Phase::Idle
        | Phase::Boarding
        | Phase::DoneBoarding => 0.0,
    }
}

/// Distance covered since a stop was committed to, `elapsed` seconds into
/// one of the two deceleration phases.
pub fn distance_decelerated(phase: Phase, elapsed: f64) -> f64 {
    match phase {
        Phase::AccelDecelerating => accel_decel_distance(elapsed),
        Phase::FullSpeedDecelerating => full_speed_decel_distance(elapsed),
        _ => 0.0,
    }
}

/// Time to travel the full height of one floor at full speed, ignoring
/// acceleration, used as an approximation for dispatch heuristics.
pub fn floor_travel_time_at_full_speed() -> f64 {
    FLOOR_HEIGHT / MAX_SPEED
}

/// Approximate travel time between two floors `num_floors_apart` floors
/// apart for an elevator starting and ending at rest: one acceleration
/// ramp, a full-speed cruise for any floors beyond the first, and a
/// matching deceleration ramp.
pub fn travel_time_between_floors(num_floors_apart: u32) -> f64 {
    if num_floors_apart == 0 {
        return 0.0;
    }
    let total_distance = FLOOR_HEIGHT * num_floors_apart as f64;
    let ramp_distance = accel_distance_total();
    if total_distance <= 2.0 * ramp_distance {
        // Never reaches full speed; approximate with a scaled ramp time.
        2.0 * ACCEL_TIME * (total_distance / (2.0 * ramp_distance)).sqrt()
    } else {
        let cruise_distance = total_distance - 2.0 * ramp_distance;
        2.0 * ACCEL_TIME + cruise_distance / MAX_SPEED
    }
}

#[cfg(test)]
mod motion_tests {
    use super::*;

    #[test]
    fn test_accel_distance_is_zero_at_start_and_monotonic() {
        // Arrange & Act
        let d0 = accel_distance(0.0);
        let d_mid = accel_distance(ACCEL_TIME / 2.0);
        let d_end = accel_distance(ACCEL_TIME);

        // Assert
        assert!(d0.abs() < 1e-9);
        assert!(d_mid < d_end);
        assert!(d_end > 0.0);
    }

    #[test]
    fn test_accel_speed_reaches_approximately_max_speed_at_accel_time() {
        // Arrange & Act
        let speed = accel_speed(ACCEL_TIME);

        // Assert
        assert!((speed - MAX_SPEED).abs() < 0.05);
    }

    #[test]
    fn test_accel_speed_is_zero_at_start() {
        // Arrange & Act
        let speed = accel_speed(0.0);

        // Assert
        assert!(speed.abs() < 1e-9);
    }

    #[test]
    fn test_full_speed_decel_distance_reaches_accel_distance_total_at_accel_time() {
        // Arrange & Act
        let distance = full_speed_decel_distance(ACCEL_TIME);

        // Assert
        assert!((distance - accel_distance_total()).abs() < 1e-6);
    }

    #[test]
    fn test_decision_distance_differs_by_phase() {
        // Arrange & Act & Assert
        assert_eq!(decision_distance(Phase::Accelerating), ACCEL_DECISION_DIST);
        assert_eq!(decision_distance(Phase::FullSpeed), FULL_SPEED_DECISION_DIST);
        assert_eq!(decision_distance(Phase::Idle), 0.0);
        assert_eq!(decision_distance(Phase::AccelDecelerating), 0.0);
        assert_eq!(decision_distance(Phase::DoneBoarding), 0.0);
    }

    #[test]
    fn test_travel_time_between_adjacent_floors_is_positive_and_less_than_two_floors() {
        // Arrange & Act
        let one_floor = travel_time_between_floors(1);
        let two_floors = travel_time_between_floors(2);

        // Assert
        assert!(one_floor > 0.0);
        assert!(two_floors > one_floor);
    }

    #[test]
    fn test_travel_time_between_floors_zero_apart_is_zero() {
        // Arrange & Act
        let time = travel_time_between_floors(0);

        // Assert
        assert_eq!(time, 0.0);
    }
}
