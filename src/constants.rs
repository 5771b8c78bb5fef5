/***************************************/
/*       Derived physical constants     */
/***************************************/
//! Literal constants pinned by the simulation model. These are not
//! configurable: they describe the physical elevator and the traffic
//! profile this simulator was built to reproduce.

/// Vertical distance between adjacent floors, in meters.
pub const FLOOR_HEIGHT: f64 = 3.66;
/// Maximum elevator speed, in m/s.
pub const MAX_SPEED: f64 = 2.54;
/// Angular constant of the sinusoidal accel/decel profile.
pub const ACCEL_CONST: f64 = 0.8871057;
/// Seconds to accelerate to full speed from a standstill.
pub const ACCEL_TIME: f64 = 3.595;
/// Distance from the last floor at which the accelerating decision point falls.
pub const ACCEL_DECISION_DIST: f64 = 1.83;
/// Distance from the last floor at which the full-speed decision point falls.
pub const FULL_SPEED_DECISION_DIST: f64 = 2.6836781597;
/// Fixed physics integration timestep, in seconds.
pub const TIME_STEP: f64 = 0.01;
/// General floating-point comparison tolerance used throughout the crate.
pub const GENERAL_EPS: f64 = 1e-4;
/// Episodes between reinforcement-learning status printouts.
pub const NUM_EPS_UPDATE: u32 = 5;

/// Coefficients (c0, c1, c2, c3) of the parabola describing the unique
/// deceleration that brings an elevator decelerating-while-accelerating to
/// rest exactly one half floor further on.
pub const ACCEL_DECEL: (f64, f64, f64, f64) =
    (3.51757258, -6.4762952, 0.9575183, 1.94148245);

pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const MINUTES_PER_TIME_INTERVAL: f64 = 5.0;

/// Down-peak mean arrivals per floor per minute, one entry per consecutive
/// 5-minute interval (12 intervals = 60 minutes total).
pub const DOWNPEAK_RATES: [f64; 12] = [
    0.25, 0.5, 1.0, 1.0, 4.5, 3.0, 2.0, 1.75, 4.5, 1.25, 0.75, 0.5,
];

/// Spacing between successive passenger transfer events during boarding.
/// A placeholder for a truncated-Erlang boarding-time model (see
/// `SPEC_FULL.md` open question 1).
pub const PASSENGER_TRANSFER_SPACING: f64 = 1.0;

/// Small delay after the last transfer before the elevator is considered
/// done boarding.
pub const DONE_BOARDING_EPS: f64 = 1e-3;

/// Temperature floor used to derive the number of training episodes from
/// the annealing factor.
pub const TEMPERATURE_END: f64 = 0.01;
/// Initial Boltzmann temperature (episode 0).
pub const TEMPERATURE_START: f64 = 2.0;
/// Initial SMDP learning rate (episode 0).
pub const ALPHA_START: f64 = 0.01;
/// Per-episode learning-rate decay factor.
pub const ALPHA_DECAY: f64 = 0.99975;

/// Continuous-time discount rate (per second) used in the SMDP Bellman
/// backup: a decision `tau` seconds in the past is discounted by
/// `exp(-DISCOUNT_RATE_BETA * tau)`.
pub const DISCOUNT_RATE_BETA: f64 = 0.01;

/// Scale factor applied to the accumulated squared-wait-time cost before it
/// reaches the SMDP Bellman backup (`SPEC_FULL.md` §4.7).
pub const COST_SCALE_FACTOR: f64 = 1e-6;
