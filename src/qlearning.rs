/**
 * Semi-Markov Q-learning controller.
 *
 * Ported from `qlearningAgents.py`'s `ElevatorQAgent` / `learningAgents.py`'s
 * `ReinforcementAgent`, generalized from a `Counter`-backed sparse Q-table
 * to a `HashMap`, and from NumPy's unnormalized softmax to a numerically
 * stable, negated softmin (`boltzmann_prob_stop`) matching this simulator's
 * minimize-discounted-cost objective rather than Pacman's maximize-reward
 * one.
 */

/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::collections::HashMap;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::constants::{ALPHA_DECAY, ALPHA_START, DISCOUNT_RATE_BETA, TEMPERATURE_END, TEMPERATURE_START};
use crate::model::{Action, Direction};
use crate::rng::SimRng;

/***************************************/
/*       Public data structures        */
/***************************************/
/// Discretized decision-point state: the tuple key into the Q-table.
/// Matches the spec's `LearningState` exactly — `(hall_up_above,
/// hall_down_above, hall_up_below, hall_down_below,
/// num_car_calls_current_direction, floor, direction)` — which is narrower
/// than everything the controller can see at a decision point: the
/// car-call-at-target and hall-call-at-target flags that force a singleton
/// legal-action set live on `DecisionContext` instead, since a constrained
/// decision never produces a learning sample in the first place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    /// An up hall call exists above `floor`.
    pub hall_up_above: bool,
    /// A down hall call exists above `floor`.
    pub hall_down_above: bool,
    /// An up hall call exists below `floor`.
    pub hall_up_below: bool,
    /// A down hall call exists below `floor`.
    pub hall_down_below: bool,
    /// Number of boarded passengers whose cab call lies ahead in `direction`.
    pub num_car_calls_current_direction: u8,
    /// The floor currently being approached (the stop-target candidate).
    pub floor: u8,
    pub direction: Direction,
}

pub struct QLearner {
    table: HashMap<(State, Action), f64>,
    episode: u32,
    annealing_factor: f64,
}

/***************************************/
/*             Public API              */
/***************************************/
impl QLearner {
    pub fn new(annealing_factor: f64) -> Self {
        QLearner {
            table: HashMap::new(),
            episode: 0,
            annealing_factor,
        }
    }

    pub fn from_table(table: HashMap<(State, Action), f64>, annealing_factor: f64) -> Self {
        QLearner {
            table,
            episode: 0,
            annealing_factor,
        }
    }

    pub fn table(&self) -> &HashMap<(State, Action), f64> {
        &self.table
    }

    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Q-value for `(state, action)`, defaulting to zero for unseen pairs.
    pub fn q_value(&self, state: State, action: Action) -> f64 {
        *self.table.get(&(state, action)).unwrap_or(&0.0)
    }

    fn min_q_over(&self, state: State, legal: &[Action]) -> f64 {
        legal
            .iter()
            .map(|&a| self.q_value(state, a))
            .fold(f64::INFINITY, f64::min)
    }

    /// Current Boltzmann temperature, annealed once per completed episode.
    pub fn temperature(&self) -> f64 {
        (TEMPERATURE_START * self.annealing_factor.powi(self.episode as i32)).max(TEMPERATURE_END)
    }

    /// Current SMDP learning rate, annealed once per completed episode.
    pub fn alpha(&self) -> f64 {
        ALPHA_START * ALPHA_DECAY.powi(self.episode as i32)
    }

    /// Mark the end of a training episode, advancing the annealing schedule.
    pub fn end_episode(&mut self) {
        self.episode += 1;
    }

    /// Choose an action at `state` among `legal` by Boltzmann exploration at
    /// the current temperature. `legal` must be non-empty.
    pub fn choose_action(&self, state: State, legal: &[Action], rng: &mut SimRng) -> Action {
        if legal.len() == 1 {
            return legal[0];
        }
        let p_stop = boltzmann_prob_stop(
            self.q_value(state, Action::Stop),
            self.q_value(state, Action::Continue),
            self.temperature(),
        );
        if legal.contains(&Action::Stop) && legal.contains(&Action::Continue) {
            if rng.uniform01() < p_stop {
                Action::Stop
            } else {
                Action::Continue
            }
        } else {
            legal[0]
        }
    }

    /// Greedy action at `state`, the lowest-cost legal action with no
    /// exploration. Used during testing episodes.
    pub fn best_action(&self, state: State, legal: &[Action]) -> Action {
        legal
            .iter()
            .copied()
            .min_by(|&a, &b| self.q_value(state, a).total_cmp(&self.q_value(state, b)))
            .expect("legal action set must be non-empty")
    }

    /// SMDP Q-learning backup: the decision taken `tau` seconds ago accrued
    /// `cost` before the system reached `next_state`.
    pub fn update(
        &mut self,
        state: State,
        action: Action,
        cost: f64,
        tau: f64,
        next_state: State,
        next_legal: &[Action],
    ) {
        let discount = (-DISCOUNT_RATE_BETA * tau).exp();
        let target = cost + discount * self.min_q_over(next_state, next_legal);
        let current = self.q_value(state, action);
        let alpha = self.alpha();
        self.table
            .insert((state, action), current + alpha * (target - current));
    }
}

/// Number of training episodes needed for the temperature to anneal from
/// `TEMPERATURE_START` down to `TEMPERATURE_END` under `annealing_factor`,
/// i.e. the smallest `n` with
/// `TEMPERATURE_START * annealing_factor^n <= TEMPERATURE_END`.
pub fn num_training_episodes(annealing_factor: f64) -> u32 {
    if !(0.0..1.0).contains(&annealing_factor) {
        return 0;
    }
    ((TEMPERATURE_END / TEMPERATURE_START).ln() / annealing_factor.ln()).ceil() as u32
}

/// Probability of choosing `Action::Stop` under Boltzmann exploration over
/// costs (lower is better): `P(stop) = exp(-q_stop/T) / (exp(-q_stop/T) +
/// exp(-q_continue/T))`, computed by subtracting the smaller negated logit
/// from both exponents for numerical stability.
pub fn boltzmann_prob_stop(q_stop: f64, q_continue: f64, temperature: f64) -> f64 {
    let t = temperature.max(1e-9);
    let logit_stop = -q_stop / t;
    let logit_continue = -q_continue / t;
    let max_logit = logit_stop.max(logit_continue);
    let exp_stop = (logit_stop - max_logit).exp();
    let exp_continue = (logit_continue - max_logit).exp();
    exp_stop / (exp_stop + exp_continue)
}

/***************************************/
/*              Test API               */
/***************************************/
#[cfg(test)]
mod qlearning_tests {
    use super::*;

    fn sample_state() -> State {
        State {
            hall_up_above: false,
            hall_down_above: false,
            hall_up_below: true,
            hall_down_below: false,
            num_car_calls_current_direction: 0,
            floor: 3,
            direction: Direction::Down,
        }
    }

    #[test]
    fn test_boltzmann_prob_stop_matches_worked_example() {
        // Arrange
        let q_stop = 1.0;
        let q_continue = 0.0;
        let temperature = 2.0;

        // Act
        let p_stop = boltzmann_prob_stop(q_stop, q_continue, temperature);

        // Assert
        assert!((p_stop - 0.3775).abs() < 1e-3);
    }

    #[test]
    fn test_boltzmann_favors_lower_cost_action() {
        // Arrange & Act
        let p_stop = boltzmann_prob_stop(0.0, 10.0, 0.5);

        // Assert
        assert!(p_stop > 0.99);
    }

    #[test]
    fn test_update_moves_q_value_toward_target() {
        // Arrange
        let mut learner = QLearner::new(0.9998);
        let state = sample_state();
        let legal = [Action::Stop, Action::Continue];

        // Act
        learner.update(state, Action::Stop, 5.0, 1.0, state, &legal);

        // Assert
        let q = learner.q_value(state, Action::Stop);
        assert!(q > 0.0);
        assert!(q < 5.0);
    }

    #[test]
    fn test_best_action_picks_minimum_q_value() {
        // Arrange
        let mut table = HashMap::new();
        let state = sample_state();
        table.insert((state, Action::Stop), 2.0);
        table.insert((state, Action::Continue), 7.0);
        let learner = QLearner::from_table(table, 0.9998);

        // Act
        let action = learner.best_action(state, &[Action::Stop, Action::Continue]);

        // Assert
        assert_eq!(action, Action::Stop);
    }

    #[test]
    fn test_temperature_and_alpha_anneal_toward_floor_as_episodes_pass() {
        // Arrange
        let mut learner = QLearner::new(0.99);
        let t0 = learner.temperature();

        // Act
        for _ in 0..2000 {
            learner.end_episode();
        }
        let t_final = learner.temperature();

        // Assert
        assert!(t_final < t0);
        assert!((t_final - TEMPERATURE_END).abs() < 1e-6);
    }

    #[test]
    fn test_num_training_episodes_is_positive_for_valid_annealing_factor() {
        // Arrange & Act
        let episodes = num_training_episodes(0.99975);

        // Assert
        assert!(episodes > 0);
    }
}
