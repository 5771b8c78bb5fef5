/**
 * Episode and campaign scheduling.
 *
 * `run_episode` drives the hybrid discrete/continuous loop: fixed
 * `TIME_STEP` motion integration advances every moving elevator toward its
 * next decision point or floor arrival, while the event queue fires
 * passenger arrivals and transfers in between. `run_campaign` wraps this in
 * the train-then-test two-phase loop `simulator.py`'s `control.py` driver
 * runs, printing a status line every `NUM_EPS_UPDATE` episodes.
 */

/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::info;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::constants::{NUM_EPS_UPDATE, TIME_STEP};
use crate::controller::Controller;
use crate::event::Event;
use crate::model::{Action, Direction, Passenger, Phase};
use crate::qlearning::{num_training_episodes, State};
use crate::stats::{EpisodeRecord, EpisodeStatsWriter, PassengerRecord, PassengerStatsWriter};
use crate::world::World;

/***************************************/
/*       Public data structures        */
/***************************************/
/// A decision point awaiting its eventual SMDP update: the state and action
/// taken, and the simulated time at which it was taken.
struct OpenDecision {
    state: State,
    action: Action,
    time: f64,
}

pub struct EpisodeOutcome {
    pub total_cost: f64,
    pub passengers_served: u64,
    pub mean_wait_time: f64,
    pub completed: Vec<Passenger>,
}

/***************************************/
/*             Public API              */
/***************************************/
/// Run one episode to completion (`world.time` reaching `max_time`),
/// driving `controller` at every decision point. When `training` is true
/// and `controller` wraps a `QLearner`, every decision is followed up with
/// an SMDP Bellman backup once its outcome is known.
pub fn run_episode(
    world: &mut World,
    controller: &mut Controller,
    max_time: f64,
    training: bool,
) -> EpisodeOutcome {
    world.reset();
    let mut open_decisions: Vec<Option<OpenDecision>> = (0..world.elevators.len())
        .map(|_| None)
        .collect();
    let mut episode_cost = 0.0;
    let mut pending_cost = 0.0;
    let mut last_time = 0.0;

    while world.time < max_time {
        let next_event_time = world.events.peek_time().unwrap_or(f64::INFINITY);
        let next_tick_time = (last_time + TIME_STEP).min(max_time);
        let step_time = next_event_time.min(next_tick_time);

        let elapsed = step_time - world.time;
        if elapsed > 0.0 {
            let cost = world.cost_rate() * elapsed;
            episode_cost += cost;
            pending_cost += cost;
            advance_motion(world, elapsed);
        }
        world.time = step_time;
        last_time = step_time;

        if (step_time - next_event_time).abs() < 1e-12 {
            if let Some((_, event)) = world.events.pop() {
                handle_event(
                    world,
                    controller,
                    &mut open_decisions,
                    event,
                    training,
                    &mut pending_cost,
                );
            }
        }

        if step_time >= max_time {
            break;
        }
    }

    let completed = world.drain_completed();
    let passengers_served = completed.len() as u64;
    let mean_wait_time = if passengers_served > 0 {
        completed
            .iter()
            .filter_map(|p| p.wait_time())
            .sum::<f64>()
            / passengers_served as f64
    } else {
        0.0
    };

    EpisodeOutcome {
        total_cost: episode_cost,
        passengers_served,
        mean_wait_time,
        completed,
    }
}

/// Train for the number of episodes the Boltzmann annealing schedule needs
/// to reach its temperature floor, then run `num_testing_episodes` greedy
/// evaluation episodes, appending per-episode and per-passenger statistics
/// as each episode completes.
pub fn run_campaign(
    world: &mut World,
    controller: &mut Controller,
    max_time: f64,
    annealing_factor: f64,
    is_training: bool,
    num_testing_episodes: u32,
    episode_writer: &mut EpisodeStatsWriter,
    passenger_writer: &mut PassengerStatsWriter,
) -> Result<(), crate::error::SimError> {
    let training_episodes = if is_training && controller.as_qlearner().is_some() {
        num_training_episodes(annealing_factor)
    } else {
        0
    };

    for episode in 0..training_episodes {
        let outcome = run_episode(world, controller, max_time, true);
        record_episode(
            controller,
            episode,
            true,
            &outcome,
            episode_writer,
            passenger_writer,
        )?;
        if let Some(learner) = controller.as_qlearner_mut() {
            learner.end_episode();
        }
        if episode % NUM_EPS_UPDATE == 0 {
            info!(
                "training episode {episode}/{training_episodes}: cost={:.2} served={}",
                outcome.total_cost, outcome.passengers_served
            );
        }
    }

    for episode in 0..num_testing_episodes {
        let outcome = run_episode(world, controller, max_time, false);
        record_episode(
            controller,
            training_episodes + episode,
            false,
            &outcome,
            episode_writer,
            passenger_writer,
        )?;
        if episode % NUM_EPS_UPDATE == 0 {
            info!(
                "testing episode {episode}/{num_testing_episodes}: cost={:.2} served={}",
                outcome.total_cost, outcome.passengers_served
            );
        }
    }

    Ok(())
}

/***************************************/
/*             Private API             */
/***************************************/
fn advance_motion(world: &mut World, elapsed: f64) {
    for elevator_id in 0..world.elevators.len() as u8 {
        let phase = world.elevators[elevator_id as usize].phase;
        if !matches!(
            phase,
            Phase::Accelerating | Phase::FullSpeed | Phase::AccelDecelerating | Phase::FullSpeedDecelerating
        ) {
            continue;
        }
        world.elevators[elevator_id as usize].phase_elapsed += elapsed;

        if matches!(phase, Phase::Accelerating | Phase::FullSpeed) {
            let already_made = world.elevators[elevator_id as usize].decision_already_made();
            let distance = world.distance_since_decision(elevator_id);
            let threshold = world.decision_distance_for(elevator_id);
            if !already_made && distance >= threshold {
                world
                    .events
                    .schedule(world.time, Event::DecisionPoint { elevator: elevator_id });
                world.elevators[elevator_id as usize].mark_decision_made();
            }
        } else if world.elevators[elevator_id as usize].phase_elapsed >= crate::constants::ACCEL_TIME {
            world
                .events
                .schedule(world.time, Event::Arrival { elevator: elevator_id });
        }
    }
}

fn handle_event(
    world: &mut World,
    controller: &mut Controller,
    open_decisions: &mut [Option<OpenDecision>],
    event: Event,
    training: bool,
    total_cost: &mut f64,
) {
    match event {
        Event::PassengerArrival { floor } => {
            world.spawn_arrival(floor);
        }
        Event::DecisionPoint { elevator } => {
            let ctx = world.decision_context(elevator);
            let state = ctx.state;

            if ctx.legal.len() == 1 {
                // A constrained (forced-singleton) decision: apply it
                // directly and generate no learning sample.
                apply_action(world, elevator, ctx.legal[0]);
                return;
            }

            let action = if training {
                controller.choose(&ctx, &mut world.rng)
            } else {
                controller.choose_greedy(&ctx)
            };

            if let Some(open) = open_decisions[elevator as usize].take() {
                if training {
                    if let Some(learner) = controller.as_qlearner_mut() {
                        let tau = world.time - open.time;
                        learner.update(open.state, open.action, *total_cost, tau, state, &ctx.legal);
                    }
                }
                *total_cost = 0.0;
            }
            open_decisions[elevator as usize] = Some(OpenDecision {
                state,
                action,
                time: world.time,
            });

            apply_action(world, elevator, action);
        }
        Event::Arrival { elevator } => {
            world.elevators[elevator as usize].arrive();
            world.begin_boarding(elevator);
        }
        Event::PassengerTransfer { elevator, boarding_direction } => {
            world.process_transfer(elevator, boarding_direction);
        }
        Event::BoardingComplete { elevator } => {
            dispatch_idle_elevator(world, elevator);
        }
        Event::EpisodeEnd => {}
    }
}

/// Apply a chosen `Action` to the elevator at a decision point: `Stop`
/// commits to decelerating into the approaching floor; `Continue` advances
/// past it and resumes at full speed.
fn apply_action(world: &mut World, elevator_id: u8, action: Action) {
    match action {
        Action::Stop => world.elevators[elevator_id as usize].commit_to_stop(),
        Action::Continue => world.elevators[elevator_id as usize].continue_past(),
    }
}

/// Having just finished boarding, either park the car idle (nothing left to
/// do anywhere in the building) or send it on toward its own riders' cab
/// calls, falling back to the nearest outstanding hall call. Matches the
/// spec's `BOARDING → DONE_BOARDING → {MOVE_UP, MOVE_DOWN}` transitions:
/// dispatch (which direction an idle car commits to) is a building-level
/// heuristic independent of the learned stop/continue decision.
fn dispatch_idle_elevator(world: &mut World, elevator_id: u8) {
    let current = world.elevators[elevator_id as usize].floor_from;
    let any_hall_call = world
        .floors
        .iter()
        .any(|floor| floor.has_call(Direction::Up) || floor.has_call(Direction::Down));
    let has_passengers = !world.elevators[elevator_id as usize].passengers.is_empty();

    if !has_passengers && !any_hall_call {
        world.elevators[elevator_id as usize].transition_phase(Phase::Idle);
        return;
    }

    world.elevators[elevator_id as usize].transition_phase(Phase::DoneBoarding);

    let elevator = &world.elevators[elevator_id as usize];
    let direction = if elevator.cab_calls.iter().any(|&f| f > current) {
        Some(Direction::Up)
    } else if elevator.cab_calls.iter().any(|&f| f < current) {
        Some(Direction::Down)
    } else {
        nearest_calls(world, current)
            .into_iter()
            .min_by_key(|&(_, distance)| distance)
            .map(|(target, _)| if target > current { Direction::Up } else { Direction::Down })
    };

    if let Some(direction) = direction {
        world.elevators[elevator_id as usize].depart(direction);
    }
}

fn nearest_calls(world: &World, from_floor: u8) -> Vec<(u8, i32)> {
    world
        .floors
        .iter()
        .enumerate()
        .filter(|(_, floor)| floor.has_call(Direction::Up) || floor.has_call(Direction::Down))
        .map(|(floor, _)| (floor as u8, (floor as i32 - from_floor as i32).abs()))
        .collect()
}

fn record_episode(
    controller: &Controller,
    episode: u32,
    is_training: bool,
    outcome: &EpisodeOutcome,
    episode_writer: &mut EpisodeStatsWriter,
    passenger_writer: &mut PassengerStatsWriter,
) -> Result<(), crate::error::SimError> {
    let (temperature, alpha) = controller
        .as_qlearner()
        .map(|learner| (learner.temperature(), learner.alpha()))
        .unwrap_or((0.0, 0.0));

    episode_writer.record(&EpisodeRecord {
        episode,
        is_training,
        total_cost: outcome.total_cost,
        mean_wait_time: outcome.mean_wait_time,
        passengers_served: outcome.passengers_served,
        temperature,
        alpha,
    })?;
    episode_writer.flush()?;

    for passenger in &outcome.completed {
        if let Some(record) = PassengerRecord::from_passenger(episode, passenger) {
            passenger_writer.record(&record)?;
        }
    }
    passenger_writer.flush()?;

    Ok(())
}
