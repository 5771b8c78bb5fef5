/**
 * Command-line entry point: loads configuration, builds the controller and
 * world the config selects, and runs a training-then-testing campaign,
 * appending statistics as each episode completes.
 */

/***************************************/
/*        3rd party libraries          */
/***************************************/
use clap::{App, Arg};
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/***************************************/
/*           Local modules             */
/***************************************/
use elevator_sim::config::{self, ControllerKind};
use elevator_sim::controller::Controller;
use elevator_sim::qlearning::QLearner;
use elevator_sim::scheduler::run_campaign;
use elevator_sim::stats::{load_q_table, save_q_table, EpisodeStatsWriter, PassengerStatsWriter};
use elevator_sim::traffic::TrafficProfile;
use elevator_sim::world::World;

fn main() -> ExitCode {
    env_logger::init();

    let matches = App::new("elevator-sim")
        .about("Elevator group-control reinforcement-learning simulator")
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("Path to the simulation's INI configuration file")
                .default_value("config.ini"),
        )
        .get_matches();

    let config_path = PathBuf::from(matches.value_of("config").unwrap());

    match run(&config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("elevator-sim: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &Path) -> Result<(), elevator_sim::SimError> {
    let config = config::load_config(config_path)?;

    info!(
        "starting campaign: {} floors, {} elevators, controller={:?}",
        config.environment.num_floors, config.environment.num_elevators, config.elevator.controller
    );

    let traffic = match config.traffic_profile.profile_type.as_str() {
        "down_peak" => TrafficProfile::down_peak(config.traffic_profile.interfloor),
        other => {
            return Err(elevator_sim::SimError::config(
                "traffic_profile",
                "type",
                format!("unknown traffic profile: {other}"),
            ))
        }
    };

    let mut world = World::new(
        config.environment.num_floors,
        config.environment.num_elevators,
        config.environment.capacity,
        traffic,
        config.simulation.seed,
    );

    let data_dir = PathBuf::from(&config.learning.data_dir);
    std::fs::create_dir_all(&data_dir)?;
    let q_file_path = data_dir.join(&config.learning.q_file);

    let mut controller = match config.elevator.controller {
        ControllerKind::RandomAgent => Controller::Random,
        ControllerKind::BestFirstAgent => Controller::BestFirst,
        ControllerKind::ElevatorQAgent => {
            let learner = if config.learning.use_q_file && q_file_path.exists() {
                info!("loading Q-table checkpoint from {}", q_file_path.display());
                let table = load_q_table(&q_file_path)?;
                QLearner::from_table(table, config.learning.annealing_factor)
            } else {
                QLearner::new(config.learning.annealing_factor)
            };
            Controller::QLearner(learner)
        }
    };

    let mut episode_writer = EpisodeStatsWriter::create_or_append(&data_dir.join("episodes.csv"))?;
    let mut passenger_writer =
        PassengerStatsWriter::create_or_append(&data_dir.join("passengers.csv"))?;

    run_campaign(
        &mut world,
        &mut controller,
        config.simulation.max_time,
        config.learning.annealing_factor,
        config.learning.is_training,
        config.learning.num_testing_episodes,
        &mut episode_writer,
        &mut passenger_writer,
    )?;

    if let Some(learner) = controller.as_qlearner() {
        save_q_table(&q_file_path, learner.table())?;
        info!("saved Q-table checkpoint to {}", q_file_path.display());
    }

    Ok(())
}
