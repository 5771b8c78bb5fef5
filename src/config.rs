/**
 * Configuration.
 *
 * Loads the simulator's INI file into typed section structs, generalizing
 * the reference project's `toml::from_str` + `serde::Deserialize` pattern to
 * the INI format this simulator's external interface specifies. Every
 * missing key or out-of-range value becomes a `SimError::Config` naming the
 * offending section and key, surfaced before any episode starts.
 */

/***************************************/
/*        3rd party libraries          */
/***************************************/
use ini::Ini;
use std::path::Path;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::SimError;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Length of one episode, in simulated seconds.
    pub max_time: f64,
    pub seed: u64,
}

#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub num_floors: u8,
    pub num_elevators: u8,
    /// Maximum passengers an elevator car can carry at once (see
    /// `original_source/code/environment.py`'s `ElevatorState(capacity=...)`).
    pub capacity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerKind {
    BestFirstAgent,
    ElevatorQAgent,
    RandomAgent,
}

#[derive(Debug, Clone)]
pub struct ElevatorConfig {
    pub controller: ControllerKind,
}

#[derive(Debug, Clone)]
pub struct TrafficProfileConfig {
    pub profile_type: String,
    pub interfloor: f64,
}

#[derive(Debug, Clone)]
pub struct LearningConfig {
    pub use_q_file: bool,
    pub data_dir: String,
    pub q_file: String,
    pub annealing_factor: f64,
    pub is_training: bool,
    pub num_testing_episodes: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub environment: EnvironmentConfig,
    pub elevator: ElevatorConfig,
    pub traffic_profile: TrafficProfileConfig,
    pub learning: LearningConfig,
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config(path: &Path) -> Result<Config, SimError> {
    let ini = Ini::load_from_file(path)
        .map_err(|e| SimError::config("<file>", path.to_string_lossy().as_ref(), e.to_string()))?;

    Ok(Config {
        simulation: SimulationConfig {
            max_time: get_f64(&ini, "simulation", "max_time")?,
            seed: get_u64(&ini, "simulation", "seed")?,
        },
        environment: EnvironmentConfig {
            num_floors: get_u8(&ini, "environment", "num_floors")?,
            num_elevators: get_u8(&ini, "environment", "num_elevators")?,
            capacity: get_usize(&ini, "environment", "capacity")?,
        },
        elevator: ElevatorConfig {
            controller: get_controller_kind(&ini, "elevator", "controller")?,
        },
        traffic_profile: TrafficProfileConfig {
            profile_type: get_str(&ini, "traffic_profile", "type")?,
            interfloor: get_f64(&ini, "traffic_profile", "interfloor")?,
        },
        learning: LearningConfig {
            use_q_file: get_bool(&ini, "learning", "use_q_file")?,
            data_dir: get_str(&ini, "learning", "data_dir")?,
            q_file: get_str(&ini, "learning", "q_file")?,
            annealing_factor: get_f64(&ini, "learning", "annealing_factor")?,
            is_training: get_bool(&ini, "learning", "is_training")?,
            num_testing_episodes: get_u32(&ini, "learning", "num_testing_episodes")?,
        },
    })
}

/***************************************/
/*             Private API             */
/***************************************/
fn get_raw<'a>(ini: &'a Ini, section: &str, key: &str) -> Result<&'a str, SimError> {
    ini.section(Some(section))
        .ok_or_else(|| SimError::config(section, key, "missing section"))?
        .get(key)
        .ok_or_else(|| SimError::config(section, key, "missing key"))
}

fn get_str(ini: &Ini, section: &str, key: &str) -> Result<String, SimError> {
    Ok(get_raw(ini, section, key)?.to_string())
}

fn get_f64(ini: &Ini, section: &str, key: &str) -> Result<f64, SimError> {
    let raw = get_raw(ini, section, key)?;
    raw.trim()
        .parse()
        .map_err(|_| SimError::config(section, key, format!("not a float: {raw}")))
}

fn get_u8(ini: &Ini, section: &str, key: &str) -> Result<u8, SimError> {
    let raw = get_raw(ini, section, key)?;
    raw.trim()
        .parse()
        .map_err(|_| SimError::config(section, key, format!("not an integer: {raw}")))
}

fn get_usize(ini: &Ini, section: &str, key: &str) -> Result<usize, SimError> {
    let raw = get_raw(ini, section, key)?;
    raw.trim()
        .parse()
        .map_err(|_| SimError::config(section, key, format!("not an integer: {raw}")))
}

fn get_u32(ini: &Ini, section: &str, key: &str) -> Result<u32, SimError> {
    let raw = get_raw(ini, section, key)?;
    raw.trim()
        .parse()
        .map_err(|_| SimError::config(section, key, format!("not an integer: {raw}")))
}

fn get_u64(ini: &Ini, section: &str, key: &str) -> Result<u64, SimError> {
    let raw = get_raw(ini, section, key)?;
    raw.trim()
        .parse()
        .map_err(|_| SimError::config(section, key, format!("not an integer: {raw}")))
}

fn get_bool(ini: &Ini, section: &str, key: &str) -> Result<bool, SimError> {
    let raw = get_raw(ini, section, key)?.trim().to_ascii_lowercase();
    match raw.as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(SimError::config(section, key, format!("not a bool: {raw}"))),
    }
}

fn get_controller_kind(ini: &Ini, section: &str, key: &str) -> Result<ControllerKind, SimError> {
    let raw = get_raw(ini, section, key)?;
    match raw.trim() {
        "BestFirstAgent" => Ok(ControllerKind::BestFirstAgent),
        "ElevatorQAgent" => Ok(ControllerKind::ElevatorQAgent),
        "RandomAgent" => Ok(ControllerKind::RandomAgent),
        other => Err(SimError::config(
            section,
            key,
            format!("unknown controller: {other}"),
        )),
    }
}

/***************************************/
/*              Test API               */
/***************************************/
