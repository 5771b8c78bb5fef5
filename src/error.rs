/**
 * Crate-wide error taxonomy.
 *
 * Configuration and I/O errors are recoverable `Result`s; invariant
 * violations are programming errors and terminate the process via
 * `assert!`/`panic!` at the exact site named in `SPEC_FULL.md`, not through
 * this enum (see `SPEC_FULL.md`, "Error handling").
 */

/***************************************/
/*        3rd party libraries          */
/***************************************/
use thiserror::Error;

/***************************************/
/*             Public API              */
/***************************************/
#[derive(Error, Debug)]
pub enum SimError {
    #[error("configuration error in [{section}] {key}: {reason}")]
    Config {
        section: String,
        key: String,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("checkpoint serialization error: {0}")]
    Checkpoint(#[from] Box<bincode::ErrorKind>),
}

impl SimError {
    pub fn config(section: &str, key: &str, reason: impl Into<String>) -> Self {
        SimError::Config {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
