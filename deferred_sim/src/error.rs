// Error type for the fallible edges of the scheduler.
//
// The event lifecycle itself never returns errors: a stale target is a
// precondition returning `false`, and corrupt internal storage is a panic.
// What remains fallible is loading configuration and the optional hard cap
// on pending work enforced by `Simulation::try_schedule`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Config IO error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Event queue full: {pending} pending, limit {limit}")]
    QueueFull { pending: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_full_message_names_counts() {
        let err = SimError::QueueFull {
            pending: 8,
            limit: 8,
        };
        assert_eq!(err.to_string(), "Event queue full: 8 pending, limit 8");
    }

    #[test]
    fn json_error_converts() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("nope");
        let err: SimError = parse.unwrap_err().into();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }
}
