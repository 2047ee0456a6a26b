// Training request - parameters of a single launch

use chrono::{DateTime, Local, TimeZone};

use super::mode::TrainingMode;

/// Prefix for generated run ids
const RUN_ID_PREFIX: &str = "BoxPacking";

/// One launch of the external trainer
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRequest {
    pub mode: TrainingMode,

    /// Label the trainer uses for its results folder
    pub run_id: String,

    /// Continue from the checkpoint of an existing run
    pub resume: bool,

    /// Overwrite an existing run with the same id
    pub force: bool,

    /// Simulation speed multiplier (> 0)
    pub time_scale: f64,

    /// Parallel environment count (>= 1)
    pub num_envs: u32,
}

impl TrainingRequest {
    /// Request with default options and a generated run id
    pub fn new(mode: TrainingMode) -> Self {
        Self {
            mode,
            run_id: default_run_id(mode),
            resume: false,
            force: false,
            time_scale: 1.0,
            num_envs: 1,
        }
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }
}

/// `BoxPacking_<mode>_<YYYYmmdd_HHMMSS>` using local time
pub fn default_run_id(mode: TrainingMode) -> String {
    run_id_at(mode, &Local::now())
}

pub fn run_id_at<Tz: TimeZone>(mode: TrainingMode, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_{}_{}",
        RUN_ID_PREFIX,
        mode.name(),
        at.format("%Y%m%d_%H%M%S")
    )
}

/// clap parser for --time-scale: finite and positive
pub fn parse_time_scale(value: &str) -> Result<f64, String> {
    let scale: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;

    if !scale.is_finite() || scale <= 0.0 {
        return Err(format!("time scale must be a positive number, got {}", value));
    }

    Ok(scale)
}
