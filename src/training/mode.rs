// Training modes
//
// Each mode maps to a fixed set of files the trainer needs.

use clap::ValueEnum;
use std::fmt;

/// Training strategy passed on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TrainingMode {
    /// Plain PPO
    #[default]
    Basic,
    /// PPO with curriculum lessons
    Curriculum,
    /// Behavioral cloning + GAIL from recorded demonstrations
    Imitation,
}

impl TrainingMode {
    /// Lowercase name, used in generated run ids
    pub fn name(&self) -> &'static str {
        match self {
            TrainingMode::Basic => "basic",
            TrainingMode::Curriculum => "curriculum",
            TrainingMode::Imitation => "imitation",
        }
    }

    /// Phrase used in the "Starting ..." banner
    pub fn label(&self) -> &'static str {
        match self {
            TrainingMode::Basic => "basic training",
            TrainingMode::Curriculum => "curriculum training",
            TrainingMode::Imitation => "imitation learning",
        }
    }

    pub fn uses_curriculum(&self) -> bool {
        matches!(self, TrainingMode::Curriculum)
    }

    /// Demonstrations are checked but their absence can be overridden
    pub fn wants_demonstrations(&self) -> bool {
        matches!(self, TrainingMode::Imitation)
    }
}

impl fmt::Display for TrainingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
