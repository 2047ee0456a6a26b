// Trainer command line

use std::ffi::{OsStr, OsString};
use std::fmt;

use super::layout::ModeFiles;
use super::request::TrainingRequest;

/// Program and arguments for one trainer invocation
///
/// Paths are kept as `OsString` so the trainer receives the same bytes the
/// launcher checked on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerCommand {
    program: String,
    args: Vec<OsString>,
}

impl TrainerCommand {
    /// Build the fixed-shape argument vector:
    ///
    /// `<config> [--curriculum <file>] --run-id <id> --num-envs <n>
    /// --time-scale <t> [--resume] [--force]`
    pub fn build(trainer: &str, request: &TrainingRequest, files: &ModeFiles) -> Self {
        let mut args = vec![files.config.path.clone().into_os_string()];

        if let Some(curriculum) = &files.curriculum {
            args.push("--curriculum".into());
            args.push(curriculum.path.clone().into_os_string());
        }

        args.push("--run-id".into());
        args.push(request.run_id.clone().into());
        args.push("--num-envs".into());
        args.push(request.num_envs.to_string().into());
        args.push("--time-scale".into());
        args.push(format_time_scale(request.time_scale).into());

        if request.resume {
            args.push("--resume".into());
        }
        if request.force {
            args.push("--force".into());
        }

        Self {
            program: trainer.to_string(),
            args,
        }
    }

    /// Arbitrary program and arguments, e.g. a probe
    pub fn from_parts<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Program followed by arguments
    pub fn argv(&self) -> Vec<&OsStr> {
        std::iter::once(OsStr::new(&self.program))
            .chain(self.args.iter().map(OsString::as_os_str))
            .collect()
    }
}

impl fmt::Display for TrainerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: Vec<_> = self.argv().into_iter().map(|a| a.to_string_lossy()).collect();
        write!(f, "{}", shown.join(" "))
    }
}

/// Python float repr: whole numbers keep ".0" (1.0, 20.0), and very large or
/// small values use a signed two-digit exponent (1e+16, 1e-05)
fn format_time_scale(scale: f64) -> String {
    let sci = format!("{:e}", scale);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    if (-4..16).contains(&exp) {
        let plain = scale.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        }
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    }
}
