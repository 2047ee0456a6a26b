// Yes/no confirmation before launching without demonstrations

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Asks the user a yes/no question
pub trait Confirm: Send + Sync {
    /// Returns true only for an affirmative answer
    fn confirm(&self, prompt: &str) -> bool;
}

/// Prompts on the terminal through rustyline
pub struct ReadlineConfirm;

impl Confirm for ReadlineConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to initialize prompt, treating as no");
                return false;
            }
        };

        match editor.readline(prompt) {
            Ok(answer) => is_affirmative(&answer),
            // Ctrl+C or Ctrl+D
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read answer, treating as no");
                false
            }
        }
    }
}

/// Answers yes without asking (--yes)
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, prompt: &str) -> bool {
        println!("{}y (--yes)", prompt);
        true
    }
}

/// "y" or "Y", surrounding whitespace ignored
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
