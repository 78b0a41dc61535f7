use std::io::{BufRead, Write};

/// Yes/no question asked before anything is changed remotely.
pub trait Confirm {
    fn confirm(&self, question: &str) -> anyhow::Result<bool>;
}

/// Asks on stderr and reads the answer from stdin. EOF counts as "no".
pub struct StdinPrompt {
    assume_yes: bool,
}

impl StdinPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for StdinPrompt {
    fn confirm(&self, question: &str) -> anyhow::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        let mut stderr = std::io::stderr();
        write!(stderr, "{question} [y/N] ")?;
        stderr.flush()?;

        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(false);
        }
        Ok(is_yes(&line))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers() {
        for answer in ["y", "Y\n", " yes ", "YES\r\n"] {
            assert!(is_yes(answer), "{answer:?} should be yes");
        }
    }

    #[test]
    fn everything_else_is_no() {
        for answer in ["", "\n", "n", "no", "yep", "sure"] {
            assert!(!is_yes(answer), "{answer:?} should be no");
        }
    }

    #[test]
    fn assume_yes_skips_the_question() {
        assert!(StdinPrompt::new(true).confirm("Proceed?").unwrap());
    }
}
