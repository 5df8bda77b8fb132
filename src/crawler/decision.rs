//! Operator decision at region cap exhaustion

use crate::config::CapPolicy;
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

/// What to do once every tracked region has reached its cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapDecision {
    /// Reset all region counters and keep crawling
    Continue,
    /// End the run, leaving the frontier as it is
    Stop,
}

/// Provides the cap exhaustion decision
pub trait CapDecider {
    fn decide(&mut self, counts: &BTreeMap<String, u32>, cap: u32) -> CapDecision;
}

/// Always answers the same way; used for unattended runs
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub CapDecision);

impl CapDecider for FixedDecision {
    fn decide(&mut self, _counts: &BTreeMap<String, u32>, _cap: u32) -> CapDecision {
        self.0
    }
}

/// Asks a yes/no question on a line-based terminal
///
/// Only `y` or `yes` (any case) continues. Anything else, including end of
/// input or a read error, stops the run.
pub struct PromptDecider<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptDecider<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, counts: &BTreeMap<String, u32>, cap: u32) -> io::Result<String> {
        writeln!(self.output)?;
        writeln!(self.output, "All currently seen regions have reached the cap")?;
        writeln!(self.output, "Current region counts: {}", format_counts(counts))?;
        write!(
            self.output,
            "All regions hit cap ({}). Reset region counts and continue? [y/n]: ",
            cap
        )?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line)
    }
}

impl PromptDecider<io::StdinLock<'static>, io::Stdout> {
    /// Prompts on the process's terminal
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> CapDecider for PromptDecider<R, W> {
    fn decide(&mut self, counts: &BTreeMap<String, u32>, cap: u32) -> CapDecision {
        match self.ask(counts, cap) {
            Ok(answer) => parse_answer(&answer),
            Err(e) => {
                tracing::warn!("Could not read cap decision, stopping: {}", e);
                CapDecision::Stop
            }
        }
    }
}

fn parse_answer(answer: &str) -> CapDecision {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => CapDecision::Continue,
        _ => CapDecision::Stop,
    }
}

/// Formats region counters as `NA1=200, EUW1=200`
pub fn format_counts(counts: &BTreeMap<String, u32>) -> String {
    counts
        .iter()
        .map(|(region, count)| format!("{}={}", region, count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the decider matching a configured policy
pub fn decider_for(policy: CapPolicy) -> Box<dyn CapDecider> {
    match policy {
        CapPolicy::Prompt => Box::new(PromptDecider::stdio()),
        CapPolicy::Continue => Box::new(FixedDecision(CapDecision::Continue)),
        CapPolicy::Stop => Box::new(FixedDecision(CapDecision::Stop)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn counts() -> BTreeMap<String, u32> {
        BTreeMap::from([("EUW1".to_string(), 2), ("NA1".to_string(), 2)])
    }

    fn prompt(input: &str) -> (CapDecision, String) {
        let mut out = Vec::new();
        let decision = PromptDecider::new(Cursor::new(input.as_bytes()), &mut out).decide(&counts(), 2);
        (decision, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_prompt_yes_continues() {
        assert_eq!(prompt("y\n").0, CapDecision::Continue);
        assert_eq!(prompt("  YES \n").0, CapDecision::Continue);
    }

    #[test]
    fn test_prompt_anything_else_stops() {
        assert_eq!(prompt("n\n").0, CapDecision::Stop);
        assert_eq!(prompt("maybe\n").0, CapDecision::Stop);
        assert_eq!(prompt("").0, CapDecision::Stop);
    }

    #[test]
    fn test_prompt_shows_counts_and_cap() {
        let (_, shown) = prompt("n\n");
        assert!(shown.contains("EUW1=2, NA1=2"));
        assert!(shown.contains("cap (2)"));
    }

    #[test]
    fn test_fixed_decision() {
        let mut decider = FixedDecision(CapDecision::Stop);
        assert_eq!(decider.decide(&counts(), 2), CapDecision::Stop);
    }
}
