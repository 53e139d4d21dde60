use std::time::Duration;

use clap::Parser;
use tandem_engine::time::DEFAULT_STEP_BUDGET;

use crate::demos::DemoKind;

/// Command line options.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "tandem-studio")]
#[command(version, about = "Runs a tandem compute/render demo in a window", long_about = None)]
pub struct Options {
    /// Demo to run
    #[arg(value_enum, default_value_t = DemoKind::Life)]
    pub demo: DemoKind,

    /// Simulation steps before the demo freezes (0 runs without a budget)
    #[arg(long, default_value_t = DEFAULT_STEP_BUDGET)]
    pub steps: u64,

    /// Minimum time between two steps, in milliseconds
    #[arg(long = "interval-ms", default_value_t = 100)]
    pub interval_ms: u64,

    /// Seed for the demo's initial state
    #[arg(long, default_value_t = 0x7a4d_3e11)]
    pub seed: u64,

    /// Close the window once the step budget is spent
    #[arg(long)]
    pub exit_when_done: bool,
}

impl Options {
    /// `None` steps forever.
    pub fn step_budget(&self) -> Option<u64> {
        (self.steps > 0).then_some(self.steps)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Options, clap::Error> {
        Options::try_parse_from(std::iter::once("tandem-studio").chain(args.iter().copied()))
    }

    // ── definition ──

    #[test]
    fn command_definition_is_consistent() {
        Options::command().debug_assert();
    }

    // ── parsing ──

    #[test]
    fn defaults_to_budgeted_life() {
        let opts = parse(&[]).unwrap();
        assert_eq!(opts.demo, DemoKind::Life);
        assert_eq!(opts.step_budget(), Some(200));
        assert_eq!(opts.interval(), Duration::from_millis(100));
        assert!(!opts.exit_when_done);
    }

    #[test]
    fn reads_demo_and_flags() {
        let opts = parse(&[
            "particles",
            "--steps",
            "50",
            "--interval-ms",
            "16",
            "--seed",
            "9",
            "--exit-when-done",
        ])
        .unwrap();
        assert_eq!(opts.demo, DemoKind::Particles);
        assert_eq!(opts.step_budget(), Some(50));
        assert_eq!(opts.interval(), Duration::from_millis(16));
        assert_eq!(opts.seed, 9);
        assert!(opts.exit_when_done);
    }

    #[test]
    fn frame2d_selects_heat() {
        assert_eq!(parse(&["frame2d"]).unwrap().demo, DemoKind::Heat);
    }

    #[test]
    fn zero_steps_means_unbounded() {
        assert_eq!(parse(&["--steps", "0"]).unwrap().step_budget(), None);
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(parse(&["--steps"]).is_err());
        assert!(parse(&["--steps", "many"]).is_err());
        assert!(parse(&["--fast"]).is_err());
        assert!(parse(&["boids"]).is_err());
    }
}
