use std::time::{Duration, Instant};

/// Default number of simulation steps a demo runs before it stops stepping.
pub const DEFAULT_STEP_BUDGET: u64 = 200;

/// Paces simulation steps at a fixed interval with an overall step budget.
///
/// The render loop may run faster than the simulation; `due` answers whether
/// this frame should advance the orchestrator. At most one step is granted
/// per call, so a long stall never produces a burst of catch-up steps.
#[derive(Debug, Clone)]
pub struct StepSchedule {
    interval: Duration,
    budget: Option<u64>,
    taken: u64,
    last: Option<Instant>,
}

impl StepSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            budget: Some(DEFAULT_STEP_BUDGET),
            taken: 0,
            last: None,
        }
    }

    /// `None` runs forever.
    pub fn with_budget(mut self, budget: Option<u64>) -> Self {
        self.budget = budget;
        self
    }

    pub fn due(&mut self) -> bool {
        self.due_at(Instant::now())
    }

    pub fn due_at(&mut self, now: Instant) -> bool {
        if self.exhausted() {
            return false;
        }
        let waiting = self
            .last
            .is_some_and(|last| now.saturating_duration_since(last) < self.interval);
        if waiting {
            return false;
        }
        self.last = Some(now);
        self.taken += 1;
        true
    }

    pub fn steps_taken(&self) -> u64 {
        self.taken
    }

    pub fn exhausted(&self) -> bool {
        self.budget.is_some_and(|b| self.taken >= b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_is_due() {
        let mut s = StepSchedule::new(Duration::from_millis(100));
        assert!(s.due_at(Instant::now()));
    }

    #[test]
    fn steps_wait_for_interval() {
        let t0 = Instant::now();
        let mut s = StepSchedule::new(Duration::from_millis(100));
        assert!(s.due_at(t0));
        assert!(!s.due_at(t0 + Duration::from_millis(40)));
        assert!(s.due_at(t0 + Duration::from_millis(100)));
        assert_eq!(s.steps_taken(), 2);
    }

    #[test]
    fn budget_stops_stepping() {
        let t0 = Instant::now();
        let mut s = StepSchedule::new(Duration::ZERO).with_budget(Some(3));
        let granted = (0..10).filter(|_| s.due_at(t0)).count();
        assert_eq!(granted, 3);
        assert!(s.exhausted());
    }

    #[test]
    fn default_budget_is_two_hundred() {
        let t0 = Instant::now();
        let mut s = StepSchedule::new(Duration::ZERO);
        let granted = (0..1000).filter(|_| s.due_at(t0)).count();
        assert_eq!(granted as u64, DEFAULT_STEP_BUDGET);
    }

    #[test]
    fn unbounded_schedule_never_exhausts() {
        let t0 = Instant::now();
        let mut s = StepSchedule::new(Duration::ZERO).with_budget(None);
        assert!((0..500).all(|_| s.due_at(t0)));
        assert!(!s.exhausted());
    }
}
