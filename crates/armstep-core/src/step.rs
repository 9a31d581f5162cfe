//! Step trait and related types.

use crate::context::StateBag;
use async_trait::async_trait;
use std::fmt::{self, Debug};

/// Type-safe step name wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StepName(String);

impl StepName {
    /// Creates a new StepName.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the step name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StepName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StepName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for StepName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<&str> for StepName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Outcome of a step's `run`.
///
/// There is no retry signal: retrying is the action collaborator's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Proceed to the next step.
    Continue,
    /// Stop the pipeline and start teardown.
    Halt,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Continue => write!(f, "continue"),
            Signal::Halt => write!(f, "halt"),
        }
    }
}

/// A unit of work in a pipeline, together with its rollback.
///
/// `run` is invoked once per execution. On failure a step reports the error,
/// records it under [`ERROR`](crate::keys::ERROR) and returns
/// [`Signal::Halt`]; it never panics or returns an error past its own
/// boundary. `cleanup` is invoked by the runner during teardown.
///
/// # Examples
///
/// ```
/// use armstep_core::{Signal, StateBag, StateKey, Step, StepName};
/// use async_trait::async_trait;
///
/// const GREETING: StateKey<String> = StateKey::new("Greeting");
///
/// #[derive(Debug)]
/// struct Greet;
///
/// #[async_trait]
/// impl Step for Greet {
///     fn name(&self) -> StepName {
///         StepName::new("Greet")
///     }
///
///     async fn run(&mut self, bag: &mut StateBag) -> Signal {
///         bag.put(GREETING, "hello".to_string());
///         Signal::Continue
///     }
/// }
/// ```
#[async_trait]
pub trait Step: Send + Sync + Debug {
    /// Returns the step name.
    fn name(&self) -> StepName;

    /// Performs the step's action using values read from `bag`.
    async fn run(&mut self, bag: &mut StateBag) -> Signal;

    /// Best-effort reversal of `run`.
    ///
    /// Must be a no-op when `run` never executed. Failures are reported, not
    /// returned. The default does nothing.
    async fn cleanup(&mut self, _bag: &mut StateBag) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Counter {
        runs: u32,
    }

    #[async_trait]
    impl Step for Counter {
        fn name(&self) -> StepName {
            StepName::new("Counter")
        }

        async fn run(&mut self, _bag: &mut StateBag) -> Signal {
            self.runs += 1;
            Signal::Continue
        }
    }

    #[test]
    fn test_step_name() {
        let name = StepName::new("test");
        assert_eq!(name.as_str(), "test");

        let name: StepName = "test".into();
        assert_eq!(name, "test");
    }

    #[test]
    fn test_signal_display() {
        assert_eq!(Signal::Continue.to_string(), "continue");
        assert_eq!(Signal::Halt.to_string(), "halt");
    }

    #[test]
    fn test_default_cleanup_leaves_bag_untouched() {
        let mut step = Counter::default();
        let mut bag = StateBag::new();

        tokio_test::block_on(step.cleanup(&mut bag));

        assert!(bag.is_empty());
        assert_eq!(step.runs, 0);
    }

    #[test]
    fn test_run_through_trait_object() {
        let mut step: Box<dyn Step> = Box::new(Counter::default());
        let mut bag = StateBag::new();

        let signal = tokio_test::block_on(step.run(&mut bag));

        assert_eq!(signal, Signal::Continue);
        assert_eq!(step.name(), "Counter");
    }
}
