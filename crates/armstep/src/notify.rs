//! Progress and failure notifiers injected into steps.

use armstep_core::ActionError;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

type SayFn = Arc<dyn Fn(&str) + Send + Sync>;
type ErrorFn = Arc<dyn Fn(&ActionError) + Send + Sync>;

/// The `say` and `error` collaborators of a step.
///
/// Both are fire-and-forget. The default forwards to `tracing`.
///
/// # Examples
///
/// ```
/// use armstep::Notifier;
/// use std::sync::{Arc, Mutex};
///
/// let lines = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&lines);
/// let notifier = Notifier::new(
///     move |message: &str| sink.lock().unwrap().push(message.to_string()),
///     |_error| {},
/// );
///
/// notifier.say("Creating resource group ...");
/// assert_eq!(lines.lock().unwrap().len(), 1);
/// ```
#[derive(Clone)]
pub struct Notifier {
    say: SayFn,
    error: ErrorFn,
}

impl Notifier {
    pub fn new(
        say: impl Fn(&str) + Send + Sync + 'static,
        error: impl Fn(&ActionError) + Send + Sync + 'static,
    ) -> Self {
        Self {
            say: Arc::new(say),
            error: Arc::new(error),
        }
    }

    /// A notifier that drops every message.
    pub fn silent() -> Self {
        Self::new(|_| {}, |_| {})
    }

    pub fn say(&self, message: &str) {
        (self.say)(message)
    }

    pub fn error(&self, error: &ActionError) {
        (self.error)(error)
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(
            |message| info!(target: "armstep::ui", "{}", message),
            |e| error!(target: "armstep::ui", "{:#}", e),
        )
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::Mutex;

    #[test]
    fn test_forwards_to_collaborators() {
        let said = Arc::new(Mutex::new(Vec::new()));
        let errors = Arc::new(Mutex::new(Vec::new()));
        let said_sink = Arc::clone(&said);
        let error_sink = Arc::clone(&errors);

        let notifier = Notifier::new(
            move |message: &str| said_sink.lock().unwrap().push(message.to_string()),
            move |e: &ActionError| error_sink.lock().unwrap().push(e.to_string()),
        );

        notifier.say("hello");
        notifier.error(&anyhow!("boom"));

        assert_eq!(*said.lock().unwrap(), vec!["hello".to_string()]);
        assert_eq!(*errors.lock().unwrap(), vec!["boom".to_string()]);
    }

    #[test]
    fn test_silent_and_default_do_not_panic() {
        Notifier::silent().say("ignored");
        Notifier::default().error(&anyhow!("logged"));
    }
}
