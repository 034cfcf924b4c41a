//! Service recycling: best-effort restart of the configured services.

use serde::Serialize;
use std::process::Command;
use thiserror::Error;
use tracing::{info, warn};

/// Why one service's recycle request failed.
#[derive(Debug, Error)]
pub enum RecycleError {
    /// Recycle command could not be spawned
    #[error("failed to spawn recycle command: {0}")]
    Spawn(#[from] std::io::Error),

    /// Recycle command ran but reported failure
    #[error("recycle command exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    /// Command template produced no program to run
    #[error("recycle command is empty")]
    EmptyCommand,
}

/// External control surface that restarts one named service.
pub trait ServiceController {
    fn recycle(&self, service: &str) -> Result<(), RecycleError>;
}

/// Controller that runs a configured command per service, substituting
/// `{service}` in each whitespace-separated token.
pub struct CommandController {
    template: String,
}

impl CommandController {
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }
}

impl ServiceController for CommandController {
    fn recycle(&self, service: &str) -> Result<(), RecycleError> {
        let tokens: Vec<String> = self
            .template
            .split_whitespace()
            .map(|t| t.replace("{service}", service))
            .collect();
        let (program, args) = tokens.split_first().ok_or(RecycleError::EmptyCommand)?;

        let output = Command::new(program).args(args).output()?;
        if !output.status.success() {
            return Err(RecycleError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// One failed recycle attempt, kept for the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct RecycleFailure {
    pub service: String,
    pub reason: String,
}

/// Summary of a recycle pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecycleReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<RecycleFailure>,
}

impl RecycleReport {
    /// Whether every attempted recycle succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Issue one recycle request per service identifier.
///
/// A failure for one identifier is logged and recorded but never stops
/// the loop; the remaining services still get their restart attempt.
/// No retries - the cleanup sweep that follows gives slow services
/// their grace period.
pub fn recycle_all<C: ServiceController + ?Sized>(
    controller: &C,
    services: &[String],
) -> RecycleReport {
    let mut report = RecycleReport {
        attempted: services.len(),
        ..Default::default()
    };

    for service in services {
        match controller.recycle(service) {
            Ok(()) => {
                info!(service = %service, "Service recycled");
                report.succeeded += 1;
            }
            Err(e) => {
                warn!(service = %service, error = %e, "Service recycle failed");
                report.failures.push(RecycleFailure {
                    service: service.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    info!(
        attempted = report.attempted,
        succeeded = report.succeeded,
        failed = report.failures.len(),
        "Recycle pass complete"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Scripted controller: fails for the listed services and records
    /// every identifier it was asked to recycle.
    struct ScriptedController {
        failing: HashSet<String>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedController {
        fn failing_for(services: &[&str]) -> Self {
            Self {
                failing: services.iter().map(|s| s.to_string()).collect(),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl ServiceController for ScriptedController {
        fn recycle(&self, service: &str) -> Result<(), RecycleError> {
            self.seen.lock().unwrap().push(service.to_string());
            if self.failing.contains(service) {
                return Err(RecycleError::CommandFailed {
                    status: "exit status: 1".to_string(),
                    stderr: "unit not found".to_string(),
                });
            }
            Ok(())
        }
    }

    fn services(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_services_recycled() {
        let controller = ScriptedController::failing_for(&[]);
        let report = recycle_all(&controller, &services(&["pool1", "pool2"]));

        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded, 2);
        assert!(report.all_succeeded());
        assert_eq!(controller.seen(), vec!["pool1", "pool2"]);
    }

    #[test]
    fn test_one_failure_does_not_stop_the_loop() {
        let controller = ScriptedController::failing_for(&["pool2"]);
        let report = recycle_all(&controller, &services(&["pool1", "pool2", "pool3"]));

        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].service, "pool2");
        // pool3 still received its restart attempt.
        assert_eq!(controller.seen(), vec!["pool1", "pool2", "pool3"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_controller_substitutes_service() {
        // `true` ignores its arguments and exits 0 on any unix box.
        let controller = CommandController::new("true {service}");
        assert!(controller.recycle("pool1").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_controller_nonzero_exit() {
        let controller = CommandController::new("false {service}");
        let err = controller.recycle("pool1").unwrap_err();
        assert!(matches!(err, RecycleError::CommandFailed { .. }));
    }

    #[test]
    fn test_command_controller_spawn_failure() {
        let controller = CommandController::new("hotswap-no-such-binary {service}");
        let err = controller.recycle("pool1").unwrap_err();
        assert!(matches!(err, RecycleError::Spawn(_)));
    }

    #[test]
    fn test_empty_template_rejected() {
        let controller = CommandController::new("   ");
        let err = controller.recycle("pool1").unwrap_err();
        assert!(matches!(err, RecycleError::EmptyCommand));
    }
}
