//! Console intake notifier for development. Logs notifications to tracing output.

use async_trait::async_trait;
use hsg_application::{IntakeNotification, IntakeNotifier};
use hsg_core::AppResult;
use tracing::info;

/// Notifier that logs accepted intakes instead of calling a CRM.
///
/// Only identifiers and the requested service are logged, never contact
/// details. The case number is omitted when `log_case_numbers` is off.
#[derive(Clone)]
pub struct ConsoleIntakeNotifier {
    log_case_numbers: bool,
}

impl ConsoleIntakeNotifier {
    /// Creates a console notifier.
    #[must_use]
    pub fn new(log_case_numbers: bool) -> Self {
        Self { log_case_numbers }
    }
}

impl Default for ConsoleIntakeNotifier {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl IntakeNotifier for ConsoleIntakeNotifier {
    async fn intake_received(&self, notification: &IntakeNotification) -> AppResult<()> {
        let case_number = notification
            .case_number
            .as_ref()
            .filter(|_| self.log_case_numbers)
            .map(ToString::to_string);

        info!(
            intake_id = %notification.intake_id,
            service_needed = %notification.service_needed,
            case_opened = notification.case_number.is_some(),
            case_number = case_number.as_deref(),
            "intake received (console notifier)"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use hsg_application::{IntakeNotification, IntakeNotifier};
    use hsg_domain::{CaseNumber, IntakeId};

    use super::ConsoleIntakeNotifier;

    #[tokio::test]
    async fn notifier_never_fails() {
        let notifier = ConsoleIntakeNotifier::new(false);
        let notification = IntakeNotification {
            intake_id: IntakeId::new(),
            service_needed: "formation".to_owned(),
            case_number: CaseNumber::from_sequence(2026, 4321).ok(),
        };

        assert!(notifier.intake_received(&notification).await.is_ok());
    }
}
