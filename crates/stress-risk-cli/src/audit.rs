use colored::Colorize;
use stress_risk_core::audit::AuditSink;

/// Host-side audit sink: engine events go to stderr so stdout stays clean
/// for the formatted result.
pub struct StderrAudit;

impl AuditSink for StderrAudit {
    fn record(&self, message: &str) {
        eprintln!("{} {}", "[audit]".dimmed(), message.dimmed());
    }
}
