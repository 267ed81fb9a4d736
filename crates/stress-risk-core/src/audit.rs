use std::sync::Mutex;

/// Collaborator for informational engine events ("simulation started",
/// "simulation completed").
///
/// Sinks accept free text and have no effect on the computed result. A sink
/// must swallow its own failures; `record` is infallible by contract and the
/// engine never inspects the sink.
pub trait AuditSink {
    fn record(&self, message: &str);
}

/// Sink that discards every event. The engine must tolerate this.
#[derive(Debug, Default)]
pub struct NoopAudit;

impl AuditSink for NoopAudit {
    fn record(&self, _message: &str) {}
}

/// Thread-safe in-memory sink for tests and embedding hosts that want to
/// inspect the event stream after a run.
#[derive(Debug, Default)]
pub struct MemoryAudit {
    entries: Mutex<Vec<String>>,
}

impl MemoryAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, message: &str) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(message.to_string());
        }
    }
}
