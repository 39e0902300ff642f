use std::sync::Mutex;

/// Receives error text from failed statements when suppression is off.
pub trait ErrorSink: Send + Sync {
    fn report(&self, message: &str);
}

/// Emits reported errors as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, message: &str) {
        tracing::error!(target: "dbengine::error", "{message}");
    }
}

/// Keeps reported errors in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl ErrorSink for MemorySink {
    fn report(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
