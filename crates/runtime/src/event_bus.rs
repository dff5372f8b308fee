use tracing::{error, info, warn};

/// Category of a user-facing diagnostic.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// An input dataset failed to read or decode. Terminal for that dataset.
    LoadFailure,
    /// An action needs a dataset that has not arrived yet.
    NotReady,
    /// A filter matched nothing. Informational only.
    EmptyResult,
    /// The chosen province/municipality could not be resolved.
    UnresolvableSelection,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoadFailure => "load_failure",
            Self::NotReady => "not_ready",
            Self::EmptyResult => "empty_result",
            Self::UnresolvableSelection => "unresolvable_selection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Structured diagnostic channel.
///
/// Every emitted diagnostic is also forwarded to `tracing` at a level that
/// matches its kind, so a UI can drain the bus while logs stay complete.
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Diagnostic>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        match kind {
            DiagnosticKind::LoadFailure => error!(kind = kind.as_str(), "{message}"),
            DiagnosticKind::NotReady | DiagnosticKind::UnresolvableSelection => {
                warn!(kind = kind.as_str(), "{message}")
            }
            DiagnosticKind::EmptyResult => info!(kind = kind.as_str(), "{message}"),
        }
        self.events.push(Diagnostic { kind, message });
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    pub fn last(&self) -> Option<&Diagnostic> {
        self.events.last()
    }

    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.events)
    }
}
