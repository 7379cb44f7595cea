//! One-shot "platform ready" signal

use std::future::Future;

use tokio::sync::watch;

/// Which host event resolves the ready signal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadyTrigger {
    /// Window load, resolving with `"dom"`
    #[default]
    WindowLoad,
    /// Native bridge device-ready, resolving with `"cordova"`
    DeviceReady,
}

impl ReadyTrigger {
    /// The ready source reported when this trigger fires
    pub fn source(self) -> &'static str {
        match self {
            ReadyTrigger::WindowLoad => "dom",
            ReadyTrigger::DeviceReady => "cordova",
        }
    }
}

/// Deferred signal resolved once with the name of its source
#[derive(Debug)]
pub struct ReadySignal {
    tx: watch::Sender<Option<String>>,
}

impl ReadySignal {
    /// Create an unresolved signal
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Resolve the signal; later calls are ignored and return false
    pub fn trigger(&self, source: &str) -> bool {
        if self.is_ready() {
            return false;
        }
        tracing::debug!("platform ready: {}", source);
        self.tx.send_replace(Some(source.to_string()));
        true
    }

    /// Whether the signal has been resolved
    pub fn is_ready(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// The source the signal was resolved with
    pub fn source(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    /// Future resolving to the ready source
    ///
    /// Resolves immediately if the signal already fired, and to `None` if
    /// the signal is dropped without ever firing.
    pub fn wait(&self) -> impl Future<Output = Option<String>> + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            match rx.wait_for(Option::is_some).await {
                Ok(source) => source.clone(),
                Err(_) => None,
            }
        }
    }
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::new()
    }
}
