//! Shared application context handed to every panel.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use octotouch_core::PrinterClient;
use octotouch_settings::Config;

use crate::dispatch::Dispatcher;
use crate::panel::Panel;
use crate::router::PanelRegistry;
use crate::task::{PeriodicTask, TaskRegistry};

/// Version of the client binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_date: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            build_date: "unknown",
        }
    }
}

/// Everything panels need, threaded through constructors.
pub struct UiContext {
    pub config: Arc<Config>,
    pub printer: Rc<dyn PrinterClient>,
    pub dispatcher: Rc<Dispatcher>,
    pub tasks: TaskRegistry,
    pub build: BuildInfo,
    /// Child panels by menu id, shared by every place that opens them
    panels: RefCell<PanelRegistry<&'static str>>,
}

impl UiContext {
    pub fn new(config: Arc<Config>, printer: Rc<dyn PrinterClient>, build: BuildInfo) -> Rc<Self> {
        Rc::new(Self {
            config,
            printer,
            dispatcher: Dispatcher::new(),
            tasks: TaskRegistry::new(),
            build,
            panels: RefCell::default(),
        })
    }

    /// The child panel registered under `id`, built on first use.
    ///
    /// Reopening a panel shows the same instance, so its settings survive
    /// and its background task is reused.
    pub fn shared_panel<F>(self: &Rc<Self>, id: &'static str, build: F) -> Rc<dyn Panel>
    where
        F: FnOnce(&Rc<Self>) -> Rc<dyn Panel>,
    {
        if let Some(panel) = self.panels.borrow().get(id) {
            return panel;
        }
        let panel = build(self);
        let mut panels = self.panels.borrow_mut();
        panels.insert(id, Rc::clone(&panel));
        tracing::debug!(panel = id, shared = panels.count(), "Created panel");
        panel
    }

    /// Drop every shared panel along with its background task.
    pub fn release_panels(&self) {
        let released = self.panels.take();
        tracing::debug!(panels = released.count(), "Releasing panels");
    }

    /// Create a stopped periodic task on this context's dispatcher.
    pub fn periodic<F>(&self, name: &str, interval: Duration, callback: F) -> PeriodicTask
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        PeriodicTask::new(&self.dispatcher, &self.tasks, name, interval, callback)
    }
}
