//! Display surfaces
//!
//! A surface mounts the active panel's view. The headless surface only
//! logs, which is what the kiosk runs with when built without a toolkit.

use crate::panel::PanelView;

/// Where the active panel is rendered.
pub trait DisplaySurface {
    /// Mount a newly opened panel.
    fn attach(&mut self, panel: &str, view: &PanelView);

    /// Re-render the mounted panel after its view changed.
    fn update(&mut self, view: &PanelView);
}

/// Surface that writes view changes to the log.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    last: Option<PanelView>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_view(&self) -> Option<&PanelView> {
        self.last.as_ref()
    }
}

impl DisplaySurface for HeadlessSurface {
    fn attach(&mut self, panel: &str, view: &PanelView) {
        tracing::info!(panel, title = %view.title, "Panel attached");
        for line in &view.lines {
            tracing::info!("  {line}");
        }
        self.last = Some(view.clone());
    }

    fn update(&mut self, view: &PanelView) {
        if self.last.as_ref() == Some(view) {
            return;
        }
        tracing::debug!(title = %view.title, lines = ?view.lines, "Panel updated");
        self.last = Some(view.clone());
    }
}
