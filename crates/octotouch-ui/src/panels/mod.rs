//! Kiosk panels
//!
//! Every panel implements [`Panel`](crate::panel::Panel). Root panels
//! (splash, idle status, print status) are owned by the router. Panels
//! opened from menus are built on first use and kept by the context
//! (`UiContext::shared_panel`); confirmation prompts are built per use.

pub mod confirm;
pub mod control;
pub mod extrude;
pub mod fan;
pub mod files;
pub mod home;
pub mod idle_status;
pub mod menu;
pub mod movement;
pub mod print_menu;
pub mod print_status;
pub mod splash;
pub mod system;
pub mod temperature;

pub use confirm::ConfirmPanel;
pub use control::ControlPanel;
pub use extrude::ExtrudePanel;
pub use fan::FanPanel;
pub use files::FilesPanel;
pub use home::HomePanel;
pub use idle_status::IdleStatusPanel;
pub use menu::{default_menu, MenuItem, MenuPanel};
pub use movement::MovePanel;
pub use print_menu::PrintMenuPanel;
pub use print_status::PrintStatusPanel;
pub use splash::SplashPanel;
pub use system::SystemPanel;
pub use temperature::{PresetPanel, TemperaturePanel};

use octotouch_core::ClientResult;

use crate::panel::{PanelAction, BACK_ACTION};

/// Log a failed printer command. Returns the value on success.
pub(crate) fn log_failure<T>(panel: &str, action: &str, result: ClientResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_remote_disconnect() => {
            tracing::debug!(panel, action, "Ignoring remote disconnect");
            None
        }
        Err(e) => {
            tracing::error!(panel, action, status = ?e.status(), "Printer command failed: {e}");
            None
        }
    }
}

/// Result of a background poll: remote disconnects are skipped quietly,
/// other errors go to the dispatcher log.
pub(crate) fn polled<T>(result: ClientResult<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_remote_disconnect() => {
            tracing::debug!("Ignoring remote disconnect");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn back_action() -> PanelAction {
    PanelAction::new(BACK_ACTION, "Back")
}

/// `tool0` → `Tool0`
pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octotouch_core::ClientError;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("tool0"), "Tool0");
        assert_eq!(capitalize("bed"), "Bed");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_polled_skips_remote_disconnect() {
        let result: ClientResult<u32> = Err(ClientError::RemoteDisconnected {
            reason: "closed".into(),
        });
        assert!(polled(result).unwrap().is_none());

        let result: ClientResult<u32> = Err(ClientError::RequestCanceled);
        assert!(polled(result).is_err());
    }
}
