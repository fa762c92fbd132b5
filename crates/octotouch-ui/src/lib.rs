//! # OctoTouch UI
//!
//! Everything between the printer client and the screen: the UI-thread
//! dispatcher and periodic tasks, the panel contract and navigation
//! history, the connection monitor that picks the root panel, the router
//! that owns root panels, the kiosk panels themselves and the display
//! surfaces that render them.
//!
//! The crate is toolkit-independent. Panels produce a [`PanelView`];
//! the headless surface logs it and, with the `gtk` feature, a GTK4
//! window renders it.

pub mod context;
pub mod dispatch;
pub mod monitor;
pub mod navigation;
pub mod panel;
pub mod panels;
pub mod router;
pub mod shell;
pub mod supervisor;
pub mod surface;
pub mod task;

#[cfg(feature = "gtk")]
pub mod gtk_surface;

pub use context::{BuildInfo, UiContext};
pub use dispatch::{Dispatcher, IdleSender, PumpOutcome, TaskId, UiInput};
pub use monitor::{
    classify, Clock, ConnectionMonitor, ConnectionStatus, SystemClock, Verdict, CHECK_INTERVAL,
    FAILURE_GRACE, HOLD_MESSAGE, MAX_ATTEMPTS,
};
pub use navigation::NavigationStack;
pub use panel::{Navigation, Panel, PanelAction, PanelView, StepCycle, BACK_ACTION};
pub use router::{DefaultPanelFactory, PanelFactory, PanelKey, PanelRegistry, PanelRouter};
pub use shell::Shell;
pub use supervisor::{NullSupervisor, Supervisor, SystemdNotifier};
pub use surface::{DisplaySurface, HeadlessSurface};
pub use task::{PeriodicTask, TaskRegistry};
