//! The kiosk coordinator
//!
//! `Shell` ties the pieces together on the UI thread: the connection
//! monitor's `state_check` task, the router's root panels, the navigation
//! history and the display surface. Front-ends feed it user input and
//! call `run_once` from their main loop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use octotouch_core::MacroState;

use crate::context::UiContext;
use crate::dispatch::UiInput;
use crate::monitor::{Clock, ConnectionMonitor, ConnectionStatus, SystemClock, CHECK_INTERVAL};
use crate::navigation::NavigationStack;
use crate::panel::{Navigation, Panel, PanelView, BACK_ACTION};
use crate::panels::ConfirmPanel;
use crate::router::{DefaultPanelFactory, PanelRouter};
use crate::surface::DisplaySurface;
use crate::supervisor::Supervisor;
use crate::task::PeriodicTask;

/// UI-thread state mutated by the monitor and by user input.
pub struct ShellState {
    nav: NavigationStack,
    router: PanelRouter,
    monitor: ConnectionMonitor,
}

impl ShellState {
    fn check_connection(&mut self) {
        let ShellState {
            nav,
            router,
            monitor,
        } = self;
        monitor.tick(&mut |next| router.swap_to(next, nav));
        nav.refresh();
    }

    fn navigate(&mut self, navigation: Navigation, origin: Rc<dyn Panel>) {
        let ShellState { nav, router, .. } = self;
        match navigation {
            Navigation::Stay => nav.refresh(),
            Navigation::Open(panel) => nav.open(panel, Some(origin)),
            Navigation::Back => nav.back(|| router.default_panel()),
        }
    }
}

pub struct Shell {
    ctx: Rc<UiContext>,
    state: Rc<RefCell<ShellState>>,
    monitor_task: PeriodicTask,
    supervisor: Rc<dyn Supervisor>,
    ready_sent: Cell<bool>,
}

impl Shell {
    pub fn new(
        ctx: &Rc<UiContext>,
        surface: Box<dyn DisplaySurface>,
        supervisor: Rc<dyn Supervisor>,
    ) -> Self {
        Self::with_clock(ctx, surface, supervisor, Box::new(SystemClock))
    }

    pub fn with_clock(
        ctx: &Rc<UiContext>,
        surface: Box<dyn DisplaySurface>,
        supervisor: Rc<dyn Supervisor>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let status = ConnectionStatus::new();
        let monitor = ConnectionMonitor::new(
            Rc::clone(&ctx.printer),
            Rc::clone(&supervisor),
            Rc::clone(&status),
        )
        .with_clock(clock);
        let router = PanelRouter::new(Box::new(DefaultPanelFactory::new(ctx, status)));

        let state = Rc::new(RefCell::new(ShellState {
            nav: NavigationStack::new(surface),
            router,
            monitor,
        }));

        let weak = Rc::downgrade(&state);
        let monitor_task = ctx.periodic("state_check", CHECK_INTERVAL, move || {
            let Some(state) = weak.upgrade() else {
                return Ok(());
            };
            match state.try_borrow_mut() {
                Ok(mut state) => state.check_connection(),
                Err(_) => tracing::debug!("Shell busy, skipping state check"),
            }
            Ok(())
        });

        Self {
            ctx: Rc::clone(ctx),
            state,
            monitor_task,
            supervisor,
            ready_sent: Cell::new(false),
        }
    }

    pub fn context(&self) -> &Rc<UiContext> {
        &self.ctx
    }

    /// Show the splash panel and start polling the printer.
    pub fn start(&self) {
        {
            let mut state = self.state.borrow_mut();
            let ShellState {
                nav,
                router,
                monitor,
            } = &mut *state;
            router.swap_to(monitor.state(), nav);
        }
        tracing::info!("Starting connection monitor");
        self.monitor_task.start();
    }

    /// Tell the supervisor the window is up. Only the first call counts.
    pub fn notify_ready(&self) {
        if !self.ready_sent.replace(true) {
            self.supervisor.ready();
        }
    }

    /// Run queued task callbacks and user input, waiting up to `wait` for
    /// the first message. Returns false once a quit was requested.
    pub fn run_once(&self, wait: Duration) -> bool {
        let outcome = self.ctx.dispatcher.pump(wait);
        for input in outcome.inputs {
            self.handle_input(input);
        }
        if outcome.fired > 0 {
            if let Ok(mut state) = self.state.try_borrow_mut() {
                state.nav.refresh();
            }
        }
        !outcome.quit
    }

    /// Route one button press to the current panel. Only actions shown by
    /// the panel's current view are accepted; the back key always is.
    /// Actions that carry a confirmation prompt open a `ConfirmPanel` first.
    pub fn handle_input(&self, input: UiInput) {
        let mut state = self.state.borrow_mut();
        let Some(current) = state.nav.current() else {
            tracing::debug!(?input, "No panel to receive input");
            return;
        };

        let (action, prompt) = match input {
            UiInput::Back => (BACK_ACTION.to_string(), None),
            UiInput::Activate(action) => {
                let Some(prompt) = current
                    .view()
                    .find_action(&action)
                    .map(|a| a.confirm.clone())
                else {
                    tracing::debug!(
                        panel = current.name(),
                        action = %action,
                        "Action not on screen"
                    );
                    return;
                };
                (action, prompt)
            }
        };
        tracing::debug!(panel = current.name(), action = %action, "Input");

        let navigation = match prompt {
            Some(prompt) => Navigation::Open(Rc::new(ConfirmPanel::new(
                prompt,
                Rc::clone(&current),
                action,
            ))),
            None => current.activate(&action),
        };
        state.navigate(navigation, current);
    }

    pub fn macro_state(&self) -> MacroState {
        self.state.borrow().monitor.state().clone()
    }

    pub fn status(&self) -> Rc<ConnectionStatus> {
        Rc::clone(self.state.borrow().monitor.status())
    }

    pub fn current_panel(&self) -> Option<Rc<dyn Panel>> {
        self.state.borrow().nav.current()
    }

    pub fn current_view(&self) -> Option<PanelView> {
        self.current_panel().map(|panel| panel.view())
    }

    /// Return targets on the navigation history.
    pub fn depth(&self) -> usize {
        self.state.borrow().nav.depth()
    }

    /// Stop polling, hide the current panel and join every timer thread.
    pub fn shutdown(&self) {
        tracing::info!("Shutting down");
        self.monitor_task.cancel();
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.nav.close();
        }
        self.ctx.tasks.cancel_all();
        self.ctx.release_panels();
    }
}
