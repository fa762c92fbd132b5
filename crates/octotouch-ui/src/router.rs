//! Root panel selection
//!
//! The router owns the root panels. Each is created on first use and kept
//! for the lifetime of the router, so re-entering a state shows the same
//! panel with its readings intact.

use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use octotouch_core::MacroState;

use crate::context::UiContext;
use crate::monitor::ConnectionStatus;
use crate::navigation::NavigationStack;
use crate::panel::Panel;
use crate::panels::{default_menu, IdleStatusPanel, PrintStatusPanel, SplashPanel};

/// Root panels, one per screen-level state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKey {
    Splash,
    IdleStatus,
    PrintStatus,
}

impl PanelKey {
    pub fn for_state(state: &MacroState) -> Self {
        match state {
            MacroState::Splash(_) | MacroState::ErrorHold => PanelKey::Splash,
            MacroState::Idle => PanelKey::IdleStatus,
            MacroState::Printing => PanelKey::PrintStatus,
        }
    }
}

/// Creates root panels on demand.
pub trait PanelFactory {
    fn create(&self, key: PanelKey) -> Rc<dyn Panel>;
}

pub struct DefaultPanelFactory {
    ctx: Rc<UiContext>,
    status: Rc<ConnectionStatus>,
}

impl DefaultPanelFactory {
    pub fn new(ctx: &Rc<UiContext>, status: Rc<ConnectionStatus>) -> Self {
        Self {
            ctx: Rc::clone(ctx),
            status,
        }
    }
}

impl PanelFactory for DefaultPanelFactory {
    fn create(&self, key: PanelKey) -> Rc<dyn Panel> {
        tracing::debug!(?key, "Creating root panel");
        match key {
            PanelKey::Splash => Rc::new(SplashPanel::new(&self.ctx, Rc::clone(&self.status))),
            PanelKey::IdleStatus => Rc::new(IdleStatusPanel::new(&self.ctx, default_menu())),
            PanelKey::PrintStatus => Rc::new(PrintStatusPanel::new(&self.ctx)),
        }
    }
}

/// Panels created on first use and reused afterwards.
pub struct PanelRegistry<K> {
    panels: HashMap<K, Rc<dyn Panel>>,
}

impl<K> Default for PanelRegistry<K> {
    fn default() -> Self {
        Self {
            panels: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Copy> PanelRegistry<K> {
    pub fn get(&self, key: K) -> Option<Rc<dyn Panel>> {
        self.panels.get(&key).cloned()
    }

    pub fn insert(&mut self, key: K, panel: Rc<dyn Panel>) {
        self.panels.insert(key, panel);
    }

    pub fn get_or_create(
        &mut self,
        key: K,
        create: impl FnOnce(K) -> Rc<dyn Panel>,
    ) -> Rc<dyn Panel> {
        Rc::clone(self.panels.entry(key).or_insert_with(|| create(key)))
    }

    /// Number of panels created so far.
    pub fn count(&self) -> usize {
        self.panels.len()
    }
}

pub struct PanelRouter {
    registry: PanelRegistry<PanelKey>,
    factory: Box<dyn PanelFactory>,
}

impl PanelRouter {
    pub fn new(factory: Box<dyn PanelFactory>) -> Self {
        Self {
            registry: PanelRegistry::default(),
            factory,
        }
    }

    pub fn panel(&mut self, key: PanelKey) -> Rc<dyn Panel> {
        let factory = &self.factory;
        self.registry.get_or_create(key, |key| factory.create(key))
    }

    /// The idle status panel, where back navigation ends up.
    pub fn default_panel(&mut self) -> Rc<dyn Panel> {
        self.panel(PanelKey::IdleStatus)
    }

    /// Show the root panel of `state`. A panel already on screen is only
    /// re-rendered.
    pub fn swap_to(&mut self, state: &MacroState, nav: &mut NavigationStack) {
        let panel = self.panel(PanelKey::for_state(state));
        if nav.is_current(&panel) {
            nav.refresh();
        } else {
            nav.open_root(panel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{Navigation, PanelView};
    use crate::surface::HeadlessSurface;
    use std::cell::Cell;

    struct Root(&'static str);

    impl Panel for Root {
        fn name(&self) -> &str {
            self.0
        }

        fn view(&self) -> PanelView {
            PanelView::new(self.0)
        }

        fn activate(&self, _action: &str) -> Navigation {
            Navigation::Stay
        }
    }

    #[derive(Default)]
    struct CountingFactory {
        created: Rc<Cell<u32>>,
    }

    impl PanelFactory for CountingFactory {
        fn create(&self, key: PanelKey) -> Rc<dyn Panel> {
            self.created.set(self.created.get() + 1);
            Rc::new(Root(match key {
                PanelKey::Splash => "splash",
                PanelKey::IdleStatus => "idle_status",
                PanelKey::PrintStatus => "print_status",
            }))
        }
    }

    #[test]
    fn test_panels_are_memoized() {
        let factory = CountingFactory::default();
        let created = Rc::clone(&factory.created);
        let mut router = PanelRouter::new(Box::new(factory));
        let mut nav = NavigationStack::new(Box::new(HeadlessSurface::new()));

        router.swap_to(&MacroState::Idle, &mut nav);
        router.swap_to(&MacroState::Printing, &mut nav);
        router.swap_to(&MacroState::Idle, &mut nav);
        router.swap_to(&MacroState::Splash("Startup...".into()), &mut nav);
        router.swap_to(&MacroState::ErrorHold, &mut nav);

        assert_eq!(created.get(), 3);
        assert_eq!(router.registry.count(), 3);
        assert_eq!(nav.current().unwrap().name(), "splash");
    }

    #[test]
    fn test_key_for_state() {
        assert_eq!(PanelKey::for_state(&MacroState::ErrorHold), PanelKey::Splash);
        assert_eq!(PanelKey::for_state(&MacroState::Idle), PanelKey::IdleStatus);
        assert_eq!(
            PanelKey::for_state(&MacroState::Printing),
            PanelKey::PrintStatus
        );
    }
}
