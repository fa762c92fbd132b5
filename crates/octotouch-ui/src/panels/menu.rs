//! Menu tree of the idle screen.

use std::rc::Rc;

use crate::context::UiContext;
use crate::panel::{Navigation, Panel, PanelAction, PanelView, BACK_ACTION};

use super::{
    back_action, ControlPanel, ExtrudePanel, FanPanel, FilesPanel, HomePanel, MovePanel,
    PrintMenuPanel, SystemPanel, TemperaturePanel,
};

/// Builds the panel a menu button opens.
pub type PanelBuilder = fn(&Rc<UiContext>) -> Rc<dyn Panel>;

#[derive(Clone)]
pub enum MenuItem {
    Panel {
        id: &'static str,
        label: &'static str,
        build: PanelBuilder,
    },
    Submenu {
        id: &'static str,
        label: &'static str,
        items: Vec<MenuItem>,
    },
}

impl MenuItem {
    pub fn id(&self) -> &'static str {
        match self {
            MenuItem::Panel { id, .. } | MenuItem::Submenu { id, .. } => id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuItem::Panel { label, .. } | MenuItem::Submenu { label, .. } => label,
        }
    }

    pub fn action(&self) -> PanelAction {
        PanelAction::new(self.id(), self.label())
    }

    /// Navigation that opens this item.
    pub fn open(&self, ctx: &Rc<UiContext>) -> Navigation {
        match self {
            MenuItem::Panel { id, build, .. } => Navigation::Open(ctx.shared_panel(*id, *build)),
            MenuItem::Submenu { label, items, .. } => {
                Navigation::Open(Rc::new(MenuPanel::new(ctx, label, items.clone())))
            }
        }
    }
}

impl std::fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuItem::Panel { id, .. } => write!(f, "Panel({id})"),
            MenuItem::Submenu { id, items, .. } => write!(f, "Submenu({id}, {items:?})"),
        }
    }
}

pub(crate) fn open_home(ctx: &Rc<UiContext>) -> Rc<dyn Panel> {
    Rc::new(HomePanel::new(ctx))
}

pub(crate) fn open_movement(ctx: &Rc<UiContext>) -> Rc<dyn Panel> {
    Rc::new(MovePanel::new(ctx))
}

pub(crate) fn open_extrude(ctx: &Rc<UiContext>) -> Rc<dyn Panel> {
    Rc::new(ExtrudePanel::new(ctx))
}

pub(crate) fn open_fan(ctx: &Rc<UiContext>) -> Rc<dyn Panel> {
    Rc::new(FanPanel::new(ctx))
}

pub(crate) fn open_temperature(ctx: &Rc<UiContext>) -> Rc<dyn Panel> {
    Rc::new(TemperaturePanel::new(ctx))
}

pub(crate) fn open_control(ctx: &Rc<UiContext>) -> Rc<dyn Panel> {
    Rc::new(ControlPanel::new(ctx))
}

pub(crate) fn open_system(ctx: &Rc<UiContext>) -> Rc<dyn Panel> {
    Rc::new(SystemPanel::new(ctx))
}

pub(crate) fn open_files(ctx: &Rc<UiContext>) -> Rc<dyn Panel> {
    Rc::new(FilesPanel::new(ctx))
}

pub(crate) fn open_print_menu(ctx: &Rc<UiContext>) -> Rc<dyn Panel> {
    Rc::new(PrintMenuPanel::new(ctx))
}

/// Home, Actions (Move, Extrude, Fan, Temperature, Control) and
/// Configuration (System).
pub fn default_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::Panel {
            id: "home",
            label: "Home",
            build: open_home,
        },
        MenuItem::Submenu {
            id: "actions",
            label: "Actions",
            items: vec![
                MenuItem::Panel {
                    id: "move",
                    label: "Move",
                    build: open_movement,
                },
                MenuItem::Panel {
                    id: "extrude",
                    label: "Extrude",
                    build: open_extrude,
                },
                MenuItem::Panel {
                    id: "fan",
                    label: "Fan",
                    build: open_fan,
                },
                MenuItem::Panel {
                    id: "temperature",
                    label: "Temperature",
                    build: open_temperature,
                },
                MenuItem::Panel {
                    id: "control",
                    label: "Control",
                    build: open_control,
                },
            ],
        },
        MenuItem::Submenu {
            id: "configuration",
            label: "Configuration",
            items: vec![MenuItem::Panel {
                id: "system",
                label: "System",
                build: open_system,
            }],
        },
        MenuItem::Panel {
            id: "files",
            label: "Print/Files",
            build: open_files,
        },
    ]
}

/// A page of menu buttons.
pub struct MenuPanel {
    ctx: Rc<UiContext>,
    title: String,
    items: Vec<MenuItem>,
}

impl MenuPanel {
    pub fn new(ctx: &Rc<UiContext>, title: &str, items: Vec<MenuItem>) -> Self {
        Self {
            ctx: Rc::clone(ctx),
            title: title.to_string(),
            items,
        }
    }
}

impl Panel for MenuPanel {
    fn name(&self) -> &str {
        "menu"
    }

    fn view(&self) -> PanelView {
        let view = self
            .items
            .iter()
            .fold(PanelView::new(&self.title), |view, item| {
                view.action(item.action())
            });
        view.action(back_action())
    }

    fn activate(&self, action: &str) -> Navigation {
        if action == BACK_ACTION {
            return Navigation::Back;
        }
        match self.items.iter().find(|item| item.id() == action) {
            Some(item) => item.open(&self.ctx),
            None => {
                tracing::debug!(menu = %self.title, action, "Unknown menu action");
                Navigation::Stay
            }
        }
    }
}
