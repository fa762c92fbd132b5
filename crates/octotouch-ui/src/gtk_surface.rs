//! GTK4 front-end
//!
//! A fixed-size window renders the current `PanelView` as a title, text
//! lines and a grid of buttons. Clicks go through the idle queue like any
//! other input; a glib timeout pumps the dispatcher.

use std::rc::Rc;
use std::time::Duration;

use gtk4::prelude::*;
use gtk4::{glib, Align, Box as GtkBox, Button, FlowBox, Label, Orientation, SelectionMode};

use crate::context::UiContext;
use crate::dispatch::{IdleSender, UiInput};
use crate::panel::PanelView;
use crate::shell::Shell;
use crate::supervisor::Supervisor;
use crate::surface::DisplaySurface;

const PUMP_INTERVAL: Duration = Duration::from_millis(50);

pub struct GtkSurface {
    root: GtkBox,
    sender: IdleSender,
    last: Option<PanelView>,
}

impl GtkSurface {
    pub fn new(root: GtkBox, sender: IdleSender) -> Self {
        Self {
            root,
            sender,
            last: None,
        }
    }

    fn render(&mut self, view: &PanelView) {
        while let Some(child) = self.root.first_child() {
            self.root.remove(&child);
        }

        let title = Label::new(Some(&view.title));
        title.add_css_class("title-2");
        self.root.append(&title);

        for line in &view.lines {
            let label = Label::new(Some(line));
            label.set_wrap(true);
            label.set_halign(Align::Start);
            self.root.append(&label);
        }

        let buttons = FlowBox::new();
        buttons.set_selection_mode(SelectionMode::None);
        buttons.set_homogeneous(true);
        buttons.set_max_children_per_line(4);
        buttons.set_vexpand(true);
        buttons.set_valign(Align::End);
        for action in &view.actions {
            let button = Button::with_label(&action.label);
            let sender = self.sender.clone();
            let id = action.id.clone();
            button.connect_clicked(move |_| {
                sender.send_input(UiInput::Activate(id.clone()));
            });
            buttons.insert(&button, -1);
        }
        self.root.append(&buttons);

        self.last = Some(view.clone());
    }
}

impl DisplaySurface for GtkSurface {
    fn attach(&mut self, panel: &str, view: &PanelView) {
        tracing::debug!(panel, "Mounting panel");
        self.render(view);
    }

    fn update(&mut self, view: &PanelView) {
        if self.last.as_ref() != Some(view) {
            self.render(view);
        }
    }
}

/// Open the window and run the glib main loop until quit.
pub fn run(ctx: &Rc<UiContext>, supervisor: Rc<dyn Supervisor>) -> anyhow::Result<()> {
    gtk4::init()?;

    let resolution = ctx.config.resolution;
    let window = gtk4::Window::builder()
        .title("OctoTouch")
        .default_width(i32::try_from(resolution.width)?)
        .default_height(i32::try_from(resolution.height)?)
        .resizable(false)
        .build();

    let root = GtkBox::new(Orientation::Vertical, 6);
    root.set_margin_top(6);
    root.set_margin_bottom(6);
    root.set_margin_start(6);
    root.set_margin_end(6);
    window.set_child(Some(&root));

    let sender = ctx.dispatcher.sender();
    let surface = GtkSurface::new(root, sender.clone());
    let shell = Rc::new(Shell::new(ctx, Box::new(surface), supervisor));
    shell.start();

    let main_loop = glib::MainLoop::new(None, false);
    window.connect_close_request(move |_| {
        sender.quit();
        glib::Propagation::Proceed
    });

    {
        let shell = Rc::clone(&shell);
        let main_loop = main_loop.clone();
        glib::timeout_add_local(PUMP_INTERVAL, move || {
            if shell.run_once(Duration::ZERO) {
                glib::ControlFlow::Continue
            } else {
                main_loop.quit();
                glib::ControlFlow::Break
            }
        });
    }

    window.present();
    shell.notify_ready();
    main_loop.run();

    shell.shutdown();
    Ok(())
}
