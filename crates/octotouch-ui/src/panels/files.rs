//! Browse the `local` storage of the server and start prints.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::DateTime;
use octotouch_core::{ellipsis, ellipsis_len, FileEntry};

use crate::context::UiContext;
use crate::panel::{Navigation, Panel, PanelAction, PanelView, BACK_ACTION};

use super::log_failure;

const LOCATION: &str = "local";

/// `1.2 MB` style size.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["kB", "MB", "GB", "TB"];
    if bytes < 1000 {
        return format!("{bytes} Bytes");
    }
    let mut value = bytes as f64;
    let mut unit = "";
    for next in UNITS {
        if value < 1000.0 {
            break;
        }
        value /= 1000.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}

fn describe(entry: &FileEntry) -> String {
    let name = ellipsis(&entry.name);
    if entry.is_folder() {
        return format!("{name}/");
    }
    let uploaded = entry
        .date
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let size = entry.size.map(format_size).unwrap_or_else(|| "-".to_string());
    format!("{name} (Uploaded: {uploaded} - Size: {size})")
}

pub struct FilesPanel {
    ctx: Rc<UiContext>,
    /// Folder paths entered so far; the root is the empty path
    history: RefCell<Vec<String>>,
    entries: RefCell<Vec<FileEntry>>,
}

impl FilesPanel {
    pub fn new(ctx: &Rc<UiContext>) -> Self {
        let panel = Self {
            ctx: Rc::clone(ctx),
            history: RefCell::new(vec![String::new()]),
            entries: RefCell::new(Vec::new()),
        };
        panel.load();
        panel
    }

    /// Path of the folder being shown.
    pub fn current_path(&self) -> String {
        self.history.borrow().last().cloned().unwrap_or_default()
    }

    pub fn is_root(&self) -> bool {
        self.history.borrow().len() <= 1
    }

    fn load(&self) {
        let path = self.current_path();
        tracing::info!(location = LOCATION, path = %path, "Loading files");
        let Some(mut entries) =
            log_failure(self.name(), "list_files", self.ctx.printer.list_files(LOCATION, &path))
        else {
            return;
        };
        FileEntry::sort_for_display(&mut entries);
        *self.entries.borrow_mut() = entries;
    }

    fn entry(&self, action: &str, prefix: &str) -> Option<FileEntry> {
        let index: usize = action.strip_prefix(prefix)?.parse().ok()?;
        self.entries.borrow().get(index).cloned()
    }

    fn open_folder(&self, folder: &FileEntry) {
        self.history.borrow_mut().push(folder.path.clone());
        self.load();
    }

    fn go_up(&self) {
        self.history.borrow_mut().pop();
        self.load();
    }

    fn print(&self, file: &FileEntry) {
        tracing::info!(path = %file.path, "Load and print file");
        log_failure(
            self.name(),
            "print",
            self.ctx.printer.select_file(LOCATION, &file.path, true),
        );
    }
}

impl Panel for FilesPanel {
    fn name(&self) -> &str {
        "files"
    }

    fn view(&self) -> PanelView {
        let entries = self.entries.borrow();
        let mut view = PanelView::new("Files");
        for (index, entry) in entries.iter().enumerate() {
            view = view.line(describe(entry));
            view = if entry.is_folder() {
                view.action(PanelAction::new(
                    format!("open:{index}"),
                    format!("Open {}", ellipsis(&entry.name)),
                ))
            } else {
                view.action(
                    PanelAction::new(
                        format!("print:{index}"),
                        format!("Print {}", ellipsis(&entry.name)),
                    )
                    .with_confirm(format!(
                        "Send file to printer?\n\n{}",
                        ellipsis_len(&entry.name, 27)
                    )),
                )
            };
        }
        view.action(PanelAction::new("refresh", "Refresh"))
            .action(PanelAction::new(BACK_ACTION, "Back"))
    }

    fn activate(&self, action: &str) -> Navigation {
        match action {
            BACK_ACTION if self.is_root() => return Navigation::Back,
            BACK_ACTION => self.go_up(),
            "refresh" => self.load(),
            _ => {
                if let Some(folder) = self.entry(action, "open:") {
                    self.open_folder(&folder);
                } else if let Some(file) = self.entry(action, "print:") {
                    self.print(&file);
                }
            }
        }
        Navigation::Stay
    }
}
