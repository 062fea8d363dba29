use crate::{
    collection::{Entry, EntryCollection},
    config::{self, AppConfig},
    storage,
};
use anyhow::{bail, Context, Result};
use arboard::Clipboard;
use std::{
    collections::BTreeSet,
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    time::{Duration, Instant},
};

const LOG_CAPACITY: usize = 400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    AddEntry,
    RenameEntry { original: String },
    Search,
    OpenList,
    SaveList,
    ImportFile,
    ExportFile,
}

#[derive(Debug, Clone)]
pub enum InputMode {
    Normal,
    Editing {
        prompt: String,
        buffer: String,
        purpose: InputPurpose,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    Yes,
    No,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    RemoveEntry { name: String },
    RemoveMarked { names: Vec<String> },
    ClearAll,
    QuitUnsaved,
    OpenUnsaved { input: String },
}

#[derive(Debug, Clone)]
pub struct Dialog {
    pub title: String,
    pub message: String,
    pub yes_label: String,
    pub no_label: String,
    pub choice: DialogChoice,
    pub kind: DialogKind,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

/// Session state behind the terminal UI. Owns the entry collection and
/// everything the collection deliberately knows nothing about: the open
/// file, selection, search filter, marks, prompts and OS integrations.
pub struct App {
    pub config: AppConfig,
    pub collection: EntryCollection,
    pub lists_folder: PathBuf,
    pub current_file: Option<PathBuf>,
    pub dirty: bool,
    pub status: String,
    pub selected: usize,
    pub filter: String,
    filter_snapshot: Option<String>,
    pub marked: BTreeSet<String>,
    sort_ascending: Option<bool>,
    pub input_mode: InputMode,
    pub dialog: Option<Dialog>,
    pub logs: Vec<LogEntry>,
    pub json_scroll: u16,
    pub toast: Option<Toast>,
    pub should_quit: bool,
    clipboard: Option<Clipboard>,
    log_path: PathBuf,
}

impl App {
    pub fn initialize() -> Result<Self> {
        let config = AppConfig::load_or_create()?;
        let lists_folder = config::lists_folder();
        let mut app = Self::new(config, lists_folder);
        app.log_info(format!("Lists folder: {}", app.lists_folder.display()));
        Ok(app)
    }

    pub fn new(config: AppConfig, lists_folder: PathBuf) -> Self {
        let collection = EntryCollection::new(config.auto_sort_on_insert);
        let log_path = config.log_path();
        Self {
            config,
            collection,
            lists_folder,
            current_file: None,
            dirty: false,
            status: "Ready".to_string(),
            selected: 0,
            filter: String::new(),
            filter_snapshot: None,
            marked: BTreeSet::new(),
            sort_ascending: None,
            input_mode: InputMode::Normal,
            dialog: None,
            logs: Vec::new(),
            json_scroll: 0,
            toast: None,
            should_quit: false,
            clipboard: None,
            log_path,
        }
    }

    pub fn tick(&mut self) {
        if let Some(toast) = &self.toast {
            if toast.expires_at <= Instant::now() {
                self.toast = None;
            }
        }
    }

    pub fn file_label(&self) -> String {
        let name = self
            .current_file
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());
        if self.dirty {
            format!("{name} *")
        } else {
            name
        }
    }

    pub fn hint(&self) -> &'static str {
        if self.marked.is_empty() {
            "a add | r rename | space toggle | del remove | / search | ^S save | q quit"
        } else {
            "m mark | X remove marked | esc clear marks"
        }
    }

    // Selection works on visible rows; entries are re-found by name after
    // every mutation because the collection may reorder.

    pub fn visible_indices(&self) -> Vec<usize> {
        if self.config.search_filter_enabled && !self.filter.trim().is_empty() {
            self.collection.matching(&self.filter)
        } else {
            (0..self.collection.len()).collect()
        }
    }

    /// Visible rows paired with their position in the full list.
    pub fn visible_entries(&self) -> Vec<(usize, &Entry)> {
        let entries = self.collection.entries();
        self.visible_indices()
            .into_iter()
            .filter_map(|index| entries.get(index).map(|entry| (index, entry)))
            .collect()
    }

    pub fn selected_name(&self) -> Option<String> {
        let visible = self.visible_indices();
        visible
            .get(self.selected)
            .and_then(|index| self.collection.entries().get(*index))
            .map(|entry| entry.name.clone())
    }

    pub fn select_name(&mut self, name: &str) {
        let entries = self.collection.entries();
        let position = self
            .visible_indices()
            .iter()
            .position(|index| entries.get(*index).map(|entry| entry.name == name).unwrap_or(false));
        if let Some(position) = position {
            self.selected = position;
        }
        self.clamp_selection();
    }

    pub fn clamp_selection(&mut self) {
        let total = self.visible_indices().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        self.selected = self.selected.saturating_add(1);
        self.clamp_selection();
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible_indices().len().saturating_sub(1);
    }

    pub fn scroll_json_up(&mut self, lines: u16) {
        self.json_scroll = self.json_scroll.saturating_sub(lines);
    }

    pub fn scroll_json_down(&mut self, lines: u16) {
        self.json_scroll = self.json_scroll.saturating_add(lines);
    }

    pub fn json_preview(&self) -> String {
        match self.collection.serialize_for_export() {
            Ok(text) => text,
            Err(err) => format!("JSON unavailable: {err}"),
        }
    }

    fn touch(&mut self) {
        self.dirty = true;
    }

    // Entry operations.

    pub fn enter_add_entry(&mut self) {
        self.enter_input("New entry", String::new(), InputPurpose::AddEntry);
    }

    pub fn enter_rename_selected(&mut self) {
        let Some(name) = self.selected_name() else {
            self.status = "Nothing to rename".to_string();
            return;
        };
        self.enter_input(
            &format!("Rename '{name}'"),
            name.clone(),
            InputPurpose::RenameEntry { original: name },
        );
    }

    pub fn add_entry(&mut self, name: &str) -> Result<()> {
        self.collection.add(name, true)?;
        let name = name.trim().to_string();
        if self.collection.auto_sort_on_insert() {
            self.sort_ascending = Some(true);
        }
        self.touch();
        self.select_name(&name);
        self.status = format!("Added: {name}");
        self.log_info(format!("Added entry: {name}"));
        Ok(())
    }

    pub fn rename_entry(&mut self, original: &str, new_name: &str) -> Result<()> {
        self.collection.rename(original, new_name)?;
        let new_name = new_name.trim().to_string();
        if new_name == original {
            return Ok(());
        }
        if self.marked.remove(original) {
            self.marked.insert(new_name.clone());
        }
        if self.collection.auto_sort_on_insert() {
            self.sort_ascending = Some(true);
        }
        self.touch();
        self.select_name(&new_name);
        self.status = format!("Renamed: {original} -> {new_name}");
        self.log_info(format!("Renamed entry: {original} -> {new_name}"));
        Ok(())
    }

    pub fn toggle_selected(&mut self) -> Result<()> {
        let Some(name) = self.selected_name() else {
            return Ok(());
        };
        let enabled = self.collection.toggle(&name)?;
        self.touch();
        self.status = format!(
            "{}: {name}",
            if enabled { "Enabled" } else { "Disabled" }
        );
        Ok(())
    }

    /// Enables every entry unless all are already enabled, in which case
    /// every entry is disabled.
    pub fn toggle_all(&mut self) {
        if self.collection.is_empty() {
            self.status = "List is empty".to_string();
            return;
        }
        let enable = !self.collection.all_enabled();
        self.collection.set_all_enabled(enable);
        self.touch();
        self.status = if enable {
            format!("Enabled all {} entries", self.collection.len())
        } else {
            format!("Disabled all {} entries", self.collection.len())
        };
        self.log_info(self.status.clone());
    }

    pub fn toggle_sort(&mut self) {
        let ascending = match self.sort_ascending {
            Some(ascending) => !ascending,
            None => !self.collection.auto_sort_on_insert(),
        };
        let keep = self.selected_name();
        self.collection.sort(ascending);
        self.sort_ascending = Some(ascending);
        self.touch();
        if let Some(name) = keep {
            self.select_name(&name);
        }
        self.status = if ascending {
            "Sorted A-Z".to_string()
        } else {
            "Sorted Z-A".to_string()
        };
    }

    pub fn sort_label(&self) -> &'static str {
        match self.sort_ascending {
            Some(true) => "A-Z",
            Some(false) => "Z-A",
            None if self.collection.auto_sort_on_insert() => "A-Z",
            None => "added",
        }
    }

    pub fn toggle_auto_sort(&mut self) {
        let value = !self.config.auto_sort_on_insert;
        self.config.auto_sort_on_insert = value;
        let keep = self.selected_name();
        self.collection.set_auto_sort_on_insert(value);
        if value {
            self.sort_ascending = Some(true);
        }
        if let Some(name) = keep {
            self.select_name(&name);
        }
        if let Err(err) = self.config.save() {
            self.log_warn(format!("Config save failed: {err:#}"));
        }
        self.status = format!("Auto-sort {}", if value { "on" } else { "off" });
        self.log_info(self.status.clone());
    }

    pub fn remove_selected(&mut self) -> Result<()> {
        let Some(name) = self.selected_name() else {
            self.status = "Nothing to remove".to_string();
            return Ok(());
        };
        if self.config.confirm_on_remove {
            self.open_dialog(Dialog {
                title: "Confirm Removal".to_string(),
                message: format!("Remove entry '{name}'?"),
                yes_label: "Remove".to_string(),
                no_label: "Cancel".to_string(),
                choice: DialogChoice::No,
                kind: DialogKind::RemoveEntry { name },
            });
            return Ok(());
        }
        self.remove_entry(&name)
    }

    pub fn remove_entry(&mut self, name: &str) -> Result<()> {
        self.collection.remove(name)?;
        self.marked.remove(name);
        self.touch();
        self.clamp_selection();
        self.status = format!("Removed: {name}");
        self.log_info(format!("Removed entry: {name}"));
        Ok(())
    }

    pub fn toggle_mark_selected(&mut self) {
        let Some(name) = self.selected_name() else {
            return;
        };
        if !self.marked.remove(&name) {
            self.marked.insert(name);
        }
        self.move_down();
    }

    pub fn clear_marks(&mut self) {
        if !self.marked.is_empty() {
            self.marked.clear();
            self.status = "Marks cleared".to_string();
        }
    }

    pub fn request_remove_marked(&mut self) {
        if self.marked.is_empty() {
            self.status = "No entries marked (press m to mark)".to_string();
            self.set_toast("No entries marked", ToastLevel::Warn, Duration::from_secs(2));
            return;
        }
        let names: Vec<String> = self.marked.iter().cloned().collect();
        let preview: Vec<&str> = names.iter().take(8).map(String::as_str).collect();
        let mut message = format!("Remove {} entries?\n{}", names.len(), preview.join("\n"));
        if names.len() > preview.len() {
            message.push_str(&format!("\n...and {} more", names.len() - preview.len()));
        }
        self.open_dialog(Dialog {
            title: "Confirm Batch Removal".to_string(),
            message,
            yes_label: "Remove".to_string(),
            no_label: "Cancel".to_string(),
            choice: DialogChoice::No,
            kind: DialogKind::RemoveMarked { names },
        });
    }

    pub fn remove_marked(&mut self, names: &[String]) {
        let removed = self
            .collection
            .remove_all(names.iter().map(String::as_str));
        for name in names {
            self.marked.remove(name);
        }
        if removed > 0 {
            self.touch();
        }
        self.clamp_selection();
        self.status = format!("Removed {removed} entries");
        self.log_info(format!("Batch removed {removed} of {} marked entries", names.len()));
    }

    pub fn request_clear_all(&mut self) {
        if self.collection.is_empty() {
            self.status = "List is already empty".to_string();
            return;
        }
        if !self.config.confirm_on_remove {
            self.clear_all();
            return;
        }
        self.open_dialog(Dialog {
            title: "Clear All".to_string(),
            message: format!("Remove all {} entries?", self.collection.len()),
            yes_label: "Clear".to_string(),
            no_label: "Cancel".to_string(),
            choice: DialogChoice::No,
            kind: DialogKind::ClearAll,
        });
    }

    pub fn clear_all(&mut self) {
        let count = self.collection.len();
        self.collection.clear();
        self.marked.clear();
        self.selected = 0;
        self.touch();
        self.status = format!("Cleared {count} entries");
        self.log_info(self.status.clone());
    }

    // Search.

    pub fn enter_search(&mut self) {
        if !self.config.search_filter_enabled {
            self.status = "Search is disabled in config".to_string();
            return;
        }
        self.filter_snapshot = Some(self.filter.clone());
        let current = self.filter.clone();
        self.enter_input("Search", current, InputPurpose::Search);
    }

    /// Live filter while the search prompt is open.
    pub fn preview_filter(&mut self, value: &str) {
        let keep = self.selected_name();
        self.filter = value.trim().to_string();
        self.selected = 0;
        if let Some(name) = keep {
            self.select_name(&name);
        }
    }

    pub fn cancel_search(&mut self) {
        if let Some(previous) = self.filter_snapshot.take() {
            self.preview_filter(&previous);
        }
    }

    pub fn apply_filter(&mut self, value: &str) {
        self.filter_snapshot = None;
        self.preview_filter(value);
        if self.filter.is_empty() {
            self.status = "Search cleared".to_string();
        } else {
            self.status = format!(
                "Search: {} ({} match{})",
                self.filter,
                self.visible_indices().len(),
                if self.visible_indices().len() == 1 { "" } else { "es" }
            );
        }
    }

    pub fn clear_filter(&mut self) {
        if !self.filter.is_empty() {
            self.apply_filter("");
        }
    }

    // Files.

    pub fn enter_open_list(&mut self) {
        let buffer = folder_prompt(&self.lists_folder);
        self.enter_input("Open list", buffer, InputPurpose::OpenList);
    }

    pub fn enter_save_as(&mut self) {
        let buffer = match &self.current_file {
            Some(path) => path.display().to_string(),
            None => self.lists_folder.join("list.json").display().to_string(),
        };
        self.enter_input("Save list as", buffer, InputPurpose::SaveList);
    }

    pub fn enter_import_file(&mut self) {
        let buffer = folder_prompt(&self.lists_folder);
        self.enter_input("Import CSV", buffer, InputPurpose::ImportFile);
    }

    pub fn enter_export(&mut self) {
        let buffer = self
            .lists_folder
            .join(storage::default_export_name())
            .display()
            .to_string();
        self.enter_input("Export enabled entries", buffer, InputPurpose::ExportFile);
    }

    /// Opens `input`, asking first when the current list has unsaved changes.
    pub fn request_open_list(&mut self, input: &str) -> Result<()> {
        if !self.dirty {
            return self.open_list(input);
        }
        self.open_dialog(Dialog {
            title: "Unsaved Changes".to_string(),
            message: format!(
                "{} has unsaved changes.\nOpen {} anyway?",
                self.file_label(),
                input.trim()
            ),
            yes_label: "Open".to_string(),
            no_label: "Stay".to_string(),
            choice: DialogChoice::No,
            kind: DialogKind::OpenUnsaved {
                input: input.to_string(),
            },
        });
        Ok(())
    }

    pub fn open_list(&mut self, input: &str) -> Result<()> {
        let path = self.resolve_path(input)?;
        let records = storage::read_list_file(&path)?;
        self.marked.clear();
        self.selected = 0;
        self.sort_ascending = None;
        match self.collection.load_from(&records) {
            Ok(count) => {
                self.current_file = Some(path.clone());
                self.dirty = false;
                self.status = format!("Opened {} ({count} entries)", path.display());
                self.log_info(format!("Opened list: {} ({count} entries)", path.display()));
                Ok(())
            }
            Err(err) => {
                // The collection was cleared before the failing record.
                self.current_file = None;
                self.dirty = false;
                Err(anyhow::Error::new(err).context(format!("load {}", path.display())))
            }
        }
    }

    pub fn save(&mut self) -> Result<()> {
        match self.current_file.clone() {
            Some(path) => self.write_list(&path),
            None => {
                self.enter_save_as();
                Ok(())
            }
        }
    }

    pub fn save_as(&mut self, input: &str) -> Result<()> {
        let path = self.resolve_json_path(input)?;
        self.write_list(&path)
    }

    fn write_list(&mut self, path: &Path) -> Result<()> {
        storage::write_list_file(path, &self.collection)?;
        self.current_file = Some(path.to_path_buf());
        self.dirty = false;
        self.status = format!("Saved: {}", path.display());
        self.log_info(format!("List saved to {}", path.display()));
        self.set_toast("List saved", ToastLevel::Info, Duration::from_secs(2));
        Ok(())
    }

    pub fn import_file(&mut self, input: &str) -> Result<()> {
        let path = self.resolve_path(input)?;
        let lines = storage::read_import_lines(&path)?;
        self.import_lines(&lines, &path.display().to_string());
        Ok(())
    }

    /// Pasted text is treated like an import file, one name per line.
    pub fn import_text(&mut self, text: &str) {
        let lines: Vec<&str> = text.lines().collect();
        self.import_lines(&lines, "paste");
    }

    fn import_lines<S: AsRef<str>>(&mut self, lines: &[S], source: &str) {
        let keep = self.selected_name();
        let summary = self.collection.import_names(lines);
        if summary.added > 0 {
            self.touch();
            if self.collection.auto_sort_on_insert() {
                self.sort_ascending = Some(true);
            }
        }
        if let Some(name) = keep {
            self.select_name(&name);
        }
        self.status = format!(
            "Imported {} entries ({} skipped)",
            summary.added, summary.skipped
        );
        self.log_info(format!(
            "Import from {source}: {} added, {} skipped",
            summary.added, summary.skipped
        ));
    }

    pub fn export_file(&mut self, input: &str) -> Result<()> {
        let path = self.resolve_json_path(input)?;
        storage::write_export_file(&path, &self.collection)?;
        self.status = format!("Exported: {}", path.display());
        self.log_info(format!(
            "Exported {} enabled entries to {}",
            self.collection.enabled_count(),
            path.display()
        ));
        self.set_toast("Enabled entries exported", ToastLevel::Info, Duration::from_secs(2));
        Ok(())
    }

    fn resolve_path(&self, input: &str) -> Result<PathBuf> {
        if input.trim().is_empty() {
            bail!("no path entered");
        }
        Ok(storage::resolve_input_path(&self.lists_folder, input))
    }

    fn resolve_json_path(&self, input: &str) -> Result<PathBuf> {
        if input.trim().is_empty() {
            bail!("no path entered");
        }
        Ok(storage::resolve_json_path(&self.lists_folder, input))
    }

    // OS integrations.

    pub fn copy_json_to_clipboard(&mut self) -> Result<()> {
        let text = self
            .collection
            .serialize_for_export()
            .context("serialize export")?;
        if self.copy_to_clipboard(&text) {
            self.status = "JSON copied to clipboard".to_string();
            self.set_toast(
                "JSON copied to clipboard",
                ToastLevel::Info,
                Duration::from_secs(2),
            );
        }
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: &str) -> bool {
        let result = match self.clipboard_mut() {
            Some(clipboard) => clipboard.set_text(text.to_string()),
            None => return false,
        };
        if let Err(err) = result {
            self.status = format!("Clipboard copy failed: {err}");
            self.log_warn(format!("Clipboard copy failed: {err}"));
            self.set_toast("Clipboard copy failed", ToastLevel::Error, Duration::from_secs(3));
            return false;
        }
        true
    }

    fn clipboard_mut(&mut self) -> Option<&mut Clipboard> {
        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => {
                    self.clipboard = Some(clipboard);
                }
                Err(err) => {
                    self.status = format!("Clipboard unavailable: {err}");
                    self.log_warn(format!("Clipboard unavailable: {err}"));
                    self.set_toast("Clipboard unavailable", ToastLevel::Error, Duration::from_secs(3));
                    return None;
                }
            }
        }
        self.clipboard.as_mut()
    }

    pub fn open_bingosync(&mut self) {
        let url = self.config.bingosync_url.clone();
        self.open_external(&url, "Bingosync");
    }

    pub fn open_lists_folder(&mut self) {
        let folder = self.lists_folder.display().to_string();
        self.open_external(&folder, "lists folder");
    }

    fn open_external(&mut self, target: &str, label: &str) {
        let mut errors = Vec::new();
        for (command, args) in opener_commands(target) {
            match Command::new(command)
                .args(&args)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
            {
                Ok(status) if status.success() => {
                    self.status = format!("Opened {label}");
                    return;
                }
                Ok(status) => {
                    errors.push(format!("{command} exited {status}"));
                }
                Err(err) => {
                    errors.push(format!("{command} failed: {err}"));
                }
            }
        }
        self.status = format!("Failed to open {label}");
        if errors.is_empty() {
            self.log_warn(format!("Failed to open {label}"));
        } else {
            self.log_warn(format!("Failed to open {label}: {}", errors.join("; ")));
        }
    }

    // Prompts and dialogs.

    fn enter_input(&mut self, prompt: &str, buffer: String, purpose: InputPurpose) {
        self.input_mode = InputMode::Editing {
            prompt: prompt.to_string(),
            buffer,
            purpose,
        };
    }

    pub fn handle_submit(&mut self, purpose: InputPurpose, value: String) -> Result<()> {
        match purpose {
            InputPurpose::AddEntry => self.add_entry(&value),
            InputPurpose::RenameEntry { original } => self.rename_entry(&original, &value),
            InputPurpose::Search => {
                self.apply_filter(&value);
                Ok(())
            }
            InputPurpose::OpenList => self.request_open_list(&value),
            InputPurpose::SaveList => self.save_as(&value),
            InputPurpose::ImportFile => self.import_file(&value),
            InputPurpose::ExportFile => self.export_file(&value),
        }
    }

    pub fn cancel_input(&mut self, purpose: &InputPurpose) {
        let message = match purpose {
            InputPurpose::AddEntry => "Add cancelled".to_string(),
            InputPurpose::RenameEntry { original } => format!("Rename cancelled: {original}"),
            InputPurpose::Search => {
                self.cancel_search();
                "Search cancelled".to_string()
            }
            InputPurpose::OpenList => "Open cancelled".to_string(),
            InputPurpose::SaveList => "Save cancelled".to_string(),
            InputPurpose::ImportFile => "Import cancelled".to_string(),
            InputPurpose::ExportFile => "Export cancelled".to_string(),
        };
        self.status = message.clone();
        self.set_toast(&message, ToastLevel::Warn, Duration::from_secs(2));
    }

    pub fn request_quit(&mut self) {
        if !self.dirty {
            self.should_quit = true;
            return;
        }
        self.open_dialog(Dialog {
            title: "Unsaved Changes".to_string(),
            message: format!("{} has unsaved changes.\nQuit anyway?", self.file_label()),
            yes_label: "Quit".to_string(),
            no_label: "Stay".to_string(),
            choice: DialogChoice::No,
            kind: DialogKind::QuitUnsaved,
        });
    }

    fn open_dialog(&mut self, dialog: Dialog) {
        self.input_mode = InputMode::Normal;
        self.dialog = Some(dialog);
    }

    pub fn dialog_choice_left(&mut self) {
        self.dialog_set_choice(DialogChoice::Yes);
    }

    pub fn dialog_choice_right(&mut self) {
        self.dialog_set_choice(DialogChoice::No);
    }

    pub fn dialog_set_choice(&mut self, choice: DialogChoice) {
        if let Some(dialog) = &mut self.dialog {
            dialog.choice = choice;
        }
    }

    pub fn dialog_confirm(&mut self) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        if dialog.choice != DialogChoice::Yes {
            self.status = format!("{} cancelled", dialog.title);
            return;
        }
        match dialog.kind {
            DialogKind::RemoveEntry { name } => {
                if let Err(err) = self.remove_entry(&name) {
                    self.report_error("Remove", &err);
                }
            }
            DialogKind::RemoveMarked { names } => self.remove_marked(&names),
            DialogKind::ClearAll => self.clear_all(),
            DialogKind::QuitUnsaved => self.should_quit = true,
            DialogKind::OpenUnsaved { input } => {
                if let Err(err) = self.open_list(&input) {
                    self.report_error("Open", &err);
                }
            }
        }
    }

    // Status, toasts and the event log.

    pub fn report_error(&mut self, action: &str, err: &anyhow::Error) {
        self.status = format!("{action} failed: {err:#}");
        self.log_error(format!("{action} failed: {err:#}"));
        self.set_toast(&format!("{action} failed: {err}"), ToastLevel::Error, Duration::from_secs(4));
    }

    pub fn set_toast(&mut self, message: &str, level: ToastLevel, duration: Duration) {
        self.toast = Some(Toast {
            message: message.to_string(),
            level,
            expires_at: Instant::now() + duration,
        });
    }

    pub fn log_info(&mut self, message: String) {
        self.push_log(LogLevel::Info, message);
    }

    pub fn log_warn(&mut self, message: String) {
        self.push_log(LogLevel::Warn, message);
    }

    pub fn log_error(&mut self, message: String) {
        self.push_log(LogLevel::Error, message);
    }

    fn push_log(&mut self, level: LogLevel, message: String) {
        self.logs.push(LogEntry {
            level,
            message: message.clone(),
        });
        if self.logs.len() > LOG_CAPACITY {
            let overflow = self.logs.len() - LOG_CAPACITY;
            self.logs.drain(0..overflow);
        }
        let _ = append_log_file(&self.log_path, level, &message);
    }
}

fn folder_prompt(folder: &Path) -> String {
    let mut value = folder.display().to_string();
    if !value.ends_with(std::path::MAIN_SEPARATOR) {
        value.push(std::path::MAIN_SEPARATOR);
    }
    value
}

fn opener_commands(target: &str) -> Vec<(&'static str, Vec<String>)> {
    if cfg!(target_os = "windows") {
        vec![(
            "cmd",
            vec![
                "/C".to_string(),
                "start".to_string(),
                String::new(),
                target.to_string(),
            ],
        )]
    } else if cfg!(target_os = "macos") {
        vec![("open", vec![target.to_string()])]
    } else {
        vec![
            ("xdg-open", vec![target.to_string()]),
            ("gio", vec!["open".to_string(), target.to_string()]),
        ]
    }
}

fn log_level_label(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Info => "INFO",
        LogLevel::Warn => "WARN",
        LogLevel::Error => "ERROR",
    }
}

fn append_log_file(path: &Path, level: LogLevel, message: &str) -> std::io::Result<()> {
    let label = log_level_label(level);
    let format = time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let stamp = time::OffsetDateTime::now_utc()
        .format(&format)
        .unwrap_or_default();
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{stamp} [{label}] {message}")
}
