use crate::app::{App, DialogChoice, InputMode, InputPurpose, LogLevel, ToastLevel};
use anyhow::Result;
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Padding, Paragraph, Row, Table, TableState},
};
use std::{
    io,
    time::{Duration, Instant},
};

const PREVIEW_PANEL_WIDTH: u16 = 44;
const LOG_PANEL_HEIGHT: u16 = 8;

#[derive(Clone)]
struct Theme {
    accent: Color,
    accent_soft: Color,
    border: Color,
    text: Color,
    muted: Color,
    success: Color,
    warning: Color,
    error: Color,
    header_bg: Color,
    log_bg: Color,
}

impl Theme {
    fn new() -> Self {
        Self {
            accent: Color::Rgb(120, 190, 255),
            accent_soft: Color::Rgb(70, 110, 160),
            border: Color::Rgb(65, 75, 90),
            text: Color::Rgb(220, 230, 240),
            muted: Color::Rgb(135, 145, 155),
            success: Color::Rgb(120, 220, 140),
            warning: Color::Rgb(230, 200, 120),
            error: Color::Rgb(235, 100, 95),
            header_bg: Color::Rgb(22, 28, 36),
            log_bg: Color::Rgb(16, 20, 26),
        }
    }

    fn block(&self, title: &'static str) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.border))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(self.accent)
                    .add_modifier(Modifier::BOLD),
            ))
    }

    fn panel_dense(&self, title: &'static str) -> Block<'static> {
        self.block(title).padding(Padding {
            left: 0,
            right: 1,
            top: 0,
            bottom: 0,
        })
    }
}

pub fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<impl Backend>, app: &mut App) -> Result<()> {
    loop {
        app.tick();
        app.clamp_selection();
        terminal.draw(|frame| draw(frame, app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(200))? {
            match event::read()? {
                Event::Key(key) => {
                    handle_key(app, key);
                }
                Event::Paste(text) => {
                    handle_paste(app, text);
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if app.dialog.is_some() {
        handle_dialog_mode(app, key);
        return;
    }

    let mode = std::mem::replace(&mut app.input_mode, InputMode::Normal);
    match mode {
        InputMode::Normal => {
            if let Err(err) = handle_normal_mode(app, key) {
                app.report_error("Action", &err);
            }
        }
        InputMode::Editing {
            prompt,
            mut buffer,
            purpose,
        } => handle_input_mode(app, key, &mut buffer, purpose, prompt),
    }
}

fn handle_dialog_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
            app.dialog_choice_left();
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Tab => {
            app.dialog_choice_right();
        }
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.dialog_set_choice(DialogChoice::Yes);
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            app.dialog_set_choice(DialogChoice::No);
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.dialog_confirm();
        }
        KeyCode::Esc => {
            app.dialog_set_choice(DialogChoice::No);
            app.dialog_confirm();
        }
        _ => {}
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Result<()> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') if ctrl => app.save()?,
        KeyCode::Char('o') if ctrl => app.enter_open_list(),
        KeyCode::Char('f') if ctrl => app.enter_search(),
        KeyCode::Char('n') if ctrl => app.enter_add_entry(),
        KeyCode::Char('c') if ctrl => app.request_quit(),
        _ if ctrl => {}
        KeyCode::Char('q') | KeyCode::Char('Q') => app.request_quit(),
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::PageUp => app.scroll_json_up(10),
        KeyCode::PageDown => app.scroll_json_down(10),
        KeyCode::Char('a') => app.enter_add_entry(),
        KeyCode::Char('r') | KeyCode::F(2) => app.enter_rename_selected(),
        KeyCode::Delete | KeyCode::Char('d') => app.remove_selected()?,
        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected()?,
        KeyCode::Char('t') => app.toggle_all(),
        KeyCode::Char('s') => app.toggle_sort(),
        KeyCode::Char('A') => app.toggle_auto_sort(),
        KeyCode::Char('/') => app.enter_search(),
        KeyCode::Char('m') => app.toggle_mark_selected(),
        KeyCode::Char('X') => app.request_remove_marked(),
        KeyCode::Char('C') => app.request_clear_all(),
        KeyCode::Char('y') => app.copy_json_to_clipboard()?,
        KeyCode::Char('e') => app.enter_export(),
        KeyCode::Char('o') => app.enter_open_list(),
        KeyCode::Char('i') => app.enter_import_file(),
        KeyCode::Char('S') => app.enter_save_as(),
        KeyCode::Char('b') => app.open_bingosync(),
        KeyCode::Char('f') => app.open_lists_folder(),
        KeyCode::Esc => {
            if app.marked.is_empty() {
                app.clear_filter();
            } else {
                app.clear_marks();
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_input_mode(
    app: &mut App,
    key: KeyEvent,
    buffer: &mut String,
    purpose: InputPurpose,
    prompt: String,
) {
    let mut keep_editing = true;
    match key.code {
        KeyCode::Esc => {
            keep_editing = false;
            app.cancel_input(&purpose);
        }
        KeyCode::Enter => {
            keep_editing = false;
            let value = buffer.trim().to_string();
            let action = submit_label(&purpose);
            if let Err(err) = app.handle_submit(purpose.clone(), value) {
                app.report_error(action, &err);
            }
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL)
                || key.modifiers.contains(KeyModifiers::ALT)
            {
                return restore_input(app, prompt, buffer, purpose);
            }
            buffer.push(c);
        }
        KeyCode::Backspace => {
            buffer.pop();
        }
        _ => {}
    }

    if keep_editing {
        if purpose == InputPurpose::Search {
            app.preview_filter(buffer);
        }
        restore_input(app, prompt, buffer, purpose);
    }
}

fn restore_input(app: &mut App, prompt: String, buffer: &str, purpose: InputPurpose) {
    app.input_mode = InputMode::Editing {
        prompt,
        buffer: buffer.to_string(),
        purpose,
    };
}

fn submit_label(purpose: &InputPurpose) -> &'static str {
    match purpose {
        InputPurpose::AddEntry => "Add",
        InputPurpose::RenameEntry { .. } => "Rename",
        InputPurpose::Search => "Search",
        InputPurpose::OpenList => "Open",
        InputPurpose::SaveList => "Save",
        InputPurpose::ImportFile => "Import",
        InputPurpose::ExportFile => "Export",
    }
}

fn handle_paste(app: &mut App, text: String) {
    if app.dialog.is_some() {
        return;
    }
    if matches!(app.input_mode, InputMode::Normal) {
        app.import_text(&text);
        return;
    }
    let mut search_value = None;
    if let InputMode::Editing {
        buffer, purpose, ..
    } = &mut app.input_mode
    {
        let single_line = text.lines().map(str::trim).collect::<Vec<_>>().join(" ");
        buffer.push_str(&single_line);
        if *purpose == InputPurpose::Search {
            search_value = Some(buffer.clone());
        }
    }
    if let Some(value) = search_value {
        app.preview_filter(&value);
    }
}

fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.size();
    let theme = Theme::new();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(LOG_PANEL_HEIGHT),
        ])
        .split(area);

    draw_header(frame, app, &theme, chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(PREVIEW_PANEL_WIDTH)])
        .split(chunks[1]);

    draw_entries(frame, app, &theme, body_chunks[0]);
    draw_preview(frame, app, &theme, body_chunks[1]);

    let status = Paragraph::new(status_bar_line(app, chunks[2].width)).style(
        Style::default()
            .fg(theme.text)
            .bg(theme.header_bg),
    );
    frame.render_widget(status, chunks[2]);

    let log_height = chunks[3].height.saturating_sub(2) as usize;
    let log = Paragraph::new(build_log_lines(app, &theme, log_height))
        .block(theme.panel_dense("Log"))
        .style(Style::default().bg(theme.log_bg));
    frame.render_widget(log, chunks[3]);

    draw_toast(frame, app, &theme, chunks[1]);
    draw_dialog(frame, app, &theme);
}

fn draw_header(frame: &mut Frame<'_>, app: &App, theme: &Theme, area: Rect) {
    let visible = app.visible_indices().len();
    let total = app.collection.len();
    let file_style = if app.dirty {
        Style::default().fg(theme.warning)
    } else {
        Style::default().fg(theme.accent)
    };
    let mut details = vec![
        Span::styled("List: ", Style::default().fg(theme.muted)),
        Span::styled(app.file_label(), file_style),
        Span::raw("   "),
        Span::styled("Entries: ", Style::default().fg(theme.muted)),
        Span::styled(total.to_string(), Style::default().fg(theme.text)),
        Span::raw("   "),
        Span::styled("Enabled: ", Style::default().fg(theme.muted)),
        Span::styled(
            app.collection.enabled_count().to_string(),
            Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("Sort: ", Style::default().fg(theme.muted)),
        Span::styled(app.sort_label(), Style::default().fg(theme.text)),
    ];
    if let Some(entry) = app
        .selected_name()
        .and_then(|name| app.collection.get(&name))
    {
        details.push(Span::raw("   "));
        details.push(Span::styled("Selected: ", Style::default().fg(theme.muted)));
        details.push(Span::styled(
            format!("{} ({})", entry.name, if entry.enabled { "on" } else { "off" }),
            Style::default().fg(theme.text),
        ));
    }
    if !app.filter.is_empty() {
        details.push(Span::raw("   "));
        details.push(Span::styled("Search: ", Style::default().fg(theme.muted)));
        details.push(Span::styled(
            format!("{} ({visible}/{total})", app.filter),
            Style::default().fg(theme.warning),
        ));
    }
    if !app.marked.is_empty() {
        details.push(Span::raw("   "));
        details.push(Span::styled(
            format!("Marked: {}", app.marked.len()),
            Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                "Bingo List",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            if app.config.auto_sort_on_insert {
                Span::styled("  auto-sort", Style::default().fg(theme.muted))
            } else {
                Span::raw("")
            },
        ]),
        Line::from(""),
        Line::from(details),
    ])
    .style(Style::default().bg(theme.header_bg))
    .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn draw_entries(frame: &mut Frame<'_>, app: &App, theme: &Theme, area: Rect) {
    let rows = build_rows(app, theme);
    if rows.is_empty() {
        let message = if app.collection.is_empty() {
            "Press a to add an entry, i to import, or paste names."
        } else {
            "No entries match the search."
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(theme.muted))
            .block(theme.panel_dense("Entries"))
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec![
            Cell::from(""),
            Cell::from("On"),
            Cell::from("#"),
            Cell::from("Entry"),
        ])
        .style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
    )
    .column_spacing(1)
    .block(theme.panel_dense("Entries"))
    .highlight_style(
        Style::default()
            .bg(theme.accent_soft)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol(">");

    let mut state = TableState::default();
    state.select(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn build_rows(app: &App, theme: &Theme) -> Vec<Row<'static>> {
    app.visible_entries()
        .into_iter()
        .map(|(index, entry)| {
            row_for_entry(
                index,
                entry.enabled,
                app.marked.contains(&entry.name),
                &entry.name,
                theme,
            )
        })
        .collect()
}

fn row_for_entry(index: usize, enabled: bool, marked: bool, name: &str, theme: &Theme) -> Row<'static> {
    let (enabled_text, enabled_style) = if enabled {
        ("[x]", Style::default().fg(theme.success))
    } else {
        ("[ ]", Style::default().fg(theme.muted))
    };
    let name_style = if enabled {
        Style::default().fg(theme.text)
    } else {
        Style::default().fg(theme.muted)
    };
    Row::new(vec![
        Cell::from(if marked { "*" } else { " " }).style(Style::default().fg(theme.warning)),
        Cell::from(enabled_text).style(enabled_style),
        Cell::from((index + 1).to_string()),
        Cell::from(name.to_string()).style(name_style),
    ])
}

fn draw_preview(frame: &mut Frame<'_>, app: &App, theme: &Theme, area: Rect) {
    let json = app.json_preview();
    let scroll = preview_scroll(json.lines().count(), area.height.saturating_sub(2), app.json_scroll);
    let preview = Paragraph::new(json)
        .style(Style::default().fg(theme.text))
        .block(theme.panel_dense("Export JSON"))
        .scroll((scroll, 0));
    frame.render_widget(preview, area);
}

fn preview_scroll(line_count: usize, view: u16, requested: u16) -> u16 {
    let line_count = u16::try_from(line_count).unwrap_or(u16::MAX);
    requested.min(line_count.saturating_sub(view))
}

fn status_bar_line(app: &App, width: u16) -> String {
    let width = width as usize;
    let (left, right) = match &app.input_mode {
        InputMode::Normal => (format!("Status: {}", app.status), app.hint().to_string()),
        InputMode::Editing { prompt, buffer, .. } => (
            format!("{prompt}: {buffer}_"),
            "Enter confirm | Esc cancel".to_string(),
        ),
    };

    if width == 0 {
        return String::new();
    }

    let left_len = left.chars().count();
    let right_len = right.chars().count();
    if left_len + right_len + 1 > width {
        let available = width.saturating_sub(left_len + 1);
        let trimmed_right: String = right.chars().take(available).collect();
        return format!("{left} {trimmed_right}");
    }

    let spaces = width - left_len - right_len;
    format!("{left}{}{}", " ".repeat(spaces), right)
}

fn build_log_lines(app: &App, theme: &Theme, height: usize) -> Vec<Line<'static>> {
    if height == 0 {
        return Vec::new();
    }

    if app.logs.is_empty() {
        return vec![Line::from(Span::styled(
            "No recent events.",
            Style::default().fg(theme.muted),
        ))];
    }

    let start = app.logs.len().saturating_sub(height);
    app.logs[start..]
        .iter()
        .map(|entry| {
            let (label, color) = match entry.level {
                LogLevel::Info => ("[i]", theme.accent),
                LogLevel::Warn => ("[!]", theme.warning),
                LogLevel::Error => ("[x]", theme.error),
            };
            Line::from(vec![
                Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::styled(entry.message.clone(), Style::default().fg(theme.text)),
            ])
        })
        .collect()
}

fn draw_dialog(frame: &mut Frame<'_>, app: &App, theme: &Theme) {
    let Some(dialog) = &app.dialog else {
        return;
    };

    let area = frame.size();
    let message_lines: Vec<Line> = dialog
        .message
        .lines()
        .map(|line| Line::from(line.to_string()))
        .collect();
    let content_height = message_lines.len().max(1) as u16;
    let height = (content_height + 6).max(7).min(area.height.saturating_sub(2));
    let width = area.width.saturating_mul(2) / 3;
    let width = width.clamp(34, area.width.saturating_sub(2).max(34));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let dialog_area = Rect::new(x, y, width, height).intersection(area);

    let yes_selected = matches!(dialog.choice, DialogChoice::Yes);
    let yes_style = if yes_selected {
        Style::default()
            .fg(Color::Black)
            .bg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    let no_style = if !yes_selected {
        Style::default()
            .fg(Color::Black)
            .bg(theme.warning)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };

    let buttons = Line::from(vec![
        Span::raw(" "),
        Span::styled(format!(" {} ", dialog.yes_label), yes_style),
        Span::raw("   "),
        Span::styled(format!(" {} ", dialog.no_label), no_style),
    ]);

    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        dialog.title.clone(),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.extend(message_lines);
    lines.push(Line::from(""));
    lines.push(buttons);

    frame.render_widget(Clear, dialog_area);
    let dialog_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent_soft))
        .style(Style::default().bg(theme.header_bg));
    let dialog_widget = Paragraph::new(lines)
        .block(dialog_block)
        .style(Style::default().fg(theme.text))
        .alignment(Alignment::Center);
    frame.render_widget(dialog_widget, dialog_area);
}

fn render_toast(
    frame: &mut Frame<'_>,
    theme: &Theme,
    body_area: Rect,
    message: &str,
    level: ToastLevel,
) {
    let max_width = body_area.width.saturating_sub(4).max(24);
    let max_text = max_width.saturating_sub(4) as usize;
    let mut message: String = message.to_string();
    if message.chars().count() > max_text {
        message = message.chars().take(max_text.saturating_sub(3)).collect();
        message.push_str("...");
    }
    let width = (message.chars().count() as u16 + 4).clamp(24, max_width);
    let x = body_area.x + (body_area.width.saturating_sub(width)) / 2;
    let y = body_area.y + 1;
    let toast_area = Rect::new(x, y, width, 3).intersection(frame.size());

    let border = match level {
        ToastLevel::Info => theme.accent,
        ToastLevel::Warn => theme.warning,
        ToastLevel::Error => theme.error,
    };

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.header_bg));
    let content = Paragraph::new(message)
        .block(block)
        .style(Style::default().fg(theme.text))
        .alignment(Alignment::Center);
    frame.render_widget(content, toast_area);
}

fn draw_toast(frame: &mut Frame<'_>, app: &App, theme: &Theme, body_area: Rect) {
    if app.dialog.is_some() {
        return;
    }
    let Some(toast) = app.toast.as_ref() else {
        return;
    };
    if toast.expires_at <= Instant::now() {
        return;
    }

    render_toast(frame, theme, body_area, &toast.message, toast.level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c)));
        }
    }

    fn test_app() -> (App, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let mut config = AppConfig::load_or_create_in(&dir.path().join("data")).unwrap();
        config.confirm_on_remove = true;
        let app = App::new(config, dir.path().join("lists"));
        (app, dir)
    }

    #[test]
    fn add_prompt_submits_on_enter() {
        let (mut app, _dir) = test_app();
        handle_key(&mut app, key(KeyCode::Char('a')));
        type_text(&mut app, "Gold Star");
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(matches!(app.input_mode, InputMode::Normal));
        assert_eq!(app.collection.names(), vec!["Gold Star"]);
    }

    #[test]
    fn rename_error_is_reported_and_entry_kept() {
        let (mut app, _dir) = test_app();
        app.add_entry("one").unwrap();
        app.add_entry("two").unwrap();
        app.select_name("two");
        handle_key(&mut app, key(KeyCode::F(2)));
        for _ in 0.."two".len() {
            handle_key(&mut app, key(KeyCode::Backspace));
        }
        type_text(&mut app, "one");
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.status.starts_with("Rename failed"));
        assert_eq!(app.collection.names(), vec!["one", "two"]);
    }

    #[test]
    fn search_prompt_filters_while_typing() {
        let (mut app, _dir) = test_app();
        for name in ["Red Coin", "Blue Coin", "Star"] {
            app.add_entry(name).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Char('/')));
        type_text(&mut app, "coin");
        assert_eq!(app.visible_indices().len(), 2);
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.visible_indices().len(), 3);
    }

    #[test]
    fn delete_opens_dialog_and_escape_cancels() {
        let (mut app, _dir) = test_app();
        app.add_entry("Keep").unwrap();
        handle_key(&mut app, key(KeyCode::Delete));
        assert!(app.dialog.is_some());
        handle_key(&mut app, key(KeyCode::Esc));
        assert!(app.dialog.is_none());
        assert_eq!(app.collection.len(), 1);
    }

    #[test]
    fn paste_outside_prompt_imports_lines() {
        let (mut app, _dir) = test_app();
        handle_paste(&mut app, "Alpha\nBeta\n\nAlpha\n".to_string());
        assert_eq!(app.collection.len(), 2);
        assert!(app.dirty);
    }

    #[test]
    fn preview_scroll_stops_at_last_page() {
        assert_eq!(preview_scroll(30, 10, 100), 20);
        assert_eq!(preview_scroll(5, 10, 3), 0);
        assert_eq!(preview_scroll(70_000, 10, u16::MAX), u16::MAX - 10);
    }

    #[test]
    fn status_bar_pads_hint_to_width() {
        let (app, _dir) = test_app();
        let line = status_bar_line(&app, 120);
        assert_eq!(line.chars().count(), 120);
        assert!(line.starts_with("Status: Ready"));
        assert!(line.ends_with(app.hint()));
    }
}
