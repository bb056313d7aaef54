use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use std::{io, path::Path, time::{Duration, Instant}};
use textwrap::wrap;
use tui_input::{backend::crossterm::EventHandler, Input, InputRequest};

use parley::delivery::Outgoing;
use parley::media::ImageRef;
use parley::models::{Message, Partner, Presence, Side};
use parley::thread::Appended;
use parley::view::{MainPane, ViewportClass};
use parley::ConversationView;

// Export types needed by main module
pub use ratatui::Terminal;
pub use ratatui::backend::CrosstermBackend;

const GALLERY_COLUMNS: u16 = 3;
const THUMBNAIL_HEIGHT: u16 = 4;
const SCROLL_STEP: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Landing,
    Chat,
}

/// What the main loop has to do after a key press.
#[derive(Debug)]
pub enum UiCommand {
    Quit,
    Send(Outgoing),
    /// The chat route was entered and needs a freshly seeded view.
    EnterChat,
    /// The chat route was left; its view and pending replies go away.
    LeaveChat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Focus {
    Search,
    Main,
}

struct AttachDialog {
    input: Input,
}

pub struct ChatUI {
    route: Route,
    focus: Focus,
    search: Input,
    composer: Input,
    directory_cursor: usize,
    gallery_cursor: usize,
    scroll_back: usize, // Lines scrolled up from the newest message
    attach_dialog: Option<AttachDialog>,
    help_dialog: bool,
    breakpoint: u16,
    viewport: ViewportClass,
}

impl ChatUI {
    pub fn new(route: Route, breakpoint: u16, width: u16) -> Self {
        ChatUI {
            route,
            focus: Focus::Search,
            search: Input::default(),
            composer: Input::default(),
            directory_cursor: 0,
            gallery_cursor: 0,
            scroll_back: 0,
            attach_dialog: None,
            help_dialog: false,
            breakpoint,
            viewport: ViewportClass::from_width(width, breakpoint),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn viewport(&self) -> ViewportClass {
        self.viewport
    }

    pub fn resize(&mut self, width: u16) {
        let viewport = ViewportClass::from_width(width, self.breakpoint);
        if viewport != self.viewport {
            info!("UI: Viewport is now {:?} ({} columns)", viewport, width);
            self.viewport = viewport;
        }
    }

    /// Scroll back to the newest message when the active thread grows.
    pub fn message_appended(&mut self, view: &ConversationView, appended: &Appended) {
        if view.active_partner().map(|p| p.id.as_str()) == Some(appended.partner_id.as_str()) {
            self.scroll_back = 0;
        }
    }

    pub fn handle_input(&mut self, view: Option<&mut ConversationView>) -> Result<Option<UiCommand>> {
        if !event::poll(Duration::from_millis(50))? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Ok(self.handle_key(key, view, Instant::now()))
            }
            Event::Resize(width, _) => {
                self.resize(width);
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn current_focus(&self, view: &ConversationView) -> Focus {
        let effective = view.effective_view(self.viewport);
        if !effective.directory {
            Focus::Main
        } else if effective.main.is_none() {
            Focus::Search
        } else {
            self.focus
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, view: Option<&mut ConversationView>, now: Instant) -> Option<UiCommand> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(UiCommand::Quit);
        }

        // Any key closes the help dialog
        if self.help_dialog {
            self.help_dialog = false;
            return None;
        }

        match view {
            Some(view) if self.route == Route::Chat => self.handle_chat_key(key, view, now),
            _ => self.handle_landing_key(key),
        }
    }

    fn handle_landing_key(&mut self, key: KeyEvent) -> Option<UiCommand> {
        match key.code {
            KeyCode::Enter => {
                info!("UI: Entering chat route");
                self.enter_chat();
                Some(UiCommand::EnterChat)
            }
            KeyCode::Esc | KeyCode::Char('q') => Some(UiCommand::Quit),
            _ => None,
        }
    }

    /// Reset everything the chat route owns, as on a fresh mount.
    fn enter_chat(&mut self) {
        self.route = Route::Chat;
        self.focus = Focus::Search;
        self.search = Input::default();
        self.composer = Input::default();
        self.directory_cursor = 0;
        self.gallery_cursor = 0;
        self.scroll_back = 0;
        self.attach_dialog = None;
    }

    fn handle_chat_key(&mut self, key: KeyEvent, view: &mut ConversationView, now: Instant) -> Option<UiCommand> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if let Some(dialog) = &mut self.attach_dialog {
            match key.code {
                KeyCode::Esc => self.attach_dialog = None,
                KeyCode::Enter => {
                    let path = dialog.input.value().trim().to_string();
                    self.attach_dialog = None;
                    // A rejected file is logged by the view and otherwise ignored
                    if !path.is_empty() && view.attach(Path::new(&path)).is_err() {
                        debug!("UI: Draft left unchanged after rejected attachment");
                    }
                }
                _ => {
                    dialog.input.handle_event(&Event::Key(key));
                }
            }
            return None;
        }

        // The image viewer covers everything
        if view.effective_view(self.viewport).overlay.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace) {
                view.close_image();
            }
            return None;
        }

        match key.code {
            KeyCode::Esc => {
                if !view.back(self.viewport) {
                    info!("UI: Nothing to go back to, returning to landing page");
                    self.route = Route::Landing;
                    return Some(UiCommand::LeaveChat);
                }
                return None;
            }
            KeyCode::Char('h') if ctrl => {
                self.help_dialog = true;
                return None;
            }
            KeyCode::Char('g') if ctrl => {
                if view.show_media() {
                    self.gallery_cursor = 0;
                    self.focus = Focus::Main;
                }
                return None;
            }
            KeyCode::Tab => {
                let effective = view.effective_view(self.viewport);
                if effective.directory && effective.main.is_some() {
                    self.focus = match self.focus {
                        Focus::Search => Focus::Main,
                        Focus::Main => Focus::Search,
                    };
                }
                return None;
            }
            _ => {}
        }

        match self.current_focus(view) {
            Focus::Search => self.handle_directory_key(key, view),
            Focus::Main => match view.effective_view(self.viewport).main {
                Some(MainPane::MediaGallery) => self.handle_gallery_key(key, view),
                _ => return self.handle_composer_key(key, view, now),
            },
        }
        None
    }

    fn handle_directory_key(&mut self, key: KeyEvent, view: &mut ConversationView) {
        let visible = view.directory().filtered().len();
        match key.code {
            KeyCode::Up => {
                self.directory_cursor = self.directory_cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.directory_cursor + 1 < visible {
                    self.directory_cursor += 1;
                }
            }
            KeyCode::Enter => {
                let selected = view
                    .directory()
                    .filtered()
                    .get(self.directory_cursor)
                    .map(|p| p.id.clone());
                if let Some(partner_id) = selected {
                    if view.select(&partner_id) {
                        self.focus = Focus::Main;
                        self.scroll_back = 0;
                    }
                }
            }
            _ => {
                self.search.handle_event(&Event::Key(key));
                view.set_search(self.search.value());
                self.directory_cursor = 0;
            }
        }
    }

    fn handle_gallery_key(&mut self, key: KeyEvent, view: &mut ConversationView) {
        let images = view.gallery().len();
        match key.code {
            KeyCode::Left | KeyCode::Up => {
                self.gallery_cursor = self.gallery_cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Down => {
                if self.gallery_cursor + 1 < images {
                    self.gallery_cursor += 1;
                }
            }
            KeyCode::Enter => {
                let image = view.gallery().get(self.gallery_cursor).map(|image| (*image).clone());
                if let Some(image) = image {
                    view.open_image(image);
                }
            }
            _ => {}
        }
    }

    fn handle_composer_key(&mut self, key: KeyEvent, view: &mut ConversationView, now: Instant) -> Option<UiCommand> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let newline = key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);
        match key.code {
            KeyCode::Enter if newline && view.composer().is_long_form() => {
                self.composer.handle(InputRequest::InsertChar('\n'));
                view.set_draft_text(self.composer.value(), now);
            }
            KeyCode::Enter => {
                if let Some(outgoing) = view.submit() {
                    self.composer = Input::default();
                    self.scroll_back = 0;
                    return Some(UiCommand::Send(outgoing));
                }
            }
            KeyCode::Char('a') if ctrl => {
                self.attach_dialog = Some(AttachDialog { input: Input::default() });
            }
            KeyCode::Char('x') if ctrl => {
                if view.remove_image() {
                    debug!("UI: Removed attached image");
                }
            }
            KeyCode::PageUp => {
                self.scroll_back += SCROLL_STEP;
            }
            KeyCode::PageDown => {
                self.scroll_back = self.scroll_back.saturating_sub(SCROLL_STEP);
            }
            _ => {
                self.composer.handle_event(&Event::Key(key));
                view.set_draft_text(self.composer.value(), now);
            }
        }
        None
    }

    pub fn draw(&self, frame: &mut Frame, view: Option<&ConversationView>) {
        let size = frame.size();

        let view = match view {
            Some(view) if self.route == Route::Chat => view,
            _ => {
                draw_landing(frame, size);
                return;
            }
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // App header
                Constraint::Min(5),    // Panes
                Constraint::Length(1), // Help line
            ])
            .split(size);

        let header = Paragraph::new(Line::from(Span::styled(
            " Chat App",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )))
        .style(Style::default().bg(Color::Black));
        frame.render_widget(header, rows[0]);

        let effective = view.effective_view(self.viewport);
        let focus = self.current_focus(view);

        let (directory_area, main_area) = match (effective.directory, effective.main) {
            (true, Some(_)) => {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
                    .split(rows[1]);
                (Some(columns[0]), Some(columns[1]))
            }
            (true, None) => (Some(rows[1]), None),
            (false, _) => (None, Some(rows[1])),
        };

        if let Some(area) = directory_area {
            self.draw_directory(frame, area, view, focus == Focus::Search);
        }

        if let Some(area) = main_area {
            match effective.main {
                Some(MainPane::MediaGallery) => {
                    draw_gallery(frame, area, view, self.gallery_cursor, focus == Focus::Main)
                }
                _ => self.draw_conversation(frame, area, view, focus == Focus::Main),
            }
        }

        self.draw_help_line(frame, rows[2]);

        if let Some(image) = &effective.overlay {
            draw_viewer(frame, image, size);
        }

        if let Some(dialog) = &self.attach_dialog {
            draw_attach_dialog(frame, dialog, size);
        }

        if self.help_dialog {
            draw_help_dialog(frame, size);
        }
    }

    fn draw_directory(&self, frame: &mut Frame, area: Rect, view: &ConversationView, focused: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search box
                Constraint::Min(1),    // Partners
            ])
            .split(area);

        let search_block = Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(focus_style(focused));
        let search_text = if self.search.value().is_empty() {
            Span::styled("Search chats...", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(self.search.value())
        };
        frame.render_widget(Paragraph::new(Line::from(search_text)).block(search_block), chunks[0]);

        if focused {
            frame.set_cursor(chunks[0].x + self.search.cursor() as u16 + 1, chunks[0].y + 1);
        }

        let list_block = Block::default().title("Chats").borders(Borders::ALL);
        let partners = view.directory().filtered();

        if partners.is_empty() {
            let empty = Paragraph::new("No users found")
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center)
                .block(list_block);
            frame.render_widget(empty, chunks[1]);
            return;
        }

        let active_id = view.active_partner().map(|p| p.id.as_str());
        let clock = chrono::Local::now().format("%H:%M").to_string();
        let items: Vec<ListItem> = partners
            .iter()
            .map(|p| partner_item(p, Some(p.id.as_str()) == active_id, &clock))
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.directory_cursor.min(items.len() - 1)));

        let highlight = if focused {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let list = List::new(items).block(list_block).highlight_style(highlight);
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    fn draw_conversation(&self, frame: &mut Frame, area: Rect, view: &ConversationView, focused: bool) {
        let composer = view.composer();
        let preview_height = if composer.image().is_some() { 1 } else { 0 };
        let input_height = if composer.is_long_form() { 6 } else { 3 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),              // Partner header
                Constraint::Min(3),                 // Messages
                Constraint::Length(preview_height), // Attached image
                Constraint::Length(input_height),   // Input box
            ])
            .split(area);

        let header = match view.active_partner() {
            Some(partner) => Text::from(vec![
                Line::from(vec![
                    Span::styled(format!(" {} ", partner.initial()), avatar_style(partner)),
                    Span::raw(" "),
                    Span::styled(partner.display_name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled("   Ctrl+G media", Style::default().fg(Color::DarkGray)),
                ]),
                Line::from(Span::styled(
                    format!("    {}", partner.presence_label()),
                    Style::default().fg(Color::Gray),
                )),
            ]),
            None => Text::from("Select a user to start chatting"),
        };
        frame.render_widget(Paragraph::new(header), chunks[0]);

        self.draw_messages(frame, chunks[1], view);

        if let Some(image) = composer.image() {
            let preview = Line::from(vec![
                Span::styled(
                    format!("[img] {} ({})", image.file_name(), image.size_label()),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled("  Ctrl+X remove", Style::default().fg(Color::DarkGray)),
            ]);
            frame.render_widget(Paragraph::new(preview), chunks[2]);
        }

        let input_block = Block::default()
            .title("Message")
            .borders(Borders::ALL)
            .border_style(focus_style(focused));
        let input_text = if composer.text().is_empty() {
            Text::styled(composer.placeholder(), Style::default().fg(Color::DarkGray))
        } else {
            Text::from(self.composer.value())
        };
        let mut input_widget = Paragraph::new(input_text).block(input_block);
        if composer.is_long_form() {
            input_widget = input_widget.wrap(Wrap { trim: false });
        }
        frame.render_widget(input_widget, chunks[3]);

        if focused {
            let inner_width = chunks[3].width.saturating_sub(2).max(1) as usize;
            let cursor = self.composer.cursor();
            let (row, col) = if composer.is_long_form() {
                cursor_cell(self.composer.value(), cursor, inner_width)
            } else {
                (0, cursor)
            };
            frame.set_cursor(chunks[3].x + col as u16 + 1, chunks[3].y + row as u16 + 1);
        }
    }

    fn draw_messages(&self, frame: &mut Frame, area: Rect, view: &ConversationView) {
        let block = Block::default().title("Messages").borders(Borders::ALL);

        let partner = match view.active_partner() {
            Some(partner) => partner,
            None => {
                let empty = Paragraph::new("No user selected")
                    .style(Style::default().fg(Color::Gray))
                    .alignment(Alignment::Center)
                    .block(block);
                frame.render_widget(empty, area);
                return;
            }
        };

        let wrap_width = area.width.saturating_sub(2).max(1) as usize;
        let mut items: Vec<ListItem> = view
            .visible_messages()
            .into_iter()
            .flat_map(|m| message_lines(m, partner, wrap_width))
            .collect();

        if view.is_typing() {
            items.push(ListItem::new(Text::styled(
                "...",
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            )));
        }

        // Selecting the last row keeps the newest message in view
        let mut list_state = ListState::default();
        if !items.is_empty() {
            let last = items.len() - 1;
            list_state.select(Some(last - self.scroll_back.min(last)));
        }

        let list = List::new(items).block(block).highlight_style(Style::default());
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_help_line(&self, frame: &mut Frame, area: Rect) {
        let viewport = match self.viewport {
            ViewportClass::Wide => "wide",
            ViewportClass::Compact => "compact",
        };
        let spans = vec![
            Span::styled(
                "Esc back | Tab focus | Enter select/send | Ctrl+A attach | Ctrl+G media | Ctrl+H help | Ctrl+C quit [",
                Style::default().fg(Color::Gray),
            ),
            Span::styled(viewport, Style::default().fg(Color::Cyan)),
            Span::styled("]", Style::default().fg(Color::Gray)),
        ];
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn avatar_style(partner: &Partner) -> Style {
    let bg = match partner.avatar_tag.as_str() {
        "gray-500" => Color::Gray,
        "gray-600" => Color::DarkGray,
        "gray-700" => Color::Indexed(240),
        "gray-800" => Color::Indexed(236),
        _ => Color::DarkGray,
    };
    Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD)
}

fn partner_item<'a>(partner: &'a Partner, active: bool, clock: &str) -> ListItem<'a> {
    let presence_color = match partner.presence {
        Presence::Online => Color::Green,
        Presence::Offline => Color::Gray,
    };
    let name_style = if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let mut first = vec![
        Span::styled(format!(" {} ", partner.initial()), avatar_style(partner)),
        Span::styled(" ● ", Style::default().fg(presence_color)),
        Span::styled(partner.display_name.as_str(), name_style),
        Span::styled(format!("  {}", clock), Style::default().fg(Color::DarkGray)),
    ];
    if partner.unread_count > 0 {
        first.push(Span::raw(" "));
        first.push(Span::styled(
            format!(" {} ", partner.unread_count),
            Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD),
        ));
    }

    let second = Line::from(Span::styled(
        format!("      {}", partner.preview()),
        Style::default().fg(Color::Gray),
    ));

    ListItem::new(Text::from(vec![Line::from(first), second]))
}

/// Row and column of the cursor in text wrapped at `width` characters.
fn cursor_cell(text: &str, cursor: usize, width: usize) -> (usize, usize) {
    let (mut row, mut col) = (0, 0);
    for c in text.chars().take(cursor) {
        if c == '\n' {
            row += 1;
            col = 0;
        } else {
            col += 1;
            if col == width {
                row += 1;
                col = 0;
            }
        }
    }
    (row, col)
}

fn format_time(timestamp: u64) -> String {
    chrono::DateTime::from_timestamp(timestamp as i64, 0)
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M").to_string())
        .unwrap_or_default()
}

fn message_lines(message: &Message, partner: &Partner, wrap_width: usize) -> Vec<ListItem<'static>> {
    let (author, style) = match message.side {
        Side::Own => ("You".to_string(), Style::default().fg(Color::Cyan)),
        Side::Other => (partner.display_name.clone(), Style::default()),
    };

    let mut lines = Vec::new();
    let prefix = format!("[{}] {}: ", format_time(message.timestamp), author);

    if let Some(image) = &message.image {
        lines.push(
            ListItem::new(format!("{}[img] {} ({})", prefix, image.file_name(), image.size_label()))
                .style(Style::default().fg(Color::Yellow)),
        );
    }

    if !message.body.is_empty() {
        let full = if message.image.is_some() {
            format!("{}{}", " ".repeat(prefix.chars().count()), message.body)
        } else {
            format!("{}{}", prefix, message.body)
        };
        for line in wrap(&full, wrap_width) {
            lines.push(ListItem::new(line.into_owned()).style(style));
        }
    }

    lines
}

/// Centered popup rectangle that never exceeds the frame.
fn popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_landing(f: &mut Frame, area: Rect) {
    let popup_area = popup_rect(60, 9, area);
    let content = Text::from(vec![
        Line::from(Span::styled(
            "Welcome to the Chat App",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Connect and chat with others in real-time."),
        Line::from(""),
        Line::from(Span::styled(
            " Enter: Go to Chat ",
            Style::default().fg(Color::Black).bg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled("Esc to quit", Style::default().fg(Color::DarkGray))),
    ]);

    let landing = Paragraph::new(content).alignment(Alignment::Center);
    f.render_widget(landing, popup_area);
}

fn draw_gallery(f: &mut Frame, area: Rect, view: &ConversationView, cursor: usize, focused: bool) {
    let images = view.gallery();
    let block = Block::default()
        .title(format!("Media ({})  Esc back", images.len()))
        .borders(Borders::ALL)
        .border_style(focus_style(focused));

    if images.is_empty() {
        let empty = Paragraph::new("No images shared")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    // Scroll by whole rows so the cursor's row is always on screen
    let columns = GALLERY_COLUMNS as usize;
    let visible_rows = ((inner.height / THUMBNAIL_HEIGHT) as usize).max(1);
    let first_row = (cursor / columns).saturating_sub(visible_rows - 1);

    let column_width = inner.width / GALLERY_COLUMNS;
    let shown = images
        .iter()
        .enumerate()
        .skip(first_row * columns)
        .take(visible_rows * columns);
    for (index, image) in shown {
        let row = (index / columns - first_row) as u16;
        let column = (index % columns) as u16;
        let y = inner.y + row * THUMBNAIL_HEIGHT;
        if y + THUMBNAIL_HEIGHT > inner.y + inner.height {
            break;
        }

        let cell = Rect::new(inner.x + column * column_width, y, column_width, THUMBNAIL_HEIGHT);
        let border = if index == cursor {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let thumbnail = Paragraph::new(Text::from(vec![
            Line::from("[img]"),
            Line::from(image.file_name().to_string()),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border));
        f.render_widget(thumbnail, cell);
    }
}

fn draw_viewer(f: &mut Frame, image: &ImageRef, area: Rect) {
    let block = Block::default()
        .title(image.file_name().to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let location = image
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(in memory)".to_string());
    let content = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            image.file_name().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Type: {}", image.mime_type())),
        Line::from(format!("Size: {}", image.size_label())),
        Line::from(format!("Location: {}", location)),
        Line::from(""),
        Line::from(Span::styled("Press Esc to close", Style::default().fg(Color::DarkGray))),
    ]);

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(content)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn draw_attach_dialog(f: &mut Frame, dialog: &AttachDialog, area: Rect) {
    let popup_area = popup_rect(60, 7, area);

    let popup_block = Block::default()
        .title("Attach Image")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    f.render_widget(Clear, popup_area);
    f.render_widget(popup_block, popup_area);

    let inner_area = popup_area.inner(&Margin {
        vertical: 1,
        horizontal: 2,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Instructions
            Constraint::Length(3), // Input field
        ])
        .split(inner_area);

    f.render_widget(Paragraph::new("Path of the image file to attach:"), chunks[0]);

    let input_widget = Paragraph::new(dialog.input.value())
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Blue)));
    f.render_widget(input_widget, chunks[1]);

    f.set_cursor(chunks[1].x + dialog.input.cursor() as u16 + 1, chunks[1].y + 1);
}

fn draw_help_dialog(f: &mut Frame, area: Rect) {
    let popup_area = popup_rect(70, 25, area);

    let popup_block = Block::default()
        .title("Keyboard Shortcuts")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, popup_area);
    f.render_widget(popup_block, popup_area);

    let inner_area = popup_area.inner(&Margin {
        vertical: 1,
        horizontal: 2,
    });

    let shortcuts = [
        ("General", ""),
        ("Esc", "Go back (landing page when there is nothing to go back to)"),
        ("Tab", "Switch between the chat list and the conversation"),
        ("Ctrl+C", "Quit"),
        ("", ""),
        ("Chats", ""),
        ("Type", "Filter chats by name"),
        ("Up/Down", "Move through chats"),
        ("Enter", "Open the highlighted chat"),
        ("", ""),
        ("Conversation", ""),
        ("Enter", "Send message"),
        ("Alt+Enter", "New line in a long message"),
        ("Ctrl+A", "Attach an image"),
        ("Ctrl+X", "Remove the attached image"),
        ("Ctrl+G", "Show shared media"),
        ("PgUp/PgDn", "Scroll messages"),
        ("", ""),
        ("Media", ""),
        ("Arrows", "Move through images"),
        ("Enter", "View image full screen"),
        ("", ""),
        ("Press any key to close this dialog", ""),
    ];

    let items: Vec<ListItem> = shortcuts
        .iter()
        .map(|(key, desc)| {
            if desc.is_empty() {
                if key.is_empty() {
                    ListItem::new("")
                } else {
                    ListItem::new(Text::styled(
                        key.to_string(),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ))
                }
            } else {
                let line = Line::from(vec![
                    Span::styled(format!("{:<11}", key), Style::default().fg(Color::Green)),
                    Span::raw(desc.to_string()),
                ]);
                ListItem::new(line)
            }
        })
        .collect();

    f.render_widget(List::new(items), inner_area);
}

pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
