// SPDX-FileCopyrightText: 2026 The toposcope authors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interactive terminal host.
//!
//! The engine draws into a [`CharSurface`]; this module owns the real
//! terminal around it: raw mode, the alternate screen, mouse capture, the
//! event loop, and the chrome (status line, context-menu popup, detail
//! overlay). Terminal state is restored on every exit path through the
//! session guard's `Drop`.

use std::error::Error;
use std::io;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::interact::{ContextMenu, NodeSummary, Outcome, PointerEvent};
use crate::pages::{MainGraphPage, ProcessMapPage, Route};
use crate::render::CharSurface;

const MENU_COLOR: Color = Color::Cyan;
const DETAIL_COLOR: Color = Color::Yellow;
const STATUS_KEY_COLOR: Color = Color::Cyan;
const STATUS_LABEL_COLOR: Color = Color::Gray;

/// Runs the interactive terminal UI starting on `route`.
pub fn run(route: Route) -> Result<(), Box<dyn Error>> {
    let mut terminal = TerminalSession::new()?;
    let (cols, rows) = terminal.size()?;
    let mut app = App::new(route, cols, rows)?;

    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key)?,
                Event::Mouse(mouse) => app.handle_mouse(mouse)?,
                Event::Resize(cols, rows) => app.handle_resize(cols, rows)?,
                _ => {}
            }
        }
    }

    Ok(())
}

enum ActivePage {
    MainGraph(MainGraphPage<CharSurface>),
    ProcessMap(ProcessMapPage<CharSurface>),
}

impl ActivePage {
    fn route(&self) -> Route {
        match self {
            Self::MainGraph(_) => Route::MainGraph,
            Self::ProcessMap(_) => Route::ProcessMap,
        }
    }

    fn surface(&self) -> &CharSurface {
        match self {
            Self::MainGraph(page) => page.diagram().surface(),
            Self::ProcessMap(page) => page.diagram().surface(),
        }
    }

    fn menu(&self) -> Option<&ContextMenu> {
        match self {
            Self::MainGraph(page) => page.menu(),
            Self::ProcessMap(page) => page.menu(),
        }
    }

    fn detail(&self) -> Option<NodeSummary> {
        match self {
            Self::MainGraph(page) => page.detail(),
            Self::ProcessMap(page) => page.detail(),
        }
    }

    fn dismiss_detail(&mut self) {
        match self {
            Self::MainGraph(page) => page.dismiss_detail(),
            Self::ProcessMap(page) => page.dismiss_detail(),
        }
    }

    fn dismiss_menu(&mut self) -> Outcome {
        match self {
            Self::MainGraph(page) => page.dismiss_menu(),
            Self::ProcessMap(page) => page.dismiss_menu(),
        }
    }

    fn on_pointer(&mut self, pointer: PointerEvent) -> Outcome {
        match self {
            Self::MainGraph(page) => page.on_pointer(pointer),
            Self::ProcessMap(page) => page.on_pointer(pointer),
        }
    }

    fn activate_menu(&mut self, index: usize) -> Outcome {
        match self {
            Self::MainGraph(page) => page.activate_menu(index),
            Self::ProcessMap(page) => page.activate_menu(index),
        }
    }

    fn take_navigation(&mut self) -> Option<Route> {
        match self {
            Self::MainGraph(page) => page.take_navigation(),
            Self::ProcessMap(page) => page.take_navigation(),
        }
    }

    fn resize(&mut self, cols: usize, rows: usize) -> Result<(), Box<dyn Error>> {
        match self {
            Self::MainGraph(page) => {
                page.diagram_mut().surface_mut().resize(cols, rows)?;
                page.on_resize();
            }
            Self::ProcessMap(page) => {
                page.diagram_mut().surface_mut().resize(cols, rows)?;
                page.on_resize();
            }
        }
        Ok(())
    }

    fn close(self) -> CharSurface {
        match self {
            Self::MainGraph(page) => page.close(),
            Self::ProcessMap(page) => page.close(),
        }
    }
}

struct App {
    page: ActivePage,
    menu_cursor: ListState,
    should_quit: bool,
}

impl App {
    /// `cols`/`rows` are the full terminal size; one row is reserved for the
    /// status line.
    fn new(route: Route, cols: u16, rows: u16) -> Result<Self, Box<dyn Error>> {
        let surface = CharSurface::new(
            cols.max(1) as usize,
            rows.saturating_sub(1).max(1) as usize,
        )?;
        let page = open_page(route, surface)?;
        Ok(Self {
            page,
            menu_cursor: ListState::default(),
            should_quit: false,
        })
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), Box<dyn Error>> {
        if self.page.detail().is_some() {
            // Any key closes the overlay.
            self.page.dismiss_detail();
            return Ok(());
        }

        if self.page.menu().is_some() {
            match key.code {
                KeyCode::Esc => {
                    self.page.dismiss_menu();
                    self.menu_cursor = ListState::default();
                }
                KeyCode::Up => self.move_menu_cursor(-1),
                KeyCode::Down => self.move_menu_cursor(1),
                KeyCode::Enter => {
                    let index = self.menu_cursor.selected().unwrap_or(0);
                    self.page.activate_menu(index);
                    self.menu_cursor = ListState::default();
                    self.follow_navigation()?;
                }
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('g') => self.switch_to(Route::MainGraph)?,
            KeyCode::Char('p') => self.switch_to(Route::ProcessMap)?,
            _ => {}
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<(), Box<dyn Error>> {
        let button = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => MouseButton::Left,
            MouseEventKind::Down(MouseButton::Right) => MouseButton::Right,
            _ => return Ok(()),
        };
        let (col, row) = (mouse.column as usize, mouse.row as usize);

        if let Some(rect) = self.menu_popup_area() {
            if button == MouseButton::Left && popup_contains(rect, col, row) {
                let index = (row as u16).saturating_sub(rect.y + 1) as usize;
                self.page.activate_menu(index);
                self.menu_cursor = ListState::default();
                return self.follow_navigation();
            }
        }

        let position = self.page.surface().cell_to_canvas(col, row);
        let pointer = match button {
            MouseButton::Left => PointerEvent::left(position),
            _ => PointerEvent::right(position),
        };
        if self.page.on_pointer(pointer) == Outcome::MenuOpened {
            self.menu_cursor.select(Some(0));
        }
        self.follow_navigation()
    }

    fn handle_resize(&mut self, cols: u16, rows: u16) -> Result<(), Box<dyn Error>> {
        let canvas_rows = rows.saturating_sub(1).max(1);
        self.page.resize(cols.max(1) as usize, canvas_rows as usize)
    }

    fn move_menu_cursor(&mut self, delta: isize) {
        let len = self.page.menu().map_or(0, |menu| menu.items().len());
        if len == 0 {
            return;
        }
        let current = self.menu_cursor.selected().unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len as isize) as usize;
        self.menu_cursor.select(Some(next));
    }

    fn switch_to(&mut self, route: Route) -> Result<(), Box<dyn Error>> {
        if self.page.route() == route {
            return Ok(());
        }
        let canvas = self.page.surface().canvas();
        let fresh = CharSurface::new(canvas.width(), canvas.height())?;
        let previous = std::mem::replace(&mut self.page, open_page(route, fresh)?);
        previous.close();
        self.menu_cursor = ListState::default();
        Ok(())
    }

    fn follow_navigation(&mut self) -> Result<(), Box<dyn Error>> {
        if let Some(route) = self.page.take_navigation() {
            self.switch_to(route)?;
        }
        Ok(())
    }

    /// Popup cells of the open menu, anchored at the pointer position that
    /// opened it and clamped into the terminal. Mouse hit-testing and `draw`
    /// must agree on this rect.
    fn menu_popup_area(&self) -> Option<Rect> {
        let menu = self.page.menu()?;
        let (col, row) = self.page.surface().canvas_to_cell(menu.anchor());

        let width = menu
            .items()
            .iter()
            .map(|item| item.label().chars().count())
            .max()
            .unwrap_or(0) as u16
            + 4;
        let height = menu.items().len() as u16 + 2;

        let canvas = self.page.surface().canvas();
        let terminal = Rect::new(0, 0, canvas.width() as u16, canvas.height() as u16 + 1);
        Some(clamp_popup(
            Rect::new(col as u16, row as u16, width, height),
            terminal,
        ))
    }
}

fn open_page(route: Route, surface: CharSurface) -> Result<ActivePage, crate::render::MountError> {
    Ok(match route {
        Route::MainGraph => ActivePage::MainGraph(MainGraphPage::open(surface)?),
        Route::ProcessMap => ActivePage::ProcessMap(ProcessMapPage::open(surface)?),
    })
}

fn popup_contains(rect: Rect, col: usize, row: usize) -> bool {
    let (col, row) = (col as u16, row as u16);
    col >= rect.x && col < rect.x + rect.width && row > rect.y && row < rect.y + rect.height - 1
}

fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.size();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    let canvas_area = layout[0];
    let status_area = layout[1];

    frame.render_widget(
        Paragraph::new(app.page.surface().canvas().to_string()),
        canvas_area,
    );
    draw_status(frame, status_area, &app.page);

    if let (Some(menu), Some(popup)) = (app.page.menu(), app.menu_popup_area()) {
        let items = menu
            .items()
            .iter()
            .map(|item| ListItem::new(item.label().to_owned()))
            .collect::<Vec<_>>();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(menu.target().label.clone())
                    .border_style(Style::default().fg(MENU_COLOR)),
            )
            .highlight_symbol("> ");
        frame.render_widget(Clear, popup);
        frame.render_stateful_widget(list, popup, &mut app.menu_cursor);
    }

    if let Some(detail) = app.page.detail() {
        draw_detail(frame, area, &detail);
    }
}

fn draw_status(frame: &mut Frame<'_>, area: Rect, page: &ActivePage) {
    let page_name = match page.route() {
        Route::MainGraph => "topology",
        Route::ProcessMap => "process map",
    };
    let line = Line::from(vec![
        Span::styled(format!(" {page_name} "), Style::default().fg(STATUS_LABEL_COLOR)),
        Span::styled("g", Style::default().fg(STATUS_KEY_COLOR)),
        Span::styled(" graph  ", Style::default().fg(STATUS_LABEL_COLOR)),
        Span::styled("p", Style::default().fg(STATUS_KEY_COLOR)),
        Span::styled(" processes  ", Style::default().fg(STATUS_LABEL_COLOR)),
        Span::styled("q", Style::default().fg(STATUS_KEY_COLOR)),
        Span::styled(" quit", Style::default().fg(STATUS_LABEL_COLOR)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_detail(frame: &mut Frame<'_>, area: Rect, detail: &NodeSummary) {
    let mut lines = vec![
        Line::from(format!("id: {}", detail.id)),
        Line::from(format!("label: {}", detail.label)),
    ];
    if let Some(cluster) = &detail.cluster {
        lines.push(Line::from(format!("cluster: {cluster}")));
    }
    lines.push(Line::default());
    lines.push(Line::from("press any key to close"));

    let height = lines.len() as u16 + 2;
    let width = (area.width / 2).max(30).min(area.width);
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height.min(area.height),
    );

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("node detail")
            .border_style(Style::default().fg(DETAIL_COLOR)),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn clamp_popup(popup: Rect, area: Rect) -> Rect {
    let width = popup.width.min(area.width);
    let height = popup.height.min(area.height);
    Rect::new(
        popup.x.min(area.width.saturating_sub(width)),
        popup.y.min(area.height.saturating_sub(height)),
        width,
        height,
    )
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        let area = self.terminal.size()?;
        Ok((area.width, area.height))
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}
