use std::io;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use unicode_width::UnicodeWidthStr;

use crate::config::{Arena, Theme};
use crate::render::{DrawCommand, Paint, RenderSink};
use crate::snake::Position;
use crate::terminal_runtime::TerminalSession;

/// Terminal columns used for one arena cell, so cells look roughly square.
pub const COLUMNS_PER_CELL: u16 = 2;

const GLYPH_CELL: &str = "██";
const GLYPH_EMPTY: &str = "  ";

/// Retained picture of the arena, one slot per cell, walls included.
///
/// Drawing plans are incremental, so the canvas remembers what earlier
/// commands painted until they are cleared.
#[derive(Debug, Clone)]
pub struct Canvas {
    arena: Arena,
    columns: u16,
    rows: u16,
    cells: Vec<Option<Paint>>,
    message: Option<(String, Position)>,
}

impl Canvas {
    #[must_use]
    pub fn new(arena: Arena) -> Self {
        let columns = u16::try_from(arena.width / arena.cell_size).unwrap_or(u16::MAX);
        let rows = u16::try_from(arena.height / arena.cell_size).unwrap_or(u16::MAX);

        Self {
            arena,
            columns,
            rows,
            cells: vec![None; usize::from(columns) * usize::from(rows)],
            message: None,
        }
    }

    /// Canvas size in cells.
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        (self.columns, self.rows)
    }

    pub fn apply(&mut self, plan: &[DrawCommand]) {
        for command in plan {
            match command {
                DrawCommand::FillArena => self.cells.fill(Some(Paint::Wall)),
                DrawCommand::ClearInterior => self.clear_interior(),
                DrawCommand::FillCell { position, paint } => {
                    if let Some(index) = self.index_of(*position) {
                        self.cells[index] = Some(*paint);
                    }
                }
                DrawCommand::Text { message, at } => {
                    self.message = Some((message.clone(), *at));
                }
            }
        }
    }

    /// Returns what is painted at cell (`column`, `row`).
    #[must_use]
    pub fn paint_at(&self, column: u16, row: u16) -> Option<Paint> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells[usize::from(row) * usize::from(self.columns) + usize::from(column)]
    }

    #[must_use]
    pub fn message(&self) -> Option<&(String, Position)> {
        self.message.as_ref()
    }

    fn clear_interior(&mut self) {
        for row in 0..self.rows {
            for column in 0..self.columns {
                let position = Position {
                    x: i32::from(column) * self.arena.cell_size,
                    y: i32::from(row) * self.arena.cell_size,
                };
                if self.arena.in_interior(position) {
                    let index = usize::from(row) * usize::from(self.columns) + usize::from(column);
                    self.cells[index] = None;
                }
            }
        }
        self.message = None;
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        if position.x < 0 || position.y < 0 {
            return None;
        }
        let column = u16::try_from(position.x / self.arena.cell_size).ok()?;
        let row = u16::try_from(position.y / self.arena.cell_size).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        Some(usize::from(row) * usize::from(self.columns) + usize::from(column))
    }
}

/// Renders the canvas centered in the frame.
pub fn render(frame: &mut Frame<'_>, canvas: &Canvas, theme: &Theme) {
    let area = canvas_area(frame.area(), canvas.size());
    let buffer = frame.buffer_mut();

    for row in 0..canvas.rows {
        for column in 0..canvas.columns {
            let Some((x, y)) = cell_to_terminal(area, column, row) else {
                continue;
            };

            match canvas.paint_at(column, row) {
                Some(paint) => {
                    let style = Style::new()
                        .fg(paint_color(paint, theme))
                        .bg(theme.background);
                    buffer.set_string(x, y, GLYPH_CELL, style);
                }
                None => {
                    buffer.set_string(x, y, GLYPH_EMPTY, Style::new().bg(theme.background));
                }
            }
        }
    }

    if let Some((message, at)) = canvas.message() {
        render_message(frame, area, canvas, message, *at, theme);
    }
}

fn render_message(
    frame: &mut Frame<'_>,
    area: Rect,
    canvas: &Canvas,
    message: &str,
    at: Position,
    theme: &Theme,
) {
    let cell_size = i64::from(canvas.arena.cell_size);
    let center_x = i64::from(area.x) + i64::from(at.x) * i64::from(COLUMNS_PER_CELL) / cell_size;
    let center_y = i64::from(area.y) + i64::from(at.y) / cell_size;
    let width = i64::try_from(message.width()).unwrap_or(i64::MAX);

    let left = (center_x - width / 2).max(i64::from(area.x));
    let (Ok(x), Ok(y)) = (u16::try_from(left), u16::try_from(center_y)) else {
        return;
    };
    if y >= area.bottom() || x >= area.right() {
        return;
    }

    let max_width = usize::from(area.right() - x);
    frame.buffer_mut().set_stringn(
        x,
        y,
        message,
        max_width,
        Style::new()
            .fg(theme.text)
            .bg(theme.background)
            .add_modifier(Modifier::BOLD),
    );
}

fn paint_color(paint: Paint, theme: &Theme) -> ratatui::style::Color {
    match paint {
        Paint::Wall => theme.wall,
        Paint::SnakeHead => theme.snake_head,
        Paint::SnakeBody => theme.snake_body,
        Paint::Food => theme.food,
    }
}

/// Centers a canvas of `size` cells inside `outer`, clipped to fit.
#[must_use]
pub fn canvas_area(outer: Rect, size: (u16, u16)) -> Rect {
    let width = size.0.saturating_mul(COLUMNS_PER_CELL).min(outer.width);
    let height = size.1.min(outer.height);

    Rect {
        x: outer.x + (outer.width - width) / 2,
        y: outer.y + (outer.height - height) / 2,
        width,
        height,
    }
}

/// Maps a canvas cell to the terminal cell of its left glyph half.
#[must_use]
pub fn cell_to_terminal(area: Rect, column: u16, row: u16) -> Option<(u16, u16)> {
    let x = area.x.checked_add(column.checked_mul(COLUMNS_PER_CELL)?)?;
    let y = area.y.checked_add(row)?;
    if x.checked_add(COLUMNS_PER_CELL)? > area.right() || y >= area.bottom() {
        return None;
    }

    Some((x, y))
}

/// Render sink drawing onto the live terminal.
pub struct TerminalSink<'a> {
    session: &'a mut TerminalSession,
    canvas: Canvas,
    theme: Theme,
}

impl<'a> TerminalSink<'a> {
    #[must_use]
    pub fn new(session: &'a mut TerminalSession, arena: Arena, theme: Theme) -> Self {
        Self {
            session,
            canvas: Canvas::new(arena),
            theme,
        }
    }

    /// Redraws the retained canvas, e.g. after a terminal resize.
    pub fn redraw(&mut self) -> io::Result<()> {
        let canvas = &self.canvas;
        let theme = &self.theme;
        self.session
            .terminal_mut()
            .draw(|frame| render(frame, canvas, theme))?;
        Ok(())
    }
}

impl RenderSink for TerminalSink<'_> {
    fn present(&mut self, plan: &[DrawCommand]) -> io::Result<()> {
        self.canvas.apply(plan);
        self.redraw()
    }
}
