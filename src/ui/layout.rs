//! Layout helpers — split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

const SIDEBAR_WIDTH: u16 = 34;
const PREV_BUTTON_WIDTH: u16 = 12;
const NEXT_BUTTON_WIDTH: u16 = 10;

/// Screen layout: banner on top, sidebar + page body, navigation bar and a
/// bottom status bar.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub banner_area: Rect,
    pub sidebar_area: Rect,
    pub page_area: Rect,
    pub nav_area: Rect,
    pub prev_button: Rect,
    pub next_button: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // banner
                Constraint::Min(5),    // sidebar + page
                Constraint::Length(1), // navigation buttons
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(rows[1]);

        let nav = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(PREV_BUTTON_WIDTH),
                Constraint::Length(1),
                Constraint::Length(NEXT_BUTTON_WIDTH),
                Constraint::Min(0),
            ])
            .split(rows[2]);

        Self {
            banner_area: rows[0],
            sidebar_area: body[0],
            page_area: body[1],
            nav_area: rows[2],
            prev_button: nav[0],
            next_button: nav[2],
            status_area: rows[3],
        }
    }
}

/// Is the terminal cell `(col, row)` inside `area`?
pub fn point_in_rect(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Split `area` into a `cols` × `rows` grid of equal cells, row-major.
pub fn grid(area: Rect, cols: u16, rows: u16) -> Vec<Rect> {
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints((0..rows).map(|_| Constraint::Ratio(1, u32::from(rows))))
        .split(area);

    row_areas
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints((0..cols).map(|_| Constraint::Ratio(1, u32::from(cols))))
                .split(*row)
                .to_vec()
        })
        .collect()
}
