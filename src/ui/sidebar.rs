//! Sidebar with the global filters.
//!
//! Each [`FilterField`] occupies [`FIELD_HEIGHT`] rows (label, value, blank)
//! so mouse clicks can be mapped back to a field with [`field_at`].

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::app::state::FilterField;
use crate::core::filter::{FilterBounds, FilterState};
use crate::core::report::format_money;

use super::theme::Theme;

pub const FIELD_HEIGHT: u16 = 3;

pub struct Sidebar<'a> {
    pub filters: &'a FilterState,
    pub bounds: &'a FilterBounds,
    pub focus: FilterField,
    pub matched: usize,
    pub total: usize,
    pub has_focus: bool,
}

impl Sidebar<'_> {
    fn value_text(&self, field: FilterField) -> String {
        let f = self.filters;
        match field {
            FilterField::StartDate => f.date_range.start.format("%Y/%m/%d").to_string(),
            FilterField::EndDate => f.date_range.end.format("%Y/%m/%d").to_string(),
            FilterField::MinSalary => format!(
                "{}  ({}–{})",
                format_money(f.min_salary),
                format_money(self.bounds.salary_min),
                format_money(self.bounds.salary_max)
            ),
            FilterField::Category => f.category.label().to_string(),
        }
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Global Filters ")
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_style(Theme::border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();
        for &field in FilterField::ALL {
            let focused = self.has_focus && field == self.focus;
            let marker = if focused { "▸ " } else { "  " };
            let value_style = if focused {
                Theme::selected_style().patch(Theme::field_value_style())
            } else {
                Theme::field_value_style()
            };
            lines.push(Line::from(Span::styled(
                format!("{marker}{}", field.label()),
                Theme::field_label_style(),
            )));
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("‹ {} ›", self.value_text(field)), value_style),
            ]));
            lines.push(Line::raw(""));
        }

        if self.filters.date_range.is_inverted() {
            lines.push(Line::from(Span::styled(
                "  start is after end: no rows",
                Theme::error_style(),
            )));
        }
        lines.push(Line::from(vec![
            Span::styled("  Matching rows: ", Theme::field_label_style()),
            Span::styled(format!("{} / {}", self.matched, self.total), Theme::value_style()),
        ]));

        // No wrapping: every field must stay FIELD_HEIGHT rows tall.
        Paragraph::new(lines).render(inner, buf);
    }
}

/// Map a click inside the sidebar to the field drawn on that row.
pub fn field_at(sidebar_area: Rect, row: u16) -> Option<FilterField> {
    let inner_top = sidebar_area.y.saturating_add(1);
    if row < inner_top {
        return None;
    }
    let idx = usize::from((row - inner_top) / FIELD_HEIGHT);
    FilterField::ALL.get(idx).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicks_map_to_fields_by_row() {
        let area = Rect::new(0, 3, 34, 30);
        assert_eq!(field_at(area, 3), None); // border
        assert_eq!(field_at(area, 4), Some(FilterField::StartDate));
        assert_eq!(field_at(area, 6), Some(FilterField::StartDate));
        assert_eq!(field_at(area, 7), Some(FilterField::EndDate));
        assert_eq!(field_at(area, 13), Some(FilterField::Category));
        assert_eq!(field_at(area, 16), None);
    }
}
