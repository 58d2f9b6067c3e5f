use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::app::{App, Focus, ScoreRow};

/// Bar display units drawn per terminal cell.
pub const UNITS_PER_CELL: f64 = 8.0;
/// Above this width the title is drawn large and a result row fits on one line.
pub const WIDE_LAYOUT_MIN_WIDTH: u16 = 60;
const PRINT_BAR_MAX: u16 = 60;
const BAR_CHAR: char = '█';

pub fn is_wide(width: u16) -> bool {
    width > WIDE_LAYOUT_MIN_WIDTH
}

pub fn bar_cells(units: f64, max: u16) -> u16 {
    if !units.is_finite() || units <= 0.0 {
        return 0;
    }
    let cells = (units / UNITS_PER_CELL).round();
    if cells >= f64::from(max) {
        max
    } else {
        cells as u16
    }
}

/// One line of headless output: name, average and bar.
pub fn format_row(row: &ScoreRow) -> String {
    let cells = bar_cells(row.average.bar_units(), PRINT_BAR_MAX);
    let bar: String = std::iter::repeat(BAR_CHAR).take(cells as usize).collect();
    format!("{:<14} {:>8}  {}", row.country, row.average, bar)
}

pub fn ui(f: &mut Frame, app: &App) {
    let area = f.area();
    let wide = is_wide(area.width);
    let row_height = if wide { 1 } else { 2 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(4),          // Title
                Constraint::Length(1),          // Source toggle
                Constraint::Length(3),          // Country 1
                Constraint::Length(row_height), // Row 1
                Constraint::Length(3),          // Country 2
                Constraint::Length(row_height), // Row 2
                Constraint::Min(0),             // Status
            ]
            .as_ref(),
        )
        .split(area);

    draw_title(f, wide, chunks[0]);
    draw_source_toggle(f, app, chunks[1]);

    let rows = app.rows();
    for (i, (input_area, row_area)) in [(chunks[2], chunks[3]), (chunks[4], chunks[5])].into_iter().enumerate() {
        let focus = if i == 0 { Focus::First } else { Focus::Second };
        draw_input(f, &app.inputs[i], i + 1, app.focus == focus, input_area);
        if let Some(row) = &rows[i] {
            draw_row(f, row, wide, row_area);
        }
    }

    draw_status(f, app, chunks[6]);
}

fn draw_title(f: &mut Frame, wide: bool, area: Rect) {
    if !wide {
        let p = Paragraph::new("Cricket Scores")
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Left);
        f.render_widget(p, area);
    } else {
        let title = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(Style::default().fg(Color::White))
            .lines(vec!["Cricket Scores".into()])
            .alignment(Alignment::Left)
            .build();
        f.render_widget(title, area);
    }
}

fn draw_source_toggle(f: &mut Frame, app: &App, area: Rect) {
    let (state, color) = if app.source.is_remote() {
        (" ON ", Color::Green)
    } else {
        (" OFF ", Color::DarkGray)
    };
    let mut label_style = Style::default();
    if app.focus == Focus::Source {
        label_style = label_style.add_modifier(Modifier::REVERSED);
    }
    let line = Line::from(vec![
        Span::styled("Use Server Data", label_style),
        Span::raw("  "),
        Span::styled(state, Style::default().bg(color).fg(Color::White).add_modifier(Modifier::BOLD)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_input(f: &mut Frame, text: &str, n: usize, focused: bool, area: Rect) {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" Country {} ", n));

    let content = if text.is_empty() && !focused {
        Line::from(Span::styled(format!("Enter country {}", n), Style::default().fg(Color::DarkGray)))
    } else if focused {
        Line::from(vec![Span::raw(text.to_string()), Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK))])
    } else {
        Line::from(text.to_string())
    };

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn draw_row(f: &mut Frame, row: &ScoreRow, wide: bool, area: Rect) {
    let name = Span::styled(row.country.clone(), Style::default().add_modifier(Modifier::BOLD));
    let average = Span::raw(row.average.to_string());
    let bar = ScoreBar {
        units: row.average.bar_units(),
    };

    if wide {
        let name_width = (row.country.chars().count() as u16).saturating_add(2);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(name_width), Constraint::Length(9), Constraint::Min(0)].as_ref())
            .split(area);
        f.render_widget(Paragraph::new(Line::from(name)), cols[0]);
        f.render_widget(Paragraph::new(Line::from(average)), cols[1]);
        f.render_widget(bar, cols[2]);
    } else {
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)].as_ref())
            .split(area);
        f.render_widget(Paragraph::new(Line::from(vec![name, Span::raw("  "), average])), lines[0]);
        f.render_widget(bar, lines[1]);
    }
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let mut status = vec![Span::raw(format!("Source: {}", app.source.label()))];
    if app.pending > 0 {
        status.push(Span::styled("  loading...", Style::default().fg(Color::Yellow)));
    }
    let loaded = app
        .last_loaded
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    status.push(Span::raw(format!("  Last load: {}", loaded)));

    let known = if app.table.is_empty() {
        "none".to_string()
    } else {
        app.table.countries().join(", ")
    };

    let text = vec![
        Line::from(status),
        Line::from(Span::styled(format!("Countries: {}", known), Style::default().fg(Color::Cyan))),
        Line::from(Span::styled(
            "Tab focus | Space/F2 toggle source | Esc quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let p = Paragraph::new(text)
        .block(Block::default().borders(Borders::TOP))
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}

/// Horizontal bar whose length follows the average.
struct ScoreBar {
    units: f64,
}

impl Widget for ScoreBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let cells = bar_cells(self.units, area.width);
        for x in area.left()..area.left() + cells {
            if let Some(cell) = buf.cell_mut((x, area.top())) {
                cell.set_char(BAR_CHAR).set_fg(Color::Blue);
            }
        }
    }
}
