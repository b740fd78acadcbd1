//! The UI renders the application state into a live graph and a source pane.
//!
//! The graph pane draws the simulation onto a braille canvas with the
//! viewport's world-space bounds, the source pane mirrors the buffer with
//! the navigation target highlighted, and the pop-up layer (context menu,
//! dialogs) renders last so it sits above everything else.

use crate::app_state::AppState;
use crate::config::Config;
use crate::controller::{ContextMenu, Dialog};
use crate::heading;
use crate::layout::{self, GraphNode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine},
        Block, Borders, Clear, Paragraph,
    },
    Frame,
};

/// Renders the graph, the source pane, the help bar, and any pop-ups.
pub fn draw(f: &mut Frame, app: &mut AppState, cfg: &Config) {
    app.frame_area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    if app.show_source {
        let width = u16::try_from(cfg.source_width).unwrap_or(36);
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(width)])
            .split(chunks[0]);
        draw_graph(f, app, panes[0]);
        draw_source(f, app, panes[1]);
    } else {
        draw_graph(f, app, chunks[0]);
    }
    draw_help(f, app, chunks[1]);

    if let Some(menu) = &app.controller.menu {
        draw_menu(f, menu);
    }
    if let Some(dialog) = &app.controller.dialog {
        draw_dialog(f, dialog);
    }
}

/// Base colour for a heading depth, shared by circles and source headings.
fn node_color(level: usize) -> Color {
    match level {
        0 => Color::Cyan,
        1 => Color::LightGreen,
        2 => Color::LightBlue,
        3 => Color::LightMagenta,
        4 => Color::LightYellow,
        _ => Color::Gray,
    }
}

fn circle_color(node: &GraphNode, selected: bool) -> Color {
    if selected {
        Color::Yellow
    } else if node.pinned {
        Color::LightRed
    } else {
        node_color(node.level)
    }
}

fn draw_graph(f: &mut Frame, app: &mut AppState, area: Rect) {
    let title = app.path.display().to_string();
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    app.canvas_area = inner;

    let (x_bounds, y_bounds) = app.viewport.bounds(inner);
    let sim = &app.sim;
    let selected = app.selected;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            for link in sim.links() {
                let source = &sim.nodes()[link.source];
                let target = &sim.nodes()[link.target];
                ctx.draw(&CanvasLine {
                    x1: f64::from(source.x),
                    y1: f64::from(source.y),
                    x2: f64::from(target.x),
                    y2: f64::from(target.y),
                    color: Color::DarkGray,
                });
            }
            ctx.layer();
            for (index, node) in sim.nodes().iter().enumerate() {
                ctx.draw(&Circle {
                    x: f64::from(node.x),
                    y: f64::from(node.y),
                    radius: f64::from(layout::radius_for_level(node.level)),
                    color: circle_color(node, selected == Some(index)),
                });
            }
            ctx.layer();
            for (index, node) in sim.nodes().iter().enumerate() {
                if node.label.is_empty() {
                    continue;
                }
                let style = if selected == Some(index) {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default().fg(node_color(node.level))
                };
                let x = f64::from(node.x) + f64::from(layout::radius_for_level(node.level)) + 2.0;
                ctx.print(
                    x,
                    f64::from(node.y),
                    Line::from(Span::styled(node.label.clone(), style)),
                );
            }
        });
    f.render_widget(canvas, area);
}

fn draw_source(f: &mut Frame, app: &AppState, area: Rect) {
    let inner_height = area.height.saturating_sub(2);
    let target = app.target_line;
    let scroll = target.map_or(0, |line| {
        line.saturating_sub(usize::from(inner_height) / 2)
    });

    let lines: Vec<Line> = app
        .buffer
        .lines()
        .enumerate()
        .map(|(index, raw)| {
            let mut style = heading::heading_level(raw).map_or_else(Style::default, |level| {
                Style::default()
                    .fg(node_color(level))
                    .add_modifier(Modifier::BOLD)
            });
            if Some(index) == target {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::from(Span::styled(format!("{:>3} {raw}", index + 1), style))
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Source"))
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    f.render_widget(paragraph, area);
}

fn draw_help(f: &mut Frame, app: &AppState, area: Rect) {
    let text = if let Some(message) = &app.message {
        message.clone()
    } else if app.controller.dialog.is_some() {
        "Enter: Confirm | Esc: Cancel".to_string()
    } else if app.controller.menu.is_some() {
        "↑/↓: Choose | Enter: Select | Esc: Close".to_string()
    } else {
        "Tab: Cycle | Enter: Go to | a: Add | d: Delete | o: Topic | s: Source | r: Stir | q: Quit"
            .to_string()
    };
    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

fn draw_menu(f: &mut Frame, menu: &ContextMenu) {
    let area = menu.area(f.area());
    f.render_widget(Clear, area);

    let lines: Vec<Line> = menu
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let style = if index == menu.cursor {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!(" {:<20}", entry.label()), style))
        })
        .collect();

    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

fn draw_dialog(f: &mut Frame, dialog: &Dialog) {
    match dialog {
        Dialog::Input {
            title,
            buffer,
            cursor,
            ..
        } => {
            let area = centered_rect(f.area(), 46, 7);
            f.render_widget(Clear, area);
            let lines = vec![
                Line::from(title.clone()),
                Line::default(),
                line_with_cursor(buffer, *cursor),
                Line::default(),
                Line::from(Span::styled(
                    "Enter: Add | Esc: Cancel",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let widget = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Add heading"));
            f.render_widget(widget, area);
        }
        Dialog::Confirm { question, .. } => {
            let area = centered_rect(f.area(), 46, 5);
            f.render_widget(Clear, area);
            let lines = vec![
                Line::from(question.clone()),
                Line::default(),
                Line::from(Span::styled(
                    "y/Enter: Delete | n/Esc: Keep",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let widget = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Confirm"));
            f.render_widget(widget, area);
        }
    }
}

/// Input line with a reversed cell marking the caret position.
fn line_with_cursor(text: &str, cursor: usize) -> Line<'static> {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());
    let before: String = chars[..cursor].iter().collect();
    let at = chars
        .get(cursor)
        .map_or(" ".to_string(), std::string::ToString::to_string);
    let after: String = chars
        .get(cursor + 1..)
        .map_or_else(String::new, |rest| rest.iter().collect());
    Line::from(vec![
        Span::raw(format!("> {before}")),
        Span::styled(at, Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw(after),
    ])
}

fn centered_rect(frame: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(frame.width);
    let height = height.min(frame.height);
    let x = frame.x + (frame.width - width) / 2;
    let y = frame.y + (frame.height - height) / 2;
    Rect::new(x, y, width, height)
}
