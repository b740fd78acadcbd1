//! The core state machine bridging the text buffer and the interactive graph.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the user navigates
//! and edits. Here that truth is the text buffer: the heading tree and the simulation are both
//! derived from it, structural edits rewrite it on disk immediately, and every rewrite rebuilds
//! the derived state from scratch rather than patching it in place.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use std::path::PathBuf;
use std::{fs, io};

use crate::config::Config;
use crate::controller::{self, Controller, Dialog, Effect};
use crate::heading::{self, HeadingNode};
use crate::layout::{SimParams, Simulation};
use crate::{mutate, navigate};

#[derive(Clone, Copy, Debug)]
/// Pan and zoom state mapping world space onto the canvas cell grid.
///
/// Terminal cells are roughly twice as tall as they are wide, so the
/// vertical extent is compensated to keep circles round on screen.
pub struct Viewport {
    /// World x at the centre of the canvas.
    pub x: f32,
    /// World y at the centre of the canvas.
    pub y: f32,
    /// Magnification; larger values show less of the world.
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    const MIN_ZOOM: f32 = 0.25;
    const MAX_ZOOM: f32 = 4.0;
    const ZOOM_STEP: f32 = 1.25;
    const PAN_STEP: f32 = 4.0;

    /// Steps the magnification up, clamped.
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * Self::ZOOM_STEP).min(Self::MAX_ZOOM);
    }

    /// Steps the magnification down, clamped.
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / Self::ZOOM_STEP).max(Self::MIN_ZOOM);
    }

    /// Shifts the centre by a step in each axis, scaled so panning covers
    /// the same on-screen distance at every zoom level.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.x += dx * Self::PAN_STEP / self.zoom;
        self.y += dy * Self::PAN_STEP / self.zoom;
    }

    #[must_use]
    /// World-space x and y bounds for a canvas of the given size.
    pub fn bounds(&self, area: Rect) -> ([f64; 2], [f64; 2]) {
        let zoom = f64::from(self.zoom.max(f32::EPSILON));
        let half_w = f64::from(area.width.max(1)) / (2.0 * zoom);
        let half_h = f64::from(area.height.max(1)) / zoom;
        (
            [f64::from(self.x) - half_w, f64::from(self.x) + half_w],
            [f64::from(self.y) - half_h, f64::from(self.y) + half_h],
        )
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // World coordinates fit comfortably in f32
    /// World position under a screen cell, or `None` when the cell lies
    /// outside the canvas.
    pub fn world_at(&self, area: Rect, column: u16, row: u16) -> Option<(f32, f32)> {
        if !area.contains(Position::new(column, row)) {
            return None;
        }
        let ([x0, x1], [y0, y1]) = self.bounds(area);
        let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width.max(1));
        let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height.max(1));
        let wx = x0 + fx * (x1 - x0);
        let wy = y1 - fy * (y1 - y0);
        Some((wx as f32, wy as f32))
    }
}

/// In-flight left-button drag on a graph node.
struct DragState {
    /// Simulation index of the held node.
    node: usize,
    /// Set once the pointer leaves its starting cell; distinguishes a drag
    /// from a click on release.
    moved: bool,
}

/// Bridges the text buffer and the interactive graph, maintaining session state.
///
/// The buffer is authoritative: [`AppState::apply_buffer`] persists a rewrite to disk, reparses
/// it, and replaces the simulation wholesale. Selection survives a rebuild by level and title
/// rather than by identifier, since identifiers go stale on every parse.
pub struct AppState {
    /// Path of the document on disk; every structural edit rewrites it.
    pub path: PathBuf,
    /// Current text buffer, the single source of truth.
    pub buffer: String,
    /// Heading tree derived from the buffer.
    pub tree: HeadingNode,
    /// Physics state for the current parse.
    pub sim: Simulation,
    /// Context menu and dialog layer.
    pub controller: Controller,
    /// Pan and zoom of the graph pane.
    pub viewport: Viewport,
    /// Selected node, as an index into the simulation.
    pub selected: Option<usize>,
    /// Buffer line the source pane should centre and highlight.
    pub target_line: Option<usize>,
    /// Whether the source pane is visible.
    pub show_source: bool,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Whole-terminal rectangle from the last draw, for menu hit-testing.
    pub frame_area: Rect,
    /// Inner rectangle of the graph canvas from the last draw, used to map
    /// pointer cells back into world space.
    pub canvas_area: Rect,
    drag: Option<DragState>,
    params: SimParams,
}

impl AppState {
    #[must_use]
    /// Initialises application state from a document buffer.
    pub fn new(path: PathBuf, buffer: String, config: &Config) -> Self {
        let params = sim_params(config);
        let tree = heading::parse(&buffer);
        let sim = Simulation::new(&tree, params);
        Self {
            path,
            buffer,
            tree,
            sim,
            controller: Controller::default(),
            viewport: Viewport::default(),
            selected: None,
            target_line: None,
            show_source: true,
            message: None,
            frame_area: Rect::default(),
            canvas_area: Rect::default(),
            drag: None,
            params,
        }
    }

    /// Persists a rewritten buffer and rebuilds everything derived from it.
    ///
    /// The file is written first so the document on disk never lags the
    /// graph. The old simulation is discarded along with its node
    /// identifiers; the selection is re-resolved in the new simulation by
    /// level and title.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn apply_buffer(&mut self, buffer: String) -> io::Result<()> {
        fs::write(&self.path, &buffer)?;
        let keep = self
            .selected
            .and_then(|index| self.sim.nodes().get(index))
            .map(|node| (node.level, node.label.clone()));

        self.buffer = buffer;
        self.tree = heading::parse(&self.buffer);
        self.sim = Simulation::new(&self.tree, self.params);
        self.drag = None;
        self.selected = keep.and_then(|(level, label)| {
            self.sim
                .nodes()
                .iter()
                .position(|node| node.level == level && node.label == label)
        });
        let total = self.buffer.lines().count();
        self.target_line = self.target_line.filter(|line| *line < total);
        Ok(())
    }

    /// Advances the simulation one step when it still has energy.
    pub fn tick(&mut self) {
        if !self.sim.is_settled() {
            self.sim.tick();
        }
    }

    /// Routes a key press, returning `true` when the app should quit.
    ///
    /// Dialogs capture all input while open, then the menu, then the global
    /// bindings: selection cycling on Tab, navigation on Enter, structural
    /// edits on `a`/`o`/`d`, pane and viewport controls on `s`, arrows,
    /// `+`/`-`, Home, and `r` to nudge the layout.
    ///
    /// # Errors
    ///
    /// Returns an error if a confirmed edit cannot be written to disk.
    pub fn handle_key(&mut self, key: KeyEvent) -> io::Result<bool> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }
        if self.controller.dialog.is_some() {
            self.handle_dialog_key(key)?;
            return Ok(false);
        }
        if self.controller.menu.is_some() {
            self.handle_menu_key(key.code);
            return Ok(false);
        }
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('s') => self.show_source = !self.show_source,
            KeyCode::Tab => self.select_next(),
            KeyCode::BackTab => self.select_prev(),
            KeyCode::Enter => self.navigate_selected(),
            KeyCode::Char('a') => self.add_under_selected(),
            KeyCode::Char('o') => self.controller.open_add_dialog(&self.tree, heading::ROOT_ID),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('r') => self.sim.reheat(),
            KeyCode::Char('+' | '=') => self.viewport.zoom_in(),
            KeyCode::Char('-') => self.viewport.zoom_out(),
            KeyCode::Up => self.viewport.pan(0.0, 1.0),
            KeyCode::Down => self.viewport.pan(0.0, -1.0),
            KeyCode::Left => self.viewport.pan(-1.0, 0.0),
            KeyCode::Right => self.viewport.pan(1.0, 0.0),
            KeyCode::Home => self.viewport = Viewport::default(),
            KeyCode::Esc => self.message = None,
            _ => {}
        }
        Ok(false)
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.controller.menu_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.controller.menu_next(),
            KeyCode::Enter => self.controller.activate(&self.tree),
            KeyCode::Esc => self.controller.close_menu(),
            _ => {}
        }
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) -> io::Result<()> {
        if matches!(self.controller.dialog, Some(Dialog::Confirm { .. })) {
            match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => {
                    let effect = self.controller.confirm();
                    self.dispatch(effect)?;
                }
                KeyCode::Char('n' | 'N') | KeyCode::Esc | KeyCode::Backspace => {
                    self.controller.cancel();
                }
                _ => {}
            }
            return Ok(());
        }
        match key.code {
            KeyCode::Enter => {
                let effect = self.controller.confirm();
                self.dispatch(effect)?;
            }
            KeyCode::Esc => self.controller.cancel(),
            KeyCode::Backspace => self.controller.dialog_backspace(),
            KeyCode::Left => self.controller.dialog_cursor_left(),
            KeyCode::Right => self.controller.dialog_cursor_right(),
            KeyCode::Char(c) => self.controller.dialog_char(c),
            _ => {}
        }
        Ok(())
    }

    /// Routes a mouse event.
    ///
    /// Left clicks select and navigate, left drags pin and move a node,
    /// right clicks open the context menu, and the wheel zooms. The pointer
    /// is ignored while a dialog is open.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if self.controller.dialog.is_some() {
            return;
        }
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.mouse_left_down(event.column, event.row);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.mouse_left_drag(event.column, event.row);
            }
            MouseEventKind::Up(MouseButton::Left) => self.mouse_left_up(),
            MouseEventKind::Down(MouseButton::Right) => {
                self.mouse_right_down(event.column, event.row);
            }
            MouseEventKind::ScrollUp => self.viewport.zoom_in(),
            MouseEventKind::ScrollDown => self.viewport.zoom_out(),
            _ => {}
        }
    }

    fn mouse_left_down(&mut self, column: u16, row: u16) {
        if self.controller.menu.is_some() {
            let hit = self
                .controller
                .menu
                .as_ref()
                .and_then(|menu| menu.hit_entry(self.frame_area, column, row));
            match hit {
                Some(index) => {
                    if let Some(menu) = &mut self.controller.menu {
                        menu.cursor = index;
                    }
                    self.controller.activate(&self.tree);
                }
                None => self.controller.close_menu(),
            }
            return;
        }
        let Some((x, y)) = self.viewport.world_at(self.canvas_area, column, row) else {
            return;
        };
        if let Some(index) = self.sim.node_at(x, y) {
            self.drag = Some(DragState {
                node: index,
                moved: false,
            });
            self.sim.pin(index, x, y);
        }
    }

    fn mouse_left_drag(&mut self, column: u16, row: u16) {
        let Some(drag) = &mut self.drag else {
            return;
        };
        drag.moved = true;
        let node = drag.node;
        if let Some((x, y)) = self.viewport.world_at(self.canvas_area, column, row) {
            self.sim.pin(node, x, y);
        }
    }

    fn mouse_left_up(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        self.sim.release(drag.node);
        if drag.moved {
            return;
        }
        self.selected = Some(drag.node);
        let Some(node) = self.sim.nodes().get(drag.node) else {
            return;
        };
        if let Some(line) = controller::navigate_target(&self.tree, node.level, &node.label) {
            self.navigate_to(line);
        }
    }

    fn mouse_right_down(&mut self, column: u16, row: u16) {
        self.controller.close_menu();
        let Some((x, y)) = self.viewport.world_at(self.canvas_area, column, row) else {
            return;
        };
        match self.sim.node_at(x, y) {
            Some(index) => {
                self.selected = Some(index);
                let id = self.sim.nodes()[index].id.clone();
                if let Some(node) = navigate::find_by_id(&self.tree, &id) {
                    self.controller.open_node_menu(column, row, node);
                }
            }
            None => self.controller.open_background_menu(column, row),
        }
    }

    fn select_next(&mut self) {
        let len = self.sim.nodes().len();
        if len == 0 {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |index| (index + 1) % len));
    }

    fn select_prev(&mut self) {
        let len = self.sim.nodes().len();
        if len == 0 {
            return;
        }
        self.selected = Some(self.selected.map_or(len - 1, |index| (index + len - 1) % len));
    }

    fn navigate_selected(&mut self) {
        let Some(node) = self.selected.and_then(|index| self.sim.nodes().get(index)) else {
            return;
        };
        if let Some(line) = controller::navigate_target(&self.tree, node.level, &node.label) {
            self.navigate_to(line);
        }
    }

    /// Centres the source pane on a line, revealing the pane if hidden.
    fn navigate_to(&mut self, line: usize) {
        self.target_line = Some(line);
        self.show_source = true;
    }

    fn add_under_selected(&mut self) {
        let parent_id = self
            .selected
            .and_then(|index| self.sim.nodes().get(index))
            .map_or_else(|| heading::ROOT_ID.to_string(), |node| node.id.clone());
        self.controller.open_add_dialog(&self.tree, &parent_id);
    }

    fn delete_selected(&mut self) {
        let Some(node) = self.selected.and_then(|index| self.sim.nodes().get(index)) else {
            self.message = Some("Nothing selected".to_string());
            return;
        };
        if node.level == 0 {
            self.message = Some("The root topic cannot be deleted".to_string());
            return;
        }
        let id = node.id.clone();
        self.controller.open_delete_dialog(&self.tree, &id);
    }

    /// Applies the outcome of a confirmed dialog.
    ///
    /// Edits that no longer resolve, because the buffer changed underneath
    /// the dialog, degrade to a status message instead of touching the
    /// document.
    ///
    /// # Errors
    ///
    /// Returns an error if the rewritten document cannot be persisted.
    pub fn dispatch(&mut self, effect: Effect) -> io::Result<()> {
        match effect {
            Effect::None => {}
            Effect::Navigate(line) => self.navigate_to(line),
            Effect::Insert { parent_id, text } => {
                let next = mutate::insert_child(&self.buffer, &self.tree, &parent_id, &text);
                if next == self.buffer {
                    self.message = Some("Nothing added: the parent heading is gone".to_string());
                } else {
                    self.apply_buffer(next)?;
                    self.message = Some(format!("Added \"{text}\""));
                }
            }
            Effect::Delete { node_id } => {
                let label =
                    navigate::find_by_id(&self.tree, &node_id).map(|node| node.text.clone());
                let next = mutate::delete_subtree(&self.buffer, &self.tree, &node_id);
                if next == self.buffer {
                    self.message = Some("Nothing deleted: the heading is gone".to_string());
                } else {
                    self.apply_buffer(next)?;
                    self.message = Some(label.map_or_else(
                        || "Deleted".to_string(),
                        |text| format!("Deleted \"{text}\""),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation)] // Config floats are human-scale tunings
fn sim_params(config: &Config) -> SimParams {
    SimParams {
        link_length: config.link_length as f32,
        repulsion: config.repulsion as f32,
        damping: config.damping as f32,
        ..SimParams::default()
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
