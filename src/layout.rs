//! Force-directed layout for the heading graph.
//!
//! The tree flattens into parallel node and link arrays, then a
//! [`Simulation`] owns those arrays and steps them toward equilibrium:
//! inverse-square repulsion between every pair, spring attraction along
//! links, a weak pull toward the origin, and a collision push that keeps
//! circles from overlapping. Each simulation belongs to exactly one parse
//! of the buffer; a rebuild replaces it wholesale rather than patching
//! positions in place.

use serde::{Deserialize, Serialize};

use crate::heading::HeadingNode;

/// Ticks a simulation stays hot after construction, a pin, or a reheat,
/// regardless of measured energy.
const WARMUP_TICKS: u16 = 40;

/// Floor for pairwise distances so coincident nodes repel instead of
/// dividing by zero.
const MIN_DISTANCE: f32 = 0.01;

/// Clearance added between circle edges before collision pushes apply.
const COLLIDE_PAD: f32 = 1.0;

/// Extra slack around a circle when hit-testing pointer positions.
const HIT_SLACK: f32 = 2.0;

/// Seed ring spacing as a multiple of the resting link length.
const RING_SCALE: f32 = 1.6;

#[derive(Clone, Debug)]
/// One renderable node of the flattened graph.
pub struct GraphNode {
    /// Identifier copied from the originating heading node.
    pub id: String,
    /// Title shown beside the circle; empty for the root.
    pub label: String,
    /// Heading depth, 0 for the root.
    pub level: usize,
    /// Buffer line the heading came from; 0 sentinel for the root.
    pub line: usize,
    /// World-space position.
    pub x: f32,
    /// World-space position.
    pub y: f32,
    /// Velocity carried between ticks.
    pub vx: f32,
    /// Velocity carried between ticks.
    pub vy: f32,
    /// Pinned nodes hold their position and skip integration entirely.
    pub pinned: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Parent-to-child edge, by index into the node array.
pub struct GraphLink {
    /// Index of the parent node.
    pub source: usize,
    /// Index of the child node.
    pub target: usize,
}

#[derive(Clone, Copy, Debug)]
/// Tuning constants for one simulation.
pub struct SimParams {
    /// Resting length of every link spring.
    pub link_length: f32,
    /// Spring stiffness applied to link stretch.
    pub spring: f32,
    /// Pair repulsion strength, divided by squared distance.
    pub repulsion: f32,
    /// Pull toward the origin, proportional to displacement.
    pub centering: f32,
    /// Fraction of circle overlap corrected per tick.
    pub collision: f32,
    /// Velocity retained after each tick, below 1.
    pub damping: f32,
    /// Upper bound on per-tick movement, in world units.
    pub max_step: f32,
    /// Per-node kinetic energy below which the layout counts as settled.
    pub settle_threshold: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            link_length: 14.0,
            spring: 0.06,
            repulsion: 600.0,
            centering: 0.015,
            collision: 0.35,
            damping: 0.85,
            max_step: 4.0,
            settle_threshold: 0.02,
        }
    }
}

#[must_use]
#[allow(clippy::cast_precision_loss)] // Levels never exceed 6
/// Circle radius for a heading depth; shallower headings draw larger.
pub fn radius_for_level(level: usize) -> f32 {
    (18.0 - 2.0 * level as f32).max(6.0)
}

#[must_use]
/// Flattens a heading tree into node and link arrays in depth-first
/// document order, so a parent's index always precedes its children's.
pub fn flatten(tree: &HeadingNode) -> (Vec<GraphNode>, Vec<GraphLink>) {
    let mut nodes = Vec::new();
    let mut links = Vec::new();
    flatten_into(tree, None, &mut nodes, &mut links);
    (nodes, links)
}

fn flatten_into(
    node: &HeadingNode,
    parent: Option<usize>,
    nodes: &mut Vec<GraphNode>,
    links: &mut Vec<GraphLink>,
) {
    let index = nodes.len();
    nodes.push(GraphNode {
        id: node.id.clone(),
        label: node.text.clone(),
        level: node.level,
        line: node.line,
        x: 0.0,
        y: 0.0,
        vx: 0.0,
        vy: 0.0,
        pinned: false,
    });
    if let Some(parent) = parent {
        links.push(GraphLink {
            source: parent,
            target: index,
        });
    }
    for child in &node.children {
        flatten_into(child, Some(index), nodes, links);
    }
}

#[allow(clippy::cast_precision_loss)] // Subtree sizes and levels stay small
/// Deterministic starting positions: each node sits on a ring scaled by its
/// level, inside an angular span carved out of its parent's span in
/// proportion to subtree size. Identical documents always seed identically.
fn seed_positions(nodes: &mut [GraphNode], links: &[GraphLink], ring: f32) {
    let count = nodes.len();
    let mut sizes = vec![1_usize; count];
    for link in links.iter().rev() {
        sizes[link.source] += sizes[link.target];
    }
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    for link in links {
        children[link.source].push(link.target);
    }

    let mut spans = vec![(0.0_f32, std::f32::consts::TAU); count];
    for index in 0..count {
        let (start, width) = spans[index];
        let total: usize = children[index].iter().map(|child| sizes[*child]).sum();
        let mut at = start;
        for child in &children[index] {
            let share = width * sizes[*child] as f32 / total.max(1) as f32;
            spans[*child] = (at, share);
            at += share;
        }
    }

    for (index, node) in nodes.iter_mut().enumerate() {
        if node.level == 0 {
            continue;
        }
        let (start, width) = spans[index];
        let angle = start + width / 2.0;
        let radius = ring * node.level as f32;
        node.x = radius * angle.cos();
        node.y = radius * angle.sin();
    }
}

#[derive(Debug)]
/// Owned physics state for one parse of the buffer.
pub struct Simulation {
    nodes: Vec<GraphNode>,
    links: Vec<GraphLink>,
    params: SimParams,
    warmup: u16,
}

impl Simulation {
    #[must_use]
    /// Builds a hot simulation from a heading tree.
    pub fn new(tree: &HeadingNode, params: SimParams) -> Self {
        let (mut nodes, links) = flatten(tree);
        seed_positions(&mut nodes, &links, params.link_length * RING_SCALE);
        Self {
            nodes,
            links,
            params,
            warmup: WARMUP_TICKS,
        }
    }

    #[must_use]
    /// Nodes in flatten order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    #[must_use]
    /// Parent-to-child links, by node index.
    pub fn links(&self) -> &[GraphLink] {
        &self.links
    }

    #[must_use]
    /// Index of the node carrying `id`, if it exists in this simulation.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    /// Advances the layout by one step.
    ///
    /// Forces accumulate for every node, then velocities integrate with
    /// damping and a per-tick step clamp. Pinned nodes contribute forces to
    /// their neighbours but do not themselves move.
    pub fn tick(&mut self) {
        let count = self.nodes.len();
        let mut forces = vec![(0.0_f32, 0.0_f32); count];

        for i in 0..count {
            for j in (i + 1)..count {
                let dx = self.nodes[i].x - self.nodes[j].x;
                let dy = self.nodes[i].y - self.nodes[j].y;
                let dist2 = (dx * dx + dy * dy).max(MIN_DISTANCE * MIN_DISTANCE);
                let dist = dist2.sqrt();
                let ux = dx / dist;
                let uy = dy / dist;

                let push = self.params.repulsion / dist2;
                forces[i].0 += ux * push;
                forces[i].1 += uy * push;
                forces[j].0 -= ux * push;
                forces[j].1 -= uy * push;

                let clearance = radius_for_level(self.nodes[i].level)
                    + radius_for_level(self.nodes[j].level)
                    + COLLIDE_PAD;
                if dist < clearance {
                    let correction = (clearance - dist) * self.params.collision;
                    forces[i].0 += ux * correction;
                    forces[i].1 += uy * correction;
                    forces[j].0 -= ux * correction;
                    forces[j].1 -= uy * correction;
                }
            }
        }

        for link in &self.links {
            let source = &self.nodes[link.source];
            let target = &self.nodes[link.target];
            let dx = target.x - source.x;
            let dy = target.y - source.y;
            let dist = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
            let pull = self.params.spring * (dist - self.params.link_length);
            let fx = dx / dist * pull;
            let fy = dy / dist * pull;
            forces[link.source].0 += fx;
            forces[link.source].1 += fy;
            forces[link.target].0 -= fx;
            forces[link.target].1 -= fy;
        }

        for (node, force) in self.nodes.iter().zip(forces.iter_mut()) {
            force.0 -= node.x * self.params.centering;
            force.1 -= node.y * self.params.centering;
        }

        for (node, force) in self.nodes.iter_mut().zip(&forces) {
            if node.pinned {
                node.vx = 0.0;
                node.vy = 0.0;
                continue;
            }
            node.vx = (node.vx + force.0) * self.params.damping;
            node.vy = (node.vy + force.1) * self.params.damping;
            let step = (node.vx * node.vx + node.vy * node.vy).sqrt();
            if step > self.params.max_step {
                let scale = self.params.max_step / step;
                node.vx *= scale;
                node.vy *= scale;
            }
            node.x += node.vx;
            node.y += node.vy;
        }

        self.warmup = self.warmup.saturating_sub(1);
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Node counts are tiny
    /// Whether total kinetic energy has dropped below the settle threshold
    /// and the warmup window has elapsed.
    pub fn is_settled(&self) -> bool {
        if self.warmup > 0 {
            return false;
        }
        let energy: f32 = self
            .nodes
            .iter()
            .filter(|node| !node.pinned)
            .map(|node| node.vx * node.vx + node.vy * node.vy)
            .sum();
        energy < self.params.settle_threshold * self.nodes.len() as f32
    }

    /// Forces the simulation back into motion for a warmup window.
    pub fn reheat(&mut self) {
        self.warmup = WARMUP_TICKS;
    }

    /// Pins a node at a position, zeroing its velocity. Pinning keeps the
    /// simulation hot so neighbours keep responding to the held node.
    pub fn pin(&mut self, index: usize, x: f32, y: f32) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.x = x;
            node.y = y;
            node.vx = 0.0;
            node.vy = 0.0;
            node.pinned = true;
        }
        self.warmup = WARMUP_TICKS;
    }

    /// Releases a pinned node back to the forces and reheats.
    pub fn release(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pinned = false;
        }
        self.reheat();
    }

    #[must_use]
    /// First node whose circle (plus a little slack) covers a world-space
    /// point.
    pub fn node_at(&self, x: f32, y: f32) -> Option<usize> {
        self.nodes.iter().position(|node| {
            let dx = node.x - x;
            let dy = node.y - y;
            let reach = radius_for_level(node.level) + HIT_SLACK;
            dx * dx + dy * dy <= reach * reach
        })
    }

    #[must_use]
    /// Position snapshot with links rewritten to node identifiers, suitable
    /// for serialization.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self
                .nodes
                .iter()
                .map(|node| SnapshotNode {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    level: node.level,
                    line: node.line,
                    x: node.x,
                    y: node.y,
                })
                .collect(),
            links: self
                .links
                .iter()
                .map(|link| SnapshotLink {
                    source: self.nodes[link.source].id.clone(),
                    target: self.nodes[link.target].id.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Serializable picture of a simulation's nodes and links.
pub struct GraphSnapshot {
    /// Nodes with their current positions.
    pub nodes: Vec<SnapshotNode>,
    /// Links by node identifier rather than index.
    pub links: Vec<SnapshotLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One node of a [`GraphSnapshot`].
pub struct SnapshotNode {
    /// Node identifier.
    pub id: String,
    /// Heading title; empty for the root.
    pub label: String,
    /// Heading depth.
    pub level: usize,
    /// Originating buffer line.
    pub line: usize,
    /// World-space position.
    pub x: f32,
    /// World-space position.
    pub y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One edge of a [`GraphSnapshot`].
pub struct SnapshotLink {
    /// Identifier of the parent node.
    pub source: String,
    /// Identifier of the child node.
    pub target: String,
}

#[cfg(test)]
#[path = "tests/layout.rs"]
mod tests;
