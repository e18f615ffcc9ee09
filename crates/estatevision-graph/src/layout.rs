use crate::graph::{Graph, NodeIndex, Positions, Vec2};
use estatevision_core::Spacing;
use std::collections::HashMap;
use std::f32::consts::TAU;
use std::time::Instant;

pub trait Layouter {
    /// Relax `positions` in place. Nodes without an entry are left out of the pass.
    fn execute(&self, graph: &Graph, spacing: Spacing, positions: &mut Positions);
}

/// Force-directed relaxation for small ownership graphs.
///
/// Every pass evaluates all node pairs, so the cost is `O(n² · iterations)`. That is
/// well under a frame for the few dozen nodes an ownership chain produces; much larger
/// graphs would need a spatial index or chunked iterations, neither of which is done here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceLayout {
    pub iterations: usize,
    /// Radius of the circle unplaced nodes are seeded on.
    pub seed_radius: f32,
    /// Velocity multiplier applied after every integration step.
    pub damping: f32,
    /// Scale of the spring pull along edges.
    pub attraction: f32,
    /// Distances are floored at this value before dividing.
    pub min_distance: f32,
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self {
            iterations: Self::DEFAULT_ITERATIONS,
            seed_radius: Self::DEFAULT_SEED_RADIUS,
            damping: 0.8,
            attraction: 0.1,
            min_distance: 1.0,
        }
    }
}

impl ForceLayout {
    pub const DEFAULT_ITERATIONS: usize = 100;
    pub const DEFAULT_SEED_RADIUS: f32 = 150.0;

    /// Give every node that has no position yet a starting point. The root asset
    /// starts at `center`; any other node `i` of `n` goes on a circle around it at angle
    /// `2π · i / n` (insertion order).
    pub fn seed(&self, graph: &Graph, center: Vec2, positions: &mut Positions) {
        let count = graph.node_count();
        let root = graph.root().map(|node| &node.id);
        for (i, node) in graph.nodes().iter().enumerate() {
            if positions.contains_key(&node.id) {
                continue;
            }
            let position = if root == Some(&node.id) {
                center
            } else {
                let angle = i as f32 / count as f32 * TAU;
                center + Vec2::from_angle(angle) * self.seed_radius
            };
            positions.insert(node.id.clone(), position);
        }
    }

    /// Drop every position and seed the whole graph again.
    pub fn reseed(&self, graph: &Graph, center: Vec2, positions: &mut Positions) {
        positions.clear();
        self.seed(graph, center, positions);
    }

    pub fn simulation<'a>(
        &self,
        graph: &'a Graph,
        spacing: Spacing,
        positions: &Positions,
    ) -> ForceSimulation<'a> {
        ForceSimulation::new(*self, graph, spacing, positions)
    }
}

impl Layouter for ForceLayout {
    fn execute(&self, graph: &Graph, spacing: Spacing, positions: &mut Positions) {
        let started = Instant::now();
        let mut simulation = self.simulation(graph, spacing, positions);
        simulation.run_to_end();
        let placed = simulation.node_count();
        simulation.write_back(positions);
        tracing::debug!(
            "Force layout: {} nodes, {} iterations at spacing {} in {:?}",
            placed,
            self.iterations,
            spacing,
            started.elapsed()
        );
    }
}

/// One layout pass, advanced an iteration at a time.
///
/// Velocities exist only for the lifetime of the simulation. A host that cannot afford
/// to block can call [`ForceSimulation::step`] a few times per frame and write the
/// result back when [`ForceSimulation::is_finished`] turns true.
pub struct ForceSimulation<'a> {
    graph: &'a Graph,
    params: ForceLayout,
    spacing: f32,
    members: Vec<NodeIndex>,
    springs: Vec<(usize, usize)>,
    position: Vec<Vec2>,
    velocity: Vec<Vec2>,
    done: usize,
}

impl<'a> ForceSimulation<'a> {
    fn new(params: ForceLayout, graph: &'a Graph, spacing: Spacing, positions: &Positions) -> Self {
        let mut members = Vec::with_capacity(graph.node_count());
        let mut position = Vec::with_capacity(graph.node_count());
        let mut slot_of: HashMap<NodeIndex, usize> = HashMap::new();

        for idx in graph.node_indices() {
            let node = &graph[idx];
            let Some(&pos) = positions.get(&node.id) else {
                tracing::debug!("Node {} has no position; leaving it out of the layout", node.id);
                continue;
            };
            slot_of.insert(idx, members.len());
            members.push(idx);
            position.push(pos);
        }

        let springs = graph
            .edges()
            .iter()
            .filter_map(|edge| {
                let (from, to) = graph.resolve_edge(edge)?;
                Some((*slot_of.get(&from)?, *slot_of.get(&to)?))
            })
            .collect();

        let velocity = vec![Vec2::ZERO; members.len()];
        Self {
            graph,
            params,
            spacing: spacing.get(),
            members,
            springs,
            position,
            velocity,
            done: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.members.len()
    }

    pub fn iterations_done(&self) -> usize {
        self.done
    }

    pub fn is_finished(&self) -> bool {
        self.done >= self.params.iterations
    }

    /// Advance one iteration. Returns `false` once the pass is complete.
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.apply_repulsion();
        self.apply_attraction();
        self.integrate();
        self.done += 1;
        true
    }

    pub fn run_to_end(&mut self) {
        while self.step() {}
    }

    pub fn write_back(&self, positions: &mut Positions) {
        for (slot, &idx) in self.members.iter().enumerate() {
            positions.insert(self.graph[idx].id.clone(), self.position[slot]);
        }
    }

    fn apply_repulsion(&mut self) {
        let spacing_sq = self.spacing * self.spacing;
        let n = self.position.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = self.position[j] - self.position[i];
                let dist = delta.length().max(self.params.min_distance);
                let direction = if delta == Vec2::ZERO {
                    // Coincident nodes separate along a fixed axis.
                    Vec2::new(1.0, 0.0)
                } else {
                    delta / dist
                };
                let push = direction * (spacing_sq / (dist * dist));
                self.velocity[i] -= push;
                self.velocity[j] += push;
            }
        }
    }

    fn apply_attraction(&mut self) {
        for &(from, to) in &self.springs {
            if from == to {
                continue;
            }
            let delta = self.position[to] - self.position[from];
            let dist = delta.length().max(self.params.min_distance);
            let force = dist / self.spacing;
            let pull = delta / dist * force * self.params.attraction;
            self.velocity[from] += pull;
            self.velocity[to] -= pull;
        }
    }

    fn integrate(&mut self) {
        for (pos, vel) in self.position.iter_mut().zip(self.velocity.iter_mut()) {
            *pos += *vel;
            *vel *= self.params.damping;
        }
    }
}
