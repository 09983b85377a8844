//! # Cluster tree (incremental bounding-circle hierarchy)
//!
//! The [`Root`] owns a binary tree whose leaves are particles ([`Node`]) and
//! whose internal nodes ([`Cluster`]) cache a circle enclosing both children
//! and the summed mass under them. It is rebuilt incrementally: a particle
//! that moved is removed and inserted again, and only the clusters on its
//! way are recomputed.
//!
//! ## Storage
//!
//! - `nodes`: leaves, indexed by their stable slot (the same slot as the row
//!   in the shared buffer).
//! - `clusters`: arena of internal nodes addressed by [`ClusterId`]; removed
//!   clusters go to a free list and their index is reused.
//! - `ids`: particle id → slot, for external lookups.
//!
//! Parent and child edges are indices into those tables ([`TreeRef`]). A
//! broken edge is a failed lookup, reported as [`SimError::TreeCorrupted`].
//!
//! ## Insertion
//!
//! Greedy descent from the root: at each cluster, go to the child whose
//! bounding circle grows the least in area when the new leaf is added
//! (ties go left). When that child is a leaf, it is replaced by a new
//! cluster holding the old leaf and the new one.
//!
//! ## Removal
//!
//! Removing a leaf drops its parent cluster and splices the sibling into the
//! grandparent, then refreshes the grandparent's cache upward.
//!
//! ## Queries
//!
//! [`Root::search_influences`] walks the tree depth first and only descends
//! into clusters whose circle overlaps the query body. Overlapping leaves are
//! collisions; with gravity enabled, overlapping clusters heavy enough for
//! their distance are also reported as attraction sources.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::debug;

use crate::simulation::body::{does_collide, Body, Circle};
use crate::simulation::cluster::{compute_boundaries, Cluster, ClusterId, TreeRef};
use crate::simulation::error::{Result, SimError};
use crate::simulation::node::Node;
use crate::simulation::params::Parameters;
use crate::simulation::shared::SharedBuffers;
use crate::simulation::states::{Particle, ParticleId};

/// Something acting on a queried body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Influence {
    /// Overlapping leaf, by slot
    Collision(usize),
    /// Cluster attracting the body as a whole
    Gravity(ClusterId),
}

/// Counters for one call to [`Root::tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub moved: usize,
    pub collisions: usize,
    pub gravity_pulls: usize,
    pub reinserted: usize,
}

/// Increase of bounding-circle area when `node` is merged with `target`
pub fn cost_of_adding<A, B>(node: &A, target: &B) -> f64
where
    A: Body + ?Sized,
    B: Body + ?Sized,
{
    let radius_before = target.radius();
    let radius_after = compute_boundaries(node, target).radius;

    (PI * radius_after * radius_after) - (PI * radius_before * radius_before)
}

fn corrupted(message: impl Into<String>) -> SimError {
    SimError::TreeCorrupted(message.into())
}

pub struct Root {
    root: Option<TreeRef>,
    nodes: Vec<Option<Node>>,
    clusters: Vec<Option<Cluster>>,
    free_clusters: Vec<ClusterId>,
    ids: HashMap<ParticleId, usize>,
    shared: SharedBuffers,
    parameters: Parameters,
}

impl Root {
    /// Empty tree publishing into `shared`
    pub fn new(shared: SharedBuffers, parameters: Parameters) -> Self {
        Self {
            root: None,
            nodes: Vec::new(),
            clusters: Vec::new(),
            free_clusters: Vec::new(),
            ids: HashMap::new(),
            shared,
            parameters,
        }
    }

    // accessors ===========================================================================

    pub fn root(&self) -> Option<TreeRef> {
        self.root
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn shared(&self) -> &SharedBuffers {
        &self.shared
    }

    /// Number of particles added, whether or not they are currently in the tree
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn node(&self, slot: usize) -> Option<&Node> {
        self.nodes.get(slot).and_then(Option::as_ref)
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.0).and_then(Option::as_ref)
    }

    /// Live clusters, in arena order
    pub fn clusters(&self) -> impl Iterator<Item = (ClusterId, &Cluster)> + '_ {
        self.clusters
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|c| (ClusterId(i), c)))
    }

    pub fn slot_of(&self, id: ParticleId) -> Option<usize> {
        self.ids.get(&id).copied()
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.slot_of(id).and_then(|slot| self.node(slot)).map(|n| &n.particle)
    }

    pub fn particle_at(&self, slot: usize) -> Option<&Particle> {
        self.node(slot).map(|n| &n.particle)
    }

    /// Only velocity may be changed through this; moving the particle would
    /// leave its ancestors' bounds stale
    pub(crate) fn particle_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        let slot = self.slot_of(id)?;
        self.nodes.get_mut(slot).and_then(Option::as_mut).map(|n| &mut n.particle)
    }

    /// Whether the leaf at `slot` is currently part of the tree
    pub fn is_in_tree(&self, slot: usize) -> bool {
        match self.node(slot) {
            Some(node) => node.parent_cluster.is_some() || self.root == Some(TreeRef::Node(slot)),
            None => false,
        }
    }

    // add / remove ========================================================================

    /// Register `particle` at `slot`, publish its row and insert it in the tree
    pub fn add(&mut self, slot: usize, particle: Particle) -> Result<()> {
        if self.ids.contains_key(&particle.id) {
            return Err(SimError::DuplicateParticle(particle.id));
        }
        if self.node(slot).is_some() {
            return Err(SimError::SlotOccupied(slot));
        }

        // capacity is checked here, before the tables change
        self.shared.set(slot, &particle)?;

        if slot >= self.nodes.len() {
            self.nodes.resize_with(slot + 1, || None);
        }
        self.ids.insert(particle.id, slot);
        self.nodes[slot] = Some(Node::new(particle));

        self.add_to_tree(slot)
    }

    /// Insert a registered, detached leaf using the area-growth heuristic
    pub fn add_to_tree(&mut self, slot: usize) -> Result<()> {
        let particle = &self.node_ref(slot)?.particle;
        let body = Circle {
            x: particle.x,
            radius: particle.radius,
        };
        if self.is_in_tree(slot) {
            return Err(SimError::AlreadyInTree(slot));
        }
        let leaf = TreeRef::Node(slot);

        let mut current = match self.root {
            None => {
                self.root = Some(leaf);
                return Ok(());
            }
            Some(existing @ TreeRef::Node(_)) => {
                let id = self.create_and_set_parents(existing, leaf, None)?;
                self.root = Some(TreeRef::Cluster(id));
                return Ok(());
            }
            Some(TreeRef::Cluster(id)) => id,
        };

        loop {
            let cluster = *self.cluster_ref(current)?;
            let (left, _) = self.summary(cluster.left)?;
            let (right, _) = self.summary(cluster.right)?;

            let chosen = if cost_of_adding(&body, &left) <= cost_of_adding(&body, &right) {
                cluster.left
            } else {
                cluster.right
            };

            match chosen {
                TreeRef::Cluster(next) => current = next,
                TreeRef::Node(_) => {
                    let id = self.create_and_set_parents(chosen, leaf, Some(current))?;
                    self.cluster_mut(current)?.replace_child(chosen, TreeRef::Cluster(id));
                    return self.update_boundaries(current);
                }
            }
        }
    }

    /// Detach the leaf at `slot` from the tree. Detached leaves are left
    /// alone, so removing twice is harmless.
    pub fn remove_from_tree(&mut self, slot: usize) -> Result<()> {
        let leaf = TreeRef::Node(slot);
        let parent_id = self.node_ref(slot)?.parent_cluster;

        if self.root == Some(leaf) {
            self.root = None;
            self.node_mut(slot)?.parent_cluster = None;
            return Ok(());
        }

        let Some(parent_id) = parent_id else {
            debug!("slot {} is not part of the tree, nothing to remove", slot);
            return Ok(());
        };

        let parent = *self.cluster_ref(parent_id)?;
        let grandparent_id = parent.parent_cluster;
        if grandparent_id.is_none() && self.root != Some(TreeRef::Cluster(parent_id)) {
            return Err(corrupted(format!(
                "cluster {} is not the root, but its parent cluster is missing",
                parent_id.0
            )));
        }
        let sibling = parent.sibling_of(leaf).ok_or_else(|| {
            corrupted(format!("slot {} is not a child of its parent cluster {}", slot, parent_id.0))
        })?;

        match grandparent_id {
            None => {
                self.root = Some(sibling);
                self.set_parent(sibling, None)?;
            }
            Some(grandparent_id) => {
                if !self.cluster_ref(grandparent_id)?.has_child(TreeRef::Cluster(parent_id)) {
                    return Err(corrupted(format!(
                        "cluster {} is not a child of its parent cluster {}",
                        parent_id.0, grandparent_id.0
                    )));
                }
                self.cluster_mut(grandparent_id)?
                    .replace_child(TreeRef::Cluster(parent_id), sibling);
                self.set_parent(sibling, Some(grandparent_id))?;
            }
        }

        self.release_cluster(parent_id);
        self.node_mut(slot)?.parent_cluster = None;

        match grandparent_id {
            Some(grandparent_id) => self.update_boundaries(grandparent_id),
            None => Ok(()),
        }
    }

    // cluster maintenance =================================================================

    /// Allocate a cluster over `left` and `right` under `parent`, and point
    /// both children at it. The caller still has to hang the new cluster
    /// under `parent` (or make it the root) and refresh `parent`.
    pub fn create_and_set_parents(
        &mut self,
        left: TreeRef,
        right: TreeRef,
        parent: Option<ClusterId>,
    ) -> Result<ClusterId> {
        let (left_boundary, left_mass) = self.summary(left)?;
        let (right_boundary, right_mass) = self.summary(right)?;
        let boundary = compute_boundaries(&left_boundary, &right_boundary);

        let id = self.alloc_cluster(Cluster::new(left, right, parent, boundary, left_mass + right_mass));
        self.set_parent(left, Some(id))?;
        self.set_parent(right, Some(id))?;
        Ok(id)
    }

    /// Recompute the cache of `id` from its children and keep going up while
    /// anything changes
    pub fn update_boundaries(&mut self, id: ClusterId) -> Result<()> {
        let mut current = Some(id);

        while let Some(id) = current {
            let cluster = *self.cluster_ref(id)?;
            let (left, left_mass) = self.summary(cluster.left)?;
            let (right, right_mass) = self.summary(cluster.right)?;

            let boundary = compute_boundaries(&left, &right);
            let m = left_mass + right_mass;
            if boundary.x == cluster.x && boundary.radius == cluster.radius && m == cluster.m {
                break;
            }

            let cluster = self.cluster_mut(id)?;
            cluster.x = boundary.x;
            cluster.radius = boundary.radius;
            cluster.m = m;

            current = cluster.parent_cluster;
        }

        Ok(())
    }

    // queries =============================================================================

    /// Everything acting on `body`, in traversal order
    pub fn search_influences<B: Body + ?Sized>(&self, body: &B) -> Vec<Influence> {
        let mut found = Vec::new();
        let gravity = self.parameters.gravity;

        // clusters further than the body's own radius can still attract it
        let reach = Circle {
            x: body.position(),
            radius: body.radius() + self.parameters.gravity_reach.max(0.0),
        };
        let cluster_in_range = |cluster: &Cluster| {
            does_collide(cluster, body) || (gravity && does_collide(cluster, &reach))
        };

        let root_id = match self.root {
            None => return found,
            Some(TreeRef::Node(slot)) => {
                if let Some(node) = self.node(slot) {
                    if does_collide(node, body) {
                        found.push(Influence::Collision(slot));
                    }
                }
                return found;
            }
            Some(TreeRef::Cluster(id)) => id,
        };

        match self.cluster(root_id) {
            Some(root) if cluster_in_range(root) => {}
            _ => return found,
        }

        let mut stack = vec![root_id];
        while let Some(id) = stack.pop() {
            let Some(cluster) = self.cluster(id) else {
                continue;
            };

            for child in [cluster.left, cluster.right] {
                match child {
                    TreeRef::Node(slot) => {
                        if let Some(node) = self.node(slot) {
                            if does_collide(node, body) {
                                found.push(Influence::Collision(slot));
                            }
                        }
                    }
                    TreeRef::Cluster(child_id) => {
                        let Some(child_cluster) = self.cluster(child_id) else {
                            continue;
                        };
                        if !cluster_in_range(child_cluster) {
                            continue;
                        }
                        if gravity
                            && child_cluster
                                .may_influence_gravitationally(body, self.parameters.gravity_influence_ratio)
                        {
                            found.push(Influence::Gravity(child_id));
                        }
                        stack.push(child_id);
                    }
                }
            }
        }

        found
    }

    /// Ids of the particles overlapping the circle at (`x`, `y`)
    pub fn query_particles_near(&self, x: f64, y: f64, radius: f64) -> Vec<ParticleId> {
        self.search_influences(&Circle::new(x, y, radius))
            .into_iter()
            .filter_map(|influence| match influence {
                Influence::Collision(slot) => self.node(slot).map(|n| n.particle.id),
                Influence::Gravity(_) => None,
            })
            .collect()
    }

    /// Clusters on the way from the leaf at `slot` up to the root
    pub fn ancestors_of(&self, slot: usize) -> Vec<ClusterId> {
        let mut ancestors = Vec::new();
        let mut current = self.node(slot).and_then(|n| n.parent_cluster);
        while let Some(id) = current {
            ancestors.push(id);
            current = self.cluster(id).and_then(|c| c.parent_cluster);
        }
        ancestors
    }

    // tick ================================================================================

    /// Advance every particle by `elapsed` seconds, in slot order.
    ///
    /// Each particle is integrated, then every influence found for it is
    /// applied in traversal order. A particle that moved or was influenced is
    /// reinserted (its best place in the tree depends on where it is now) and
    /// its row is republished.
    pub fn tick(&mut self, elapsed: f64) -> Result<TickStats> {
        let params = self.parameters;
        let mut stats = TickStats::default();

        for slot in 0..self.nodes.len() {
            let Some(node) = self.nodes[slot].as_mut() else {
                continue;
            };

            let moved = node.particle.integrate(elapsed, params.min_velocity);
            let body = node.particle.clone();
            if moved {
                stats.moved += 1;
            }

            let influences = self.search_influences(&body);
            let ancestors = if influences.iter().any(|i| matches!(i, Influence::Gravity(_))) {
                self.ancestors_of(slot)
            } else {
                Vec::new()
            };

            let mut influenced = false;
            for influence in influences {
                match influence {
                    Influence::Collision(other) => {
                        let (this, that) = self.particle_pair_mut(slot, other)?;
                        this.update_from_collision(that, elapsed, &params);
                        stats.collisions += 1;
                        influenced = true;
                    }
                    Influence::Gravity(id) => {
                        // a subtree containing the particle is not an outside source
                        if ancestors.contains(&id) {
                            continue;
                        }
                        let source = self.cluster_ref(id)?.boundary();
                        self.node_mut(slot)?
                            .particle
                            .apply_gravitational_influence(&source, elapsed, &params);
                        stats.gravity_pulls += 1;
                        influenced = true;
                    }
                }
            }

            if moved || influenced {
                self.remove_from_tree(slot)?;
                self.add_to_tree(slot)?;
                self.publish(slot)?;
                stats.reinserted += 1;
            }
        }

        Ok(stats)
    }

    /// Write the row of `slot` into the shared buffer
    pub fn publish(&self, slot: usize) -> Result<()> {
        let node = self.node_ref(slot)?;
        self.shared.set(slot, &node.particle)
    }

    // invariants ==========================================================================

    /// Walk the whole tree and check every edge and every cached value.
    ///
    /// Checks that parent and child links agree, that each cluster's cache
    /// equals a fresh computation from its children, that both children fit
    /// inside the cluster's circle, and that no cluster is unreachable.
    pub fn check_invariants(&self) -> Result<()> {
        let Some(root) = self.root else {
            if let Some((id, _)) = self.clusters().next() {
                return Err(corrupted(format!("tree is empty but cluster {} is alive", id.0)));
            }
            return Ok(());
        };

        if self.parent_of(root)?.is_some() {
            return Err(corrupted("root has a parent"));
        }

        let mut visited_clusters = 0;
        let mut stack = vec![root];
        while let Some(r) = stack.pop() {
            let TreeRef::Cluster(id) = r else {
                continue;
            };
            visited_clusters += 1;
            let cluster = *self.cluster_ref(id)?;

            for child in [cluster.left, cluster.right] {
                if child == r {
                    return Err(corrupted(format!("cluster {} is its own child", id.0)));
                }
                if self.parent_of(child)? != Some(id) {
                    return Err(corrupted(format!("child {:?} does not point back to cluster {}", child, id.0)));
                }
                stack.push(child);
            }

            let (left, left_mass) = self.summary(cluster.left)?;
            let (right, right_mass) = self.summary(cluster.right)?;
            let fresh = compute_boundaries(&left, &right);
            if fresh != cluster.boundary() || left_mass + right_mass != cluster.m {
                return Err(corrupted(format!("cluster {} has a stale cache", id.0)));
            }

            let tolerance = 1e-9 * cluster.radius.abs().max(1.0);
            for child in [left, right] {
                let reach = (child.x - cluster.x).norm() + child.radius;
                if reach > cluster.radius + tolerance {
                    return Err(corrupted(format!("cluster {} does not enclose its children", id.0)));
                }
            }
        }

        let live_clusters = self.clusters().count();
        if visited_clusters != live_clusters {
            return Err(corrupted(format!(
                "{} clusters are alive but only {} are reachable",
                live_clusters, visited_clusters
            )));
        }

        Ok(())
    }

    // helpers =============================================================================

    fn node_ref(&self, slot: usize) -> Result<&Node> {
        self.node(slot).ok_or(SimError::UnknownSlot(slot))
    }

    fn node_mut(&mut self, slot: usize) -> Result<&mut Node> {
        self.nodes
            .get_mut(slot)
            .and_then(Option::as_mut)
            .ok_or(SimError::UnknownSlot(slot))
    }

    fn cluster_ref(&self, id: ClusterId) -> Result<&Cluster> {
        self.cluster(id)
            .ok_or_else(|| corrupted(format!("cluster {} does not exist", id.0)))
    }

    fn cluster_mut(&mut self, id: ClusterId) -> Result<&mut Cluster> {
        self.clusters
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| corrupted(format!("cluster {} does not exist", id.0)))
    }

    /// Bounding circle and mass of a leaf or a cluster
    fn summary(&self, r: TreeRef) -> Result<(Circle, f64)> {
        match r {
            TreeRef::Node(slot) => {
                let particle = &self
                    .node(slot)
                    .ok_or_else(|| corrupted(format!("tree references unknown slot {}", slot)))?
                    .particle;
                Ok((
                    Circle {
                        x: particle.x,
                        radius: particle.radius,
                    },
                    particle.m,
                ))
            }
            TreeRef::Cluster(id) => {
                let cluster = self.cluster_ref(id)?;
                Ok((cluster.boundary(), cluster.m))
            }
        }
    }

    fn parent_of(&self, r: TreeRef) -> Result<Option<ClusterId>> {
        match r {
            TreeRef::Node(slot) => Ok(self.node_ref(slot)?.parent_cluster),
            TreeRef::Cluster(id) => Ok(self.cluster_ref(id)?.parent_cluster),
        }
    }

    fn set_parent(&mut self, r: TreeRef, parent: Option<ClusterId>) -> Result<()> {
        match r {
            TreeRef::Node(slot) => self.node_mut(slot)?.parent_cluster = parent,
            TreeRef::Cluster(id) => self.cluster_mut(id)?.parent_cluster = parent,
        }
        Ok(())
    }

    fn alloc_cluster(&mut self, cluster: Cluster) -> ClusterId {
        match self.free_clusters.pop() {
            Some(id) => {
                self.clusters[id.0] = Some(cluster);
                id
            }
            None => {
                self.clusters.push(Some(cluster));
                ClusterId(self.clusters.len() - 1)
            }
        }
    }

    fn release_cluster(&mut self, id: ClusterId) {
        if let Some(slot) = self.clusters.get_mut(id.0) {
            if slot.take().is_some() {
                self.free_clusters.push(id);
            }
        }
    }

    /// Two distinct particles borrowed mutably at once
    fn particle_pair_mut(&mut self, a: usize, b: usize) -> Result<(&mut Particle, &mut Particle)> {
        if a == b {
            return Err(corrupted(format!("slot {} collided with itself", a)));
        }
        if a.max(b) >= self.nodes.len() {
            return Err(SimError::UnknownSlot(a.max(b)));
        }

        let (low, high) = self.nodes.split_at_mut(a.max(b));
        let first = low[a.min(b)].as_mut().ok_or(SimError::UnknownSlot(a.min(b)))?;
        let second = high[0].as_mut().ok_or(SimError::UnknownSlot(a.max(b)))?;

        if a < b {
            Ok((&mut first.particle, &mut second.particle))
        } else {
            Ok((&mut second.particle, &mut first.particle))
        }
    }
}

impl std::fmt::Debug for Root {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Root")
            .field("root", &self.root)
            .field("particles", &self.ids.len())
            .field("clusters", &self.clusters().count())
            .finish()
    }
}

#[cfg(test)]
impl Root {
    /// Give the leaf at `slot` a parent cluster that is not in the arena
    pub(crate) fn link_to_missing_cluster(&mut self, slot: usize) {
        let missing = ClusterId(self.clusters.len() + 1);
        if let Ok(node) = self.node_mut(slot) {
            node.parent_cluster = Some(missing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::{Material, NVec2};

    /// a(0,0), b(100,0), c(101,0): K0(a, K1(b, c))
    fn three_leaves() -> (Root, ClusterId, ClusterId) {
        let material = Material { id: 0, mass: 1.0 };
        let mut root = Root::new(SharedBuffers::new(3), Parameters::default());
        for (slot, x) in [0.0, 100.0, 101.0].into_iter().enumerate() {
            let particle = Particle::new(ParticleId(slot as u32), NVec2::new(x, 0.0), 1.0, &material);
            root.add(slot, particle).unwrap();
        }

        let Some(TreeRef::Cluster(k0)) = root.root() else {
            panic!("expected a cluster at the root");
        };
        let TreeRef::Cluster(k1) = root.cluster(k0).unwrap().right else {
            panic!("expected (b, c) on the right");
        };
        (root, k0, k1)
    }

    fn assert_corrupted(result: Result<()>) {
        assert!(
            matches!(result, Err(SimError::TreeCorrupted(_))),
            "expected a corrupted tree, got {:?}",
            result
        );
    }

    #[test]
    fn detached_non_root_cluster_is_reported() {
        let (mut root, k0, k1) = three_leaves();
        root.cluster_mut(k1).unwrap().parent_cluster = None;

        assert_corrupted(root.remove_from_tree(2));

        // nothing was touched
        assert_eq!(root.root(), Some(TreeRef::Cluster(k0)));
        assert!(root.cluster(k1).is_some());
        assert_eq!(root.node(2).unwrap().parent_cluster, Some(k1));
    }

    #[test]
    fn grandparent_without_the_parent_is_reported() {
        let (mut root, k0, k1) = three_leaves();
        root.cluster_mut(k0).unwrap().right = TreeRef::Node(1);

        assert_corrupted(root.remove_from_tree(2));

        assert!(root.cluster(k1).is_some());
        assert_eq!(root.cluster(k1).unwrap().right, TreeRef::Node(2));
        assert_eq!(root.node(2).unwrap().parent_cluster, Some(k1));
    }

    #[test]
    fn leaf_missing_from_its_parent_is_reported() {
        let (mut root, k0, _) = three_leaves();
        root.node_mut(2).unwrap().parent_cluster = Some(k0);

        assert_corrupted(root.remove_from_tree(2));
        assert_eq!(root.cluster(k0).unwrap().left, TreeRef::Node(0));
    }

    #[test]
    fn corrupted_links_fail_the_invariant_check() {
        let (mut root, _, k1) = three_leaves();
        root.check_invariants().unwrap();

        root.cluster_mut(k1).unwrap().parent_cluster = None;
        assert!(matches!(root.check_invariants(), Err(SimError::TreeCorrupted(_))));
    }
}
