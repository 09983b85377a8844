//! Internal node of the cluster tree.
//!
//! A cluster owns exactly two children (leaves or other clusters) and caches
//! a bounding circle plus the summed mass of its subtree. The cache is only
//! written by [`Root`](crate::simulation::root::Root), which recomputes it
//! bottom-up whenever the structure under a cluster changes.
//!
//! The bounding circle is loose: its center is the midpoint of the two child
//! centers and its radius is half their distance plus the larger child
//! radius. It always encloses both children.

use crate::simulation::body::{distance_between_centers, Body, Circle};
use crate::simulation::states::NVec2;

/// Index of a cluster in the root's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub(crate) usize);

impl ClusterId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A child edge: either a leaf (by slot) or another cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeRef {
    Node(usize),
    Cluster(ClusterId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cluster {
    pub left: TreeRef,
    pub right: TreeRef,
    pub parent_cluster: Option<ClusterId>,
    pub x: NVec2, // center of the bounding circle
    pub radius: f64,
    pub m: f64, // total mass of the subtree
}

impl Cluster {
    /// Build a cluster whose cache is already filled from its children
    pub fn new(
        left: TreeRef,
        right: TreeRef,
        parent_cluster: Option<ClusterId>,
        boundary: Circle,
        m: f64,
    ) -> Self {
        Self {
            left,
            right,
            parent_cluster,
            x: boundary.x,
            radius: boundary.radius,
            m,
        }
    }

    pub fn boundary(&self) -> Circle {
        Circle {
            x: self.x,
            radius: self.radius,
        }
    }

    pub fn has_child(&self, child: TreeRef) -> bool {
        self.left == child || self.right == child
    }

    /// The other child, if `child` is one of ours
    pub fn sibling_of(&self, child: TreeRef) -> Option<TreeRef> {
        if self.left == child {
            Some(self.right)
        } else if self.right == child {
            Some(self.left)
        } else {
            None
        }
    }

    /// Swap `old` for `new`; returns false when `old` is not a child
    pub fn replace_child(&mut self, old: TreeRef, new: TreeRef) -> bool {
        if self.left == old {
            self.left = new;
        } else if self.right == old {
            self.right = new;
        } else {
            return false;
        }
        true
    }

    /// Whether this whole subtree should pull `body` as a single mass.
    /// A centroid sitting exactly on the body always qualifies.
    pub fn may_influence_gravitationally<B: Body + ?Sized>(&self, body: &B, influence_ratio: f64) -> bool {
        let distance = distance_between_centers(self, body);
        if distance == 0.0 {
            return true;
        }
        self.m / distance >= influence_ratio
    }
}

impl Body for Cluster {
    fn position(&self) -> NVec2 {
        self.x
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

/// Bounding circle enclosing both bodies: centered between them, wide enough
/// for the larger one
pub fn compute_boundaries<A, B>(left: &A, right: &B) -> Circle
where
    A: Body + ?Sized,
    B: Body + ?Sized,
{
    let left_x = left.position();
    let right_x = right.position();

    // midpoint between the two centers
    let x = left_x + (right_x - left_x) / 2.0;

    let distance = (left_x - right_x).norm();
    let radius = distance / 2.0 + left.radius().max(right.radius());

    Circle { x, radius }
}
