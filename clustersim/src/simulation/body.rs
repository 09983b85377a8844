//! Geometric capability shared by everything the tree can be queried with.
//!
//! A [`Body`] is a circle: a center and a radius. Particles, leaves and
//! clusters all expose one so collision predicates never need to know which
//! of them they are looking at.

use crate::simulation::states::{NVec2, ParticleId};

pub trait Body {
    fn position(&self) -> NVec2;

    fn radius(&self) -> f64;

    /// Identity of the particle behind this body, if there is one
    fn body_id(&self) -> Option<ParticleId> {
        None
    }
}

/// Plain circle without identity, used for point queries and cluster bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: NVec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            x: NVec2::new(x, y),
            radius,
        }
    }
}

impl Body for Circle {
    fn position(&self) -> NVec2 {
        self.x
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

/// Euclidean distance between the two centers
pub fn distance_between_centers<A, B>(a: &A, b: &B) -> f64
where
    A: Body + ?Sized,
    B: Body + ?Sized,
{
    (a.position() - b.position()).norm()
}

/// Strict overlap test: touching circles do not collide, and a body never
/// collides with itself (same object, or same particle id)
pub fn does_collide<A, B>(a: &A, b: &B) -> bool
where
    A: Body + ?Sized,
    B: Body + ?Sized,
{
    if is_same_body(a, b) {
        return false;
    }

    let distance = distance_between_centers(a, b);
    if distance >= a.radius() + b.radius() {
        return false;
    }

    true
}

fn is_same_body<A, B>(a: &A, b: &B) -> bool
where
    A: Body + ?Sized,
    B: Body + ?Sized,
{
    let same_object = std::ptr::eq((a as *const A).cast::<()>(), (b as *const B).cast::<()>());
    match (a.body_id(), b.body_id()) {
        (Some(id_a), Some(id_b)) => same_object || id_a == id_b,
        _ => same_object,
    }
}
