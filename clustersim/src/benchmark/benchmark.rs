use std::time::Instant;

use log::info;

use crate::simulation::body::Circle;
use crate::simulation::error::SimError;
use crate::simulation::params::Parameters;
use crate::simulation::root::Root;
use crate::simulation::shared::SharedBuffers;
use crate::simulation::states::{Material, NVec2, Particle, ParticleId};

const RADIUS: f64 = 3.0;

/// Helper to build `n` particles spread over a square of side `extent`
fn make_particles(n: usize, extent: f64) -> Vec<Particle> {
    let material = Material { id: 0, mass: 1.0 };

    (0u32..)
        .take(n)
        .map(|i| {
            let i_f = i as f64;
            // deterministic positions, no rand needed
            let x = NVec2::new(
                (i_f * 0.37).sin() * extent / 2.0,
                (i_f * 0.13).cos() * extent / 2.0,
            );
            Particle::new(ParticleId(i), x, RADIUS, &material)
        })
        .collect()
}

/// Same density for every n, so only the tree depth changes
fn extent_for(n: usize) -> f64 {
    (n as f64).sqrt() * RADIUS * 4.0
}

/// Helper to build a filled tree of size `n`
fn make_root(n: usize, params: Parameters) -> Result<Root, SimError> {
    let particles = make_particles(n, extent_for(n));
    let mut root = Root::new(SharedBuffers::new(n), params);
    for (slot, particle) in particles.into_iter().enumerate() {
        root.add(slot, particle)?;
    }
    Ok(root)
}

/// Average milliseconds per tick over `steps` ticks after one warm-up tick,
/// plus the leaves reinserted per tick
fn time_ticks(root: &mut Root, dt: f64, steps: usize) -> Result<(f64, usize), SimError> {
    // Warm-up
    root.tick(dt)?;

    let t0 = Instant::now();
    let mut reinserted = 0;
    for _ in 0..steps {
        reinserted += root.tick(dt)?.reinserted;
    }
    let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

    Ok((ms, reinserted / steps))
}

/// Point every particle away from the origin at `speed`
fn kick_outward(root: &mut Root, n: usize, speed: f64) {
    for id in (0u32..).take(n).map(ParticleId) {
        if let Some(particle) = root.particle_mut(id) {
            let outward = particle.x * 2.0;
            particle.set_velocity_towards(outward, speed);
        }
    }
}

/// Time to build a tree of n leaves from scratch
pub fn bench_insert() {
    info!("bench_insert: building trees of increasing size");
    println!("N,insert_ms,per_leaf_us");

    for n in [500, 1000, 2000, 4000, 8000, 16000] {
        let t0 = Instant::now();
        let root = match make_root(n, Parameters::default()) {
            Ok(root) => root,
            Err(e) => {
                println!("{},failed: {}", n, e);
                continue;
            }
        };
        let elapsed = t0.elapsed().as_secs_f64();

        println!(
            "{},{:.3},{:.3}",
            root.len(),
            elapsed * 1000.0,
            elapsed * 1.0e6 / n as f64
        );
    }
}

/// Time of one influence search per leaf, with and without gravity
pub fn bench_query() {
    info!("bench_query: one influence search per leaf");
    println!("N,collide_us,gravity_us");

    for n in [500, 1000, 2000, 4000, 8000, 16000] {
        let queries: Vec<Circle> = make_particles(n, extent_for(n))
            .iter()
            .map(|p| Circle { x: p.x, radius: p.radius })
            .collect();

        let gravity_params = Parameters {
            gravity: true,
            gravity_influence_ratio: 0.05,
            ..Parameters::default()
        };
        let (collide, gravity) = match (make_root(n, Parameters::default()), make_root(n, gravity_params)) {
            (Ok(collide), Ok(gravity)) => (collide, gravity),
            (Err(e), _) | (_, Err(e)) => {
                println!("{},failed: {}", n, e);
                continue;
            }
        };

        let t0 = Instant::now();
        let mut found = 0;
        for query in &queries {
            found += collide.search_influences(query).len();
        }
        let us_collide = t0.elapsed().as_secs_f64() * 1.0e6 / n as f64;

        let t1 = Instant::now();
        for query in &queries {
            found += gravity.search_influences(query).len();
        }
        let us_gravity = t1.elapsed().as_secs_f64() * 1.0e6 / n as f64;

        println!("{},{:.3},{:.3}", n, us_collide, us_gravity);
        // keep the searches from being optimized away
        std::hint::black_box(found);
    }
}

/// Time per tick with every particle kicked outward, so every leaf is reinserted
pub fn bench_tick() {
    info!("bench_tick: ticks with all particles moving");
    println!("N,tick_ms,reinserted");

    let steps = 5;
    let dt = 0.005;

    for n in [500, 1000, 2000, 4000, 8000] {
        let mut root = match make_root(n, Parameters::default()) {
            Ok(root) => root,
            Err(e) => {
                println!("{},failed: {}", n, e);
                continue;
            }
        };
        kick_outward(&mut root, n, 50.0);

        match time_ticks(&mut root, dt, steps) {
            Ok((ms, reinserted)) => println!("{},{:.3},{}", n, ms, reinserted),
            Err(e) => {
                println!("{},failed: {}", n, e);
                continue;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_ticks_run_on_a_moving_tree() {
        let mut root = make_root(64, Parameters::default()).unwrap();
        kick_outward(&mut root, 64, 50.0);

        let (ms, reinserted) = time_ticks(&mut root, 0.005, 3).unwrap();

        assert!(ms >= 0.0);
        assert!(reinserted > 0);
        root.check_invariants().unwrap();
    }

    #[test]
    fn failed_warm_up_tick_is_reported() {
        // a moving leaf that claims a parent cluster the arena never allocated
        let mut root = make_root(2, Parameters::default()).unwrap();
        kick_outward(&mut root, 2, 50.0);
        root.remove_from_tree(1).unwrap();
        root.link_to_missing_cluster(1);

        assert!(matches!(time_ticks(&mut root, 0.005, 3), Err(SimError::TreeCorrupted(_))));
    }
}
