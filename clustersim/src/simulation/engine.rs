//! Simulation engine and the thread that runs it
//!
//! `Engine` is the boundary between the cluster tree and the outside world:
//! it builds the tree from a `Scenario`, advances it, and answers pointer
//! queries. `spawn_engine` moves an engine onto its own thread, ticking at
//! the configured cadence and draining a request channel between ticks. The
//! renderer only ever sees the `SharedBuffers` handle and the channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::simulation::error::{Result, SimError};
use crate::simulation::params::Parameters;
use crate::simulation::root::{Root, TickStats};
use crate::simulation::scenario::Scenario;
use crate::simulation::shared::SharedBuffers;
use crate::simulation::states::{NVec2, ParticleId};

const STATS_INTERVAL: Duration = Duration::from_secs(1);

/// Messages from the renderer to the simulation thread
#[derive(Debug)]
pub enum Request {
    /// Ids of the particles overlapping a circle, answered on `reply`
    QueryNear {
        x: f64,
        y: f64,
        radius: f64,
        reply: Sender<Vec<ParticleId>>,
    },
    /// Steer a particle toward a point at the pointer velocity
    MoveTowards { id: ParticleId, x: f64, y: f64 },
}

#[derive(Debug)]
pub struct Engine {
    root: Root,
    shared: SharedBuffers,
    parameters: Parameters,
    ticks: u64,
}

impl Engine {
    /// Build the tree from `scenario` and hand back the buffer the renderer reads
    pub fn initialize(scenario: &Scenario) -> Result<(Engine, SharedBuffers)> {
        let parameters = scenario.parameters;
        let shared = SharedBuffers::new(scenario.particles.len());
        let mut root = Root::new(shared.clone(), parameters);

        if scenario.particles.is_empty() {
            warn!("no particles to simulate, the engine will idle");
        }

        for (slot, particle) in scenario.particles.iter().enumerate() {
            root.add(slot, particle.clone())?;
        }

        info!(
            "engine initialized: {} particles, {} clusters",
            root.len(),
            root.clusters().count()
        );

        let engine = Engine {
            root,
            shared: shared.clone(),
            parameters,
            ticks: 0,
        };
        Ok((engine, shared))
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn shared(&self) -> &SharedBuffers {
        &self.shared
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick(&mut self, elapsed: f64) -> Result<TickStats> {
        let stats = self.root.tick(elapsed)?;
        self.ticks += 1;
        Ok(stats)
    }

    pub fn query_particles_near(&self, x: f64, y: f64, radius: f64) -> Vec<ParticleId> {
        self.root.query_particles_near(x, y, radius)
    }

    /// Point the particle's velocity at (`x`, `y`); unknown ids are ignored
    pub fn move_particle_towards(&mut self, id: ParticleId, x: f64, y: f64) {
        let mouse_velocity = self.parameters.mouse_velocity;
        match self.root.particle_mut(id) {
            Some(particle) => particle.set_velocity_towards(NVec2::new(x, y), mouse_velocity),
            None => debug!("move request for unknown particle {}", id),
        }
    }

    pub fn handle_request(&mut self, request: Request) {
        match request {
            Request::QueryNear { x, y, radius, reply } => {
                let ids = self.query_particles_near(x, y, radius);
                if reply.send(ids).is_err() {
                    warn!("query at ({}, {}) answered after its requester went away", x, y);
                }
            }
            Request::MoveTowards { id, x, y } => self.move_particle_towards(id, x, y),
        }
    }
}

/// Owner side of a running simulation thread
#[derive(Debug)]
pub struct EngineHandle {
    requests: Sender<Request>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<Result<u64>>>,
}

impl EngineHandle {
    /// Ask for the particles near a point; `None` once the thread is gone
    pub fn query_near(&self, x: f64, y: f64, radius: f64) -> Option<Receiver<Vec<ParticleId>>> {
        let (reply, answer) = mpsc::channel();
        self.requests
            .send(Request::QueryNear { x, y, radius, reply })
            .ok()
            .map(|_| answer)
    }

    /// Fire and forget; returns whether the thread was still listening
    pub fn move_towards(&self, id: ParticleId, x: f64, y: f64) -> bool {
        self.requests.send(Request::MoveTowards { id, x, y }).is_ok()
    }

    /// Raise the stop flag and wait for the thread; yields the number of ticks run
    pub fn stop(mut self) -> Result<u64> {
        self.stop.store(true, Ordering::Release);
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| SimError::EnginePanicked)?,
            None => Ok(0),
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Run `engine` on its own thread at its configured cadence
pub fn spawn_engine(engine: Engine) -> std::io::Result<EngineHandle> {
    let (requests, inbox) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);

    let thread = thread::Builder::new()
        .name("clustersim-engine".into())
        .spawn(move || run_loop(engine, inbox, stop_flag))?;

    Ok(EngineHandle {
        requests,
        stop,
        thread: Some(thread),
    })
}

fn run_loop(mut engine: Engine, inbox: Receiver<Request>, stop: Arc<AtomicBool>) -> Result<u64> {
    let interval = Duration::from_millis(engine.parameters.tick_interval_ms.max(1));
    info!("simulation thread started, ticking every {:?}", interval);

    let mut last_tick = Instant::now();
    let mut window_start = last_tick;
    let mut window = TickStats::default();
    let mut window_ticks = 0u64;

    while !stop.load(Ordering::Acquire) {
        loop {
            match inbox.try_recv() {
                Ok(request) => engine.handle_request(request),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("request channel closed after {} ticks, stopping", engine.ticks);
                    return Ok(engine.ticks);
                }
            }
        }

        let now = Instant::now();
        let elapsed = now.duration_since(last_tick).as_secs_f64();
        last_tick = now;

        let stats = match engine.tick(elapsed) {
            Ok(stats) => stats,
            Err(e) => {
                error!("simulation stopped after {} ticks: {}", engine.ticks, e);
                return Err(e);
            }
        };
        window.moved += stats.moved;
        window.collisions += stats.collisions;
        window.gravity_pulls += stats.gravity_pulls;
        window.reinserted += stats.reinserted;
        window_ticks += 1;

        if window_start.elapsed() >= STATS_INTERVAL {
            debug!(
                "{} ticks: moved {}, collisions {}, gravity pulls {}, reinserted {}",
                window_ticks, window.moved, window.collisions, window.gravity_pulls, window.reinserted
            );
            window = TickStats::default();
            window_ticks = 0;
            window_start = Instant::now();
        }

        let spent = now.elapsed();
        if spent < interval {
            thread::sleep(interval - spent);
        }
    }

    info!("simulation thread stopped after {} ticks", engine.ticks);
    Ok(engine.ticks)
}

/// Run the simulation without a window for `seconds`, then report
pub fn run_headless(scenario: &Scenario, seconds: f64) -> anyhow::Result<u64> {
    let (engine, shared) = Engine::initialize(scenario)?;
    let handle = spawn_engine(engine)?;

    thread::sleep(Duration::from_secs_f64(seconds.max(0.0)));

    let ticks = handle.stop()?;
    info!(
        "headless run: {} ticks in {:.1} s, {} rows published",
        ticks,
        seconds,
        shared.current_length()
    );
    Ok(ticks)
}
