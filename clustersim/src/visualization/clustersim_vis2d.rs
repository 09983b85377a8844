use std::collections::HashMap;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Mutex;

use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::math::primitives::Circle;
use bevy::window::{PrimaryWindow, WindowResolution};

use crate::simulation::engine::{spawn_engine, Engine, EngineHandle};
use crate::simulation::scenario::Scenario;
use crate::simulation::shared::SharedBuffers;
use crate::simulation::states::ParticleId;

/// Row of the shared buffer an entity draws
#[derive(Component)]
struct ParticleSlot(pub usize);

#[derive(Resource)]
struct Simulation {
    handle: EngineHandle,
    shared: SharedBuffers,
}

/// Pointer drag state: a pending pick and the particles being dragged
#[derive(Resource, Default)]
struct Pointer {
    pending: Option<Mutex<Receiver<Vec<ParticleId>>>>,
    grabbed: Vec<ParticleId>,
}

pub fn run_2d(scenario: Scenario) -> anyhow::Result<()> {
    let (engine, shared) = Engine::initialize(&scenario)?;
    let handle = spawn_engine(engine)?;

    let window = Window {
        title: "clustersim".into(),
        resolution: WindowResolution::new(scenario.width as f32, scenario.height as f32),
        ..default()
    };

    let exit = App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(window),
            ..default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(Simulation { handle, shared })
        .insert_resource(Pointer::default())
        .insert_resource(scenario)
        .add_systems(Startup, setup_particles_system)
        .add_systems(Update, (pointer_system, sync_transforms_system))
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => Err(anyhow::anyhow!("viewer exited with code {}", code)),
    }
}

fn setup_particles_system(
    mut commands: Commands,
    scenario: Res<Scenario>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    info!("viewer: drawing {} particles", scenario.particles.len());

    // 2D camera, world origin at the window center
    commands.spawn(Camera2dBundle::default());

    // one mesh for everything, one material per material id in use
    let mesh = Mesh2dHandle(meshes.add(Circle::new(scenario.radius as f32)));
    let mut palette: HashMap<u32, Handle<ColorMaterial>> = HashMap::new();

    for (slot, particle) in scenario.particles.iter().enumerate() {
        let material = palette
            .entry(particle.material_id)
            .or_insert_with(|| {
                let [r, g, b] = scenario.color_of(particle.material_id);
                materials.add(ColorMaterial::from(Color::srgb(r, g, b)))
            })
            .clone();

        commands.spawn((
            MaterialMesh2dBundle {
                mesh: mesh.clone(),
                material,
                transform: Transform::from_xyz(particle.x.x as f32, particle.x.y as f32, 0.0),
                ..Default::default()
            },
            ParticleSlot(slot),
        ));
    }
}

fn sync_transforms_system(
    simulation: Res<Simulation>,
    mut query: Query<(&ParticleSlot, &mut Transform, &mut Visibility)>,
) {
    for (ParticleSlot(slot), mut transform, mut visibility) in &mut query {
        match simulation.shared.row(*slot) {
            Some(row) => {
                transform.translation.x = row.x;
                transform.translation.y = row.y;
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

fn pointer_system(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    scenario: Res<Scenario>,
    simulation: Res<Simulation>,
    mut pointer: ResMut<Pointer>,
) {
    if buttons.just_released(MouseButton::Left) {
        pointer.pending = None;
        pointer.grabbed.clear();
        return;
    }

    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let Some(cursor) = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world_2d(camera_transform, cursor))
    else {
        return;
    };
    let (x, y) = (cursor.x as f64, cursor.y as f64);

    if buttons.just_pressed(MouseButton::Left) {
        pointer.grabbed.clear();
        pointer.pending = simulation
            .handle
            .query_near(x, y, scenario.radius)
            .map(Mutex::new);
    }

    // pick up the answer once the simulation thread has it
    let answer = match pointer.pending.as_ref().map(|pending| pending.lock()) {
        Some(Ok(receiver)) => match receiver.try_recv() {
            Ok(ids) => Some(Some(ids)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(None),
        },
        Some(Err(_)) => Some(None),
        None => None,
    };
    if let Some(ids) = answer {
        pointer.pending = None;
        if let Some(ids) = ids {
            debug!("grabbed {} particles at ({:.1}, {:.1})", ids.len(), x, y);
            pointer.grabbed = ids;
        }
    }

    if buttons.pressed(MouseButton::Left) {
        for id in &pointer.grabbed {
            simulation.handle.move_towards(*id, x, y);
        }
    }
}
