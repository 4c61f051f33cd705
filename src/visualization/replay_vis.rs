//! Bevy viewer for a loaded snapshot sequence.
//!
//! One implementation serves both 2D and 3D runs: particles are unlit spheres
//! in a 3D scene, and [`Dim`] only selects the camera (orthographic top-down
//! for 2D, perspective for 3D) and whether axis markers are drawn. All frame
//! logic lives in [`Playback`]; the systems here tick it on a fixed-interval
//! timer and rebuild transforms, colors, trails, and the HUD from whatever
//! frame is current.

use std::time::Duration;

use bevy::math::primitives::{Cuboid, Sphere};
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;

use crate::error::ReplayError;
use crate::playback::bounds::{compute_bounds, ReplayBounds};
use crate::playback::state::Playback;
use crate::playback::trail::TrailSet;
use crate::snapshot::states::{Dim, NVec3, Snapshot};
use crate::visualization::color::{gradient, speed_color, trail_color};

/// Component tagging each sphere with its particle index into the snapshots
#[derive(Component)]
struct ParticleIndex(pub usize);

/// Component tagging the timestep/time label
#[derive(Component)]
struct HudLabel;

/// Fraction of the scene extent added around the data on each side
const FRAME_PAD: f32 = 0.05;

/// Number of swatches in the velocity legend's gradient bar
const LEGEND_STEPS: usize = 16;

#[derive(Resource)]
struct Replay {
    snapshots: Vec<Snapshot>,
    dim: Dim,
    bounds: ReplayBounds,
    playback: Playback,
}

#[derive(Resource)]
struct FrameTimer(Timer);

/// Run the replay window until the user closes it.
///
/// Computes the fixed bounds and color normalization up front, then hands
/// control to bevy's event loop; the animation advances once per
/// `interval_ms` and stops on the last frame.
pub fn run_replay(snapshots: Vec<Snapshot>, dim: Dim, interval_ms: u64) -> Result<(), ReplayError> {
    let bounds = compute_bounds(&snapshots)?;
    let particles = snapshots[0].len();
    let playback = Playback::new(snapshots.len(), particles, TrailSet::DEFAULT_LENGTH);

    log::info!(
        "starting {} replay: {} frames, {} particles, {} ms per frame",
        dim,
        snapshots.len(),
        particles,
        interval_ms
    );

    App::new()
        .insert_resource(Replay {
            snapshots,
            dim,
            bounds,
            playback,
        })
        .insert_resource(FrameTimer(Timer::new(
            Duration::from_millis(interval_ms),
            TimerMode::Repeating,
        )))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: format!("N-body replay ({dim})"),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .add_systems(Startup, setup_scene)
        .add_systems(
            Update,
            (advance_frame, sync_particles, draw_trails, update_hud).chain(),
        )
        .run();

    Ok(())
}

/// Largest span across the axes that carry data, floor-clamped so a
/// degenerate (single-point) run still gets a usable scene scale.
fn scene_extent(bounds: &ReplayBounds, dim: Dim) -> f32 {
    let extent = bounds.axis[..dim.axes()]
        .iter()
        .map(|r| r.span())
        .fold(0.0, f64::max) as f32;
    extent.max(1e-3)
}

fn scene_center(bounds: &ReplayBounds) -> Vec3 {
    Vec3::new(
        bounds.axis[0].center() as f32,
        bounds.axis[1].center() as f32,
        bounds.axis[2].center() as f32,
    )
}

fn to_render(p: &NVec3) -> Vec3 {
    Vec3::new(p.x as f32, p.y as f32, p.z as f32)
}

/// Sphere radius for a particle of mass `m`, relative to the scene extent.
/// Grows with sqrt(mass) and is clamped so tiny bodies stay visible and
/// heavy ones don't swallow the scene.
fn particle_radius(m: f64, extent: f32) -> f32 {
    let r = extent * 0.012 * (m.max(0.0) as f32).sqrt();
    r.clamp(extent * 0.004, extent * 0.05)
}

/// Startup system: camera, axis markers, one sphere per particle, HUD, legend
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut gizmo_configs: ResMut<GizmoConfigStore>,
    replay: Res<Replay>,
) {
    let extent = scene_extent(&replay.bounds, replay.dim);
    let center = scene_center(&replay.bounds);

    // Thin trail lines
    let (gizmo_config, _) = gizmo_configs.config_mut::<DefaultGizmoConfigGroup>();
    gizmo_config.line_width = 1.0;

    match replay.dim {
        Dim::TwoD => {
            // Top-down orthographic view framing the fixed bounds, with a
            // proportional pad so edge particles don't sit on the border
            let pad = 1.0 + 2.0 * FRAME_PAD;
            let min_width = replay.bounds.axis[0].span() as f32 * pad;
            let min_height = replay.bounds.axis[1].span() as f32 * pad;
            commands.spawn(Camera3dBundle {
                camera: Camera {
                    clear_color: ClearColorConfig::Custom(Color::BLACK),
                    ..Default::default()
                },
                projection: OrthographicProjection {
                    scaling_mode: ScalingMode::AutoMin {
                        min_width: min_width.max(1e-3),
                        min_height: min_height.max(1e-3),
                    },
                    far: extent * 10.0,
                    ..Default::default()
                }
                .into(),
                transform: Transform::from_translation(center + Vec3::Z * extent)
                    .looking_at(center, Vec3::Y),
                ..Default::default()
            });
        }
        Dim::ThreeD => {
            commands.spawn(Camera3dBundle {
                camera: Camera {
                    clear_color: ClearColorConfig::Custom(Color::BLACK),
                    ..Default::default()
                },
                transform: Transform::from_translation(
                    center + Vec3::new(0.9, 0.7, 1.6) * extent,
                )
                .looking_at(center, Vec3::Y),
                ..Default::default()
            });

            commands.spawn(PointLightBundle {
                point_light: PointLight {
                    intensity: 1500.0,
                    range: extent * 10.0,
                    ..Default::default()
                },
                transform: Transform::from_translation(center + Vec3::new(0.5, 1.0, 1.0) * extent),
                ..Default::default()
            });

            spawn_axes(&mut commands, &mut meshes, &mut materials, center, extent);
        }
    }

    // One sphere per particle, initialized from snapshot 0
    let first = &replay.snapshots[0];
    for (i, particle) in first.particles.iter().enumerate() {
        let radius = particle_radius(particle.m, extent);
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Sphere::new(1.0).mesh()),
                material: materials.add(StandardMaterial {
                    base_color: speed_color(first.speeds[i], &replay.bounds.speed),
                    unlit: true,
                    ..Default::default()
                }),
                transform: Transform::from_translation(to_render(&particle.x))
                    .with_scale(Vec3::splat(radius)),
                ..Default::default()
            },
            ParticleIndex(i),
        ));
    }

    spawn_hud(&mut commands);
    spawn_legend(&mut commands, &replay.bounds);
}

/// Per-tick transition: advance the playback once the interval elapses.
/// At the last frame the playback goes terminal and the view freezes there.
fn advance_frame(
    time: Res<Time>,
    mut timer: ResMut<FrameTimer>,
    mut replay: ResMut<Replay>,
    mut finished_logged: Local<bool>,
) {
    timer.0.tick(time.delta());
    if !timer.0.just_finished() {
        return;
    }

    let Replay {
        snapshots,
        playback,
        ..
    } = &mut *replay;

    if playback.advance(snapshots).is_none() && !*finished_logged {
        log::info!("replay finished at frame {}", playback.total().saturating_sub(1));
        *finished_logged = true;
    }
}

/// Rebuild particle transforms, sizes, and colors from the current frame
fn sync_particles(
    replay: Res<Replay>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(&ParticleIndex, &mut Transform, &Handle<StandardMaterial>)>,
) {
    let frame = replay.playback.current().unwrap_or(0);
    let snapshot = &replay.snapshots[frame];
    let extent = scene_extent(&replay.bounds, replay.dim);

    for (ParticleIndex(i), mut transform, mat_handle) in &mut query {
        let Some(particle) = snapshot.particles.get(*i) else {
            continue;
        };
        transform.translation = to_render(&particle.x);
        transform.scale = Vec3::splat(particle_radius(particle.m, extent));

        if let Some(mat) = materials.get_mut(mat_handle) {
            mat.base_color = speed_color(snapshot.speeds[*i], &replay.bounds.speed);
        }
    }
}

/// Redraw every trail as a low-alpha polyline, oldest to newest
fn draw_trails(replay: Res<Replay>, mut gizmos: Gizmos) {
    let Some(frame) = replay.playback.current() else {
        return;
    };
    let snapshot = &replay.snapshots[frame];
    let trails = replay.playback.trails();

    for i in 0..trails.particles() {
        let color = trail_color(snapshot.speeds[i], &replay.bounds.speed);
        let mut prev: Option<Vec3> = None;
        for position in trails.particle(i) {
            let current = to_render(position);
            if let Some(start) = prev {
                gizmos.line(start, current, color);
            }
            prev = Some(current);
        }
    }
}

fn update_hud(replay: Res<Replay>, mut query: Query<&mut Text, With<HudLabel>>) {
    let frame = replay.playback.current().unwrap_or(0);
    let time = replay.snapshots[frame].t;
    for mut text in &mut query {
        text.sections[0].value = format!("timestep: {frame} | time: {time}");
    }
}

fn spawn_hud(commands: &mut Commands) {
    commands.spawn((
        TextBundle::from_section(
            String::new(),
            TextStyle {
                font_size: 20.0,
                color: Color::WHITE,
                ..Default::default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(12.0),
            ..Default::default()
        }),
        HudLabel,
    ));
}

/// Velocity legend: a vertical gradient bar labelled with the global
/// min/max speed, fast (red) at the top
fn spawn_legend(commands: &mut Commands, bounds: &ReplayBounds) {
    let label_style = TextStyle {
        font_size: 14.0,
        color: Color::WHITE,
        ..Default::default()
    };

    commands
        .spawn(NodeBundle {
            style: Style {
                position_type: PositionType::Absolute,
                right: Val::Px(12.0),
                top: Val::Px(12.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                row_gap: Val::Px(2.0),
                ..Default::default()
            },
            ..Default::default()
        })
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                format!("{:.3}", bounds.speed.max),
                label_style.clone(),
            ));
            for step in (0..LEGEND_STEPS).rev() {
                let t = step as f32 / (LEGEND_STEPS - 1) as f32;
                parent.spawn(NodeBundle {
                    style: Style {
                        width: Val::Px(14.0),
                        height: Val::Px(8.0),
                        ..Default::default()
                    },
                    background_color: BackgroundColor(gradient(t)),
                    ..Default::default()
                });
            }
            parent.spawn(TextBundle::from_section(
                format!("{:.3}", bounds.speed.min),
                label_style.clone(),
            ));
            parent.spawn(TextBundle::from_section("velocity", label_style));
        });
}

/// Axis markers for 3D scenes: three thin boxes crossing the scene center
fn spawn_axes(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    center: Vec3,
    extent: f32,
) {
    let axis_len = extent * 1.2;
    let axis_thickness = extent * 0.002;

    let axes = [
        (Vec3::X, Color::srgb(1.0, 0.0, 0.0)),
        (Vec3::Y, Color::srgb(0.0, 1.0, 0.0)),
        (Vec3::Z, Color::srgb(0.0, 0.0, 1.0)),
    ];
    for (direction, color) in axes {
        let size = direction * axis_len
            + (Vec3::ONE - direction) * axis_thickness;
        commands.spawn(PbrBundle {
            mesh: meshes.add(Cuboid::new(size.x, size.y, size.z).mesh()),
            material: materials.add(StandardMaterial {
                base_color: color,
                unlit: true,
                ..Default::default()
            }),
            transform: Transform::from_translation(center),
            ..Default::default()
        });
    }
}
