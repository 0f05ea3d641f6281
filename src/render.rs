//! Bevy renderer for bolts: one unlit cylinder mesh entity per segment.
//!
//! This is the concrete [`LightningRenderer`] collaborator. Segment entities
//! are real `Mesh3d` children of the world (segments carry world positions),
//! created, updated, and despawned to track each frame's output, and released
//! deterministically when a bolt is destroyed or its component removed.

use bevy::prelude::*;

use crate::attachment::Attachment;
use crate::bolt::{LightningBolt, LightningRenderer};
use crate::segment::Segment;

/// ECS wrapper around the bolt kernel. Attach to any entity; segment entities
/// are managed automatically.
#[derive(Component, Deref, DerefMut)]
pub struct Bolt(pub LightningBolt);

/// Optional: drive a bolt's attachments from two entities' global transforms
/// every frame (axis = the entity's local +X).
#[derive(Component, Clone, Copy, Debug, Reflect)]
pub struct BoltAnchors {
    pub start: Entity,
    pub end: Entity,
}

/// Marker + back-reference for segment entities spawned by the renderer.
#[derive(Component, Clone, Copy, Debug)]
pub struct BoltSegmentOf(pub Entity);

/// Per-bolt render bookkeeping. Auto-inserted on entities with a [`Bolt`].
#[derive(Component, Default)]
pub struct BoltRenderState {
    segments: Vec<SegmentVisual>,
    released: bool,
}

struct SegmentVisual {
    entity: Entity,
    material: Handle<StandardMaterial>,
}

/// Shared segment mesh (unit cylinder scaled per segment).
#[derive(Resource, Default)]
pub struct BoltAssets {
    cylinder: Option<Handle<Mesh>>,
}

/// What one tick of the kernel asked the renderer to do. Collected through the
/// [`LightningRenderer`] contract, then applied to the ECS.
#[derive(Default)]
struct FrameSink {
    frame: Option<Vec<Segment>>,
    hide: bool,
    release: bool,
}

impl LightningRenderer for FrameSink {
    fn submit(&mut self, segments: &[Segment]) {
        self.frame = Some(segments.to_vec());
    }
    fn hide(&mut self) {
        self.hide = true;
    }
    fn release(&mut self) {
        self.release = true;
    }
}

/// Auto-insert [`BoltRenderState`] for entities with a fresh [`Bolt`].
pub fn auto_insert_bolt_render_state(
    mut commands: Commands,
    query: Query<Entity, (With<Bolt>, Without<BoltRenderState>)>,
) {
    for entity in &query {
        commands.entity(entity).insert(BoltRenderState::default());
    }
}

/// Update attachments from anchor entities' global transforms.
pub fn sync_bolt_anchors(
    mut bolts: Query<(&mut Bolt, &BoltAnchors)>,
    globals: Query<&GlobalTransform>,
) {
    for (mut bolt, anchors) in &mut bolts {
        if let Ok(global) = globals.get(anchors.start) {
            match Attachment::from_global(global) {
                Ok(a) => bolt.attachment0 = a,
                Err(err) => warn!("bolt start anchor rejected: {err}"),
            }
        }
        if let Ok(global) = globals.get(anchors.end) {
            match Attachment::from_global(global) {
                Ok(a) => bolt.attachment1 = a,
                Err(err) => warn!("bolt end anchor rejected: {err}"),
            }
        }
    }
}

/// Advance every bolt by the frame delta and apply the resulting frame to the
/// segment entities: spawn missing, update live, despawn extra, hide on
/// disabled, despawn all on release.
pub fn tick_bolts(
    time: Res<Time>,
    mut commands: Commands,
    mut assets: ResMut<BoltAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut bolts: Query<(Entity, &mut Bolt, &mut BoltRenderState)>,
    mut visuals: Query<(&mut Transform, &mut Visibility), With<BoltSegmentOf>>,
) {
    let dt = time.delta_secs();

    for (bolt_entity, mut bolt, mut state) in &mut bolts {
        if state.released {
            continue;
        }

        let mut sink = FrameSink::default();
        bolt.tick(dt, &mut sink);

        if sink.release {
            for visual in state.segments.drain(..) {
                commands.entity(visual.entity).try_despawn();
            }
            state.released = true;
            continue;
        }

        if sink.hide {
            for visual in &state.segments {
                if let Ok((_, mut visibility)) = visuals.get_mut(visual.entity) {
                    *visibility = Visibility::Hidden;
                }
            }
            continue;
        }

        let Some(frame) = sink.frame else {
            continue;
        };

        // Shrink to the frame's segment count.
        while state.segments.len() > frame.len() {
            let visual = state.segments.pop().unwrap();
            commands.entity(visual.entity).try_despawn();
        }

        let mesh = assets
            .cylinder
            .get_or_insert_with(|| meshes.add(Mesh::from(Cylinder::new(0.5, 1.0))))
            .clone();

        for (i, segment) in frame.iter().enumerate() {
            let transform = segment_transform(segment);
            let alpha = 1.0 - segment.transparency;
            let color = LinearRgba::new(
                segment.color.red,
                segment.color.green,
                segment.color.blue,
                segment.color.alpha * alpha,
            );

            if let Some(visual) = state.segments.get(i) {
                if let Ok((mut t, mut visibility)) = visuals.get_mut(visual.entity) {
                    *t = transform;
                    *visibility = Visibility::Visible;
                }
                if let Some(material) = materials.get_mut(&visual.material) {
                    material.base_color = Color::LinearRgba(color);
                }
            } else {
                let material = materials.add(StandardMaterial {
                    base_color: Color::LinearRgba(color),
                    unlit: true,
                    alpha_mode: AlphaMode::Blend,
                    ..default()
                });
                let entity = commands
                    .spawn((
                        BoltSegmentOf(bolt_entity),
                        Mesh3d(mesh.clone()),
                        MeshMaterial3d(material.clone()),
                        transform,
                    ))
                    .id();
                state.segments.push(SegmentVisual { entity, material });
            }
        }
    }
}

/// Despawn segment entities whose owning bolt entity is gone. Covers despawns
/// and `Bolt` component removals that never went through `destroy`.
pub fn cleanup_bolts(
    mut commands: Commands,
    orphans: Query<(Entity, &BoltSegmentOf)>,
    bolts: Query<(), With<Bolt>>,
) {
    for (entity, owner) in &orphans {
        if bolts.get(owner.0).is_err() {
            commands.entity(entity).try_despawn();
        }
    }
}

fn segment_transform(segment: &Segment) -> Transform {
    let length = segment.length();
    Transform::from_translation(segment.midpoint())
        .with_rotation(segment.orientation)
        .with_scale(Vec3::new(
            segment.thickness.max(0.0),
            length.max(1e-5),
            segment.thickness.max(0.0),
        ))
}
