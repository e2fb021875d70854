use super::{components::*, events::*};
use crate::core::{events::LogEvent, resources::GameConfig};
use crate::data::catalog::Catalog;
use crate::inventory::{components::Inventory, events::InventoryChanged};
use crate::pool::ItemSpawner;
use crate::scene::{
    GhostBundle,
    components::*,
    physics::{Bounds, NodeQuery, overlaps_any, raycast, world_transform},
};
use bevy::prelude::*;

pub fn begin_placement(
    mut ev_begin: EventReader<BeginPlacement>,
    mut manager: ResMut<PlacementManager>,
    mut commands: Commands,
    mut log: EventWriter<LogEvent>,
    catalog: Res<Catalog>,
    sources: Query<(&Transform, &Visibility)>,
) {
    for ev in ev_begin.read() {
        let Some(def) = catalog.get(ev.item) else {
            error!("物品 {} 没有注册，无法摆放", ev.item);
            continue;
        };

        let snapshot = match ev.source {
            Some(entity) => match sources.get(entity) {
                Ok((transform, visibility)) => Some(SourceSnapshot {
                    entity,
                    transform: *transform,
                    visibility: *visibility,
                }),
                Err(_) => {
                    error!("摆放的源物体 {entity:?} 不存在");
                    continue;
                }
            },
            None => None,
        };

        let start = snapshot.map_or(Transform::IDENTITY, |s| s.transform);
        let ghost = commands.spawn(GhostBundle::new(def, start)).id();
        let session = PlacementSession::new(def.id, ghost, def.half_extents, snapshot);

        if let Err(err) = manager.begin(session) {
            warn!("无法开始摆放 {}: {err}", def.name);
            log.write(LogEvent("已经在摆放其他家具了".into()));
            commands.entity(ghost).despawn();
            continue;
        }

        if let Some(source) = snapshot {
            commands
                .entity(source.entity)
                .insert((Visibility::Hidden, Collider::disabled(def.half_extents)));
        }
        log.write(LogEvent(format!(
            "开始摆放 {}：rotate 旋转，place 确认，cancel 取消",
            def.name
        )));
    }
}

pub fn rotate_preview(
    mut ev_rotate: EventReader<RotatePreview>,
    mut manager: ResMut<PlacementManager>,
    config: Res<GameConfig>,
) {
    for ev in ev_rotate.read() {
        manager.rotate(ev.delta * config.placement.rotate_speed);
    }
}

/// 每帧：射线找落点，检查遮挡，给幽灵换颜色
pub fn update_preview(
    mut manager: ResMut<PlacementManager>,
    mut commands: Commands,
    mut appearances: Query<&mut Appearance, With<Ghost>>,
    config: Res<GameConfig>,
    viewpoints: Query<Entity, With<Viewpoint>>,
    surfaces: Query<(Entity, &Collider), With<PlacementSurface>>,
    blockers: Query<(Entity, &Collider, &Transform, &Visibility), (With<Blocking>, Without<ChildOf>)>,
    nodes: NodeQuery,
) {
    let Some(session) = manager.session() else {
        return;
    };
    let (ghost, source) = (session.ghost, session.source_entity());

    let Some(view) = viewpoints
        .single()
        .ok()
        .and_then(|v| world_transform(v, &nodes))
    else {
        return;
    };

    let hit = raycast(
        view.translation,
        *view.forward(),
        config.placement.range,
        surfaces
            .iter()
            .filter(|(_, collider)| collider.enabled)
            .filter_map(|(entity, collider)| {
                world_transform(entity, &nodes).map(|t| (entity, collider.bounds(&t)))
            }),
    );

    if let Some(hit) = hit {
        if let Some(pose) = manager.update_pose(hit.point) {
            if let Ok(mut ghost) = commands.get_entity(ghost) {
                ghost.insert(pose);
            }
        }
    }

    let Some(session) = manager.session() else {
        return;
    };
    let blocked = session.pose.is_some_and(|pose| {
        let candidate = Bounds::oriented(&pose, session.half_extents);
        overlaps_any(
            &candidate,
            blockers
                .iter()
                .filter(|(entity, collider, _, visibility)| {
                    *entity != ghost
                        && Some(*entity) != source
                        && collider.enabled
                        && **visibility != Visibility::Hidden
                })
                .map(|(_, collider, transform, _)| collider.bounds(transform)),
        )
    });
    manager.set_blocked(blocked);

    if let Ok(mut appearance) = appearances.get_mut(ghost) {
        let wanted = if blocked {
            Appearance::PreviewBlocked
        } else {
            Appearance::Preview
        };
        if *appearance != wanted {
            *appearance = wanted;
        }
    }
}

pub fn confirm_placement(
    mut ev_confirm: EventReader<ConfirmPlacement>,
    mut manager: ResMut<PlacementManager>,
    mut commands: Commands,
    mut committed: EventWriter<PlacementCommitted>,
    mut log: EventWriter<LogEvent>,
) {
    for _ in ev_confirm.read() {
        let (session, pose) = match manager.confirm() {
            Ok(confirmed) => confirmed,
            Err(PlacementError::NotPlacing) => {
                log.write(LogEvent("当前没有在摆放".into()));
                continue;
            }
            Err(err) => {
                warn!("确认摆放被拒绝: {err}");
                log.write(LogEvent(match err {
                    PlacementError::Blocked => "这里被挡住了，换个位置".into(),
                    _ => "还没有找到可以放的地面".into(),
                }));
                continue;
            }
        };

        despawn_ghost(&mut commands, session.ghost);
        if let Some(source) = session.source {
            if let Ok(mut placed) = commands.get_entity(source.entity) {
                placed.insert((
                    pose,
                    source.visibility,
                    Collider::new(session.half_extents),
                    Appearance::Original,
                ));
            }
        }

        committed.write(PlacementCommitted {
            item: session.item,
            pose,
            source: session.source_entity(),
        });
        log.write(LogEvent("家具已放置".into()));
    }
}

/// 没有源物体时从对象池生成，并扣掉背包里的一件
pub fn spawn_committed(
    mut ev_committed: EventReader<PlacementCommitted>,
    mut spawner: ItemSpawner,
    mut inventory: ResMut<Inventory>,
    mut changed: EventWriter<InventoryChanged>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_committed.read().filter(|ev| ev.source.is_none()) {
        if !inventory.has_item(ev.item, 1) {
            warn!("背包里已经没有 {}，不生成", ev.item);
            log.write(LogEvent("背包里已经没有这件家具了".into()));
            continue;
        }
        if spawner.spawn(ev.item, ev.pose).is_none() {
            continue;
        }
        inventory.remove_item(ev.item, 1);
        changed.write(InventoryChanged);
    }
}

pub fn cancel_placement(
    mut ev_cancel: EventReader<CancelPlacement>,
    mut manager: ResMut<PlacementManager>,
    mut commands: Commands,
    mut log: EventWriter<LogEvent>,
) {
    for _ in ev_cancel.read() {
        match manager.cancel() {
            Ok(session) => {
                restore(&mut commands, &session);
                log.write(LogEvent("已取消摆放".into()));
            }
            Err(_) => {
                log.write(LogEvent("当前没有在摆放".into()));
            }
        }
    }
}

/// 离开 InGame 时幽灵也要销毁
pub fn cancel_on_exit(mut manager: ResMut<PlacementManager>, mut commands: Commands) {
    if let Ok(session) = manager.cancel() {
        info!("退出时取消摆放");
        restore(&mut commands, &session);
    }
}

fn restore(commands: &mut Commands, session: &PlacementSession) {
    despawn_ghost(commands, session.ghost);
    let Some(source) = session.source else {
        return;
    };
    if let Ok(mut restored) = commands.get_entity(source.entity) {
        restored.insert((
            source.transform,
            source.visibility,
            Collider::new(session.half_extents),
            Appearance::Original,
        ));
    }
}

fn despawn_ghost(commands: &mut Commands, ghost: Entity) {
    if let Ok(mut ghost) = commands.get_entity(ghost) {
        ghost.despawn();
    }
}
