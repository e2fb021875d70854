//! 极简的射线 / 重叠检测，只处理轴对齐包围盒

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;

/// 相接触不算重叠
const CONTACT_EPSILON: f32 = 1e-3;

/// 父子层级最大深度，防止错误的层级死循环
const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// 旋转 / 缩放后的盒子取外接 AABB
    pub fn oriented(transform: &Transform, half_extents: Vec3) -> Self {
        let rot = Mat3::from_quat(transform.rotation);
        let scaled = half_extents * transform.scale.abs();
        let half = rot.x_axis.abs() * scaled.x
            + rot.y_axis.abs() * scaled.y
            + rot.z_axis.abs() * scaled.z;
        Self::from_center(transform.translation, half)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x < other.max.x - CONTACT_EPSILON
            && self.max.x > other.min.x + CONTACT_EPSILON
            && self.min.y < other.max.y - CONTACT_EPSILON
            && self.max.y > other.min.y + CONTACT_EPSILON
            && self.min.z < other.max.z - CONTACT_EPSILON
            && self.max.z > other.min.z + CONTACT_EPSILON
    }

    /// slab 法求射线进入盒子的距离
    pub fn ray_distance(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let mut near = f32::NEG_INFINITY;
        let mut far = f32::INFINITY;
        for axis in 0..3 {
            let (o, d) = (origin[axis], direction[axis]);
            let (min, max) = (self.min[axis], self.max[axis]);
            if d.abs() < f32::EPSILON {
                // 与这一对面平行：起点必须在两面之间
                if o < min || o > max {
                    return None;
                }
                continue;
            }
            let t1 = (min - o) / d;
            let t2 = (max - o) / d;
            near = near.max(t1.min(t2));
            far = far.min(t1.max(t2));
        }

        if far < 0.0 || near > far {
            return None;
        }
        let hit = near.max(0.0);
        (hit <= max_distance).then_some(hit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec3,
    pub distance: f32,
}

/// 在候选盒子里找最近的命中
pub fn raycast(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    candidates: impl IntoIterator<Item = (Entity, Bounds)>,
) -> Option<RayHit> {
    let direction = direction.try_normalize()?;
    candidates
        .into_iter()
        .filter_map(|(entity, bounds)| {
            bounds
                .ray_distance(origin, direction, max_distance)
                .map(|distance| RayHit {
                    entity,
                    point: origin + direction * distance,
                    distance,
                })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// 与候选盒子是否有任何重叠
pub fn overlaps_any(bounds: &Bounds, others: impl IntoIterator<Item = Bounds>) -> bool {
    others.into_iter().any(|other| bounds.intersects(&other))
}

pub type NodeQuery<'w, 's, F = ()> =
    Query<'w, 's, (&'static Transform, Option<&'static ChildOf>), F>;

/// 沿 ChildOf 链累乘本地变换得到世界变换
pub fn world_transform<F: QueryFilter>(entity: Entity, nodes: &NodeQuery<'_, '_, F>) -> Option<Transform> {
    let (local, parent) = nodes.get(entity).ok()?;
    let mut result = *local;
    let mut next = parent.map(ChildOf::parent);

    for _ in 0..MAX_DEPTH {
        let Some(current) = next else {
            return Some(result);
        };
        let (transform, parent) = nodes.get(current).ok()?;
        result = transform.mul_transform(result);
        next = parent.map(ChildOf::parent);
    }

    warn!("层级过深，放弃计算 {entity:?} 的世界变换");
    None
}
