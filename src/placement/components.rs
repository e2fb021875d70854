use bevy::prelude::*;
use thiserror::Error;

use crate::data::catalog::ItemId;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    #[error("a placement session is already active")]
    AlreadyPlacing,
    #[error("no placement session is active")]
    NotPlacing,
    #[error("the preview is blocked")]
    Blocked,
    #[error("the preview has not found a surface yet")]
    NoValidPose,
}

/// 开始摆放前源物体的状态，取消时原样恢复
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceSnapshot {
    pub entity: Entity,
    pub transform: Transform,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementSession {
    pub item: ItemId,
    pub ghost: Entity,
    pub source: Option<SourceSnapshot>,
    /// 累计旋转角（度），不限范围
    pub rotation_deg: f32,
    pub blocked: bool,
    /// 生成时算一次，用来把底部贴到地面
    pub half_extents: Vec3,
    /// 射线打到表面后的候选位姿
    pub pose: Option<Transform>,
}

impl PlacementSession {
    pub fn new(
        item: ItemId,
        ghost: Entity,
        half_extents: Vec3,
        source: Option<SourceSnapshot>,
    ) -> Self {
        Self {
            item,
            ghost,
            source,
            rotation_deg: 0.0,
            blocked: false,
            half_extents,
            pose: None,
        }
    }

    pub fn source_entity(&self) -> Option<Entity> {
        self.source.map(|s| s.entity)
    }
}

/// 同一时间最多一个摆放会话
#[derive(Resource, Debug, Default)]
pub struct PlacementManager {
    session: Option<PlacementSession>,
}

impl PlacementManager {
    pub fn is_placing(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&PlacementSession> {
        self.session.as_ref()
    }

    pub fn begin(&mut self, session: PlacementSession) -> Result<(), PlacementError> {
        if self.session.is_some() {
            return Err(PlacementError::AlreadyPlacing);
        }
        self.session = Some(session);
        Ok(())
    }

    pub fn rotate(&mut self, delta_deg: f32) {
        if let Some(session) = &mut self.session {
            session.rotation_deg += delta_deg;
        }
    }

    /// 底部贴着命中点，套上累计旋转
    pub fn update_pose(&mut self, hit_point: Vec3) -> Option<Transform> {
        let session = self.session.as_mut()?;
        let pose = Transform::from_translation(hit_point + Vec3::Y * session.half_extents.y)
            .with_rotation(Quat::from_rotation_y(session.rotation_deg.to_radians()));
        session.pose = Some(pose);
        Some(pose)
    }

    pub fn set_blocked(&mut self, blocked: bool) {
        if let Some(session) = &mut self.session {
            session.blocked = blocked;
        }
    }

    /// 被挡住或还没有位姿时拒绝，会话继续
    pub fn confirm(&mut self) -> Result<(PlacementSession, Transform), PlacementError> {
        let session = self.session.as_ref().ok_or(PlacementError::NotPlacing)?;
        if session.blocked {
            return Err(PlacementError::Blocked);
        }
        let pose = session.pose.ok_or(PlacementError::NoValidPose)?;
        let session = self.session.take().ok_or(PlacementError::NotPlacing)?;
        Ok((session, pose))
    }

    pub fn cancel(&mut self) -> Result<PlacementSession, PlacementError> {
        self.session.take().ok_or(PlacementError::NotPlacing)
    }
}
