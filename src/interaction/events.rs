use bevy::prelude::*;

/// 按下交互键
#[derive(Event, Debug, Clone, Copy)]
pub struct InteractEvent;

/// 转动视角
#[derive(Event, Debug, Clone, PartialEq)]
pub enum AimEvent {
    /// 看向世界坐标
    Point(Vec3),
    /// 看向某个名字的物体（忽略大小写）
    Named(String),
}
