use bevy::prelude::*;

use super::components::{TransferError, TransferPayload};

/// 取消所有飞行中的物品并回滚
#[derive(Event, Debug, Clone, Copy)]
pub struct CancelTransfers;

/// 每个飞行任务结束时发出一次
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TransferSettled {
    pub payload: TransferPayload,
    pub outcome: Result<(), TransferError>,
}
