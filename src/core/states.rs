use bevy::prelude::*;

/// 应用的大状态；玩法系统只在 InGame 下运行
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Startup,
    /// 等物品表加载并通过校验，失败就一直停在这里
    Loading,
    InGame,
    /// exit 命令进入，随后发出 AppExit
    Shutdown,
}
