use bevy::prelude::*;

pub mod states;
pub mod events;
pub mod resources;

/// 配置文件默认路径（相对工作目录）
pub const CONFIG_PATH: &str = "config/game.toml";

/// 核心插件：注册全局资源 / 事件 / 状态
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        use states::AppState;

        // 测试里会预先插入配置，这里不覆盖
        if !app.world().contains_resource::<resources::GameConfig>() {
            let config = resources::GameConfig::load_or_default(CONFIG_PATH);
            app.insert_resource(config);
        }

        // 插件首次载入时，插入初始 State
        app
            .init_state::<AppState>()
            .add_event::<events::LogEvent>()
            .add_systems(Startup, events::announce_config);
    }
}
