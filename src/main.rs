use anyhow::bail;
use bevy::prelude::*;

use shop_sim::core::{events::LogEvent, states::AppState};
use shop_sim::data::DataPlugin;
use shop_sim::interface::debug_cli::DebugCliPlugin;
use shop_sim::scene::DemoShopPlugin;
use shop_sim::ShopPlugin;

fn main() -> anyhow::Result<()> {
    let exit = App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                visible: false,
                ..default()
            }), // 窗口隐藏，只走终端
            ..default()
        }))
        .add_plugins(ShopPlugin)
        .add_plugins(DataPlugin)
        .add_plugins(DebugCliPlugin)
        .add_plugins(DemoShopPlugin)
        .add_systems(Update, forward_log_event) // 简单打印
        .add_systems(Startup, |mut next: ResMut<NextState<AppState>>| {
            next.set(AppState::Loading);
        })
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => bail!("exited with code {code}"),
    }
}

fn forward_log_event(mut reader: EventReader<LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}
