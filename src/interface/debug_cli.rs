//! 文字 CLI：读取 stdin → 解析命令 → 执行并打印

use anyhow::{Context, Result, bail, ensure};
use bevy::app::AppExit;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::carry::{components::CarrySlot, events::*};
use crate::core::{events::LogEvent, states::AppState};
use crate::data::catalog::Catalog;
use crate::interaction::{components::*, events::*};
use crate::inventory::events::*;
use crate::placement::{components::PlacementManager, events::*};
use crate::shelf::events::ListShelvesEvent;
use crate::transfer::events::CancelTransfers;

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line in stdin.lock().lines().map_while(std::result::Result::ok) {
                    let line = line.trim();
                    if !line.is_empty() {
                        let mut buf = buffer.lock().unwrap();
                        buf.push_back(line.to_string());
                    }
                }
            });
        }
        app
            // 事件：原始输入行
            .add_event::<CliLine>()
            // 每帧从 buffer 取出所有命令行写入事件
            .add_systems(Update, read_stdin)
            // 仅在 InGame 处理命令
            .add_systems(
                Update,
                execute_cli_commands.run_if(in_state(AppState::InGame)),
            )
            .add_systems(OnEnter(AppState::Shutdown), request_exit);
    }
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

/// 我们支持的命令
#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Status,
    Exit,
    Items(Option<String>), // None=全部；Some(token)=按 id/uuid/name 查询
    Give { id: String, count: u32 },
    Inventory,
    Dump,
    Select(usize), // 0 开始的格子下标
    Aim(AimEvent),
    Interact,
    Drop,
    Stow,
    Rotate(f32),
    Place,
    Cancel,
    Abort,
    Shelves,
}

/// 命令要发出的全部事件
#[derive(SystemParam)]
struct Requests<'w> {
    give: EventWriter<'w, GiveItemEvent>,
    list: EventWriter<'w, ListInventoryEvent>,
    dump: EventWriter<'w, DumpInventoryEvent>,
    select: EventWriter<'w, SelectSlotEvent>,
    aim: EventWriter<'w, AimEvent>,
    interact: EventWriter<'w, InteractEvent>,
    drop: EventWriter<'w, DropEvent>,
    stow: EventWriter<'w, StowEvent>,
    rotate: EventWriter<'w, RotatePreview>,
    confirm: EventWriter<'w, ConfirmPlacement>,
    cancel: EventWriter<'w, CancelPlacement>,
    abort: EventWriter<'w, CancelTransfers>,
    shelves: EventWriter<'w, ListShelvesEvent>,
}

/// status 命令读取的状态
#[derive(SystemParam)]
struct Overview<'w, 's> {
    state: Res<'w, State<AppState>>,
    catalog: Res<'w, Catalog>,
    hint: Res<'w, InteractHint>,
    target: Res<'w, Target>,
    carry: Res<'w, CarrySlot>,
    placement: Res<'w, PlacementManager>,
    names: Query<'w, 's, &'static Name>,
}

impl Overview<'_, '_> {
    fn name_of(&self, entity: Option<Entity>) -> String {
        match entity {
            Some(e) => self
                .names
                .get(e)
                .map_or_else(|_| format!("{e:?}"), |n| n.to_string()),
            None => "无".into(),
        }
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "State: {:?}, Items Loaded: {}",
                self.state.get(),
                self.catalog.len()
            ),
            format!("对准: {}", self.name_of(self.target.entity)),
            format!("手上: {}", self.name_of(self.carry.held())),
        ];
        if let Some(session) = self.placement.session() {
            let name = self
                .catalog
                .get(session.item)
                .map_or("?", |d| d.name.as_str());
            lines.push(format!(
                "摆放中: {name}，旋转 {:.0}°{}",
                session.rotation_deg,
                if session.blocked { "，被挡住" } else { "" }
            ));
        }
        if !self.hint.0.is_empty() {
            lines.push(format!("提示: {}", self.hint.0));
        }
        lines
    }
}

/* ---------------------------- 读取 stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let mut buffer = CLI_BUFFER.lock().unwrap();
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- 命令执行 ---------------------------- */

fn execute_cli_commands(
    mut line_reader: EventReader<CliLine>,
    mut next: ResMut<NextState<AppState>>,
    mut log: EventWriter<LogEvent>,
    mut requests: Requests,
    overview: Overview,
) {
    for CliLine(input) in line_reader.read() {
        let command = match parse_command(input) {
            Ok(command) => command,
            Err(err) => {
                log.write(LogEvent(format!("{err:#}（输入 help 查看命令）")));
                continue;
            }
        };

        match command {
            Command::Help => {
                log.write(LogEvent(
                    "命令列表:
  help                   查看帮助
  status                 查看当前状态
  exit / quit            退出程序
  items                  列出所有物品
  items <token>          用 id / uuid / 名称 查询单个物品
  give <id> [count]      给予物品
  inventory              查看物品栏
  dump                   以 JSON 输出物品栏
  select <n>             拿起第 n 格（再选一次收起）
  aim <x> <y> <z>        看向坐标
  aim <name>             看向某个物体
  interact / e           与对准的东西交互
  drop                   放下手上的物品
  stow                   收起手上的物品
  rotate <delta>         旋转摆放预览
  place                  确认摆放
  cancel                 取消摆放
  abort                  取消所有飞行中的物品
  shelf                  查看货架库存
  "
                    .into(),
                ));
            }

            Command::Status => {
                for line in overview.lines() {
                    log.write(LogEvent(line));
                }
            }

            Command::Exit => {
                log.write(LogEvent("Bye~".into()));
                next.set(AppState::Shutdown);
            }

            Command::Items(token) => match token {
                None => {
                    // 全部列出
                    for def in overview.catalog.iter() {
                        log.write(LogEvent(format!("{} | {} | {}", def.id, def.key, def.name)));
                    }
                }
                Some(t) => match overview.catalog.find(&t) {
                    Some(def) => {
                        let contents = def
                            .contents
                            .iter()
                            .map(|c| {
                                let name = overview
                                    .catalog
                                    .get(c.item)
                                    .map_or("?", |d| d.name.as_str());
                                format!("{name} ×{}", c.quantity)
                            })
                            .collect::<Vec<_>>()
                            .join(", ");
                        log.write(LogEvent(format!(
                            "==================================================
UUID : {}
ID   : {}
Name : {}
Kind : {:?}
Stack: {}
Box  : {}
==================================================",
                            def.id,
                            def.key,
                            def.name,
                            def.kind,
                            def.stack_limit(),
                            if contents.is_empty() { "-" } else { contents.as_str() }
                        )));
                    }
                    None => {
                        log.write(LogEvent("未找到匹配物品".into()));
                    }
                },
            },

            Command::Give { id, count } => {
                requests.give.write(GiveItemEvent { id, count });
            }
            Command::Inventory => {
                requests.list.write(ListInventoryEvent);
            }
            Command::Dump => {
                requests.dump.write(DumpInventoryEvent);
            }
            Command::Select(index) => {
                requests.select.write(SelectSlotEvent { index });
            }
            Command::Aim(aim) => {
                requests.aim.write(aim);
            }
            Command::Interact => {
                requests.interact.write(InteractEvent);
            }
            Command::Drop => {
                requests.drop.write(DropEvent {
                    remove_from_inventory: true,
                });
            }
            Command::Stow => {
                requests.stow.write(StowEvent);
            }
            Command::Rotate(delta) => {
                requests.rotate.write(RotatePreview { delta });
            }
            Command::Place => {
                requests.confirm.write(ConfirmPlacement);
            }
            Command::Cancel => {
                requests.cancel.write(CancelPlacement);
            }
            Command::Abort => {
                requests.abort.write(CancelTransfers);
            }
            Command::Shelves => {
                requests.shelves.write(ListShelvesEvent);
            }
        }
    }
}

/// 进入 Shutdown 后退出；离开 InGame 时各插件已完成清理
fn request_exit(mut app_exit: EventWriter<AppExit>) {
    app_exit.write(AppExit::Success);
}

/* ---------------------------- 工具函数 ---------------------------- */

fn parse_command(input: &str) -> Result<Command> {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    let command = match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "items" | "item" | "i" => Command::Items(parts.next().map(str::to_string)),
        "give" => {
            let id = parts.next().context("用法: give <id> [count]")?.to_string();
            let count = match parts.next() {
                Some(n) => n.parse().with_context(|| format!("数量不是正整数: {n}"))?,
                None => 1,
            };
            ensure!(count > 0, "数量必须大于 0");
            Command::Give { id, count }
        }
        "inventory" | "inv" => Command::Inventory,
        "dump" => Command::Dump,
        "select" | "slot" => {
            let n: usize = parts
                .next()
                .context("用法: select <n>")?
                .parse()
                .context("格子编号不是数字")?;
            ensure!(n >= 1, "格子编号从 1 开始");
            Command::Select(n - 1)
        }
        "aim" | "look" => {
            let args: Vec<&str> = parts.collect();
            let coords: Option<Vec<f32>> = args.iter().map(|a| a.parse().ok()).collect();
            match (args.len(), coords) {
                (0, _) => bail!("用法: aim <x> <y> <z> 或 aim <name>"),
                (3, Some(c)) => Command::Aim(AimEvent::Point(Vec3::new(c[0], c[1], c[2]))),
                _ => Command::Aim(AimEvent::Named(args.join(" "))),
            }
        }
        "interact" | "e" => Command::Interact,
        "drop" => Command::Drop,
        "stow" => Command::Stow,
        "rotate" | "r" => {
            let delta = match parts.next() {
                Some(d) => d.parse().with_context(|| format!("旋转量不是数字: {d}"))?,
                None => 1.0,
            };
            Command::Rotate(delta)
        }
        "place" | "confirm" => Command::Place,
        "cancel" => Command::Cancel,
        "abort" => Command::Abort,
        "shelf" | "shelves" => Command::Shelves,
        "" => bail!("空命令"),
        other => bail!("不支持的命令: {other}"),
    };
    Ok(command)
}
