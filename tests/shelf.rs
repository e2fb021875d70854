mod common;

use bevy::prelude::*;
use common::*;

use shop_sim::carry::{components::CarrySlot, events::SelectSlotEvent};
use shop_sim::interaction::events::InteractEvent;
use shop_sim::inventory::components::Inventory;
use shop_sim::scene::components::*;
use shop_sim::shelf::{
    components::Shelf,
    events::{StoreOnShelf, TakeFromShelf},
    spawn_shelf,
};
use shop_sim::transfer::{
    components::{Flight, TransferError},
    events::CancelTransfers,
};

fn shelf(app: &App, scene: &ShopScene) -> Shelf {
    get::<Shelf>(app, scene.shelf)
}

fn flights(app: &mut App) -> usize {
    app.world_mut()
        .query::<&Flight>()
        .iter(app.world())
        .count()
}

fn quantity(app: &App, key: &str) -> u32 {
    let id = def(app, key).id;
    app.world().resource::<Inventory>().quantity_of(id)
}

/// 背包里有 cola，拿到手上后送上货架并等落地
fn stock_one_cola(app: &mut App, scene: &ShopScene) -> Entity {
    send(app, SelectSlotEvent { index: 0 });
    run(app, 1);
    assert!(app.world().resource::<CarrySlot>().is_carrying());

    send(app, StoreOnShelf { shelf: scene.shelf });
    run(app, 8);
    shelf(app, scene).occupant(0).unwrap()
}

#[test]
fn interact_with_shelf_stocks_held_item() {
    let mut app = app(config(7));
    let scene = spawn_scene(&mut app);
    give(&mut app, "cola", 3);
    let cola = def(&app, "cola");

    send(&mut app, SelectSlotEvent { index: 0 });
    look_at(&mut app, &scene, Vec3::new(0.0, 0.6, -2.0));
    run(&mut app, 3);

    // 对准货架时下一个空位出现预览
    let preview = ghosts(&mut app);
    assert_eq!(preview.len(), 1);
    assert_eq!(get::<Name>(&app, preview[0]).as_str(), "Cola_Preview");
    let anchor = shelf(&app, &scene).anchor(0).unwrap();
    assert_eq!(get::<ChildOf>(&app, anchor).parent(), scene.shelf);
    let expected = Vec3::new(-1.0 + 2.0 / 3.0 * 0.5, 1.2, -2.0);
    assert!((get::<Transform>(&app, preview[0]).translation - expected).length() < 1e-4);

    send(&mut app, InteractEvent);
    run(&mut app, 2);
    assert!(!app.world().resource::<CarrySlot>().is_carrying());
    assert!(shelf(&app, &scene).is_busy());

    run(&mut app, 8);
    let shelf = shelf(&app, &scene);
    assert!(!shelf.is_busy());
    assert_eq!(shelf.stock(cola.id), 1);
    assert_eq!(quantity(&app, "cola"), 2);

    let object = shelf.occupant(0).unwrap();
    let instance = get::<ItemInstance>(&app, object);
    assert_eq!(instance.item, cola.id);
    assert!(!instance.released);
    assert_eq!(get::<ChildOf>(&app, object).parent(), anchor);
    assert_eq!(get::<Visibility>(&app, object), Visibility::Visible);

    // 手空了，预览和飞行幽灵都不在了
    assert!(ghosts(&mut app).is_empty());
    assert_eq!(app.world().resource::<Settled>().0.len(), 1);
    assert!(app.world().resource::<Settled>().0[0].outcome.is_ok());
}

#[test]
fn unpacking_a_box_stocks_its_content() {
    let mut app = app(config(7));
    let scene = spawn_scene(&mut app);
    give(&mut app, "cola_box", 1);
    let cola = def(&app, "cola");

    send(&mut app, SelectSlotEvent { index: 0 });
    run(&mut app, 1);
    let held = app.world().resource::<CarrySlot>().held().unwrap();
    assert_eq!(get::<ItemInstance>(&app, held).interior_count, 12);

    send(&mut app, StoreOnShelf { shelf: scene.shelf });
    run(&mut app, 8);

    assert_eq!(shelf(&app, &scene).stock(cola.id), 1);
    assert_eq!(get::<ItemInstance>(&app, held).interior_count, 11);
    assert_eq!(
        app.world().resource::<Inventory>().slot(0).unwrap().interior_count,
        11
    );
    // 箱子还在手上
    assert_eq!(app.world().resource::<CarrySlot>().held(), Some(held));
    assert_eq!(quantity(&app, "cola_box"), 1);
}

/// 背包里只放一个剩 1 件的可乐箱并拿到手上
fn hold_box_with_one_left(app: &mut App) -> Entity {
    let boxed = def(app, "cola_box");
    assert!(app.world_mut().resource_mut::<Inventory>().add_box(&boxed, 1, 1));
    send(app, SelectSlotEvent { index: 0 });
    run(app, 1);
    let held = app.world().resource::<CarrySlot>().held().unwrap();
    assert_eq!(get::<ItemInstance>(app, held).interior_count, 1);
    held
}

fn backroom_shelf(app: &mut App) -> Entity {
    spawn_shelf(
        app.world_mut(),
        "Backroom",
        Transform::from_xyz(3.0, 0.6, -2.0),
        Vec3::new(1.0, 0.6, 0.3),
        3,
    )
}

#[test]
fn last_unit_in_a_box_is_unpacked_only_once() {
    let mut app = app(config(7));
    let scene = spawn_scene(&mut app);
    let backroom = backroom_shelf(&mut app);
    let cola = def(&app, "cola");
    let held = hold_box_with_one_left(&mut app);

    // 同一帧往两个货架拆同一个箱子
    send(&mut app, StoreOnShelf { shelf: scene.shelf });
    send(&mut app, StoreOnShelf { shelf: backroom });
    run(&mut app, 1);
    assert_eq!(flights(&mut app), 1);

    run(&mut app, 8);
    let stocked = shelf(&app, &scene).stock(cola.id) + get::<Shelf>(&app, backroom).stock(cola.id);
    assert_eq!(stocked, 1);
    assert_eq!(get::<ItemInstance>(&app, held).interior_count, 0);
    assert_eq!(
        app.world().resource::<Inventory>().slot(0).unwrap().interior_count,
        0
    );
    assert_eq!(flights(&mut app), 0);
}

#[test]
fn reselecting_a_box_mid_flight_keeps_the_reserved_unit() {
    let mut app = app(config(7));
    let scene = spawn_scene(&mut app);
    let backroom = backroom_shelf(&mut app);
    let cola = def(&app, "cola");
    hold_box_with_one_left(&mut app);

    send(&mut app, StoreOnShelf { shelf: scene.shelf });
    run(&mut app, 1);
    assert_eq!(
        app.world().resource::<Inventory>().slot(0).unwrap().interior_count,
        0
    );

    // 收起再拿出来，箱子不能凭空多出那一件
    send(&mut app, SelectSlotEvent { index: 0 });
    run(&mut app, 1);
    send(&mut app, SelectSlotEvent { index: 0 });
    run(&mut app, 1);
    let held = app.world().resource::<CarrySlot>().held().unwrap();
    assert_eq!(get::<ItemInstance>(&app, held).interior_count, 0);

    send(&mut app, StoreOnShelf { shelf: backroom });
    run(&mut app, 8);
    let stocked = shelf(&app, &scene).stock(cola.id) + get::<Shelf>(&app, backroom).stock(cola.id);
    assert_eq!(stocked, 1);
    assert_eq!(get::<Shelf>(&app, backroom).stock(cola.id), 0);
}

#[test]
fn cancelled_unpack_returns_the_unit_to_the_box() {
    let mut app = app(config(7));
    let scene = spawn_scene(&mut app);
    give(&mut app, "cola_box", 1);
    let cola = def(&app, "cola");

    send(&mut app, SelectSlotEvent { index: 0 });
    run(&mut app, 1);
    let held = app.world().resource::<CarrySlot>().held().unwrap();
    send(&mut app, StoreOnShelf { shelf: scene.shelf });
    run(&mut app, 1);
    assert_eq!(get::<ItemInstance>(&app, held).interior_count, 11);

    send(&mut app, CancelTransfers);
    run(&mut app, 1);

    assert_eq!(flights(&mut app), 0);
    assert_eq!(get::<ItemInstance>(&app, held).interior_count, 12);
    assert_eq!(
        app.world().resource::<Inventory>().slot(0).unwrap().interior_count,
        12
    );
    let shelf = shelf(&app, &scene);
    assert_eq!(shelf.stock(cola.id), 0);
    assert!(!shelf.is_busy());
    assert_eq!(
        app.world().resource::<Settled>().0.last().unwrap().outcome,
        Err(TransferError::Cancelled)
    );
}

#[test]
fn furniture_never_goes_on_shelf() {
    let mut app = app(config(7));
    let scene = spawn_scene(&mut app);
    let chair = spawn_item(&mut app, "chair", 3.0, 3.0);

    send(&mut app, shop_sim::carry::events::PickUpEvent { entity: chair, slot: None });
    run(&mut app, 1);
    send(&mut app, StoreOnShelf { shelf: scene.shelf });
    run(&mut app, 3);

    assert_eq!(flights(&mut app), 0);
    assert_eq!(shelf(&app, &scene).free_slots(), 3);
    assert_eq!(app.world().resource::<CarrySlot>().held(), Some(chair));
}

#[test]
fn take_moves_last_item_into_inventory() {
    let mut app = app(config(7));
    let scene = spawn_scene(&mut app);
    give(&mut app, "cola", 1);
    let object = stock_one_cola(&mut app, &scene);
    assert_eq!(quantity(&app, "cola"), 0);

    send(&mut app, TakeFromShelf { shelf: scene.shelf });
    run(&mut app, 1);
    assert!(shelf(&app, &scene).occupant(0).is_none());
    assert_eq!(get::<Visibility>(&app, object), Visibility::Hidden);

    run(&mut app, 8);
    assert_eq!(quantity(&app, "cola"), 1);
    assert_eq!(shelf(&app, &scene).stock(def(&app, "cola").id), 0);
    assert!(get::<ItemInstance>(&app, object).released);
}

#[test]
fn take_is_rejected_up_front_when_inventory_is_full() {
    let mut app = app(config(1));
    let scene = spawn_scene(&mut app);
    give(&mut app, "cola", 1);
    let object = stock_one_cola(&mut app, &scene);
    give(&mut app, "chips", 1);

    send(&mut app, TakeFromShelf { shelf: scene.shelf });
    run(&mut app, 2);

    assert_eq!(flights(&mut app), 0);
    let shelf = shelf(&app, &scene);
    assert_eq!(shelf.occupant(0), Some(object));
    assert_eq!(shelf.stock(def(&app, "cola").id), 1);
    assert!(!shelf.is_busy());
}

#[test]
fn take_rolls_back_when_inventory_fills_mid_flight() {
    let mut app = app(config(1));
    let scene = spawn_scene(&mut app);
    give(&mut app, "cola", 1);
    let object = stock_one_cola(&mut app, &scene);
    let anchor = shelf(&app, &scene).anchor(0).unwrap();

    send(&mut app, TakeFromShelf { shelf: scene.shelf });
    run(&mut app, 1);
    assert_eq!(flights(&mut app), 1);

    // 飞行途中背包被别的东西占满
    give(&mut app, "chips", 1);
    run(&mut app, 8);

    let shelf = shelf(&app, &scene);
    assert!(!shelf.is_busy());
    assert_eq!(shelf.stock(def(&app, "cola").id), 1);
    assert_eq!(shelf.occupant(0), Some(object));
    assert_eq!(get::<ChildOf>(&app, object).parent(), anchor);
    assert_eq!(get::<Visibility>(&app, object), Visibility::Visible);
    assert!(get::<Collider>(&app, object).enabled);
    assert_eq!(quantity(&app, "cola"), 0);
    assert_eq!(quantity(&app, "chips"), 1);

    let settled = &app.world().resource::<Settled>().0;
    assert!(matches!(
        settled.last().unwrap().outcome,
        Err(TransferError::InventoryFull(_))
    ));
}

#[test]
fn cancelling_transfers_restores_the_shelf() {
    let mut app = app(config(7));
    let scene = spawn_scene(&mut app);
    give(&mut app, "cola", 1);
    let object = stock_one_cola(&mut app, &scene);

    send(&mut app, TakeFromShelf { shelf: scene.shelf });
    run(&mut app, 1);
    send(&mut app, CancelTransfers);
    run(&mut app, 1);

    assert_eq!(flights(&mut app), 0);
    assert!(ghosts(&mut app).is_empty());
    let shelf = shelf(&app, &scene);
    assert_eq!(shelf.occupant(0), Some(object));
    assert_eq!(shelf.stock(def(&app, "cola").id), 1);
    assert!(!shelf.is_busy());
    assert_eq!(quantity(&app, "cola"), 0);

    let settled = &app.world().resource::<Settled>().0;
    assert_eq!(settled.last().unwrap().outcome, Err(TransferError::Cancelled));
}

#[test]
fn busy_shelf_rejects_second_store() {
    let mut app = app(config(7));
    let scene = spawn_scene(&mut app);
    give(&mut app, "cola", 5);

    send(&mut app, SelectSlotEvent { index: 0 });
    run(&mut app, 1);
    send(&mut app, StoreOnShelf { shelf: scene.shelf });
    run(&mut app, 1);

    // 手上重新拿一个，货架还在忙
    send(&mut app, SelectSlotEvent { index: 0 });
    run(&mut app, 1);
    send(&mut app, StoreOnShelf { shelf: scene.shelf });
    run(&mut app, 1);
    assert_eq!(flights(&mut app), 1);
    assert!(app.world().resource::<CarrySlot>().is_carrying());

    run(&mut app, 8);
    assert_eq!(shelf(&app, &scene).stock(def(&app, "cola").id), 1);
    assert_eq!(quantity(&app, "cola"), 4);
}
