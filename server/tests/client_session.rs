//! Integration tests: full sessions through the in-process transport, with
//! clients mirroring state in a `ClientView`.

use std::sync::mpsc::Receiver;
use std::time::Duration;

use satchel_core::client_view::ClientView;
use satchel_core::events::ContainerEvent;
use satchel_core::protocol::ClientIntent;
use satchel_core::types::{
    ActorId, ContainerDescriptor, ContainerId, DescriptorFlags, GridSize, ItemId, Position,
    Transform, Vec3,
};
use satchel_core::world::World;
use satchel_server::hands::{ActorHands, Hands};
use satchel_server::placement::ScatterAtFeet;
use satchel_server::transport::{ClientConnection, Transport};
use satchel_server::{Authority, GameLoop, ServerConfig};

const TICK: Duration = Duration::from_millis(33);

struct Client {
    connection: ClientConnection,
    view: ClientView,
    events: Receiver<ContainerEvent>,
}

impl Client {
    fn new(connection: ClientConnection) -> Self {
        let mut view = ClientView::new(connection.actor());
        let events = view.subscribe();
        Self {
            connection,
            view,
            events,
        }
    }

    fn send(&self, intent: ClientIntent) {
        self.connection.send(&intent).expect("send");
    }

    fn sync(&mut self) {
        for notification in self.connection.poll() {
            self.view.apply(&notification);
        }
    }

    fn events(&self) -> Vec<ContainerEvent> {
        self.events.try_iter().collect()
    }
}

struct Session {
    game: GameLoop,
    chest: ContainerId,
    gem: ItemId,
}

/// A chest with a gem in its first cell, one unit east of the origin.
fn session() -> Session {
    let mut world = World::new();
    let chest = world.spawn_container(
        ContainerDescriptor::new("chest", GridSize::new(4, 4))
            .with_flags(DescriptorFlags::OpenWhenContainerViewed),
        Transform::at(Vec3::new(1.0, 0.0, 0.0)),
    );
    let gem = world.spawn_item("gem", Transform::default());
    world
        .add_item_position(gem, chest, Position::ORIGIN)
        .expect("stash gem");
    let authority = Authority::new(world, &ServerConfig::default())
        .with_placement(Box::new(ScatterAtFeet::seeded(0.0, 3)));
    Session {
        game: GameLoop::new(authority, Transport::new(), TICK),
        chest,
        gem,
    }
}

fn join(game: &mut GameLoop, name: &str, x: f32) -> (ActorId, ActorHands, Client) {
    let world = game.authority_mut().world_mut();
    let actor = world.spawn_actor(name, Transform::at(Vec3::new(x, 0.0, 0.0)));
    let hands = ActorHands::equip(world, actor, 2.5).expect("equip");
    let connection = game
        .connect(actor, Some(Box::new(hands.clone())))
        .expect("connect");
    (actor, hands, Client::new(connection))
}

#[test]
fn open_take_drop_close() {
    let Session {
        mut game,
        chest,
        gem,
    } = session();
    let (_, hands, mut alice) = join(&mut game, "alice", 0.0);
    let hand = hands.selected_hand();

    alice.send(ClientIntent::OpenContainer { container: chest });
    let report = game.tick(TICK);
    assert_eq!(report.applied, 1);
    alice.sync();
    assert!(alice.view.is_open(chest));
    assert!(alice.view.is_visually_open(chest));
    assert_eq!(alice.view.item_at(chest, Position::ORIGIN), Some(gem));
    assert_eq!(alice.events(), vec![ContainerEvent::Opened(chest)]);

    alice.send(ClientIntent::TransferItem {
        item: gem,
        position: Position::ORIGIN,
        target: hand,
    });
    game.tick(TICK);
    alice.sync();
    assert_eq!(alice.view.item_at(hand, Position::ORIGIN), Some(gem));
    assert_eq!(alice.view.item_at(chest, Position::ORIGIN), None);

    alice.send(ClientIntent::DropItem { item: gem });
    game.tick(TICK);
    alice.sync();
    assert_eq!(alice.view.item_at(hand, Position::ORIGIN), None);
    assert_eq!(alice.view.loose_item(gem), Some(Transform::at(Vec3::ZERO)));
    assert!(game.authority().world().item(gem).unwrap().active);

    alice.send(ClientIntent::CloseContainer { container: chest });
    game.tick(TICK);
    alice.sync();
    assert!(!alice.view.is_open(chest));
    assert!(!alice.view.is_visually_open(chest));
    assert_eq!(alice.events(), vec![ContainerEvent::Closed(chest)]);
}

#[test]
fn rejected_requests_send_nothing_back() {
    let Session {
        mut game,
        chest,
        gem,
    } = session();
    let (_, hands, mut alice) = join(&mut game, "alice", 0.0);
    game.tick(TICK);
    alice.sync();

    // The chest was never opened.
    alice.send(ClientIntent::TransferItem {
        item: gem,
        position: Position::ORIGIN,
        target: hands.selected_hand(),
    });
    let report = game.tick(TICK);

    assert_eq!(report.rejected, 1);
    assert_eq!(report.delivered, 0);
    assert!(alice.connection.poll().is_empty());
    assert_eq!(
        game.authority().world().item(gem).unwrap().container,
        Some(chest)
    );
}

#[test]
fn shared_chest_stays_open_until_both_leave() {
    let Session { mut game, chest, .. } = session();
    let (_, _, mut alice) = join(&mut game, "alice", 0.0);
    let (_, _, mut bob) = join(&mut game, "bob", 2.0);

    alice.send(ClientIntent::OpenContainer { container: chest });
    bob.send(ClientIntent::OpenContainer { container: chest });
    game.tick(TICK);
    alice.send(ClientIntent::CloseContainer { container: chest });
    game.tick(TICK);
    alice.sync();
    bob.sync();

    assert!(!alice.view.is_open(chest));
    assert!(bob.view.is_open(chest));
    assert!(alice.view.is_visually_open(chest));
    assert!(bob.view.is_visually_open(chest));

    bob.send(ClientIntent::CloseContainer { container: chest });
    game.tick(TICK);
    alice.sync();
    bob.sync();
    assert!(!alice.view.is_visually_open(chest));
    assert!(!bob.view.is_visually_open(chest));
}

#[test]
fn walking_away_closes_on_the_next_sweep() {
    let Session { mut game, chest, .. } = session();
    let (actor, _, mut alice) = join(&mut game, "alice", 0.0);

    alice.send(ClientIntent::OpenContainer { container: chest });
    game.tick(TICK);
    game.authority_mut()
        .world_mut()
        .move_actor(actor, Transform::at(Vec3::new(25.0, 0.0, 0.0)));

    let mut pruned = 0;
    for _ in 0..16 {
        pruned += game.tick(TICK).pruned;
    }
    alice.sync();

    assert_eq!(pruned, 1);
    assert!(!alice.view.is_open(chest));
    assert!(!alice.view.is_visually_open(chest));
    assert_eq!(
        alice.events(),
        vec![ContainerEvent::Opened(chest), ContainerEvent::Closed(chest)]
    );
}

#[test]
fn lost_connection_releases_open_containers() {
    let Session {
        mut game,
        chest,
        gem,
    } = session();
    let (_, alice_hands, mut alice) = join(&mut game, "alice", 0.0);
    let (bob_id, _, bob) = join(&mut game, "bob", 2.0);
    game.authority_mut()
        .world_mut()
        .add_item_position(gem, alice_hands.selected_hand(), Position::ORIGIN)
        .expect("hand gem to alice");

    bob.send(ClientIntent::OpenContainer { container: chest });
    game.tick(TICK);
    drop(bob);

    // The spawn broadcast is what finds Bob's connection dead.
    alice.send(ClientIntent::DropItem { item: gem });
    game.tick(TICK);
    game.tick(TICK);
    alice.sync();

    assert!(game.authority().inventory(bob_id).is_none());
    assert!(!game.authority().world().container(chest).unwrap().is_visually_open());
    assert!(!alice.view.is_visually_open(chest));
}
