use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use satchel_core::client_view::ClientView;
use satchel_core::events::ContainerEvent;
use satchel_core::protocol::ClientIntent;
use satchel_core::types::{
    ContainerDescriptor, ContainerId, DescriptorFlags, GridSize, Position, Transform, Vec3,
};
use satchel_core::world::World;
use satchel_server::hands::{ActorHands, Hands};
use satchel_server::transport::{ClientConnection, Transport};
use satchel_server::{Authority, GameLoop, ServerConfig};

const CLIENT_PAUSE: Duration = Duration::from_millis(300);

fn main() {
    let config = ServerConfig::from_env();

    if let Err(e) = satchel_core::initialize_logger(config.log_level, config.log_file.as_deref()) {
        eprintln!("Failed to initialize logger: {e:#}. Exiting.");
        process::exit(1);
    }

    if let Err(e) = run(config) {
        log::error!("Server failed: {e:#}");
        process::exit(1);
    }
}

fn run(config: ServerConfig) -> anyhow::Result<()> {
    log::info!("Starting satchel server v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Configuration: {config:?}");

    let quit_flag = Arc::new(AtomicBool::new(false));
    let quit_flag_clone = quit_flag.clone();
    ctrlc::set_handler(move || {
        if !quit_flag_clone.load(Ordering::SeqCst) {
            log::info!("Got signal to terminate. Shutdown initiated...");
        } else {
            log::info!("Alright, alright, I'm already terminating!");
        }
        quit_flag_clone.store(true, Ordering::SeqCst);
    })
    .context("failed to install signal handler")?;

    let mut world = World::new();
    let chest = world.spawn_container(
        ContainerDescriptor::new("chest", GridSize::new(5, 4))
            .with_flags(DescriptorFlags::OpenWhenContainerViewed),
        Transform::at(Vec3::new(1.0, 0.0, 0.0)),
    );
    let coin = world.spawn_item("coin", Transform::default());
    world.add_item_position(coin, chest, Position::ORIGIN)?;

    let mut players = Vec::new();
    for (name, x) in [("alice", 0.0), ("bob", 2.0)] {
        let actor = world.spawn_actor(name, Transform::at(Vec3::new(x, 0.0, 0.0)));
        let hands = ActorHands::equip(&mut world, actor, config.reach)?;
        players.push((actor, hands));
    }

    let authority = Authority::new(world, &config);
    let mut game = GameLoop::new(authority, Transport::new(), config.tick_interval());

    let mut clients = Vec::new();
    for (actor, hands) in players {
        let hand = hands.selected_hand();
        let connection = game
            .connect(actor, Some(Box::new(hands)))
            .with_context(|| format!("failed to connect {actor}"))?;
        clients.push(
            thread::Builder::new()
                .name(format!("client-{}", actor.raw()))
                .spawn(move || scripted_client(connection, chest, hand))
                .context("failed to spawn client thread")?,
        );
    }

    game.run(&quit_flag);

    for client in clients {
        if client.join().is_err() {
            log::error!("Client thread panicked");
        }
    }
    log::info!("Server shutdown complete.");
    Ok(())
}

/// A local client that opens the chest, grabs whatever sits in its first
/// cell, puts it back and closes the chest again.
fn scripted_client(connection: ClientConnection, chest: ContainerId, hand: ContainerId) {
    let mut view = ClientView::new(connection.actor());
    let events = view.subscribe();

    step(&connection, &mut view, ClientIntent::OpenContainer { container: chest });
    if let Some(item) = view.item_at(chest, Position::ORIGIN) {
        for target in [hand, chest] {
            step(
                &connection,
                &mut view,
                ClientIntent::TransferItem {
                    item,
                    position: Position::ORIGIN,
                    target,
                },
            );
        }
    }
    step(&connection, &mut view, ClientIntent::CloseContainer { container: chest });

    for event in events.try_iter() {
        match event {
            ContainerEvent::Opened(c) => log::info!("{} saw {c} open", connection.actor()),
            ContainerEvent::Closed(c) => log::info!("{} saw {c} close", connection.actor()),
        }
    }
}

fn step(connection: &ClientConnection, view: &mut ClientView, intent: ClientIntent) {
    if let Err(e) = connection.send(&intent) {
        log::warn!("{} could not send {intent:?}: {e}", connection.actor());
        return;
    }
    thread::sleep(CLIENT_PAUSE);
    for notification in connection.poll() {
        view.apply(&notification);
    }
}
