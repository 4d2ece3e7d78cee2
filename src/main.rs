//! Riffmap - controller-to-keyboard remapper for rhythm games
//!
//! Binds the first connected game controller and translates its button
//! presses into the configured synthetic keyboard/mouse input, so a
//! guitar-style controller can drive games that only listen to the
//! keyboard.

use riffmap::{
    config::CONFIG_FILE, mapping::default_mapping, ConfigStore, DeviceRegistry, Dispatcher,
    MappingTable, RdevInjector, RiffmapError, SdlBackend,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), RiffmapError> {
    // Initialize logging
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .compact()
        .init();

    info!("Riffmap starting...");

    // Load configuration and build the mapping table
    let store = ConfigStore::load(CONFIG_FILE);
    let table = MappingTable::build(&default_mapping(), store.overrides());
    info!("Mapping table ready ({} buttons)", table.len());

    // Set up Ctrl+C handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        info!("Shutdown signal received");
        running_clone.store(false, Ordering::SeqCst);
    })
    .expect("Failed to set Ctrl+C handler");

    // Bring up SDL: joystick subsystem + event pump, on the main thread
    sdl2::hint::set("SDL_JOYSTICK_THREAD", "1");
    let sdl = sdl2::init().map_err(RiffmapError::Subsystem)?;
    let joystick = sdl.joystick().map_err(RiffmapError::Subsystem)?;
    let mut pump = sdl.event_pump().map_err(RiffmapError::Subsystem)?;

    // Bind hardware that is already plugged in; hot-plug covers the rest
    let mut registry = DeviceRegistry::new(Box::new(SdlBackend::new(joystick)));
    registry.bind_first_connected();

    let mut dispatcher = Dispatcher::new(registry, table, RdevInjector::new());

    info!("Press Ctrl+C to stop");
    dispatcher.run(&mut pump, &running);

    // The dispatcher released the device; the SDL context drops with main
    info!("Riffmap shutting down...");
    Ok(())
}
