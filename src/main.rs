//! Hex Popper entry point
//!
//! The browser build is driven from JS through `platform::web`. Natively this
//! runs a headless, deterministic volley and logs what happened.
//!
//! Usage: `hex-popper [seed] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hex_popper::consts::FRAME_MS;
    use hex_popper::platform::ManualClock;
    use hex_popper::sim::ShiftDirection;
    use hex_popper::{GameEvent, GameSession, Settings};

    env_logger::init();
    log::info!("Hex Popper (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let settings = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Settings::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Could not load settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    let mut session = GameSession::new(settings, seed);
    let clock = ManualClock::new(0.0);
    session.frame(&clock);

    // Sweep the aim across the field, shifting once midway
    let shots = 12;
    for i in 0..shots {
        let angle = -std::f32::consts::PI * (0.2 + 0.6 * i as f32 / (shots - 1) as f32);
        if i == shots / 2 {
            let _ = session.start_shift(ShiftDirection::AwayFromCeiling);
        }
        // Wait out any shift lock before firing
        while session.is_locked() {
            clock.advance(FRAME_MS);
            session.frame(&clock);
        }
        if let Err(e) = session.attempt_fire(angle) {
            log::warn!("Shot {} refused: {}", i, e);
            continue;
        }
        while session.shooter().is_moving() {
            clock.advance(FRAME_MS);
            session.frame(&clock);
        }

        for event in session.drain_events() {
            match event {
                GameEvent::Popped { cells, points } | GameEvent::Dropped { cells, points } => {
                    log::info!("Cleared {} cells for {} points", cells.len(), points);
                }
                other => log::debug!("{:?}", other),
            }
        }
    }

    println!(
        "seed {}: score {}, {} cells left after {} ticks",
        seed,
        session.score(),
        session.grid().occupied_count(),
        session.time_ticks()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
