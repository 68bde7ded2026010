//! Fish Dash entry point
//!
//! Native builds run a headless session driven by a simple autopilot and
//! print the final HUD as JSON. Usage: `fish-dash [settings.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;

    use fish_dash::audio::LogSink;
    use fish_dash::consts::*;
    use fish_dash::sim::{EntityTag, GamePhase, GameState, Key, KeyDown, TickInput};
    use fish_dash::{Session, Settings, build_render_frame};

    /// Display refresh the driver pretends to run at
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after this much simulated time
    const TIME_LIMIT_SECS: f64 = 120.0;
    /// Hazards further than this sideways are ignored
    const DODGE_RANGE_X: f32 = 70.0;
    /// Frames between hops
    const JUMP_EVERY_FRAMES: u64 = 90;

    /// Scripted player: dodge blocks, jump now and then, slide when full
    #[derive(Default)]
    struct Autopilot {
        frame: u64,
        /// Second half of a double tap goes out next frame
        tap_pending: bool,
    }

    impl Autopilot {
        fn input(&mut self, state: &GameState) -> TickInput {
            self.frame += 1;
            let mut input = TickInput::default();

            if self.tap_pending {
                input.key_downs.push(KeyDown::press(Key::ArrowRight));
                self.tap_pending = false;
            } else if state.power.is_full() && !state.slide.active {
                input.key_downs.push(KeyDown::press(Key::ArrowRight));
                self.tap_pending = true;
            }

            let player = &state.player;
            let threat = state
                .entities
                .iter()
                .filter(|e| e.tag() == EntityTag::Hazard && e.pos.y < player.pos.y)
                .filter(|e| (e.pos.x - player.pos.x).abs() < DODGE_RANGE_X)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

            if let Some(hazard) = threat {
                // Run away from the block, towards open space near a wall
                let go_left = if hazard.pos.x > player.pos.x {
                    player.pos.x > PLAYER_HALF_WIDTH + DODGE_RANGE_X
                } else {
                    player.pos.x > GAME_WIDTH - PLAYER_HALF_WIDTH - DODGE_RANGE_X
                };
                input.left = go_left;
                input.right = !go_left;
            }

            input.jump = self.frame % JUMP_EVERY_FRAMES == 0;
            input
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load(Path::new(&path)),
            None => Settings::default(),
        };
        let seed = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or_else(clock_seed);

        let mut session = Session::new(seed, &settings, LogSink);
        if session.audio().is_muted() {
            log::info!("Audio muted by settings");
        }
        let mut pilot = Autopilot::default();

        while session.phase() == GamePhase::Active
            && session.state().elapsed_secs() < TIME_LIMIT_SECS
        {
            let input = pilot.input(session.state());
            for event in session.update(FRAME_DT, &input) {
                log::debug!("{:?}", event);
            }
        }

        let frame = build_render_frame(session.state());
        log::info!(
            "Run over after {} with {} coins",
            frame.hud.time_label(),
            frame.hud.coins
        );
        match serde_json::to_string_pretty(&frame.hud) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize summary: {}", e),
        }
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fish Dash (headless) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web builds embed the library directly; nothing to run here
}
