//! Ledge Runner entry point
//!
//! Native headless runner: builds a world, drives the player with a scripted
//! keyboard session through the fixed-step loop and logs what a renderer
//! would draw. Usage: `ledge-runner [level.json | --seed N] [--seconds S]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ledge Runner (native) starting...");

    if let Err(e) = native::run(std::env::args().skip(1).collect()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `ledge_runner::sim::tick` themselves
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use ledge_runner::animation::{AnimationSet, Animator};
    use ledge_runner::consts::SIM_DT;
    use ledge_runner::input::{Controls, InputEvent, InputSource};
    use ledge_runner::sim::{FixedStep, World, frame_view, tick};
    use ledge_runner::{LevelDesc, LevelError, Settings};

    const SETTINGS_PATH: &str = "settings.json";
    const ANIMATIONS_PATH: &str = "animations.json";
    const DEFAULT_SECONDS: f32 = 10.0;

    enum LevelSource {
        Demo,
        File(String),
        Seed(u64),
    }

    struct Args {
        level: LevelSource,
        seconds: f32,
    }

    fn parse_args(args: Vec<String>) -> Result<Args, String> {
        let mut parsed = Args {
            level: LevelSource::Demo,
            seconds: DEFAULT_SECONDS,
        };
        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = iter.next().ok_or("--seed needs a value")?;
                    let seed = value.parse().map_err(|_| format!("invalid seed: {value}"))?;
                    parsed.level = LevelSource::Seed(seed);
                }
                "--seconds" => {
                    let value = iter.next().ok_or("--seconds needs a value")?;
                    parsed.seconds = value
                        .parse()
                        .map_err(|_| format!("invalid duration: {value}"))?;
                }
                path => parsed.level = LevelSource::File(path.to_string()),
            }
        }
        Ok(parsed)
    }

    fn load_level(source: &LevelSource) -> Result<LevelDesc, LevelError> {
        match source {
            LevelSource::Demo => Ok(LevelDesc::demo()),
            LevelSource::File(path) => LevelDesc::load(path),
            LevelSource::Seed(seed) => Ok(LevelDesc::generate_course(*seed, 24)),
        }
    }

    /// Keyboard events for a given simulated frame: run right, hop every 1.5 s
    fn scripted_events(frame: u32, controls: &Controls) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if frame == 0 {
            events.push(InputEvent::KeyDown(controls.move_right));
        }
        if frame > 0 && frame % 180 == 0 {
            events.push(InputEvent::KeyDown(controls.jump));
        }
        if frame % 180 == 5 {
            events.push(InputEvent::KeyUp(controls.jump));
        }
        events
    }

    pub fn run(args: Vec<String>) -> Result<(), String> {
        let args = parse_args(args)?;
        let settings = Settings::load_or_default(SETTINGS_PATH);
        let level = load_level(&args.level).map_err(|e| format!("Failed to load level: {e}"))?;
        log::info!("Level '{}' with {} tiles", level.name, level.tiles.len());

        let animations = match AnimationSet::load(ANIMATIONS_PATH) {
            Ok(set) => set,
            Err(e) => {
                log::info!("Using built-in animations ({e})");
                AnimationSet::player_defaults()
            }
        };

        let mut world = World::from_level(&level, &settings);
        let controls = Controls::default();
        let mut source = InputSource::keyboard(controls);
        log::info!("Input source: {}", source.name());

        let mut animator = match world.player() {
            Some(player) => Animator::new(player.action_key(), &animations),
            None => return Err("world has no player".to_string()),
        };

        // Render frames arrive at the display rate; the sim steps at SIM_DT
        let frame_dt = 1.0 / settings.target_fps.max(1) as f32;
        let frames = (args.seconds / frame_dt).ceil() as u32;
        let mut stepper = FixedStep::new(SIM_DT);
        let mut sim_frame = 0u32;

        for frame in 0..frames {
            for _ in 0..stepper.advance(frame_dt) {
                for event in scripted_events(sim_frame, &controls) {
                    source.handle_event(&event);
                }
                let input = source.sample();
                tick(&mut world, &input, SIM_DT);
                if let Some(player) = world.player() {
                    animator.follow(player, &animations, SIM_DT);
                }
                sim_frame += 1;
            }

            if frame % settings.target_fps.max(1) == 0 {
                let view = frame_view(&world);
                if let Some(player) = view.entities.iter().find(|e| e.id == world.player_id) {
                    log::info!(
                        "tick {:>5} pos ({:7.1}, {:6.1}) screen ({:5.0}, {:4.0}) {} frame {} scroll ({:7.1}, {:6.1}) tiles {}",
                        view.tick,
                        player.position.x,
                        player.position.y,
                        player.screen_position.x,
                        player.screen_position.y,
                        animator.action(),
                        animator.animation.frame(),
                        view.scroll.x,
                        view.scroll.y,
                        view.tiles.len()
                    );
                }
            }
        }

        if let Some(player) = world.player() {
            log::info!(
                "Finished after {} ticks at ({:.1}, {:.1})",
                world.time_ticks,
                player.position.x,
                player.position.y
            );
        }
        Ok(())
    }
}
