//! Duo Breakout headless driver
//!
//! Runs a match with seeded pseudo-random input and pickups and logs what
//! happened. Usage:
//!
//! ```text
//! duo-breakout [--tuning FILE] [--seed N] [--seconds S]
//! ```
//!
//! Set `RUST_LOG=debug` to watch individual action transitions.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use duo_breakout::Tuning;
    use duo_breakout::consts::{MAX_SUBSTEPS, SIM_DT};
    use duo_breakout::sim::{
        ButtonEdge, MatchState, PaddleInput, Side, SlotId, TickInput, frame, tick,
    };

    /// Seconds between random power-ups
    const PICKUP_INTERVAL: f32 = 2.5;

    /// Run a headless Duo Breakout match with a scripted bot on both paddles
    #[derive(Parser, Debug)]
    #[command(name = "duo-breakout", version)]
    pub struct Options {
        /// JSON tuning file; built-in defaults when absent or invalid
        #[arg(long)]
        pub tuning: Option<PathBuf>,

        /// Match seed
        #[arg(long, default_value_t = 12345)]
        pub seed: u64,

        /// Simulated seconds to run
        #[arg(long, default_value_t = 60.0)]
        pub seconds: f32,
    }

    /// Scripted "player": wanders the stick, mashes triggers now and then
    struct Bot {
        rng: Pcg32,
        stick: [f32; 2],
        down: [[bool; 2]; 2],
    }

    impl Bot {
        fn new(seed: u64) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
                stick: [0.0; 2],
                down: [[false; 2]; 2],
            }
        }

        fn next_input(&mut self) -> TickInput {
            let mut input = TickInput::default();
            for side in Side::BOTH {
                let i = side.index();
                if self.rng.random_bool(0.1) {
                    self.stick[i] = self.rng.random_range(-1.0..=1.0_f32);
                }

                let mut actions = [ButtonEdge::Idle; 2];
                for slot in SlotId::BOTH {
                    let was = self.down[i][slot.index()];
                    // Hold for a while once pressed
                    let is = if was {
                        self.rng.random_bool(0.85)
                    } else {
                        self.rng.random_bool(0.03)
                    };
                    self.down[i][slot.index()] = is;
                    actions[slot.index()] = ButtonEdge::from_levels(was, is);
                }

                let paddle_input = PaddleInput {
                    movement: Vec2::new(0.0, self.stick[i]),
                    actions,
                };
                match side {
                    Side::Left => input.left = paddle_input,
                    Side::Right => input.right = paddle_input,
                }
            }
            input
        }

        /// Variable render-rate frame length around 60 Hz
        fn frame_dt(&mut self) -> f32 {
            self.rng.random_range(0.012..0.022_f32)
        }
    }

    pub fn run(opts: &Options) {
        let tuning = Tuning::load_or_default(opts.tuning.as_deref());
        let mut state = MatchState::new(&tuning, opts.seed);
        let mut bot = Bot::new(opts.seed);

        log::info!("Running {}s match with seed {}", opts.seconds, opts.seed);

        let mut elapsed = 0.0_f32;
        let mut accumulator = 0.0_f32;
        let mut next_pickup = PICKUP_INTERVAL;
        let mut pickups = 0u32;
        let mut refused = 0u32;

        while elapsed < opts.seconds {
            let dt = bot.frame_dt();
            elapsed += dt;
            accumulator += dt;

            frame(&mut state, &bot.next_input());

            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut state, SIM_DT);
                accumulator -= SIM_DT;
                substeps += 1;
            }

            if elapsed >= next_pickup {
                next_pickup += PICKUP_INTERVAL;
                let side = if bot.rng.random_bool(0.5) { Side::Left } else { Side::Right };
                let kind = state.random_pickup();
                pickups += 1;
                if !state.pickup(side, kind) {
                    refused += 1;
                }
            }
        }

        let stats = state.arena.stats;
        log::info!(
            "Done: {} ticks, {} frames, {} pickups ({} refused)",
            state.time_ticks,
            state.frames,
            pickups,
            refused
        );
        log::info!(
            "Bricks destroyed: {}/{}, balls lost: {}, lasers fired: {}, ghosts popped: {}",
            stats.bricks_destroyed,
            stats.bricks_destroyed as usize + state.arena.bricks.len(),
            stats.balls_lost,
            stats.lasers_fired,
            stats.ghosts_popped
        );
        for side in Side::BOTH {
            let paddle = state.paddle(side);
            let bound: Vec<&str> = SlotId::BOTH
                .iter()
                .map(|&slot| paddle.slot(slot).kind().map_or("-", |kind| kind.as_str()))
                .collect();
            log::info!(
                "{} paddle at {:?}, slots [{}]",
                side.as_str(),
                paddle.body().pos,
                bound.join(", ")
            );
        }
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let opts = <headless::Options as clap::Parser>::parse();
    headless::run(&opts);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless driver on the web
}
