//! Friendship lamp: plays pixel art on an RGB LED matrix.
//!
//! Runs the show once (or forever with `--loop`): a static picture, a
//! scrolling picture, then a looped animation. Button presses are read from
//! stdin (a pin number or button name per line) and logged.
//!
//! ## Usage
//! ```sh
//! sudo ./target/release/friendship-lamp-rs --art-dir art \
//!     --static-art aram --scroll-art valorant --animation peped
//! ```

#[cfg(not(feature = "hardware"))]
fn main() {
    eprintln!("This binary requires the 'hardware' feature (rpi-led-matrix).");
    eprintln!("Build with: cargo build --release");
    eprintln!("Tests can run without it: cargo test --no-default-features");
    std::process::exit(1);
}

#[cfg(feature = "hardware")]
fn main() {
    if let Err(e) = hardware_main() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "hardware")]
fn hardware_main() -> Result<(), Box<dyn std::error::Error>> {
    use clap::Parser;
    use friendship_lamp_rs::driver::LedMatrixDriver;
    use friendship_lamp_rs::grid::Grid;
    use friendship_lamp_rs::input::{ButtonEvents, LineInput};
    use friendship_lamp_rs::player::{Outcome, Player};
    use friendship_lamp_rs::{PanelConfig, Timing, assets, is_running, setup_signal_handler};
    use std::io::BufReader;
    use std::path::PathBuf;
    use std::time::Duration;
    use tracing_subscriber::EnvFilter;

    /// Pixel-art player for an RGB LED matrix
    #[derive(Parser)]
    #[command(name = "friendship-lamp-rs")]
    #[command(version)]
    struct Args {
        /// Directory containing pixel art (JSON/PNG frames, animation directories)
        #[arg(long, default_value = "art")]
        art_dir: PathBuf,

        /// Number of rows on the LED panel
        #[arg(long, default_value = "7")]
        rows: usize,

        /// Number of columns on the LED panel
        #[arg(long, default_value = "17")]
        cols: usize,

        /// Brightness level between 0.0 and 1.0
        #[arg(long, default_value = "0.25")]
        brightness: f32,

        /// rpi-led-matrix hardware mapping
        #[arg(long, default_value = "adafruit-hat")]
        hardware_mapping: String,

        /// GPIO slowdown (Pi Zero 2 W needs 2)
        #[arg(long, default_value = "2")]
        gpio_slowdown: u32,

        /// Art shown as a still picture
        #[arg(long)]
        static_art: Option<String>,

        /// Art scrolled right to left
        #[arg(long)]
        scroll_art: Option<String>,

        /// Animation (directory or JSON list of frames)
        #[arg(long)]
        animation: Option<String>,

        /// Passes through the animation
        #[arg(long, default_value = "5")]
        repeats: usize,

        /// How long the static picture stays up, in milliseconds
        #[arg(long, default_value = "1000")]
        static_dwell_ms: u64,

        /// Delay between scroll steps, in milliseconds
        #[arg(long, default_value = "100")]
        scroll_tick_ms: u64,

        /// Delay between animation frames, in milliseconds
        #[arg(long, default_value = "100")]
        animation_tick_ms: u64,

        /// Show the boot-up progress bar first
        #[arg(long)]
        boot: bool,

        /// Repeat the show until Ctrl+C
        #[arg(long = "loop")]
        loop_show: bool,
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false) // Disable ANSI color codes for systemd/journald
        .compact()
        .init();

    let args = Args::parse();
    let panel = PanelConfig::new(args.rows, args.cols);
    let timing = Timing {
        static_dwell: Duration::from_millis(args.static_dwell_ms),
        scroll_tick: Duration::from_millis(args.scroll_tick_ms),
        animation_tick: Duration::from_millis(args.animation_tick_ms),
        animation_repeats: args.repeats,
        ..Timing::default()
    };

    tracing::info!("Friendship lamp v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Panel: {}x{}", panel.cols, panel.rows);
    tracing::info!("Art dir: {}", args.art_dir.display());

    // Load everything up front so a bad file fails before the panel lights up.
    let load_frame =
        |name: &str| assets::find_art(&args.art_dir, name).and_then(|p| assets::load_frame(&p));
    let load_animation =
        |name: &str| assets::find_art(&args.art_dir, name).and_then(|p| assets::load_animation(&p));
    let static_art = args.static_art.as_deref().map(load_frame).transpose()?;
    let scroll_art = args.scroll_art.as_deref().map(load_frame).transpose()?;
    let animation = args.animation.as_deref().map(load_animation).transpose()?;

    if static_art.is_none() && scroll_art.is_none() && animation.is_none() && !args.boot {
        let available: Vec<String> = assets::list_art(&args.art_dir)
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        tracing::warn!("Nothing to show. Available art: {}", available.join(", "));
        return Ok(());
    }

    let running = setup_signal_handler()?;

    let driver = LedMatrixDriver::new(panel, &args.hardware_mapping, args.gpio_slowdown)?;
    let mut grid = Grid::new(driver, panel);
    grid.set_brightness(args.brightness)?;

    // Button presses come in on stdin, one per line.
    let mut input = LineInput::new();
    let events = ButtonEvents::attach(&mut input);
    std::thread::spawn(move || {
        if let Err(e) = input.run(BufReader::new(std::io::stdin())) {
            tracing::warn!("Button input stopped: {}", e);
        }
    });

    let mut player = Player::new(grid, timing, running.clone()).with_buttons(events);

    if args.boot && player.boot_up() == Outcome::Interrupted {
        return Ok(());
    }

    loop {
        if let Some(frame) = &static_art {
            if player.display_art(frame) == Outcome::Interrupted {
                break;
            }
        }
        if let Some(frame) = &scroll_art {
            if player.display_scrolling_art(frame) == Outcome::Interrupted {
                break;
            }
        }
        if let Some(animation) = &animation {
            if player.display_animation(animation) == Outcome::Interrupted {
                break;
            }
        }
        if !args.loop_show || !is_running(&running) {
            break;
        }
    }

    player.clear();
    tracing::info!("Shutting down cleanly.");
    Ok(())
}
