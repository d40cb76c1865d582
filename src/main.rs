// What you SEE:
// • A pond. Hold Left Mouse to raise the surface; ripples spread and fade.
// • D toggles the debug overlay (INPUT / PREV / PREV2 buffers down the left side).
// • C calms the water. S saves the current height map as a PNG. ESC quits.
// • R re-reads the config file and applies its simulation tunables live.
//
// Usage: ripple-pad [config.json]
//        ripple-pad --dump-config out.json   (write the defaults and exit)
// RUST_LOG=debug logs every wave step.

mod config;
mod cycle;
mod draw;
mod error;
mod export;
mod kernel;
mod overlay;
mod paint;
mod params;
mod shade;
mod types;

use config::WaveConfig;
use cycle::WaveBufferCycle;
use draw::{draw_crosshair, draw_text_5x7, Drawer};
use error::Error;
use kernel::KernelRegistry;
use paint::PaintCanvas;
use params::SimulationParameters;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use types::{Buffer, FrameBuffer, REST};

const TARGET_FPS: usize = 60;

/// Global frame counter the decimation gate reads. Starts at 1.
struct FrameClock {
    frame: u64,
}

impl FrameClock {
    fn new() -> Self {
        Self { frame: 1 }
    }

    fn current(&self) -> u64 {
        self.frame
    }

    fn advance(&mut self) {
        self.frame += 1;
    }
}

enum Launch {
    /// Config plus the file it came from, if any (R reloads it).
    Run(WaveConfig, Option<PathBuf>),
    DumpConfig(String),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Launch, Error> {
    match (args.next(), args.next()) {
        (Some(flag), Some(out)) if flag == "--dump-config" => Ok(Launch::DumpConfig(out)),
        (Some(path), _) => {
            let cfg = WaveConfig::load_json(Path::new(&path))?;
            log::info!("loaded config from {path}");
            Ok(Launch::Run(cfg, Some(PathBuf::from(path))))
        }
        (None, _) => Ok(Launch::Run(WaveConfig::default(), None)),
    }
}

/// Re-read the launch config, keeping only the clamped simulation tunables.
fn reload_params(path: Option<&Path>) -> Result<Option<SimulationParameters>, Error> {
    let Some(path) = path else { return Ok(None) };
    Ok(Some(WaveConfig::load_json(path)?.simulation()))
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let (cfg, cfg_path) = match parse_args(std::env::args().skip(1))? {
        Launch::Run(cfg, path) => (cfg, path),
        Launch::DumpConfig(out) => {
            WaveConfig::default().save_json(Path::new(&out))?;
            log::info!("default config written to {out}");
            return Ok(());
        }
    };
    let params = cfg.simulation();

    /* --- Window + screen buffer ---
       Visual: a square window; `screen` is every pixel you see in it. */
    let side = cfg.window_size.max(64);
    let mut drawer = Drawer::new("Ripple Pad", side, side, TARGET_FPS)?;
    let mut screen = FrameBuffer::new(side, side);

    /* --- Wave cycle: kernel registry first, then the paint canvas hands over Input ---
       Visual: nothing yet; Output starts at rest so the first frame is a flat pond. */
    let registry = KernelRegistry::with_defaults();
    log::info!("{} kernel(s) registered", registry.len());
    let mut cycle = WaveBufferCycle::new(&registry, params)?;

    let canvas = PaintCanvas::new(params.input_texture_size, cfg.brush_radius, cfg.brush_strength);
    cycle.initialize(canvas.create_input());
    cycle.set_output(Some(Buffer::filled(canvas.size(), canvas.size(), REST)));
    log::info!("cycle {:?}, stepping every {} frame(s)", cycle.state(), cycle.params().update_frame_timing);

    /* --- HUD / FPS ---
       Visual: key hints + FPS along the top edge. */
    let mut clock = FrameClock::new();
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");
    let mut show_debug = cfg.debug;
    let mut last_paint: Option<(i32, i32)> = None;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();

        /* 1) Inputs */
        if drawer.d_pressed_once() { show_debug = !show_debug; }
        if drawer.c_pressed_once() { cycle.reset(); }
        if drawer.r_pressed_once() {
            // Only the tunables change live; sizes stay as they were at startup.
            match reload_params(cfg_path.as_deref()) {
                Ok(Some(p)) => {
                    cycle.configure(p);
                    log::info!("reloaded tunables: {:?}", cycle.params());
                }
                Ok(None) => log::info!("no config file to reload"),
                Err(e) => log::warn!("reload failed: {e}"),
            }
        }
        if drawer.s_pressed_once() {
            if let Some(out) = cycle.output() {
                if let Err(e) = export::save_height_map(out, &cfg.export_path) {
                    log::warn!("export failed: {e}");
                }
            }
        }

        /* 2) Paint into Input while LMB is held; strokes join consecutive positions.
           Visual: nothing until the next wave step picks the paint up. */
        let mouse = drawer.mouse_pos();
        match (drawer.left_mouse_down(), mouse, cycle.input_mut()) {
            (true, Some(pos), Some(input)) => {
                let at = canvas.to_canvas(pos, (screen.width, screen.height));
                match last_paint {
                    Some(from) => canvas.stroke(input, from, at),
                    None => canvas.dab(input, at.0, at.1),
                }
                last_paint = Some(at);
            }
            _ => last_paint = None,
        }

        /* 3) Per-frame hook: advances every `update_frame_timing` frames.
           Visual: ripples move in small jumps, one per advanced step. */
        cycle.step(clock.current());

        /* 4) Show the output surface.
           Visual: blue water, bright on crests, dark in troughs. */
        if let Some(out) = cycle.output() {
            shade::shade_water(out, &mut screen);
        }

        if show_debug {
            overlay::draw_debug_overlay(&mut screen, &cycle);
        }

        if let Some((mx, my)) = mouse {
            draw_crosshair(&mut screen, mx as i32, my as i32, 8, 0x00_FF_FF_FF);
        }

        let hud = format!("LMB: PAINT  D: DEBUG  C: CALM  R: RELOAD  S: SAVE | {hud_fps_text}");
        let hud_x = if show_debug { (screen.height / 3) as i32 + 8 } else { 8 };
        draw_text_5x7(&mut screen, hud_x, 8, &hud, 0x00_FF_FF_FF);

        /* 5) Present (this is when the window changes). */
        drawer.present(&screen)?;
        clock.advance();

        /* 6) FPS (log + HUD once per second) */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            log::info!("FPS: {:.1}, {} wave steps", fps, cycle.steps());
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
