use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use sdl2::event::Event;

use vm8_core::constants::TIMER_HZ;
use vm8_core::{Chip8, RunState};
use vm8_display::Display;

use crate::audio::Beeper;
use crate::config::Config;
use crate::keymap::{host_key, keypad, HostKey};

pub fn run(config: Config) -> Result<()> {
    let mut chip8 = Chip8::load_rom(&config.rom)
        .with_context(|| format!("could not load {}", config.rom.display()))?;
    info!(
        "running {} at {} instructions/s",
        chip8.rom().name(),
        config.instructions_per_second
    );

    // Get SDL2 context
    let sdl = sdl2::init().map_err(|e| anyhow!("could not initialise SDL: {e}"))?;
    let mut display = Display::new(&sdl, config.scale, config.palette, config.outline)
        .context("could not open display")?;
    let mut events = sdl
        .event_pump()
        .map_err(|e| anyhow!("could not get SDL event pump: {e}"))?;

    // A missing audio device only costs us the beep
    let mut beeper = match Beeper::new(&sdl, config.sample_rate, config.tone_hz, config.volume) {
        Ok(beeper) => Some(beeper),
        Err(e) => {
            warn!("continuing without sound: {e}");
            None
        }
    };

    let frame_time = Duration::from_secs(1) / TIMER_HZ;
    let instructions_per_frame = config.instructions_per_frame();
    let mut slot = config.slot;

    loop {
        let frame_start = Instant::now();

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => chip8.set_run_state(RunState::Stopped),
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => match host_key(key) {
                    Some(HostKey::Keypad(index)) => chip8.key_press(index),
                    Some(HostKey::Quit) => chip8.set_run_state(RunState::Stopped),
                    Some(HostKey::TogglePause) => {
                        chip8.toggle_pause();
                        info!("{:?}", chip8.run_state());
                    }
                    Some(HostKey::Save) => {
                        if let Err(e) = chip8.save_state(&config.save_dir, slot) {
                            warn!("could not save slot {slot}: {e}");
                        }
                    }
                    Some(HostKey::Load) => {
                        if let Err(e) = chip8.load_state(&config.save_dir, slot) {
                            warn!("could not load slot {slot}: {e}");
                        }
                    }
                    Some(HostKey::SelectSlot(selected)) => {
                        slot = selected;
                        info!("selected slot {slot}");
                    }
                    Some(HostKey::Reset) => {
                        chip8.reset();
                        display.clear();
                        info!("reset {}", chip8.rom().name());
                    }
                    None => {}
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(index) = keypad(key) {
                        chip8.key_release(index);
                    }
                }
                _ => {}
            }
        }

        // Update state
        match chip8.run_state() {
            RunState::Stopped => break,
            RunState::Paused => {}
            RunState::Running => {
                for _ in 0..instructions_per_frame {
                    // faults are logged by the machine and stop it
                    if chip8.step().is_err() {
                        break;
                    }
                }
                chip8.tick_timers();
            }
        }

        if let Some(beeper) = beeper.as_mut() {
            beeper.set_active(chip8.run_state() == RunState::Running && chip8.sound_active());
        }

        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.take_frame() {
            display.render(&frame).context("could not draw frame")?;
        }

        // Handle timing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    info!("stopped {}", chip8.rom().name());
    Ok(())
}
