use log::debug;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

/// A mono square wave, alternating between `+volume` and `-volume`.
///
/// Owned by SDL's audio thread once the device is opened.
pub struct SquareWave {
    half_period: u32,
    volume: i16,
    sample: u32,
}

impl SquareWave {
    pub fn new(sample_rate: u32, tone_hz: u32, volume: i16) -> Self {
        let period = sample_rate / tone_hz.max(1);
        SquareWave {
            half_period: (period / 2).max(1),
            volume,
            sample: 0,
        }
    }
}

impl AudioCallback for SquareWave {
    type Channel = i16;

    fn callback(&mut self, out: &mut [i16]) {
        for x in out.iter_mut() {
            *x = if (self.sample / self.half_period) % 2 == 1 {
                self.volume
            } else {
                self.volume.saturating_neg()
            };
            self.sample = self.sample.wrapping_add(1);
        }
    }
}

/// Plays the tone while the sound timer is running.
pub struct Beeper {
    device: AudioDevice<SquareWave>,
    active: bool,
}

impl Beeper {
    pub fn new(
        sdl: &sdl2::Sdl,
        sample_rate: u32,
        tone_hz: u32,
        volume: i16,
    ) -> Result<Self, String> {
        let audio = sdl.audio()?;
        let freq = i32::try_from(sample_rate)
            .map_err(|_| format!("sample rate {sample_rate} Hz is out of range"))?;
        let desired = AudioSpecDesired {
            freq: Some(freq),
            channels: Some(1),
            samples: Some(512),
        };
        let device = audio.open_playback(None, &desired, |obtained| {
            debug!("audio device opened at {} Hz", obtained.freq);
            SquareWave::new(obtained.freq as u32, tone_hz, volume)
        })?;
        Ok(Beeper {
            device,
            active: false,
        })
    }

    pub fn set_active(&mut self, active: bool) {
        if active == self.active {
            return;
        }
        if active {
            self.device.resume();
        } else {
            self.device.pause();
        }
        self.active = active;
    }
}
