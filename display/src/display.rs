use log::debug;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use thiserror::Error;

use vm8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use vm8_core::FrameBuffer;

/// Anything SDL2 reports while creating or drawing to the window.
#[derive(Debug, Error)]
#[error("display error: {0}")]
pub struct DisplayError(String);

impl DisplayError {
    fn from_sdl(e: impl ToString) -> Self {
        DisplayError(e.to_string())
    }
}

/// Foreground and background colours for lit and unlit pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub foreground: [u8; 4],
    pub background: [u8; 4],
}

impl Palette {
    /// Builds a palette from two `0xRRGGBBAA` colours.
    pub fn from_rgba(foreground: u32, background: u32) -> Self {
        Palette {
            foreground: foreground.to_be_bytes(),
            background: background.to_be_bytes(),
        }
    }

    fn color(rgba: [u8; 4]) -> Color {
        Color::RGBA(rgba[0], rgba[1], rgba[2], rgba[3])
    }
}

/// # Display
/// The display is composed of 64x32 black/white pixels.
/// The on/off state of these pixels is encoded as true/false respectively in a 2d array.
/// The display only gets a call to `render` when the FrameBuffer is updated.
pub struct Display {
    canvas: sdl2::render::WindowCanvas,
    palette: Palette,
    scale: u32,
    outline: bool,
}

impl Display {
    /// Creates a new display object bound to an sdl2 context.
    ///
    /// # Arguments
    /// * `sdl` an sdl2 context with which to draw
    /// * `scale` the size multiplier for each pixel
    /// * `palette` the colours for lit and unlit pixels
    /// * `outline` whether lit pixels get a background-coloured border, for a grid look
    pub fn new(
        sdl: &sdl2::Sdl,
        scale: u32,
        palette: Palette,
        outline: bool,
    ) -> Result<Self, DisplayError> {
        let video_subsystem = sdl.video().map_err(DisplayError::from_sdl)?;
        let (width, height) = (DISPLAY_WIDTH as u32 * scale, DISPLAY_HEIGHT as u32 * scale);
        let window = video_subsystem
            .window("vm8", width, height)
            .position_centered()
            .build()
            .map_err(DisplayError::from_sdl)?;
        let canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(DisplayError::from_sdl)?;
        debug!("opened {width}x{height} window");

        let mut display = Display {
            canvas,
            palette,
            scale,
            outline,
        };
        display.clear();
        Ok(display)
    }

    /// Fills the whole window with the background colour.
    pub fn clear(&mut self) {
        self.canvas
            .set_draw_color(Palette::color(self.palette.background));
        self.canvas.clear();
        self.canvas.present();
    }

    /// Formats a FrameBuffer for rendering as an SDL2 RGB24 texture.
    ///
    /// An SDL2 texture is a 1D array of bytes that represent concatenated rows of RGB pixels.
    ///
    /// # Arguments
    /// * `frame` a FrameBuffer
    /// * `palette` the colours to map lit and unlit pixels to
    fn frame_to_sdl_texture(frame: &FrameBuffer, palette: &Palette) -> Vec<u8> {
        frame
            .iter()
            .flat_map(|row| row.iter())
            .flat_map(|&lit| {
                let rgba = if lit {
                    palette.foreground
                } else {
                    palette.background
                };
                [rgba[0], rgba[1], rgba[2]]
            })
            .collect()
    }

    /// Rectangles, in window coordinates, covering every lit pixel.
    fn lit_rects(frame: &FrameBuffer, scale: u32) -> Vec<Rect> {
        frame
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, &lit)| lit)
                    .map(move |(x, _)| {
                        Rect::new(
                            (x as u32 * scale) as i32,
                            (y as u32 * scale) as i32,
                            scale,
                            scale,
                        )
                    })
            })
            .collect()
    }

    /// Formats the FrameBuffer as an SDL2 RGB24 texture and renders it.
    ///
    /// # Arguments
    /// * `frame` a FrameBuffer
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError> {
        let texture_creator = self.canvas.texture_creator();

        let mut texture = texture_creator
            .create_texture_streaming(
                PixelFormatEnum::RGB24,
                DISPLAY_WIDTH as u32,
                DISPLAY_HEIGHT as u32,
            )
            .map_err(DisplayError::from_sdl)?;

        let pixels = Display::frame_to_sdl_texture(frame, &self.palette);
        let row_len = DISPLAY_WIDTH * 3;
        texture
            .with_lock(None, |buffer: &mut [u8], pitch: usize| {
                for (row, src) in pixels.chunks(row_len).enumerate() {
                    buffer[row * pitch..row * pitch + row_len].copy_from_slice(src);
                }
            })
            .map_err(DisplayError::from_sdl)?;

        self.canvas
            .copy(&texture, None, None)
            .map_err(DisplayError::from_sdl)?;

        if self.outline {
            self.canvas
                .set_draw_color(Palette::color(self.palette.background));
            self.canvas
                .draw_rects(&Display::lit_rects(frame, self.scale))
                .map_err(DisplayError::from_sdl)?;
        }

        self.canvas.present();
        Ok(())
    }
}
