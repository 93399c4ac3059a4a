// What you SEE:
// • A window with a checkerboard backdrop (or an image you pass as the
//   first argument) and a rounded "liquid glass" pane floating above it.
// • The backdrop bends through the pane like a convex lens, strongest
//   around the rim.
// • Hold Left Mouse inside the pane to drag it; it never leaves the window.
// • Resize the window: the pane stays put, only re-clamping at the edges.
// • ESC quits. RUST_LOG=debug shows synthesis/re-clamp diagnostics.

mod backdrop;
mod encode;
mod error;
mod field;
mod geometry;
mod lens;
mod refraction;
mod types;

use std::time::{Duration, Instant};

use minifb::{Key, MouseButton, MouseMode, Window, WindowOptions};

use backdrop::SoftwareFilter;
use error::Error;
use lens::{LensConfig, LiquidGlass};
use refraction::ConvexLens;
use types::{FrameBuffer, Viewport};

fn main() -> Result<(), Error> {
    env_logger::init();

    /* --- Optional backdrop image ---
       Visual: pass a path to see your own picture under the glass;
       otherwise you get the built-in checkerboard. */
    let source = match std::env::args().nth(1) {
        Some(path) => Some(load_backdrop(&path)?),
        None => None,
    };

    /* --- Window setup --- */
    let (mut win_w, mut win_h) = (1000usize, 800usize);
    let mut window = Window::new(
        "Liquid Lens — drag the glass, ESC quits",
        win_w,
        win_h,
        WindowOptions { resize: true, ..WindowOptions::default() },
    )
    .map_err(|e| Error::WindowInit(e.to_string()))?;

    let mut backdrop_fb = build_backdrop(win_w, win_h, source.as_ref());
    let mut screen = FrameBuffer::new(win_w, win_h);

    /* --- The lens itself ---
       Mount centers it and runs the one-and-only baseline synthesis. */
    let mut lens = LiquidGlass::new(
        LensConfig::default(),
        Viewport::new(win_w as f32, win_h as f32),
        Box::new(ConvexLens::default()),
    );
    let mut filter = SoftwareFilter::new();
    let mut published_pass = 0u64;

    /* --- Input edge detection + FPS bookkeeping --- */
    let mut mouse_was_down = false;
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    /* ------------------------------ Main loop ------------------------------ */
    while window.is_open() && !window.is_key_down(Key::Escape) {
        /* 1) Window resizes: re-clamp the lens (no resynthesis) and rebuild
           the backdrop at the new size. */
        let (w, h) = window.get_size();
        if w != win_w || h != win_h {
            win_w = w;
            win_h = h;
            lens.resize(Viewport::new(w as f32, h as f32));
            backdrop_fb = build_backdrop(w, h, source.as_ref());
            screen = FrameBuffer::new(w, h);
        }

        /* 2) Pointer events. Down/up are edge-detected from the button
           state; every frame with a known position counts as a move. */
        let down = window.get_mouse_down(MouseButton::Left);
        if let Some((mx, my)) = window.get_mouse_pos(MouseMode::Pass) {
            if down && !mouse_was_down {
                lens.pointer_down(mx, my);
            }
            lens.pointer_move(mx, my);
        }
        if !down && mouse_was_down {
            lens.pointer_up();
        }
        mouse_was_down = down;

        /* 3) Hand a freshly synthesized map to the filter. With the
           baseline policy this fires exactly once, right after mount. */
        if lens.synthesis_passes() != published_pass {
            lens.publish(&mut filter);
            published_pass = lens.synthesis_passes();
        }

        /* 4) Compose: backdrop first, then the refracted pane on top. */
        screen.pixels.copy_from_slice(&backdrop_fb.pixels);
        filter.compose(&mut screen, &backdrop_fb, lens.position(), lens.size());

        /* 5) Present to the window. */
        window
            .update_with_buffer(&screen.pixels, win_w, win_h)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;

        /* 6) FPS counter (printed once per second). */
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            println!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}

/// Decode a backdrop image from disk.
fn load_backdrop(path: &str) -> Result<image::RgbaImage, Error> {
    let img = image::open(path).map_err(|e| Error::BackdropDecode(format!("{path}: {e}")))?;
    Ok(img.to_rgba8())
}

/// Build the window-sized backdrop: tile the source image if one was given,
/// otherwise draw a checkerboard with a diagonal tint so the refraction has
/// visible structure to bend.
fn build_backdrop(width: usize, height: usize, source: Option<&image::RgbaImage>) -> FrameBuffer {
    let mut fb = FrameBuffer::new(width, height);

    match source {
        Some(img) => {
            let (iw, ih) = (img.width() as usize, img.height() as usize);
            for y in 0..height {
                for x in 0..width {
                    let p = img.get_pixel((x % iw) as u32, (y % ih) as u32);
                    fb.pixels[y * width + x] =
                        ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32;
                }
            }
        }
        None => {
            for y in 0..height {
                for x in 0..width {
                    // 24px checker, shaded by a diagonal gradient.
                    let checker = ((x / 24) + (y / 24)) % 2;
                    let base: u32 = if checker == 0 { 0xD8 } else { 0x70 };
                    let tint = ((x + y) * 96 / (width + height).max(1)) as u32;
                    let r = (base + tint).min(255);
                    let g = base;
                    let b = (base + 96 - tint.min(96)).min(255);
                    fb.pixels[y * width + x] = (r << 16) | (g << 8) | b;
                }
            }
        }
    }

    fb
}
