//! Rasterizes a [`Field`] into a zoomed, panned pixel buffer.

use crate::color::{activity_to_color, age_to_color, unpack};
use crate::error::FieldError;
use crate::field::Field;

/// Bytes per pixel. Pixels are stored B, G, R, A.
pub const PIXEL_BYTES: usize = 4;

/// Interpolated ages below this are treated as empty when a neighbouring
/// sample is older than `GHOST_AGE`.
const GHOST_FLOOR: i32 = 2;
const GHOST_AGE: i32 = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Bilinear activity trace colored by [`activity_to_color`].
    #[default]
    Activity,
    /// Nearest-cell age colored by [`age_to_color`].
    Age,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Activity => DisplayMode::Age,
            DisplayMode::Age => DisplayMode::Activity,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DisplayMode::Activity => "activity",
            DisplayMode::Age => "age",
        }
    }
}

/// Destination size in pixels plus the zoom (pixels per cell) and pan (in
/// cells) applied to the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Viewport {
    pub fn new(width: usize, height: usize, zoom: f32) -> Self {
        Self {
            width,
            height,
            zoom,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }

    pub fn with_pan(mut self, pan_x: f32, pan_y: f32) -> Self {
        self.pan_x = pan_x;
        self.pan_y = pan_y;
        self
    }

    /// Bytes a buffer needs to hold this viewport.
    pub fn buffer_len(&self) -> usize {
        self.width * self.height * PIXEL_BYTES
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

/// Fills `buf` with the field as seen through `view`.
///
/// Pixels whose sampled trace is zero, and pixels outside the field's
/// zoomed extent, are left fully transparent (all bytes 0). Sampling does
/// not wrap: only source coordinates in `[0, width) x [0, height)` are
/// drawn.
pub fn render<R>(
    field: &Field<R>,
    buf: &mut [u8],
    view: &Viewport,
    mode: DisplayMode,
) -> Result<(), FieldError> {
    let zoom = view.zoom;
    if !(zoom.is_finite() && zoom > 0.0) {
        return Err(FieldError::InvalidZoom(zoom));
    }
    let needed = view.buffer_len();
    if buf.len() < needed {
        return Err(FieldError::BufferTooSmall {
            needed,
            actual: buf.len(),
        });
    }
    buf[..needed].fill(0);

    let (fw, fh) = (field.width(), field.height());
    let ages = field.ages();
    let traces = field.traces();

    // whole-pixel offsets; huge pans land outside the field and are skipped
    let dx = (view.pan_x * zoom).trunc();
    let dy = (view.pan_y * zoom).trunc();
    let rx = ((fw as f32 * zoom) as usize).min(view.width);
    let ry = ((fh as f32 * zoom) as usize).min(view.height);
    let inv = 1.0 / zoom;

    for y in 0..ry {
        let fy = (y as f32 + dy) * inv;
        if fy.is_nan() || fy < 0.0 {
            continue;
        }
        let y0 = fy as usize;
        if y0 >= fh {
            continue;
        }
        // the far neighbour for interpolation wraps; sampling itself does not
        let y1 = if y0 + 1 >= fh { 0 } else { y0 + 1 };
        let yv = fy - y0 as f32;

        for x in 0..rx {
            let fx = (x as f32 + dx) * inv;
            if fx.is_nan() || fx < 0.0 {
                continue;
            }
            let x0 = fx as usize;
            if x0 >= fw {
                continue;
            }
            let x1 = if x0 + 1 >= fw { 0 } else { x0 + 1 };
            let xv = fx - x0 as f32;

            let i00 = y0 * fw + x0;
            let i10 = y0 * fw + x1;
            let i01 = y1 * fw + x0;
            let i11 = y1 * fw + x1;

            let st = lerp(
                lerp(traces[i00], traces[i10], xv),
                lerp(traces[i01], traces[i11], xv),
                yv,
            );
            if st <= 0.0 {
                continue;
            }

            let col = match mode {
                DisplayMode::Activity => {
                    let a00 = ages[i00].max(0);
                    let a10 = ages[i10].max(0);
                    let a01 = ages[i01].max(0);
                    let a11 = ages[i11].max(0);
                    let max_age = a00.max(a10).max(a01).max(a11);

                    let mut age = lerp(
                        lerp(a00 as f32, a10 as f32, xv),
                        lerp(a01 as f32, a11 as f32, xv),
                        yv,
                    ) as i32;
                    if max_age > GHOST_AGE && age < GHOST_FLOOR {
                        age = 0;
                    }
                    activity_to_color(st, age)
                }
                DisplayMode::Age => age_to_color(ages[i00] as f32),
            };

            let (r, g, b) = unpack(col);
            let p = (y * view.width + x) * PIXEL_BYTES;
            buf[p] = b;
            buf[p + 1] = g;
            buf[p + 2] = r;
            buf[p + 3] = 0xFF;
        }
    }

    Ok(())
}
