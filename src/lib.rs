//! Toroidal Game of Life with aging rules and a decaying activity trace.
//!
//! On top of B3/S23 the aging rules keep a large field from freezing or
//! dying out:
//!
//! 1. A cell alive for 100 cycles either dies (1% chance) or is reborn with
//!    its age reset to 1.
//! 2. An empty cell that spent 100 cycles next to life spawns with a 1%
//!    chance if it has exactly two neighbors; otherwise its counter resets.
//!
//! # Example
//!
//! ```
//! use agelife::{render, DisplayMode, Field, Viewport};
//!
//! let mut field = Field::with_seed(120, 80, 7).unwrap();
//! field.seed();
//! field.steps(10);
//!
//! let view = Viewport::new(240, 160, 2.0);
//! let mut pixels = vec![0u8; view.buffer_len()];
//! render(&field, &mut pixels, &view, DisplayMode::Activity).unwrap();
//! ```

pub mod color;
pub mod error;
pub mod field;
pub mod grid;
pub mod raster;
pub mod rules;
pub mod trace;

pub use color::{activity_to_color, age_to_color, unpack};
pub use error::FieldError;
pub use field::{Field, DEFAULT_SEED_REGION};
pub use raster::{render, DisplayMode, Viewport, PIXEL_BYTES};
pub use rules::{next_age, RollSource, RuleSet};
