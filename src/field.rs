use crate::error::FieldError;
use crate::grid::{AgeGrid, Scratch};
use crate::rules::{next_age, RollSource, RuleSet};
use crate::trace::ActivityTrace;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, trace};

/// Side of the square seeded by [`Field::seed`].
pub const DEFAULT_SEED_REGION: usize = 40;

/// Toroidal age field with its activity trace.
///
/// `R` supplies the draws for seeding and for the aging rules; tests can
/// hand in any [`RollSource`].
#[derive(Debug, Clone)]
pub struct Field<R = StdRng> {
    grid: AgeGrid,
    scratch: Scratch,
    trace: ActivityTrace,
    rules: RuleSet,
    rng: R,
    generation: u64,
    population: usize,
}

impl Field<StdRng> {
    /// Allocates a field seeded from OS entropy.
    pub fn new(width: usize, height: usize) -> Result<Self, FieldError> {
        Self::with_rng(width, height, StdRng::from_entropy())
    }

    /// Allocates a field whose draws are reproducible from `seed`.
    pub fn with_seed(width: usize, height: usize, seed: u64) -> Result<Self, FieldError> {
        Self::with_rng(width, height, StdRng::seed_from_u64(seed))
    }
}

impl<R> Field<R> {
    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    pub fn set_rules(&mut self, rules: RuleSet) {
        if rules != self.rules {
            debug!(rules = rules.name(), generation = self.generation, "rule set changed");
        }
        self.rules = rules;
    }

    /// Switches between the classic rules and the aging rules. Takes effect
    /// on the next step.
    pub fn set_rule_mode(&mut self, modified: bool) {
        self.set_rules(RuleSet::from_modified(modified));
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Live cells in the current generation.
    pub fn population(&self) -> usize {
        self.population
    }

    /// Current ages, row-major.
    pub fn ages(&self) -> &[i32] {
        self.grid.current()
    }

    /// Activity trace, row-major.
    pub fn traces(&self) -> &[f32] {
        self.trace.values()
    }

    fn checked_idx(&self, x: usize, y: usize) -> Result<usize, FieldError> {
        if x >= self.width() || y >= self.height() {
            return Err(FieldError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(self.grid.idx(x, y))
    }

    pub fn age(&self, x: usize, y: usize) -> Result<i32, FieldError> {
        let i = self.checked_idx(x, y)?;
        Ok(self.grid.current()[i])
    }

    pub fn trace(&self, x: usize, y: usize) -> Result<f32, FieldError> {
        let i = self.checked_idx(x, y)?;
        Ok(self.trace.get(i))
    }
}

impl<R: RollSource> Field<R> {
    pub fn with_rng(width: usize, height: usize, rng: R) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::InvalidDimensions { width, height });
        }
        let n = width * height;
        debug!(width, height, "allocating field");
        Ok(Self {
            grid: AgeGrid::new(width, height),
            scratch: Scratch::new(n),
            trace: ActivityTrace::new(n),
            rules: RuleSet::default(),
            rng,
            generation: 0,
            population: 0,
        })
    }

    /// Overwrites one cell of the current generation.
    pub fn set_age(&mut self, x: usize, y: usize, age: i32) -> Result<(), FieldError> {
        let i = self.checked_idx(x, y)?;
        let cell = &mut self.grid.current_mut()[i];
        self.population = self.population + (age > 0) as usize - (*cell > 0) as usize;
        *cell = age;
        Ok(())
    }

    /// Kills every cell and forgets dead-cell history. The trace is kept.
    pub fn clear(&mut self) {
        self.grid.current_mut().fill(0);
        self.population = 0;
    }

    /// Seeds the default 40x40 square around the centre.
    pub fn seed(&mut self) {
        // DEFAULT_SEED_REGION is non-zero
        let _ = self.seed_region(DEFAULT_SEED_REGION);
    }

    /// Sets every cell of a `size`-wide square centred on the grid midpoint
    /// alive with probability 1/3, dead otherwise. The square is clipped to
    /// the grid.
    pub fn seed_region(&mut self, size: usize) -> Result<(), FieldError> {
        if size == 0 {
            return Err(FieldError::InvalidRegion(size));
        }
        let (w, h) = (self.width(), self.height());
        let half = size / 2;
        let x0 = (w / 2).saturating_sub(half);
        let y0 = (h / 2).saturating_sub(half);
        let x1 = (w / 2 + (size - half)).min(w);
        let y1 = (h / 2 + (size - half)).min(h);

        let ages = self.grid.current_mut();
        let mut population = 0usize;
        for y in 0..h {
            for x in 0..w {
                let i = y * w + x;
                if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
                    ages[i] = (self.rng.roll(3) == 1) as i32;
                }
                population += (ages[i] > 0) as usize;
            }
        }
        self.population = population;
        debug!(size, population, "seeded field");
        Ok(())
    }

    /// Advances the whole field by one generation.
    pub fn step(&mut self) {
        let (w, h) = (self.width(), self.height());
        let rules = self.rules;

        self.scratch.snapshot(self.grid.current());
        neighbor_sums(&self.scratch.alive, w, h, &mut self.scratch.sums);

        let (cur, next) = self.grid.split();
        let mut population = 0usize;
        for (i, (dst, &age)) in next.iter_mut().zip(cur).enumerate() {
            let n = next_age(age, self.scratch.sums[i], rules, &mut self.rng);
            *dst = n;
            let alive = n > 0;
            population += alive as usize;
            self.trace.accumulate(i, alive);
        }
        self.grid.swap();

        self.generation += 1;
        self.population = population;
        trace!(generation = self.generation, population, "step");
    }

    pub fn steps(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }
}

/// Live-neighbor count of `(x, y)` with both axes wrapped independently.
pub fn toroidal_sum(alive: &[u8], w: usize, h: usize, x: usize, y: usize) -> u8 {
    let mut sum = 0u8;
    // offsets 0..3 stand for -1..=1; adding w (or h) keeps them unsigned
    for oy in 0..3 {
        for ox in 0..3 {
            if ox == 1 && oy == 1 {
                continue;
            }
            let nx = (x + w + ox - 1) % w;
            let ny = (y + h + oy - 1) % h;
            sum += alive[ny * w + nx];
        }
    }
    sum
}

/// Fills `sums` with the 8-neighbor live count of every cell.
///
/// Interior cells read their neighbors directly; the border rows and
/// columns go through [`toroidal_sum`].
pub fn neighbor_sums(alive: &[u8], w: usize, h: usize, sums: &mut [u8]) {
    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let i = y * w + x;
            sums[i] = alive[i - 1]
                + alive[i + 1]
                + alive[i - w - 1]
                + alive[i - w]
                + alive[i - w + 1]
                + alive[i + w - 1]
                + alive[i + w]
                + alive[i + w + 1];
        }
    }

    for x in 0..w {
        sums[x] = toroidal_sum(alive, w, h, x, 0);
        let y = h - 1;
        sums[y * w + x] = toroidal_sum(alive, w, h, x, y);
    }
    for y in 0..h {
        sums[y * w] = toroidal_sum(alive, w, h, 0, y);
        let x = w - 1;
        sums[y * w + x] = toroidal_sum(alive, w, h, x, y);
    }
}
