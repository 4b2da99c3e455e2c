use rand::Rng;

/// Ages are clamped to this many consecutive cycles before a roll decides
/// what happens next.
pub const AGE_LIMIT: i32 = 100;
/// Sides of the die thrown at the age limit.
pub const ROLL_SIDES: u32 = 100;
/// The one face out of `ROLL_SIDES` that flips the outcome (1%).
pub const LUCKY_ROLL: u32 = 99;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RuleSet {
    /// Plain B3/S23.
    Classic,
    /// B3/S23 plus aging: old cells die or are reborn, long-haunted empty
    /// cells either spawn or forget their history.
    #[default]
    Aging,
}

impl RuleSet {
    pub fn from_modified(modified: bool) -> Self {
        if modified {
            RuleSet::Aging
        } else {
            RuleSet::Classic
        }
    }

    pub fn is_modified(self) -> bool {
        matches!(self, RuleSet::Aging)
    }

    pub fn name(self) -> &'static str {
        match self {
            RuleSet::Classic => "classic",
            RuleSet::Aging => "aging",
        }
    }
}

/// Source of the uniform integer draws used by the aging rules and seeding.
pub trait RollSource {
    /// Returns a uniform value in `0..sides`.
    fn roll(&mut self, sides: u32) -> u32;
}

impl<R: Rng> RollSource for R {
    fn roll(&mut self, sides: u32) -> u32 {
        self.gen_range(0..sides)
    }
}

fn lucky<D: RollSource + ?Sized>(dice: &mut D) -> bool {
    dice.roll(ROLL_SIDES) == LUCKY_ROLL
}

/// Computes the next age of one cell from its current age and live-neighbor
/// count.
///
/// Positive ages count consecutive live cycles, negative ages count dead
/// cycles spent next to life. The aging branches are guarded on the
/// tentative classic result, not on the raw sum.
pub fn next_age<D: RollSource + ?Sized>(current: i32, sum: u8, rules: RuleSet, dice: &mut D) -> i32 {
    let mut next = match sum {
        0 | 1 => 0,
        2 => current,
        3 => 1,
        _ => 0,
    };

    if !rules.is_modified() {
        return next;
    }

    if next <= 0 && current <= 0 {
        next = current - 1;
        if sum == 0 {
            next = 0;
        }
        if next < -AGE_LIMIT {
            next = if sum == 2 && lucky(dice) { 1 } else { 0 };
        }
    } else if next > 0 && current > 0 {
        next = current + 1;
        if next > AGE_LIMIT {
            next = if lucky(dice) { 0 } else { 1 };
        }
    }

    next
}
