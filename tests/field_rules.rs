use agelife::field::{neighbor_sums, toroidal_sum};
use agelife::rules::{AGE_LIMIT, LUCKY_ROLL};
use agelife::{Field, FieldError, RollSource, RuleSet};
use std::collections::VecDeque;

/// Plays back queued draws, then repeats `fallback` forever.
struct Scripted {
    queued: VecDeque<u32>,
    fallback: u32,
    rolls: usize,
}

impl Scripted {
    fn always(v: u32) -> Self {
        Self::then(&[], v)
    }

    fn then(first: &[u32], fallback: u32) -> Self {
        Self {
            queued: first.iter().copied().collect(),
            fallback,
            rolls: 0,
        }
    }
}

impl RollSource for Scripted {
    fn roll(&mut self, sides: u32) -> u32 {
        self.rolls += 1;
        self.queued.pop_front().unwrap_or(self.fallback) % sides
    }
}

const BLOCK: [(usize, usize); 4] = [(2, 2), (3, 2), (2, 3), (3, 3)];

/// Cells orthogonally touching the block; each sees exactly two live cells.
const RING: [(usize, usize); 8] = [
    (2, 1),
    (3, 1),
    (1, 2),
    (4, 2),
    (1, 3),
    (4, 3),
    (2, 4),
    (3, 4),
];

fn block_field(dice: Scripted) -> Field<Scripted> {
    let mut field = Field::with_rng(8, 8, dice).unwrap();
    for (x, y) in BLOCK {
        field.set_age(x, y, 1).unwrap();
    }
    field
}

fn live_cells<R>(field: &Field<R>) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for y in 0..field.height() {
        for x in 0..field.width() {
            if field.age(x, y).unwrap() > 0 {
                out.push((x, y));
            }
        }
    }
    out
}

#[test]
fn edge_sums_match_an_infinitely_tiled_grid() {
    // every cell of a 4x4 grid is a border cell
    let (w, h) = (4usize, 4usize);
    let pattern = [
        1, 0, 0, 1, //
        0, 1, 0, 0, //
        1, 1, 0, 1, //
        0, 0, 1, 1, //
    ];
    let alive: Vec<u8> = pattern.to_vec();
    let mut sums = vec![0u8; w * h];
    neighbor_sums(&alive, w, h, &mut sums);

    for y in 0..h {
        for x in 0..w {
            // the same cell seen from the middle copy of a 3x3 tiling
            let (tx, ty) = (x + w, y + h);
            let mut expected = 0;
            for ny in ty - 1..=ty + 1 {
                for nx in tx - 1..=tx + 1 {
                    if (nx, ny) != (tx, ty) {
                        expected += alive[(ny % h) * w + (nx % w)];
                    }
                }
            }
            assert_eq!(sums[y * w + x], expected, "cell ({x}, {y})");
            assert_eq!(toroidal_sum(&alive, w, h, x, y), expected);
        }
    }
}

#[test]
fn blinker_has_period_two() {
    let mut field = Field::with_seed(5, 5, 0).unwrap();
    field.set_rule_mode(false);
    for x in 1..=3 {
        field.set_age(x, 2, 1).unwrap();
    }
    let start = live_cells(&field);

    field.step();
    assert_eq!(live_cells(&field), vec![(2, 1), (2, 2), (2, 3)]);
    field.step();
    assert_eq!(live_cells(&field), start);
    assert_eq!(field.generation(), 2);
}

#[test]
fn blinker_across_the_seam_has_period_two() {
    let mut field = Field::with_seed(6, 5, 0).unwrap();
    field.set_rule_mode(false);
    for x in [5, 0, 1] {
        field.set_age(x, 0, 1).unwrap();
    }
    let start = live_cells(&field);

    field.step();
    assert_eq!(live_cells(&field), vec![(0, 0), (0, 1), (0, 4)]);
    field.step();
    assert_eq!(live_cells(&field), start);
}

#[test]
fn glider_comes_home_on_a_torus() {
    let mut field = Field::with_seed(8, 8, 0).unwrap();
    field.set_rule_mode(false);
    for (x, y) in [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)] {
        field.set_age(x, y, 1).unwrap();
    }
    let start = field.ages().to_vec();

    // a glider moves one cell diagonally every four generations
    field.steps(4 * 8);
    assert_eq!(field.ages(), &start[..]);
    assert_eq!(field.population(), 5);
}

#[test]
fn classic_rules_never_age_cells() {
    let mut field = block_field(Scripted::always(0));
    field.set_rules(RuleSet::Classic);
    field.steps(150);
    for (x, y) in BLOCK {
        assert_eq!(field.age(x, y).unwrap(), 1);
    }
    for (x, y) in RING {
        assert_eq!(field.age(x, y).unwrap(), 0);
    }
    assert_eq!(field.rules(), RuleSet::Classic);
}

#[test]
fn living_cells_age_until_the_limit_then_are_reborn() {
    let mut field = block_field(Scripted::always(0));
    for k in 1..=(AGE_LIMIT - 1) {
        field.step();
        for (x, y) in BLOCK {
            assert_eq!(field.age(x, y).unwrap(), 1 + k);
        }
    }
    field.step();
    for (x, y) in BLOCK {
        assert_eq!(field.age(x, y).unwrap(), 1);
    }

    for _ in 0..250 {
        field.step();
        assert!(field.ages().iter().all(|a| a.abs() <= AGE_LIMIT));
    }
}

#[test]
fn lucky_roll_kills_old_cells() {
    let mut field = block_field(Scripted::always(LUCKY_ROLL));
    field.steps(AGE_LIMIT as usize - 1);
    assert_eq!(field.population(), 4);
    field.step();
    assert_eq!(field.population(), 0);
}

#[test]
fn dead_counters_run_down_then_reset() {
    let mut field = block_field(Scripted::always(0));
    for k in 1..=AGE_LIMIT {
        field.step();
        for (x, y) in RING {
            assert_eq!(field.age(x, y).unwrap(), -k);
        }
        // diagonal neighbors see one live cell and count down too
        assert_eq!(field.age(1, 1).unwrap(), -k);
    }
    field.step();
    for (x, y) in RING {
        assert_eq!(field.age(x, y).unwrap(), 0);
    }
    assert_eq!(field.age(1, 1).unwrap(), 0);
    assert!(field.ages().iter().all(|&a| a >= -AGE_LIMIT));
}

#[test]
fn haunted_cells_with_two_neighbors_can_spawn() {
    // the block's four rolls at its age limit miss, the ring's rolls hit
    let mut field = block_field(Scripted::then(&[0, 0, 0, 0], LUCKY_ROLL));
    field.steps(AGE_LIMIT as usize + 1);
    for (x, y) in RING {
        assert_eq!(field.age(x, y).unwrap(), 1, "ring cell ({x}, {y})");
    }
    // one neighbor is never enough
    assert_eq!(field.age(1, 1).unwrap(), 0);
    for (x, y) in BLOCK {
        assert_eq!(field.age(x, y).unwrap(), 2);
    }
}

#[test]
fn isolated_dead_cells_forget_their_history() {
    let mut field = Field::with_rng(6, 6, Scripted::always(LUCKY_ROLL)).unwrap();
    field.set_age(0, 0, -37).unwrap();
    field.set_age(3, 3, -100).unwrap();
    field.step();
    assert_eq!(field.age(0, 0).unwrap(), 0);
    assert_eq!(field.age(3, 3).unwrap(), 0);
    assert!(field.ages().iter().all(|&a| a == 0));
}

#[test]
fn trace_tracks_recent_life() {
    let mut field = block_field(Scripted::always(0));
    field.set_rules(RuleSet::Classic);
    let n = 60;
    field.steps(n);
    let t0 = field.trace(2, 2).unwrap();
    let expected = 1.0 - 0.99f32.powi(n as i32);
    assert!((t0 - expected).abs() < 1e-4, "{t0} vs {expected}");
    assert_eq!(field.trace(0, 0).unwrap(), 0.0);

    field.clear();
    let m = 80;
    field.steps(m);
    let t = field.trace(2, 2).unwrap();
    let expected = t0 * 0.99f32.powi(m as i32);
    assert!((t - expected).abs() < 1e-4, "{t} vs {expected}");
}

#[test]
fn fixed_seed_runs_are_bit_identical() {
    let run = |seed| {
        let mut field = Field::with_seed(64, 48, seed).unwrap();
        field.seed();
        field.steps(300);
        (field.ages().to_vec(), field.traces().to_vec())
    };
    let (ages_a, trace_a) = run(42);
    let (ages_b, trace_b) = run(42);
    assert_eq!(ages_a, ages_b);
    assert_eq!(trace_a, trace_b);
}

#[test]
fn rule_mode_switches_on_the_next_step() {
    let mut field = block_field(Scripted::always(0));
    field.steps(3);
    assert_eq!(field.age(2, 2).unwrap(), 4);
    field.set_rule_mode(false);
    assert_eq!(field.age(2, 2).unwrap(), 4);
    field.step();
    assert_eq!(field.age(2, 2).unwrap(), 1);
    field.set_rule_mode(true);
    field.step();
    assert_eq!(field.age(2, 2).unwrap(), 2);
}

#[test]
fn accessors_reject_out_of_range_cells() {
    let mut field = Field::with_seed(5, 4, 1).unwrap();
    let err = FieldError::OutOfBounds {
        x: 5,
        y: 0,
        width: 5,
        height: 4,
    };
    assert_eq!(field.age(5, 0), Err(err.clone()));
    assert_eq!(field.trace(5, 0), Err(err.clone()));
    assert_eq!(field.set_age(5, 0, 1), Err(err));
    assert!(field.age(0, 4).is_err());
    assert!(field.age(4, 3).is_ok());
}
