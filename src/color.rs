//! Scalar-to-color mappings for drawing the field.
//!
//! Colors are packed as `r | g << 8 | b << 16`; 0 means "draw nothing".

const ACTIVITY_FLOOR: f32 = 0.0005;
const ACTIVITY_FRESH: f32 = 0.008;
const ACTIVITY_HIGH: f32 = 0.2;
const YOUTH: i32 = 15;

const AGE_NEW: f32 = 3.0;
const AGE_YOUNG: f32 = 15.0;
const AGE_MATURE: f32 = 50.0;
const AGE_OLD: f32 = 100.0;

#[inline]
pub fn pack(r: i32, g: i32, b: i32) -> u32 {
    (r.clamp(0, 255) as u32) | ((g.clamp(0, 255) as u32) << 8) | ((b.clamp(0, 255) as u32) << 16)
}

#[inline]
pub fn unpack(col: u32) -> (u8, u8, u8) {
    (
        (col & 0xFF) as u8,
        ((col >> 8) & 0xFF) as u8,
        ((col >> 16) & 0xFF) as u8,
    )
}

/// Activity color: freshly born cells glow green, everything else runs from
/// dim blue through magenta to red as activity builds up.
pub fn activity_to_color(vv: f32, age: i32) -> u32 {
    if vv < ACTIVITY_FLOOR {
        return 0;
    }

    let (mut r, mut g, mut b) = (0, 0, 0);
    if age > 0 && age < YOUTH {
        if vv < ACTIVITY_FRESH {
            g = (vv / ACTIVITY_FRESH * 255.0) as i32;
        } else if vv < ACTIVITY_HIGH {
            g = 255;
        }
    }

    if g == 0 {
        if vv < ACTIVITY_HIGH {
            b = (255.0 / ACTIVITY_HIGH * vv) as i32;
        } else {
            r = ((255.0 * vv * 2.0) as i32).min(255);
            b = ((255.0 - (vv - ACTIVITY_HIGH) * 10.0) as i32).max(0);
        }
    }

    pack(r, g, b)
}

/// Rainbow by age: green, cyan, blue, magenta, red.
pub fn age_to_color(age: f32) -> u32 {
    if age <= 0.0 {
        return 0;
    }

    let (mut r, mut g, mut b) = (0, 0, 0);
    if age < AGE_NEW {
        g = 255;
    } else if age < AGE_YOUNG {
        let t = (age - AGE_NEW) / (AGE_YOUNG - AGE_NEW);
        g = (255.0 * (1.0 - t)) as i32;
        b = (255.0 * t) as i32;
    } else if age < AGE_MATURE {
        b = 255;
    } else if age < AGE_OLD {
        let t = (age - AGE_MATURE) / (AGE_OLD - AGE_MATURE);
        b = (255.0 * (1.0 - t)) as i32;
        r = (255.0 * t) as i32;
    } else {
        r = 255;
    }

    pack(r, g, b)
}
