/// Two same-sized age buffers used as current/next without moving content.
///
/// Storage is flat and row-major. Wraparound is the step engine's business.
#[derive(Debug, Clone)]
pub struct AgeGrid {
    w: usize,
    h: usize,
    buffers: [Vec<i32>; 2],
    front: usize,
}

impl AgeGrid {
    pub fn new(w: usize, h: usize) -> Self {
        let n = w * h;
        Self {
            w,
            h,
            buffers: [vec![0; n], vec![0; n]],
            front: 0,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.w * self.h
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    pub fn current(&self) -> &[i32] {
        &self.buffers[self.front]
    }

    pub fn current_mut(&mut self) -> &mut [i32] {
        &mut self.buffers[self.front]
    }

    /// Read access to the current generation alongside write access to the
    /// next one.
    pub fn split(&mut self) -> (&[i32], &mut [i32]) {
        let [a, b] = &mut self.buffers;
        if self.front == 0 {
            (a.as_slice(), b.as_mut_slice())
        } else {
            (b.as_slice(), a.as_mut_slice())
        }
    }

    /// Makes the buffer written by the last `split` the current one.
    pub fn swap(&mut self) {
        self.front ^= 1;
    }
}

/// Per-step scratch: the alive/dead snapshot and the neighbor sums built
/// from it.
#[derive(Debug, Clone)]
pub struct Scratch {
    pub alive: Vec<u8>,
    pub sums: Vec<u8>,
}

impl Scratch {
    pub fn new(n: usize) -> Self {
        Self {
            alive: vec![0; n],
            sums: vec![0; n],
        }
    }

    /// Maps every age to 1 if alive, 0 otherwise.
    pub fn snapshot(&mut self, ages: &[i32]) {
        for (dst, &age) in self.alive.iter_mut().zip(ages) {
            *dst = (age > 0) as u8;
        }
    }
}
