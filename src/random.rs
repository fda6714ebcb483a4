//! Biased random draws used to pick effect parameters.
//!
//! Every helper takes the random source explicitly so callers can inject a
//! seeded generator. The formulas are deliberately simple rounding schemes
//! over a single `[0, 1)` draw, and several of them are not uniform over
//! their nominal range (see [`range_round`]).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[inline]
fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// `floor(u * bound)`, in `[0, bound)`. Returns 0 for a zero bound.
pub fn uniform_int<R: Rng + ?Sized>(rng: &mut R, bound: usize) -> usize {
    let value = (unit(rng) * bound as f64).floor() as usize;
    value.min(bound.saturating_sub(1))
}

/// `round(u * bound)`, in `[0, bound]`.
pub fn uniform_round<R: Rng + ?Sized>(rng: &mut R, bound: usize) -> usize {
    (unit(rng) * bound as f64).round() as usize
}

/// `round(u * high) + low`.
///
/// Not a uniform draw over `[low, high]`: the result lies in
/// `[low, low + high]` and the two endpoints are half as likely as the rest.
pub fn range_round<R: Rng + ?Sized>(rng: &mut R, low: usize, high: usize) -> usize {
    uniform_round(rng, high) + low
}

/// `(a, b)` with `a = range_round(min, max)` and `b = range_round(a, max)`.
///
/// Returned in draw order; `a <= b` holds by construction here, but callers
/// must still clamp because `b` can exceed `max`.
pub fn fair_min_max<R: Rng + ?Sized>(rng: &mut R, min: usize, max: usize) -> (usize, usize) {
    let a = range_round(rng, min, max);
    let b = range_round(rng, a, max);
    (a, b)
}

/// Two independent `range_round(min, max)` draws, sorted ascending.
pub fn fair_min_max2<R: Rng + ?Sized>(rng: &mut R, min: usize, max: usize) -> (usize, usize) {
    let a = range_round(rng, min, max);
    let b = range_round(rng, min, max);
    (a.min(b), a.max(b))
}

/// True with probability ~0.5.
pub fn coin_toss<R: Rng + ?Sized>(rng: &mut R) -> bool {
    unit(rng) > 0.5
}

/// True with probability ~`p`.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    unit(rng) < p
}

/// A reproducible source for a fixed seed.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A fresh source seeded from the operating system.
pub fn from_entropy() -> StdRng {
    StdRng::from_entropy()
}
