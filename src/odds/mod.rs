//! Draw odds over a deck snapshot.
//!
//! Cards come off the deck layer by layer: the top segment first, then each
//! lower segment, then the undrawn pile. Within a layer the order is
//! unknown, so the number of copies of a city drawn from one layer is
//! hypergeometric. The layers are independent, so the distribution over the
//! next `draws` cards is the convolution of the per-layer distributions.
//!
//! Binomial coefficients are combined in log space, so large piles yield
//! small finite probabilities instead of overflowing.
//!
//! ## Example
//!
//! ```
//! use city_deck::controller::DeckController;
//! use city_deck::core::{CityConfig, CityId, DeckConfig};
//! use city_deck::odds;
//!
//! let deck = DeckController::new(
//!     &DeckConfig::new()
//!         .with_city(CityConfig::new("Atlanta", 1))
//!         .with_city(CityConfig::new("Chicago", 1)),
//! )
//! .unwrap();
//!
//! let dist = odds::next_draws_distribution(&deck.snapshot(), &CityId::new("Atlanta"), 1);
//! assert!((dist[1] - 0.5).abs() < 1e-12);
//! ```

use crate::controller::StateSnapshot;
use crate::core::{CityId, CountMultiset};

/// Probability of drawing exactly `n` copies of `city` in the next `draws`
/// cards, indexed by `n` (length `draws + 1`).
///
/// Draws past the end of the deck draw nothing.
#[must_use]
pub fn next_draws_distribution(
    snapshot: &StateSnapshot,
    city: &CityId,
    draws: usize,
) -> Vec<f64> {
    let mut dist = vec![1.0];
    let mut remaining = draws as u64;

    for layer in layers_top_down(snapshot) {
        if remaining == 0 {
            break;
        }
        let size = layer.total();
        let taken = remaining.min(size);
        let layer_dist = hypergeometric(size, u64::from(layer.count(city)), taken);
        dist = convolve(&dist, &layer_dist);
        remaining -= taken;
    }

    dist.resize(draws + 1, 0.0);
    dist
}

/// Probability of drawing at least `copies` of `city` in the next `draws` cards.
#[must_use]
pub fn probability_at_least(
    snapshot: &StateSnapshot,
    city: &CityId,
    copies: usize,
    draws: usize,
) -> f64 {
    next_draws_distribution(snapshot, city, draws)
        .iter()
        .skip(copies)
        .sum::<f64>()
        .min(1.0)
}

/// Expected copies of `city` in the next `draws` cards.
#[must_use]
pub fn expected_copies(snapshot: &StateSnapshot, city: &CityId, draws: usize) -> f64 {
    next_draws_distribution(snapshot, city, draws)
        .iter()
        .enumerate()
        .map(|(n, p)| n as f64 * p)
        .sum()
}

fn layers_top_down(snapshot: &StateSnapshot) -> impl Iterator<Item = &CountMultiset> + '_ {
    snapshot.segments.iter().rev().chain(snapshot.undrawn.iter())
}

/// P(X = x) for x in 0..=min(successes, sample) when drawing `sample` cards
/// without replacement from `population` cards holding `successes` hits.
fn hypergeometric(population: u64, successes: u64, sample: u64) -> Vec<f64> {
    let ln_total = ln_choose(population, sample);
    (0..=successes.min(sample))
        .map(|x| {
            if sample - x > population - successes {
                0.0
            } else {
                let ln_hits = ln_choose(successes, x);
                let ln_misses = ln_choose(population - successes, sample - x);
                (ln_hits + ln_misses - ln_total).exp()
            }
        })
        .collect()
}

/// ln C(n, k), or negative infinity when `k > n`.
///
/// Sums `min(k, n - k)` terms, so the cost is bounded by the sample size
/// rather than the pile size.
fn ln_choose(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let k = k.min(n - k);
    (0..k)
        .map(|i| ((n - i) as f64).ln() - ((i + 1) as f64).ln())
        .sum()
}

fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &pa) in a.iter().enumerate() {
        for (j, &pb) in b.iter().enumerate() {
            out[i + j] += pa * pb;
        }
    }
    out
}
