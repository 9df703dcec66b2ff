//! Random selection helpers. All take the caller's RNG so runs stay reproducible.

use rand::Rng;

/// Pick an item with probability proportional to its weight.
///
/// Draws `r` in `[0, total)` and walks the cumulative weights, returning the
/// first item whose weight exceeds the remainder. Returns `None` when the
/// total weight is zero. Extra items or weights beyond the shorter slice are ignored.
pub fn weighted_choice<'a, T, R: Rng + ?Sized>(
    items: &'a [T],
    weights: &[u32],
    rng: &mut R,
) -> Option<&'a T> {
    let total: u64 = items
        .iter()
        .zip(weights)
        .map(|(_, &w)| u64::from(w))
        .sum();
    if total == 0 {
        return None;
    }

    let mut remainder = rng.gen_range(0..total);
    for (item, &weight) in items.iter().zip(weights) {
        let weight = u64::from(weight);
        if remainder < weight {
            return Some(item);
        }
        remainder -= weight;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_weight_items_never_drawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let items = ['a', 'b', 'c'];
        for _ in 0..1000 {
            let pick = weighted_choice(&items, &[0, 5, 0], &mut rng);
            assert_eq!(pick, Some(&'b'));
        }
    }

    #[test]
    fn empty_weights_yield_none() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let items: [u8; 0] = [];
        assert_eq!(weighted_choice(&items, &[], &mut rng), None);
        assert_eq!(weighted_choice(&[1, 2], &[0, 0], &mut rng), None);
    }
}
