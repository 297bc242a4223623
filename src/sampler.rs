use rand::seq::SliceRandom;
use rand::Rng;

/// Choose one of `items` with probability proportional to its weight.
///
/// Items with a weight of zero or less are never chosen unless every weight is, in
/// which case the choice is uniform. Returns `None` only if `items` is empty.
pub fn weighted_random_select<'a, T, R: Rng>(
    items: &'a [T],
    weights: &[f64],
    rng: &mut R,
) -> Option<&'a T> {
    let positive = |w: f64| if w > 0.0 { w } else { 0.0 };
    let total: f64 = items.iter().zip(weights.iter()).map(|(_, w)| positive(*w)).sum();
    if !(total > 0.0) {
        return items.choose(rng);
    }

    let pick = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (item, weight) in items.iter().zip(weights.iter()) {
        if positive(*weight) == 0.0 {
            continue;
        }
        cumulative += *weight;
        if cumulative > pick {
            return Some(item);
        }
        last_positive = Some(item);
    }
    // Only reachable through floating-point rounding at the top of the range.
    last_positive
}
