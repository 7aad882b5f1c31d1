use std::collections::BTreeSet;

use rand::Rng;

use super::HandError;
use super::error::Result;

/// Distinct deck positions of a drawn hand, kept in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandPositions(BTreeSet<usize>);

impl HandPositions {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<usize> for HandPositions {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        HandPositions(iter.into_iter().collect())
    }
}

/// Draw `hand_size` distinct positions out of `[0, total_count)`.
///
/// Rejection sampling: draw uniformly, throw away duplicates. Fine for
/// opening hands, it gets slow only when `hand_size` is close to
/// `total_count`.
pub fn sample<R: Rng + ?Sized>(rng: &mut R, total_count: usize, hand_size: usize) -> Result<HandPositions> {
    if hand_size == 0 {
        return Err(HandError::InvalidRequest("a hand needs at least one card".to_string()));
    }
    if hand_size > total_count {
        return Err(HandError::InvalidRequest(format!("cannot draw {} cards from a deck of {}", hand_size, total_count)));
    }
    let mut positions = BTreeSet::new();
    while positions.len() < hand_size {
        positions.insert(rng.gen_range(0..total_count));
    }
    Ok(HandPositions(positions))
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::sample;
    use crate::mtg::HandError;

    #[test]
    fn test_distinct_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for (total, hand_size) in [(60, 7), (7, 7), (1, 1), (40, 39)] {
            let positions = sample(&mut rng, total, hand_size).unwrap();
            assert_eq!(positions.len(), hand_size);
            let values: Vec<usize> = positions.iter().collect();
            assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(values.iter().all(|position| *position < total));
        }
    }

    #[test]
    fn test_marginal_coverage() {
        let mut rng = StdRng::seed_from_u64(2021);
        let mut hits = [0usize; 10];
        for _ in 0..10000 {
            for position in sample(&mut rng, 10, 3).unwrap().iter() {
                hits[position] += 1;
            }
        }
        // Every position is expected 3000 times, sigma is about 46.
        for count in hits.iter() {
            assert!((2700..3300).contains(count), "uneven coverage: {:?}", hits);
        }
    }

    #[test]
    fn test_oversize_hand() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(sample(&mut rng, 7, 8), Err(HandError::InvalidRequest(_))));
        assert!(matches!(sample(&mut rng, 0, 1), Err(HandError::InvalidRequest(_))));
        assert!(matches!(sample(&mut rng, 60, 0), Err(HandError::InvalidRequest(_))));
    }
}
