//! Fisher-Yates shuffling used for turn-order randomization and card dealing.

use rand::Rng;

/// Shuffle `items` in place with the Durstenfeld variant of Fisher-Yates.
///
/// Walks from the last element down to the second, swapping each position with
/// a uniformly drawn index in `0..=i`. The upper bound is inclusive so every
/// permutation (including the identity at each step) stays equally likely;
/// drawing from `0..i` would bias the result.
pub fn shuffle<T>(items: &mut [T], rng: &mut impl Rng) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn output_is_a_permutation_of_the_input() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut items: Vec<u32> = (0..50).collect();
        shuffle(&mut items, &mut rng);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn short_inputs_are_left_untouched() {
        let mut rng = StdRng::seed_from_u64(7);

        let mut empty: Vec<u32> = Vec::new();
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut single = vec![42];
        shuffle(&mut single, &mut rng);
        assert_eq!(single, vec![42]);
    }

    #[test]
    fn every_element_reaches_every_position() {
        // Uniformity smoke test: over many runs each of the 4 elements must
        // land at each of the 4 positions at least once. A draw restricted to
        // `0..i` could never keep the last element in place, which this
        // catches.
        let mut rng = StdRng::seed_from_u64(1234);
        let mut seen = [[false; 4]; 4];

        for _ in 0..500 {
            let mut items = [0usize, 1, 2, 3];
            shuffle(&mut items, &mut rng);
            for (position, element) in items.iter().enumerate() {
                seen[*element][position] = true;
            }
        }

        for (element, positions) in seen.iter().enumerate() {
            for (position, reached) in positions.iter().enumerate() {
                assert!(
                    reached,
                    "element {element} never landed at position {position}"
                );
            }
        }
    }

    #[test]
    fn last_position_keeps_its_element_sometimes() {
        // The inclusive draw must allow `i` to swap with itself.
        let mut rng = StdRng::seed_from_u64(99);
        let fixed_last = (0..200)
            .filter(|_| {
                let mut items = [0u8, 1, 2, 3, 4];
                shuffle(&mut items, &mut rng);
                items[4] == 4
            })
            .count();

        assert!(fixed_last > 0, "last element was displaced in every run");
    }
}
