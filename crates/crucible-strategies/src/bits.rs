// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Candidate-vector helpers shared by the baseline strategies.

use rand::Rng;

/// A uniform random bitvector of the given length.
pub fn random_bitvector<R: Rng>(rng: &mut R, length: usize) -> Vec<bool> {
    (0..length).map(|_| rng.random_bool(0.5)).collect()
}

/// The incumbent with one uniformly chosen bit flipped.
///
/// # Panics
///
/// Panics if `incumbent` is empty.
pub fn random_hamming1_neighbour<R: Rng>(rng: &mut R, incumbent: &[bool]) -> Vec<bool> {
    assert!(
        !incumbent.is_empty(),
        "called `random_hamming1_neighbour` with an empty incumbent"
    );
    let mut neighbour = incumbent.to_vec();
    let index = rng.random_range(0..neighbour.len());
    neighbour[index] = !neighbour[index];
    neighbour
}

/// All vectors at Hamming distance 1 from the incumbent, in bit order.
pub fn hamming1_neighbours(incumbent: &[bool]) -> Vec<Vec<bool>> {
    (0..incumbent.len())
        .map(|index| {
            let mut neighbour = incumbent.to_vec();
            neighbour[index] = !neighbour[index];
            neighbour
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_bitvector_has_requested_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(random_bitvector(&mut rng, 0).len(), 0);
        assert_eq!(random_bitvector(&mut rng, 17).len(), 17);
    }

    #[test]
    fn test_random_neighbour_differs_in_exactly_one_bit() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let incumbent = random_bitvector(&mut rng, 12);

        for _ in 0..50 {
            let neighbour = random_hamming1_neighbour(&mut rng, &incumbent);
            let distance = incumbent
                .iter()
                .zip(&neighbour)
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(distance, 1);
        }
    }

    #[test]
    fn test_hamming1_neighbourhood_is_complete() {
        let incumbent = [true, false, true];
        let neighbours = hamming1_neighbours(&incumbent);

        assert_eq!(neighbours.len(), 3);
        assert_eq!(neighbours[0], vec![false, false, true]);
        assert_eq!(neighbours[1], vec![true, true, true]);
        assert_eq!(neighbours[2], vec![true, false, false]);
    }
}
