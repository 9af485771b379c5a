// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Random numeric identifiers.
//!
//! Identifiers are receipts only: they are not unique, not stored and do not
//! name any uploaded artifact.

use rand::Rng;

/// Number of digits in a generated identifier.
pub const ID_LENGTH: usize = 8;

/// Generate an 8-digit identifier from the thread-local RNG.
pub fn generate() -> String {
    generate_with(&mut rand::thread_rng())
}

/// Generate an identifier from the given RNG. Leading zeros are allowed.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn ids_are_eight_ascii_digits() {
        for _ in 0..1_000 {
            let id = generate();
            assert_eq!(id.len(), ID_LENGTH);
            assert!(id.chars().all(|c| c.is_ascii_digit()), "{id}");
        }
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let a = generate_with(&mut StdRng::seed_from_u64(7));
        let b = generate_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn digits_are_uniform_per_position() {
        const SAMPLES: usize = 10_000;
        // chi-square, 9 degrees of freedom; p < 1e-5 lies above ~40
        const CRITICAL: f64 = 40.0;

        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut counts = [[0usize; 10]; ID_LENGTH];
        for _ in 0..SAMPLES {
            for (position, digit) in generate_with(&mut rng).bytes().enumerate() {
                counts[position][usize::from(digit - b'0')] += 1;
            }
        }

        let expected = SAMPLES as f64 / 10.0;
        for (position, row) in counts.iter().enumerate() {
            let chi_square: f64 = row
                .iter()
                .map(|&observed| {
                    let diff = observed as f64 - expected;
                    diff * diff / expected
                })
                .sum();
            assert!(
                chi_square < CRITICAL,
                "position {position} chi-square {chi_square:.2} counts {row:?}"
            );
        }
    }
}
