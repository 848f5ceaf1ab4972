//! Position-weighted byte-sum hash, the table's default hasher.
//!
//! Every byte fed to the hasher contributes `(position + 1) * byte`, where
//! position counts bytes across all `write` calls. Deterministic and not
//! collision resistant.

use core::hash::{BuildHasher, Hasher};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PolynomialState;

impl BuildHasher for PolynomialState {
    type Hasher = PolynomialHasher;

    fn build_hasher(&self) -> Self::Hasher {
        PolynomialHasher::default()
    }
}

#[derive(Clone, Debug, Default)]
pub struct PolynomialHasher {
    sum: u64,
    position: u64,
}

impl Hasher for PolynomialHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.position += 1;
            self.sum = self
                .sum
                .wrapping_add(self.position.wrapping_mul(u64::from(b)));
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.sum
    }
}

/// Hash of a raw byte string, without the terminator `str::hash` appends.
pub fn polynomial_hash(bytes: &[u8]) -> u64 {
    let mut h = PolynomialHasher::default();
    h.write(bytes);
    h.finish()
}
