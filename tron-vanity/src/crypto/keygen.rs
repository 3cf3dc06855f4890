//! Private key generation by rejection sampling.

use rand::RngCore;

/// Order of the secp256k1 group (big-endian).
pub const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Returns true if `candidate` is a valid private scalar, i.e. `0 < candidate < n`.
#[inline]
pub fn is_valid_scalar(candidate: &[u8; 32]) -> bool {
    // Big-endian byte arrays of equal length compare lexicographically like integers.
    candidate.iter().any(|&b| b != 0) && *candidate < CURVE_ORDER
}

/// Draws a uniformly random private key from `rng`.
///
/// Bytes are redrawn until they form a valid scalar. The chance of a single
/// rejection is about 2^-128, so the loop is unbounded.
pub fn generate_private_key<R: RngCore + ?Sized>(rng: &mut R) -> [u8; 32] {
    let mut candidate = [0u8; 32];
    loop {
        rng.fill_bytes(&mut candidate);
        if is_valid_scalar(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Replays fixed 32-byte blocks, one per `fill_bytes` call.
    struct ScriptedRng {
        blocks: VecDeque<[u8; 32]>,
        draws: usize,
    }

    impl ScriptedRng {
        fn new(blocks: Vec<[u8; 32]>) -> Self {
            Self {
                blocks: blocks.into(),
                draws: 0,
            }
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            unimplemented!()
        }

        fn next_u64(&mut self) -> u64 {
            unimplemented!()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let block = self.blocks.pop_front().expect("script exhausted");
            dest.copy_from_slice(&block[..dest.len()]);
            self.draws += 1;
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn one() -> [u8; 32] {
        let mut k = [0u8; 32];
        k[31] = 1;
        k
    }

    #[test]
    fn test_zero_is_rejected() {
        assert!(!is_valid_scalar(&[0u8; 32]));
    }

    #[test]
    fn test_order_bounds() {
        assert!(!is_valid_scalar(&CURVE_ORDER));
        assert!(!is_valid_scalar(&[0xFF; 32]));

        let mut below = CURVE_ORDER;
        below[31] -= 1;
        assert!(is_valid_scalar(&below));
        assert!(is_valid_scalar(&one()));
    }

    #[test]
    fn test_rejection_redraws_until_valid() {
        let mut rng = ScriptedRng::new(vec![[0u8; 32], CURVE_ORDER, [0xFF; 32], one()]);
        let key = generate_private_key(&mut rng);
        assert_eq!(key, one());
        assert_eq!(rng.draws, 4);
    }

    #[test]
    fn test_valid_first_draw_is_returned_verbatim() {
        let block = [0x42u8; 32];
        let mut rng = ScriptedRng::new(vec![block]);
        assert_eq!(generate_private_key(&mut rng), block);
        assert_eq!(rng.draws, 1);
    }

    #[test]
    fn test_os_rng_keys_are_valid() {
        let mut rng = rand::rngs::OsRng;
        for _ in 0..64 {
            assert!(is_valid_scalar(&generate_private_key(&mut rng)));
        }
    }
}
