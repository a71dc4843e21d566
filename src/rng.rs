use rand::{Error, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub type ReplicationRng = ChaCha8Rng;

/// Independent stream for one replication. Every replication of a run shares
/// the seed but draws from its own ChaCha stream, so any single replication
/// can be replayed without running the ones before it.
pub fn replication_rng(seed: u64, index: usize) -> ReplicationRng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(index as u64);
    rng
}

// rand maps the top 53 bits of a u64 onto [0, 1)
const MANTISSA_BITS: u32 = 53;

/// Uniform source replaying a fixed list of values, in order, through the
/// regular `rand` sampling path. Values must lie in [0, 1) and be multiples
/// of 2^-53 to come back bit-exact; the list wraps around when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    words: Vec<u64>,
    next: usize,
}

impl ScriptedRng {
    pub fn new(uniforms: &[f64]) -> Self {
        let scale = (1u64 << MANTISSA_BITS) as f64;
        let words = uniforms
            .iter()
            .map(|u| {
                let mantissa = (u.clamp(0., 1.) * scale) as u64;
                mantissa.min((1u64 << MANTISSA_BITS) - 1) << (64 - MANTISSA_BITS)
            })
            .collect();
        ScriptedRng { words, next: 0 }
    }

    /// Number of uniforms handed out so far.
    pub fn consumed(&self) -> usize {
        self.next
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        if self.words.is_empty() {
            return 0;
        }
        let word = self.words[self.next % self.words.len()];
        self.next += 1;
        word
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
