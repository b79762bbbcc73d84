use hmac::{Hmac, Mac};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sha2::{Digest, Sha256};

// Draws are uniform percentages in [0, 100).
// Seeded mode: seed (secret) + spin number -> HMAC-SHA256 -> first 4 bytes -> [0, 100)

pub type HmacSha256 = Hmac<Sha256>;

pub trait RandomSource: Send {
    /// One uniform draw in [0, 100) for the given spin number.
    fn draw_percent(&mut self, spin_number: u64) -> f64;
}

impl<F> RandomSource for F
where
    F: FnMut(u64) -> f64 + Send,
{
    fn draw_percent(&mut self, spin_number: u64) -> f64 {
        self(spin_number)
    }
}

pub fn derive_hash_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}

/// Map 4 big-endian bytes onto [0, 100).
pub fn percent_from_bytes(bytes: [u8; 4]) -> f64 {
    let v = u32::from_be_bytes(bytes);
    (v as f64) / (u32::MAX as f64 + 1.0) * 100.0
}

/// Non-reproducible draws from an OS-seeded generator.
pub struct EntropySource {
    rng: StdRng,
}

impl EntropySource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropySource {
    fn draw_percent(&mut self, _spin_number: u64) -> f64 {
        self.rng.gen_range(0.0..100.0)
    }
}

/// Reproducible draws: the draw for a spin depends only on the seed and the
/// spin number, so a ledger can be re-derived after the seed is revealed.
pub struct SeededSource {
    seed: String, // secret
}

impl SeededSource {
    pub fn new(seed: impl Into<String>) -> Self {
        Self { seed: seed.into() }
    }

    pub fn seed_hash_hex(&self) -> String {
        derive_hash_hex(self.seed.as_bytes())
    }

    pub fn hmac_bytes(&self, spin_number: u64) -> [u8; 32] {
        // HMAC takes keys of any length
        let mut mac = HmacSha256::new_from_slice(self.seed.as_bytes()).expect("HMAC key");
        let msg = format!("spin:{}", spin_number);
        mac.update(msg.as_bytes());
        let res = mac.finalize().into_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&res);
        out
    }

    pub fn percent_for(&self, spin_number: u64) -> f64 {
        let bytes = self.hmac_bytes(spin_number);
        percent_from_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

impl RandomSource for SeededSource {
    fn draw_percent(&mut self, spin_number: u64) -> f64 {
        self.percent_for(spin_number)
    }
}
