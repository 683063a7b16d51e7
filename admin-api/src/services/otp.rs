use anyhow::{anyhow, Result};
use ring::rand::{SecureRandom, SystemRandom};

/// Produces fixed-length numeric one-time codes from a secure random source.
/// Holds no state of its own; issued codes live in the user record.
pub struct OtpGenerator {
    rng: SystemRandom,
    length: usize,
}

impl OtpGenerator {
    pub fn new(length: usize) -> Self {
        Self {
            rng: SystemRandom::new(),
            length,
        }
    }

    pub fn generate(&self) -> Result<String> {
        let mut bytes = vec![0u8; self.length];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| anyhow!("failed to draw random bytes for OTP"))?;

        Ok(bytes
            .iter()
            .map(|byte| char::from(b'0' + byte % 10))
            .collect())
    }
}
