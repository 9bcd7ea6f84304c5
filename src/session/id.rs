use core::fmt;
use std::{num::ParseIntError, str::FromStr};

use rand::{
    rngs::{OsRng, SmallRng},
    RngCore, SeedableRng,
};
use serde::Deserialize;
use thiserror::Error as ThisError;
use tracing::trace;

#[derive(Debug, ThisError, thisslime::TracingError)]
pub enum Error {
    #[error("entropy source unavailable: {0}")]
    #[event(level = ERROR)]
    Entropy(#[from] rand::Error),
}

/// Round code shown to (and shareable between) players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(u32);

impl GameId {
    /// Held by a session before its first round is generated.
    pub const PLACEHOLDER: Self = Self(1337);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::PLACEHOLDER
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GameId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Anything that can hand out fresh round codes.
pub trait IdSource {
    fn next_id(&mut self) -> Result<GameId, Error>;
}

/// Round codes drawn from the operating system's entropy source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureIds;

impl IdSource for SecureIds {
    fn next_id(&mut self) -> Result<GameId, Error> {
        let mut bytes = [0u8; 4];
        OsRng.try_fill_bytes(&mut bytes)?;
        Ok(GameId(u32::from_le_bytes(bytes)))
    }
}

/// Round codes from a fast, non-cryptographic generator.
#[derive(Debug, Clone)]
pub struct PseudoIds {
    rng: SmallRng,
}

impl PseudoIds {
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl IdSource for PseudoIds {
    fn next_id(&mut self) -> Result<GameId, Error> {
        Ok(GameId(self.rng.next_u32()))
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Secure,
    Pseudo,
}

#[derive(Debug, Clone)]
enum Source {
    Secure(SecureIds),
    Pseudo(PseudoIds),
}

/// The configured id source, truncated to a fixed bit width.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    source: Source,
    mask: u32,
}

impl IdGenerator {
    pub const MAX_BITS: u8 = 32;

    /// `bits` must already be validated to `1..=32`.
    pub fn new(strategy: IdStrategy, bits: u8) -> Self {
        let source = match strategy {
            IdStrategy::Secure => Source::Secure(SecureIds),
            IdStrategy::Pseudo => Source::Pseudo(PseudoIds::from_entropy()),
        };

        Self::with_source(source, bits)
    }

    pub fn seeded(seed: u64, bits: u8) -> Self {
        Self::with_source(Source::Pseudo(PseudoIds::seeded(seed)), bits)
    }

    fn with_source(source: Source, bits: u8) -> Self {
        let bits = bits.clamp(1, Self::MAX_BITS);
        let mask = u32::MAX >> (Self::MAX_BITS - bits);

        Self { source, mask }
    }

    pub fn strategy(&self) -> IdStrategy {
        match self.source {
            Source::Secure(_) => IdStrategy::Secure,
            Source::Pseudo(_) => IdStrategy::Pseudo,
        }
    }
}

impl IdSource for IdGenerator {
    fn next_id(&mut self) -> Result<GameId, Error> {
        let raw = match &mut self.source {
            Source::Secure(ids) => ids.next_id()?,
            Source::Pseudo(ids) => ids.next_id()?,
        };

        let id = GameId(raw.get() & self.mask);
        trace!(%id, strategy = ?self.strategy(), "drew game id");

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::{GameId, IdGenerator, IdSource, IdStrategy, PseudoIds, SecureIds};
    use pretty_assertions::assert_eq;

    #[test]
    fn placeholder_is_default() {
        assert_eq!(GameId::default(), GameId::new(1337));
    }

    #[test]
    fn parses_shared_code() {
        assert_eq!(" 4051 ".parse::<GameId>(), Ok(GameId::new(4051)));
        assert!("abc".parse::<GameId>().is_err());
        assert_eq!(GameId::new(4051).to_string(), "4051");
    }

    #[test]
    fn seeded_pseudo_ids_repeat() {
        let mut a = PseudoIds::seeded(7);
        let mut b = PseudoIds::seeded(7);

        for _ in 0..16 {
            assert_eq!(
                a.next_id().expect("pseudo ids never fail"),
                b.next_id().expect("pseudo ids never fail")
            );
        }
    }

    #[test]
    fn secure_ids_differ() {
        let mut ids = SecureIds;
        let first = ids.next_id().expect("test host should have entropy");
        let second = ids.next_id().expect("test host should have entropy");

        assert_ne!(first, second);
    }

    #[test]
    fn generator_respects_bit_width() {
        let mut ids = IdGenerator::seeded(99, 24);

        for _ in 0..1000 {
            let id = ids.next_id().expect("pseudo ids never fail");
            assert!(id.get() < 1 << 24, "{id} does not fit in 24 bits");
        }
    }

    #[test]
    fn full_width_keeps_every_bit() {
        let mut masked = IdGenerator::seeded(3, 32);
        let mut raw = PseudoIds::seeded(3);

        assert_eq!(
            masked.next_id().expect("pseudo ids never fail"),
            raw.next_id().expect("pseudo ids never fail")
        );
    }

    #[test]
    fn strategy_is_reported() {
        assert_eq!(IdGenerator::new(IdStrategy::Secure, 32).strategy(), IdStrategy::Secure);
        assert_eq!(IdGenerator::new(IdStrategy::Pseudo, 32).strategy(), IdStrategy::Pseudo);
    }
}
