use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A code symbol which can appear in the matrix, the buffer, or a sequence.
///
/// Symbols have identity only; there is no meaningful ordering between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    #[serde(rename = "55")]
    Byte55,
    #[serde(rename = "BD")]
    ByteBd,
    #[serde(rename = "E9")]
    ByteE9,
    #[serde(rename = "7A")]
    Byte7a,
    #[serde(rename = "1C")]
    Byte1c,
}

impl Symbol {
    /// The whole alphabet.
    pub const ALL: [Symbol; 5] = [
        Symbol::Byte55,
        Symbol::ByteBd,
        Symbol::ByteE9,
        Symbol::Byte7a,
        Symbol::Byte1c,
    ];

    /// Pick a symbol uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Generate `len` random symbols.
    pub fn random_run<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<Self> {
        (0..len).map(|_| Self::random(rng)).collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::Byte55 => "55",
            Symbol::ByteBd => "BD",
            Symbol::ByteE9 => "E9",
            Symbol::Byte7a => "7A",
            Symbol::Byte1c => "1C",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_run_has_requested_length() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(Symbol::random_run(&mut rng, 6).len(), 6);
        assert!(Symbol::random_run(&mut rng, 0).is_empty());
    }

    #[test]
    fn random_covers_alphabet() {
        let mut rng = StdRng::seed_from_u64(42);
        let drawn = Symbol::random_run(&mut rng, 500);
        for symbol in Symbol::ALL {
            assert!(drawn.contains(&symbol), "{symbol} never drawn");
        }
    }

    #[test]
    fn serializes_as_hex_text() {
        let json = serde_json::to_string(&[Symbol::ByteBd, Symbol::Byte1c]).unwrap();
        assert_eq!(json, r#"["BD","1C"]"#);
        let back: Vec<Symbol> = serde_json::from_str(r#"["55","7A"]"#).unwrap();
        assert_eq!(back, vec![Symbol::Byte55, Symbol::Byte7a]);
    }
}
