use crate::error::RitGenericError;
use serde::{Deserialize, Serialize};
use sha1::{Digest as _, Sha1};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

pub const DIGEST_HEX_LEN: usize = 40;

/// A 40-hex-character SHA-1 digest. Two equal digests imply equal content.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Digest([u8; 20]);

impl Digest {
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; 20]> for Digest {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Digest {
    type Err = RitGenericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        anyhow::ensure!(s.len() == DIGEST_HEX_LEN, "invalid digest `{}`: wrong length", s);
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| anyhow::anyhow!("invalid digest `{}`: {}", s, e))?;
        Ok(Self(bytes))
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Hashes an already-canonicalized byte buffer. Callers are responsible for
/// having run the buffer through `crate::codec` first -- this function does
/// not know about field ordering, it just hashes what it's given.
pub fn hash_bytes(bytes: impl AsRef<[u8]>) -> Digest {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    Digest(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_roundtrips_through_hex() {
        let d = hash_bytes(b"hello\n");
        let hex = d.to_hex();
        assert_eq!(hex.len(), DIGEST_HEX_LEN);
        assert_eq!(Digest::from_str(&hex).unwrap(), d);
    }

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(hash_bytes(b"abc"), hash_bytes(b"abc"));
        assert_ne!(hash_bytes(b"abc"), hash_bytes(b"abd"));
    }

}
