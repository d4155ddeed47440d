use std::{fmt, str::FromStr};

/// A content key id paired with its decryption key.
///
/// `kid` is either a 128-bit KID in hex or a track ID in decimal,
/// `key` is always a 128-bit key in hex. Both are stored lower cased
/// with dashes removed, which is the form mp4decrypt expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub kid: String,
    pub key: String,
}

impl KeyPair {
    pub fn new(kid: &str, key: &str) -> Result<Self, String> {
        let kid = kid.trim().replace('-', "").to_ascii_lowercase();
        let key = key.trim().replace('-', "").to_ascii_lowercase();

        let kid_ok = (kid.len() == 32 && is_hex(&kid))
            || (!kid.is_empty() && kid.chars().all(|c| c.is_ascii_digit()));

        if !kid_ok || key.len() != 32 || !is_hex(&key) {
            return Err(format!("invalid kid key format used '{}:{}'.", kid, key));
        }

        Ok(Self { kid, key })
    }

    /// Parses one or more pairs separated by `;`.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, String> {
        let pairs = s
            .split(';')
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Self>, String>>()?;

        if pairs.is_empty() {
            return Err("at least one KID:KEY pair is required.".to_owned());
        }

        Ok(pairs)
    }
}

impl FromStr for KeyPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kid, key) = s
            .split_once(':')
            .ok_or_else(|| format!("'{}' is not in KID:KEY format.", s))?;
        Self::new(kid, key)
    }
}

impl fmt::Display for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kid, self.key)
    }
}

fn is_hex(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Builds `--key KID:KEY` arguments for every pair, preserving order.
/// mp4decrypt picks the matching pair on its own.
pub fn key_args(keys: &[KeyPair]) -> Vec<String> {
    keys.iter()
        .flat_map(|x| ["--key".to_owned(), x.to_string()])
        .collect()
}
