use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

bitflags! {
    /// Set of held movement keys.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct DirectionalKeys: u8 {
        const FORWARD = 0b00_0001;
        const BACK    = 0b00_0010;
        const LEFT    = 0b00_0100;
        const RIGHT   = 0b00_1000;
        const UP      = 0b01_0000;
        const DOWN    = 0b10_0000;
    }
}

/// Error returned when a key string contains something other than `wasdeq`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown movement key {0:?}, expected one of w a s d e q")]
pub struct ParseKeysError(pub char);

impl DirectionalKeys {
    /// Key for a WASD+EQ letter, case-insensitive.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Self::FORWARD),
            's' => Some(Self::BACK),
            'a' => Some(Self::LEFT),
            'd' => Some(Self::RIGHT),
            'e' => Some(Self::UP),
            'q' => Some(Self::DOWN),
            _ => None,
        }
    }
}

/// Parses a held-key string such as `"wd"`; the empty string is no keys.
impl FromStr for DirectionalKeys {
    type Err = ParseKeysError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars().try_fold(Self::empty(), |keys, c| {
            Self::from_letter(c)
                .map(|k| keys | k)
                .ok_or(ParseKeysError(c))
        })
    }
}
