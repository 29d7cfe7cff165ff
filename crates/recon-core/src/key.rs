//! Comparison keys and the modes that derive them
//!
//! Two files from different directories "match" when their keys are equal.
//! No mode except [`KeyMode::ContentHash`] ever reads file bytes.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use recon_fs::checksum::compute_bytes_checksum;
use recon_fs::{FileEntry, FileSystem};

use crate::{Error, Result};

/// Token pattern used by frame-numbered datasets (`frame_000123.png`).
pub const FRAME_PATTERN: &str = r"frame_(\d+)";

static FRAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FRAME_PATTERN).expect("Invalid frame token regex"));

/// Key derived from a file, compared across directories.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonKey(String);

impl ComparisonKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComparisonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compiled regex whose first capture group (or whole match) is the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenPattern(Regex);

impl TokenPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|e| Error::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
    }

    /// The `frame_(\d+)` pattern.
    pub fn frame() -> Self {
        Self(FRAME_REGEX.clone())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Extract the token from a file name.
    ///
    /// Returns the first capture group when the pattern has one, the whole
    /// match otherwise, and `None` when the name does not match.
    pub fn extract<'a>(&self, name: &'a str) -> Option<&'a str> {
        let captures = self.0.captures(name)?;
        captures
            .get(1)
            .or_else(|| captures.get(0))
            .map(|m| m.as_str())
    }
}

impl PartialEq for TokenPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TokenPattern {}

impl TryFrom<String> for TokenPattern {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<TokenPattern> for String {
    fn from(pattern: TokenPattern) -> Self {
        pattern.as_str().to_string()
    }
}

/// How a comparison key is derived from a file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum KeyMode {
    /// File name, extension included
    #[default]
    Name,
    /// `<name>_<size>`
    NameSize,
    /// `<size>_<name>`; historically called "content" but never reads bytes
    SizeName,
    /// Token extracted from the name by a regex; non-matching files get no key
    RegexToken { pattern: TokenPattern },
    /// `sha256:<hex>` of the file bytes
    ContentHash,
}

impl KeyMode {
    pub fn regex(pattern: &str) -> Result<Self> {
        Ok(Self::RegexToken {
            pattern: TokenPattern::new(pattern)?,
        })
    }

    pub fn is_name_only(&self) -> bool {
        matches!(self, Self::Name)
    }

    /// Derive the key for `entry`, reading its size or bytes when the mode
    /// needs them. A size read here is cached on the entry.
    ///
    /// `Ok(None)` means the file has no key under this mode and should be
    /// left out of the index.
    pub fn key_for(
        &self,
        fs: &dyn FileSystem,
        entry: &mut FileEntry,
    ) -> recon_fs::Result<Option<ComparisonKey>> {
        let key = match self {
            Self::Name => name_key(&entry.name),
            Self::NameSize => {
                let size = ensure_size(fs, entry)?;
                name_size_key(&entry.name, size)
            }
            Self::SizeName => {
                let size = ensure_size(fs, entry)?;
                size_name_key(size, &entry.name)
            }
            Self::RegexToken { pattern } => return Ok(token_key(pattern, &entry.name)),
            Self::ContentHash => content_key(&fs.read(&entry.path)?),
        };
        Ok(Some(key))
    }
}

fn ensure_size(fs: &dyn FileSystem, entry: &mut FileEntry) -> recon_fs::Result<u64> {
    if let Some(size) = entry.size {
        return Ok(size);
    }
    let size = fs.stat_size(&entry.path)?;
    entry.size = Some(size);
    Ok(size)
}

pub fn name_key(name: &str) -> ComparisonKey {
    ComparisonKey::new(name)
}

pub fn name_size_key(name: &str, size: u64) -> ComparisonKey {
    ComparisonKey(format!("{name}_{size}"))
}

pub fn size_name_key(size: u64, name: &str) -> ComparisonKey {
    ComparisonKey(format!("{size}_{name}"))
}

pub fn token_key(pattern: &TokenPattern, name: &str) -> Option<ComparisonKey> {
    pattern.extract(name).map(ComparisonKey::new)
}

pub fn content_key(bytes: &[u8]) -> ComparisonKey {
    ComparisonKey(compute_bytes_checksum(bytes))
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => f.write_str("name"),
            Self::NameSize => f.write_str("name-size"),
            Self::SizeName => f.write_str("size-name"),
            Self::RegexToken { pattern } => write!(f, "regex:{}", pattern.as_str()),
            Self::ContentHash => f.write_str("hash"),
        }
    }
}

impl FromStr for KeyMode {
    type Err = Error;

    /// Parse CLI spellings; `size` and `content` are the legacy names of
    /// `name-size` and `size-name`.
    fn from_str(s: &str) -> Result<Self> {
        if let Some(pattern) = s.strip_prefix("regex:") {
            return Self::regex(pattern);
        }
        match s.to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "name-size" | "size" => Ok(Self::NameSize),
            "size-name" | "content" => Ok(Self::SizeName),
            "hash" | "content-hash" => Ok(Self::ContentHash),
            "frame" => Ok(Self::RegexToken {
                pattern: TokenPattern::frame(),
            }),
            _ => Err(Error::UnknownKeyMode(s.to_string())),
        }
    }
}
