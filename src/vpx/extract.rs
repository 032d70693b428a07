//! Recovers the logical name of an image or sound from its raw stream.
//!
//! Asset streams are a sequence of BIFF-style records. Only the first one is
//! decoded here: a little-endian `u32` length followed by that many bytes.
//! For images that field holds the `NAME` tag followed by the name, for
//! sounds it is the name itself.

use std::fmt;

/// Upper bound for the first field; anything larger is treated as garbage.
pub const MAX_NAME_FIELD_LEN: u32 = 500;

const IMAGE_NAME_TAG: &str = "NAME";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    Image,
    Sound,
}

impl AssetKind {
    pub fn label(self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Sound => "sound",
        }
    }
}

/// Why an asset stream produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than four bytes, no length prefix.
    TooShort,
    /// Length prefix is zero or above [`MAX_NAME_FIELD_LEN`].
    BadLength(u32),
    /// Length prefix points past the end of the stream.
    Truncated { needed: usize, available: usize },
    /// Image field without the `NAME` tag.
    MissingNameMarker,
    /// Nothing printable left after cleanup.
    EmptyName,
    /// The container refused to hand out the stream.
    ReadFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooShort => write!(f, "stream shorter than a length prefix"),
            SkipReason::BadLength(len) => write!(f, "implausible name field length {}", len),
            SkipReason::Truncated { needed, available } => {
                write!(f, "name field needs {} bytes, stream has {}", needed, available)
            }
            SkipReason::MissingNameMarker => write!(f, "no NAME tag in first field"),
            SkipReason::EmptyName => write!(f, "name is empty after cleanup"),
            SkipReason::ReadFailed(msg) => write!(f, "read failed: {}", msg),
        }
    }
}

/// Decodes the asset name stored in the first field of `data`.
pub fn extract_name(data: &[u8], kind: AssetKind) -> Result<String, SkipReason> {
    let field = first_field(data)?;
    match kind {
        AssetKind::Image => image_name(&field),
        AssetKind::Sound => sound_name(&field),
    }
}

/// Returns the first length-prefixed field decoded as ASCII. Non-ASCII bytes are dropped.
fn first_field(data: &[u8]) -> Result<String, SkipReason> {
    let prefix: [u8; 4] = match data.get(..4) {
        Some(bytes) => [bytes[0], bytes[1], bytes[2], bytes[3]],
        None => return Err(SkipReason::TooShort),
    };
    let len = u32::from_le_bytes(prefix);
    if len == 0 || len > MAX_NAME_FIELD_LEN {
        return Err(SkipReason::BadLength(len));
    }

    let needed = 4 + len as usize;
    let field = data.get(4..needed).ok_or(SkipReason::Truncated {
        needed,
        available: data.len(),
    })?;

    Ok(field
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| char::from(b))
        .collect())
}

fn image_name(field: &str) -> Result<String, SkipReason> {
    let rest = field
        .strip_prefix(IMAGE_NAME_TAG)
        .ok_or(SkipReason::MissingNameMarker)?;
    let name = rest
        .trim_matches(|c: char| c <= ' ')
        .trim_start_matches(|c: char| c < ' ');
    if name.is_empty() {
        return Err(SkipReason::EmptyName);
    }
    Ok(name.to_string())
}

fn sound_name(field: &str) -> Result<String, SkipReason> {
    let unpadded = field.trim_matches('\0');
    // Trailing underscores are padding left by the editor.
    let name = match unpadded.trim_end_matches('_') {
        "" => unpadded,
        trimmed => trimmed,
    };
    if name.is_empty() {
        return Err(SkipReason::EmptyName);
    }
    Ok(name.to_string())
}
