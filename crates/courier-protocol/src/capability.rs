//! Messaging capabilities advertised by an identity.
//!
//! The gateway reports capabilities as a comma-separated list of names.
//! Names this crate does not know map to [`Capability::Unknown`].

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A single messaging capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Text messages.
    Text,
    /// Image messages.
    Image,
    /// Video messages.
    Video,
    /// Audio messages.
    Audio,
    /// Group chats.
    Group,
    /// Polls.
    Ballot,
    /// File messages.
    File,
    /// Voice calls.
    Call,
    /// Video calls.
    VideoCall,
    /// Perfect forward secrecy.
    Pfs,
    /// Group calls.
    GroupCall,
    /// A capability not known to this crate.
    Unknown,
}

impl Capability {
    /// All known capabilities, excluding `Unknown`.
    pub const KNOWN: [Capability; 11] = [
        Self::Text,
        Self::Image,
        Self::Video,
        Self::Audio,
        Self::Group,
        Self::Ballot,
        Self::File,
        Self::Call,
        Self::VideoCall,
        Self::Pfs,
        Self::GroupCall,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Group => "group",
            Self::Ballot => "ballot",
            Self::File => "file",
            Self::Call => "call",
            Self::VideoCall => "videocall",
            Self::Pfs => "pfs",
            Self::GroupCall => "groupcall",
            Self::Unknown => "unknown",
        }
    }

    /// Look up a wire name, falling back to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|c| c.as_str() == name)
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

/// Parse a comma-separated capability list.
///
/// Surrounding whitespace is ignored and empty entries are skipped.
pub fn parse_capabilities(list: &str) -> BTreeSet<Capability> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(Capability::from_name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let caps = parse_capabilities("text,image,video,file");
        assert_eq!(caps.len(), 4);
        assert!(caps.contains(&Capability::Text));
        assert!(caps.contains(&Capability::File));
        assert!(!caps.contains(&Capability::Audio));
    }

    #[test]
    fn test_unknown_names() {
        let caps = parse_capabilities("text,teleport,hologram");
        assert_eq!(
            caps.into_iter().collect::<Vec<_>>(),
            vec![Capability::Text, Capability::Unknown]
        );
    }

    #[test]
    fn test_names_roundtrip() {
        for cap in Capability::KNOWN {
            assert_eq!(Capability::from_name(cap.as_str()), cap);
            assert_eq!(cap.as_str().parse::<Capability>().unwrap(), cap);
        }
    }

    #[test]
    fn test_whitespace_and_empty() {
        assert!(parse_capabilities("").is_empty());
        let caps = parse_capabilities(" pfs , groupcall,");
        assert_eq!(caps.len(), 2);
        assert!(caps.contains(&Capability::GroupCall));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert_eq!(Capability::from_name("TEXT"), Capability::Unknown);
    }
}
