use serde::{Deserialize, Serialize};

/// URL scheme types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeType {
    Http,
    Https,
    Ws,
    Wss,
    Ftp,
    Gopher,
    File,
    /// Schemes that never carry an authority (`mailto:`, `sip:`, ...)
    Opaque,
    Unknown,
}

impl SchemeType {
    /// Get the default port for this scheme
    pub fn default_port(self) -> Option<u16> {
        match self {
            Self::Http | Self::Ws => Some(80),
            Self::Https | Self::Wss => Some(443),
            Self::Ftp => Some(21),
            Self::Gopher => Some(70),
            Self::File | Self::Opaque | Self::Unknown => None,
        }
    }

    /// Whether `scheme://` is required (`Some(true)`), forbidden
    /// (`Some(false)`), or unknown (`None`)
    pub fn slashes(self) -> Option<bool> {
        match self {
            Self::Http
            | Self::Https
            | Self::Ws
            | Self::Wss
            | Self::Ftp
            | Self::Gopher
            | Self::File => Some(true),
            Self::Opaque => Some(false),
            Self::Unknown => None,
        }
    }
}

/// A named field of a URL record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Protocol,
    Slashes,
    Auth,
    Username,
    Password,
    Host,
    Hostname,
    Port,
    Pathname,
    Search,
    Query,
    Hash,
    Segments,
}

impl Component {
    pub const ALL: [Self; 13] = [
        Self::Protocol,
        Self::Slashes,
        Self::Auth,
        Self::Username,
        Self::Password,
        Self::Host,
        Self::Hostname,
        Self::Port,
        Self::Pathname,
        Self::Search,
        Self::Query,
        Self::Hash,
        Self::Segments,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Protocol => "protocol",
            Self::Slashes => "slashes",
            Self::Auth => "auth",
            Self::Username => "username",
            Self::Password => "password",
            Self::Host => "host",
            Self::Hostname => "hostname",
            Self::Port => "port",
            Self::Pathname => "pathname",
            Self::Search => "search",
            Self::Query => "query",
            Self::Hash => "hash",
            Self::Segments => "segments",
        }
    }

    /// Look a component up by its field name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|component| component.as_str() == name)
    }
}

impl core::fmt::Display for Component {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentIndex {
    First,
    Last,
    At(usize),
}

impl SegmentIndex {
    /// Resolve against a segment count; `None` when nothing is there
    pub fn position(self, len: usize) -> Option<usize> {
        match self {
            Self::First => (len > 0).then_some(0),
            Self::Last => len.checked_sub(1),
            Self::At(index) => (index < len).then_some(index),
        }
    }
}

impl From<usize> for SegmentIndex {
    fn from(index: usize) -> Self {
        Self::At(index)
    }
}
