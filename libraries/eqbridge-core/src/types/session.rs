use serde::{Deserialize, Serialize};
use std::fmt;

/// Audio session identifier assigned by the playback engine
///
/// Equalizer effects attach to a specific session. The value `0` is reserved
/// and means "no session bound".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(i32);

impl SessionId {
    /// Sentinel for "no audio session"
    pub const NONE: SessionId = SessionId(0);

    /// Wrap a raw engine session id
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw integer value
    pub const fn get(self) -> i32 {
        self.0
    }

    /// True for the sentinel
    pub const fn is_none(self) -> bool {
        self.0 == Self::NONE.0
    }

    /// True for any real session
    pub const fn is_bound(self) -> bool {
        !self.is_none()
    }
}

impl From<i32> for SessionId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
