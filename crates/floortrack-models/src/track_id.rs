use serde::{Deserialize, Serialize};
use std::fmt;

/// Process-wide unique identifier for one tracked person.
///
/// IDs are issued monotonically and never reused once retired. The
/// reserved [`TrackId::UNASSIGNED`] sentinel stands for "no track" and is
/// never a valid, live identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u64);

impl TrackId {
    /// Sentinel value meaning "unassigned" / "no track".
    pub const UNASSIGNED: TrackId = TrackId(u64::MAX);

    pub fn is_unassigned(self) -> bool {
        self == Self::UNASSIGNED
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unassigned() {
            write!(f, "unassigned")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Monotonic issuer of fresh [`TrackId`]s. Never reissues a retired id.
#[derive(Debug, Default)]
pub struct TrackIdAllocator {
    next: u64,
}

impl TrackIdAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next_id(&mut self) -> TrackId {
        let id = TrackId(self.next);
        self.next += 1;
        id
    }
}
