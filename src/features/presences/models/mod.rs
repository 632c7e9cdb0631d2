mod presence;

pub use presence::{
    InvalidatedView, Presence, PresenceCounts, PresencePercentage, PresenceRecord,
    PresenceStatus, RosterEntry, StatusTally,
};
