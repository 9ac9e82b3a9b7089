//! Guild integration
//!
//! Caller-side wiring around the progression core: members and roles, the
//! chat XP award path, XP storage, notification sinks and profile cards.

pub mod chat;
pub mod member;
pub mod notify;
pub mod profile;
pub mod store;

pub use chat::{AwardOutcome, ChatXpAwarder, ChatXpPolicy};
pub use member::{Member, Role, UserId};
pub use notify::{LogSink, NotificationSink, RecordingSink};
pub use profile::{BadgeView, ProfileCard};
pub use store::{MemoryXpStore, XpChange, XpStore};
