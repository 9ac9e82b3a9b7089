//! Chat XP awards
//!
//! Sending a message earns XP. The award runs after the message is
//! delivered and never fails it: progression errors are logged and returned
//! as an outcome, not propagated.

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::member::{Member, UserId};
use super::notify::NotificationSink;
use super::store::XpStore;
use crate::error::{ProgressionError, Result};
use crate::progression::ProgressionCalculator;

/// How much XP a chat message is worth and how often
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatXpPolicy {
    pub min_gain: i64,
    pub max_gain: i64,
    /// Seconds after an award during which further messages earn nothing
    pub cooldown_secs: i64,
    /// Trimmed messages shorter than this earn nothing
    pub min_message_len: usize,
}

impl Default for ChatXpPolicy {
    fn default() -> Self {
        Self {
            min_gain: 15,
            max_gain: 25,
            cooldown_secs: 30,
            min_message_len: 1,
        }
    }
}

impl ChatXpPolicy {
    /// Same gain every message, no cooldown
    pub fn fixed(gain: i64) -> Self {
        Self {
            min_gain: gain,
            max_gain: gain,
            cooldown_secs: 0,
            min_message_len: 1,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_gain < 0 || self.max_gain < self.min_gain {
            return Err(ProgressionError::config(format!(
                "chat XP range {}..={} is invalid",
                self.min_gain, self.max_gain
            )));
        }
        if self.cooldown_secs < 0 {
            return Err(ProgressionError::config("chat XP cooldown must be non-negative"));
        }
        Ok(())
    }

    /// Draw the XP gain for one message
    pub fn roll<R: Rng>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.min_gain..=self.max_gain)
    }
}

/// What happened to a message's XP
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AwardOutcome {
    /// Staff roles do not earn XP
    Exempt,
    TooShort,
    CoolingDown { remaining_secs: i64 },
    Awarded {
        gained: i64,
        old_xp: i64,
        new_xp: i64,
        /// Set when the award crossed a level boundary and the sink was notified
        new_level: Option<u32>,
    },
    /// XP bookkeeping failed; the message itself is unaffected
    Failed(ProgressionError),
}

/// Applies chat XP through a store and forwards level-ups to a sink
pub struct ChatXpAwarder<S, N> {
    calculator: ProgressionCalculator,
    policy: ChatXpPolicy,
    store: S,
    sink: N,
    last_award: Mutex<HashMap<UserId, i64>>,
}

impl<S: XpStore, N: NotificationSink> ChatXpAwarder<S, N> {
    /// Fails with `Configuration` if the policy does not validate
    pub fn new(
        calculator: ProgressionCalculator,
        policy: ChatXpPolicy,
        store: S,
        sink: N,
    ) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            calculator,
            policy,
            store,
            sink,
            last_award: Mutex::new(HashMap::new()),
        })
    }

    /// Award XP for a message `member` sent at `now_secs` (unix seconds)
    pub fn on_message_sent<R: Rng>(
        &self,
        member: &Member,
        content: &str,
        now_secs: i64,
        rng: &mut R,
    ) -> AwardOutcome {
        if member.is_xp_exempt() {
            return AwardOutcome::Exempt;
        }
        if content.trim().chars().count() < self.policy.min_message_len {
            return AwardOutcome::TooShort;
        }
        if let Some(remaining_secs) = self.claim_cooldown(member.id, now_secs) {
            return AwardOutcome::CoolingDown { remaining_secs };
        }

        let gained = self.policy.roll(rng);
        match self.grant(member.id, gained) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("XP award for user {} failed ({}): {}", member.id, e.kind(), e);
                AwardOutcome::Failed(e)
            }
        }
    }

    /// Apply `gained` XP to `user` and notify on level-up. No role or cooldown checks.
    pub fn grant(&self, user: UserId, gained: i64) -> Result<AwardOutcome> {
        let change = self.store.apply_gain(user, gained)?;
        let event = self.calculator.detect_level_up(change.old_xp, change.new_xp)?;
        log::debug!(
            "User {} gained {} XP ({} -> {})",
            user,
            gained,
            change.old_xp,
            change.new_xp
        );

        let new_level = event.map(|event| {
            let level = event.to_level;
            self.sink.level_up(user, event);
            level
        });
        Ok(AwardOutcome::Awarded {
            gained,
            old_xp: change.old_xp,
            new_xp: change.new_xp,
            new_level,
        })
    }

    /// Start a cooldown window, or report the seconds left in the current one
    fn claim_cooldown(&self, user: UserId, now_secs: i64) -> Option<i64> {
        if self.policy.cooldown_secs == 0 {
            return None;
        }
        let mut last_award = self.last_award.lock();
        if let Some(&last) = last_award.get(&user) {
            // A clock that ran backwards counts as an elapsed window
            let elapsed = now_secs.saturating_sub(last);
            if (0..self.policy.cooldown_secs).contains(&elapsed) {
                return Some(self.policy.cooldown_secs - elapsed);
            }
        }
        last_award.insert(user, now_secs);
        None
    }

    pub fn calculator(&self) -> &ProgressionCalculator {
        &self.calculator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guild::member::Role;
    use crate::guild::notify::RecordingSink;
    use crate::guild::store::MemoryXpStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn awarder(policy: ChatXpPolicy) -> ChatXpAwarder<MemoryXpStore, RecordingSink> {
        ChatXpAwarder::new(
            ProgressionCalculator::default(),
            policy,
            MemoryXpStore::new(),
            RecordingSink::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_roll_within_range() {
        let policy = ChatXpPolicy::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let gain = policy.roll(&mut rng);
            assert!((15..=25).contains(&gain));
        }
    }

    #[test]
    fn test_admin_exempt() {
        let awarder = awarder(ChatXpPolicy::fixed(500));
        let admin = Member::new(1, "admin").with_role(Role::Admin);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(awarder.on_message_sent(&admin, "hello", 0, &mut rng), AwardOutcome::Exempt);
        assert_eq!(awarder.store().current_xp(admin.id), 0);
        assert!(awarder.sink().is_empty());
    }

    #[test]
    fn test_blank_message_ignored() {
        let awarder = awarder(ChatXpPolicy::fixed(10));
        let member = Member::new(2, "quiet");
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(awarder.on_message_sent(&member, "   ", 0, &mut rng), AwardOutcome::TooShort);
    }

    #[test]
    fn test_level_up_notifies_once() {
        let awarder = awarder(ChatXpPolicy::fixed(60));
        let member = Member::new(3, "chatty");
        let mut rng = StdRng::seed_from_u64(1);

        let first = awarder.on_message_sent(&member, "gg", 0, &mut rng);
        assert_eq!(
            first,
            AwardOutcome::Awarded { gained: 60, old_xp: 0, new_xp: 60, new_level: None }
        );
        let second = awarder.on_message_sent(&member, "gg again", 1, &mut rng);
        assert_eq!(
            second,
            AwardOutcome::Awarded { gained: 60, old_xp: 60, new_xp: 120, new_level: Some(2) }
        );
        let third = awarder.on_message_sent(&member, "gg once more", 2, &mut rng);
        assert!(matches!(third, AwardOutcome::Awarded { new_level: None, .. }));

        let events = awarder.sink().take();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, member.id);
        assert_eq!(events[0].1.to_level, 2);
    }

    #[test]
    fn test_cooldown() {
        let policy = ChatXpPolicy { cooldown_secs: 30, ..ChatXpPolicy::fixed(5) };
        let awarder = awarder(policy);
        let member = Member::new(4, "spammer");
        let mut rng = StdRng::seed_from_u64(1);

        let first = awarder.on_message_sent(&member, "a", 100, &mut rng);
        assert!(matches!(first, AwardOutcome::Awarded { .. }));
        assert_eq!(
            awarder.on_message_sent(&member, "b", 110, &mut rng),
            AwardOutcome::CoolingDown { remaining_secs: 20 }
        );
        let later = awarder.on_message_sent(&member, "c", 130, &mut rng);
        assert!(matches!(later, AwardOutcome::Awarded { .. }));
        assert_eq!(awarder.store().current_xp(member.id), 10);
    }

    #[test]
    fn test_clock_running_backwards_ends_cooldown() {
        let policy = ChatXpPolicy { cooldown_secs: 30, ..ChatXpPolicy::fixed(5) };
        let awarder = awarder(policy);
        let member = Member::new(6, "time_traveller");
        let mut rng = StdRng::seed_from_u64(1);

        let first = awarder.on_message_sent(&member, "a", 100, &mut rng);
        assert!(matches!(first, AwardOutcome::Awarded { .. }));
        let earlier = awarder.on_message_sent(&member, "b", 50, &mut rng);
        assert!(matches!(earlier, AwardOutcome::Awarded { .. }));
        let far_past = awarder.on_message_sent(&member, "c", i64::MIN, &mut rng);
        assert!(matches!(far_past, AwardOutcome::Awarded { .. }));

        // The window restarts at the last award and never exceeds the cooldown
        match awarder.on_message_sent(&member, "d", i64::MIN + 10, &mut rng) {
            AwardOutcome::CoolingDown { remaining_secs } => assert_eq!(remaining_secs, 20),
            other => panic!("expected cooldown, got {:?}", other),
        }
        assert_eq!(awarder.store().current_xp(member.id), 15);
    }

    #[test]
    fn test_overflow_reported_not_raised() {
        let awarder = awarder(ChatXpPolicy::fixed(10));
        let member = Member::new(5, "whale");
        awarder.store().insert(member.id, i64::MAX - 3).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = awarder.on_message_sent(&member, "hi", 0, &mut rng);
        assert!(matches!(outcome, AwardOutcome::Failed(ProgressionError::Overflow { .. })));
        assert_eq!(awarder.store().current_xp(member.id), i64::MAX - 3);
    }

    #[test]
    fn test_invalid_policy() {
        let inverted = ChatXpPolicy { min_gain: 10, max_gain: 5, ..ChatXpPolicy::default() };
        assert!(inverted.validate().is_err());
        let negative = ChatXpPolicy { min_gain: -1, ..ChatXpPolicy::default() };
        assert!(negative.validate().is_err());
        assert!(ChatXpPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_awarder_rejects_inverted_range() {
        let inverted = ChatXpPolicy { min_gain: 10, max_gain: 5, ..ChatXpPolicy::default() };
        let result = ChatXpAwarder::new(
            ProgressionCalculator::default(),
            inverted,
            MemoryXpStore::new(),
            RecordingSink::new(),
        );
        assert!(matches!(result, Err(ProgressionError::Configuration(_))));
    }
}
