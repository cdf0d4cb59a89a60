//! Publisher QoS.
//!
//! Only the policies that shape the Zenoh publisher are modelled:
//!
//! | Policy | Zenoh mapping |
//! |--------|---------------|
//! | `Reliable` + `KeepAll` | `CongestionControl::Block` |
//! | anything else | `CongestionControl::Drop` |
//! | `TransientLocal` | `AdvancedPublisher` cache of the queue depth |
//! | `Volatile` | no cache |
//!
//! Deadline, lifespan and liveliness always take the rmw defaults.

use std::fmt;
use zenoh::qos::CongestionControl;

/// Default depth when QoS depth is 0 (per rmw_zenoh specification).
pub const DEFAULT_DEPTH: usize = 42;

/// History policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryPolicy {
    /// Keep the last `depth` samples
    #[default]
    KeepLast,
    /// Keep every sample
    KeepAll,
}

/// Reliability policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReliabilityPolicy {
    /// Retransmit lost samples
    #[default]
    Reliable,
    /// Drop lost samples
    BestEffort,
}

/// Durability policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurabilityPolicy {
    /// Late joiners receive the last published samples
    TransientLocal,
    /// Late joiners only receive new samples
    #[default]
    Volatile,
}

/// QoS profile of a publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// History policy
    pub history: HistoryPolicy,
    /// Queue depth for `KeepLast`
    pub depth: usize,
    /// Reliability policy
    pub reliability: ReliabilityPolicy,
    /// Durability policy
    pub durability: DurabilityPolicy,
}

impl Default for Profile {
    /// Reliable, volatile, keep last 10.
    fn default() -> Self {
        Self {
            history: HistoryPolicy::KeepLast,
            depth: 10,
            reliability: ReliabilityPolicy::Reliable,
            durability: DurabilityPolicy::Volatile,
        }
    }
}

impl Profile {
    /// Queue depth, with [`DEFAULT_DEPTH`] standing in for 0.
    pub fn effective_depth(&self) -> usize {
        if self.depth == 0 {
            DEFAULT_DEPTH
        } else {
            self.depth
        }
    }

    /// Samples a publisher keeps for late-joining subscribers: the queue
    /// depth when transient local, none when volatile.
    pub fn cache_depth(&self) -> usize {
        match self.durability {
            DurabilityPolicy::TransientLocal => self.effective_depth(),
            DurabilityPolicy::Volatile => 0,
        }
    }

    /// Zenoh congestion control for a publisher with this profile.
    ///
    /// Per rmw_zenoh design:
    /// > `KeepAll`: For publishers, if the `RELIABILITY` is `RELIABLE`, the
    /// > `CongestionControl::BLOCK` mode is set.
    pub fn congestion_control(&self) -> CongestionControl {
        if self.history == HistoryPolicy::KeepAll
            && self.reliability == ReliabilityPolicy::Reliable
        {
            CongestionControl::Block
        } else {
            CongestionControl::Drop
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reliability = match self.reliability {
            ReliabilityPolicy::Reliable => "reliable",
            ReliabilityPolicy::BestEffort => "best_effort",
        };
        let durability = match self.durability {
            DurabilityPolicy::TransientLocal => "transient_local",
            DurabilityPolicy::Volatile => "volatile",
        };
        match self.history {
            HistoryPolicy::KeepLast => write!(
                f,
                "{reliability}, {durability}, keep_last({})",
                self.effective_depth()
            ),
            HistoryPolicy::KeepAll => write!(f, "{reliability}, {durability}, keep_all"),
        }
    }
}
