//! Key expressions, compatible with rmw_zenoh_cpp.
//!
//! See [rmw_zenoh design - Topic and Service name mapping](https://github.com/ros2/rmw_zenoh/blob/rolling/docs/design.md#topic-and-service-name-mapping-to-zenoh-key-expressions)
//! and [Graph cache](https://github.com/ros2/rmw_zenoh/blob/rolling/docs/design.md#graph-cache).

use crate::qos::{DurabilityPolicy, HistoryPolicy, Profile, ReliabilityPolicy};

/// Prefix for ROS2 liveliness tokens (hermetic namespace).
pub const LIVELINESS_PREFIX: &str = "@ros2_lv";

/// Entity kinds announced through liveliness tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Node entity
    Node,
    /// Message publisher
    Publisher,
}

impl EntityKind {
    /// Two-character code for this entity kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "NN",
            Self::Publisher => "MP",
        }
    }
}

/// Topic key expression: `<domain_id>/<fq_name without leading />/<type_name>/<type_hash>`.
///
/// ```
/// use rospub_zenoh::keyexpr::topic_keyexpr;
///
/// let key = topic_keyexpr(0, "/chatter", "std_msgs::msg::dds_::String_", "RIHS01_abc");
/// assert_eq!(key, "0/chatter/std_msgs::msg::dds_::String_/RIHS01_abc");
/// ```
pub fn topic_keyexpr(domain_id: u32, fq_name: &str, type_name: &str, type_hash: &str) -> String {
    let name = fq_name.strip_prefix('/').unwrap_or(fq_name);
    format!("{domain_id}/{name}/{type_name}/{type_hash}")
}

/// Identity of a node in liveliness key expressions.
#[derive(Debug, Clone, Copy)]
pub struct NodeKey<'a> {
    /// ROS domain ID
    pub domain_id: u32,
    /// Zenoh session ID (hex string)
    pub session_id: &'a str,
    /// Node ID within the context
    pub node_id: u32,
    /// SROS enclave, empty if not set
    pub enclave: &'a str,
    /// Node namespace, empty for the root namespace
    pub namespace: &'a str,
    /// Node name
    pub name: &'a str,
}

impl NodeKey<'_> {
    fn prefix(&self, entity_id: u32, kind: EntityKind) -> String {
        format!(
            "{LIVELINESS_PREFIX}/{}/{}/{}/{entity_id}/{}/{}/{}/{}",
            self.domain_id,
            self.session_id,
            self.node_id,
            kind.as_str(),
            mangle_name(self.enclave),
            mangle_name(self.namespace),
            self.name
        )
    }

    /// Node liveliness token:
    /// `@ros2_lv/<domain_id>/<session_id>/<node_id>/<node_id>/NN/<enclave>/<namespace>/<name>`
    pub fn node_keyexpr(&self) -> String {
        self.prefix(self.node_id, EntityKind::Node)
    }

    /// Entity liveliness token: the node prefix with `entity_id` and `kind`,
    /// followed by `/<mangled fq_name>/<type_name>/<type_hash>/<qos>`.
    pub fn entity_keyexpr(
        &self,
        entity_id: u32,
        kind: EntityKind,
        fq_name: &str,
        type_name: &str,
        type_hash: &str,
        qos: &Profile,
    ) -> String {
        format!(
            "{}/{}/{type_name}/{type_hash}/{}",
            self.prefix(entity_id, kind),
            mangle_name(fq_name),
            qos_to_keyexpr(qos)
        )
    }
}

/// Replace `/` with `%`; an empty name becomes `%`.
///
/// ```
/// use rospub_zenoh::keyexpr::mangle_name;
///
/// assert_eq!(mangle_name("/robot1/cmd_vel"), "%robot1%cmd_vel");
/// assert_eq!(mangle_name(""), "%");
/// ```
pub fn mangle_name(name: &str) -> String {
    if name.is_empty() {
        "%".to_string()
    } else {
        name.replace('/', "%")
    }
}

/// Encode a QoS profile the way rmw_zenoh_cpp's `qos_to_keyexpr` does.
///
/// Format: `<Reliability>:<Durability>:<History>,<Depth>:<DeadlineSec>,<DeadlineNSec>:<LifespanSec>,<LifespanNSec>:<Liveliness>,<LivelinessSec>,<LivelinessNSec>`
///
/// A value is only written when it differs from the rmw default (reliable,
/// volatile, keep last, depth 42, infinite durations, automatic liveliness).
pub fn qos_to_keyexpr(qos: &Profile) -> String {
    // rmw_zenoh_cpp/src/detail/qos.cpp
    const DEFAULT_RELIABILITY: u8 = 1;
    const DEFAULT_DURABILITY: u8 = 2;
    const DEFAULT_HISTORY: u8 = 1;
    const DEFAULT_DEPTH: usize = 42;

    fn non_default<T: PartialEq + ToString>(value: T, default: T) -> String {
        if value == default {
            String::new()
        } else {
            value.to_string()
        }
    }

    // rmw enum values
    let reliability: u8 = match qos.reliability {
        ReliabilityPolicy::Reliable => 1,
        ReliabilityPolicy::BestEffort => 2,
    };
    let durability: u8 = match qos.durability {
        DurabilityPolicy::TransientLocal => 1,
        DurabilityPolicy::Volatile => 2,
    };
    let history: u8 = match qos.history {
        HistoryPolicy::KeepLast => 1,
        HistoryPolicy::KeepAll => 2,
    };

    // Deadline, lifespan and liveliness are left at their defaults
    format!(
        "{}:{}:{},{}:,:,:,,",
        non_default(reliability, DEFAULT_RELIABILITY),
        non_default(durability, DEFAULT_DURABILITY),
        non_default(history, DEFAULT_HISTORY),
        non_default(qos.depth, DEFAULT_DEPTH),
    )
}
