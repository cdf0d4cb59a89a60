//! Sample attachment.
//!
//! Every sample put by a publisher carries a 33-byte attachment, as specified
//! in [rmw_zenoh design - Publishers](https://github.com/ros2/rmw_zenoh/blob/rolling/docs/design.md#publishers):
//!
//! | Offset | Size | Content |
//! |--------|------|---------|
//! | 0 | 8 | Sequence number (i64 LE) |
//! | 8 | 8 | Timestamp in nanoseconds since UNIX epoch (i64 LE) |
//! | 16 | 1 | GID length (always 16) |
//! | 17 | 16 | Publisher GID |

use std::time::{SystemTime, UNIX_EPOCH};

/// Size of the attachment in bytes.
pub const ATTACHMENT_SIZE: usize = 33;

/// Size of the GID (Global Identifier).
pub const GID_SIZE: usize = 16;

/// Attachment data of a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Sequence number of the sample.
    pub sequence_number: i64,
    /// Timestamp in nanoseconds since UNIX epoch.
    pub timestamp_ns: i64,
    /// Publisher GID.
    pub gid: [u8; GID_SIZE],
}

impl Attachment {
    /// Attachment stamped with the current time.
    pub fn new(sequence_number: i64, gid: [u8; GID_SIZE]) -> Self {
        let timestamp_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|d| i64::try_from(d.as_nanos()).ok())
            .unwrap_or(0);
        Self {
            sequence_number,
            timestamp_ns,
            gid,
        }
    }

    /// Encode the attachment.
    pub fn to_bytes(&self) -> [u8; ATTACHMENT_SIZE] {
        let mut bytes = [0u8; ATTACHMENT_SIZE];
        bytes[0..8].copy_from_slice(&self.sequence_number.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.timestamp_ns.to_le_bytes());
        bytes[16] = GID_SIZE as u8;
        bytes[17..].copy_from_slice(&self.gid);
        bytes
    }
}

/// Random GID for a node or publisher.
pub fn generate_gid() -> [u8; GID_SIZE] {
    *uuid::Uuid::new_v4().as_bytes()
}
