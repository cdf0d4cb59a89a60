//! Publish dynamic ROS2 messages over Zenoh.
//!
//! The wire layout follows the
//! [rmw_zenoh design](https://github.com/ros2/rmw_zenoh/blob/rolling/docs/design.md),
//! so messages published here are received by ROS2 nodes running
//! `rmw_zenoh_cpp`:
//!
//! - a [`Context`] is one Zenoh session
//! - a [`Node`] is announced by a liveliness token
//! - a [`DynamicPublisher`] puts CDR payloads on the topic key expression,
//!   each with a 33-byte attachment, and announces itself with its own
//!   liveliness token
//!
//! # Example
//!
//! ```no_run
//! use rospub_msg::{MessageTypeName, TypeRegistry};
//! use rospub_zenoh::Context;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = TypeRegistry::from_env();
//! let msg = registry.new_message(&MessageTypeName::parse("std_msgs/String")?)?;
//!
//! let ctx = Context::new()?;
//! let node = ctx.create_node("talker", None)?;
//! let publisher = node.create_publisher("chatter", msg.schema().clone(), None)?;
//! publisher.publish(&msg)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod attachment;
mod context;
mod error;
pub mod keyexpr;
pub mod logger;
pub mod names;
mod node;
mod publisher;
pub mod qos;

pub use context::{Context, DEFAULT_ROUTER_ENDPOINT, ROS_DOMAIN_ID, ZENOH_SESSION_CONFIG_URI};
pub use error::{Error, Result};
pub use node::Node;
pub use publisher::DynamicPublisher;
pub use qos::{DurabilityPolicy, HistoryPolicy, Profile, ReliabilityPolicy};
