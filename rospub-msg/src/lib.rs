//! Dynamic ROS2 messages.
//!
//! This crate provides everything `ros2 topic pub` needs to build a message
//! whose type is only known at runtime:
//!
//! - [`MessageSchema`]: field layout of a message type, parsed from `.msg`
//!   definitions and resolved by a [`TypeRegistry`]
//! - [`DynamicMessage`]: a default-valued instance of a schema
//! - [`ValueTree`]: field values parsed from YAML text
//! - [`populate`]: recursive, type-coercing assignment of a [`ValueTree`] onto
//!   a [`DynamicMessage`], with [`FieldError`] pointing at the failing field
//! - [`cdr::encode`] and [`hash::type_hash`] for putting the message on the wire
//!
//! # Example
//!
//! ```
//! use rospub_msg::{MessageTypeName, TypeRegistry, ValueTree, populate};
//!
//! let mut registry = TypeRegistry::new();
//! let name = MessageTypeName::parse("geometry_msgs/Pose")?;
//! let mut msg = registry.new_message(&name)?;
//!
//! let values = ValueTree::from_yaml("{position: {x: 1.5}}")?;
//! populate(&mut msg, &values)?;
//!
//! assert_eq!(
//!     msg.to_string(),
//!     "geometry_msgs.msg.Pose(position=geometry_msgs.msg.Point(x=1.5, y=0.0, z=0.0), \
//!      orientation=geometry_msgs.msg.Quaternion(x=0.0, y=0.0, z=0.0, w=1.0))"
//! );
//! # Ok::<(), rospub_msg::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod builtin;
pub mod cdr;
mod error;
pub mod hash;
mod message;
pub mod parser;
mod populate;
mod registry;
mod schema;
mod type_name;
mod value;

pub use error::{Error, Result};
pub use message::{AssignError, DynamicMessage, FieldValue};
pub use populate::{CoerceError, FieldCause, FieldError, FieldPath, PathSegment, populate};
pub use registry::{AMENT_PREFIX_PATH, TypeRegistry};
pub use schema::{ElementKind, FieldKind, FieldSchema, MessageSchema, ScalarKind};
pub use type_name::MessageTypeName;
pub use value::{Value, ValueTree};
