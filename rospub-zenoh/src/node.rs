//! ROS2 node.

use crate::{
    attachment::{GID_SIZE, generate_gid},
    context::Context,
    error::Result,
    keyexpr::NodeKey,
    names,
    publisher::DynamicPublisher,
    qos::Profile,
};
use rospub_msg::MessageSchema;
use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};
use zenoh::{Wait, liveliness::LivelinessToken};

/// ROS2 node, announced on the graph for as long as it lives.
pub struct Node {
    context: Context,
    node_id: u32,
    name: String,
    namespace: String,
    gid: [u8; GID_SIZE],
    /// Entity IDs start at 10, as in rmw_zenoh.
    next_entity_id: AtomicU32,
    _liveliness_token: LivelinessToken,
}

impl Node {
    pub(crate) fn new(context: Context, node_id: u32, name: &str, namespace: &str) -> Result<Self> {
        let token_key = NodeKey {
            domain_id: context.domain_id(),
            session_id: context.session_id(),
            node_id,
            enclave: "",
            namespace,
            name,
        }
        .node_keyexpr();
        let token = context
            .session()
            .liveliness()
            .declare_token(&token_key)
            .wait()?;
        tracing::debug!("Declared node token {token_key}");

        Ok(Self {
            context,
            node_id,
            name: name.to_string(),
            namespace: namespace.to_string(),
            gid: generate_gid(),
            next_entity_id: AtomicU32::new(10),
            _liveliness_token: token,
        })
    }

    /// Node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node namespace, `/` for the root namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Fully qualified node name.
    pub fn fully_qualified_name(&self) -> String {
        names::build_node_fqn(&self.namespace, &self.name)
    }

    /// Node ID within the context.
    pub fn node_id(&self) -> u32 {
        self.node_id
    }

    /// Node GID.
    pub fn gid(&self) -> &[u8; GID_SIZE] {
        &self.gid
    }

    /// Parent context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub(crate) fn key(&self) -> NodeKey<'_> {
        NodeKey {
            domain_id: self.context.domain_id(),
            session_id: self.context.session_id(),
            node_id: self.node_id,
            enclave: "",
            namespace: &self.namespace,
            name: &self.name,
        }
    }

    pub(crate) fn allocate_entity_id(&self) -> u32 {
        self.next_entity_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Create a publisher of `schema` messages on `topic_name`.
    ///
    /// Relative and private topic names are expanded against this node.
    /// `qos` defaults to [`Profile::default`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`](crate::Error::InvalidName) for an
    /// invalid topic name and [`Error::Zenoh`](crate::Error::Zenoh) if the
    /// publisher or its liveliness token cannot be declared.
    pub fn create_publisher(
        self: &Arc<Self>,
        topic_name: &str,
        schema: Arc<MessageSchema>,
        qos: Option<Profile>,
    ) -> Result<DynamicPublisher> {
        DynamicPublisher::new(
            Arc::clone(self),
            topic_name,
            schema,
            qos.unwrap_or_default(),
        )
    }
}
