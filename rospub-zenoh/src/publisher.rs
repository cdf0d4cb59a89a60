//! Dynamic topic publisher.
//!
//! See [rmw_zenoh design - Publishers](https://github.com/ros2/rmw_zenoh/blob/rolling/docs/design.md#publishers)

use crate::{
    attachment::{Attachment, GID_SIZE, generate_gid},
    error::{Error, Result},
    keyexpr::{EntityKind, topic_keyexpr},
    names,
    node::Node,
    qos::Profile,
};
use rospub_msg::{DynamicMessage, MessageSchema, cdr, hash};
use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};
use zenoh::{Wait, bytes::ZBytes, key_expr::KeyExpr, liveliness::LivelinessToken};
use zenoh_ext::{AdvancedPublisher, AdvancedPublisherBuilderExt, CacheConfig};

/// Publisher of messages whose type is only known at runtime.
pub struct DynamicPublisher {
    node: Arc<Node>,
    fq_topic_name: String,
    schema: Arc<MessageSchema>,
    qos: Profile,
    zenoh_publisher: AdvancedPublisher<'static>,
    gid: [u8; GID_SIZE],
    sequence_number: AtomicI64,
    _liveliness_token: LivelinessToken,
}

impl DynamicPublisher {
    pub(crate) fn new(
        node: Arc<Node>,
        topic_name: &str,
        schema: Arc<MessageSchema>,
        qos: Profile,
    ) -> Result<Self> {
        let fq_topic_name = names::expand_topic_name(node.namespace(), node.name(), topic_name)?;
        let type_name = hash::dds_type_name(&schema);
        let type_hash = hash::type_hash(&schema);

        let session = node.context().session();
        let key_expr = KeyExpr::try_from(topic_keyexpr(
            node.context().domain_id(),
            &fq_topic_name,
            &type_name,
            &type_hash,
        ))?;
        let zenoh_publisher = session
            .declare_publisher(key_expr)
            .congestion_control(qos.congestion_control())
            .cache(CacheConfig::default().max_samples(qos.cache_depth()))
            .wait()?;

        let entity_id = node.allocate_entity_id();
        let token_key = node.key().entity_keyexpr(
            entity_id,
            EntityKind::Publisher,
            &fq_topic_name,
            &type_name,
            &type_hash,
            &qos,
        );
        let liveliness_token = session.liveliness().declare_token(&token_key).wait()?;
        tracing::debug!(
            "Created publisher on {fq_topic_name} ({}, {qos}) with token {token_key}",
            schema.name()
        );

        Ok(Self {
            node,
            fq_topic_name,
            schema,
            qos,
            zenoh_publisher,
            gid: generate_gid(),
            sequence_number: AtomicI64::new(0),
            _liveliness_token: liveliness_token,
        })
    }

    /// Fully qualified topic name.
    pub fn fully_qualified_topic_name(&self) -> &str {
        &self.fq_topic_name
    }

    /// Schema of the published messages.
    pub fn schema(&self) -> &Arc<MessageSchema> {
        &self.schema
    }

    /// QoS profile.
    pub fn qos(&self) -> &Profile {
        &self.qos
    }

    /// Node owning this publisher.
    pub fn node(&self) -> &Arc<Node> {
        &self.node
    }

    /// Publisher GID.
    pub fn gid(&self) -> &[u8; GID_SIZE] {
        &self.gid
    }

    /// CDR-encode `msg` and put it on the topic with a fresh attachment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `msg` is not of the publisher's
    /// type, [`Error::Msg`] if it cannot be encoded and [`Error::Zenoh`] if
    /// the put fails.
    pub fn publish(&self, msg: &DynamicMessage) -> Result<()> {
        if msg.type_name() != self.schema.name() {
            return Err(Error::TypeMismatch {
                expected: self.schema.name().to_string(),
                found: msg.type_name().to_string(),
            });
        }
        let payload = cdr::encode(msg)?;
        let seq = self.sequence_number.fetch_add(1, Ordering::Relaxed);
        let attachment = Attachment::new(seq, self.gid);

        self.zenoh_publisher
            .put(payload)
            .attachment(ZBytes::from(attachment.to_bytes().to_vec()))
            .wait()?;
        tracing::trace!("Published sample {seq} on {}", self.fq_topic_name);
        Ok(())
    }
}
