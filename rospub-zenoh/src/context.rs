//! Zenoh session management.
//!
//! See [rmw_zenoh design - Contexts](https://github.com/ros2/rmw_zenoh/blob/rolling/docs/design.md#contexts)

use crate::{
    error::{Error, Result},
    names,
    node::Node,
};
use std::{
    env,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
};
use zenoh::{Session, Wait};

/// Environment variable for custom Zenoh session config.
pub const ZENOH_SESSION_CONFIG_URI: &str = "ZENOH_SESSION_CONFIG_URI";

/// Environment variable for ROS domain ID.
pub const ROS_DOMAIN_ID: &str = "ROS_DOMAIN_ID";

/// Default Zenoh router endpoint.
pub const DEFAULT_ROUTER_ENDPOINT: &str = "tcp/localhost:7447";

struct ContextInner {
    session: Session,
    domain_id: u32,
    /// Zenoh session ID as hex string.
    session_id: String,
    next_node_id: AtomicU32,
}

/// ROS2 context wrapping a Zenoh session.
///
/// Nodes keep a handle on their context, so the session is closed once the
/// context and every node and publisher created from it are dropped.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// Context on the domain given by `ROS_DOMAIN_ID` (default 0).
    ///
    /// # Errors
    ///
    /// See [`with_domain_id`](Self::with_domain_id).
    pub fn new() -> Result<Self> {
        let domain_id = env::var(ROS_DOMAIN_ID)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0);
        Self::with_domain_id(domain_id)
    }

    /// Context on `domain_id`.
    ///
    /// The session is configured from the file named by
    /// `ZENOH_SESSION_CONFIG_URI` if set, otherwise it is a peer connecting
    /// to the router at [`DEFAULT_ROUTER_ENDPOINT`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the config file cannot be loaded
    /// and [`Error::Zenoh`] if the session cannot be opened.
    pub fn with_domain_id(domain_id: u32) -> Result<Self> {
        let config = match env::var(ZENOH_SESSION_CONFIG_URI) {
            Ok(uri) => zenoh::Config::from_file(&uri)
                .map_err(|e| Error::InvalidConfig(format!("Failed to load {uri}: {e}")))?,
            Err(_) => {
                let mut config = zenoh::Config::default();
                config
                    .insert_json5(
                        "connect/endpoints",
                        &format!(r#"["{DEFAULT_ROUTER_ENDPOINT}"]"#),
                    )
                    .map_err(|e| {
                        Error::InvalidConfig(format!("Failed to set endpoints: {e}"))
                    })?;
                config
            }
        };
        Self::with_config(domain_id, config)
    }

    /// Context with a custom Zenoh configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Zenoh`] if the session cannot be opened.
    pub fn with_config(domain_id: u32, config: zenoh::Config) -> Result<Self> {
        let session = zenoh::open(config).wait()?;
        let session_id = session.zid().to_string();
        tracing::debug!("Opened Zenoh session {session_id} on domain {domain_id}");

        Ok(Self {
            inner: Arc::new(ContextInner {
                session,
                domain_id,
                session_id,
                next_node_id: AtomicU32::new(0),
            }),
        })
    }

    /// ROS domain ID.
    pub fn domain_id(&self) -> u32 {
        self.inner.domain_id
    }

    /// Zenoh session ID as a hex string.
    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    /// Underlying Zenoh session.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Create a node and announce it with a liveliness token.
    ///
    /// `namespace` defaults to the root namespace `/`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] if the name or namespace is invalid and
    /// [`Error::Zenoh`] if the token cannot be declared.
    pub fn create_node(&self, name: &str, namespace: Option<&str>) -> Result<Arc<Node>> {
        names::validate_node_name(name)?;
        let namespace = match namespace {
            None | Some("") => "/",
            Some(ns) => {
                names::validate_namespace(ns)?;
                ns
            }
        };

        let node_id = self.inner.next_node_id.fetch_add(1, Ordering::SeqCst);
        Node::new(self.clone(), node_id, name, namespace).map(Arc::new)
    }
}
