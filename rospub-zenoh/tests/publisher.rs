//! Integration tests for nodes and publishers on a local Zenoh session.

use rospub_msg::{MessageTypeName, TypeRegistry, ValueTree, cdr, populate};
use rospub_zenoh::{
    Context, DurabilityPolicy, Error, Profile, attachment::ATTACHMENT_SIZE, names::NameKind,
};
use std::time::Duration;
use zenoh::Wait;
use zenoh_ext::{AdvancedSubscriberBuilderExt, HistoryConfig};

/// Context on an isolated peer session.
fn local_context(domain_id: u32) -> Context {
    let mut config = zenoh::Config::default();
    config
        .insert_json5("scouting/multicast/enabled", "false")
        .unwrap();
    Context::with_config(domain_id, config).expect("Failed to create context")
}

fn liveliness_keys(ctx: &Context) -> Vec<String> {
    let replies = ctx
        .session()
        .liveliness()
        .get("@ros2_lv/**")
        .timeout(Duration::from_secs(1))
        .wait()
        .unwrap();
    let mut keys = Vec::new();
    while let Ok(reply) = replies.recv() {
        if let Ok(sample) = reply.result() {
            keys.push(sample.key_expr().as_str().to_string());
        }
    }
    keys
}

#[test]
fn test_node_announces_itself() {
    let ctx = local_context(3);
    let node = ctx
        .create_node("publisher_std_msgs_String", None)
        .expect("Failed to create node");
    assert_eq!(node.namespace(), "/");
    assert_eq!(node.fully_qualified_name(), "/publisher_std_msgs_String");

    let expected = format!(
        "@ros2_lv/3/{}/0/0/NN/%/%/publisher_std_msgs_String",
        ctx.session_id()
    );
    assert!(liveliness_keys(&ctx).contains(&expected));
}

#[test]
fn test_invalid_names() {
    let ctx = local_context(0);
    assert!(matches!(
        ctx.create_node("bad/name", None),
        Err(Error::InvalidName {
            kind: NameKind::Node,
            ..
        })
    ));
    assert!(matches!(
        ctx.create_node("node", Some("relative")),
        Err(Error::InvalidName {
            kind: NameKind::Namespace,
            ..
        })
    ));

    let node = ctx.create_node("node", Some("/robot1")).unwrap();
    let schema = TypeRegistry::new()
        .resolve(&MessageTypeName::new("std_msgs", "String"))
        .unwrap();
    assert!(matches!(
        node.create_publisher("foo//bar", schema, None),
        Err(Error::InvalidName {
            kind: NameKind::Topic,
            ..
        })
    ));
}

#[test]
fn test_publish_roundtrip() {
    let ctx = local_context(0);
    let node = ctx.create_node("talker", Some("/robot1")).unwrap();

    let mut registry = TypeRegistry::new();
    let mut msg = registry
        .new_message(&MessageTypeName::parse("std_msgs/String").unwrap())
        .unwrap();
    populate(&mut msg, &ValueTree::from_yaml("data: hello").unwrap()).unwrap();

    let publisher = node
        .create_publisher("chatter", msg.schema().clone(), None)
        .unwrap();
    assert_eq!(publisher.fully_qualified_topic_name(), "/robot1/chatter");

    let subscriber = ctx
        .session()
        .declare_subscriber("0/robot1/chatter/std_msgs::msg::dds_::String_/*")
        .wait()
        .unwrap();

    let token = format!(
        "@ros2_lv/0/{}/0/10/MP/%/%robot1/talker/%robot1%chatter/std_msgs::msg::dds_::String_/\
         RIHS01_df668c740482bbd48fb39d76a70dfd4bd59db1288021743503259e948f6b1a18/::,10:,:,:,,",
        ctx.session_id()
    );
    assert!(liveliness_keys(&ctx).contains(&token));

    publisher.publish(&msg).unwrap();
    publisher.publish(&msg).unwrap();

    for expected_seq in 0..2i64 {
        let sample = subscriber
            .recv_timeout(Duration::from_secs(5))
            .unwrap()
            .expect("no sample received");
        assert_eq!(sample.payload().to_bytes(), cdr::encode(&msg).unwrap());

        let attachment = sample.attachment().expect("missing attachment").to_bytes();
        assert_eq!(attachment.len(), ATTACHMENT_SIZE);
        assert_eq!(attachment[0..8], expected_seq.to_le_bytes());
        assert_eq!(attachment[16], 16);
        assert_eq!(attachment[17..], publisher.gid()[..]);
    }
}

#[test]
fn test_publish_wrong_type() {
    let ctx = local_context(0);
    let node = ctx.create_node("talker", None).unwrap();
    let mut registry = TypeRegistry::new();
    let schema = registry
        .resolve(&MessageTypeName::new("std_msgs", "String"))
        .unwrap();
    let publisher = node.create_publisher("/chatter", schema, None).unwrap();

    let other = registry
        .new_message(&MessageTypeName::new("std_msgs", "Int32"))
        .unwrap();
    assert!(matches!(
        publisher.publish(&other),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_transient_local_replays_to_late_subscriber() {
    let ctx = local_context(0);
    let node = ctx.create_node("latched", None).unwrap();
    let mut registry = TypeRegistry::new();
    let schema = registry
        .resolve(&MessageTypeName::new("std_msgs", "Int32"))
        .unwrap();
    let qos = Profile {
        depth: 2,
        durability: DurabilityPolicy::TransientLocal,
        ..Profile::default()
    };
    let publisher = node
        .create_publisher("/latched", schema.clone(), Some(qos))
        .unwrap();

    let mut sent = Vec::new();
    for data in 1..=3 {
        let mut msg = registry.new_message(schema.name()).unwrap();
        populate(&mut msg, &ValueTree::from_yaml(&format!("data: {data}")).unwrap()).unwrap();
        publisher.publish(&msg).unwrap();
        sent.push(cdr::encode(&msg).unwrap());
    }

    let subscriber = ctx
        .session()
        .declare_subscriber("0/latched/std_msgs::msg::dds_::Int32_/*")
        .history(HistoryConfig::default())
        .wait()
        .unwrap();
    for expected in &sent[1..] {
        let sample = subscriber
            .recv_timeout(Duration::from_secs(5))
            .unwrap()
            .expect("no sample replayed");
        assert_eq!(sample.payload().to_bytes(), *expected);
    }
}
