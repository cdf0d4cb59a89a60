use rospub_msg::{
    AssignError, CoerceError, DynamicMessage, FieldCause, FieldValue, MessageTypeName,
    TypeRegistry, ValueTree, populate,
};
use std::fs;
use tempfile::TempDir;

fn new_message(registry: &mut TypeRegistry, type_name: &str) -> DynamicMessage {
    registry
        .new_message(&MessageTypeName::parse(type_name).unwrap())
        .unwrap()
}

fn values(text: &str) -> ValueTree {
    ValueTree::from_yaml(text).unwrap()
}

/// Registry with a `test_msgs/Triple` (`a`, `b`, `c`) and a `test_msgs/Target`
/// holding a `geometry_msgs/Pose` named `pose`.
fn test_registry() -> (TempDir, TypeRegistry) {
    let dir = TempDir::new().unwrap();
    let msg_dir = dir.path().join("test_msgs").join("msg");
    fs::create_dir_all(&msg_dir).unwrap();
    fs::write(msg_dir.join("Triple.msg"), "int32 a\nint32 b\nint32 c 3\n").unwrap();
    fs::write(
        msg_dir.join("Target.msg"),
        "geometry_msgs/Pose pose\nstring label\n",
    )
    .unwrap();
    let registry = TypeRegistry::new().with_search_path(dir.path());
    (dir, registry)
}

#[test]
fn test_flat_message() {
    let mut registry = TypeRegistry::new();
    let mut msg = new_message(&mut registry, "std_msgs/String");
    populate(&mut msg, &values("data: hello")).unwrap();
    assert_eq!(msg.field("data"), Some(&FieldValue::String("hello".into())));

    let mut msg = new_message(&mut registry, "std_msgs/msg/ColorRGBA");
    populate(&mut msg, &values("{r: 1, g: '0.5', b: 0.25}")).unwrap();
    assert_eq!(msg.field("r"), Some(&FieldValue::Float32(1.0)));
    assert_eq!(msg.field("g"), Some(&FieldValue::Float32(0.5)));
    assert_eq!(msg.field("b"), Some(&FieldValue::Float32(0.25)));
    assert_eq!(msg.field("a"), Some(&FieldValue::Float32(0.0)));
}

#[test]
fn test_unknown_field() {
    let mut registry = TypeRegistry::new();
    let mut msg = new_message(&mut registry, "std_msgs/String");
    let err = populate(&mut msg, &values("{foo: 1}")).unwrap_err();
    assert_eq!(err.path().to_string(), "foo");
    assert!(matches!(
        err.cause(),
        FieldCause::UnknownField { field, .. } if field == "foo"
    ));
}

#[test]
fn test_malformed_scalar_path_has_no_dot() {
    let mut registry = TypeRegistry::new();
    let mut msg = new_message(&mut registry, "std_msgs/Int32");
    let err = populate(&mut msg, &values("{data: abc}")).unwrap_err();
    assert_eq!(err.path().to_string(), "data");
    assert!(!err.is_composite());
    assert!(matches!(
        err.cause(),
        FieldCause::Malformed(CoerceError::InvalidInteger { .. })
    ));
    assert_eq!(msg.field("data"), Some(&FieldValue::Int32(0)));
}

#[test]
fn test_nested_failure_path() {
    let (_dir, mut registry) = test_registry();
    let mut msg = new_message(&mut registry, "test_msgs/Target");
    let default = msg.clone();

    let err = populate(&mut msg, &values("{pose: {position: {x: notanumber}}}")).unwrap_err();
    assert_eq!(err.path().to_string(), "pose.position.x");
    assert!(err.is_composite());
    assert!(matches!(
        err.cause(),
        FieldCause::Malformed(CoerceError::InvalidFloat { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Failed to populate field 'pose.position.x': could not convert string to float64: \
         'notanumber' (invalid float literal)"
    );
    // The failed sub-message is never assigned
    assert_eq!(msg, default);
}

#[test]
fn test_nested_success() {
    let (_dir, mut registry) = test_registry();
    let mut msg = new_message(&mut registry, "test_msgs/Target");
    populate(
        &mut msg,
        &values("{pose: {position: {x: 1.0, z: -2}, orientation: {w: 0.5}}, label: here}"),
    )
    .unwrap();

    let Some(FieldValue::Message(pose)) = msg.field("pose") else {
        panic!("pose should be a message");
    };
    let Some(FieldValue::Message(position)) = pose.field("position") else {
        panic!("position should be a message");
    };
    assert_eq!(position.field("x"), Some(&FieldValue::Float64(1.0)));
    assert_eq!(position.field("y"), Some(&FieldValue::Float64(0.0)));
    assert_eq!(position.field("z"), Some(&FieldValue::Float64(-2.0)));
    let Some(FieldValue::Message(orientation)) = pose.field("orientation") else {
        panic!("orientation should be a message");
    };
    assert_eq!(orientation.field("w"), Some(&FieldValue::Float64(0.5)));
    assert_eq!(msg.field("label"), Some(&FieldValue::String("here".into())));
}

#[test]
fn test_idempotent() {
    let (_dir, mut registry) = test_registry();
    let tree = values("{pose: {position: {y: 4}}, label: twice}");

    let mut first = new_message(&mut registry, "test_msgs/Target");
    let mut second = new_message(&mut registry, "test_msgs/Target");
    populate(&mut first, &tree).unwrap();
    populate(&mut second, &tree).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_partial_mutation() {
    let (_dir, mut registry) = test_registry();
    let mut msg = new_message(&mut registry, "test_msgs/Triple");
    let err = populate(&mut msg, &values("{a: 1, b: oops, c: 9}")).unwrap_err();
    assert_eq!(err.path().to_string(), "b");
    assert_eq!(msg.field("a"), Some(&FieldValue::Int32(1)));
    assert_eq!(msg.field("b"), Some(&FieldValue::Int32(0)));
    assert_eq!(msg.field("c"), Some(&FieldValue::Int32(3)));
}

#[test]
fn test_empty_tree_keeps_defaults() {
    let (_dir, mut registry) = test_registry();
    for type_name in ["test_msgs/Triple", "test_msgs/Target", "std_msgs/Empty"] {
        let mut msg = new_message(&mut registry, type_name);
        let default = msg.clone();
        populate(&mut msg, &values("{}")).unwrap();
        assert_eq!(msg, default, "{type_name}");
    }
}

#[test]
fn test_rejected_assignment_stays_at_field() {
    let mut registry = TypeRegistry::new();
    let mut msg = new_message(&mut registry, "std_msgs/UInt8");
    let err = populate(&mut msg, &values("{data: 300}")).unwrap_err();
    assert_eq!(err.path().to_string(), "data");
    assert_eq!(
        *err.cause(),
        FieldCause::Rejected(AssignError::OutOfRange {
            value: "300".into(),
            kind: "uint8"
        })
    );

    let mut msg = new_message(&mut registry, "geometry_msgs/PoseWithCovariance");
    let err = populate(&mut msg, &values("{covariance: [1, 2]}")).unwrap_err();
    assert_eq!(err.path().to_string(), "covariance");
    assert!(matches!(
        err.cause(),
        FieldCause::Rejected(AssignError::LengthMismatch {
            expected: 36,
            found: 2
        })
    ));
}

#[test]
fn test_out_of_range_real_reports_input() {
    let mut registry = TypeRegistry::new();
    let mut msg = new_message(&mut registry, "std_msgs/Int32");
    let err = populate(&mut msg, &values("{data: 1e40}")).unwrap_err();
    assert_eq!(err.path().to_string(), "data");
    assert_eq!(
        *err.cause(),
        FieldCause::Rejected(AssignError::OutOfRange {
            value: "1e40".into(),
            kind: "int32"
        })
    );
    assert_eq!(msg, new_message(&mut registry, "std_msgs/Int32"));
}

#[test]
fn test_char_from_single_character() {
    let mut registry = TypeRegistry::new();
    let mut msg = new_message(&mut registry, "std_msgs/Char");
    populate(&mut msg, &values("{data: a}")).unwrap();
    assert_eq!(msg.field("data"), Some(&FieldValue::Char(b'a')));
    assert_eq!(msg.to_string(), "std_msgs.msg.Char(data='a')");

    let mut msg = new_message(&mut registry, "std_msgs/Char");
    let err = populate(&mut msg, &values("{data: '65'}")).unwrap_err();
    assert_eq!(err.path().to_string(), "data");
    assert_eq!(
        *err.cause(),
        FieldCause::Malformed(CoerceError::InvalidChar { text: "65".into() })
    );
}

#[test]
fn test_scalar_for_message_is_malformed() {
    let mut registry = TypeRegistry::new();
    let mut msg = new_message(&mut registry, "geometry_msgs/Pose");
    let err = populate(&mut msg, &values("{position: 3}")).unwrap_err();
    assert_eq!(err.path().to_string(), "position");
    assert!(matches!(
        err.cause(),
        FieldCause::Malformed(CoerceError::TypeMismatch { .. })
    ));
}

#[test]
fn test_header_stamp() {
    let mut registry = TypeRegistry::new();
    let mut msg = new_message(&mut registry, "geometry_msgs/PoseStamped");
    populate(
        &mut msg,
        &values("{header: {stamp: {sec: 12, nanosec: 5}, frame_id: map}}"),
    )
    .unwrap();
    assert!(msg.to_string().starts_with(
        "geometry_msgs.msg.PoseStamped(header=std_msgs.msg.Header(\
         stamp=builtin_interfaces.msg.Time(sec=12, nanosec=5), frame_id='map'), "
    ));
}
