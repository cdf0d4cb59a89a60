//! Embedded definitions of common interfaces, used when no ROS2 installation
//! provides them.

type Definition = (&'static str, &'static str, &'static str);

const DEFINITIONS: &[Definition] = &[
    // builtin_interfaces
    ("builtin_interfaces", "Time", "int32 sec\nuint32 nanosec\n"),
    ("builtin_interfaces", "Duration", "int32 sec\nuint32 nanosec\n"),
    // std_msgs
    ("std_msgs", "Bool", "bool data\n"),
    ("std_msgs", "Byte", "byte data\n"),
    ("std_msgs", "Char", "char data\n"),
    ("std_msgs", "Empty", ""),
    ("std_msgs", "Float32", "float32 data\n"),
    ("std_msgs", "Float64", "float64 data\n"),
    ("std_msgs", "Int8", "int8 data\n"),
    ("std_msgs", "Int16", "int16 data\n"),
    ("std_msgs", "Int32", "int32 data\n"),
    ("std_msgs", "Int64", "int64 data\n"),
    ("std_msgs", "UInt8", "uint8 data\n"),
    ("std_msgs", "UInt16", "uint16 data\n"),
    ("std_msgs", "UInt32", "uint32 data\n"),
    ("std_msgs", "UInt64", "uint64 data\n"),
    ("std_msgs", "String", "string data\n"),
    (
        "std_msgs",
        "Header",
        "# Standard metadata for higher-level stamped data types.\n\
         builtin_interfaces/Time stamp\n\
         string frame_id\n",
    ),
    (
        "std_msgs",
        "ColorRGBA",
        "float32 r\nfloat32 g\nfloat32 b\nfloat32 a\n",
    ),
    (
        "std_msgs",
        "MultiArrayDimension",
        "string label\nuint32 size\nuint32 stride\n",
    ),
    (
        "std_msgs",
        "MultiArrayLayout",
        "MultiArrayDimension[] dim\nuint32 data_offset\n",
    ),
    (
        "std_msgs",
        "Float64MultiArray",
        "MultiArrayLayout layout\nfloat64[] data\n",
    ),
    (
        "std_msgs",
        "Int32MultiArray",
        "MultiArrayLayout layout\nint32[] data\n",
    ),
    // geometry_msgs
    ("geometry_msgs", "Point", "float64 x\nfloat64 y\nfloat64 z\n"),
    ("geometry_msgs", "Point32", "float32 x\nfloat32 y\nfloat32 z\n"),
    ("geometry_msgs", "Vector3", "float64 x\nfloat64 y\nfloat64 z\n"),
    (
        "geometry_msgs",
        "Quaternion",
        "float64 x 0\nfloat64 y 0\nfloat64 z 0\nfloat64 w 1\n",
    ),
    ("geometry_msgs", "Pose", "Point position\nQuaternion orientation\n"),
    (
        "geometry_msgs",
        "PoseStamped",
        "std_msgs/Header header\nPose pose\n",
    ),
    ("geometry_msgs", "Pose2D", "float64 x\nfloat64 y\nfloat64 theta\n"),
    (
        "geometry_msgs",
        "PoseWithCovariance",
        "Pose pose\nfloat64[36] covariance\n",
    ),
    ("geometry_msgs", "Twist", "Vector3 linear\nVector3 angular\n"),
    (
        "geometry_msgs",
        "TwistStamped",
        "std_msgs/Header header\nTwist twist\n",
    ),
    ("geometry_msgs", "Accel", "Vector3 linear\nVector3 angular\n"),
    ("geometry_msgs", "Wrench", "Vector3 force\nVector3 torque\n"),
    (
        "geometry_msgs",
        "Transform",
        "Vector3 translation\nQuaternion rotation\n",
    ),
    (
        "geometry_msgs",
        "TransformStamped",
        "std_msgs/Header header\nstring child_frame_id\nTransform transform\n",
    ),
];

/// Embedded `.msg` text for `package/name`.
pub(crate) fn lookup(package: &str, name: &str) -> Option<&'static str> {
    DEFINITIONS
        .iter()
        .find(|(p, n, _)| *p == package && *n == name)
        .map(|(_, _, text)| *text)
}
