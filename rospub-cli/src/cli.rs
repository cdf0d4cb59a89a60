//! Command line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// ROS2 command line tools over Zenoh
#[derive(Debug, Parser)]
#[command(name = "ros2", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every verb.
#[derive(Debug, Args)]
pub struct GlobalOptions {
    /// ROS domain ID
    #[arg(long, global = true, env = "ROS_DOMAIN_ID", default_value_t = 0)]
    pub domain_id: u32,

    /// Extra directory holding `<package>/msg/<Name>.msg` definitions
    #[arg(
        long = "msg-path",
        value_name = "DIR",
        global = true,
        env = "ROSPUB_MSG_PATH",
        value_delimiter = ':'
    )]
    pub msg_paths: Vec<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Various topic related sub-commands
    Topic {
        #[command(subcommand)]
        command: TopicCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum TopicCommand {
    /// Publish a message to a topic
    Pub(PubArgs),
}

#[derive(Debug, Args)]
pub struct PubArgs {
    /// Name of the ROS topic to publish to (e.g. '/chatter')
    pub topic_name: String,

    /// Type of the ROS message (e.g. 'std_msgs/String')
    pub message_type: String,

    /// Values to fill the message with in YAML format (e.g. "data: Hello World"),
    /// otherwise the message will be published with default values
    #[arg(default_value = "{}")]
    pub values: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pub_args(cli: Cli) -> PubArgs {
        let Command::Topic {
            command: TopicCommand::Pub(args),
        } = cli.command;
        args
    }

    #[test]
    fn test_pub_defaults() {
        let cli = Cli::try_parse_from(["ros2", "topic", "pub", "/chatter", "std_msgs/String"])
            .unwrap();
        let args = pub_args(cli);
        assert_eq!(args.topic_name, "/chatter");
        assert_eq!(args.message_type, "std_msgs/String");
        assert_eq!(args.values, "{}");
    }

    #[test]
    fn test_pub_with_values_and_options() {
        let cli = Cli::try_parse_from([
            "ros2",
            "topic",
            "pub",
            "--domain-id",
            "7",
            "--msg-path",
            "/opt/a",
            "cmd_vel",
            "geometry_msgs/Twist",
            "{linear: {x: 0.5}}",
            "--msg-path",
            "/opt/b",
        ])
        .unwrap();
        assert_eq!(cli.options.domain_id, 7);
        assert_eq!(
            cli.options.msg_paths,
            [PathBuf::from("/opt/a"), PathBuf::from("/opt/b")]
        );
        let args = pub_args(cli);
        assert_eq!(args.topic_name, "cmd_vel");
        assert_eq!(args.values, "{linear: {x: 0.5}}");
    }

    #[test]
    fn test_missing_arguments() {
        assert!(Cli::try_parse_from(["ros2", "topic", "pub", "/chatter"]).is_err());
        assert!(Cli::try_parse_from(["ros2", "topic"]).is_err());
        assert!(
            Cli::try_parse_from(["ros2", "topic", "pub", "--domain-id", "x", "a", "b/C"]).is_err()
        );
    }

    #[test]
    fn test_command_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
