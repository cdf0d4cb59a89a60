//! `ros2 topic pub` over Zenoh.
//!
//! Resolves the message type from `.msg` definitions, fills a default
//! message from the YAML values and publishes it every second until Ctrl-C.

mod cli;

use clap::Parser;
use cli::{Cli, Command, GlobalOptions, PubArgs, TopicCommand};
use rospub_msg::{FieldError, MessageTypeName, TypeRegistry, ValueTree, populate};
use rospub_zenoh::{Context, logger::init_logging};
use std::{process::ExitCode, time::Duration};
use thiserror::Error;
use tokio::time::{Interval, MissedTickBehavior};

/// Time between two publications.
const PUBLISH_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Msg(#[from] rospub_msg::Error),

    #[error(transparent)]
    Populate(#[from] FieldError),

    #[error(transparent)]
    Zenoh(#[from] rospub_zenoh::Error),

    #[error("Failed to wait for Ctrl-C: {0}")]
    Signal(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Topic {
            command: TopicCommand::Pub(args),
        } => topic_pub(&cli.options, args).await,
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("{e:?}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn topic_pub(options: &GlobalOptions, args: &PubArgs) -> Result<(), CliError> {
    let type_name = MessageTypeName::parse(&args.message_type)?;
    let mut registry = TypeRegistry::from_env();
    for path in &options.msg_paths {
        registry.add_search_path(path);
    }

    let mut msg = registry.new_message(&type_name)?;
    let values = ValueTree::from_yaml(&args.values)?;
    populate(&mut msg, &values)?;

    let ctx = Context::with_domain_id(options.domain_id)?;
    let node = ctx.create_node(
        &format!("publisher_{}_{}", type_name.package, type_name.name),
        None,
    )?;
    let publisher = node.create_publisher(&args.topic_name, msg.schema().clone(), None)?;

    let mut interval = publish_interval();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!("publisher: beginning loop");
    loop {
        tokio::select! {
            _ = interval.tick() => {
                publisher.publish(&msg)?;
                println!("publishing {msg}\n");
            }
            res = &mut ctrl_c => {
                res?;
                tracing::debug!("Interrupted, shutting down");
                break;
            }
        }
    }
    Ok(())
}

/// Ticks every [`PUBLISH_PERIOD`]; a late publication pushes the next ones
/// back instead of catching up in a burst.
fn publish_interval() -> Interval {
    let mut interval = tokio::time::interval(PUBLISH_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}
