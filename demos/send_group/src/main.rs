//! Send Group Example
//!
//! Loads configuration, checks the gateway, then sends one message to a
//! group, optionally mentioning a member.
//!
//! # Usage
//!
//! ```bash
//! CQHTTP_CLIENT__BASE_URL=http://127.0.0.1:5700 \
//!     cargo run --package send-group -- --group 123456 --at 10001 "hello"
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cqhttp::prelude::*;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(about = "Send a message to a group through a CQHTTP gateway")]
struct Args {
    /// Config file; searched in the default locations when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target group.
    #[arg(short, long)]
    group: i64,

    /// Member to mention before the text.
    #[arg(long)]
    at: Option<i64>,

    /// Text to send.
    message: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    let client = bootstrap(loader).context("failed to set up the CQHTTP client")?;

    let bot = client
        .get_login_info()
        .await
        .context("gateway is not reachable")?;
    info!(user_id = bot.user_id, nickname = %bot.nickname, "Logged in");

    let mut chain = Vec::new();
    if let Some(user_id) = args.at {
        chain.push(Segment::at(user_id));
        chain.push(Segment::text(" "));
    }
    chain.push(Segment::text(args.message));

    match client.send_group_message(args.group, chain, None).await {
        Ok(sent) => info!(message_id = sent.message_id, "Message sent"),
        Err(err) if err.kind() == FailureKind::Rejected => {
            warn!(error = %err, "Gateway refused the message");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
