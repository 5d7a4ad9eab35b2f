//! Local console adapter: reads commands line by line from stdin and prints
//! replies to stdout.
//!
//! Wiring only; all command logic lives in `dibs-core`. A chat adapter
//! would replace this crate and implement the same two ports.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use dibs_core::{
    brain::{FileBrain, MemoryBrain},
    config::Config,
    domain::{RoomId, UserName},
    handlers::{CommandContext, Dispatcher},
    ports::{Brain, Responder},
};

/// Prints replies straight to stdout.
pub struct ConsoleResponder;

#[async_trait]
impl Responder for ConsoleResponder {
    async fn emit(&self, text: &str) -> dibs_core::Result<()> {
        println!("{text}");
        Ok(())
    }
}

/// Run the read-eval loop until stdin closes.
///
/// Lines are processed strictly one at a time, so every command finishes
/// its read-modify-write cycle before the next one is looked at.
pub async fn run(cfg: Arc<Config>) -> anyhow::Result<()> {
    let brain: Arc<dyn Brain> = match &cfg.brain_file {
        Some(path) => Arc::new(FileBrain::open(path.clone())?),
        None => Arc::new(MemoryBrain::default()),
    };
    let responder: Arc<dyn Responder> = Arc::new(ConsoleResponder);

    let dispatcher = Dispatcher::new(cfg.clone(), brain, responder);
    dispatcher.seed().await?;

    println!("dibs started as {} in {}", cfg.shell_user, cfg.shell_room);
    println!(
        "Managing {} applications and {} UATs. Try `deploy help` or `uat help`.",
        cfg.applications.len(),
        cfg.uat_names.len()
    );

    let ctx = CommandContext {
        user: UserName(cfg.shell_user.clone()),
        room: RoomId(cfg.shell_room.clone()),
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        if !dispatcher.handle_line(&ctx, text).await? {
            tracing::debug!("not a command, ignoring: {text}");
        }
    }

    Ok(())
}
