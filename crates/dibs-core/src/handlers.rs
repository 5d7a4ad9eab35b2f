//! Command handlers.
//!
//! Each command runs one read-modify-write cycle against the brain key that
//! owns its state, then answers through the responder port. Validation
//! failures (unknown names, someone else's deploy) are informational
//! replies and never mutate anything; `Err` is reserved for host faults.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    command::{self, Command, DefaultScope, DeployCommand, StatusQuery, UatCommand},
    config::Config,
    deploy::{ClearOutcome, DeployQueues, NextOutcome, ScheduleOutcome, StartOutcome, UnscheduleOutcome},
    domain::{RoomId, UserName},
    help,
    ports::{Brain, Responder},
    rooms::RoomSettings,
    uat::{GrabOutcome, ReleaseOutcome, StealOutcome, UatOwners},
    Result,
};

pub const DEPLOY_QUEUE_KEY: &str = "deployQueue";
pub const UAT_OWNERS_KEY: &str = "uatOwners";
pub const ROOM_SETTINGS_KEY: &str = "roomSettings";

/// Who sent the command and where, as reported by the host runtime.
#[derive(Clone, Debug)]
pub struct CommandContext {
    pub user: UserName,
    pub room: RoomId,
}

/// The application service: parses nothing itself beyond delegating to
/// [`command::parse`], and holds the ports everything runs against.
pub struct Dispatcher {
    cfg: Arc<Config>,
    brain: Arc<dyn Brain>,
    responder: Arc<dyn Responder>,
}

impl Dispatcher {
    pub fn new(cfg: Arc<Config>, brain: Arc<dyn Brain>, responder: Arc<dyn Responder>) -> Self {
        Self {
            cfg,
            brain,
            responder,
        }
    }

    /// Materialize brain records for the configured name sets.
    ///
    /// Runs once at startup instead of lazily on every read. Newly
    /// configured names are folded in; existing entries, including ones no
    /// longer configured, are left alone.
    pub async fn seed(&self) -> Result<()> {
        let mut queues: DeployQueues = self.load(DEPLOY_QUEUE_KEY).await?;
        let added_apps = queues.seed(&self.cfg.applications);
        if added_apps > 0 {
            self.store(DEPLOY_QUEUE_KEY, &queues).await?;
        }

        let mut owners: UatOwners = self.load(UAT_OWNERS_KEY).await?;
        let added_uats = owners.seed(&self.cfg.uat_names);
        if added_uats > 0 {
            self.store(UAT_OWNERS_KEY, &owners).await?;
        }

        tracing::info!(added_apps, added_uats, "brain records seeded");
        Ok(())
    }

    /// Parse and dispatch one line of chat. Returns whether the line
    /// matched a command; unmatched lines are left for other handlers.
    pub async fn handle_line(&self, ctx: &CommandContext, text: &str) -> Result<bool> {
        let Some(cmd) = command::parse(text) else {
            return Ok(false);
        };
        self.handle(ctx, cmd).await?;
        Ok(true)
    }

    pub async fn handle(&self, ctx: &CommandContext, cmd: Command) -> Result<()> {
        match cmd {
            Command::Deploy(cmd) => self.handle_deploy(ctx, cmd).await,
            Command::Uat(cmd) => self.handle_uat(ctx, cmd).await,
        }
    }

    async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        match self.brain.get(key).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(T::default()),
        }
    }

    async fn store<T: Serialize>(&self, key: &str, record: &T) -> Result<()> {
        self.brain.set(key, serde_json::to_value(record)?).await
    }

    async fn handle_deploy(&self, ctx: &CommandContext, cmd: DeployCommand) -> Result<()> {
        let user = ctx.user.as_str();

        let reply = match cmd {
            DeployCommand::Help => help::DEPLOY_HELP.to_string(),

            DeployCommand::Schedule { app } => {
                let app = self.cfg.name_case.fold(&app);
                let mut queues: DeployQueues = self.load(DEPLOY_QUEUE_KEY).await?;
                match queues.schedule(&app, user) {
                    ScheduleOutcome::UnknownApp => not_registered(&app),
                    ScheduleOutcome::NextUp => {
                        self.store(DEPLOY_QUEUE_KEY, &queues).await?;
                        format!(
                            "You are next to deploy {app}. Check for ongoing deploys before starting yours."
                        )
                    }
                    ScheduleOutcome::Scheduled => {
                        self.store(DEPLOY_QUEUE_KEY, &queues).await?;
                        format!("Deploy scheduled for {app}. Check status of queue.")
                    }
                }
            }

            DeployCommand::Unschedule { app } => {
                let app = self.cfg.name_case.fold(&app);
                let mut queues: DeployQueues = self.load(DEPLOY_QUEUE_KEY).await?;
                match queues.unschedule(&app, user) {
                    UnscheduleOutcome::UnknownApp => not_registered(&app),
                    UnscheduleOutcome::NothingScheduled => {
                        format!("You have no scheduled deploys for {app}")
                    }
                    UnscheduleOutcome::Removed => {
                        self.store(DEPLOY_QUEUE_KEY, &queues).await?;
                        format!("Your scheduled deploy was cancelled for {app}")
                    }
                }
            }

            DeployCommand::Start { app } => {
                let app = self.cfg.name_case.fold(&app);
                let mut queues: DeployQueues = self.load(DEPLOY_QUEUE_KEY).await?;
                match queues.start(&app, user) {
                    StartOutcome::UnknownApp => not_registered(&app),
                    StartOutcome::Ongoing(holder) => format!(
                        "You cannot start a deploy when there is an ongoing deploy for {app} by {holder}"
                    ),
                    StartOutcome::NotYourTurn(head) => format!(
                        "You are not the first in the queue to deploy {app}. Next to deploy is {head}"
                    ),
                    StartOutcome::NothingScheduled => {
                        format!("There are no scheduled deploys for {app}. Schedule yours first.")
                    }
                    StartOutcome::Started => {
                        self.store(DEPLOY_QUEUE_KEY, &queues).await?;
                        format!("You are now the active deploy user for {app}")
                    }
                }
            }

            DeployCommand::Complete { app } => {
                let app = self.cfg.name_case.fold(&app);
                let mut queues: DeployQueues = self.load(DEPLOY_QUEUE_KEY).await?;
                match queues.clear_active(&app, user) {
                    ClearOutcome::UnknownApp => not_registered(&app),
                    ClearOutcome::NoOngoing => format!("There is no ongoing deploy for {app}"),
                    ClearOutcome::OwnedBy(holder) => format!(
                        "You cannot complete a deploy started by other user ({holder}) for {app}"
                    ),
                    ClearOutcome::Cleared { next } => {
                        self.store(DEPLOY_QUEUE_KEY, &queues).await?;
                        format!("Your deploy is now complete for {app}. {}", next_info(next))
                    }
                }
            }

            DeployCommand::Cancel { app } => {
                let app = self.cfg.name_case.fold(&app);
                let mut queues: DeployQueues = self.load(DEPLOY_QUEUE_KEY).await?;
                match queues.clear_active(&app, user) {
                    ClearOutcome::UnknownApp => not_registered(&app),
                    ClearOutcome::NoOngoing => format!("There is no ongoing deploy for {app}"),
                    ClearOutcome::OwnedBy(holder) => format!(
                        "You cannot cancel a deploy started by other user ({holder}) for {app}"
                    ),
                    ClearOutcome::Cleared { next } => {
                        self.store(DEPLOY_QUEUE_KEY, &queues).await?;
                        format!("Your deploy is now cancelled for {app}. {}", next_info(next))
                    }
                }
            }

            DeployCommand::Next { app } => {
                let app = self.cfg.name_case.fold(&app);
                let queues: DeployQueues = self.load(DEPLOY_QUEUE_KEY).await?;
                match queues.next_user(&app) {
                    NextOutcome::UnknownApp => not_registered(&app),
                    NextOutcome::NothingScheduled => {
                        "There are no scheduled users to deploy".to_string()
                    }
                    NextOutcome::Next(head) => format!("Next user to deploy {app}: {head}"),
                }
            }

            DeployCommand::Status { app } => {
                let app = self.cfg.name_case.fold(&app);
                let queues: DeployQueues = self.load(DEPLOY_QUEUE_KEY).await?;
                match queues.status(&app) {
                    None => not_registered(&app),
                    Some(status) => {
                        let queue_info = if status.waiting.is_empty() {
                            format!("There are no scheduled users to deploy {app}")
                        } else {
                            format!(
                                "Scheduled users to deploy for {app}:\n{}",
                                status.waiting.join("\n")
                            )
                        };
                        let ongoing_info = match status.active {
                            None => format!("There is no ongoing deploy for {app}"),
                            Some(holder) => format!("Ongoing deploy started by {holder} for {app}"),
                        };
                        format!("{queue_info}\n{ongoing_info}")
                    }
                }
            }
        };

        self.responder.emit(&reply).await
    }

    async fn handle_uat(&self, ctx: &CommandContext, cmd: UatCommand) -> Result<()> {
        let user = ctx.user.as_str();

        let reply = match cmd {
            UatCommand::Help => help::UAT_HELP.to_string(),

            UatCommand::Grab { name } => {
                let name = self.cfg.name_case.fold(&name);
                let mut owners: UatOwners = self.load(UAT_OWNERS_KEY).await?;
                match owners.grab(&name, user) {
                    GrabOutcome::UnknownUat => unknown_uat(&name),
                    GrabOutcome::AlreadyYours => format!("You already have {name}, {user}"),
                    GrabOutcome::HeldBy(holder) => format!("{holder} already has {name}"),
                    GrabOutcome::Grabbed => {
                        self.store(UAT_OWNERS_KEY, &owners).await?;
                        format!("{user} has grabbed {name}")
                    }
                }
            }

            UatCommand::Release { name } => {
                let name = self.cfg.name_case.fold(&name);
                let mut owners: UatOwners = self.load(UAT_OWNERS_KEY).await?;
                match owners.release(&name, user) {
                    ReleaseOutcome::UnknownUat => unknown_uat(&name),
                    ReleaseOutcome::NotInUse => format!("{name} is not currently in use"),
                    ReleaseOutcome::HeldBy(holder) => format!("{holder} currently has {name}"),
                    ReleaseOutcome::Released => {
                        self.store(UAT_OWNERS_KEY, &owners).await?;
                        format!("{user} has released {name}")
                    }
                }
            }

            UatCommand::Steal { name } => {
                let name = self.cfg.name_case.fold(&name);
                let mut owners: UatOwners = self.load(UAT_OWNERS_KEY).await?;
                match owners.steal(&name, user) {
                    StealOutcome::UnknownUat => unknown_uat(&name),
                    StealOutcome::Stolen => {
                        self.store(UAT_OWNERS_KEY, &owners).await?;
                        format!("{user} has stolen {name}")
                    }
                }
            }

            UatCommand::Status { query } => {
                let owners: UatOwners = self.load(UAT_OWNERS_KEY).await?;
                let queries = match query {
                    StatusQuery::All => self.cfg.uat_names.clone(),
                    StatusQuery::Names(raw) => raw
                        .iter()
                        .map(|name| self.cfg.name_case.fold(name))
                        .collect(),
                    StatusQuery::RoomDefault => {
                        let rooms: RoomSettings = self.load(ROOM_SETTINGS_KEY).await?;
                        match rooms.defaults_for(ctx.room.as_str()) {
                            Some(names) => names.to_vec(),
                            None => self.cfg.uat_names.clone(),
                        }
                    }
                };

                let lines = owners.status_lines(queries.iter().map(String::as_str));
                if lines.is_empty() {
                    "I don't know anything about those UATs".to_string()
                } else {
                    lines.join("\n")
                }
            }

            UatCommand::Default { scope } => {
                let names = match scope {
                    DefaultScope::All => self.cfg.uat_names.clone(),
                    DefaultScope::Names(raw) => raw
                        .iter()
                        .map(|name| self.cfg.name_case.fold(name))
                        .collect(),
                };

                let mut rooms: RoomSettings = self.load(ROOM_SETTINGS_KEY).await?;
                rooms.set_defaults(ctx.room.as_str(), names.clone());
                self.store(ROOM_SETTINGS_KEY, &rooms).await?;

                format!(
                    "Default UATs for {} are now: {}",
                    ctx.room,
                    names.join(" ")
                )
            }
        };

        self.responder.emit(&reply).await
    }
}

fn not_registered(app: &str) -> String {
    format!("Application {app} is not registered for deploy management")
}

fn unknown_uat(name: &str) -> String {
    format!("I don't know anything about {name}")
}

fn next_info(next: Option<String>) -> String {
    match next {
        Some(user) => format!("Next user to deploy: {user}"),
        None => "There are no pending deploys".to_string(),
    }
}
