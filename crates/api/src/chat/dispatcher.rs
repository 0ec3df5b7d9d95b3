//! Chat message handling: one incoming message, at most one reply.
//!
//! Recognized commands are about the author's own inventory. Every other message,
//! including one that merely starts with the prefix (`...and then`), is scanned for
//! third-person `<Name> gains|loses <items>` narration about any registered user.

use serde::{Deserialize, Serialize};
use tracing::{Span, debug, instrument, warn};
use uuid::Uuid;

use quartermaster_core::UserId;
use quartermaster_infra::{
    ActorDirectory, InventoryMutator, InventoryStore, MorphologyOracle, MutationError, StoreError,
};
use quartermaster_inventory::{MutationOutcome, Quantity};
use quartermaster_language::{Trigger, extract, mentions_trigger, parse_directive};

use super::command::{Command, parse_command};
use super::reply;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author_id: UserId,
    /// Platform user name, used as the default display name on `.initme`.
    pub author_name: String,
    pub content: String,
}

pub struct ChatDispatcher<S, D, O> {
    mutator: InventoryMutator<S, O>,
    directory: D,
    prefix: String,
}

impl<S, D, O> ChatDispatcher<S, D, O> {
    pub fn new(mutator: InventoryMutator<S, O>, directory: D, prefix: impl Into<String>) -> Self {
        Self {
            mutator,
            directory,
            prefix: prefix.into(),
        }
    }

    pub fn store(&self) -> &S {
        self.mutator.store()
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }
}

impl<S, D, O> ChatDispatcher<S, D, O>
where
    S: InventoryStore,
    D: ActorDirectory,
    O: MorphologyOracle,
{
    /// Handle one message. `None` means the bot stays silent.
    #[instrument(
        skip(self, message),
        fields(
            message_id = %Uuid::now_v7(),
            author_id = %message.author_id,
            route = tracing::field::Empty
        )
    )]
    pub async fn handle(&self, message: &ChatMessage) -> Option<String> {
        let content = message.content.as_str();

        if let Some(command) = parse_command(content, &self.prefix) {
            Span::current().record("route", command.name());
            return self.handle_command(message, command).await;
        }
        Span::current().record("route", "narration");
        self.handle_narration(content).await
    }

    async fn handle_command(&self, message: &ChatMessage, command: Command) -> Option<String> {
        let author = &message.author_id;
        match command {
            Command::Help => Some(reply::help(&self.prefix)),
            Command::InitMe { display_name } => {
                let name = display_name
                    .unwrap_or_else(|| message.author_name.trim().to_string());
                let name = if name.is_empty() {
                    author.to_string()
                } else {
                    name
                };
                Some(match self.directory.register(author, &name).await {
                    Ok(profile) => reply::initialized(&profile.display_name),
                    Err(err) => internal_failure(&err),
                })
            }
            Command::Inventory => {
                if let Err(failure) = self.registered(author).await? {
                    return Some(failure);
                }
                Some(match self.store().get_all(author).await {
                    Ok(inventory) => reply::inventory(&inventory),
                    Err(err) => internal_failure(&err),
                })
            }
            Command::Add(args) => self.handle_directive(author, Trigger::Gains, &args).await,
            Command::Remove(args) => self.handle_directive(author, Trigger::Loses, &args).await,
        }
    }

    async fn handle_directive(
        &self,
        author: &UserId,
        trigger: Trigger,
        args: &str,
    ) -> Option<String> {
        if let Err(failure) = self.registered(author).await? {
            return Some(failure);
        }

        let command = match trigger {
            Trigger::Gains => "add",
            Trigger::Loses => "remove",
        };
        let parsed = parse_directive(args);
        let item = parsed.item_name.trim();
        let delta = match Quantity::new(parsed.quantity) {
            Ok(delta) if !item.is_empty() => delta,
            _ => return Some(reply::usage(&self.prefix, command)),
        };

        Some(match (trigger, self.apply(trigger, author, item, delta).await) {
            (Trigger::Gains, Ok(outcome)) => reply::added(delta.get(), item, &outcome),
            (Trigger::Loses, Ok(outcome)) => reply::removed(delta.get(), item, &outcome),
            (_, Err(err)) => reply::command_failure(&err, &self.prefix, command),
        })
    }

    async fn handle_narration(&self, content: &str) -> Option<String> {
        if !mentions_trigger(content) {
            return None;
        }

        let actors = match self.directory.list_all().await {
            Ok(actors) => actors,
            Err(err) => return Some(internal_failure(&err)),
        };
        let extraction = extract(content, &actors)?;
        let verb = match extraction.trigger {
            Trigger::Gains => "gains",
            Trigger::Loses => "loses",
        };
        if extraction.items.is_empty() {
            return Some(reply::nothing_to_record(&extraction.display_name, verb));
        }

        let mut lines = Vec::with_capacity(extraction.items.len());
        for item in &extraction.items {
            let Ok(delta) = Quantity::new(item.quantity) else {
                continue;
            };
            let result = self
                .apply(extraction.trigger, &extraction.actor, &item.item_name, delta)
                .await;

            match result {
                Ok(outcome) => lines.push(reply::actor_outcome(&extraction.display_name, &outcome)),
                Err(err) if err.is_internal() => {
                    warn!(
                        error = %err,
                        item = %item.item_name,
                        "stopping narration after internal failure"
                    );
                    lines.push(reply::actor_failure(&extraction.display_name, &err));
                    break;
                }
                Err(err) => lines.push(reply::actor_failure(&extraction.display_name, &err)),
            }
        }

        Some(lines.join("\n"))
    }

    async fn apply(
        &self,
        trigger: Trigger,
        user: &UserId,
        item: &str,
        delta: Quantity,
    ) -> Result<MutationOutcome, MutationError> {
        match trigger {
            Trigger::Gains => self.mutator.apply_addition(user, item, delta).await,
            Trigger::Loses => self.mutator.apply_removal(user, item, delta).await,
        }
    }

    /// `None`: not registered, stay silent. `Some(Err(text))`: the lookup itself failed.
    async fn registered(&self, author: &UserId) -> Option<Result<(), String>> {
        match self.directory.profile(author).await {
            Ok(Some(_)) => Some(Ok(())),
            Ok(None) => {
                debug!(author_id = %author, "ignoring command from unregistered user");
                None
            }
            Err(err) => Some(Err(internal_failure(&err))),
        }
    }
}

fn internal_failure(err: &StoreError) -> String {
    warn!(error = %err, "store failure while handling chat message");
    reply::INTERNAL_FAILURE.to_string()
}
