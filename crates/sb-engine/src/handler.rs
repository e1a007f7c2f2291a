//! # Query Façade / Event Handler
//!
//! Coordinates the flow between inbound chat events and the core ports.
//! This is the command-handling boundary of the error design: every
//! `SpotError` is translated into a chat reply here, and nothing that
//! happens to one event can take down the process.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use log::{error, warn};
use rand::seq::SliceRandom;
use sb_core::{ChatClient, ChatEvent, MediaStore, Reply, Result, SpotError, SpotRepo};

use crate::commands::{self, Command};
use crate::{ingest, moderation, ranking};

/// The assembled engine: ports injected at startup, one instance shared by
/// every inbound event.
pub struct Engine {
    repo: Arc<dyn SpotRepo>,
    media: Arc<dyn MediaStore>,
    chat: Arc<dyn ChatClient>,
    semester: String,
}

impl Engine {
    pub fn new(
        repo: Arc<dyn SpotRepo>,
        media: Arc<dyn MediaStore>,
        chat: Arc<dyn ChatClient>,
        semester: String,
    ) -> Self {
        Self { repo, media, chat, semester }
    }

    /// Processes one inbound event to completion. An event with attachments
    /// is a spot post; plain text is matched against the command surface;
    /// anything else is ignored. Only the outbound post itself can fail.
    pub async fn handle(&self, event: ChatEvent) -> anyhow::Result<()> {
        let reply = if !event.attachments.is_empty() {
            Some(self.reply_or_error(self.spot_reply(&event).await, &event))
        } else if let Some(cmd) = commands::parse(&event.text) {
            Some(self.reply_or_error(self.command_reply(cmd, &event).await, &event))
        } else {
            None
        };

        if let Some(reply) = reply {
            self.chat.post_message(&reply).await?;
        }
        Ok(())
    }

    async fn command_reply(&self, cmd: Command, event: &ChatEvent) -> Result<Reply> {
        match cmd {
            Command::Leaderboard => self.leaderboard_reply(event).await,
            Command::Stats => self.stats_reply(event).await,
            Command::Flag => self.flag_reply(event).await,
            Command::Unflag => self.unflag_reply(event).await,
            Command::Miss { target } => self.miss_reply(event, target).await,
            Command::Help => {
                Ok(Reply::blocks(&event.channel, "SpotBot command overview.", sb_blocks::help_blocks()))
            }
            Command::Rules => {
                Ok(Reply::blocks(&event.channel, "SpotBot rules.", sb_blocks::rule_blocks()))
            }
            Command::Ping => Ok(Reply {
                channel: event.channel.clone(),
                thread: None,
                text: "pong".to_string(),
                blocks: None,
            }),
        }
    }

    async fn spot_reply(&self, event: &ChatEvent) -> Result<Reply> {
        let out =
            ingest::record_spot(self.repo.as_ref(), self.media.as_ref(), event, &self.semester)
                .await?;
        Ok(Reply::threaded(
            &event.channel,
            &event.message_id,
            format!(
                "{} <@{}>, you now have {} spots!",
                sb_blocks::excited_greeting(),
                event.sender,
                out.total
            ),
        ))
    }

    async fn leaderboard_reply(&self, event: &ChatEvent) -> Result<Reply> {
        let entries = ranking::leaderboard(self.repo.as_ref(), &self.semester, Some(10))
            .await
            .map_err(SpotError::io)?;

        let mut body = String::new();
        for entry in &entries {
            let name = self.display_name(&entry.user_id).await;
            body.push_str(&format!("*#{}: {}* with {} spots\n", entry.rank, name, entry.count));
        }
        if entries.is_empty() {
            body.push_str("No spots recorded yet this semester. Get out there!");
        }

        Ok(Reply::blocks(
            &event.channel,
            "Displaying leaderboard information.",
            sb_blocks::leaderboard_blocks(today(), &body, &self.semester),
        ))
    }

    async fn stats_reply(&self, event: &ChatEvent) -> Result<Reply> {
        let user = &event.sender;
        let count = ranking::count_for(self.repo.as_ref(), user, &self.semester)
            .await
            .map_err(SpotError::io)?;
        let spotting = if count == 0 {
            "You have not spotted anyone yet :( Go get out there!".to_string()
        } else {
            let rank = ranking::rank_for(self.repo.as_ref(), user, &self.semester)
                .await
                .map_err(SpotError::io)?
                .unwrap_or(usize::MAX);
            format!("You have spotted {count} people and are currently ranked #{rank} on the leaderboard!")
        };

        let times = self
            .repo
            .tagged_count(user, &self.semester)
            .await
            .map_err(SpotError::io)?;
        let spotted = if times == 0 {
            ":camera_with_flash: No one has spotted you yet ... so sneaky of you!".to_string()
        } else {
            match ranking::top_spotter_of(self.repo.as_ref(), user, &self.semester)
                .await
                .map_err(SpotError::io)?
            {
                Some((top, top_count)) => format!(
                    ":camera_with_flash: You've been spotted a total of {times} times!\n\n\
                     :heart_eyes: *{}* has spotted you the most with {top_count} spots.",
                    self.display_name(&top).await
                ),
                None => format!(":camera_with_flash: You've been spotted a total of {times} times!"),
            }
        };

        let name = self.display_name(user).await;
        Ok(Reply::blocks(
            &event.channel,
            "Posting personal stat information.",
            sb_blocks::stat_blocks(today(), &name, &spotting, &spotted),
        ))
    }

    async fn flag_reply(&self, event: &ChatEvent) -> Result<Reply> {
        let spot =
            moderation::flag(self.repo.as_ref(), event.thread_root.as_deref(), &event.sender)
                .await?;
        Ok(Reply::threaded(
            &event.channel,
            &spot.id,
            format!(
                "{} <@{}>, this spot has been flagged by <@{}> as they believe it violates the \
                 official spotting rules. Type 'spotbot rules' to review them, or dispute this \
                 flag by replying in this thread.",
                sb_blocks::disappointed_greeting(),
                spot.spotter,
                event.sender
            ),
        ))
    }

    async fn unflag_reply(&self, event: &ChatEvent) -> Result<Reply> {
        let spot =
            moderation::unflag(self.repo.as_ref(), event.thread_root.as_deref(), &event.sender)
                .await?;
        Ok(Reply::threaded(
            &event.channel,
            &spot.id,
            format!(
                "{} <@{}>, this spot has been unflagged by <@{}> and counts again!",
                sb_blocks::excited_greeting(),
                spot.spotter,
                event.sender
            ),
        ))
    }

    async fn miss_reply(&self, event: &ChatEvent, target: Option<String>) -> Result<Reply> {
        let Some(target) = target else {
            return Ok(Reply::threaded(
                &event.channel,
                &event.message_id,
                format!(
                    "{} <@{}>, tag the person you miss, like 'spotbot miss @name'.",
                    sb_blocks::disappointed_greeting(),
                    event.sender
                ),
            ));
        };

        let spots = self
            .repo
            .spots_tagging(&target, &self.semester)
            .await
            .map_err(SpotError::io)?;
        // Uniform over the qualifying set at query time.
        let Some(spot) = spots.choose(&mut rand::thread_rng()) else {
            return Ok(Reply::threaded(
                &event.channel,
                &event.message_id,
                format!(
                    "{} <@{}>, no spots of <@{target}> yet. Go spot them yourself!",
                    sb_blocks::disappointed_greeting(),
                    event.sender
                ),
            ));
        };

        let lead = format!("<@{}>, we know you miss *{}*!", event.sender, self.display_name(&target).await);
        Ok(Reply::blocks(
            &event.channel,
            "Posting a random spot.",
            sb_blocks::miss_blocks(&lead, &spot.image_url),
        ))
    }

    fn reply_or_error(&self, result: Result<Reply>, event: &ChatEvent) -> Reply {
        result.unwrap_or_else(|err| self.render_error(err, event))
    }

    /// Translates an engine error into the reply the user sees. Threaded
    /// under the spot thread when there is one, else under the triggering
    /// message.
    fn render_error(&self, err: SpotError, event: &ChatEvent) -> Reply {
        let sender = &event.sender;
        let greet = sb_blocks::disappointed_greeting();
        let text = match &err {
            SpotError::NoTags => format!(
                "{greet} <@{sender}>, this spot doesn't count because you didn't mention anyone! \
                 Delete and try again."
            ),
            SpotError::UnsupportedMedia(_) => format!(
                "{greet} <@{sender}>, this spot doesn't count because you didn't attach a JPG, \
                 HEIC, or a PNG file! Delete and try again."
            ),
            SpotError::NotFound => format!("{greet} <@{sender}>, this is not a valid spot!"),
            SpotError::NotInThread => format!(
                "{greet} <@{sender}>, to flag or unflag a spot, reply 'spotbot flag' or \
                 'spotbot unflag' in the thread of the spot."
            ),
            SpotError::AlreadyFlagged => {
                format!("{greet} <@{sender}>, this spot has already been flagged!")
            }
            SpotError::NotFlagged => format!("{greet} <@{sender}>, this spot isn't flagged!"),
            SpotError::Integrity(detail) => {
                error!("integrity violation while handling {}: {detail}", event.message_id);
                "Critical error occurred. Please contact the SpotBot team.".to_string()
            }
            SpotError::Io(detail) => {
                error!("event {} failed: {detail}", event.message_id);
                format!("{greet} <@{sender}>, something went wrong on our end. Please try again later.")
            }
        };
        let thread = event.thread_root.as_deref().unwrap_or(&event.message_id);
        Reply::threaded(&event.channel, thread, text)
    }

    /// Display name for rendering; falls back to the raw mention on
    /// resolution failure so a read query still answers.
    async fn display_name(&self, user_id: &str) -> String {
        match self.chat.resolve_display_name(user_id).await {
            Ok(name) => name,
            Err(err) => {
                warn!("could not resolve display name for {user_id}: {err:#}");
                format!("<@{user_id}>")
            }
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
