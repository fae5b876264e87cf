//! Headless subcommands: print catalogue, history, simulated activity,
//! embeds and the company outline to stdout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Duration, Local, NaiveDateTime};

use crate::config::Config;
use crate::content::{ContentLibrary, Picker};
use crate::models::Message;
use crate::profile::{build_catalogue, Profile};
use crate::sim::{bootstrap, ActivitySimulator, ConversationStore, HistorySynthesizer, TickOutcome};
use crate::view::{extract_embeds, plain_text};

/// Configuration plus the content library built from the active profile.
pub struct Workspace {
    pub config: Config,
    pub library: Arc<ContentLibrary>,
}

impl Workspace {
    /// Load config and profile. A `--profile-dir` on the command line wins
    /// over the config file.
    pub fn load(profile_dir: Option<PathBuf>) -> Result<Self> {
        let config = Config::load()?;
        let dir = profile_dir.or_else(|| config.profile_dir.clone());
        if let Some(dir) = &dir {
            if !dir.is_dir() {
                tracing::warn!("Profile dir {} not found, using embedded profile", dir.display());
            }
        }
        let profile = Profile::load(dir.as_deref()).context("Failed to load profile")?;
        tracing::debug!(
            "Profile: {} ({}), {} people",
            profile.company.name,
            profile.industry().as_str(),
            profile.people().len()
        );
        let library = Arc::new(ContentLibrary::new(Arc::new(profile), config.reactions.clone()));
        Ok(Self { config, library })
    }

    fn picker(seed: Option<u64>) -> Picker {
        seed.map_or_else(Picker::from_entropy, Picker::seeded)
    }

    /// Catalogue, histories, unread and presence, ready for the engine.
    pub fn bootstrap(&self, seed: Option<u64>) -> (ConversationStore, Picker) {
        let mut picker = Self::picker(seed);
        let store = bootstrap(&self.library, &self.config.simulation, &mut picker, now());
        (store, picker)
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// List every conversation in sidebar order.
pub fn list_conversations(ws: &Workspace) {
    let catalogue = build_catalogue(ws.library.profile());
    println!("\nConversations:");
    println!("{:-<60}", "");
    for conv in &catalogue {
        let detail = if conv.kind.is_channel() {
            format!("{} members", conv.member_count)
        } else {
            conv.members.join(", ")
        };
        let lock = if conv.private { " (private)" } else { "" };
        println!("{:<8} {:<24} {}{}", conv.kind.as_str(), conv.id, conv.display_name(), lock);
        println!("         {}", detail);
    }
    println!();
}

fn print_message(ws: &Workspace, msg: &Message) {
    let body = plain_text(&msg.body);
    let mut lines = body.lines();
    println!(
        "[{}] {}: {}",
        msg.sent_at.format("%a %d %b %H:%M"),
        msg.sender,
        lines.next().unwrap_or_default()
    );
    for line in lines {
        println!("    {}", line);
    }
    for embed in extract_embeds(ws.library.embeds(), &msg.body) {
        let app = embed.kind.app_info();
        println!("    {} {}: {} ({})", app.icon, app.name, embed.title, embed.owner);
    }
    if !msg.reactions.is_empty() {
        let reactions: Vec<String> = msg
            .reactions
            .iter()
            .map(|(emoji, count)| format!("{emoji} {count}"))
            .collect();
        println!("    {}", reactions.join("  "));
    }
    for action in &msg.actions {
        println!("    [{}] {}", action.id, action.label);
    }
}

/// Synthesize and print one conversation's history.
pub fn show_history(ws: &Workspace, id: &str, limit: usize, seed: Option<u64>) -> Result<()> {
    let catalogue = build_catalogue(ws.library.profile());
    let Some(conv) = catalogue.iter().find(|c| c.id == id) else {
        bail!("Unknown conversation '{}' (see `slack-sim conversations`)", id);
    };
    let mut picker = Workspace::picker(seed);
    let synthesizer = HistorySynthesizer::new(&ws.library, ws.config.simulation.history_cap);
    let history = synthesizer.synthesize(conv, now(), &mut picker);

    if history.is_empty() {
        println!("(no messages)");
        return Ok(());
    }
    let skip = history.len().saturating_sub(limit);
    for msg in &history[skip..] {
        print_message(ws, msg);
    }
    Ok(())
}

/// Run ambient ticks back to back on a simulated clock and print each post.
pub fn simulate(ws: &Workspace, ticks: usize, seed: Option<u64>) -> Result<()> {
    let (mut store, mut picker) = ws.bootstrap(seed);
    let mut activity = ActivitySimulator::new(ws.library.clone(), ws.config.simulation.clone());
    let range = ws.config.simulation.ambient();
    let mut clock = now();

    for _ in 0..ticks {
        let step = picker.between(
            u32::try_from(*range.start()).unwrap_or(u32::MAX),
            u32::try_from(*range.end()).unwrap_or(u32::MAX),
        );
        clock += Duration::seconds(i64::from(step));

        match activity.ambient_tick(&mut store, clock, &mut picker)? {
            TickOutcome::Posted {
                conversation_id,
                message_id,
                mention,
            } => {
                print_post(ws, &store, &conversation_id, &message_id);
                if mention {
                    let at = clock + Duration::milliseconds(ws.config.simulation.mention_reply_ms as i64);
                    let reply = activity.reply_to_mention(&mut store, &conversation_id, at, &mut picker)?;
                    print_post(ws, &store, &conversation_id, &reply);
                }
            }
            TickOutcome::Throttled => {
                println!("-- {:.0}% of conversations unread, catching up --", ws.config.simulation.backpressure_ratio * 100.0);
                for id in store
                    .conversations()
                    .iter()
                    .map(|c| c.id.clone())
                    .collect::<Vec<_>>()
                {
                    store.clear_unread(&id)?;
                }
            }
            TickOutcome::Idle => println!("-- idle --"),
        }
    }
    Ok(())
}

fn print_post(ws: &Workspace, store: &ConversationStore, conversation_id: &str, message_id: &str) {
    let label = store
        .conversation(conversation_id)
        .map(|c| c.display_name())
        .unwrap_or_else(|| conversation_id.to_string());
    if let Some(msg) = store.message(message_id) {
        print!("{:<22} ", label);
        print_message(ws, msg);
    }
}

/// Print the embed cards detected in `text`.
pub fn show_embeds(ws: &Workspace, text: &str) {
    let embeds = ws.library.embeds().extract(text);
    if embeds.is_empty() {
        println!("(no embeds)");
        return;
    }
    for embed in embeds {
        let app = embed.kind.app_info();
        println!("{} {}", app.icon, app.name);
        println!("  Title: {}", embed.title);
        println!("  Owner: {}", embed.owner);
        println!("  URL:   {}", embed.url);
        println!();
    }
}

/// Print the derived company outline.
pub fn show_profile(ws: &Workspace) {
    let profile = ws.library.profile();
    let outline = ws.library.outline();
    let company = &profile.company;

    println!();
    println!("Company:      {}", company.name);
    println!("Industry:     {}", outline.industry.as_str());
    println!("Headquarters: {}", company.headquarters);
    println!("Countries:    {}", company.countries.join(", "));
    println!("You:          {}", ws.library.me());
    println!("Assistant:    {}", ws.library.assistant());
    println!("Colleagues:   {}", ws.library.colleagues().len());

    println!("\nTopics:");
    for topic in &outline.topics {
        println!("  - {}", topic);
    }
    println!("\nRoles:");
    for role in &outline.roles {
        println!("  {}", role.title);
        for duty in role.responsibilities {
            println!("    - {}", duty);
        }
    }
    println!("\nChannel types:");
    for ct in outline.channel_types {
        println!("  {:<12} {}", ct.kind, ct.description);
        println!("  {:<12} e.g. {}", "", ct.examples.join(", "));
    }
    println!();
}

/// Write the default configuration file.
pub fn init_config() -> Result<()> {
    let path = Config::default().save()?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ReactionPolicy;

    fn workspace() -> Workspace {
        Workspace {
            config: Config::default(),
            library: Arc::new(ContentLibrary::new(
                Arc::new(Profile::embedded().unwrap()),
                ReactionPolicy::default(),
            )),
        }
    }

    #[test]
    fn test_history_rejects_unknown_conversation() {
        let ws = workspace();
        let err = show_history(&ws, "no-such-room", 10, Some(1)).unwrap_err();
        assert!(err.to_string().contains("no-such-room"));
        assert!(show_history(&ws, "general", 5, Some(1)).is_ok());
    }

    #[test]
    fn test_simulate_runs_headless() {
        let ws = workspace();
        assert!(simulate(&ws, 25, Some(9)).is_ok());
    }

    #[test]
    fn test_bootstrap_is_seeded() {
        let ws = workspace();
        let (a, _) = ws.bootstrap(Some(4));
        let (b, _) = ws.bootstrap(Some(4));
        assert_eq!(
            a.messages("backend").iter().map(|m| m.body.clone()).collect::<Vec<_>>(),
            b.messages("backend").iter().map(|m| m.body.clone()).collect::<Vec<_>>()
        );
    }
}
