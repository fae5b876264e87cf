//! Simulation core: state store, history synthesis, live activity and the
//! engine task that owns them.

pub mod activity;
pub mod engine;
pub mod history;
pub mod store;

pub use activity::{ActivitySimulator, TickOutcome};
pub use engine::{Engine, EngineCommand, EngineEvent};
pub use history::HistorySynthesizer;
pub use store::{ConversationStore, StoreError};

use chrono::NaiveDateTime;

use crate::config::SimulationConfig;
use crate::content::{seeded_index, ContentLibrary, Picker};
use crate::profile::build_catalogue;

/// Build the fixed conversation set, synthesize every history and derive
/// the initial unread counters and presence.
pub fn bootstrap(
    library: &ContentLibrary,
    config: &SimulationConfig,
    picker: &mut Picker,
    now: NaiveDateTime,
) -> ConversationStore {
    let profile = library.profile();
    let catalogue = build_catalogue(profile);
    let mut store = ConversationStore::new(catalogue.clone(), profile.themes.default_id());
    let synthesizer = HistorySynthesizer::new(library, config.history_cap);

    for conv in &catalogue {
        let history = synthesizer.synthesize(conv, now, picker);
        if let Err(e) = store.load_history(&conv.id, history) {
            tracing::warn!("Skipping history for {}: {}", conv.id, e);
            continue;
        }
        // Stable per-id: about one conversation in six starts unread.
        if !conv.assistant && seeded_index(&conv.id, 100) < 16 {
            let count = 1 + seeded_index(&format!("{}#unread", conv.id), 4) as u32;
            store.set_unread(&conv.id, count).ok();
        }
    }

    for person in profile.people() {
        let online = person.me || person.bot || seeded_index(&person.name, 10) < 7;
        store.set_presence(&person.name, online);
    }

    tracing::info!(
        "Workspace ready: {} conversations, {} unread",
        store.conversations().len(),
        store.total_unread()
    );
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ReactionPolicy;
    use crate::profile::Profile;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 13)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_bootstrap_populates_every_conversation() {
        let library = ContentLibrary::new(Arc::new(Profile::embedded().unwrap()), ReactionPolicy::default());
        let store = bootstrap(&library, &SimulationConfig::default(), &mut Picker::seeded(1), now());
        for conv in store.conversations() {
            assert!(!store.messages(&conv.id).is_empty(), "{}", conv.id);
        }
        assert_eq!(store.theme_id(), "midnight-express");
        assert!(store.is_online("Klaus Müller"));
        assert!(store.is_online("Juspay AI"));
        assert_eq!(store.unread("juspay-ai"), 0);
    }

    #[test]
    fn test_bootstrap_unread_is_stable() {
        let library = ContentLibrary::new(Arc::new(Profile::embedded().unwrap()), ReactionPolicy::default());
        let config = SimulationConfig::default();
        let a = bootstrap(&library, &config, &mut Picker::seeded(1), now());
        let b = bootstrap(&library, &config, &mut Picker::seeded(2), now());
        for conv in a.conversations() {
            assert_eq!(a.unread(&conv.id), b.unread(&conv.id));
        }
    }
}
