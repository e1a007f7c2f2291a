//! Shared in-memory port implementations for engine tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use sb_core::{
    Attachment, ChatClient, ChatEvent, InsertOutcome, Lookup, MediaStore, Reply, Spot, SpotRepo,
};

/// A `SpotRepo` over a plain vec. `seed` bypasses the uniqueness check so
/// integrity-violation paths can be exercised.
#[derive(Default)]
pub struct InMemoryRepo {
    spots: Mutex<Vec<Spot>>,
    find_calls: AtomicUsize,
}

impl InMemoryRepo {
    pub fn seed(&self, spot: Spot) {
        self.spots.lock().unwrap().push(spot);
    }

    pub fn len(&self) -> usize {
        self.spots.lock().unwrap().len()
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }
}

fn qualifying<'a>(spots: &'a [Spot], semester: &'a str) -> impl Iterator<Item = &'a Spot> {
    spots.iter().filter(move |s| s.semester == semester && !s.flagged)
}

fn grouped_counts<'a>(spots: impl Iterator<Item = &'a Spot>) -> Vec<(String, i64)> {
    let mut by_spotter: BTreeMap<String, i64> = BTreeMap::new();
    for spot in spots {
        *by_spotter.entry(spot.spotter.clone()).or_default() += 1;
    }
    // BTreeMap iteration gives id ascending; the stable sort keeps that
    // order within equal counts.
    let mut counts: Vec<(String, i64)> = by_spotter.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[async_trait]
impl SpotRepo for InMemoryRepo {
    async fn insert(&self, spot: Spot) -> anyhow::Result<InsertOutcome> {
        let mut spots = self.spots.lock().unwrap();
        if spots.iter().any(|s| s.id == spot.id) {
            return Ok(InsertOutcome::Duplicate);
        }
        spots.push(spot);
        Ok(InsertOutcome::Inserted)
    }

    async fn find(&self, id: &str) -> anyhow::Result<Lookup> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        let spots = self.spots.lock().unwrap();
        let mut matches = spots.iter().filter(|s| s.id == id);
        match (matches.next(), matches.next()) {
            (None, _) => Ok(Lookup::NotFound),
            (Some(spot), None) => Ok(Lookup::Found(spot.clone())),
            (Some(_), Some(_)) => Ok(Lookup::Conflict),
        }
    }

    async fn set_flagged(&self, id: &str, flagged: bool) -> anyhow::Result<bool> {
        let mut spots = self.spots.lock().unwrap();
        match spots.iter_mut().find(|s| s.id == id && s.flagged != flagged) {
            Some(spot) => {
                spot.flagged = flagged;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_for(&self, user_id: &str, semester: &str) -> anyhow::Result<i64> {
        let spots = self.spots.lock().unwrap();
        Ok(qualifying(&spots, semester).filter(|s| s.spotter == user_id).count() as i64)
    }

    async fn spot_counts(&self, semester: &str) -> anyhow::Result<Vec<(String, i64)>> {
        let spots = self.spots.lock().unwrap();
        Ok(grouped_counts(qualifying(&spots, semester)))
    }

    async fn tagged_count(&self, user_id: &str, semester: &str) -> anyhow::Result<i64> {
        let spots = self.spots.lock().unwrap();
        Ok(qualifying(&spots, semester)
            .filter(|s| s.tagged.iter().any(|t| t == user_id))
            .count() as i64)
    }

    async fn spotter_counts_of(
        &self,
        user_id: &str,
        semester: &str,
    ) -> anyhow::Result<Vec<(String, i64)>> {
        let spots = self.spots.lock().unwrap();
        Ok(grouped_counts(
            qualifying(&spots, semester).filter(|s| s.tagged.iter().any(|t| t == user_id)),
        ))
    }

    async fn spots_tagging(&self, user_id: &str, semester: &str) -> anyhow::Result<Vec<Spot>> {
        let spots = self.spots.lock().unwrap();
        Ok(qualifying(&spots, semester)
            .filter(|s| s.tagged.iter().any(|t| t == user_id))
            .cloned()
            .collect())
    }
}

/// A `MediaStore` that counts calls and returns `mock://` URLs.
#[derive(Default)]
pub struct MockMedia {
    fetches: AtomicUsize,
    stores: AtomicUsize,
    fail_store: bool,
}

impl MockMedia {
    /// A store whose writes always fail.
    pub fn failing() -> Self {
        Self { fail_store: true, ..Self::default() }
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn store_calls(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaStore for MockMedia {
    async fn fetch(&self, _locator: &str) -> anyhow::Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0xFF, 0xD8, 0xFF])
    }

    async fn store(&self, key: &str, _data: Vec<u8>) -> anyhow::Result<String> {
        if self.fail_store {
            anyhow::bail!("object store offline");
        }
        self.stores.fetch_add(1, Ordering::SeqCst);
        Ok(format!("mock://{key}"))
    }
}

/// A `ChatClient` that records outbound replies for inspection.
#[derive(Default)]
pub struct RecordingChat {
    sent: Mutex<Vec<Reply>>,
}

impl RecordingChat {
    pub fn sent(&self) -> Vec<Reply> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for RecordingChat {
    async fn post_message(&self, reply: &Reply) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(reply.clone());
        Ok(())
    }

    async fn resolve_display_name(&self, user_id: &str) -> anyhow::Result<String> {
        Ok(format!("name-{user_id}"))
    }
}

pub fn spot(id: &str, spotter: &str, tagged: &[&str], semester: &str) -> Spot {
    Spot {
        id: id.to_string(),
        spotter: spotter.to_string(),
        tagged: tagged.iter().map(|t| t.to_string()).collect(),
        image_url: format!("mock://{semester}/{spotter}_{id}.jpg"),
        flagged: false,
        semester: semester.to_string(),
    }
}

pub fn file_event(sender: &str, message_id: &str, text: &str, filetype: &str) -> ChatEvent {
    ChatEvent {
        sender: sender.to_string(),
        message_id: message_id.to_string(),
        channel: "C1".to_string(),
        thread_root: None,
        text: text.to_string(),
        attachments: vec![Attachment {
            filetype: filetype.to_string(),
            url: format!("https://files.example/{message_id}"),
        }],
    }
}

pub fn text_event(sender: &str, text: &str) -> ChatEvent {
    ChatEvent {
        sender: sender.to_string(),
        message_id: "1700000001.0001".to_string(),
        channel: "C1".to_string(),
        thread_root: None,
        text: text.to_string(),
        attachments: Vec::new(),
    }
}
