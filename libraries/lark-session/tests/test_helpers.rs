//! In-memory collaborators for session tests

#![allow(dead_code)]

use async_trait::async_trait;
use lark_core::{
    FavoriteStore, LarkError, Lyric, LyricStore, RawTrack, Result, TrackId, TrackScanner,
};
use lark_playback::PlaybackService;
use lark_session::{Collaborators, MusicSession, SessionConfig};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

pub fn raw(id: &str, title: &str, artist: &str) -> RawTrack {
    RawTrack::new(TrackId::new(id), title, artist, format!("/music/{id}.mp3"))
}

/// Scanner returning a fixed listing
#[derive(Default)]
pub struct FakeScanner {
    tracks: Vec<RawTrack>,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeScanner {
    pub fn new(tracks: Vec<RawTrack>) -> Self {
        Self {
            tracks,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrackScanner for FakeScanner {
    async fn scan_and_list(&self) -> Result<Vec<RawTrack>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LarkError::scan("media store unavailable"));
        }
        Ok(self.tracks.clone())
    }
}

/// Favorite set with switchable write failures and slow reads
#[derive(Default)]
pub struct MemoryFavorites {
    ids: Mutex<HashSet<TrackId>>,
    fail_writes: AtomicBool,
    read_delays: Mutex<VecDeque<Duration>>,
}

impl MemoryFavorites {
    pub fn with(ids: &[&str]) -> Self {
        let store = Self::default();
        store
            .ids
            .lock()
            .unwrap()
            .extend(ids.iter().map(|id| TrackId::new(*id)));
        store
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay the next reads of the full set, one duration per read
    pub fn delay_reads(&self, delays: &[Duration]) {
        self.read_delays.lock().unwrap().extend(delays.iter().copied());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.lock().unwrap().contains(&TrackId::new(id))
    }

    /// Change the store behind the session's back
    pub fn insert(&self, id: &str) {
        self.ids.lock().unwrap().insert(TrackId::new(id));
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LarkError::storage("disk full"));
        }
        Ok(())
    }
}

#[async_trait]
impl FavoriteStore for MemoryFavorites {
    async fn add(&self, id: &TrackId) -> Result<()> {
        self.check_write()?;
        self.ids.lock().unwrap().insert(id.clone());
        Ok(())
    }

    async fn remove(&self, id: &TrackId) -> Result<()> {
        self.check_write()?;
        self.ids.lock().unwrap().remove(id);
        Ok(())
    }

    async fn is_favorite(&self, id: &TrackId) -> Result<bool> {
        Ok(self.ids.lock().unwrap().contains(id))
    }

    async fn all_favorite_ids(&self) -> Result<HashSet<TrackId>> {
        let delay = self.read_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay.filter(|d| !d.is_zero()) {
            tokio::time::sleep(delay).await;
        }
        Ok(self.ids.lock().unwrap().clone())
    }
}

/// Lyric map with switchable write failures
#[derive(Default)]
pub struct MemoryLyrics {
    lyrics: Mutex<HashMap<TrackId, Lyric>>,
    fail_writes: AtomicBool,
}

impl MemoryLyrics {
    pub fn with(id: &str, text: &str) -> Self {
        let store = Self::default();
        store
            .lyrics
            .lock()
            .unwrap()
            .insert(TrackId::new(id), Lyric::new(TrackId::new(id), text));
        store
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.lyrics
            .lock()
            .unwrap()
            .get(&TrackId::new(id))
            .map(|lyric| lyric.text.clone())
    }
}

#[async_trait]
impl LyricStore for MemoryLyrics {
    async fn get(&self, music_id: &TrackId) -> Result<Option<Lyric>> {
        Ok(self.lyrics.lock().unwrap().get(music_id).cloned())
    }

    async fn upsert(&self, lyric: &Lyric) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LarkError::storage("read-only database"));
        }
        self.lyrics
            .lock()
            .unwrap()
            .insert(lyric.music_id.clone(), lyric.clone());
        Ok(())
    }
}

/// A running engine plus one attached session
pub struct Harness {
    pub service: PlaybackService,
    pub session: Arc<MusicSession>,
    pub scanner: Arc<FakeScanner>,
    pub favorites: Arc<MemoryFavorites>,
    pub lyrics: Arc<MemoryLyrics>,
}

impl Harness {
    pub fn new(scanner: FakeScanner, favorites: MemoryFavorites, lyrics: MemoryLyrics) -> Self {
        let config = SessionConfig::default();
        let service = PlaybackService::start(config.engine_config());

        let scanner = Arc::new(scanner);
        let favorites = Arc::new(favorites);
        let lyrics = Arc::new(lyrics);
        let collaborators = Collaborators {
            scanner: scanner.clone(),
            favorites: favorites.clone(),
            lyrics: lyrics.clone(),
        };
        let session = Arc::new(MusicSession::new(
            collaborators,
            service.connect(),
            &config,
        ));

        Self {
            service,
            session,
            scanner,
            favorites,
            lyrics,
        }
    }

    pub fn with_tracks(tracks: Vec<RawTrack>) -> Self {
        Self::new(
            FakeScanner::new(tracks),
            MemoryFavorites::default(),
            MemoryLyrics::default(),
        )
    }

    /// Attach another session to the same engine and stores
    pub fn reattach(&self) -> Arc<MusicSession> {
        let collaborators = Collaborators {
            scanner: self.scanner.clone(),
            favorites: self.favorites.clone(),
            lyrics: self.lyrics.clone(),
        };
        Arc::new(MusicSession::new(
            collaborators,
            self.service.connect(),
            &SessionConfig::default(),
        ))
    }

    pub async fn shutdown(self) {
        drop(self.session);
        self.service.shutdown().await;
    }
}

pub fn library() -> Vec<RawTrack> {
    vec![
        raw("1", "가을 아침", "아이유"),
        raw("2", "Love Poem", "아이유"),
        raw("3", "나비", "Artist"),
        raw("4", "Lemon", "Kenshi"),
        raw("5", "#1 Crush", "Garbage"),
        raw("6", "고백", "Lovelyz"),
    ]
}

/// Let the engine task drain its command buffer
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

/// Wait until a watched value satisfies `predicate`
pub async fn wait_for<T>(receiver: &mut watch::Receiver<T>, predicate: impl FnMut(&T) -> bool) {
    tokio::time::timeout(Duration::from_secs(5), receiver.wait_for(predicate))
        .await
        .expect("timed out waiting for state")
        .expect("sender dropped");
}
