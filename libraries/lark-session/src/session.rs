//! Music session
//!
//! One control surface over the track library and a running engine. The
//! session owns the scanned tracks, the favorite overlay and the search query,
//! republishes a [`LibrarySnapshot`] after every change, and forwards user
//! intents to the engine. Engine events flow back in through
//! [`MusicSession::handle_engine_event`].
//!
//! Sessions are disposable: dropping one stops its event listener and local
//! sleep-timer countdown, while the engine keeps its queue, flags and pause
//! trigger for the next session to attach to.

use crate::config::SessionConfig;
use lark_core::{
    FavoriteStore, LarkError, Lyric, LyricStore, PlaybackMode, RawTrack, Result, Track, TrackId,
    TrackScanner,
};
use lark_library::{overlay_favorites, FastScrollRail, LibraryIndexBuilder, LibraryView};
use lark_playback::{
    EngineEvent, EngineHandle, PlaybackModeController, QueueTrack, SleepTimerController,
    TimerSnapshot,
};
use lark_storage::LocalStore;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

/// External collaborators a session reads from and writes to
#[derive(Clone)]
pub struct Collaborators {
    pub scanner: Arc<dyn TrackScanner>,
    pub favorites: Arc<dyn FavoriteStore>,
    pub lyrics: Arc<dyn LyricStore>,
}

/// Published library state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibrarySnapshot {
    /// Query the rows were filtered with
    pub query: String,

    /// Visible rows and their fast-scroll index
    pub view: LibraryView,
}

/// What the engine is doing, as seen by this session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NowPlaying {
    pub is_playing: bool,

    /// Current track id reported by the engine
    pub track_id: Option<TrackId>,

    /// Library entry for `track_id`, with its favorite flag
    pub track: Option<Track>,
}

#[derive(Debug, Default)]
struct LibraryState {
    raw: Vec<RawTrack>,
    favorite_ids: HashSet<TrackId>,
    query: String,
    /// Bumped per search; only the latest search may publish
    search_generation: u64,
    builder: LibraryIndexBuilder,
}

impl LibraryState {
    fn lookup(&self, id: &TrackId) -> Option<Track> {
        self.raw
            .iter()
            .find(|raw| &raw.id == id)
            .map(|raw| Track::from_raw(raw.clone(), self.favorite_ids.contains(id)))
    }
}

/// Control surface over the library and the engine
pub struct MusicSession {
    scanner: Arc<dyn TrackScanner>,
    favorites: Arc<dyn FavoriteStore>,
    lyrics: Arc<dyn LyricStore>,
    engine: EngineHandle,

    state: Mutex<LibraryState>,
    library: watch::Sender<LibrarySnapshot>,
    loading: watch::Sender<bool>,
    load_started: AtomicBool,
    lyric: watch::Sender<Option<Lyric>>,
    now_playing: watch::Sender<NowPlaying>,

    mode: PlaybackModeController,
    timer: Mutex<SleepTimerController>,
    timer_presets: Vec<u32>,
    rail: Mutex<FastScrollRail>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl MusicSession {
    /// Attach a session to a running engine
    ///
    /// Adopts the engine's playback mode, resumes a sleep-timer countdown if
    /// the engine has a pause trigger armed, and seeds the now-playing state
    /// from the engine snapshot. Must be called inside a tokio runtime.
    pub fn new(collaborators: Collaborators, engine: EngineHandle, config: &SessionConfig) -> Self {
        let status = engine.status();
        let (now_playing, _) = watch::channel(NowPlaying {
            is_playing: status.is_playing,
            track_id: status.current_track,
            track: None,
        });

        let mode = PlaybackModeController::attach(engine.clone());
        let timer = SleepTimerController::attach(engine.clone(), config.timer_labels());

        tracing::info!(mode = %mode.current(), "Music session attached");

        Self {
            scanner: collaborators.scanner,
            favorites: collaborators.favorites,
            lyrics: collaborators.lyrics,
            engine,
            state: Mutex::new(LibraryState::default()),
            library: watch::channel(LibrarySnapshot::default()).0,
            loading: watch::channel(false).0,
            load_started: AtomicBool::new(false),
            lyric: watch::channel(None).0,
            now_playing,
            mode,
            timer: Mutex::new(timer),
            timer_presets: config.timer.presets_minutes.clone(),
            rail: Mutex::new(FastScrollRail::new(Arc::default(), config.rail.item_height)),
            listener: Mutex::new(None),
        }
    }

    /// Attach a session backed by the filesystem scanner and `SQLite` stores
    pub async fn open(config: &SessionConfig, engine: EngineHandle) -> Result<Self> {
        config.validate()?;

        let pool = lark_storage::create_pool(&config.storage.database_url).await?;
        lark_storage::run_migrations(&pool).await?;
        let store = Arc::new(LocalStore::new(pool));

        let collaborators = Collaborators {
            scanner: Arc::new(config.scanner()),
            favorites: store.clone(),
            lyrics: store,
        };
        Ok(Self::new(collaborators, engine, config))
    }

    // Library

    /// Scan the device and publish the library
    ///
    /// Runs at most once per session; later calls return `false` without
    /// touching the scanner. A failed scan is logged and publishes an empty
    /// library.
    pub async fn load_music(&self) -> bool {
        if self.load_started.swap(true, Ordering::SeqCst) {
            tracing::debug!("Library already loaded for this session");
            return false;
        }

        self.loading.send_replace(true);

        let raw = match self.scanner.scan_and_list().await {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::warn!("Track scan failed, showing an empty library: {}", e);
                Vec::new()
            }
        };
        tracing::info!("Loaded {} tracks", raw.len());

        let favorite_ids = self.read_favorites().await;
        {
            let mut state = lock(&self.state);
            state.raw = raw;
            if let Some(ids) = favorite_ids {
                state.favorite_ids = ids;
            }
            state.builder.invalidate();
        }

        self.rebuild();
        self.loading.send_replace(false);
        true
    }

    /// Filter the visible rows
    ///
    /// Favorites are re-read from the store for the rebuild. If that read
    /// fails the last-known favorites are used. When searches overlap, the
    /// last one submitted wins regardless of which read finishes first.
    pub async fn set_search_query(&self, query: impl Into<String>) {
        let generation = {
            let mut state = lock(&self.state);
            state.query = query.into();
            state.search_generation += 1;
            state.search_generation
        };

        let favorite_ids = self.read_favorites().await;
        {
            let mut state = lock(&self.state);
            if state.search_generation != generation {
                tracing::debug!("Search superseded before favorites were read");
                return;
            }
            if let Some(ids) = favorite_ids {
                state.favorite_ids = ids;
            }
        }
        self.rebuild();
    }

    /// Latest library snapshot
    pub fn snapshot(&self) -> LibrarySnapshot {
        self.library.borrow().clone()
    }

    pub fn subscribe_library(&self) -> watch::Receiver<LibrarySnapshot> {
        self.library.subscribe()
    }

    /// Whether a scan is in progress
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Every favorite track in listing order, ignoring the search query
    pub fn favorite_tracks(&self) -> Vec<Track> {
        let state = lock(&self.state);
        overlay_favorites(&state.raw, &state.favorite_ids)
            .into_iter()
            .filter(|track| track.is_favorite)
            .collect()
    }

    /// Flip a track's favorite flag
    ///
    /// The store is written first and the in-memory flag flips whatever the
    /// outcome. A failed write is returned so the caller can retry; the
    /// library shows the new flag until the next rebuild re-reads the store.
    /// Returns the new flag.
    pub async fn toggle_favorite(&self, id: &TrackId) -> Result<bool> {
        let was_favorite = {
            let state = lock(&self.state);
            if !state.raw.iter().any(|raw| &raw.id == id) {
                return Err(LarkError::not_found("Track", id.as_str()));
            }
            state.favorite_ids.contains(id)
        };

        let written = if was_favorite {
            self.favorites.remove(id).await
        } else {
            self.favorites.add(id).await
        };

        {
            let mut state = lock(&self.state);
            if was_favorite {
                state.favorite_ids.remove(id);
            } else {
                state.favorite_ids.insert(id.clone());
            }
        }
        self.rebuild();

        match written {
            Ok(()) => {
                tracing::debug!(track_id = %id, favorite = !was_favorite, "Favorite toggled");
                Ok(!was_favorite)
            }
            Err(e) => {
                tracing::warn!(track_id = %id, "Favorite change not saved: {}", e);
                Err(e)
            }
        }
    }

    /// Fast-scroll rail over the visible rows
    ///
    /// Its index follows every rebuild; a rebuild that changes the index
    /// clears the drag highlight.
    pub fn rail(&self) -> MutexGuard<'_, FastScrollRail> {
        lock(&self.rail)
    }

    // Lyrics

    /// Load a track's lyrics and make them the current lyric
    pub async fn load_lyrics(&self, id: &TrackId) -> Result<Option<Lyric>> {
        match self.lyrics.get(id).await {
            Ok(lyric) => {
                self.lyric.send_replace(lyric.clone());
                Ok(lyric)
            }
            Err(e) => {
                self.lyric.send_replace(None);
                Err(e)
            }
        }
    }

    /// Save a track's lyrics
    ///
    /// The current lyric shows the new text even if the write fails; the
    /// failure is returned.
    pub async fn save_lyrics(&self, id: &TrackId, text: impl Into<String>) -> Result<Lyric> {
        let lyric = Lyric::new(id.clone(), text);
        self.lyric.send_replace(Some(lyric.clone()));

        match self.lyrics.upsert(&lyric).await {
            Ok(()) => {
                tracing::debug!(track_id = %id, "Lyrics saved");
                Ok(lyric)
            }
            Err(e) => {
                tracing::warn!(track_id = %id, "Lyrics not saved: {}", e);
                Err(e)
            }
        }
    }

    pub fn current_lyric(&self) -> Option<Lyric> {
        self.lyric.borrow().clone()
    }

    pub fn subscribe_lyric(&self) -> watch::Receiver<Option<Lyric>> {
        self.lyric.subscribe()
    }

    // Transport

    /// Queue the visible rows and start playing at `row`
    pub fn play_from_row(&self, row: usize) -> Result<()> {
        let queue: Vec<QueueTrack> = self
            .library
            .borrow()
            .view
            .rows
            .iter()
            .map(QueueTrack::from)
            .collect();

        if row >= queue.len() {
            return Err(LarkError::invalid_input(format!(
                "row {row} is not visible ({} rows)",
                queue.len()
            )));
        }

        dispatch("Queue", self.engine.set_queue(queue, row))?;
        dispatch("Play", self.engine.play())
    }

    pub fn play(&self) -> Result<()> {
        dispatch("Play", self.engine.play())
    }

    pub fn pause(&self) -> Result<()> {
        dispatch("Pause", self.engine.pause())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Result<()> {
        dispatch("Next", self.engine.next())
    }

    pub fn previous(&self) -> Result<()> {
        dispatch("Previous", self.engine.previous())
    }

    pub fn seek(&self, position: Duration) -> Result<()> {
        dispatch("Seek", self.engine.seek(position))
    }

    pub fn now_playing(&self) -> NowPlaying {
        self.now_playing.borrow().clone()
    }

    pub fn subscribe_now_playing(&self) -> watch::Receiver<NowPlaying> {
        self.now_playing.subscribe()
    }

    // Playback mode

    /// Advance `RepeatAll -> RepeatOne -> Shuffle -> RepeatAll`
    pub fn toggle_mode(&self) -> Result<PlaybackMode> {
        self.mode.toggle().map_err(Into::into)
    }

    pub fn playback_mode(&self) -> PlaybackMode {
        self.mode.current()
    }

    pub fn subscribe_mode(&self) -> watch::Receiver<PlaybackMode> {
        self.mode.subscribe()
    }

    // Sleep timer

    /// Start (or restart) the sleep timer
    pub fn start_timer(&self, minutes: u32) -> Result<()> {
        lock(&self.timer).start(minutes).map_err(Into::into)
    }

    pub fn cancel_timer(&self) -> Result<()> {
        lock(&self.timer).cancel().map_err(Into::into)
    }

    pub fn timer(&self) -> TimerSnapshot {
        lock(&self.timer).current()
    }

    pub fn subscribe_timer(&self) -> watch::Receiver<TimerSnapshot> {
        lock(&self.timer).subscribe()
    }

    /// Minutes offered as one-tap timer choices
    pub fn timer_presets(&self) -> &[u32] {
        &self.timer_presets
    }

    // Engine events

    /// Apply one engine event to the session state
    pub async fn handle_engine_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::IsPlayingChanged(is_playing) => {
                self.now_playing.send_if_modified(|now| {
                    let changed = now.is_playing != is_playing;
                    now.is_playing = is_playing;
                    changed
                });
            }
            EngineEvent::CurrentTrackChanged(track_id) => {
                let track = track_id.as_ref().and_then(|id| lock(&self.state).lookup(id));
                self.now_playing.send_modify(|now| {
                    now.track_id.clone_from(&track_id);
                    now.track = track;
                });

                match track_id {
                    Some(id) => {
                        if let Err(e) = self.load_lyrics(&id).await {
                            tracing::warn!(track_id = %id, "Lyrics not loaded: {}", e);
                        }
                    }
                    None => {
                        self.lyric.send_replace(None);
                    }
                }
            }
            EngineEvent::TransportFlagsChanged(flags) => {
                self.mode.reconcile_with(flags);
            }
            EngineEvent::PauseTriggerFired => {
                tracing::info!("Sleep timer paused playback");
            }
            EngineEvent::Error(message) => {
                tracing::warn!("Engine reported an error: {}", message);
            }
        }
    }

    /// Re-read the engine snapshot after missing events
    pub fn sync_with_engine(&self) {
        let status = self.engine.status();
        let track = status
            .current_track
            .as_ref()
            .and_then(|id| lock(&self.state).lookup(id));

        self.now_playing.send_if_modified(|now| {
            let synced = NowPlaying {
                is_playing: status.is_playing,
                track_id: status.current_track,
                track,
            };
            if *now == synced {
                return false;
            }
            *now = synced;
            true
        });
        self.mode.reconcile();
    }

    /// Consume engine events in a background task
    ///
    /// Replaces any listener spawned earlier. The task holds only a weak
    /// reference and stops once the session is dropped.
    pub fn spawn_event_listener(self: &Arc<Self>) {
        let mut events = self.engine.subscribe();
        let session = Arc::downgrade(self);

        let task = tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Missed {} engine events, resyncing", skipped);
                        let Some(session) = session.upgrade() else { break };
                        session.sync_with_engine();
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                let Some(session) = session.upgrade() else { break };
                session.handle_engine_event(event).await;
            }
            tracing::debug!("Engine event listener stopped");
        });

        if let Some(previous) = lock(&self.listener).replace(task) {
            previous.abort();
        }
    }

    async fn read_favorites(&self) -> Option<HashSet<TrackId>> {
        match self.favorites.all_favorite_ids().await {
            Ok(ids) => Some(ids),
            Err(e) => {
                tracing::warn!("Favorites not read, keeping last known: {}", e);
                None
            }
        }
    }

    /// Rebuild the view from the current state and publish it
    fn rebuild(&self) {
        let snapshot = {
            let mut state = lock(&self.state);
            let LibraryState {
                raw,
                favorite_ids,
                query,
                builder,
                ..
            } = &mut *state;
            LibrarySnapshot {
                query: query.clone(),
                view: builder.build(raw, favorite_ids, query),
            }
        };

        {
            let mut rail = lock(&self.rail);
            if !Arc::ptr_eq(rail.mapper().index(), &snapshot.view.index) {
                rail.set_index(Arc::clone(&snapshot.view.index));
            }
        }

        self.refresh_current_track();
        self.library.send_replace(snapshot);
    }

    /// Refresh the now-playing entry (its favorite flag may have changed)
    fn refresh_current_track(&self) {
        let track_id = self.now_playing.borrow().track_id.clone();
        let track = track_id.as_ref().and_then(|id| lock(&self.state).lookup(id));

        self.now_playing.send_if_modified(|now| {
            if now.track == track {
                return false;
            }
            now.track = track;
            true
        });
    }
}

impl Drop for MusicSession {
    fn drop(&mut self) {
        let listener = self
            .listener
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = listener.take() {
            task.abort();
        }
        tracing::debug!("Music session detached");
    }
}

fn dispatch(command: &str, result: lark_playback::Result<()>) -> Result<()> {
    result.map_err(|e| {
        tracing::warn!("{} command not delivered: {}", command, e);
        e.into()
    })
}

/// Lock a mutex, recovering the data if a holder panicked
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
