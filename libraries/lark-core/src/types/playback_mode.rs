/// Playback mode and the engine transport flags it maps onto
use serde::{Deserialize, Serialize};

/// Repeat flag held by the playback engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatFlag {
    #[default]
    Off,
    All,
    One,
}

/// The engine's raw transport flags (repeat flag + shuffle flag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransportFlags {
    /// Repeat flag
    pub repeat: RepeatFlag,

    /// Whether shuffle is enabled
    pub shuffle: bool,
}

impl TransportFlags {
    /// Create transport flags
    pub fn new(repeat: RepeatFlag, shuffle: bool) -> Self {
        Self { repeat, shuffle }
    }
}

/// User-facing playback mode
///
/// Cycles `RepeatAll -> RepeatOne -> Shuffle -> RepeatAll`. The control surface
/// and the playback engine each hold their own copy; the engine copy is stored
/// as [`TransportFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaybackMode {
    #[default]
    RepeatAll,
    RepeatOne,
    Shuffle,
}

impl PlaybackMode {
    /// All modes in cycle order
    pub const ALL: [PlaybackMode; 3] = [Self::RepeatAll, Self::RepeatOne, Self::Shuffle];

    /// Next mode in the cycle
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::RepeatAll => Self::RepeatOne,
            Self::RepeatOne => Self::Shuffle,
            Self::Shuffle => Self::RepeatAll,
        }
    }

    /// Flags the engine must hold for this mode
    pub fn transport_flags(self) -> TransportFlags {
        match self {
            Self::RepeatAll => TransportFlags::new(RepeatFlag::All, false),
            Self::RepeatOne => TransportFlags::new(RepeatFlag::One, false),
            // Shuffle keeps cycling through the whole queue
            Self::Shuffle => TransportFlags::new(RepeatFlag::All, true),
        }
    }

    /// Re-derive the mode from the engine's live flags
    ///
    /// Shuffle wins over the repeat flag. Combinations this controller never
    /// produces (repeat off, or repeat-one with shuffle) fold into the closest
    /// mode rather than failing.
    pub fn from_transport_flags(flags: TransportFlags) -> Self {
        if flags.shuffle {
            Self::Shuffle
        } else if flags.repeat == RepeatFlag::One {
            Self::RepeatOne
        } else {
            Self::RepeatAll
        }
    }
}

impl std::fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::RepeatAll => "REPEAT_ALL",
            Self::RepeatOne => "REPEAT_ONE",
            Self::Shuffle => "SHUFFLE",
        })
    }
}
