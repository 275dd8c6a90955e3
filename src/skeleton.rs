//! Skeleton
//!
//! Planning of the bounded window of frets ("skeleton") to inspect or render.
//!
//! Failures come in three tiers:
//! - [`SkeletonError`] for input the caller may correct and retry,
//! - silent correction of the window length,
//! - [`Abort`] for start frets or string groupings the instrument cannot
//!   accommodate. These panic and are never returned as a value.

use std::ops::Range;

use rand::Rng;
use thiserror::Error;

use crate::instrument::Instrument;
use crate::ErrorKind;

/// Window length used when the requested one is unusable.
pub const DEFAULT_LENGTH: i64 = 5;

/// Start fret used when none is given.
pub const DEFAULT_START_FRET: i64 = 0;

/// String grouping used when none is given.
pub const DEFAULT_STRING_GROUPING: i64 = 3;

/// Longest skeleton [`unearth_skeleton`] will produce.
pub const MAX_SKELETON_LENGTH: i64 = 1 << 16;

/// Text tokens that ask for a randomly chosen value.
const RANDOM_TOKENS: [&str; 3] = ["", "r", "random"];

/// A loosely typed argument as collected from a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// An integer value.
    Int(i64),
    /// Free text. Numeric text is read as an integer where a cast is allowed.
    Text(String),
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Int(value.into())
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Text(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Text(value)
    }
}

/// What an [`Arg`] means once integer casting is applied.
enum Cast<'a> {
    Int(i64),
    Random,
    Other(&'a str),
}

impl Arg {
    fn cast(&self) -> Cast<'_> {
        match self {
            Arg::Int(n) => Cast::Int(*n),
            Arg::Text(s) => {
                let s = s.trim();
                if let Ok(n) = s.parse::<i64>() {
                    Cast::Int(n)
                } else if RANDOM_TOKENS.contains(&s) {
                    Cast::Random
                } else {
                    Cast::Other(s)
                }
            }
        }
    }
}

/// Recoverable errors from skeleton planning.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkeletonError {
    /// A start fret below zero.
    #[error("negative fret {0}")]
    NegativeFret(i64),

    /// A start fret that is neither an integer nor a request for a random one.
    #[error("bad type for start fret: `{0}`")]
    BadType(String),

    /// A window length given as non-numeric text.
    #[error("invalid length `{0}`")]
    InvalidLength(String),

    /// An argument that must be an integer was not.
    #[error("non-integer argument `{arg}`: `{value}`")]
    NonIntegerArgument {
        /// Name of the argument.
        arg: &'static str,
        /// The value received.
        value: String,
    },

    /// A skeleton length outside `2..=ceiling + 1` or above [`MAX_SKELETON_LENGTH`].
    #[error("length {length} out of bounds relative to ceiling {ceiling}")]
    LengthOutOfBounds {
        /// Requested number of positions.
        length: i64,
        /// Highest fret position.
        ceiling: i64,
    },
}

impl SkeletonError {
    /// Whether this is a value error or a type error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SkeletonError::NonIntegerArgument { .. } => ErrorKind::Type,
            _ => ErrorKind::Value,
        }
    }
}

/// Conditions severe enough to stop the request outright.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Abort {
    /// The start fret lies above the instrument's usable ceiling.
    #[error("start fret {fret} is beyond the usable ceiling {ceiling}")]
    StartFretBeyondCeiling {
        /// The start fret requested.
        fret: i64,
        /// Highest usable fret.
        ceiling: i32,
    },

    /// The string grouping is not an integer in `1..=strings`.
    #[error("string grouping `{value}` must be an integer in 1..={strings}")]
    InvalidStringGrouping {
        /// The grouping requested.
        value: String,
        /// Strings on the instrument.
        strings: usize,
    },
}

fn abort(reason: Abort) -> ! {
    log::error!("aborting: {reason}");
    panic!("aborting: {reason}")
}

/// A planned window of frets.
///
/// Only produced by [`form_skeleton`], so the grouping is always in
/// `1..=strings` of the instrument it was planned for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FretWindow {
    frets: Vec<i32>,
    start_fret: i32,
    length: i32,
    string_grouping: usize,
}

impl FretWindow {
    /// Start customizing with a builder.
    pub fn builder() -> FretWindowBuilder {
        FretWindowBuilder::new()
    }

    /// Absolute fret numbers, `start_fret..start_fret + length`.
    pub fn frets(&self) -> &[i32] {
        &self.frets
    }

    /// Start fret after randomisation.
    pub fn start_fret(&self) -> i32 {
        self.start_fret
    }

    /// Length after defaulting and clamping.
    pub fn length(&self) -> i32 {
        self.length
    }

    /// Strings per group.
    pub fn string_grouping(&self) -> usize {
        self.string_grouping
    }

    /// Split string indices `0..strings` into consecutive groups of
    /// `string_grouping`; the last group may be shorter.
    pub fn string_groups(&self, strings: usize) -> Vec<Range<usize>> {
        (0..strings)
            .step_by(self.string_grouping)
            .map(|first| first..(first + self.string_grouping).min(strings))
            .collect()
    }
}

/// Builder for a [`FretWindow`].
pub struct FretWindowBuilder {
    start_fret: Arg,
    length: Arg,
    string_grouping: Arg,
}

impl FretWindowBuilder {
    /// Start with start fret 0, length 5 and groups of 3 strings.
    pub fn new() -> Self {
        FretWindowBuilder {
            start_fret: Arg::Int(DEFAULT_START_FRET),
            length: Arg::Int(DEFAULT_LENGTH),
            string_grouping: Arg::Int(DEFAULT_STRING_GROUPING),
        }
    }

    /// Set the first fret of the window. `"r"` asks for a random one.
    pub fn start_fret(mut self, value: impl Into<Arg>) -> Self {
        self.start_fret = value.into();
        self
    }

    /// Set the number of frets in the window.
    pub fn length(mut self, value: impl Into<Arg>) -> Self {
        self.length = value.into();
        self
    }

    /// Set how many strings make up a group.
    pub fn string_grouping(mut self, value: impl Into<Arg>) -> Self {
        self.string_grouping = value.into();
        self
    }

    /// Plan the window for `instrument`.
    ///
    /// # Panics
    /// On any [`Abort`] condition.
    pub fn form<R: Rng + ?Sized>(
        self,
        instrument: &Instrument,
        rng: &mut R,
    ) -> Result<FretWindow, SkeletonError> {
        form_skeleton(
            instrument,
            &self.start_fret,
            &self.length,
            &self.string_grouping,
            rng,
        )
    }
}

impl Default for FretWindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a requested start fret against `instrument`.
///
/// Integers (and numeric text) are returned unchanged, the random tokens
/// `""`, `"r"` and `"random"` pick a fret in `0..=usable_ceiling`.
///
/// Returns:
/// - `Err(NegativeFret)` for values below zero.
/// - `Err(BadType)` for any other text.
///
/// # Panics
/// With [`Abort::StartFretBeyondCeiling`] when the fret exceeds the
/// instrument's usable ceiling.
pub fn normalize_start_fret<R: Rng + ?Sized>(
    instrument: &Instrument,
    value: &Arg,
    rng: &mut R,
) -> Result<i32, SkeletonError> {
    let ceiling = instrument.usable_ceiling();
    match value.cast() {
        Cast::Int(n) if n < 0 => Err(SkeletonError::NegativeFret(n)),
        Cast::Int(n) => match i32::try_from(n) {
            Ok(fret) if fret <= ceiling => Ok(fret),
            _ => abort(Abort::StartFretBeyondCeiling { fret: n, ceiling }),
        },
        Cast::Random => {
            let fret = rng.gen_range(0..=ceiling);
            log::debug!("random start fret {fret}");
            Ok(fret)
        }
        Cast::Other(s) => Err(SkeletonError::BadType(s.to_string())),
    }
}

fn resolve_length(value: &Arg, start_fret: i32, ceiling: i32) -> Result<i32, SkeletonError> {
    let requested = match value.cast() {
        Cast::Int(n) if n >= 1 => n,
        Cast::Int(n) => {
            log::debug!("length {n} replaced by default {DEFAULT_LENGTH}");
            DEFAULT_LENGTH
        }
        Cast::Random => DEFAULT_LENGTH,
        Cast::Other(s) => return Err(SkeletonError::InvalidLength(s.to_string())),
    };

    let room = i64::from(ceiling - start_fret + 1);
    if requested > room {
        log::warn!("length {requested} from fret {start_fret} exceeds ceiling {ceiling}, clamped to {room}");
    }
    // room is at least 1 and fits in i32
    Ok(requested.min(room) as i32)
}

fn resolve_grouping<R: Rng + ?Sized>(instrument: &Instrument, value: &Arg, rng: &mut R) -> usize {
    let strings = instrument.strings();
    match value.cast() {
        Cast::Int(n) if n >= 1 && n as u64 <= strings as u64 => n as usize,
        Cast::Random => {
            let grouping = rng.gen_range(1..=strings);
            log::debug!("random string grouping {grouping}");
            grouping
        }
        _ => {
            let value = match value {
                Arg::Int(n) => n.to_string(),
                Arg::Text(s) => s.clone(),
            };
            abort(Abort::InvalidStringGrouping { value, strings })
        }
    }
}

/// Plan a window of frets on `instrument`.
///
/// The start fret is resolved with [`normalize_start_fret`]. A length below
/// one (or a random token) becomes [`DEFAULT_LENGTH`], and a window that
/// would run past the usable ceiling is shortened to fit. Neither
/// correction is reported as an error.
///
/// Returns:
/// - `Err(NegativeFret)` / `Err(BadType)` from start fret resolution.
/// - `Err(InvalidLength)` if the length is non-numeric text.
///
/// # Panics
/// On a start fret above the ceiling, or a string grouping that is not an
/// integer in `1..=strings` (random token aside).
pub fn form_skeleton<R: Rng + ?Sized>(
    instrument: &Instrument,
    start_fret: &Arg,
    length: &Arg,
    string_grouping: &Arg,
    rng: &mut R,
) -> Result<FretWindow, SkeletonError> {
    let start_fret = normalize_start_fret(instrument, start_fret, rng)?;
    let length = resolve_length(length, start_fret, instrument.usable_ceiling())?;
    let string_grouping = resolve_grouping(instrument, string_grouping, rng);

    Ok(FretWindow {
        frets: (start_fret..start_fret + length).collect(),
        start_fret,
        length,
        string_grouping,
    })
}

/// Pick `length` evenly spaced fret positions from `0..=ceiling`.
///
/// The first position is always 0 and the last always `ceiling`.
///
/// Returns:
/// - `Err(NonIntegerArgument)` if either argument is not an integer.
/// - `Err(LengthOutOfBounds)` unless `2 <= length <= ceiling + 1` and
///   `length <= MAX_SKELETON_LENGTH`.
pub fn unearth_skeleton(length: &Arg, ceiling: &Arg) -> Result<Vec<i64>, SkeletonError> {
    let length = require_int("length", length)?;
    let ceiling = require_int("ceiling", ceiling)?;
    if length < 2 || length > ceiling.saturating_add(1) || length > MAX_SKELETON_LENGTH {
        return Err(SkeletonError::LengthOutOfBounds { length, ceiling });
    }

    let steps = i128::from(length - 1);
    let ceiling = i128::from(ceiling);
    // round(i * ceiling / steps), in integers; length is capped so this fits i128
    Ok((0..i128::from(length))
        .map(|i| ((2 * i * ceiling + steps) / (2 * steps)) as i64)
        .collect())
}

fn require_int(arg: &'static str, value: &Arg) -> Result<i64, SkeletonError> {
    match value {
        Arg::Int(n) => Ok(*n),
        Arg::Text(s) => Err(SkeletonError::NonIntegerArgument {
            arg,
            value: s.clone(),
        }),
    }
}
