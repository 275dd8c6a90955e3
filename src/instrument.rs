//! Instrument
//!
//! Tuning validation, the chromatic pitch-class table and fret-to-note lookup
//! for a six-string fretted instrument.

use std::{fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::skeleton::FretWindow;
use crate::ErrorKind;

const SEMITONES: i32 = 12;

/// Frets kept in reserve above the highest fret that may be queried.
const FRET_MARGIN: i32 = 4;

/// Default open-string tuning.
pub const DEFAULT_TUNING: &str = "EADGBE";

/// Default number of frets.
pub const DEFAULT_FRETS: i32 = 21;

/// Pitch-class spellings, C = 0. Two entries means (sharp, flat).
const PITCH_CLASSES: [&[&str]; SEMITONES as usize] = [
    &["C"],
    &["C#", "Db"],
    &["D"],
    &["D#", "Eb"],
    &["E"],
    &["F"],
    &["F#", "Gb"],
    &["G"],
    &["G#", "Ab"],
    &["A"],
    &["A#", "Bb"],
    &["B"],
];

/// Standard tuning and its transpositions, as concatenated note names.
const SUPPORTED_TUNINGS: [&str; 18] = [
    "EADGBE",
    "EbAbDbGbBbEb",
    "D#G#C#F#A#D#",
    "DGCFAD",
    "DbGbBEAbDb",
    "C#F#BEG#C#",
    "CFBbEbGC",
    "BEADF#B",
    "BbEbAbDbFBb",
    "A#D#G#C#FA#",
    "ADGCEA",
    "AbDbGbBEbAb",
    "G#C#F#BD#G#",
    "GCFBbDG",
    "GbBEADbGb",
    "F#BEAC#F#",
    "FBbEbAbCF",
    "FA#D#G#CF",
];

lazy_static! {
    static ref TUNING_PATTERN: Regex = Regex::new(r"^([A-G][#b]?(\s|,\s?)?){2,}$").unwrap();
    static ref NOTE_PATTERN: Regex = Regex::new(r"[A-G][#b]?").unwrap();
}

/// Errors raised while configuring or querying an [`Instrument`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstrumentError {
    /// Fret count must be greater than four.
    #[error("invalid fret count {0}: must be greater than 4")]
    InvalidFretCount(i32),

    /// The tuning string is not a sequence of note names.
    #[error("invalid tuning syntax `{0}`")]
    InvalidTuningSyntax(String),

    /// The tuning parsed but is not a transposition of standard tuning.
    #[error("unsupported tuning `{0}`: only transpositions of standard six-string tuning are available")]
    UnsupportedTuning(String),

    /// The requested fret is negative or beyond the usable ceiling.
    #[error("fret {fret} out of range: expected 0..={ceiling}")]
    FretOutOfRange {
        /// The fret that was asked for.
        fret: i32,
        /// Highest fret that may be queried.
        ceiling: i32,
    },

    /// Accidental preference other than `#` or `b`.
    #[error("invalid accidental `{0}`: expected `#` or `b`")]
    InvalidAccidental(String),
}

impl InstrumentError {
    /// Every instrument error is a value error.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Value
    }
}

/// Which spelling to use for pitch classes with two names.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Accidental {
    /// C#, D#, F#, G#, A#
    #[default]
    Sharp,
    /// Db, Eb, Gb, Ab, Bb
    Flat,
}

impl FromStr for Accidental {
    type Err = InstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "#" => Ok(Accidental::Sharp),
            "b" => Ok(Accidental::Flat),
            other => Err(InstrumentError::InvalidAccidental(other.to_string())),
        }
    }
}

/// Spelling of a pitch class labelled 1..=12 (12 wraps to C).
fn spell(label: i32, accidental: Accidental) -> &'static str {
    let names = PITCH_CLASSES[label.rem_euclid(SEMITONES) as usize];
    match (names, accidental) {
        ([_, flat], Accidental::Flat) => *flat,
        _ => names[0],
    }
}

/// Index (0..=11) of a note name in the pitch-class table.
fn pitch_class_of(name: &str) -> Option<i32> {
    PITCH_CLASSES
        .iter()
        .position(|names| names.contains(&name))
        .map(|pos| pos as i32)
}

/// Validate a tuning string and split it into note names.
fn parse_tuning(tuning: &str) -> Result<Vec<String>, InstrumentError> {
    let trimmed = tuning.trim();
    if !TUNING_PATTERN.is_match(trimmed) {
        return Err(InstrumentError::InvalidTuningSyntax(tuning.to_string()));
    }
    let notes: Vec<String> = NOTE_PATTERN
        .find_iter(trimmed)
        .map(|m| m.as_str().to_string())
        .collect();

    let joined = notes.concat();
    if !SUPPORTED_TUNINGS.contains(&joined.as_str()) {
        return Err(InstrumentError::UnsupportedTuning(tuning.to_string()));
    }
    Ok(notes)
}

fn check_frets(frets: i32) -> Result<i32, InstrumentError> {
    if frets > FRET_MARGIN {
        Ok(frets)
    } else {
        Err(InstrumentError::InvalidFretCount(frets))
    }
}

/// Builder for an [`Instrument`].
pub struct InstrumentBuilder {
    tuning: String,
    frets: i32,
}

impl InstrumentBuilder {
    /// Start with standard tuning and 21 frets.
    pub fn new() -> Self {
        InstrumentBuilder {
            tuning: DEFAULT_TUNING.to_string(),
            frets: DEFAULT_FRETS,
        }
    }

    /// Set the open-string tuning, e.g. `"EADGBE"` or `"D G C F A D"`.
    pub fn tuning(mut self, tuning: impl Into<String>) -> Self {
        self.tuning = tuning.into();
        self
    }

    /// Set the number of frets.
    pub fn frets(mut self, frets: i32) -> Self {
        self.frets = frets;
        self
    }

    /// Validate and create the [`Instrument`].
    pub fn build(self) -> Result<Instrument, InstrumentError> {
        Instrument::new(&self.tuning, self.frets)
    }
}

impl Default for InstrumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A fretted instrument in one of the supported tunings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    frets: i32,
    tuning: Vec<String>,
    tuning_notes_idx: Vec<i32>,
}

impl Instrument {
    /// Start customizing with a builder.
    pub fn builder() -> InstrumentBuilder {
        InstrumentBuilder::new()
    }

    /// Create an instrument, validating both the tuning and the fret count.
    pub fn new(tuning: &str, frets: i32) -> Result<Self, InstrumentError> {
        let frets = check_frets(frets)?;
        let tuning = parse_tuning(tuning)?;
        let tuning_notes_idx = index_notes(&tuning);
        log::debug!("instrument tuned to {} with {frets} frets", tuning.join(" "));

        Ok(Instrument {
            frets,
            tuning,
            tuning_notes_idx,
        })
    }

    /// Number of frets.
    pub fn frets(&self) -> i32 {
        self.frets
    }

    /// Number of strings, one per tuning note.
    pub fn strings(&self) -> usize {
        self.tuning.len()
    }

    /// Open-string note names in the order they were given.
    pub fn tuning(&self) -> &[String] {
        &self.tuning
    }

    /// Pitch-class indices (C = 0) of the open strings, parallel to [`Instrument::tuning`].
    pub fn tuning_notes_idx(&self) -> &[i32] {
        &self.tuning_notes_idx
    }

    /// Highest fret that [`Instrument::notes_from_fret`] accepts.
    pub fn usable_ceiling(&self) -> i32 {
        self.frets - FRET_MARGIN
    }

    /// Replace the fret count. On error the instrument is left unchanged.
    pub fn set_frets(&mut self, frets: i32) -> Result<(), InstrumentError> {
        self.frets = check_frets(frets)?;
        Ok(())
    }

    /// Retune the instrument. On error the instrument is left unchanged.
    pub fn set_tuning(&mut self, tuning: &str) -> Result<(), InstrumentError> {
        let notes = parse_tuning(tuning)?;
        self.tuning_notes_idx = index_notes(&notes);
        self.tuning = notes;
        Ok(())
    }

    /// Notes sounding on each string when every string is held at `fret`.
    ///
    /// Returns `Err(FretOutOfRange)` if `fret` is negative or above
    /// [`Instrument::usable_ceiling`].
    pub fn notes_from_fret(
        &self,
        fret: i32,
        accidental: Accidental,
    ) -> Result<Vec<&'static str>, InstrumentError> {
        let ceiling = self.usable_ceiling();
        if fret < 0 || fret > ceiling {
            return Err(InstrumentError::FretOutOfRange { fret, ceiling });
        }

        Ok(self
            .tuning_notes_idx
            .iter()
            .map(|&open| (open + fret.rem_euclid(SEMITONES) - 1).rem_euclid(SEMITONES) + 1)
            .map(|label| spell(label, accidental))
            .collect())
    }

    /// One row of notes per fret of a planned window, lowest fret first.
    pub fn notes_for_window(
        &self,
        window: &FretWindow,
        accidental: Accidental,
    ) -> Result<Vec<Vec<&'static str>>, InstrumentError> {
        window
            .frets()
            .iter()
            .map(|&fret| self.notes_from_fret(fret, accidental))
            .collect()
    }
}

fn index_notes(notes: &[String]) -> Vec<i32> {
    // Only whitelisted names reach here, so the lookup cannot miss.
    let idx: Vec<i32> = notes.iter().filter_map(|n| pitch_class_of(n)).collect();
    debug_assert_eq!(idx.len(), notes.len(), "unknown note name in {notes:?}");
    idx
}

impl Default for Instrument {
    fn default() -> Self {
        let tuning: Vec<String> = ["E", "A", "D", "G", "B", "E"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let tuning_notes_idx = index_notes(&tuning);
        Instrument {
            frets: DEFAULT_FRETS,
            tuning,
            tuning_notes_idx,
        }
    }
}

impl Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tuning: {}\nStrings: {}\nFrets: {}",
            self.tuning.join(" | "),
            self.strings(),
            self.frets
        )
    }
}
