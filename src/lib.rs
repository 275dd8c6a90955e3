//! # fretboard_skeleton
//!
//! A small model of a six-string fretted instrument: validate a tuning, name
//! the notes found at any fret, and plan the window of frets ("skeleton") a
//! caller wants to inspect or display.
//!
//! ## Example
//! ```rust
//! use fretboard_skeleton::{Accidental, FretWindow, Instrument};
//! use rand::thread_rng;
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1) Tune the instrument
//!     let guitar = Instrument::builder()
//!         .tuning("D G C F A D")
//!         .frets(22)
//!         .build()?;
//!
//!     // 2) Plan a window of frets
//!     let window = FretWindow::builder()
//!         .start_fret("r")
//!         .length(4)
//!         .string_grouping(3)
//!         .form(&guitar, &mut thread_rng())?;
//!
//!     // 3) Name the notes in it
//!     for (fret, notes) in window.frets().iter().zip(guitar.notes_for_window(&window, Accidental::Flat)?) {
//!         println!("{fret:>2}: {}", notes.join(" "));
//!     }
//!
//!     Ok(())
//! }
//! # run().unwrap();
//! ```
//!
//! ## Errors
//! Validation failures are returned as [`InstrumentError`] or
//! [`SkeletonError`], each classified by [`ErrorKind`]. Start frets above
//! the instrument's ceiling and impossible string groupings are an
//! [`Abort`]: planning panics instead of returning.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Tuning model and fret-to-note lookup.
pub use instrument::{
    Accidental, Instrument, InstrumentBuilder, InstrumentError, DEFAULT_FRETS, DEFAULT_TUNING,
};

/// Fret-window planning.
pub use skeleton::{
    form_skeleton, normalize_start_fret, unearth_skeleton, Abort, Arg, FretWindow,
    FretWindowBuilder, SkeletonError, MAX_SKELETON_LENGTH,
};

/// Instrument module.
pub mod instrument;

/// Skeleton planning module.
pub mod skeleton;

/// Broad class of a recoverable error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The argument had the right type but an unacceptable value.
    Value,
    /// The argument had the wrong type.
    Type,
}
