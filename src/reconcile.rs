//! Reduces a change to the live input buffer to one contiguous edit, for a
//! display that can only insert or delete at a position.

use log::warn;
use serde::Serialize;

use crate::error::{Result, ShellError};

/// Where an edit happens, as a character offset into the shorter of the two
/// strings, or at its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Offset(usize),
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Insertion { location: Location, text: String },
    Deletion { location: Location, text: String },
    /// Only produced when replacements are enabled.
    Replacement { location: Location, removed: String, inserted: String },
    NoChange,
}

/// Shape the screen text engine expects: `{ type, loc, str }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireChange {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub loc: WireLocation,
    #[serde(rename = "str")]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WireLocation {
    Offset(usize),
    Tag(&'static str),
}

impl From<Location> for WireLocation {
    fn from(location: Location) -> Self {
        match location {
            Location::Offset(n) => WireLocation::Offset(n),
            Location::End => WireLocation::Tag("end"),
        }
    }
}

impl Change {
    /// A replacement goes out as a deletion followed by an insertion at the
    /// same spot.
    pub fn to_wire(&self) -> Vec<WireChange> {
        let wire = |kind, location: Location, text: &str| WireChange { kind, loc: location.into(), text: text.to_string() };
        match self {
            Change::Insertion { location, text } => vec![wire("add", *location, text)],
            Change::Deletion { location, text } => vec![wire("del", *location, text)],
            Change::Replacement { location, removed, inserted } => vec![
                wire("del", *location, removed),
                wire("add", *location, inserted),
            ],
            Change::NoChange => vec![WireChange { kind: "none", loc: WireLocation::Tag("none"), text: String::new() }],
        }
    }
}

/// Same-length edits are reported as `NoChange`. Anything that is not one
/// contiguous insertion or deletion is an `EditConflict`.
pub fn diff(previous: &str, current: &str) -> Result<Change> {
    let old: Vec<char> = previous.chars().collect();
    let new: Vec<char> = current.chars().collect();

    if old.len() == new.len() {
        return Ok(Change::NoChange);
    }
    if old.len() > new.len() {
        let (location, text) = single_run(&old, &new)?;
        Ok(Change::Deletion { location, text })
    } else {
        let (location, text) = single_run(&new, &old)?;
        Ok(Change::Insertion { location, text })
    }
}

// `longer` must be `shorter` with one run of chars added
fn single_run(longer: &[char], shorter: &[char]) -> Result<(Location, String)> {
    let start = common_prefix(longer, shorter);
    let run = longer.len() - shorter.len();
    if longer[start + run..] != shorter[start..] {
        return Err(ShellError::EditConflict(start));
    }
    let location = if start == shorter.len() { Location::End } else { Location::Offset(start) };
    Ok((location, longer[start..start + run].iter().collect()))
}

fn common_prefix(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix(a: &[char], b: &[char], limit: usize) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take(limit)
        .take_while(|(x, y)| x == y)
        .count()
}

/// `diff` with an optional fallback for edits it cannot express.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    pub allow_replacements: bool,
}

impl Reconciler {
    pub fn new(allow_replacements: bool) -> Self {
        Self { allow_replacements }
    }

    /// Never fails: conflicts are logged and become `NoChange` unless
    /// replacements are allowed.
    pub fn reconcile(&self, previous: &str, current: &str) -> Change {
        match self.diff(previous, current) {
            Ok(change) => change,
            Err(err) => {
                warn!("input edit dropped: {}", err);
                Change::NoChange
            }
        }
    }

    pub fn diff(&self, previous: &str, current: &str) -> Result<Change> {
        if !self.allow_replacements {
            return diff(previous, current);
        }
        if previous == current {
            return Ok(Change::NoChange);
        }
        match diff(previous, current) {
            Ok(Change::NoChange) | Err(_) => Ok(replacement(previous, current)),
            other => other,
        }
    }
}

fn replacement(previous: &str, current: &str) -> Change {
    let old: Vec<char> = previous.chars().collect();
    let new: Vec<char> = current.chars().collect();
    let start = common_prefix(&old, &new);
    let limit = old.len().min(new.len()) - start;
    let tail = common_suffix(&old, &new, limit);

    let location = if tail == 0 { Location::End } else { Location::Offset(start) };
    Change::Replacement {
        location,
        removed: old[start..old.len() - tail].iter().collect(),
        inserted: new[start..new.len() - tail].iter().collect(),
    }
}
