//! Note-name spelling in a key context
//!
//! A key context is written `<Letter><#|b>?<maj|min>` (e.g. "Cmaj", "F#min",
//! "Bbmaj"). Only the choice between sharp and flat spellings depends on it:
//! notes are spelled with flats exactly when the tonic is written with a flat.

use crate::analysis::result::{Key, Mode};
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Tonics (pitch classes) conventionally named from the flat side
const FLAT_MAJOR_TONICS: [u8; 5] = [5, 10, 3, 8, 1]; // F, Bb, Eb, Ab, Db
const FLAT_MINOR_TONICS: [u8; 6] = [2, 7, 0, 5, 10, 3]; // d, g, c, f, bb, eb

/// Key used to spell note names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyContext {
    tonic: u8,
    mode: Mode,
    flats: bool,
    name: String,
}

impl KeyContext {
    /// Context for a detected key
    ///
    /// The tonic takes its conventional name (Eb rather than D#, F# rather
    /// than Gb), and the context spells like the parsed form of that name.
    pub fn from_key(key: Key) -> Self {
        let tonic = key.tonic();
        let flat_side = match key.mode() {
            Mode::Major => FLAT_MAJOR_TONICS.contains(&tonic),
            Mode::Minor => FLAT_MINOR_TONICS.contains(&tonic),
        };
        let names = if flat_side { &FLAT_NAMES } else { &SHARP_NAMES };
        let tonic_name = names[tonic as usize];
        Self {
            tonic,
            mode: key.mode(),
            flats: tonic_name.ends_with('b'),
            name: format!("{}{}", tonic_name, key.mode().suffix()),
        }
    }

    /// Tonic pitch class
    pub fn tonic(&self) -> u8 {
        self.tonic
    }

    /// Mode of the context key
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// True when note names are spelled with flats
    pub fn uses_flats(&self) -> bool {
        self.flats
    }

    /// Note name of a pitch class in this context
    pub fn note_name(&self, pitch_class: u8) -> &'static str {
        let names = if self.flats { &FLAT_NAMES } else { &SHARP_NAMES };
        names[(pitch_class % 12) as usize]
    }
}

impl Default for KeyContext {
    fn default() -> Self {
        Self {
            tonic: 0,
            mode: Mode::Major,
            flats: false,
            name: "Cmaj".to_string(),
        }
    }
}

impl FromStr for KeyContext {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            AnalysisError::InvalidInput(format!(
                "key context '{}' must look like Cmaj, F#min or Bbmaj",
                s
            ))
        };

        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(invalid)?;
        let natural: i32 = match letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(invalid()),
        };

        let rest = chars.as_str();
        let (shift, flats, suffix) = if let Some(r) = rest.strip_prefix('#') {
            (1, false, r)
        } else if let Some(r) = rest.strip_prefix('b') {
            (-1, true, r)
        } else {
            (0, false, rest)
        };

        let mode = match suffix {
            "maj" => Mode::Major,
            "min" => Mode::Minor,
            _ => return Err(invalid()),
        };

        Ok(Self {
            tonic: (natural + shift).rem_euclid(12) as u8,
            mode,
            flats,
            name: s.to_string(),
        })
    }
}

impl fmt::Display for KeyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_contexts() {
        let c: KeyContext = "Cmaj".parse().unwrap();
        assert_eq!((c.tonic(), c.mode(), c.uses_flats()), (0, Mode::Major, false));

        let bb: KeyContext = "Bbmaj".parse().unwrap();
        assert_eq!((bb.tonic(), bb.uses_flats()), (10, true));
        assert_eq!(bb.note_name(3), "Eb");

        let fs: KeyContext = "F#min".parse().unwrap();
        assert_eq!((fs.tonic(), fs.mode(), fs.uses_flats()), (6, Mode::Minor, false));
        assert_eq!(fs.note_name(3), "D#");

        let d: KeyContext = "Dmin".parse().unwrap();
        assert_eq!(d.to_string(), "Dmin");
    }

    #[test]
    fn test_spelling_follows_tonic_accidental() {
        for natural in ["Fmaj", "Dmin", "Gmin", "Cmin", "Fmin"] {
            let context: KeyContext = natural.parse().unwrap();
            assert!(!context.uses_flats(), "{} has no flat in its name", natural);
            assert_eq!(context.note_name(10), "A#");
        }
        let eb: KeyContext = "Ebmin".parse().unwrap();
        assert_eq!((eb.tonic(), eb.uses_flats()), (3, true));
        assert_eq!(eb.note_name(10), "Bb");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "H", "Cmajor", "cmaj", "C#", "Cxmaj", "Emi"] {
            assert!(bad.parse::<KeyContext>().is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_from_key() {
        assert_eq!(KeyContext::from_key(Key::Major(10)).to_string(), "Bbmaj");
        assert_eq!(KeyContext::from_key(Key::Major(6)).to_string(), "F#maj");
        assert_eq!(KeyContext::from_key(Key::Minor(3)).to_string(), "Ebmin");
        for key in Key::all() {
            let context = KeyContext::from_key(key);
            assert_eq!(context, context.to_string().parse().unwrap(), "{:?}", key);
        }
        assert_eq!(KeyContext::default(), "Cmaj".parse().unwrap());
    }
}
