//! Tone profiles and their 24 key rotations
//!
//! A tone profile gives the expected weight of each scale degree in a major
//! and a minor key, starting from the tonic. Profiles are expanded once into
//! all 24 rotations: the rotation for tonic `t` carries degree `d` at pitch
//! class `(t + d) mod 12`.
//!
//! # References
//!
//! - Krumhansl, C. L., & Kessler, E. J. (1982). Tracing the Dynamic Changes in
//!   Perceived Tonal Organization in a Spatial Representation of Musical Keys.
//!   *Psychological Review*, 89(4), 334-368.
//! - Temperley, D. (1999). What's Key for Key? The Krumhansl-Schmuckler
//!   Key-Finding Algorithm Reconsidered. *Music Perception*, 17(1), 65-100.
//! - Aarden, B. (2003). *Dynamic Melodic Expectancy*. PhD thesis, Ohio State.
//! - Bellman, H. (2005). About the Determination of Key of a Musical Excerpt.
//! - Albrecht, J., & Shanahan, D. (2013). The Use of Large Corpora to Train a
//!   New Type of Key-Finding Algorithm. *Music Perception*, 31(1), 59-67.

use crate::analysis::result::{Key, Mode};
use crate::error::AnalysisError;
use std::sync::OnceLock;

/// Columns of a profile row: name, 12 major weights, 12 minor weights
const CSV_COLUMNS: usize = 25;

/// Header rows preceding the profile rows in a weight table
const CSV_HEADER_ROWS: usize = 2;

const BUILTIN_PROFILES: [(&str, [f64; 12], [f64; 12]); 6] = [
    (
        "KrumhanslKessler",
        [6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88],
        [6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17],
    ),
    (
        "Temperley",
        [0.748, 0.060, 0.488, 0.082, 0.670, 0.460, 0.096, 0.715, 0.104, 0.366, 0.057, 0.400],
        [0.712, 0.084, 0.474, 0.618, 0.049, 0.460, 0.105, 0.747, 0.404, 0.067, 0.133, 0.330],
    ),
    (
        "AardenEssen",
        [
            17.7661, 0.145624, 14.9265, 0.160186, 19.8049, 11.3587, 0.291248, 22.062, 0.145624,
            8.15494, 0.232998, 4.95122,
        ],
        [
            18.2648, 0.737619, 14.0499, 16.8599, 0.702494, 14.4362, 0.702494, 18.6161, 4.56621,
            1.93186, 7.37619, 1.75623,
        ],
    ),
    (
        "Simple",
        [2.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 2.0, 0.0, 1.0, 0.0, 1.0],
        [2.0, 0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 2.0, 1.0, 0.0, 0.5, 0.5],
    ),
    (
        "BellmanBudge",
        [16.80, 0.86, 12.95, 1.41, 13.49, 11.93, 1.25, 20.28, 1.80, 8.04, 0.62, 10.57],
        [18.16, 0.69, 12.99, 13.34, 1.07, 11.15, 1.38, 21.07, 7.49, 1.53, 0.92, 10.21],
    ),
    (
        "AlbrechtShanahan",
        [0.238, 0.006, 0.111, 0.006, 0.137, 0.094, 0.016, 0.214, 0.009, 0.080, 0.008, 0.081],
        [0.220, 0.006, 0.104, 0.123, 0.019, 0.103, 0.012, 0.214, 0.062, 0.022, 0.061, 0.052],
    ),
];

/// Named pair of major and minor reference weightings, tonic first
#[derive(Debug, Clone, PartialEq)]
pub struct ToneProfile {
    /// Registry name (e.g. "KrumhanslKessler")
    pub name: String,
    /// Major-key weights by scale degree
    pub major: [f64; 12],
    /// Minor-key weights by scale degree
    pub minor: [f64; 12],
}

impl ToneProfile {
    /// Create a profile
    pub fn new(name: impl Into<String>, major: [f64; 12], minor: [f64; 12]) -> Self {
        Self {
            name: name.into(),
            major,
            minor,
        }
    }

    /// Weights of `key`, indexed by absolute pitch class
    pub fn rotation(&self, key: Key) -> [f64; 12] {
        let base = match key.mode() {
            Mode::Major => &self.major,
            Mode::Minor => &self.minor,
        };
        rotate(base, key.tonic())
    }
}

/// Rotate a tonic-first weighting so the tonic lands on `tonic`
pub fn rotate(weights: &[f64; 12], tonic: u8) -> [f64; 12] {
    let tonic = (tonic % 12) as usize;
    let mut rotated = [0.0; 12];
    for (pc, slot) in rotated.iter_mut().enumerate() {
        *slot = weights[(pc + 12 - tonic) % 12];
    }
    rotated
}

/// A profile expanded into its 24 key rotations
#[derive(Debug, Clone)]
pub struct ProfileTemplates {
    profile: ToneProfile,
    /// Rotations in `Key::all()` order
    rotations: Vec<(Key, [f64; 12])>,
}

impl ProfileTemplates {
    fn expand(profile: ToneProfile) -> Self {
        let rotations = Key::all().map(|key| (key, profile.rotation(key))).collect();
        Self { profile, rotations }
    }

    /// Source profile
    pub fn profile(&self) -> &ToneProfile {
        &self.profile
    }

    /// All 24 rotations, majors first
    pub fn rotations(&self) -> &[(Key, [f64; 12])] {
        &self.rotations
    }
}

/// Registry of named tone profiles
///
/// The built-in bank is shared process-wide and never mutated; custom banks
/// are built by value with [`ProfileBank::with_profile`] or
/// [`ProfileBank::from_csv`].
#[derive(Debug, Clone, Default)]
pub struct ProfileBank {
    entries: Vec<ProfileTemplates>,
}

impl ProfileBank {
    /// Empty bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared bank of the built-in profiles
    pub fn builtin() -> &'static ProfileBank {
        static BANK: OnceLock<ProfileBank> = OnceLock::new();
        BANK.get_or_init(|| {
            BUILTIN_PROFILES
                .iter()
                .fold(ProfileBank::new(), |bank, (name, major, minor)| {
                    bank.with_profile(ToneProfile::new(*name, *major, *minor))
                })
        })
    }

    /// Add a profile, replacing one with the same name
    pub fn insert(&mut self, profile: ToneProfile) {
        let templates = ProfileTemplates::expand(profile);
        match self
            .entries
            .iter_mut()
            .find(|e| e.profile.name == templates.profile.name)
        {
            Some(existing) => *existing = templates,
            None => self.entries.push(templates),
        }
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_profile(mut self, profile: ToneProfile) -> Self {
        self.insert(profile);
        self
    }

    /// Look up a profile's rotations by name
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidProfile` if no profile has this name
    pub fn get(&self, name: &str) -> Result<&ProfileTemplates, AnalysisError> {
        self.entries
            .iter()
            .find(|e| e.profile.name == name)
            .ok_or_else(|| AnalysisError::InvalidProfile(name.to_string()))
    }

    /// Registered profile names, in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.profile.name.as_str())
    }

    /// Number of registered profiles
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no profile is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a comma-separated weight table
    ///
    /// The first two rows are headers. Each following row holds a profile
    /// name, 12 major weights and 12 minor weights. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ProfileFormat` with the 1-based line number for
    /// a short row, an empty name or a weight that is not a finite number.
    ///
    /// # Example
    ///
    /// ```
    /// use pitchscape::features::key::ProfileBank;
    ///
    /// let text = "profile,major,,,,,,,,,,,,minor,,,,,,,,,,,\n\
    ///             ,0,1,2,3,4,5,6,7,8,9,10,11,0,1,2,3,4,5,6,7,8,9,10,11\n\
    ///             Flat,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1\n";
    /// let bank = ProfileBank::from_csv(text)?;
    /// assert_eq!(bank.names().collect::<Vec<_>>(), vec!["Flat"]);
    /// # Ok::<(), pitchscape::AnalysisError>(())
    /// ```
    pub fn from_csv(text: &str) -> Result<Self, AnalysisError> {
        let mut bank = ProfileBank::new();

        for (index, line) in text.lines().enumerate().skip(CSV_HEADER_ROWS) {
            let line_no = index + 1;
            if line.trim().is_empty() {
                continue;
            }

            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            // Trailing empty cells come from spreadsheet exports
            let used = cells
                .iter()
                .rposition(|c| !c.is_empty())
                .map_or(0, |last| last + 1);
            if used != CSV_COLUMNS {
                return Err(AnalysisError::ProfileFormat {
                    line: line_no,
                    message: format!("expected {} columns, got {}", CSV_COLUMNS, used),
                });
            }

            let name = cells[0];
            if name.is_empty() {
                return Err(AnalysisError::ProfileFormat {
                    line: line_no,
                    message: "profile name is empty".to_string(),
                });
            }

            let mut weights = [0.0f64; 24];
            for (slot, cell) in weights.iter_mut().zip(&cells[1..CSV_COLUMNS]) {
                *slot = cell
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| AnalysisError::ProfileFormat {
                        line: line_no,
                        message: format!("'{}' is not a finite number", cell),
                    })?;
            }

            let mut major = [0.0; 12];
            let mut minor = [0.0; 12];
            major.copy_from_slice(&weights[..12]);
            minor.copy_from_slice(&weights[12..]);
            bank.insert(ToneProfile::new(name, major, minor));
        }

        log::debug!("Loaded {} tone profiles from table", bank.len());
        Ok(bank)
    }
}
