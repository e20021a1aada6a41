//! Document identity: the `(year, session, variant)` triple that names one
//! exam instance, and its canonical key-string form (`2024S_A`).

use std::fmt;
use std::str::FromStr;

/// Exam session within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Session {
    /// Spring sitting (April), key code `S`.
    Spring,
    /// Autumn sitting (October), key code `A`.
    Autumn,
}

impl Session {
    /// Single-letter code used in key strings.
    pub fn code(&self) -> char {
        match self {
            Session::Spring => 'S',
            Session::Autumn => 'A',
        }
    }

    /// Term name used in index records ("Spring" / "Autumn").
    pub fn term(&self) -> &'static str {
        match self {
            Session::Spring => "Spring",
            Session::Autumn => "Autumn",
        }
    }

    /// Month name used in display strings ("April" / "October").
    pub fn month(&self) -> &'static str {
        match self {
            Session::Spring => "April",
            Session::Autumn => "October",
        }
    }
}

/// Exam variant within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variant {
    /// Morning paper, key code `A`.
    Morning,
    /// Afternoon paper, key code `B`.
    Afternoon,
}

impl Variant {
    /// Single-letter code used in key strings.
    pub fn code(&self) -> char {
        match self {
            Variant::Morning => 'A',
            Variant::Afternoon => 'B',
        }
    }

    /// Human-readable name ("Morning" / "Afternoon").
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Morning => "Morning",
            Variant::Afternoon => "Afternoon",
        }
    }
}

/// Identity of one exam document.
///
/// The canonical string form is `{year}{session}_{variant}`, e.g. `2024S_A`
/// for the April 2024 morning paper. That string keys every persisted
/// artifact (crop state, rendered images, tags, index records).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentKey {
    pub year: u16,
    pub session: Session,
    pub variant: Variant,
}

impl DocumentKey {
    pub fn new(year: u16, session: Session, variant: Variant) -> Self {
        Self {
            year,
            session,
            variant,
        }
    }

    /// Human-readable name, e.g. "2024 April - Morning".
    pub fn display_name(&self) -> String {
        format!(
            "{} {} - {}",
            self.year,
            self.session.month(),
            self.variant.name()
        )
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}_{}",
            self.year,
            self.session.code(),
            self.variant.code()
        )
    }
}

/// Error parsing a document key string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParseError(String);

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid document key: '{}'", self.0)
    }
}

impl std::error::Error for KeyParseError {}

impl FromStr for DocumentKey {
    type Err = KeyParseError;

    /// Parse the canonical `{year}{S|A}_{A|B}` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || KeyParseError(s.to_string());

        let mut chars = s.chars();
        let year: String = chars.by_ref().take(4).collect();
        let year: u16 = year.parse().map_err(|_| err())?;

        let session = match chars.next() {
            Some('S') => Session::Spring,
            Some('A') => Session::Autumn,
            _ => return Err(err()),
        };
        if chars.next() != Some('_') {
            return Err(err());
        }
        let variant = match chars.next() {
            Some('A') => Variant::Morning,
            Some('B') => Variant::Afternoon,
            _ => return Err(err()),
        };
        if chars.next().is_some() {
            return Err(err());
        }

        Ok(DocumentKey::new(year, session, variant))
    }
}
