//! Party-data strings: parsing and compatibility checks.
//!
//! A party-data string holds one or more entries joined by `_x_`. Each entry
//! is 26 underscore-separated fields; only the species id (field 0), the
//! level (field 1) and the four ability slots (fields 11..15) are used, but
//! every field is validated against its shape. An ability slot of 0 is
//! empty.

use movecompat_kernel::dex::dataset::Dex;
use movecompat_kernel::dex::ids::{AbilityId, SpeciesId};
use movecompat_search::policy::SearchPolicy;
use movecompat_search::search::{search, SearchOutcome, SearchRequest};
use movecompat_search::state::Requirement;

use crate::query::QueryError;

const ENTRY_SEPARATOR: &str = "_x_";
const FIELD_COUNT: usize = 26;
const ABILITY_FIELDS: std::ops::Range<usize> = 11..15;

/// Malformed party-data input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PartyParseError {
    #[error("party data is empty")]
    Empty,
    #[error("entry {entry}: expected {expected} fields, found {found}", expected = FIELD_COUNT)]
    FieldCount { entry: usize, found: usize },
    #[error("entry {entry}: field {field} {value:?} is not {expected}")]
    BadField {
        entry: usize,
        field: usize,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Digits(usize),
    HexDigit,
    Stat,
    EmptyOrZero,
}

impl Shape {
    fn for_field(field: usize) -> Self {
        match field {
            0 | 1 | 11..=14 | 23 | 25 => Self::Digits(3),
            2..=5 => Self::HexDigit,
            6..=10 | 15..=18 => Self::Digits(2),
            19..=22 => Self::Stat,
            _ => Self::EmptyOrZero,
        }
    }

    fn accepts(self, value: &str) -> bool {
        match self {
            Self::Digits(max) => {
                (1..=max).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
            }
            Self::HexDigit => value.len() == 1 && value.bytes().all(|b| b.is_ascii_hexdigit()),
            Self::Stat => matches!(value, "0" | "1" | "2" | "3"),
            Self::EmptyOrZero => value.is_empty() || value == "0",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Digits(3) => "1-3 digits",
            Self::Digits(_) => "1-2 digits",
            Self::HexDigit => "a hex digit",
            Self::Stat => "a digit in 0..=3",
            Self::EmptyOrZero => "empty or 0",
        }
    }
}

/// One decoded party member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartyMember {
    pub species: SpeciesId,
    pub level: u8,
    /// Raw slot values; 0 is empty.
    pub slots: [u16; 4],
}

impl PartyMember {
    /// Non-empty slots as a requirement.
    #[must_use]
    pub fn requirement(&self) -> Requirement {
        self.slots
            .iter()
            .filter(|&&slot| slot != 0)
            .map(|&slot| AbilityId(slot))
            .collect()
    }
}

/// Parse a party-data string.
///
/// # Errors
///
/// Returns [`PartyParseError`] naming the first malformed entry and field.
pub fn parse_party(input: &str) -> Result<Vec<PartyMember>, PartyParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(PartyParseError::Empty);
    }
    input
        .split(ENTRY_SEPARATOR)
        .enumerate()
        .map(|(entry, text)| parse_entry(entry, text))
        .collect()
}

fn parse_entry(entry: usize, text: &str) -> Result<PartyMember, PartyParseError> {
    let fields: Vec<&str> = text.split('_').collect();
    if fields.len() != FIELD_COUNT {
        return Err(PartyParseError::FieldCount {
            entry,
            found: fields.len(),
        });
    }
    for (field, value) in fields.iter().enumerate() {
        let shape = Shape::for_field(field);
        if !shape.accepts(value) {
            return Err(bad_field(entry, field, value, shape.describe()));
        }
    }

    let species = fields[0]
        .parse::<u16>()
        .map_err(|_| bad_field(entry, 0, fields[0], "a species id"))?;
    let level = fields[1]
        .parse::<u8>()
        .map_err(|_| bad_field(entry, 1, fields[1], "a level"))?;
    let mut slots = [0u16; 4];
    for (slot, field) in slots.iter_mut().zip(ABILITY_FIELDS) {
        *slot = fields[field]
            .parse::<u16>()
            .map_err(|_| bad_field(entry, field, fields[field], "an ability id"))?;
    }
    Ok(PartyMember {
        species: SpeciesId(species),
        level,
        slots,
    })
}

fn bad_field(entry: usize, field: usize, value: &str, expected: &'static str) -> PartyParseError {
    PartyParseError::BadField {
        entry,
        field,
        value: value.to_string(),
        expected,
    }
}

/// Check result for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberVerdict {
    pub member: PartyMember,
    pub outcome: SearchOutcome,
}

/// Run the compatibility search for every member.
///
/// # Errors
///
/// Returns [`QueryError::Search`] if a member names an unknown species or
/// ability, or has a level outside the valid range.
pub fn check_party(dex: &Dex, members: &[PartyMember], policy: &SearchPolicy) -> Result<Vec<MemberVerdict>, QueryError> {
    members
        .iter()
        .map(|member| {
            let request = SearchRequest {
                species: member.species,
                level: member.level,
                abilities: member.requirement(),
            };
            let result = search(dex, &request, policy)?;
            tracing::debug!(
                species = %member.species,
                outcome = result.outcome.kind(),
                "party member checked"
            );
            Ok(MemberVerdict {
                member: *member,
                outcome: result.outcome,
            })
        })
        .collect()
}
