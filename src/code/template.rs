//! Declarative per-kind code templates.
//!
//! A template is an ordered list of [`Segment`]s. Every segment has a fixed
//! width and character class, so the same list drives rendering (stem plus
//! tail) and validation. The last segment is always the tail: the only part
//! that changes between retries.

use chrono::{DateTime, Datelike, Utc};

use super::{Attributes, EntityKind};
use crate::error::FormatError;
use crate::ports::Entropy;

const DIGITS: &[u8] = b"0123456789";
const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHANUMERIC: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Pads consonant segments when a name is too short.
const FILLER: char = 'X';

/// Character class a single code position must belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// `0-9`.
    Digit,
    /// `A-Z`.
    Letter,
    /// `0-9` or `A-Z`.
    Alphanumeric,
}

impl CharClass {
    /// Returns `true` if `c` belongs to this class.
    #[must_use]
    pub const fn admits(self, c: char) -> bool {
        match self {
            Self::Digit => c.is_ascii_digit(),
            Self::Letter => c.is_ascii_uppercase(),
            Self::Alphanumeric => c.is_ascii_digit() || c.is_ascii_uppercase(),
        }
    }

    const fn alphabet(self) -> &'static [u8] {
        match self {
            Self::Digit => DIGITS,
            Self::Letter => LETTERS,
            Self::Alphanumeric => ALPHANUMERIC,
        }
    }

    const fn describe(self) -> &'static str {
        match self {
            Self::Digit => "a digit",
            Self::Letter => "an uppercase letter",
            Self::Alphanumeric => "an uppercase letter or digit",
        }
    }
}

/// One fixed-width piece of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Fixed text, e.g. the `SCH` prefix.
    Literal(&'static str),
    /// Last `width` digits found in an attribute, zero-padded on the left.
    TrailingDigits {
        /// Source attribute.
        attribute: &'static str,
        /// Number of digits kept.
        width: usize,
    },
    /// First `width` consonants of an attribute, uppercased, `X`-padded.
    Consonants {
        /// Source attribute.
        attribute: &'static str,
        /// Number of letters kept.
        width: usize,
    },
    /// A positive whole number attribute, zero-padded.
    Number {
        /// Source attribute.
        attribute: &'static str,
        /// Rendered width; also bounds the value.
        width: usize,
    },
    /// A single-letter attribute, uppercased.
    Letter {
        /// Source attribute.
        attribute: &'static str,
    },
    /// A four-digit year attribute rendered as `yy`.
    YearOf {
        /// Source attribute.
        attribute: &'static str,
    },
    /// Current year as `yy`.
    Year2,
    /// Current year as `yyyy`.
    Year4,
    /// Current month as `mm`.
    Month,
    /// Random tail drawn from the entropy source.
    Random {
        /// Alphabet the characters are drawn from.
        class: CharClass,
        /// Number of characters.
        width: usize,
    },
    /// Tail holding the 1-based attempt number, zero-padded.
    Counter {
        /// Number of digits.
        width: usize,
    },
}

impl Segment {
    /// Number of characters this segment occupies.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Literal(text) => text.len(),
            Self::TrailingDigits { width, .. }
            | Self::Consonants { width, .. }
            | Self::Number { width, .. }
            | Self::Random { width, .. }
            | Self::Counter { width } => width,
            Self::Letter { .. } => 1,
            Self::YearOf { .. } | Self::Year2 | Self::Month => 2,
            Self::Year4 => 4,
        }
    }

    /// Character class of every position; `None` for literals.
    const fn class(self) -> Option<CharClass> {
        match self {
            Self::Literal(_) => None,
            Self::Consonants { .. } | Self::Letter { .. } => Some(CharClass::Letter),
            Self::Random { class, .. } => Some(class),
            _ => Some(CharClass::Digit),
        }
    }

    const fn attribute(self) -> Option<&'static str> {
        match self {
            Self::TrailingDigits { attribute, .. }
            | Self::Consonants { attribute, .. }
            | Self::Number { attribute, .. }
            | Self::Letter { attribute }
            | Self::YearOf { attribute } => Some(attribute),
            _ => None,
        }
    }

    /// Whether this segment is regenerated on every attempt.
    #[must_use]
    pub const fn is_tail(self) -> bool {
        matches!(self, Self::Random { .. } | Self::Counter { .. })
    }

    const fn uses_clock(self) -> bool {
        matches!(self, Self::Year2 | Self::Year4 | Self::Month)
    }

    fn render(self, attributes: &Attributes, now: Option<DateTime<Utc>>) -> Result<String, String> {
        match self {
            Self::Literal(text) => Ok(text.to_string()),
            Self::TrailingDigits { attribute, width } => {
                let digits: Vec<char> =
                    required(attributes, attribute)?.chars().filter(char::is_ascii_digit).collect();
                if digits.is_empty() {
                    return Err(format!("`{attribute}` must contain at least one digit"));
                }
                let kept: String = digits[digits.len().saturating_sub(width)..].iter().collect();
                Ok(format!("{kept:0>width$}"))
            }
            Self::Consonants { attribute, width } => {
                let value = required(attributes, attribute)?;
                if !value.chars().any(|c| c.is_ascii_alphabetic()) {
                    return Err(format!("`{attribute}` must contain at least one letter"));
                }
                let mut letters: String = value
                    .chars()
                    .filter(|c| c.is_ascii_alphabetic() && !is_vowel(*c))
                    .map(|c| c.to_ascii_uppercase())
                    .take(width)
                    .collect();
                while letters.len() < width {
                    letters.push(FILLER);
                }
                Ok(letters)
            }
            Self::Number { attribute, width } => {
                let max = capacity(width) - 1;
                let value = required(attributes, attribute)?;
                let parsed = value
                    .bytes()
                    .all(|b| b.is_ascii_digit())
                    .then(|| value.parse::<u64>().ok())
                    .flatten();
                match parsed {
                    Some(n) if (1..=max).contains(&n) => Ok(format!("{n:0width$}")),
                    _ => Err(format!("`{attribute}` must be a whole number between 1 and {max}")),
                }
            }
            Self::Letter { attribute } => {
                let value = required(attributes, attribute)?;
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => {
                        Ok(c.to_ascii_uppercase().to_string())
                    }
                    _ => Err(format!("`{attribute}` must be a single letter")),
                }
            }
            Self::YearOf { attribute } => {
                let value = required(attributes, attribute)?;
                if value.len() == 4 && value.chars().all(|c| c.is_ascii_digit()) {
                    Ok(value[2..].to_string())
                } else {
                    Err(format!("`{attribute}` must be a four-digit year"))
                }
            }
            Self::Year2 | Self::Year4 | Self::Month => {
                let now = now.ok_or_else(|| "a clock reading is required".to_string())?;
                Ok(match self {
                    Self::Year2 => now.format("%y").to_string(),
                    Self::Year4 => format!("{:04}", now.year()),
                    _ => format!("{:02}", now.month()),
                })
            }
            Self::Random { .. } | Self::Counter { .. } => {
                Err("tail segments are not part of the stem".to_string())
            }
        }
    }

    fn render_tail(self, attempt: u32, entropy: &dyn Entropy) -> Option<String> {
        match self {
            Self::Random { class, width } => {
                let alphabet = class.alphabet();
                Some(
                    (0..width)
                        .map(|_| char::from(alphabet[entropy.pick(alphabet.len()) % alphabet.len()]))
                        .collect(),
                )
            }
            Self::Counter { width } => (u64::from(attempt) < capacity(width))
                .then(|| format!("{attempt:0width$}")),
            _ => None,
        }
    }

    fn describe(self) -> String {
        match self {
            Self::Literal(text) => format!("\"{text}\""),
            Self::TrailingDigits { attribute, width } => {
                format!("{width} digits (last of {attribute})")
            }
            Self::Consonants { attribute, width } => {
                format!("{width} letters (consonants of {attribute})")
            }
            Self::Number { attribute, width } => format!("{width} digits ({attribute})"),
            Self::Letter { attribute } => format!("1 letter ({attribute})"),
            Self::YearOf { attribute } => format!("2 digits ({attribute}, yy)"),
            Self::Year2 => "2 digits (year, yy)".to_string(),
            Self::Year4 => "4 digits (year)".to_string(),
            Self::Month => "2 digits (month)".to_string(),
            Self::Random { class: CharClass::Digit, width } => format!("{width} random digits"),
            Self::Random { width, .. } => format!("{width} random letters/digits"),
            Self::Counter { width } => format!("{width}-digit counter"),
        }
    }
}

/// The format rule for one entity kind.
#[derive(Debug)]
pub struct Template {
    kind: EntityKind,
    segments: &'static [Segment],
}

impl Template {
    /// Kind this template formats.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Ordered segments, tail last.
    #[must_use]
    pub const fn segments(&self) -> &'static [Segment] {
        self.segments
    }

    /// Exact length of every code of this kind.
    #[must_use]
    pub fn code_len(&self) -> usize {
        self.segments.iter().map(|s| s.width()).sum()
    }

    /// Attribute names the stem is derived from, in template order.
    #[must_use]
    pub fn required_attributes(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for name in self.segments.iter().filter_map(|s| s.attribute()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Whether rendering needs the current date.
    #[must_use]
    pub fn needs_clock(&self) -> bool {
        self.segments.iter().any(|s| s.uses_clock())
    }

    /// Renders every segment except the tail.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when an attribute is missing or malformed.
    pub fn stem(&self, attributes: &Attributes, now: Option<DateTime<Utc>>) -> Result<String, String> {
        self.segments
            .iter()
            .filter(|s| !s.is_tail())
            .map(|s| s.render(attributes, now))
            .collect()
    }

    /// Renders the tail for a 1-based attempt number.
    ///
    /// Returns `None` when a counter tail has no values left.
    #[must_use]
    pub fn tail(&self, attempt: u32, entropy: &dyn Entropy) -> Option<String> {
        self.segments.last().and_then(|s| s.render_tail(attempt, entropy))
    }

    /// Checks length and per-position character classes without touching any store.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormatError`] found.
    pub fn validate(&self, candidate: &str) -> Result<(), FormatError> {
        let chars: Vec<char> = candidate.chars().collect();
        let expected = self.code_len();
        if chars.len() != expected {
            return Err(FormatError::Length { kind: self.kind, expected, actual: chars.len() });
        }

        let mut offset = 0;
        for segment in self.segments {
            let width = segment.width();
            let slice = &chars[offset..offset + width];
            if let Segment::Literal(text) = *segment {
                let found: String = slice.iter().collect();
                if found != text {
                    return Err(FormatError::Prefix { kind: self.kind, expected: text, found });
                }
            } else if let Some(class) = segment.class() {
                if let Some(i) = slice.iter().position(|c| !class.admits(*c)) {
                    return Err(FormatError::Character {
                        kind: self.kind,
                        position: offset + i,
                        found: slice[i],
                        expected: class.describe(),
                    });
                }
            }
            if *segment == Segment::Month {
                let month: String = slice.iter().collect();
                if !matches!(month.parse::<u32>(), Ok(1..=12)) {
                    return Err(FormatError::Month { kind: self.kind, found: month });
                }
            }
            offset += width;
        }
        Ok(())
    }

    /// Human-readable description of the format.
    #[must_use]
    pub fn shape(&self) -> String {
        self.segments.iter().map(|s| s.describe()).collect::<Vec<_>>().join(" + ")
    }
}

fn required<'a>(attributes: &'a Attributes, name: &str) -> Result<&'a str, String> {
    attributes
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("missing required attribute `{name}`"))
}

const fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_uppercase(), 'A' | 'E' | 'I' | 'O' | 'U')
}

/// `10^width`, saturating.
fn capacity(width: usize) -> u64 {
    (0..width).fold(1u64, |acc, _| acc.saturating_mul(10))
}

static SCHOOL: Template = Template {
    kind: EntityKind::School,
    segments: &[
        Segment::Literal("SCH"),
        Segment::TrailingDigits { attribute: "registrationNumber", width: 2 },
        Segment::Consonants { attribute: "name", width: 2 },
        Segment::Year2,
        Segment::Random { class: CharClass::Alphanumeric, width: 3 },
    ],
};

static EMPLOYEE: Template = Template {
    kind: EntityKind::Employee,
    segments: &[Segment::Literal("EMP"), Segment::Random { class: CharClass::Digit, width: 6 }],
};

static STUDENT: Template = Template {
    kind: EntityKind::Student,
    segments: &[Segment::Literal("STU"), Segment::Random { class: CharClass::Digit, width: 8 }],
};

static CLASS: Template = Template {
    kind: EntityKind::Class,
    segments: &[
        Segment::Literal("CLS"),
        Segment::Number { attribute: "level", width: 2 },
        Segment::Letter { attribute: "section" },
        Segment::TrailingDigits { attribute: "batchCode", width: 2 },
        Segment::Counter { width: 3 },
    ],
};

static BATCH: Template = Template {
    kind: EntityKind::Batch,
    segments: &[
        Segment::Literal("BAT"),
        Segment::YearOf { attribute: "startYear" },
        Segment::YearOf { attribute: "endYear" },
        Segment::Counter { width: 3 },
    ],
};

static SUBJECT: Template = Template {
    kind: EntityKind::Subject,
    segments: &[
        Segment::Literal("SUB"),
        Segment::Consonants { attribute: "name", width: 3 },
        Segment::Counter { width: 3 },
    ],
};

static BUS: Template = Template {
    kind: EntityKind::Bus,
    segments: &[
        Segment::Literal("BUS"),
        Segment::Consonants { attribute: "route", width: 2 },
        Segment::Number { attribute: "capacity", width: 2 },
        Segment::Counter { width: 3 },
    ],
};

static FEE: Template = Template {
    kind: EntityKind::Fee,
    segments: &[
        Segment::Literal("FEE"),
        Segment::Year4,
        Segment::Month,
        Segment::Random { class: CharClass::Alphanumeric, width: 4 },
    ],
};

static ASSIGNMENT: Template = Template {
    kind: EntityKind::Assignment,
    segments: &[
        Segment::Literal("ASG"),
        Segment::Year4,
        Segment::Month,
        Segment::Random { class: CharClass::Alphanumeric, width: 4 },
    ],
};

static SAFETY_ALERT: Template = Template {
    kind: EntityKind::SafetyAlert,
    segments: &[
        Segment::Literal("ALERT"),
        Segment::Year4,
        Segment::Month,
        Segment::Random { class: CharClass::Alphanumeric, width: 4 },
    ],
};

pub(crate) fn for_kind(kind: EntityKind) -> &'static Template {
    match kind {
        EntityKind::School => &SCHOOL,
        EntityKind::Employee => &EMPLOYEE,
        EntityKind::Student => &STUDENT,
        EntityKind::Class => &CLASS,
        EntityKind::Batch => &BATCH,
        EntityKind::Subject => &SUBJECT,
        EntityKind::Bus => &BUS,
        EntityKind::Fee => &FEE,
        EntityKind::Assignment => &ASSIGNMENT,
        EntityKind::SafetyAlert => &SAFETY_ALERT,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::TimeZone;

    use super::*;

    /// Entropy that always picks the same index.
    struct Constant(usize);

    impl Entropy for Constant {
        fn pick(&self, _bound: usize) -> usize {
            self.0
        }
    }

    /// Entropy that walks up from zero.
    struct Sequence(AtomicUsize);

    impl Entropy for Sequence {
        fn pick(&self, bound: usize) -> usize {
            self.0.fetch_add(1, Ordering::SeqCst) % bound
        }
    }

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    fn march_2024() -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).unwrap())
    }

    #[test]
    fn code_lengths_match_published_formats() {
        let expected = [
            (EntityKind::School, 12),
            (EntityKind::Employee, 9),
            (EntityKind::Student, 11),
            (EntityKind::Class, 11),
            (EntityKind::Batch, 10),
            (EntityKind::Subject, 9),
            (EntityKind::Bus, 10),
            (EntityKind::Fee, 13),
            (EntityKind::Assignment, 13),
            (EntityKind::SafetyAlert, 15),
        ];
        for (kind, len) in expected {
            assert_eq!(kind.template().code_len(), len, "{kind}");
        }
    }

    #[test]
    fn every_template_has_exactly_one_trailing_tail() {
        for kind in EntityKind::ALL {
            let segments = kind.template().segments();
            assert!(segments.last().unwrap().is_tail(), "{kind} must end in a tail");
            assert_eq!(segments.iter().filter(|s| s.is_tail()).count(), 1, "{kind}");
            assert!(matches!(segments[0], Segment::Literal(_)), "{kind} starts with a literal");
        }
    }

    #[test]
    fn school_stem_uses_registration_digits_consonants_and_year() {
        let attributes =
            attrs(&[("name", "Sunrise Academy"), ("registrationNumber", "REG2023004421")]);
        let stem = SCHOOL.stem(&attributes, march_2024()).unwrap();
        assert_eq!(stem, "SCH21SN24");
    }

    #[test]
    fn consonants_are_padded_with_filler() {
        let attributes = attrs(&[("name", "Aue"), ("registrationNumber", "7")]);
        let stem = SCHOOL.stem(&attributes, march_2024()).unwrap();
        assert_eq!(stem, "SCH07XX24");
    }

    #[test]
    fn registration_number_without_digits_is_rejected() {
        let attributes = attrs(&[("name", "Sunrise"), ("registrationNumber", "REG")]);
        let err = SCHOOL.stem(&attributes, march_2024()).unwrap_err();
        assert!(err.contains("registrationNumber"));
    }

    #[test]
    fn blank_attribute_counts_as_missing() {
        let attributes = attrs(&[("name", "   "), ("registrationNumber", "42")]);
        let err = SCHOOL.stem(&attributes, march_2024()).unwrap_err();
        assert!(err.contains("missing required attribute `name`"));
    }

    #[test]
    fn class_stem_combines_level_section_and_batch() {
        let attributes = attrs(&[("batchCode", "BATCH24"), ("level", "7"), ("section", "b")]);
        assert_eq!(CLASS.stem(&attributes, None).unwrap(), "CLS07B24");
    }

    #[test]
    fn class_level_out_of_range_is_rejected() {
        for level in ["0", "100", "ten", "+7", "-3", "7.0"] {
            let attributes = attrs(&[("batchCode", "B24"), ("level", level), ("section", "A")]);
            assert!(CLASS.stem(&attributes, None).is_err(), "level {level}");
        }
    }

    #[test]
    fn section_must_be_one_letter() {
        let attributes = attrs(&[("batchCode", "B24"), ("level", "3"), ("section", "AB")]);
        assert!(CLASS.stem(&attributes, None).unwrap_err().contains("single letter"));
    }

    #[test]
    fn batch_stem_uses_two_digit_years() {
        let attributes = attrs(&[("startYear", "2024"), ("endYear", "2025")]);
        assert_eq!(BATCH.stem(&attributes, None).unwrap(), "BAT2425");
        let bad = attrs(&[("startYear", "24"), ("endYear", "2025")]);
        assert!(BATCH.stem(&bad, None).is_err());
    }

    #[test]
    fn bus_stem_uses_route_consonants_and_capacity() {
        let attributes = attrs(&[("route", "north loop"), ("capacity", "42")]);
        assert_eq!(BUS.stem(&attributes, None).unwrap(), "BUSNR42");
        let signed = attrs(&[("route", "north loop"), ("capacity", "+42")]);
        assert!(BUS.stem(&signed, None).is_err());
    }

    #[test]
    fn dated_stems_use_four_digit_year_and_month() {
        assert_eq!(FEE.stem(&Attributes::new(), march_2024()).unwrap(), "FEE202403");
        assert_eq!(ASSIGNMENT.stem(&Attributes::new(), march_2024()).unwrap(), "ASG202403");
        assert_eq!(SAFETY_ALERT.stem(&Attributes::new(), march_2024()).unwrap(), "ALERT202403");
    }

    #[test]
    fn random_tail_draws_from_class_alphabet() {
        assert_eq!(STUDENT.tail(1, &Constant(3)).unwrap(), "33333333");
        assert_eq!(SCHOOL.tail(1, &Constant(10)).unwrap(), "AAA");
        let walking = Sequence(AtomicUsize::new(0));
        assert_eq!(EMPLOYEE.tail(1, &walking).unwrap(), "012345");
    }

    #[test]
    fn counter_tail_counts_attempts_until_width_is_used_up() {
        let entropy = Constant(0);
        assert_eq!(CLASS.tail(1, &entropy).unwrap(), "001");
        assert_eq!(CLASS.tail(999, &entropy).unwrap(), "999");
        assert!(CLASS.tail(1000, &entropy).is_none());
        assert_eq!(BATCH.tail(1, &entropy).unwrap(), "001");
        assert_eq!(BUS.tail(100, &entropy).unwrap(), "100");
        assert!(BATCH.tail(1000, &entropy).is_none());
    }

    #[test]
    fn validate_accepts_well_formed_codes() {
        assert!(SCHOOL.validate("SCH21SN24A7Z").is_ok());
        assert!(EMPLOYEE.validate("EMP123456").is_ok());
        assert!(STUDENT.validate("STU12345678").is_ok());
        assert!(FEE.validate("FEE202403AB12").is_ok());
        assert!(SAFETY_ALERT.validate("ALERT202412ZZZZ").is_ok());
        assert!(CLASS.validate("CLS10A24001").is_ok());
        assert!(BATCH.validate("BAT2425001").is_ok());
        assert!(BUS.validate("BUSNR42001").is_ok());
    }

    #[test]
    fn validate_reports_length_mismatch() {
        let err = EMPLOYEE.validate("EMP12345").unwrap_err();
        assert!(matches!(err, FormatError::Length { expected: 9, actual: 8, .. }));
    }

    #[test]
    fn validate_reports_wrong_prefix() {
        let err = EMPLOYEE.validate("EMX123456").unwrap_err();
        assert!(matches!(err, FormatError::Prefix { .. }));
    }

    #[test]
    fn validate_reports_wrong_character_class_with_position() {
        let err = STUDENT.validate("STU1234567A").unwrap_err();
        assert!(matches!(err, FormatError::Character { position: 10, found: 'A', .. }));
        assert!(SCHOOL.validate("SCH21sn24A7Z").is_err());
        assert!(SCHOOL.validate("SCH21SN24a7z").is_err());
    }

    #[test]
    fn validate_rejects_impossible_month() {
        let err = ASSIGNMENT.validate("ASG202413ABCD").unwrap_err();
        assert!(matches!(err, FormatError::Month { .. }));
        assert!(ASSIGNMENT.validate("ASG202400ABCD").is_err());
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        assert!(EMPLOYEE.validate("EMP12345é").is_err());
    }

    #[test]
    fn required_attributes_follow_template_order() {
        assert_eq!(SCHOOL.required_attributes(), vec!["registrationNumber", "name"]);
        assert_eq!(CLASS.required_attributes(), vec!["level", "section", "batchCode"]);
        assert!(STUDENT.required_attributes().is_empty());
    }

    #[test]
    fn only_dated_templates_need_the_clock() {
        assert!(SCHOOL.needs_clock());
        assert!(FEE.needs_clock());
        assert!(!STUDENT.needs_clock());
        assert!(!CLASS.needs_clock());
    }

    #[test]
    fn shape_describes_each_segment() {
        assert_eq!(STUDENT.shape(), "\"STU\" + 8 random digits");
        assert!(CLASS.shape().ends_with("3-digit counter"));
    }
}
