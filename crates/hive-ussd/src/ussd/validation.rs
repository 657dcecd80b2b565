use std::fmt;

use serde::{Deserialize, Serialize};

pub const MAX_HIVES: u32 = 1_000;
pub const MIN_HEALTH_RATING: u8 = 1;
pub const MAX_HEALTH_RATING: u8 = 5;

/// Questionnaire fields in the order they are asked and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    HiveCount,
    HealthRating,
    ExperienceYears,
    PreventionPractice,
    Location,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::HiveCount,
        Field::HealthRating,
        Field::ExperienceYears,
        Field::PreventionPractice,
        Field::Location,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Field::HiveCount => "hive_count",
            Field::HealthRating => "health_rating",
            Field::ExperienceYears => "experience_years",
            Field::PreventionPractice => "prevention_practice",
            Field::Location => "location",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    Empty,
    NonNumeric,
    TooLow,
    TooHigh,
    InvalidChoice,
}

impl ReasonCode {
    pub const fn code(self) -> &'static str {
        match self {
            ReasonCode::Empty => "EMPTY",
            ReasonCode::NonNumeric => "NON_NUMERIC",
            ReasonCode::TooLow => "TOO_LOW",
            ReasonCode::TooHigh => "TOO_HIGH",
            ReasonCode::InvalidChoice => "INVALID_CHOICE",
        }
    }
}

/// Rejected answer. The user-facing wording lives in the screen catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field} rejected with {}", .reason.code())]
pub struct ValidationError {
    pub field: Field,
    pub reason: ReasonCode,
}

impl ValidationError {
    const fn new(field: Field, reason: ReasonCode) -> Self {
        Self { field, reason }
    }
}

/// Typed value produced by a single validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedValue {
    Count(u32),
    Rating(u8),
    Years(u32),
    Flag(bool),
    Text(String),
}

pub fn validate(field: Field, raw: &str) -> Result<ValidatedValue, ValidationError> {
    match field {
        Field::HiveCount => hive_count(raw).map(ValidatedValue::Count),
        Field::HealthRating => health_rating(raw).map(ValidatedValue::Rating),
        Field::ExperienceYears => experience_years(raw).map(ValidatedValue::Years),
        Field::PreventionPractice => prevention_practice(raw).map(ValidatedValue::Flag),
        Field::Location => Ok(ValidatedValue::Text(location(raw))),
    }
}

/// Only the digits are kept, so `12a3` reads as 123.
pub fn hive_count(raw: &str) -> Result<u32, ValidationError> {
    let err = |reason| ValidationError::new(Field::HiveCount, reason);
    if raw.trim().is_empty() {
        return Err(err(ReasonCode::Empty));
    }

    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(err(ReasonCode::NonNumeric));
    }

    let value = parse_digits(&digits).ok_or(err(ReasonCode::TooHigh))?;
    match value {
        0 => Err(err(ReasonCode::TooLow)),
        count if count > MAX_HIVES => Err(err(ReasonCode::TooHigh)),
        count => Ok(count),
    }
}

pub fn health_rating(raw: &str) -> Result<u8, ValidationError> {
    let err = |reason| ValidationError::new(Field::HealthRating, reason);
    let value = strict_number(raw).map_err(err)?;
    if value < u32::from(MIN_HEALTH_RATING) {
        Err(err(ReasonCode::TooLow))
    } else if value > u32::from(MAX_HEALTH_RATING) {
        Err(err(ReasonCode::TooHigh))
    } else {
        Ok(value as u8)
    }
}

pub fn experience_years(raw: &str) -> Result<u32, ValidationError> {
    strict_number(raw).map_err(|reason| ValidationError::new(Field::ExperienceYears, reason))
}

/// Menu answer: `1` for yes, `2` for no. A blank answer is just another invalid choice.
pub fn prevention_practice(raw: &str) -> Result<bool, ValidationError> {
    match raw.trim() {
        "1" => Ok(true),
        "2" => Ok(false),
        _ => Err(ValidationError::new(
            Field::PreventionPractice,
            ReasonCode::InvalidChoice,
        )),
    }
}

pub fn location(raw: &str) -> String {
    raw.trim().to_string()
}

fn strict_number(raw: &str) -> Result<u32, ReasonCode> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ReasonCode::Empty);
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ReasonCode::NonNumeric);
    }
    parse_digits(trimmed).ok_or(ReasonCode::TooHigh)
}

// Only overflow can fail here since callers pass ASCII digits.
fn parse_digits(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok()
}

/// Fully validated questionnaire, ready for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    pub hive_count: u32,
    pub health_rating: u8,
    pub experience_years: u32,
    pub prevention_practice: bool,
    pub location: String,
}

impl AnswerSet {
    /// Validates the raw answers in questionnaire order; the first rejection wins.
    /// `answers` follows [`Field::ALL`]; a missing entry counts as an empty answer.
    pub fn from_answers(answers: &[String]) -> Result<Self, ValidationError> {
        let raw = |index: usize| answers.get(index).map(String::as_str).unwrap_or("");

        Ok(Self {
            hive_count: hive_count(raw(0))?,
            health_rating: health_rating(raw(1))?,
            experience_years: experience_years(raw(2))?,
            prevention_practice: prevention_practice(raw(3))?,
            location: location(raw(4)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(values: [&str; 5]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn hive_count_boundaries() {
        assert_eq!(
            hive_count("0"),
            Err(ValidationError::new(Field::HiveCount, ReasonCode::TooLow))
        );
        assert_eq!(
            hive_count("1001"),
            Err(ValidationError::new(Field::HiveCount, ReasonCode::TooHigh))
        );
        assert_eq!(hive_count("1"), Ok(1));
        assert_eq!(hive_count("1000"), Ok(1000));
    }

    #[test]
    fn hive_count_extracts_digits_from_mixed_input() {
        assert_eq!(hive_count("12a3"), Ok(123));
        assert_eq!(hive_count(" 5 hives"), Ok(5));
    }

    #[test]
    fn hive_count_reports_empty_and_non_numeric_separately() {
        assert_eq!(hive_count("  ").map_err(|e| e.reason), Err(ReasonCode::Empty));
        assert_eq!(
            hive_count("many").map_err(|e| e.reason),
            Err(ReasonCode::NonNumeric)
        );
        assert_eq!(
            hive_count("99999999999").map_err(|e| e.reason),
            Err(ReasonCode::TooHigh)
        );
    }

    #[test]
    fn health_rating_is_bounded_inclusive() {
        assert_eq!(health_rating("1"), Ok(1));
        assert_eq!(health_rating("5"), Ok(5));
        assert_eq!(health_rating("0").map_err(|e| e.reason), Err(ReasonCode::TooLow));
        assert_eq!(health_rating("6").map_err(|e| e.reason), Err(ReasonCode::TooHigh));
        assert_eq!(
            health_rating("4a").map_err(|e| e.reason),
            Err(ReasonCode::NonNumeric)
        );
    }

    #[test]
    fn experience_has_no_upper_bound() {
        assert_eq!(experience_years("0"), Ok(0));
        assert_eq!(experience_years("45"), Ok(45));
        assert_eq!(
            experience_years("-2").map_err(|e| e.reason),
            Err(ReasonCode::NonNumeric)
        );
    }

    #[test]
    fn prevention_accepts_only_menu_choices() {
        assert_eq!(prevention_practice("1"), Ok(true));
        assert_eq!(prevention_practice("2"), Ok(false));
        assert_eq!(
            prevention_practice("yes").map_err(|e| e.reason),
            Err(ReasonCode::InvalidChoice)
        );
    }

    #[test]
    fn dispatch_returns_typed_values() {
        assert_eq!(
            validate(Field::Location, " Nairobi-Kasarani "),
            Ok(ValidatedValue::Text("Nairobi-Kasarani".to_string()))
        );
        assert_eq!(
            validate(Field::HealthRating, "3"),
            Ok(ValidatedValue::Rating(3))
        );
        assert_eq!(validate(Field::Location, ""), Ok(ValidatedValue::Text(String::new())));
    }

    #[test]
    fn answer_set_reports_first_failure_in_order() {
        let err = AnswerSet::from_answers(&answers(["0", "9", "x", "3", ""]))
            .expect_err("hive count rejected first");
        assert_eq!(err.field, Field::HiveCount);

        let err = AnswerSet::from_answers(&answers(["5", "9", "x", "3", ""]))
            .expect_err("health rating rejected next");
        assert_eq!(err.field, Field::HealthRating);
    }

    #[test]
    fn answer_set_builds_from_valid_answers() {
        let set = AnswerSet::from_answers(&answers(["5", "4", "3", "1", "Nairobi-Kasarani"]))
            .expect("valid answers");
        assert_eq!(
            set,
            AnswerSet {
                hive_count: 5,
                health_rating: 4,
                experience_years: 3,
                prevention_practice: true,
                location: "Nairobi-Kasarani".to_string(),
            }
        );
    }

    #[test]
    fn missing_answers_are_rejected() {
        let err = AnswerSet::from_answers(&answers(["5", "4", "3", "", "Kitui"]))
            .expect_err("prevention missing");
        assert_eq!(err.field, Field::PreventionPractice);
        assert_eq!(err.reason, ReasonCode::InvalidChoice);

        let err = AnswerSet::from_answers(&["5".to_string()]).expect_err("health missing");
        assert_eq!(err.field, Field::HealthRating);
        assert_eq!(err.reason, ReasonCode::Empty);
    }
}
