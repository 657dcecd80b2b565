use std::sync::Arc;

use tracing::debug;

use super::catalog::{Language, ScreenCatalog, LANGUAGE_STEP, QUOTE_STEP};
use super::decoder::SessionHistory;
use super::scoring::{Quote, ScoringEngine};
use super::validation::{AnswerSet, Field, ValidationError};

pub const QUESTION_COUNT: usize = Field::ALL.len();
pub const QUOTE_LEVEL: usize = QUESTION_COUNT + 1;
pub const SETTLEMENT_LEVEL: usize = QUOTE_LEVEL + 1;

const CONFIRM_CHOICE: &str = "1";
const CANCEL_CHOICE: &str = "2";

/// Menu position derived from the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LanguageSelect,
    Question { step: usize },
    QuotePresented,
    PaymentConfirmed,
    PaymentCancelled,
    Error,
}

impl SessionState {
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::PaymentConfirmed | SessionState::PaymentCancelled | SessionState::Error
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("language selector is missing or not one of the menu options")]
    InvalidLanguage,
    #[error("confirmation answer is not one of the menu options")]
    InvalidChoice,
    #[error("no screen exists for step {0}")]
    InvalidStep(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    LanguageMenu,
    Question { step: usize },
    QuotePresented(Quote),
    /// Validated answers handed to the payment collaborator, which prices the collection.
    PaymentConfirmed(AnswerSet),
    PaymentCancelled,
    ValidationError(ValidationError),
    SessionError(SessionError),
}

impl Outcome {
    pub fn state(&self) -> SessionState {
        match self {
            Outcome::LanguageMenu => SessionState::LanguageSelect,
            Outcome::Question { step } => SessionState::Question { step: *step },
            Outcome::QuotePresented(_) => SessionState::QuotePresented,
            Outcome::PaymentConfirmed(_) => SessionState::PaymentConfirmed,
            Outcome::PaymentCancelled => SessionState::PaymentCancelled,
            Outcome::ValidationError(_) | Outcome::SessionError(_) => SessionState::Error,
        }
    }
}

/// What to show next and in which language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub language: Language,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handler {
    LanguageMenu,
    Question,
    Quote,
    Settlement,
}

/// Inclusive level ranges mapped to handlers. Rows never overlap; the first match wins.
const TRANSITIONS: [(usize, usize, Handler); 4] = [
    (LANGUAGE_STEP, LANGUAGE_STEP, Handler::LanguageMenu),
    (1, QUESTION_COUNT, Handler::Question),
    (QUOTE_LEVEL, QUOTE_LEVEL, Handler::Quote),
    (SETTLEMENT_LEVEL, SETTLEMENT_LEVEL, Handler::Settlement),
];

fn route(level: usize) -> Option<Handler> {
    TRANSITIONS
        .iter()
        .find(|(first, last, _)| (*first..=*last).contains(&level))
        .map(|(_, _, handler)| *handler)
}

/// Pure function of the history: the same trail always lands on the same decision,
/// apart from the remote scoring result. Only the quote step calls the scoring engine.
#[derive(Debug, Clone)]
pub struct SessionMachine {
    catalog: Arc<ScreenCatalog>,
    scoring: Arc<ScoringEngine>,
}

impl SessionMachine {
    pub fn new(catalog: Arc<ScreenCatalog>, scoring: Arc<ScoringEngine>) -> Self {
        Self { catalog, scoring }
    }

    pub async fn decide(&self, history: &SessionHistory) -> Decision {
        let level = history.level();
        let selected = history.get(LANGUAGE_STEP).and_then(Language::from_selector);
        let language = selected.unwrap_or(Language::English);
        let decision = |outcome| Decision { language, outcome };

        let Some(handler) = route(level) else {
            return decision(Outcome::SessionError(SessionError::InvalidStep(level)));
        };

        if handler == Handler::LanguageMenu {
            return decision(Outcome::LanguageMenu);
        }
        if selected.is_none() {
            return decision(Outcome::SessionError(SessionError::InvalidLanguage));
        }

        debug!(level, ?handler, %language, "routing ussd step");
        let outcome = match handler {
            Handler::LanguageMenu => Outcome::LanguageMenu,
            Handler::Question => self.question(level, language),
            Handler::Quote => match self.quote(history).await {
                Ok(quote) => Outcome::QuotePresented(quote),
                Err(err) => Outcome::ValidationError(err),
            },
            Handler::Settlement => settle(history),
        };

        decision(outcome)
    }

    fn question(&self, step: usize, language: Language) -> Outcome {
        match self.catalog.prompt_for(step, language) {
            Ok(_) => Outcome::Question { step },
            Err(miss) => Outcome::SessionError(SessionError::InvalidStep(miss.step)),
        }
    }

    async fn quote(&self, history: &SessionHistory) -> Result<Quote, ValidationError> {
        let answers = AnswerSet::from_answers(collected_answers(history))?;
        Ok(self.scoring.score(&answers).await)
    }
}

// No quote survives between callbacks, so confirmation never re-prices.
fn settle(history: &SessionHistory) -> Outcome {
    match history.get(QUOTE_STEP).map(str::trim) {
        Some(CONFIRM_CHOICE) => match AnswerSet::from_answers(collected_answers(history)) {
            Ok(answers) => Outcome::PaymentConfirmed(answers),
            Err(err) => Outcome::ValidationError(err),
        },
        Some(CANCEL_CHOICE) => Outcome::PaymentCancelled,
        _ => Outcome::SessionError(SessionError::InvalidChoice),
    }
}

fn collected_answers(history: &SessionHistory) -> &[String] {
    let entries = history.entries();
    let end = entries.len().min(QUOTE_LEVEL);
    entries.get(1..end).unwrap_or_default()
}
