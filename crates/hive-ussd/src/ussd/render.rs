use std::fmt;

use super::catalog::{
    validation_message, CatalogLookupMiss, Language, Notice, ScreenCatalog, LANGUAGE_STEP,
    QUOTE_STEP,
};
use super::scoring::{Kes, Quote};
use super::session::{Decision, Outcome, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Keeps the session open for another input.
    Continue,
    /// Closes the session on the handset.
    End,
}

impl ReplyKind {
    pub const fn prefix(self) -> &'static str {
        match self {
            ReplyKind::Continue => "CON ",
            ReplyKind::End => "END ",
        }
    }
}

/// Text body returned to the gateway. `Display` yields the exact wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireReply {
    kind: ReplyKind,
    message: String,
}

impl WireReply {
    pub fn continues(message: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Continue,
            message: message.into(),
        }
    }

    pub fn ends(message: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::End,
            message: message.into(),
        }
    }

    /// Generic terminal reply for faults the caller should not see details of.
    pub fn system_error(language: Language) -> Self {
        Self::ends(Notice::SystemError.text(language))
    }

    pub fn kind(&self) -> ReplyKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_terminal(&self) -> bool {
        self.kind == ReplyKind::End
    }
}

impl fmt::Display for WireReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.message)
    }
}

pub fn render(decision: &Decision, catalog: &ScreenCatalog) -> Result<WireReply, CatalogLookupMiss> {
    let language = decision.language;

    let reply = match &decision.outcome {
        Outcome::LanguageMenu => {
            WireReply::continues(catalog.prompt_for(LANGUAGE_STEP, language)?.text)
        }
        Outcome::Question { step } => WireReply::continues(catalog.prompt_for(*step, language)?.text),
        Outcome::QuotePresented(quote) => {
            let template = catalog.prompt_for(QUOTE_STEP, language)?.text;
            WireReply::continues(fill_quote(template, quote))
        }
        Outcome::PaymentConfirmed(_) => WireReply::ends(Notice::PaymentInitiated.text(language)),
        Outcome::PaymentCancelled => WireReply::ends(Notice::PaymentCancelled.text(language)),
        Outcome::ValidationError(err) => WireReply::ends(validation_message(err, language)),
        Outcome::SessionError(err) => WireReply::ends(session_notice(*err).text(language)),
    };

    Ok(reply)
}

fn session_notice(err: SessionError) -> Notice {
    match err {
        SessionError::InvalidLanguage => Notice::InvalidLanguage,
        SessionError::InvalidChoice => Notice::InvalidChoice,
        SessionError::InvalidStep(_) => Notice::InvalidStep,
    }
}

fn fill_quote(template: &str, quote: &Quote) -> String {
    template
        .replace("{risk}", &quote.risk_score().to_string())
        .replace("{premium}", &format_kes(quote.premium()))
        .replace("{cover}", &format_kes(quote.cover_amount()))
}

fn format_kes(amount: Kes) -> String {
    group_thousands(amount.amount())
}

/// `10400` renders as `10,400`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
