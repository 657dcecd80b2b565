//! Bilingual screen catalog and message templates.
//!
//! Every user-facing string the menu can emit is defined here. Step screens live in two
//! parallel tables, one per language, which are checked for alignment when the catalog is
//! built so a missing translation fails at startup rather than mid-session.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::{Field, ReasonCode, ValidationError};

pub const LANGUAGE_STEP: usize = 0;
pub const QUOTE_STEP: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Swahili,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Swahili];

    /// Maps the answer given on the language menu.
    pub fn from_selector(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Language::English),
            "2" => Some(Language::Swahili),
            _ => None,
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Swahili => "sw",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    LanguageMenu,
    Question(Field),
    /// Presents the computed quote; placeholders `{risk}`, `{premium}` and `{cover}`.
    Quote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub step: usize,
    pub kind: ScreenKind,
    pub text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("{language} screen table is empty")]
    Empty { language: Language },
    #[error("step {step} appears twice in the {language} screen table")]
    DuplicateStep { language: Language, step: usize },
    #[error("step {step} is defined for {present} but missing for {missing}")]
    MissingStep {
        step: usize,
        present: Language,
        missing: Language,
    },
    #[error("step {step} has a different screen kind per language")]
    KindMismatch { step: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no screen defined for step {step}")]
pub struct CatalogLookupMiss {
    pub step: usize,
}

/// Read-only, index-aligned screen tables. Built once at startup and shared by `Arc`.
#[derive(Debug, Clone)]
pub struct ScreenCatalog {
    english: BTreeMap<usize, Screen>,
    swahili: BTreeMap<usize, Screen>,
}

impl ScreenCatalog {
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_tables(english_screens(), swahili_screens())
    }

    pub fn from_tables(english: Vec<Screen>, swahili: Vec<Screen>) -> Result<Self, CatalogError> {
        let english = index_table(Language::English, english)?;
        let swahili = index_table(Language::Swahili, swahili)?;

        for (step, screen) in &english {
            match swahili.get(step) {
                None => {
                    return Err(CatalogError::MissingStep {
                        step: *step,
                        present: Language::English,
                        missing: Language::Swahili,
                    })
                }
                Some(other) if other.kind != screen.kind => {
                    return Err(CatalogError::KindMismatch { step: *step })
                }
                Some(_) => {}
            }
        }

        if let Some(step) = swahili.keys().find(|step| !english.contains_key(step)) {
            return Err(CatalogError::MissingStep {
                step: *step,
                present: Language::Swahili,
                missing: Language::English,
            });
        }

        Ok(Self { english, swahili })
    }

    pub fn prompt_for(&self, step: usize, language: Language) -> Result<&Screen, CatalogLookupMiss> {
        self.table(language)
            .get(&step)
            .ok_or(CatalogLookupMiss { step })
    }

    pub fn screens(&self, language: Language) -> impl Iterator<Item = &Screen> {
        self.table(language).values()
    }

    /// Number of question screens between the language menu and the quote.
    pub fn question_count(&self) -> usize {
        self.english
            .values()
            .filter(|screen| matches!(screen.kind, ScreenKind::Question(_)))
            .count()
    }

    fn table(&self, language: Language) -> &BTreeMap<usize, Screen> {
        match language {
            Language::English => &self.english,
            Language::Swahili => &self.swahili,
        }
    }
}

fn index_table(
    language: Language,
    screens: Vec<Screen>,
) -> Result<BTreeMap<usize, Screen>, CatalogError> {
    if screens.is_empty() {
        return Err(CatalogError::Empty { language });
    }

    let mut table = BTreeMap::new();
    for screen in screens {
        let step = screen.step;
        if table.insert(step, screen).is_some() {
            return Err(CatalogError::DuplicateStep { language, step });
        }
    }
    Ok(table)
}

const LANGUAGE_MENU: &str = "Welcome to CreditAgri Bee Cover\n1. English\n2. Kiswahili";

fn english_screens() -> Vec<Screen> {
    vec![
        Screen {
            step: LANGUAGE_STEP,
            kind: ScreenKind::LanguageMenu,
            text: LANGUAGE_MENU,
        },
        Screen {
            step: 1,
            kind: ScreenKind::Question(Field::HiveCount),
            text: "How many beehives do you own?",
        },
        Screen {
            step: 2,
            kind: ScreenKind::Question(Field::HealthRating),
            text: "Rate the health of your hives from 1 (poor) to 5 (excellent):",
        },
        Screen {
            step: 3,
            kind: ScreenKind::Question(Field::ExperienceYears),
            text: "How many years have you kept bees?",
        },
        Screen {
            step: 4,
            kind: ScreenKind::Question(Field::PreventionPractice),
            text: "Do you practise pest and disease prevention?\n1. Yes\n2. No",
        },
        Screen {
            step: 5,
            kind: ScreenKind::Question(Field::Location),
            text: "Enter your county and ward (e.g. Nairobi-Kasarani):",
        },
        Screen {
            step: QUOTE_STEP,
            kind: ScreenKind::Quote,
            text: "Your Bee Cover quote\nRisk score: {risk}/100\nPremium: KES {premium}\nCover: KES {cover}\n1. Confirm & Pay\n2. Cancel",
        },
    ]
}

fn swahili_screens() -> Vec<Screen> {
    vec![
        Screen {
            step: LANGUAGE_STEP,
            kind: ScreenKind::LanguageMenu,
            text: LANGUAGE_MENU,
        },
        Screen {
            step: 1,
            kind: ScreenKind::Question(Field::HiveCount),
            text: "Una mizinga mingapi ya nyuki?",
        },
        Screen {
            step: 2,
            kind: ScreenKind::Question(Field::HealthRating),
            text: "Kadiria afya ya mizinga yako kutoka 1 (mbaya) hadi 5 (bora sana):",
        },
        Screen {
            step: 3,
            kind: ScreenKind::Question(Field::ExperienceYears),
            text: "Umefuga nyuki kwa miaka mingapi?",
        },
        Screen {
            step: 4,
            kind: ScreenKind::Question(Field::PreventionPractice),
            text: "Je, unazuia wadudu na magonjwa ya nyuki?\n1. Ndiyo\n2. Hapana",
        },
        Screen {
            step: 5,
            kind: ScreenKind::Question(Field::Location),
            text: "Weka kaunti na wadi yako (mfano Nairobi-Kasarani):",
        },
        Screen {
            step: QUOTE_STEP,
            kind: ScreenKind::Quote,
            text: "Nukuu yako ya Bima ya Nyuki\nAlama ya hatari: {risk}/100\nAda: KES {premium}\nBima: KES {cover}\n1. Thibitisha na Lipa\n2. Ghairi",
        },
    ]
}

/// Terminal messages that are not tied to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    PaymentInitiated,
    PaymentCancelled,
    InvalidLanguage,
    InvalidChoice,
    InvalidStep,
    SystemError,
}

impl Notice {
    pub const fn text(self, language: Language) -> &'static str {
        match (self, language) {
            (Notice::PaymentInitiated, Language::English) => {
                "Payment initiated. Check your phone for the M-Pesa prompt to activate your Bee Cover."
            }
            (Notice::PaymentInitiated, Language::Swahili) => {
                "Malipo yameanzishwa. Angalia simu yako kwa ombi la M-Pesa ili kuanzisha Bima ya Nyuki."
            }
            (Notice::PaymentCancelled, Language::English) => {
                "Quote cancelled. Dial again anytime to get your hives covered."
            }
            (Notice::PaymentCancelled, Language::Swahili) => {
                "Nukuu imeghairiwa. Piga tena wakati wowote kupata bima ya mizinga yako."
            }
            (Notice::InvalidLanguage, Language::English) => {
                "Invalid language choice. Please dial again and select 1 or 2."
            }
            (Notice::InvalidLanguage, Language::Swahili) => {
                "Chaguo la lugha si sahihi. Tafadhali piga tena uchague 1 au 2."
            }
            (Notice::InvalidChoice, Language::English) => "Invalid choice. Please dial again.",
            (Notice::InvalidChoice, Language::Swahili) => {
                "Chaguo si sahihi. Tafadhali piga tena."
            }
            (Notice::InvalidStep, Language::English) => "Invalid step. Please start again.",
            (Notice::InvalidStep, Language::Swahili) => "Hatua si sahihi. Tafadhali anza upya.",
            (Notice::SystemError, Language::English) => {
                "An error occurred. Please try again later."
            }
            (Notice::SystemError, Language::Swahili) => {
                "Hitilafu imetokea. Tafadhali jaribu tena baadaye."
            }
        }
    }
}

/// Localized explanation for a rejected answer.
pub fn validation_message(error: &ValidationError, language: Language) -> &'static str {
    let (english, swahili) = match (error.field, error.reason) {
        (Field::HiveCount, ReasonCode::Empty) => (
            "Please enter the number of hives you own.",
            "Tafadhali weka idadi ya mizinga uliyo nayo.",
        ),
        (Field::HiveCount, ReasonCode::TooLow) => (
            "Number of hives must be at least 1.",
            "Idadi ya mizinga lazima iwe angalau 1.",
        ),
        (Field::HiveCount, ReasonCode::TooHigh) => (
            "Number of hives cannot exceed 1,000.",
            "Idadi ya mizinga haiwezi kuzidi 1,000.",
        ),
        (Field::HiveCount, _) => (
            "Number of hives must be a number.",
            "Idadi ya mizinga lazima iwe namba.",
        ),
        (Field::HealthRating, ReasonCode::Empty) => (
            "Please rate the health of your hives from 1 to 5.",
            "Tafadhali kadiria afya ya mizinga kutoka 1 hadi 5.",
        ),
        (Field::HealthRating, _) => (
            "Hive health must be a number from 1 to 5.",
            "Afya ya mizinga lazima iwe namba kutoka 1 hadi 5.",
        ),
        (Field::ExperienceYears, ReasonCode::Empty) => (
            "Please enter your years of beekeeping experience.",
            "Tafadhali weka miaka yako ya ufugaji nyuki.",
        ),
        (Field::ExperienceYears, _) => (
            "Years of experience must be a whole number.",
            "Miaka ya uzoefu lazima iwe namba kamili.",
        ),
        (Field::PreventionPractice, _) => (
            "Please answer 1 for Yes or 2 for No on disease prevention.",
            "Tafadhali jibu 1 kwa Ndiyo au 2 kwa Hapana kuhusu kuzuia magonjwa.",
        ),
        (Field::Location, _) => ("Invalid location.", "Eneo si sahihi."),
    };

    match language {
        Language::English => english,
        Language::Swahili => swahili,
    }
}
