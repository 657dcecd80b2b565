use super::{Kes, Quote, QuoteSource};
use crate::ussd::validation::AnswerSet;

const BASE_RISK: i32 = 50;
const MIN_LOCAL_RISK: i32 = 20;
const MAX_LOCAL_RISK: i32 = 90;
const EXPERIENCE_CAP_YEARS: u32 = 10;
const PREVENTION_CREDIT: i32 = 10;

const BASE_PREMIUM_PER_HIVE: f64 = 750.0;
const VOLUME_DISCOUNT_PER_HIVE: f64 = 0.05;
const MAX_VOLUME_DISCOUNT: f64 = 0.3;
const LOCAL_COVER_MULTIPLE: f64 = 4.0;

const COARSE_RISK: u8 = 75;
const COARSE_PREMIUM_PER_HIVE: f64 = 1_000.0;
const COARSE_COVER_MULTIPLE: f64 = 3.0;

/// Deterministic quote used when no scoring credential is available.
pub fn local_quote(answers: &AnswerSet) -> Quote {
    let risk = local_risk_score(answers);
    let hives = f64::from(answers.hive_count);
    let risk_multiplier = f64::from(risk) / 50.0;
    let volume_discount = ((hives - 1.0) * VOLUME_DISCOUNT_PER_HIVE).clamp(0.0, MAX_VOLUME_DISCOUNT);

    let premium = round_to_hundred(
        hives * BASE_PREMIUM_PER_HIVE * risk_multiplier * (1.0 - volume_discount),
    );
    let cover = round_to_hundred(premium as f64 * LOCAL_COVER_MULTIPLE);

    Quote::new(risk, Kes(premium), Kes(cover), QuoteSource::LocalFormula)
}

/// Flat-rate quote used when the remote service was reachable in principle but failed.
pub fn coarse_quote(answers: &AnswerSet) -> Quote {
    let premium = round_to_hundred(f64::from(answers.hive_count) * COARSE_PREMIUM_PER_HIVE);
    let cover = round_to_hundred(premium as f64 * COARSE_COVER_MULTIPLE);

    Quote::new(COARSE_RISK, Kes(premium), Kes(cover), QuoteSource::CoarseFallback)
}

pub fn local_risk_score(answers: &AnswerSet) -> u8 {
    let health_factor = (6 - i32::from(answers.health_rating)) * 5;
    let experience_factor = answers.experience_years.min(EXPERIENCE_CAP_YEARS) as i32 * 2;
    let prevention_factor = if answers.prevention_practice {
        PREVENTION_CREDIT
    } else {
        0
    };

    let risk = BASE_RISK + health_factor - experience_factor - prevention_factor;
    risk.clamp(MIN_LOCAL_RISK, MAX_LOCAL_RISK) as u8
}

/// Nearest multiple of 100, halves rounding away from zero.
pub fn round_to_hundred(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    ((value / 100.0).round() * 100.0) as u64
}
