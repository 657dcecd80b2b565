use std::sync::Arc;

use super::common::*;

use crate::ussd::catalog::Language;
use crate::ussd::decoder::decode;
use crate::ussd::render::ReplyKind;
use crate::ussd::scoring::{Kes, QuoteSource, ScoringError};
use crate::ussd::session::{Outcome, SessionError, SessionState, QUOTE_LEVEL};
use crate::ussd::validation::{Field, ReasonCode};

#[tokio::test]
async fn empty_history_shows_language_menu() {
    let decision = machine().decide(&decode("")).await;
    assert_eq!(decision.outcome, Outcome::LanguageMenu);
    assert_eq!(decision.outcome.state(), SessionState::LanguageSelect);
}

#[tokio::test]
async fn each_level_before_the_quote_prompts_the_matching_question() {
    let machine = machine();
    let answers = ["2", "5", "4", "3", "1"];
    for level in 1..QUOTE_LEVEL {
        let text = answers[..level].join("*");
        let decision = machine.decide(&decode(&text)).await;
        assert_eq!(decision.language, Language::Swahili);
        assert_eq!(decision.outcome, Outcome::Question { step: level }, "text {text:?}");
    }
}

#[tokio::test]
async fn questions_are_not_validated_before_the_quote_step() {
    let decision = machine().decide(&decode("1*abc*99")).await;
    assert_eq!(decision.outcome, Outcome::Question { step: 3 });
}

#[tokio::test]
async fn invalid_language_ends_in_english_at_any_depth() {
    let machine = machine();
    for text in ["3", "9*5", "*5*4*3*1*Kitui", "0*5*4*3*1*Kitui*1"] {
        let decision = machine.decide(&decode(text)).await;
        assert_eq!(decision.language, Language::English, "text {text:?}");
        assert_eq!(
            decision.outcome,
            Outcome::SessionError(SessionError::InvalidLanguage),
            "text {text:?}"
        );
    }
}

#[tokio::test]
async fn complete_answers_produce_local_quote_without_credentials() {
    let decision = machine().decide(&decode(REFERENCE_ANSWERS)).await;
    let Outcome::QuotePresented(quote) = &decision.outcome else {
        panic!("expected a quote, got {:?}", decision.outcome);
    };
    assert_eq!(quote.risk_score(), 44);
    assert_eq!(quote.premium(), Kes(2_600));
    assert_eq!(quote.cover_amount(), Kes(10_400));
    assert_eq!(quote.source(), QuoteSource::LocalFormula);
}

#[tokio::test]
async fn first_invalid_answer_is_reported() {
    let decision = machine().decide(&decode("1*0*9*x*5*X")).await;
    let Outcome::ValidationError(err) = &decision.outcome else {
        panic!("expected a validation error, got {:?}", decision.outcome);
    };
    assert_eq!(err.field, Field::HiveCount);
    assert_eq!(err.reason, ReasonCode::TooLow);

    let decision = machine().decide(&decode("2*5*4*3*maybe*Kitui")).await;
    assert_eq!(decision.language, Language::Swahili);
    assert!(matches!(
        decision.outcome,
        Outcome::ValidationError(err) if err.field == Field::PreventionPractice
    ));
}

#[tokio::test]
async fn blank_answers_fail_validation_at_the_quote_step() {
    let decision = machine().decide(&decode("1*5*4***Kitui")).await;
    assert!(matches!(
        decision.outcome,
        Outcome::ValidationError(err)
            if err.field == Field::ExperienceYears && err.reason == ReasonCode::Empty
    ));
}

#[tokio::test]
async fn confirmation_carries_the_validated_answers() {
    let decision = machine()
        .decide(&decode(&format!("{REFERENCE_ANSWERS}*1")))
        .await;
    let Outcome::PaymentConfirmed(answers) = &decision.outcome else {
        panic!("expected confirmation, got {:?}", decision.outcome);
    };
    assert_eq!(answers.hive_count, 5);
    assert_eq!(answers.location, "Nairobi-Kasarani");
    assert!(decision.outcome.state().is_terminal());
}

#[tokio::test]
async fn confirmation_never_calls_the_scoring_service_again() {
    let client = Arc::new(
        StubClient::answering(30.0, 1_200.0, 4_800.0).failing_first(ScoringError::Status(503)),
    );
    let (service, payments) =
        service_with(engine(FixedCredentials(Some("token")), client.clone()));

    let quoted = service.handle(&request(REFERENCE_ANSWERS)).await;
    assert!(quoted.message().contains("Premium: KES 5,000"), "{quoted}");
    assert_eq!(client.calls(), 1);

    let confirmed = service
        .handle(&request(&format!("{REFERENCE_ANSWERS}*1")))
        .await;
    assert_eq!(confirmed.kind(), ReplyKind::End);
    assert!(!confirmed.message().contains("KES"), "{confirmed}");
    assert_eq!(client.calls(), 1);

    let requests = payments.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].answers.hive_count, 5);
    assert!(requests[0].answers.prevention_practice);
}

#[tokio::test]
async fn cancellation_and_unknown_choices_end_the_session() {
    let machine = machine();

    let cancelled = machine
        .decide(&decode(&format!("{REFERENCE_ANSWERS}*2")))
        .await;
    assert_eq!(cancelled.outcome, Outcome::PaymentCancelled);

    let unknown = machine
        .decide(&decode(&format!("{REFERENCE_ANSWERS}*7")))
        .await;
    assert_eq!(
        unknown.outcome,
        Outcome::SessionError(SessionError::InvalidChoice)
    );
}

#[tokio::test]
async fn histories_past_the_confirmation_are_invalid_steps() {
    let decision = machine()
        .decide(&decode(&format!("{REFERENCE_ANSWERS}*1*1")))
        .await;
    assert_eq!(
        decision.outcome,
        Outcome::SessionError(SessionError::InvalidStep(8))
    );
    assert_eq!(decision.language, Language::English);
}

#[tokio::test]
async fn round_trip_walk_reaches_each_expected_screen() {
    let (service, payments) = offline_service();
    let catalog = catalog();
    let inputs = ["1", "5", "4", "3", "1", "Nairobi-Kasarani", "1"];

    let mut history = decode("");
    let first = service.handle(&request(&history.to_wire())).await;
    assert_eq!(first.kind(), ReplyKind::Continue);

    for (index, input) in inputs.iter().enumerate() {
        history = history.extended(input);
        let reply = service.handle(&request(&history.to_wire())).await;
        let level = history.level();

        if level < QUOTE_LEVEL {
            let expected = catalog
                .prompt_for(level, Language::English)
                .expect("question screen");
            assert_eq!(reply.to_string(), format!("CON {}", expected.text));
        } else if level == QUOTE_LEVEL {
            assert_eq!(reply.kind(), ReplyKind::Continue);
            assert!(reply.message().contains("Confirm & Pay"));
        } else {
            assert_eq!(reply.kind(), ReplyKind::End, "input #{index}");
        }
    }

    assert_eq!(payments.requests().len(), 1);
}
