use std::any::Any;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::rejection::FormRejection;
use axum::extract::{FromRequest, Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use super::catalog::{Language, LANGUAGE_STEP};
use super::decoder::decode;
use super::render::WireReply;
use super::service::{UssdRequest, UssdService};

/// Gateway callback routes. Every reply is `200 text/plain` except non-POST requests.
pub fn ussd_router(service: Arc<UssdService>) -> Router {
    Router::new()
        .route(
            "/ussd",
            post(callback_handler).fallback(method_not_allowed),
        )
        .route(
            "/ussd/",
            post(callback_handler).fallback(method_not_allowed),
        )
        .with_state(service)
        .layer(CatchPanicLayer::custom(panic_reply))
        .layer(TraceLayer::new_for_http())
}

pub(crate) async fn callback_handler(
    State(service): State<Arc<UssdService>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match parse_form(headers.get(header::CONTENT_TYPE), body.clone()).await {
        Ok(request) => text_reply(service.handle(&request).await),
        Err(rejection) => {
            warn!(error = %rejection, "ussd callback body could not be decoded");
            text_reply(WireReply::system_error(fallback_language(body).await))
        }
    }
}

async fn parse_form(
    content_type: Option<&HeaderValue>,
    body: Bytes,
) -> Result<UssdRequest, FormRejection> {
    let mut request = Request::new(Body::from(body));
    *request.method_mut() = Method::POST;
    if let Some(content_type) = content_type {
        request
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type.clone());
    }
    let Form(parsed) = Form::<UssdRequest>::from_request(request, &()).await?;
    Ok(parsed)
}

/// Best-effort language for a rejected body: read it as a form regardless of the declared
/// content type and take the selector from `text`. English when nothing usable is found.
async fn fallback_language(body: Bytes) -> Language {
    let form = HeaderValue::from_static("application/x-www-form-urlencoded");
    parse_form(Some(&form), body)
        .await
        .ok()
        .and_then(|request| {
            decode(&request.text)
                .get(LANGUAGE_STEP)
                .and_then(Language::from_selector)
        })
        .unwrap_or(Language::English)
}

pub(crate) async fn method_not_allowed() -> Response {
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref())],
        "ussd callbacks must use POST",
    )
        .into_response()
}

fn text_reply(reply: WireReply) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime::TEXT_PLAIN_UTF_8.as_ref())],
        reply.to_string(),
    )
        .into_response()
}

fn panic_reply(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    error!(%detail, "ussd handler panicked");
    text_reply(WireReply::system_error(Language::English))
}
