use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, Query, Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use constant_time_eq::constant_time_eq;
use hsg_application::RATE_LIMITED_MESSAGE;
use hsg_core::AppError;
use ipnet::IpNet;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

#[derive(Debug, Deserialize)]
struct AdminTokenQuery {
    token: Option<String>,
}

/// Rejects requests that do not present the admin token.
pub async fn require_admin_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let query_token = Query::<AdminTokenQuery>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(query)| query.token);
    let presented = query_token.or_else(|| bearer_token(request.headers()));

    let authorized = presented
        .as_deref()
        .is_some_and(|token| token_matches(&state.admin_token_digest, token));
    if !authorized {
        return Err(AppError::Unauthorized("Invalid or missing token.".to_owned()).into());
    }

    Ok(next.run(request).await)
}

/// Applies the intake rate limit per client address.
pub async fn rate_limit_intake(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(address)| address.ip());
    let identifier = client_ip(request.headers(), peer, state.trusted_proxies.as_slice());

    let decision = state
        .rate_limit_service
        .check(&state.intake_rate_rule, identifier.as_str())
        .await?;

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        let retry_after = decision.retry_after_seconds(state.rate_limit_service.now());
        let error = AppError::RateLimited(RATE_LIMITED_MESSAGE.to_owned());
        let mut response = ApiError::from(error).into_response();
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
        response
    };

    let headers = response.headers_mut();
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));

    Ok(response)
}

/// Resolves the address a request is rate limited under.
///
/// Forwarded headers are honored only when the peer is a trusted proxy, or
/// when no trusted proxies are configured. Falls back to `"unknown"`.
pub fn client_ip(headers: &HeaderMap, peer: Option<IpAddr>, trusted_proxies: &[IpNet]) -> String {
    let honor_forwarded =
        trusted_proxies.is_empty() || peer.is_some_and(|peer| is_trusted(trusted_proxies, peer));

    let forwarded = honor_forwarded
        .then(|| {
            header_value(headers, "x-forwarded-for")
                .and_then(|value| value.split(',').next())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .or_else(|| {
                    header_value(headers, "x-real-ip")
                        .map(str::trim)
                        .filter(|value| !value.is_empty())
                })
        })
        .flatten();

    forwarded
        .map(ToOwned::to_owned)
        .or_else(|| peer.map(|peer| peer.to_string()))
        .unwrap_or_else(|| "unknown".to_owned())
}

fn is_trusted(trusted_proxies: &[IpNet], peer: IpAddr) -> bool {
    trusted_proxies.iter().any(|proxy| proxy.contains(&peer))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    header_value(headers, header::AUTHORIZATION.as_str())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
}

/// Compares a presented token with the expected digest in constant time.
fn token_matches(expected_digest: &[u8; 32], presented: &str) -> bool {
    let presented_digest = Sha256::digest(presented.as_bytes());
    constant_time_eq(expected_digest, presented_digest.as_slice())
}
