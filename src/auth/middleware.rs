//! Gate middleware that validates the session cookie, extends it on
//! activity, and redirects locked clients to the unlock page.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState, endpoints,
    auth::{
        cookie::{assert_session_valid, extend_session_if_needed},
        redirect::{build_unlock_redirect_url, build_unlock_redirect_url_from_target},
    },
};

/// The state needed for the gate middleware
#[derive(Clone)]
pub struct GateState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which the session cookie is valid.
    pub cookie_duration: Duration,
}

impl FromRef<AppState> for GateState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<GateState> for Key {
    fn from_ref(state: &GateState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid session cookie.
/// The request executes normally if the cookie is valid, otherwise a
/// redirect to the unlock page is returned using `get_redirect`.
///
/// **Note**: The app state must contain an `axum_extra::extract::cookie::Key`
/// for decrypting and verifying the cookie contents.
#[inline]
async fn gate_guard_internal(
    state: GateState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let unlock_redirect_url = build_unlock_redirect_url(&request).unwrap_or_else(|| {
        if request.uri().path().starts_with("/api") {
            tracing::warn!(
                "Missing or invalid HTMX headers for /api request. Falling back to dashboard."
            );
        } else {
            tracing::warn!("Invalid redirect URL from request URI. Falling back to dashboard.");
        }

        build_unlock_redirect_url_from_target(endpoints::DASHBOARD_VIEW)
            .unwrap_or_else(|| endpoints::UNLOCK_VIEW.to_owned())
    });

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to unlock page.");
            return get_redirect(&unlock_redirect_url);
        }
    };

    if assert_session_valid(&jar).is_err() {
        return get_redirect(&unlock_redirect_url);
    }

    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = match extend_session_if_needed(jar.clone(), state.cookie_duration) {
        Ok(updated_jar) => updated_jar,
        Err(err) => {
            tracing::error!("Error extending session duration: {err:?}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Middleware function that checks for a valid session cookie.
/// The request executes normally if the cookie is valid, otherwise a
/// redirect to the unlock page is returned.
pub async fn gate_guard(State(state): State<GateState>, request: Request, next: Next) -> Response {
    gate_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware function that checks for a valid session cookie.
/// The request executes normally if the cookie is valid, otherwise a HTMX
/// redirect to the unlock page is returned.
pub async fn gate_guard_hx(
    State(state): State<GateState>,
    request: Request,
    next: Next,
) -> Response {
    gate_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}
