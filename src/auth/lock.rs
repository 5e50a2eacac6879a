//! Ends the unlocked session.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::cookie::invalidate_session_cookie, auth::middleware::GateState, endpoints};

/// Invalidate the session cookie and send the client back to the unlock page.
pub async fn get_lock(State(_state): State<GateState>, jar: PrivateCookieJar) -> Response {
    let jar = invalidate_session_cookie(jar);

    (jar, Redirect::to(endpoints::UNLOCK_VIEW)).into_response()
}
