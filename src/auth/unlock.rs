//! The unlock page and the endpoint that checks the submitted access code.

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, endpoints,
    auth::{
        AccessPin,
        cookie::{invalidate_session_cookie, set_session_cookie},
        redirect::normalize_redirect_url,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, loading_spinner},
};

pub const WRONG_PIN_ERROR_MSG: &str = "Incorrect code. Try again.";

fn unlock_form(error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::UNLOCK_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#pin, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            div
            {
                label
                    for="pin"
                    class=(FORM_LABEL_STYLE)
                {
                    "Access code"
                }

                input
                    type="password"
                    name="pin"
                    id="pin"
                    inputmode="numeric"
                    pattern="[0-9]{4}"
                    maxlength="4"
                    minlength="4"
                    placeholder="••••"
                    autocomplete="one-time-code"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    autofocus;

                @if let Some(error_message) = error_message
                {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Unlock"
            }
        }
    }
}

fn unlock_view(error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    let form = unlock_form(error_message, redirect_url);

    let content = html! {
        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto"
        {
            span class="flex items-center mb-6 text-2xl font-semibold text-gray-900 dark:text-white"
            {
                "Shopledger"
            }

            div class="w-full bg-white rounded-lg shadow dark:border md:mt-0 sm:max-w-md xl:p-0 dark:bg-gray-800 dark:border-gray-700"
            {
                div class="p-6 space-y-4 md:space-y-6 sm:p-8"
                {
                    h1 class="text-xl font-bold leading-tight tracking-tight text-gray-900 md:text-2xl dark:text-white"
                    {
                        "Enter the access code to continue"
                    }

                    (form)
                }
            }
        }
    };

    base("Unlock", &[], &content)
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// Display the unlock page.
pub async fn get_unlock_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "unlock query");

    unlock_view(None, redirect_url.as_deref()).into_response()
}

/// The state needed to check a submitted access code.
#[derive(Debug, Clone)]
pub struct UnlockState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which the session cookie is valid.
    pub cookie_duration: Duration,
    /// The configured access code.
    pub access_pin: AccessPin,
}

impl FromRef<AppState> for UnlockState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            access_pin: state.access_pin.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<UnlockState> for Key {
    fn from_ref(state: &UnlockState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered in the unlock form.
#[derive(Clone, Deserialize)]
pub struct UnlockForm {
    /// The access code attempt.
    pub pin: String,

    /// Optional URL to redirect to after unlocking.
    /// Only accepted from the unlock form submission.
    pub redirect_url: Option<String>,
}

/// Handler for unlock requests via the POST method.
///
/// On a correct code the session cookie is set and the client is redirected
/// to the page it originally asked for, or the dashboard. Otherwise the form
/// is returned with an error message.
pub async fn post_unlock(
    State(state): State<UnlockState>,
    jar: PrivateCookieJar,
    Form(form): Form<UnlockForm>,
) -> Response {
    let redirect_url = parse_redirect_url(form.redirect_url.as_deref(), "unlock form");
    let redirect_url = redirect_url.as_deref();

    if !state.access_pin.matches(&form.pin) {
        return unlock_form(Some(WRONG_PIN_ERROR_MSG), redirect_url).into_response();
    }

    let redirect_url = redirect_url.unwrap_or(endpoints::DASHBOARD_VIEW);

    set_session_cookie(jar.clone(), state.cookie_duration)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(redirect_url.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting session cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_session_cookie(jar),
            )
        })
        .into_response()
}


#[cfg(test)]
mod post_unlock_tests {
    use axum::{Form, extract::State, response::IntoResponse};
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::Key,
    };
    use axum_htmx::HX_REDIRECT;
    use sha2::{Digest, Sha512};
    use time::Duration;

    use crate::{
        auth::{AccessPin, COOKIE_SESSION},
        endpoints,
        test_utils::{assert_form_error_message, must_get_form, parse_html_fragment},
    };

    use super::{UnlockForm, UnlockState, post_unlock};

    fn get_test_state() -> UnlockState {
        let hash = Sha512::digest(b"super secret");

        UnlockState {
            cookie_key: Key::from(&hash),
            cookie_duration: Duration::minutes(30),
            access_pin: AccessPin::new("1923").unwrap(),
        }
    }

    fn get_jar(state: &UnlockState) -> PrivateCookieJar {
        PrivateCookieJar::new(state.cookie_key.clone())
    }

    #[tokio::test]
    async fn correct_pin_sets_cookie_and_redirects() {
        let state = get_test_state();
        let jar = get_jar(&state);
        let form = UnlockForm {
            pin: "1923".to_string(),
            redirect_url: None,
        };

        let response = post_unlock(State(state), jar, Form(form))
            .await
            .into_response();

        assert_eq!(
            response
                .headers()
                .get(HX_REDIRECT)
                .expect("expected response to have the header hx-redirect"),
            endpoints::DASHBOARD_VIEW
        );
        let set_cookie = response
            .headers()
            .get("set-cookie")
            .expect("expected a set-cookie header")
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with(COOKIE_SESSION));
    }

    #[tokio::test]
    async fn correct_pin_redirects_to_requested_page() {
        let state = get_test_state();
        let jar = get_jar(&state);
        let form = UnlockForm {
            pin: "1923".to_string(),
            redirect_url: Some("/subscriptions".to_string()),
        };

        let response = post_unlock(State(state), jar, Form(form))
            .await
            .into_response();

        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            "/subscriptions"
        );
    }

    #[tokio::test]
    async fn wrong_pin_shows_error_and_sets_no_cookie() {
        let state = get_test_state();
        let jar = get_jar(&state);
        let form = UnlockForm {
            pin: "0000".to_string(),
            redirect_url: None,
        };

        let response = post_unlock(State(state), jar, Form(form))
            .await
            .into_response();

        assert!(response.headers().get("set-cookie").is_none());
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, super::WRONG_PIN_ERROR_MSG);
    }
}
