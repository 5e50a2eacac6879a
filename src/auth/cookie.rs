//! Defines functions for handling the unlocked-session cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{
    Duration, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::Error;

pub(crate) const COOKIE_SESSION: &str = "unlocked_until";
/// The default duration for which an unlocked session stays valid without activity.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(30);

/// Date time format for the cookie expiry, e.g. "2021-01-01 00:00:00.000000 +00:00:00".
const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
         sign:mandatory]:[offset_minute]:[offset_second]"
);

/// Add the session cookie to the cookie jar, indicating that the client has
/// entered the correct access code.
///
/// Sets the expiry of the cookie to `duration` from the current time.
///
/// Returns the cookie jar with the cookie added.
///
/// # Errors
///
/// Returns a [time::error::Format] if the expiry time cannot be formatted.
pub(crate) fn set_session_cookie(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, time::error::Format> {
    let expiry = OffsetDateTime::now_utc() + duration;
    // Use format instead of to_string to avoid errors at midnight when the hour is printed as
    // a single digit when [DATE_TIME_FORMAT] expects two digits.
    let expiry_string = expiry.format(DATE_TIME_FORMAT)?;

    Ok(jar.add(
        Cookie::build((COOKIE_SESSION, expiry_string))
            .expires(expiry)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the session cookie to an invalid value and set its max age to zero,
/// which should delete the cookie on the client side.
pub(crate) fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the expiry date time stored in the session cookie.
///
/// # Errors
///
/// Returns:
/// - [Error::CookieMissing] if the session cookie is not in the cookie jar.
/// - [Error::InvalidDateFormat] if the cookie value cannot be parsed.
pub(crate) fn get_session_expiry(jar: &PrivateCookieJar) -> Result<OffsetDateTime, Error> {
    let cookie = jar.get(COOKIE_SESSION).ok_or(Error::CookieMissing)?;

    OffsetDateTime::parse(cookie.value_trimmed(), DATE_TIME_FORMAT).map_err(|error| {
        Error::InvalidDateFormat(error.to_string(), cookie.value_trimmed().to_string())
    })
}

/// Check that the session cookie is present and has not expired.
///
/// # Errors
///
/// Returns [Error::InvalidPin] if the session has expired, or the errors from
/// [get_session_expiry].
pub(crate) fn assert_session_valid(jar: &PrivateCookieJar) -> Result<(), Error> {
    let expiry = get_session_expiry(jar)?;

    if expiry <= OffsetDateTime::now_utc() {
        return Err(Error::InvalidPin);
    }

    Ok(())
}

/// Set the expiry of the session cookie in `jar` to the latest of UTC now
/// plus `duration` and the cookie's current expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
pub(crate) fn extend_session_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let current_expiry = get_session_expiry(&jar)?;

    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(Error::CookieMissing)?;

    let expiry = max(current_expiry, new_expiry);
    let expiry_string = expiry
        .format(DATE_TIME_FORMAT)
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), expiry.to_string()))?;

    let mut cookie = jar.get(COOKIE_SESSION).ok_or(Error::CookieMissing)?;
    cookie.set_expires(expiry);
    cookie.set_value(expiry_string);

    Ok(jar.add(cookie))
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::Error;

    use super::{
        COOKIE_SESSION, DEFAULT_COOKIE_DURATION, assert_session_valid, extend_session_if_needed,
        get_session_expiry, invalidate_session_cookie, set_session_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    /// Test helper macro to assert that two date times are within one second
    /// of each other. Used instead of a function so that the file and line
    /// number of the caller is included in the error message instead of the
    /// helper.
    macro_rules! assert_date_time_close {
        ($left:expr, $right:expr) => {
            assert!(
                ($left - $right).abs() < Duration::seconds(1),
                "got date time {:?}, want {:?}",
                $left,
                $right
            );
        };
    }

    #[test]
    fn can_set_cookie() {
        let jar = set_session_cookie(get_jar(), DEFAULT_COOKIE_DURATION).unwrap();

        let got_expiry = get_session_expiry(&jar).unwrap();

        assert_date_time_close!(
            got_expiry,
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION
        );
    }

    #[test]
    fn valid_session_passes_check() {
        let jar = set_session_cookie(get_jar(), DEFAULT_COOKIE_DURATION).unwrap();

        assert_eq!(assert_session_valid(&jar), Ok(()));
    }

    #[test]
    fn missing_cookie_fails_check() {
        let jar = get_jar();

        assert_eq!(assert_session_valid(&jar), Err(Error::CookieMissing));
    }

    #[test]
    fn expired_session_fails_check() {
        let jar = set_session_cookie(get_jar(), Duration::seconds(-10)).unwrap();

        assert_eq!(assert_session_valid(&jar), Err(Error::InvalidPin));
    }

    #[test]
    fn garbage_cookie_value_fails_check() {
        let jar = invalidate_session_cookie(get_jar());

        assert!(matches!(
            assert_session_valid(&jar),
            Err(Error::InvalidDateFormat(_, _))
        ));
    }

    #[test]
    fn can_extend_session_duration() {
        let jar = set_session_cookie(get_jar(), DEFAULT_COOKIE_DURATION).unwrap();
        let want = OffsetDateTime::now_utc() + Duration::hours(2);

        let jar = extend_session_if_needed(jar, Duration::hours(2)).unwrap();
        let got_cookie = jar.get(COOKIE_SESSION).unwrap();

        assert_date_time_close!(get_session_expiry(&jar).unwrap(), want);
        assert_date_time_close!(got_cookie.expires_datetime().unwrap(), want);
    }

    #[test]
    fn session_duration_does_not_shrink() {
        let jar = set_session_cookie(get_jar(), DEFAULT_COOKIE_DURATION).unwrap();
        let want = get_session_expiry(&jar).unwrap();

        // The initial cookie expires later than now + 5 seconds, so extending
        // by 5 seconds should not change the expiry.
        let jar = extend_session_if_needed(jar, Duration::seconds(5)).unwrap();

        assert_eq!(get_session_expiry(&jar).unwrap(), want);
    }

    #[test]
    fn invalidate_session_cookie_succeeds() {
        let jar = set_session_cookie(get_jar(), DEFAULT_COOKIE_DURATION).unwrap();

        let jar = invalidate_session_cookie(jar);
        let cookie = jar.get(COOKIE_SESSION).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
