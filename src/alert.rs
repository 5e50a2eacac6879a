//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts are swapped into the fixed `#alert-container` element by htmx via
//! the response-targets extension, so endpoints can return one of these
//! fragments from any form submission.

use maud::{Markup, Render, html};

/// Alert message types for styling
#[derive(Debug, Clone)]
pub enum AlertType {
    Success,
    Error,
}

/// Renders alert messages with appropriate styling
pub struct AlertTemplate<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> AlertTemplate<'a> {
    /// Create a new success alert
    #[allow(dead_code)]
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }
}

impl Render for AlertTemplate<'_> {
    fn render(&self) -> Markup {
        let (container_style, icon) = match self.alert_type {
            AlertType::Success => (
                "flex items-start gap-3 rounded-lg border border-green-300 \
                bg-green-50 p-4 text-green-800 shadow-lg dark:border-green-800 \
                dark:bg-gray-800 dark:text-green-400",
                "✓",
            ),
            AlertType::Error => (
                "flex items-start gap-3 rounded-lg border border-red-300 \
                bg-red-50 p-4 text-red-800 shadow-lg dark:border-red-800 \
                dark:bg-gray-800 dark:text-red-400",
                "!",
            ),
        };

        html!(
            div id="alert-container" hx-swap-oob="true" class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div role="alert" class=(container_style)
                {
                    span aria-hidden="true" class="font-bold" { (icon) }

                    div
                    {
                        p class="font-medium" { (self.message) }

                        @if !self.details.is_empty() {
                            p class="text-sm" { (self.details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-auto font-bold"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "✕"
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod alert_tests {
    use maud::Render;
    use scraper::{Html, Selector};

    use super::AlertTemplate;

    #[test]
    fn error_alert_contains_message_and_details() {
        let markup = AlertTemplate::error("Something went wrong", "Try again later").render();

        let html = Html::parse_fragment(&markup.into_string());
        let selector = Selector::parse("[role=alert]").unwrap();
        let alert = html
            .select(&selector)
            .next()
            .expect("expected an element with role=alert");
        let text = alert.text().collect::<String>();

        assert!(text.contains("Something went wrong"));
        assert!(text.contains("Try again later"));
    }

    #[test]
    fn success_alert_omits_empty_details() {
        let markup = AlertTemplate::success("Saved", "").render();

        let html = Html::parse_fragment(&markup.into_string());
        let selector = Selector::parse("p").unwrap();
        let paragraphs = html.select(&selector).count();

        assert_eq!(paragraphs, 1, "want only the message paragraph");
    }
}
