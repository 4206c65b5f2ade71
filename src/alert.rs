//! Alert fragments shown in the floating alert container.
//!
//! Error alerts are returned with a non-2xx status code and swapped into
//! `#alert-container` by the client via `hx-target-error`. Success alerts are
//! returned inline with a 2xx response and carry an out-of-band swap attribute
//! so they land in the alert container regardless of the request's swap
//! target.

use maud::{Markup, html};

/// A dismissable notification to display to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Tell the user that their request succeeded.
    Success {
        /// A short message describing what succeeded.
        message: String,
    },
    /// Tell the user that their request failed and how to proceed.
    Error {
        /// A short summary of what went wrong.
        message: String,
        /// What the user can do about it.
        details: String,
    },
}

impl Alert {
    /// Create an error alert from a summary and a suggested fix.
    pub fn error(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            details: details.into(),
        }
    }

    /// Create a success alert from a short message.
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
        }
    }

    /// Render the alert as an HTML fragment.
    ///
    /// Success alerts wrap themselves in an out-of-band copy of the alert
    /// container so they can piggyback on any response.
    pub fn into_markup(self) -> Markup {
        match self {
            Alert::Success { message } => html! {
                div id="alert-container" hx-swap-oob="innerHTML"
                {
                    div
                        class="flex items-center gap-2 p-4 mb-4 rounded-lg border
                            text-green-800 bg-green-50 border-green-300
                            dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
                        role="alert"
                    {
                        p class="text-sm font-medium" { (message) }

                        button
                            type="button"
                            class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5
                                text-green-500 hover:bg-green-200 focus:ring-2 focus:ring-green-400
                                dark:bg-gray-800 dark:text-green-400 dark:hover:bg-gray-700"
                            aria-label="Close"
                            onclick="this.closest('[role=alert]').remove()"
                        {
                            "✕"
                        }
                    }
                }
            },
            Alert::Error { message, details } => html! {
                div
                    class="flex flex-col gap-1 p-4 mb-4 rounded-lg border
                        text-red-800 bg-red-50 border-red-300
                        dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
                    role="alert"
                {
                    div class="flex items-center gap-2"
                    {
                        p class="text-sm font-semibold" { (message) }

                        button
                            type="button"
                            class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5
                                text-red-500 hover:bg-red-200 focus:ring-2 focus:ring-red-400
                                dark:bg-gray-800 dark:text-red-400 dark:hover:bg-gray-700"
                            aria-label="Close"
                            onclick="this.closest('[role=alert]').remove()"
                        {
                            "✕"
                        }
                    }

                    p class="text-sm" { (details) }
                }
            },
        }
    }
}
