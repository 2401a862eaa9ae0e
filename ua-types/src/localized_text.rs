// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `LocalizedText`.

use std::fmt;

use crate::string::UAString;

/// Human readable text with an optional locale identifier.
#[derive(PartialEq, Eq, Clone, Debug, Hash, Default)]
pub struct LocalizedText {
    /// The locale, e.g. "en".
    pub locale: UAString,
    /// The text in that locale.
    pub text: UAString,
}

impl LocalizedText {
    /// Construct localized text from a locale and text pair.
    pub fn new(locale: &str, text: &str) -> LocalizedText {
        LocalizedText {
            locale: UAString::from(locale),
            text: UAString::from(text),
        }
    }

    /// The null localized text.
    pub fn null() -> LocalizedText {
        LocalizedText {
            locale: UAString::null(),
            text: UAString::null(),
        }
    }

    /// Whether the localized text is null.
    pub fn is_null(&self) -> bool {
        self.locale.is_null() && self.text.is_null()
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl From<&str> for LocalizedText {
    fn from(value: &str) -> Self {
        LocalizedText {
            locale: UAString::null(),
            text: UAString::from(value),
        }
    }
}

impl From<String> for LocalizedText {
    fn from(value: String) -> Self {
        LocalizedText {
            locale: UAString::null(),
            text: UAString::from(value),
        }
    }
}
