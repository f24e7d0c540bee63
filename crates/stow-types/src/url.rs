use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// An absolute URL in `scheme:rest` form.
///
/// Only the scheme is validated (RFC 3986: a letter followed by letters,
/// digits, `+`, `-` or `.`). Everything after the first `:` is kept
/// verbatim; stow never resolves or normalizes URLs, it only stores them.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Url(String);

impl Url {
    /// Parse and validate a URL string.
    pub fn parse(input: &str) -> TypeResult<Self> {
        let invalid = |reason: &str| TypeError::InvalidUrl {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (scheme, rest) = input.split_once(':').ok_or_else(|| invalid("missing scheme"))?;
        let mut chars = scheme.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() => {}
            Some(_) => return Err(invalid("scheme must start with a letter")),
            None => return Err(invalid("empty scheme")),
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
            return Err(invalid("illegal character in scheme"));
        }
        if rest.is_empty() {
            return Err(invalid("nothing after scheme"));
        }
        if input.chars().any(char::is_whitespace) {
            return Err(invalid("contains whitespace"));
        }
        Ok(Self(input.to_string()))
    }

    /// The full URL string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The scheme, without the trailing `:`.
    pub fn scheme(&self) -> &str {
        // Validated on construction, so the separator is always present.
        self.0.split(':').next().unwrap_or_default()
    }
}

impl FromStr for Url {
    type Err = TypeError;

    fn from_str(s: &str) -> TypeResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Url {
    type Error = TypeError;

    fn try_from(value: String) -> TypeResult<Self> {
        Self::parse(&value)
    }
}

impl From<Url> for String {
    fn from(url: Url) -> Self {
        url.0
    }
}

impl fmt::Debug for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Url({})", self.0)
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_urls() {
        let url = Url::parse("https://example.com/a?b=c").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.as_str(), "https://example.com/a?b=c");

        let mail = Url::parse("mailto:someone@example.com").unwrap();
        assert_eq!(mail.scheme(), "mailto");
    }

    #[test]
    fn rejects_missing_scheme() {
        assert!(Url::parse("example.com").is_err());
        assert!(Url::parse(":nothing").is_err());
        assert!(Url::parse("1http://x").is_err());
    }

    #[test]
    fn rejects_empty_rest_and_whitespace() {
        assert!(Url::parse("https:").is_err());
        assert!(Url::parse("https://exa mple.com").is_err());
    }

    #[test]
    fn serde_is_a_plain_string() {
        let url = Url::parse("file:///tmp/x").unwrap();
        let json = serde_json::to_string(&url).unwrap();
        assert_eq!(json, "\"file:///tmp/x\"");
        let back: Url = serde_json::from_str(&json).unwrap();
        assert_eq!(back, url);
        assert!(serde_json::from_str::<Url>("\"nope\"").is_err());
    }
}
