use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The subset of CSS selectors the page enhancements need.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Selector {
    /// `.name`
    Class(String),
    /// `#name`
    Id(String),
    /// `[name="value"]`
    Attribute { name: String, value: String },
}

impl Selector {
    pub fn class(name: impl Into<String>) -> Self {
        Selector::Class(name.into())
    }

    pub fn id(name: impl Into<String>) -> Self {
        Selector::Id(name.into())
    }

    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Selector::Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Class(name) => write!(f, ".{name}"),
            Selector::Id(name) => write!(f, "#{name}"),
            Selector::Attribute { name, value } => write!(f, "[{name}=\"{value}\"]"),
        }
    }
}

impl FromStr for Selector {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ValidationError::InvalidSelector {
            selector: s.to_string(),
            message: message.to_string(),
        };

        let s_trim = s.trim();
        if let Some(name) = s_trim.strip_prefix('.') {
            return ident(name).map(Selector::class).ok_or_else(|| invalid("bad class name"));
        }
        if let Some(name) = s_trim.strip_prefix('#') {
            return ident(name).map(Selector::id).ok_or_else(|| invalid("bad id"));
        }
        if let Some(body) = s_trim.strip_prefix('[').and_then(|b| b.strip_suffix(']')) {
            let (name, value) = body
                .split_once('=')
                .ok_or_else(|| invalid("attribute selector needs '='"))?;
            let name = ident(name.trim()).ok_or_else(|| invalid("bad attribute name"))?;
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            return Ok(Selector::attribute(name, value));
        }
        Err(invalid("expected '.class', '#id' or '[attr=\"value\"]'"))
    }
}

impl TryFrom<String> for Selector {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.to_string()
    }
}

fn ident(s: &str) -> Option<&str> {
    let valid = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(s)
}
