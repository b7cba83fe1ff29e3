//! libpq keyword/value connection descriptors.
//!
//! Member descriptors are never interpreted here; they go to the driver
//! as-is, in either keyword/value or URI form. The one exception is the
//! proxy health member, whose descriptor is the proxy's keyword/value
//! descriptor combined with a cluster member's credentials.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors raised while parsing a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnInfoError {
    #[error("missing '=' after keyword {0:?}")]
    MissingEquals(String),

    #[error("empty keyword in connection string")]
    EmptyKeyword,

    #[error("unterminated quoted value for {0:?}")]
    UnterminatedQuote(String),
}

/// A parsed `key=value key='quoted value'` descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnInfo {
    params: BTreeMap<String, String>,
}

impl ConnInfo {
    /// Parse a libpq keyword/value string.
    pub fn parse(input: &str) -> Result<Self, ConnInfoError> {
        let mut params = BTreeMap::new();
        let mut chars = input.chars().peekable();

        loop {
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if chars.peek().is_none() {
                break;
            }

            let mut key = String::new();
            while let Some(c) = chars.next_if(|c| *c != '=' && !c.is_whitespace()) {
                key.push(c);
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if chars.next_if_eq(&'=').is_none() {
                return Err(ConnInfoError::MissingEquals(key));
            }
            if key.is_empty() {
                return Err(ConnInfoError::EmptyKeyword);
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}

            let mut value = String::new();
            if chars.next_if_eq(&'\'').is_some() {
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                value.push(escaped);
                            }
                        }
                        '\'' => {
                            closed = true;
                            break;
                        }
                        _ => value.push(c),
                    }
                }
                if !closed {
                    return Err(ConnInfoError::UnterminatedQuote(key));
                }
            } else {
                while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                    if c == '\\' {
                        if let Some(escaped) = chars.next() {
                            value.push(escaped);
                        }
                    } else {
                        value.push(c);
                    }
                }
            }

            params.insert(key, value);
        }

        Ok(Self { params })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.params.remove(key)
    }

    /// Proxy descriptor authenticating with a cluster member's credentials.
    ///
    /// Connecting with it goes through the proxy to whatever backend the
    /// proxy currently points at, exactly as an application would.
    ///
    /// `server` is the driver's reading of the member descriptor, so the
    /// member may use either descriptor form.
    pub fn passthrough(proxy: &ConnInfo, server: &tokio_postgres::Config) -> ConnInfo {
        let mut merged = proxy.clone();
        let password = server
            .get_password()
            .map(|p| String::from_utf8_lossy(p).into_owned());
        let credentials = [
            ("user", server.get_user().map(str::to_owned)),
            ("dbname", server.get_dbname().map(str::to_owned)),
            ("password", password),
        ];
        for (key, value) in credentials {
            match value {
                Some(value) => merged.set(key, value),
                None => {
                    merged.remove(key);
                }
            }
        }
        merged
    }
}

impl FromStr for ConnInfo {
    type Err = ConnInfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ConnInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            let needs_quotes = value.is_empty()
                || value.chars().any(|c| c.is_whitespace() || c == '\'' || c == '\\');
            if needs_quotes {
                write!(f, "{}='", key)?;
                for c in value.chars() {
                    if c == '\'' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str("'")?;
            } else {
                write!(f, "{}={}", key, value)?;
            }
        }
        Ok(())
    }
}
