//! Error type for contact form processing

use std::{error::Error as StdError, fmt};

use crate::BoxError;

/// The Errors that may occur when processing a contact form
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    source: Option<BoxError>,
}

impl Error {
    pub(crate) fn new<E>(kind: Kind, source: Option<E>) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            inner: Box::new(Inner {
                kind,
                source: source.map(Into::into),
            }),
        }
    }

    /// Returns true if the form was used before a successful validation pass
    pub fn is_not_validated(&self) -> bool {
        matches!(self.inner.kind, Kind::NotValidated)
    }

    /// Returns true if a template was missing or failed to render
    pub fn is_template(&self) -> bool {
        matches!(self.inner.kind, Kind::Template)
    }

    /// Returns true if the email message could not be assembled
    pub fn is_message(&self) -> bool {
        matches!(self.inner.kind, Kind::Message)
    }
}

#[derive(Debug)]
pub(crate) enum Kind {
    /// The form has not been validated, or validation failed
    NotValidated,
    /// Template lookup or rendering error
    Template,
    /// Message assembly error
    Message,
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("envelope::Error");

        builder.field("kind", &self.inner.kind);

        if let Some(source) = &self.inner.source {
            builder.field("source", source);
        }

        builder.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            Kind::NotValidated => f.write_str("form data has not been validated")?,
            Kind::Template => f.write_str("template error")?,
            Kind::Message => f.write_str("email message assembly error")?,
        };

        if let Some(e) = &self.inner.source {
            write!(f, ": {e}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|e| &**e as &(dyn StdError + 'static))
    }
}

pub(crate) fn not_validated() -> Error {
    Error::new(Kind::NotValidated, None::<Error>)
}

pub(crate) fn template<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Template, Some(e))
}

pub(crate) fn message<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Message, Some(e))
}
