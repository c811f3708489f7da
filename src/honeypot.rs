//! Hidden anti-spam form field

/// Default name of the hidden field
///
/// An innocuous name works better than an obvious one, since form bots
/// look for fields they recognize.
pub const DEFAULT_FIELD_NAME: &str = "phonenumber";

/// Hidden form field that must come back empty
///
/// The field is invisible to people filling in the form but tends to
/// get filled by form bots. Attach one to a
/// [`FormConfig`](crate::FormConfig) and render it into the page with
/// [`antispam_fields`](crate::tags::antispam_fields); a submission
/// carrying any value for the field fails validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Honeypot {
    field_name: String,
}

impl Honeypot {
    /// Creates a honeypot using [`DEFAULT_FIELD_NAME`]
    pub fn new() -> Self {
        Self::named(DEFAULT_FIELD_NAME)
    }

    /// Creates a honeypot with a custom field name
    pub fn named<S: Into<String>>(field_name: S) -> Self {
        Honeypot {
            field_name: field_name.into(),
        }
    }

    /// Name of the hidden input field
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Returns true if the submitted value is acceptable
    ///
    /// Absent counts as acceptable. Whitespace does not: a real browser
    /// submits the hidden field untouched, as an empty string.
    pub(crate) fn passes(&self, value: Option<&str>) -> bool {
        value.map_or(true, str::is_empty)
    }
}

impl Default for Honeypot {
    fn default() -> Self {
        Self::new()
    }
}
