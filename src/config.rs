//! Per-form delivery settings

use lettre::message::Mailbox;

#[cfg(feature = "honeypot")]
use crate::honeypot::Honeypot;
use crate::template::DEFAULT_BODY_TEMPLATE;

/// Subject prefix used when none is configured
pub const DEFAULT_SUBJECT_PREFIX: &str = "Message from contact form: ";

/// Address used as default sender and default recipient
pub const DEFAULT_ADDRESS: &str = "webmaster@localhost";

/// Delivery settings for a [`ContactForm`][crate::ContactForm]
///
/// Every form instance owns its configuration, so two forms can deliver
/// to different recipients with different subject prefixes without any
/// shared state. Start from [`FormConfig::default`] and override the
/// fields that differ:
///
/// ```rust
/// use envelope::FormConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = FormConfig {
///     subject_prefix: "[helpdesk] ".to_owned(),
///     recipients: vec!["support@example.org".parse()?],
///     ..FormConfig::default()
/// };
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FormConfig {
    /// Prepended verbatim to the user supplied subject
    pub subject_prefix: String,
    /// Sender mailbox of the outgoing email
    pub from: Mailbox,
    /// Mailboxes the email is delivered to
    pub recipients: Vec<Mailbox>,
    /// Candidate template names for the message body, tried in order
    pub body_templates: Vec<String>,
    /// Hidden anti-spam field checked during validation
    #[cfg(feature = "honeypot")]
    pub honeypot: Option<Honeypot>,
}

impl Default for FormConfig {
    fn default() -> Self {
        let webmaster: Mailbox = DEFAULT_ADDRESS
            .parse()
            .expect("webmaster@localhost is a valid mailbox");
        FormConfig {
            subject_prefix: DEFAULT_SUBJECT_PREFIX.to_owned(),
            from: webmaster.clone(),
            recipients: vec![webmaster],
            body_templates: vec![DEFAULT_BODY_TEMPLATE.to_owned()],
            #[cfg(feature = "honeypot")]
            honeypot: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config() {
        let config = FormConfig::default();

        assert_eq!(config.subject_prefix, "Message from contact form: ");
        assert_eq!(config.from.email.to_string(), "webmaster@localhost");
        assert_eq!(config.recipients.len(), 1);
        assert_eq!(config.recipients[0], config.from);
        assert_eq!(config.body_templates, [DEFAULT_BODY_TEMPLATE]);
    }

    #[test]
    fn overrides_leave_other_fields_at_defaults() {
        let config = FormConfig {
            subject_prefix: "[helpdesk] ".to_owned(),
            ..FormConfig::default()
        };

        assert_eq!(config.subject_prefix, "[helpdesk] ");
        assert_eq!(config.from.email.to_string(), "webmaster@localhost");
    }
}
