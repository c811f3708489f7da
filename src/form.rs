//! Contact form binding, validation and delivery

use std::{collections::BTreeMap, fmt};

#[cfg(feature = "tokio1")]
use lettre::AsyncTransport;
use lettre::{
    message::{header::ContentType, Mailbox},
    Address, Message, Transport,
};
use serde_json::{json, Value};

use crate::{
    config::FormConfig,
    error::{self, Error},
    signals::AfterSend,
    template::{TemplateContext, TemplateEngine},
};

/// Message recorded when a required field is blank
pub const REQUIRED_ERROR: &str = "This field is required.";

/// Message recorded when the email field does not parse as an address
pub const INVALID_EMAIL_ERROR: &str = "Enter a valid email address.";

/// Message recorded when the hidden anti-spam field came back non-empty
#[cfg(feature = "honeypot")]
#[cfg_attr(docsrs, doc(cfg(feature = "honeypot")))]
pub const HONEYPOT_ERROR: &str = "This field must be left empty.";

/// Longest accepted sender name, in characters
pub const MAX_SENDER_LENGTH: usize = 70;

/// Longest accepted subject line, in characters
pub const MAX_SUBJECT_LENGTH: usize = 127;

/// Longest accepted message text, in characters
pub const MAX_MESSAGE_LENGTH: usize = 1000;

/// Form fields addressable in validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Name of the person writing in
    Sender,
    /// Reply address of the person writing in
    Email,
    /// Subject line
    Subject,
    /// Message text
    Message,
    /// Hidden anti-spam field
    #[cfg(feature = "honeypot")]
    #[cfg_attr(docsrs, doc(cfg(feature = "honeypot")))]
    Honeypot,
}

impl Field {
    /// Key under which the field appears in template contexts
    ///
    /// The markup name of the honeypot input is configured on
    /// [`Honeypot`](crate::honeypot::Honeypot) instead, since bots look
    /// for predictable names.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Sender => "sender",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
            #[cfg(feature = "honeypot")]
            Field::Honeypot => "honeypot",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validation errors keyed by field, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    inner: BTreeMap<Field, Vec<String>>,
}

impl FieldErrors {
    /// Returns true if no field has errors
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of fields with at least one error
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Messages recorded for one field
    pub fn get(&self, field: Field) -> &[String] {
        self.inner.get(&field).map_or(&[], Vec::as_slice)
    }

    /// Iterates over fields with errors
    pub fn iter(&self) -> impl Iterator<Item = (Field, &[String])> + '_ {
        self.inner
            .iter()
            .map(|(field, messages)| (*field, messages.as_slice()))
    }

    pub(crate) fn push<S: Into<String>>(&mut self, field: Field, message: S) {
        self.inner.entry(field).or_default().push(message.into());
    }

    pub(crate) fn clear(&mut self) {
        self.inner.clear();
    }
}

/// Raw submitted values, exactly as they came in from the request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormData {
    /// Name the visitor filled in
    pub sender: String,
    /// Reply address the visitor filled in
    pub email: String,
    /// Subject line, possibly empty
    pub subject: String,
    /// Message text
    pub message: String,
    /// Value submitted for the hidden anti-spam field, if any
    ///
    /// Request payloads name this field after the configured
    /// [`Honeypot::field_name`](crate::honeypot::Honeypot::field_name),
    /// not `honeypot`. Deserialization accepts the default name
    /// (`phonenumber`) directly; submissions rendered with a custom
    /// name need the value looked up under that name and stored here
    /// before binding.
    #[cfg(feature = "honeypot")]
    #[cfg_attr(docsrs, doc(cfg(feature = "honeypot")))]
    #[cfg_attr(feature = "serde", serde(alias = "phonenumber"))]
    pub honeypot: Option<String>,
}

/// Validated values produced by a successful [`ContactForm::is_valid`] pass
///
/// Text fields keep the submitted value verbatim; only the email field
/// is normalized, into a parsed [`Address`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedData {
    /// Sender name
    pub sender: String,
    /// Parsed reply address
    pub email: Address,
    /// Subject line, possibly empty
    pub subject: String,
    /// Message text
    pub message: String,
}

/// A contact form: bind submitted data, validate it, deliver the email
///
/// The form follows the bound-form lifecycle: construct, [`bind`] the
/// submitted values, check [`is_valid`], then [`send`]. Validation
/// failures land in [`errors`] for redisplay; a successful pass stores
/// [`cleaned_data`] and unlocks composition and delivery.
///
/// [`bind`]: ContactForm::bind
/// [`is_valid`]: ContactForm::is_valid
/// [`send`]: ContactForm::send
/// [`errors`]: ContactForm::errors
/// [`cleaned_data`]: ContactForm::cleaned_data
///
/// # Examples
///
/// ```rust
/// # use std::error::Error;
/// #
/// # #[cfg(feature = "tera")]
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use envelope::{ContactForm, FormData, TeraEngine};
/// use lettre::transport::stub::StubTransport;
///
/// let engine = TeraEngine::new();
/// let transport = StubTransport::new_ok();
///
/// let mut form = ContactForm::new();
/// form.bind(FormData {
///     sender: "Jane Doe".to_owned(),
///     email: "jane@example.org".to_owned(),
///     subject: "Hello".to_owned(),
///     message: "A deep thought.".to_owned(),
///     ..FormData::default()
/// });
///
/// if form.is_valid() {
///     let delivered = form.send(&engine, &transport)?;
///     assert!(delivered);
/// }
/// # Ok(())
/// # }
/// #
/// # #[cfg(not(feature = "tera"))]
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct ContactForm {
    config: FormConfig,
    after_send: AfterSend,
    data: Option<FormData>,
    cleaned: Option<CleanedData>,
    errors: FieldErrors,
}

impl ContactForm {
    /// Creates an unbound form with the default configuration
    pub fn new() -> Self {
        Self::with_config(FormConfig::default())
    }

    /// Creates an unbound form with the given configuration
    pub fn with_config(config: FormConfig) -> Self {
        ContactForm {
            config,
            after_send: AfterSend::new(),
            data: None,
            cleaned: None,
            errors: FieldErrors::default(),
        }
    }

    /// Borrows the form configuration
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Mutably borrows the form configuration
    pub fn config_mut(&mut self) -> &mut FormConfig {
        &mut self.config
    }

    /// Borrows the after-send listener list
    pub fn after_send(&self) -> &AfterSend {
        &self.after_send
    }

    /// Subscribes a listener to run after each successful delivery
    pub fn on_after_send<F>(&mut self, listener: F)
    where
        F: Fn(&Message, &ContactForm) + Send + Sync + 'static,
    {
        self.after_send.subscribe(listener);
    }

    /// Binds submitted values to the form
    ///
    /// Earlier validation state is discarded; call
    /// [`is_valid`](ContactForm::is_valid) again afterwards.
    pub fn bind(&mut self, data: FormData) {
        self.data = Some(data);
        self.cleaned = None;
        self.errors.clear();
    }

    /// Returns true if data has been bound
    pub fn is_bound(&self) -> bool {
        self.data.is_some()
    }

    /// Borrows the bound raw values, if any
    pub fn data(&self) -> Option<&FormData> {
        self.data.as_ref()
    }

    /// Errors recorded by the last [`is_valid`](ContactForm::is_valid) pass
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Validated values, present after a successful validation pass
    pub fn cleaned_data(&self) -> Option<&CleanedData> {
        self.cleaned.as_ref()
    }

    /// Validates the bound data
    ///
    /// Clears earlier findings first, so calling it twice gives the
    /// same outcome, not doubled error messages. An unbound form is
    /// never valid. On success the cleaned values become available to
    /// the composition methods.
    pub fn is_valid(&mut self) -> bool {
        self.errors.clear();
        self.cleaned = None;

        let data = match &self.data {
            Some(data) => data,
            None => return false,
        };

        if data.sender.trim().is_empty() {
            self.errors.push(Field::Sender, REQUIRED_ERROR);
        } else {
            let length = data.sender.chars().count();
            if length > MAX_SENDER_LENGTH {
                self.errors
                    .push(Field::Sender, length_error(MAX_SENDER_LENGTH, length));
            }
        }

        let email = data.email.trim();
        let mut parsed_email = None;
        if email.is_empty() {
            self.errors.push(Field::Email, REQUIRED_ERROR);
        } else {
            match email.parse::<Address>() {
                Ok(address) => parsed_email = Some(address),
                Err(_) => self.errors.push(Field::Email, INVALID_EMAIL_ERROR),
            }
        }

        let subject_length = data.subject.chars().count();
        if subject_length > MAX_SUBJECT_LENGTH {
            self.errors
                .push(Field::Subject, length_error(MAX_SUBJECT_LENGTH, subject_length));
        }

        if data.message.trim().is_empty() {
            self.errors.push(Field::Message, REQUIRED_ERROR);
        } else {
            let length = data.message.chars().count();
            if length > MAX_MESSAGE_LENGTH {
                self.errors
                    .push(Field::Message, length_error(MAX_MESSAGE_LENGTH, length));
            }
        }

        #[cfg(feature = "honeypot")]
        if let Some(honeypot) = &self.config.honeypot {
            if !honeypot.passes(data.honeypot.as_deref()) {
                self.errors.push(Field::Honeypot, HONEYPOT_ERROR);
            }
        }

        match parsed_email {
            Some(email) if self.errors.is_empty() => {
                self.cleaned = Some(CleanedData {
                    sender: data.sender.clone(),
                    email,
                    subject: data.subject.clone(),
                    message: data.message.clone(),
                });
                true
            }
            _ => false,
        }
    }

    /// Values available to the body template
    pub fn template_context(&self) -> Result<TemplateContext, Error> {
        let cleaned = self.cleaned.as_ref().ok_or_else(error::not_validated)?;

        let mut context = TemplateContext::new();
        context.insert(
            Field::Sender.name().to_owned(),
            Value::String(cleaned.sender.clone()),
        );
        context.insert(
            Field::Email.name().to_owned(),
            Value::String(cleaned.email.to_string()),
        );
        context.insert(
            Field::Subject.name().to_owned(),
            Value::String(cleaned.subject.clone()),
        );
        context.insert(
            Field::Message.name().to_owned(),
            Value::String(cleaned.message.clone()),
        );
        Ok(context)
    }

    /// Final subject line
    ///
    /// The configured prefix followed by the submitted subject,
    /// joined verbatim with no separator or trimming.
    pub fn subject(&self) -> Result<String, Error> {
        let cleaned = self.cleaned.as_ref().ok_or_else(error::not_validated)?;
        Ok(format!("{}{}", self.config.subject_prefix, cleaned.subject))
    }

    /// Renders the message body
    ///
    /// The first configured body template known to `engine` is rendered
    /// with [`template_context`](ContactForm::template_context).
    pub fn body<E>(&self, engine: &E) -> Result<String, Error>
    where
        E: TemplateEngine + ?Sized,
    {
        let context = self.template_context()?;
        engine.render_first(&self.config.body_templates, &context)
    }

    /// Sender mailbox of the outgoing email
    pub fn from_mailbox(&self) -> &Mailbox {
        &self.config.from
    }

    /// Mailboxes the email is delivered to
    pub fn recipients(&self) -> &[Mailbox] {
        &self.config.recipients
    }

    /// Candidate template names for the message body
    pub fn template_names(&self) -> &[String] {
        &self.config.body_templates
    }

    /// Builds the outgoing email without sending it
    ///
    /// From and recipients come from the configuration. The submitted
    /// address goes into `Reply-To`, so answering the notification
    /// reaches the person who wrote in rather than the configured
    /// sender.
    pub fn compose<E>(&self, engine: &E) -> Result<Message, Error>
    where
        E: TemplateEngine + ?Sized,
    {
        let cleaned = self.cleaned.as_ref().ok_or_else(error::not_validated)?;
        let subject = self.subject()?;
        let body = self.body(engine)?;

        let mut builder = Message::builder()
            .from(self.config.from.clone())
            .reply_to(Mailbox::new(
                Some(cleaned.sender.clone()),
                cleaned.email.clone(),
            ))
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);
        for recipient in &self.config.recipients {
            builder = builder.to(recipient.clone());
        }

        builder.body(body).map_err(error::message)
    }

    /// Composes the email and hands it to `transport`
    ///
    /// Returns `Ok(true)` when the transport accepted the message;
    /// every subscribed after-send listener has then run exactly once.
    /// A transport level failure is logged and reported as `Ok(false)`.
    /// Everything that goes wrong before the transport is reached (an
    /// unvalidated form, a missing template, a rendering or assembly
    /// failure) is an `Err`.
    pub fn send<E, T>(&self, engine: &E, transport: &T) -> Result<bool, Error>
    where
        E: TemplateEngine + ?Sized,
        T: Transport,
        T::Error: fmt::Display,
    {
        let message = self.compose(engine)?;

        match transport.send(&message) {
            Ok(_response) => {
                self.delivered(&message);
                Ok(true)
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::error!("contact form delivery failed: {}", _err);
                Ok(false)
            }
        }
    }

    /// Asynchronous [`send`](ContactForm::send)
    #[cfg(feature = "tokio1")]
    #[cfg_attr(docsrs, doc(cfg(feature = "tokio1")))]
    pub async fn send_async<E, T>(&self, engine: &E, transport: &T) -> Result<bool, Error>
    where
        E: TemplateEngine + ?Sized,
        T: AsyncTransport + Sync,
        T::Error: fmt::Display,
    {
        let message = self.compose(engine)?;

        match transport.send(message.clone()).await {
            Ok(_response) => {
                self.delivered(&message);
                Ok(true)
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::error!("contact form delivery failed: {}", _err);
                Ok(false)
            }
        }
    }

    fn delivered(&self, message: &Message) {
        #[cfg(feature = "tracing")]
        if let Some(cleaned) = &self.cleaned {
            tracing::info!("contact form submitted and sent (from: {})", cleaned.email);
        }

        self.after_send.emit(message, self);
    }

    /// Form state as a template value for the form snippet
    ///
    /// Carries the raw submitted values under `data` and the per-field
    /// messages under `errors`. Every field key is always present, so
    /// templates can index without guards; an unbound form yields empty
    /// values throughout.
    pub fn to_template_value(&self) -> Value {
        let data = self.data.clone().unwrap_or_default();

        json!({
            "is_bound": self.data.is_some(),
            "data": {
                "sender": data.sender,
                "email": data.email,
                "subject": data.subject,
                "message": data.message,
            },
            "errors": {
                "sender": self.errors.get(Field::Sender),
                "email": self.errors.get(Field::Email),
                "subject": self.errors.get(Field::Subject),
                "message": self.errors.get(Field::Message),
            },
        })
    }
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

fn length_error(limit: usize, actual: usize) -> String {
    format!(
        "Ensure this value has at most {} characters (it has {}).",
        limit, actual
    )
}
