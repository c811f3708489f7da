//! envelope is a contact form library
//!
//! It covers the boring side of "email us" pages: validating the classic
//! sender, email, subject and message field set, rendering the email body
//! from a template, delivering the result over a [lettre] transport and
//! telling the rest of the application about it. The form is a plain
//! value with explicit configuration, so two forms with different
//! recipients or subject prefixes coexist without shared state.
//!
//! [lettre]: https://crates.io/crates/lettre
//!
//! ## Features
//!
//! * **tera** (default): bundled [`TeraEngine`] with ready made templates
//! * **honeypot**: hidden anti-spam field support
//! * **serde**: `Serialize` and `Deserialize` on [`FormData`]
//! * **tracing**: delivery logging through `tracing`
//! * **tokio1**: [`ContactForm::send_async`] over lettre's Tokio transports
//!
//! ## Example
//!
//! ```rust
//! # use std::error::Error;
//! #
//! # #[cfg(feature = "tera")]
//! # fn main() -> Result<(), Box<dyn Error>> {
//! use envelope::{tags, template::TemplateContext, ContactForm, FormConfig, FormData, TeraEngine};
//! use lettre::transport::stub::StubTransport;
//!
//! let engine = TeraEngine::new();
//! let transport = StubTransport::new_ok();
//!
//! let config = FormConfig {
//!     subject_prefix: "[helpdesk] ".to_owned(),
//!     recipients: vec!["support@example.org".parse()?],
//!     ..FormConfig::default()
//! };
//!
//! let mut form = ContactForm::with_config(config);
//! form.on_after_send(|_message, _form| {
//!     // notify your team here
//! });
//!
//! form.bind(FormData {
//!     sender: "Jane Doe".to_owned(),
//!     email: "jane@example.org".to_owned(),
//!     subject: "Broken login".to_owned(),
//!     message: "The login form 500s.".to_owned(),
//!     ..FormData::default()
//! });
//!
//! if form.is_valid() {
//!     let delivered = form.send(&engine, &transport)?;
//!     assert!(delivered);
//!     assert_eq!(transport.messages().len(), 1);
//! } else {
//!     // redisplay the page with errors
//!     let mut context = TemplateContext::new();
//!     context.insert("form".to_owned(), form.to_template_value());
//!     let _html = tags::render_contact_form(&engine, &context)?;
//! }
//! # Ok(())
//! # }
//! #
//! # #[cfg(not(feature = "tera"))]
//! # fn main() {}
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::error::Error as StdError;

pub mod config;
pub mod error;
pub mod form;
#[cfg(feature = "honeypot")]
#[cfg_attr(docsrs, doc(cfg(feature = "honeypot")))]
pub mod honeypot;
pub mod signals;
pub mod tags;
pub mod template;

pub use self::{
    config::{FormConfig, DEFAULT_ADDRESS, DEFAULT_SUBJECT_PREFIX},
    error::Error,
    form::{CleanedData, ContactForm, Field, FieldErrors, FormData},
    signals::{AfterSend, AfterSendListener},
    template::{TemplateContext, TemplateEngine},
};

#[cfg(feature = "honeypot")]
#[cfg_attr(docsrs, doc(cfg(feature = "honeypot")))]
pub use self::honeypot::Honeypot;

#[cfg(feature = "tera")]
#[cfg_attr(docsrs, doc(cfg(feature = "tera")))]
pub use self::template::tera::TeraEngine;

/// Re-export of the mail stack underneath
pub use lettre;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;
