//! Helpers for rendering the form into a page
//!
//! Request handlers call these to produce the form markup and the
//! optional anti-spam fields, then splice the returned snippets into
//! the surrounding page.

#[cfg(feature = "honeypot")]
use serde_json::Value;

#[cfg(feature = "honeypot")]
use crate::template::DEFAULT_HONEYPOT_TEMPLATE;
use crate::{
    config::FormConfig,
    error::{self, Error},
    template::{TemplateContext, TemplateEngine, DEFAULT_FORM_TEMPLATE},
};

/// Renders the contact form markup
///
/// The context must carry the form state under the `form` key, as
/// produced by
/// [`ContactForm::to_template_value`](crate::ContactForm::to_template_value).
/// An `antispam_fields` string in the context is spliced into the form
/// unescaped; see [`antispam_fields`].
///
/// # Examples
///
/// ```rust
/// # use std::error::Error;
/// #
/// # #[cfg(feature = "tera")]
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use envelope::{tags, template::TemplateContext, ContactForm, TeraEngine};
///
/// let engine = TeraEngine::new();
/// let form = ContactForm::new();
///
/// let mut context = TemplateContext::new();
/// context.insert("form".to_owned(), form.to_template_value());
///
/// let html = tags::render_contact_form(&engine, &context)?;
/// assert!(html.contains("<form"));
/// # Ok(())
/// # }
/// #
/// # #[cfg(not(feature = "tera"))]
/// # fn main() {}
/// ```
pub fn render_contact_form<E>(engine: &E, context: &TemplateContext) -> Result<String, Error>
where
    E: TemplateEngine + ?Sized,
{
    let names = [DEFAULT_FORM_TEMPLATE.to_owned()];
    render_contact_form_with(engine, &names, context)
}

/// Renders the contact form markup with caller supplied templates
///
/// Like [`render_contact_form`], trying `template_names` in order
/// instead of the bundled snippet.
pub fn render_contact_form_with<E>(
    engine: &E,
    template_names: &[String],
    context: &TemplateContext,
) -> Result<String, Error>
where
    E: TemplateEngine + ?Sized,
{
    if !context.contains_key("form") {
        return Err(error::template(
            "there is no `form` variable in the template context",
        ));
    }
    engine.render_first(template_names, context)
}

/// Renders the hidden anti-spam fields configured for a form
///
/// Returns an empty string when the configuration has no honeypot, or
/// when the crate was built without the `honeypot` feature, so the
/// result can be spliced into the page unconditionally.
pub fn antispam_fields<E>(engine: &E, config: &FormConfig) -> Result<String, Error>
where
    E: TemplateEngine + ?Sized,
{
    honeypot_fields(engine, config)
}

#[cfg(feature = "honeypot")]
fn honeypot_fields<E>(engine: &E, config: &FormConfig) -> Result<String, Error>
where
    E: TemplateEngine + ?Sized,
{
    match &config.honeypot {
        Some(honeypot) => {
            let mut context = TemplateContext::new();
            context.insert(
                "field_name".to_owned(),
                Value::String(honeypot.field_name().to_owned()),
            );
            engine.render_first(&[DEFAULT_HONEYPOT_TEMPLATE.to_owned()], &context)
        }
        None => Ok(String::new()),
    }
}

#[cfg(not(feature = "honeypot"))]
fn honeypot_fields<E>(_engine: &E, _config: &FormConfig) -> Result<String, Error>
where
    E: TemplateEngine + ?Sized,
{
    Ok(String::new())
}

#[cfg(all(test, feature = "tera"))]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use super::*;
    use crate::{form::FormData, template::tera::TeraEngine, ContactForm};

    fn form_context(form: &ContactForm) -> TemplateContext {
        let mut context = TemplateContext::new();
        context.insert("form".to_owned(), form.to_template_value());
        context
    }

    #[test]
    fn a_context_without_the_form_variable_is_an_error() {
        let engine = TeraEngine::new();

        let err = render_contact_form(&engine, &TemplateContext::new()).unwrap_err();
        assert!(err.is_template());
    }

    #[test]
    fn renders_an_unbound_form() {
        let engine = TeraEngine::new();
        let form = ContactForm::new();

        let html = render_contact_form(&engine, &form_context(&form)).unwrap();

        assert!(html.contains("<form method=\"post\""));
        assert!(html.contains("name=\"sender\""));
        assert!(html.contains("name=\"email\""));
        assert!(html.contains("name=\"subject\""));
        assert!(html.contains("name=\"message\""));
    }

    #[test]
    fn redisplays_submitted_values_and_errors() {
        let engine = TeraEngine::new();
        let mut form = ContactForm::new();
        form.bind(FormData {
            sender: "Jane Doe".to_owned(),
            email: "broken".to_owned(),
            subject: String::new(),
            message: "Hi there".to_owned(),
            ..FormData::default()
        });
        assert!(!form.is_valid());

        let html = render_contact_form(&engine, &form_context(&form)).unwrap();

        assert!(html.contains("value=\"Jane Doe\""));
        assert!(html.contains("value=\"broken\""));
        assert!(html.contains("Enter a valid email address."));
    }

    #[test]
    fn caller_templates_are_tried_in_order() {
        let mut engine = TeraEngine::new();
        engine
            .tera_mut()
            .add_raw_template("site/form.html", "custom form")
            .unwrap();
        let form = ContactForm::new();

        let names = ["missing.html".to_owned(), "site/form.html".to_owned()];
        let html = render_contact_form_with(&engine, &names, &form_context(&form)).unwrap();

        assert_eq!(html, "custom form");
    }

    #[test]
    fn antispam_markup_can_be_spliced_into_the_form() {
        let engine = TeraEngine::new();
        let form = ContactForm::new();

        let mut context = form_context(&form);
        context.insert(
            "antispam_fields".to_owned(),
            Value::String("<div hidden>trap</div>".to_owned()),
        );

        let html = render_contact_form(&engine, &context).unwrap();
        assert!(html.contains("<div hidden>trap</div>"));
    }

    #[test]
    fn antispam_fields_without_a_honeypot_is_empty() {
        let engine = TeraEngine::new();
        let config = FormConfig::default();

        assert_eq!(antispam_fields(&engine, &config).unwrap(), "");
    }

    #[cfg(feature = "honeypot")]
    #[test]
    fn antispam_fields_renders_the_configured_honeypot() {
        use crate::honeypot::Honeypot;

        let engine = TeraEngine::new();
        let config = FormConfig {
            honeypot: Some(Honeypot::named("fax_number")),
            ..FormConfig::default()
        };

        let html = antispam_fields(&engine, &config).unwrap();
        assert!(html.contains("name=\"fax_number\""));
        assert!(html.contains("style=\"display:none\""));
    }
}
