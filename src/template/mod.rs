//! Template engine seam
//!
//! Email bodies and form snippets are produced through the
//! [`TemplateEngine`] trait, so any engine that can render a named
//! template from a map of values can back a form. The [`tera`] module
//! (on by default) provides a ready made implementation preloaded with
//! the bundled templates.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{self, Error};

#[cfg(feature = "tera")]
#[cfg_attr(docsrs, doc(cfg(feature = "tera")))]
pub mod tera;

/// Name of the bundled plain text body template
pub const DEFAULT_BODY_TEMPLATE: &str = "envelope/email_body.txt";

/// Name of the bundled form snippet template
pub const DEFAULT_FORM_TEMPLATE: &str = "envelope/contact_form.html";

/// Name of the bundled honeypot snippet template
#[cfg(feature = "honeypot")]
#[cfg_attr(docsrs, doc(cfg(feature = "honeypot")))]
pub const DEFAULT_HONEYPOT_TEMPLATE: &str = "envelope/honeypot_field.html";

/// Values handed to a template while rendering
pub type TemplateContext = HashMap<String, Value>;

/// Rendering backend for email bodies and form snippets
pub trait TemplateEngine {
    /// Renders the named template with the given context
    ///
    /// A context value the template needs but the map does not carry is
    /// a rendering error, not an empty substitution.
    fn render(&self, name: &str, context: &TemplateContext) -> Result<String, Error>;

    /// Returns true if a template with this name is registered
    fn has_template(&self, name: &str) -> bool;

    /// Renders the first of `names` that resolves to a known template
    fn render_first(&self, names: &[String], context: &TemplateContext) -> Result<String, Error> {
        for name in names {
            if self.has_template(name) {
                return self.render(name, context);
            }
        }
        if names.is_empty() {
            Err(error::template("no template candidates were given"))
        } else {
            Err(error::template(format!(
                "no template found among candidates: {}",
                names.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    /// Engine returning canned output per template name
    struct MapEngine(HashMap<String, String>);

    impl MapEngine {
        fn with(entries: &[(&str, &str)]) -> Self {
            MapEngine(
                entries
                    .iter()
                    .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                    .collect(),
            )
        }
    }

    impl TemplateEngine for MapEngine {
        fn render(&self, name: &str, _context: &TemplateContext) -> Result<String, Error> {
            self.0
                .get(name)
                .cloned()
                .ok_or_else(|| error::template(format!("unknown template: {}", name)))
        }

        fn has_template(&self, name: &str) -> bool {
            self.0.contains_key(name)
        }
    }

    #[test]
    fn render_first_takes_the_first_known_name() {
        let engine = MapEngine::with(&[("a.txt", "alpha"), ("b.txt", "beta")]);
        let names = ["a.txt".to_owned(), "b.txt".to_owned()];

        let out = engine.render_first(&names, &TemplateContext::new()).unwrap();
        assert_eq!(out, "alpha");
    }

    #[test]
    fn render_first_skips_unknown_names() {
        let engine = MapEngine::with(&[("b.txt", "beta")]);
        let names = ["a.txt".to_owned(), "b.txt".to_owned()];

        let out = engine.render_first(&names, &TemplateContext::new()).unwrap();
        assert_eq!(out, "beta");
    }

    #[test]
    fn render_first_with_no_match_is_a_template_error() {
        let engine = MapEngine::with(&[]);
        let names = ["a.txt".to_owned()];

        let err = engine
            .render_first(&names, &TemplateContext::new())
            .unwrap_err();
        assert!(err.is_template());
    }

    #[test]
    fn render_first_with_no_candidates_is_a_template_error() {
        let engine = MapEngine::with(&[("a.txt", "alpha")]);

        let err = engine
            .render_first(&[], &TemplateContext::new())
            .unwrap_err();
        assert!(err.is_template());
    }
}
