//! Template engine backed by [Tera]
//!
//! [Tera]: https://keats.github.io/tera

use std::fmt;

use ::tera::{Context, Tera};

#[cfg(feature = "honeypot")]
use crate::template::DEFAULT_HONEYPOT_TEMPLATE;
use crate::{
    error::{self, Error},
    template::{TemplateContext, TemplateEngine, DEFAULT_BODY_TEMPLATE, DEFAULT_FORM_TEMPLATE},
};

/// [`TemplateEngine`] implementation over a [`Tera`] instance
///
/// A fresh engine knows the bundled templates under their default names.
/// Bring your own `Tera` instance through [`TeraEngine::from_tera`] to
/// add templates or replace the bundled ones, or register extra
/// templates later through [`TeraEngine::tera_mut`].
///
/// # Examples
///
/// ```rust
/// use envelope::template::{TemplateEngine, DEFAULT_BODY_TEMPLATE};
/// use envelope::TeraEngine;
///
/// let engine = TeraEngine::new();
/// assert!(engine.has_template(DEFAULT_BODY_TEMPLATE));
/// ```
pub struct TeraEngine {
    tera: Tera,
}

impl TeraEngine {
    /// Creates an engine holding the bundled templates
    pub fn new() -> Self {
        Self::from_tera(Tera::default())
    }

    /// Wraps an existing `Tera` instance
    ///
    /// Bundled templates are only registered under names the instance
    /// does not already define, so templates loaded into `tera` win over
    /// the defaults.
    pub fn from_tera(mut tera: Tera) -> Self {
        register_builtins(&mut tera);
        TeraEngine { tera }
    }

    /// Borrows the underlying `Tera` instance
    pub fn tera(&self) -> &Tera {
        &self.tera
    }

    /// Mutably borrows the underlying `Tera` instance
    pub fn tera_mut(&mut self) -> &mut Tera {
        &mut self.tera
    }
}

impl Default for TeraEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TeraEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeraEngine")
            .field(
                "templates",
                &self.tera.get_template_names().collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl TemplateEngine for TeraEngine {
    fn render(&self, name: &str, context: &TemplateContext) -> Result<String, Error> {
        let context = Context::from_serialize(context).map_err(error::template)?;
        self.tera.render(name, &context).map_err(error::template)
    }

    fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }
}

fn register_builtins(tera: &mut Tera) {
    add_missing(
        tera,
        DEFAULT_BODY_TEMPLATE,
        include_str!("../../templates/email_body.txt"),
    );
    add_missing(
        tera,
        DEFAULT_FORM_TEMPLATE,
        include_str!("../../templates/contact_form.html"),
    );
    #[cfg(feature = "honeypot")]
    add_missing(
        tera,
        DEFAULT_HONEYPOT_TEMPLATE,
        include_str!("../../templates/honeypot_field.html"),
    );
}

fn add_missing(tera: &mut Tera, name: &str, source: &str) {
    if tera.get_template_names().all(|n| n != name) {
        tera.add_raw_template(name, source)
            .expect("bundled template parses");
    }
}
