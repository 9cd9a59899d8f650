//! Template engine for HTML fragments

use crate::{MoodlogError, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Template engine wrapper
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create a new template engine
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();

        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(handlebars::html_escape);

        handlebars.register_helper("uppercase", Box::new(uppercase_helper));

        Self { handlebars }
    }

    /// Render an inline template with data
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        self.handlebars
            .render_template(template, data)
            .map_err(|e| MoodlogError::template(e.to_string()))
    }

    /// Register a template
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| MoodlogError::template(e.to_string()))?;
        Ok(())
    }

    /// Render a registered template
    pub fn render_named<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        self.handlebars
            .render(name, data)
            .map_err(|e| MoodlogError::template(e.to_string()))
    }

    /// Whether a template is registered under `name`
    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn uppercase_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let param = h
        .param(0)
        .ok_or_else(|| handlebars::RenderErrorReason::ParamNotFoundForIndex("uppercase", 0))?;

    let value = param.value().as_str().unwrap_or("");
    out.write(&handlebars::html_escape(&value.to_uppercase()))?;
    Ok(())
}
