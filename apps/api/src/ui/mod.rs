//! Server-rendered web UI: a single page with the upload form and, after a
//! submit, the scored and highlighted comparison.

pub mod components;
pub mod handlers;
pub mod templates;
pub mod view;

use handlebars::{Handlebars, RenderError, TemplateError};

use crate::ui::view::PageView;

const PAGE_TEMPLATE: &str = "page";

/// Templates compiled once at startup and shared through `AppState`.
pub struct Renderer {
    handlebars: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_partial("styles", templates::STYLES)?;
        handlebars.register_template_string(PAGE_TEMPLATE, templates::PAGE)?;
        Ok(Self { handlebars })
    }

    pub fn render_page(&self, view: &PageView) -> Result<String, RenderError> {
        self.handlebars.render(PAGE_TEMPLATE, view)
    }
}
