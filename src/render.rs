//! Rendering of the generated theme files.
//!
//! Two files are produced:
//!
//! - the link fragment, rendered from an embedded MiniJinja template
//! - the wrapper template, which extends the theme's `base.html` and includes
//!   the fragment only while the plugin is active
//!
//! The fragment environment has auto-escaping disabled so URLs reach the
//! output byte-for-byte. Attribute values go through the `attr` filter,
//! which escapes only the characters that would break out of a quoted
//! attribute.

use minijinja::{AutoEscape, Environment, Error, Value};

use crate::styles::RenderedStyleList;

/// Name the fragment template is registered under.
pub const STYLES_TEMPLATE_NAME: &str = "styles.html";

const STYLES_TEMPLATE: &str = include_str!("templates/styles.html");

/// A renderer with the link fragment template pre-compiled.
///
/// # Example
///
/// ```rust
/// use docstyler::{RenderedStyleList, StyleLink, StyleRenderer};
///
/// let renderer = StyleRenderer::new().unwrap();
/// let list = RenderedStyleList {
///     persistent_styles: vec![StyleLink {
///         url: "/css/base.css".into(),
///         title: None,
///         media: None,
///     }],
///     ..Default::default()
/// };
/// assert_eq!(
///     renderer.render_links(&list).unwrap(),
///     "<link rel=\"stylesheet\" href=\"/css/base.css\">\n"
/// );
/// ```
pub struct StyleRenderer {
    env: Environment<'static>,
}

impl StyleRenderer {
    /// Creates a renderer and compiles the fragment template.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded template fails to compile.
    pub fn new() -> Result<Self, Error> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        register_filters(&mut env);
        env.add_template(STYLES_TEMPLATE_NAME, STYLES_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Renders one `<link>` line per stylesheet.
    ///
    /// Persistent links come first, then preferred, then alternate, each in
    /// configuration order. An empty list renders an empty string.
    pub fn render_links(&self, links: &RenderedStyleList) -> Result<String, Error> {
        let tmpl = self.env.get_template(STYLES_TEMPLATE_NAME)?;
        tmpl.render(links)
    }
}

/// Renders the wrapper template that pulls the fragment into every page.
///
/// The output is itself a host template and is written verbatim.
pub fn render_wrapper(plugin: &str, styles_file: &str) -> String {
    format!(
        r#"{{% extends "base.html" %}}
{{% block styles %}}
    {{{{ super() }}}}
        {{%- if '{plugin}' in config['plugins'] %}}
            {{% include "{styles_file}" %}}
        {{%- endif %}}
{{% endblock styles %}}
"#
    )
}

fn register_filters(env: &mut Environment<'static>) {
    // Escapes a value for use inside a double-quoted attribute.
    env.add_filter("attr", |value: Value| -> String {
        escape_attr(&value.to_string())
    });
}

fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
