use crate::Engine;
use crate::Result;
use crate::compiler::output;
use crate::host::{Context, Renderable};
use crate::tpl::verbatim::VerbatimNode;
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

const HANDLEBARS_VERSION: &str = "v1.3.0";

/// File name `handlebars_js` loads the helper script from, under `static_url`.
pub const HANDLEBARS_UTIL_FILE: &str = "handlebars-util.js";

/// Client helper defining `Handlebars.load_template(name)`, which compiles a
/// raw template `<script>` by id on first use and caches it in
/// `Handlebars.templates`. Hosts serve it as [`HANDLEBARS_UTIL_FILE`].
pub const HANDLEBARS_UTIL_JS: &str = include_str!("../../static/handlebars-util.js");

/// A verbatim block wrapped in a named template `<script>`.
///
/// ```text
/// {% tplhandlebars "tpl-popup" %}
///     {{#ranges}}
///         <li>{{min}} < {{max}}</li>
///     {{/ranges}}
/// {% endtplhandlebars %}
/// ```
///
/// With `precompile_templates` the block is compiled instead and emitted as
/// a JavaScript `<script>`.
pub struct HandlebarsNode {
    template_id: String,
    body: VerbatimNode,
    engine: Arc<Engine>,
}

impl HandlebarsNode {
    pub fn new(template_id: impl Into<String>, body: VerbatimNode, engine: Arc<Engine>) -> Self {
        Self {
            template_id: template_id.into(),
            body,
            engine,
        }
    }

    async fn render_compiled(&self, source: &str) -> Result<String> {
        let compiler = self.engine.stream_compiler()?;
        debug!("Precompiling template '{}'", self.template_id);
        let compiled = compiler.compile(&self.template_id, source).await?;

        if let Some(path) = self.engine.settings().compiled_output_file() {
            output::append(&path, &compiled).await?;
        }

        Ok(format!(
            "<script type=\"text/javascript\">{}</script>",
            compiled
        ))
    }
}

#[async_trait]
impl Renderable for HandlebarsNode {
    async fn render(&self, ctx: &Context) -> Result<String> {
        let output = self.body.render(ctx).await?;

        if self.engine.settings().precompile_templates {
            return self.render_compiled(&output).await;
        }

        let marker = self.engine.settings().marker();
        Ok(format!(
            "\n        <script type=\"{}\" {}=\"{}\">\n        {}\n        </script>",
            marker.mime, marker.id_attr, self.template_id, output
        ))
    }
}

/// Script tags loading the client runtime.
///
/// When templates are precompiled only the runtime build is needed, followed
/// by the shared compiled-templates file.
pub struct HandlebarsJsNode {
    engine: Arc<Engine>,
}

impl HandlebarsJsNode {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Renderable for HandlebarsJsNode {
    async fn render(&self, _ctx: &Context) -> Result<String> {
        let settings = self.engine.settings();
        let static_url = &settings.static_url;

        let scripts = if settings.precompile_templates {
            vec![
                format!("handlebars.runtime-{}.js", HANDLEBARS_VERSION),
                settings.compiled_output_path.clone(),
            ]
        } else {
            vec![
                format!("handlebars-{}.js", HANDLEBARS_VERSION),
                HANDLEBARS_UTIL_FILE.to_string(),
            ]
        };

        Ok(scripts
            .iter()
            .map(|script| format!("<script src=\"{}{}\"></script>", static_url, script))
            .collect())
    }
}
