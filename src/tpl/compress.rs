use crate::Engine;
use crate::Result;
use crate::cache;
use crate::host::{Context, Renderable};
use crate::markup;
use crate::tpl::verbatim::VerbatimNode;
use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;

const LOAD_LISTENER_OPEN: &str =
    "<script type=\"text/javascript\">window.addEventListener(\"load\", function() {";
const LOAD_LISTENER_CLOSE: &str = "});</script>";

/// Replaces the template `<script>` elements of its body with compiled
/// JavaScript registered on window load.
///
/// Without a configured compiler the body is emitted unchanged, followed by a
/// script that only fires the loaded callback.
pub struct CompressNode {
    body: VerbatimNode,
    engine: Arc<Engine>,
}

impl CompressNode {
    pub fn new(body: VerbatimNode, engine: Arc<Engine>) -> Self {
        Self { body, engine }
    }

    fn render_raw(&self, raw: String) -> String {
        let mut output = raw;
        output.push_str(LOAD_LISTENER_OPEN);
        output.push_str(&self.engine.settings().loaded_callback_js);
        output.push_str(LOAD_LISTENER_CLOSE);
        output
    }

    async fn render_compiled(&self, raw: &str) -> Result<String> {
        let key = cache::digest(raw);
        if let Some(cache) = self.engine.cache()
            && let Some(hit) = cache.get(&key).await
        {
            debug!("Compiled templates cache hit: {}", key);
            return Ok(hit);
        }

        let compiler = self.engine.file_compiler()?;
        let doc = markup::split(raw, self.engine.settings().marker())?;

        let start = Instant::now();
        let mut output = String::from(LOAD_LISTENER_OPEN);
        for fragment in &doc.fragments {
            output.push_str(&compiler.compile(&fragment.name, &fragment.body).await?);
        }
        output.push_str(&self.engine.settings().loaded_callback_js);
        output.push_str(LOAD_LISTENER_CLOSE);
        output.push_str(&doc.markup);
        info!(
            "Compiled {} templates in {}ms",
            doc.fragments.len(),
            start.elapsed().as_millis()
        );

        if let Some(cache) = self.engine.cache() {
            cache.set(&key, output.clone()).await;
        }
        Ok(output)
    }
}

#[async_trait]
impl Renderable for CompressNode {
    async fn render(&self, ctx: &Context) -> Result<String> {
        let raw = self.body.render(ctx).await?;
        if self.engine.has_file_compiler() {
            self.render_compiled(&raw).await
        } else {
            Ok(self.render_raw(raw))
        }
    }
}
