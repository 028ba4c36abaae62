use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Script run on window load once every template has been registered.
pub const HANDLEBARS_LOADED_JS: &str = "if (window.handlebars_loaded && 'function' == typeof(window.handlebars_loaded)) { window.handlebars_loaded(); }";

/// Default file name of the shared compiled-output script.
pub const DEFAULT_COMPILED_OUTPUT_PATH: &str = "compiled_templates.js";

const DEFAULT_STATIC_URL: &str = "/static/";
const DEFAULT_COMPILER_TIMEOUT_SECS: u64 = 60;

/// The attribute/MIME pair identifying a template `<script>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateMarker {
    pub id_attr: &'static str,
    pub mime: &'static str,
}

impl TemplateMarker {
    pub const STANDARD: TemplateMarker = TemplateMarker {
        id_attr: "id",
        mime: "text/x-handlebars-template",
    };

    /// Ember-style templates are named with `data-template-name`.
    pub const ALT: TemplateMarker = TemplateMarker {
        id_attr: "data-template-name",
        mime: "text/x-handlebars",
    };
}

/// Plugin configuration.
///
/// Every field has a default, so partial documents deserialize fine:
///
/// ```
/// let settings: handlebars_embed::settings::Settings =
///     serde_json::from_str(r#"{ "precompile_templates": true }"#).unwrap();
/// assert!(settings.precompile_templates);
/// assert_eq!(settings.compiled_output_path, "compiled_templates.js");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Shell command running the external compiler. May contain `{infile}`,
    /// `{outfile}` and `{template_name}` placeholders.
    pub compiler_command: Option<String>,
    /// Compile `tplhandlebars` blocks at render time instead of emitting them raw.
    pub precompile_templates: bool,
    /// File name, relative to `output_static_root`, collecting compiled templates.
    pub compiled_output_path: String,
    /// Directory the shared compiled-output file is written to.
    pub output_static_root: Option<PathBuf>,
    /// URL prefix for static assets emitted by `handlebars_js`.
    pub static_url: String,
    /// Use the `data-template-name` / `text/x-handlebars` marker pair.
    pub use_alt_attrs: bool,
    pub loaded_callback_js: String,
    /// Upper bound for one compiler run; `None` or `0` waits forever.
    pub compiler_timeout_secs: Option<u64>,
    /// Parent directory for per-invocation working directories.
    pub temp_root: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compiler_command: None,
            precompile_templates: false,
            compiled_output_path: DEFAULT_COMPILED_OUTPUT_PATH.to_string(),
            output_static_root: None,
            static_url: DEFAULT_STATIC_URL.to_string(),
            use_alt_attrs: false,
            loaded_callback_js: HANDLEBARS_LOADED_JS.to_string(),
            compiler_timeout_secs: Some(DEFAULT_COMPILER_TIMEOUT_SECS),
            temp_root: None,
        }
    }
}

impl Settings {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup, using the setting names
    /// hosts already know (`HANDLEBARS_COMPILER`, `STATIC_ROOT`, ...).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(command) = lookup("HANDLEBARS_COMPILER").filter(|c| !c.trim().is_empty()) {
            settings.compiler_command = Some(command);
        }
        if let Some(v) = lookup("HANDLEBARS_PRECOMPILE_TEMPLATES") {
            settings.precompile_templates = parse_bool(&v);
        }
        if let Some(v) = lookup("HANDLEBARS_COMPILED_STATIC_PATH") {
            settings.compiled_output_path = v;
        }
        if let Some(v) = lookup("STATIC_ROOT") {
            settings.output_static_root = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("STATIC_URL") {
            settings.static_url = v;
        }
        if let Some(v) = lookup("USE_EMBER_STYLE_ATTRS") {
            settings.use_alt_attrs = parse_bool(&v);
        }
        if let Some(v) = lookup("HANDLEBARS_LOADED_JS") {
            settings.loaded_callback_js = v;
        }
        if let Some(v) = lookup("HANDLEBARS_COMPILER_TIMEOUT") {
            match v.trim().parse::<u64>() {
                Ok(0) => settings.compiler_timeout_secs = None,
                Ok(secs) => settings.compiler_timeout_secs = Some(secs),
                Err(_) => log::warn!("Ignoring invalid HANDLEBARS_COMPILER_TIMEOUT: {}", v),
            }
        }
        if let Some(v) = lookup("HANDLEBARS_TEMP_ROOT") {
            settings.temp_root = Some(PathBuf::from(v));
        }

        settings
    }

    pub fn marker(&self) -> TemplateMarker {
        if self.use_alt_attrs {
            TemplateMarker::ALT
        } else {
            TemplateMarker::STANDARD
        }
    }

    pub fn compiler_timeout(&self) -> Option<Duration> {
        self.compiler_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Location of the shared compiled-output file, if a static root is set.
    pub fn compiled_output_file(&self) -> Option<PathBuf> {
        self.output_static_root
            .as_ref()
            .map(|root| root.join(&self.compiled_output_path))
    }
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
