use async_trait::async_trait;
use handlebars_embed::Engine;
use handlebars_embed::cache::MemoryCache;
use handlebars_embed::compiler::Compiler;
use handlebars_embed::error::Error;
use handlebars_embed::host::{Context, Parser, Renderable, TagLibrary, Token};
use handlebars_embed::settings::Settings;
use handlebars_embed::tpl::tags;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .is_test(true)
            .try_init();
    });
}

/// Wraps each template in a registration call and counts invocations.
#[derive(Default)]
struct RecordingCompiler {
    calls: AtomicUsize,
}

#[async_trait]
impl Compiler for RecordingCompiler {
    async fn compile(&self, name: &str, source: &str) -> handlebars_embed::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("T[\"{}\"]=\"{}\";", name, source))
    }
}

const PAGE: &str = concat!(
    "<div id=\"app\">\n  <h1>Title</h1>\n</div>\n",
    "<script id=\"tpl-a\" type=\"text/x-handlebars-template\">{{a}}</script>\n",
    "<script id=\"tpl-b\" type=\"text/x-handlebars-template\">",
    "{{#each b}}<li>{{this}}</li>{{/each}}</script>\n",
    "<p>B</p>",
);

fn tokens() -> Vec<Token> {
    vec![
        Token::block("compress_handlebars"),
        Token::text(PAGE),
        Token::block("endcompress_handlebars"),
    ]
}

async fn render(engine: Engine) -> handlebars_embed::Result<String> {
    let mut library = TagLibrary::new();
    tags::register(&mut library, Arc::new(engine));
    let nodes = Parser::new(tokens(), Arc::new(library)).parse()?;
    nodes.render(&Context::new()).await
}

fn settings() -> Settings {
    Settings {
        loaded_callback_js: "loaded();".to_string(),
        ..Settings::default()
    }
}

#[tokio::test]
async fn test_compiled_templates_replace_script_blocks() {
    init_logger();
    let compiler = Arc::new(RecordingCompiler::default());
    let engine = Engine::new(settings()).with_file_compiler(compiler.clone());

    let html = render(engine).await.unwrap();
    assert_eq!(
        html,
        concat!(
            "<script type=\"text/javascript\">window.addEventListener(\"load\", function() {",
            "T[\"tpl-a\"]=\"{{a}}\";",
            "T[\"tpl-b\"]=\"{{#each b}}<li>{{this}}</li>{{/each}}\";",
            "loaded();});</script>",
            "<div id=\"app\"><h1>Title</h1></div><p>B</p>",
        )
    );
    assert_eq!(compiler.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_raw_mode_without_compiler() {
    init_logger();
    let html = render(Engine::new(settings())).await.unwrap();
    assert_eq!(
        html,
        format!(
            "{}<script type=\"text/javascript\">window.addEventListener(\"load\", function() {{loaded();}});</script>",
            PAGE
        )
    );
}

#[tokio::test]
async fn test_cache_skips_recompilation() {
    init_logger();
    let compiler = Arc::new(RecordingCompiler::default());
    let cache = Arc::new(MemoryCache::new());
    let engine = Arc::new(
        Engine::new(settings())
            .with_file_compiler(compiler.clone())
            .with_cache(cache.clone()),
    );

    let mut library = TagLibrary::new();
    tags::register(&mut library, engine);
    let library = Arc::new(library);

    let first = Parser::new(tokens(), library.clone())
        .parse()
        .unwrap()
        .render(&Context::new())
        .await
        .unwrap();
    let second = Parser::new(tokens(), library)
        .parse()
        .unwrap()
        .render(&Context::new())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(compiler.calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_unterminated_template_fails_render() {
    init_logger();
    let engine = Engine::new(settings()).with_file_compiler(Arc::new(RecordingCompiler::default()));
    let mut library = TagLibrary::new();
    tags::register(&mut library, Arc::new(engine));

    let tokens = vec![
        Token::block("compress_handlebars"),
        Token::text("<script id=\"open\" type=\"text/x-handlebars-template\">{{x}}"),
        Token::block("endcompress_handlebars"),
    ];
    let result = Parser::new(tokens, Arc::new(library))
        .parse()
        .unwrap()
        .render(&Context::new())
        .await;
    assert!(matches!(result, Err(Error::UnterminatedFragment(n)) if n == "open"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_shell_compiler_round_trip() {
    init_logger();
    let root = tempfile::tempdir().unwrap();
    let engine = Engine::new(Settings {
        compiler_command: Some("cp {infile} {outfile}".to_string()),
        temp_root: Some(root.path().to_path_buf()),
        ..settings()
    });

    let html = render(engine).await.unwrap();
    assert!(html.contains("function() {{{a}}{{#each b}}<li>{{this}}</li>{{/each}}loaded();});"));
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_compiler_fails_whole_render() {
    init_logger();
    let root = tempfile::tempdir().unwrap();
    let engine = Engine::new(Settings {
        compiler_command: Some("exit 2 # {infile} {outfile}".to_string()),
        temp_root: Some(root.path().to_path_buf()),
        ..settings()
    });

    let result = render(engine).await;
    match result {
        Err(Error::CompilerFailed { command, .. }) => {
            assert!(command.starts_with("exit 2 # "));
            assert!(!command.contains("{infile}"));
        }
        other => panic!("Expected CompilerFailed, got {:?}", other),
    }
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}
