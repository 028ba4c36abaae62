use async_trait::async_trait;
use handlebars_embed::Engine;
use handlebars_embed::compiler::Compiler;
use handlebars_embed::error::Error;
use handlebars_embed::host::{Context, Parser, Renderable, TagLibrary, Token};
use handlebars_embed::settings::Settings;
use handlebars_embed::tpl::tags;
use std::sync::{Arc, Once};

static INIT: Once = Once::new();

fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .is_test(true)
            .try_init();
    });
}

struct Precompiler;

#[async_trait]
impl Compiler for Precompiler {
    async fn compile(&self, name: &str, source: &str) -> handlebars_embed::Result<String> {
        Ok(format!("Handlebars.templates[\"{}\"]={:?};", name, source))
    }
}

fn tokens(id: &str) -> Vec<Token> {
    vec![
        Token::block(format!("tplhandlebars \"{}\"", id)),
        Token::text("<b>"),
        Token::variable("name"),
        Token::text("</b>"),
        Token::block("endtplhandlebars"),
    ]
}

async fn render(engine: Engine, tokens: Vec<Token>) -> handlebars_embed::Result<String> {
    let mut library = TagLibrary::new();
    tags::register(&mut library, Arc::new(engine));
    let nodes = Parser::new(tokens, Arc::new(library)).parse()?;
    nodes.render(&Context::new()).await
}

#[tokio::test]
async fn test_precompiled_block_is_appended_to_output_file() {
    init_logger();
    let static_root = tempfile::tempdir().unwrap();
    let engine = Engine::new(Settings {
        precompile_templates: true,
        output_static_root: Some(static_root.path().to_path_buf()),
        ..Settings::default()
    })
    .with_stream_compiler(Arc::new(Precompiler));

    let first = render(engine, tokens("tpl-a")).await.unwrap();
    assert_eq!(
        first,
        "<script type=\"text/javascript\">Handlebars.templates[\"tpl-a\"]=\"<b>{{name}}</b>\";</script>"
    );

    let engine = Engine::new(Settings {
        precompile_templates: true,
        output_static_root: Some(static_root.path().to_path_buf()),
        ..Settings::default()
    })
    .with_stream_compiler(Arc::new(Precompiler));
    render(engine, tokens("tpl-b")).await.unwrap();

    let shared = std::fs::read_to_string(static_root.path().join("compiled_templates.js")).unwrap();
    assert_eq!(
        shared,
        "Handlebars.templates[\"tpl-a\"]=\"<b>{{name}}</b>\";Handlebars.templates[\"tpl-b\"]=\"<b>{{name}}</b>\";"
    );
}

#[tokio::test]
async fn test_precompile_without_compiler_is_configuration_error() {
    init_logger();
    let engine = Engine::new(Settings {
        precompile_templates: true,
        ..Settings::default()
    });
    let result = render(engine, tokens("tpl")).await;
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[cfg(unix)]
#[tokio::test]
async fn test_stream_protocol_through_shell() {
    init_logger();
    let engine = Engine::new(Settings {
        precompile_templates: true,
        compiler_command: Some("printf 'T[\"{template_name}\"]='; cat".to_string()),
        ..Settings::default()
    });

    let html = render(engine, tokens("tpl-shell")).await.unwrap();
    assert_eq!(
        html,
        "<script type=\"text/javascript\">T[\"tpl-shell\"]=<b>{{name}}</b></script>"
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_stream_protocol_timeout() {
    init_logger();
    let engine = Engine::new(Settings {
        precompile_templates: true,
        compiler_command: Some("sleep 5".to_string()),
        compiler_timeout_secs: Some(1),
        ..Settings::default()
    });

    let result = render(engine, tokens("tpl-slow")).await;
    match result {
        Err(Error::CompilerTimeout { command, millis }) => {
            assert_eq!(command, "sleep 5");
            assert_eq!(millis, 1000);
        }
        other => panic!("Expected CompilerTimeout, got {:?}", other),
    }
}
