//! Input text to tokens, AST and SVG in one call

use crate::complex::Chain;
use crate::geometry;
use crate::lex::{tokenise, LexError, Token};
use crate::parse::{parse_tokens, ParseError};
use crate::render::render_svg;
use crate::Config;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Errors from running the pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Body of a `/run` response
#[derive(Debug, Clone, Serialize)]
pub struct RunResponse {
    pub tokens: Vec<Token>,
    pub ast: Option<Chain>,
    pub svg: Option<String>,
}

/// Tokenise, parse, lay out and render `input`.
///
/// Blank input is not an error: it yields no tokens and no AST, so the demo
/// page can submit its initial empty field.
pub fn run(input: &str, config: &Config) -> Result<RunResponse, PipelineError> {
    let tokens = tokenise(input)?;
    if tokens.is_empty() {
        return Ok(RunResponse {
            tokens,
            ast: None,
            svg: None,
        });
    }

    let ast = parse_tokens(&tokens)?;
    let shape = geometry::layout(&ast, &config.layout);
    let svg = render_svg(&shape, &config.render);

    debug!(
        tokens = tokens.len(),
        elements = ast.len(),
        svg_len = svg.len(),
        "Pipeline finished"
    );

    Ok(RunResponse {
        tokens,
        ast: Some(ast),
        svg: Some(svg),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input() {
        let response = run("  ", &Config::default()).unwrap();
        assert!(response.tokens.is_empty());
        assert!(response.ast.is_none());
        assert!(response.svg.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"tokens": [], "ast": null, "svg": null})
        );
    }

    #[test]
    fn test_full_run() {
        let response = run("a( b )", &Config::default()).unwrap();
        assert_eq!(response.tokens.len(), 3);
        assert_eq!(response.ast.as_ref().unwrap().to_string(), "a( b )");
        assert!(response.svg.unwrap().contains("<svg"));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            run("a *", &Config::default()),
            Err(PipelineError::Lex(_))
        ));
        assert!(matches!(
            run("a + b", &Config::default()),
            Err(PipelineError::Parse(ParseError::UnexpectedToken { .. }))
        ));
    }
}
