//! Render function stringification.

use std::sync::Arc;

use swc_common::{FileName, SourceMap};
use swc_ecma_ast::{Expr, Stmt};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax};

use crate::error::{BoxError, TransformError};

/// Normalizes the source of a single function expression.
pub trait FunctionNormalizer: Send + Sync {
    fn normalize(&self, function: &str) -> Result<String, BoxError>;
}

/// Checks that the literal is one well-formed function expression in
/// sloppy-mode JavaScript and returns it unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntaxNormalizer;

impl FunctionNormalizer for SyntaxNormalizer {
    fn normalize(&self, function: &str) -> Result<String, BoxError> {
        let cm: Arc<SourceMap> = Default::default();
        let fm = cm.new_source_file(
            FileName::Custom("render".to_string()).into(),
            format!("({function})"),
        );
        let mut parser = Parser::new(Syntax::Es(EsSyntax::default()), StringInput::from(&*fm), None);
        let script = parser
            .parse_script()
            .map_err(|err| err.kind().msg().to_string())?;
        if let Some(err) = parser.take_errors().into_iter().next() {
            return Err(err.kind().msg().to_string().into());
        }

        match script.body.as_slice() {
            [Stmt::Expr(stmt)] => match &*stmt.expr {
                Expr::Paren(paren) if matches!(&*paren.expr, Expr::Fn(_)) => {
                    Ok(function.to_string())
                }
                _ => Err("expected a function expression".into()),
            },
            _ => Err("expected a single expression".into()),
        }
    }
}

fn wrap(body: &str) -> String {
    format!("function render () {{{body}}}")
}

/// Turns a render function body into a function literal.
pub fn stringify_render(
    body: &str,
    normalizer: &dyn FunctionNormalizer,
    path: &str,
) -> Result<String, TransformError> {
    normalizer
        .normalize(&wrap(body))
        .map_err(|err| TransformError::InvalidRenderFunction {
            path: path.to_string(),
            message: err.to_string(),
        })
}

/// Turns static render function bodies into an array literal, in order.
pub fn stringify_static_render(
    bodies: &[String],
    normalizer: &dyn FunctionNormalizer,
    path: &str,
) -> Result<String, TransformError> {
    let functions = bodies
        .iter()
        .map(|body| stringify_render(body, normalizer, path))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("[{}]", functions.join(",")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_with_statement() {
        let body = "with(this){return _c('div',[_v(_s(msg))])}";
        assert_eq!(
            stringify_render(body, &SyntaxNormalizer, "A.vue").unwrap(),
            "function render () {with(this){return _c('div',[_v(_s(msg))])}}"
        );
    }

    #[test]
    fn test_static_render_order() {
        let bodies = vec!["return 1".to_string(), "return 2".to_string()];
        assert_eq!(
            stringify_static_render(&bodies, &SyntaxNormalizer, "A.vue").unwrap(),
            "[function render () {return 1},function render () {return 2}]"
        );
        assert_eq!(
            stringify_static_render(&[], &SyntaxNormalizer, "A.vue").unwrap(),
            "[]"
        );
    }

    #[test]
    fn test_invalid_body() {
        let err = stringify_render("return (", &SyntaxNormalizer, "A.vue").unwrap_err();
        assert!(matches!(err, TransformError::InvalidRenderFunction { ref path, .. } if path == "A.vue"));

        let err = SyntaxNormalizer.normalize("1 + 1").unwrap_err();
        assert_eq!(err.to_string(), "expected a function expression");
        assert!(SyntaxNormalizer.normalize("function a(){}), (1").is_err());
    }
}
