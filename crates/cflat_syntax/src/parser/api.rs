/// Parse a token stream into an AST [`Program`].
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `cflat_syntax::lexer`.
///
/// ## Errors
/// Errors do not stop the parse. They are collected in [`Parsed::diagnostics`] next to the warnings;
/// check [`Parsed::has_errors`] before using the program.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Parsed {
    let parsed = Parser::new(tokens).parse();
    tracing::debug!(
        declarations = parsed.program.declarations.len(),
        errors = parsed.errors().count(),
        warnings = parsed.warnings().count(),
        "parsed"
    );
    parsed
}
