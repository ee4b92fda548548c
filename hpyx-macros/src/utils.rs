use proc_macro::{Delimiter, Spacing, TokenStream, TokenTree};

/// Splits a `TokenStream` at top-level commas.
///
/// Commas nested inside groups (`()`, `[]`, `{}`) are not seen at this
/// level, so blocks and call arguments stay intact. Angle brackets are not
/// groups, and neither are closure parameter lists: `foo::<A, B>()` or
/// `|a, b| a + b` must be wrapped in parentheses.
pub(crate) fn split_args(input: TokenStream) -> Vec<Vec<TokenTree>> {
    let mut args = Vec::new();
    let mut current = Vec::new();

    for token in input {
        match &token {
            TokenTree::Punct(p) if p.as_char() == ',' => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(token),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }

    args
}

/// Renders tokens back to source.
pub(crate) fn tokens_to_string(tokens: &[TokenTree]) -> String {
    tokens.iter().cloned().collect::<TokenStream>().to_string()
}

/// Parses `key = value, key = value` attribute arguments.
///
/// String literal values are returned without their quotes.
pub(crate) fn parse_attr_args(attr: TokenStream) -> Vec<(String, String)> {
    split_args(attr)
        .into_iter()
        .filter_map(|arg| {
            let eq = arg
                .iter()
                .position(|t| matches!(t, TokenTree::Punct(p) if p.as_char() == '='))?;

            let key = tokens_to_string(&arg[..eq]);
            let value = tokens_to_string(&arg[eq + 1..]);

            Some((key.trim().to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

/// Index of the function body (the last brace group).
pub(crate) fn body_position(tokens: &[TokenTree]) -> Option<usize> {
    tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
}

/// Removes the `async` keyword from a function signature.
pub(crate) fn strip_async(tokens: &mut Vec<TokenTree>) {
    if let Some(pos) = tokens
        .iter()
        .position(|t| matches!(t, TokenTree::Ident(id) if id.to_string() == "async"))
    {
        tokens.remove(pos);
    }
}

/// The declared return type between `->` and `body`, if any.
pub(crate) fn return_type(tokens: &[TokenTree], body: usize) -> Option<String> {
    let arrow = tokens[..body].windows(2).position(|w| {
        matches!(
            (&w[0], &w[1]),
            (TokenTree::Punct(a), TokenTree::Punct(b))
                if a.as_char() == '-' && a.spacing() == Spacing::Joint && b.as_char() == '>'
        )
    })?;

    let ty = tokens_to_string(&tokens[arrow + 2..body]);
    (!ty.trim().is_empty()).then_some(ty)
}
