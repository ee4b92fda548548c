//! Procedural macros for hpyx.
//!
//! - `#[hpyx::main]`: runs an `async fn main` on a fresh event loop,
//!   optionally starting the global runtime with a given thread count,
//! - `#[hpyx::test]`: the same for `#[test]` functions,
//! - `join!`: awaits several futures concurrently and returns a tuple.

mod utils;

use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Awaits every future concurrently and returns their outputs as a tuple.
///
/// ```rust,ignore
/// let (a, b) = hpyx::join!(dispatch(work)?, dispatch(work)?);
/// ```
#[proc_macro]
pub fn join(input: TokenStream) -> TokenStream {
    let args = utils::split_args(input);
    let count = args.len();

    if count == 0 {
        return "()".parse().unwrap();
    }

    if count == 1 {
        let expr = utils::tokens_to_string(&args[0]);
        return format!("{{ ({expr}).await }}").parse().unwrap();
    }

    let mut output = String::from("{\n");

    for (i, expr_tokens) in args.iter().enumerate() {
        let expr = utils::tokens_to_string(expr_tokens);
        output.push_str(&format!(
            "let mut __join{i} = (::std::boxed::Box::pin({expr}), ::core::option::Option::None);\n"
        ));
    }

    output.push_str("::std::future::poll_fn(move |cx| {\n");
    output.push_str("    use ::std::future::Future as _;\n");
    output.push_str("    use ::std::task::Poll;\n");

    for i in 0..count {
        output.push_str(&format!(
            "    if __join{i}.1.is_none() {{\n\
                     if let Poll::Ready(val) = __join{i}.0.as_mut().poll(cx) {{\n\
                         __join{i}.1 = ::core::option::Option::Some(val);\n\
                     }}\n\
                 }}\n"
        ));
    }

    let all_done = (0..count)
        .map(|i| format!("__join{i}.1.is_some()"))
        .collect::<Vec<_>>()
        .join(" && ");

    let outputs = (0..count)
        .map(|i| format!("__join{i}.1.take().unwrap()"))
        .collect::<Vec<_>>()
        .join(", ");

    output.push_str(&format!(
        "    if {all_done} {{ Poll::Ready(({outputs},)) }} else {{ Poll::Pending }}\n"
    ));
    output.push_str("}).await\n}\n");

    output.parse().unwrap_or_else(|err| {
        format!("compile_error!(\"join macro error: {err}\");")
            .parse()
            .unwrap()
    })
}

/// Runs `async fn main` on an event loop.
///
/// `#[hpyx::main(os_threads = 4)]` also starts the global runtime with
/// four workers before the loop starts; without it the runtime is started
/// lazily with defaults on the first dispatch.
#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut os_threads: Option<usize> = None;

    for (key, value) in utils::parse_attr_args(attr) {
        match key.as_str() {
            "os_threads" | "worker_threads" => match value.parse() {
                Ok(n) => os_threads = Some(n),
                Err(_) => return compile_error(&format!("invalid {key}: `{value}`")),
            },
            other => return compile_error(&format!("unknown hpyx::main argument `{other}`")),
        }
    }

    let init = match os_threads {
        Some(n) => format!(
            "if let ::core::result::Result::Err(err) = ::hpyx::init_runtime([\"hpyx.os_threads={n}\"]) {{\n\
                 panic!(\"failed to start the hpyx runtime: {{err}}\");\n\
             }}\n"
        ),
        None => String::new(),
    };

    wrap_in_event_loop(item, &init, false)
}

/// Turns an `async fn` into a `#[test]` that runs on a fresh event loop.
#[proc_macro_attribute]
pub fn test(_attr: TokenStream, item: TokenStream) -> TokenStream {
    wrap_in_event_loop(item, "", true)
}

fn wrap_in_event_loop(item: TokenStream, prelude: &str, as_test: bool) -> TokenStream {
    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    utils::strip_async(&mut tokens);

    let Some(pos) = utils::body_position(&tokens) else {
        return compile_error("expected a function body");
    };

    let block = match &tokens[pos] {
        TokenTree::Group(g) => g.stream().to_string(),
        _ => unreachable!(),
    };

    // Pin the async block's output to the declared return type so `?`
    // inside the body has a concrete error type to convert into.
    let driven = match utils::return_type(&tokens, pos) {
        Some(ty) => format!(
            "::hpyx::event_loop::run(async move {{ let __ret: {ty} = {{ {block} }}; __ret }})"
        ),
        None => format!("::hpyx::event_loop::run(async move {{ {block} }});"),
    };

    let new_block = format!("{{\n{prelude}{driven}\n}}");

    let stream: TokenStream = match new_block.parse() {
        Ok(stream) => stream,
        Err(err) => return compile_error(&format!("hpyx macro error: {err}")),
    };

    tokens[pos] = TokenTree::Group(Group::new(Delimiter::Brace, stream));

    let mut result: Vec<TokenTree> = Vec::new();
    if as_test {
        result.extend("#[test]".parse::<TokenStream>().unwrap());
    }
    result.extend(tokens);

    result.into_iter().collect()
}

fn compile_error(msg: &str) -> TokenStream {
    format!("compile_error!({msg:?});").parse().unwrap()
}
