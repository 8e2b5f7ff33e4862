//! The `#[test]` attribute re-exported by `keyvalue-testhelpers`

use unsynn::*;

keyword! {
    KFn = "fn";
    KLog = "log";
}

/// Any tokens up to, not including, a `Stop`
type Until<Stop> = Any<Cons<Except<Stop>, TokenTree>>;

unsynn! {
    // `log = debug`
    struct LogLevel {
        _log: KLog,
        _assign: Assign,
        level: Ident,
    }

    struct TestFn {
        // attributes and qualifiers
        before: Until<KFn>,
        _fn: KFn,
        name: Ident,
        // generics and parameters
        signature: Until<Either<RArrow, BraceGroup>>,
        return_type: Option<Cons<RArrow, Until<BraceGroup>>>,
        body: BraceGroup,
    }
}

/// Maps the level named in `log = <level>` to a `LevelFilter` path
fn level_filter(level: &Ident) -> ::core::result::Result<TokenStream, &'static str> {
    let variant = match level.to_string().as_str() {
        "off" => quote::quote!(Off),
        "error" => quote::quote!(Error),
        "warn" => quote::quote!(Warn),
        "info" => quote::quote!(Info),
        "debug" => quote::quote!(Debug),
        "trace" => quote::quote!(Trace),
        _ => return Err("log level must be one of off, error, warn, info, debug, trace"),
    };
    Ok(quote::quote!(::keyvalue_testhelpers::LevelFilter::#variant))
}

fn expand(attr: TokenStream, item: TokenStream) -> ::core::result::Result<TokenStream, &'static str> {
    let setup = if attr.is_empty() {
        quote::quote!(::keyvalue_testhelpers::setup();)
    } else {
        let LogLevel { level, .. } = attr
            .to_token_iter()
            .parse::<Cons<LogLevel, EndOfStream>>()
            .map_err(|_| "expected `log = <level>`")?
            .first;
        let filter = level_filter(&level)?;
        quote::quote!(::keyvalue_testhelpers::setup_with_level(#filter);)
    };

    let test_fn = item
        .to_token_iter()
        .parse::<TestFn>()
        .map_err(|_| "#[keyvalue_testhelpers::test] expects a function")?;
    if test_fn.return_type.is_some() {
        return Err("#[keyvalue_testhelpers::test] functions must not declare a return type");
    }

    let before = test_fn.before.to_token_stream();
    let name = test_fn.name;
    let signature = test_fn.signature.to_token_stream();
    let body = test_fn.body.0.stream();

    Ok(quote::quote! {
        #[::core::prelude::rust_2024::test]
        #before fn #name #signature -> ::keyvalue_testhelpers::eyre::Result<()> {
            #setup

            #body

            Ok(())
        }
    })
}

/// Marks a test whose body may use `?`: the function returns
/// `eyre::Result<()>` and runs `keyvalue_testhelpers::setup()` first.
///
/// `#[keyvalue_testhelpers::test(log = debug)]` caps the log output of this
/// one test at the given level.
#[proc_macro_attribute]
pub fn test(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    match expand(attr.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(message) => quote::quote!(::core::compile_error!(#message);).into(),
    }
}
