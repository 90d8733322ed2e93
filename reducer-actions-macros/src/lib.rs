//! Procedural macros for reducer-actions

use darling::{FromDeriveInput, FromVariant};
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{parse_macro_input, DeriveInput, Ident};

/// Container-level attributes for #[derive(Action)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct ActionOpts {
    ident: syn::Ident,
    vis: syn::Visibility,
    generics: syn::Generics,
    data: darling::ast::Data<ActionVariant, ()>,

    /// Generate a `{Name}Dispatch` trait with one method per variant
    #[darling(default)]
    dispatch: bool,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(action))]
struct ActionVariant {
    ident: syn::Ident,
    fields: darling::ast::Fields<syn::Field>,

    /// Override the name returned by `Action::name()`
    #[darling(default)]
    rename: Option<String>,

    /// Override the generated dispatch method name
    #[darling(default)]
    method: Option<String>,
}

/// Convert PascalCase to snake_case
fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// Identifier for a generated method, raw when it collides with a keyword
///
/// Names that are not identifiers at all, or keywords that cannot be raw
/// (`self`, `Self`, `super`, `crate`), are reported against `variant`.
fn method_ident(name: &str, variant: &Ident) -> syn::Result<Ident> {
    if let Ok(ident) = syn::parse_str::<Ident>(name) {
        return Ok(ident);
    }

    let mut chars = name.chars();
    let well_formed = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    let raw_allowed = !matches!(name, "_" | "self" | "Self" | "super" | "crate");

    if well_formed && raw_allowed {
        Ok(Ident::new_raw(name, Span::call_site()))
    } else {
        Err(syn::Error::new_spanned(
            variant,
            format!("`{}` is not a valid dispatch method name", name),
        ))
    }
}

/// Derive macro for the Action trait
///
/// Generates a `name()` method that returns the variant name as a static
/// string (or the `#[action(rename = "...")]` override).
///
/// With `#[action(dispatch)]`, also generates a `{Name}Dispatch` trait with
/// one snake_case method per variant, implemented for
/// `reducer_actions::Dispatcher<S, {Name}>`:
/// - unit variants take no arguments
/// - tuple variants take one argument per field
/// - struct variants take their fields as named arguments
///
/// Each method dispatches the variant and returns whether state changed.
///
/// # Example
/// ```ignore
/// #[derive(Action, Debug)]
/// #[action(dispatch)]
/// enum ListAction {
///     Append(String),
///     Pop,
///     #[action(rename = "reset")]
///     Reset,
/// }
///
/// assert_eq!(ListAction::Pop.name(), "Pop");
/// assert_eq!(ListAction::Reset.name(), "reset");
///
/// let dispatcher = store.dispatcher();
/// dispatcher.append("value".to_string());
/// dispatcher.pop();
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ActionOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;

    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let name_arms = variants.iter().map(|v| {
        let variant_name = &v.ident;
        let variant_str = v.rename.clone().unwrap_or_else(|| variant_name.to_string());

        match &v.fields.style {
            darling::ast::Style::Unit => quote! {
                #name::#variant_name => #variant_str
            },
            darling::ast::Style::Tuple => quote! {
                #name::#variant_name(..) => #variant_str
            },
            darling::ast::Style::Struct => quote! {
                #name::#variant_name { .. } => #variant_str
            },
        }
    });

    // An enum with no variants has no values to match on
    let name_body = if variants.is_empty() {
        quote! { match *self {} }
    } else {
        quote! {
            match self {
                #(#name_arms),*
            }
        }
    };

    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();

    let mut expanded = quote! {
        impl #impl_generics reducer_actions::Action for #name #ty_generics #where_clause {
            fn name(&self) -> &str {
                #name_body
            }
        }
    };

    if opts.dispatch {
        if !opts.generics.params.is_empty() {
            return syn::Error::new_spanned(
                &opts.generics,
                "#[action(dispatch)] is not supported on generic enums",
            )
            .to_compile_error()
            .into();
        }
        match dispatch_trait(&opts.vis, name, variants) {
            Ok(tokens) => expanded.extend(tokens),
            Err(e) => return e.to_compile_error().into(),
        }
    }

    TokenStream::from(expanded)
}

/// Generate `{Name}Dispatch` and its impl for `Dispatcher<S, Name>`
fn dispatch_trait(
    vis: &syn::Visibility,
    name: &Ident,
    variants: &[ActionVariant],
) -> syn::Result<TokenStream2> {
    let trait_name = format_ident!("{}Dispatch", name);

    let mut signatures = Vec::new();
    let mut bodies = Vec::new();

    for v in variants {
        let variant = &v.ident;
        let method = method_ident(
            &v.method
                .clone()
                .unwrap_or_else(|| to_snake_case(&variant.to_string())),
            variant,
        )?;
        let doc = format!("Dispatch [`{}::{}`].", name, variant);

        let (args, construct): (Vec<TokenStream2>, TokenStream2) = match &v.fields.style {
            darling::ast::Style::Unit => (Vec::new(), quote! { #name::#variant }),
            darling::ast::Style::Tuple => {
                let idents: Vec<_> = (0..v.fields.fields.len())
                    .map(|i| format_ident!("arg{}", i))
                    .collect();
                let args = v
                    .fields
                    .fields
                    .iter()
                    .zip(&idents)
                    .map(|(field, ident)| {
                        let ty = &field.ty;
                        quote! { #ident: #ty }
                    })
                    .collect();
                (args, quote! { #name::#variant(#(#idents),*) })
            }
            darling::ast::Style::Struct => {
                let idents: Vec<_> = v
                    .fields
                    .fields
                    .iter()
                    .filter_map(|field| field.ident.clone())
                    .collect();
                let args = v
                    .fields
                    .fields
                    .iter()
                    .zip(&idents)
                    .map(|(field, ident)| {
                        let ty = &field.ty;
                        quote! { #ident: #ty }
                    })
                    .collect();
                (args, quote! { #name::#variant { #(#idents),* } })
            }
        };

        let signature = quote! { fn #method(&self #(, #args)*) -> bool };
        signatures.push(quote! {
            #[doc = #doc]
            #signature;
        });
        bodies.push(quote! {
            #signature {
                self.dispatch(#construct)
            }
        });
    }

    let trait_doc = format!(
        "Bound dispatch methods for [`{}`], one per variant.\n\n\
         Implemented for `Dispatcher<S, {}>`; each method returns whether the \
         store applied a transition.",
        name, name
    );

    Ok(quote! {
        #[doc = #trait_doc]
        #vis trait #trait_name {
            #(#signatures)*
        }

        impl<S> #trait_name for reducer_actions::Dispatcher<S, #name> {
            #(#bodies)*
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("AppendAll"), "append_all");
        assert_eq!(to_snake_case("Pop"), "pop");
    }

    #[test]
    fn test_method_ident_plain() {
        let ident = method_ident("append", &format_ident!("Append")).unwrap();
        assert_eq!(ident.to_string(), "append");
    }

    #[test]
    fn test_method_ident_keyword_is_raw() {
        let ident = method_ident("move", &format_ident!("Move")).unwrap();
        assert_eq!(ident.to_string(), "r#move");
    }

    #[test]
    fn test_method_ident_rejects_invalid_names() {
        let variant = format_ident!("Append");
        for name in ["foo bar", "self", "Self", "super", "crate", "_", "", "1st", "a-b"] {
            let err = method_ident(name, &variant).unwrap_err();
            assert!(err.to_string().contains("not a valid dispatch method name"));
        }
    }
}
