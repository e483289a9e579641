//! The `#[handlers]` attribute.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    Expr, FnArg, ImplItem, ImplItemFn, ItemImpl, Pat, PatType, Type, parse_macro_input,
    spanned::Spanned,
};

const HANDLER_PREFIX: &str = "on_";

/// How one method parameter gets its value.
enum ArgSource {
    Event,
    Optional,
    Default(Expr),
    Required,
}

/// Implementation of the `#[handlers]` macro.
pub fn handlers_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            TokenStream2::from(attr).span(),
            "`#[handlers]` does not take arguments",
        )
        .to_compile_error()
        .into();
    }

    let mut input = parse_macro_input!(item as ItemImpl);
    match expand(&mut input) {
        Ok(table_impl) => quote! {
            #input
            #table_impl
        }
        .into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &mut ItemImpl) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "`#[handlers]` must be placed on an inherent impl block",
        ));
    }

    let mut methods = Vec::new();
    for item in &mut input.items {
        if let ImplItem::Fn(method) = item
            && method.sig.ident.to_string().starts_with(HANDLER_PREFIX)
        {
            methods.push(handler_entry(method)?);
        }
    }

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::herald::EventHandlers for #self_ty #where_clause {
            fn handler_table() -> ::herald::HandlerTable<Self> {
                ::herald::HandlerTable::new()
                    #(#methods)*
            }
        }
    })
}

/// The `.method(...)` call registering one handler.
///
/// Strips the `#[default(...)]` attributes from the method as a side effect.
fn handler_entry(method: &mut ImplItemFn) -> syn::Result<TokenStream2> {
    let sig = &mut method.sig;
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "handler methods are called synchronously and cannot be async",
        ));
    }
    match sig.receiver() {
        Some(receiver) if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => {
            return Err(syn::Error::new_spanned(
                &sig.ident,
                "handler methods must take `&self`",
            ));
        }
    }

    let method_ident = sig.ident.clone();
    let method_name = method_ident.to_string();

    let mut bindings = Vec::new();
    let mut arg_idents = Vec::new();
    for (i, arg) in sig.inputs.iter_mut().enumerate() {
        let FnArg::Typed(pat_type) = arg else {
            continue;
        };
        let source = arg_source(pat_type)?;
        let arg_ident = format_ident!("__arg_{}", i);
        let ty = &pat_type.ty;

        let binding = match source {
            ArgSource::Event => quote! {
                let #arg_ident = __args.event();
            },
            ArgSource::Optional => {
                let name = param_name(&pat_type.pat)?;
                quote! {
                    let #arg_ident: #ty = __args.optional(#name, || ::core::option::Option::None)?;
                }
            }
            ArgSource::Default(default) => {
                let name = param_name(&pat_type.pat)?;
                quote! {
                    let #arg_ident: #ty = __args.optional(#name, || #default)?;
                }
            }
            ArgSource::Required => {
                let name = param_name(&pat_type.pat)?;
                quote! {
                    let #arg_ident: #ty = __args.required(#name)?;
                }
            }
        };
        bindings.push(binding);
        arg_idents.push(arg_ident);
    }

    Ok(quote! {
        .method(#method_name, |__target: &Self, __args: &::herald::Args<'_>| {
            #(#bindings)*
            ::herald::HandlerOutput::into_outcome(__target.#method_ident(#(#arg_idents),*))
                .map_err(::herald::DispatchError::Listener)
        })
    })
}

fn arg_source(pat_type: &mut PatType) -> syn::Result<ArgSource> {
    let mut default = None;
    let mut kept = Vec::with_capacity(pat_type.attrs.len());
    for attr in pat_type.attrs.drain(..) {
        if attr.path().is_ident("default") {
            if default.is_some() {
                return Err(syn::Error::new_spanned(attr, "duplicate `#[default]`"));
            }
            default = Some(attr.parse_args::<Expr>()?);
        } else {
            kept.push(attr);
        }
    }
    pat_type.attrs = kept;

    if is_event_ref(&pat_type.ty) {
        if let Some(default) = default {
            return Err(syn::Error::new_spanned(
                default,
                "the event parameter cannot have a default",
            ));
        }
        return Ok(ArgSource::Event);
    }
    Ok(match default {
        Some(default) => ArgSource::Default(default),
        None if last_segment_is(&pat_type.ty, "Option") => ArgSource::Optional,
        None => ArgSource::Required,
    })
}

/// The event parameter name a method parameter is read from.
fn param_name(pat: &Pat) -> syn::Result<String> {
    match pat {
        Pat::Ident(pat_ident) => {
            let name = pat_ident.ident.to_string();
            let name = name.strip_prefix("r#").unwrap_or(&name);
            Ok(name.trim_start_matches('_').to_owned())
        }
        other => Err(syn::Error::new_spanned(
            other,
            "handler parameters must be plain identifiers",
        )),
    }
}

fn is_event_ref(ty: &Type) -> bool {
    match ty {
        Type::Reference(reference) => last_segment_is(&reference.elem, "Event"),
        _ => false,
    }
}

fn last_segment_is(ty: &Type, ident: &str) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == ident),
        _ => false,
    }
}
