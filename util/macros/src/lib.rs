// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Procedural macros declaring shurup test cases.
//!
//! A case defined with `#[def_case(Group)]` is exported under a symbol
//! derived from its group and case name. Code in another module or crate
//! (typically the file generated by `shurup-gen`) names it again with
//! `declare_case!(Group, case)` and gets a callable with
//! `case_fn!(Group, case)`, without knowing the module path of the body.
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote};
use syn::{
    Error, ExprAsync, ExprClosure, ExprReturn, Ident, Item, ItemFn, Token,
    parse::{Parse, ParseStream},
    parse_macro_input, parse_quote,
    visit_mut::{self, VisitMut},
};

/// `Group, case` pair naming one case.
struct CaseId {
    group: Ident,
    case: Ident,
}

impl Parse for CaseId {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let group = input.parse()?;
        input.parse::<Token![,]>()?;
        let case = input.parse()?;
        // Allow a trailing comma.
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        }
        Ok(Self { group, case })
    }
}

impl CaseId {
    fn symbol(&self) -> String {
        format!("__shurup_case__{}__{}", self.group, self.case)
    }

    fn extern_ident(&self) -> Ident {
        format_ident!("__shurup_case__{}__{}", self.group, self.case)
    }
}

/// Rewrites `return;` of a case body into `return Ok(());`.
///
/// Closures, async blocks and nested items keep their own returns.
struct UnitReturns;

impl VisitMut for UnitReturns {
    fn visit_expr_return_mut(&mut self, ret: &mut ExprReturn) {
        match &mut ret.expr {
            Some(expr) => self.visit_expr_mut(expr),
            None => ret.expr = Some(Box::new(parse_quote!(::core::result::Result::Ok(())))),
        }
    }

    fn visit_expr_closure_mut(&mut self, _closure: &mut ExprClosure) {}

    fn visit_expr_async_mut(&mut self, _block: &mut ExprAsync) {}

    fn visit_item_mut(&mut self, _item: &mut Item) {}
}

/// Defines the body of a case belonging to `Group`; the case is named after
/// the function.
///
/// The function takes no arguments. It may return `shurup::CaseResult`; if
/// it declares no return type, `Ok(())` is returned after the body and a
/// bare `return;` returns `Ok(())` too, so the assertion macros can be used
/// in either form.
///
/// # Example
///
/// ```rust,ignore
/// use shurup::{def_case, test_assert_eq};
///
/// #[def_case(Math)]
/// fn addition() {
///     test_assert_eq!(4, 2 + 2, "two and two");
/// }
/// ```
#[proc_macro_attribute]
pub fn def_case(attr: TokenStream, item: TokenStream) -> TokenStream {
    if attr.is_empty() {
        return Error::new(
            Span::call_site(),
            "expect a group name: `#[def_case(Group)]`",
        )
        .to_compile_error()
        .into();
    }
    let group = parse_macro_input!(attr as Ident);
    let function = parse_macro_input!(item as ItemFn);

    match generate_case(group, function) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_case(group: Ident, function: ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let sig = &function.sig;
    // The symbol is shared with `declare_case!`, so the signature must stay
    // exactly `fn() -> CaseResult`.
    if !sig.inputs.is_empty() {
        return Err(Error::new_spanned(
            &sig.inputs,
            "expect no input arguments for a test case",
        ));
    }
    if !sig.generics.params.is_empty() || sig.asyncness.is_some() {
        return Err(Error::new_spanned(
            sig,
            "a test case must be a plain non-generic function",
        ));
    }

    let id = CaseId {
        group,
        case: sig.ident.clone(),
    };
    let symbol = id.symbol();
    let fn_name = &sig.ident;
    let fn_attrs = &function.attrs;
    let fn_vis = &function.vis;
    let mut block = function.block.clone();

    let body = if matches!(sig.output, syn::ReturnType::Default) {
        visit_mut::visit_block_mut(&mut UnitReturns, &mut block);
        quote! {
            #block
            ::core::result::Result::Ok(())
        }
    } else {
        let stmts = &block.stmts;
        quote! { #(#stmts)* }
    };

    Ok(quote! {
        #(#fn_attrs)*
        #[unsafe(export_name = #symbol)]
        #fn_vis fn #fn_name() -> ::shurup::CaseResult {
            #body
        }
    })
}

/// Declares a case defined elsewhere with `#[def_case(Group)]`.
///
/// Expands to a foreign declaration of the exported case body; use
/// [`case_fn!`] in the same module to obtain a callable.
#[proc_macro]
pub fn declare_case(input: TokenStream) -> TokenStream {
    let id = parse_macro_input!(input as CaseId);
    let symbol = id.symbol();
    let ident = id.extern_ident();

    quote! {
        unsafe extern "Rust" {
            #[link_name = #symbol]
            #[allow(non_snake_case)]
            fn #ident() -> ::shurup::CaseResult;
        }
    }
    .into()
}

/// Evaluates to a `shurup::CaseFn` calling a case brought in by
/// [`declare_case!`].
#[proc_macro]
pub fn case_fn(input: TokenStream) -> TokenStream {
    let id = parse_macro_input!(input as CaseId);
    let ident = id.extern_ident();

    quote! {
        ((|| unsafe { #ident() }) as ::shurup::CaseFn)
    }
    .into()
}
