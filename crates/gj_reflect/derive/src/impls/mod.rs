// -----------------------------------------------------------------------------
// Modules

mod hook_kind;
mod record_kind;

// -----------------------------------------------------------------------------
// Internal API

use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericParam, Generics, WherePredicate, parse_quote};

use crate::derive_data::{DeriveKind, ReflectDerive};

pub(crate) fn impl_reflect(derive: &ReflectDerive) -> TokenStream {
    let impls = match &derive.kind {
        DeriveKind::Record(fields) => record_kind::impl_record(derive, fields),
        DeriveKind::Hook(hook) => hook_kind::impl_hook(derive, *hook),
    };

    quote! {
        const _: () = {
            #impls
        };
    }
}

/// Clone `generics` and add `bound` to every type parameter,
/// plus the `extra` predicates.
fn bounded_generics(
    generics: &Generics,
    bound: TokenStream,
    extra: impl IntoIterator<Item = WherePredicate>,
) -> Generics {
    let mut generics = generics.clone();
    let params: Vec<_> = generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(ty) => Some(ty.ident.clone()),
            _ => None,
        })
        .collect();

    let where_clause = generics.make_where_clause();
    for ident in params {
        where_clause.predicates.push(parse_quote!(#ident: #bound));
    }
    where_clause.predicates.extend(extra);
    generics
}
