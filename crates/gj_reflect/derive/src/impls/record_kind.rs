use proc_macro2::{Ident, TokenStream, TokenTree};
use quote::{ToTokens, quote};
use syn::{LitStr, WherePredicate, parse_quote};

use super::bounded_generics;
use crate::derive_data::{RecordField, ReflectDerive};

/// Implement `Typed`, `Reflect` and `Record` for a struct with named fields.
pub(crate) fn impl_record(derive: &ReflectDerive, fields: &[RecordField]) -> TokenStream {
    let gj = &derive.gj_reflect_path;
    let reflect_ = crate::path::reflect_(gj);
    let reflect_ref_ = crate::path::reflect_ref_(gj);
    let typed_ = crate::path::typed_(gj);
    let record_ = crate::path::record_(gj);
    let record_info_ = crate::path::record_info_(gj);
    let exports_ = crate::path::macro_exports_(gj);

    // Only embedded types over a type parameter need a bound; a concrete
    // one, including the record itself, is checked at `.embedded::<T>()`.
    let params: Vec<Ident> = derive
        .generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();
    let embedded_bounds = fields
        .iter()
        .filter(|field| field.attrs.embed.is_some())
        .filter(|field| mentions_any(field.ty.to_token_stream(), &params))
        .map(|field| -> WherePredicate {
            let ty = field.ty;
            parse_quote!(#ty: #typed_)
        })
        .collect::<Vec<_>>();

    let generics = bounded_generics(derive.generics, reflect_.clone(), embedded_bounds);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let ident = derive.ident;

    let info_tokens = record_info_tokens(derive, fields);

    let field_arms = fields.iter().enumerate().map(|(index, field)| {
        let member = field.ident;
        quote! {
            #index => #exports_::Option::Some(#reflect_::as_reflect(&self.#member)),
        }
    });

    quote! {
        impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
            fn record_info() -> &'static #record_info_ {
                #info_tokens
            }
        }

        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::Record(self)
            }
        }

        impl #impl_generics #record_ for #ident #ty_generics #where_clause {
            #[inline]
            fn record_info(&self) -> &'static #record_info_ {
                <Self as #typed_>::record_info()
            }

            fn field_at(&self, index: usize) -> #exports_::Option<&dyn #reflect_> {
                match index {
                    #(#field_arms)*
                    _ => #exports_::Option::None,
                }
            }
        }
    }
}

fn mentions_any(tokens: TokenStream, idents: &[Ident]) -> bool {
    tokens.into_iter().any(|tree| match tree {
        TokenTree::Ident(ident) => idents.contains(&ident),
        TokenTree::Group(group) => mentions_any(group.stream(), idents),
        _ => false,
    })
}

/// Body of `Typed::record_info`, caching the metadata in a static cell.
fn record_info_tokens(derive: &ReflectDerive, fields: &[RecordField]) -> TokenStream {
    let gj = &derive.gj_reflect_path;
    let record_info_ = crate::path::record_info_(gj);
    let field_info_ = crate::path::field_info_(gj);

    let field_infos = fields.iter().map(|field| {
        let name = LitStr::new(&field.name, field.ident.span());
        let private = (!field.exported).then(|| quote!(.private()));
        let embedded = field.attrs.embed.map(|span| {
            let ty = field.ty;
            quote::quote_spanned!(span=> .embedded::<#ty>())
        });
        let tags = field
            .attrs
            .tags
            .iter()
            .map(|(key, value)| quote!(.with_tag(#key, #value)));

        quote! {
            #field_info_::new(#name) #private #embedded #(#tags)*
        }
    });

    let len = fields.len();
    let build = quote! {
        #record_info_::new::<Self>(<[#field_info_; #len]>::from([ #(#field_infos),* ]))
    };

    if derive.is_generic() {
        let cell_ = crate::path::generic_record_info_cell_(gj);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_insert::<Self>(|| #build)
        }
    } else {
        let cell_ = crate::path::record_info_cell_(gj);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_init(|| #build)
        }
    }
}
