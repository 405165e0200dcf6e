use proc_macro2::TokenStream;
use quote::quote;

use super::bounded_generics;
use crate::derive_data::{HookKind, ReflectDerive};

/// Implement `Reflect` for a type that encodes itself.
pub(crate) fn impl_hook(derive: &ReflectDerive, hook: HookKind) -> TokenStream {
    let gj = &derive.gj_reflect_path;
    let reflect_ = crate::path::reflect_(gj);
    let reflect_ref_ = crate::path::reflect_ref_(gj);

    let generics = bounded_generics(derive.generics, quote!('static), []);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let ident = derive.ident;

    let variant = match hook {
        HookKind::Json => quote!(Json),
        HookKind::Text | HookKind::Display => quote!(Text),
        HookKind::Serialize => quote!(Serialize),
    };

    let display_tokens = (hook == HookKind::Display).then(|| {
        let marshal_text_ = crate::path::marshal_text_(gj);
        let hook_error_ = crate::path::hook_error_(gj);
        let exports_ = crate::path::macro_exports_(gj);
        quote! {
            impl #impl_generics #marshal_text_ for #ident #ty_generics #where_clause {
                #[inline]
                fn marshal_text(&self) -> #exports_::Result<#exports_::String, #hook_error_> {
                    #exports_::Result::Ok(#exports_::ToString::to_string(self))
                }
            }
        }
    });

    quote! {
        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            #[inline]
            fn reflect_ref(&self) -> #reflect_ref_<'_> {
                #reflect_ref_::#variant(self)
            }
        }

        #display_tokens
    }
}
