//! Paths to `gj_reflect` items used in generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the access path to the `gj_reflect` crate from the caller.
///
/// 1. Crates depending on `gj_reflect` get `::gj_reflect`.
/// 2. Crates depending on `groupjson` get `::groupjson::reflect`.
/// 3. Otherwise `::gj_reflect`, which `gj_reflect` itself aliases.
///
/// Reading the manifest is not cheap, so this is called once per derive.
pub(crate) fn gj_reflect() -> syn::Path {
    gj_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("gj_reflect"))
}

#[inline(always)]
pub(crate) fn reflect_(gj: &syn::Path) -> TokenStream {
    quote!(#gj::Reflect)
}

#[inline(always)]
pub(crate) fn reflect_ref_(gj: &syn::Path) -> TokenStream {
    quote!(#gj::ReflectRef)
}

#[inline(always)]
pub(crate) fn typed_(gj: &syn::Path) -> TokenStream {
    quote!(#gj::info::Typed)
}

#[inline(always)]
pub(crate) fn record_info_(gj: &syn::Path) -> TokenStream {
    quote!(#gj::info::RecordInfo)
}

#[inline(always)]
pub(crate) fn field_info_(gj: &syn::Path) -> TokenStream {
    quote!(#gj::info::FieldInfo)
}

#[inline(always)]
pub(crate) fn record_info_cell_(gj: &syn::Path) -> TokenStream {
    quote!(#gj::info::RecordInfoCell)
}

#[inline(always)]
pub(crate) fn generic_record_info_cell_(gj: &syn::Path) -> TokenStream {
    quote!(#gj::info::GenericRecordInfoCell)
}

#[inline(always)]
pub(crate) fn record_(gj: &syn::Path) -> TokenStream {
    quote!(#gj::ops::Record)
}

#[inline(always)]
pub(crate) fn marshal_text_(gj: &syn::Path) -> TokenStream {
    quote!(#gj::ops::MarshalText)
}

#[inline(always)]
pub(crate) fn hook_error_(gj: &syn::Path) -> TokenStream {
    quote!(#gj::ops::HookError)
}

#[inline(always)]
pub(crate) fn macro_exports_(gj: &syn::Path) -> TokenStream {
    quote!(#gj::__macro_exports)
}
