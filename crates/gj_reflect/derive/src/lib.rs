//! Derive macro for [`Reflect`](derive@Reflect).
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` on a struct with named fields implements
/// `Typed`, `Reflect` and `Record`, making the struct a record the
/// encoder can filter field by field.
///
/// ## Field Tags
///
/// Any `key = "value"` pair on a field is stored as a raw tag. Two keys
/// have a meaning to the encoder:
///
/// - `json`: naming tag, `"name,omitempty,omitzero,string"`; `"-"` skips
///   the field; an empty name keeps the field identifier.
/// - `groups`: visibility groups, comma-separated. The encoder can be
///   configured to read groups from another key, e.g. `roles = "..."`.
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// pub struct User {
///     #[reflect(json = "id", groups = "public,admin")]
///     pub id: u64,
///     #[reflect(json = "email,omitempty", groups = "admin")]
///     pub email: String,
///     // never emitted: not `pub`
///     password: String,
/// }
/// ```
///
/// Only `pub` fields are visible to the encoder.
///
/// ## Embedding
///
/// `embed` promotes the fields of another record into this one, like an
/// anonymous embedding. The field type must be a derived record, or a
/// `Box`, `Option`, `Rc` or `Arc` of one. An embedding that also has a
/// `json` name is encoded as an ordinary nested field instead, and a
/// private embedding is skipped like any other private field. A record may
/// embed itself through `Option<Box<Self>>`.
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// pub struct Admin {
///     #[reflect(embed)]
///     pub user: User,
///     #[reflect(groups = "admin")]
///     pub level: u8,
/// }
/// ```
///
/// ## Hooks
///
/// A type-level flag hands the whole value's encoding to the type itself.
/// Enums and tuple structs must use one of them.
///
/// - `json`: the type implements `MarshalJson`.
/// - `text`: the type implements `MarshalText`; output is a JSON string.
/// - `serialize`: the type implements `serde::Serialize`.
/// - `display`: the type implements `Display`, used as `MarshalText`.
///
/// ```rust, ignore
/// #[derive(Reflect, serde::Serialize)]
/// #[reflect(serialize)]
/// pub enum Role { Admin, Member }
/// ```
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ReflectDerive::from_input(&ast) {
        Ok(derive) => impls::impl_reflect(&derive).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
