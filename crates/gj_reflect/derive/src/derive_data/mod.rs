// -----------------------------------------------------------------------------
// Modules

mod field_attributes;
mod type_attributes;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use field_attributes::FieldAttributes;
pub(crate) use type_attributes::{HookKind, TypeAttributes};

use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, GenericParam, Generics, Ident, Type, Visibility};

/// A named field of a derived record.
pub(crate) struct RecordField<'a> {
    pub ident: &'a Ident,
    /// The identifier without a raw prefix, used as the default emit name.
    pub name: String,
    pub ty: &'a Type,
    pub exported: bool,
    pub attrs: FieldAttributes,
}

pub(crate) enum DeriveKind<'a> {
    Record(Vec<RecordField<'a>>),
    Hook(HookKind),
}

/// Everything the code generators need, parsed and validated.
pub(crate) struct ReflectDerive<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub kind: DeriveKind<'a>,
    pub gj_reflect_path: syn::Path,
}

impl<'a> ReflectDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        if let Some(lifetime) = input.generics.lifetimes().next() {
            return Err(syn::Error::new(
                lifetime.span(),
                "`Reflect` types must be `'static`; lifetime parameters are not supported",
            ));
        }

        let type_attrs = TypeAttributes::parse_attrs(&input.attrs)?;

        let kind = match (type_attrs.hook, &input.data) {
            (Some(hook), _) => DeriveKind::Hook(hook),
            (None, Data::Struct(data)) => match &data.fields {
                Fields::Named(fields) => {
                    let fields = fields
                        .named
                        .iter()
                        .map(|field| {
                            let ident = field.ident.as_ref().ok_or_else(|| {
                                syn::Error::new(field.span(), "expected a named field")
                            })?;
                            Ok(RecordField {
                                ident,
                                name: ident.unraw().to_string(),
                                ty: &field.ty,
                                exported: matches!(field.vis, Visibility::Public(_)),
                                attrs: FieldAttributes::parse_attrs(&field.attrs)?,
                            })
                        })
                        .collect::<syn::Result<Vec<_>>>()?;
                    DeriveKind::Record(fields)
                }
                _ => return Err(hook_required(input, "tuple and unit structs")),
            },
            (None, Data::Enum(_)) => return Err(hook_required(input, "enums")),
            (None, Data::Union(_)) => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "`Reflect` cannot be derived for unions",
                ));
            }
        };

        Ok(Self {
            ident: &input.ident,
            generics: &input.generics,
            kind,
            gj_reflect_path: crate::path::gj_reflect(),
        })
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        self.generics
            .params
            .iter()
            .any(|p| matches!(p, GenericParam::Type(_) | GenericParam::Const(_)))
    }
}

fn hook_required(input: &DeriveInput, what: &str) -> syn::Error {
    syn::Error::new(
        input.ident.span(),
        format!(
            "{what} are not records; add `#[reflect(json)]`, `#[reflect(text)]`, \
             `#[reflect(serialize)]` or `#[reflect(display)]`"
        ),
    )
}
