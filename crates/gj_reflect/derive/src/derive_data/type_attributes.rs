use proc_macro2::Span;
use syn::{Attribute, Ident};

use crate::REFLECT_ATTRIBUTE_NAME;

/// How a hook type encodes itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HookKind {
    /// `#[reflect(json)]`: user-provided `MarshalJson`.
    Json,
    /// `#[reflect(text)]`: user-provided `MarshalText`.
    Text,
    /// `#[reflect(serialize)]`: `serde::Serialize`.
    Serialize,
    /// `#[reflect(display)]`: `Display` as `MarshalText`.
    Display,
}

/// Type-level `#[reflect(...)]` attributes.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub hook: Option<HookKind>,
    hook_span: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                let Some(ident) = meta.path.get_ident() else {
                    return Err(meta.error("expected an identifier"));
                };
                let hook = Self::parse_hook(ident)?;
                this.set_hook(hook, ident.span())
            })?;
        }

        Ok(this)
    }

    fn parse_hook(ident: &Ident) -> syn::Result<HookKind> {
        match ident.to_string().as_str() {
            "json" => Ok(HookKind::Json),
            "text" => Ok(HookKind::Text),
            "serialize" => Ok(HookKind::Serialize),
            "display" => Ok(HookKind::Display),
            other => Err(syn::Error::new(
                ident.span(),
                format!("unknown type attribute `{other}`"),
            )),
        }
    }

    fn set_hook(&mut self, hook: HookKind, span: Span) -> syn::Result<()> {
        if let Some(prev) = self.hook_span {
            let mut err = syn::Error::new(span, "only one hook attribute is allowed");
            err.combine(syn::Error::new(prev, "first hook declared here"));
            return Err(err);
        }
        self.hook = Some(hook);
        self.hook_span = Some(span);
        Ok(())
    }
}
