use proc_macro2::Span;
use syn::{Attribute, LitStr};

use crate::REFLECT_ATTRIBUTE_NAME;

/// Field-level `#[reflect(...)]` attributes.
///
/// - `embed`
/// - `key = "value"` for any tag key
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub embed: Option<Span>,
    pub tags: Vec<(String, LitStr)>,
}

impl FieldAttributes {
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
                let key = ident.to_string();

                if meta.input.is_empty() || meta.input.peek(syn::Token![,]) {
                    if key != "embed" {
                        return Err(meta.error(format!(
                            "unknown flag `{key}`; tags are written `{key} = \"...\"`"
                        )));
                    }
                    if this.embed.is_some() {
                        return Err(meta.error("duplicate `embed`"));
                    }
                    this.embed = Some(ident.span());
                    return Ok(());
                }

                let value: LitStr = meta.value()?.parse()?;
                if this.tags.iter().any(|(k, _)| *k == key) {
                    return Err(meta.error(format!("duplicate tag `{key}`")));
                }
                this.tags.push((key, value));
                Ok(())
            })?;
        }

        Ok(this)
    }
}
