use alloc::boxed::Box;
use alloc::vec::Vec;

/// Tag key holding a field's emitted name and options.
pub const JSON_TAG: &str = "json";

/// A parsed `json` tag.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct JsonTag {
    /// Explicit emitted name, `None` when the tag leaves it empty.
    pub name: Option<&'static str>,
    pub skip: bool,
    pub omit_empty: bool,
    pub omit_zero: bool,
    pub as_string: bool,
}

impl JsonTag {
    /// Parses `name,opt,opt`. A bare `-` skips the field; `-,` names it `-`.
    pub fn parse(tag: Option<&'static str>) -> Self {
        let Some(tag) = tag else {
            return Self::default();
        };
        if tag == "-" {
            return Self {
                skip: true,
                ..Self::default()
            };
        }

        let mut parts = tag.split(',');
        let name = parts.next().filter(|name| !name.is_empty());
        let mut parsed = Self {
            name,
            ..Self::default()
        };
        for option in parts {
            match option.trim() {
                "omitempty" => parsed.omit_empty = true,
                "omitzero" => parsed.omit_zero = true,
                "string" => parsed.as_string = true,
                _ => {}
            }
        }
        parsed
    }
}

/// Splits a visibility tag on commas; blank entries are dropped.
pub(crate) fn parse_groups(tag: Option<&'static str>) -> Box<[&'static str]> {
    let Some(tag) = tag else {
        return Box::default();
    };
    let mut groups: Vec<&'static str> = Vec::new();
    for group in tag.split(',').map(str::trim) {
        if !group.is_empty() && !groups.contains(&group) {
            groups.push(group);
        }
    }
    groups.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_tag() {
        assert_eq!(JsonTag::parse(None), JsonTag::default());
        assert!(JsonTag::parse(Some("-")).skip);

        let dash = JsonTag::parse(Some("-,"));
        assert!(!dash.skip);
        assert_eq!(dash.name, Some("-"));

        let tag = JsonTag::parse(Some("price,omitempty,string"));
        assert_eq!(tag.name, Some("price"));
        assert!(tag.omit_empty && tag.as_string && !tag.omit_zero);

        let tag = JsonTag::parse(Some(",omitzero"));
        assert_eq!(tag.name, None);
        assert!(tag.omit_zero);
    }

    #[test]
    fn groups() {
        assert!(parse_groups(None).is_empty());
        assert!(parse_groups(Some(" , ")).is_empty());
        assert_eq!(&*parse_groups(Some("public, admin,,public")), ["public", "admin"]);
    }
}
