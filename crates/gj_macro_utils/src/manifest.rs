use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's `Cargo.toml`, used to find how generated code should name
/// one of the workspace crates.
///
/// A derive expanded inside a user crate cannot write `crate::...` for our
/// items, and the user may depend on the facade instead of the member
/// crate, so the path is looked up in the manifest.
///
/// # Resolution rules
///
/// 1. `dependencies` lists `name` itself: `::name`.
/// 2. `name` starts with `gj_` and `dependencies` lists the facade
///    `groupjson`: `::groupjson::<rest>` (`gj_reflect` -> `::groupjson::reflect`).
/// 3. Steps 1-2 against `dev-dependencies`.
/// 4. Otherwise `::name`.
///
/// ```rust
/// # use gj_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.get_crate_path("gj_reflect"));
/// ```
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "groupjson";
const MEMBER_PREFIX: &str = "gj_";

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR should be set by cargo.");
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(
            path.exists(),
            "no Cargo.toml found at {}",
            path.display(),
        );
        path
    }

    #[inline(never)]
    fn modified_time(path: &Path) -> std::io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }

    #[inline(never)]
    fn parse(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|err| panic!("cannot read {}: {err}", path.display()));
        Document::parse(text.into_boxed_str())
            .unwrap_or_else(|err| panic!("cannot parse {}: {err}", path.display()))
    }

    fn path_of(text: &str) -> syn::Path {
        syn::parse_str(text).unwrap_or_else(|err| panic!("invalid path `{text}`: {err}"))
    }

    fn lookup(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::path_of(&format!("::{name}")));
        }
        let module = name.strip_prefix(MEMBER_PREFIX)?;
        if deps.contains_key(FACADE_NAME) {
            return Some(Self::path_of(&format!("::{FACADE_NAME}::{module}")));
        }
        None
    }

    /// Resolve the path of crate `name` as seen from the calling crate.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .filter_map(|section| match self.manifest.get(section) {
                Some(Item::Table(deps)) => Self::lookup(deps, name),
                _ => None,
            })
            .next()
            .unwrap_or_else(|| Self::path_of(&format!("::{name}")))
    }

    /// Run `func` against the caller's manifest.
    ///
    /// Parsed manifests are kept per path and reparsed only when the file's
    /// modification time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time =
            Self::modified_time(&path).expect("Cargo.toml should have a modified time.");

        {
            let cache = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = cache.get(&path)
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Manifest {
            manifest: Self::parse(&path),
            modified_time,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}
