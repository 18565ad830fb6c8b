use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's `Cargo.toml`, used to decide how generated code names
/// another workspace crate.
///
/// # Example
///
/// ```rust
/// # use ee_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("ee_reflect"));
/// ```
///
/// # Resolution rules
///
/// For each of `dependencies` then `dev-dependencies`:
///
/// 1. If the requested crate is listed directly, return `::crate_name`.
/// 2. If the name begins with `ee_` and the caller depends on one of the
///    umbrella crates (`ee_core`, or the short alias `ee`), return
///    `::umbrella::short_name` (e.g. `ee_reflect` -> `::ee_core::reflect`).
///
/// Otherwise fall back to `::crate_name`.
///
/// A crate that invokes its own derive needs `extern crate self as name;`
/// at its root so the absolute path also resolves inside the crate.
#[derive(Debug)]
pub struct Manifest {
    manifest: Document<Box<str>>,
    modified_time: SystemTime,
}

const CRATE_PREFIX: &str = "ee_";
const UMBRELLA_CRATES: [&str; 2] = ["ee_core", "ee"];

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.");
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(
            path.exists(),
            "Cargo manifest does not exist at path {}",
            path.display(),
        );
        path
    }

    #[inline(never)]
    fn read_manifest(path: &Path) -> Document<Box<str>> {
        let manifest = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        Document::parse(manifest)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    fn path_of(text: &str) -> syn::Path {
        syn::parse_str(text).unwrap_or_else(|_| panic!("`{text}` is not a valid path"))
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::path_of(&format!("::{name}")));
        }

        let module = name.strip_prefix(CRATE_PREFIX)?;
        UMBRELLA_CRATES
            .iter()
            .find(|umbrella| deps.contains_key(umbrella))
            .map(|umbrella| Self::path_of(&format!("::{umbrella}::{module}")))
    }

    /// Return a [`syn::Path`] for the package named `name` as resolved from the
    /// caller's Cargo.toml. See the type documentation for the rules.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .filter_map(|section| match self.manifest.get(section) {
                Some(Item::Table(deps)) => Self::find_in_deps(deps, name),
                _ => None,
            })
            .next()
            .unwrap_or_else(|| Self::path_of(&format!("::{name}")))
    }

    /// Run `func` with the caller's parsed [`Manifest`].
    ///
    /// Parsed manifests are cached per path and refreshed when the file's
    /// modification time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let manifest_path = Self::manifest_path();
        let modified_time = std::fs::metadata(&manifest_path)
            .and_then(|metadata| metadata.modified())
            .expect("The Cargo.toml should have a modified time.");

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(manifest) = manifests.get(&manifest_path)
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }
        drop(manifests);

        let manifest = Manifest {
            manifest: Self::read_manifest(&manifest_path),
            modified_time,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(manifest_path, manifest);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Manifest {
        Manifest {
            manifest: Document::parse(text.to_owned().into_boxed_str()).unwrap(),
            modified_time: SystemTime::UNIX_EPOCH,
        }
    }

    fn render(path: syn::Path) -> String {
        path.segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect::<Vec<_>>()
            .join("::")
    }

    #[test]
    fn direct_dependency() {
        let m = parse("[dependencies]\nee_reflect = \"0.1\"\n");
        assert_eq!(render(m.get_crate_path("ee_reflect")), "ee_reflect");
    }

    #[test]
    fn through_umbrella_crate() {
        let m = parse("[dependencies]\nee_core = \"0.1\"\n");
        assert_eq!(render(m.get_crate_path("ee_reflect")), "ee_core::reflect");
    }

    #[test]
    fn dev_dependency_and_fallback() {
        let m = parse("[dev-dependencies]\nee = \"0.1\"\n");
        assert_eq!(render(m.get_crate_path("ee_utils")), "ee::utils");
        assert_eq!(render(m.get_crate_path("serde")), "serde");
    }
}
