//! Parsing of `#[reflect(...)]` attributes.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitStr, Path, Token};

use crate::REFLECT_ATTRIBUTE_NAME;

fn parse_lit_str(meta: &ParseNestedMeta) -> syn::Result<LitStr> {
    meta.value()?.parse::<LitStr>()
}

fn duplicate(meta: &ParseNestedMeta) -> syn::Error {
    meta.error("duplicate reflect attribute")
}

/// Run `f` on each entry of every `#[reflect(...)]` attribute in `attrs`.
fn for_each_reflect_meta(
    attrs: &[Attribute],
    mut f: impl FnMut(ParseNestedMeta) -> syn::Result<()>,
) -> syn::Result<()> {
    for attr in attrs.iter().filter(|attr| attr.path().is_ident(REFLECT_ATTRIBUTE_NAME)) {
        attr.parse_nested_meta(&mut f)?;
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Type level attributes.
///
/// - `id = "..."`
/// - `abstract`
/// - `friendly_name = "..."`
/// - `category = "..."`
/// - `post_deserialize = path`
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub id: Option<LitStr>,
    pub is_abstract: bool,
    pub friendly_name: Option<LitStr>,
    pub category: Option<LitStr>,
    pub post_deserialize: Option<Path>,
}

impl TypeAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for_each_reflect_meta(attrs, |meta| {
            if meta.path.is_ident("id") {
                if this.id.is_some() {
                    return Err(duplicate(&meta));
                }
                let id = parse_lit_str(&meta)?;
                if id.value().is_empty() {
                    return Err(syn::Error::new(id.span(), "type id cannot be empty"));
                }
                this.id = Some(id);
            } else if meta.path.is_ident("abstract") {
                if this.is_abstract {
                    return Err(duplicate(&meta));
                }
                this.is_abstract = true;
            } else if meta.path.is_ident("friendly_name") {
                if this.friendly_name.is_some() {
                    return Err(duplicate(&meta));
                }
                this.friendly_name = Some(parse_lit_str(&meta)?);
            } else if meta.path.is_ident("category") {
                if this.category.is_some() {
                    return Err(duplicate(&meta));
                }
                this.category = Some(parse_lit_str(&meta)?);
            } else if meta.path.is_ident("post_deserialize") {
                if this.post_deserialize.is_some() {
                    return Err(duplicate(&meta));
                }
                this.post_deserialize = Some(meta.value()?.parse::<Path>()?);
            } else {
                return Err(meta.error(
                    "unknown type attribute, expected one of `id`, `abstract`, \
                     `friendly_name`, `category`, `post_deserialize`",
                ));
            }
            Ok(())
        })?;

        Ok(this)
    }

    /// Fail if anything beyond `id` was given; used for enums.
    pub fn only_id(&self, span: Span) -> syn::Result<()> {
        if self.is_abstract
            || self.friendly_name.is_some()
            || self.category.is_some()
            || self.post_deserialize.is_some()
        {
            return Err(syn::Error::new(
                span,
                "reflected enums only accept `#[reflect(id = \"...\")]`",
            ));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Field level attributes.
///
/// - `base`
/// - `skip`
/// - `name = "..."`
/// - `meta(Key = "value", Flag, ...)`
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub is_base: bool,
    pub skip: bool,
    pub name: Option<LitStr>,
    pub metadata: Vec<(String, String)>,
}

impl FieldAttributes {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for_each_reflect_meta(attrs, |meta| {
            if meta.path.is_ident("base") {
                if this.is_base {
                    return Err(duplicate(&meta));
                }
                this.is_base = true;
            } else if meta.path.is_ident("skip") {
                if this.skip {
                    return Err(duplicate(&meta));
                }
                this.skip = true;
            } else if meta.path.is_ident("name") {
                if this.name.is_some() {
                    return Err(duplicate(&meta));
                }
                let name = parse_lit_str(&meta)?;
                if name.value().is_empty() {
                    return Err(syn::Error::new(name.span(), "property name cannot be empty"));
                }
                this.name = Some(name);
            } else if meta.path.is_ident("meta") {
                meta.parse_nested_meta(|entry| {
                    let key = entry
                        .path
                        .get_ident()
                        .ok_or_else(|| entry.error("metadata keys are plain identifiers"))?
                        .to_string();
                    let value = if entry.input.peek(Token![=]) {
                        parse_lit_str(&entry)?.value()
                    } else {
                        String::new()
                    };
                    this.metadata.push((key, value));
                    Ok(())
                })?;
            } else {
                return Err(meta.error(
                    "unknown field attribute, expected one of `base`, `skip`, `name`, `meta`",
                ));
            }
            Ok(())
        })?;

        if this.is_base && (this.skip || this.name.is_some() || !this.metadata.is_empty()) {
            return Err(syn::Error::new(
                Span::call_site(),
                "`base` cannot be combined with other field attributes",
            ));
        }

        Ok(this)
    }
}

/// Fail if a variant carries `#[reflect(...)]`.
pub(crate) fn reject_reflect_attributes(attrs: &[Attribute]) -> syn::Result<()> {
    match attrs.iter().find(|attr| attr.path().is_ident(REFLECT_ATTRIBUTE_NAME)) {
        Some(attr) => Err(syn::Error::new_spanned(
            attr,
            "enum variants do not accept reflect attributes",
        )),
        None => Ok(()),
    }
}
