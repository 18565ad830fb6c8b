use syn::{Attribute, Expr, Lit, Meta};

/// Collect `#[doc = "..."]` lines (including `///` comments) into one string.
///
/// Lines are trimmed and joined with `\n`. Returns `None` if there is no
/// non-blank content.
pub(crate) fn collect_docs(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(pair) => match &pair.value {
                Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(lit) => Some(lit.value().trim().to_owned()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect();

    let docs = lines.join("\n");
    let docs = docs.trim();
    (!docs.is_empty()).then(|| docs.to_owned())
}
