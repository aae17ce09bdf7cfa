//! Fusion gene names.

/// Rewrite a STAR-Fusion name `A^B` as `A (B)`. Names with more partners
/// nest (`A^B^C` becomes `A (B (C)`); names without a `^` are unchanged.
pub fn rename_fusion_gene(name: &str) -> String {
    let mut parts = name.split('^');
    let first = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();
    if rest.is_empty() {
        return first.to_string();
    }
    format!("{} ({})", first, rest.join(" ("))
}
