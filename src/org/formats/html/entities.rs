//! Named entities and typographic replacements applied to exported text.
//!
//! `\alpha`, `\rarr` and friends become the character they name; `--`, `---` and `...`
//! become dashes and an ellipsis. Verbatim text is never passed through here.

use once_cell::sync::Lazy;

const ENTITIES: &[(&str, &str)] = &[
    ("\\alpha", "α"),
    ("\\beta", "β"),
    ("\\gamma", "γ"),
    ("\\delta", "δ"),
    ("\\epsilon", "ε"),
    ("\\zeta", "ζ"),
    ("\\eta", "η"),
    ("\\theta", "θ"),
    ("\\iota", "ι"),
    ("\\kappa", "κ"),
    ("\\lambda", "λ"),
    ("\\mu", "μ"),
    ("\\nu", "ν"),
    ("\\xi", "ξ"),
    ("\\pi", "π"),
    ("\\rho", "ρ"),
    ("\\sigma", "σ"),
    ("\\tau", "τ"),
    ("\\upsilon", "υ"),
    ("\\phi", "φ"),
    ("\\chi", "χ"),
    ("\\psi", "ψ"),
    ("\\omega", "ω"),
    ("\\Gamma", "Γ"),
    ("\\Delta", "Δ"),
    ("\\Theta", "Θ"),
    ("\\Lambda", "Λ"),
    ("\\Pi", "Π"),
    ("\\Sigma", "Σ"),
    ("\\Phi", "Φ"),
    ("\\Psi", "Ψ"),
    ("\\Omega", "Ω"),
    ("\\nbsp", "\u{a0}"),
    ("\\copy", "©"),
    ("\\reg", "®"),
    ("\\trade", "™"),
    ("\\deg", "°"),
    ("\\pm", "±"),
    ("\\times", "×"),
    ("\\div", "÷"),
    ("\\middot", "·"),
    ("\\sect", "§"),
    ("\\para", "¶"),
    ("\\euro", "€"),
    ("\\pound", "£"),
    ("\\yen", "¥"),
    ("\\cent", "¢"),
    ("\\laquo", "«"),
    ("\\raquo", "»"),
    ("\\larr", "←"),
    ("\\rarr", "→"),
    ("\\uarr", "↑"),
    ("\\darr", "↓"),
    ("\\harr", "↔"),
    ("\\lArr", "⇐"),
    ("\\rArr", "⇒"),
    ("\\hArr", "⇔"),
    ("\\to", "→"),
    ("\\infin", "∞"),
    ("\\ne", "≠"),
    ("\\le", "≤"),
    ("\\ge", "≥"),
    ("\\approx", "≈"),
    ("\\equiv", "≡"),
    ("\\sum", "∑"),
    ("\\prod", "∏"),
    ("\\radic", "√"),
    ("\\partial", "∂"),
    ("\\nabla", "∇"),
    ("\\forall", "∀"),
    ("\\exist", "∃"),
    ("\\empty", "∅"),
    ("\\isin", "∈"),
    ("\\notin", "∉"),
    ("\\cap", "∩"),
    ("\\cup", "∪"),
    ("\\and", "∧"),
    ("\\or", "∨"),
    ("\\neg", "¬"),
    ("\\hellip", "…"),
    ("\\mdash", "—"),
    ("\\ndash", "–"),
    ("---", "—"),
    ("--", "–"),
    ("...", "…"),
];

/// Entities ordered longest first, so `---` wins over `--`.
static BY_LENGTH: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut entities = ENTITIES.to_vec();
    entities.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    entities
});

/// Replace every entity in `text`, scanning left to right.
pub fn replace_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'scan: while let Some(c) = rest.chars().next() {
        if c == '\\' || c == '-' || c == '.' {
            for (name, replacement) in BY_LENGTH.iter() {
                if let Some(after) = rest.strip_prefix(name) {
                    out.push_str(replacement);
                    rest = after;
                    continue 'scan;
                }
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_entities() {
        assert_eq!(replace_entities("\\alpha and \\Omega"), "α and Ω");
        assert_eq!(replace_entities("a \\rarr b"), "a → b");
    }

    #[test]
    fn test_dashes_longest_first() {
        assert_eq!(replace_entities("a---b--c-d"), "a—b–c-d");
        assert_eq!(replace_entities("wait..."), "wait…");
    }

    #[test]
    fn test_unknown_backslash_untouched() {
        assert_eq!(replace_entities("C:\\path \\unknown"), "C:\\path \\unknown");
    }
}
