use sharpgen_core::transform::KeywordTable;

/// Reserved C# keywords. Contextual keywords (`var`, `async`, …) are legal
/// identifiers and stay out.
pub const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Verbatim-identifier prefix.
pub const ESCAPE_PREFIX: &str = "@";

pub fn csharp_keywords() -> KeywordTable {
    KeywordTable::new(CSHARP_KEYWORDS.iter().copied(), ESCAPE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_escaped_with_at() {
        let table = csharp_keywords();
        assert!(table.contains("class"));
        assert!(table.contains("while"));
        assert!(!table.contains("var"));
        assert_eq!(table.escape("params"), "@params");
    }
}
