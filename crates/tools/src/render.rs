//! Markdown report builder used by every tool module.

use crate::traits::Report;

#[derive(Debug, Default)]
pub struct Markdown {
    buf: String,
}

impl Markdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(&mut self, level: usize, text: &str) -> &mut Self {
        self.separate();
        self.buf.push_str(&"#".repeat(level.clamp(1, 6)));
        self.buf.push(' ');
        self.buf.push_str(text);
        self.buf.push_str("\n\n");
        self
    }

    pub fn para(&mut self, text: &str) -> &mut Self {
        self.separate();
        self.buf.push_str(text);
        self.buf.push_str("\n\n");
        self
    }

    pub fn line(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self.buf.push('\n');
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.line(&format!("- {text}"))
    }

    pub fn field(&mut self, key: &str, value: impl std::fmt::Display) -> &mut Self {
        self.line(&format!("- **{key}**: {value}"))
    }

    pub fn numbered(&mut self, index: usize, text: &str) -> &mut Self {
        self.line(&format!("{index}. {text}"))
    }

    pub fn checkbox(&mut self, checked: bool, text: &str) -> &mut Self {
        let mark = if checked { "x" } else { " " };
        self.line(&format!("- [{mark}] {text}"))
    }

    /// Fenced code block. A trailing newline in `body` is not duplicated.
    pub fn code(&mut self, lang: &str, body: &str) -> &mut Self {
        self.separate();
        self.buf.push_str("```");
        self.buf.push_str(lang);
        self.buf.push('\n');
        self.buf.push_str(body.trim_end_matches('\n'));
        self.buf.push_str("\n```\n\n");
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        if !self.buf.is_empty() && !self.buf.ends_with("\n\n") {
            self.buf.push('\n');
        }
        self
    }

    pub fn finish(&mut self) -> String {
        let mut out = std::mem::take(&mut self.buf);
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out.push('\n');
        out
    }

    pub fn into_report(mut self) -> Report {
        Report::text(self.finish())
    }

    // Block elements start on a fresh paragraph after list lines.
    fn separate(&mut self) {
        if self.buf.ends_with('\n') && !self.buf.ends_with("\n\n") {
            self.buf.push('\n');
        }
    }
}

/// Quote `value` as a JavaScript string literal.
pub fn js_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Lower-case the first character of an identifier.
pub fn lower_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Event or function name without a parameter list, e.g. `Transfer` for
/// `Transfer(address,address,uint256)`.
pub fn bare_name(signature: &str) -> &str {
    signature
        .split('(')
        .next()
        .unwrap_or(signature)
        .trim()
}

/// ASCII identifier usable as a Solidity, TypeScript or GraphQL name.
pub fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// `round(100 * part / whole)` with halves rounded up; `0` when `whole` is 0.
pub fn percent_of(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    let part = part as u128;
    let whole = whole as u128;
    ((200 * part + whole) / (2 * whole)) as u64
}

/// Render a fixed-point integer amount, e.g. wei with 18 decimals as MON.
pub fn format_units(amount: u128, decimals: u32) -> String {
    let scale = 10u128.pow(decimals);
    let whole = amount / scale;
    let frac = amount % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("MyToken"));
        assert!(is_identifier("_Vault2"));
        assert!(!is_identifier("2Fast"));
        assert!(!is_identifier("My Token"));
        assert!(!is_identifier("Foo\nnetworks: []"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_heading_after_list_gets_blank_line() {
        let mut md = Markdown::new();
        md.bullet("one").heading(2, "Next");
        assert_eq!(md.finish(), "- one\n\n## Next\n");
    }

    #[test]
    fn test_code_block() {
        let mut md = Markdown::new();
        md.code("ts", "const a = 1;\n");
        assert_eq!(md.finish(), "```ts\nconst a = 1;\n```\n");
    }

    #[test]
    fn test_bare_name() {
        assert_eq!(bare_name("Transfer(address,address,uint256)"), "Transfer");
        assert_eq!(bare_name("Approval"), "Approval");
    }

    #[test]
    fn test_js_string_escapes_quotes() {
        assert_eq!(js_string("a\"b"), "\"a\\\"b\"");
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(65_536, 131_072), 50);
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(1, 0), 0);
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(1_092_000_000_000_000, 18), "0.001092");
        assert_eq!(format_units(2_000_000_000_000_000_000, 18), "2");
        assert_eq!(format_units(52_000_000_000, 9), "52");
    }

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("Token"), "token");
        assert_eq!(lower_first(""), "");
    }
}
