use regex::Regex;
use std::sync::OnceLock;

fn name_slash_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Z0-9-]+)\s*/\s*(\d{2,8})").expect("valid name/code regex"))
}

fn code_space_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2,8})\s+([A-Z0-9-]+)").expect("valid code/name regex"))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeName {
    pub code: String,
    pub name: String,
}

/// Split a composite account label into customer code and name.
///
/// Accepts `NAME / CODE` (e.g. `UHA    / 5494`) and `CODE NAME`
/// (e.g. `5494 UHA`). Leading/trailing NUL and spaces are ignored.
pub fn split_code_name(field: &str) -> Option<CodeName> {
    let field = field.trim_matches(['\0', ' ']);
    if field.is_empty() {
        return None;
    }
    if let Some(c) = name_slash_code_re().captures(field) {
        return Some(CodeName {
            code: c[2].to_string(),
            name: c[1].trim().to_string(),
        });
    }
    code_space_name_re().captures(field).map(|c| CodeName {
        code: c[1].to_string(),
        name: c[2].trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(s: &str) -> Option<(String, String)> {
        split_code_name(s).map(|c| (c.code, c.name))
    }

    #[test]
    fn name_slash_code() {
        assert_eq!(split("UHA    / 5494"), Some(("5494".into(), "UHA".into())));
        assert_eq!(split("CV-12/123456 trailing"), Some(("123456".into(), "CV-12".into())));
    }

    #[test]
    fn code_then_name() {
        assert_eq!(split("5494 UHA"), Some(("5494".into(), "UHA".into())));
    }

    #[test]
    fn padded_fields_are_trimmed_first() {
        assert_eq!(split("\0 UHA / 77 \0"), Some(("77".into(), "UHA".into())));
    }

    #[test]
    fn unrecognised_shapes() {
        assert_eq!(split(""), None);
        assert_eq!(split("uha / 5494"), None);
        assert_eq!(split("UHA / 1"), None);
        assert_eq!(split("RAM LAL"), None);
    }
}
