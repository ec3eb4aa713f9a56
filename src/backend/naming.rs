// src/backend/naming.rs

/// Splits a camel-case identifier into words, keeping runs of capitals
/// together as one acronym.
///
/// `internalIPAddress` becomes `["internal", "IP", "Address"]`, `HTTP`
/// stays whole. An empty input yields a single empty word.
pub fn split_camel_case(s: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut words = Vec::new();
    let mut start = 0;

    for i in 1..chars.len() {
        let (at, curr) = chars[i];
        let prev = chars[i - 1].1;
        let next_is_lower = chars.get(i + 1).is_some_and(|(_, c)| c.is_lowercase());
        if (prev.is_lowercase() && curr.is_uppercase()) || (curr.is_uppercase() && next_is_lower) {
            words.push(&s[start..at]);
            start = at;
        }
    }
    words.push(&s[start..]);
    words
}

/// `jobStatus` -> `job_status_enum.go`.
pub fn file_name_for_type(type_name: &str) -> String {
    let words: Vec<String> = split_camel_case(type_name)
        .into_iter()
        .map(str::to_lowercase)
        .collect();
    format!("{}_enum.go", words.join("_"))
}

/// Letters, digits and `_`, not starting with a digit.
pub fn is_valid_go_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphabetic() || c.is_numeric() || c == '_')
        }
        _ => false,
    }
}

/// Upper-cases the first letter and leaves the rest alone.
pub fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_camel_case() {
        let cases: [(&str, &[&str]); 9] = [
            ("", &[""]),
            ("status", &["status"]),
            ("jobStatus", &["job", "Status"]),
            ("internalIPAddress", &["internal", "IP", "Address"]),
            ("internalIP", &["internal", "IP"]),
            ("HTTPResponse", &["HTTP", "Response"]),
            ("HTTPResponseCode", &["HTTP", "Response", "Code"]),
            ("HTTP", &["HTTP"]),
            ("linterTest", &["linter", "Test"]),
        ];
        for (input, expected) in cases {
            assert_eq!(split_camel_case(input), expected.to_vec(), "input {:?}", input);
        }
    }

    #[test]
    fn test_file_name_for_type() {
        assert_eq!(file_name_for_type("status"), "status_enum.go");
        assert_eq!(file_name_for_type("jobStatus"), "job_status_enum.go");
        assert_eq!(file_name_for_type("noZero"), "no_zero_enum.go");
        assert_eq!(file_name_for_type("internalIPAddress"), "internal_ip_address_enum.go");
    }

    #[test]
    fn test_is_valid_go_identifier() {
        for valid in ["enum", "_private", "pkg2", "sub_pkg", "ünïcode"] {
            assert!(is_valid_go_identifier(valid), "{} should be valid", valid);
        }
        for invalid in ["", "2pkg", "my-pkg", "with space", "dot.ted"] {
            assert!(!is_valid_go_identifier(invalid), "{} should be invalid", invalid);
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("status"), "Status");
        assert_eq!(title_case("jobStatus"), "JobStatus");
        assert_eq!(title_case("Active"), "Active");
        assert_eq!(title_case(""), "");
    }
}
