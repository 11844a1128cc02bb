/// Expand `$VAR` and `${VAR}` references in a config value.
///
/// `${VAR}` references to unset variables expand to the empty string so a
/// missing secret shows up as a missing field. Bare `$VAR` references to unset
/// variables are left untouched.
pub fn expand_env_vars(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;

    // Single pass, so expanded values are never expanded again
    while let Some(pos) = rest.find('$') {
        result.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            let Some(end) = braced.find('}') else {
                // No closing }, keep the remainder as written
                result.push_str(&rest[pos..]);
                rest = "";
                break;
            };
            result.push_str(&lookup(&braced[..end]).unwrap_or_default());
            rest = &braced[end + 1..];
            continue;
        }

        // The name runs to the first non-alphanumeric, non-underscore character
        let name_len = after
            .bytes()
            .position(|c| !(c.is_ascii_alphanumeric() || c == b'_'))
            .unwrap_or(after.len());
        let name = &after[..name_len];

        match lookup(name) {
            Some(var_value) => result.push_str(&var_value),
            None => {
                result.push('$');
                result.push_str(name);
            }
        }
        rest = &after[name_len..];
    }

    result.push_str(rest);
    result
}

fn lookup(name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    std::env::var(name).ok()
}

/// Read a non-empty environment variable
pub fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
