use std::path::Path;

/// Derive a document title: first `# ` heading, then a YAML `name:` field,
/// then the file name in title case.
pub fn extract_title(content: &str, path: &Path) -> String {
    heading_title(content)
        .or_else(|| yaml_name(content))
        .unwrap_or_else(|| title_from_file_name(path))
}

fn heading_title(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let rest = line.strip_prefix('#')?;
        // "## Section" is a level-2 heading, not a title
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        non_empty(rest.trim())
    })
}

fn yaml_name(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let rest = line.strip_prefix("name:")?;
        non_empty(rest.trim().trim_matches(|c: char| c == '"' || c == '\'').trim())
    })
}

fn title_from_file_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    stem.split(|c: char| c == '-' || c == '_' || c == ' ')
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
