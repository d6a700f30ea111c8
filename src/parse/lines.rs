/// Split into trimmed lines, dropping blanks and lines led by a meta-word
///
/// Meta-words are labels a model tends to echo from the prompt ("Agenda:",
/// "Examples -"). A line is dropped when it starts with a meta-word, or its
/// plural, followed by a non-alphanumeric character or the end of the line.
/// Matching ignores case, so "Formatting guide adopted" survives the meta-word
/// "Format" while "format: bullets" does not.
pub fn parse_filtered_lines<S: AsRef<str>>(text: &str, meta_words: &[S]) -> Vec<String> {
    let meta_words: Vec<String> = meta_words
        .iter()
        .map(|w| w.as_ref().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !is_meta_line(line, &meta_words))
        .map(str::to_string)
        .collect()
}

fn is_meta_line(line: &str, meta_words: &[String]) -> bool {
    let lower = line.to_lowercase();
    meta_words.iter().any(|word| {
        lower.strip_prefix(word.as_str()).is_some_and(|rest| {
            let rest = rest.strip_prefix('s').unwrap_or(rest);
            !rest.chars().next().is_some_and(char::is_alphanumeric)
        })
    })
}
