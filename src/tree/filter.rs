use std::borrow::Cow;

/// One span of a highlighted name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matched: false,
        }
    }

    fn hit(text: &str) -> Self {
        Self {
            text: text.to_string(),
            matched: true,
        }
    }
}

/// Whether a query filters anything. Blank queries do not.
pub fn is_active(query: &str) -> bool {
    !query.trim().is_empty()
}

/// Case-insensitive substring test against the whole path.
pub fn matches(path: &str, query: &str) -> bool {
    let needle = query.trim();
    if needle.is_empty() {
        return true;
    }
    path.to_lowercase().contains(&needle.to_lowercase())
}

/// Keep the paths containing `query`.
///
/// An inactive query hands back the input slice itself.
pub fn filter<'a>(paths: &'a [String], query: &str) -> Cow<'a, [String]> {
    if !is_active(query) {
        return Cow::Borrowed(paths);
    }
    let needle = query.trim().to_lowercase();
    Cow::Owned(
        paths
            .iter()
            .filter(|path| path.to_lowercase().contains(&needle))
            .cloned()
            .collect(),
    )
}

/// Split `name` into matched and unmatched spans for `query`.
///
/// Matches are located left to right without overlap. Concatenating the
/// segment texts always gives back `name`.
pub fn highlight(name: &str, query: &str) -> Vec<Segment> {
    if name.is_empty() {
        return Vec::new();
    }
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return vec![Segment::plain(name)];
    }

    let (lower, origin) = lowercase_with_offsets(name);
    let original_offset = |lower_idx: usize| {
        if lower_idx >= lower.len() {
            name.len()
        } else {
            origin[lower_idx]
        }
    };

    let mut segments = Vec::new();
    let mut cursor = 0;
    let mut search_from = 0;
    while let Some(found) = lower[search_from..].find(&needle) {
        let lower_start = search_from + found;
        let lower_end = lower_start + needle.len();
        let start = original_offset(lower_start).max(cursor);
        let mut end = original_offset(lower_end).max(start);
        // A match that begins and ends inside one source character (`i` in
        // `İ`) still highlights that whole character.
        if end == start && origin.get(lower_start) == Some(&start) {
            end = name[start..]
                .chars()
                .next()
                .map_or(start, |ch| start + ch.len_utf8());
        }

        if start > cursor {
            segments.push(Segment::plain(&name[cursor..start]));
        }
        if end > start {
            segments.push(Segment::hit(&name[start..end]));
        }
        cursor = end;
        search_from = lower_end;
    }
    if cursor < name.len() {
        segments.push(Segment::plain(&name[cursor..]));
    }
    segments
}

/// Lowercase `text`, recording for every byte of the result the byte offset of
/// the source character it came from. Some characters change byte length when
/// lowercased, so offsets cannot be shared directly.
fn lowercase_with_offsets(text: &str) -> (String, Vec<usize>) {
    let mut lower = String::with_capacity(text.len());
    let mut origin = Vec::with_capacity(text.len());
    for (offset, ch) in text.char_indices() {
        for lc in ch.to_lowercase() {
            lower.push(lc);
            origin.extend(std::iter::repeat(offset).take(lc.len_utf8()));
        }
    }
    (lower, origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn empty_query_returns_input_slice() {
        let paths = owned(&["src/app.ts", "README.md"]);
        for query in ["", "   ", "\t"] {
            let result = filter(&paths, query);
            assert!(matches!(result, Cow::Borrowed(_)));
            assert!(std::ptr::eq(result.as_ref(), paths.as_slice()));
        }
    }

    #[test]
    fn filter_matches_substring() {
        let paths = owned(&["src/app.ts", "README.md"]);
        assert_eq!(filter(&paths, "app").as_ref(), ["src/app.ts".to_string()]);
    }

    #[test]
    fn filter_is_case_insensitive_on_full_path() {
        let paths = owned(&["Src/Main.rs", "docs/readme.md", "lib.rs"]);
        let result = filter(&paths, "SRC/m");
        assert_eq!(result.as_ref(), ["Src/Main.rs".to_string()]);
        let by_dir = filter(&paths, "docs");
        assert_eq!(by_dir.as_ref(), ["docs/readme.md".to_string()]);
    }

    #[test]
    fn filter_ignores_surrounding_whitespace() {
        let paths = owned(&["a/b.rs", "c.rs"]);
        assert_eq!(filter(&paths, "  b.rs ").as_ref(), ["a/b.rs".to_string()]);
    }

    #[test]
    fn inner_whitespace_is_part_of_the_query() {
        let paths = owned(&["docs/a b.md", "a/b.md", "foo.rs"]);
        assert_eq!(filter(&paths, "a b").as_ref(), ["docs/a b.md".to_string()]);
        assert_eq!(filter(&paths, " a b ").as_ref(), ["docs/a b.md".to_string()]);
        assert_eq!(filter(&paths, "foo ").as_ref(), ["foo.rs".to_string()]);
        assert!(!matches("a/b.md", "a b"));
        assert_eq!(
            highlight("a b.md", "a b"),
            vec![Segment::hit("a b"), Segment::plain(".md")]
        );
    }

    #[test]
    fn filter_without_matches_is_empty() {
        let paths = owned(&["a", "b"]);
        assert!(filter(&paths, "zzz").is_empty());
    }

    #[test]
    fn highlight_empty_query_is_single_plain_segment() {
        assert_eq!(highlight("main.rs", ""), vec![Segment::plain("main.rs")]);
    }

    #[test]
    fn highlight_marks_every_occurrence() {
        let segments = highlight("abcabc", "b");
        assert_eq!(
            segments,
            vec![
                Segment::plain("a"),
                Segment::hit("b"),
                Segment::plain("ca"),
                Segment::hit("b"),
                Segment::plain("c"),
            ]
        );
    }

    #[test]
    fn highlight_keeps_adjacent_matches_separate() {
        let segments = highlight("aaaa", "aa");
        assert_eq!(segments, vec![Segment::hit("aa"), Segment::hit("aa")]);
    }

    #[test]
    fn highlight_preserves_original_case() {
        let segments = highlight("ReadMe.MD", "readme");
        assert_eq!(segments, vec![Segment::hit("ReadMe"), Segment::plain(".MD")]);
    }

    #[test]
    fn highlight_never_drops_or_duplicates_text() {
        for (name, query) in [
            ("İstanbul.txt", "i"),
            ("ẞtraße", "ss"),
            ("KELVIN-K", "k"),
            ("no-match", "zz"),
            ("x", "x"),
        ] {
            assert_eq!(joined(&highlight(name, query)), name, "{name} / {query}");
        }
    }

    #[test]
    fn match_inside_one_character_highlights_that_character() {
        assert_eq!(
            highlight("İx", "i"),
            vec![Segment::hit("İ"), Segment::plain("x")]
        );
    }

    #[test]
    fn highlight_of_empty_name_is_empty() {
        assert!(highlight("", "a").is_empty());
    }
}
