/// Indices of frame titles containing `term` (case-sensitive substring).
///
/// Search never removes bars from the layout; callers use the indices to
/// highlight matches and de-emphasize the rest. An empty term means "clear
/// the search" and matches nothing.
pub fn matching_frames(titles: &[String], term: &str) -> Vec<usize> {
    if term.is_empty() {
        return Vec::new();
    }
    titles
        .iter()
        .enumerate()
        .filter(|(_, title)| title.contains(term))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles() -> Vec<String> {
        vec![
            "art::Monitor::Lock | libart.so (4 events: 0.28%)".into(),
            "malloc | libc.so (10 events: 0.70%)".into(),
            "art::Thread::Park | libart.so (2 events: 0.14%)".into(),
        ]
    }

    #[test]
    fn substring_match_over_full_title() {
        assert_eq!(matching_frames(&titles(), "art::"), vec![0, 2]);
        assert_eq!(matching_frames(&titles(), "libc.so"), vec![1]);
    }

    #[test]
    fn match_is_case_sensitive() {
        assert!(matching_frames(&titles(), "MALLOC").is_empty());
    }

    #[test]
    fn empty_term_clears_search() {
        assert!(matching_frames(&titles(), "").is_empty());
    }

    #[test]
    fn no_match_is_empty_not_error() {
        assert!(matching_frames(&titles(), "kernel").is_empty());
    }
}
