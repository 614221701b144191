use std::borrow::Cow;

use console::style;

/// Lines shown before the scrolling preview starts asking per line.
pub const INITIAL_PREVIEW_LINES: usize = 10;

/// What the operator said about the line just shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineVerdict {
    Accept,
    Reject,
    Continue,
}

impl LineVerdict {
    /// `y` accepts, `n` rejects, any other key keeps scrolling.
    pub fn from_key(key: char) -> Self {
        match key.to_ascii_lowercase() {
            'y' => LineVerdict::Accept,
            'n' => LineVerdict::Reject,
            _ => LineVerdict::Continue,
        }
    }
}

/// One line handed to the scroll callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStep<'a> {
    /// Inside the initial window: print it, no answer expected.
    Show(&'a str),
    /// Past the window: print it and ask for a verdict.
    Ask(&'a str),
}

/// Walk `lines`, handing the first `window` of them to `on_step` as
/// [`PreviewStep::Show`] and the rest as [`PreviewStep::Ask`].
///
/// Stops at the first `Accept`/`Reject` returned for an `Ask` step and
/// returns `Some(accepted)`; returns `None` when the lines run out first.
/// Verdicts for `Show` steps are ignored.
pub fn scroll<'a, I, F, E>(lines: I, window: usize, mut on_step: F) -> Result<Option<bool>, E>
where
    I: IntoIterator<Item = &'a str>,
    F: FnMut(PreviewStep<'a>) -> Result<LineVerdict, E>,
{
    for (idx, line) in lines.into_iter().enumerate() {
        if idx < window {
            on_step(PreviewStep::Show(line))?;
            continue;
        }
        match on_step(PreviewStep::Ask(line))? {
            LineVerdict::Accept => return Ok(Some(true)),
            LineVerdict::Reject => return Ok(Some(false)),
            LineVerdict::Continue => {}
        }
    }
    Ok(None)
}

/// Emphasize `line` if it contains `query` verbatim.
pub fn emphasize<'a>(line: &'a str, query: &str) -> Cow<'a, str> {
    if !query.is_empty() && line.contains(query) {
        Cow::Owned(style(line).black().on_yellow().bold().to_string())
    } else {
        Cow::Borrowed(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn short_file_is_shown_without_questions() {
        let lines = numbered(4);
        let mut steps = Vec::new();

        let decision = scroll(lines.iter().map(String::as_str), 10, |step| {
            steps.push(step);
            Ok::<_, ()>(LineVerdict::Accept)
        })
        .unwrap();

        assert_eq!(decision, None);
        assert_eq!(steps.len(), 4);
        assert!(steps.iter().all(|s| matches!(s, PreviewStep::Show(_))));
    }

    #[test]
    fn stops_at_first_decision_after_window() {
        let lines = numbered(20);
        let mut keys = vec!['x', ' ', 'y'].into_iter();
        let mut asked = Vec::new();

        let decision = scroll(lines.iter().map(String::as_str), 10, |step| match step {
            PreviewStep::Show(_) => Ok::<_, ()>(LineVerdict::Continue),
            PreviewStep::Ask(line) => {
                asked.push(line.to_string());
                Ok(LineVerdict::from_key(keys.next().unwrap()))
            }
        })
        .unwrap();

        assert_eq!(decision, Some(true));
        assert_eq!(asked, vec!["line 11", "line 12", "line 13"]);
    }

    #[test]
    fn reject_short_circuits() {
        let lines = numbered(12);
        let decision = scroll(lines.iter().map(String::as_str), 10, |step| match step {
            PreviewStep::Show(_) => Ok::<_, ()>(LineVerdict::Continue),
            PreviewStep::Ask(_) => Ok(LineVerdict::from_key('N')),
        })
        .unwrap();
        assert_eq!(decision, Some(false));
    }

    #[test]
    fn exhausted_file_falls_through() {
        let lines = numbered(12);
        let decision = scroll(lines.iter().map(String::as_str), 10, |_| {
            Ok::<_, ()>(LineVerdict::Continue)
        })
        .unwrap();
        assert_eq!(decision, None);
    }

    #[test]
    fn errors_propagate() {
        let lines = numbered(3);
        let outcome = scroll(lines.iter().map(String::as_str), 1, |_| Err("closed"));
        assert_eq!(outcome, Err("closed"));
    }

    #[test]
    fn emphasis_is_case_sensitive() {
        assert!(matches!(emphasize("import foo", "foo"), Cow::Owned(_)));
        assert!(matches!(emphasize("import FOO", "foo"), Cow::Borrowed(_)));
        assert!(matches!(emphasize("anything", ""), Cow::Borrowed(_)));
    }

    #[test]
    fn key_mapping() {
        assert_eq!(LineVerdict::from_key('Y'), LineVerdict::Accept);
        assert_eq!(LineVerdict::from_key('n'), LineVerdict::Reject);
        assert_eq!(LineVerdict::from_key('q'), LineVerdict::Continue);
    }
}
