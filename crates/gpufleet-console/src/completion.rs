//! Shell-style tab completion: token extraction, mode classification, and
//! candidate resolution. Pure logic only; the candidate lookup itself goes
//! through the remote shell.

use gpufleet_types::CompletionMode;

/// Token immediately left of the caret
///
/// `start..end` are byte offsets into the original input; `end` is the
/// caret clamped to a character boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// What to do with a candidate set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    /// Replace the token in place, caret to the end of the new text
    Replace(String),
    /// True ambiguity: show the full candidate list instead
    ListAll,
}

/// Extract the maximal run of non-whitespace characters ending at the caret
///
/// Returns `None` when the caret sits on whitespace or at the start of the
/// line, i.e. there is nothing to complete.
pub fn token_before_caret(input: &str, caret: usize) -> Option<TokenSpan> {
    let mut end = caret.min(input.len());
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    let left = &input[..end];
    let start = left
        .rfind(char::is_whitespace)
        .map(|idx| {
            let sep = left[idx..].chars().next().map(char::len_utf8).unwrap_or(1);
            idx + sep
        })
        .unwrap_or(0);
    if start >= end {
        return None;
    }
    Some(TokenSpan {
        start,
        end,
        text: left[start..].to_string(),
    })
}

/// Pick the completion mode for a token
///
/// The first token on the line completes against executables unless it
/// already carries a path separator; everything else completes against
/// filesystem entries relative to the session cwd.
pub fn classify(input: &str, span: &TokenSpan) -> CompletionMode {
    let first_token = input[..span.start].trim().is_empty();
    if first_token && !span.text.contains('/') {
        CompletionMode::Command
    } else {
        CompletionMode::File
    }
}

/// Longest leading substring shared by every candidate
///
/// Empty when the set is empty or shares no leading character.
pub fn longest_common_prefix(candidates: &[String]) -> String {
    let mut prefix = match candidates.first() {
        Some(first) => first.clone(),
        None => return String::new(),
    };
    while !prefix.is_empty() && !candidates.iter().all(|c| c.starts_with(&prefix)) {
        prefix.pop();
    }
    prefix
}

/// Apply the standard shell resolution policy to a candidate set
///
/// Zero candidates is a no-op; one candidate replaces the token outright;
/// several candidates replace with the common prefix when that gains at
/// least one character, and otherwise fall back to listing.
pub fn resolve(token: &str, candidates: &[String]) -> Option<CandidateOutcome> {
    match candidates {
        [] => None,
        [single] => Some(CandidateOutcome::Replace(single.clone())),
        _ => {
            let common = longest_common_prefix(candidates);
            if common.chars().count() > token.chars().count() {
                Some(CandidateOutcome::Replace(common))
            } else {
                Some(CandidateOutcome::ListAll)
            }
        }
    }
}
