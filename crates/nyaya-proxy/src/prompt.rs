//! Domain instruction preamble for legal questions.

pub const PREAMBLE: &str = "You are an AI assistant specializing in Indian law. \
Provide helpful, accurate information about Indian legal matters in a clear, professional manner. \
Always cite relevant sections of laws or precedents when applicable. \
Remember that you're providing general information, not legal advice.

When appropriate, use **bold** for important terms, *italics* for emphasis, \
and cite relevant laws, sections, or cases. \
Format your response clearly with headings and lists where appropriate.";

/// Caller prompt with the preamble in front, separated by a blank line.
pub fn enhance(prompt: &str) -> String {
    format!("{}\n\n{}", PREAMBLE, prompt)
}

/// First `max_chars` characters of `text`, for log lines.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enhance_wraps_prompt() {
        let enhanced = enhance("What is Section 420 IPC?");
        assert!(enhanced.starts_with(PREAMBLE));
        assert!(enhanced.ends_with("\n\nWhat is Section 420 IPC?"));
    }

    #[test]
    fn test_preamble_frames_domain() {
        assert!(PREAMBLE.contains("Indian law"));
        assert!(PREAMBLE.contains("not legal advice"));
        assert!(PREAMBLE.contains("**bold**"));
    }

    #[test]
    fn test_preview_counts_chars() {
        assert_eq!(preview("short", 50), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("धाराधारा", 2), "धा...");
    }
}
