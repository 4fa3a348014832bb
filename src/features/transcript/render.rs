//! Plain-text rendering of transcript lines for the terminal.

use super::Message;
use crate::core::wrap_text;
use crate::features::characters::SpeakerDirectory;

/// "Name (worldview): text", wrapped to `width` with a hanging indent.
/// Replies are marked with the character they answer.
pub fn format_message(directory: &SpeakerDirectory, message: &Message, width: usize) -> String {
    let mut header = directory.display_name(&message.speaker);
    if let Some(target) = &message.reply_to {
        header.push_str(&format!(" → {target}"));
    }

    let body = format!("{header}: {}", message.text.trim());
    let lines = wrap_text(&body, width.saturating_sub(2).max(20));
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str("  ");
        }
        out.push_str(line);
    }
    out
}

/// Render a run of messages separated by blank lines
pub fn render_transcript<'a>(
    directory: &SpeakerDirectory,
    messages: impl IntoIterator<Item = &'a Message>,
    width: usize,
) -> String {
    messages
        .into_iter()
        .map(|m| format_message(directory, m, width))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::characters::Character;
    use crate::features::transcript::MessageLog;

    fn directory() -> SpeakerDirectory {
        SpeakerDirectory::new(vec![Character::new(
            "Ada",
            "engineer",
            "technologist",
            "Build it",
        )])
        .unwrap()
    }

    #[test]
    fn test_format_character_line() {
        let mut log = MessageLog::new();
        let msg = log.append("Ada", "Trains.", None).clone();
        assert_eq!(
            format_message(&directory(), &msg, 80),
            "Ada (technologist): Trains."
        );
    }

    #[test]
    fn test_format_reply_line() {
        let mut log = MessageLog::new();
        let msg = log.append("User", "Why?", Some("Ada".to_string())).clone();
        assert_eq!(format_message(&directory(), &msg, 80), "User → Ada: Why?");
    }

    #[test]
    fn test_wrapped_lines_are_indented() {
        let mut log = MessageLog::new();
        let msg = log.append("Moderator", "word ".repeat(40), None).clone();
        let rendered = format_message(&directory(), &msg, 40);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines.len() > 1);
        assert!(lines[0].starts_with("Moderator: "));
        assert!(lines[1..].iter().all(|l| l.starts_with("  ")));
    }

    #[test]
    fn test_render_transcript_joins_messages() {
        let mut log = MessageLog::new();
        log.append("Moderator", "Begin.", None);
        log.append("Ada", "Trains.", None);
        let rendered = render_transcript(&directory(), &log, 80);
        assert_eq!(rendered, "Moderator: Begin.\n\nAda (technologist): Trains.");
    }
}
