//! Invite-link detection.

/// Substrings that mark a Discord server invite.
pub const INVITE_PATTERNS: [&str; 3] = [
    "discord.gg/",
    "discord.com/invite/",
    "discordapp.com/invite/",
];

/// Whether `content` contains a server invite link, ignoring case.
pub fn contains_invite(content: &str) -> bool {
    let lowered = content.to_lowercase();
    INVITE_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_each_pattern() {
        assert!(contains_invite("join us at discord.gg/abc"));
        assert!(contains_invite("https://discord.com/invite/xyz"));
        assert!(contains_invite("https://discordapp.com/invite/xyz"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(contains_invite("HTTPS://DISCORD.GG/ABC"));
    }

    #[test]
    fn test_plain_text_and_other_links_pass() {
        assert!(!contains_invite("hello there"));
        assert!(!contains_invite("see discord.com/channels/1/2"));
        assert!(!contains_invite("discord.gg"));
    }
}
