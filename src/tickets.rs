//! Support ticket kinds and channel naming.

use crate::types::UserId;

/// Marker placed at the start of every ticket channel topic.
pub const TOPIC_MARKER: &str = "Ticket by";

/// The kind of support a ticket button requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketKind {
    Partnership,
    Purchase,
    General,
}

impl TicketKind {
    pub const ALL: [TicketKind; 3] = [
        TicketKind::Partnership,
        TicketKind::Purchase,
        TicketKind::General,
    ];

    /// Resolve a button's custom id.
    pub fn from_custom_id(custom_id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.custom_id() == custom_id)
    }

    pub fn custom_id(self) -> &'static str {
        match self {
            TicketKind::Partnership => "ticket_partnership",
            TicketKind::Purchase => "ticket_purchase",
            TicketKind::General => "ticket_general",
        }
    }

    /// Short slug used in channel names.
    pub fn slug(self) -> &'static str {
        match self {
            TicketKind::Partnership => "partnership",
            TicketKind::Purchase => "purchase",
            TicketKind::General => "general",
        }
    }

    /// Button label on the ticket panel.
    pub fn label(self) -> &'static str {
        match self {
            TicketKind::Partnership => "Partnership/Business Support",
            TicketKind::Purchase => "Purchase",
            TicketKind::General => "General Support",
        }
    }

    /// Heading for the ticket welcome message.
    pub fn title(self) -> &'static str {
        match self {
            TicketKind::Partnership => "Partnership",
            TicketKind::Purchase => "Purchase",
            TicketKind::General => "General",
        }
    }
}

/// Name of the channel opened for `username`'s ticket.
pub fn channel_name(kind: TicketKind, username: &str) -> String {
    format!("ticket-{}-{}", kind.slug(), username)
        .to_lowercase()
        .replace(' ', "-")
}

/// Topic that marks a channel as `owner`'s ticket.
pub fn channel_topic(owner: UserId) -> String {
    format!("{TOPIC_MARKER} {owner}")
}

/// Whether a channel topic marks a ticket channel.
pub fn is_ticket_topic(topic: Option<&str>) -> bool {
    topic.is_some_and(|t| t.contains(TOPIC_MARKER))
}

/// Whether a channel topic marks a ticket owned by `owner`.
pub fn is_owned_by(topic: Option<&str>, owner: UserId) -> bool {
    let owner = owner.to_string();
    topic.is_some_and(|t| t.contains(TOPIC_MARKER) && t.split_whitespace().any(|word| word == owner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_ids_round_trip() {
        for kind in TicketKind::ALL {
            assert_eq!(TicketKind::from_custom_id(kind.custom_id()), Some(kind));
        }
        assert_eq!(TicketKind::from_custom_id("something_else"), None);
    }

    #[test]
    fn test_channel_name_is_lowercase_and_dashed() {
        assert_eq!(
            channel_name(TicketKind::Purchase, "Big Spender"),
            "ticket-purchase-big-spender"
        );
    }

    #[test]
    fn test_topic_ownership() {
        let topic = channel_topic(UserId(42));
        assert_eq!(topic, "Ticket by 42");
        assert!(is_ticket_topic(Some(&topic)));
        assert!(is_owned_by(Some(&topic), UserId(42)));
        assert!(!is_owned_by(Some(&topic), UserId(7)));
        assert!(!is_owned_by(Some(&topic), UserId(4)));
        assert!(!is_owned_by(Some("general chat about 42"), UserId(42)));
        assert!(!is_ticket_topic(None));
    }
}
