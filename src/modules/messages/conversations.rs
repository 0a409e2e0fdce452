//! Conversation list built from a user's received and sent messages.
//!
//! Messages are grouped by the other party. Each conversation shows the most
//! recent message exchanged with that peer and the number of messages from
//! the peer that the user has not read yet.

use std::collections::HashMap;

use super::model::{ConversationSummary, MessageWithParties, UserId};

/// Builds one summary per peer, most recent conversation first.
///
/// A message whose peer cannot be resolved (the embedded sender or recipient
/// is missing) is skipped. When two messages share a timestamp, the one seen
/// first wins: received messages are considered before sent ones.
pub fn build_conversations(
    me: UserId,
    received: &[MessageWithParties],
    sent: &[MessageWithParties],
) -> Vec<ConversationSummary> {
    let mut all: Vec<&MessageWithParties> = received.iter().chain(sent.iter()).collect();
    // Stable: equal timestamps keep their first-seen order.
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut summaries: Vec<ConversationSummary> = Vec::new();
    let mut index: HashMap<UserId, usize> = HashMap::new();

    for message in all {
        let peer = if message.sender_id == Some(me) {
            message.recipient.as_ref()
        } else {
            message.sender.as_ref()
        };
        let Some(peer) = peer else {
            continue;
        };

        if index.contains_key(&peer.id) {
            continue;
        }

        index.insert(peer.id, summaries.len());
        summaries.push(ConversationSummary {
            peer_id: peer.id,
            name: peer.display_name(),
            peer_role: peer.role,
            last_message: message.content.clone(),
            timestamp: message.created_at,
            unread_count: 0,
        });
    }

    for message in received {
        if message.is_read || message.recipient_id != Some(me) {
            continue;
        }
        if let Some(&slot) = message.sender_id.as_ref().and_then(|id| index.get(id)) {
            summaries[slot].unread_count += 1;
        }
    }

    summaries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use edugroup_models::{MessageId, UserRole, UserSummary};

    fn user(first_name: &str, role: UserRole) -> UserSummary {
        UserSummary {
            id: UserId::new(),
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            email: format!("{}@example.com", first_name.to_lowercase()),
            role,
        }
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn message(
        from: &UserSummary,
        to: &UserSummary,
        content: &str,
        minutes: i64,
        is_read: bool,
    ) -> MessageWithParties {
        MessageWithParties {
            id: MessageId::new(),
            sender_id: Some(from.id),
            recipient_id: Some(to.id),
            content: content.to_string(),
            is_read,
            created_at: at(minutes),
            sender: Some(from.clone()),
            recipient: Some(to.clone()),
        }
    }

    #[test]
    fn test_latest_message_per_peer() {
        let me = user("Mia", UserRole::Student);
        let ana = user("Ana", UserRole::Coordinator);

        let received = vec![message(&ana, &me, "first", 0, true)];
        let sent = vec![message(&me, &ana, "reply", 5, false)];

        let conversations = build_conversations(me.id, &received, &sent);
        assert_eq!(conversations.len(), 1);

        let conversation = &conversations[0];
        assert_eq!(conversation.peer_id, ana.id);
        assert_eq!(conversation.name, "Ana Tester");
        assert_eq!(conversation.peer_role, UserRole::Coordinator);
        assert_eq!(conversation.last_message, "reply");
        assert_eq!(conversation.timestamp, at(5));
        assert_eq!(conversation.unread_count, 0);
    }

    #[test]
    fn test_unread_counts_only_received_unread_from_peer() {
        let me = user("Mia", UserRole::Student);
        let ana = user("Ana", UserRole::Student);
        let ben = user("Ben", UserRole::Teacher);

        let received = vec![
            message(&ana, &me, "a1", 1, false),
            message(&ana, &me, "a2", 2, false),
            message(&ana, &me, "a3", 3, true),
            message(&ben, &me, "b1", 4, false),
        ];
        // Unread flags on my own sent messages never count.
        let sent = vec![message(&me, &ana, "to ana", 10, false)];

        let conversations = build_conversations(me.id, &received, &sent);
        let by_peer: HashMap<UserId, &ConversationSummary> =
            conversations.iter().map(|c| (c.peer_id, c)).collect();

        assert_eq!(by_peer[&ana.id].unread_count, 2);
        assert_eq!(by_peer[&ben.id].unread_count, 1);
    }

    #[test]
    fn test_sorted_most_recent_first() {
        let me = user("Mia", UserRole::Student);
        let ana = user("Ana", UserRole::Student);
        let ben = user("Ben", UserRole::Student);
        let cal = user("Cal", UserRole::Teacher);

        let received = vec![
            message(&ana, &me, "old", 1, true),
            message(&cal, &me, "newest", 30, true),
        ];
        let sent = vec![message(&me, &ben, "middle", 15, false)];

        let peers: Vec<UserId> = build_conversations(me.id, &received, &sent)
            .iter()
            .map(|c| c.peer_id)
            .collect();
        assert_eq!(peers, vec![cal.id, ben.id, ana.id]);
    }

    #[test]
    fn test_unresolvable_peer_is_skipped() {
        let me = user("Mia", UserRole::Student);
        let ana = user("Ana", UserRole::Student);

        let mut orphan = message(&ana, &me, "sender deleted", 50, false);
        orphan.sender = None;
        orphan.sender_id = None;

        let received = vec![orphan, message(&ana, &me, "hello", 1, false)];
        let conversations = build_conversations(me.id, &received, &[]);

        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].last_message, "hello");
        assert_eq!(conversations[0].timestamp, at(1));
    }

    #[test]
    fn test_timestamp_tie_keeps_first_seen() {
        let me = user("Mia", UserRole::Student);
        let ana = user("Ana", UserRole::Student);

        let received = vec![message(&ana, &me, "received", 7, true)];
        let sent = vec![message(&me, &ana, "sent", 7, false)];

        let conversations = build_conversations(me.id, &received, &sent);
        assert_eq!(conversations[0].last_message, "received");
    }

    #[test]
    fn test_empty_inputs() {
        assert!(build_conversations(UserId::new(), &[], &[]).is_empty());
    }

    #[test]
    fn test_summary_properties_hold_for_mixed_history() {
        let me = user("Mia", UserRole::Student);
        let peers: Vec<UserSummary> = (0..5)
            .map(|i| user(&format!("Peer{}", i), UserRole::Student))
            .collect();

        let mut received = Vec::new();
        let mut sent = Vec::new();
        for (i, peer) in peers.iter().enumerate() {
            for j in 0..(i as i64 + 1) {
                let minute = (i as i64 * 7 + j * 3) % 40;
                received.push(message(peer, &me, "in", minute, j % 2 == 0));
                if i % 2 == 1 {
                    sent.push(message(&me, peer, "out", minute + 1, false));
                }
            }
        }

        let conversations = build_conversations(me.id, &received, &sent);

        // One summary per distinct peer.
        assert_eq!(conversations.len(), peers.len());

        for summary in &conversations {
            let peer = Some(summary.peer_id);
            let exchanged = received
                .iter()
                .chain(sent.iter())
                .filter(|m| m.sender_id == peer || m.recipient_id == peer);
            for m in exchanged {
                assert!(summary.timestamp >= m.created_at);
            }

            let from_peer = received
                .iter()
                .filter(|m| m.sender_id == Some(summary.peer_id))
                .count() as u32;
            assert!(summary.unread_count <= from_peer);
        }

        for pair in conversations.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }
}
