use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct Email {
    pub id: u64,
    #[serde(default)]
    pub sender: String,
    /// Comma-separated, exactly as the server reports it
    #[serde(default, deserialize_with = "recipient_list")]
    pub recipients: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    /// Server-formatted, e.g. "Jan 1 2020, 12:00 AM"
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub archived: bool,
}

/// Servers disagree on whether recipients is a string or an array
fn recipient_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Recipients {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match Recipients::deserialize(deserializer)? {
        Recipients::Joined(s) => s,
        Recipients::List(list) => list.join(", "),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mailbox {
    #[default]
    Inbox,
    Sent,
    Archive,
}

impl Mailbox {
    /// Unknown names load the inbox
    pub fn from_name(name: &str) -> Self {
        match name {
            "sent" => Mailbox::Sent,
            "archive" => Mailbox::Archive,
            _ => Mailbox::Inbox,
        }
    }

    /// Path segment used by the server
    pub fn as_str(&self) -> &'static str {
        match self {
            Mailbox::Inbox => "inbox",
            Mailbox::Sent => "sent",
            Mailbox::Archive => "archive",
        }
    }

    /// Heading shown above the list
    pub fn label(&self) -> &'static str {
        match self {
            Mailbox::Inbox => "Inbox",
            Mailbox::Sent => "Sent",
            Mailbox::Archive => "Archive",
        }
    }

    /// Sent mail cannot be archived from its listing
    pub fn allows_archiving(&self) -> bool {
        matches!(self, Mailbox::Inbox | Mailbox::Archive)
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial update body for `PUT /emails/{id}`; always exactly one key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagUpdate {
    Read(bool),
    Archived(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct NewEmail {
    pub recipients: String,
    pub subject: String,
    pub body: String,
}

/// Body of a successful `POST /emails`
#[derive(Debug, Deserialize)]
pub(crate) struct SendReceipt {
    #[serde(default)]
    pub message: String,
}

/// Any endpoint may answer with `{"error": "..."}`
#[derive(Debug, Deserialize)]
pub(crate) struct ServerError {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unknown_mailbox_is_inbox() {
        assert_eq!(Mailbox::from_name("spam"), Mailbox::Inbox);
        assert_eq!(Mailbox::from_name(""), Mailbox::Inbox);
        assert_eq!(Mailbox::from_name("Sent"), Mailbox::Inbox);
        assert_eq!(Mailbox::from_name("sent"), Mailbox::Sent);
        assert_eq!(Mailbox::from_name("archive"), Mailbox::Archive);
    }

    #[test]
    fn test_mailbox_labels() {
        assert_eq!(Mailbox::Inbox.label(), "Inbox");
        assert_eq!(Mailbox::Archive.label(), "Archive");
        assert!(!Mailbox::Sent.allows_archiving());
    }

    #[test]
    fn test_flag_update_has_single_key() {
        let read = serde_json::to_string(&FlagUpdate::Read(true)).unwrap();
        assert_eq!(read, r#"{"read":true}"#);
        let archived = serde_json::to_string(&FlagUpdate::Archived(false)).unwrap();
        assert_eq!(archived, r#"{"archived":false}"#);
    }

    #[test]
    fn test_recipients_string_or_list() {
        let joined: Email =
            serde_json::from_str(r#"{"id": 1, "recipients": "a@x.com, b@x.com"}"#).unwrap();
        let list: Email =
            serde_json::from_str(r#"{"id": 1, "recipients": ["a@x.com", "b@x.com"]}"#).unwrap();
        assert_eq!(joined.recipients, "a@x.com, b@x.com");
        assert_eq!(list.recipients, joined.recipients);
        assert!(!list.read);
        assert!(!list.archived);
    }
}
