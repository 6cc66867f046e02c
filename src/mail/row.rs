use super::types::{Email, Mailbox};

pub const BODY_PREVIEW_LENGTH: usize = 32;

/// Timestamps look like "Jan 1 2020, 12:00 AM"; the first six characters
/// are shown as the date (keeps a trailing space for single-digit days).
pub const DATE_PREFIX_LENGTH: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStyle {
    Read,
    Unread,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveControl {
    Archive,
    Unarchive,
}

impl ArchiveControl {
    pub fn label(&self) -> &'static str {
        match self {
            ArchiveControl::Archive => "Archive",
            ArchiveControl::Unarchive => "Unarchive",
        }
    }
}

/// One line of a mailbox listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRow {
    pub id: u64,
    pub sender: String,
    pub subject: String,
    pub preview: String,
    pub date: String,
    pub style: ReadStyle,
    pub archive_control: Option<ArchiveControl>,
}

impl EmailRow {
    pub fn new(email: &Email, mailbox: Mailbox, preview_length: usize) -> Self {
        let archive_control = mailbox.allows_archiving().then(|| {
            if email.archived {
                ArchiveControl::Unarchive
            } else {
                ArchiveControl::Archive
            }
        });

        Self {
            id: email.id,
            sender: email.sender.clone(),
            subject: email.subject.clone(),
            preview: body_preview(&email.body, preview_length),
            date: date_prefix(&email.timestamp),
            style: if email.read {
                ReadStyle::Read
            } else {
                ReadStyle::Unread
            },
            archive_control,
        }
    }
}

/// First `max` characters of the body, with "..." only if something was cut
pub fn body_preview(body: &str, max: usize) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

pub fn date_prefix(timestamp: &str) -> String {
    timestamp.chars().take(DATE_PREFIX_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn email(body: &str) -> Email {
        Email {
            id: 7,
            sender: "alice@example.com".to_string(),
            recipients: "bob@example.com".to_string(),
            subject: "Lunch".to_string(),
            body: body.to_string(),
            timestamp: "Jan 1 2020, 12:00 AM".to_string(),
            ..Email::default()
        }
    }

    #[test]
    fn test_preview_lengths() {
        for len in [0, 1, 31, 32, 33, 100] {
            let body = "x".repeat(len);
            let preview = body_preview(&body, BODY_PREVIEW_LENGTH);
            let shown = len.min(BODY_PREVIEW_LENGTH);
            assert!(preview.starts_with(&"x".repeat(shown)));
            assert_eq!(preview.ends_with("..."), len > BODY_PREVIEW_LENGTH, "len {}", len);
            assert_eq!(preview.chars().filter(|&c| c == 'x').count(), shown);
        }
    }

    #[test]
    fn test_preview_counts_characters() {
        let body = "é".repeat(40);
        let preview = body_preview(&body, BODY_PREVIEW_LENGTH);
        assert_eq!(preview, format!("{}...", "é".repeat(32)));
    }

    #[test]
    fn test_date_prefix() {
        assert_eq!(date_prefix("Jan 1 2020, 12:00 AM"), "Jan 1 ");
        assert_eq!(date_prefix("Dec 25 2021, 9:15 PM"), "Dec 25");
        assert_eq!(date_prefix("now"), "now");
    }

    #[test]
    fn test_read_style() {
        let mut e = email("hi");
        assert_eq!(EmailRow::new(&e, Mailbox::Inbox, 32).style, ReadStyle::Unread);
        e.read = true;
        assert_eq!(EmailRow::new(&e, Mailbox::Inbox, 32).style, ReadStyle::Read);
    }

    #[test]
    fn test_archive_control_per_mailbox() {
        let mut e = email("hi");
        assert_eq!(
            EmailRow::new(&e, Mailbox::Inbox, 32).archive_control,
            Some(ArchiveControl::Archive)
        );
        assert_eq!(EmailRow::new(&e, Mailbox::Sent, 32).archive_control, None);

        e.archived = true;
        let row = EmailRow::new(&e, Mailbox::Archive, 32);
        assert_eq!(row.archive_control, Some(ArchiveControl::Unarchive));
        assert_eq!(row.archive_control.map(|c| c.label()), Some("Unarchive"));
    }

    #[test]
    fn test_row_fields() {
        let row = EmailRow::new(&email("See you at noon"), Mailbox::Inbox, 32);
        assert_eq!(row.id, 7);
        assert_eq!(row.sender, "alice@example.com");
        assert_eq!(row.subject, "Lunch");
        assert_eq!(row.preview, "See you at noon");
        assert_eq!(row.date, "Jan 1 ");
    }
}
