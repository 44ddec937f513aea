//! Status document rendering
//!
//! Turns probed server groups into the embed that is posted to the channel.
//! Rendering is pure: apart from the human-readable footer (which compares the
//! timestamp against the current local date) the output depends only on the
//! inputs.

use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{GroupStyle, ProbedGroup, ServerSpec, StatusSnapshot};
use crate::utils::truncate_text;

/// Maximum length of an embed field value accepted by Discord
pub const MAX_FIELD_VALUE_CHARS: usize = 1024;

/// Maximum number of fields in one embed accepted by Discord
pub const MAX_FIELDS: usize = 25;

/// Default embed title
pub const DEFAULT_TITLE: &str = "Minecraft Server Status";

/// Default embed color (`#8b00ff`)
pub const DEFAULT_COLOR: u32 = 0x8b00ff;

const ONLINE_MARKER: &str = "🟢 Online";
const OFFLINE_MARKER: &str = "🔴 Offline";
const EMPTY_GROUP: &str = "No servers configured";

/// One named field of a rendered document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Platform-neutral status document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub title: String,
    pub color: u32,
    pub fields: Vec<DocumentField>,
    pub footer: String,
    pub timestamp: DateTime<Utc>,
}

/// Renders probed groups into a [`RenderedDocument`]
#[derive(Debug, Clone)]
pub struct Renderer {
    title: String,
    color: u32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_COLOR)
    }
}

impl Renderer {
    /// Create a renderer with a custom title and color
    pub fn new(title: impl Into<String>, color: u32) -> Self {
        Self {
            title: title.into(),
            color,
        }
    }

    /// Render one document
    ///
    /// Produces exactly one field per group, in the given order. Groups beyond
    /// the platform's field limit are dropped with a warning.
    pub fn render(&self, groups: &[ProbedGroup], now: DateTime<Local>) -> RenderedDocument {
        if groups.len() > MAX_FIELDS {
            tracing::warn!(
                groups = groups.len(),
                max = MAX_FIELDS,
                "Too many server groups for one embed; extra groups are not shown"
            );
        }

        let fields = groups
            .iter()
            .take(MAX_FIELDS)
            .map(|group| DocumentField {
                name: group.name.clone(),
                value: truncate_text(&render_group(group), MAX_FIELD_VALUE_CHARS),
                inline: false,
            })
            .collect();

        RenderedDocument {
            title: self.title.clone(),
            color: self.color,
            fields,
            footer: format!("Last updated at: {}", format_timestamp(now)),
            timestamp: now.with_timezone(&Utc),
        }
    }
}

fn render_group(group: &ProbedGroup) -> String {
    if group.entries.is_empty() {
        return EMPTY_GROUP.to_string();
    }

    let lines: Vec<String> = group
        .entries
        .iter()
        .map(|(spec, snapshot)| match group.style {
            GroupStyle::Detailed => detailed_entry(spec, snapshot),
            GroupStyle::Compact => compact_entry(spec, snapshot),
        })
        .collect();

    lines.join("\n\n")
}

fn detailed_entry(spec: &ServerSpec, snapshot: &StatusSnapshot) -> String {
    if snapshot.reachable {
        format!(
            "{} (`{}`): {ONLINE_MARKER}\nPlayers: {}\nVersion: {}",
            spec.name,
            spec.endpoint(),
            snapshot.player_summary,
            snapshot.version_label
        )
    } else {
        format!("{} (`{}`): {OFFLINE_MARKER}", spec.name, spec.endpoint())
    }
}

fn compact_entry(spec: &ServerSpec, snapshot: &StatusSnapshot) -> String {
    let marker = if snapshot.reachable {
        ONLINE_MARKER
    } else {
        OFFLINE_MARKER
    };
    format!("**{}:**\n{marker}", spec.name)
}

/// Format a timestamp relative to the current local date
pub fn format_timestamp(at: DateTime<Local>) -> String {
    format_timestamp_relative(at, Local::now())
}

/// Format `at` as `Today at H:MM` when it falls on the same local calendar
/// date as `reference`, otherwise as `M/D/YYYY, H:MM`
pub fn format_timestamp_relative(at: DateTime<Local>, reference: DateTime<Local>) -> String {
    let time = format!("{}:{:02}", at.hour(), at.minute());

    if at.date_naive() == reference.date_naive() {
        format!("Today at {time}")
    } else {
        format!("{}/{}/{}, {time}", at.month(), at.day(), at.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProtocolKind;
    use chrono::{Duration, TimeZone};

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .earliest()
            .unwrap()
    }

    fn group(name: &str, style: GroupStyle, entries: Vec<(&str, StatusSnapshot)>) -> ProbedGroup {
        ProbedGroup {
            name: name.to_string(),
            style,
            entries: entries
                .into_iter()
                .map(|(n, s)| {
                    (
                        ServerSpec::new(n, format!("{}.example.net", n.to_lowercase()), 25565, ProtocolKind::Java),
                        s,
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_today_format() {
        let at = local(2024, 3, 9, 7, 5);
        assert_eq!(format_timestamp_relative(at, at), "Today at 7:05");

        let later_same_day = local(2024, 3, 9, 23, 59);
        assert_eq!(format_timestamp_relative(at, later_same_day), "Today at 7:05");
    }

    #[test]
    fn test_previous_day_format() {
        let reference = local(2024, 3, 10, 0, 30);
        let at = local(2024, 3, 9, 14, 0);
        assert_eq!(format_timestamp_relative(at, reference), "3/9/2024, 14:00");
    }

    #[test]
    fn test_one_day_back_is_dated() {
        let reference = local(2024, 12, 31, 23, 59);
        assert_eq!(format_timestamp_relative(reference, reference), "Today at 23:59");

        let yesterday = reference - Duration::days(1);
        assert_eq!(
            format_timestamp_relative(yesterday, reference),
            "12/30/2024, 23:59"
        );

        let last_year = reference - Duration::days(366);
        assert_eq!(
            format_timestamp_relative(last_year, reference),
            "12/31/2023, 23:59"
        );
    }

    #[test]
    fn test_render_detailed_group() {
        let groups = vec![group(
            "Main Servers",
            GroupStyle::Detailed,
            vec![
                ("Survival", StatusSnapshot::online("3/20", "1.20.4")),
                ("Creative", StatusSnapshot::unreachable()),
            ],
        )];

        let doc = Renderer::default().render(&groups, Local::now());

        assert_eq!(doc.title, "Minecraft Server Status");
        assert_eq!(doc.color, 0x8b00ff);
        assert_eq!(doc.fields.len(), 1);
        assert_eq!(doc.fields[0].name, "Main Servers");
        assert!(!doc.fields[0].inline);
        assert_eq!(
            doc.fields[0].value,
            "Survival (`survival.example.net:25565`): 🟢 Online\nPlayers: 3/20\nVersion: 1.20.4\n\n\
             Creative (`creative.example.net:25565`): 🔴 Offline"
        );
        assert!(doc.footer.starts_with("Last updated at: Today at "));
    }

    #[test]
    fn test_render_compact_group() {
        let groups = vec![group(
            "Additional Information",
            GroupStyle::Compact,
            vec![
                ("Proxy", StatusSnapshot::online("0/0", "Velocity")),
                ("Backup", StatusSnapshot::unreachable()),
            ],
        )];

        let doc = Renderer::new("Network", 0x00ff00).render(&groups, Local::now());

        assert_eq!(doc.title, "Network");
        assert_eq!(doc.color, 0x00ff00);
        assert_eq!(
            doc.fields[0].value,
            "**Proxy:**\n🟢 Online\n\n**Backup:**\n🔴 Offline"
        );
    }

    #[test]
    fn test_render_empty_group() {
        let groups = vec![group("Nothing", GroupStyle::Detailed, vec![])];
        let doc = Renderer::default().render(&groups, Local::now());
        assert_eq!(doc.fields[0].value, "No servers configured");
    }

    #[test]
    fn test_render_truncates_long_fields() {
        let entries: Vec<_> = (0..100)
            .map(|_| ("A server with a rather long name", StatusSnapshot::online("1/1", "1.20")))
            .collect();
        let groups = vec![group("Many", GroupStyle::Detailed, entries)];

        let doc = Renderer::default().render(&groups, Local::now());
        assert_eq!(doc.fields[0].value.chars().count(), MAX_FIELD_VALUE_CHARS);
        assert!(doc.fields[0].value.ends_with("..."));
    }

    #[test]
    fn test_render_timestamp_is_utc_of_now() {
        let now = local(2024, 6, 1, 12, 0);
        let doc = Renderer::default().render(&[], now);
        assert_eq!(doc.timestamp, now.with_timezone(&Utc));
        assert!(doc.fields.is_empty());
    }
}
