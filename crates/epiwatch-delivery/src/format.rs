//! Digest rendering — a pure function from snapshot to Telegram-HTML text.
//!
//! Section order is fixed: Today, Tomorrow, Yesterday. An empty Today or
//! Tomorrow gets an explicit "no shows" line; an empty Yesterday section is
//! omitted entirely (asymmetric on purpose — it matches the source
//! behaviour this digest replaces). Show titles are wrapped in `<b>` tags
//! without escaping, so a title containing markup passes through as-is.

use epiwatch_core::ScheduleSnapshot;

/// Render the digest body.
///
/// Deterministic: identical input yields byte-identical output. The only
/// early return is the all-empty snapshot, which yields the bare
/// "No TV shows found." without a footer.
pub fn render_digest(snapshot: &ScheduleSnapshot, footer: Option<&str>) -> String {
    if snapshot.is_empty() {
        return "No TV shows found.".to_string();
    }

    let mut message = String::new();

    if !snapshot.today.is_empty() {
        message.push_str("📺 <b>TV Shows Airing Today:</b>\n\n");
        for show in &snapshot.today {
            message.push_str(&format!("• <b>{}</b> | {}\n", show.title, show.time));
        }
    } else {
        message.push_str("📺 <b>No TV shows found for today</b>\n\n");
    }

    message.push('\n');

    if !snapshot.tomorrow.is_empty() {
        message.push_str("📺 <b>TV Shows Airing Tomorrow:</b>\n\n");
        for show in &snapshot.tomorrow {
            message.push_str(&format!("• <b>{}</b> | {}\n", show.title, show.time));
        }
    } else {
        message.push_str("📺 <b>No TV shows found for tomorrow</b>\n\n");
    }

    message.push('\n');

    if !snapshot.yesterday.is_empty() {
        message.push_str("📺 <b>TV Shows That Aired Yesterday:</b>\n\n");
        for show in &snapshot.yesterday {
            message.push_str(&format!("• <b>{}</b> | {}\n", show.title, show.time));
        }
    }

    if let Some(footer) = footer {
        message.push_str(&format!("\n {footer}"));
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use epiwatch_core::ShowEntry;

    fn show(title: &str, time: &str) -> ShowEntry {
        ShowEntry {
            title: title.to_string(),
            time: time.to_string(),
            episode_label: String::new(),
        }
    }

    #[test]
    fn all_empty_snapshot_yields_exact_literal() {
        let snap = ScheduleSnapshot::default();
        assert_eq!(render_digest(&snap, Some("@EpiWatch_bot")), "No TV shows found.");
    }

    #[test]
    fn section_order_is_today_tomorrow_yesterday() {
        let snap = ScheduleSnapshot {
            yesterday: vec![show("Y", "7 PM")],
            today: vec![show("T", "8 PM")],
            tomorrow: vec![show("M", "9 PM")],
            featured_image_url: None,
        };
        let out = render_digest(&snap, None);
        let today = out.find("Airing Today").unwrap();
        let tomorrow = out.find("Airing Tomorrow").unwrap();
        let yesterday = out.find("Aired Yesterday").unwrap();
        assert!(today < tomorrow);
        assert!(tomorrow < yesterday);
    }

    #[test]
    fn empty_today_and_tomorrow_get_placeholders() {
        let snap = ScheduleSnapshot {
            yesterday: vec![show("Y", "7 PM")],
            today: vec![],
            tomorrow: vec![],
            featured_image_url: None,
        };
        let out = render_digest(&snap, None);
        assert!(out.contains("📺 <b>No TV shows found for today</b>"));
        assert!(out.contains("📺 <b>No TV shows found for tomorrow</b>"));
        assert!(out.contains("📺 <b>TV Shows That Aired Yesterday:</b>"));
    }

    #[test]
    fn empty_yesterday_section_is_omitted() {
        let snap = ScheduleSnapshot {
            yesterday: vec![],
            today: vec![show("T", "8 PM")],
            tomorrow: vec![show("M", "9 PM")],
            featured_image_url: None,
        };
        let out = render_digest(&snap, None);
        assert!(!out.contains("Yesterday"));
    }

    #[test]
    fn bullet_format_is_exact() {
        let snap = ScheduleSnapshot {
            yesterday: vec![],
            today: vec![show("Foundation", "8:00 PM on Apple TV+")],
            tomorrow: vec![],
            featured_image_url: None,
        };
        let out = render_digest(&snap, None);
        assert!(out.contains("• <b>Foundation</b> | 8:00 PM on Apple TV+\n"));
    }

    #[test]
    fn footer_is_appended_once() {
        let snap = ScheduleSnapshot {
            yesterday: vec![],
            today: vec![show("T", "8 PM")],
            tomorrow: vec![],
            featured_image_url: None,
        };
        let out = render_digest(&snap, Some("@EpiWatch_bot"));
        assert!(out.ends_with("\n @EpiWatch_bot"));

        let without = render_digest(&snap, None);
        assert!(!without.contains("@EpiWatch_bot"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let snap = ScheduleSnapshot {
            yesterday: vec![show("Y", "7 PM")],
            today: vec![show("T", "8 PM")],
            tomorrow: vec![],
            featured_image_url: Some("//img".to_string()),
        };
        assert_eq!(
            render_digest(&snap, Some("x")),
            render_digest(&snap, Some("x"))
        );
    }

    #[test]
    fn titles_pass_through_unescaped() {
        // Known cosmetic caveat: markup-significant characters survive.
        let snap = ScheduleSnapshot {
            yesterday: vec![],
            today: vec![show("Tom & <Jerry>", "8 PM")],
            tomorrow: vec![],
            featured_image_url: None,
        };
        let out = render_digest(&snap, None);
        assert!(out.contains("• <b>Tom & <Jerry></b> | 8 PM"));
    }

    #[test]
    fn degraded_sentinel_renders_as_regular_today_entry() {
        let out = render_digest(&ScheduleSnapshot::degraded(), Some("@EpiWatch_bot"));
        assert!(out.contains("• <b>Scraping Error</b> | N/A"));
        assert!(out.contains("No TV shows found for tomorrow"));
    }
}
