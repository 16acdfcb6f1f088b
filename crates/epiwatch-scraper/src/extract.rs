//! Schedule extraction — fetch, parse, degrade.
//!
//! Section layout of the source page (as served today):
//! - "Today's Top TV Episodes" lives in `span#home_today_episodes`.
//! - Tomorrow/Yesterday have no stable ids; they are found by heading text
//!   and the nearest enclosing table row.
//! - Every show is a `.homeitem` block: a title anchor, a `<br>`, then the
//!   airing time as a bare text node.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, warn};

use epiwatch_core::{ScheduleSnapshot, ShowEntry};

use crate::fetch::PageSource;

const TOMORROW_HEADING: &str = "Tomorrow's Top TV Episodes";
const YESTERDAY_HEADING: &str = "Yesterday's Top TV Episodes";

/// Outcome of one extraction pass.
///
/// `Degraded` carries the fixed sentinel snapshot — the page could not be
/// obtained at all. A page with no recognisable sections still yields
/// `Fetched` with empty buckets; absence of markup is not a fetch failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Fetched(ScheduleSnapshot),
    Degraded(ScheduleSnapshot),
}

impl Extraction {
    pub fn snapshot(&self) -> &ScheduleSnapshot {
        match self {
            Extraction::Fetched(s) | Extraction::Degraded(s) => s,
        }
    }

    pub fn into_snapshot(self) -> ScheduleSnapshot {
        match self {
            Extraction::Fetched(s) | Extraction::Degraded(s) => s,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Extraction::Degraded(_))
    }
}

/// Extract the airing schedule from `source`.
///
/// Never fails: any fetch-level problem is logged and converted into
/// [`Extraction::Degraded`].
pub async fn extract<S: PageSource + ?Sized>(source: &S) -> Extraction {
    let html = match source.fetch_page().await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "schedule page unavailable, returning degraded snapshot");
            return Extraction::Degraded(ScheduleSnapshot::degraded());
        }
    };

    let snapshot = parse_schedule(&html);
    debug!(
        yesterday = snapshot.yesterday.len(),
        today = snapshot.today.len(),
        tomorrow = snapshot.tomorrow.len(),
        image = snapshot.featured_image_url.as_deref().unwrap_or("none"),
        "schedule parsed"
    );
    Extraction::Fetched(snapshot)
}

/// All selectors the parser needs, compiled once per pass.
struct Selectors {
    today_section: Selector,
    heading: Selector,
    item: Selector,
    title_link: Selector,
    line_break: Selector,
    image_primary: Selector,
    image_any: Selector,
}

impl Selectors {
    fn new() -> Option<Self> {
        Some(Self {
            today_section: Selector::parse("span#home_today_episodes").ok()?,
            heading: Selector::parse("h2").ok()?,
            item: Selector::parse(".homeitem").ok()?,
            title_link: Selector::parse(r#"a[href^="//next-episode.net/"]"#).ok()?,
            line_break: Selector::parse("br").ok()?,
            image_primary: Selector::parse(r#"span[style*="display:inline"] a img[align="left"]"#)
                .ok()?,
            image_any: Selector::parse("img").ok()?,
        })
    }
}

/// Parse the page into a snapshot. Infallible: anything unrecognised
/// degrades to empty buckets or per-field fallbacks.
pub fn parse_schedule(html: &str) -> ScheduleSnapshot {
    let Some(sels) = Selectors::new() else {
        return ScheduleSnapshot::default();
    };
    let doc = Html::parse_document(html);

    let today_items: Vec<ElementRef<'_>> = doc
        .select(&sels.today_section)
        .next()
        .map(|section| section.select(&sels.item).collect())
        .unwrap_or_default();

    let featured_image_url = today_items
        .first()
        .and_then(|item| featured_image(&sels, *item));

    let today = today_items
        .iter()
        .map(|item| parse_item(&sels, *item, "Today"))
        .collect();
    let tomorrow = heading_section_items(&doc, &sels, TOMORROW_HEADING)
        .iter()
        .map(|item| parse_item(&sels, *item, "Tomorrow"))
        .collect();
    let yesterday = heading_section_items(&doc, &sels, YESTERDAY_HEADING)
        .iter()
        .map(|item| parse_item(&sels, *item, "Yesterday"))
        .collect();

    ScheduleSnapshot {
        yesterday,
        today,
        tomorrow,
        featured_image_url,
    }
}

/// Locate a section by heading text, then its enclosing table row.
///
/// Substring match, case-sensitive as authored on the page. A missing
/// heading or a heading outside any `<tr>` yields no items.
fn heading_section_items<'a>(
    doc: &'a Html,
    sels: &Selectors,
    heading: &str,
) -> Vec<ElementRef<'a>> {
    let Some(h2) = doc
        .select(&sels.heading)
        .find(|h| h.text().collect::<String>().contains(heading))
    else {
        return Vec::new();
    };

    let Some(row) = h2
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "tr")
    else {
        return Vec::new();
    };

    row.select(&sels.item).collect()
}

fn parse_item(sels: &Selectors, item: ElementRef<'_>, day_name: &str) -> ShowEntry {
    // The thumbnail anchor matches the domain selector too but carries no
    // text; the show title is the first anchor with visible text.
    let link = item
        .select(&sels.title_link)
        .find(|a| !a.text().collect::<String>().trim().is_empty());

    let title = link
        .map(|a| a.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| "Unknown Title".to_string());

    let episode_label = link
        .and_then(|a| a.value().attr("title"))
        .unwrap_or_default()
        .to_string();

    // Airing time is the bare text node right after the first <br>.
    let time = item
        .select(&sels.line_break)
        .next()
        .and_then(|br| br.next_sibling())
        .map(node_text)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| day_name.to_string());

    ShowEntry {
        title,
        time,
        episode_label,
    }
}

/// Featured image of the first today item.
///
/// The primary fingerprint is the large left-aligned thumbnail inside the
/// inline-display span. When that element exists, only its `src` is
/// considered; the whole-item scan runs only when the fingerprint is absent
/// (matches the source's observed behaviour). Either way the `/big/` path
/// segment is rewritten to `/huge/` to request the high-resolution asset.
fn featured_image(sels: &Selectors, item: ElementRef<'_>) -> Option<String> {
    match item.select(&sels.image_primary).next() {
        Some(img) => img
            .value()
            .attr("src")
            .filter(|src| src.contains("/big/"))
            .map(|src| src.replace("/big/", "/huge/")),
        None => item
            .select(&sels.image_any)
            .filter_map(|img| img.value().attr("src"))
            .find(|src| src.contains("/big/"))
            .map(|src| src.replace("/big/", "/huge/")),
    }
}

fn node_text(node: NodeRef<'_, Node>) -> String {
    match node.value() {
        Node::Text(text) => text.to_string(),
        Node::Element(_) => ElementRef::wrap(node)
            .map(|el| el.text().collect())
            .unwrap_or_default(),
        _ => String::new(),
    }
}
