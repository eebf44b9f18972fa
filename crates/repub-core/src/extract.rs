//! Turns one admin listing page of loosely-structured HTML into ad
//! identifiers plus publish status.
//!
//! The page template has changed more than once, so identifier extraction
//! is an ordered chain of independent matchers tried per ad section; the
//! first one that yields a numeric id wins. If the per-section pass finds
//! nothing at all, a document-wide flat pass re-applies the structural
//! matchers without status filtering (lossy: it cannot tell published from
//! unpublished ads).

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::models::PageResult;

/// Structural id attribute prefix on the publication container.
const ITEMPUB_PREFIX: &str = "itempub";
/// Label preceding the status value in the section footer.
const STATUS_LABEL: &str = "Estado:";
/// Status value marking an ad as publicly visible.
const STATUS_PUBLISHED: &str = "Publicado";
/// Heading label preceding the ad number.
const AD_NUMBER_LABEL: &str = "N° Aviso:";
/// Listing pages show at least this many ads when another page exists.
const FULL_PAGE_HINT: usize = 10;

static SECTION: LazyLock<Selector> = LazyLock::new(|| sel(".item-aviso"));
static ITEMPUB: LazyLock<Selector> = LazyLock::new(|| sel(r#"[id^="itempub"]"#));
static CHECKBOX: LazyLock<Selector> = LazyLock::new(|| sel(r#"input[name="nids[]"]"#));
static TAB_LABEL: LazyLock<Selector> = LazyLock::new(|| sel(".tab-label[id]"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| sel("h4"));
static SMALL: LazyLock<Selector> = LazyLock::new(|| sel("small"));
static PAGE_LINK: LazyLock<Selector> = LazyLock::new(|| sel(r#"a[href*="page="]"#));
static PAGINATION: LazyLock<Selector> = LazyLock::new(|| sel(".pagination"));

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

type Matcher = fn(&ElementRef) -> Option<String>;

/// Identifier matchers in priority order. The heading matcher is only
/// meaningful inside a section, so the flat fallback uses the first three.
const ID_MATCHERS: &[Matcher] = &[
    match_itempub,
    match_checkbox,
    match_tab_label,
    match_heading,
];

/// Parses listing pages into [`PageResult`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct PageExtractor;

impl PageExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, html: &str, page: u32) -> PageResult {
        let doc = Html::parse_document(html);

        let mut ad_ids: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut total_scanned = 0u64;
        let mut published_found = 0u64;
        let mut unpublished_skipped = 0u64;

        for section in doc.select(&SECTION) {
            let Some(ad_id) = ID_MATCHERS.iter().find_map(|m| m(&section)) else {
                continue;
            };
            total_scanned += 1;

            if section_is_published(&section) {
                published_found += 1;
                if seen.insert(ad_id.clone()) {
                    tracing::debug!(%ad_id, "Found published ad");
                    ad_ids.push(ad_id);
                }
            } else {
                unpublished_skipped += 1;
                tracing::debug!(%ad_id, "Skipping ad - not published");
            }
        }

        // Template may have changed out from under us: re-scan the whole
        // document with the structural matchers, without status filtering.
        if ad_ids.is_empty() {
            tracing::debug!(page, "No ads found per-section, trying flat fallback");
            ad_ids = flat_scan(&doc);
        }

        let likely_has_next_page = ad_ids.len() >= FULL_PAGE_HINT
            || doc.select(&PAGINATION).next().is_some()
            || doc.select(&PAGE_LINK).next().is_some()
            || next_page_link_exists(&doc, page);

        tracing::debug!(
            page,
            found = ad_ids.len(),
            total_scanned,
            unpublished_skipped,
            "Parsed listing page"
        );

        PageResult {
            ad_ids,
            total_scanned,
            published_found,
            unpublished_skipped,
            likely_has_next_page,
        }
    }
}

// ---------------------------------------------------------------------------
// Identifier matchers
// ---------------------------------------------------------------------------

/// Element with `id="itempub<digits>"`.
fn match_itempub(section: &ElementRef) -> Option<String> {
    let el = section.select(&ITEMPUB).next()?;
    let id = el.value().attr("id")?;
    let ad_id = id.strip_prefix(ITEMPUB_PREFIX)?;
    is_numeric(ad_id).then(|| ad_id.to_string())
}

/// Selection checkbox carrying the ad id as its value.
fn match_checkbox(section: &ElementRef) -> Option<String> {
    let el = section.select(&CHECKBOX).next()?;
    let value = el.value().attr("value")?;
    is_numeric(value).then(|| value.to_string())
}

/// Tab label whose id attribute is the ad id itself.
fn match_tab_label(section: &ElementRef) -> Option<String> {
    let el = section.select(&TAB_LABEL).next()?;
    let id = el.value().attr("id")?;
    is_numeric(id).then(|| id.to_string())
}

/// Heading that is purely numeric, or an "N° Aviso:" heading whose next
/// heading sibling is numeric.
fn match_heading(section: &ElementRef) -> Option<String> {
    for h4 in section.select(&HEADING) {
        let text = element_text(&h4);
        if is_numeric(&text) {
            return Some(text);
        }
        if text.contains(AD_NUMBER_LABEL) {
            if let Some(next) = next_element(&h4).filter(|el| el.value().name() == "h4") {
                let sibling_text = element_text(&next);
                if is_numeric(&sibling_text) {
                    return Some(sibling_text);
                }
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Status detection
// ---------------------------------------------------------------------------

/// The section footer renders the status as
/// `<small>Estado:</small><small>Publicado</small>`.
fn section_is_published(section: &ElementRef) -> bool {
    // Primary: label first, value in the adjacent small.
    for label in section.select(&SMALL) {
        if !element_text(&label).contains(STATUS_LABEL) {
            continue;
        }
        if let Some(value) = next_element(&label).filter(|el| el.value().name() == "small") {
            if element_text(&value) == STATUS_PUBLISHED {
                return true;
            }
        }
    }

    // Fallback: value first, verify the preceding small is the label.
    for value in section.select(&SMALL) {
        if element_text(&value) != STATUS_PUBLISHED {
            continue;
        }
        if let Some(label) = prev_element(&value).filter(|el| el.value().name() == "small") {
            if element_text(&label) == STATUS_LABEL {
                return true;
            }
        }
    }

    false
}

// ---------------------------------------------------------------------------
// Flat fallback and helpers
// ---------------------------------------------------------------------------

/// Document-wide scan with the structural matchers, no status filter.
fn flat_scan(doc: &Html) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut push = |id: String| {
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    };

    for el in doc.select(&ITEMPUB) {
        if let Some(ad_id) = el
            .value()
            .attr("id")
            .and_then(|id| id.strip_prefix(ITEMPUB_PREFIX))
            .filter(|id| is_numeric(id))
        {
            push(ad_id.to_string());
        }
    }
    for el in doc.select(&CHECKBOX) {
        if let Some(value) = el.value().attr("value").filter(|v| is_numeric(v)) {
            push(value.to_string());
        }
    }
    for el in doc.select(&TAB_LABEL) {
        if let Some(id) = el.value().attr("id").filter(|id| is_numeric(id)) {
            push(id.to_string());
        }
    }

    ids
}

fn next_page_link_exists(doc: &Html, page: u32) -> bool {
    let Ok(selector) = Selector::parse(&format!(r#"[href*="page={}"]"#, page + 1)) else {
        return false;
    };
    doc.select(&selector).next().is_some()
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn next_element<'a>(el: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

fn prev_element<'a>(el: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.prev_siblings().find_map(ElementRef::wrap)
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ad_section, listing_page};

    fn extract(html: &str) -> PageResult {
        PageExtractor::new().extract(html, 1)
    }

    fn section(inner: &str) -> String {
        format!(r#"<html><body><div class="item-aviso">{inner}</div></body></html>"#)
    }

    #[test]
    fn itempub_prefix_wins() {
        let html = section(
            r#"<div id="itempub111"></div>
               <input type="checkbox" name="nids[]" value="222">
               <small>Estado:</small><small>Publicado</small>"#,
        );
        let result = extract(&html);
        assert_eq!(result.ad_ids, vec!["111"]);
    }

    #[test]
    fn checkbox_value_as_fallback() {
        let html = section(
            r#"<input type="checkbox" name="nids[]" value="333">
               <small>Estado:</small><small>Publicado</small>"#,
        );
        assert_eq!(extract(&html).ad_ids, vec!["333"]);
    }

    #[test]
    fn tab_label_id_as_fallback() {
        let html = section(
            r#"<div class="tab-label" id="444"></div>
               <small>Estado:</small><small>Publicado</small>"#,
        );
        assert_eq!(extract(&html).ad_ids, vec!["444"]);
    }

    #[test]
    fn numeric_heading_as_fallback() {
        let html = section(
            r#"<h4>555</h4>
               <small>Estado:</small><small>Publicado</small>"#,
        );
        assert_eq!(extract(&html).ad_ids, vec!["555"]);
    }

    #[test]
    fn heading_label_uses_next_heading() {
        let html = section(
            r#"<h4>N° Aviso:</h4><h4>666</h4>
               <small>Estado:</small><small>Publicado</small>"#,
        );
        assert_eq!(extract(&html).ad_ids, vec!["666"]);
    }

    #[test]
    fn non_numeric_candidates_are_ignored() {
        let html = section(
            r#"<div id="itempubXYZ"></div>
               <input type="checkbox" name="nids[]" value="abc">
               <small>Estado:</small><small>Publicado</small>"#,
        );
        let result = extract(&html);
        assert!(result.ad_ids.is_empty());
        // No identifier resolved, so the section is never scanned.
        assert_eq!(result.total_scanned, 0);
    }

    #[test]
    fn unpublished_ads_are_skipped_and_counted() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            ad_section("100", "Publicado"),
            ad_section("200", "Vencido"),
        );
        let result = extract(&html);
        assert_eq!(result.ad_ids, vec!["100"]);
        assert_eq!(result.total_scanned, 2);
        assert_eq!(result.published_found, 1);
        assert_eq!(result.unpublished_skipped, 1);
    }

    #[test]
    fn status_detected_from_value_with_preceding_label() {
        // The reversed check: locate the value first, then verify the
        // label sits right before it.
        let html = section(
            r#"<div id="itempub777"></div>
               <div><small>Estado:</small><small>Publicado</small></div>"#,
        );
        let result = extract(&html);
        assert_eq!(result.ad_ids, vec!["777"]);
        assert_eq!(result.published_found, 1);
    }

    #[test]
    fn status_value_must_match_exactly() {
        // With every resolved section unpublished, the published list is
        // empty and the lossy flat pass re-adds the id without a status
        // filter. The counters still record the skip.
        let html = section(
            r#"<div id="itempub888"></div>
               <small>Estado:</small><small>Despublicado</small>"#,
        );
        let result = extract(&html);
        assert_eq!(result.published_found, 0);
        assert_eq!(result.unpublished_skipped, 1);
        assert_eq!(result.ad_ids, vec!["888"]);
    }

    #[test]
    fn duplicate_ids_within_page_are_deduplicated() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            ad_section("900", "Publicado"),
            ad_section("900", "Publicado"),
        );
        let result = extract(&html);
        assert_eq!(result.ad_ids, vec!["900"]);
        assert_eq!(result.total_scanned, 2);
    }

    #[test]
    fn flat_fallback_when_no_sections_resolve() {
        // No .item-aviso wrappers at all: the structured pass finds
        // nothing and the flat pass picks up ids without status filtering.
        let html = r#"<html><body>
            <div id="itempub11"></div>
            <input type="checkbox" name="nids[]" value="22">
            <div class="tab-label" id="33"></div>
        </body></html>"#;
        let result = extract(html);
        assert_eq!(result.ad_ids, vec!["11", "22", "33"]);
        assert_eq!(result.total_scanned, 0);
    }

    #[test]
    fn flat_fallback_dedupes_across_methods() {
        let html = r#"<html><body>
            <div id="itempub44"></div>
            <input type="checkbox" name="nids[]" value="44">
        </body></html>"#;
        assert_eq!(extract(html).ad_ids, vec!["44"]);
    }

    #[test]
    fn next_page_signal_from_full_page() {
        let ids: Vec<String> = (1..=10).map(|i| format!("{i}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let html = listing_page(&id_refs);
        assert!(extract(&html).likely_has_next_page);
    }

    #[test]
    fn next_page_signal_from_pagination_markup() {
        let html = format!(
            r#"<html><body>{}<div class="pagination"></div></body></html>"#,
            ad_section("1", "Publicado")
        );
        assert!(extract(&html).likely_has_next_page);
    }

    #[test]
    fn next_page_signal_from_page_link() {
        let html = format!(
            r#"<html><body>{}<a href="/micuenta/avisos?page=2">2</a></body></html>"#,
            ad_section("1", "Publicado")
        );
        assert!(extract(&html).likely_has_next_page);
    }

    #[test]
    fn short_page_without_links_has_no_next_signal() {
        let html = format!("<html><body>{}</body></html>", ad_section("1", "Publicado"));
        assert!(!extract(&html).likely_has_next_page);
    }

    #[test]
    fn empty_document_yields_empty_result() {
        let result = extract("<html><body></body></html>");
        assert!(result.ad_ids.is_empty());
        assert!(!result.likely_has_next_page);
        assert_eq!(result.total_scanned, 0);
    }
}
