use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use std::fmt::Write;

use super::{today, AppState};
use crate::models::{CommunityCentre, NormalizedActivityName};

/// How often a crawler should expect a page to change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
}

impl ChangeFrequency {
    fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub url: String,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Sitemap for crawlers
///
/// GET /sitemap.xml
///
/// Falls back to the static pages when the upstream API is unavailable.
pub async fn sitemap(state: web::Data<AppState>) -> HttpResponse {
    let (centres, activities) = tokio::join!(
        state.upstream.centres(),
        state.upstream.normalized_activities(),
    );

    let entries = match (centres, activities) {
        (Ok(centres), Ok(activities)) => sitemap_entries(&state.site_url, &centres, &activities),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("Sitemap limited to static routes: {}", e);
            static_entries(&state.site_url)
        }
    };

    HttpResponse::Ok()
        .content_type("application/xml; charset=utf-8")
        .body(render_sitemap(&entries, today()))
}

fn static_entries(site_url: &str) -> Vec<SitemapEntry> {
    let base = site_url.trim_end_matches('/');
    vec![
        SitemapEntry {
            url: base.to_string(),
            change_frequency: ChangeFrequency::Daily,
            priority: 1.0,
        },
        SitemapEntry {
            url: format!("{}/activities", base),
            change_frequency: ChangeFrequency::Daily,
            priority: 0.9,
        },
    ]
}

/// Static pages followed by every centre and activity page
pub fn sitemap_entries(
    site_url: &str,
    centres: &[CommunityCentre],
    activities: &[NormalizedActivityName],
) -> Vec<SitemapEntry> {
    let base = site_url.trim_end_matches('/');
    let mut entries = static_entries(base);

    entries.extend(centres.iter().map(|centre| SitemapEntry {
        url: format!("{}/centres/{}", base, urlencoding::encode(&centre.id)),
        change_frequency: ChangeFrequency::Weekly,
        priority: 0.8,
    }));

    entries.extend(activities.iter().map(|activity| SitemapEntry {
        url: format!("{}/activities/{}", base, urlencoding::encode(&activity.name)),
        change_frequency: ChangeFrequency::Weekly,
        priority: 0.7,
    }));

    entries
}

pub fn render_sitemap(entries: &[SitemapEntry], last_modified: NaiveDate) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for entry in entries {
        // Writing into a String cannot fail
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape_xml(&entry.url),
            last_modified.format("%Y-%m-%d"),
            entry.change_frequency.as_str(),
            entry.priority,
        );
    }

    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
