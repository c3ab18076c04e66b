//! Embeddable trust badge: level from the trust score, embed snippets, an SVG
//! image for the snippets to point at, and a standalone HTML preview.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmbedLevel {
    Platinum,
    Gold,
    Silver,
    Bronze,
}

impl EmbedLevel {
    pub fn from_trust(trust_score: u8) -> Self {
        match trust_score {
            90.. => EmbedLevel::Platinum,
            80..=89 => EmbedLevel::Gold,
            70..=79 => EmbedLevel::Silver,
            _ => EmbedLevel::Bronze,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedLevel::Platinum => "Platinum",
            EmbedLevel::Gold => "Gold",
            EmbedLevel::Silver => "Silver",
            EmbedLevel::Bronze => "Bronze",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            EmbedLevel::Platinum => "#7c3aed",
            EmbedLevel::Gold => "#10b981",
            EmbedLevel::Silver => "#3b82f6",
            EmbedLevel::Bronze => "#6b7280",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BadgeProduct {
    pub id: u64,
    pub name: String,
    pub trust_score: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct BadgeStatus {
    pub level: EmbedLevel,
    pub color: &'static str,
    pub verified: bool,
    pub issued_date: NaiveDate,
    pub valid_until: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedCodes {
    pub html: String,
    pub markdown: String,
    pub react: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedBadge {
    pub product: BadgeProduct,
    pub badge: BadgeStatus,
    pub embed_codes: EmbedCodes,
    pub preview_url: String,
}

/// Build embed data for `product`. `base_url` has no trailing slash.
pub fn embed_badge(product: &Product, base_url: &str, issued: NaiveDate, valid_days: u32) -> EmbedBadge {
    let base = base_url.trim_end_matches('/');
    let id = product.id;
    let level = EmbedLevel::from_trust(product.trust_score);
    let image = format!("{base}/api/v1/badges/{id}/image");
    let page = format!("{base}/product/{id}");

    EmbedBadge {
        product: BadgeProduct {
            id,
            name: product.details.name.clone(),
            trust_score: product.trust_score,
        },
        badge: BadgeStatus {
            level,
            color: level.color(),
            verified: true,
            issued_date: issued,
            valid_until: issued
                .checked_add_signed(Duration::days(i64::from(valid_days)))
                .unwrap_or(NaiveDate::MAX),
        },
        embed_codes: EmbedCodes {
            html: format!(
                "<a href=\"{page}\" target=\"_blank\">\n  <img src=\"{image}\" alt=\"Verified - {}\" />\n</a>",
                level.as_str()
            ),
            markdown: format!("[![Verified]({image})]({page})"),
            react: format!(
                "<TrustBadge productId={{{id}}} score={{{}}} level=\"{}\" />",
                product.trust_score,
                level.as_str()
            ),
        },
        preview_url: format!("{base}/api/v1/badges/{id}/preview"),
    }
}

/// Standalone HTML page rendering the badge. Product name and link are escaped.
pub fn render_preview(product: &Product, base_url: &str) -> String {
    let level = EmbedLevel::from_trust(product.trust_score);
    let color = level.color();
    let href = html_escape::encode_double_quoted_attribute(&format!(
        "{}/product/{}",
        base_url.trim_end_matches('/'),
        product.id
    ))
    .into_owned();
    let name = html_escape::encode_text(&product.details.name).into_owned();
    let score = product.trust_score;
    let level = level.as_str();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{name} - Verified</title>
<style>
  .trust-badge {{ display: inline-flex; align-items: center; gap: 12px; padding: 12px 20px;
    border: 2px solid {color}; border-radius: 12px; background: #ffffff;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    text-decoration: none; color: inherit; }}
  .badge-title {{ font-size: 14px; font-weight: 600; color: #1f2937; }}
  .badge-subtitle {{ font-size: 12px; color: #6b7280; }}
  .badge-score {{ font-size: 24px; font-weight: bold; color: {color}; margin-left: 12px; }}
</style>
</head>
<body style="display: flex; justify-content: center; align-items: center; min-height: 100vh; margin: 0; background: #f3f4f6;">
  <a href="{href}" class="trust-badge" target="_blank">
    <div>
      <div class="badge-title">{name}</div>
      <div class="badge-subtitle">Verified &middot; {level}</div>
    </div>
    <span class="badge-score">{score}</span>
  </a>
</body>
</html>
"#
    )
}

/// Badge image referenced by the HTML and markdown embed codes.
pub fn trust_svg(product: &Product) -> String {
    let level = EmbedLevel::from_trust(product.trust_score);
    render_svg(
        &product.details.name,
        &format!("Verified \u{b7} {}", level.as_str()),
        product.trust_score,
        level.color(),
    )
}

/// 240x56 badge card: title and subtitle on the left, score on the right.
/// Text is escaped; `color` must be a literal hex color.
pub fn render_svg(title: &str, subtitle: &str, score: u8, color: &str) -> String {
    let title = html_escape::encode_text(title);
    let subtitle = html_escape::encode_text(subtitle);

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="240" height="56" viewBox="0 0 240 56" role="img" aria-label="{title}: {subtitle}, score {score}">
  <rect x="1" y="1" width="238" height="54" rx="10" fill="#ffffff" stroke="{color}" stroke-width="2"/>
  <text x="16" y="24" font-family="Segoe UI, Roboto, sans-serif" font-size="13" font-weight="600" fill="#1f2937">{title}</text>
  <text x="16" y="42" font-family="Segoe UI, Roboto, sans-serif" font-size="11" fill="#6b7280">{subtitle}</text>
  <text x="224" y="36" text-anchor="end" font-family="Segoe UI, Roboto, sans-serif" font-size="22" font-weight="700" fill="{color}">{score}</text>
</svg>
"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProductDetails, ProductStatus};
    use crate::signals::SubScores;
    use chrono::Utc;

    fn product(name: &str, trust: u8) -> Product {
        Product {
            id: 42,
            details: ProductDetails {
                name: name.into(),
                website: "https://acme.io".into(),
                category: "AI/ML".into(),
                funding_stage: "Seed".into(),
                description: None,
                tagline: None,
            },
            owner_id: None,
            status: ProductStatus::Approved,
            baseline: SubScores::uniform(70),
            current: SubScores::uniform(70),
            trust_score: trust,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn levels_by_trust() {
        assert_eq!(EmbedLevel::from_trust(100), EmbedLevel::Platinum);
        assert_eq!(EmbedLevel::from_trust(90), EmbedLevel::Platinum);
        assert_eq!(EmbedLevel::from_trust(89), EmbedLevel::Gold);
        assert_eq!(EmbedLevel::from_trust(70), EmbedLevel::Silver);
        assert_eq!(EmbedLevel::from_trust(69), EmbedLevel::Bronze);
        assert_eq!(EmbedLevel::from_trust(0).color(), "#6b7280");
    }

    #[test]
    fn embed_codes_point_at_base_url() {
        let issued = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap();
        let b = embed_badge(&product("Acme", 85), "https://example.org/", issued, 365);
        assert_eq!(b.badge.level, EmbedLevel::Gold);
        assert_eq!(b.badge.valid_until, NaiveDate::from_ymd_opt(2027, 1, 3).unwrap());
        assert_eq!(
            b.embed_codes.markdown,
            "[![Verified](https://example.org/api/v1/badges/42/image)](https://example.org/product/42)"
        );
        assert_eq!(
            b.embed_codes.react,
            "<TrustBadge productId={42} score={85} level=\"Gold\" />"
        );
        assert_eq!(b.preview_url, "https://example.org/api/v1/badges/42/preview");
    }

    #[test]
    fn preview_escapes_product_name() {
        let html = render_preview(&product("<script>alert(1)</script>", 72), "http://localhost:8000");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("#3b82f6"));
        assert!(html.contains("http://localhost:8000/product/42"));
    }

    #[test]
    fn svg_carries_score_and_escaped_name() {
        let svg = trust_svg(&product("R&D <Labs>", 93));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("R&amp;D &lt;Labs&gt;"));
        assert!(svg.contains(">93</text>"));
        assert!(svg.contains("#7c3aed"));
        assert!(svg.contains("Verified \u{b7} Platinum"));
    }
}
