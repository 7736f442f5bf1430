use serde::Deserialize;

use crate::config::ToolboxConfig;
use crate::{Result, ToolboxError};

/// Identifiers read once from the host page's tagging payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealerContext {
    pub dealer_id: String,
    pub page_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaggingPayload {
    #[serde(default)]
    dealer_id: Option<Identifier>,
    #[serde(default)]
    page_id: Option<Identifier>,
}

/// Sites emit ids both as strings and as bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Identifier {
    Text(String),
    Number(serde_json::Number),
}

impl Identifier {
    fn into_non_empty(self) -> Option<String> {
        let raw = match self {
            Identifier::Text(s) => s.trim().to_string(),
            Identifier::Number(n) => n.to_string(),
        };
        (!raw.is_empty()).then_some(raw)
    }
}

impl DealerContext {
    pub fn from_payload(text: &str) -> Result<Self> {
        let payload: TaggingPayload =
            serde_json::from_str(text).map_err(ToolboxError::MalformedPayload)?;
        let dealer_id = payload
            .dealer_id
            .and_then(Identifier::into_non_empty)
            .ok_or(ToolboxError::MissingDealerId)?;
        Ok(Self {
            dealer_id,
            page_id: payload.page_id.and_then(Identifier::into_non_empty),
        })
    }

    /// `text` is the payload element's content, `None` when the element is absent.
    pub fn from_element_text(text: Option<String>) -> Result<Self> {
        let text = text.ok_or(ToolboxError::MissingPayload)?;
        Self::from_payload(&text)
    }

    /// Best-effort read: failures are logged and collapse to `None`, which the
    /// popup treats as "do not render".
    pub fn read(text: Option<String>) -> Option<Self> {
        match Self::from_element_text(text) {
            Ok(ctx) => Some(ctx),
            Err(err) => {
                tracing::warn!(error = %err, "dealer context unavailable");
                None
            }
        }
    }
}

/// Canonical URL from page metadata, else the browser's current address.
pub fn canonical_page_url(meta_content: Option<&str>, location_href: &str) -> String {
    match meta_content.map(str::trim) {
        Some(content) if !content.is_empty() => content.to_string(),
        _ => location_href.to_string(),
    }
}

/// Outbound CMS links, all parameterised by dealer and page id only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealerLinks {
    /// Staff directory on staff pages, CMS dashboard elsewhere.
    pub cms: String,
    pub header_widget: String,
    pub custom_code: String,
    pub page_content: Option<String>,
    pub staff_context: bool,
}

impl DealerLinks {
    pub fn build(ctx: &DealerContext, canonical_url: &str, config: &ToolboxConfig) -> Self {
        let cms_base = config.cms_base_url.trim_end_matches('/');
        let id = &ctx.dealer_id;
        let staff_context = !config.staff_marker.is_empty() && canonical_url.contains(&config.staff_marker);
        let cms = if staff_context {
            format!(
                "{}/#/{id}/staff-directory-legacy",
                config.staff_base_url.trim_end_matches('/')
            )
        } else {
            format!("{cms_base}/cms/#/{id}/dashboard")
        };
        Self {
            cms,
            header_widget: format!("{cms_base}/cms/#/{id}/headerWidget"),
            custom_code: format!("{cms_base}/cms/#/{id}/CustomCode"),
            page_content: ctx
                .page_id
                .as_ref()
                .map(|page| format!("{cms_base}/page/#/{id}/page/{page}")),
            staff_context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_and_numeric_ids() {
        let ctx = DealerContext::from_payload(r#"{"dealerId":"123","pageId":"456"}"#).unwrap();
        assert_eq!(ctx.dealer_id, "123");
        assert_eq!(ctx.page_id.as_deref(), Some("456"));

        let ctx = DealerContext::from_payload(r#"{"dealerId":987,"pageId":null,"other":true}"#)
            .unwrap();
        assert_eq!(ctx.dealer_id, "987");
        assert_eq!(ctx.page_id, None);
    }

    #[test]
    fn missing_or_blank_dealer_is_an_error() {
        assert!(matches!(
            DealerContext::from_payload(r#"{"pageId":"1"}"#),
            Err(ToolboxError::MissingDealerId)
        ));
        assert!(matches!(
            DealerContext::from_payload(r#"{"dealerId":"  "}"#),
            Err(ToolboxError::MissingDealerId)
        ));
        assert!(matches!(
            DealerContext::from_payload("{dealerId:"),
            Err(ToolboxError::MalformedPayload(_))
        ));
        assert!(matches!(
            DealerContext::from_element_text(None),
            Err(ToolboxError::MissingPayload)
        ));
    }

    #[test]
    fn read_degrades_to_none() {
        assert!(DealerContext::read(Some("not json".into())).is_none());
        assert!(DealerContext::read(None).is_none());
        assert!(DealerContext::read(Some(r#"{"dealerId":"5"}"#.into())).is_some());
    }

    #[test]
    fn canonical_prefers_meta() {
        assert_eq!(
            canonical_page_url(Some("https://d.test/staff"), "https://d.test/x"),
            "https://d.test/staff"
        );
        assert_eq!(canonical_page_url(Some(" "), "https://d.test/x"), "https://d.test/x");
        assert_eq!(canonical_page_url(None, "https://d.test/x"), "https://d.test/x");
    }

    #[test]
    fn dealer_site_links() {
        let ctx = DealerContext {
            dealer_id: "123".into(),
            page_id: Some("456".into()),
        };
        let links = DealerLinks::build(&ctx, "https://dealer.test/new", &ToolboxConfig::default());
        assert!(!links.staff_context);
        assert_eq!(links.cms, "https://cms.dealeron.com/dash/dist/cms/#/123/dashboard");
        assert_eq!(
            links.page_content.as_deref(),
            Some("https://cms.dealeron.com/dash/dist/page/#/123/page/456")
        );
        assert_eq!(links.header_widget, "https://cms.dealeron.com/dash/dist/cms/#/123/headerWidget");
        assert_eq!(links.custom_code, "https://cms.dealeron.com/dash/dist/cms/#/123/CustomCode");
    }

    #[test]
    fn staff_pages_link_to_directory() {
        let ctx = DealerContext {
            dealer_id: "77".into(),
            page_id: None,
        };
        let links = DealerLinks::build(&ctx, "https://dealer.test/staff.htm", &ToolboxConfig::default());
        assert!(links.staff_context);
        assert_eq!(links.cms, "https://staff.dealeron.com/#/77/staff-directory-legacy");
        assert!(links.page_content.is_none());
    }
}
