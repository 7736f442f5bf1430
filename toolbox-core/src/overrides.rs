use rand::Rng;
use url::Url;

use crate::catalog::{find_override, FeatureOverride, FEATURE_OVERRIDES};
use crate::{Result, ToolboxError};

/// Query value that marks an override as active.
pub const OFF_VALUE: &str = "off";
pub const CACHE_BUST_PARAM: &str = "pc";
const CACHE_BUST_LEN: usize = 5;
const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// The page address, the only shared mutable state the overrides touch.
pub trait Location {
    fn href(&self) -> String;
    /// Commit a new address. In the browser this is a full page load.
    fn assign(&self, href: &str) -> Result<()>;
}

/// First value wins, matching `URLSearchParams::get`.
pub fn is_active_in(url: &Url, param: &str) -> bool {
    url.query_pairs()
        .find(|(k, _)| k == param)
        .map(|(_, v)| v == OFF_VALUE)
        .unwrap_or(false)
}

/// `param=off` when active, parameter removed otherwise.
pub fn with_override(url: &Url, param: &str, active: bool) -> Url {
    let mut next = url.clone();
    rewrite_query(&mut next, |pairs| {
        if active {
            set_pair(pairs, param, OFF_VALUE);
        } else {
            pairs.retain(|(k, _)| k != param);
        }
    });
    next
}

/// Drops every catalog parameter, leaving unrelated ones alone.
pub fn without_overrides(url: &Url) -> Url {
    let mut next = url.clone();
    rewrite_query(&mut next, |pairs| {
        pairs.retain(|(k, _)| find_override(k).is_none());
    });
    next
}

pub fn with_cache_bust(url: &Url, token: &str) -> Url {
    let mut next = url.clone();
    rewrite_query(&mut next, |pairs| set_pair(pairs, CACHE_BUST_PARAM, token));
    next
}

/// Five characters of `[a-z0-9]`.
pub fn cache_bust_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CACHE_BUST_LEN)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

fn rewrite_query<F>(url: &mut Url, edit: F)
where
    F: FnOnce(&mut Vec<(String, String)>),
{
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    edit(&mut pairs);
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs.iter());
    }
}

/// Replace the first occurrence in place and drop the rest, or append.
fn set_pair(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    let mut seen = false;
    pairs.retain_mut(|(k, v)| {
        if k != key {
            return true;
        }
        if seen {
            return false;
        }
        seen = true;
        *v = value.to_string();
        true
    });
    if !seen {
        pairs.push((key.to_string(), value.to_string()));
    }
}

/// Feature overrides read live from, and committed by navigating, the page URL.
/// Nothing is cached: every read re-parses the current address.
pub struct OverrideStore<L> {
    location: L,
}

impl<L: Location> OverrideStore<L> {
    pub fn new(location: L) -> Self {
        Self { location }
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    fn current(&self) -> Result<Url> {
        Ok(Url::parse(&self.location.href())?)
    }

    /// An unparseable address reads as inactive.
    pub fn is_active(&self, param: &str) -> bool {
        self.current()
            .map(|url| is_active_in(&url, param))
            .unwrap_or(false)
    }

    /// Catalog entries paired with their live state, in catalog order.
    pub fn statuses(&self) -> Vec<(&'static FeatureOverride, bool)> {
        let url = self.current().ok();
        FEATURE_OVERRIDES
            .iter()
            .map(|f| {
                let active = url.as_ref().map(|u| is_active_in(u, f.url_param)).unwrap_or(false);
                (f, active)
            })
            .collect()
    }

    pub fn set_active(&self, param: &str, active: bool) -> Result<()> {
        let feature =
            find_override(param).ok_or_else(|| ToolboxError::UnknownOverride(param.to_string()))?;
        let next = with_override(&self.current()?, feature.url_param, active);
        tracing::info!(param, active, "applying feature override");
        self.navigate(&next)
    }

    pub fn toggle(&self, param: &str) -> Result<()> {
        self.set_active(param, !self.is_active(param))
    }

    /// One navigation regardless of how many overrides were set.
    pub fn clear_all(&self) -> Result<()> {
        let next = without_overrides(&self.current()?);
        tracing::info!("clearing all feature overrides");
        self.navigate(&next)
    }

    /// Reload with a fresh `pc` token so caches between us and the site miss.
    pub fn refresh<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<()> {
        let next = with_cache_bust(&self.current()?, &cache_bust_token(rng));
        self.navigate(&next)
    }

    fn navigate(&self, url: &Url) -> Result<()> {
        tracing::debug!(target_url = %url, "navigating");
        self.location.assign(url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;

    /// Records navigations instead of loading pages.
    struct MemoryLocation {
        href: RefCell<String>,
        visits: RefCell<Vec<String>>,
    }

    impl MemoryLocation {
        fn at(href: &str) -> Self {
            Self {
                href: RefCell::new(href.to_string()),
                visits: RefCell::new(Vec::new()),
            }
        }
    }

    impl Location for MemoryLocation {
        fn href(&self) -> String {
            self.href.borrow().clone()
        }

        fn assign(&self, href: &str) -> Result<()> {
            *self.href.borrow_mut() = href.to_string();
            self.visits.borrow_mut().push(href.to_string());
            Ok(())
        }
    }

    fn store(href: &str) -> OverrideStore<MemoryLocation> {
        OverrideStore::new(MemoryLocation::at(href))
    }

    #[test]
    fn only_exact_off_is_active() {
        let s = store("https://x.test/page?do_gtm=off&do_ct=on&do_cc=1&do_tpi=OFF");
        assert!(s.is_active("do_gtm"));
        assert!(!s.is_active("do_ct"));
        assert!(!s.is_active("do_cc"));
        assert!(!s.is_active("do_tpi"));
        assert!(!s.is_active("do_bts"));
    }

    #[test]
    fn first_duplicate_decides() {
        let s = store("https://x.test/?do_gtm=on&do_gtm=off");
        assert!(!s.is_active("do_gtm"));
    }

    #[test]
    fn set_then_unset_every_feature() {
        for feature in FEATURE_OVERRIDES {
            let s = store("https://x.test/page?keep=1");
            s.set_active(feature.url_param, true).unwrap();
            let url = Url::parse(&s.location().href()).unwrap();
            assert!(is_active_in(&url, feature.url_param));
            assert!(url.query_pairs().any(|(k, v)| k == "keep" && v == "1"));

            s.set_active(feature.url_param, false).unwrap();
            let url = Url::parse(&s.location().href()).unwrap();
            assert!(url.query_pairs().all(|(k, _)| k != feature.url_param));
            assert_eq!(s.location().visits.borrow().len(), 2);
        }
    }

    #[test]
    fn set_replaces_existing_value() {
        let s = store("https://x.test/?do_ct=on&a=b");
        s.set_active("do_ct", true).unwrap();
        assert_eq!(s.location().href(), "https://x.test/?do_ct=off&a=b");
    }

    #[test]
    fn toggle_flips_state() {
        let s = store("https://x.test/p");
        s.toggle("do_mld").unwrap();
        assert_eq!(s.location().href(), "https://x.test/p?do_mld=off");
        s.toggle("do_mld").unwrap();
        assert_eq!(s.location().href(), "https://x.test/p");
    }

    #[test]
    fn toggle_reads_the_address_at_click_time() {
        let s = store("https://x.test/p");
        let listed = s.statuses().into_iter().find(|(f, _)| f.url_param == "do_gtm").unwrap();
        assert!(!listed.1);
        s.location().assign("https://x.test/p?do_gtm=off").unwrap();
        s.toggle("do_gtm").unwrap();
        assert_eq!(s.location().href(), "https://x.test/p");
    }

    #[test]
    fn unknown_param_is_rejected_without_navigation() {
        let s = store("https://x.test/");
        let err = s.set_active("do_everything", true).unwrap_err();
        assert!(matches!(err, ToolboxError::UnknownOverride(_)));
        assert!(s.location().visits.borrow().is_empty());
    }

    #[test]
    fn clear_all_is_one_navigation() {
        let s = store("https://x.test/page?do_gtm=off");
        assert!(s.is_active("do_gtm"));
        assert!(!s.is_active("do_ct"));
        s.clear_all().unwrap();
        assert_eq!(*s.location().visits.borrow(), vec!["https://x.test/page".to_string()]);

        let s = store("https://x.test/page?do_bts=off&q=cars&do_tpi=off&do_oem=off#top");
        s.clear_all().unwrap();
        assert_eq!(s.location().visits.borrow().len(), 1);
        assert_eq!(s.location().href(), "https://x.test/page?q=cars#top");
    }

    #[test]
    fn statuses_follow_catalog_order() {
        let s = store("https://x.test/?do_tpi=off");
        let statuses = s.statuses();
        assert_eq!(statuses.len(), FEATURE_OVERRIDES.len());
        assert_eq!(statuses[0].0.url_param, "do_bts");
        assert!(statuses.iter().filter(|(_, on)| *on).all(|(f, _)| f.url_param == "do_tpi"));
    }

    #[test]
    fn refresh_sets_single_token() {
        let mut rng = StdRng::seed_from_u64(7);
        let s = store("https://x.test/inventory?make=ford#list");
        s.refresh(&mut rng).unwrap();
        s.refresh(&mut rng).unwrap();
        let url = Url::parse(&s.location().href()).unwrap();
        let tokens: Vec<_> = url.query_pairs().filter(|(k, _)| k == CACHE_BUST_PARAM).collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].1.len(), 5);
        assert!(tokens[0].1.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
        assert_eq!(url.fragment(), Some("list"));
    }

    #[test]
    fn garbage_href_reads_inactive() {
        let s = store("not a url");
        assert!(!s.is_active("do_gtm"));
        assert!(matches!(s.clear_all(), Err(ToolboxError::InvalidUrl(_))));
    }
}
