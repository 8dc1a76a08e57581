//! Matching items against the current request and marking them active.

use std::collections::HashSet;

use regex::Regex;
use tracing::trace;
use url::Url;

use super::Builder;
use crate::config::ActiveElement;
use crate::error::{MenuError, MenuResult};

impl Builder {
    /// Activate the item at `index` when its URL matches the request.
    ///
    /// Raw items, items without a resolvable URL, and items created with
    /// URL activation disabled are skipped.
    pub(crate) fn check_activation_status(&mut self, index: usize) -> MenuResult<()> {
        let item = &self.items[index];
        if item.disable_activation_by_url || item.link.is_none() {
            return Ok(());
        }
        let Some(url) = self.url_of(item) else {
            return Ok(());
        };

        let request = &self.context.request;
        let matched = if self.conf.restful {
            self.restful_match(&url)
        } else {
            url == request.url || url == request.full_url
        };

        if matched {
            trace!(menu = %self.name, id = %item.id, url = %url, "item matches current request");
            self.activate(index, false)?;
        }
        Ok(())
    }

    /// Prefix comparison of the item's path against the request path, after
    /// stripping the first matching rest base from each.
    fn restful_match(&self, url: &str) -> bool {
        let bases = self.conf.rest_base.alternatives();
        let item_path = url_path(url);
        let item_path = strip_rest_base(item_path.trim_start_matches('/'), &bases);
        let request_path = strip_rest_base(
            self.context.request.path.trim_start_matches('/'),
            &bases,
        );

        request_path == item_path
            || request_path
                .strip_prefix(item_path)
                .and_then(|rest| rest.strip_prefix('/'))
                .is_some_and(|rest| !rest.is_empty())
    }

    /// Apply the active class to the item at `index` and, when enabled, to
    /// each of its ancestors.
    ///
    /// Only the starting item gets the exact-match marker, and only when
    /// this is not itself a recursive call.
    pub(crate) fn activate(&mut self, index: usize, recursion: bool) -> MenuResult<()> {
        let class = self.conf.active_class.clone();
        let mut seen = HashSet::new();
        let mut exact = !recursion;
        let mut current = Some(index);

        while let Some(i) = current {
            if !seen.insert(i) {
                return Err(MenuError::ParentCycle {
                    menu: self.name.clone(),
                    id: self.items[index].id.clone(),
                });
            }

            let item = &mut self.items[i];
            match self.conf.active_element {
                ActiveElement::Item => item.mark_active(&class),
                ActiveElement::Link => {
                    if let Some(link) = item.link.as_mut() {
                        link.mark_active(&class);
                    }
                }
            }
            if exact {
                item.active = true;
                exact = false;
            }

            if !self.conf.activate_parents {
                break;
            }
            current = self.items[i]
                .parent
                .as_deref()
                .and_then(|parent| self.index_of(parent));
        }
        Ok(())
    }

    /// Whether the request path matches a glob-like `pattern`.
    pub(crate) fn request_matches(&self, pattern: &str) -> MenuResult<bool> {
        let regex = pattern_regex(pattern)?;
        Ok(regex.is_match(self.context.request.path.trim_matches('/')))
    }
}

/// Path component of a URL; relative references lose query and fragment.
fn url_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

fn strip_rest_base<'p>(path: &'p str, bases: &[&str]) -> &'p str {
    bases
        .iter()
        .find_map(|base| path.strip_prefix(base).and_then(|rest| rest.strip_prefix('/')))
        .unwrap_or(path)
}

/// Translate an activation pattern into an anchored regex.
///
/// Pattern: "/blog/*"
/// Regex: "^(?:blog(/.*)?)\z"
fn pattern_regex(pattern: &str) -> MenuResult<Regex> {
    let body = pattern
        .trim_start_matches('/')
        .split("/*")
        .map(|piece| {
            piece
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(".*")
        })
        .collect::<Vec<_>>()
        .join("(/.*)?");

    Regex::new(&format!(r"^(?:{body})\z")).map_err(|e| MenuError::InvalidPattern {
        pattern: pattern.to_string(),
        details: e.to_string(),
    })
}
