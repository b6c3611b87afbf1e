//! Size estimates for cached values.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::Resource;

/// Rough in-memory footprint of a value, in bytes.
///
/// Only needs to be proportional to the real cost; the cache uses it to keep
/// its total under budget.
pub trait Weigh {
    fn approx_bytes(&self) -> usize;
}

impl Weigh for String {
    fn approx_bytes(&self) -> usize {
        self.len()
    }
}

impl<T: Weigh> Weigh for Option<T> {
    fn approx_bytes(&self) -> usize {
        self.as_ref().map(Weigh::approx_bytes).unwrap_or(0)
    }
}

impl<T: Weigh> Weigh for Vec<T> {
    fn approx_bytes(&self) -> usize {
        self.iter()
            .fold(16usize, |total, item| total.saturating_add(item.approx_bytes()))
    }
}

impl<T: Weigh> Weigh for Arc<T> {
    fn approx_bytes(&self) -> usize {
        self.as_ref().approx_bytes()
    }
}

impl Weigh for BTreeMap<String, String> {
    fn approx_bytes(&self) -> usize {
        self.iter().fold(0usize, |total, (key, value)| {
            total.saturating_add(key.len()).saturating_add(value.len())
        })
    }
}

impl Weigh for Resource {
    fn approx_bytes(&self) -> usize {
        32usize
            .saturating_add(self.project_id.len())
            .saturating_add(self.name.len())
            .saturating_add(self.display_name.approx_bytes())
            .saturating_add(self.location.approx_bytes())
            .saturating_add(self.parent.approx_bytes())
            .saturating_add(self.status.approx_bytes())
            .saturating_add(self.labels.approx_bytes())
            .saturating_add(if self.created_at.is_some() { 12 } else { 0 })
    }
}
