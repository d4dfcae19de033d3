use std::cmp::Ordering;

use super::model::JobRecord;

/// Ordering applied to a matched set before windowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// `createdAt` descending.
    #[default]
    Latest,
    /// `createdAt` ascending.
    Oldest,
    /// `position` ascending.
    AToZ,
    /// `position` descending.
    ZToA,
    /// Whatever order the store returns.
    Natural,
}

impl SortOrder {
    /// Absent token means `latest`; an unrecognized one means no sort.
    pub fn resolve(token: Option<&str>) -> Self {
        match token {
            None | Some("") | Some("latest") => SortOrder::Latest,
            Some("oldest") => SortOrder::Oldest,
            Some("a-z") => SortOrder::AToZ,
            Some("z-a") => SortOrder::ZToA,
            Some(_) => SortOrder::Natural,
        }
    }

    /// `ORDER BY` clause for the Postgres store, `None` for natural order.
    pub fn sql(&self) -> Option<&'static str> {
        match self {
            SortOrder::Latest => Some("created_at DESC"),
            SortOrder::Oldest => Some("created_at ASC"),
            SortOrder::AToZ => Some(r#"position COLLATE "C" ASC"#),
            SortOrder::ZToA => Some(r#"position COLLATE "C" DESC"#),
            SortOrder::Natural => None,
        }
    }

    pub fn compare(&self, a: &JobRecord, b: &JobRecord) -> Ordering {
        match self {
            SortOrder::Latest => b.created_at.cmp(&a.created_at),
            SortOrder::Oldest => a.created_at.cmp(&b.created_at),
            SortOrder::AToZ => a.position.cmp(&b.position),
            SortOrder::ZToA => b.position.cmp(&a.position),
            SortOrder::Natural => Ordering::Equal,
        }
    }

    /// Stable in-place sort; ties keep their incoming order.
    pub fn apply(&self, jobs: &mut [JobRecord]) {
        if *self != SortOrder::Natural {
            jobs.sort_by(|a, b| self.compare(a, b));
        }
    }
}
