//! Page groups and doses.

use serde::{Deserialize, Serialize};

use super::Page;

/// What a group of pages represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupRole {
    /// A short word-puzzle scenario.
    Scenario,
    LongScenario,
    WriteYourOwn,
    /// The resource page closing every dose.
    Resource,
    Survey,
}

/// Pages belonging to one scenario, resource or survey unit.
///
/// Every page of a group carries the same scenario ordinal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGroup {
    pub role: GroupRole,
    pages: Vec<Page>,
}

impl PageGroup {
    /// Create a group of pages without a scenario ordinal.
    pub fn new(role: GroupRole, pages: Vec<Page>) -> Self {
        let mut group = Self { role, pages };
        group.stamp(None, None);
        group
    }

    /// Create a scenario group, stamping the ordinal and kind tag on every page.
    pub fn scenario(ordinal: usize, kind: Option<String>, pages: Vec<Page>) -> Self {
        let mut group = Self {
            role: GroupRole::Scenario,
            pages,
        };
        group.stamp(Some(ordinal), kind);
        group
    }

    fn stamp(&mut self, ordinal: Option<usize>, kind: Option<String>) {
        for page in &mut self.pages {
            page.scenario = ordinal;
            if kind.is_some() {
                page.kind = kind.clone();
            }
        }
    }

    /// The scenario ordinal shared by the pages.
    pub fn ordinal(&self) -> Option<usize> {
        self.pages.first().and_then(|page| page.scenario)
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> impl Iterator<Item = &mut Page> {
        self.pages.iter_mut()
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// How a dose came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoseKind {
    /// A batch of short scenarios.
    Regular,
    /// A long scenario interleaved by cadence.
    LongScenario,
    WriteYourOwn,
}

/// One delivery session a user completes in one sitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dose {
    /// 1-indexed position within its domain.
    pub ordinal: usize,
    pub kind: DoseKind,
    pub groups: Vec<PageGroup>,
}

impl Dose {
    /// Create a dose from its groups.
    pub fn new(ordinal: usize, kind: DoseKind, groups: Vec<PageGroup>) -> Self {
        Self {
            ordinal,
            kind,
            groups,
        }
    }

    /// Append a group at the end of the dose.
    pub fn push_group(&mut self, group: PageGroup) {
        self.groups.push(group);
    }

    /// All pages in order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.groups.iter().flat_map(|group| group.pages().iter())
    }

    /// Mutable access to the page at a flat index.
    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.groups
            .iter_mut()
            .flat_map(|group| group.pages_mut())
            .nth(index)
    }

    /// Total number of pages.
    pub fn page_count(&self) -> usize {
        self.groups.iter().map(PageGroup::len).sum()
    }

    /// Count groups with a given role.
    pub fn count_role(&self, role: GroupRole) -> usize {
        self.groups.iter().filter(|group| group.role == role).count()
    }

    /// Flatten into the page sequence the app reads.
    pub fn into_pages(self) -> Vec<Page> {
        self.groups
            .into_iter()
            .flat_map(PageGroup::into_pages)
            .collect()
    }
}
