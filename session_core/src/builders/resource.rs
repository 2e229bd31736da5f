//! The resource page that closes every dose.

use std::collections::{BTreeMap, VecDeque};

use page_model::{Element, GroupRole, Page, PageGroup};

use crate::error::{BuildError, Result};
use crate::records::ResourceStatement;
use crate::rng::{channels, ShuffleRegistry};

/// Which pool a resource page is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Motivation,
    Tip,
    Regulation,
}

/// Rotating pools of post-dose resources for one population.
///
/// Drawing an item moves it to the back of its pool, so every item is shown
/// before any repeats.
#[derive(Debug, Clone, Default)]
pub struct ResourcePools {
    motivations: VecDeque<ResourceStatement>,
    tips: VecDeque<ResourceStatement>,
    regulation: BTreeMap<String, VecDeque<ResourceStatement>>,
}

impl ResourcePools {
    pub fn new(
        motivations: Vec<ResourceStatement>,
        tips: Vec<ResourceStatement>,
        regulation: BTreeMap<String, Vec<ResourceStatement>>,
    ) -> Self {
        Self {
            motivations: motivations.into(),
            tips: tips.into(),
            regulation: regulation
                .into_iter()
                .map(|(domain, items)| (domain, items.into()))
                .collect(),
        }
    }

    /// Pools with content for `domain`, in a fixed order.
    pub fn available(&self, domain: &str) -> Vec<ResourceKind> {
        let mut kinds = Vec::with_capacity(3);
        if !self.motivations.is_empty() {
            kinds.push(ResourceKind::Motivation);
        }
        if !self.tips.is_empty() {
            kinds.push(ResourceKind::Tip);
        }
        if self.regulation.get(domain).is_some_and(|pool| !pool.is_empty()) {
            kinds.push(ResourceKind::Regulation);
        }
        kinds
    }

    fn pool_mut(&mut self, kind: ResourceKind, domain: &str) -> Option<&mut VecDeque<ResourceStatement>> {
        match kind {
            ResourceKind::Motivation => Some(&mut self.motivations),
            ResourceKind::Tip => Some(&mut self.tips),
            ResourceKind::Regulation => self.regulation.get_mut(domain),
        }
    }

    /// Draw the next item of a pool, rotating it to the back.
    pub fn rotate(&mut self, kind: ResourceKind, domain: &str) -> Option<ResourceStatement> {
        let pool = self.pool_mut(kind, domain)?;
        let item = pool.pop_front()?;
        pool.push_back(item.clone());
        Some(item)
    }

    /// Build the resource group closing a dose of `domain`.
    ///
    /// The pool is picked uniformly among those with content on the
    /// `resources` channel.
    pub fn next_group(&mut self, domain: &str, rng: &mut ShuffleRegistry) -> Result<PageGroup> {
        let kinds = self.available(domain);
        if kinds.is_empty() {
            return Err(BuildError::EmptyResourcePools(domain.to_string()));
        }

        let kind = kinds[rng.pick_index(channels::RESOURCES, kinds.len())];
        let item = self
            .rotate(kind, domain)
            .ok_or_else(|| BuildError::EmptyResourcePools(domain.to_string()))?;

        Ok(PageGroup::new(GroupRole::Resource, vec![resource_page(kind, &item, domain)]))
    }
}

/// Render one resource item.
pub fn resource_page(kind: ResourceKind, item: &ResourceStatement, domain: &str) -> Page {
    match kind {
        ResourceKind::Motivation => Page::new("Reflection")
            .with_element(Element::text(format!("{} \n\n {}", item.label, item.text))),
        ResourceKind::Tip => Page::new("Apply to Daily Life: Make It Work for You!")
            .with_element(Element::text(item.text.clone()))
            .with_element(Element::named_entry(format!("{}_entry", item.label))),
        ResourceKind::Regulation => Page::new(format!("Manage Your Feelings: {}", domain))
            .with_element(Element::text(item.text.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statements(label: &str, count: usize) -> Vec<ResourceStatement> {
        (1..=count)
            .map(|n| ResourceStatement::new(format!("{} #{}", label, n), format!("text {}", n)))
            .collect()
    }

    #[test]
    fn test_rotation_wraps() {
        let mut pools = ResourcePools::new(statements("Motivational Statement", 2), Vec::new(), BTreeMap::new());

        let labels: Vec<String> = (0..3)
            .filter_map(|_| pools.rotate(ResourceKind::Motivation, "Finances"))
            .map(|item| item.label)
            .collect();
        assert_eq!(
            labels,
            vec!["Motivational Statement #1", "Motivational Statement #2", "Motivational Statement #1"]
        );
    }

    #[test]
    fn test_available_pools_depend_on_domain() {
        let mut regulation = BTreeMap::new();
        regulation.insert("Finances".to_string(), statements("Emotion Regulation Strategy", 1));
        let pools = ResourcePools::new(Vec::new(), statements("Tip", 1), regulation);

        assert_eq!(pools.available("Finances"), vec![ResourceKind::Tip, ResourceKind::Regulation]);
        assert_eq!(pools.available("Mental Health"), vec![ResourceKind::Tip]);
    }

    #[test]
    fn test_single_pool_is_always_chosen() {
        let mut pools = ResourcePools::new(Vec::new(), statements("Tip", 2), BTreeMap::new());
        let mut rng = ShuffleRegistry::default();

        let group = pools.next_group("Finances", &mut rng).unwrap();
        assert_eq!(group.role, GroupRole::Resource);
        let page = &group.pages()[0];
        assert_eq!(page.header_text.as_deref(), Some("Apply to Daily Life: Make It Work for You!"));
        assert_eq!(page.elements[1], Element::named_entry("Tip #1_entry"));
    }

    #[test]
    fn test_empty_pools_fail() {
        let mut pools = ResourcePools::default();
        let mut rng = ShuffleRegistry::default();
        assert!(matches!(
            pools.next_group("Finances", &mut rng),
            Err(BuildError::EmptyResourcePools(_))
        ));
    }

    #[test]
    fn test_page_texts() {
        let item = ResourceStatement::new("Motivational Statement #1", "Keep going.");
        let reflection = resource_page(ResourceKind::Motivation, &item, "Finances");
        assert_eq!(reflection.elements, vec![Element::text("Motivational Statement #1 \n\n Keep going.")]);

        let regulation = resource_page(ResourceKind::Regulation, &item, "Finances");
        assert_eq!(regulation.header_text.as_deref(), Some("Manage Your Feelings: Finances"));
    }
}
