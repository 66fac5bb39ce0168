//! The property roster and per-engine unknown trackers (ยง3 Data Model).

// Layer 1: Standard library
use std::collections::{BTreeMap, HashMap, HashSet};

// Layer 2: Third-party
// (none)

// Layer 3: Internal
use crate::config::DirectorConfig;
use crate::message::Message;
use crate::util::PropertyName;

/// Three disjoint sets partitioning the initial property list.
///
/// A property moves out of `remaining` into exactly one of `valid`,
/// `invalid`, or is dropped entirely when declared completely unknown
/// (there is no fourth "unknown" bucket -- dropping from `remaining`
/// *is* the unknown verdict, recorded by the writer rather than the
/// roster). Insertion order of the initial list is preserved: `valid`
/// and `invalid` are appended to in commit order, and `remaining`
/// preserves the original order of the properties still outstanding.
#[derive(Debug, Clone)]
pub struct PropertyRoster {
    remaining: Vec<PropertyName>,
    valid: Vec<PropertyName>,
    invalid: Vec<PropertyName>,
}

impl PropertyRoster {
    /// Seed the roster from the analysis specification's property list.
    pub fn new(initial: Vec<PropertyName>) -> Self {
        Self {
            remaining: initial,
            valid: Vec::new(),
            invalid: Vec::new(),
        }
    }

    /// Properties not yet settled.
    pub fn remaining(&self) -> &[PropertyName] {
        &self.remaining
    }

    /// Properties proven valid, in commit order.
    pub fn valid(&self) -> &[PropertyName] {
        &self.valid
    }

    /// Properties proven invalid, in commit order.
    pub fn invalid(&self) -> &[PropertyName] {
        &self.invalid
    }

    /// `true` once every initial property has settled or been dropped.
    pub fn is_empty_remaining(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Intersect `properties` with `remaining`, preserving the order of
    /// `properties` (ยง4.4.1 step 1, ยง4.4.2 step 1).
    pub fn intersect_remaining(&self, properties: &[PropertyName]) -> Vec<PropertyName> {
        properties
            .iter()
            .filter(|p| self.remaining.contains(p))
            .cloned()
            .collect()
    }

    /// Remove `properties` (already intersected with `remaining` by the
    /// caller) from `remaining` and append them to `valid`.
    pub fn commit_valid(&mut self, properties: &[PropertyName]) {
        self.remaining.retain(|p| !properties.contains(p));
        self.valid.extend(properties.iter().cloned());
    }

    /// Remove `properties` from `remaining` and append them to
    /// `invalid`.
    pub fn commit_invalid(&mut self, properties: &[PropertyName]) {
        self.remaining.retain(|p| !properties.contains(p));
        self.invalid.extend(properties.iter().cloned());
    }

    /// Remove `properties` from `remaining` without recording them
    /// anywhere else: the completely-unknown verdict (ยง4.4.4 step 3).
    pub fn drop_unknown(&mut self, properties: &[PropertyName]) {
        self.remaining.retain(|p| !properties.contains(p));
    }
}

/// Per-engine unknown tracking (ยง3 Data Model).
///
/// A property is *completely unknown* iff it appears in all three
/// structures. If a given engine is not configured, every initial
/// property is pre-seeded into its structure so it no longer gates the
/// completely-unknown predicate.
#[derive(Debug, Clone, Default)]
pub struct UnknownTrackers {
    bmc: HashMap<PropertyName, u32>,
    k_induction: HashSet<PropertyName>,
    pdr: HashSet<PropertyName>,
}

impl UnknownTrackers {
    /// Build trackers pre-seeded for every engine disabled in `config`.
    pub fn new(config: &DirectorConfig, initial_properties: &[PropertyName]) -> Self {
        let mut trackers = Self::default();
        if !config.bounded_model_checking {
            for property in initial_properties {
                trackers.bmc.insert(property.clone(), 0);
            }
        }
        if !config.k_induction {
            for property in initial_properties {
                trackers.k_induction.insert(property.clone());
            }
        }
        if !config.pdr_enabled() {
            for property in initial_properties {
                trackers.pdr.insert(property.clone());
            }
        }
        trackers
    }

    /// Record that BMC gave up on `properties` at `base_step`.
    pub fn mark_bmc_unknown(&mut self, properties: &[PropertyName], base_step: u32) {
        for property in properties {
            self.bmc.insert(property.clone(), base_step);
        }
    }

    /// Record that k-induction gave up on `properties`.
    pub fn mark_k_induction_unknown(&mut self, properties: &[PropertyName]) {
        for property in properties {
            self.k_induction.insert(property.clone());
        }
    }

    /// Record that PDR gave up on `properties`.
    pub fn mark_pdr_unknown(&mut self, properties: &[PropertyName]) {
        for property in properties {
            self.pdr.insert(property.clone());
        }
    }

    /// `true` iff every configured engine has given up on `property`.
    pub fn is_completely_unknown(&self, property: &PropertyName) -> bool {
        self.bmc.contains_key(property)
            && self.k_induction.contains(property)
            && self.pdr.contains(property)
    }

    /// The BMC base step recorded for `property`, if any.
    pub fn bmc_base_step(&self, property: &PropertyName) -> Option<u32> {
        self.bmc.get(property).copied()
    }

    /// Group the subset of `properties` that are now completely unknown
    /// by their recorded BMC base step (ยง4.4.4 step 2), in ascending
    /// base-step order.
    pub fn group_completely_unknown_by_base_step(
        &self,
        properties: &[PropertyName],
    ) -> BTreeMap<u32, Vec<PropertyName>> {
        let mut groups: BTreeMap<u32, Vec<PropertyName>> = BTreeMap::new();
        for property in properties {
            if self.is_completely_unknown(property) {
                let base_step = self.bmc_base_step(property).unwrap_or(0);
                groups.entry(base_step).or_default().push(property.clone());
            }
        }
        groups
    }
}

/// Mapping from property name to the most recent inductive-
/// counterexample message for that property (ยง3 Data Model). A plain
/// type alias rather than a newtype: the Director is the only reader
/// and writer, and the wrapped `HashMap` API is exactly what both sides
/// need.
pub type InductiveCounterexamples = HashMap<PropertyName, Message>;

#[cfg(test)]
mod tests {
    use super::*;

    fn names(strs: &[&str]) -> Vec<PropertyName> {
        strs.iter().map(|s| PropertyName::new(*s)).collect()
    }

    #[test]
    fn test_commit_valid_moves_property() {
        let mut roster = PropertyRoster::new(names(&["p1", "p2"]));
        let newly = roster.intersect_remaining(&names(&["p1"]));
        roster.commit_valid(&newly);
        assert_eq!(roster.valid(), names(&["p1"]).as_slice());
        assert_eq!(roster.remaining(), names(&["p2"]).as_slice());
    }

    #[test]
    fn test_duplicate_commit_is_empty_intersection() {
        let mut roster = PropertyRoster::new(names(&["p1", "p2"]));
        roster.commit_valid(&names(&["p1"]));
        let newly = roster.intersect_remaining(&names(&["p1"]));
        assert!(newly.is_empty());
    }

    #[test]
    fn test_roster_partition_stays_disjoint() {
        let mut roster = PropertyRoster::new(names(&["p1", "p2", "p3"]));
        roster.commit_valid(&names(&["p1"]));
        roster.commit_invalid(&names(&["p2"]));
        roster.drop_unknown(&names(&["p3"]));
        assert!(roster.is_empty_remaining());
        assert_eq!(roster.valid(), names(&["p1"]).as_slice());
        assert_eq!(roster.invalid(), names(&["p2"]).as_slice());
    }

    #[test]
    fn test_seed_disabled_engines() {
        let config = DirectorConfig::builder()
            .with_bounded_model_checking(true)
            .with_k_induction(false)
            .with_pdr_max(0)
            .build()
            .unwrap();
        let trackers = UnknownTrackers::new(&config, &names(&["p1"]));
        // BMC is enabled: not pre-seeded.
        assert_eq!(trackers.bmc_base_step(&PropertyName::new("p1")), None);
        // k-induction and PDR are disabled: pre-seeded.
        assert!(trackers.k_induction.contains(&PropertyName::new("p1")));
        assert!(trackers.pdr.contains(&PropertyName::new("p1")));
    }

    #[test]
    fn test_completely_unknown_requires_all_three() {
        let config = DirectorConfig::builder().with_bounded_model_checking(true).build().unwrap();
        let mut trackers = UnknownTrackers::new(&config, &[]);
        let p1 = PropertyName::new("p1");
        trackers.mark_bmc_unknown(&[p1.clone()], 5);
        assert!(!trackers.is_completely_unknown(&p1));
        trackers.mark_k_induction_unknown(&[p1.clone()]);
        assert!(!trackers.is_completely_unknown(&p1));
        trackers.mark_pdr_unknown(&[p1.clone()]);
        assert!(trackers.is_completely_unknown(&p1));
    }

    #[test]
    fn test_group_by_base_step() {
        let config = DirectorConfig::builder().with_bounded_model_checking(true).build().unwrap();
        let mut trackers = UnknownTrackers::new(&config, &[]);
        let p1 = PropertyName::new("p1");
        let p2 = PropertyName::new("p2");
        trackers.mark_bmc_unknown(&[p1.clone()], 5);
        trackers.mark_bmc_unknown(&[p2.clone()], 7);
        trackers.mark_k_induction_unknown(&[p1.clone(), p2.clone()]);
        trackers.mark_pdr_unknown(&[p1.clone(), p2.clone()]);

        let groups = trackers.group_completely_unknown_by_base_step(&[p1.clone(), p2.clone()]);
        assert_eq!(groups.get(&5), Some(&vec![p1]));
        assert_eq!(groups.get(&7), Some(&vec![p2]));
    }
}
