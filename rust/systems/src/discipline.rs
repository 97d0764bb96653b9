// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Discipline classification and the per-discipline grouping strategy.
//!
//! Duct and piping systems group their members as
//! `classification → system → system type`, matching end elements through the
//! comma-separated system name list. Electrical circuits skip the system level
//! (the classification node acts as the system) and nest one extra grouping
//! level, `system type → circuit number`, matching end elements by circuit
//! number.

use mep_systems_core::SourceElement;
use std::fmt;

use crate::config::SystemsConfig;

/// Family name of duct system types.
pub const DUCT_SYSTEM_FAMILY: &str = "Duct System";
/// Family name of piping system types.
pub const PIPING_SYSTEM_FAMILY: &str = "Piping System";

/// Top-level classification of a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Discipline {
    Mechanical,
    Piping,
    Electrical,
}

impl Discipline {
    /// Classifies a system by its family name.
    ///
    /// Only duct and piping families are recognized; everything else,
    /// including a missing family name, is electrical because circuits are the
    /// only other category searched for systems.
    pub fn classify(family_name: Option<&str>) -> Self {
        match family_name {
            Some(DUCT_SYSTEM_FAMILY) => Discipline::Mechanical,
            Some(PIPING_SYSTEM_FAMILY) => Discipline::Piping,
            _ => Discipline::Electrical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Discipline::Mechanical => "Mechanical",
            Discipline::Piping => "Piping",
            Discipline::Electrical => "Electrical",
        }
    }

    pub fn strategy(self) -> &'static DisciplineStrategy {
        match self {
            Discipline::Mechanical | Discipline::Piping => &DISTRIBUTION,
            Discipline::Electrical => &CIRCUITS,
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership attributes a strategy can group or match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberProperty {
    SystemType,
    SystemName,
    CircuitNumber,
}

impl MemberProperty {
    /// Resolves the configured attribute name.
    pub fn name(self, config: &SystemsConfig) -> &str {
        match self {
            MemberProperty::SystemType => &config.system_type_property,
            MemberProperty::SystemName => &config.system_name_property,
            MemberProperty::CircuitNumber => &config.circuit_number_property,
        }
    }

    /// Value of this attribute on `element`.
    ///
    /// An absent attribute is `None`, which is distinct from a present empty
    /// value: both group under the empty name, but only a present value can
    /// match end elements.
    pub fn key<'a>(self, element: &'a SourceElement, config: &SystemsConfig) -> Option<&'a str> {
        element.property(self.name(config))
    }
}

/// How leaf elements are attached to the innermost grouping node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndElementMatch {
    /// The attribute holds a separated list; one token must equal the key.
    ListToken(MemberProperty),
    /// The attribute must equal the key.
    Exact(MemberProperty),
}

impl EndElementMatch {
    pub fn matches(&self, leaf: &SourceElement, key: &str, config: &SystemsConfig) -> bool {
        match *self {
            EndElementMatch::ListToken(property) => leaf
                .has_property_where(property.name(config), |value| {
                    value.split(config.list_separator).any(|token| token == key)
                }),
            EndElementMatch::Exact(property) => {
                leaf.has_property_where(property.name(config), |value| value == key)
            }
        }
    }
}

/// Grouping rules for one discipline.
#[derive(Debug, PartialEq, Eq)]
pub struct DisciplineStrategy {
    /// Whether systems get their own node below the classification.
    pub system_level: bool,
    /// Member attribute keying the system-type level.
    pub grouping_property: MemberProperty,
    /// Member attribute keying an extra level below the system type.
    pub circuit_property: Option<MemberProperty>,
    pub end_element_match: EndElementMatch,
}

impl DisciplineStrategy {
    /// Number of grouping levels between the system node and end elements.
    pub fn grouping_levels(&self) -> usize {
        1 + usize::from(self.circuit_property.is_some())
    }
}

static DISTRIBUTION: DisciplineStrategy = DisciplineStrategy {
    system_level: true,
    grouping_property: MemberProperty::SystemName,
    circuit_property: None,
    end_element_match: EndElementMatch::ListToken(MemberProperty::SystemName),
};

static CIRCUITS: DisciplineStrategy = DisciplineStrategy {
    system_level: false,
    grouping_property: MemberProperty::SystemType,
    circuit_property: Some(MemberProperty::CircuitNumber),
    end_element_match: EndElementMatch::Exact(MemberProperty::CircuitNumber),
};

#[cfg(test)]
mod tests {
    use super::*;
    use mep_systems_core::Property;

    #[test]
    fn classification_is_total() {
        assert_eq!(Discipline::classify(Some("Duct System")), Discipline::Mechanical);
        assert_eq!(Discipline::classify(Some("Piping System")), Discipline::Piping);
        assert_eq!(Discipline::classify(Some("Circuit")), Discipline::Electrical);
        assert_eq!(Discipline::classify(Some("")), Discipline::Electrical);
        assert_eq!(Discipline::classify(None), Discipline::Electrical);
    }

    #[test]
    fn classification_is_exact() {
        assert_eq!(Discipline::classify(Some("duct system")), Discipline::Electrical);
        assert_eq!(Discipline::classify(Some("Duct Systems")), Discipline::Electrical);
        assert_eq!(Discipline::classify(Some(" Piping System")), Discipline::Electrical);
    }

    #[test]
    fn electrical_nests_one_more_level() {
        let mechanical = Discipline::Mechanical.strategy();
        let electrical = Discipline::Electrical.strategy();
        assert_eq!(electrical.grouping_levels(), mechanical.grouping_levels() + 1);
        assert!(mechanical.system_level);
        assert!(!electrical.system_level);
        assert_eq!(Discipline::Piping.strategy(), mechanical);
    }

    #[test]
    fn list_token_matching_splits_on_separator() {
        let config = SystemsConfig::default();
        let leaf = SourceElement::new(1, "Duct [1]")
            .with_property(Property::new("System Name", "Supply Air,Return Air"));
        let rule = Discipline::Mechanical.strategy().end_element_match;

        assert!(rule.matches(&leaf, "Supply Air", &config));
        assert!(rule.matches(&leaf, "Return Air", &config));
        assert!(!rule.matches(&leaf, "Supply", &config));
        assert!(!rule.matches(&leaf, "Supply Air,Return Air ", &config));
    }

    #[test]
    fn tokens_are_not_trimmed() {
        let config = SystemsConfig::default();
        let leaf = SourceElement::new(1, "Duct [1]")
            .with_property(Property::new("System Name", "Supply Air, Return Air"));
        let rule = Discipline::Mechanical.strategy().end_element_match;
        assert!(rule.matches(&leaf, " Return Air", &config));
        assert!(!rule.matches(&leaf, "Return Air", &config));
    }

    #[test]
    fn exact_matching_uses_circuit_number() {
        let config = SystemsConfig::default();
        let leaf = SourceElement::new(1, "Receptacle [1]")
            .with_property(Property::new("Circuit Number", "C1"))
            .with_property(Property::new("System Name", "C1,C2"));
        let rule = Discipline::Electrical.strategy().end_element_match;

        assert!(rule.matches(&leaf, "C1", &config));
        assert!(!rule.matches(&leaf, "C2", &config));
    }

    #[test]
    fn missing_member_property_has_no_key() {
        let config = SystemsConfig::default();
        let member = SourceElement::new(1, "Duct [1]");
        assert_eq!(MemberProperty::SystemName.key(&member, &config), None);

        let blank = member.with_property(Property::new("System Name", ""));
        assert_eq!(MemberProperty::SystemName.key(&blank, &config), Some(""));
    }
}
