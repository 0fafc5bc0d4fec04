//! Producer/consumer literal occurrences and causal structures.

use std::collections::BTreeSet;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::plan::Literal;

/// Post-condition literal supplied by a specific operator instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Producer {
    /// Name of the producing operator instance.
    pub operator: String,
    /// Produced literal.
    pub literal: Literal,
}

impl Producer {
    /// Pairs an operator instance with one of its post-conditions.
    pub fn new(operator: impl Into<String>, literal: Literal) -> Self {
        Self {
            operator: operator.into(),
            literal,
        }
    }
}

impl Display for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operator, self.literal)
    }
}

/// Pre-condition literal required by a specific operator instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Consumer {
    /// Name of the consuming operator instance.
    pub operator: String,
    /// Consumed literal.
    pub literal: Literal,
}

impl Consumer {
    /// Pairs an operator instance with one of its pre-conditions.
    pub fn new(operator: impl Into<String>, literal: Literal) -> Self {
        Self {
            operator: operator.into(),
            literal,
        }
    }
}

impl Display for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.operator, self.literal)
    }
}

/// Causal link from a producer to a consumer it supports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PcLink {
    /// Supporting producer.
    pub producer: Producer,
    /// Supported consumer.
    pub consumer: Consumer,
}

impl PcLink {
    /// Creates a causal link.
    pub fn new(producer: Producer, consumer: Consumer) -> Self {
        Self { producer, consumer }
    }
}

impl Display for PcLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.producer, self.consumer)
    }
}

/// Set of producer/consumer options justifying a partial-order plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CausalStructure {
    ground: bool,
    links: BTreeSet<PcLink>,
}

impl CausalStructure {
    /// Creates an empty structure.
    pub fn new(ground: bool) -> Self {
        Self {
            ground,
            links: BTreeSet::new(),
        }
    }

    /// Whether the structure ranges over ground operators.
    pub fn is_ground(&self) -> bool {
        self.ground
    }

    /// Adds a link, returning `false` when it was already present.
    pub fn add_link(&mut self, link: PcLink) -> bool {
        self.links.insert(link)
    }

    /// Removes a link, returning `false` when it was absent.
    pub fn remove_link(&mut self, link: &PcLink) -> bool {
        self.links.remove(link)
    }

    /// Whether the link is present.
    pub fn contains(&self, link: &PcLink) -> bool {
        self.links.contains(link)
    }

    /// Producers that may support `consumer`.
    pub fn producers_of(&self, consumer: &Consumer) -> BTreeSet<&Producer> {
        self.links
            .iter()
            .filter(|link| &link.consumer == consumer)
            .map(|link| &link.producer)
            .collect()
    }

    /// Consumers that `producer` may support.
    pub fn consumers_of(&self, producer: &Producer) -> BTreeSet<&Consumer> {
        self.links
            .iter()
            .filter(|link| &link.producer == producer)
            .map(|link| &link.consumer)
            .collect()
    }

    /// Iterates over all links in order.
    pub fn links(&self) -> impl Iterator<Item = &PcLink> + '_ {
        self.links.iter()
    }

    /// Number of links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the structure holds no links.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl FromIterator<PcLink> for CausalStructure {
    fn from_iter<I: IntoIterator<Item = PcLink>>(iter: I) -> Self {
        Self {
            ground: false,
            links: iter.into_iter().collect(),
        }
    }
}
