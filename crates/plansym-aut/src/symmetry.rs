use std::collections::BTreeMap;

use plansym_core::{
    CausalStructure, Consumer, ErrorInfo, Operator, PartialPlan, PcLink, Producer, SymError,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::encoder::PlanEncoding;
use crate::permutation::Permutation;
use crate::result::AutomorphismResult;

/// Involutive relabelling of producers and consumers. Anything absent from
/// the maps is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SymmetryMaps", into = "SymmetryMaps")]
pub struct CausalSymmetry {
    producers: BTreeMap<Producer, Producer>,
    consumers: BTreeMap<Consumer, Consumer>,
}

/// Serialized form: JSON maps cannot have structured keys.
#[derive(Serialize, Deserialize)]
struct SymmetryMaps {
    producers: Vec<(Producer, Producer)>,
    consumers: Vec<(Consumer, Consumer)>,
}

impl TryFrom<SymmetryMaps> for CausalSymmetry {
    type Error = SymError;

    fn try_from(maps: SymmetryMaps) -> Result<Self, Self::Error> {
        let producers = maps.producers.into_iter().collect();
        let consumers = maps.consumers.into_iter().collect();
        CausalSymmetry::new(producers, consumers).ok_or_else(|| {
            SymError::InvalidBijection(ErrorInfo::new(
                "not-involution",
                "symmetry maps are not self-inverse",
            ))
        })
    }
}

impl From<CausalSymmetry> for SymmetryMaps {
    fn from(symmetry: CausalSymmetry) -> Self {
        Self {
            producers: symmetry.producers.into_iter().collect(),
            consumers: symmetry.consumers.into_iter().collect(),
        }
    }
}

/// Whether `map[map[x]] == x` for every key `x`; a key whose image is not a
/// key must map to itself.
pub fn is_involution<K: Ord>(map: &BTreeMap<K, K>) -> bool {
    map.iter().all(|(key, image)| match map.get(image) {
        Some(back) => back == key,
        None => image == key,
    })
}

impl CausalSymmetry {
    /// Checks both maps for the involution property.
    pub fn is_cs_symmetry(
        producers: &BTreeMap<Producer, Producer>,
        consumers: &BTreeMap<Consumer, Consumer>,
    ) -> bool {
        is_involution(producers) && is_involution(consumers)
    }

    /// Builds a symmetry, or `None` when either map is not an involution.
    pub fn new(
        producers: BTreeMap<Producer, Producer>,
        consumers: BTreeMap<Consumer, Consumer>,
    ) -> Option<Self> {
        Self::is_cs_symmetry(&producers, &consumers).then_some(Self {
            producers,
            consumers,
        })
    }

    /// Restricts a graph automorphism to the literal-head vertices of
    /// `encoding`.
    ///
    /// Returns `None` when the permutation moves no producer or consumer,
    /// when it sends one onto a vertex of another kind, or when the
    /// restriction is not an involution.
    pub fn from_automorphism(perm: &Permutation, encoding: &PlanEncoding) -> Option<Self> {
        let mut producers = BTreeMap::new();
        let mut consumers = BTreeMap::new();
        for v in perm.moved_points() {
            let image = perm.apply(v);
            if let Some(producer) = encoding.producer(v) {
                let target = encoding.producer(image)?;
                producers.insert(producer.clone(), target.clone());
                producers.insert(target.clone(), producer.clone());
            } else if let Some(consumer) = encoding.consumer(v) {
                let target = encoding.consumer(image)?;
                consumers.insert(consumer.clone(), target.clone());
                consumers.insert(target.clone(), consumer.clone());
            }
        }
        if producers.is_empty() && consumers.is_empty() {
            return None;
        }
        Self::new(producers, consumers)
    }

    /// Image of `producer`.
    pub fn permute_producer<'a>(&'a self, producer: &'a Producer) -> &'a Producer {
        self.producers.get(producer).unwrap_or(producer)
    }

    /// Image of `consumer`.
    pub fn permute_consumer<'a>(&'a self, consumer: &'a Consumer) -> &'a Consumer {
        self.consumers.get(consumer).unwrap_or(consumer)
    }

    /// Link with both endpoints relabelled.
    pub fn permute_link(&self, link: &PcLink) -> PcLink {
        PcLink::new(
            self.permute_producer(&link.producer).clone(),
            self.permute_consumer(&link.consumer).clone(),
        )
    }

    /// Structure with every link relabelled.
    pub fn permute_structure(&self, structure: &CausalStructure) -> CausalStructure {
        let mut permuted = CausalStructure::new(structure.is_ground());
        for link in structure.links() {
            permuted.add_link(self.permute_link(link));
        }
        permuted
    }

    /// Producers moved by the symmetry.
    pub fn producer_domain(&self) -> impl Iterator<Item = &Producer> + '_ {
        self.producers.keys()
    }

    /// Consumers moved by the symmetry.
    pub fn consumer_domain(&self) -> impl Iterator<Item = &Consumer> + '_ {
        self.consumers.keys()
    }

    /// Producer relabelling.
    pub fn producer_map(&self) -> &BTreeMap<Producer, Producer> {
        &self.producers
    }

    /// Consumer relabelling.
    pub fn consumer_map(&self) -> &BTreeMap<Consumer, Consumer> {
        &self.consumers
    }
}

/// Symmetries recovered from the generators of an automorphism group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutomorphismSymmetries {
    /// Accepted symmetries in generator order.
    pub symmetries: Vec<CausalSymmetry>,
    /// Generators that touched literal heads but failed validation.
    pub rejected: usize,
    /// Generators that moved no literal head.
    pub inert: usize,
}

/// Converts every non-identity generator of `result` into a causal symmetry,
/// dropping the ones that do not validate.
pub fn automorphism_symmetries(
    result: &AutomorphismResult,
    encoding: &PlanEncoding,
) -> AutomorphismSymmetries {
    let mut harvest = AutomorphismSymmetries::default();
    for (idx, perm) in result.group().generators().iter().enumerate() {
        if perm.is_identity() {
            continue;
        }
        let touches_heads = perm
            .moved_points()
            .any(|v| encoding.producer(v).is_some() || encoding.consumer(v).is_some());
        if !touches_heads {
            harvest.inert += 1;
            continue;
        }
        match CausalSymmetry::from_automorphism(perm, encoding) {
            Some(symmetry) => harvest.symmetries.push(symmetry),
            None => {
                debug!(generator = idx, cycles = %perm, "generator is not a causal symmetry");
                harvest.rejected += 1;
            }
        }
    }
    harvest
}

/// Symmetries swapping the conditions of consecutive steps of one schema.
///
/// Steps are grouped by schema in plan order; for each consecutive pair the
/// post-conditions are swapped pairwise as producers and the pre-conditions
/// pairwise as consumers, matched by declaration order.
pub fn schema_swap_symmetries(plan: &PartialPlan) -> Vec<CausalSymmetry> {
    let mut by_schema: BTreeMap<&str, Vec<&Operator>> = BTreeMap::new();
    for step in &plan.steps {
        by_schema.entry(step.schema()).or_default().push(step);
    }
    let mut symmetries = Vec::new();
    for (schema, steps) in &by_schema {
        for pair in steps.windows(2) {
            let (first, second) = (pair[0], pair[1]);
            let mut producers = BTreeMap::new();
            for (a, b) in first.producers().zip(second.producers()) {
                producers.insert(a.clone(), b.clone());
                producers.insert(b, a);
            }
            let mut consumers = BTreeMap::new();
            for (a, b) in first.consumers().zip(second.consumers()) {
                consumers.insert(a.clone(), b.clone());
                consumers.insert(b, a);
            }
            match CausalSymmetry::new(producers, consumers) {
                Some(symmetry) => symmetries.push(symmetry),
                None => debug!(
                    schema = *schema,
                    first = %first.name,
                    second = %second.name,
                    "schema swap is not a causal symmetry"
                ),
            }
        }
    }
    symmetries
}
