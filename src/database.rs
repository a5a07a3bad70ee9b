//! In-memory store of NEOs and their close approaches.

use std::collections::HashMap;
use tracing::{info, warn};

use crate::filters::Filter;
use crate::models::{CloseApproach, JoinRecord, NearEarthObject};

/// Owns both collections and the links between them.
#[derive(Debug)]
pub struct NeoDatabase {
    neos: Vec<NearEarthObject>,
    approaches: Vec<CloseApproach>,
    by_designation: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl NeoDatabase {
    /// Take ownership of the loaded collections and link each approach to its NEO.
    ///
    /// Approaches whose designation matches no NEO stay unlinked and are
    /// skipped by [`joined`](Self::joined) and [`query`](Self::query).
    pub fn new(mut neos: Vec<NearEarthObject>, mut approaches: Vec<CloseApproach>) -> Self {
        let mut by_designation = HashMap::with_capacity(neos.len());
        let mut by_name = HashMap::new();
        for (idx, neo) in neos.iter().enumerate() {
            if by_designation.insert(neo.designation.clone(), idx).is_some() {
                warn!(designation = %neo.designation, "duplicate designation; later row wins");
            }
            if let Some(name) = neo.name() {
                by_name.insert(name.to_string(), idx);
            }
        }

        let mut unlinked = 0usize;
        for (idx, approach) in approaches.iter_mut().enumerate() {
            match by_designation.get(&approach.designation) {
                Some(&neo_idx) => {
                    approach.neo = Some(neo_idx);
                    neos[neo_idx].approaches.push(idx);
                }
                None => unlinked += 1,
            }
        }
        if unlinked > 0 {
            warn!(unlinked, "close approaches with no matching NEO");
        }
        info!(
            neos = neos.len(),
            approaches = approaches.len(),
            "linked database"
        );

        Self {
            neos,
            approaches,
            by_designation,
            by_name,
        }
    }

    pub fn neos(&self) -> &[NearEarthObject] {
        &self.neos
    }

    pub fn approaches(&self) -> &[CloseApproach] {
        &self.approaches
    }

    /// Exact, case-sensitive lookup by primary designation.
    pub fn get_neo_by_designation(&self, designation: &str) -> Option<&NearEarthObject> {
        self.by_designation
            .get(designation)
            .map(|&idx| &self.neos[idx])
    }

    /// Exact lookup by IAU name. An empty name never matches.
    pub fn get_neo_by_name(&self, name: &str) -> Option<&NearEarthObject> {
        self.by_name.get(name).map(|&idx| &self.neos[idx])
    }

    /// The NEO a given approach belongs to, if linked.
    pub fn neo_for(&self, approach: &CloseApproach) -> Option<&NearEarthObject> {
        approach.neo.map(|idx| &self.neos[idx])
    }

    /// Approaches of `neo`, in load order.
    pub fn approaches_of<'a>(
        &'a self,
        neo: &'a NearEarthObject,
    ) -> impl Iterator<Item = &'a CloseApproach> + 'a {
        neo.approaches.iter().map(move |&idx| &self.approaches[idx])
    }

    /// Every linked approach paired with its NEO, in load order.
    pub fn joined(&self) -> impl Iterator<Item = JoinRecord<'_>> + '_ {
        self.approaches
            .iter()
            .filter_map(move |ca| self.neo_for(ca).map(|neo| JoinRecord::new(ca, neo)))
    }

    /// Linked approaches satisfying every filter, lazily, in load order.
    pub fn query<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> impl Iterator<Item = JoinRecord<'a>> + 'a {
        self.joined()
            .filter(move |join| filters.iter().all(|f| f.matches(join)))
    }
}
