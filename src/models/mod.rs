pub mod approach;
pub mod neo;

pub use approach::CloseApproach;
pub use neo::NearEarthObject;

/// Auxiliary source columns carried alongside an entity, uninterpreted.
pub type Extra = std::collections::BTreeMap<String, String>;

/// A close approach paired with the NEO it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct JoinRecord<'a> {
    pub approach: &'a CloseApproach,
    pub neo: &'a NearEarthObject,
}

impl<'a> JoinRecord<'a> {
    pub fn new(approach: &'a CloseApproach, neo: &'a NearEarthObject) -> Self {
        Self { approach, neo }
    }
}
