use serde::{Deserialize, Serialize};

use super::ElementId;

/// A grouping layer over other elements.
///
/// The group only references its children by id: the children stay in
/// the scene's element list and keep their own geometry. Dissolving the
/// group therefore restores each child untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupElement {
    pub children: Vec<ElementId>,
}

impl GroupElement {
    pub fn new(children: Vec<ElementId>) -> Self {
        Self { children }
    }
}
