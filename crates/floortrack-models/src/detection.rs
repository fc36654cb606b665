use crate::bbox::Bbox;
use serde::{Deserialize, Serialize};

/// Object class id as returned by the detector adapter. The core only
/// considers [`ClassId::PERSON`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassId(pub u32);

impl ClassId {
    pub const PERSON: ClassId = ClassId(0);

    pub fn is_person(self) -> bool {
        self == Self::PERSON
    }
}

/// One per-frame detection as produced by the (external) detector adapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: Bbox,
    pub confidence: f64,
    pub class_id: ClassId,
}

impl Detection {
    pub fn new(bbox: Bbox, confidence: f64, class_id: ClassId) -> Self {
        Self {
            bbox,
            confidence,
            class_id,
        }
    }

    pub fn is_person(&self) -> bool {
        self.class_id.is_person()
    }
}
