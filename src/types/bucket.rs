use crate::error::{QuizError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketId {
    Feeling,
    Sensing,
    Intuition,
    Thinking,
}

impl BucketId {
    pub const ALL: [BucketId; 4] = [
        BucketId::Feeling,
        BucketId::Sensing,
        BucketId::Intuition,
        BucketId::Thinking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feeling => "feeling",
            Self::Sensing => "sensing",
            Self::Intuition => "intuition",
            Self::Thinking => "thinking",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Feeling => 0,
            Self::Sensing => 1,
            Self::Intuition => 2,
            Self::Thinking => 3,
        }
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketId {
    type Err = QuizError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "feeling" => Ok(Self::Feeling),
            "sensing" => Ok(Self::Sensing),
            "intuition" => Ok(Self::Intuition),
            "thinking" => Ok(Self::Thinking),
            _ => Err(QuizError::BucketNotFound(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub id: BucketId,
    pub name: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

static CATALOGUE: [Bucket; 4] = [
    Bucket {
        id: BucketId::Feeling,
        name: "Feeling",
        color: "#EF4444",
        description: "Emotional resonance, empathy, values-based decisions",
    },
    Bucket {
        id: BucketId::Sensing,
        name: "Sensing",
        color: "#10B981",
        description: "Concrete details, facts, practical focus",
    },
    Bucket {
        id: BucketId::Intuition,
        name: "Intuition",
        color: "#8B5CF6",
        description: "Abstract patterns, big picture, possibilities",
    },
    Bucket {
        id: BucketId::Thinking,
        name: "Thinking",
        color: "#3B82F6",
        description: "Logic, structure, analytical reasoning",
    },
];

pub fn all() -> &'static [Bucket; 4] {
    &CATALOGUE
}

pub fn get(id: BucketId) -> &'static Bucket {
    &CATALOGUE[id.index()]
}

pub fn lookup(id: &str) -> Result<&'static Bucket> {
    let id = id.parse::<BucketId>()?;
    Ok(get(id))
}

pub fn default_buckets() -> Vec<Bucket> {
    CATALOGUE.to_vec()
}
