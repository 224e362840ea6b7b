use serde::{Deserialize, Serialize};

/// Controls the order and the number of nodes the job is dispatched to at once.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type")]
pub enum Orchestrator {
    /// Runs on a random subset of the matched nodes.
    Subset { count: u64 },
    /// Runs on the nodes tier by tier, ordered by the node rank.
    RankTiered,
    /// Runs on at most the specified percentage of the matched nodes at once.
    MaxPercentage { percent: u64 },
    /// Runs on the nodes ordered by the value of the node attribute.
    HighestLowest {
        attribute: String,
        sort: OrchestratorSort,
    },
}

/// Sort direction of the attribute-ranked orchestrator.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Hash, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorSort {
    Highest,
    Lowest,
}

impl OrchestratorSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Highest => "highest",
            Self::Lowest => "lowest",
        }
    }
}
