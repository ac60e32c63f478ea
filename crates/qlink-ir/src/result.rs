//! Framework result schema produced from finished jobs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Measurement counts keyed by classical bitstring (highest bit first).
pub type Counts = BTreeMap<String, u64>;

/// Data section of an experiment result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResultData {
    /// Measurement counts.
    pub counts: Counts,
}

/// Result of one experiment of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Shots requested for the experiment.
    pub shots: u32,
    /// Whether the experiment's task completed.
    pub success: bool,
    /// Experiment header, echoed from the batch.
    pub header: Map<String, Value>,
    /// Final state of the experiment's task.
    pub status: String,
    /// Measurement data.
    pub data: ExperimentResultData,
}

/// Aggregated result of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QobjResult {
    /// Device name.
    pub backend_name: String,
    /// Device version.
    pub backend_version: String,
    /// Batch identifier.
    pub qobj_id: String,
    /// Job identifier.
    pub job_id: String,
    /// Whether the job finished successfully.
    pub success: bool,
    /// Job status at the time the result was assembled.
    pub status: String,
    /// Per-experiment results, in batch order.
    pub results: Vec<ExperimentResult>,
}

impl QobjResult {
    /// Counts of the experiment at `index`.
    pub fn counts(&self, index: usize) -> Option<&Counts> {
        self.results.get(index).map(|r| &r.data.counts)
    }

    /// Counts of the experiment whose header carries `name`.
    pub fn counts_by_name(&self, name: &str) -> Option<&Counts> {
        self.results
            .iter()
            .find(|r| r.header.get("name").and_then(Value::as_str) == Some(name))
            .map(|r| &r.data.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_lookup() {
        let mut header = Map::new();
        header.insert("name".into(), Value::from("bell"));
        let result = QobjResult {
            backend_name: "SV1".into(),
            backend_version: "arn".into(),
            qobj_id: "q".into(),
            job_id: "q".into(),
            success: true,
            status: "DONE".into(),
            results: vec![ExperimentResult {
                shots: 10,
                success: true,
                header,
                status: "COMPLETED".into(),
                data: ExperimentResultData {
                    counts: Counts::from([("00".to_string(), 6), ("11".to_string(), 4)]),
                },
            }],
        };

        assert_eq!(result.counts(0).unwrap()["00"], 6);
        assert_eq!(result.counts_by_name("bell"), result.counts(0));
        assert!(result.counts(1).is_none());
        assert!(result.counts_by_name("ghz").is_none());
    }
}
