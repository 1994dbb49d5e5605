//! Exported bucketizer state

use crate::ledger::RelationLedger;
use crate::options::BucketizerOptions;
use serde::{Deserialize, Serialize};

/// Snapshot of a [`Bucketizer`](crate::Bucketizer)
///
/// Importing a snapshot into a fresh bucketizer of the same strategy yields
/// the same output for every subsequent member as the exporting instance
/// would have produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketizerState<T> {
    /// Relation ledger
    pub hypermedia_controls: RelationLedger,

    /// Property path predicates (absent for strategies without a path)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_path_predicates: Option<Vec<String>>,

    /// Resolved options
    pub bucketizer_options: BucketizerOptions,

    /// Current fallback page
    pub bucketless_page_number: usize,

    /// Members in the current fallback page
    pub bucketless_page_member_counter: usize,

    /// Next blank node number
    #[serde(default)]
    pub blank_node_counter: u64,

    /// Strategy counters
    #[serde(flatten)]
    pub strategy: T,
}
