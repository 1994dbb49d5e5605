//! Basic sequential paging.
//!
//! Members fill page `0` until it holds `pageSize` members, then page `1`,
//! and so on. Each new page is linked from the previous one. The property
//! path is not used.

use ldes_bucketizer_core::{
    BucketAssignment, BucketStrategy, Bucketizer, BucketizerCore, BucketizerOptions, Relation,
    Result,
};
use ldes_graph_ir::Term;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bucketizer using [`BasicStrategy`]
pub type BasicBucketizer = Bucketizer<BasicStrategy>;

/// Sequential paging counters
#[derive(Debug, Default, Clone)]
pub struct BasicStrategy {
    page_number: usize,
    member_counter: usize,
}

/// Exported counters of [`BasicStrategy`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicState {
    pub page_number: usize,
    pub member_counter: usize,
}

impl BasicStrategy {
    /// Build a basic bucketizer
    pub fn bucketizer(options: BucketizerOptions) -> Result<BasicBucketizer> {
        Bucketizer::new(options, BasicStrategy::default())
    }

    /// Page currently being filled
    pub fn page_number(&self) -> usize {
        self.page_number
    }
}

impl BucketStrategy for BasicStrategy {
    type State = BasicState;

    fn name(&self) -> &'static str {
        "basic"
    }

    fn uses_property_path(&self) -> bool {
        false
    }

    fn create_buckets(
        &mut self,
        core: &mut BucketizerCore,
        _values: &[Term],
    ) -> Result<BucketAssignment> {
        let mut assignment = BucketAssignment::new();

        if self.member_counter >= core.page_size() {
            let full = self.page_number.to_string();
            self.page_number += 1;
            self.member_counter = 0;
            debug!(page = self.page_number, "opening new page");
            assignment.push_relation(
                core.relate(&full, Relation::unconditional(self.page_number.to_string())),
            );
        }

        assignment.push_bucket(self.page_number.to_string());
        self.member_counter += 1;
        Ok(assignment)
    }

    fn export_state(&self) -> BasicState {
        BasicState {
            page_number: self.page_number,
            member_counter: self.member_counter,
        }
    }

    fn import_state(&mut self, state: BasicState) -> Result<()> {
        self.page_number = state.page_number;
        self.member_counter = state.member_counter;
        Ok(())
    }
}
