//! Orders Module
//!
//! Pricing math and the order workflow engine. All stock movement in the
//! system happens here.

pub mod pricing;
pub mod workflow;

pub use pricing::{OrderTotals, PricedLine, compute_totals};
pub use workflow::{OrderCreate, OrderEdit, OrderPage, OrderWorkflow, WorkflowCtx};
