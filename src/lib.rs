mod backend;
mod backends;
mod engine;
mod error;
mod errors;
mod init;
mod link;
mod query;
mod stores;
mod trace;
mod types;
mod validate;
mod work_order;

pub use backend::{GenealogyBackend, GenealogyTransaction};
pub use backends::SqliteBackend;
pub use engine::{boot, BootArgs, Engine, EngineTransaction, EngineTransactionFuture};
pub use error::GenealogyError;
pub use errors::ErrorCode;
pub use link::{
    link_consumption, link_merge, link_output, link_split, reverse_link, GenealogyLink,
    LinkConsumptionInput, LinkMergeInput, LinkOutputInput, LinkSplitInput, OperationType,
};
pub use query::{get_genealogy_count, has_genealogy_link};
pub use stores::{
    InMemoryLicensePlateStore, InMemoryWorkOrderStore, LicensePlateRef, LicensePlateStore,
    WorkOrderRef, WorkOrderStore,
};
pub use trace::{
    get_backward_trace, get_forward_trace, get_full_tree, GenealogyTree, TraceDirection,
    TraceNode, TraceOptions, TraceResult, TreeLevelFlags, DEFAULT_TRACE_DEPTH,
};
pub use types::{QueryResult, Value};
pub use work_order::{get_genealogy_by_wo, WorkOrderGenealogy};
