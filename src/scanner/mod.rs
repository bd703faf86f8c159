pub mod engine;
pub mod guard;
pub mod heuristics;
pub mod keywords;
pub mod scorer;
pub mod sources;

pub use engine::NetworkScanner;
pub use sources::{
    CommentCountQuery, CommentStore, ContentPredicate, ReportCache, RoleConfigStore, StoreError,
    TenantContext, TenantDirectory, TenantSession,
};
