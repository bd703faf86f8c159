pub mod types;

pub use types::{CommentStatus, ScanReport, TenantMeta, TenantResult};
