//! Pre-flight corruption check. Entering a tenant whose role configuration is
//! malformed is known to take the whole process down, so the guard classifies
//! each tenant from the outside before any context switch is attempted.

use std::sync::Arc;

use serde_json::Value;

use crate::scanner::sources::RoleConfigStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardVerdict {
    Safe,
    Corrupt(String),
}

pub struct TenantGuard {
    roles: Arc<dyn RoleConfigStore>,
}

impl TenantGuard {
    pub fn new(roles: Arc<dyn RoleConfigStore>) -> Self {
        Self { roles }
    }

    /// Classifies a tenant without entering its context. Never fails: any
    /// read or deserialization problem is reported as `Corrupt`.
    pub async fn inspect(&self, tenant_id: i64) -> GuardVerdict {
        let raw = match self.roles.read_raw(tenant_id).await {
            Ok(raw) => raw,
            Err(err) => {
                return GuardVerdict::Corrupt(format!("role configuration unreadable: {err}"))
            }
        };
        let Some(raw) = raw else {
            return GuardVerdict::Corrupt("role configuration missing".to_string());
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(_)) => GuardVerdict::Safe,
            Ok(_) => GuardVerdict::Corrupt("role configuration is not a mapping".to_string()),
            Err(err) => GuardVerdict::Corrupt(format!("role configuration unparseable: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::scanner::sources::StoreError;

    struct FixedRoles(Option<String>);

    #[async_trait]
    impl RoleConfigStore for FixedRoles {
        async fn read_raw(&self, _tenant_id: i64) -> Result<Option<String>, StoreError> {
            Ok(self.0.clone())
        }
    }

    struct FailingRoles;

    #[async_trait]
    impl RoleConfigStore for FailingRoles {
        async fn read_raw(&self, _tenant_id: i64) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("options table gone".to_string()))
        }
    }

    fn guard(store: impl RoleConfigStore + 'static) -> TenantGuard {
        TenantGuard::new(Arc::new(store))
    }

    #[tokio::test]
    async fn mapping_config_is_safe() {
        let verdict = guard(FixedRoles(Some(
            r#"{"administrator":{"name":"Administrator"}}"#.to_string(),
        )))
        .inspect(1)
        .await;
        assert_eq!(verdict, GuardVerdict::Safe);
    }

    #[tokio::test]
    async fn scalar_config_is_corrupt() {
        let verdict = guard(FixedRoles(Some("42".to_string()))).inspect(1).await;
        assert!(matches!(verdict, GuardVerdict::Corrupt(_)));
    }

    #[tokio::test]
    async fn missing_config_is_corrupt() {
        let verdict = guard(FixedRoles(None)).inspect(1).await;
        assert!(matches!(verdict, GuardVerdict::Corrupt(_)));
    }

    #[tokio::test]
    async fn unparseable_config_is_corrupt() {
        let verdict = guard(FixedRoles(Some("a:1:{".to_string()))).inspect(1).await;
        assert!(matches!(verdict, GuardVerdict::Corrupt(_)));
    }

    #[tokio::test]
    async fn read_failure_is_corrupt_not_fatal() {
        let verdict = guard(FailingRoles).inspect(1).await;
        assert!(matches!(verdict, GuardVerdict::Corrupt(reason) if reason.contains("unreadable")));
    }
}
