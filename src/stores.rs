use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::GenealogyError;

/// Snapshot of a license plate as the external inventory store reports it.
/// Quantity is read-only here; decrements belong to the inventory store.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LicensePlateRef {
    pub id: String,
    pub org_id: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WorkOrderRef {
    pub id: String,
}

#[async_trait(?Send)]
pub trait LicensePlateStore: Send + Sync {
    async fn resolve_lp(&self, lp_id: &str) -> Result<Option<LicensePlateRef>, GenealogyError>;
}

#[async_trait(?Send)]
pub trait WorkOrderStore: Send + Sync {
    async fn resolve_work_order(&self, wo_id: &str)
        -> Result<Option<WorkOrderRef>, GenealogyError>;
}

#[derive(Default)]
pub struct InMemoryLicensePlateStore {
    plates: Mutex<HashMap<String, LicensePlateRef>>,
}

impl InMemoryLicensePlateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, plate: LicensePlateRef) {
        self.plates
            .lock()
            .expect("license plate store mutex poisoned")
            .insert(plate.id.clone(), plate);
    }
}

#[async_trait(?Send)]
impl LicensePlateStore for InMemoryLicensePlateStore {
    async fn resolve_lp(&self, lp_id: &str) -> Result<Option<LicensePlateRef>, GenealogyError> {
        let plates = self
            .plates
            .lock()
            .map_err(|_| GenealogyError::backend("license plate store mutex poisoned"))?;
        Ok(plates.get(lp_id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryWorkOrderStore {
    work_orders: Mutex<HashMap<String, WorkOrderRef>>,
}

impl InMemoryWorkOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, work_order: WorkOrderRef) {
        self.work_orders
            .lock()
            .expect("work order store mutex poisoned")
            .insert(work_order.id.clone(), work_order);
    }
}

#[async_trait(?Send)]
impl WorkOrderStore for InMemoryWorkOrderStore {
    async fn resolve_work_order(
        &self,
        wo_id: &str,
    ) -> Result<Option<WorkOrderRef>, GenealogyError> {
        let work_orders = self
            .work_orders
            .lock()
            .map_err(|_| GenealogyError::backend("work order store mutex poisoned"))?;
        Ok(work_orders.get(wo_id).cloned())
    }
}
