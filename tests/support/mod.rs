#![allow(dead_code)]

use genealogy_engine::{
    boot, BootArgs, Engine, InMemoryLicensePlateStore, InMemoryWorkOrderStore, LicensePlateRef,
    LinkConsumptionInput, SqliteBackend, WorkOrderRef,
};

pub const ORG: &str = "org-123";
pub const OTHER_ORG: &str = "org-456";
pub const USER: &str = "user-001";
pub const WO: &str = "wo-001";

pub async fn booted_engine() -> Engine {
    let backend = SqliteBackend::in_memory().expect("in-memory backend should initialize");
    let engine = boot(BootArgs::new(Box::new(backend)));
    engine
        .init()
        .await
        .expect("init should create the genealogy schema");
    engine
}

pub fn lp_store(plates: &[(&str, &str, f64)]) -> InMemoryLicensePlateStore {
    let store = InMemoryLicensePlateStore::new();
    for (id, org_id, quantity) in plates {
        store.put(LicensePlateRef {
            id: (*id).to_string(),
            org_id: (*org_id).to_string(),
            quantity: *quantity,
        });
    }
    store
}

pub fn wo_store(wo_ids: &[&str]) -> InMemoryWorkOrderStore {
    let store = InMemoryWorkOrderStore::new();
    for wo_id in wo_ids {
        store.put(WorkOrderRef {
            id: (*wo_id).to_string(),
        });
    }
    store
}

pub fn consumption_input(parent_lp_id: &str, child_lp_id: &str, quantity: f64) -> LinkConsumptionInput {
    LinkConsumptionInput {
        org_id: ORG.to_string(),
        parent_lp_id: parent_lp_id.to_string(),
        child_lp_id: child_lp_id.to_string(),
        wo_id: WO.to_string(),
        quantity,
        operation_id: None,
        operation_date: None,
        created_by: USER.to_string(),
    }
}
