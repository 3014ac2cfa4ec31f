mod support;

use genealogy_engine::{
    get_genealogy_by_wo, get_genealogy_count, has_genealogy_link, link_consumption, link_output,
    reverse_link, LinkOutputInput, OperationType,
};
use support::{booted_engine, consumption_input, lp_store, wo_store, ORG, USER, WO};

#[tokio::test]
async fn work_order_view_groups_links_by_operation_type() {
    let engine = booted_engine().await;
    let plates = lp_store(&[
        ("lp-1", ORG, 30.0),
        ("lp-2", ORG, 40.0),
        ("lp-3", ORG, 50.0),
        ("lp-4", ORG, 0.0),
    ]);
    let work_orders = wo_store(&[WO]);

    link_consumption(
        &engine,
        &plates,
        &work_orders,
        consumption_input("lp-1", "lp-2", 50.0),
    )
    .await
    .expect("consumption link should be created");
    link_output(
        &engine,
        &plates,
        &work_orders,
        LinkOutputInput {
            org_id: ORG.to_string(),
            consumed_lp_ids: vec![
                "lp-1".to_string(),
                "lp-2".to_string(),
                "lp-3".to_string(),
            ],
            output_lp_id: "lp-4".to_string(),
            wo_id: WO.to_string(),
            created_by: USER.to_string(),
        },
    )
    .await
    .expect("output links should be created");

    let genealogy = get_genealogy_by_wo(&engine, ORG, WO)
        .await
        .expect("work order view should succeed");

    assert_eq!(genealogy.wo_id, WO);
    assert_eq!(genealogy.consume.len(), 1);
    assert_eq!(genealogy.output.len(), 3);
    assert!(genealogy
        .output
        .iter()
        .all(|link| link.child_lp_id == "lp-4"));
}

#[tokio::test]
async fn work_order_view_excludes_reversed_links() {
    let engine = booted_engine().await;
    let plates = lp_store(&[("lp-1", ORG, 30.0), ("lp-2", ORG, 0.0)]);
    let work_orders = wo_store(&[WO]);

    let link = link_consumption(
        &engine,
        &plates,
        &work_orders,
        consumption_input("lp-1", "lp-2", 50.0),
    )
    .await
    .expect("consumption link should be created");
    reverse_link(&engine, ORG, &link.id, USER)
        .await
        .expect("reversal should succeed");

    let genealogy = get_genealogy_by_wo(&engine, ORG, WO)
        .await
        .expect("work order view should succeed");
    assert!(genealogy.consume.is_empty());
    assert!(genealogy.output.is_empty());
}

#[tokio::test]
async fn work_order_view_is_empty_for_unknown_or_foreign_wo() {
    let engine = booted_engine().await;

    let genealogy = get_genealogy_by_wo(&engine, ORG, "wo-missing")
        .await
        .expect("work order view should succeed");
    assert!(genealogy.consume.is_empty());
    assert!(genealogy.output.is_empty());
}

#[tokio::test]
async fn has_genealogy_link_sees_only_active_edges() {
    let engine = booted_engine().await;
    let plates = lp_store(&[("lp-1", ORG, 30.0), ("lp-2", ORG, 0.0)]);
    let work_orders = wo_store(&[WO]);

    assert!(!has_genealogy_link(&engine, ORG, "lp-1", "lp-2", OperationType::Consume)
        .await
        .expect("existence check should succeed"));

    let link = link_consumption(
        &engine,
        &plates,
        &work_orders,
        consumption_input("lp-1", "lp-2", 50.0),
    )
    .await
    .expect("consumption link should be created");

    assert!(has_genealogy_link(&engine, ORG, "lp-1", "lp-2", OperationType::Consume)
        .await
        .expect("existence check should succeed"));
    assert!(!has_genealogy_link(&engine, ORG, "lp-1", "lp-2", OperationType::Split)
        .await
        .expect("existence check should succeed"));

    reverse_link(&engine, ORG, &link.id, USER)
        .await
        .expect("reversal should succeed");
    assert!(!has_genealogy_link(&engine, ORG, "lp-1", "lp-2", OperationType::Consume)
        .await
        .expect("existence check should succeed"));
}

#[tokio::test]
async fn genealogy_count_covers_both_directions_including_reversed() {
    let engine = booted_engine().await;
    let plates = lp_store(&[
        ("lp-1", ORG, 30.0),
        ("lp-2", ORG, 40.0),
        ("lp-3", ORG, 0.0),
    ]);
    let work_orders = wo_store(&[WO]);

    let inbound = link_consumption(
        &engine,
        &plates,
        &work_orders,
        consumption_input("lp-1", "lp-2", 50.0),
    )
    .await
    .expect("link should be created");
    link_consumption(
        &engine,
        &plates,
        &work_orders,
        consumption_input("lp-2", "lp-3", 25.0),
    )
    .await
    .expect("link should be created");

    assert_eq!(
        get_genealogy_count(&engine, ORG, "lp-2")
            .await
            .expect("count should succeed"),
        2
    );

    // Reversed rows remain as audit evidence and stay in the count.
    reverse_link(&engine, ORG, &inbound.id, USER)
        .await
        .expect("reversal should succeed");
    assert_eq!(
        get_genealogy_count(&engine, ORG, "lp-2")
            .await
            .expect("count should succeed"),
        2
    );

    assert_eq!(
        get_genealogy_count(&engine, "org-other", "lp-2")
            .await
            .expect("count should succeed"),
        0
    );
}
