//! End-to-end dependency flows: creating edges, evaluating blocked state
//! and cascading on completion.

use tandem::core::{DependencyGraph, TaskStatus};
use tandem::engine::{
    complete_task, create_dependency, delete_dependency, is_blocked, resolve_on_completion,
    would_create_cycle, AuditAction, BlockedCache,
};
use tandem::store::DependencyStore;
use tandem::Error;

use crate::fixtures::{actor, ids, ProjectFixture};

/// Project {A: completed, B: in_progress depends on A, C: not_started
/// depends on B}; completing B unblocks C.
#[tokio::test]
async fn test_end_to_end_chain() {
    let fx = ProjectFixture::new(&["ada"]).await;
    let a = fx.task("A", TaskStatus::Completed).await;
    let b = fx.task("B", TaskStatus::InProgress).await;
    let c = fx.task("C", TaskStatus::NotStarted).await;
    create_dependency(&fx.store, &actor(), b.id, a.id).await.unwrap();
    create_dependency(&fx.store, &actor(), c.id, b.id).await.unwrap();

    let state_b = is_blocked(&fx.store, &b).await.unwrap();
    assert!(!state_b.blocked);

    let state_c = is_blocked(&fx.store, &c).await.unwrap();
    assert!(state_c.blocked);
    assert_eq!(state_c.blocking_ids(), vec![b.id]);

    fx.store
        .update_task_status(b.id, TaskStatus::Completed)
        .await
        .unwrap();
    let unblocked = resolve_on_completion(&fx.store, b.id).await.unwrap();
    assert_eq!(ids(&unblocked), vec![c.id]);

    let c = fx.store.get_task(c.id).await.unwrap();
    assert!(!is_blocked(&fx.store, &c).await.unwrap().blocked);
}

#[tokio::test]
async fn test_cycle_detection_correctness() {
    let fx = ProjectFixture::new(&[]).await;
    let a = fx.task("A", TaskStatus::NotStarted).await;
    let b = fx.task("B", TaskStatus::NotStarted).await;
    let c = fx.task("C", TaskStatus::NotStarted).await;
    let d = fx.task("D", TaskStatus::NotStarted).await;
    // A -> B, B -> C
    create_dependency(&fx.store, &actor(), a.id, b.id).await.unwrap();
    create_dependency(&fx.store, &actor(), b.id, c.id).await.unwrap();

    assert!(would_create_cycle(&fx.store, c.id, a.id).await.unwrap());
    assert!(!would_create_cycle(&fx.store, c.id, d.id).await.unwrap());

    let err = create_dependency(&fx.store, &actor(), c.id, a.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CyclicDependency { .. }));
    assert!(create_dependency(&fx.store, &actor(), c.id, d.id).await.is_ok());
}

#[tokio::test]
async fn test_self_dependency_always_fails() {
    let fx = ProjectFixture::new(&[]).await;
    let a = fx.task("A", TaskStatus::NotStarted).await;
    let err = create_dependency(&fx.store, &actor(), a.id, a.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::SelfDependency { .. }));
    assert!(fx.store.get_dependency_edges(a.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cascade_completeness_and_non_recursion() {
    let fx = ProjectFixture::new(&[]).await;
    let a = fx.task("A", TaskStatus::InProgress).await;
    let b = fx.task("B", TaskStatus::NotStarted).await;
    let c = fx.task("C", TaskStatus::NotStarted).await;
    create_dependency(&fx.store, &actor(), b.id, a.id).await.unwrap();
    create_dependency(&fx.store, &actor(), c.id, b.id).await.unwrap();

    let outcome = complete_task(&fx.store, &actor(), a.id).await.unwrap();
    assert_eq!(ids(&outcome.unblocked), vec![b.id]);
    assert_eq!(outcome.audit.unwrap().action, AuditAction::TaskCompleted);

    // C is still blocked by B, which was not completed as a side effect.
    let c_state = is_blocked(&fx.store, &c).await.unwrap();
    assert_eq!(c_state.blocking_ids(), vec![b.id]);

    // Completing B cascades one more level.
    let outcome = complete_task(&fx.store, &actor(), b.id).await.unwrap();
    assert_eq!(ids(&outcome.unblocked), vec![c.id]);
}

#[tokio::test]
async fn test_removing_dependency_unblocks() {
    let fx = ProjectFixture::new(&[]).await;
    let a = fx.task("A", TaskStatus::Paused).await;
    let b = fx.task("B", TaskStatus::NotStarted).await;
    let (edge, _) = create_dependency(&fx.store, &actor(), b.id, a.id).await.unwrap();
    assert!(is_blocked(&fx.store, &b).await.unwrap().blocked);

    delete_dependency(&fx.store, &actor(), edge.id).await.unwrap();
    assert!(!is_blocked(&fx.store, &b).await.unwrap().blocked);

    let err = delete_dependency(&fx.store, &actor(), edge.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DependencyNotFound { .. }));
}

#[tokio::test]
async fn test_task_removal_cleans_orphaned_edges() {
    let fx = ProjectFixture::new(&[]).await;
    let a = fx.task("A", TaskStatus::NotStarted).await;
    let b = fx.task("B", TaskStatus::NotStarted).await;
    create_dependency(&fx.store, &actor(), b.id, a.id).await.unwrap();

    fx.store.remove_task(a.id).await.unwrap();
    assert!(fx.store.get_dependency_edges(b.id).await.unwrap().is_empty());
    assert!(!is_blocked(&fx.store, &b).await.unwrap().blocked);
}

#[tokio::test]
async fn test_cache_refresh_after_completion() {
    let fx = ProjectFixture::new(&[]).await;
    let a = fx.task("A", TaskStatus::InProgress).await;
    let b = fx.task("B", TaskStatus::NotStarted).await;
    let c = fx.task("C", TaskStatus::NotStarted).await;
    create_dependency(&fx.store, &actor(), b.id, a.id).await.unwrap();
    create_dependency(&fx.store, &actor(), c.id, a.id).await.unwrap();

    let mut cache = BlockedCache::new();
    for task in [&b, &c] {
        assert!(cache.get_or_evaluate(&fx.store, task).await.unwrap().blocked);
    }

    complete_task(&fx.store, &actor(), a.id).await.unwrap();
    let edges = fx.store.get_project_edges(fx.project).await.unwrap();
    cache.invalidate_dependents_of(&a.id, &DependencyGraph::from_edges(&edges));

    for task in [&b, &c] {
        assert!(!cache.get_or_evaluate(&fx.store, task).await.unwrap().blocked);
    }
}

#[tokio::test]
async fn test_topological_order_of_project() {
    let fx = ProjectFixture::new(&[]).await;
    let design = fx.task("design", TaskStatus::Completed).await;
    let build = fx.task("build", TaskStatus::InProgress).await;
    let test = fx.task("test", TaskStatus::NotStarted).await;
    let ship = fx.task("ship", TaskStatus::NotStarted).await;
    create_dependency(&fx.store, &actor(), ship.id, test.id).await.unwrap();
    create_dependency(&fx.store, &actor(), test.id, build.id).await.unwrap();
    create_dependency(&fx.store, &actor(), build.id, design.id).await.unwrap();

    let edges = fx.store.get_project_edges(fx.project).await.unwrap();
    let graph = DependencyGraph::from_edges(&edges);
    assert!(graph.is_acyclic());
    assert_eq!(
        graph.topological_order().unwrap(),
        vec![design.id, build.id, test.id, ship.id]
    );
}
