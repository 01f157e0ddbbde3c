//! Assignment suggestions and move validation against a populated project.

use tandem::core::{Project, Task, TaskStatus};
use tandem::engine::{
    create_dependency, reassign_task, suggest_assignees, validate_move, DragPayload, ReasonCode,
};
use tandem::store::DependencyStore;

use crate::fixtures::{actor, policy, viewer, ProjectFixture};

#[tokio::test]
async fn test_suggestions_prefer_light_and_related() {
    let fx = ProjectFixture::new(&["ada", "bob", "cy"]).await;
    let (ada, bob, cy) = (fx.member("ada"), fx.member("bob"), fx.member("cy"));
    fx.load(ada, 6).await;
    fx.load(cy, 2).await;
    let mut related = fx.assigned_task("auth-api", TaskStatus::InProgress, bob).await;
    related.tags = vec!["auth".to_string()];
    fx.store.insert_task(related).await;

    let target = Task::new("login", fx.project).with_tags(&["auth"]);
    fx.store.insert_task(target.clone()).await;

    let members = fx.store.get_project_members(fx.project).await.unwrap();
    let ranked = suggest_assignees(&target, &members, &fx.tasks().await, &policy());
    let order: Vec<&str> = ranked.iter().map(|s| s.person.display_name.as_str()).collect();
    // bob: 100 - 5 + 10 = 105, cy: 90, ada: 70
    assert_eq!(order, vec!["bob", "cy", "ada"]);
    assert_eq!(ranked[0].score, 105);
    assert_eq!(ranked[2].current_active_task_count, 6);
}

#[tokio::test]
async fn test_workload_cap_is_absolute_with_bonus() {
    let fx = ProjectFixture::new(&["ada"]).await;
    let ada = fx.member("ada");
    for i in 0..10 {
        let mut task = fx
            .assigned_task(&format!("related-{}", i), TaskStatus::InProgress, ada)
            .await;
        task.category = Some("infra".to_string());
        fx.store.insert_task(task).await;
    }
    let target = Task::new("deploy", fx.project).with_category("infra");

    let ranked = suggest_assignees(&target, &fx.members, &fx.tasks().await, &policy());
    assert_eq!(ranked[0].current_active_task_count, 10);
    assert_eq!(ranked[0].related_task_count, 10);
    assert!(!ranked[0].can_receive);
    assert_eq!(ranked[0].score, 0);
}

#[tokio::test]
async fn test_permission_checked_before_completion() {
    let fx = ProjectFixture::new(&["ada", "bob"]).await;
    let (ada, bob) = (fx.member("ada"), fx.member("bob"));
    let done = fx.assigned_task("done", TaskStatus::Completed, ada).await;

    let payload = DragPayload::new(done.id, Some(ada.id));
    let v = validate_move(&fx.store, &viewer(), &payload, Some(bob.id), &policy())
        .await
        .unwrap();
    assert!(!v.is_valid);
    assert_eq!(v.reason, Some(ReasonCode::MissingPermissions));

    let v = validate_move(&fx.store, &actor(), &payload, Some(bob.id), &policy())
        .await
        .unwrap();
    assert_eq!(v.reason, Some(ReasonCode::TaskCompleted));
}

#[tokio::test]
async fn test_blocked_task_cannot_move_until_dependency_completes() {
    let fx = ProjectFixture::new(&["ada", "bob"]).await;
    let (ada, bob) = (fx.member("ada"), fx.member("bob"));
    let schema = fx.task("schema", TaskStatus::InProgress).await;
    let api = fx.assigned_task("api", TaskStatus::NotStarted, ada).await;
    create_dependency(&fx.store, &actor(), api.id, schema.id)
        .await
        .unwrap();

    let payload = DragPayload::new(api.id, Some(ada.id));
    let v = validate_move(&fx.store, &actor(), &payload, Some(bob.id), &policy())
        .await
        .unwrap();
    assert_eq!(v.reason, Some(ReasonCode::UnresolvedDependencies));
    assert_eq!(v.message, "blocked by schema");

    fx.store
        .update_task_status(schema.id, TaskStatus::Completed)
        .await
        .unwrap();
    let v = validate_move(&fx.store, &actor(), &payload, Some(bob.id), &policy())
        .await
        .unwrap();
    assert!(v.is_valid);
}

#[tokio::test]
async fn test_overloaded_target_is_rejected() {
    let fx = ProjectFixture::new(&["ada", "bob"]).await;
    let (ada, bob) = (fx.member("ada"), fx.member("bob"));
    fx.load(bob, 10).await;
    let card = fx.assigned_task("card", TaskStatus::NotStarted, ada).await;

    let payload = DragPayload::new(card.id, Some(ada.id));
    let v = validate_move(&fx.store, &actor(), &payload, Some(bob.id), &policy())
        .await
        .unwrap();
    assert_eq!(v.reason, Some(ReasonCode::Overloaded));
}

#[tokio::test]
async fn test_work_in_other_projects_counts_toward_cap() {
    let fx = ProjectFixture::new(&["ada", "bob"]).await;
    let (ada, bob) = (fx.member("ada"), fx.member("bob"));
    let other = Project::new("other");
    for i in 0..10 {
        let task = Task::new(&format!("other-{}", i), other.id)
            .with_status(TaskStatus::InProgress)
            .assigned_to(bob.id);
        fx.store.insert_task(task).await;
    }
    fx.store.insert_project(other).await;
    let card = fx.assigned_task("card", TaskStatus::NotStarted, ada).await;

    let payload = DragPayload::new(card.id, Some(ada.id));
    let v = validate_move(&fx.store, &actor(), &payload, Some(bob.id), &policy())
        .await
        .unwrap();
    assert!(!v.is_valid);
    assert_eq!(v.reason, Some(ReasonCode::Overloaded));

    let bob_tasks = fx.store.get_person_tasks(bob.id).await.unwrap();
    let ranked = suggest_assignees(&card, &fx.members, &bob_tasks, &policy());
    let bob_rank = ranked.iter().find(|s| s.person.id == bob.id).unwrap();
    assert!(!bob_rank.can_receive);
    assert_eq!(bob_rank.score, 0);
}

#[tokio::test]
async fn test_reassign_end_to_end() {
    let fx = ProjectFixture::new(&["ada", "bob"]).await;
    let (ada, bob) = (fx.member("ada"), fx.member("bob"));
    let card = fx.assigned_task("card", TaskStatus::InProgress, ada).await;
    let payload = DragPayload::new(card.id, Some(ada.id));

    let outcome = reassign_task(&fx.store, &actor(), &payload, Some(bob.id), &policy())
        .await
        .unwrap();
    assert!(outcome.validation.is_valid);
    let stored = fx.store.get_task(card.id).await.unwrap();
    assert!(stored.is_assigned_to(&bob.id));
    assert!(!stored.is_assigned_to(&ada.id));

    // Dragging it back onto bob is now a same-person no-op.
    let payload = DragPayload::new(card.id, Some(bob.id));
    let outcome = reassign_task(&fx.store, &actor(), &payload, Some(bob.id), &policy())
        .await
        .unwrap();
    assert_eq!(outcome.validation.reason, Some(ReasonCode::SamePerson));
    assert!(outcome.task.is_none());
}
