//! 테넌트 격리 통합 테스트
//!
//! 다른 사용자의 데이터는 조회, 수정, 삭제 어느 경로로도 접근할 수 없어야 합니다.

mod common;

use learning_core::domain::phrase::dto::{PhraseListQuery, UpdatePhraseRequest};
use learning_core::domain::phrase::entity::phrase;
use learning_core::domain::phrase::service::PhraseService;
use learning_core::AppError;
use sea_orm::Set;

#[tokio::test]
async fn other_tenant_should_not_see_owned_phrase() {
    // Arrange
    let state = common::setup_state().await;
    let alice = common::tenant("alice").await;
    let bob = common::tenant("bob").await;
    let phrase_id = common::create_phrase(&state, &alice, "break a leg").await;

    // Act
    let by_bob = PhraseService::get(&state, &bob, phrase_id).await;
    let bob_list = PhraseService::list(&state, &bob, PhraseListQuery::default())
        .await
        .unwrap();
    let alice_list = PhraseService::list(&state, &alice, PhraseListQuery::default())
        .await
        .unwrap();

    // Assert
    assert!(matches!(by_bob, Err(AppError::NotFound(_))));
    assert!(bob_list.is_empty());
    assert_eq!(alice_list.len(), 1);
    assert_eq!(alice_list[0].phrase_id, phrase_id);
}

#[tokio::test]
async fn other_tenant_should_not_update_owned_phrase() {
    // Arrange
    let state = common::setup_state().await;
    let alice = common::tenant("alice").await;
    let bob = common::tenant("bob").await;
    let phrase_id = common::create_phrase(&state, &alice, "break a leg").await;

    // Act
    let result = PhraseService::update(
        &state,
        &bob,
        phrase_id,
        UpdatePhraseRequest {
            text: "hijacked".to_string(),
            meaning: "탈취".to_string(),
            note: None,
            genre_ids: None,
        },
    )
    .await;

    // Assert
    assert!(matches!(result, Err(AppError::NotFound(_))));
    let original = PhraseService::get(&state, &alice, phrase_id).await.unwrap();
    assert_eq!(original.text, "break a leg");
}

#[tokio::test]
async fn other_tenant_should_not_delete_owned_phrase() {
    // Arrange
    let state = common::setup_state().await;
    let alice = common::tenant("alice").await;
    let bob = common::tenant("bob").await;
    let phrase_id = common::create_phrase(&state, &alice, "break a leg").await;

    // Act
    let result = PhraseService::delete(&state, &bob, phrase_id).await;

    // Assert
    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(PhraseService::get(&state, &alice, phrase_id).await.is_ok());
}

#[tokio::test]
async fn add_should_stamp_acting_tenant_over_payload() {
    // Arrange
    let state = common::setup_state().await;
    let alice = common::tenant("alice").await;
    let tenant = alice.tenant_id().clone();

    // Act: 페이로드에 다른 사용자 ID를 넣어도 무시되어야 함
    let saved = state
        .uow
        .write("test.forged_tenant", alice.cancel(), move |repos| {
            Box::pin(async move {
                repos
                    .phrases(&tenant)
                    .add(phrase::ActiveModel {
                        tenant_id: Set("mallory".to_string()),
                        text: Set("forged".to_string()),
                        meaning: Set("위조".to_string()),
                        note: Set(None),
                        ..Default::default()
                    })
                    .await
            })
        })
        .await
        .unwrap();

    // Assert
    assert_eq!(saved.tenant_id, "alice");
}

#[tokio::test]
async fn update_should_not_change_ownership() {
    // Arrange
    let state = common::setup_state().await;
    let alice = common::tenant("alice").await;
    let phrase_id = common::create_phrase(&state, &alice, "break a leg").await;
    let tenant = alice.tenant_id().clone();

    // Act
    let updated = state
        .uow
        .write("test.reassign_tenant", alice.cancel(), move |repos| {
            Box::pin(async move {
                repos
                    .phrases(&tenant)
                    .update_owned(phrase_id, |model| {
                        model.tenant_id = Set("mallory".to_string());
                        model.note = Set(Some("moved".to_string()));
                    })
                    .await
            })
        })
        .await
        .unwrap();

    // Assert
    assert_eq!(updated.tenant_id, "alice");
    assert_eq!(updated.note.as_deref(), Some("moved"));
}

#[tokio::test]
async fn delete_where_should_stay_inside_tenant() {
    // Arrange
    let state = common::setup_state().await;
    let alice = common::tenant("alice").await;
    let bob = common::tenant("bob").await;
    common::create_phrase(&state, &alice, "alice phrase").await;
    common::create_phrase(&state, &bob, "bob phrase").await;
    let tenant = bob.tenant_id().clone();

    // Act: 조건 없이 전부 삭제를 시도해도 bob의 행만 삭제
    let deleted = state
        .uow
        .write("test.delete_all", bob.cancel(), move |repos| {
            Box::pin(async move {
                repos
                    .phrases(&tenant)
                    .delete_where(sea_orm::Condition::all())
                    .await
            })
        })
        .await
        .unwrap();

    // Assert
    assert_eq!(deleted, 1);
    let remaining = PhraseService::list(&state, &alice, PhraseListQuery::default())
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
}
