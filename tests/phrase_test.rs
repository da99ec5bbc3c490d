//! 문장 관리 통합 테스트

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use learning_core::domain::operation::codes;
use learning_core::domain::operation::dto::Gated;
use learning_core::domain::operation::limiter::OperationLimiter;
use learning_core::domain::phrase::dto::{
    AttachImageRequest, CreateGenreRequest, CreatePhraseRequest, PhraseListQuery,
    UpdatePhraseRequest,
};
use learning_core::domain::phrase::entity::{phrase_genre, phrase_image};
use learning_core::domain::phrase::image::{GeneratedImage, ImageGenerator};
use learning_core::domain::phrase::service::PhraseService;
use learning_core::AppError;

/// 호출 횟수를 세는 가짜 이미지 생성기
struct StubGenerator {
    calls: AtomicUsize,
    fail: bool,
}

impl StubGenerator {
    fn new(fail: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail,
        }
    }
}

#[async_trait]
impl ImageGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<GeneratedImage, AppError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::internal_error("image api timeout"));
        }
        Ok(GeneratedImage {
            url: format!("https://images.example.com/{}.png", n),
        })
    }
}

#[tokio::test]
async fn create_should_link_owned_genres() {
    // Arrange
    let state = common::setup_state().await;
    let ctx = common::tenant("alice").await;
    let idiom = PhraseService::create_genre(&state, &ctx, CreateGenreRequest { name: "idiom".to_string() })
        .await
        .unwrap();

    // Act
    let created = PhraseService::create(
        &state,
        &ctx,
        CreatePhraseRequest {
            text: "break a leg".to_string(),
            meaning: "행운을 빌어".to_string(),
            note: Some("공연 전 인사".to_string()),
            genre_ids: vec![idiom.genre_id, idiom.genre_id],
        },
    )
    .await
    .unwrap();

    // Assert
    assert_eq!(created.genres, vec![idiom]);
    assert!(created.image.is_none());
}

#[tokio::test]
async fn create_should_reject_genre_of_other_tenant() {
    // Arrange
    let state = common::setup_state().await;
    let alice = common::tenant("alice").await;
    let bob = common::tenant("bob").await;
    let bobs = PhraseService::create_genre(&state, &bob, CreateGenreRequest { name: "bob".to_string() })
        .await
        .unwrap();

    // Act
    let result = PhraseService::create(
        &state,
        &alice,
        CreatePhraseRequest {
            text: "hello".to_string(),
            meaning: "안녕".to_string(),
            note: None,
            genre_ids: vec![bobs.genre_id],
        },
    )
    .await;

    // Assert
    assert!(matches!(result, Err(AppError::NotFound(_))));
    let listed = PhraseService::list(&state, &alice, PhraseListQuery::default()).await.unwrap();
    assert!(listed.is_empty(), "phrase insert must be rolled back");
}

#[tokio::test]
async fn duplicate_genre_name_should_conflict() {
    // Arrange
    let state = common::setup_state().await;
    let ctx = common::tenant("alice").await;
    PhraseService::create_genre(&state, &ctx, CreateGenreRequest { name: "idiom".to_string() })
        .await
        .unwrap();

    // Act
    let result =
        PhraseService::create_genre(&state, &ctx, CreateGenreRequest { name: " idiom ".to_string() }).await;

    // Assert
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_should_replace_genres_when_given() {
    // Arrange
    let state = common::setup_state().await;
    let ctx = common::tenant("alice").await;
    let a = PhraseService::create_genre(&state, &ctx, CreateGenreRequest { name: "a".to_string() })
        .await
        .unwrap();
    let b = PhraseService::create_genre(&state, &ctx, CreateGenreRequest { name: "b".to_string() })
        .await
        .unwrap();
    let created = PhraseService::create(
        &state,
        &ctx,
        CreatePhraseRequest {
            text: "hello".to_string(),
            meaning: "안녕".to_string(),
            note: None,
            genre_ids: vec![a.genre_id],
        },
    )
    .await
    .unwrap();

    // Act
    let updated = PhraseService::update(
        &state,
        &ctx,
        created.phrase_id,
        UpdatePhraseRequest {
            text: "hello there".to_string(),
            meaning: "안녕하세요".to_string(),
            note: None,
            genre_ids: Some(vec![b.genre_id]),
        },
    )
    .await
    .unwrap();

    // Assert
    assert_eq!(updated.text, "hello there");
    assert_eq!(updated.genres, vec![b]);
}

#[tokio::test]
async fn list_should_filter_by_keyword() {
    // Arrange
    let state = common::setup_state().await;
    let ctx = common::tenant("alice").await;
    common::create_phrase(&state, &ctx, "piece of cake").await;
    common::create_phrase(&state, &ctx, "under the weather").await;

    // Act
    let found = PhraseService::list(
        &state,
        &ctx,
        PhraseListQuery {
            keyword: Some(" cake ".to_string()),
        },
    )
    .await
    .unwrap();

    // Assert
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].text, "piece of cake");
}

#[tokio::test]
async fn delete_should_remove_image_and_genre_links() {
    // Arrange
    let state = common::setup_state().await;
    let ctx = common::tenant("alice").await;
    let genre = PhraseService::create_genre(&state, &ctx, CreateGenreRequest { name: "idiom".to_string() })
        .await
        .unwrap();
    let created = PhraseService::create(
        &state,
        &ctx,
        CreatePhraseRequest {
            text: "hello".to_string(),
            meaning: "안녕".to_string(),
            note: None,
            genre_ids: vec![genre.genre_id],
        },
    )
    .await
    .unwrap();
    PhraseService::attach_image(
        &state,
        &ctx,
        created.phrase_id,
        AttachImageRequest {
            url: "https://images.example.com/hello.png".to_string(),
            prompt: None,
        },
    )
    .await
    .unwrap();

    // Act
    PhraseService::delete(&state, &ctx, created.phrase_id).await.unwrap();

    // Assert
    let tenant = ctx.tenant_id().clone();
    let (images, links) = state
        .uow
        .read("test.count_children", ctx.cancel(), move |repos| {
            Box::pin(async move {
                let images = repos.phrase_images(&tenant).count(|q| q).await?;
                let links = repos.phrase_genres(&tenant).count(|q| q).await?;
                Ok((images, links))
            })
        })
        .await
        .unwrap();
    assert_eq!(images, 0);
    assert_eq!(links, 0);
    assert!(matches!(
        PhraseService::get(&state, &ctx, created.phrase_id).await,
        Err(AppError::NotFound(_))
    ));
    // 장르 자체는 남음
    assert_eq!(PhraseService::list_genres(&state, &ctx).await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_genre_should_keep_phrases() {
    // Arrange
    let state = common::setup_state().await;
    let ctx = common::tenant("alice").await;
    let genre = PhraseService::create_genre(&state, &ctx, CreateGenreRequest { name: "idiom".to_string() })
        .await
        .unwrap();
    let created = PhraseService::create(
        &state,
        &ctx,
        CreatePhraseRequest {
            text: "hello".to_string(),
            meaning: "안녕".to_string(),
            note: None,
            genre_ids: vec![genre.genre_id],
        },
    )
    .await
    .unwrap();

    // Act
    PhraseService::delete_genre(&state, &ctx, genre.genre_id).await.unwrap();

    // Assert
    let phrase = PhraseService::get(&state, &ctx, created.phrase_id).await.unwrap();
    assert!(phrase.genres.is_empty());
}

#[tokio::test]
async fn attach_image_should_replace_previous_image() {
    // Arrange
    let state = common::setup_state().await;
    let ctx = common::tenant("alice").await;
    let phrase_id = common::create_phrase(&state, &ctx, "hello").await;
    for n in 0..2 {
        PhraseService::attach_image(
            &state,
            &ctx,
            phrase_id,
            AttachImageRequest {
                url: format!("https://images.example.com/{}.png", n),
                prompt: None,
            },
        )
        .await
        .unwrap();
    }

    // Act
    let phrase = PhraseService::get(&state, &ctx, phrase_id).await.unwrap();
    let tenant = ctx.tenant_id().clone();
    let image_rows = state
        .uow
        .read("test.count_images", ctx.cancel(), move |repos| {
            Box::pin(async move {
                repos
                    .phrase_images(&tenant)
                    .count(|q| {
                        use sea_orm::{ColumnTrait, QueryFilter};
                        q.filter(phrase_image::Column::PhraseId.eq(phrase_id))
                    })
                    .await
            })
        })
        .await
        .unwrap();

    // Assert
    assert_eq!(image_rows, 1);
    assert_eq!(phrase.image.unwrap().url, "https://images.example.com/1.png");
}

#[tokio::test]
async fn generate_image_should_record_usage_only_on_success() {
    // Arrange
    let state = common::setup_state().await;
    let ctx = common::tenant("alice").await;
    let phrase_id = common::create_phrase(&state, &ctx, "hello").await;
    let failing = StubGenerator::new(true);
    let working = StubGenerator::new(false);

    // Act
    let failed = PhraseService::generate_image(&state, &ctx, phrase_id, &failing).await;
    let used_after_failure = OperationLimiter::usage_today(&state, &ctx, codes::IMAGE_GENERATION)
        .await
        .unwrap();
    let generated = PhraseService::generate_image(&state, &ctx, phrase_id, &working)
        .await
        .unwrap();

    // Assert
    assert!(failed.is_err());
    assert_eq!(used_after_failure, 0);
    match generated {
        Gated::Completed(phrase) => {
            let image = phrase.image.unwrap();
            assert_eq!(image.url, "https://images.example.com/0.png");
            assert!(image.prompt.unwrap().contains("hello"));
        }
        Gated::Denied(check) => panic!("expected generation, got {:?}", check),
    }
    assert_eq!(
        OperationLimiter::usage_today(&state, &ctx, codes::IMAGE_GENERATION)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn generate_image_should_not_call_generator_when_limit_reached() {
    // Arrange
    let state = common::setup_state().await;
    let ctx = common::tenant("alice").await;
    let phrase_id = common::create_phrase(&state, &ctx, "hello").await;
    let seeded_cap = 10;
    OperationLimiter::record(&state, &ctx, codes::IMAGE_GENERATION, seeded_cap)
        .await
        .unwrap();
    let generator = StubGenerator::new(false);

    // Act
    let result = PhraseService::generate_image(&state, &ctx, phrase_id, &generator)
        .await
        .unwrap();

    // Assert
    assert!(matches!(result, Gated::Denied(ref check) if !check.allowed));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn phrase_genre_links_should_carry_tenant() {
    // Arrange
    let state = common::setup_state().await;
    let ctx = common::tenant("alice").await;
    let genre = PhraseService::create_genre(&state, &ctx, CreateGenreRequest { name: "idiom".to_string() })
        .await
        .unwrap();
    PhraseService::create(
        &state,
        &ctx,
        CreatePhraseRequest {
            text: "hello".to_string(),
            meaning: "안녕".to_string(),
            note: None,
            genre_ids: vec![genre.genre_id],
        },
    )
    .await
    .unwrap();
    let tenant = ctx.tenant_id().clone();

    // Act
    let links: Vec<phrase_genre::Model> = state
        .uow
        .read("test.links", ctx.cancel(), move |repos| {
            Box::pin(async move { repos.phrase_genres(&tenant).all(|q| q).await })
        })
        .await
        .unwrap();

    // Assert
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].tenant_id, "alice");
}
