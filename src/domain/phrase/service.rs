use std::collections::{BTreeSet, HashMap};

use sea_orm::{ColumnTrait, Condition, ConnectionTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use validator::Validate;

use super::dto::{
    AttachImageRequest, CreateGenreRequest, CreatePhraseRequest, GenreResponse, ImageResponse,
    PhraseListQuery, PhraseResponse, UpdatePhraseRequest,
};
use super::entity::{genre, phrase, phrase_genre, phrase_image};
use super::image::{build_prompt, ImageGenerator};
use crate::db::{Reader, RepositorySet};
use crate::domain::operation::codes;
use crate::domain::operation::dto::Gated;
use crate::domain::operation::limiter::OperationLimiter;
use crate::state::AppState;
use crate::tenant::{TenantContext, TenantId};
use crate::utils::error::AppError;

const PHRASE_NOT_FOUND: &str = "존재하지 않는 문장입니다.";

pub struct PhraseService;

impl PhraseService {
    /// 문장 생성
    pub async fn create(
        state: &AppState,
        ctx: &TenantContext,
        req: CreatePhraseRequest,
    ) -> Result<PhraseResponse, AppError> {
        req.validate()?;
        let tenant = ctx.tenant_id().clone();

        state
            .uow
            .write("phrase.create", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let saved = repos
                        .phrases(&tenant)
                        .add(phrase::ActiveModel {
                            text: Set(req.text),
                            meaning: Set(req.meaning),
                            note: Set(req.note),
                            ..Default::default()
                        })
                        .await?;

                    link_genres(&repos, &tenant, saved.phrase_id, &req.genre_ids).await?;

                    info!(tenant = %tenant, phrase_id = saved.phrase_id, "phrase created");
                    view_in_txn(&repos, &tenant, saved).await
                })
            })
            .await
    }

    /// 문장 수정
    pub async fn update(
        state: &AppState,
        ctx: &TenantContext,
        phrase_id: i64,
        req: UpdatePhraseRequest,
    ) -> Result<PhraseResponse, AppError> {
        req.validate()?;
        let tenant = ctx.tenant_id().clone();

        state
            .uow
            .write("phrase.update", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let UpdatePhraseRequest {
                        text,
                        meaning,
                        note,
                        genre_ids,
                    } = req;

                    let updated = repos
                        .phrases(&tenant)
                        .update_owned(phrase_id, move |model| {
                            model.text = Set(text);
                            model.meaning = Set(meaning);
                            model.note = Set(note);
                        })
                        .await?;

                    if let Some(genre_ids) = genre_ids {
                        repos
                            .phrase_genres(&tenant)
                            .delete_where(
                                Condition::all().add(phrase_genre::Column::PhraseId.eq(phrase_id)),
                            )
                            .await?;
                        link_genres(&repos, &tenant, phrase_id, &genre_ids).await?;
                    }

                    view_in_txn(&repos, &tenant, updated).await
                })
            })
            .await
    }

    /// 문장 삭제 (이미지, 장르 연결도 함께 삭제)
    pub async fn delete(state: &AppState, ctx: &TenantContext, phrase_id: i64) -> Result<(), AppError> {
        let tenant = ctx.tenant_id().clone();

        state
            .uow
            .write("phrase.delete", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let phrases = repos.phrases(&tenant);
                    if phrases.reader().get(phrase_id).await?.is_none() {
                        return Err(AppError::not_found(PHRASE_NOT_FOUND));
                    }

                    let links = repos
                        .phrase_genres(&tenant)
                        .delete_where(Condition::all().add(phrase_genre::Column::PhraseId.eq(phrase_id)))
                        .await?;
                    let images = repos
                        .phrase_images(&tenant)
                        .delete_where(Condition::all().add(phrase_image::Column::PhraseId.eq(phrase_id)))
                        .await?;
                    phrases.delete_owned(phrase_id).await?;

                    info!(tenant = %tenant, phrase_id, links, images, "phrase deleted");
                    Ok(())
                })
            })
            .await
    }

    /// 문장 단건 조회
    pub async fn get(
        state: &AppState,
        ctx: &TenantContext,
        phrase_id: i64,
    ) -> Result<PhraseResponse, AppError> {
        let tenant = ctx.tenant_id().clone();

        state
            .uow
            .read("phrase.get", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let found = repos
                        .phrases(&tenant)
                        .get(phrase_id)
                        .await?
                        .ok_or_else(|| AppError::not_found(PHRASE_NOT_FOUND))?;

                    let mut views = assemble(
                        vec![found],
                        &repos.phrase_images(&tenant),
                        &repos.phrase_genres(&tenant),
                        &repos.genres(&tenant),
                    )
                    .await?;
                    views.pop().ok_or_else(|| AppError::not_found(PHRASE_NOT_FOUND))
                })
            })
            .await
    }

    /// 문장 목록 (최신순, 키워드 검색)
    pub async fn list(
        state: &AppState,
        ctx: &TenantContext,
        query: PhraseListQuery,
    ) -> Result<Vec<PhraseResponse>, AppError> {
        let tenant = ctx.tenant_id().clone();
        let keyword = query
            .keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        state
            .uow
            .read("phrase.list", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let rows = repos
                        .phrases(&tenant)
                        .all(move |q| {
                            let q = match keyword {
                                Some(k) => q.filter(
                                    Condition::any()
                                        .add(phrase::Column::Text.contains(k.as_str()))
                                        .add(phrase::Column::Meaning.contains(k.as_str())),
                                ),
                                None => q,
                            };
                            q.order_by_desc(phrase::Column::CreatedAt)
                                .order_by_desc(phrase::Column::PhraseId)
                        })
                        .await?;

                    assemble(
                        rows,
                        &repos.phrase_images(&tenant),
                        &repos.phrase_genres(&tenant),
                        &repos.genres(&tenant),
                    )
                    .await
                })
            })
            .await
    }

    /// 장르 생성 (같은 사용자 안에서 이름 중복 불가)
    pub async fn create_genre(
        state: &AppState,
        ctx: &TenantContext,
        req: CreateGenreRequest,
    ) -> Result<GenreResponse, AppError> {
        req.validate()?;
        let tenant = ctx.tenant_id().clone();
        let name = req.name.trim().to_string();

        state
            .uow
            .write("genre.create", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let genres = repos.genres(&tenant);

                    let lookup = name.clone();
                    if genres
                        .reader()
                        .count(move |q| q.filter(genre::Column::Name.eq(lookup)))
                        .await?
                        > 0
                    {
                        return Err(AppError::conflict(format!("이미 존재하는 장르입니다: {}", name)));
                    }

                    let saved = genres
                        .add(genre::ActiveModel {
                            name: Set(name),
                            ..Default::default()
                        })
                        .await?;
                    Ok(saved.into())
                })
            })
            .await
    }

    /// 장르 목록 (이름순)
    pub async fn list_genres(
        state: &AppState,
        ctx: &TenantContext,
    ) -> Result<Vec<GenreResponse>, AppError> {
        let tenant = ctx.tenant_id().clone();

        state
            .uow
            .read("genre.list", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let rows = repos
                        .genres(&tenant)
                        .all(|q| q.order_by_asc(genre::Column::Name))
                        .await?;
                    Ok(rows.into_iter().map(GenreResponse::from).collect())
                })
            })
            .await
    }

    /// 장르 삭제 (문장과의 연결만 끊고 문장은 유지)
    pub async fn delete_genre(
        state: &AppState,
        ctx: &TenantContext,
        genre_id: i64,
    ) -> Result<(), AppError> {
        let tenant = ctx.tenant_id().clone();

        state
            .uow
            .write("genre.delete", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let genres = repos.genres(&tenant);
                    if genres.reader().get(genre_id).await?.is_none() {
                        return Err(AppError::not_found("존재하지 않는 장르입니다."));
                    }

                    repos
                        .phrase_genres(&tenant)
                        .delete_where(Condition::all().add(phrase_genre::Column::GenreId.eq(genre_id)))
                        .await?;
                    genres.delete_owned(genre_id).await?;
                    Ok(())
                })
            })
            .await
    }

    /// 문장 이미지 연결 (기존 이미지는 교체)
    pub async fn attach_image(
        state: &AppState,
        ctx: &TenantContext,
        phrase_id: i64,
        req: AttachImageRequest,
    ) -> Result<PhraseResponse, AppError> {
        req.validate()?;
        let tenant = ctx.tenant_id().clone();

        state
            .uow
            .write("phrase.attach_image", ctx.cancel(), move |repos| {
                Box::pin(async move {
                    let found = repos
                        .phrases(&tenant)
                        .reader()
                        .get(phrase_id)
                        .await?
                        .ok_or_else(|| AppError::not_found(PHRASE_NOT_FOUND))?;

                    let images = repos.phrase_images(&tenant);
                    images
                        .delete_where(Condition::all().add(phrase_image::Column::PhraseId.eq(phrase_id)))
                        .await?;
                    images
                        .add(phrase_image::ActiveModel {
                            phrase_id: Set(phrase_id),
                            url: Set(req.url),
                            prompt: Set(req.prompt),
                            ..Default::default()
                        })
                        .await?;

                    view_in_txn(&repos, &tenant, found).await
                })
            })
            .await
    }

    /// AI 이미지 생성 후 문장에 연결
    ///
    /// 일일 사용량을 먼저 확인하고, 생성과 저장이 모두 성공한 경우에만 사용량을
    /// 기록합니다. 한도를 넘으면 생성기를 호출하지 않고 `Gated::Denied`를 돌려줍니다.
    pub async fn generate_image(
        state: &AppState,
        ctx: &TenantContext,
        phrase_id: i64,
        generator: &dyn ImageGenerator,
    ) -> Result<Gated<PhraseResponse>, AppError> {
        let found = Self::get(state, ctx, phrase_id).await?;
        let prompt = build_prompt(&found.text, &found.meaning);

        OperationLimiter::run_gated(state, ctx, codes::IMAGE_GENERATION, 1, || async {
            let image = generator.generate(&prompt).await?;
            Self::attach_image(
                state,
                ctx,
                phrase_id,
                AttachImageRequest {
                    url: image.url,
                    prompt: Some(prompt.clone()),
                },
            )
            .await
        })
        .await
    }
}

/// 내 장르인지 확인 후 문장에 연결
async fn link_genres(
    repos: &RepositorySet<'_>,
    tenant: &TenantId,
    phrase_id: i64,
    genre_ids: &[i64],
) -> Result<(), AppError> {
    let unique: BTreeSet<i64> = genre_ids.iter().copied().collect();
    if unique.is_empty() {
        return Ok(());
    }

    let expected = unique.len() as u64;
    let lookup = unique.clone();
    let owned = repos
        .genres(tenant)
        .reader()
        .count(move |q| q.filter(genre::Column::GenreId.is_in(lookup)))
        .await?;
    if owned != expected {
        return Err(AppError::not_found("존재하지 않는 장르가 포함되어 있습니다."));
    }

    repos
        .phrase_genres(tenant)
        .add_range(unique.into_iter().map(|genre_id| phrase_genre::ActiveModel {
            phrase_id: Set(phrase_id),
            genre_id: Set(genre_id),
            ..Default::default()
        }))
        .await?;
    Ok(())
}

async fn view_in_txn(
    repos: &RepositorySet<'_>,
    tenant: &TenantId,
    found: phrase::Model,
) -> Result<PhraseResponse, AppError> {
    let mut views = assemble(
        vec![found],
        &repos.phrase_images(tenant).reader(),
        &repos.phrase_genres(tenant).reader(),
        &repos.genres(tenant).reader(),
    )
    .await?;
    views
        .pop()
        .ok_or_else(|| AppError::internal_error("phrase view could not be assembled"))
}

/// 문장 목록에 이미지와 장르를 붙여 응답으로 변환
async fn assemble<C>(
    rows: Vec<phrase::Model>,
    images: &Reader<'_, phrase_image::Entity, C>,
    links: &Reader<'_, phrase_genre::Entity, C>,
    genres: &Reader<'_, genre::Entity, C>,
) -> Result<Vec<PhraseResponse>, AppError>
where
    C: ConnectionTrait,
{
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let phrase_ids: Vec<i64> = rows.iter().map(|p| p.phrase_id).collect();

    let image_lookup = phrase_ids.clone();
    let mut images_by_phrase: HashMap<i64, ImageResponse> = images
        .all(move |q| q.filter(phrase_image::Column::PhraseId.is_in(image_lookup)))
        .await?
        .into_iter()
        .map(|image| (image.phrase_id, ImageResponse::from(image)))
        .collect();

    let link_rows = links
        .all(move |q| q.filter(phrase_genre::Column::PhraseId.is_in(phrase_ids)))
        .await?;

    let genre_ids: BTreeSet<i64> = link_rows.iter().map(|link| link.genre_id).collect();
    let genre_by_id: HashMap<i64, genre::Model> = if genre_ids.is_empty() {
        HashMap::new()
    } else {
        genres
            .all(move |q| q.filter(genre::Column::GenreId.is_in(genre_ids)))
            .await?
            .into_iter()
            .map(|g| (g.genre_id, g))
            .collect()
    };

    let mut genres_by_phrase: HashMap<i64, Vec<GenreResponse>> = HashMap::new();
    for link in link_rows {
        if let Some(g) = genre_by_id.get(&link.genre_id) {
            genres_by_phrase
                .entry(link.phrase_id)
                .or_default()
                .push(GenreResponse::from(g.clone()));
        }
    }

    Ok(rows
        .into_iter()
        .map(|p| {
            let image = images_by_phrase.remove(&p.phrase_id);
            let mut tags = genres_by_phrase.remove(&p.phrase_id).unwrap_or_default();
            tags.sort_by(|a, b| a.name.cmp(&b.name));
            PhraseResponse::new(p, image, tags)
        })
        .collect())
}
