use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::entity::{genre, phrase, phrase_image};

/// 문장 생성 요청
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhraseRequest {
    #[validate(length(min = 1, max = 500, message = "문장은 1~500자여야 합니다."))]
    pub text: String,

    #[validate(length(min = 1, max = 500, message = "뜻은 1~500자여야 합니다."))]
    pub meaning: String,

    #[validate(length(max = 1000, message = "메모는 1000자 이하여야 합니다."))]
    pub note: Option<String>,

    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

/// 문장 수정 요청
///
/// `genre_ids`가 None이면 기존 장르 연결을 유지합니다.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhraseRequest {
    #[validate(length(min = 1, max = 500, message = "문장은 1~500자여야 합니다."))]
    pub text: String,

    #[validate(length(min = 1, max = 500, message = "뜻은 1~500자여야 합니다."))]
    pub meaning: String,

    #[validate(length(max = 1000, message = "메모는 1000자 이하여야 합니다."))]
    pub note: Option<String>,

    pub genre_ids: Option<Vec<i64>>,
}

/// 장르 생성 요청
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGenreRequest {
    #[validate(length(min = 1, max = 50, message = "장르 이름은 1~50자여야 합니다."))]
    pub name: String,
}

/// 이미지 연결 요청
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttachImageRequest {
    #[validate(url(message = "올바른 이미지 URL이 아닙니다."))]
    pub url: String,

    pub prompt: Option<String>,
}

/// 문장 목록 검색 조건
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseListQuery {
    /// 문장/뜻 부분 일치
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreResponse {
    pub genre_id: i64,
    pub name: String,
}

impl From<genre::Model> for GenreResponse {
    fn from(model: genre::Model) -> Self {
        Self {
            genre_id: model.genre_id,
            name: model.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub url: String,
    pub prompt: Option<String>,
}

impl From<phrase_image::Model> for ImageResponse {
    fn from(model: phrase_image::Model) -> Self {
        Self {
            url: model.url,
            prompt: model.prompt,
        }
    }
}

/// 문장 조회 결과 (이미지, 장르 포함)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseResponse {
    pub phrase_id: i64,
    pub text: String,
    pub meaning: String,
    pub note: Option<String>,
    pub image: Option<ImageResponse>,
    pub genres: Vec<GenreResponse>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PhraseResponse {
    pub fn new(
        model: phrase::Model,
        image: Option<ImageResponse>,
        genres: Vec<GenreResponse>,
    ) -> Self {
        Self {
            phrase_id: model.phrase_id,
            text: model.text,
            meaning: model.meaning,
            note: model.note,
            image,
            genres,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
