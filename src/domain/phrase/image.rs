use async_trait::async_trait;

use crate::utils::error::AppError;

/// 외부 이미지 생성 결과
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub url: String,
}

/// 외부 이미지 생성기 (AI 이미지 API 등)
///
/// 호출 1회가 사용량 1단위입니다. 실패 시 사용량은 기록되지 않습니다.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, AppError>;
}

/// 문장으로부터 이미지 생성 프롬프트 작성
pub fn build_prompt(text: &str, meaning: &str) -> String {
    format!(
        "An illustration that helps remember the phrase \"{}\" (meaning: {}). No text in the image.",
        text.trim(),
        meaning.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_should_include_trimmed_phrase_and_meaning() {
        let prompt = build_prompt("  break a leg ", " 행운을 빌어 ");

        assert!(prompt.contains("\"break a leg\""));
        assert!(prompt.contains("meaning: 행운을 빌어)"));
    }
}
