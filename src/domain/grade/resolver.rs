use super::entity::grade;
use crate::utils::error::AppError;

/// 정답률 → 등급 변환기
///
/// 기준 행을 `min_rate` 내림차순으로 들고 있다가, 정답률 이하인 첫 기준을
/// 돌려줍니다. DB 접근이 없는 순수 계산입니다.
#[derive(Debug, Clone)]
pub struct GradeResolver {
    bands: Vec<grade::Model>,
}

impl GradeResolver {
    pub fn new(mut bands: Vec<grade::Model>) -> Self {
        bands.sort_by(|a, b| b.min_rate.total_cmp(&a.min_rate));
        Self { bands }
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn bands(&self) -> &[grade::Model] {
        &self.bands
    }

    /// `rate`(0.0 ~ 1.0)에 해당하는 등급
    pub fn resolve(&self, rate: f64) -> Result<&grade::Model, AppError> {
        if self.bands.is_empty() {
            return Err(AppError::invariant("등급 기준 데이터가 없습니다."));
        }
        if rate.is_nan() {
            return Err(AppError::invariant("정답률을 계산할 수 없습니다."));
        }

        self.bands
            .iter()
            .find(|band| band.min_rate <= rate)
            .ok_or_else(|| {
                AppError::invariant(format!("정답률 {:.2}에 해당하는 등급이 없습니다.", rate))
            })
    }

    /// 맞힌 수 / 전체 수로 등급 계산
    pub fn resolve_counts(&self, correct: usize, total: usize) -> Result<&grade::Model, AppError> {
        if total == 0 {
            return Err(AppError::invariant("채점할 문항이 없습니다."));
        }
        self.resolve(correct as f64 / total as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::now_utc;

    fn band(id: i64, name: &str, min_rate: f64) -> grade::Model {
        let now = now_utc();
        grade::Model {
            grade_id: id,
            name: name.to_string(),
            min_rate,
            created_at: now,
            updated_at: now,
        }
    }

    fn default_resolver() -> GradeResolver {
        // 일부러 뒤섞인 순서로 전달
        GradeResolver::new(vec![
            band(3, "B", 0.6),
            band(1, "S", 0.9),
            band(4, "C", 0.0),
            band(2, "A", 0.8),
        ])
    }

    #[test]
    fn should_pick_highest_band_at_or_below_rate() {
        let resolver = default_resolver();

        assert_eq!(resolver.resolve(1.0).unwrap().name, "S");
        assert_eq!(resolver.resolve(0.9).unwrap().name, "S");
        assert_eq!(resolver.resolve(0.85).unwrap().name, "A");
        assert_eq!(resolver.resolve(0.6).unwrap().name, "B");
        assert_eq!(resolver.resolve(0.59).unwrap().name, "C");
        assert_eq!(resolver.resolve(0.0).unwrap().name, "C");
    }

    #[test]
    fn should_fail_without_bands() {
        let resolver = GradeResolver::new(vec![]);

        let err = resolver.resolve(0.5).unwrap_err();
        assert!(matches!(err, AppError::InvariantViolation(_)));
    }

    #[test]
    fn should_fail_when_rate_is_below_every_band() {
        let resolver = GradeResolver::new(vec![band(1, "S", 0.9), band(2, "A", 0.8)]);

        assert!(resolver.resolve(0.5).is_err());
    }

    #[test]
    fn should_be_deterministic() {
        let resolver = default_resolver();

        for step in 0..=100 {
            let rate = step as f64 / 100.0;
            let first = resolver.resolve(rate).unwrap().grade_id;
            let second = resolver.resolve(rate).unwrap().grade_id;
            assert_eq!(first, second, "rate {}", rate);
        }
    }

    #[test]
    fn higher_rate_should_never_yield_lower_band() {
        let resolver = default_resolver();

        let mut previous_threshold = f64::MIN;
        for step in 0..=100 {
            let rate = step as f64 / 100.0;
            let threshold = resolver.resolve(rate).unwrap().min_rate;
            assert!(threshold >= previous_threshold, "rate {}", rate);
            previous_threshold = threshold;
        }
    }

    #[test]
    fn should_resolve_from_counts() {
        let resolver = default_resolver();

        assert_eq!(resolver.resolve_counts(2, 3).unwrap().name, "B");
        assert!(resolver.resolve_counts(0, 0).is_err());
    }
}
