use thiserror::Error;

/// 투자 회수 예측 계산 중 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// 입력값이 허용 범위를 벗어남 (음수, 0 이하 비율, 알 수 없는 국가 키 등)
    #[error("잘못된 입력 `{field}`: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    /// 연간 절감액이 0이라 회수기간 공식을 계산할 수 없음
    #[error("연간 절감액이 0이므로 회수기간을 계산할 수 없습니다")]
    DivisionByZero,
    /// 예측 기간이 3년 미만이라 3년차 순수익이 정의되지 않음
    #[error("예측 기간 {horizon_years}년은 3년차 순수익을 계산하기에 짧습니다")]
    HorizonTooShortForYear3 { horizon_years: u32 },
}

impl ProjectionError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ProjectionError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// 계산 결과가 f64 표현 범위 안에 있는지 검사한다.
pub(crate) fn require_finite_result(quantity: &'static str, value: f64) -> Result<f64, ProjectionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProjectionError::invalid(
            quantity,
            "입력값이 너무 커서 계산 결과가 표현 범위를 벗어납니다",
        ))
    }
}

/// 유한한 0 이상 값인지 검사한다.
pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<f64, ProjectionError> {
    if !value.is_finite() {
        return Err(ProjectionError::invalid(field, "유한한 숫자가 아닙니다"));
    }
    if value < 0.0 {
        return Err(ProjectionError::invalid(
            field,
            format!("0 이상이어야 합니다 (입력값 {value})"),
        ));
    }
    Ok(value)
}
