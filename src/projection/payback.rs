use serde::{Deserialize, Serialize};

use super::cash_flow::YearlyEntry;
use super::error::ProjectionError;

/// 회수기간 추정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payback {
    /// 손익분기 연도에서 산출한 회수기간 [개월]. 0년차 분기 시 음수가 될 수 있다.
    Months(i64),
    /// 예측 기간 안에 누적 순이익이 0 이상이 되지 않음
    NotRecovered,
}

impl Payback {
    pub fn months(&self) -> Option<i64> {
        match self {
            Payback::Months(m) => Some(*m),
            Payback::NotRecovered => None,
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, Payback::Months(_))
    }
}

/// 누적 순이익이 처음으로 0 이상이 되는 연도 인덱스.
pub fn break_even_index(cumulative: &[f64]) -> Option<usize> {
    cumulative.iter().position(|&c| c >= 0.0)
}

/// 손익분기 연도 `i`에서
/// `round((i + 1) * 12 * ((cost[i] - 절감액) / 절감액))` 로 회수기간(개월)을 구한다.
///
/// 반올림은 0.5에서 짝수 쪽으로 붙인다. 손익분기 연도의 비용이 절감액보다 작으면 결과가 음수가 된다.
pub fn estimate(
    costs: &[f64],
    cumulative: &[f64],
    annual_savings_usd: f64,
) -> Result<Payback, ProjectionError> {
    if annual_savings_usd == 0.0 {
        return Err(ProjectionError::DivisionByZero);
    }
    let Some(i) = break_even_index(cumulative) else {
        return Ok(Payback::NotRecovered);
    };
    let cost = costs.get(i).copied().ok_or_else(|| {
        ProjectionError::invalid("cost_schedule", "비용표가 누적 시계열보다 짧습니다")
    })?;
    let months = ((i + 1) as f64) * 12.0 * ((cost - annual_savings_usd) / annual_savings_usd);
    if !months.is_finite() {
        return Err(ProjectionError::invalid(
            "annual_savings",
            "회수기간이 표현 범위를 벗어납니다",
        ));
    }
    Ok(Payback::Months(months.round_ties_even() as i64))
}

/// 연도별 현금흐름으로부터 회수기간을 추정한다.
pub fn estimate_from_series(
    series: &[YearlyEntry],
    annual_savings_usd: f64,
) -> Result<Payback, ProjectionError> {
    let costs: Vec<f64> = series.iter().map(|e| e.cost).collect();
    let cumulative: Vec<f64> = series.iter().map(|e| e.cumulative_net).collect();
    estimate(&costs, &cumulative, annual_savings_usd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_non_negative_index_wins() {
        assert_eq!(break_even_index(&[-5.0, 0.0, 3.0]), Some(1));
        assert_eq!(break_even_index(&[-5.0, -1.0]), None);
        assert_eq!(break_even_index(&[]), None);
    }

    #[test]
    fn later_year_uses_that_years_cost() {
        // i = 2, cost = 30, 절감액 = 40 -> 3 * 12 * (-0.25) = -9
        let p = estimate(&[200.0, 30.0, 30.0], &[-160.0, -150.0, 10.0], 40.0).unwrap();
        assert_eq!(p, Payback::Months(-9));
    }

    #[test]
    fn half_rounds_to_even() {
        // 12 * (cost - 8) / 8: 4.5 -> 4, -4.5 -> -4, 1.5 -> 2
        assert_eq!(estimate(&[11.0], &[0.0], 8.0).unwrap(), Payback::Months(4));
        assert_eq!(estimate(&[5.0], &[0.0], 8.0).unwrap(), Payback::Months(-4));
        assert_eq!(estimate(&[9.0], &[0.0], 8.0).unwrap(), Payback::Months(2));
    }

    #[test]
    fn not_recovered_is_distinct_from_zero() {
        let p = estimate(&[100.0, 100.0], &[-50.0, -100.0], 50.0).unwrap();
        assert_eq!(p, Payback::NotRecovered);
        assert_eq!(p.months(), None);
        assert!(!p.is_recovered());
    }

    #[test]
    fn non_finite_ratio_is_not_reported_as_zero_months() {
        let err = estimate(&[1_010.0], &[0.0], f64::INFINITY).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidInput { field: "annual_savings", .. }));
    }

    #[test]
    fn zero_savings_is_division_by_zero() {
        let err = estimate(&[0.0], &[0.0], 0.0).unwrap_err();
        assert_eq!(err, ProjectionError::DivisionByZero);
    }
}
