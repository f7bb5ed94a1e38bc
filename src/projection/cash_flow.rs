use serde::{Deserialize, Serialize};

use super::error::{require_finite_result, require_non_negative, ProjectionError};

/// 예측 기간 상한 [년].
pub const MAX_HORIZON_YEARS: u32 = 100;

/// 연도별 현금흐름 한 줄.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyEntry {
    /// 0부터 시작하는 연도 인덱스
    pub year_index: u32,
    /// 해당 연도 비용 [USD] (0년차는 초기 투자비 + 연간 수수료)
    pub cost: f64,
    /// 해당 연도 순이익 = 연간 절감액 - 비용
    pub net_this_year: f64,
    /// 0년차부터 누적된 순이익
    pub cumulative_net: f64,
}

/// 예측 기간은 1년 이상 `MAX_HORIZON_YEARS` 이하여야 한다.
pub fn validate_horizon(horizon_years: u32) -> Result<u32, ProjectionError> {
    if horizon_years == 0 {
        return Err(ProjectionError::invalid(
            "horizon_years",
            "예측 기간은 1년 이상이어야 합니다",
        ));
    }
    if horizon_years > MAX_HORIZON_YEARS {
        return Err(ProjectionError::invalid(
            "horizon_years",
            format!("예측 기간은 {MAX_HORIZON_YEARS}년 이하여야 합니다 (입력값 {horizon_years})"),
        ));
    }
    Ok(horizon_years)
}

/// 연간 절감액 [USD/년].
pub fn annual_savings(energy_savings_kwh: f64, electricity_rate_usd_per_kwh: f64) -> f64 {
    energy_savings_kwh * electricity_rate_usd_per_kwh
}

/// 연도별 비용표를 만든다. 0년차에만 초기 투자비가 더해진다.
pub fn cost_schedule(initial_investment_usd: f64, annual_fee_usd: f64, horizon_years: u32) -> Vec<f64> {
    (0..horizon_years)
        .map(|year| {
            if year == 0 {
                initial_investment_usd + annual_fee_usd
            } else {
                annual_fee_usd
            }
        })
        .collect()
}

/// 절감액과 비용표로 연도별 누적 순이익을 계산한다.
pub fn cumulative_series(annual_savings_usd: f64, costs: &[f64]) -> Vec<YearlyEntry> {
    let mut cumulative = 0.0;
    costs
        .iter()
        .enumerate()
        .map(|(i, &cost)| {
            let net_this_year = annual_savings_usd - cost;
            cumulative = if i == 0 {
                net_this_year
            } else {
                cumulative + net_this_year
            };
            YearlyEntry {
                year_index: i as u32,
                cost,
                net_this_year,
                cumulative_net: cumulative,
            }
        })
        .collect()
}

/// 입력을 검증한 뒤 예측 기간 동안의 현금흐름을 계산한다.
pub fn project(
    energy_savings_kwh: f64,
    electricity_rate_usd_per_kwh: f64,
    initial_investment_usd: f64,
    annual_fee_usd: f64,
    horizon_years: u32,
) -> Result<Vec<YearlyEntry>, ProjectionError> {
    let energy = require_non_negative("energy_savings", energy_savings_kwh)?;
    let rate = require_non_negative("electricity_rate", electricity_rate_usd_per_kwh)?;
    let initial = require_non_negative("initial_investment", initial_investment_usd)?;
    let fee = require_non_negative("annual_fee", annual_fee_usd)?;
    let horizon = validate_horizon(horizon_years)?;

    let savings = require_finite_result("annual_savings", annual_savings(energy, rate))?;
    let costs = cost_schedule(initial, fee, horizon);
    let series = cumulative_series(savings, &costs);
    if series.iter().any(|e| !e.cumulative_net.is_finite()) {
        return Err(ProjectionError::invalid(
            "cumulative_net",
            "누적 순이익이 표현 범위를 벗어납니다",
        ));
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_investment_only_in_year_zero() {
        assert_eq!(cost_schedule(100.0, 10.0, 4), vec![110.0, 10.0, 10.0, 10.0]);
    }

    #[test]
    fn cumulative_accumulates_net() {
        let series = cumulative_series(50.0, &[110.0, 10.0, 10.0]);
        let cumulative: Vec<f64> = series.iter().map(|e| e.cumulative_net).collect();
        assert_eq!(cumulative, vec![-60.0, -20.0, 20.0]);
        assert_eq!(series[2].year_index, 2);
        assert_eq!(series[1].net_this_year, 40.0);
    }

    #[test]
    fn zero_horizon_rejected() {
        let err = project(1.0, 1.0, 0.0, 0.0, 0).unwrap_err();
        assert!(matches!(
            err,
            ProjectionError::InvalidInput {
                field: "horizon_years",
                ..
            }
        ));
    }

    #[test]
    fn horizon_is_capped() {
        assert_eq!(project(1.0, 1.0, 0.0, 0.0, MAX_HORIZON_YEARS).map(|s| s.len()), Ok(100));
        let err = project(1.0, 1.0, 0.0, 0.0, 4_000_000_000).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidInput { field: "horizon_years", .. }));
    }

    #[test]
    fn overflowing_savings_or_cumulative_rejected() {
        let err = project(1e200, 1e200, 1_000.0, 10.0, 3).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidInput { field: "annual_savings", .. }));
        let err = project(0.0, 0.0, 0.0, f64::MAX, 3).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidInput { field: "cumulative_net", .. }));
    }

    #[test]
    fn negative_money_rejected() {
        assert!(project(1.0, 1.0, -1.0, 0.0, 5).is_err());
        assert!(project(1.0, 1.0, 0.0, -1.0, 5).is_err());
        assert!(project(-1.0, 1.0, 0.0, 0.0, 5).is_err());
        assert!(project(1.0, f64::INFINITY, 0.0, 0.0, 5).is_err());
    }
}
