use serde::{Deserialize, Serialize};

use super::error::{require_finite_result, require_non_negative, ProjectionError};

/// 절감 전/후 에너지 및 전력비 산출 결과. 표시용이며 현금흐름 계산에는 쓰이지 않는다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyBreakdown {
    /// 절감 전 총 사용량 [kWh/년]
    pub total_energy_before_kwh: f64,
    /// 절감 후 사용량 [kWh/년]
    pub energy_after_kwh: f64,
    /// 절감 전 전력비 [USD/년]
    pub cost_before_usd: f64,
    /// 절감 후 전력비 [USD/년]
    pub cost_after_usd: f64,
    /// 연간 CO₂ 감축량 [kg/년]
    pub annual_co2_reduction_kg: f64,
}

/// 절감 비율은 (0, 1] 범위의 비율이어야 한다.
pub fn validate_savings_percentage(savings_percentage: f64) -> Result<f64, ProjectionError> {
    if !savings_percentage.is_finite() {
        return Err(ProjectionError::invalid(
            "savings_percentage",
            "유한한 숫자가 아닙니다",
        ));
    }
    if savings_percentage <= 0.0 {
        return Err(ProjectionError::invalid(
            "savings_percentage",
            format!("0보다 커야 합니다 (입력값 {savings_percentage})"),
        ));
    }
    if savings_percentage > 1.0 {
        return Err(ProjectionError::invalid(
            "savings_percentage",
            format!("비율이므로 1 이하여야 합니다 (입력값 {savings_percentage})"),
        ));
    }
    Ok(savings_percentage)
}

/// 절감량과 절감 비율로 절감 전/후 사용량, 전력비, CO₂ 감축량을 계산한다.
pub fn derive(
    energy_savings_kwh: f64,
    savings_percentage: f64,
    electricity_rate_usd_per_kwh: f64,
    carbon_factor_kg_per_kwh: f64,
) -> Result<EnergyBreakdown, ProjectionError> {
    let energy_savings = require_non_negative("energy_savings", energy_savings_kwh)?;
    let pct = validate_savings_percentage(savings_percentage)?;
    let rate = require_non_negative("electricity_rate", electricity_rate_usd_per_kwh)?;
    let factor = require_non_negative("carbon_factor", carbon_factor_kg_per_kwh)?;

    let total_energy_before = energy_savings / pct;
    if !total_energy_before.is_finite() {
        return Err(ProjectionError::invalid(
            "savings_percentage",
            format!("절감 전 사용량이 표현 범위를 벗어납니다 (입력값 {pct})"),
        ));
    }
    let energy_after = total_energy_before - energy_savings;
    Ok(EnergyBreakdown {
        total_energy_before_kwh: total_energy_before,
        energy_after_kwh: energy_after,
        cost_before_usd: require_finite_result("cost_before", total_energy_before * rate)?,
        cost_after_usd: require_finite_result("cost_after", energy_after * rate)?,
        annual_co2_reduction_kg: require_finite_result(
            "annual_co2_reduction",
            energy_savings * factor,
        )?,
    })
}
