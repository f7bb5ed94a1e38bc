//! 에너지 절감 투자에 대한 다년도 재무 예측 엔진.
//!
//! 입력 → 에너지 모델 → 현금흐름 → 회수기간 → 요약 순으로만 흐르며,
//! 입출력이나 공유 상태 없이 매번 새 결과를 만든다.

pub mod carbon_factor;
pub mod cash_flow;
pub mod energy_model;
pub mod error;
pub mod payback;
pub mod summary;

use serde::{Deserialize, Serialize};

pub use carbon_factor::{CarbonSource, CUSTOM_KEY};
pub use cash_flow::YearlyEntry;
pub use energy_model::EnergyBreakdown;
pub use error::ProjectionError;
pub use payback::Payback;
pub use summary::ProjectionResult;

/// 에너지 절감 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyProfile {
    /// 연간 에너지 절감량 [kWh/년]
    pub energy_savings_kwh_per_year: f64,
    /// 기준 사용량 대비 절감 비율 (0, 1]
    pub savings_percentage: f64,
    /// 전력 단가 [USD/kWh]
    pub electricity_rate_usd_per_kwh: f64,
    /// 배출계수 [kg CO₂/kWh]
    pub carbon_factor_kg_per_kwh: f64,
}

impl EnergyProfile {
    /// 배출계수를 국가 키("Custom" 포함)로 결정해 프로필을 만든다.
    pub fn with_carbon_source(
        energy_savings_kwh_per_year: f64,
        savings_percentage: f64,
        electricity_rate_usd_per_kwh: f64,
        source: &CarbonSource,
    ) -> Result<Self, ProjectionError> {
        Ok(Self {
            energy_savings_kwh_per_year,
            savings_percentage,
            electricity_rate_usd_per_kwh,
            carbon_factor_kg_per_kwh: source.factor()?,
        })
    }
}

/// 투자 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentProfile {
    /// 0년차 초기 투자비 [USD]
    pub initial_investment_usd: f64,
    /// 0년차 포함 매년 부과되는 수수료 [USD/년]
    pub annual_fee_usd: f64,
    /// 예측 기간 [년]
    pub horizon_years: u32,
}

/// 두 입력 프로필로 예측 결과를 계산한다.
///
/// 잘못된 입력은 어떤 계산도 하기 전에 `InvalidInput`으로 거부하고,
/// 연간 절감액이 0이면 `DivisionByZero`를 반환한다.
pub fn compute_projection(
    energy: &EnergyProfile,
    investment: &InvestmentProfile,
) -> Result<ProjectionResult, ProjectionError> {
    let breakdown = energy_model::derive(
        energy.energy_savings_kwh_per_year,
        energy.savings_percentage,
        energy.electricity_rate_usd_per_kwh,
        energy.carbon_factor_kg_per_kwh,
    )?;
    let series = cash_flow::project(
        energy.energy_savings_kwh_per_year,
        energy.electricity_rate_usd_per_kwh,
        investment.initial_investment_usd,
        investment.annual_fee_usd,
        investment.horizon_years,
    )?;
    let annual_savings = cash_flow::annual_savings(
        energy.energy_savings_kwh_per_year,
        energy.electricity_rate_usd_per_kwh,
    );
    let payback = payback::estimate_from_series(&series, annual_savings)?;
    Ok(summary::assemble(
        energy.energy_savings_kwh_per_year,
        annual_savings,
        breakdown,
        series,
        payback,
    ))
}
