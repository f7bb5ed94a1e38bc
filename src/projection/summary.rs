use serde::{Deserialize, Serialize};

use super::cash_flow::YearlyEntry;
use super::energy_model::EnergyBreakdown;
use super::error::ProjectionError;
use super::payback::Payback;

/// 3년차 순수익을 읽을 연도 인덱스.
pub const YEAR3_INDEX: usize = 2;

/// 한 번의 예측 계산 결과. 입력이 바뀔 때마다 새로 만든다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// 연간 에너지 절감량 [kWh/년]
    pub energy_savings_kwh_per_year: f64,
    /// 연간 절감액 [USD/년]
    pub annual_savings_usd: f64,
    /// 연간 CO₂ 감축량 [kg/년]
    pub annual_co2_reduction_kg: f64,
    /// 3년 누적 순이익 [USD]. 예측 기간이 3년 미만이면 없음.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub net_income_at_year3_usd: Option<f64>,
    pub payback: Payback,
    /// 절감 전/후 참고값
    pub energy: EnergyBreakdown,
    /// 연도별 현금흐름 (길이 = 예측 기간)
    pub cumulative_series: Vec<YearlyEntry>,
}

impl ProjectionResult {
    pub fn horizon_years(&self) -> u32 {
        self.cumulative_series.len() as u32
    }

    pub fn payback_months(&self) -> Option<i64> {
        self.payback.months()
    }

    /// 3년차 순수익. 예측 기간이 짧으면 `HorizonTooShortForYear3`.
    pub fn net_income_at_year3(&self) -> Result<f64, ProjectionError> {
        self.net_income_at_year3_usd
            .ok_or(ProjectionError::HorizonTooShortForYear3 {
                horizon_years: self.horizon_years(),
            })
    }

    /// 마지막 연도의 누적 순이익.
    pub fn final_cumulative_net(&self) -> Option<f64> {
        self.cumulative_series.last().map(|e| e.cumulative_net)
    }
}

/// 계산된 중간값을 결과 구조체로 묶는다.
pub fn assemble(
    energy_savings_kwh: f64,
    annual_savings_usd: f64,
    energy: EnergyBreakdown,
    cumulative_series: Vec<YearlyEntry>,
    payback: Payback,
) -> ProjectionResult {
    let net_income_at_year3_usd = cumulative_series
        .get(YEAR3_INDEX)
        .map(|e| e.cumulative_net);
    ProjectionResult {
        energy_savings_kwh_per_year: energy_savings_kwh,
        annual_savings_usd,
        annual_co2_reduction_kg: energy.annual_co2_reduction_kg,
        net_income_at_year3_usd,
        payback,
        energy,
        cumulative_series,
    }
}
