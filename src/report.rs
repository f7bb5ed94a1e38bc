//! 예측 결과를 텍스트 보고서로 정리한다. 문서 바이트(PDF 등) 생성은 다루지 않는다.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::config::Captions;
use crate::i18n::{keys, Translator};
use crate::projection::{
    EnergyProfile, InvestmentProfile, Payback, ProjectionResult, YearlyEntry,
};

/// 보고서에 들어가는 수치 필드.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFields {
    pub energy_savings_kwh_per_year: f64,
    pub annual_co2_reduction_kg: f64,
    pub electricity_rate_usd_per_kwh: f64,
    pub savings_percentage: f64,
    pub initial_investment_usd: f64,
    pub annual_fee_usd: f64,
    pub annual_savings_usd: f64,
    pub net_income_at_year3_usd: Option<f64>,
    pub payback: Payback,
    pub cash_flow: Vec<YearlyEntry>,
}

impl ReportFields {
    pub fn from_projection(
        energy: &EnergyProfile,
        investment: &InvestmentProfile,
        result: &ProjectionResult,
    ) -> Self {
        Self {
            energy_savings_kwh_per_year: energy.energy_savings_kwh_per_year,
            annual_co2_reduction_kg: result.annual_co2_reduction_kg,
            electricity_rate_usd_per_kwh: energy.electricity_rate_usd_per_kwh,
            savings_percentage: energy.savings_percentage,
            initial_investment_usd: investment.initial_investment_usd,
            annual_fee_usd: investment.annual_fee_usd,
            annual_savings_usd: result.annual_savings_usd,
            net_income_at_year3_usd: result.net_income_at_year3().ok(),
            payback: result.payback,
            cash_flow: result.cumulative_series.clone(),
        }
    }
}

/// 회수기간 표시 문자열.
pub fn payback_text(payback: Payback, tr: &Translator) -> String {
    match payback {
        Payback::Months(m) => tr.tf(keys::RESULT_PAYBACK_MONTHS, &[("months", m.to_string())]),
        Payback::NotRecovered => tr.t(keys::RESULT_NOT_RECOVERED),
    }
}

/// 3년 누적 순이익 표시 문자열.
pub fn net_income_text(value: Option<f64>, tr: &Translator, captions: &Captions) -> String {
    match value {
        Some(v) => captions.money(v),
        None => tr.t(keys::RESULT_NOT_AVAILABLE),
    }
}

/// 보고서 본문을 만든다.
pub fn render_text(fields: &ReportFields, tr: &Translator, captions: &Captions) -> String {
    let mut out = String::new();
    let title = tr.t(keys::REPORT_TITLE);
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count().max(20)));

    let rows = [
        (
            tr.t(keys::REPORT_ENERGY_SAVINGS),
            format!(
                "{} {}",
                crate::config::group_thousands(fields.energy_savings_kwh_per_year),
                tr.tf(keys::UNIT_ENERGY_PER_YEAR, &captions.vars())
            ),
        ),
        (
            tr.t(keys::RESULT_CO2_REDUCTION),
            format!(
                "{} {}",
                crate::config::group_thousands(fields.annual_co2_reduction_kg),
                tr.tf(keys::UNIT_CO2_PER_YEAR, &captions.vars())
            ),
        ),
        (
            tr.t(keys::REPORT_ELECTRICITY_RATE),
            format!(
                "{}{:.4}/{}",
                captions.currency_symbol, fields.electricity_rate_usd_per_kwh, captions.energy_unit
            ),
        ),
        (
            tr.t(keys::REPORT_SAVINGS_PERCENTAGE),
            format!("{:.1}%", fields.savings_percentage * 100.0),
        ),
        (
            tr.t(keys::REPORT_INITIAL_INVESTMENT),
            captions.money(fields.initial_investment_usd),
        ),
        (tr.t(keys::REPORT_ANNUAL_FEE), captions.money(fields.annual_fee_usd)),
        (
            tr.t(keys::RESULT_ANNUAL_SAVINGS),
            captions.money(fields.annual_savings_usd),
        ),
        (
            tr.t(keys::RESULT_NET_INCOME_Y3),
            net_income_text(fields.net_income_at_year3_usd, tr, captions),
        ),
        (tr.t(keys::RESULT_PAYBACK), payback_text(fields.payback, tr)),
    ];
    let width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (label, value) in &rows {
        let pad = width - label.chars().count();
        let _ = writeln!(out, "{label}{} : {value}", " ".repeat(pad));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{} ({})", tr.t(keys::REPORT_CASH_FLOW), captions.currency_code);
    out.push_str(&cash_flow_table(&fields.cash_flow, fields.annual_savings_usd, tr, captions));
    out
}

/// 연도별 현금흐름 표.
pub fn cash_flow_table(
    series: &[YearlyEntry],
    annual_savings_usd: f64,
    tr: &Translator,
    captions: &Captions,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6} {:>18} {:>18} {:>18} {:>18}",
        tr.t(keys::TABLE_YEAR),
        tr.t(keys::TABLE_SAVINGS),
        tr.t(keys::TABLE_COST),
        tr.t(keys::TABLE_NET),
        tr.t(keys::TABLE_CUMULATIVE)
    );
    for e in series {
        let _ = writeln!(
            out,
            "{:>6} {:>18} {:>18} {:>18} {:>18}",
            e.year_index,
            captions.money(annual_savings_usd),
            captions.money(e.cost),
            captions.money(e.net_this_year),
            captions.money(e.cumulative_net)
        );
    }
    out
}

/// 보고서 텍스트를 파일로 저장한다.
pub fn save_report(path: &Path, text: &str) -> std::io::Result<()> {
    fs::write(path, text)?;
    log::info!("보고서 저장: {}", path.display());
    Ok(())
}
