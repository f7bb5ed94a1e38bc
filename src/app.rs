use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{self, Config, ConfigError, ProjectionDefaults};
use crate::i18n::{self, keys, Translator};
use crate::projection::{
    self, CarbonSource, EnergyProfile, InvestmentProfile, ProjectionError, ProjectionResult,
};
use crate::report::{self, ReportFields};
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 예측 계산 오류
    #[error("계산 오류: {0}")]
    Projection(#[from] ProjectionError),
    /// 결과 직렬화 오류
    #[error("출력 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 결과 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Toml,
}

/// 설정, 설정 파일 경로, 번역기를 묶은 실행 컨텍스트.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: Config,
    pub config_path: PathBuf,
    pub tr: Translator,
}

impl Session {
    /// 설정을 로드하고 언어를 결정한다. `lang`은 CLI 플래그 값.
    pub fn load(config_path: Option<&Path>, lang: Option<&str>) -> Result<Self, AppError> {
        let config_path = config::resolve_path(config_path);
        let config = config::load_or_default_from(&config_path)?;
        Ok(Self::new(config, config_path, lang))
    }

    pub fn new(config: Config, config_path: PathBuf, lang: Option<&str>) -> Self {
        let tr = translator_for(&config, lang.unwrap_or("auto"));
        Self {
            config,
            config_path,
            tr,
        }
    }

    /// 설정의 언어가 바뀌었을 때 번역기를 다시 만든다.
    pub fn retranslate(&mut self) {
        self.tr = translator_for(&self.config, "auto");
    }

    pub fn save_config(&self) -> Result<(), AppError> {
        self.config.save_to(&self.config_path)?;
        Ok(())
    }

    pub fn captions(&self) -> &config::Captions {
        &self.config.captions
    }
}

fn translator_for(config: &Config, cli_lang: &str) -> Translator {
    let code = i18n::resolve_language(cli_lang, Some(config.language.as_str()));
    log::debug!("언어 결정: {code}");
    Translator::new_with_pack(&code, config.language_pack_dir.as_deref())
}

/// 명령행 등에서 일부만 주어진 입력. 빠진 값은 설정 기본값으로 채운다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionOverrides {
    pub energy_savings_kwh_per_year: Option<f64>,
    pub savings_percentage: Option<f64>,
    pub electricity_rate_usd_per_kwh: Option<f64>,
    /// 국가명/코드 또는 "Custom"
    pub country: Option<String>,
    /// 직접 지정한 배출계수. 주어지면 국가 선택보다 우선한다.
    pub carbon_factor_kg_per_kwh: Option<f64>,
    pub initial_investment_usd: Option<f64>,
    pub annual_fee_usd: Option<f64>,
    pub horizon_years: Option<u32>,
}

impl ProjectionOverrides {
    pub fn carbon_source(&self, defaults: &ProjectionDefaults) -> CarbonSource {
        match (self.carbon_factor_kg_per_kwh, &self.country) {
            (Some(factor), _) => CarbonSource::Custom(factor),
            (None, Some(country)) => {
                CarbonSource::from_key(country, defaults.custom_carbon_factor)
            }
            (None, None) => defaults.carbon_source(),
        }
    }

    /// 기본값과 합쳐 두 입력 프로필을 만든다.
    pub fn profiles(
        &self,
        defaults: &ProjectionDefaults,
    ) -> Result<(EnergyProfile, InvestmentProfile), ProjectionError> {
        let energy = EnergyProfile::with_carbon_source(
            self.energy_savings_kwh_per_year
                .unwrap_or(defaults.energy_savings_kwh_per_year),
            self.savings_percentage.unwrap_or(defaults.savings_percentage),
            self.electricity_rate_usd_per_kwh
                .unwrap_or(defaults.electricity_rate_usd_per_kwh),
            &self.carbon_source(defaults),
        )?;
        let investment = InvestmentProfile {
            initial_investment_usd: self
                .initial_investment_usd
                .unwrap_or(defaults.initial_investment_usd),
            annual_fee_usd: self.annual_fee_usd.unwrap_or(defaults.annual_fee_usd),
            horizon_years: self.horizon_years.unwrap_or(defaults.horizon_years),
        };
        Ok((energy, investment))
    }
}

/// 한 번의 예측 요청을 계산하고 출력 문자열을 만든다. `report_path`가 있으면 보고서도 저장한다.
pub fn run_projection(
    session: &Session,
    overrides: &ProjectionOverrides,
    format: OutputFormat,
    report_path: Option<&Path>,
) -> Result<String, AppError> {
    let (energy, investment) = overrides.profiles(&session.config.projection)?;
    let result = projection::compute_projection(&energy, &investment)?;
    log::debug!(
        "예측 완료: horizon={} payback={:?}",
        result.horizon_years(),
        result.payback
    );
    if let Some(path) = report_path {
        let fields = ReportFields::from_projection(&energy, &investment, &result);
        let text = report::render_text(&fields, &session.tr, session.captions());
        report::save_report(path, &text)?;
    }
    render_result(&result, format, &session.tr, session.captions())
}

/// 결과를 요청한 형식의 문자열로 만든다.
pub fn render_result(
    result: &ProjectionResult,
    format: OutputFormat,
    tr: &Translator,
    captions: &config::Captions,
) -> Result<String, AppError> {
    match format {
        OutputFormat::Text => {
            let mut out = ui_cli::summary_lines(result, tr, captions).join("\n");
            out.push('\n');
            out.push_str(&report::cash_flow_table(
                &result.cumulative_series,
                result.annual_savings_usd,
                tr,
                captions,
            ));
            Ok(out)
        }
        OutputFormat::Toml => Ok(toml::to_string_pretty(result)?),
    }
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(session: &mut Session) -> Result<(), AppError> {
    loop {
        match ui_cli::main_menu(&session.tr)? {
            MenuChoice::Projection => ui_cli::handle_projection(session)?,
            MenuChoice::Countries => ui_cli::handle_countries(&session.tr),
            MenuChoice::Settings => {
                if ui_cli::handle_settings(session)? {
                    session.save_config()?;
                    session.retranslate();
                }
            }
            MenuChoice::Exit => {
                session.save_config()?;
                println!("{}", session.tr.t(keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Config::default(), PathBuf::from("unused.toml"), Some("en"))
    }

    #[test]
    fn overrides_fall_back_to_defaults() {
        let defaults = ProjectionDefaults::default();
        let overrides = ProjectionOverrides {
            horizon_years: Some(10),
            annual_fee_usd: Some(1_000.0),
            ..Default::default()
        };
        let (energy, investment) = overrides.profiles(&defaults).unwrap();
        assert_eq!(energy.energy_savings_kwh_per_year, defaults.energy_savings_kwh_per_year);
        assert_eq!(energy.carbon_factor_kg_per_kwh, 0.386);
        assert_eq!(investment.horizon_years, 10);
        assert_eq!(investment.annual_fee_usd, 1_000.0);
    }

    #[test]
    fn explicit_factor_beats_country() {
        let defaults = ProjectionDefaults::default();
        let overrides = ProjectionOverrides {
            country: Some("France".into()),
            carbon_factor_kg_per_kwh: Some(0.9),
            ..Default::default()
        };
        assert_eq!(overrides.carbon_source(&defaults), CarbonSource::Custom(0.9));
        let overrides = ProjectionOverrides {
            country: Some("France".into()),
            ..Default::default()
        };
        let (energy, _) = overrides.profiles(&defaults).unwrap();
        assert_eq!(energy.carbon_factor_kg_per_kwh, 0.056);
    }

    #[test]
    fn unknown_country_surfaces_as_projection_error() {
        let overrides = ProjectionOverrides {
            country: Some("Narnia".into()),
            ..Default::default()
        };
        let err = run_projection(&session(), &overrides, OutputFormat::Text, None).unwrap_err();
        assert!(matches!(
            err,
            AppError::Projection(ProjectionError::InvalidInput { field: "country", .. })
        ));
    }

    #[test]
    fn toml_output_contains_series() {
        let out = run_projection(
            &session(),
            &ProjectionOverrides::default(),
            OutputFormat::Toml,
            None,
        )
        .unwrap();
        assert!(out.contains("annual_savings_usd = 140000.0"));
        assert!(out.contains("[[cumulative_series]]"));
    }

    #[test]
    fn text_output_has_headline_metrics() {
        let out = run_projection(
            &session(),
            &ProjectionOverrides::default(),
            OutputFormat::Text,
            None,
        )
        .unwrap();
        assert!(out.contains("Annual savings"));
        assert!(out.contains("$140,000.00"));
        assert!(out.contains("-4 months"));
    }
}
