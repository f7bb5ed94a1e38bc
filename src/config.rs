use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::projection::{CarbonSource, EnergyProfile, InvestmentProfile, ProjectionError};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 화면/보고서에 쓰이는 통화·단위 표기. 코드에 고정하지 않고 설정으로 바꿀 수 있다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Captions {
    pub currency_symbol: String,
    pub currency_code: String,
    pub energy_unit: String,
    pub co2_unit: String,
}

impl Default for Captions {
    fn default() -> Self {
        Self {
            currency_symbol: "$".into(),
            currency_code: "USD".into(),
            energy_unit: "kWh".into(),
            co2_unit: "kg".into(),
        }
    }
}

impl Captions {
    /// 템플릿 치환용 변수 목록.
    pub fn vars(&self) -> Vec<(&'static str, String)> {
        vec![
            ("currency", self.currency_symbol.clone()),
            ("currency_code", self.currency_code.clone()),
            ("energy", self.energy_unit.clone()),
            ("co2", self.co2_unit.clone()),
        ]
    }

    /// 금액을 통화 기호와 천 단위 구분으로 표시한다.
    pub fn money(&self, value: f64) -> String {
        let digits = group_thousands(value.abs());
        let rounds_to_zero = !digits.bytes().any(|b| matches!(b, b'1'..=b'9'));
        let sign = if value < 0.0 && !rounds_to_zero { "-" } else { "" };
        format!("{sign}{}{digits}", self.currency_symbol)
    }
}

/// 천 단위 구분 쉼표를 넣어 소수 둘째 자리까지 표시한다.
pub fn group_thousands(value: f64) -> String {
    let text = format!("{value:.2}");
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{grouped}.{frac_part}")
}

/// 입력 폼 기본값과 예측 기간.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionDefaults {
    /// 예측 기간 [년]
    pub horizon_years: u32,
    /// 국가명/코드 또는 "Custom"
    pub country: String,
    /// "Custom" 선택 시 배출계수 [kg CO₂/kWh]
    pub custom_carbon_factor: f64,
    pub energy_savings_kwh_per_year: f64,
    pub savings_percentage: f64,
    pub electricity_rate_usd_per_kwh: f64,
    pub initial_investment_usd: f64,
    pub annual_fee_usd: f64,
}

impl Default for ProjectionDefaults {
    fn default() -> Self {
        Self {
            horizon_years: 5,
            country: "United States".into(),
            custom_carbon_factor: 0.4,
            energy_savings_kwh_per_year: 1_000_000.0,
            savings_percentage: 0.2,
            electricity_rate_usd_per_kwh: 0.14,
            initial_investment_usd: 16_000.0,
            annual_fee_usd: 72_817.0,
        }
    }
}

impl ProjectionDefaults {
    pub fn carbon_source(&self) -> CarbonSource {
        CarbonSource::from_key(&self.country, self.custom_carbon_factor)
    }

    /// 기본값으로 에너지 프로필을 만든다. 국가 키가 잘못되면 오류.
    pub fn energy_profile(&self) -> Result<EnergyProfile, ProjectionError> {
        EnergyProfile::with_carbon_source(
            self.energy_savings_kwh_per_year,
            self.savings_percentage,
            self.electricity_rate_usd_per_kwh,
            &self.carbon_source(),
        )
    }

    pub fn investment_profile(&self) -> InvestmentProfile {
        InvestmentProfile {
            initial_investment_usd: self.initial_investment_usd,
            annual_fee_usd: self.annual_fee_usd,
            horizon_years: self.horizon_years,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드 (auto/en-us/ko-kr 등)
    pub language: String,
    /// 언어팩 TOML 디렉터리
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_pack_dir: Option<String>,
    /// GUI 창 투명도 (0.3~1.0)
    pub window_alpha: f32,
    /// 한글 표시용 사용자 폰트 경로
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<String>,
    pub projection: ProjectionDefaults,
    pub captions: Captions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            language_pack_dir: None,
            window_alpha: 1.0,
            font_path: None,
            projection: ProjectionDefaults::default(),
            captions: Captions::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 지정 경로의 설정을 로드하고, 파일이 없으면 기본값을 저장한 뒤 반환한다.
pub fn load_or_default_from(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg = parse(&content)?;
        log::debug!("설정 로드: {}", path.display());
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        log::info!("기본 설정 생성: {}", path.display());
        Ok(cfg)
    }
}

/// TOML 문자열을 설정으로 파싱한다. 빠진 항목은 기본값으로 채운다.
pub fn parse(content: &str) -> Result<Config, ConfigError> {
    let mut cfg: Config = toml::from_str(content)?;
    cfg.window_alpha = cfg.window_alpha.clamp(0.3, 1.0);
    Ok(cfg)
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        save_config(self, path)?;
        log::debug!("설정 저장: {}", path.display());
        Ok(())
    }
}

/// CLI 인자 등으로 경로가 주어지지 않으면 기본 경로를 쓴다.
pub fn resolve_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let cfg = parse(
            r#"
language = "ko-kr"

[projection]
horizon_years = 10
"#,
        )
        .unwrap();
        assert_eq!(cfg.language, "ko-kr");
        assert_eq!(cfg.projection.horizon_years, 10);
        assert_eq!(cfg.projection.country, "United States");
        assert_eq!(cfg.captions, Captions::default());
    }

    #[test]
    fn serialized_default_parses_back() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(parse(&text).unwrap(), Config::default());
    }

    #[test]
    fn alpha_is_clamped() {
        let cfg = parse("window_alpha = 0.05").unwrap();
        assert_eq!(cfg.window_alpha, 0.3);
    }

    #[test]
    fn captions_drive_money_format() {
        let captions = Captions {
            currency_symbol: "₩".into(),
            ..Captions::default()
        };
        assert_eq!(captions.money(1_234_567.891), "₩1,234,567.89");
        assert_eq!(captions.money(-51_183.0), "-₩51,183.00");
        assert_eq!(captions.money(-0.001), "₩0.00");
        assert_eq!(captions.money(-0.005), "-₩0.01");
        assert_eq!(group_thousands(999.0), "999.00");
        assert_eq!(group_thousands(1000.0), "1,000.00");
    }

    #[test]
    fn default_profiles_resolve() {
        let defaults = ProjectionDefaults::default();
        let energy = defaults.energy_profile().unwrap();
        assert_eq!(energy.carbon_factor_kg_per_kwh, 0.386);
        assert_eq!(defaults.investment_profile().horizon_years, 5);
    }

    #[test]
    fn bad_toml_is_parse_error() {
        assert!(matches!(parse("language = ["), Err(ConfigError::Parse(_))));
    }
}
