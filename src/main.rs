use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use co2_roi_calculator::app::{self, OutputFormat, ProjectionOverrides, Session};
use co2_roi_calculator::i18n::keys;
use co2_roi_calculator::projection::cash_flow::MAX_HORIZON_YEARS;
use co2_roi_calculator::ui_cli;
use env_logger::Env;

/// CO₂ 감축 / ROI 계산기 CLI.
#[derive(Debug, Parser)]
#[command(name = "co2_roi_calculator_cli", version, about)]
struct Cli {
    /// 설정 파일 경로 (기본: ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// 언어 (auto/ko-kr/en-us)
    #[arg(long, short = 'L', global = true)]
    lang: Option<String>,
    /// 디버그 로그 출력
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 입력값으로 투자 회수 예측을 계산한다
    Project(ProjectArgs),
    /// 국가별 배출계수 목록
    Countries,
    /// 대화형 메뉴 (기본)
    Interactive,
}

#[derive(Debug, Args)]
struct ProjectArgs {
    /// 연간 에너지 절감량 [kWh/년]
    #[arg(long)]
    energy_savings: Option<f64>,
    /// 절감 비율 (0, 1]
    #[arg(long)]
    savings_percentage: Option<f64>,
    /// 전력 단가 [USD/kWh]
    #[arg(long)]
    electricity_rate: Option<f64>,
    /// 국가명/코드 또는 Custom
    #[arg(long)]
    country: Option<String>,
    /// 배출계수 직접 지정 [kg CO₂/kWh]
    #[arg(long, conflicts_with = "country")]
    carbon_factor: Option<f64>,
    /// 초기 투자비 [USD]
    #[arg(long)]
    initial_investment: Option<f64>,
    /// 연간 수수료 [USD/년]
    #[arg(long)]
    annual_fee: Option<f64>,
    /// 예측 기간 [년]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_HORIZON_YEARS)))]
    horizon: Option<u32>,
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// 텍스트 보고서 저장 경로
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Toml,
}

impl From<Format> for OutputFormat {
    fn from(value: Format) -> Self {
        match value {
            Format::Text => OutputFormat::Text,
            Format::Toml => OutputFormat::Toml,
        }
    }
}

impl From<&ProjectArgs> for ProjectionOverrides {
    fn from(args: &ProjectArgs) -> Self {
        Self {
            energy_savings_kwh_per_year: args.energy_savings,
            savings_percentage: args.savings_percentage,
            electricity_rate_usd_per_kwh: args.electricity_rate,
            country: args.country.clone(),
            carbon_factor_kg_per_kwh: args.carbon_factor,
            initial_investment_usd: args.initial_investment,
            annual_fee_usd: args.annual_fee,
            horizon_years: args.horizon,
        }
    }
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 요청한 명령을 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    let mut session = match Session::load(cli.config.as_deref(), cli.lang.as_deref()) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    match try_run(cli.command, &mut session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", session.tr.t(keys::ERROR_PREFIX));
            ExitCode::FAILURE
        }
    }
}

fn try_run(command: Option<Command>, session: &mut Session) -> Result<(), app::AppError> {
    match command.unwrap_or(Command::Interactive) {
        Command::Project(args) => {
            let out = app::run_projection(
                session,
                &ProjectionOverrides::from(&args),
                args.format.into(),
                args.report.as_deref(),
            )?;
            print!("{out}");
        }
        Command::Countries => ui_cli::handle_countries(&session.tr),
        Command::Interactive => app::run(session)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_flags_map_to_overrides() {
        let cli = Cli::parse_from([
            "co2_roi_calculator_cli",
            "project",
            "--energy-savings",
            "1000000",
            "--electricity-rate",
            "0.14",
            "--horizon",
            "10",
            "--format",
            "toml",
        ]);
        let Some(Command::Project(args)) = cli.command else {
            panic!("expected project subcommand");
        };
        let overrides = ProjectionOverrides::from(&args);
        assert_eq!(overrides.energy_savings_kwh_per_year, Some(1_000_000.0));
        assert_eq!(overrides.horizon_years, Some(10));
        assert_eq!(overrides.country, None);
        assert!(matches!(args.format, Format::Toml));
    }

    #[test]
    fn country_and_factor_conflict() {
        let res = Cli::try_parse_from([
            "co2_roi_calculator_cli",
            "project",
            "--country",
            "US",
            "--carbon-factor",
            "0.3",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn horizon_flag_is_bounded() {
        let res = Cli::try_parse_from([
            "co2_roi_calculator_cli",
            "project",
            "--horizon",
            "4000000000",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
