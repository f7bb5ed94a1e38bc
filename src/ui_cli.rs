use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::app::{AppError, Session};
use crate::config::{group_thousands, Captions};
use crate::i18n::{keys, Translator};
use crate::projection::{
    self, carbon_factor, cash_flow, CarbonSource, EnergyProfile, InvestmentProfile, ProjectionResult,
};
use crate::report::{self, ReportFields};

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Projection,
    Countries,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    for key in [
        keys::MAIN_MENU_PROJECTION,
        keys::MAIN_MENU_COUNTRIES,
        keys::MAIN_MENU_SETTINGS,
        keys::MAIN_MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    loop {
        let sel = read_line(&tr.t(keys::PROMPT_MENU_SELECT))?;
        match parse_menu(&sel) {
            Some(choice) => return Ok(choice),
            None => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

fn parse_menu(sel: &str) -> Option<MenuChoice> {
    match sel.trim() {
        "1" => Some(MenuChoice::Projection),
        "2" => Some(MenuChoice::Countries),
        "3" => Some(MenuChoice::Settings),
        "0" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// 투자 회수 예측 메뉴를 처리한다. 입력 오류는 메시지로 보여주고 메뉴로 돌아간다.
pub fn handle_projection(session: &Session) -> Result<(), AppError> {
    let tr = &session.tr;
    let vars = session.captions().vars();
    let defaults = &session.config.projection;
    println!("{}", tr.t(keys::PROJECTION_HEADING));

    let energy_savings = read_f64(tr, &tr.tf(keys::PROMPT_ENERGY_SAVINGS, &vars))?;
    let savings_percentage = read_f64(tr, &tr.t(keys::PROMPT_SAVINGS_PERCENTAGE))?;
    let rate = read_f64(tr, &tr.tf(keys::PROMPT_ELECTRICITY_RATE, &vars))?;
    let source = read_carbon_source(session)?;
    let initial = read_f64(tr, &tr.tf(keys::PROMPT_INITIAL_INVESTMENT, &vars))?;
    let fee = read_f64(tr, &tr.tf(keys::PROMPT_ANNUAL_FEE, &vars))?;
    let horizon = read_u32_or(
        tr,
        &tr.tf(
            keys::PROMPT_HORIZON,
            &[("default", defaults.horizon_years.to_string())],
        ),
        defaults.horizon_years,
    )?;

    let computed = EnergyProfile::with_carbon_source(energy_savings, savings_percentage, rate, &source)
        .and_then(|energy| {
            let investment = InvestmentProfile {
                initial_investment_usd: initial,
                annual_fee_usd: fee,
                horizon_years: horizon,
            };
            projection::compute_projection(&energy, &investment)
                .map(|result| (energy, investment, result))
        });
    let (energy, investment, result) = match computed {
        Ok(v) => v,
        Err(e) => {
            println!("{}: {e}", tr.t(keys::ERROR_PREFIX));
            return Ok(());
        }
    };

    print_result(&result, tr, session.captions());

    let path = read_line(&tr.t(keys::PROMPT_SAVE_REPORT))?;
    let path = path.trim();
    if !path.is_empty() {
        let fields = ReportFields::from_projection(&energy, &investment, &result);
        let text = report::render_text(&fields, tr, session.captions());
        report::save_report(Path::new(path), &text)?;
        println!("{} {path}", tr.t(keys::REPORT_SAVED));
    }
    Ok(())
}

fn read_carbon_source(session: &Session) -> Result<CarbonSource, AppError> {
    let tr = &session.tr;
    let defaults = &session.config.projection;
    loop {
        let key = read_line(&tr.tf(
            keys::PROMPT_COUNTRY,
            &[("default", defaults.country.clone())],
        ))?;
        let key = match key.trim() {
            "" => defaults.country.clone(),
            k => k.to_string(),
        };
        if carbon_factor::is_custom_key(&key) {
            let factor = read_f64(
                tr,
                &tr.tf(keys::PROMPT_CUSTOM_FACTOR, &session.captions().vars()),
            )?;
            return Ok(CarbonSource::Custom(factor));
        }
        if carbon_factor::find_country(&key).is_some() {
            return Ok(CarbonSource::Country(key));
        }
        println!("{}", tr.t(keys::INVALID_SELECTION_RETRY));
        print_countries(tr);
    }
}

/// 국가별 배출계수 목록을 출력한다.
pub fn handle_countries(tr: &Translator) {
    println!("{}", tr.t(keys::COUNTRIES_HEADING));
    print_countries(tr);
}

fn print_countries(tr: &Translator) {
    for c in carbon_factor::countries() {
        println!("  {:<3} {:<16} {:.3}", c.code, c.name, c.factor_kg_per_kwh);
    }
    println!("{}", tr.t(keys::COUNTRIES_CUSTOM_NOTE));
}

/// 설정 메뉴를 처리한다. 변경되면 true.
pub fn handle_settings(session: &mut Session) -> Result<bool, AppError> {
    let tr = session.tr.clone();
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!(
        "{}",
        tr.tf(
            keys::SETTINGS_CURRENT,
            &[
                ("horizon", session.config.projection.horizon_years.to_string()),
                ("lang", session.config.language.clone()),
            ],
        )
    );
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(&tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    match sel.trim() {
        "" => Ok(false),
        "1" => {
            let input = read_line(&tr.t(keys::SETTINGS_PROMPT_HORIZON))?;
            match input.trim().parse::<u32>() {
                Ok(years) if cash_flow::validate_horizon(years).is_ok() => {
                    session.config.projection.horizon_years = years;
                    println!("{}", tr.t(keys::SETTINGS_SAVED));
                    Ok(true)
                }
                _ => {
                    println!("{}", tr.t(keys::SETTINGS_INVALID));
                    Ok(false)
                }
            }
        }
        "2" => {
            let input = read_line(&tr.t(keys::SETTINGS_PROMPT_LANGUAGE))?;
            let code = input.trim().to_lowercase();
            if ["auto", "ko", "ko-kr", "en", "en-us"].contains(&code.as_str()) {
                session.config.language = code;
                println!("{}", tr.t(keys::SETTINGS_SAVED));
                Ok(true)
            } else {
                println!("{}", tr.t(keys::SETTINGS_INVALID));
                Ok(false)
            }
        }
        _ => {
            println!("{}", tr.t(keys::SETTINGS_INVALID));
            Ok(false)
        }
    }
}

/// 핵심 지표를 "라벨: 값" 줄로 만든다.
pub fn summary_lines(result: &ProjectionResult, tr: &Translator, captions: &Captions) -> Vec<String> {
    let energy = &result.energy;
    vec![
        format!(
            "{}: {}",
            tr.t(keys::RESULT_ANNUAL_SAVINGS),
            captions.money(result.annual_savings_usd)
        ),
        format!(
            "{}: {} {} CO₂",
            tr.t(keys::RESULT_CO2_REDUCTION),
            group_thousands(result.annual_co2_reduction_kg),
            captions.co2_unit
        ),
        format!(
            "{}: {}",
            tr.t(keys::RESULT_NET_INCOME_Y3),
            report::net_income_text(result.net_income_at_year3_usd, tr, captions)
        ),
        format!(
            "{}: {}",
            tr.t(keys::RESULT_PAYBACK),
            report::payback_text(result.payback, tr)
        ),
        format!(
            "{}: {} {} / {}: {} {}",
            tr.t(keys::RESULT_ENERGY_BEFORE),
            group_thousands(energy.total_energy_before_kwh),
            captions.energy_unit,
            tr.t(keys::RESULT_ENERGY_AFTER),
            group_thousands(energy.energy_after_kwh),
            captions.energy_unit
        ),
        format!(
            "{}: {} / {}: {}",
            tr.t(keys::RESULT_COST_BEFORE),
            captions.money(energy.cost_before_usd),
            tr.t(keys::RESULT_COST_AFTER),
            captions.money(energy.cost_after_usd)
        ),
    ]
}

fn print_result(result: &ProjectionResult, tr: &Translator, captions: &Captions) {
    println!();
    for line in summary_lines(result, tr, captions) {
        println!("{line}");
    }
    println!();
    print!(
        "{}",
        report::cash_flow_table(
            &result.cumulative_series,
            result.annual_savings_usd,
            tr,
            captions
        )
    );
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    read_line_from(&mut io::stdin().lock())
}

/// 한 줄을 읽는다. 입력이 끝났으면(EOF) 재시도 루프가 돌지 않도록 오류로 돌려준다.
fn read_line_from<R: BufRead>(reader: &mut R) -> Result<String, AppError> {
    let mut buf = String::new();
    if reader.read_line(&mut buf)? == 0 {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "입력이 끝났습니다",
        )));
    }
    Ok(buf)
}

fn read_f64(tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        match parse_number(&s) {
            Some(v) => return Ok(v),
            None => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

fn read_u32_or(tr: &Translator, prompt: &str, default: u32) -> Result<u32, AppError> {
    loop {
        let s = read_line(prompt)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(default);
        }
        match s.parse::<u32>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

/// 천 단위 쉼표와 밑줄을 허용해 숫자를 읽는다.
fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_numbers_map_to_choices() {
        assert_eq!(parse_menu(" 1\n"), Some(MenuChoice::Projection));
        assert_eq!(parse_menu("0"), Some(MenuChoice::Exit));
        assert_eq!(parse_menu("9"), None);
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut empty = io::Cursor::new("");
        match read_line_from(&mut empty) {
            Err(AppError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected {other:?}"),
        }

        let mut input = io::Cursor::new("1\n\n");
        assert_eq!(read_line_from(&mut input).unwrap(), "1\n");
        assert_eq!(read_line_from(&mut input).unwrap(), "\n");
        assert!(read_line_from(&mut input).is_err());
    }

    #[test]
    fn numbers_accept_grouping() {
        assert_eq!(parse_number("1,000,000\n"), Some(1_000_000.0));
        assert_eq!(parse_number("72_817"), Some(72_817.0));
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn summary_shows_not_recovered() {
        let energy = EnergyProfile {
            energy_savings_kwh_per_year: 1_000.0,
            savings_percentage: 0.5,
            electricity_rate_usd_per_kwh: 0.1,
            carbon_factor_kg_per_kwh: 0.4,
        };
        let investment = InvestmentProfile {
            initial_investment_usd: 10_000.0,
            annual_fee_usd: 50.0,
            horizon_years: 5,
        };
        let result = projection::compute_projection(&energy, &investment).unwrap();
        let lines = summary_lines(&result, &Translator::new("en"), &Captions::default());
        assert_eq!(lines[0], "Annual savings: $100.00");
        assert_eq!(lines[1], "Annual CO₂ reduction: 400.00 kg CO₂");
        assert_eq!(lines[3], "Payback period: Not recovered within horizon");
        assert_eq!(lines[4], "Energy before: 2,000.00 kWh / Energy after: 1,000.00 kWh");
    }
}
