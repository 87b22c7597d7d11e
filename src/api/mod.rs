mod error;
mod jurisdiction;

use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

pub use error::{CommandError, ConfigurationError};
pub use jurisdiction::{JURISDICTIONS, Jurisdiction, find_jurisdiction, property_tax_rate};

use crate::core::{
    BuyScenario, Comparison, CostBreakdown, RentScenario, buy_cost_breakdown, compare,
    rent_cost_breakdown,
};
use crate::report::{render_breakdown, render_comparison};

const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Parser, Debug)]
#[command(
    name = "rentbuy",
    about = "Net cost of buying versus renting a home over a holding horizon"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Net cost of buying, selling at the end of the horizon
    Buy {
        #[command(flatten)]
        market: MarketArgs,
        #[command(flatten)]
        home: HomeArgs,
        #[arg(long, help = "Print the breakdown as JSON")]
        json: bool,
    },
    /// Net cost of renting for the horizon
    Rent {
        #[command(flatten)]
        market: MarketArgs,
        #[command(flatten)]
        tenancy: TenancyArgs,
        #[arg(long, help = "Print the breakdown as JSON")]
        json: bool,
    },
    /// Buy and rent side by side under the same market assumptions
    Compare {
        #[command(flatten)]
        market: MarketArgs,
        #[command(flatten)]
        home: HomeArgs,
        #[command(flatten)]
        tenancy: TenancyArgs,
        #[arg(long, help = "Print the comparison as JSON")]
        json: bool,
    },
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct MarketArgs {
    #[arg(long, default_value_t = 10.0, help = "Holding horizon in years")]
    pub years: f64,
    #[arg(
        long,
        default_value_t = 6.0,
        help = "Expected annual market return in percent"
    )]
    pub return_on_investment: f64,
    #[arg(long, default_value_t = 2.0, help = "Expected annual inflation in percent")]
    pub inflation: f64,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct HomeArgs {
    #[arg(long, default_value_t = 800_000.0)]
    pub home_price: f64,
    #[arg(long, default_value_t = 20.0, help = "Down payment in percent of price")]
    pub down_payment: f64,
    #[arg(long, default_value_t = 2.5, help = "Nominal mortgage rate in percent")]
    pub mortgage_rate: f64,
    #[arg(long, default_value_t = 25, help = "Mortgage term in years")]
    pub mortgage_term: u32,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Expected annual home appreciation in percent"
    )]
    pub appreciation: f64,
    #[arg(
        long,
        default_value_t = 1.0,
        help = "Annual maintenance in percent of the home price"
    )]
    pub maintenance: f64,
    #[arg(
        long,
        help = "Property tax in percent of value; looked up from --city when omitted"
    )]
    pub property_tax_rate: Option<f64>,
    #[arg(long, default_value = "Vancouver")]
    pub city: String,
    #[arg(long, default_value_t = 0.0, help = "Monthly strata/condo fee")]
    pub strata_fee: f64,
    #[arg(long, default_value_t = 100.0, help = "Monthly homeowner insurance")]
    pub homeowner_insurance: f64,
    #[arg(long, default_value_t = 150.0, help = "Monthly utilities")]
    pub utilities: f64,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct TenancyArgs {
    #[arg(long, default_value_t = 2_500.0)]
    pub monthly_rent: f64,
    #[arg(long, default_value_t = 2.5, help = "Annual rent increase in percent")]
    pub rent_increase: f64,
    #[arg(long, help = "Damage deposit; defaults to half a month's rent")]
    pub deposit: Option<f64>,
    #[arg(long, default_value_t = 20.0, help = "Monthly renter insurance")]
    pub renter_insurance: f64,
    #[arg(long, default_value_t = 100.0, help = "Monthly utilities paid by the tenant")]
    pub renter_utilities: f64,
}

fn default_market_args() -> MarketArgs {
    MarketArgs {
        years: 10.0,
        return_on_investment: 6.0,
        inflation: 2.0,
    }
}

fn default_home_args() -> HomeArgs {
    HomeArgs {
        home_price: 800_000.0,
        down_payment: 20.0,
        mortgage_rate: 2.5,
        mortgage_term: 25,
        appreciation: 3.0,
        maintenance: 1.0,
        property_tax_rate: None,
        city: "Vancouver".to_string(),
        strata_fee: 0.0,
        homeowner_insurance: 100.0,
        utilities: 150.0,
    }
}

fn default_tenancy_args() -> TenancyArgs {
    TenancyArgs {
        monthly_rent: 2_500.0,
        rent_increase: 2.5,
        deposit: None,
        renter_insurance: 20.0,
        renter_utilities: 100.0,
    }
}

fn check_non_negative(flag: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigurationError::InvalidInput {
            flag,
            reason: "must be >= 0",
        });
    }
    Ok(())
}

fn check_rate(flag: &'static str, percent: f64) -> Result<(), ConfigurationError> {
    if !percent.is_finite() || percent <= -100.0 {
        return Err(ConfigurationError::InvalidInput {
            flag,
            reason: "must be > -100",
        });
    }
    Ok(())
}

fn check_market(market: &MarketArgs) -> Result<(), ConfigurationError> {
    check_non_negative("--years", market.years)?;
    check_rate("--return-on-investment", market.return_on_investment)?;
    check_rate("--inflation", market.inflation)?;
    Ok(())
}

pub fn build_buy_scenario(
    market: &MarketArgs,
    home: &HomeArgs,
) -> Result<BuyScenario, ConfigurationError> {
    check_market(market)?;
    check_non_negative("--home-price", home.home_price)?;
    if !(0.0..=100.0).contains(&home.down_payment) {
        return Err(ConfigurationError::InvalidInput {
            flag: "--down-payment",
            reason: "must be between 0 and 100",
        });
    }
    if home.mortgage_term == 0 {
        return Err(ConfigurationError::InvalidInput {
            flag: "--mortgage-term",
            reason: "must be > 0",
        });
    }
    check_rate("--mortgage-rate", home.mortgage_rate)?;
    check_rate("--appreciation", home.appreciation)?;
    check_non_negative("--maintenance", home.maintenance)?;
    check_non_negative("--strata-fee", home.strata_fee)?;
    check_non_negative("--homeowner-insurance", home.homeowner_insurance)?;
    check_non_negative("--utilities", home.utilities)?;

    let property_tax_rate = match home.property_tax_rate {
        Some(percent) => {
            check_non_negative("--property-tax-rate", percent)?;
            percent / 100.0
        }
        None => property_tax_rate(&home.city)?,
    };

    let scenario = BuyScenario {
        home_price: home.home_price,
        down_payment_fraction: home.down_payment / 100.0,
        mortgage_rate: home.mortgage_rate / 100.0,
        mortgage_term_years: home.mortgage_term,
        appreciation_rate: home.appreciation / 100.0,
        market_return_rate: market.return_on_investment / 100.0,
        inflation_rate: market.inflation / 100.0,
        property_tax_rate,
        maintenance_rate: home.maintenance / 100.0,
        strata_fee_annual: home.strata_fee * MONTHS_PER_YEAR,
        insurance_annual: home.homeowner_insurance * MONTHS_PER_YEAR,
        utilities_annual: home.utilities * MONTHS_PER_YEAR,
        horizon_years: market.years,
    };
    scenario.validate()?;
    Ok(scenario)
}

pub fn build_rent_scenario(
    market: &MarketArgs,
    tenancy: &TenancyArgs,
) -> Result<RentScenario, ConfigurationError> {
    check_market(market)?;
    check_non_negative("--monthly-rent", tenancy.monthly_rent)?;
    check_rate("--rent-increase", tenancy.rent_increase)?;
    check_non_negative("--renter-insurance", tenancy.renter_insurance)?;
    check_non_negative("--renter-utilities", tenancy.renter_utilities)?;

    let deposit = match tenancy.deposit {
        Some(deposit) => {
            check_non_negative("--deposit", deposit)?;
            deposit
        }
        None => tenancy.monthly_rent / 2.0,
    };

    let scenario = RentScenario {
        rent_annual: tenancy.monthly_rent * MONTHS_PER_YEAR,
        rent_increase_rate: tenancy.rent_increase / 100.0,
        deposit,
        insurance_annual: tenancy.renter_insurance * MONTHS_PER_YEAR,
        market_return_rate: market.return_on_investment / 100.0,
        inflation_rate: market.inflation / 100.0,
        utilities_annual: tenancy.renter_utilities * MONTHS_PER_YEAR,
        horizon_years: market.years,
    };
    scenario.validate()?;
    Ok(scenario)
}

fn encode<T: Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<String, CommandError> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text(value))
    }
}

pub fn render_buy(
    market: &MarketArgs,
    home: &HomeArgs,
    json: bool,
) -> Result<String, CommandError> {
    let scenario = build_buy_scenario(market, home)?;
    let breakdown = buy_cost_breakdown(&scenario)?;
    encode(json, &breakdown, render_breakdown)
}

pub fn render_rent(
    market: &MarketArgs,
    tenancy: &TenancyArgs,
    json: bool,
) -> Result<String, CommandError> {
    let scenario = build_rent_scenario(market, tenancy)?;
    let breakdown = rent_cost_breakdown(&scenario)?;
    encode(json, &breakdown, render_breakdown)
}

pub fn render_compare(
    market: &MarketArgs,
    home: &HomeArgs,
    tenancy: &TenancyArgs,
    json: bool,
) -> Result<String, CommandError> {
    let buy = build_buy_scenario(market, home)?;
    let rent = build_rent_scenario(market, tenancy)?;
    let comparison = compare(&buy, &rent)?;
    encode(json, &comparison, render_comparison)
}

pub async fn run(cli: Cli) -> Result<(), CommandError> {
    let output = match cli.command {
        Command::Buy { market, home, json } => {
            info!(city = %home.city, years = market.years, "estimating cost of buying");
            render_buy(&market, &home, json)?
        }
        Command::Rent {
            market,
            tenancy,
            json,
        } => {
            info!(years = market.years, "estimating cost of renting");
            render_rent(&market, &tenancy, json)?
        }
        Command::Compare {
            market,
            home,
            tenancy,
            json,
        } => {
            info!(city = %home.city, years = market.years, "comparing buying and renting");
            render_compare(&market, &home, &tenancy, json)?
        }
        Command::Serve { port } => {
            run_http_server(port).await?;
            return Ok(());
        }
    };
    println!("{output}");
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MarketPayload {
    years: Option<f64>,
    return_on_investment: Option<f64>,
    inflation: Option<f64>,
}

impl MarketPayload {
    fn into_args(self) -> MarketArgs {
        let mut args = default_market_args();
        if let Some(v) = self.years {
            args.years = v;
        }
        if let Some(v) = self.return_on_investment {
            args.return_on_investment = v;
        }
        if let Some(v) = self.inflation {
            args.inflation = v;
        }
        args
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct HomePayload {
    home_price: Option<f64>,
    down_payment: Option<f64>,
    mortgage_rate: Option<f64>,
    mortgage_term: Option<u32>,
    appreciation: Option<f64>,
    maintenance: Option<f64>,
    property_tax_rate: Option<f64>,
    city: Option<String>,
    strata_fee: Option<f64>,
    homeowner_insurance: Option<f64>,
    utilities: Option<f64>,
}

impl HomePayload {
    fn into_args(self) -> HomeArgs {
        let mut args = default_home_args();
        if let Some(v) = self.home_price {
            args.home_price = v;
        }
        if let Some(v) = self.down_payment {
            args.down_payment = v;
        }
        if let Some(v) = self.mortgage_rate {
            args.mortgage_rate = v;
        }
        if let Some(v) = self.mortgage_term {
            args.mortgage_term = v;
        }
        if let Some(v) = self.appreciation {
            args.appreciation = v;
        }
        if let Some(v) = self.maintenance {
            args.maintenance = v;
        }
        if self.property_tax_rate.is_some() {
            args.property_tax_rate = self.property_tax_rate;
        }
        if let Some(v) = self.city {
            args.city = v;
        }
        if let Some(v) = self.strata_fee {
            args.strata_fee = v;
        }
        if let Some(v) = self.homeowner_insurance {
            args.homeowner_insurance = v;
        }
        if let Some(v) = self.utilities {
            args.utilities = v;
        }
        args
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TenancyPayload {
    monthly_rent: Option<f64>,
    rent_increase: Option<f64>,
    deposit: Option<f64>,
    renter_insurance: Option<f64>,
    renter_utilities: Option<f64>,
}

impl TenancyPayload {
    fn into_args(self) -> TenancyArgs {
        let mut args = default_tenancy_args();
        if let Some(v) = self.monthly_rent {
            args.monthly_rent = v;
        }
        if let Some(v) = self.rent_increase {
            args.rent_increase = v;
        }
        if self.deposit.is_some() {
            args.deposit = self.deposit;
        }
        if let Some(v) = self.renter_insurance {
            args.renter_insurance = v;
        }
        if let Some(v) = self.renter_utilities {
            args.renter_utilities = v;
        }
        args
    }
}

// Query strings cannot go through `#[serde(flatten)]`, so the single-scenario
// endpoints take flat payloads and split them.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BuyPayload {
    years: Option<f64>,
    return_on_investment: Option<f64>,
    inflation: Option<f64>,
    home_price: Option<f64>,
    down_payment: Option<f64>,
    mortgage_rate: Option<f64>,
    mortgage_term: Option<u32>,
    appreciation: Option<f64>,
    maintenance: Option<f64>,
    property_tax_rate: Option<f64>,
    city: Option<String>,
    strata_fee: Option<f64>,
    homeowner_insurance: Option<f64>,
    utilities: Option<f64>,
}

impl BuyPayload {
    fn into_args(self) -> (MarketArgs, HomeArgs) {
        let market = MarketPayload {
            years: self.years,
            return_on_investment: self.return_on_investment,
            inflation: self.inflation,
        };
        let home = HomePayload {
            home_price: self.home_price,
            down_payment: self.down_payment,
            mortgage_rate: self.mortgage_rate,
            mortgage_term: self.mortgage_term,
            appreciation: self.appreciation,
            maintenance: self.maintenance,
            property_tax_rate: self.property_tax_rate,
            city: self.city,
            strata_fee: self.strata_fee,
            homeowner_insurance: self.homeowner_insurance,
            utilities: self.utilities,
        };
        (market.into_args(), home.into_args())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RentPayload {
    years: Option<f64>,
    return_on_investment: Option<f64>,
    inflation: Option<f64>,
    monthly_rent: Option<f64>,
    rent_increase: Option<f64>,
    deposit: Option<f64>,
    renter_insurance: Option<f64>,
    renter_utilities: Option<f64>,
}

impl RentPayload {
    fn into_args(self) -> (MarketArgs, TenancyArgs) {
        let market = MarketPayload {
            years: self.years,
            return_on_investment: self.return_on_investment,
            inflation: self.inflation,
        };
        let tenancy = TenancyPayload {
            monthly_rent: self.monthly_rent,
            rent_increase: self.rent_increase,
            deposit: self.deposit,
            renter_insurance: self.renter_insurance,
            renter_utilities: self.renter_utilities,
        };
        (market.into_args(), tenancy.into_args())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ComparePayload {
    market: MarketPayload,
    home: HomePayload,
    tenancy: TenancyPayload,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuyResponse {
    scenario: BuyScenario,
    breakdown: CostBreakdown,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RentResponse {
    scenario: RentScenario,
    breakdown: CostBreakdown,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn buy_response(payload: BuyPayload) -> Result<BuyResponse, CommandError> {
    let (market, home) = payload.into_args();
    let scenario = build_buy_scenario(&market, &home)?;
    let breakdown = buy_cost_breakdown(&scenario)?;
    Ok(BuyResponse {
        scenario,
        breakdown,
    })
}

fn rent_response(payload: RentPayload) -> Result<RentResponse, CommandError> {
    let (market, tenancy) = payload.into_args();
    let scenario = build_rent_scenario(&market, &tenancy)?;
    let breakdown = rent_cost_breakdown(&scenario)?;
    Ok(RentResponse {
        scenario,
        breakdown,
    })
}

fn compare_response(payload: ComparePayload) -> Result<Comparison, CommandError> {
    let market = payload.market.into_args();
    let buy = build_buy_scenario(&market, &payload.home.into_args())?;
    let rent = build_rent_scenario(&market, &payload.tenancy.into_args())?;
    Ok(compare(&buy, &rent)?)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/buy", get(buy_get_handler).post(buy_post_handler))
        .route("/api/rent", get(rent_get_handler).post(rent_post_handler))
        .route("/api/compare", post(compare_handler))
        .route("/api/jurisdictions", get(jurisdictions_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "rent-vs-buy HTTP API listening");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn buy_get_handler(Query(payload): Query<BuyPayload>) -> Response {
    respond(buy_response(payload))
}

async fn buy_post_handler(Json(payload): Json<BuyPayload>) -> Response {
    respond(buy_response(payload))
}

async fn rent_get_handler(Query(payload): Query<RentPayload>) -> Response {
    respond(rent_response(payload))
}

async fn rent_post_handler(Json(payload): Json<RentPayload>) -> Response {
    respond(rent_response(payload))
}

async fn compare_handler(Json(payload): Json<ComparePayload>) -> Response {
    respond(compare_response(payload))
}

async fn jurisdictions_handler() -> Response {
    json_response(StatusCode::OK, JURISDICTIONS)
}

fn respond<T: Serialize>(result: Result<T, CommandError>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(e) => {
            warn!(error = %e, "rejected request");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
