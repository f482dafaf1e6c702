// ==========================================
// 盐田废弃物数字孪生 - 命令行入口
// ==========================================
// 流程:
// 1) 初始化日志, 加载配置
// 2) 可选: 从 CSV 读取历史数据并校准, 写出按月分摊表
// 3) 打印一次单月预测
// 4) 每个季节取代表月份做一次最小化优化
// ==========================================
// 环境变量:
// - SALT_WASTE_TWIN_ANNUAL_CSV / SALT_WASTE_TWIN_MONTHLY_CSV: 校准数据
// - SALT_WASTE_TWIN_DISTRIBUTION_CSV: 分摊结果输出路径
// - SALT_WASTE_TWIN_RESULTS_DIR: 优化结果归档目录
// ==========================================

use anyhow::Context;
use salt_waste_twin::api::{OptimizationRequest, PredictionRequest, TwinApi};
use salt_waste_twin::engine::CalibrationFactor;
use salt_waste_twin::importer::{self, ResultArchive};
use salt_waste_twin::{logging, ConfigManager, Season, APP_NAME, VERSION};

const ANNUAL_CSV_ENV: &str = "SALT_WASTE_TWIN_ANNUAL_CSV";
const MONTHLY_CSV_ENV: &str = "SALT_WASTE_TWIN_MONTHLY_CSV";
const DISTRIBUTION_CSV_ENV: &str = "SALT_WASTE_TWIN_DISTRIBUTION_CSV";
const RESULTS_DIR_ENV: &str = "SALT_WASTE_TWIN_RESULTS_DIR";

fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", APP_NAME);
    tracing::info!("系统版本: {}", VERSION);
    tracing::info!("==================================================");

    let manager = ConfigManager::from_env().context("加载配置失败")?;
    let config = manager.config();
    if let Some(path) = manager.source() {
        tracing::info!("配置来源: {}", path.display());
    }

    // 校准
    let mut api = match (env_path(ANNUAL_CSV_ENV), env_path(MONTHLY_CSV_ENV)) {
        (Some(annual_path), Some(monthly_path)) => {
            let annual = importer::load_annual_records(&annual_path)
                .with_context(|| format!("读取年度实测表失败: {}", annual_path))?;
            let monthly = importer::load_monthly_records(&monthly_path)
                .with_context(|| format!("读取月度特征表失败: {}", monthly_path))?;
            let api = TwinApi::from_history(config, &annual, &monthly);

            if let Some(out) = env_path(DISTRIBUTION_CSV_ENV) {
                let rows = api.distribute(&annual, &monthly);
                importer::write_distribution_csv(&out, &rows)
                    .with_context(|| format!("写出分摊结果失败: {}", out))?;
            }
            api
        }
        _ => {
            tracing::warn!(
                "未提供 {} / {}, 以未校准模式运行",
                ANNUAL_CSV_ENV,
                MONTHLY_CSV_ENV
            );
            TwinApi::new(config, CalibrationFactor::UNCALIBRATED)
        }
    };

    if let Some(dir) = env_path(RESULTS_DIR_ENV) {
        let archive = ResultArchive::open(&dir).with_context(|| format!("打开归档目录失败: {}", dir))?;
        api = api.with_archive(archive);
    }

    let health = api.health();
    println!("Status: {} (k = {:.6})", health.status, health.calibration_factor);

    // 单月预测
    let request = PredictionRequest {
        production_volume_kg: 50_000.0,
        production_capacity_kg: Some(62_500.0),
        rain_sum_mm: 100.0,
        temperature_mean_c: 28.0,
        humidity_mean_percent: 75.0,
        wind_speed_mean_kmh: 15.0,
    };
    let response = api.predict_single(&request)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    // 每个季节一次最小化优化
    for season in Season::ALL {
        let Some(&month) = season.months().first() else {
            continue;
        };
        let result = api.optimize(&OptimizationRequest::minimize(month))?;
        println!("\n[{}] month {}", season, month);
        println!("{}", result);
    }

    Ok(())
}

fn env_path(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
