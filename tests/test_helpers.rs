// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 生成合成历史数据, 写出临时 CSV
// ==========================================

#![allow(dead_code)]

use salt_waste_twin::config::ScoreWeights;
use salt_waste_twin::engine::potential_score;
use salt_waste_twin::{AnnualWasteRecord, MonthlyFeatureRecord};
use std::fs;
use std::path::{Path, PathBuf};

/// 合成月度特征（全部落在全局边界内）
pub fn synthetic_monthly(years: &[i32]) -> Vec<MonthlyFeatureRecord> {
    let mut records = Vec::new();
    for &year in years {
        for month in 1..=12u32 {
            let m = month as f64;
            records.push(MonthlyFeatureRecord {
                year,
                month,
                production_volume: 2.0e6 + 1.0e5 * m,
                rain_sum: 20.0 + 30.0 * m,
                temperature_mean: 26.0 + (month % 5) as f64,
                humidity_mean: 70.0 + m,
                wind_speed_mean: 10.0 + m,
                production_capacity: None,
            });
        }
    }
    records
}

/// 合成年度实测: 实测总量 = k_true × 年评分和
pub fn synthetic_annual(
    monthly: &[MonthlyFeatureRecord],
    weights: &ScoreWeights,
    k_true: f64,
) -> Vec<AnnualWasteRecord> {
    let mut years: Vec<i32> = monthly.iter().map(|m| m.year).collect();
    years.sort_unstable();
    years.dedup();

    years
        .into_iter()
        .map(|year| {
            let score: f64 = monthly
                .iter()
                .filter(|m| m.year == year)
                .map(|m| potential_score(weights, m.production_volume, m.rain_sum, m.temperature_mean))
                .sum();
            AnnualWasteRecord {
                year,
                waste_kg: score * k_true,
                waste_bags: Some(1200.0),
            }
        })
        .collect()
}

/// 月度特征 → CSV 文本
pub fn monthly_csv(records: &[MonthlyFeatureRecord]) -> String {
    let mut out = String::from(
        "Year,Month,production_volume,rain_sum,temperature_mean,humidity_mean,wind_speed_mean\n",
    );
    for r in records {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            r.year,
            r.month,
            r.production_volume,
            r.rain_sum,
            r.temperature_mean,
            r.humidity_mean,
            r.wind_speed_mean
        ));
    }
    out
}

/// 年度实测 → CSV 文本
pub fn annual_csv(records: &[AnnualWasteRecord]) -> String {
    let mut out = String::from("Year,Waste_KG,Waste_Bags\n");
    for r in records {
        let bags = r.waste_bags.map(|b| b.to_string()).unwrap_or_default();
        out.push_str(&format!("{},{},{}\n", r.year, r.waste_kg, bags));
    }
    out
}

/// 在目录中写出文件
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
