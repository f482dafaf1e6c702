// ==========================================
// 盐田废弃物数字孪生 - 历史数据文件读写
// ==========================================
// 读: 年度实测表 / 月度特征表 (CSV, 带表头)
// 写: 按月分摊结果表 (CSV)
// ==========================================

use crate::domain::history::{AnnualWasteRecord, MonthlyDistributionRow, MonthlyFeatureRecord};
use crate::domain::types::WasteCategory;
use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;

// ==========================================
// 读取
// ==========================================

/// 读取年度实测表
///
/// 必需列: Year, Waste_KG; 可选列: Waste_Bags
pub fn load_annual_records<P: AsRef<Path>>(path: P) -> ImportResult<Vec<AnnualWasteRecord>> {
    let records: Vec<AnnualWasteRecord> = read_csv(path.as_ref())?;
    for (idx, r) in records.iter().enumerate() {
        if !r.waste_kg.is_finite() || r.waste_kg < 0.0 {
            return Err(ImportError::InvalidValue {
                row: idx + 2,
                field: "Waste_KG".to_string(),
                value: r.waste_kg.to_string(),
            });
        }
    }
    tracing::info!(rows = records.len(), "已读取年度实测表: {}", path.as_ref().display());
    Ok(records)
}

/// 读取月度特征表
///
/// 必需列: Year, Month, production_volume, rain_sum, temperature_mean,
/// humidity_mean, wind_speed_mean; 可选列: production_capacity
pub fn load_monthly_records<P: AsRef<Path>>(path: P) -> ImportResult<Vec<MonthlyFeatureRecord>> {
    let records: Vec<MonthlyFeatureRecord> = read_csv(path.as_ref())?;
    for (idx, r) in records.iter().enumerate() {
        let row = idx + 2;
        if !(1..=12).contains(&r.month) {
            return Err(ImportError::InvalidValue {
                row,
                field: "Month".to_string(),
                value: r.month.to_string(),
            });
        }
        for (field, value) in [
            ("production_volume", r.production_volume),
            ("rain_sum", r.rain_sum),
            ("temperature_mean", r.temperature_mean),
            ("humidity_mean", r.humidity_mean),
            ("wind_speed_mean", r.wind_speed_mean),
        ] {
            if !value.is_finite() {
                return Err(ImportError::InvalidValue {
                    row,
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }
    }
    tracing::info!(rows = records.len(), "已读取月度特征表: {}", path.as_ref().display());
    Ok(records)
}

/// 通用 CSV 反序列化（表头映射到 serde 字段名）
fn read_csv<T: DeserializeOwned>(path: &Path) -> ImportResult<Vec<T>> {
    // 检查文件存在
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    // 检查扩展名
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if ext != "csv" {
        return Err(ImportError::UnsupportedFormat(ext));
    }

    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(file);

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        // 表头占第 1 行
        let record = result.map_err(|e| ImportError::RecordError {
            row: idx + 2,
            message: e.to_string(),
        })?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(ImportError::EmptyFile(path.display().to_string()));
    }
    Ok(records)
}

// ==========================================
// 写出
// ==========================================

/// 写出按月分摊结果（列名与历史数据集一致）
pub fn write_distribution_csv<P: AsRef<Path>>(
    path: P,
    rows: &[MonthlyDistributionRow],
) -> ImportResult<()> {
    let path = path.as_ref();
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .map_err(|e| ImportError::FileWriteError(e.to_string()))?;

    let mut header: Vec<&str> = vec![
        "Year",
        "Month",
        "production_volume",
        "rain_sum",
        "temperature_mean",
        "humidity_mean",
        "wind_speed_mean",
        "production_capacity",
        "waste_potential",
        "waste_fraction",
        "predicted_waste_kg",
        "predicted_waste_bags",
    ];
    let components: Vec<WasteCategory> = WasteCategory::ALL
        .iter()
        .copied()
        .filter(|c| *c != WasteCategory::TotalWaste)
        .collect();
    header.extend(components.iter().map(|c| c.column_name()));
    writer.write_record(&header)?;

    for row in rows {
        let f = &row.features;
        let mut record = vec![
            f.year.to_string(),
            f.month.to_string(),
            f.production_volume.to_string(),
            f.rain_sum.to_string(),
            f.temperature_mean.to_string(),
            f.humidity_mean.to_string(),
            f.wind_speed_mean.to_string(),
            row.resolved_capacity.to_string(),
            row.waste_potential.to_string(),
            row.waste_fraction.to_string(),
            row.predicted_waste_kg.to_string(),
            row.predicted_waste_bags
                .map(|b| b.to_string())
                .unwrap_or_default(),
        ];
        record.extend(
            components
                .iter()
                .map(|c| row.composition.get(*c).unwrap_or(0.0).to_string()),
        );
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .map_err(|e| ImportError::FileWriteError(e.to_string()))?;
    tracing::info!(rows = rows.len(), "已写出分摊结果: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_annual_with_optional_bags() {
        let file = csv_file("Year,Waste_KG,Waste_Bags\n2023,120000,2400\n2024,98000,\n");
        let records = load_annual_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].waste_bags, Some(2400.0));
        assert_eq!(records[1].waste_bags, None);
    }

    #[test]
    fn test_load_monthly_without_capacity_column() {
        let file = csv_file(
            "Year,Month,production_volume,rain_sum,temperature_mean,humidity_mean,wind_speed_mean\n\
             2023, 1, 3000000, 45.2, 27.5, 72.0, 14.1\n",
        );
        let records = load_monthly_records(file.path()).unwrap();
        assert_eq!(records[0].month, 1);
        assert_eq!(records[0].production_capacity, None);
        assert_eq!(records[0].rain_sum, 45.2);
    }

    #[test]
    fn test_file_not_found() {
        let result = load_annual_records("non_existent.csv");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_rejects_bad_month_and_extension() {
        let file = csv_file(
            "Year,Month,production_volume,rain_sum,temperature_mean,humidity_mean,wind_speed_mean\n\
             2023,13,3000000,45,27,72,14\n",
        );
        let err = load_monthly_records(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidValue { row: 2, .. }), "{}", err);

        let txt = Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(matches!(
            load_annual_records(txt.path()),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_record_error_reports_row() {
        let file = csv_file("Year,Waste_KG\n2023,abc\n");
        let err = load_annual_records(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::RecordError { row: 2, .. }), "{}", err);
    }
}
