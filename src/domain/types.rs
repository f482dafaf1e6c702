// ==========================================
// 盐田废弃物数字孪生 - 领域类型定义
// ==========================================
// 职责: 季节、特征名、废弃物类别等枚举
// 红线: 特征/类别一律用枚举表示,禁止散落的字符串键
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 季节 (Season)
// ==========================================
// 普塔勒姆(Puttalam)季风气候: 旱季 / 第一季间 / 西南季风 / 第二季间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
    Dry,              // 12-3 月
    InterMonsoon1,    // 4-5 月
    SouthwestMonsoon, // 6-9 月
    InterMonsoon2,    // 10-11 月
}

impl Season {
    /// 全部季节（固定顺序）
    pub const ALL: [Season; 4] = [
        Season::Dry,
        Season::InterMonsoon1,
        Season::SouthwestMonsoon,
        Season::InterMonsoon2,
    ];

    /// 季节包含的月份
    pub fn months(&self) -> &'static [u32] {
        match self {
            Season::Dry => &[12, 1, 2, 3],
            Season::InterMonsoon1 => &[4, 5],
            Season::SouthwestMonsoon => &[6, 7, 8, 9],
            Season::InterMonsoon2 => &[10, 11],
        }
    }

    /// 根据月份判定季节
    ///
    /// # 返回
    /// - Some(Season): 月份落在某个季节
    /// - None: 月份不在 1-12 内
    pub fn from_month(month: u32) -> Option<Season> {
        Season::ALL
            .iter()
            .copied()
            .find(|season| season.months().contains(&month))
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Dry => write!(f, "DRY"),
            Season::InterMonsoon1 => write!(f, "INTER_MONSOON_1"),
            Season::SouthwestMonsoon => write!(f, "SOUTHWEST_MONSOON"),
            Season::InterMonsoon2 => write!(f, "INTER_MONSOON_2"),
        }
    }
}

// ==========================================
// 特征名 (Feature Name)
// ==========================================
// 顺序即优化向量的维度顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    #[serde(rename = "temperature_c")]
    Temperature,
    #[serde(rename = "humidity_pct")]
    Humidity,
    #[serde(rename = "rainfall_mm")]
    Rainfall,
    #[serde(rename = "wind_speed_kmh")]
    WindSpeed,
    #[serde(rename = "production_kg")]
    Production,
    Month,
}

impl FeatureName {
    /// 优化向量的维度顺序
    pub const ORDER: [FeatureName; 6] = [
        FeatureName::Temperature,
        FeatureName::Humidity,
        FeatureName::Rainfall,
        FeatureName::WindSpeed,
        FeatureName::Production,
        FeatureName::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureName::Temperature => "temperature_c",
            FeatureName::Humidity => "humidity_pct",
            FeatureName::Rainfall => "rainfall_mm",
            FeatureName::WindSpeed => "wind_speed_kmh",
            FeatureName::Production => "production_kg",
            FeatureName::Month => "month",
        }
    }

    /// 在优化向量中的下标
    pub fn index(&self) -> usize {
        match self {
            FeatureName::Temperature => 0,
            FeatureName::Humidity => 1,
            FeatureName::Rainfall => 2,
            FeatureName::WindSpeed => 3,
            FeatureName::Production => 4,
            FeatureName::Month => 5,
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureName::ORDER
            .iter()
            .copied()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("未知特征: {}", s))
    }
}

// ==========================================
// 废弃物类别 (Waste Category)
// ==========================================
// 固体三类之和 = 总固体废弃物; 苦卤及其衍生品独立计算
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WasteCategory {
    #[serde(rename = "total_waste_kg")]
    TotalWaste,
    #[serde(rename = "solid_waste_limestone_kg")]
    Limestone,
    #[serde(rename = "solid_waste_gypsum_kg")]
    Gypsum,
    #[serde(rename = "solid_waste_industrial_salt_kg")]
    IndustrialSalt,
    #[serde(rename = "liquid_waste_bittern_liters")]
    Bittern,
    #[serde(rename = "potential_epsom_salt_kg")]
    EpsomSalt,
    #[serde(rename = "potential_potash_kg")]
    Potash,
    #[serde(rename = "potential_magnesium_oil_liters")]
    MagnesiumOil,
}

impl WasteCategory {
    pub const ALL: [WasteCategory; 8] = [
        WasteCategory::TotalWaste,
        WasteCategory::Limestone,
        WasteCategory::Gypsum,
        WasteCategory::IndustrialSalt,
        WasteCategory::Bittern,
        WasteCategory::EpsomSalt,
        WasteCategory::Potash,
        WasteCategory::MagnesiumOil,
    ];

    /// snake_case 键（请求/结果 JSON 使用）
    pub fn as_key(&self) -> &'static str {
        match self {
            WasteCategory::TotalWaste => "total_waste_kg",
            WasteCategory::Limestone => "solid_waste_limestone_kg",
            WasteCategory::Gypsum => "solid_waste_gypsum_kg",
            WasteCategory::IndustrialSalt => "solid_waste_industrial_salt_kg",
            WasteCategory::Bittern => "liquid_waste_bittern_liters",
            WasteCategory::EpsomSalt => "potential_epsom_salt_kg",
            WasteCategory::Potash => "potential_potash_kg",
            WasteCategory::MagnesiumOil => "potential_magnesium_oil_liters",
        }
    }

    /// 历史数据集中的列名
    pub fn column_name(&self) -> &'static str {
        match self {
            WasteCategory::TotalWaste => "Total_Waste_kg",
            WasteCategory::Limestone => "Solid_Waste_Limestone_kg",
            WasteCategory::Gypsum => "Solid_Waste_Gypsum_kg",
            WasteCategory::IndustrialSalt => "Solid_Waste_Industrial_Salt_kg",
            WasteCategory::Bittern => "Liquid_Waste_Bittern_Liters",
            WasteCategory::EpsomSalt => "Potential_Epsom_Salt_kg",
            WasteCategory::Potash => "Potential_Potash_kg",
            WasteCategory::MagnesiumOil => "Potential_Magnesium_Oil_Liters",
        }
    }

    /// 显示名称
    pub fn label(&self) -> &'static str {
        match self {
            WasteCategory::TotalWaste => "Total Waste",
            WasteCategory::Limestone => "Limestone",
            WasteCategory::Gypsum => "Gypsum",
            WasteCategory::IndustrialSalt => "Industrial Salt",
            WasteCategory::Bittern => "Bittern",
            WasteCategory::EpsomSalt => "Epsom Salt",
            WasteCategory::Potash => "Potash",
            WasteCategory::MagnesiumOil => "Magnesium Oil",
        }
    }

    /// 是否属于固体分配三类
    pub fn is_solid(&self) -> bool {
        matches!(
            self,
            WasteCategory::Limestone | WasteCategory::Gypsum | WasteCategory::IndustrialSalt
        )
    }
}

impl fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl FromStr for WasteCategory {
    type Err = String;

    /// 同时接受 snake_case 键与历史列名
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        WasteCategory::ALL
            .iter()
            .copied()
            .find(|c| {
                c.as_key().eq_ignore_ascii_case(needle)
                    || c.column_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| format!("未知废弃物类别: {}", s))
    }
}
