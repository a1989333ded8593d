//! Code catalogs for the select controls of the search form

use serde::{Deserialize, Serialize};

/// Building type (`건물유형구분`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingType {
    Apartment,
    Officetel,
    Villa,
}

impl BuildingType {
    pub const ALL: [BuildingType; 3] = [
        BuildingType::Apartment,
        BuildingType::Officetel,
        BuildingType::Villa,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            BuildingType::Apartment => "01",
            BuildingType::Officetel => "02",
            BuildingType::Villa => "03",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BuildingType::Apartment => "아파트",
            BuildingType::Officetel => "오피스텔",
            BuildingType::Villa => "빌라",
        }
    }
}

impl Default for BuildingType {
    fn default() -> Self {
        BuildingType::Apartment
    }
}

impl std::str::FromStr for BuildingType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == s)
            .ok_or_else(|| format!("Invalid building type: {}", s))
    }
}

impl std::fmt::Display for BuildingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Transaction type (`거래구분`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealType {
    /// Sale
    Sale,
    /// Lump-sum deposit lease
    Jeonse,
    /// Monthly rent
    MonthlyRent,
}

impl DealType {
    pub const ALL: [DealType; 3] = [DealType::Sale, DealType::Jeonse, DealType::MonthlyRent];

    pub fn code(&self) -> &'static str {
        match self {
            DealType::Sale => "01",
            DealType::Jeonse => "02",
            DealType::MonthlyRent => "03",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DealType::Sale => "매매",
            DealType::Jeonse => "전세",
            DealType::MonthlyRent => "월세",
        }
    }
}

impl Default for DealType {
    fn default() -> Self {
        DealType::Sale
    }
}

impl std::str::FromStr for DealType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == s)
            .ok_or_else(|| format!("Invalid deal type: {}", s))
    }
}

impl std::fmt::Display for DealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Sort mode (`정렬구분`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// By transaction date
    DealDate,
    Price,
    Area,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::DealDate, SortOrder::Price, SortOrder::Area];

    pub fn code(&self) -> &'static str {
        match self {
            SortOrder::DealDate => "MD",
            SortOrder::Price => "PR",
            SortOrder::Area => "AR",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::DealDate => "매매일자순",
            SortOrder::Price => "가격순",
            SortOrder::Area => "면적순",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::DealDate
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.code() == s)
            .ok_or_else(|| format!("Invalid sort order: {}", s))
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Page sizes offered by the page-size select
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];
