// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::CatalogError;
use std::fmt;
use std::str::FromStr;

/// Sort order offered by the results toolbar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOption {
    #[default]
    Relevance,
    AZ,
    ZA,
    Category,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Relevance => "Relevance",
            SortOption::AZ => "A-Z",
            SortOption::ZA => "Z-A",
            SortOption::Category => "Category",
        }
    }
}

impl FromStr for SortOption {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Relevance" => Ok(SortOption::Relevance),
            "A-Z" => Ok(SortOption::AZ),
            "Z-A" => Ok(SortOption::ZA),
            "Category" => Ok(SortOption::Category),
            _ => Err(CatalogError::InvalidRoute(format!("unknown sort '{}'", s))),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Entity filter offered by the results toolbar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterOption {
    #[default]
    All,
    Works,
    Instances,
    Agents,
    Topics,
}

impl FilterOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOption::All => "All",
            FilterOption::Works => "Works",
            FilterOption::Instances => "Instances",
            FilterOption::Agents => "Agents",
            FilterOption::Topics => "Topics",
        }
    }
}

impl FromStr for FilterOption {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" => Ok(FilterOption::All),
            "Works" => Ok(FilterOption::Works),
            "Instances" => Ok(FilterOption::Instances),
            "Agents" => Ok(FilterOption::Agents),
            "Topics" => Ok(FilterOption::Topics),
            _ => Err(CatalogError::InvalidRoute(format!("unknown filter '{}'", s))),
        }
    }
}

impl fmt::Display for FilterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Search selections mirrored into the URL fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteState {
    pub sort: SortOption,
    pub filter: FilterOption,
    /// Empty string when no phrase has been entered
    pub query_phrase: String,
}

/// A decoded fragment route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `#<sort>/<filter>/<phrase>` (or its two-segment legacy form)
    Search(RouteState),
    /// `#item/<type>/<id>`, reached from a suggestion selection
    Item { entity: String, id: String },
}
