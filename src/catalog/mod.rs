//! Indicator catalog: the static category → indicator taxonomy.
//!
//! K_i: The taxonomy is fixed at compile time and never mutated.
//! K_i: An indicator may belong to several categories. Membership is
//!      non-exclusive and is never deduplicated.
//! B_i: A dataset may not carry every catalogued indicator as a column;
//!      presence is checked per table, not here.

use serde::Serialize;
use std::fmt;

/// A thematic grouping of indicators, used for menu organization only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Display name of the category (also its lookup key)
    pub name: &'static str,

    /// Indicator names in menu order
    pub indicators: &'static [&'static str],
}

impl Category {
    /// First indicator of the category, preselected in the menu.
    pub fn default_indicator(&self) -> Option<&'static str> {
        self.indicators.first().copied()
    }
}

/// Handle to a catalogued indicator name.
///
/// K_i: Can only be constructed from a name present in [`CATEGORIES`], so
/// anything keyed by `Indicator` is keyed by a known metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Indicator(&'static str);

impl Indicator {
    /// Look up an indicator by its exact (case- and text-sensitive) name.
    pub fn lookup(name: &str) -> Option<Self> {
        CATEGORIES
            .iter()
            .flat_map(|c| c.indicators.iter())
            .find(|candidate| **candidate == name)
            .map(|found| Self(*found))
    }

    /// The indicator's column name.
    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Find a category by exact name.
pub fn category(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.name == name)
}

/// Every distinct indicator in catalog order (first occurrence wins).
pub fn indicators() -> Vec<Indicator> {
    let mut seen: Vec<Indicator> = Vec::new();
    for name in CATEGORIES.iter().flat_map(|c| c.indicators.iter()) {
        if !seen.iter().any(|i| i.0 == *name) {
            seen.push(Indicator(*name));
        }
    }
    seen
}

/// Categories an indicator is listed under, in catalog order.
pub fn categories_of(indicator: Indicator) -> Vec<&'static str> {
    CATEGORIES
        .iter()
        .filter(|c| c.indicators.contains(&indicator.0))
        .map(|c| c.name)
        .collect()
}

/// The Social Determinants of Health taxonomy used by the dashboard.
pub static CATEGORIES: &[Category] = &[
    Category {
        name: "Economic Stability",
        indicators: &[
            "Median Household Income",
            "Gender Pay Gap",
            "Income Ratio",
            "% Unemployed",
            "% Household Income Required for Child Care Expenses",
            "% Households with Severe Cost Burden",
            "% Households with Broadband Access",
            "% Homeowners",
        ],
    },
    Category {
        name: "Education Access and Quality",
        indicators: &[
            "% Completed High School",
            "% Some College",
            "High School Graduation Rate",
            "Average Grade Performance Reading",
            "Average Grade Performance Math",
            "% Enrolled in Free or Reduced Lunch",
            "% Not Proficient in English",
        ],
    },
    Category {
        name: "Health Care Access and Quality",
        indicators: &[
            "% Uninsured",
            "% Uninsured Adults",
            "% Uninsured Children",
            "Primary Care Physicians Rate",
            "Dentist Rate",
            "Mental Health Provider Rate",
            "Other Primary Care Provider Rate",
            "Preventable Hospitalization Rate",
            "% with Annual Mammogram",
            "% Flu Vaccinated",
            "% Adults with Diabetes",
            "HIV Prevalence Rate",
            "% Adults Reporting Currently Smoking",
            "% Adults with Obesity",
            "% Excessive Drinking",
            "% Physically Inactive",
            "% Insufficient Sleep",
        ],
    },
    Category {
        name: "Neighborhood and Built Environment",
        indicators: &[
            "Food Environment Index",
            "% With Access to Exercise Opportunities",
            "% Limited Access to Healthy Foods",
            "% Food Insecure",
            "Average Daily PM2.5",
            "Presence of Water Violation",
            "% Severe Housing Problems",
            "Severe Housing Cost Burden",
            "Overcrowding",
            "Inadequate Facilities",
            "% Drive Alone to Work",
            "% Long Commute - Drives Alone",
            "Traffic Volume",
            "% Rural",
            "% Housing Units with Broadband Access",
        ],
    },
    Category {
        name: "Social and Community Context",
        indicators: &[
            "Social Association Rate",
            "Segregation Index",
            "Residential Segregation Index",
            "% Voter Turnout",
            "% Census Participation",
            "% Black",
            "% American Indian or Alaska Native",
            "% Asian",
            "% Native Hawaiian or Other Pacific Islander",
            "% Hispanic",
            "% Non-Hispanic White",
            "% Female",
        ],
    },
    Category {
        name: "Health Outcomes",
        indicators: &[
            "Years of Potential Life Lost Rate",
            "% Fair or Poor Health",
            "Life Expectancy",
            "Child Mortality Rate",
            "Infant Mortality Rate",
            "Suicide Rate (Age-Adjusted)",
            "Homicide Rate",
            "Firearm Fatalities Rate",
            "Motor Vehicle Mortality Rate",
            "Drug Overdose Mortality Rate",
            "Age-Adjusted Death Rate",
        ],
    },
    Category {
        name: "Behavioral Factors",
        indicators: &[
            "% Adults Reporting Currently Smoking",
            "% Adults with Obesity",
            "% Physically Inactive",
            "% Excessive Drinking",
            "% Insufficient Sleep",
            "% Adults with Diabetes",
            "Mental Health Provider Rate",
        ],
    },
];
