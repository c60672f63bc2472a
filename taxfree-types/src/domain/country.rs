//! Country reference data.

use serde::{Deserialize, Serialize};

/// A country the traveller can pick as home, tourist or third country.
///
/// Cart items hold a copy of the country as it was when the item was added,
/// so this type is a plain value rather than a reference into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Country {
    /// Unique country code, e.g. `JP`
    pub code: String,
    /// Display name
    pub name: String,
    /// ISO 4217 currency code, e.g. `JPY`
    pub currency: String,
    /// Flag glyph
    pub flag: String,
    /// Region label used for grouping
    pub region: String,
}

/// Countries of one region, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryGroup {
    pub region: String,
    pub countries: Vec<Country>,
}

type Entry = (&'static str, &'static str, &'static str, &'static str, &'static str);

// code, name, currency, flag, region
const TURKEY: Entry = ("TR", "Turkey", "TRY", "🇹🇷", "Europe");
const JAPAN: Entry = ("JP", "Japan", "JPY", "🇯🇵", "Asia");

const CATALOG: &[Entry] = &[
    TURKEY,
    JAPAN,
    ("US", "United States", "USD", "🇺🇸", "Americas"),
    ("GB", "United Kingdom", "GBP", "🇬🇧", "Europe"),
    ("EU", "European Union", "EUR", "🇪🇺", "Europe"),
    ("KR", "South Korea", "KRW", "🇰🇷", "Asia"),
    ("CN", "China", "CNY", "🇨🇳", "Asia"),
    ("SG", "Singapore", "SGD", "🇸🇬", "Asia"),
    ("AU", "Australia", "AUD", "🇦🇺", "Oceania"),
    ("CA", "Canada", "CAD", "🇨🇦", "Americas"),
    ("CH", "Switzerland", "CHF", "🇨🇭", "Europe"),
    ("HK", "Hong Kong", "HKD", "🇭🇰", "Asia"),
];

impl Country {
    fn from_entry(&(code, name, currency, flag, region): &Entry) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            currency: currency.to_string(),
            flag: flag.to_string(),
            region: region.to_string(),
        }
    }

    /// Default home country.
    pub fn turkey() -> Self {
        Self::from_entry(&TURKEY)
    }

    /// Default tourist country.
    pub fn japan() -> Self {
        Self::from_entry(&JAPAN)
    }

    /// Returns the full catalog in display order.
    pub fn all() -> Vec<Country> {
        CATALOG.iter().map(Self::from_entry).collect()
    }

    /// Looks up a catalog country by code (case-insensitive).
    pub fn find(code: &str) -> Option<Country> {
        CATALOG
            .iter()
            .find(|(c, ..)| c.eq_ignore_ascii_case(code))
            .map(Self::from_entry)
    }

    /// Groups the catalog by region. Regions appear in the order their
    /// first country appears in the catalog.
    pub fn grouped_by_region() -> Vec<CountryGroup> {
        let mut groups: Vec<CountryGroup> = Vec::new();
        for country in Self::all() {
            match groups.iter_mut().find(|g| g.region == country.region) {
                Some(group) => group.countries.push(country),
                None => groups.push(CountryGroup {
                    region: country.region.clone(),
                    countries: vec![country],
                }),
            }
        }
        groups
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.flag, self.name, self.currency)
    }
}
