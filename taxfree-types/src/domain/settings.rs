//! User settings: tax-free flag, rate and the selected countries.

use serde::{Deserialize, Serialize};

use super::country::Country;
use super::pricing;
use crate::error::DomainError;

/// The 2 or 3 countries the calculator works with.
///
/// Serialized as an ordered list: index 0 is home, index 1 is tourist,
/// index 2 (optional) is the third country. Lists of any other length, or
/// with a country repeated, are rejected at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Country>", into = "Vec<Country>")]
pub struct SelectedCountries {
    home: Country,
    tourist: Country,
    third: Option<Country>,
}

impl SelectedCountries {
    pub fn new(home: Country, tourist: Country, third: Option<Country>) -> Result<Self, DomainError> {
        let mut list = vec![home, tourist];
        list.extend(third);
        Self::try_from(list)
    }

    /// Resolves catalog codes, in home, tourist, third order.
    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> Result<Self, DomainError> {
        let countries = codes
            .iter()
            .map(|code| {
                Country::find(code.as_ref())
                    .ok_or_else(|| DomainError::UnknownCountry(code.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from(countries)
    }

    pub fn home(&self) -> &Country {
        &self.home
    }

    pub fn tourist(&self) -> &Country {
        &self.tourist
    }

    pub fn third(&self) -> Option<&Country> {
        self.third.as_ref()
    }

    pub fn len(&self) -> usize {
        if self.third.is_some() { 3 } else { 2 }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// All selected countries in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        [&self.home, &self.tourist]
            .into_iter()
            .chain(self.third.as_ref())
    }

    /// Countries a tourist price is converted into: home, then third.
    pub fn converted_targets(&self) -> impl Iterator<Item = &Country> {
        std::iter::once(&self.home).chain(self.third.as_ref())
    }

    /// Replaces the country at `index` (0 home, 1 tourist, 2 third).
    pub fn set(&mut self, index: usize, country: Country) -> Result<(), DomainError> {
        let mut list: Vec<Country> = self.clone().into();
        match list.get_mut(index) {
            Some(slot) => *slot = country,
            None => {
                return Err(DomainError::ValidationError(format!(
                    "No country selected at position {}",
                    index
                )));
            }
        }
        *self = Self::try_from(list)?;
        Ok(())
    }

    /// Adds the first catalog country not already selected as third country.
    pub fn add_third(&mut self) -> Result<&Country, DomainError> {
        if self.third.is_some() {
            return Err(DomainError::CountryCount(4));
        }
        let candidate = Country::all()
            .into_iter()
            .find(|c| self.iter().all(|selected| selected.code != c.code))
            .ok_or_else(|| DomainError::ValidationError("No country left to add".into()))?;
        Ok(self.third.insert(candidate))
    }

    /// Drops the third country, returning it if there was one.
    pub fn remove_third(&mut self) -> Option<Country> {
        self.third.take()
    }
}

impl TryFrom<Vec<Country>> for SelectedCountries {
    type Error = DomainError;

    fn try_from(countries: Vec<Country>) -> Result<Self, Self::Error> {
        for (i, country) in countries.iter().enumerate() {
            if countries[..i].iter().any(|c| c.code == country.code) {
                return Err(DomainError::DuplicateCountry(country.code.clone()));
            }
        }

        let count = countries.len();
        let mut iter = countries.into_iter();
        match (iter.next(), iter.next(), iter.next(), iter.next()) {
            (Some(home), Some(tourist), third, None) => Ok(Self {
                home,
                tourist,
                third,
            }),
            _ => Err(DomainError::CountryCount(count)),
        }
    }
}

impl From<SelectedCountries> for Vec<Country> {
    fn from(selected: SelectedCountries) -> Self {
        let mut list = vec![selected.home, selected.tourist];
        list.extend(selected.third);
        list
    }
}

/// Persisted calculator settings. Saved wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub is_tax_free_enabled: bool,
    /// Percent, 0 to 100
    pub tax_free_rate: f64,
    selected_countries: SelectedCountries,
}

impl Default for Settings {
    /// Tax-free on at 10%, Turkey as home and Japan as tourist country.
    fn default() -> Self {
        Self {
            is_tax_free_enabled: true,
            tax_free_rate: 10.0,
            selected_countries: SelectedCountries {
                home: Country::turkey(),
                tourist: Country::japan(),
                third: None,
            },
        }
    }
}

impl Settings {
    pub fn new(
        is_tax_free_enabled: bool,
        tax_free_rate: f64,
        selected_countries: SelectedCountries,
    ) -> Result<Self, DomainError> {
        let settings = Self {
            is_tax_free_enabled,
            tax_free_rate,
            selected_countries,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn countries(&self) -> &SelectedCountries {
        &self.selected_countries
    }

    pub fn countries_mut(&mut self) -> &mut SelectedCountries {
        &mut self.selected_countries
    }

    /// Checks the invariants the country list type cannot encode.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.tax_free_rate.is_finite() || !(0.0..=100.0).contains(&self.tax_free_rate) {
            return Err(DomainError::InvalidTaxFreeRate(self.tax_free_rate));
        }
        Ok(())
    }

    /// Applies these settings' tax-free discount to `amount`.
    pub fn tax_free_amount(&self, amount: f64) -> f64 {
        pricing::tax_free_amount(amount, self.is_tax_free_enabled, self.tax_free_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(code: &str) -> Country {
        Country::find(code).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.is_tax_free_enabled);
        assert_eq!(settings.tax_free_rate, 10.0);
        assert_eq!(settings.countries().home().code, "TR");
        assert_eq!(settings.countries().tourist().code, "JP");
        assert!(settings.countries().third().is_none());
    }

    #[test]
    fn test_rejects_out_of_range_rate() {
        let countries = Settings::default().countries().clone();
        assert!(Settings::new(true, 100.0, countries.clone()).is_ok());
        assert!(matches!(
            Settings::new(true, 100.5, countries.clone()),
            Err(DomainError::InvalidTaxFreeRate(_))
        ));
        assert!(matches!(
            Settings::new(true, -1.0, countries),
            Err(DomainError::InvalidTaxFreeRate(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_country_count() {
        assert!(matches!(
            SelectedCountries::try_from(vec![country("TR")]),
            Err(DomainError::CountryCount(1))
        ));
        assert!(matches!(
            SelectedCountries::from_codes(&["TR", "JP", "US", "GB"]),
            Err(DomainError::CountryCount(4))
        ));
    }

    #[test]
    fn test_rejects_duplicates_and_unknown_codes() {
        assert!(matches!(
            SelectedCountries::from_codes(&["JP", "jp"]),
            Err(DomainError::DuplicateCountry(_))
        ));
        assert!(matches!(
            SelectedCountries::from_codes(&["JP", "XX"]),
            Err(DomainError::UnknownCountry(code)) if code == "XX"
        ));
    }

    #[test]
    fn test_add_and_remove_third() {
        let mut settings = Settings::default();
        let added = settings.countries_mut().add_third().unwrap().clone();
        assert_eq!(added.code, "US");
        assert_eq!(settings.countries().len(), 3);
        assert!(settings.countries_mut().add_third().is_err());

        assert_eq!(settings.countries_mut().remove_third(), Some(added));
        assert_eq!(settings.countries().len(), 2);
    }

    #[test]
    fn test_set_country() {
        let mut selected = Settings::default().countries().clone();
        selected.set(1, country("KR")).unwrap();
        assert_eq!(selected.tourist().currency, "KRW");

        assert!(selected.set(0, country("KR")).is_err());
        assert!(selected.set(2, country("US")).is_err());
        assert_eq!(selected.home().code, "TR");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["isTaxFreeEnabled"], true);
        assert_eq!(json["taxFreeRate"], 10.0);
        assert_eq!(json["selectedCountries"][1]["currency"], "JPY");

        let bad = r#"{"isTaxFreeEnabled":true,"taxFreeRate":10,"selectedCountries":[]}"#;
        assert!(serde_json::from_str::<Settings>(bad).is_err());
    }

    #[test]
    fn test_converted_targets_skip_tourist() {
        let mut selected = Settings::default().countries().clone();
        selected.add_third().unwrap();
        let codes: Vec<&str> = selected.converted_targets().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, ["TR", "US"]);
    }
}
