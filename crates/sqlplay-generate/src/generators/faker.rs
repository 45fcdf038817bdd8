use chrono::{Days, NaiveDate};
use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, StreetName};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName, Name};
use rand::Rng;

use sqlplay_core::{DataType, Value};

/// Earliest generated birth date.
const BIRTH_MIN: (i32, u32, u32) = (1940, 1, 1);
/// Latest generated birth date.
const BIRTH_MAX: (i32, u32, u32) = (2005, 12, 31);

/// Realistic field kinds backed by the `fake` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeKind {
    FirstName,
    LastName,
    FullName,
    Email,
    City,
    Address,
    Company,
    BirthDate,
}

impl FakeKind {
    pub fn id(self) -> &'static str {
        match self {
            FakeKind::FirstName => "name.first",
            FakeKind::LastName => "name.last",
            FakeKind::FullName => "name.full",
            FakeKind::Email => "internet.safe_email",
            FakeKind::City => "address.city",
            FakeKind::Address => "address.street",
            FakeKind::Company => "company.name",
            FakeKind::BirthDate => "date.birth",
        }
    }

    pub fn data_type(self) -> DataType {
        match self {
            FakeKind::BirthDate => DataType::Date,
            _ => DataType::Text,
        }
    }

    /// Draw one value; the result depends only on the RNG state.
    pub fn generate<R: Rng + ?Sized>(self, rng: &mut R) -> Value {
        match self {
            FakeKind::FirstName => Value::Text(FirstName().fake_with_rng(rng)),
            FakeKind::LastName => Value::Text(LastName().fake_with_rng(rng)),
            FakeKind::FullName => Value::Text(Name().fake_with_rng(rng)),
            FakeKind::Email => Value::Text(SafeEmail().fake_with_rng(rng)),
            FakeKind::City => Value::Text(CityName().fake_with_rng(rng)),
            FakeKind::Address => {
                let number: String = BuildingNumber().fake_with_rng(rng);
                let street: String = StreetName().fake_with_rng(rng);
                Value::Text(format!("{number} {street}"))
            }
            FakeKind::Company => Value::Text(CompanyName().fake_with_rng(rng)),
            FakeKind::BirthDate => Value::Date(birth_date(rng)),
        }
    }
}

fn birth_date<R: Rng + ?Sized>(rng: &mut R) -> NaiveDate {
    let min = ymd(BIRTH_MIN);
    let max = ymd(BIRTH_MAX);
    let span = (max - min).num_days().max(0) as u64;
    let offset = rng.random_range(0..=span);
    min.checked_add_days(Days::new(offset)).unwrap_or(min)
}

fn ymd((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
