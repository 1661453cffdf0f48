//! Random test data for registration and checkout forms

use fake::faker::address::en::{
    BuildingNumber, CityName, CountryName, PostCode, StateName, StreetName,
};
use fake::faker::internet::en::{Password, SafeEmail, Username};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::Rng;
use uuid::Uuid;

pub fn first_name() -> String {
    FirstName().fake()
}

pub fn last_name() -> String {
    LastName().fake()
}

pub fn full_name() -> String {
    Name().fake()
}

/// Unique per call: the storefront rejects an email that is already registered
pub fn email() -> String {
    let email: String = SafeEmail().fake();
    match email.split_once('@') {
        Some((user, domain)) => format!("{}.{}@{}", user, numeric(6), domain),
        None => email,
    }
}

pub fn phone_number() -> String {
    PhoneNumber().fake()
}

pub fn username() -> String {
    Username().fake()
}

/// Password of exactly `length` characters
pub fn password(length: usize) -> String {
    Password(length..length + 1).fake()
}

pub fn country() -> String {
    CountryName().fake()
}

pub fn state() -> String {
    StateName().fake()
}

pub fn city() -> String {
    CityName().fake()
}

pub fn postcode() -> String {
    PostCode().fake()
}

pub fn street_address() -> String {
    let number: String = BuildingNumber().fake();
    let street: String = StreetName().fake();
    format!("{} {}", number, street)
}

pub fn alphanumeric(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| rng.sample(rand::distributions::Alphanumeric) as char)
        .collect()
}

pub fn numeric(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

pub fn uuid() -> String {
    Uuid::new_v4().to_string()
}
