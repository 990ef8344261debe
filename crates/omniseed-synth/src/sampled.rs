//! Realistic value drawing for the sampled strategy.

use fake::Fake;
use fake::faker::address::en::{BuildingNumber, CityName, CountryName, StreetName};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::Words;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use rand_chacha::ChaCha8Rng;

use omniseed_core::Sampled;

/// Draw one realistic value of the requested family from the row's RNG.
pub(crate) fn draw_sampled(kind: Sampled, rng: &mut ChaCha8Rng) -> String {
    match kind {
        Sampled::FullName => Name().fake_with_rng(rng),
        Sampled::Username => Username().fake_with_rng(rng),
        Sampled::CompanyName => CompanyName().fake_with_rng(rng),
        Sampled::StreetAddress => {
            let number: String = BuildingNumber().fake_with_rng(rng);
            let street: String = StreetName().fake_with_rng(rng);
            format!("{number} {street}")
        }
        Sampled::City => CityName().fake_with_rng(rng),
        Sampled::Country => CountryName().fake_with_rng(rng),
        Sampled::Email => SafeEmail().fake_with_rng(rng),
        Sampled::Phone => PhoneNumber().fake_with_rng(rng),
        Sampled::Words(count) => {
            let words: Vec<String> = Words(count..count + 1).fake_with_rng(rng);
            words.join(" ")
        }
    }
}
