//! Random sample books for seeding a development catalog

use chrono::{Duration, NaiveDate, Utc};
use rand::{seq::SliceRandom, Rng};
use rust_decimal::Decimal;

use crate::models::book::{BookInput, Genre};

/// Number of books created when no count is given
pub const DEFAULT_SEED_COUNT: usize = 20;

const TITLE_WORDS: &[&str] = &[
    "silent", "river", "empire", "shadow", "garden", "winter", "letters", "forgotten",
    "city", "ocean", "history", "machine", "last", "stars", "northern", "song", "glass",
    "memory", "kingdom", "journey", "golden", "island", "storm", "theory", "house",
];

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Carla", "Diego", "Elena", "Felipe", "Gloria", "Hugo", "Irene", "Jorge",
    "Lucia", "Mateo", "Nora", "Pablo", "Rosa", "Tomas",
];

const LAST_NAMES: &[&str] = &[
    "Alvarez", "Benitez", "Castro", "Dominguez", "Espinoza", "Fuentes", "Gutierrez",
    "Herrera", "Ibarra", "Jimenez", "Lopez", "Morales", "Navarro", "Ortega", "Ramirez",
];

/// Publication dates are drawn from this many days before today
const DATE_SPAN_DAYS: i64 = 30 * 365;

/// Build one random book: a four word title, a full-name author, a date in
/// the last thirty years and a price between 10 and 100.
pub fn random_book<R: Rng>(rng: &mut R) -> BookInput {
    BookInput {
        title: random_title(rng),
        author: format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)),
        published_date: random_date(rng, Utc::now().date_naive()),
        gender: *Genre::ALL.choose(rng).unwrap_or(&Genre::Fiction),
        price: random_price(rng),
    }
}

fn pick<R: Rng>(rng: &mut R, words: &[&'static str]) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}

fn random_title<R: Rng>(rng: &mut R) -> String {
    let words: Vec<&str> = (0..4).map(|_| pick(rng, TITLE_WORDS)).collect();
    let mut title = words.join(" ");
    if let Some(first) = title.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    title.push('.');
    title
}

fn random_date<R: Rng>(rng: &mut R, today: NaiveDate) -> NaiveDate {
    today - Duration::days(rng.gen_range(0..=DATE_SPAN_DAYS))
}

fn random_price<R: Rng>(rng: &mut R) -> Decimal {
    // Whole cents keep the value exact at two decimal places
    let cents: i64 = rng.gen_range(1_000..=10_000);
    Decimal::new(cents, 2)
}
