//! Deterministic synthetic catalog generator.
//!
//! Produces plausible-looking person rows; realism is not a goal, only
//! stable ids and reproducible content for a given seed.

use crate::model::item::Item;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Catalog size used by the server when not configured.
pub const DEFAULT_CATALOG_SIZE: usize = 1_000_000;
/// Seed used by the server when not configured.
pub const DEFAULT_SEED: u64 = 42;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Alice", "Ben", "Carla", "Chen", "Dmitri", "Elena", "Farah", "Grace",
    "Hiro", "Ines", "Jonas", "Kira", "Liam", "Maya", "Noah", "Olga", "Priya", "Quinn",
    "Rosa", "Sven", "Tara", "Umar", "Vera", "Wes", "Xena", "Yuki", "Zane",
];

const LAST_NAMES: &[&str] = &[
    "Anders", "Baker", "Castillo", "Dubois", "Eriksen", "Fischer", "Garcia", "Hughes",
    "Ivanova", "Jensen", "Kowalski", "Lopez", "Moreau", "Nakamura", "Okafor", "Petrov",
    "Quinto", "Rossi", "Schmidt", "Tanaka", "Ueda", "Varga", "Walsh", "Young", "Zimmer",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "mail.test", "inbox.dev", "post.io"];

/// Generates `count` items with ids `"1"..="count"`.
///
/// The same `(count, seed)` pair always yields the same catalog.
pub fn generate_catalog(count: usize, seed: u64) -> Vec<Item> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (1..=count).map(|id| generate_item(&mut rng, id)).collect()
}

fn generate_item(rng: &mut ChaCha8Rng, id: usize) -> Item {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Anon");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("User");
    let domain = EMAIL_DOMAINS.choose(rng).copied().unwrap_or("example.com");
    let avatar_variant: u8 = rng.gen_range(1..=70);

    Item {
        id: id.to_string(),
        name: format!("{first} {last}"),
        email: format!(
            "{}.{}{id}@{domain}",
            first.to_ascii_lowercase(),
            last.to_ascii_lowercase()
        ),
        avatar: format!("https://i.pravatar.cc/150?img={avatar_variant}&u={id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::generate_catalog;

    #[test]
    fn ids_are_monotonic_decimal_strings() {
        let items = generate_catalog(5, 7);
        let ids: Vec<_> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn same_seed_is_reproducible() {
        assert_eq!(generate_catalog(50, 9), generate_catalog(50, 9));
        assert_ne!(generate_catalog(50, 9), generate_catalog(50, 10));
    }

    #[test]
    fn email_embeds_id_so_rows_stay_distinguishable() {
        let items = generate_catalog(3, 1);
        assert!(items[2].email.contains("3@"));
        assert!(items[0].avatar.starts_with("https://"));
    }
}
