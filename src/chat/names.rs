use std::sync::atomic::{AtomicUsize, Ordering};

const FIRST_NAMES: [&str; 12] = [
    "Olena", "Taras", "Iryna", "Bohdan", "Oksana", "Dmytro", "Kateryna", "Andriy", "Sofiia",
    "Mykola", "Halyna", "Yaroslav",
];

const LAST_NAMES: [&str; 10] = [
    "Kovalenko",
    "Shevchenko",
    "Bondarenko",
    "Tkachenko",
    "Kravchenko",
    "Melnyk",
    "Boyko",
    "Moroz",
    "Lysenko",
    "Savchenko",
];

/// Hands out display names for anonymous clients, never the same one twice.
#[derive(Debug, Default)]
pub struct NameGenerator {
    issued: AtomicUsize,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&self) -> String {
        let n = self.issued.fetch_add(1, Ordering::Relaxed);
        let first = FIRST_NAMES[n % FIRST_NAMES.len()];
        let last = LAST_NAMES[(n / FIRST_NAMES.len()) % LAST_NAMES.len()];
        let round = n / (FIRST_NAMES.len() * LAST_NAMES.len());
        if round == 0 {
            format!("{first} {last}")
        } else {
            format!("{first} {last} {}", round + 1)
        }
    }
}
