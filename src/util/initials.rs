//! Avatar fallback initials.

#[cfg(test)]
#[path = "initials_test.rs"]
mod initials_test;

const MAX_INITIALS: usize = 2;

/// First letter of each space-separated word, uppercased, at most two.
pub fn initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(MAX_INITIALS)
        .collect()
}
