use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use zeroize::Zeroize;

const LABELS: [&str; 6] = ["Very Weak", "Weak", "Fair", "Good", "Strong", "Very Strong"];
pub const MAX_SCORE: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strength {
    pub score: u8,
    pub label: &'static str,
}

impl Strength {
    pub const EMPTY: Strength = Strength {
        score: 0,
        label: "Empty",
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl Default for Strength {
    fn default() -> Self {
        Strength::EMPTY
    }
}

pub fn evaluate(password: &str) -> Strength {
    if password.is_empty() {
        return Strength::EMPTY;
    }
    let len = password.chars().count();
    let checks = [
        len >= 8,
        len >= 12,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let score = (checks.iter().filter(|c| **c).count() as u8).min(MAX_SCORE);
    Strength {
        score,
        label: LABELS[score as usize],
    }
}

/// Look-alike glyphs (I, O, l, 0, 1) are left out.
const CHAR_CLASSES: [&[u8]; 4] = [
    b"ABCDEFGHJKLMNPQRSTUVWXYZ",
    b"abcdefghijkmnopqrstuvwxyz",
    b"23456789",
    b"!@#$%^&*()-_=+[]{};:,.?",
];
const MIN_GENERATED_LEN: usize = 12;

/// Random password holding at least one character of every class, so it
/// always scores [`MAX_SCORE`].
pub fn generate_strong_password(len: usize) -> String {
    let mut rng = OsRng;
    let pool = CHAR_CLASSES.concat();
    let mut picked: Vec<u8> = CHAR_CLASSES
        .iter()
        .filter_map(|class| class.choose(&mut rng).copied())
        .collect();
    while picked.len() < len.max(MIN_GENERATED_LEN) {
        picked.extend(pool.choose(&mut rng));
    }
    picked.shuffle(&mut rng);
    let password = picked.iter().map(|b| char::from(*b)).collect();
    picked.zeroize();
    password
}
