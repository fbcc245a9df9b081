//! Synthetic value generators for `random`.

use rand::Rng;

/// First names `random(name)` picks from.
pub const SAMPLE_NAMES: [&str; 30] = [
    "Ava", "Liam", "Noah", "Mia", "Ethan", "Zoe", "Lucas", "Ivy", "Mason", "Luna", "Olivia",
    "Elijah", "Charlotte", "Amelia", "Harper", "Ella", "James", "Benjamin", "Henry", "Sophia",
    "Isabella", "Jack", "Leo", "Grace", "Aria", "Chloe", "Emma", "Scarlett", "Samuel", "Wyatt",
];

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Random lowercase alphanumeric string.
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Random first name, `prefix-Name` when a prefix is given.
pub fn random_name<R: Rng + ?Sized>(rng: &mut R, prefix: Option<&str>) -> String {
    let name = SAMPLE_NAMES[rng.gen_range(0..SAMPLE_NAMES.len())];
    match prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{}-{}", prefix, name),
        None => name.to_string(),
    }
}

/// E-mail address `<unix-seconds><suffix>@<domain>`.
///
/// A leading `@` on `domain` is ignored.
pub fn random_email<R: Rng + ?Sized>(
    rng: &mut R,
    unix_seconds: i64,
    suffix_len: usize,
    domain: &str,
) -> String {
    let domain = domain.trim().trim_start_matches('@');
    format!("{}{}@{}", unix_seconds, random_string(rng, suffix_len), domain)
}

/// Settings for [`generate_random_value`].
#[derive(Debug, Clone)]
pub struct RandomOptions<'a> {
    pub unix_seconds: i64,
    pub string_length: usize,
    pub local_part_length: usize,
    pub default_domain: &'a str,
}

/// Generates a value for `random(type, option)`.
///
/// `args[0]` is the type (`email`, `name`, anything else), `args[1]` the
/// optional option.
pub fn generate_random_value<R: Rng + ?Sized>(
    rng: &mut R,
    args: &[String],
    options: &RandomOptions<'_>,
) -> String {
    let kind = args.first().map(|s| s.trim().to_lowercase()).unwrap_or_default();
    let option = args.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

    match kind.as_str() {
        "email" => random_email(
            rng,
            options.unix_seconds,
            options.local_part_length,
            option.unwrap_or(options.default_domain),
        ),
        "name" => random_name(rng, option),
        _ => match option {
            Some(option) => option.to_string(),
            None => random_string(rng, options.string_length),
        },
    }
}
