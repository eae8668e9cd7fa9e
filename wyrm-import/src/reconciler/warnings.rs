//! Content-warning extraction
//!
//! Same word-start matching as tags, but every keyword is checked against the free
//! text and each subject, and there is no length cap.

use super::tags::{contains_at_word_start, push_unique};

/// Keyword → warning label, scanned in order
pub const WARNING_KEYWORDS: &[(&str, &str)] = &[
    // Violence
    ("violence", "violence"),
    ("violent", "violence"),
    ("murder", "violence"),
    ("torture", "torture"),
    ("war crimes", "violence"),
    ("massacre", "violence"),
    ("genocide", "genocide"),
    ("gore", "gore"),
    ("gun violence", "gun violence"),
    ("terrorism", "terrorism"),
    // Abuse
    ("child abuse", "child abuse"),
    ("domestic violence", "domestic abuse"),
    ("domestic abuse", "domestic abuse"),
    ("abuse", "abuse"),
    ("kidnapping", "kidnapping"),
    ("human trafficking", "human trafficking"),
    // Sexual content
    ("sexual assault", "sexual assault"),
    ("rape", "sexual assault"),
    ("incest", "incest"),
    ("erotic", "sexual content"),
    ("explicit", "sexual content"),
    // Self-harm and mental health
    ("suicide", "suicide"),
    ("self-harm", "self-harm"),
    ("self harm", "self-harm"),
    ("eating disorder", "eating disorders"),
    ("anorexia", "eating disorders"),
    ("depression", "depression"),
    ("anxiety", "anxiety"),
    ("mental illness", "mental illness"),
    ("psychosis", "mental illness"),
    ("ptsd", "ptsd"),
    ("trauma", "trauma"),
    // Phobias
    ("spiders", "arachnophobia"),
    ("claustrophob", "claustrophobia"),
    ("insects", "insects"),
    // Discrimination
    ("racism", "racism"),
    ("racist", "racism"),
    ("homophobia", "homophobia"),
    ("transphobia", "transphobia"),
    ("sexism", "sexism"),
    ("misogyny", "sexism"),
    ("antisemitism", "antisemitism"),
    ("slavery", "slavery"),
    ("holocaust", "holocaust"),
    // Death and grief
    ("death of a child", "child death"),
    ("death", "death"),
    ("dying", "death"),
    ("grief", "grief"),
    ("terminal illness", "terminal illness"),
    ("cancer", "cancer"),
    ("pet death", "animal death"),
    ("animal cruelty", "animal cruelty"),
    // Substance use
    ("addiction", "addiction"),
    ("drug use", "drug use"),
    ("drugs", "drug use"),
    ("alcoholism", "alcoholism"),
    ("overdose", "overdose"),
    // Other
    ("miscarriage", "pregnancy loss"),
    ("abortion", "abortion"),
    ("bullying", "bullying"),
    ("cannibal", "cannibalism"),
    ("blood", "blood"),
];

/// Extract content warnings from free text and subjects
///
/// De-duplicated case-insensitively; each label capitalized on its first letter.
pub fn extract_warnings(text: &str, subjects: &[String]) -> Vec<String> {
    let mut haystacks: Vec<String> = Vec::with_capacity(subjects.len() + 1);
    haystacks.push(text.to_lowercase());
    haystacks.extend(subjects.iter().map(|s| s.to_lowercase()));

    let mut warnings = Vec::new();
    for (keyword, warning) in WARNING_KEYWORDS {
        if haystacks.iter().any(|h| contains_at_word_start(h, keyword)) {
            push_unique(&mut warnings, &capitalize(warning));
        }
    }

    warnings
}

/// Uppercase the first character, leave the rest alone
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
