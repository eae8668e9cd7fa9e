//! Tag extraction
//!
//! Case-insensitive matching against fixed keyword tables. A keyword
//! matches where a word starts, so "rape" does not fire inside "grape".
//! Subjects are checked against a whitelist of well-formed genre subjects
//! first, then the free text is scanned with the keyword table in order.
//! Result order is first occurrence; at most [`MAX_TAGS`] are kept.

/// Tag list length cap
pub const MAX_TAGS: usize = 5;

/// Tag emitted for any of [`LGBTQ_TRIGGERS`]
pub const LGBTQ_TAG: &str = "LGBTQ+";

/// Subjects that are already good tags (multi-word ones get hyphenated)
pub const GOOD_SUBJECTS: [&str; 17] = [
    "science fiction",
    "fantasy",
    "mystery",
    "romance",
    "horror",
    "thriller",
    "historical fiction",
    "young adult",
    "dystopian",
    "adventure",
    "humor",
    "poetry",
    "biography",
    "memoir",
    "classics",
    "graphic novels",
    "short stories",
];

pub const LGBTQ_TRIGGERS: [&str; 11] = [
    "lgbt",
    "gay",
    "lesbian",
    "queer",
    "transgender",
    "bisexual",
    "nonbinary",
    "non-binary",
    "same-sex",
    "homosexual",
    "sapphic",
];

/// Keyword → tag, scanned in order
pub const TAG_KEYWORDS: &[(&str, &str)] = &[
    // Genres
    ("science fiction", "sci-fi"),
    ("sci-fi", "sci-fi"),
    ("fantasy", "fantasy"),
    ("mystery", "mystery"),
    ("detective", "mystery"),
    ("thriller", "thriller"),
    ("horror", "horror"),
    ("romance", "romance"),
    ("dystopia", "dystopian"),
    ("utopia", "utopian"),
    ("satire", "satire"),
    ("fairy tale", "fairy-tale"),
    ("mythology", "mythology"),
    // Settings
    ("desert", "desert"),
    ("ocean", "ocean"),
    ("island", "island"),
    ("forest", "forest"),
    ("mountain", "mountains"),
    ("jungle", "jungle"),
    ("arctic", "arctic"),
    ("outer space", "space"),
    ("spaceship", "space"),
    ("galaxy", "space"),
    ("planet", "space"),
    ("small town", "small-town"),
    ("boarding school", "school"),
    ("academy", "school"),
    ("castle", "castle"),
    ("new york", "new-york"),
    ("london", "london"),
    ("paris", "paris"),
    ("post-apocalyptic", "post-apocalyptic"),
    ("apocalypse", "post-apocalyptic"),
    // Creatures and characters
    ("dragon", "dragons"),
    ("vampire", "vampires"),
    ("werewolf", "werewolves"),
    ("witch", "witches"),
    ("wizard", "magic"),
    ("magic", "magic"),
    ("ghost", "ghosts"),
    ("zombie", "zombies"),
    ("fairies", "fae"),
    ("faerie", "fae"),
    ("robot", "robots"),
    ("artificial intelligence", "ai"),
    ("alien", "aliens"),
    ("pirate", "pirates"),
    ("assassin", "assassins"),
    ("detective", "detectives"),
    ("spy", "espionage"),
    ("royalty", "royalty"),
    ("princess", "royalty"),
    ("prince", "royalty"),
    ("orphan", "orphans"),
    // Time periods
    ("medieval", "medieval"),
    ("victorian", "victorian"),
    ("regency", "regency"),
    ("world war", "wartime"),
    ("civil war", "wartime"),
    ("ancient rome", "ancient-world"),
    ("ancient greece", "ancient-world"),
    ("renaissance", "renaissance"),
    ("1920s", "1920s"),
    ("futuristic", "futuristic"),
    ("distant future", "futuristic"),
    ("time travel", "time-travel"),
    // Themes
    ("coming of age", "coming-of-age"),
    ("coming-of-age", "coming-of-age"),
    ("friendship", "friendship"),
    ("found family", "found-family"),
    ("revenge", "revenge"),
    ("vengeance", "revenge"),
    ("betrayal", "betrayal"),
    ("redemption", "redemption"),
    ("survival", "survival"),
    ("rebellion", "rebellion"),
    ("revolution", "rebellion"),
    ("politics", "politics"),
    ("political", "politics"),
    ("religion", "religion"),
    ("identity", "identity"),
    ("grief", "grief"),
    ("family saga", "family"),
    ("love story", "love-story"),
    ("enemies to lovers", "enemies-to-lovers"),
    ("ecology", "ecology"),
    ("environment", "ecology"),
    // Story elements
    ("heist", "heist"),
    ("murder", "murder-mystery"),
    ("prophecy", "prophecy"),
    ("chosen one", "chosen-one"),
    ("quest", "quest"),
    ("road trip", "road-trip"),
    ("unreliable narrator", "unreliable-narrator"),
    ("epistolary", "epistolary"),
    ("twist", "plot-twist"),
];

/// Extract up to [`MAX_TAGS`] tags from free text and subjects
///
/// Deterministic: identical input always yields identical output.
pub fn extract_tags(text: &str, subjects: &[String]) -> Vec<String> {
    let mut tags = Vec::new();

    for subject in subjects {
        let subject = subject.to_lowercase();
        for good in GOOD_SUBJECTS {
            if subject.contains(good) {
                push_unique(&mut tags, &good.replace(' ', "-"));
            }
        }
    }

    let haystack = text.to_lowercase();
    for (keyword, tag) in TAG_KEYWORDS {
        if contains_at_word_start(&haystack, keyword) {
            push_unique(&mut tags, tag);
        }
    }

    let lgbtq = LGBTQ_TRIGGERS.iter().any(|trigger| {
        contains_at_word_start(&haystack, trigger)
            || subjects
                .iter()
                .any(|s| contains_at_word_start(&s.to_lowercase(), trigger))
    });
    if lgbtq {
        push_unique(&mut tags, LGBTQ_TAG);
    }

    tags.truncate(MAX_TAGS);
    tags
}

/// Whether `needle` occurs in `haystack` at the start of a word
///
/// Both sides are expected to be lowercase already.
pub(crate) fn contains_at_word_start(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(at, _)| {
        haystack[..at]
            .chars()
            .next_back()
            .map_or(true, |before| !before.is_alphanumeric())
    })
}

/// Append unless an entry with the same case-insensitive identity exists
pub(crate) fn push_unique(list: &mut Vec<String>, item: &str) {
    let item = item.trim();
    if item.is_empty() {
        return;
    }
    let key = item.to_lowercase();
    if !list.iter().any(|existing| existing.to_lowercase() == key) {
        list.push(item.to_string());
    }
}
