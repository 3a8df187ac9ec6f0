//! Curated phrase table for high-frequency UI strings.
//!
//! Hand-authored translations from the English source text, keyed by target
//! language code. The resolver consults this table before any remote call and
//! uses it as seed data when pre-warming its cache.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Hindi phrases (default language, most complete table)
const HINDI_PHRASES: &[(&str, &str)] = &[
    ("Welcome to Pragyadhara", "प्रज्ञाधारा में आपका स्वागत है"),
    ("Dashboard", "डैशबोर्ड"),
    ("Student", "छात्र"),
    ("Teacher", "शिक्षक"),
    ("Profile", "प्रोफ़ाइल"),
    ("Settings", "सेटिंग्स"),
    ("Analytics", "विश्लेषण"),
    ("Courses", "पाठ्यक्रम"),
    ("Assignments", "असाइनमेंट"),
    ("Attendance", "उपस्थिति"),
    ("Progress", "प्रगति"),
    ("Reports", "रिपोर्ट"),
    ("Notifications", "सूचनाएँ"),
    ("Search", "खोजें"),
    ("Language", "भाषा"),
    ("Save Changes", "परिवर्तन सहेजें"),
    ("Logout", "लॉग आउट"),
];

const BENGALI_PHRASES: &[(&str, &str)] = &[
    ("Welcome to Pragyadhara", "প্রজ্ঞাধারায় স্বাগতম"),
    ("Dashboard", "ড্যাশবোর্ড"),
    ("Student", "ছাত্র"),
    ("Teacher", "শিক্ষক"),
    ("Profile", "প্রোফাইল"),
    ("Settings", "সেটিংস"),
    ("Language", "ভাষা"),
];

const TAMIL_PHRASES: &[(&str, &str)] = &[
    ("Welcome to Pragyadhara", "பிரக்ஞாதாராவிற்கு வரவேற்கிறோம்"),
    ("Dashboard", "டாஷ்போர்டு"),
    ("Student", "மாணவர்"),
    ("Teacher", "ஆசிரியர்"),
    ("Settings", "அமைப்புகள்"),
    ("Language", "மொழி"),
];

const TELUGU_PHRASES: &[(&str, &str)] = &[
    ("Welcome to Pragyadhara", "ప్రజ్ఞాధారకు స్వాగతం"),
    ("Student", "విద్యార్థి"),
    ("Teacher", "ఉపాధ్యాయుడు"),
    ("Settings", "సెట్టింగ్‌లు"),
    ("Language", "భాష"),
];

const MARATHI_PHRASES: &[(&str, &str)] = &[
    ("Welcome to Pragyadhara", "प्रज्ञाधारामध्ये आपले स्वागत आहे"),
    ("Dashboard", "डॅशबोर्ड"),
    ("Student", "विद्यार्थी"),
    ("Teacher", "शिक्षक"),
    ("Settings", "सेटिंग्ज"),
    ("Language", "भाषा"),
];

/// Read-only bilingual mapping per target language.
#[derive(Debug)]
pub struct PhraseTable {
    tables: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

static PHRASES: OnceLock<PhraseTable> = OnceLock::new();

impl PhraseTable {
    /// Get the global phrase table.
    pub fn get() -> &'static PhraseTable {
        PHRASES.get_or_init(|| {
            let mut tables = HashMap::new();
            for (code, phrases) in [
                ("hi", HINDI_PHRASES),
                ("bn", BENGALI_PHRASES),
                ("ta", TAMIL_PHRASES),
                ("te", TELUGU_PHRASES),
                ("mr", MARATHI_PHRASES),
            ] {
                tables.insert(code, phrases.iter().copied().collect());
            }
            PhraseTable { tables }
        })
    }

    /// Look up the curated translation of `text` into `target_language_code`.
    pub fn lookup(&self, target_language_code: &str, text: &str) -> Option<&'static str> {
        self.tables
            .get(target_language_code)
            .and_then(|table| table.get(text))
            .copied()
    }

    /// Iterate over every `(source, translated)` pair for a target language.
    ///
    /// Yields nothing for languages without a curated table.
    pub fn entries(
        &self,
        target_language_code: &str,
    ) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.tables
            .get(target_language_code)
            .into_iter()
            .flat_map(|table| table.iter().map(|(source, translated)| (*source, *translated)))
    }

    /// Number of curated phrases for a target language.
    pub fn len(&self, target_language_code: &str) -> usize {
        self.tables
            .get(target_language_code)
            .map(HashMap::len)
            .unwrap_or(0)
    }

    /// Language codes that have a curated table.
    pub fn languages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tables.keys().copied()
    }
}
